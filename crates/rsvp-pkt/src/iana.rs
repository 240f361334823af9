// Copyright (C) 2024-present The Pathwire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! RSVP-TE numbering used by the exclude route subobjects, see
//! [RFC4874](https://datatracker.ietf.org/doc/html/rfc4874).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum XroSubobjectType {
    Ipv4Prefix = 1,
    Ipv6Prefix = 2,
    Unnumbered = 4,
    AsNumber = 32,
    Srlg = 34,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedXroSubobjectType(pub u8);

impl From<XroSubobjectType> for u8 {
    fn from(value: XroSubobjectType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for XroSubobjectType {
    type Error = UndefinedXroSubobjectType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedXroSubobjectType(value)),
        }
    }
}

/// Whether the excluded resource is an interface, a node or an SRLG
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum XroAttribute {
    Interface = 0,
    Node = 1,
    Srlg = 2,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedXroAttribute(pub u8);

impl From<XroAttribute> for u8 {
    fn from(value: XroAttribute) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for XroAttribute {
    type Error = UndefinedXroAttribute;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedXroAttribute(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subobject_type() {
        assert_eq!(XroSubobjectType::try_from(34), Ok(XroSubobjectType::Srlg));
        assert_eq!(
            XroSubobjectType::try_from(3),
            Err(UndefinedXroSubobjectType(3))
        );
        assert_eq!(u8::from(XroSubobjectType::Ipv6Prefix), 2);
    }

    #[test]
    fn test_attribute() {
        assert_eq!(XroAttribute::try_from(0), Ok(XroAttribute::Interface));
        assert_eq!(XroAttribute::try_from(9), Err(UndefinedXroAttribute(9)));
    }
}
