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

use crate::iana::XroAttribute;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Exclude route subobject as RSVP-TE carries it in the EXCLUDE_ROUTE object
/// [RFC4874](https://datatracker.ietf.org/doc/html/rfc4874#section-3.1).
///
/// `mandatory` mirrors the L bit of the subobject header.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct XroSubobject {
    mandatory: bool,
    attribute: XroAttribute,
    value: XroSubobjectValue,
}

impl XroSubobject {
    pub const fn new(mandatory: bool, attribute: XroAttribute, value: XroSubobjectValue) -> Self {
        Self {
            mandatory,
            attribute,
            value,
        }
    }

    pub const fn mandatory(&self) -> bool {
        self.mandatory
    }

    pub const fn attribute(&self) -> XroAttribute {
        self.attribute
    }

    pub const fn value(&self) -> &XroSubobjectValue {
        &self.value
    }
}

#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(XroSubobjectKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum XroSubobjectValue {
    IpPrefix(IpNet),
    Srlg(u32),
}

impl XroSubobjectValue {
    pub fn kind(&self) -> XroSubobjectKind {
        XroSubobjectKind::from(self)
    }
}
