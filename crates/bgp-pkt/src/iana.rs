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

//! BGP numbers assigned by IANA

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

/// BGP Path Attributes as defined by IANA [BGP Path Attributes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-2)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PathAttributeType {
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    Origin = 1,
    AsPath = 2,
    NextHop = 3,
    MultiExitDiscriminator = 4,
    LocalPreference = 5,
    AtomicAggregate = 6,
    Aggregator = 7,

    /// [RFC1997](https://datatracker.ietf.org/doc/html/rfc1997)
    Communities = 8,

    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MpReachNlri = 14,
    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MpUnreachNlri = 15,

    /// [RFC4360](https://datatracker.ietf.org/doc/html/rfc4360)
    ExtendedCommunities = 16,

    /// [RFC8092](https://datatracker.ietf.org/doc/html/rfc8092)
    LargeCommunities = 32,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedPathAttributeType(pub u8);

impl From<PathAttributeType> for u8 {
    fn from(value: PathAttributeType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for PathAttributeType {
    type Error = UndefinedPathAttributeType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedPathAttributeType(value)),
        }
    }
}

/// BGP Capabilities [RFC5492](https://datatracker.ietf.org/doc/html/rfc5492)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BgpCapabilityCode {
    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MultiProtocolExtensions = 1,
    /// [RFC2918](https://datatracker.ietf.org/doc/html/rfc2918)
    RouteRefreshCapability = 2,
    /// [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
    FourOctetAs = 65,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedBgpCapabilityCode(pub u8);

impl From<BgpCapabilityCode> for u8 {
    fn from(value: BgpCapabilityCode) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for BgpCapabilityCode {
    type Error = UndefinedBgpCapabilityCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedBgpCapabilityCode(value)),
        }
    }
}

/// BGP OPEN Optional Parameter Types
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BgpOpenParameterType {
    /// [RFC5492](https://datatracker.ietf.org/doc/html/rfc5492)
    Capabilities = 2,
}

impl From<BgpOpenParameterType> for u8 {
    fn from(value: BgpOpenParameterType) -> Self {
        value as u8
    }
}

/// Route Distinguisher types [RFC4364](https://datatracker.ietf.org/doc/html/rfc4364#section-4.2)
#[repr(u16)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RouteDistinguisherTypeCode {
    As2Administrator = 0x0000,
    Ipv4Administrator = 0x0001,
    As4Administrator = 0x0002,
    /// [RFC7524](https://datatracker.ietf.org/doc/html/rfc7524)
    LeafAdRoutes = 0xffff,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedRouteDistinguisherTypeCode(pub u16);

impl From<RouteDistinguisherTypeCode> for u16 {
    fn from(value: RouteDistinguisherTypeCode) -> Self {
        value as u16
    }
}

impl TryFrom<u16> for RouteDistinguisherTypeCode {
    type Error = UndefinedRouteDistinguisherTypeCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedRouteDistinguisherTypeCode(value)),
        }
    }
}

/// ORIGIN path attribute values [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-5.1.1)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Origin {
    #[strum(serialize = "i")]
    Igp = 0,
    #[strum(serialize = "e")]
    Egp = 1,
    #[strum(serialize = "?")]
    Incomplete = 2,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedOrigin(pub u8);

impl From<Origin> for u8 {
    fn from(value: Origin) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Origin {
    type Error = UndefinedOrigin;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedOrigin(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_attribute_type() {
        assert_eq!(PathAttributeType::try_from(14), Ok(PathAttributeType::MpReachNlri));
        assert_eq!(
            PathAttributeType::try_from(0),
            Err(UndefinedPathAttributeType(0))
        );
        assert_eq!(u8::from(PathAttributeType::MpUnreachNlri), 15);
    }

    #[test]
    fn test_route_distinguisher_type() {
        assert_eq!(
            RouteDistinguisherTypeCode::try_from(0xffff),
            Ok(RouteDistinguisherTypeCode::LeafAdRoutes)
        );
        assert_eq!(
            RouteDistinguisherTypeCode::try_from(3),
            Err(UndefinedRouteDistinguisherTypeCode(3))
        );
    }

    #[test]
    fn test_origin() {
        assert_eq!(Origin::try_from(2), Ok(Origin::Incomplete));
        assert_eq!(Origin::try_from(3), Err(UndefinedOrigin(3)));
        assert_eq!(Origin::Igp.to_string(), "i");
    }
}
