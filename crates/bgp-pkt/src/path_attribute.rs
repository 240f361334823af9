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

//! Contains the representation of BGP Path Attributes

use crate::{
    iana::{Origin, PathAttributeType},
    nlri::{NextHop, Nlri},
    wire::deserializer::path_attribute::PathAttributeParsingError,
};
use pathwire_iana::address_family::AddressType;
use pathwire_registry::FamilyCode;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attr. Flags  |Attr. Type Code|
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// `extended_length` only forces the two octets length. The serializer sets
/// it on its own whenever the value is longer than 255 octets.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PathAttribute {
    optional: bool,
    transitive: bool,
    partial: bool,
    extended_length: bool,
    value: PathAttributeValue,
}

impl PathAttribute {
    pub const fn new(
        optional: bool,
        transitive: bool,
        partial: bool,
        extended_length: bool,
        value: PathAttributeValue,
    ) -> Self {
        Self {
            optional,
            transitive,
            partial,
            extended_length,
            value,
        }
    }

    /// Well-known mandatory attributes are transitive and not optional
    pub const fn well_known(value: PathAttributeValue) -> Self {
        Self::new(false, true, false, false, value)
    }

    pub const fn optional_non_transitive(value: PathAttributeValue) -> Self {
        Self::new(true, false, false, false, value)
    }

    pub const fn optional(&self) -> bool {
        self.optional
    }

    pub const fn transitive(&self) -> bool {
        self.transitive
    }

    pub const fn partial(&self) -> bool {
        self.partial
    }

    pub const fn extended_length(&self) -> bool {
        self.extended_length
    }

    pub const fn value(&self) -> &PathAttributeValue {
        &self.value
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, strum_macros::EnumDiscriminants)]
#[strum_discriminants(name(PathAttributeKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum PathAttributeValue {
    Origin(Origin),
    NextHop(Ipv4Addr),
    MultiExitDiscriminator(u32),
    LocalPreference(u32),
    AtomicAggregate,
    MpReach(MpReach),
    MpUnreach(MpUnreach),
    Unrecognized(UnrecognizedAttribute),
}

impl PathAttributeValue {
    pub fn kind(&self) -> PathAttributeKind {
        PathAttributeKind::from(self)
    }

    pub const fn code(&self) -> u8 {
        let code = match self {
            Self::Origin(_) => PathAttributeType::Origin,
            Self::NextHop(_) => PathAttributeType::NextHop,
            Self::MultiExitDiscriminator(_) => PathAttributeType::MultiExitDiscriminator,
            Self::LocalPreference(_) => PathAttributeType::LocalPreference,
            Self::AtomicAggregate => PathAttributeType::AtomicAggregate,
            Self::MpReach(_) => PathAttributeType::MpReachNlri,
            Self::MpUnreach(_) => PathAttributeType::MpUnreachNlri,
            Self::Unrecognized(value) => return value.code(),
        };
        code as u8
    }
}

/// Multiprotocol Reachable NLRI [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760#section-3)
///
/// ```text
/// +---------------------------------------------------------+
/// | Address Family Identifier (2 octets)                    |
/// +---------------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet)          |
/// +---------------------------------------------------------+
/// | Length of Next Hop Network Address (1 octet)            |
/// +---------------------------------------------------------+
/// | Network Address of Next Hop (variable)                  |
/// +---------------------------------------------------------+
/// | Reserved (1 octet)                                      |
/// +---------------------------------------------------------+
/// | Network Layer Reachability Information (variable)       |
/// +---------------------------------------------------------+
/// ```
///
/// A zero length next hop is valid, e.g. in an End-of-RIB marker.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MpReach {
    address_type: AddressType,
    next_hop: Option<NextHop>,
    nlri: Vec<Nlri>,
}

impl MpReach {
    pub const fn new(address_type: AddressType, next_hop: Option<NextHop>, nlri: Vec<Nlri>) -> Self {
        Self {
            address_type,
            next_hop,
            nlri,
        }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub const fn next_hop(&self) -> Option<&NextHop> {
        self.next_hop.as_ref()
    }

    pub const fn nlri(&self) -> &Vec<Nlri> {
        &self.nlri
    }
}

/// Multiprotocol Unreachable NLRI [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760#section-4)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MpUnreach {
    address_type: AddressType,
    nlri: Vec<Nlri>,
}

impl MpUnreach {
    pub const fn new(address_type: AddressType, nlri: Vec<Nlri>) -> Self {
        Self { address_type, nlri }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub const fn nlri(&self) -> &Vec<Nlri> {
        &self.nlri
    }
}

/// An optional attribute no codec is registered for, kept as received
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedAttribute {
    code: u8,
    flags: u8,
    value: Vec<u8>,
}

impl UnrecognizedAttribute {
    pub const fn new(code: u8, flags: u8, value: Vec<u8>) -> Self {
        Self { code, flags, value }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn flags(&self) -> u8 {
        self.flags
    }

    pub const fn value(&self) -> &Vec<u8> {
        &self.value
    }
}

/// How a malformed attribute affects the UPDATE carrying it
/// [RFC7606](https://datatracker.ietf.org/doc/html/rfc7606#section-2)
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AttributeErrorAction {
    /// Routes carried by the UPDATE are handled as withdrawn
    TreatAsWithdraw,
    /// Only the attribute is dropped
    AttributeDiscard,
    /// The error can't be contained, the session has to be reset
    SessionReset,
}

/// A malformed attribute that was contained instead of failing the block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeError {
    code: u8,
    action: AttributeErrorAction,
    error: PathAttributeParsingError,
}

impl AttributeError {
    pub const fn new(code: u8, action: AttributeErrorAction, error: PathAttributeParsingError) -> Self {
        Self {
            code,
            action,
            error,
        }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn action(&self) -> AttributeErrorAction {
        self.action
    }

    pub const fn error(&self) -> &PathAttributeParsingError {
        &self.error
    }
}

/// The attributes block of an UPDATE message, as parsed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathAttributes {
    attributes: Vec<PathAttribute>,
    unsupported_families: Vec<FamilyCode>,
    errors: Vec<AttributeError>,
}

impl PathAttributes {
    pub const fn new(attributes: Vec<PathAttribute>) -> Self {
        Self {
            attributes,
            unsupported_families: vec![],
            errors: vec![],
        }
    }

    pub(crate) const fn from_parts(
        attributes: Vec<PathAttribute>,
        unsupported_families: Vec<FamilyCode>,
        errors: Vec<AttributeError>,
    ) -> Self {
        Self {
            attributes,
            unsupported_families,
            errors,
        }
    }

    pub const fn attributes(&self) -> &Vec<PathAttribute> {
        &self.attributes
    }

    /// MP_REACH/MP_UNREACH families that were skipped because no family is
    /// registered for them
    pub const fn unsupported_families(&self) -> &Vec<FamilyCode> {
        &self.unsupported_families
    }

    pub const fn errors(&self) -> &Vec<AttributeError> {
        &self.errors
    }

    pub fn treat_as_withdraw(&self) -> bool {
        self.errors
            .iter()
            .any(|err| err.action() == AttributeErrorAction::TreatAsWithdraw)
    }

    /// Find the first attribute of the given type code
    pub fn get(&self, code: u8) -> Option<&PathAttribute> {
        self.attributes.iter().find(|attr| attr.value().code() == code)
    }

    pub fn unrecognized(&self, code: u8) -> Option<&UnrecognizedAttribute> {
        self.attributes.iter().find_map(|attr| match attr.value() {
            PathAttributeValue::Unrecognized(value) if value.code() == code => Some(value),
            _ => None,
        })
    }
}
