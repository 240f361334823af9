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

//! BGP capabilities advertisement [RFC5492](https://datatracker.ietf.org/doc/html/rfc5492)
//! and the OPEN optional parameters that carry them.

use crate::iana::{BgpCapabilityCode, BgpOpenParameterType};
use pathwire_registry::FamilyCode;
use serde::{Deserialize, Serialize};

/// ```text
/// +------------------------------+
/// | Capability Code (1 octet)    |
/// +------------------------------+
/// | Capability Length (1 octet)  |
/// +------------------------------+
/// | Capability Value (variable)  |
/// ~                              ~
/// +------------------------------+
/// ```
#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(BgpCapabilityKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum BgpCapability {
    /// The family is kept as its raw code, a speaker may advertise families
    /// it has no codec for.
    MultiProtocol(FamilyCode),
    RouteRefresh,
    FourOctetAs(u32),
    Unrecognized(UnrecognizedCapability),
}

impl BgpCapability {
    pub fn kind(&self) -> BgpCapabilityKind {
        BgpCapabilityKind::from(self)
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::MultiProtocol(_) => BgpCapabilityCode::MultiProtocolExtensions as u8,
            Self::RouteRefresh => BgpCapabilityCode::RouteRefreshCapability as u8,
            Self::FourOctetAs(_) => BgpCapabilityCode::FourOctetAs as u8,
            Self::Unrecognized(value) => value.code(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UnrecognizedCapability {
    code: u8,
    value: Vec<u8>,
}

impl UnrecognizedCapability {
    pub const fn new(code: u8, value: Vec<u8>) -> Self {
        Self { code, value }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn value(&self) -> &Vec<u8> {
        &self.value
    }
}

#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(BgpOpenParameterKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum BgpOpenParameter {
    Capabilities(Vec<BgpCapability>),
}

impl BgpOpenParameter {
    pub fn kind(&self) -> BgpOpenParameterKind {
        BgpOpenParameterKind::from(self)
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::Capabilities(_) => BgpOpenParameterType::Capabilities as u8,
        }
    }
}
