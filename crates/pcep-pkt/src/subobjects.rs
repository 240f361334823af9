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

//! Explicit route (ERO) and exclude route (XRO) subobjects as carried by PCEP

use crate::iana::{SrNaiType, XroAttribute};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EroSubobject {
    loose: bool,
    value: EroSubobjectValue,
}

impl EroSubobject {
    pub const fn new(loose: bool, value: EroSubobjectValue) -> Self {
        Self { loose, value }
    }

    pub const fn loose(&self) -> bool {
        self.loose
    }

    pub const fn value(&self) -> &EroSubobjectValue {
        &self.value
    }
}

#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(EroSubobjectKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum EroSubobjectValue {
    /// Type 1 for IPv4 and type 2 for IPv6 prefixes
    IpPrefix(IpNet),
    SrEro(SrEroSubobject),
}

impl EroSubobjectValue {
    pub fn kind(&self) -> EroSubobjectKind {
        EroSubobjectKind::from(self)
    }
}

/// SR-ERO subobject [RFC8664](https://datatracker.ietf.org/doc/html/rfc8664#section-4.3.1)
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |L|   Type=36   |     Length    |  NT   |     Flags     |F|S|C|M|
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         SID (optional)                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// //                   NAI (variable, optional)                  //
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The F and S flags aren't stored, they follow from `nai` and `sid` being
/// absent.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SrEroSubobject {
    nai_type: SrNaiType,
    c_flag: bool,
    m_flag: bool,
    sid: Option<u32>,
    nai: Option<Nai>,
}

impl SrEroSubobject {
    pub const fn new(
        nai_type: SrNaiType,
        c_flag: bool,
        m_flag: bool,
        sid: Option<u32>,
        nai: Option<Nai>,
    ) -> Self {
        Self {
            nai_type,
            c_flag,
            m_flag,
            sid,
            nai,
        }
    }

    pub const fn nai_type(&self) -> SrNaiType {
        self.nai_type
    }

    pub const fn c_flag(&self) -> bool {
        self.c_flag
    }

    /// The SID is an MPLS label stack entry
    pub const fn m_flag(&self) -> bool {
        self.m_flag
    }

    pub const fn sid(&self) -> Option<u32> {
        self.sid
    }

    /// The 20 bits label when the SID is an MPLS label stack entry
    pub const fn sid_label(&self) -> Option<u32> {
        match self.sid {
            Some(sid) if self.m_flag => Some(sid >> 12),
            _ => None,
        }
    }

    pub const fn nai(&self) -> Option<&Nai> {
        self.nai.as_ref()
    }
}

/// Node or Adjacency Identifier
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Nai {
    Ipv4Node(Ipv4Addr),
    Ipv6Node(Ipv6Addr),
    Ipv4Adjacency {
        local: Ipv4Addr,
        remote: Ipv4Addr,
    },
    Ipv6Adjacency {
        local: Ipv6Addr,
        remote: Ipv6Addr,
    },
    Unnumbered {
        local_node: u32,
        local_interface: u32,
        remote_node: u32,
        remote_interface: u32,
    },
}

impl Nai {
    pub const fn nai_type(&self) -> SrNaiType {
        match self {
            Self::Ipv4Node(_) => SrNaiType::Ipv4NodeId,
            Self::Ipv6Node(_) => SrNaiType::Ipv6NodeId,
            Self::Ipv4Adjacency { .. } => SrNaiType::Ipv4Adjacency,
            Self::Ipv6Adjacency { .. } => SrNaiType::Ipv6Adjacency,
            Self::Unnumbered { .. } => SrNaiType::UnnumberedAdjacency,
        }
    }
}

/// XRO subobject [RFC5521](https://datatracker.ietf.org/doc/html/rfc5521#section-2.1.1),
/// `mandatory` is the L bit: the resource must be excluded rather than
/// avoided if possible.
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
    /// Shared Risk Link Group id
    Srlg(u32),
}

impl XroSubobjectValue {
    pub fn kind(&self) -> XroSubobjectKind {
        XroSubobjectKind::from(self)
    }
}
