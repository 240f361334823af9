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

//! Network Layer Reachability Information of the families we carry

use crate::iana::RouteDistinguisherTypeCode;
use ipnet::{Ipv4Net, Ipv6Net};
use pathwire_iana::address_family::AddressType;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// One entry of an MPLS label stack as carried in NLRI
/// [RFC8277](https://datatracker.ietf.org/doc/html/rfc8277#section-2):
/// 20 bits label, 3 bits traffic class and the bottom of stack bit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MplsLabel([u8; 3]);

impl MplsLabel {
    pub const fn new(label: [u8; 3]) -> Self {
        Self(label)
    }

    /// Build a label from its 20-bit value, with zero traffic class
    pub const fn from_value(value: u32, bottom: bool) -> Self {
        let raw = (value & 0x000f_ffff) << 4 | bottom as u32;
        Self([(raw >> 16) as u8, (raw >> 8) as u8, raw as u8])
    }

    pub const fn raw(&self) -> &[u8; 3] {
        &self.0
    }

    /// The top 20 bits
    pub const fn value(&self) -> u32 {
        ((self.0[0] as u32) << 12) | ((self.0[1] as u32) << 4) | ((self.0[2] as u32) >> 4)
    }

    pub const fn is_bottom(&self) -> bool {
        self.0[2] & 0x01 == 0x01
    }

    /// `0x800000` is sent in withdrawals in place of a real label stack
    /// [RFC8277](https://datatracker.ietf.org/doc/html/rfc8277#section-2.4)
    pub const fn is_unreach_compatibility(&self) -> bool {
        self.0[0] == 0x80 && self.0[1] == 0x00 && self.0[2] == 0x00
    }
}

/// Route Distinguisher (RD), 2 bytes type followed by 6 bytes value
/// [RFC4364](https://datatracker.ietf.org/doc/html/rfc4364#section-4.2)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RouteDistinguisher {
    As2Administrator { asn2: u16, number: u32 },
    Ipv4Administrator { ip: Ipv4Addr, number: u16 },
    As4Administrator { asn4: u32, number: u16 },
    /// All ones on the wire [RFC7524](https://datatracker.ietf.org/doc/html/rfc7524)
    LeafAdRoutes,
}

impl RouteDistinguisher {
    pub const fn get_type(&self) -> RouteDistinguisherTypeCode {
        match self {
            Self::As2Administrator { .. } => RouteDistinguisherTypeCode::As2Administrator,
            Self::Ipv4Administrator { .. } => RouteDistinguisherTypeCode::Ipv4Administrator,
            Self::As4Administrator { .. } => RouteDistinguisherTypeCode::As4Administrator,
            Self::LeafAdRoutes => RouteDistinguisherTypeCode::LeafAdRoutes,
        }
    }
}

impl std::fmt::Display for RouteDistinguisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::As2Administrator { asn2, number } => write!(f, "{asn2}:{number}"),
            Self::Ipv4Administrator { ip, number } => write!(f, "{ip}:{number}"),
            Self::As4Administrator { asn4, number } => write!(f, "{asn4}:{number}"),
            Self::LeafAdRoutes => write!(f, "leaf-A-D"),
        }
    }
}

/// Labeled unicast prefix [RFC8277](https://datatracker.ietf.org/doc/html/rfc8277)
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LabeledIpv4Prefix {
    label_stack: Vec<MplsLabel>,
    network: Ipv4Net,
}

impl LabeledIpv4Prefix {
    pub const fn new(label_stack: Vec<MplsLabel>, network: Ipv4Net) -> Self {
        Self {
            label_stack,
            network,
        }
    }

    pub const fn label_stack(&self) -> &Vec<MplsLabel> {
        &self.label_stack
    }

    pub const fn network(&self) -> Ipv4Net {
        self.network
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LabeledIpv6Prefix {
    label_stack: Vec<MplsLabel>,
    network: Ipv6Net,
}

impl LabeledIpv6Prefix {
    pub const fn new(label_stack: Vec<MplsLabel>, network: Ipv6Net) -> Self {
        Self {
            label_stack,
            network,
        }
    }

    pub const fn label_stack(&self) -> &Vec<MplsLabel> {
        &self.label_stack
    }

    pub const fn network(&self) -> Ipv6Net {
        self.network
    }
}

/// VPN-IPv4 [RFC4364](https://datatracker.ietf.org/doc/html/rfc4364#section-4.3.4)
///
/// ```text
/// +---------------------------+
/// |   Length (1 octet)        |  bits of label stack + RD + prefix
/// +---------------------------+
/// |   Label stack (3 octets)  |
/// +---------------------------+
/// |   RD (8 octets)           |
/// +---------------------------+
/// |   Prefix (variable)       |  only the octets the prefix occupies
/// +---------------------------+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ipv4MplsVpnUnicastAddress {
    rd: RouteDistinguisher,
    label_stack: Vec<MplsLabel>,
    network: Ipv4Net,
}

impl Ipv4MplsVpnUnicastAddress {
    pub const fn new(rd: RouteDistinguisher, label_stack: Vec<MplsLabel>, network: Ipv4Net) -> Self {
        Self {
            rd,
            label_stack,
            network,
        }
    }

    pub const fn rd(&self) -> RouteDistinguisher {
        self.rd
    }

    pub const fn label_stack(&self) -> &Vec<MplsLabel> {
        &self.label_stack
    }

    pub const fn network(&self) -> Ipv4Net {
        self.network
    }
}

/// VPN-IPv6 [RFC4659](https://datatracker.ietf.org/doc/html/rfc4659#section-3.2),
/// same layout as [Ipv4MplsVpnUnicastAddress] with an IPv6 prefix.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ipv6MplsVpnUnicastAddress {
    rd: RouteDistinguisher,
    label_stack: Vec<MplsLabel>,
    network: Ipv6Net,
}

impl Ipv6MplsVpnUnicastAddress {
    pub const fn new(rd: RouteDistinguisher, label_stack: Vec<MplsLabel>, network: Ipv6Net) -> Self {
        Self {
            rd,
            label_stack,
            network,
        }
    }

    pub const fn rd(&self) -> RouteDistinguisher {
        self.rd
    }

    pub const fn label_stack(&self) -> &Vec<MplsLabel> {
        &self.label_stack
    }

    pub const fn network(&self) -> Ipv6Net {
        self.network
    }
}

/// Route Target membership [RFC4684](https://datatracker.ietf.org/doc/html/rfc4684#section-4)
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RouteTargetMembership {
    /// Zero prefix length, matches every route target
    Default,
    /// `prefix_len` counts the origin AS bits plus the route target bits
    /// present in `route_target`.
    Constrained {
        prefix_len: u8,
        origin_as: u32,
        route_target: Vec<u8>,
    },
}

#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(NlriKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum Nlri {
    Ipv4Unicast(Ipv4Net),
    Ipv6Unicast(Ipv6Net),
    Ipv4Labeled(LabeledIpv4Prefix),
    Ipv6Labeled(LabeledIpv6Prefix),
    Ipv4MplsVpn(Ipv4MplsVpnUnicastAddress),
    Ipv6MplsVpn(Ipv6MplsVpnUnicastAddress),
    RouteTargetMembership(RouteTargetMembership),
}

impl Nlri {
    /// Tag used to look up the serializer of this NLRI
    pub fn kind(&self) -> NlriKind {
        NlriKind::from(self)
    }

    pub const fn address_type(&self) -> AddressType {
        match self {
            Self::Ipv4Unicast(_) => AddressType::Ipv4Unicast,
            Self::Ipv6Unicast(_) => AddressType::Ipv6Unicast,
            Self::Ipv4Labeled(_) => AddressType::Ipv4NlriMplsLabels,
            Self::Ipv6Labeled(_) => AddressType::Ipv6NlriMplsLabels,
            Self::Ipv4MplsVpn(_) => AddressType::Ipv4MplsLabeledVpn,
            Self::Ipv6MplsVpn(_) => AddressType::Ipv6MplsLabeledVpn,
            Self::RouteTargetMembership(_) => AddressType::Ipv4RouteTargetConstraints,
        }
    }
}

/// MP_REACH_NLRI next hop, the variant is derived from the next hop length
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NextHop {
    Ipv4(Ipv4Addr),
    Ipv6 {
        global: Ipv6Addr,
        link_local: Option<Ipv6Addr>,
    },
    VpnIpv4 {
        rd: RouteDistinguisher,
        ip: Ipv4Addr,
    },
    VpnIpv6 {
        rd: RouteDistinguisher,
        global: Ipv6Addr,
        link_local: Option<(RouteDistinguisher, Ipv6Addr)>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpls_label() {
        let label = MplsLabel::new([0x00, 0x16, 0x31]);
        assert_eq!(label.value(), 355);
        assert!(label.is_bottom());
        assert!(!label.is_unreach_compatibility());
        assert_eq!(MplsLabel::from_value(355, true), label);
        assert_eq!(MplsLabel::from_value(0x80000, false).raw(), &[0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_nlri_kind() {
        let nlri = Nlri::Ipv4Unicast("10.0.0.0/8".parse().unwrap());
        assert_eq!(nlri.kind(), NlriKind::Ipv4Unicast);
        assert_eq!(nlri.address_type(), AddressType::Ipv4Unicast);
    }

    #[test]
    fn test_rd_display() {
        let rd = RouteDistinguisher::Ipv4Administrator {
            ip: Ipv4Addr::new(1, 2, 3, 4),
            number: 258,
        };
        assert_eq!(rd.to_string(), "1.2.3.4:258");
    }
}
