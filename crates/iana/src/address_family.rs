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

//! Numbering of [AddressFamily] (AFI) and [SubsequentAddressFamily] (SAFI),
//! plus [AddressType], the family tag that only admits the AFI/SAFI
//! combinations the protocol crates know how to carry.
//!
//! ```rust
//! use pathwire_iana::address_family::*;
//!
//! let vpn = AddressType::from_afi_safi(AddressFamily::IPv6, SubsequentAddressFamily::MplsVpn);
//! assert_eq!(vpn, Ok(AddressType::Ipv6MplsLabeledVpn));
//! assert_eq!(
//!     AddressType::Ipv4Unicast.subsequent_address_family(),
//!     SubsequentAddressFamily::Unicast
//! );
//! assert_eq!(
//!     AddressType::from_afi_safi(AddressFamily::L2vpn, SubsequentAddressFamily::MplsVpn),
//!     Err(InvalidAddressType::new(
//!         AddressFamily::L2vpn,
//!         SubsequentAddressFamily::MplsVpn
//!     ))
//! );
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

/// Address families identifiers (AFI) registered at IANA [Address Family Number](https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml)
///
/// ```rust
/// use pathwire_iana::address_family::{AddressFamily, UndefinedAddressFamily};
///
/// assert_eq!(AddressFamily::try_from(2), Ok(AddressFamily::IPv6));
/// assert_eq!(AddressFamily::try_from(65000), Err(UndefinedAddressFamily(65000)));
/// ```
#[repr(u16)]
#[derive(FromRepr, Display, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AddressFamily {
    IPv4 = 1,
    IPv6 = 2,
    Nsap = 3,
    /// 802 (includes all 802 media plus Ethernet "canonical format")
    IEEE802 = 6,
    /// [RFC4761](https://datatracker.ietf.org/doc/html/RFC4761) AFI for L2VPN information
    L2vpn = 25,
    /// [RFC7752](https://datatracker.ietf.org/doc/html/RFC7752)
    BgpLs = 16388,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedAddressFamily(pub u16);

impl From<AddressFamily> for u16 {
    fn from(afi: AddressFamily) -> Self {
        afi as u16
    }
}

impl TryFrom<u16> for AddressFamily {
    type Error = UndefinedAddressFamily;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(afi) => Ok(afi),
            None => Err(UndefinedAddressFamily(value)),
        }
    }
}

/// Subsequent Address families identifiers (SAFI) registered at IANA [SAFI Values](https://www.iana.org/assignments/safi-namespace/safi-namespace.xhtml)
#[repr(u8)]
#[derive(FromRepr, Display, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SubsequentAddressFamily {
    /// [RFC4760](https://datatracker.ietf.org/doc/html/RFC4760)
    Unicast = 1,
    /// [RFC4760](https://datatracker.ietf.org/doc/html/RFC4760)
    Multicast = 2,
    /// NLRI with MPLS Labels [RFC8277](https://datatracker.ietf.org/doc/html/RFC8277)
    NlriMplsLabels = 4,
    /// BGP EVPNs [RFC7432](https://datatracker.ietf.org/doc/html/RFC7432)
    BgpEvpn = 70,
    /// BGP-LS [RFC7752](https://datatracker.ietf.org/doc/html/RFC7752)
    BgpLs = 71,
    /// MPLS-labeled VPN address [RFC4364](https://datatracker.ietf.org/doc/html/RFC4364)
    MplsVpn = 128,
    /// Route Target constrains [RFC4684](https://datatracker.ietf.org/doc/html/RFC4684)
    RouteTargetConstrains = 132,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedSubsequentAddressFamily(pub u8);

impl From<SubsequentAddressFamily> for u8 {
    fn from(safi: SubsequentAddressFamily) -> Self {
        safi as u8
    }
}

impl TryFrom<u8> for SubsequentAddressFamily {
    type Error = UndefinedSubsequentAddressFamily;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(safi) => Ok(safi),
            None => Err(UndefinedSubsequentAddressFamily(value)),
        }
    }
}

/// Valid combinations of [AddressFamily] and [SubsequentAddressFamily]
#[derive(Display, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AddressType {
    Ipv4Unicast,
    Ipv4Multicast,
    Ipv4NlriMplsLabels,
    Ipv4MplsLabeledVpn,
    Ipv4RouteTargetConstraints,

    Ipv6Unicast,
    Ipv6Multicast,
    Ipv6NlriMplsLabels,
    Ipv6MplsLabeledVpn,

    L2VpnBgpEvpn,
    BgpLs,
}

/// Error for an AFI/SAFI pair that doesn't form an [AddressType]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InvalidAddressType {
    address_family: AddressFamily,
    subsequent_address_family: SubsequentAddressFamily,
}

impl InvalidAddressType {
    pub const fn new(
        address_family: AddressFamily,
        subsequent_address_family: SubsequentAddressFamily,
    ) -> Self {
        Self {
            address_family,
            subsequent_address_family,
        }
    }

    pub const fn address_family(&self) -> AddressFamily {
        self.address_family
    }

    pub const fn subsequent_address_family(&self) -> SubsequentAddressFamily {
        self.subsequent_address_family
    }
}

impl AddressType {
    pub const fn address_family(&self) -> AddressFamily {
        match self {
            Self::Ipv4Unicast
            | Self::Ipv4Multicast
            | Self::Ipv4NlriMplsLabels
            | Self::Ipv4MplsLabeledVpn
            | Self::Ipv4RouteTargetConstraints => AddressFamily::IPv4,
            Self::Ipv6Unicast
            | Self::Ipv6Multicast
            | Self::Ipv6NlriMplsLabels
            | Self::Ipv6MplsLabeledVpn => AddressFamily::IPv6,
            Self::L2VpnBgpEvpn => AddressFamily::L2vpn,
            Self::BgpLs => AddressFamily::BgpLs,
        }
    }

    pub const fn subsequent_address_family(&self) -> SubsequentAddressFamily {
        match self {
            Self::Ipv4Unicast | Self::Ipv6Unicast => SubsequentAddressFamily::Unicast,
            Self::Ipv4Multicast | Self::Ipv6Multicast => SubsequentAddressFamily::Multicast,
            Self::Ipv4NlriMplsLabels | Self::Ipv6NlriMplsLabels => {
                SubsequentAddressFamily::NlriMplsLabels
            }
            Self::Ipv4MplsLabeledVpn | Self::Ipv6MplsLabeledVpn => SubsequentAddressFamily::MplsVpn,
            Self::Ipv4RouteTargetConstraints => SubsequentAddressFamily::RouteTargetConstrains,
            Self::L2VpnBgpEvpn => SubsequentAddressFamily::BgpEvpn,
            Self::BgpLs => SubsequentAddressFamily::BgpLs,
        }
    }

    pub const fn from_afi_safi(
        afi: AddressFamily,
        safi: SubsequentAddressFamily,
    ) -> Result<Self, InvalidAddressType> {
        match (afi, safi) {
            (AddressFamily::IPv4, SubsequentAddressFamily::Unicast) => Ok(Self::Ipv4Unicast),
            (AddressFamily::IPv4, SubsequentAddressFamily::Multicast) => Ok(Self::Ipv4Multicast),
            (AddressFamily::IPv4, SubsequentAddressFamily::NlriMplsLabels) => {
                Ok(Self::Ipv4NlriMplsLabels)
            }
            (AddressFamily::IPv4, SubsequentAddressFamily::MplsVpn) => {
                Ok(Self::Ipv4MplsLabeledVpn)
            }
            (AddressFamily::IPv4, SubsequentAddressFamily::RouteTargetConstrains) => {
                Ok(Self::Ipv4RouteTargetConstraints)
            }
            (AddressFamily::IPv6, SubsequentAddressFamily::Unicast) => Ok(Self::Ipv6Unicast),
            (AddressFamily::IPv6, SubsequentAddressFamily::Multicast) => Ok(Self::Ipv6Multicast),
            (AddressFamily::IPv6, SubsequentAddressFamily::NlriMplsLabels) => {
                Ok(Self::Ipv6NlriMplsLabels)
            }
            (AddressFamily::IPv6, SubsequentAddressFamily::MplsVpn) => {
                Ok(Self::Ipv6MplsLabeledVpn)
            }
            (AddressFamily::L2vpn, SubsequentAddressFamily::BgpEvpn) => Ok(Self::L2VpnBgpEvpn),
            (AddressFamily::BgpLs, SubsequentAddressFamily::BgpLs) => Ok(Self::BgpLs),
            _ => Err(InvalidAddressType::new(afi, safi)),
        }
    }

    /// Every defined family tag, handy to populate family registries
    pub const fn all() -> &'static [AddressType] {
        &[
            Self::Ipv4Unicast,
            Self::Ipv4Multicast,
            Self::Ipv4NlriMplsLabels,
            Self::Ipv4MplsLabeledVpn,
            Self::Ipv4RouteTargetConstraints,
            Self::Ipv6Unicast,
            Self::Ipv6Multicast,
            Self::Ipv6NlriMplsLabels,
            Self::Ipv6MplsLabeledVpn,
            Self::L2VpnBgpEvpn,
            Self::BgpLs,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_afi_try_from() {
        assert_eq!(AddressFamily::try_from(1), Ok(AddressFamily::IPv4));
        assert_eq!(AddressFamily::try_from(25), Ok(AddressFamily::L2vpn));
        assert_eq!(
            AddressFamily::try_from(0xffff),
            Err(UndefinedAddressFamily(0xffff))
        );
        assert_eq!(u16::from(AddressFamily::BgpLs), 16388);
    }

    #[test]
    fn test_safi_try_from() {
        assert_eq!(
            SubsequentAddressFamily::try_from(128),
            Ok(SubsequentAddressFamily::MplsVpn)
        );
        assert_eq!(
            SubsequentAddressFamily::try_from(3),
            Err(UndefinedSubsequentAddressFamily(3))
        );
        assert_eq!(u8::from(SubsequentAddressFamily::RouteTargetConstrains), 132);
    }

    #[test]
    fn test_address_type_round_trips_afi_safi() {
        for address_type in AddressType::all() {
            assert_eq!(
                AddressType::from_afi_safi(
                    address_type.address_family(),
                    address_type.subsequent_address_family()
                ),
                Ok(*address_type)
            );
        }
    }

    #[test]
    fn test_invalid_address_type() {
        let invalid =
            AddressType::from_afi_safi(AddressFamily::IPv6, SubsequentAddressFamily::BgpLs);
        let err = invalid.unwrap_err();
        assert_eq!(err.address_family(), AddressFamily::IPv6);
        assert_eq!(
            err.subsequent_address_family(),
            SubsequentAddressFamily::BgpLs
        );
    }
}
