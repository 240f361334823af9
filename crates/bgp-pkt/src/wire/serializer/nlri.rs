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

use crate::{
    nlri::{
        Ipv4MplsVpnUnicastAddress, Ipv6MplsVpnUnicastAddress, LabeledIpv4Prefix,
        LabeledIpv6Prefix, MplsLabel, NextHop, Nlri, NlriKind, RouteDistinguisher,
        RouteTargetMembership,
    },
    wire::{
        deserializer::prefix_octets,
        serializer::{write_prefix_octets, Ipv4PrefixWritingError, Ipv6PrefixWritingError},
        MPLS_LABEL_LEN, MPLS_LABEL_LEN_BITS, RD_LEN,
    },
};
use byteorder::{NetworkEndian, WriteBytesExt};
use pathwire_parse_utils::WritablePdu;
use pathwire_serde_macros::WritingError;
use std::io::Write;

const ORIGIN_AS_BITS: u8 = 32;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum RouteDistinguisherWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<RouteDistinguisherWritingError> for RouteDistinguisher {
    const BASE_LENGTH: usize = RD_LEN as usize;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), RouteDistinguisherWritingError> {
        writer.write_u16::<NetworkEndian>(self.get_type().into())?;
        match self {
            RouteDistinguisher::As2Administrator { asn2, number } => {
                writer.write_u16::<NetworkEndian>(*asn2)?;
                writer.write_u32::<NetworkEndian>(*number)?;
            }
            RouteDistinguisher::Ipv4Administrator { ip, number } => {
                writer.write_all(&ip.octets())?;
                writer.write_u16::<NetworkEndian>(*number)?;
            }
            RouteDistinguisher::As4Administrator { asn4, number } => {
                writer.write_u32::<NetworkEndian>(*asn4)?;
                writer.write_u16::<NetworkEndian>(*number)?;
            }
            RouteDistinguisher::LeafAdRoutes => {
                writer.write_u16::<NetworkEndian>(u16::MAX)?;
                writer.write_u32::<NetworkEndian>(u32::MAX)?;
            }
        }
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum MplsLabelWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<MplsLabelWritingError> for MplsLabel {
    const BASE_LENGTH: usize = MPLS_LABEL_LEN as usize;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), MplsLabelWritingError> {
        writer.write_all(self.raw())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum NlriWritingError {
    StdIOError(#[from_std_io_error] String),
    Ipv4PrefixError(#[from] Ipv4PrefixWritingError),
    Ipv6PrefixError(#[from] Ipv6PrefixWritingError),
    MplsLabelError(#[from] MplsLabelWritingError),
    RouteDistinguisherError(#[from] RouteDistinguisherWritingError),
    /// The encoded length in bits doesn't fit the one octet length field
    InvalidBitLength(usize),
    /// The serializer was handed an NLRI of another family
    UnexpectedNlri(NlriKind),
}

/// Total bits announced in the length octet of a labeled NLRI
fn labeled_bit_length(
    label_stack: &[MplsLabel],
    extra_bits: u8,
    prefix_len: u8,
) -> Result<u8, NlriWritingError> {
    let bits = label_stack.len() * MPLS_LABEL_LEN_BITS as usize
        + extra_bits as usize
        + prefix_len as usize;
    u8::try_from(bits).map_err(|_| NlriWritingError::InvalidBitLength(bits))
}

fn write_label_stack<T: Write + ?Sized>(
    writer: &mut T,
    label_stack: &[MplsLabel],
) -> Result<(), NlriWritingError> {
    for label in label_stack {
        label.write(writer)?;
    }
    Ok(())
}

impl WritablePdu<NlriWritingError> for LabeledIpv4Prefix {
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
            + self.label_stack().len() * MPLS_LABEL_LEN as usize
            + prefix_octets(self.network().prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NlriWritingError> {
        let network = self.network();
        writer.write_u8(labeled_bit_length(self.label_stack(), 0, network.prefix_len())?)?;
        write_label_stack(writer, self.label_stack())?;
        write_prefix_octets(writer, &network.addr().octets(), network.prefix_len())?;
        Ok(())
    }
}

impl WritablePdu<NlriWritingError> for LabeledIpv6Prefix {
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
            + self.label_stack().len() * MPLS_LABEL_LEN as usize
            + prefix_octets(self.network().prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NlriWritingError> {
        let network = self.network();
        writer.write_u8(labeled_bit_length(self.label_stack(), 0, network.prefix_len())?)?;
        write_label_stack(writer, self.label_stack())?;
        write_prefix_octets(writer, &network.addr().octets(), network.prefix_len())?;
        Ok(())
    }
}

impl WritablePdu<NlriWritingError> for Ipv4MplsVpnUnicastAddress {
    const BASE_LENGTH: usize = 1 + RD_LEN as usize;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
            + self.label_stack().len() * MPLS_LABEL_LEN as usize
            + prefix_octets(self.network().prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NlriWritingError> {
        let network = self.network();
        writer.write_u8(labeled_bit_length(
            self.label_stack(),
            RD_LEN * 8,
            network.prefix_len(),
        )?)?;
        write_label_stack(writer, self.label_stack())?;
        self.rd().write(writer)?;
        write_prefix_octets(writer, &network.addr().octets(), network.prefix_len())?;
        Ok(())
    }
}

impl WritablePdu<NlriWritingError> for Ipv6MplsVpnUnicastAddress {
    const BASE_LENGTH: usize = 1 + RD_LEN as usize;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
            + self.label_stack().len() * MPLS_LABEL_LEN as usize
            + prefix_octets(self.network().prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NlriWritingError> {
        let network = self.network();
        writer.write_u8(labeled_bit_length(
            self.label_stack(),
            RD_LEN * 8,
            network.prefix_len(),
        )?)?;
        write_label_stack(writer, self.label_stack())?;
        self.rd().write(writer)?;
        write_prefix_octets(writer, &network.addr().octets(), network.prefix_len())?;
        Ok(())
    }
}

impl WritablePdu<NlriWritingError> for RouteTargetMembership {
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        match self {
            Self::Default => Self::BASE_LENGTH,
            Self::Constrained { route_target, .. } => Self::BASE_LENGTH + 4 + route_target.len(),
        }
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NlriWritingError> {
        match self {
            Self::Default => writer.write_u8(0)?,
            Self::Constrained {
                prefix_len,
                origin_as,
                route_target,
            } => {
                let expected = prefix_len
                    .checked_sub(ORIGIN_AS_BITS)
                    .map(prefix_octets);
                if expected != Some(route_target.len()) {
                    return Err(NlriWritingError::InvalidBitLength(*prefix_len as usize));
                }
                writer.write_u8(*prefix_len)?;
                writer.write_u32::<NetworkEndian>(*origin_as)?;
                writer.write_all(route_target)?;
            }
        }
        Ok(())
    }
}

/// Serializers bound to NLRI kinds in [crate::BgpExtensions]
pub fn write_ipv4_unicast(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv4Unicast(network) => Ok(network.write(writer)?),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_ipv6_unicast(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv6Unicast(network) => Ok(network.write(writer)?),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_ipv4_labeled(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv4Labeled(prefix) => prefix.write(writer),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_ipv6_labeled(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv6Labeled(prefix) => prefix.write(writer),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_ipv4_mpls_vpn(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv4MplsVpn(address) => address.write(writer),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_ipv6_mpls_vpn(nlri: &Nlri, writer: &mut dyn Write) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::Ipv6MplsVpn(address) => address.write(writer),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

pub fn write_route_target_membership(
    nlri: &Nlri,
    writer: &mut dyn Write,
) -> Result<(), NlriWritingError> {
    match nlri {
        Nlri::RouteTargetMembership(membership) => membership.write(writer),
        other => Err(NlriWritingError::UnexpectedNlri(other.kind())),
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum NextHopWritingError {
    StdIOError(#[from_std_io_error] String),
    RouteDistinguisherError(#[from] RouteDistinguisherWritingError),
}

impl WritablePdu<NextHopWritingError> for NextHop {
    const BASE_LENGTH: usize = 0;

    /// Length of the address only, without the length octet that precedes it
    /// in MP_REACH_NLRI
    fn len(&self) -> usize {
        let rd_len = RD_LEN as usize;
        match self {
            Self::Ipv4(_) => 4,
            Self::Ipv6 { link_local, .. } => 16 + link_local.map_or(0, |_| 16),
            Self::VpnIpv4 { .. } => rd_len + 4,
            Self::VpnIpv6 { link_local, .. } => {
                rd_len + 16 + link_local.map_or(0, |_| rd_len + 16)
            }
        }
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), NextHopWritingError> {
        match self {
            Self::Ipv4(ip) => writer.write_all(&ip.octets())?,
            Self::Ipv6 { global, link_local } => {
                writer.write_all(&global.octets())?;
                if let Some(link_local) = link_local {
                    writer.write_all(&link_local.octets())?;
                }
            }
            Self::VpnIpv4 { rd, ip } => {
                rd.write(writer)?;
                writer.write_all(&ip.octets())?;
            }
            Self::VpnIpv6 {
                rd,
                global,
                link_local,
            } => {
                rd.write(writer)?;
                writer.write_all(&global.octets())?;
                if let Some((link_local_rd, link_local)) = link_local {
                    link_local_rd.write(writer)?;
                    writer.write_all(&link_local.octets())?;
                }
            }
        }
        Ok(())
    }
}
