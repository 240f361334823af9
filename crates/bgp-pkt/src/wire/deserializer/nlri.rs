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
    iana::{RouteDistinguisherTypeCode, UndefinedRouteDistinguisherTypeCode},
    nlri::{
        Ipv4MplsVpnUnicastAddress, Ipv6MplsVpnUnicastAddress, LabeledIpv4Prefix,
        LabeledIpv6Prefix, MplsLabel, NextHop, Nlri, RouteDistinguisher, RouteTargetMembership,
    },
    wire::{
        deserializer::{prefix_octets, Ipv4PrefixParsingError, Ipv6PrefixParsingError},
        IPV4_LEN, IPV6_LEN, IPV6_WITH_LINK_LOCAL_LEN, MPLS_LABEL_LEN_BITS, RD_LEN,
        VPN_IPV4_NEXT_HOP_LEN, VPN_IPV6_NEXT_HOP_LEN, VPN_IPV6_WITH_LINK_LOCAL_NEXT_HOP_LEN,
    },
};
use ipnet::{Ipv4Net, Ipv6Net};
use nom::{
    error::ErrorKind,
    number::complete::{be_u128, be_u16, be_u32, be_u8},
    IResult,
};
use pathwire_parse_utils::{
    parse_into_located, parse_into_located_two_inputs, ErrorKindSerdeDeref, ReadablePdu,
    ReadablePduWithOneInput, Span,
};
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Origin AS (4 octets) plus the route target (8 octets)
const ROUTE_TARGET_MEMBERSHIP_MAX_BITS: u8 = 96;
const ORIGIN_AS_BITS: u8 = 32;

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum MplsLabelParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
}

impl<'a> ReadablePdu<'a, LocatedMplsLabelParsingError<'a>> for MplsLabel {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedMplsLabelParsingError<'a>> {
        let (buf, p1) = be_u8(buf)?;
        let (buf, p2) = be_u8(buf)?;
        let (buf, p3) = be_u8(buf)?;
        Ok((buf, MplsLabel::new([p1, p2, p3])))
    }
}

/// Read labels till the bottom of the stack, a withdrawal compatibility label
/// also ends the stack.
fn parse_label_stack<'a, E>(buf: Span<'a>) -> IResult<Span<'a>, Vec<MplsLabel>, E>
where
    E: From<LocatedMplsLabelParsingError<'a>>,
{
    let mut buf = buf;
    let mut label_stack = vec![];
    loop {
        let (t, label): (Span<'_>, MplsLabel) = parse_into_located(buf)?;
        buf = t;
        let last = label.is_bottom() || label.is_unreach_compatibility();
        label_stack.push(label);
        if last {
            return Ok((buf, label_stack));
        }
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum RouteDistinguisherParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    UndefinedRouteDistinguisherTypeCode(#[from_external] UndefinedRouteDistinguisherTypeCode),
    /// LeafAdRoutes is expected to be all `1`
    InvalidLeafAdRoutes(u16, u32),
}

impl<'a> ReadablePdu<'a, LocatedRouteDistinguisherParsingError<'a>> for RouteDistinguisher {
    fn from_wire(
        buf: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedRouteDistinguisherParsingError<'a>> {
        let (buf, rd_type) =
            nom::combinator::map_res(be_u16, RouteDistinguisherTypeCode::try_from)(buf)?;
        match rd_type {
            RouteDistinguisherTypeCode::As2Administrator => {
                let (buf, asn2) = be_u16(buf)?;
                let (buf, number) = be_u32(buf)?;
                Ok((buf, RouteDistinguisher::As2Administrator { asn2, number }))
            }
            RouteDistinguisherTypeCode::Ipv4Administrator => {
                let (buf, ip) = be_u32(buf)?;
                let (buf, number) = be_u16(buf)?;
                Ok((
                    buf,
                    RouteDistinguisher::Ipv4Administrator {
                        ip: Ipv4Addr::from(ip),
                        number,
                    },
                ))
            }
            RouteDistinguisherTypeCode::As4Administrator => {
                let (buf, asn4) = be_u32(buf)?;
                let (buf, number) = be_u16(buf)?;
                Ok((buf, RouteDistinguisher::As4Administrator { asn4, number }))
            }
            RouteDistinguisherTypeCode::LeafAdRoutes => {
                let input = buf;
                let (buf, num1) = be_u16(buf)?;
                let (buf, num2) = be_u32(buf)?;
                if num1 != u16::MAX || num2 != u32::MAX {
                    Err(nom::Err::Error(LocatedRouteDistinguisherParsingError::new(
                        input,
                        RouteDistinguisherParsingError::InvalidLeafAdRoutes(num1, num2),
                    )))
                } else {
                    Ok((buf, RouteDistinguisher::LeafAdRoutes))
                }
            }
        }
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum LabeledPrefixParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// The length doesn't even cover the label stack
    InvalidPrefixLength(u8),
    MplsLabelError(#[from_located(module = "self")] MplsLabelParsingError),
    Ipv4PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv4PrefixParsingError),
    Ipv6PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv6PrefixParsingError),
}

/// Parse the length and label stack common to labeled and VPN NLRI, returning
/// the remaining prefix bits once `extra_bits` are also accounted for.
fn parse_labeled_header<'a, E>(
    buf: Span<'a>,
    extra_bits: u8,
    invalid: fn(Span<'a>, u8) -> E,
) -> IResult<Span<'a>, (Vec<MplsLabel>, u8), E>
where
    E: From<LocatedMplsLabelParsingError<'a>> + nom::error::ParseError<Span<'a>>,
{
    let input = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    let (buf, label_stack) = parse_label_stack(buf)?;
    let read_bits = u8::try_from(label_stack.len())
        .ok()
        .and_then(|labels| labels.checked_mul(MPLS_LABEL_LEN_BITS))
        .and_then(|bits| bits.checked_add(extra_bits));
    match read_bits.and_then(|bits| prefix_len.checked_sub(bits)) {
        Some(remainder) => Ok((buf, (label_stack, remainder))),
        None => Err(nom::Err::Error(invalid(input, prefix_len))),
    }
}

impl<'a> ReadablePdu<'a, LocatedLabeledPrefixParsingError<'a>> for LabeledIpv4Prefix {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedLabeledPrefixParsingError<'a>> {
        let input = buf;
        let (buf, (label_stack, prefix_len)) = parse_labeled_header(buf, 0, |span, len| {
            LocatedLabeledPrefixParsingError::new(
                span,
                LabeledPrefixParsingError::InvalidPrefixLength(len),
            )
        })?;
        let (buf, network) = parse_into_located_two_inputs(buf, prefix_len, input)?;
        Ok((buf, LabeledIpv4Prefix::new(label_stack, network)))
    }
}

impl<'a> ReadablePdu<'a, LocatedLabeledPrefixParsingError<'a>> for LabeledIpv6Prefix {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedLabeledPrefixParsingError<'a>> {
        let input = buf;
        let (buf, (label_stack, prefix_len)) = parse_labeled_header(buf, 0, |span, len| {
            LocatedLabeledPrefixParsingError::new(
                span,
                LabeledPrefixParsingError::InvalidPrefixLength(len),
            )
        })?;
        let (buf, network) = parse_into_located_two_inputs(buf, prefix_len, input)?;
        Ok((buf, LabeledIpv6Prefix::new(label_stack, network)))
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum MplsVpnParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// The length doesn't cover the label stack and the route distinguisher
    InvalidPrefixLength(u8),
    MplsLabelError(#[from_located(module = "self")] MplsLabelParsingError),
    RouteDistinguisherError(#[from_located(module = "self")] RouteDistinguisherParsingError),
    Ipv4PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv4PrefixParsingError),
    Ipv6PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv6PrefixParsingError),
}

fn invalid_vpn_prefix(span: Span<'_>, len: u8) -> LocatedMplsVpnParsingError<'_> {
    LocatedMplsVpnParsingError::new(span, MplsVpnParsingError::InvalidPrefixLength(len))
}

impl<'a> ReadablePdu<'a, LocatedMplsVpnParsingError<'a>> for Ipv4MplsVpnUnicastAddress {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedMplsVpnParsingError<'a>> {
        let input = buf;
        let (buf, (label_stack, prefix_len)) =
            parse_labeled_header(buf, RD_LEN * 8, invalid_vpn_prefix)?;
        let (buf, rd) = parse_into_located(buf)?;
        let (buf, network) = parse_into_located_two_inputs(buf, prefix_len, input)?;
        Ok((buf, Ipv4MplsVpnUnicastAddress::new(rd, label_stack, network)))
    }
}

impl<'a> ReadablePdu<'a, LocatedMplsVpnParsingError<'a>> for Ipv6MplsVpnUnicastAddress {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedMplsVpnParsingError<'a>> {
        let input = buf;
        let (buf, (label_stack, prefix_len)) =
            parse_labeled_header(buf, RD_LEN * 8, invalid_vpn_prefix)?;
        let (buf, rd) = parse_into_located(buf)?;
        let (buf, network) = parse_into_located_two_inputs(buf, prefix_len, input)?;
        Ok((buf, Ipv6MplsVpnUnicastAddress::new(rd, label_stack, network)))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum RouteTargetMembershipParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// Non zero lengths must cover at least the origin AS and at most a full
    /// route target
    InvalidPrefixLength(u8),
}

impl<'a> ReadablePdu<'a, LocatedRouteTargetMembershipParsingError<'a>> for RouteTargetMembership {
    fn from_wire(
        buf: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedRouteTargetMembershipParsingError<'a>> {
        let input = buf;
        let (buf, prefix_len) = be_u8(buf)?;
        if prefix_len == 0 {
            return Ok((buf, RouteTargetMembership::Default));
        }
        if !(ORIGIN_AS_BITS..=ROUTE_TARGET_MEMBERSHIP_MAX_BITS).contains(&prefix_len) {
            return Err(nom::Err::Error(
                LocatedRouteTargetMembershipParsingError::new(
                    input,
                    RouteTargetMembershipParsingError::InvalidPrefixLength(prefix_len),
                ),
            ));
        }
        let (buf, origin_as) = be_u32(buf)?;
        let (buf, route_target) =
            nom::bytes::complete::take(prefix_octets(prefix_len - ORIGIN_AS_BITS))(buf)?;
        Ok((
            buf,
            RouteTargetMembership::Constrained {
                prefix_len,
                origin_as,
                route_target: route_target.fragment().to_vec(),
            },
        ))
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum NlriParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    Ipv4PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv4PrefixParsingError),
    Ipv6PrefixError(#[from_located(module = "crate::wire::deserializer")] Ipv6PrefixParsingError),
    LabeledPrefixError(#[from_located(module = "self")] LabeledPrefixParsingError),
    MplsVpnError(#[from_located(module = "self")] MplsVpnParsingError),
    RouteTargetMembershipError(
        #[from_located(module = "self")] RouteTargetMembershipParsingError,
    ),
}

/// Parsers bound to NLRI families in [crate::BgpExtensions], each reads
/// exactly one NLRI.
pub fn parse_ipv4_unicast(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, network): (_, Ipv4Net) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv4Unicast(network)))
}

pub fn parse_ipv6_unicast(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, network): (_, Ipv6Net) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv6Unicast(network)))
}

pub fn parse_ipv4_labeled(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, prefix) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv4Labeled(prefix)))
}

pub fn parse_ipv6_labeled(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, prefix) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv6Labeled(prefix)))
}

pub fn parse_ipv4_mpls_vpn(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, address) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv4MplsVpn(address)))
}

pub fn parse_ipv6_mpls_vpn(buf: Span<'_>) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, address) = parse_into_located(buf)?;
    Ok((buf, Nlri::Ipv6MplsVpn(address)))
}

pub fn parse_route_target_membership(
    buf: Span<'_>,
) -> IResult<Span<'_>, Nlri, LocatedNlriParsingError<'_>> {
    let (buf, membership) = parse_into_located(buf)?;
    Ok((buf, Nlri::RouteTargetMembership(membership)))
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum NextHopParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidNextHopLength(u8),
    RouteDistinguisherError(#[from_located(module = "self")] RouteDistinguisherParsingError),
}

impl<'a> ReadablePduWithOneInput<'a, u8, LocatedNextHopParsingError<'a>> for NextHop {
    /// `buf` holds exactly `next_hop_len` bytes, the variant is chosen by that
    /// length.
    fn from_wire(
        buf: Span<'a>,
        next_hop_len: u8,
    ) -> IResult<Span<'a>, Self, LocatedNextHopParsingError<'a>> {
        match next_hop_len {
            IPV4_LEN => {
                let (buf, ip) = be_u32(buf)?;
                Ok((buf, NextHop::Ipv4(Ipv4Addr::from(ip))))
            }
            IPV6_LEN => {
                let (buf, global) = be_u128(buf)?;
                Ok((
                    buf,
                    NextHop::Ipv6 {
                        global: Ipv6Addr::from(global),
                        link_local: None,
                    },
                ))
            }
            IPV6_WITH_LINK_LOCAL_LEN => {
                let (buf, global) = be_u128(buf)?;
                let (buf, link_local) = be_u128(buf)?;
                Ok((
                    buf,
                    NextHop::Ipv6 {
                        global: Ipv6Addr::from(global),
                        link_local: Some(Ipv6Addr::from(link_local)),
                    },
                ))
            }
            VPN_IPV4_NEXT_HOP_LEN => {
                let (buf, rd) = parse_into_located(buf)?;
                let (buf, ip) = be_u32(buf)?;
                Ok((
                    buf,
                    NextHop::VpnIpv4 {
                        rd,
                        ip: Ipv4Addr::from(ip),
                    },
                ))
            }
            VPN_IPV6_NEXT_HOP_LEN => {
                let (buf, rd) = parse_into_located(buf)?;
                let (buf, global) = be_u128(buf)?;
                Ok((
                    buf,
                    NextHop::VpnIpv6 {
                        rd,
                        global: Ipv6Addr::from(global),
                        link_local: None,
                    },
                ))
            }
            VPN_IPV6_WITH_LINK_LOCAL_NEXT_HOP_LEN => {
                let (buf, rd) = parse_into_located(buf)?;
                let (buf, global) = be_u128(buf)?;
                let (buf, link_local_rd) = parse_into_located(buf)?;
                let (buf, link_local) = be_u128(buf)?;
                Ok((
                    buf,
                    NextHop::VpnIpv6 {
                        rd,
                        global: Ipv6Addr::from(global),
                        link_local: Some((link_local_rd, Ipv6Addr::from(link_local))),
                    },
                ))
            }
            _ => Err(nom::Err::Error(LocatedNextHopParsingError::new(
                buf,
                NextHopParsingError::InvalidNextHopLength(next_hop_len),
            ))),
        }
    }
}
