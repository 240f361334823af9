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

//! Deserializer library for BGP's wire protocol

pub mod capabilities;
pub mod nlri;
pub mod path_attribute;

use ipnet::{Ipv4Net, Ipv6Net};
use nom::{error::ErrorKind, number::complete::be_u8, IResult};
use pathwire_parse_utils::{ErrorKindSerdeDeref, ReadablePdu, ReadablePduWithTwoInputs, Span};
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Knobs that change how a path attribute block is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BgpParsingContext {
    revised_error_handling: bool,
}

impl BgpParsingContext {
    pub const fn new(revised_error_handling: bool) -> Self {
        Self {
            revised_error_handling,
        }
    }

    /// When set, malformed attributes that can be handled as
    /// treat-as-withdraw or attribute-discard
    /// [RFC7606](https://datatracker.ietf.org/doc/html/rfc7606) are recorded on
    /// the parsed block instead of failing it.
    pub const fn revised_error_handling(&self) -> bool {
        self.revised_error_handling
    }

    pub fn set_revised_error_handling(&mut self, value: bool) {
        self.revised_error_handling = value;
    }
}

impl Default for BgpParsingContext {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Ipv4PrefixParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidIpv4PrefixLen(u8),
}

/// Number of octets a prefix of `prefix_len` bits occupies on the wire
#[inline]
pub(crate) const fn prefix_octets(prefix_len: u8) -> usize {
    (prefix_len as usize).div_ceil(8)
}

impl<'a> ReadablePdu<'a, LocatedIpv4PrefixParsingError<'a>> for Ipv4Net {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedIpv4PrefixParsingError<'a>> {
        let input = buf;
        let (buf, prefix_len) = be_u8(buf)?;
        <Self as ReadablePduWithTwoInputs<u8, Span<'_>, LocatedIpv4PrefixParsingError<'_>>>::from_wire(
            buf, prefix_len, input,
        )
    }
}

impl<'a> ReadablePduWithTwoInputs<'a, u8, Span<'a>, LocatedIpv4PrefixParsingError<'a>> for Ipv4Net {
    /// The prefix length has been read somewhere else, as in labeled and VPN
    /// NLRI. `prefix_location` is reported on error.
    fn from_wire(
        buf: Span<'a>,
        prefix_len: u8,
        prefix_location: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedIpv4PrefixParsingError<'a>> {
        if prefix_len > 32 {
            return Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
                prefix_location,
                Ipv4PrefixParsingError::InvalidIpv4PrefixLen(prefix_len),
            )));
        }
        let (buf, prefix) = nom::bytes::complete::take(prefix_octets(prefix_len))(buf)?;
        let mut network = [0; 4];
        network[..prefix.len()].copy_from_slice(prefix.fragment());
        match Ipv4Net::new(Ipv4Addr::from(network), prefix_len) {
            Ok(net) => Ok((buf, net)),
            Err(_) => Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
                prefix_location,
                Ipv4PrefixParsingError::InvalidIpv4PrefixLen(prefix_len),
            ))),
        }
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Ipv6PrefixParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidIpv6PrefixLen(u8),
}

impl<'a> ReadablePdu<'a, LocatedIpv6PrefixParsingError<'a>> for Ipv6Net {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedIpv6PrefixParsingError<'a>> {
        let input = buf;
        let (buf, prefix_len) = be_u8(buf)?;
        <Self as ReadablePduWithTwoInputs<u8, Span<'_>, LocatedIpv6PrefixParsingError<'_>>>::from_wire(
            buf, prefix_len, input,
        )
    }
}

impl<'a> ReadablePduWithTwoInputs<'a, u8, Span<'a>, LocatedIpv6PrefixParsingError<'a>> for Ipv6Net {
    fn from_wire(
        buf: Span<'a>,
        prefix_len: u8,
        prefix_location: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedIpv6PrefixParsingError<'a>> {
        if prefix_len > 128 {
            return Err(nom::Err::Error(LocatedIpv6PrefixParsingError::new(
                prefix_location,
                Ipv6PrefixParsingError::InvalidIpv6PrefixLen(prefix_len),
            )));
        }
        let (buf, prefix) = nom::bytes::complete::take(prefix_octets(prefix_len))(buf)?;
        let mut network = [0; 16];
        network[..prefix.len()].copy_from_slice(prefix.fragment());
        match Ipv6Net::new(Ipv6Addr::from(network), prefix_len) {
            Ok(net) => Ok((buf, net)),
            Err(_) => Err(nom::Err::Error(LocatedIpv6PrefixParsingError::new(
                prefix_location,
                Ipv6PrefixParsingError::InvalidIpv6PrefixLen(prefix_len),
            ))),
        }
    }
}
