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
    extensions::PcepExtensions,
    iana::{
        EroSubobjectType, SrNaiType, UndefinedSrNaiType, UndefinedXroAttribute, XroAttribute,
        XroSubobjectType,
    },
    subobjects::{
        EroSubobject, EroSubobjectValue, Nai, SrEroSubobject, XroSubobject, XroSubobjectValue,
    },
    wire::{
        IPV4_PREFIX_SUBOBJECT_LENGTH, IPV6_PREFIX_SUBOBJECT_LENGTH, SRLG_SUBOBJECT_LENGTH,
        SR_ERO_C_MASK, SR_ERO_FLAGS_MASK, SR_ERO_F_MASK, SR_ERO_M_MASK, SR_ERO_NT_SHIFT,
        SR_ERO_S_MASK,
    },
};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use nom::{
    error::ErrorKind,
    number::complete::{be_u128, be_u16, be_u32, be_u8},
    IResult,
};
use pathwire_parse_utils::{envelope::parse_subobject_header, ErrorKindSerdeDeref, Span};
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum SubobjectParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// The subobject content length doesn't match what its type requires
    MalformedSubobject {
        code: u8,
        expected: usize,
        found: usize,
    },
    /// Declared length can't even hold the subobject header
    InvalidSubobjectLength(u8),
    InvalidPrefixLength(u8),
    /// Strict ERO hop or mandatory XRO entry nothing is registered for
    UnrecognizedMandatorySubobject(u8),
    UndefinedXroAttribute(#[from_external] UndefinedXroAttribute),
    UndefinedSrNaiType(#[from_external] UndefinedSrNaiType),
    /// Both the F and S flags are set, leaving nothing to identify the hop
    InvalidSrEroFlags(u16),
}

#[inline]
fn expect_length<'a>(
    buf: Span<'a>,
    code: u8,
    expected: usize,
) -> Result<(), nom::Err<LocatedSubobjectParsingError<'a>>> {
    if buf.len() == expected {
        return Ok(());
    }
    Err(nom::Err::Error(LocatedSubobjectParsingError::new(
        buf,
        SubobjectParsingError::MalformedSubobject {
            code,
            expected,
            found: buf.len(),
        },
    )))
}

fn parse_ipv4_prefix(buf: Span<'_>) -> IResult<Span<'_>, IpNet, LocatedSubobjectParsingError<'_>> {
    let (buf, address) = be_u32(buf)?;
    let prefix_location = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    match Ipv4Net::new(Ipv4Addr::from(address), prefix_len) {
        Ok(net) => Ok((buf, IpNet::V4(net))),
        Err(_) => Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            prefix_location,
            SubobjectParsingError::InvalidPrefixLength(prefix_len),
        ))),
    }
}

fn parse_ipv6_prefix(buf: Span<'_>) -> IResult<Span<'_>, IpNet, LocatedSubobjectParsingError<'_>> {
    let (buf, address) = be_u128(buf)?;
    let prefix_location = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    match Ipv6Net::new(Ipv6Addr::from(address), prefix_len) {
        Ok(net) => Ok((buf, IpNet::V6(net))),
        Err(_) => Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            prefix_location,
            SubobjectParsingError::InvalidPrefixLength(prefix_len),
        ))),
    }
}

/// ERO subobject parsers bound in [PcepExtensions]. They get the subobject
/// content without its two header octets, and the L bit.
pub fn parse_ero_ipv4_prefix(
    buf: Span<'_>,
    loose: bool,
) -> IResult<Span<'_>, EroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        EroSubobjectType::Ipv4Prefix.into(),
        IPV4_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, prefix) = parse_ipv4_prefix(buf)?;
    let (buf, _reserved) = be_u8(buf)?;
    Ok((
        buf,
        EroSubobject::new(loose, EroSubobjectValue::IpPrefix(prefix)),
    ))
}

pub fn parse_ero_ipv6_prefix(
    buf: Span<'_>,
    loose: bool,
) -> IResult<Span<'_>, EroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        EroSubobjectType::Ipv6Prefix.into(),
        IPV6_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, prefix) = parse_ipv6_prefix(buf)?;
    let (buf, _reserved) = be_u8(buf)?;
    Ok((
        buf,
        EroSubobject::new(loose, EroSubobjectValue::IpPrefix(prefix)),
    ))
}

/// Size of the NAI field for each NAI type
pub(crate) const fn nai_length(nai_type: SrNaiType) -> usize {
    match nai_type {
        SrNaiType::Absent => 0,
        SrNaiType::Ipv4NodeId => 4,
        SrNaiType::Ipv6NodeId => 16,
        SrNaiType::Ipv4Adjacency => 8,
        SrNaiType::Ipv6Adjacency => 32,
        SrNaiType::UnnumberedAdjacency => 16,
    }
}

fn parse_nai(
    buf: Span<'_>,
    nai_type: SrNaiType,
) -> IResult<Span<'_>, Option<Nai>, LocatedSubobjectParsingError<'_>> {
    match nai_type {
        SrNaiType::Absent => Ok((buf, None)),
        SrNaiType::Ipv4NodeId => {
            let (buf, node) = be_u32(buf)?;
            Ok((buf, Some(Nai::Ipv4Node(Ipv4Addr::from(node)))))
        }
        SrNaiType::Ipv6NodeId => {
            let (buf, node) = be_u128(buf)?;
            Ok((buf, Some(Nai::Ipv6Node(Ipv6Addr::from(node)))))
        }
        SrNaiType::Ipv4Adjacency => {
            let (buf, local) = be_u32(buf)?;
            let (buf, remote) = be_u32(buf)?;
            Ok((
                buf,
                Some(Nai::Ipv4Adjacency {
                    local: Ipv4Addr::from(local),
                    remote: Ipv4Addr::from(remote),
                }),
            ))
        }
        SrNaiType::Ipv6Adjacency => {
            let (buf, local) = be_u128(buf)?;
            let (buf, remote) = be_u128(buf)?;
            Ok((
                buf,
                Some(Nai::Ipv6Adjacency {
                    local: Ipv6Addr::from(local),
                    remote: Ipv6Addr::from(remote),
                }),
            ))
        }
        SrNaiType::UnnumberedAdjacency => {
            let (buf, local_node) = be_u32(buf)?;
            let (buf, local_interface) = be_u32(buf)?;
            let (buf, remote_node) = be_u32(buf)?;
            let (buf, remote_interface) = be_u32(buf)?;
            Ok((
                buf,
                Some(Nai::Unnumbered {
                    local_node,
                    local_interface,
                    remote_node,
                    remote_interface,
                }),
            ))
        }
    }
}

pub fn parse_sr_ero(
    buf: Span<'_>,
    loose: bool,
) -> IResult<Span<'_>, EroSubobject, LocatedSubobjectParsingError<'_>> {
    let input = buf;
    let (buf, nt_flags) = be_u16(buf)?;
    let nai_type = match SrNaiType::try_from((nt_flags >> SR_ERO_NT_SHIFT) as u8) {
        Ok(nai_type) => nai_type,
        Err(err) => {
            return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
                input,
                SubobjectParsingError::UndefinedSrNaiType(err),
            )))
        }
    };
    let no_nai = nt_flags & SR_ERO_F_MASK == SR_ERO_F_MASK;
    let no_sid = nt_flags & SR_ERO_S_MASK == SR_ERO_S_MASK;
    if no_nai && no_sid {
        return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            input,
            SubobjectParsingError::InvalidSrEroFlags(nt_flags & SR_ERO_FLAGS_MASK),
        )));
    }
    let expected = 2
        + if no_sid { 0 } else { 4 }
        + if no_nai { 0 } else { nai_length(nai_type) };
    expect_length(input, EroSubobjectType::SrEro.into(), expected)?;

    let (buf, sid) = if no_sid {
        (buf, None)
    } else {
        let (buf, sid) = be_u32(buf)?;
        (buf, Some(sid))
    };
    let (buf, nai) = if no_nai {
        (buf, None)
    } else {
        parse_nai(buf, nai_type)?
    };
    Ok((
        buf,
        EroSubobject::new(
            loose,
            EroSubobjectValue::SrEro(SrEroSubobject::new(
                nai_type,
                nt_flags & SR_ERO_C_MASK == SR_ERO_C_MASK,
                nt_flags & SR_ERO_M_MASK == SR_ERO_M_MASK,
                sid,
                nai,
            )),
        ),
    ))
}

/// XRO subobject parsers bound in [PcepExtensions]. They get the subobject
/// content without its two header octets, and the L bit.
pub fn parse_xro_ipv4_prefix(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        XroSubobjectType::Ipv4Prefix.into(),
        IPV4_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, prefix) = parse_ipv4_prefix(buf)?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(mandatory, attribute, XroSubobjectValue::IpPrefix(prefix)),
    ))
}

pub fn parse_xro_ipv6_prefix(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        XroSubobjectType::Ipv6Prefix.into(),
        IPV6_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, prefix) = parse_ipv6_prefix(buf)?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(mandatory, attribute, XroSubobjectValue::IpPrefix(prefix)),
    ))
}

/// SRLG entry as PCEP carries it: the 32-bit id followed directly by the
/// attribute octet.
pub fn parse_xro_srlg(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        XroSubobjectType::Srlg.into(),
        SRLG_SUBOBJECT_LENGTH,
    )?;
    let (buf, srlg) = be_u32(buf)?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(mandatory, attribute, XroSubobjectValue::Srlg(srlg)),
    ))
}

struct RawSubobject<'a> {
    location: Span<'a>,
    flag: bool,
    code: u8,
    body: Span<'a>,
}

fn parse_raw_subobject(
    buf: Span<'_>,
) -> IResult<Span<'_>, RawSubobject<'_>, LocatedSubobjectParsingError<'_>> {
    let location = buf;
    let (buf, header) = parse_subobject_header(buf)?;
    let Some(body_length) = header.body_length() else {
        return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            location,
            SubobjectParsingError::InvalidSubobjectLength(header.length),
        )));
    };
    let (buf, body) = nom::bytes::complete::take(body_length)(buf)?;
    Ok((
        buf,
        RawSubobject {
            location,
            flag: header.flag,
            code: header.code,
            body,
        },
    ))
}

/// Parse ERO subobjects till `buf` is empty. Unknown loose hops are skipped,
/// unknown strict hops fail the parse.
pub fn parse_ero_subobjects<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, Vec<EroSubobject>, LocatedSubobjectParsingError<'a>> {
    let mut buf = buf;
    let mut subobjects = vec![];
    while !buf.is_empty() {
        let (t, raw) = parse_raw_subobject(buf)?;
        buf = t;
        let Some(parser) = extensions.ero_subobjects().parser(&raw.code) else {
            if !raw.flag {
                return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
                    raw.location,
                    SubobjectParsingError::UnrecognizedMandatorySubobject(raw.code),
                )));
            }
            log::debug!("Skipping unrecognized loose ERO subobject {}", raw.code);
            continue;
        };
        let (_, subobject) = parser(raw.body, raw.flag)?;
        subobjects.push(subobject);
    }
    Ok((buf, subobjects))
}

/// Parse XRO subobjects till `buf` is empty. Unknown entries are skipped
/// unless they are mandatory.
pub fn parse_xro_subobjects<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, Vec<XroSubobject>, LocatedSubobjectParsingError<'a>> {
    let mut buf = buf;
    let mut subobjects = vec![];
    while !buf.is_empty() {
        let (t, raw) = parse_raw_subobject(buf)?;
        buf = t;
        let Some(parser) = extensions.xro_subobjects().parser(&raw.code) else {
            if raw.flag {
                return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
                    raw.location,
                    SubobjectParsingError::UnrecognizedMandatorySubobject(raw.code),
                )));
            }
            log::debug!("Skipping unrecognized XRO subobject {}", raw.code);
            continue;
        };
        let (_, subobject) = parser(raw.body, raw.flag)?;
        subobjects.push(subobject);
    }
    Ok((buf, subobjects))
}
