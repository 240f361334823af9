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
    extensions::RsvpExtensions,
    iana::{UndefinedXroAttribute, XroAttribute, XroSubobjectType},
    subobjects::{XroSubobject, XroSubobjectValue},
    wire::{IPV4_PREFIX_SUBOBJECT_LENGTH, IPV6_PREFIX_SUBOBJECT_LENGTH, SRLG_SUBOBJECT_LENGTH},
};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use nom::{
    error::ErrorKind,
    number::complete::{be_u128, be_u32, be_u8},
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
    MalformedSubobject {
        code: u8,
        expected: usize,
        found: usize,
    },
    InvalidSubobjectLength(u8),
    InvalidPrefixLength(u8),
    UnrecognizedMandatorySubobject(u8),
    UndefinedXroAttribute(#[from_external] UndefinedXroAttribute),
}

fn expect_length(
    buf: Span<'_>,
    code: XroSubobjectType,
    expected: usize,
) -> Result<(), nom::Err<LocatedSubobjectParsingError<'_>>> {
    if buf.len() == expected {
        return Ok(());
    }
    Err(nom::Err::Error(LocatedSubobjectParsingError::new(
        buf,
        SubobjectParsingError::MalformedSubobject {
            code: code.into(),
            expected,
            found: buf.len(),
        },
    )))
}

fn invalid_prefix(
    location: Span<'_>,
    prefix_len: u8,
) -> nom::Err<LocatedSubobjectParsingError<'_>> {
    nom::Err::Error(LocatedSubobjectParsingError::new(
        location,
        SubobjectParsingError::InvalidPrefixLength(prefix_len),
    ))
}

/// Subobject parsers bound in [RsvpExtensions], given the content after the
/// two header octets and the L bit.
pub fn parse_xro_ipv4_prefix(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        XroSubobjectType::Ipv4Prefix,
        IPV4_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, address) = be_u32(buf)?;
    let prefix_location = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    let prefix = Ipv4Net::new(Ipv4Addr::from(address), prefix_len)
        .map_err(|_| invalid_prefix(prefix_location, prefix_len))?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(
            mandatory,
            attribute,
            XroSubobjectValue::IpPrefix(IpNet::V4(prefix)),
        ),
    ))
}

pub fn parse_xro_ipv6_prefix(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(
        buf,
        XroSubobjectType::Ipv6Prefix,
        IPV6_PREFIX_SUBOBJECT_LENGTH,
    )?;
    let (buf, address) = be_u128(buf)?;
    let prefix_location = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    let prefix = Ipv6Net::new(Ipv6Addr::from(address), prefix_len)
        .map_err(|_| invalid_prefix(prefix_location, prefix_len))?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(
            mandatory,
            attribute,
            XroSubobjectValue::IpPrefix(IpNet::V6(prefix)),
        ),
    ))
}

/// SRLG entry [RFC4874](https://datatracker.ietf.org/doc/html/rfc4874#section-3.1.1):
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |L|    Type     |     Length    |          SRLG Id (4 bytes)    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      SRLG Id (continued)      |    Reserved   |   Attribute   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_xro_srlg(
    buf: Span<'_>,
    mandatory: bool,
) -> IResult<Span<'_>, XroSubobject, LocatedSubobjectParsingError<'_>> {
    expect_length(buf, XroSubobjectType::Srlg, SRLG_SUBOBJECT_LENGTH)?;
    let (buf, srlg) = be_u32(buf)?;
    let (buf, _reserved) = be_u8(buf)?;
    let (buf, attribute) = nom::combinator::map_res(be_u8, XroAttribute::try_from)(buf)?;
    Ok((
        buf,
        XroSubobject::new(mandatory, attribute, XroSubobjectValue::Srlg(srlg)),
    ))
}

/// Parse a single subobject, header included. `Ok(None)` stands for an
/// unknown subobject that was skipped.
pub fn parse_xro_subobject<'a>(
    buf: Span<'a>,
    extensions: &RsvpExtensions,
) -> IResult<Span<'a>, Option<XroSubobject>, LocatedSubobjectParsingError<'a>> {
    let input = buf;
    let (buf, header) = parse_subobject_header(buf)?;
    let Some(body_length) = header.body_length() else {
        return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            input,
            SubobjectParsingError::InvalidSubobjectLength(header.length),
        )));
    };
    let (buf, body) = nom::bytes::complete::take(body_length)(buf)?;
    let Some(parser) = extensions.xro_subobjects().parser(&header.code) else {
        if header.flag {
            return Err(nom::Err::Error(LocatedSubobjectParsingError::new(
                input,
                SubobjectParsingError::UnrecognizedMandatorySubobject(header.code),
            )));
        }
        log::debug!(
            "Skipping unrecognized RSVP XRO subobject {} of {} bytes",
            header.code,
            header.length
        );
        return Ok((buf, None));
    };
    let (_, subobject) = parser(body, header.flag)?;
    Ok((buf, Some(subobject)))
}

/// Parse subobjects till `buf` is empty
pub fn parse_xro_subobjects<'a>(
    buf: Span<'a>,
    extensions: &RsvpExtensions,
) -> IResult<Span<'a>, Vec<XroSubobject>, LocatedSubobjectParsingError<'a>> {
    let mut buf = buf;
    let mut subobjects = vec![];
    while !buf.is_empty() {
        let (t, subobject) = parse_xro_subobject(buf, extensions)?;
        subobjects.extend(subobject);
        buf = t;
    }
    Ok((buf, subobjects))
}
