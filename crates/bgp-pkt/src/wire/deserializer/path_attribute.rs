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
    extensions::BgpExtensions,
    iana::{Origin, PathAttributeType, UndefinedOrigin},
    nlri::NextHop,
    path_attribute::{
        AttributeError, AttributeErrorAction, MpReach, MpUnreach, PathAttribute,
        PathAttributeValue, PathAttributes, UnrecognizedAttribute,
    },
    wire::{
        deserializer::{
            nlri::{NextHopParsingError, NlriParsingError},
            BgpParsingContext,
        },
        EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK, OPTIONAL_PATH_ATTRIBUTE_MASK,
        PARTIAL_PATH_ATTRIBUTE_MASK, TRANSITIVE_PATH_ATTRIBUTE_MASK,
    },
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use pathwire_iana::address_family::AddressType;
use pathwire_parse_utils::{
    parse_into_located_one_input, ErrorKindSerdeDeref, LocatedParsingError,
    ReadablePduWithOneInput, ReadablePduWithTwoInputs, Span,
};
use pathwire_registry::FamilyCode;
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PathAttributeParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// The attribute length doesn't match what its type requires
    MalformedAttribute {
        code: u8,
        expected: u16,
        found: u16,
    },
    UndefinedOrigin(#[from_external] UndefinedOrigin),
    /// A mandatory attribute nothing is registered for
    WellKnownAttributeNotRecognized(u8),
    MpReachError(#[from_located(module = "self")] MpReachParsingError),
    MpUnreachError(#[from_located(module = "self")] MpUnreachParsingError),
}

impl PathAttributeParsingError {
    /// Error handling approach for the attribute [RFC7606](https://datatracker.ietf.org/doc/html/rfc7606#section-7)
    pub const fn error_action(&self) -> AttributeErrorAction {
        match self {
            Self::MalformedAttribute { code, .. } => {
                if *code == PathAttributeType::AtomicAggregate as u8 {
                    AttributeErrorAction::AttributeDiscard
                } else if *code == PathAttributeType::MpReachNlri as u8
                    || *code == PathAttributeType::MpUnreachNlri as u8
                {
                    AttributeErrorAction::SessionReset
                } else {
                    AttributeErrorAction::TreatAsWithdraw
                }
            }
            Self::NomError(_) | Self::UndefinedOrigin(_) => AttributeErrorAction::TreatAsWithdraw,
            Self::WellKnownAttributeNotRecognized(_)
            | Self::MpReachError(_)
            | Self::MpUnreachError(_) => AttributeErrorAction::SessionReset,
        }
    }

    /// The family that made MP_REACH_NLRI/MP_UNREACH_NLRI unparsable, if no
    /// family is registered for it
    pub const fn unsupported_family(&self) -> Option<FamilyCode> {
        match self {
            Self::MpReachError(MpReachParsingError::UnknownFamily(code))
            | Self::MpUnreachError(MpUnreachParsingError::UnknownFamily(code)) => Some(*code),
            _ => None,
        }
    }
}

#[inline]
fn expect_length<'a>(
    buf: Span<'a>,
    code: PathAttributeType,
    expected: usize,
) -> Result<(), nom::Err<LocatedPathAttributeParsingError<'a>>> {
    if buf.len() == expected {
        return Ok(());
    }
    Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
        buf,
        PathAttributeParsingError::MalformedAttribute {
            code: code as u8,
            expected: expected as u16,
            found: buf.len() as u16,
        },
    )))
}

/// Attribute parsers bound in [BgpExtensions]. Each one gets only the
/// attribute value, the header is handled by [PathAttributes].
pub fn parse_origin<'a>(
    buf: Span<'a>,
    _extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    expect_length(buf, PathAttributeType::Origin, 1)?;
    let (buf, origin) = nom::combinator::map_res(be_u8, Origin::try_from)(buf)?;
    Ok((buf, PathAttributeValue::Origin(origin)))
}

pub fn parse_next_hop<'a>(
    buf: Span<'a>,
    _extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    expect_length(buf, PathAttributeType::NextHop, 4)?;
    let (buf, ip) = be_u32(buf)?;
    Ok((buf, PathAttributeValue::NextHop(Ipv4Addr::from(ip))))
}

pub fn parse_multi_exit_discriminator<'a>(
    buf: Span<'a>,
    _extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    expect_length(buf, PathAttributeType::MultiExitDiscriminator, 4)?;
    let (buf, metric) = be_u32(buf)?;
    Ok((buf, PathAttributeValue::MultiExitDiscriminator(metric)))
}

pub fn parse_local_preference<'a>(
    buf: Span<'a>,
    _extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    expect_length(buf, PathAttributeType::LocalPreference, 4)?;
    let (buf, pref) = be_u32(buf)?;
    Ok((buf, PathAttributeValue::LocalPreference(pref)))
}

pub fn parse_atomic_aggregate<'a>(
    buf: Span<'a>,
    _extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    expect_length(buf, PathAttributeType::AtomicAggregate, 0)?;
    Ok((buf, PathAttributeValue::AtomicAggregate))
}

pub fn parse_mp_reach<'a>(
    buf: Span<'a>,
    extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    let (buf, value) = parse_into_located_one_input(buf, extensions)?;
    Ok((buf, PathAttributeValue::MpReach(value)))
}

pub fn parse_mp_unreach<'a>(
    buf: Span<'a>,
    extensions: &BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>> {
    let (buf, value) = parse_into_located_one_input(buf, extensions)?;
    Ok((buf, PathAttributeValue::MpUnreach(value)))
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum MpReachParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// No address family is registered for the AFI/SAFI
    UnknownFamily(FamilyCode),
    /// The family is known but nothing can parse its NLRI
    NoNlriCodec(AddressType),
    NextHopError(#[from_located(module = "crate::wire::deserializer::nlri")] NextHopParsingError),
    NlriError(#[from_located(module = "crate::wire::deserializer::nlri")] NlriParsingError),
}

/// Read AFI/SAFI and resolve them to a registered family
fn parse_family<'a, E>(
    buf: Span<'a>,
    extensions: &BgpExtensions,
    unknown: fn(Span<'a>, FamilyCode) -> E,
) -> IResult<Span<'a>, AddressType, E>
where
    E: nom::error::ParseError<Span<'a>>,
{
    let input = buf;
    let (buf, afi) = be_u16(buf)?;
    let (buf, safi) = be_u8(buf)?;
    let code = FamilyCode::new(afi, safi);
    match extensions.families().family_for_code(code) {
        Ok(address_type) => Ok((buf, address_type)),
        Err(_) => Err(nom::Err::Error(unknown(input, code))),
    }
}

impl<'a> ReadablePduWithOneInput<'a, &BgpExtensions, LocatedMpReachParsingError<'a>> for MpReach {
    fn from_wire(
        buf: Span<'a>,
        extensions: &BgpExtensions,
    ) -> IResult<Span<'a>, Self, LocatedMpReachParsingError<'a>> {
        let family_location = buf;
        let (buf, address_type) = parse_family(buf, extensions, |span, code| {
            LocatedMpReachParsingError::new(span, MpReachParsingError::UnknownFamily(code))
        })?;
        let Some(parser) = extensions.nlri().parser(&address_type) else {
            return Err(nom::Err::Error(LocatedMpReachParsingError::new(
                family_location,
                MpReachParsingError::NoNlriCodec(address_type),
            )));
        };
        let (buf, next_hop_len) = be_u8(buf)?;
        let (buf, next_hop_buf) = nom::bytes::complete::take(next_hop_len)(buf)?;
        let next_hop = if next_hop_len == 0 {
            None
        } else {
            let (_, next_hop): (_, NextHop) =
                parse_into_located_one_input(next_hop_buf, next_hop_len)?;
            Some(next_hop)
        };
        let (mut buf, _reserved) = be_u8(buf)?;
        let mut nlri = vec![];
        while !buf.is_empty() {
            let (t, value) = parser(buf).map_err(|err| err.map(LocatedMpReachParsingError::from))?;
            nlri.push(value);
            buf = t;
        }
        Ok((buf, MpReach::new(address_type, next_hop, nlri)))
    }
}

#[derive(LocatedError, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum MpUnreachParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    UnknownFamily(FamilyCode),
    NoNlriCodec(AddressType),
    NlriError(#[from_located(module = "crate::wire::deserializer::nlri")] NlriParsingError),
}

impl<'a> ReadablePduWithOneInput<'a, &BgpExtensions, LocatedMpUnreachParsingError<'a>>
    for MpUnreach
{
    fn from_wire(
        buf: Span<'a>,
        extensions: &BgpExtensions,
    ) -> IResult<Span<'a>, Self, LocatedMpUnreachParsingError<'a>> {
        let family_location = buf;
        let (mut buf, address_type) = parse_family(buf, extensions, |span, code| {
            LocatedMpUnreachParsingError::new(span, MpUnreachParsingError::UnknownFamily(code))
        })?;
        let Some(parser) = extensions.nlri().parser(&address_type) else {
            return Err(nom::Err::Error(LocatedMpUnreachParsingError::new(
                family_location,
                MpUnreachParsingError::NoNlriCodec(address_type),
            )));
        };
        let mut nlri = vec![];
        while !buf.is_empty() {
            let (t, value) =
                parser(buf).map_err(|err| err.map(LocatedMpUnreachParsingError::from))?;
            nlri.push(value);
            buf = t;
        }
        Ok((buf, MpUnreach::new(address_type, nlri)))
    }
}

impl<'a> ReadablePduWithTwoInputs<'a, &BgpExtensions, &BgpParsingContext, LocatedPathAttributeParsingError<'a>>
    for PathAttributes
{
    /// Parse a complete attributes block, `buf` must hold nothing else.
    fn from_wire(
        buf: Span<'a>,
        extensions: &BgpExtensions,
        ctx: &BgpParsingContext,
    ) -> IResult<Span<'a>, Self, LocatedPathAttributeParsingError<'a>> {
        let mut buf = buf;
        let mut attributes = vec![];
        let mut unsupported_families = vec![];
        let mut errors = vec![];
        while !buf.is_empty() {
            let attribute_location = buf;
            let (t, flags) = be_u8(buf)?;
            let (t, code) = be_u8(t)?;
            let extended_length =
                flags & EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK == EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK;
            let (t, length) = if extended_length {
                be_u16(t)?
            } else {
                let (t, length) = be_u8(t)?;
                (t, length as u16)
            };
            let (t, body) = nom::bytes::complete::take(length)(t)?;
            buf = t;

            let optional = flags & OPTIONAL_PATH_ATTRIBUTE_MASK == OPTIONAL_PATH_ATTRIBUTE_MASK;
            let transitive =
                flags & TRANSITIVE_PATH_ATTRIBUTE_MASK == TRANSITIVE_PATH_ATTRIBUTE_MASK;
            let partial = flags & PARTIAL_PATH_ATTRIBUTE_MASK == PARTIAL_PATH_ATTRIBUTE_MASK;

            let Some(parser) = extensions.attributes().parser(&code) else {
                if !optional {
                    return Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
                        attribute_location,
                        PathAttributeParsingError::WellKnownAttributeNotRecognized(code),
                    )));
                }
                log::debug!("Keeping unrecognized optional path attribute {code} of {length} bytes");
                let value = UnrecognizedAttribute::new(code, flags, body.fragment().to_vec());
                attributes.push(PathAttribute::new(
                    optional,
                    transitive,
                    partial,
                    extended_length,
                    PathAttributeValue::Unrecognized(value),
                ));
                continue;
            };

            let located = match parser(body, extensions) {
                Ok((rest, _)) if !rest.is_empty() => LocatedPathAttributeParsingError::new(
                    rest,
                    PathAttributeParsingError::MalformedAttribute {
                        code,
                        expected: length - rest.len() as u16,
                        found: length,
                    },
                ),
                Ok((_, value)) => {
                    attributes.push(PathAttribute::new(
                        optional,
                        transitive,
                        partial,
                        extended_length,
                        value,
                    ));
                    continue;
                }
                Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => err,
                Err(nom::Err::Incomplete(needed)) => return Err(nom::Err::Incomplete(needed)),
            };

            let error = located.error();
            if let Some(family) = error.unsupported_family() {
                log::debug!("Skipping path attribute {code} of unsupported family {family}");
                unsupported_families.push(family);
                continue;
            }
            let action = error.error_action();
            if ctx.revised_error_handling() && action != AttributeErrorAction::SessionReset {
                log::warn!("Malformed path attribute {code} handled as {action:?}: {error:?}");
                errors.push(AttributeError::new(code, action, error.clone()));
                continue;
            }
            return Err(nom::Err::Error(located));
        }
        Ok((
            buf,
            PathAttributes::from_parts(attributes, unsupported_families, errors),
        ))
    }
}
