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
    iana::PcepObjectClass,
    objects::{
        CloseObject, Ero, ObjectCode, OpenObject, PcepErrorObject, PcepObject, PcepObjectValue,
        UnrecognizedObject, Xro,
    },
    tlvs::PcepTlv,
    wire::{
        deserializer::{
            subobjects::{parse_ero_subobjects, parse_xro_subobjects, SubobjectParsingError},
            tlvs::{parse_tlvs, PcepTlvParsingError},
        },
        IGNORE_MASK, OBJECT_HEADER_LENGTH, OBJECT_TYPE_SHIFT, OPEN_VERSION_SHIFT, PCEP_VERSION,
        PROCESSING_RULE_MASK, XRO_FAIL_MASK,
    },
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u8},
    IResult,
};
use pathwire_parse_utils::{ErrorKindSerdeDeref, ReadablePduWithOneInput, Span};
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PcepObjectParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// Declared object length is shorter than the object header
    InvalidObjectLength(u16),
    /// The P flag is set on an object nothing is registered for
    UnrecognizedMandatoryObject(ObjectCode),
    UnsupportedVersion(u8),
    /// Object body is shorter than the fixed fields of its class
    MalformedObject {
        class: u8,
        expected: usize,
        found: usize,
    },
    TlvError(#[from_located(module = "crate::wire::deserializer::tlvs")] PcepTlvParsingError),
    SubobjectError(
        #[from_located(module = "crate::wire::deserializer::subobjects")] SubobjectParsingError,
    ),
}

#[inline]
fn expect_min_length<'a>(
    buf: Span<'a>,
    class: u8,
    expected: usize,
) -> Result<(), nom::Err<LocatedPcepObjectParsingError<'a>>> {
    if buf.len() >= expected {
        return Ok(());
    }
    Err(nom::Err::Error(LocatedPcepObjectParsingError::new(
        buf,
        PcepObjectParsingError::MalformedObject {
            class,
            expected,
            found: buf.len(),
        },
    )))
}

#[inline]
fn object_tlvs<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, Vec<PcepTlv>, LocatedPcepObjectParsingError<'a>> {
    parse_tlvs(buf, extensions).map_err(|err| err.map(LocatedPcepObjectParsingError::from))
}

/// Object parsers bound in [PcepExtensions]. Each one gets only the object
/// body, the common header is handled by [PcepObject].
pub fn parse_open_object<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>> {
    expect_min_length(buf, PcepObjectClass::Open.into(), 4)?;
    let input = buf;
    let (buf, version_flags) = be_u8(buf)?;
    let version = version_flags >> OPEN_VERSION_SHIFT;
    if version != PCEP_VERSION {
        return Err(nom::Err::Error(LocatedPcepObjectParsingError::new(
            input,
            PcepObjectParsingError::UnsupportedVersion(version),
        )));
    }
    let (buf, keepalive) = be_u8(buf)?;
    let (buf, dead_timer) = be_u8(buf)?;
    let (buf, session_id) = be_u8(buf)?;
    let (buf, tlvs) = object_tlvs(buf, extensions)?;
    Ok((
        buf,
        PcepObjectValue::Open(OpenObject::new(keepalive, dead_timer, session_id, tlvs)),
    ))
}

pub fn parse_ero_object<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>> {
    let (buf, subobjects) = parse_ero_subobjects(buf, extensions)
        .map_err(|err| err.map(LocatedPcepObjectParsingError::from))?;
    Ok((buf, PcepObjectValue::Ero(Ero::new(subobjects))))
}

pub fn parse_pcep_error_object<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>> {
    expect_min_length(buf, PcepObjectClass::PcepError.into(), 4)?;
    let (buf, _reserved) = be_u8(buf)?;
    let (buf, _flags) = be_u8(buf)?;
    let (buf, error_type) = be_u8(buf)?;
    let (buf, error_value) = be_u8(buf)?;
    let (buf, tlvs) = object_tlvs(buf, extensions)?;
    Ok((
        buf,
        PcepObjectValue::PcepError(PcepErrorObject::new(error_type, error_value, tlvs)),
    ))
}

pub fn parse_close_object<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>> {
    expect_min_length(buf, PcepObjectClass::Close.into(), 4)?;
    let (buf, _reserved) = be_u16(buf)?;
    let (buf, _flags) = be_u8(buf)?;
    let (buf, reason) = be_u8(buf)?;
    let (buf, tlvs) = object_tlvs(buf, extensions)?;
    Ok((buf, PcepObjectValue::Close(CloseObject::new(reason, tlvs))))
}

pub fn parse_xro_object<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>> {
    expect_min_length(buf, PcepObjectClass::Xro.into(), 4)?;
    let (buf, _reserved) = be_u16(buf)?;
    let (buf, flags) = be_u16(buf)?;
    let (buf, subobjects) = parse_xro_subobjects(buf, extensions)
        .map_err(|err| err.map(LocatedPcepObjectParsingError::from))?;
    Ok((
        buf,
        PcepObjectValue::Xro(Xro::new(flags & XRO_FAIL_MASK == XRO_FAIL_MASK, subobjects)),
    ))
}

impl<'a> ReadablePduWithOneInput<'a, &PcepExtensions, LocatedPcepObjectParsingError<'a>>
    for PcepObject
{
    /// An object nothing is registered for is kept as
    /// [PcepObjectValue::Unrecognized], unless its P flag is set.
    fn from_wire(
        buf: Span<'a>,
        extensions: &PcepExtensions,
    ) -> IResult<Span<'a>, Self, LocatedPcepObjectParsingError<'a>> {
        let input = buf;
        let (buf, class) = be_u8(buf)?;
        let (buf, type_flags) = be_u8(buf)?;
        let length_location = buf;
        let (buf, length) = be_u16(buf)?;
        let Some(body_length) = (length as usize).checked_sub(OBJECT_HEADER_LENGTH) else {
            return Err(nom::Err::Error(LocatedPcepObjectParsingError::new(
                length_location,
                PcepObjectParsingError::InvalidObjectLength(length),
            )));
        };
        let (buf, body) = nom::bytes::complete::take(body_length)(buf)?;

        let code = ObjectCode::new(class, type_flags >> OBJECT_TYPE_SHIFT);
        let processing_rule = type_flags & PROCESSING_RULE_MASK == PROCESSING_RULE_MASK;
        let ignore = type_flags & IGNORE_MASK == IGNORE_MASK;
        let Some(parser) = extensions.objects().parser(&code) else {
            if processing_rule {
                return Err(nom::Err::Error(LocatedPcepObjectParsingError::new(
                    input,
                    PcepObjectParsingError::UnrecognizedMandatoryObject(code),
                )));
            }
            return Ok((
                buf,
                PcepObject::new(
                    processing_rule,
                    ignore,
                    PcepObjectValue::Unrecognized(UnrecognizedObject::new(
                        code,
                        body.fragment().to_vec(),
                    )),
                ),
            ));
        };
        let (_, value) = parser(body, extensions)?;
        Ok((buf, PcepObject::new(processing_rule, ignore, value)))
    }
}

/// Parse the objects of a message body till `buf` is empty, dropping the
/// ones nothing is registered for.
pub fn parse_objects<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, Vec<PcepObject>, LocatedPcepObjectParsingError<'a>> {
    let mut buf = buf;
    let mut objects = vec![];
    while !buf.is_empty() {
        let (t, object) = PcepObject::from_wire(buf, extensions)?;
        buf = t;
        if let PcepObjectValue::Unrecognized(unrecognized) = object.value() {
            log::debug!(
                "Skipping unrecognized PCEP object {} of {} bytes",
                unrecognized.code(),
                unrecognized.body().len()
            );
            continue;
        }
        objects.push(object);
    }
    Ok((buf, objects))
}
