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

//! Deserializer library for PCEP's wire protocol

pub mod objects;
pub mod subobjects;
pub mod tlvs;

use crate::{
    extensions::PcepExtensions,
    iana::{PcepMessageType, PcepObjectClass},
    objects::{ObjectCode, PcepObject, PcepObjectValue},
    wire::{
        deserializer::objects::{parse_objects, PcepObjectParsingError},
        MESSAGE_HEADER_LENGTH, MESSAGE_VERSION_SHIFT, PCEP_VERSION,
    },
    PcepErrorMessage, PcepMessage, PcepObjectsMessage, UnrecognizedMessage,
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
pub enum PcepMessageParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    UnsupportedVersion(u8),
    InvalidMessageLength(u16),
    /// A message lacks an object its type requires
    MissingObject {
        message_type: u8,
        class: u8,
    },
    /// An object the message type doesn't allow
    UnexpectedObject {
        message_type: u8,
        code: ObjectCode,
    },
    ObjectError(
        #[from_located(module = "crate::wire::deserializer::objects")] PcepObjectParsingError,
    ),
}

fn missing(
    buf: Span<'_>,
    message_type: PcepMessageType,
    class: PcepObjectClass,
) -> nom::Err<LocatedPcepMessageParsingError<'_>> {
    nom::Err::Error(LocatedPcepMessageParsingError::new(
        buf,
        PcepMessageParsingError::MissingObject {
            message_type: message_type.into(),
            class: class.into(),
        },
    ))
}

fn unexpected<'a>(
    buf: Span<'a>,
    message_type: PcepMessageType,
    object: &PcepObject,
) -> nom::Err<LocatedPcepMessageParsingError<'a>> {
    nom::Err::Error(LocatedPcepMessageParsingError::new(
        buf,
        PcepMessageParsingError::UnexpectedObject {
            message_type: message_type.into(),
            code: object.value().code(),
        },
    ))
}

/// Extract the single object of a message that carries exactly one
fn single_object<'a, T>(
    body: Span<'a>,
    objects: Vec<PcepObject>,
    message_type: PcepMessageType,
    class: PcepObjectClass,
    extract: impl Fn(PcepObjectValue) -> Result<T, PcepObjectValue>,
) -> Result<T, nom::Err<LocatedPcepMessageParsingError<'a>>> {
    let mut objects = objects.into_iter();
    let Some(first) = objects.next() else {
        return Err(missing(body, message_type, class));
    };
    if let Some(extra) = objects.next() {
        return Err(unexpected(body, message_type, &extra));
    }
    let processing_rule = first.processing_rule();
    let ignore = first.ignore();
    match extract(first.into_value()) {
        Ok(value) => Ok(value),
        Err(other) => Err(unexpected(
            body,
            message_type,
            &PcepObject::new(processing_rule, ignore, other),
        )),
    }
}

fn parse_error_message<'a>(
    body: Span<'a>,
    objects: Vec<PcepObject>,
) -> Result<PcepErrorMessage, nom::Err<LocatedPcepMessageParsingError<'a>>> {
    let mut errors = vec![];
    let mut open = None;
    for object in objects {
        match object.value() {
            PcepObjectValue::PcepError(error) if open.is_none() => errors.push(error.clone()),
            PcepObjectValue::Open(value) if open.is_none() && !errors.is_empty() => {
                open = Some(value.clone())
            }
            _ => return Err(unexpected(body, PcepMessageType::PcErr, &object)),
        }
    }
    if errors.is_empty() {
        return Err(missing(
            body,
            PcepMessageType::PcErr,
            PcepObjectClass::PcepError,
        ));
    }
    Ok(PcepErrorMessage::new(errors, open))
}

impl<'a> ReadablePduWithOneInput<'a, &PcepExtensions, LocatedPcepMessageParsingError<'a>>
    for PcepMessage
{
    /// Parse one complete message, `buf` may hold more data after it.
    fn from_wire(
        buf: Span<'a>,
        extensions: &PcepExtensions,
    ) -> IResult<Span<'a>, Self, LocatedPcepMessageParsingError<'a>> {
        let input = buf;
        let (buf, version_flags) = be_u8(buf)?;
        let version = version_flags >> MESSAGE_VERSION_SHIFT;
        if version != PCEP_VERSION {
            return Err(nom::Err::Error(LocatedPcepMessageParsingError::new(
                input,
                PcepMessageParsingError::UnsupportedVersion(version),
            )));
        }
        let (buf, message_type) = be_u8(buf)?;
        let length_location = buf;
        let (buf, length) = be_u16(buf)?;
        let Some(body_length) = (length as usize).checked_sub(MESSAGE_HEADER_LENGTH) else {
            return Err(nom::Err::Error(LocatedPcepMessageParsingError::new(
                length_location,
                PcepMessageParsingError::InvalidMessageLength(length),
            )));
        };
        let (buf, body) = nom::bytes::complete::take(body_length)(buf)?;

        let Ok(message_type) = PcepMessageType::try_from(message_type) else {
            log::debug!("Keeping unrecognized PCEP message type {message_type}");
            return Ok((
                buf,
                PcepMessage::Unrecognized(UnrecognizedMessage::new(
                    message_type,
                    body.fragment().to_vec(),
                )),
            ));
        };
        if message_type == PcepMessageType::Keepalive {
            if !body.is_empty() {
                return Err(nom::Err::Error(LocatedPcepMessageParsingError::new(
                    length_location,
                    PcepMessageParsingError::InvalidMessageLength(length),
                )));
            }
            return Ok((buf, PcepMessage::Keepalive));
        }

        let (_, objects) = parse_objects(body, extensions)
            .map_err(|err| err.map(LocatedPcepMessageParsingError::from))?;
        let message = match message_type {
            PcepMessageType::Open => PcepMessage::Open(single_object(
                body,
                objects,
                message_type,
                PcepObjectClass::Open,
                |value| match value {
                    PcepObjectValue::Open(open) => Ok(open),
                    other => Err(other),
                },
            )?),
            PcepMessageType::Close => PcepMessage::Close(single_object(
                body,
                objects,
                message_type,
                PcepObjectClass::Close,
                |value| match value {
                    PcepObjectValue::Close(close) => Ok(close),
                    other => Err(other),
                },
            )?),
            PcepMessageType::PcErr => PcepMessage::Error(parse_error_message(body, objects)?),
            other => PcepMessage::Objects(PcepObjectsMessage::new(other, objects)),
        };
        Ok((buf, message))
    }
}
