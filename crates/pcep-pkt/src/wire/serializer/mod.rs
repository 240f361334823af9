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

//! Serializer library for PCEP's wire protocol

pub mod objects;
pub mod subobjects;
pub mod tlvs;

use crate::{
    extensions::PcepExtensions,
    objects::{CLOSE_OBJECT, OPEN_OBJECT, PCEP_ERROR_OBJECT},
    wire::{
        serializer::objects::{write_object, PcepObjectWritingError},
        MESSAGE_HEADER_LENGTH, MESSAGE_VERSION_SHIFT, PCEP_VERSION,
    },
    PcepMessage,
};
use byteorder::{NetworkEndian, WriteBytesExt};
use pathwire_parse_utils::WritablePduWithOneInput;
use pathwire_serde_macros::WritingError;
use std::io::Write;

/// Run `write` against a scratch buffer to learn how many bytes it emits
#[inline]
pub(crate) fn written_len<E>(write: impl FnOnce(&mut Vec<u8>) -> Result<(), E>) -> usize {
    let mut buf = Vec::new();
    match write(&mut buf) {
        Ok(()) => buf.len(),
        Err(_) => 0,
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum PcepMessageWritingError {
    StdIOError(#[from_std_io_error] String),
    ObjectError(#[from] PcepObjectWritingError),
    /// Message with its header doesn't fit the 16-bit length field
    MessageTooLong(usize),
}

fn body_of<B>(value: &B, extensions: &PcepExtensions) -> Result<Vec<u8>, PcepObjectWritingError>
where
    B: for<'a> WritablePduWithOneInput<&'a PcepExtensions, PcepObjectWritingError>,
{
    let mut body = Vec::new();
    value.write(&mut body, extensions)?;
    Ok(body)
}

impl WritablePduWithOneInput<&PcepExtensions, PcepMessageWritingError> for PcepMessage {
    /// Version/flags, type and length
    const BASE_LENGTH: usize = MESSAGE_HEADER_LENGTH;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepMessageWritingError> {
        let mut body = Vec::new();
        match self {
            PcepMessage::Open(open) => {
                write_object(&mut body, OPEN_OBJECT, false, false, &body_of(open, extensions)?)?
            }
            PcepMessage::Keepalive => {}
            PcepMessage::Close(close) => write_object(
                &mut body,
                CLOSE_OBJECT,
                false,
                false,
                &body_of(close, extensions)?,
            )?,
            PcepMessage::Error(error) => {
                for object in error.errors() {
                    write_object(
                        &mut body,
                        PCEP_ERROR_OBJECT,
                        false,
                        false,
                        &body_of(object, extensions)?,
                    )?;
                }
                if let Some(open) = error.open() {
                    write_object(
                        &mut body,
                        OPEN_OBJECT,
                        false,
                        false,
                        &body_of(open, extensions)?,
                    )?;
                }
            }
            PcepMessage::Objects(message) => {
                for object in message.objects() {
                    object.write(&mut body, extensions)?;
                }
            }
            PcepMessage::Unrecognized(unrecognized) => body.extend_from_slice(unrecognized.body()),
        }
        let length = body.len() + MESSAGE_HEADER_LENGTH;
        if length > u16::MAX as usize {
            return Err(PcepMessageWritingError::MessageTooLong(length));
        }
        writer.write_u8(PCEP_VERSION << MESSAGE_VERSION_SHIFT)?;
        writer.write_u8(self.message_type())?;
        writer.write_u16::<NetworkEndian>(length as u16)?;
        writer.write_all(&body)?;
        Ok(())
    }
}
