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
    objects::{
        CloseObject, Ero, ObjectCode, OpenObject, PcepErrorObject, PcepObject, PcepObjectKind,
        PcepObjectValue, Xro,
    },
    subobjects::{EroSubobjectKind, XroSubobjectKind},
    tlvs::{PcepTlv, PcepTlvKind},
    wire::{
        serializer::{subobjects::SubobjectWritingError, tlvs::PcepTlvWritingError, written_len},
        IGNORE_MASK, OBJECT_HEADER_LENGTH, OBJECT_TYPE_SHIFT, OPEN_VERSION_SHIFT, PCEP_VERSION,
        PROCESSING_RULE_MASK, XRO_FAIL_MASK,
    },
};
use byteorder::{NetworkEndian, WriteBytesExt};
use pathwire_parse_utils::WritablePduWithOneInput;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum PcepObjectWritingError {
    StdIOError(#[from_std_io_error] String),
    TlvError(#[from] PcepTlvWritingError),
    SubobjectError(#[from] SubobjectWritingError),
    UnexpectedObject(PcepObjectKind),
    /// Nothing is registered to serialize this kind of object
    UnregisteredSerializer(PcepObjectKind),
    UnregisteredTlvSerializer(PcepTlvKind),
    UnregisteredEroSerializer(EroSubobjectKind),
    UnregisteredXroSerializer(XroSubobjectKind),
    /// Object with its header doesn't fit the 16-bit length field
    ObjectTooLong(usize),
}

/// Write the common object header followed by `body`
pub(crate) fn write_object<T: Write + ?Sized>(
    writer: &mut T,
    code: ObjectCode,
    processing_rule: bool,
    ignore: bool,
    body: &[u8],
) -> Result<(), PcepObjectWritingError> {
    let length = body.len() + OBJECT_HEADER_LENGTH;
    if length > u16::MAX as usize {
        return Err(PcepObjectWritingError::ObjectTooLong(length));
    }
    let mut type_flags = code.object_type() << OBJECT_TYPE_SHIFT;
    if processing_rule {
        type_flags |= PROCESSING_RULE_MASK;
    }
    if ignore {
        type_flags |= IGNORE_MASK;
    }
    writer.write_u8(code.class())?;
    writer.write_u8(type_flags)?;
    writer.write_u16::<NetworkEndian>(length as u16)?;
    writer.write_all(body)?;
    Ok(())
}

fn write_tlvs<T: Write + ?Sized>(
    mut writer: &mut T,
    tlvs: &[PcepTlv],
    extensions: &PcepExtensions,
) -> Result<(), PcepObjectWritingError> {
    for tlv in tlvs {
        let kind = tlv.kind();
        let serializer = extensions
            .tlvs()
            .serializer(&kind)
            .ok_or(PcepObjectWritingError::UnregisteredTlvSerializer(kind))?;
        serializer(tlv, &mut writer)?;
    }
    Ok(())
}

/// Object bodies, without the common header
impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for OpenObject {
    /// Version/flags, keepalive, dead timer and session id octets
    const BASE_LENGTH: usize = 4;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        writer.write_u8(PCEP_VERSION << OPEN_VERSION_SHIFT)?;
        writer.write_u8(self.keepalive())?;
        writer.write_u8(self.dead_timer())?;
        writer.write_u8(self.session_id())?;
        write_tlvs(writer, self.tlvs(), extensions)
    }
}

impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for PcepErrorObject {
    const BASE_LENGTH: usize = 4;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        writer.write_u8(0)?;
        writer.write_u8(0)?;
        writer.write_u8(self.error_type())?;
        writer.write_u8(self.error_value())?;
        write_tlvs(writer, self.tlvs(), extensions)
    }
}

impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for CloseObject {
    const BASE_LENGTH: usize = 4;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        writer.write_u16::<NetworkEndian>(0)?;
        writer.write_u8(0)?;
        writer.write_u8(self.reason())?;
        write_tlvs(writer, self.tlvs(), extensions)
    }
}

impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for Ero {
    const BASE_LENGTH: usize = 0;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        mut writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        for subobject in self.subobjects() {
            let kind = subobject.value().kind();
            let serializer = extensions
                .ero_subobjects()
                .serializer(&kind)
                .ok_or(PcepObjectWritingError::UnregisteredEroSerializer(kind))?;
            serializer(subobject, &mut writer)?;
        }
        Ok(())
    }
}

impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for Xro {
    /// Reserved and flags
    const BASE_LENGTH: usize = 4;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        mut writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        writer.write_u16::<NetworkEndian>(0)?;
        writer.write_u16::<NetworkEndian>(if self.fail() { XRO_FAIL_MASK } else { 0 })?;
        for subobject in self.subobjects() {
            let kind = subobject.value().kind();
            let serializer = extensions
                .xro_subobjects()
                .serializer(&kind)
                .ok_or(PcepObjectWritingError::UnregisteredXroSerializer(kind))?;
            serializer(subobject, &mut writer)?;
        }
        Ok(())
    }
}

/// Object serializers bound in [PcepExtensions], they write the object body
/// only.
pub fn write_open_object(
    value: &PcepObjectValue,
    extensions: &PcepExtensions,
    writer: &mut dyn Write,
) -> Result<(), PcepObjectWritingError> {
    match value {
        PcepObjectValue::Open(open) => open.write(writer, extensions),
        other => Err(PcepObjectWritingError::UnexpectedObject(other.kind())),
    }
}

pub fn write_ero_object(
    value: &PcepObjectValue,
    extensions: &PcepExtensions,
    writer: &mut dyn Write,
) -> Result<(), PcepObjectWritingError> {
    match value {
        PcepObjectValue::Ero(ero) => ero.write(writer, extensions),
        other => Err(PcepObjectWritingError::UnexpectedObject(other.kind())),
    }
}

pub fn write_pcep_error_object(
    value: &PcepObjectValue,
    extensions: &PcepExtensions,
    writer: &mut dyn Write,
) -> Result<(), PcepObjectWritingError> {
    match value {
        PcepObjectValue::PcepError(error) => error.write(writer, extensions),
        other => Err(PcepObjectWritingError::UnexpectedObject(other.kind())),
    }
}

pub fn write_close_object(
    value: &PcepObjectValue,
    extensions: &PcepExtensions,
    writer: &mut dyn Write,
) -> Result<(), PcepObjectWritingError> {
    match value {
        PcepObjectValue::Close(close) => close.write(writer, extensions),
        other => Err(PcepObjectWritingError::UnexpectedObject(other.kind())),
    }
}

pub fn write_xro_object(
    value: &PcepObjectValue,
    extensions: &PcepExtensions,
    writer: &mut dyn Write,
) -> Result<(), PcepObjectWritingError> {
    match value {
        PcepObjectValue::Xro(xro) => xro.write(writer, extensions),
        other => Err(PcepObjectWritingError::UnexpectedObject(other.kind())),
    }
}

impl WritablePduWithOneInput<&PcepExtensions, PcepObjectWritingError> for PcepObject {
    const BASE_LENGTH: usize = OBJECT_HEADER_LENGTH;

    fn len(&self, extensions: &PcepExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &PcepExtensions,
    ) -> Result<(), PcepObjectWritingError> {
        let mut body = Vec::new();
        match self.value() {
            PcepObjectValue::Unrecognized(unrecognized) => {
                body.extend_from_slice(unrecognized.body())
            }
            value => {
                let kind = value.kind();
                let serializer = extensions
                    .objects()
                    .serializer(&kind)
                    .ok_or(PcepObjectWritingError::UnregisteredSerializer(kind))?;
                serializer(value, extensions, &mut body)?;
            }
        }
        write_object(
            writer,
            self.value().code(),
            self.processing_rule(),
            self.ignore(),
            &body,
        )
    }
}
