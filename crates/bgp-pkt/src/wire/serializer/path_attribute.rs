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

//! Serializer for BGP Path Attributes

use crate::{
    extensions::BgpExtensions,
    nlri::{Nlri, NlriKind},
    path_attribute::{
        MpReach, MpUnreach, PathAttribute, PathAttributeKind, PathAttributeValue, PathAttributes,
    },
    wire::{
        serializer::{
            nlri::{NextHopWritingError, NlriWritingError},
            written_len,
        },
        EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK, OPTIONAL_PATH_ATTRIBUTE_MASK,
        PARTIAL_PATH_ATTRIBUTE_MASK, TRANSITIVE_PATH_ATTRIBUTE_MASK,
    },
};
use byteorder::{NetworkEndian, WriteBytesExt};
use pathwire_parse_utils::{WritablePdu, WritablePduWithOneInput};
use pathwire_registry::UnknownFamily;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, PartialEq, Clone, Debug)]
pub enum MpReachWritingError {
    StdIOError(#[from_std_io_error] String),
    UnknownFamily(#[from] UnknownFamily),
    NextHopError(#[from] NextHopWritingError),
    NlriError(#[from] NlriWritingError),
    /// Nothing is registered to serialize this kind of NLRI
    UnregisteredSerializer(NlriKind),
}

fn write_nlri<T, E>(
    mut writer: &mut T,
    nlri: &[Nlri],
    extensions: &BgpExtensions,
    unregistered: fn(NlriKind) -> E,
) -> Result<(), E>
where
    T: Write + ?Sized,
    E: From<NlriWritingError>,
{
    for value in nlri {
        let kind = value.kind();
        let serializer = extensions
            .nlri()
            .serializer(&kind)
            .ok_or_else(|| unregistered(kind))?;
        serializer(value, &mut writer)?;
    }
    Ok(())
}

fn write_family<T: Write + ?Sized>(
    writer: &mut T,
    mp_reach: &MpReach,
    extensions: &BgpExtensions,
) -> Result<(), MpReachWritingError> {
    let code = extensions
        .families()
        .code_for_family(mp_reach.address_type())?;
    writer.write_u16::<NetworkEndian>(code.afi())?;
    writer.write_u8(code.safi())?;
    Ok(())
}

impl WritablePduWithOneInput<&BgpExtensions, MpReachWritingError> for MpReach {
    /// AFI, SAFI, next hop length and the reserved octet
    const BASE_LENGTH: usize = 5;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), MpReachWritingError> {
        write_family(writer, self, extensions)?;
        match self.next_hop() {
            Some(next_hop) => {
                writer.write_u8(next_hop.len() as u8)?;
                next_hop.write(writer)?;
            }
            None => writer.write_u8(0)?,
        }
        writer.write_u8(0)?;
        write_nlri(
            writer,
            self.nlri(),
            extensions,
            MpReachWritingError::UnregisteredSerializer,
        )
    }
}

#[derive(WritingError, PartialEq, Clone, Debug)]
pub enum MpUnreachWritingError {
    StdIOError(#[from_std_io_error] String),
    UnknownFamily(#[from] UnknownFamily),
    NlriError(#[from] NlriWritingError),
    UnregisteredSerializer(NlriKind),
}

impl WritablePduWithOneInput<&BgpExtensions, MpUnreachWritingError> for MpUnreach {
    /// AFI and SAFI
    const BASE_LENGTH: usize = 3;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), MpUnreachWritingError> {
        let code = extensions.families().code_for_family(self.address_type())?;
        writer.write_u16::<NetworkEndian>(code.afi())?;
        writer.write_u8(code.safi())?;
        write_nlri(
            writer,
            self.nlri(),
            extensions,
            MpUnreachWritingError::UnregisteredSerializer,
        )
    }
}

#[derive(WritingError, PartialEq, Clone, Debug)]
pub enum PathAttributeWritingError {
    StdIOError(#[from_std_io_error] String),
    MpReachError(#[from] MpReachWritingError),
    MpUnreachError(#[from] MpUnreachWritingError),
    /// The serializer was handed a value of another attribute type
    UnexpectedValue(PathAttributeKind),
    /// Nothing is registered to serialize this kind of attribute
    UnregisteredSerializer(PathAttributeKind),
    /// The value doesn't fit in the two octets extended length
    ValueTooLong(usize),
}

/// Serializers bound to attribute kinds in [BgpExtensions], they write the
/// attribute value only.
pub fn write_origin(
    value: &PathAttributeValue,
    _extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::Origin(origin) => Ok(writer.write_u8((*origin).into())?),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_next_hop(
    value: &PathAttributeValue,
    _extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::NextHop(ip) => Ok(writer.write_all(&ip.octets())?),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_multi_exit_discriminator(
    value: &PathAttributeValue,
    _extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::MultiExitDiscriminator(metric) => {
            Ok(writer.write_u32::<NetworkEndian>(*metric)?)
        }
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_local_preference(
    value: &PathAttributeValue,
    _extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::LocalPreference(pref) => Ok(writer.write_u32::<NetworkEndian>(*pref)?),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_atomic_aggregate(
    value: &PathAttributeValue,
    _extensions: &BgpExtensions,
    _writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::AtomicAggregate => Ok(()),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_mp_reach(
    value: &PathAttributeValue,
    extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::MpReach(mp_reach) => Ok(mp_reach.write(writer, extensions)?),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

pub fn write_mp_unreach(
    value: &PathAttributeValue,
    extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), PathAttributeWritingError> {
    match value {
        PathAttributeValue::MpUnreach(mp_unreach) => Ok(mp_unreach.write(writer, extensions)?),
        other => Err(PathAttributeWritingError::UnexpectedValue(other.kind())),
    }
}

impl PathAttribute {
    fn value_bytes(&self, extensions: &BgpExtensions) -> Result<Vec<u8>, PathAttributeWritingError> {
        let mut buf = Vec::new();
        match self.value() {
            PathAttributeValue::Unrecognized(value) => buf.extend_from_slice(value.value()),
            value => {
                let kind = value.kind();
                let serializer = extensions
                    .attributes()
                    .serializer(&kind)
                    .ok_or(PathAttributeWritingError::UnregisteredSerializer(kind))?;
                serializer(value, extensions, &mut buf)?;
            }
        }
        Ok(buf)
    }

    fn flags(&self, extended_length: bool) -> u8 {
        let mut flags = 0;
        if self.optional() {
            flags |= OPTIONAL_PATH_ATTRIBUTE_MASK;
        }
        if self.transitive() {
            flags |= TRANSITIVE_PATH_ATTRIBUTE_MASK;
        }
        if self.partial() {
            flags |= PARTIAL_PATH_ATTRIBUTE_MASK;
        }
        if extended_length {
            flags |= EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK;
        }
        flags
    }
}

impl WritablePduWithOneInput<&BgpExtensions, PathAttributeWritingError> for PathAttribute {
    /// Flags and type code
    const BASE_LENGTH: usize = 2;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), PathAttributeWritingError> {
        let value = self.value_bytes(extensions)?;
        let extended_length = self.extended_length() || value.len() > u8::MAX as usize;
        writer.write_u8(self.flags(extended_length))?;
        writer.write_u8(self.value().code())?;
        if extended_length {
            let length = u16::try_from(value.len())
                .map_err(|_| PathAttributeWritingError::ValueTooLong(value.len()))?;
            writer.write_u16::<NetworkEndian>(length)?;
        } else {
            writer.write_u8(value.len() as u8)?;
        }
        writer.write_all(&value)?;
        Ok(())
    }
}

impl WritablePduWithOneInput<&BgpExtensions, PathAttributeWritingError> for PathAttributes {
    const BASE_LENGTH: usize = 0;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        self.attributes()
            .iter()
            .map(|attribute| attribute.len(extensions))
            .sum()
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), PathAttributeWritingError> {
        for attribute in self.attributes() {
            attribute.write(writer, extensions)?;
        }
        Ok(())
    }
}
