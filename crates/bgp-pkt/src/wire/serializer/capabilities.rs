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
    capabilities::{BgpCapability, BgpCapabilityKind, BgpOpenParameter, BgpOpenParameterKind},
    extensions::BgpExtensions,
    wire::serializer::written_len,
};
use byteorder::{NetworkEndian, WriteBytesExt};
use pathwire_parse_utils::WritablePduWithOneInput;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpCapabilityWritingError {
    StdIOError(#[from_std_io_error] String),
    UnexpectedCapability(BgpCapabilityKind),
    UnregisteredSerializer(BgpCapabilityKind),
    ValueTooLong(usize),
}

/// Capability serializers bound in [BgpExtensions], they write the capability
/// value only.
pub fn write_multi_protocol(
    capability: &BgpCapability,
    writer: &mut dyn Write,
) -> Result<(), BgpCapabilityWritingError> {
    match capability {
        BgpCapability::MultiProtocol(family) => {
            writer.write_u16::<NetworkEndian>(family.afi())?;
            writer.write_u8(0)?;
            writer.write_u8(family.safi())?;
            Ok(())
        }
        other => Err(BgpCapabilityWritingError::UnexpectedCapability(other.kind())),
    }
}

pub fn write_route_refresh(
    capability: &BgpCapability,
    _writer: &mut dyn Write,
) -> Result<(), BgpCapabilityWritingError> {
    match capability {
        BgpCapability::RouteRefresh => Ok(()),
        other => Err(BgpCapabilityWritingError::UnexpectedCapability(other.kind())),
    }
}

pub fn write_four_octet_as(
    capability: &BgpCapability,
    writer: &mut dyn Write,
) -> Result<(), BgpCapabilityWritingError> {
    match capability {
        BgpCapability::FourOctetAs(asn4) => Ok(writer.write_u32::<NetworkEndian>(*asn4)?),
        other => Err(BgpCapabilityWritingError::UnexpectedCapability(other.kind())),
    }
}

/// Write a one octet type, one octet length and `value`
fn write_type_length_value<T: Write + ?Sized>(
    writer: &mut T,
    code: u8,
    value: &[u8],
) -> Result<(), std::io::Error> {
    writer.write_u8(code)?;
    writer.write_u8(value.len() as u8)?;
    writer.write_all(value)
}

impl WritablePduWithOneInput<&BgpExtensions, BgpCapabilityWritingError> for BgpCapability {
    /// Code and length octets
    const BASE_LENGTH: usize = 2;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), BgpCapabilityWritingError> {
        let mut value = Vec::new();
        match self {
            BgpCapability::Unrecognized(unrecognized) => {
                value.extend_from_slice(unrecognized.value())
            }
            capability => {
                let kind = capability.kind();
                let serializer = extensions
                    .capabilities()
                    .serializer(&kind)
                    .ok_or(BgpCapabilityWritingError::UnregisteredSerializer(kind))?;
                serializer(capability, &mut value)?;
            }
        }
        if value.len() > u8::MAX as usize {
            return Err(BgpCapabilityWritingError::ValueTooLong(value.len()));
        }
        write_type_length_value(writer, self.code(), &value)?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpOpenParameterWritingError {
    StdIOError(#[from_std_io_error] String),
    CapabilityError(#[from] BgpCapabilityWritingError),
    UnregisteredSerializer(BgpOpenParameterKind),
    ValueTooLong(usize),
}

/// Parameter serializers bound in [BgpExtensions], they write the parameter
/// value only.
pub fn write_capabilities_parameter(
    parameter: &BgpOpenParameter,
    extensions: &BgpExtensions,
    writer: &mut dyn Write,
) -> Result<(), BgpOpenParameterWritingError> {
    match parameter {
        BgpOpenParameter::Capabilities(capabilities) => {
            for capability in capabilities {
                capability.write(writer, extensions)?;
            }
            Ok(())
        }
    }
}

impl WritablePduWithOneInput<&BgpExtensions, BgpOpenParameterWritingError> for BgpOpenParameter {
    /// Type and length octets
    const BASE_LENGTH: usize = 2;

    fn len(&self, extensions: &BgpExtensions) -> usize {
        written_len(|buf| self.write(buf, extensions))
    }

    fn write<T: Write + ?Sized>(
        &self,
        writer: &mut T,
        extensions: &BgpExtensions,
    ) -> Result<(), BgpOpenParameterWritingError> {
        let kind = self.kind();
        let serializer = extensions
            .parameters()
            .serializer(&kind)
            .ok_or(BgpOpenParameterWritingError::UnregisteredSerializer(kind))?;
        let mut value = Vec::new();
        serializer(self, extensions, &mut value)?;
        if value.len() > u8::MAX as usize {
            return Err(BgpOpenParameterWritingError::ValueTooLong(value.len()));
        }
        write_type_length_value(writer, self.code(), &value)?;
        Ok(())
    }
}
