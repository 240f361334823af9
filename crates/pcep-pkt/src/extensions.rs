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

//! Codec tables for PCEP and the built-in extensions that fill them.
//!
//! Objects are keyed by class and type, TLVs by their 16-bit type, and the
//! ERO and XRO subobjects each get their own table since the same subobject
//! type means different things in each.

use crate::{
    iana::{EroSubobjectType, PcepObjectClass, PcepTlvType, XroSubobjectType},
    objects::{ObjectCode, PcepObjectKind, PcepObjectValue},
    subobjects::{EroSubobject, EroSubobjectKind, XroSubobject, XroSubobjectKind},
    tlvs::{PcepTlv, PcepTlvKind},
    wire::{
        deserializer::{
            objects::{
                parse_close_object, parse_ero_object, parse_open_object, parse_pcep_error_object,
                parse_xro_object, LocatedPcepObjectParsingError,
            },
            subobjects::{
                parse_ero_ipv4_prefix, parse_ero_ipv6_prefix, parse_sr_ero,
                parse_xro_ipv4_prefix, parse_xro_ipv6_prefix, parse_xro_srlg,
                LocatedSubobjectParsingError,
            },
            tlvs::{parse_sr_pce_capability, LocatedPcepTlvParsingError},
        },
        serializer::{
            objects::{
                write_close_object, write_ero_object, write_open_object, write_pcep_error_object,
                write_xro_object, PcepObjectWritingError,
            },
            subobjects::{
                write_ero_ipv4_prefix, write_sr_ero, write_xro_ipv4_prefix, write_xro_srlg,
                SubobjectWritingError,
            },
            tlvs::{write_sr_pce_capability, PcepTlvWritingError},
        },
    },
};
use nom::IResult;
use pathwire_parse_utils::Span;
use pathwire_registry::{
    activate_extensions, ActivationError, CodecRegistry, Extension, RegistryError,
};
use std::{io::Write, sync::Arc};

/// Parses an object body, the common header is already consumed
pub type ObjectParser = for<'a, 'b> fn(
    Span<'a>,
    &'b PcepExtensions,
) -> IResult<Span<'a>, PcepObjectValue, LocatedPcepObjectParsingError<'a>>;
/// Writes an object body, without the common header
pub type ObjectSerializer =
    fn(&PcepObjectValue, &PcepExtensions, &mut dyn Write) -> Result<(), PcepObjectWritingError>;

/// Parses a TLV value, without header and padding
pub type TlvParser =
    for<'a> fn(Span<'a>) -> IResult<Span<'a>, PcepTlv, LocatedPcepTlvParsingError<'a>>;
/// Writes a whole TLV
pub type TlvSerializer = fn(&PcepTlv, &mut dyn Write) -> Result<(), PcepTlvWritingError>;

/// Parses a subobject content given its L bit, the header is already consumed
pub type EroSubobjectParser =
    for<'a> fn(Span<'a>, bool) -> IResult<Span<'a>, EroSubobject, LocatedSubobjectParsingError<'a>>;
pub type EroSubobjectSerializer =
    fn(&EroSubobject, &mut dyn Write) -> Result<(), SubobjectWritingError>;
pub type XroSubobjectParser =
    for<'a> fn(Span<'a>, bool) -> IResult<Span<'a>, XroSubobject, LocatedSubobjectParsingError<'a>>;
pub type XroSubobjectSerializer =
    fn(&XroSubobject, &mut dyn Write) -> Result<(), SubobjectWritingError>;

pub type ObjectRegistry =
    CodecRegistry<ObjectCode, PcepObjectKind, ObjectParser, ObjectSerializer>;
pub type TlvRegistry = CodecRegistry<u16, PcepTlvKind, TlvParser, TlvSerializer>;
pub type EroSubobjectRegistry =
    CodecRegistry<u8, EroSubobjectKind, EroSubobjectParser, EroSubobjectSerializer>;
pub type XroSubobjectRegistry =
    CodecRegistry<u8, XroSubobjectKind, XroSubobjectParser, XroSubobjectSerializer>;

#[derive(Debug, Clone)]
pub struct PcepExtensions {
    objects: ObjectRegistry,
    tlvs: TlvRegistry,
    ero_subobjects: EroSubobjectRegistry,
    xro_subobjects: XroSubobjectRegistry,
}

impl Default for PcepExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl PcepExtensions {
    pub fn new() -> Self {
        Self {
            objects: CodecRegistry::new("pcep-objects"),
            tlvs: CodecRegistry::new("pcep-tlvs"),
            ero_subobjects: CodecRegistry::new("pcep-ero-subobjects"),
            xro_subobjects: CodecRegistry::new("pcep-xro-subobjects"),
        }
    }

    pub fn with_extensions(
        extensions: &[&dyn Extension<PcepExtensions>],
    ) -> Result<Arc<Self>, ActivationError> {
        let mut ctx = Self::new();
        activate_extensions(&mut ctx, extensions)?;
        Ok(Arc::new(ctx))
    }

    pub fn standard() -> Result<Arc<Self>, ActivationError> {
        Self::with_extensions(&[&BaseExtension, &SegmentRoutingExtension])
    }

    pub const fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    pub const fn tlvs(&self) -> &TlvRegistry {
        &self.tlvs
    }

    pub fn tlvs_mut(&mut self) -> &mut TlvRegistry {
        &mut self.tlvs
    }

    pub const fn ero_subobjects(&self) -> &EroSubobjectRegistry {
        &self.ero_subobjects
    }

    pub fn ero_subobjects_mut(&mut self) -> &mut EroSubobjectRegistry {
        &mut self.ero_subobjects
    }

    pub const fn xro_subobjects(&self) -> &XroSubobjectRegistry {
        &self.xro_subobjects
    }

    pub fn xro_subobjects_mut(&mut self) -> &mut XroSubobjectRegistry {
        &mut self.xro_subobjects
    }

    pub fn register_object(
        &mut self,
        code: ObjectCode,
        kind: PcepObjectKind,
        parser: ObjectParser,
        serializer: ObjectSerializer,
    ) -> Result<(), RegistryError> {
        self.objects.register_parser(code, parser)?;
        self.objects.register_serializer(kind, serializer)?;
        Ok(())
    }

    pub fn register_tlv(
        &mut self,
        code: PcepTlvType,
        kind: PcepTlvKind,
        parser: TlvParser,
        serializer: TlvSerializer,
    ) -> Result<(), RegistryError> {
        self.tlvs.register_parser(code.into(), parser)?;
        self.tlvs.register_serializer(kind, serializer)?;
        Ok(())
    }
}

/// RFC5440 session objects, ERO/XRO and their IP prefix and SRLG subobjects
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseExtension;

impl Extension<PcepExtensions> for BaseExtension {
    fn name(&self) -> &'static str {
        "pcep-base"
    }

    fn activate(&self, ctx: &mut PcepExtensions) -> Result<(), RegistryError> {
        ctx.register_object(
            ObjectCode::new(PcepObjectClass::Open.into(), 1),
            PcepObjectKind::Open,
            parse_open_object,
            write_open_object,
        )?;
        ctx.register_object(
            ObjectCode::new(PcepObjectClass::Ero.into(), 1),
            PcepObjectKind::Ero,
            parse_ero_object,
            write_ero_object,
        )?;
        ctx.register_object(
            ObjectCode::new(PcepObjectClass::PcepError.into(), 1),
            PcepObjectKind::PcepError,
            parse_pcep_error_object,
            write_pcep_error_object,
        )?;
        ctx.register_object(
            ObjectCode::new(PcepObjectClass::Close.into(), 1),
            PcepObjectKind::Close,
            parse_close_object,
            write_close_object,
        )?;
        ctx.register_object(
            ObjectCode::new(PcepObjectClass::Xro.into(), 1),
            PcepObjectKind::Xro,
            parse_xro_object,
            write_xro_object,
        )?;

        // Both address families share one value kind and one serializer
        ctx.ero_subobjects
            .register_parser(EroSubobjectType::Ipv4Prefix.into(), parse_ero_ipv4_prefix)?;
        ctx.ero_subobjects
            .register_parser(EroSubobjectType::Ipv6Prefix.into(), parse_ero_ipv6_prefix)?;
        ctx.ero_subobjects
            .register_serializer(EroSubobjectKind::IpPrefix, write_ero_ipv4_prefix)?;

        ctx.xro_subobjects
            .register_parser(XroSubobjectType::Ipv4Prefix.into(), parse_xro_ipv4_prefix)?;
        ctx.xro_subobjects
            .register_parser(XroSubobjectType::Ipv6Prefix.into(), parse_xro_ipv6_prefix)?;
        ctx.xro_subobjects
            .register_serializer(XroSubobjectKind::IpPrefix, write_xro_ipv4_prefix)?;
        ctx.xro_subobjects
            .register_parser(XroSubobjectType::Srlg.into(), parse_xro_srlg)?;
        ctx.xro_subobjects
            .register_serializer(XroSubobjectKind::Srlg, write_xro_srlg)?;
        Ok(())
    }
}

/// Segment routing [RFC8664](https://datatracker.ietf.org/doc/html/rfc8664)
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentRoutingExtension;

impl Extension<PcepExtensions> for SegmentRoutingExtension {
    fn name(&self) -> &'static str {
        "pcep-segment-routing"
    }

    fn activate(&self, ctx: &mut PcepExtensions) -> Result<(), RegistryError> {
        ctx.register_tlv(
            PcepTlvType::SrPceCapability,
            PcepTlvKind::SrPceCapability,
            parse_sr_pce_capability,
            write_sr_pce_capability,
        )?;
        ctx.ero_subobjects
            .register_parser(EroSubobjectType::SrEro.into(), parse_sr_ero)?;
        ctx.ero_subobjects
            .register_serializer(EroSubobjectKind::SrEro, write_sr_ero)?;
        Ok(())
    }
}
