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

//! Codec table for RSVP-TE exclude route subobjects.
//!
//! The table is keyed by subobject type in its own namespace, apart from the
//! PCEP one: the SRLG entry has a different shape in each protocol.

use crate::{
    iana::XroSubobjectType,
    subobjects::{XroSubobject, XroSubobjectKind},
    wire::{
        deserializer::{
            parse_xro_ipv4_prefix, parse_xro_ipv6_prefix, parse_xro_srlg,
            LocatedSubobjectParsingError,
        },
        serializer::{write_xro_ip_prefix, write_xro_srlg, SubobjectWritingError},
    },
};
use nom::IResult;
use pathwire_parse_utils::Span;
use pathwire_registry::{
    activate_extensions, ActivationError, CodecRegistry, Extension, RegistryError,
};
use std::{io::Write, sync::Arc};

pub type XroSubobjectParser =
    for<'a> fn(Span<'a>, bool) -> IResult<Span<'a>, XroSubobject, LocatedSubobjectParsingError<'a>>;
pub type XroSubobjectSerializer =
    fn(&XroSubobject, &mut dyn Write) -> Result<(), SubobjectWritingError>;

pub type XroSubobjectRegistry =
    CodecRegistry<u8, XroSubobjectKind, XroSubobjectParser, XroSubobjectSerializer>;

#[derive(Debug, Clone)]
pub struct RsvpExtensions {
    xro_subobjects: XroSubobjectRegistry,
}

impl Default for RsvpExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl RsvpExtensions {
    pub fn new() -> Self {
        Self {
            xro_subobjects: CodecRegistry::new("rsvp-xro-subobjects"),
        }
    }

    pub fn with_extensions(
        extensions: &[&dyn Extension<RsvpExtensions>],
    ) -> Result<Arc<Self>, ActivationError> {
        let mut ctx = Self::new();
        activate_extensions(&mut ctx, extensions)?;
        Ok(Arc::new(ctx))
    }

    pub fn standard() -> Result<Arc<Self>, ActivationError> {
        Self::with_extensions(&[&XroExtension])
    }

    pub const fn xro_subobjects(&self) -> &XroSubobjectRegistry {
        &self.xro_subobjects
    }

    pub fn xro_subobjects_mut(&mut self) -> &mut XroSubobjectRegistry {
        &mut self.xro_subobjects
    }
}

/// IPv4 and IPv6 prefixes and SRLG exclusions
#[derive(Debug, Clone, Copy, Default)]
pub struct XroExtension;

impl Extension<RsvpExtensions> for XroExtension {
    fn name(&self) -> &'static str {
        "rsvp-xro"
    }

    fn activate(&self, ctx: &mut RsvpExtensions) -> Result<(), RegistryError> {
        let registry = ctx.xro_subobjects_mut();
        registry.register_parser(XroSubobjectType::Ipv4Prefix.into(), parse_xro_ipv4_prefix)?;
        registry.register_parser(XroSubobjectType::Ipv6Prefix.into(), parse_xro_ipv6_prefix)?;
        registry.register_serializer(XroSubobjectKind::IpPrefix, write_xro_ip_prefix)?;
        registry.register_parser(XroSubobjectType::Srlg.into(), parse_xro_srlg)?;
        registry.register_serializer(XroSubobjectKind::Srlg, write_xro_srlg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard() {
        let extensions = RsvpExtensions::standard().unwrap();
        assert_eq!(extensions.xro_subobjects().namespace(), "rsvp-xro-subobjects");
        let mut codes: Vec<u8> = extensions.xro_subobjects().parser_codes().copied().collect();
        codes.sort();
        assert_eq!(codes, vec![1, 2, 34]);
    }

    #[test]
    fn test_activating_twice() {
        let err = RsvpExtensions::with_extensions(&[&XroExtension, &XroExtension]).unwrap_err();
        assert_eq!(err.extension, "rsvp-xro");
        assert_eq!(
            err.error,
            RegistryError::DuplicateRegistration {
                namespace: "rsvp-xro-subobjects".to_string(),
                key: "1".to_string(),
            }
        );
    }
}
