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

//! Codec tables for BGP and the built-in extensions that fill them.
//!
//! A table is built once, then shared read-only behind an [Arc]. Parsers and
//! serializers are plain function pointers so the populated table is
//! `Send + Sync`.

use crate::{
    capabilities::{BgpCapability, BgpCapabilityKind, BgpOpenParameter, BgpOpenParameterKind},
    iana::{BgpCapabilityCode, BgpOpenParameterType, PathAttributeType},
    nlri::{Nlri, NlriKind},
    path_attribute::{PathAttributeKind, PathAttributeValue},
    wire::{
        deserializer::{
            capabilities::{
                parse_capabilities_parameter, parse_four_octet_as, parse_multi_protocol,
                parse_route_refresh, LocatedBgpCapabilityParsingError,
                LocatedBgpOpenParameterParsingError,
            },
            nlri::{
                parse_ipv4_labeled, parse_ipv4_mpls_vpn, parse_ipv4_unicast, parse_ipv6_labeled,
                parse_ipv6_mpls_vpn, parse_ipv6_unicast, parse_route_target_membership,
                LocatedNlriParsingError,
            },
            path_attribute::{
                parse_atomic_aggregate, parse_local_preference, parse_mp_reach, parse_mp_unreach,
                parse_multi_exit_discriminator, parse_next_hop, parse_origin,
                LocatedPathAttributeParsingError,
            },
        },
        serializer::{
            capabilities::{
                write_capabilities_parameter, write_four_octet_as, write_multi_protocol,
                write_route_refresh, BgpCapabilityWritingError, BgpOpenParameterWritingError,
            },
            nlri::{
                write_ipv4_labeled, write_ipv4_mpls_vpn, write_ipv4_unicast, write_ipv6_labeled,
                write_ipv6_mpls_vpn, write_ipv6_unicast, write_route_target_membership,
                NlriWritingError,
            },
            path_attribute::{
                write_atomic_aggregate, write_local_preference, write_mp_reach, write_mp_unreach,
                write_multi_exit_discriminator, write_next_hop, write_origin,
                PathAttributeWritingError,
            },
        },
    },
};
use nom::IResult;
use pathwire_iana::address_family::AddressType;
use pathwire_parse_utils::Span;
use pathwire_registry::{
    activate_extensions, ActivationError, CodecRegistry, Extension, FamilyRegistry, RegistryError,
};
use std::{io::Write, sync::Arc};

pub type NlriParser = for<'a> fn(Span<'a>) -> IResult<Span<'a>, Nlri, LocatedNlriParsingError<'a>>;
pub type NlriSerializer = fn(&Nlri, &mut dyn Write) -> Result<(), NlriWritingError>;

/// Parses the value of an attribute, the header is already consumed
pub type AttributeParser = for<'a, 'b> fn(
    Span<'a>,
    &'b BgpExtensions,
) -> IResult<Span<'a>, PathAttributeValue, LocatedPathAttributeParsingError<'a>>;
/// Writes the value of an attribute, without its header
pub type AttributeSerializer =
    fn(&PathAttributeValue, &BgpExtensions, &mut dyn Write) -> Result<(), PathAttributeWritingError>;

pub type CapabilityParser =
    for<'a> fn(Span<'a>) -> IResult<Span<'a>, BgpCapability, LocatedBgpCapabilityParsingError<'a>>;
pub type CapabilitySerializer =
    fn(&BgpCapability, &mut dyn Write) -> Result<(), BgpCapabilityWritingError>;

pub type ParameterParser = for<'a, 'b> fn(
    Span<'a>,
    &'b BgpExtensions,
) -> IResult<Span<'a>, BgpOpenParameter, LocatedBgpOpenParameterParsingError<'a>>;
pub type ParameterSerializer = fn(
    &BgpOpenParameter,
    &BgpExtensions,
    &mut dyn Write,
) -> Result<(), BgpOpenParameterWritingError>;

pub type NlriRegistry = CodecRegistry<AddressType, NlriKind, NlriParser, NlriSerializer>;
pub type AttributeRegistry =
    CodecRegistry<u8, PathAttributeKind, AttributeParser, AttributeSerializer>;
pub type CapabilityRegistry =
    CodecRegistry<u8, BgpCapabilityKind, CapabilityParser, CapabilitySerializer>;
pub type ParameterRegistry =
    CodecRegistry<u8, BgpOpenParameterKind, ParameterParser, ParameterSerializer>;

#[derive(Debug, Clone)]
pub struct BgpExtensions {
    families: FamilyRegistry<AddressType>,
    nlri: NlriRegistry,
    attributes: AttributeRegistry,
    capabilities: CapabilityRegistry,
    parameters: ParameterRegistry,
}

impl Default for BgpExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl BgpExtensions {
    /// Empty tables, nothing can be parsed before extensions are activated
    pub fn new() -> Self {
        Self {
            families: FamilyRegistry::new("bgp-families"),
            nlri: CodecRegistry::new("bgp-nlri"),
            attributes: CodecRegistry::new("bgp-path-attributes"),
            capabilities: CodecRegistry::new("bgp-capabilities"),
            parameters: CodecRegistry::new("bgp-open-parameters"),
        }
    }

    pub fn with_extensions(
        extensions: &[&dyn Extension<BgpExtensions>],
    ) -> Result<Arc<Self>, ActivationError> {
        let mut ctx = Self::new();
        activate_extensions(&mut ctx, extensions)?;
        Ok(Arc::new(ctx))
    }

    /// All the built-in extensions
    pub fn standard() -> Result<Arc<Self>, ActivationError> {
        Self::with_extensions(&[
            &BaseExtension,
            &LabeledUnicastExtension,
            &L3vpnExtension,
            &RouteTargetConstraintExtension,
        ])
    }

    pub const fn families(&self) -> &FamilyRegistry<AddressType> {
        &self.families
    }

    pub fn families_mut(&mut self) -> &mut FamilyRegistry<AddressType> {
        &mut self.families
    }

    pub const fn nlri(&self) -> &NlriRegistry {
        &self.nlri
    }

    pub fn nlri_mut(&mut self) -> &mut NlriRegistry {
        &mut self.nlri
    }

    pub const fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeRegistry {
        &mut self.attributes
    }

    pub const fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.capabilities
    }

    pub const fn parameters(&self) -> &ParameterRegistry {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterRegistry {
        &mut self.parameters
    }

    /// Register the family and bind its NLRI codec in one go
    pub fn register_nlri_family(
        &mut self,
        address_type: AddressType,
        kind: NlriKind,
        parser: NlriParser,
        serializer: NlriSerializer,
    ) -> Result<(), RegistryError> {
        self.families.register_family(
            pathwire_registry::FamilyCode::new(
                address_type.address_family().into(),
                address_type.subsequent_address_family().into(),
            ),
            address_type,
        )?;
        self.nlri.register_parser(address_type, parser)?;
        self.nlri.register_serializer(kind, serializer)?;
        Ok(())
    }

    pub fn register_attribute(
        &mut self,
        code: PathAttributeType,
        kind: PathAttributeKind,
        parser: AttributeParser,
        serializer: AttributeSerializer,
    ) -> Result<(), RegistryError> {
        self.attributes.register_parser(code.into(), parser)?;
        self.attributes.register_serializer(kind, serializer)?;
        Ok(())
    }

    pub fn register_capability(
        &mut self,
        code: BgpCapabilityCode,
        kind: BgpCapabilityKind,
        parser: CapabilityParser,
        serializer: CapabilitySerializer,
    ) -> Result<(), RegistryError> {
        self.capabilities.register_parser(code.into(), parser)?;
        self.capabilities.register_serializer(kind, serializer)?;
        Ok(())
    }
}

/// IPv4/IPv6 unicast, the RFC4271 attributes, multiprotocol attributes,
/// capabilities and the capabilities optional parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseExtension;

impl Extension<BgpExtensions> for BaseExtension {
    fn name(&self) -> &'static str {
        "bgp-base"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.register_nlri_family(
            AddressType::Ipv4Unicast,
            NlriKind::Ipv4Unicast,
            parse_ipv4_unicast,
            write_ipv4_unicast,
        )?;
        ctx.register_nlri_family(
            AddressType::Ipv6Unicast,
            NlriKind::Ipv6Unicast,
            parse_ipv6_unicast,
            write_ipv6_unicast,
        )?;

        ctx.register_attribute(
            PathAttributeType::Origin,
            PathAttributeKind::Origin,
            parse_origin,
            write_origin,
        )?;
        ctx.register_attribute(
            PathAttributeType::NextHop,
            PathAttributeKind::NextHop,
            parse_next_hop,
            write_next_hop,
        )?;
        ctx.register_attribute(
            PathAttributeType::MultiExitDiscriminator,
            PathAttributeKind::MultiExitDiscriminator,
            parse_multi_exit_discriminator,
            write_multi_exit_discriminator,
        )?;
        ctx.register_attribute(
            PathAttributeType::LocalPreference,
            PathAttributeKind::LocalPreference,
            parse_local_preference,
            write_local_preference,
        )?;
        ctx.register_attribute(
            PathAttributeType::AtomicAggregate,
            PathAttributeKind::AtomicAggregate,
            parse_atomic_aggregate,
            write_atomic_aggregate,
        )?;
        ctx.register_attribute(
            PathAttributeType::MpReachNlri,
            PathAttributeKind::MpReach,
            parse_mp_reach,
            write_mp_reach,
        )?;
        ctx.register_attribute(
            PathAttributeType::MpUnreachNlri,
            PathAttributeKind::MpUnreach,
            parse_mp_unreach,
            write_mp_unreach,
        )?;

        ctx.register_capability(
            BgpCapabilityCode::MultiProtocolExtensions,
            BgpCapabilityKind::MultiProtocol,
            parse_multi_protocol,
            write_multi_protocol,
        )?;
        ctx.register_capability(
            BgpCapabilityCode::RouteRefreshCapability,
            BgpCapabilityKind::RouteRefresh,
            parse_route_refresh,
            write_route_refresh,
        )?;
        ctx.register_capability(
            BgpCapabilityCode::FourOctetAs,
            BgpCapabilityKind::FourOctetAs,
            parse_four_octet_as,
            write_four_octet_as,
        )?;

        ctx.parameters
            .register_parser(BgpOpenParameterType::Capabilities.into(), parse_capabilities_parameter)?;
        ctx.parameters
            .register_serializer(BgpOpenParameterKind::Capabilities, write_capabilities_parameter)?;
        Ok(())
    }
}

/// Labeled unicast [RFC8277](https://datatracker.ietf.org/doc/html/rfc8277)
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledUnicastExtension;

impl Extension<BgpExtensions> for LabeledUnicastExtension {
    fn name(&self) -> &'static str {
        "bgp-labeled-unicast"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.register_nlri_family(
            AddressType::Ipv4NlriMplsLabels,
            NlriKind::Ipv4Labeled,
            parse_ipv4_labeled,
            write_ipv4_labeled,
        )?;
        ctx.register_nlri_family(
            AddressType::Ipv6NlriMplsLabels,
            NlriKind::Ipv6Labeled,
            parse_ipv6_labeled,
            write_ipv6_labeled,
        )
    }
}

/// BGP/MPLS IP VPNs [RFC4364](https://datatracker.ietf.org/doc/html/rfc4364)
/// and [RFC4659](https://datatracker.ietf.org/doc/html/rfc4659)
#[derive(Debug, Clone, Copy, Default)]
pub struct L3vpnExtension;

impl Extension<BgpExtensions> for L3vpnExtension {
    fn name(&self) -> &'static str {
        "bgp-l3vpn"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.register_nlri_family(
            AddressType::Ipv4MplsLabeledVpn,
            NlriKind::Ipv4MplsVpn,
            parse_ipv4_mpls_vpn,
            write_ipv4_mpls_vpn,
        )?;
        ctx.register_nlri_family(
            AddressType::Ipv6MplsLabeledVpn,
            NlriKind::Ipv6MplsVpn,
            parse_ipv6_mpls_vpn,
            write_ipv6_mpls_vpn,
        )
    }
}

/// Route target constraint [RFC4684](https://datatracker.ietf.org/doc/html/rfc4684)
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTargetConstraintExtension;

impl Extension<BgpExtensions> for RouteTargetConstraintExtension {
    fn name(&self) -> &'static str {
        "bgp-route-target-constraint"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.register_nlri_family(
            AddressType::Ipv4RouteTargetConstraints,
            NlriKind::RouteTargetMembership,
            parse_route_target_membership,
            write_route_target_membership,
        )
    }
}
