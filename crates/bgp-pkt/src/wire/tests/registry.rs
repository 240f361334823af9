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
    extensions::*,
    iana::Origin,
    path_attribute::{PathAttribute, PathAttributeValue, PathAttributes},
    wire::deserializer::{path_attribute::*, BgpParsingContext},
};
use pathwire_iana::address_family::AddressType;
use pathwire_parse_utils::{
    test_helpers::{test_parse_error_with_two_inputs, test_parsed_completely_with_two_inputs},
    Span,
};
use pathwire_registry::{Extension, FamilyCode, RegistryError};

#[test]
fn test_standard_families() {
    let extensions = BgpExtensions::standard().unwrap();
    let families = extensions.families();
    assert_eq!(families.len(), 7);
    assert_eq!(
        families.family_for_code(FamilyCode::new(1, 128)),
        Ok(AddressType::Ipv4MplsLabeledVpn)
    );
    assert_eq!(
        families.code_for_family(AddressType::Ipv4RouteTargetConstraints),
        Ok(FamilyCode::new(1, 132))
    );
    assert!(families.family_for_code(FamilyCode::new(25, 70)).is_err());
}

#[test]
fn test_duplicate_extension() {
    let err = BgpExtensions::with_extensions(&[&BaseExtension, &BaseExtension]).unwrap_err();
    assert_eq!(err.extension, "bgp-base");
    assert!(matches!(
        err.error,
        RegistryError::DuplicateRegistration { ref namespace, .. } if namespace == "bgp-families"
    ));
}

#[test]
fn test_family_disabled_without_extension() {
    let extensions = BgpExtensions::with_extensions(&[&BaseExtension]).unwrap();
    // VPN-IPv4 reach with a zero length next hop and no NLRI
    let wire = [0x80, 0x0e, 0x05, 0x00, 0x01, 0x80, 0x00, 0x00];
    let expected = PathAttributes::from_parts(vec![], vec![FamilyCode::new(1, 128)], vec![]);
    test_parsed_completely_with_two_inputs(
        &wire,
        extensions.as_ref(),
        &BgpParsingContext::default(),
        &expected,
    );

    let extensions =
        BgpExtensions::with_extensions(&[&BaseExtension, &L3vpnExtension]).unwrap();
    let parsed = test_parsed_completely_with_two_inputs(
        &wire,
        extensions.as_ref(),
        &BgpParsingContext::default(),
        &PathAttributes::new(vec![PathAttribute::optional_non_transitive(
            PathAttributeValue::MpReach(crate::path_attribute::MpReach::new(
                AddressType::Ipv4MplsLabeledVpn,
                None,
                vec![],
            )),
        )]),
    );
    assert!(parsed.unsupported_families().is_empty());
}

/// Registers EVPN as a family without binding any NLRI codec to it
struct EvpnFamilyOnly;

impl Extension<BgpExtensions> for EvpnFamilyOnly {
    fn name(&self) -> &'static str {
        "evpn-family-only"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.families_mut()
            .register_family(FamilyCode::new(25, 70), AddressType::L2VpnBgpEvpn)?;
        Ok(())
    }
}

#[test]
fn test_family_without_nlri_codec() {
    let extensions =
        BgpExtensions::with_extensions(&[&BaseExtension, &EvpnFamilyOnly]).unwrap();
    let wire = [0x80, 0x0f, 0x03, 0x00, 0x19, 0x46];
    let expected = LocatedPathAttributeParsingError::new(
        Span::new_from_offset(3, &wire[3..]),
        PathAttributeParsingError::MpUnreachError(MpUnreachParsingError::NoNlriCodec(
            AddressType::L2VpnBgpEvpn,
        )),
    );
    test_parse_error_with_two_inputs::<PathAttributes, _, _, LocatedPathAttributeParsingError<'_>>(
        &wire,
        extensions.as_ref(),
        &BgpParsingContext::default(),
        &expected,
    );
}

/// Replaces the ORIGIN codec, which collides with the base extension
struct CustomOrigin;

impl Extension<BgpExtensions> for CustomOrigin {
    fn name(&self) -> &'static str {
        "custom-origin"
    }

    fn activate(&self, ctx: &mut BgpExtensions) -> Result<(), RegistryError> {
        ctx.attributes_mut()
            .register_parser(crate::iana::PathAttributeType::Origin.into(), parse_origin)?;
        Ok(())
    }
}

#[test]
fn test_extension_collision_on_attribute() {
    let err = BgpExtensions::with_extensions(&[&BaseExtension, &CustomOrigin]).unwrap_err();
    assert_eq!(err.extension, "custom-origin");
    assert!(matches!(
        err.error,
        RegistryError::DuplicateRegistration { ref namespace, .. }
            if namespace == "bgp-path-attributes"
    ));

    // Alone it provides ORIGIN parsing only
    let extensions = BgpExtensions::with_extensions(&[&CustomOrigin]).unwrap();
    let wire = [0x40, 0x01, 0x01, 0x01];
    test_parsed_completely_with_two_inputs(
        &wire,
        extensions.as_ref(),
        &BgpParsingContext::default(),
        &PathAttributes::new(vec![PathAttribute::well_known(PathAttributeValue::Origin(
            Origin::Egp,
        ))]),
    );
}

#[test]
fn test_extensions_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BgpExtensions>();
}
