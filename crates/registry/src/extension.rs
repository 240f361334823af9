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

use crate::RegistryError;

/// A protocol extension contributing codecs and families to a context `Ctx`,
/// usually the protocol's set of sub-registries.
pub trait Extension<Ctx> {
    fn name(&self) -> &'static str;

    fn activate(&self, ctx: &mut Ctx) -> Result<(), RegistryError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("extension `{extension}` failed to activate: {error}")]
pub struct ActivationError {
    pub extension: &'static str,
    #[source]
    pub error: RegistryError,
}

/// Activate `extensions` in order, stopping at the first collision.
pub fn activate_extensions<Ctx>(
    ctx: &mut Ctx,
    extensions: &[&dyn Extension<Ctx>],
) -> Result<(), ActivationError> {
    for extension in extensions {
        extension.activate(ctx).map_err(|error| {
            log::error!("Failed to activate extension `{}`: {error}", extension.name());
            ActivationError {
                extension: extension.name(),
                error,
            }
        })?;
        log::info!("Activated extension `{}`", extension.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FamilyCode, FamilyRegistry};

    struct Ipv4;
    struct AnotherIpv4;

    impl Extension<FamilyRegistry<&'static str>> for Ipv4 {
        fn name(&self) -> &'static str {
            "ipv4"
        }

        fn activate(&self, ctx: &mut FamilyRegistry<&'static str>) -> Result<(), RegistryError> {
            ctx.register_family(FamilyCode::new(1, 1), "ipv4-unicast")?;
            Ok(())
        }
    }

    impl Extension<FamilyRegistry<&'static str>> for AnotherIpv4 {
        fn name(&self) -> &'static str {
            "another-ipv4"
        }

        fn activate(&self, ctx: &mut FamilyRegistry<&'static str>) -> Result<(), RegistryError> {
            ctx.register_family(FamilyCode::new(1, 1), "other-unicast")?;
            Ok(())
        }
    }

    #[test_log::test]
    fn test_activation_fails_fast_on_collision() {
        let mut families: FamilyRegistry<&'static str> = FamilyRegistry::new("test");
        let ret = activate_extensions(&mut families, &[&Ipv4, &AnotherIpv4]);
        assert_eq!(
            ret,
            Err(ActivationError {
                extension: "another-ipv4",
                error: RegistryError::DuplicateRegistration {
                    namespace: "test".to_string(),
                    key: "FamilyCode { afi: 1, safi: 1 }".to_string(),
                },
            })
        );
        assert_eq!(
            families.family_for_code(FamilyCode::new(1, 1)),
            Ok("ipv4-unicast")
        );
    }

    #[test_log::test]
    fn test_activation() {
        let mut families: FamilyRegistry<&'static str> = FamilyRegistry::new("test");
        activate_extensions(&mut families, &[&Ipv4]).unwrap();
        assert_eq!(families.len(), 1);
    }
}
