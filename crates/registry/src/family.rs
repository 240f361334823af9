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
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, hash::Hash};

/// On-wire identification of a routing information family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyCode {
    afi: u16,
    safi: u8,
}

impl FamilyCode {
    pub const fn new(afi: u16, safi: u8) -> Self {
        Self { afi, safi }
    }

    pub const fn afi(&self) -> u16 {
        self.afi
    }

    pub const fn safi(&self) -> u8 {
        self.safi
    }
}

impl fmt::Display for FamilyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.afi, self.safi)
    }
}

/// The family isn't supported by this registry. Callers skip the family
/// rather than abort the enclosing message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownFamily {
    #[error("no family registered for code {0}")]
    Code(FamilyCode),

    #[error("no code registered for family {0}")]
    Tag(String),
}

/// Handle returned by [FamilyRegistry::register_family], releasing it removes
/// that single mapping.
#[derive(Debug, PartialEq, Eq)]
pub struct FamilyRegistration<T> {
    code: FamilyCode,
    tag: T,
}

impl<T: Copy> FamilyRegistration<T> {
    pub const fn code(&self) -> FamilyCode {
        self.code
    }

    pub const fn tag(&self) -> T {
        self.tag
    }
}

/// Bijection between [FamilyCode]s and family tags
#[derive(Debug, Clone)]
pub struct FamilyRegistry<T> {
    namespace: &'static str,
    by_code: HashMap<FamilyCode, T>,
    by_tag: HashMap<T, FamilyCode>,
}

impl<T: Copy + Eq + Hash + fmt::Debug> FamilyRegistry<T> {
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            by_code: HashMap::new(),
            by_tag: HashMap::new(),
        }
    }

    pub const fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Fails without touching the registry if either the code or the tag is
    /// already taken.
    pub fn register_family(
        &mut self,
        code: FamilyCode,
        tag: T,
    ) -> Result<FamilyRegistration<T>, RegistryError> {
        if self.by_code.contains_key(&code) {
            return Err(RegistryError::duplicate(self.namespace, code));
        }
        if self.by_tag.contains_key(&tag) {
            return Err(RegistryError::duplicate(self.namespace, tag));
        }
        self.by_code.insert(code, tag);
        self.by_tag.insert(tag, code);
        Ok(FamilyRegistration { code, tag })
    }

    pub fn family_for_code(&self, code: FamilyCode) -> Result<T, UnknownFamily> {
        self.by_code
            .get(&code)
            .copied()
            .ok_or(UnknownFamily::Code(code))
    }

    pub fn code_for_family(&self, tag: T) -> Result<FamilyCode, UnknownFamily> {
        self.by_tag
            .get(&tag)
            .copied()
            .ok_or_else(|| UnknownFamily::Tag(format!("{tag:?}")))
    }

    /// Remove the mapping created by `registration`. Returns `false` if the
    /// mapping was already gone.
    pub fn release(&mut self, registration: FamilyRegistration<T>) -> bool {
        match self.by_code.get(&registration.code) {
            Some(tag) if *tag == registration.tag => {
                self.by_code.remove(&registration.code);
                self.by_tag.remove(&registration.tag);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FamilyCode, &T)> {
        self.by_code.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwire_iana::address_family::AddressType;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FamilyRegistry::new("bgp");
        registry
            .register_family(FamilyCode::new(1, 1), AddressType::Ipv4Unicast)
            .unwrap();
        registry
            .register_family(FamilyCode::new(2, 128), AddressType::Ipv6MplsLabeledVpn)
            .unwrap();

        assert_eq!(
            registry.family_for_code(FamilyCode::new(2, 128)),
            Ok(AddressType::Ipv6MplsLabeledVpn)
        );
        assert_eq!(
            registry.code_for_family(AddressType::Ipv4Unicast),
            Ok(FamilyCode::new(1, 1))
        );
        assert_eq!(
            registry.family_for_code(FamilyCode::new(2, 1)),
            Err(UnknownFamily::Code(FamilyCode::new(2, 1)))
        );
        assert_eq!(
            registry.code_for_family(AddressType::Ipv6Unicast),
            Err(UnknownFamily::Tag("Ipv6Unicast".to_string()))
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_in_either_direction() {
        let mut registry = FamilyRegistry::new("bgp");
        registry
            .register_family(FamilyCode::new(1, 1), AddressType::Ipv4Unicast)
            .unwrap();

        let same_code = registry.register_family(FamilyCode::new(1, 1), AddressType::Ipv6Unicast);
        assert_eq!(
            same_code,
            Err(RegistryError::DuplicateRegistration {
                namespace: "bgp".to_string(),
                key: "FamilyCode { afi: 1, safi: 1 }".to_string(),
            })
        );
        let same_tag = registry.register_family(FamilyCode::new(1, 2), AddressType::Ipv4Unicast);
        assert!(same_tag.is_err());

        // Failed registrations leave no half-installed direction behind
        assert_eq!(registry.len(), 1);
        assert!(registry
            .code_for_family(AddressType::Ipv6Unicast)
            .is_err());
        assert!(registry.family_for_code(FamilyCode::new(1, 2)).is_err());
    }

    #[test]
    fn test_release() {
        let mut registry = FamilyRegistry::new("bgp");
        let registration = registry
            .register_family(FamilyCode::new(1, 4), AddressType::Ipv4NlriMplsLabels)
            .unwrap();
        assert_eq!(registration.code(), FamilyCode::new(1, 4));
        assert!(registry.release(registration));
        assert!(registry.is_empty());
        assert!(registry
            .code_for_family(AddressType::Ipv4NlriMplsLabels)
            .is_err());

        // The code can be bound again once released
        let registration = registry
            .register_family(FamilyCode::new(1, 4), AddressType::Ipv4NlriMplsLabels)
            .unwrap();
        assert!(registry.release(registration));
    }

    #[test]
    fn test_display() {
        assert_eq!(FamilyCode::new(2, 128).to_string(), "2/128");
    }
}
