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

//! Registries shared by the protocol crates.
//!
//! A registry is populated once at startup by activating a list of
//! [Extension]s, then wrapped in an [`std::sync::Arc`] and only read from.
//! Nothing in here is global: every codec receives the registry it should use.
//!
//! ```rust
//! use pathwire_registry::{FamilyCode, FamilyRegistry, RegistryError};
//!
//! let mut families = FamilyRegistry::new("example");
//! families.register_family(FamilyCode::new(1, 1), "ipv4-unicast").unwrap();
//! assert_eq!(families.family_for_code(FamilyCode::new(1, 1)), Ok("ipv4-unicast"));
//! assert!(matches!(
//!     families.register_family(FamilyCode::new(2, 1), "ipv4-unicast"),
//!     Err(RegistryError::DuplicateRegistration { .. })
//! ));
//! ```

#![deny(missing_debug_implementations)]
#![deny(rust_2018_idioms)]
#![deny(unreachable_pub)]
#![forbid(unsafe_code)]

mod codec;
mod extension;
mod family;

pub use codec::{CodecRegistry, ParserRegistration, SerializerRegistration};
pub use extension::{activate_extensions, ActivationError, Extension};
pub use family::{FamilyCode, FamilyRegistration, FamilyRegistry, UnknownFamily};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("duplicate registration of {key} in {namespace}")]
    DuplicateRegistration { namespace: String, key: String },
}

impl RegistryError {
    pub(crate) fn duplicate(namespace: &str, key: impl std::fmt::Debug) -> Self {
        Self::DuplicateRegistration {
            namespace: namespace.to_string(),
            key: format!("{key:?}"),
        }
    }
}
