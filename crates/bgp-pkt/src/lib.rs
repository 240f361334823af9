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

//! BGP-4 building blocks: NLRI, path attributes, capabilities and optional
//! parameters.
//!
//! Codecs are looked up in a [BgpExtensions] registry that is populated once
//! by activating extensions, then shared read-only:
//!
//! ```rust
//! use pathwire_bgp_pkt::{wire::deserializer::BgpParsingContext, BgpExtensions, PathAttributes};
//! use pathwire_parse_utils::{ReadablePduWithTwoInputs, Span};
//!
//! let extensions = BgpExtensions::standard().unwrap();
//! let ctx = BgpParsingContext::default();
//! // ORIGIN IGP
//! let buf = [0x40, 0x01, 0x01, 0x00];
//! let (_, attributes) =
//!     PathAttributes::from_wire(Span::new(&buf), extensions.as_ref(), &ctx).unwrap();
//! assert_eq!(attributes.attributes().len(), 1);
//! ```

pub mod capabilities;
pub mod extensions;
pub mod iana;
pub mod nlri;
pub mod path_attribute;
pub mod wire;

pub use extensions::BgpExtensions;
pub use path_attribute::PathAttributes;
