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

//! RSVP-TE exclude route subobjects
//! [RFC4874](https://datatracker.ietf.org/doc/html/rfc4874).
//!
//! The IP prefix entries look the same as their PCEP counterparts, but the
//! SRLG entry carries an extra reserved octet, so RSVP keeps its own
//! [RsvpExtensions] table.
//!
//! ```rust
//! use pathwire_parse_utils::Span;
//! use pathwire_rsvp_pkt::{
//!     subobjects::XroSubobjectValue, wire::deserializer::parse_xro_subobjects, RsvpExtensions,
//! };
//!
//! let extensions = RsvpExtensions::standard().unwrap();
//! let srlg = [0xa2, 0x08, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x02];
//! let (_, subobjects) = parse_xro_subobjects(Span::new(&srlg), &extensions).unwrap();
//! assert_eq!(subobjects[0].value(), &XroSubobjectValue::Srlg(42));
//! ```

pub mod extensions;
pub mod iana;
pub mod subobjects;
pub mod wire;

pub use extensions::RsvpExtensions;
