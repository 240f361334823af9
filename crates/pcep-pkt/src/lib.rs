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

//! PCEP [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440) messages,
//! objects, TLVs and route subobjects.
//!
//! As with BGP, objects, TLVs and subobjects are decoded through a
//! [PcepExtensions] table built once from a list of extensions:
//!
//! ```rust
//! use pathwire_pcep_pkt::{PcepExtensions, PcepMessage};
//! use pathwire_parse_utils::{ReadablePduWithOneInput, Span};
//!
//! let extensions = PcepExtensions::standard().unwrap();
//! let keepalive = [0x20, 0x02, 0x00, 0x04];
//! let (_, msg) = PcepMessage::from_wire(Span::new(&keepalive), extensions.as_ref()).unwrap();
//! assert_eq!(msg, PcepMessage::Keepalive);
//! ```

pub mod codec;
pub mod extensions;
pub mod iana;
pub mod objects;
pub mod subobjects;
pub mod tlvs;
pub mod wire;

pub use extensions::PcepExtensions;

use crate::{
    iana::PcepMessageType,
    objects::{CloseObject, OpenObject, PcepErrorObject, PcepObject},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PcepMessage {
    Open(OpenObject),
    Keepalive,
    Close(CloseObject),
    Error(PcepErrorMessage),
    /// Request, reply, notification and the stateful messages, kept as their
    /// list of objects
    Objects(PcepObjectsMessage),
    /// Message type this crate has no notion of
    Unrecognized(UnrecognizedMessage),
}

impl PcepMessage {
    /// Message type code as written in the common header
    pub fn message_type(&self) -> u8 {
        match self {
            Self::Open(_) => PcepMessageType::Open.into(),
            Self::Keepalive => PcepMessageType::Keepalive.into(),
            Self::Close(_) => PcepMessageType::Close.into(),
            Self::Error(_) => PcepMessageType::PcErr.into(),
            Self::Objects(message) => message.message_type().into(),
            Self::Unrecognized(unrecognized) => unrecognized.message_type(),
        }
    }
}

/// PCErr, one or more PCEP-ERROR objects optionally followed by an OPEN
/// object carrying acceptable session parameters.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PcepErrorMessage {
    errors: Vec<PcepErrorObject>,
    open: Option<OpenObject>,
}

impl PcepErrorMessage {
    pub const fn new(errors: Vec<PcepErrorObject>, open: Option<OpenObject>) -> Self {
        Self { errors, open }
    }

    pub const fn errors(&self) -> &Vec<PcepErrorObject> {
        &self.errors
    }

    pub const fn open(&self) -> Option<&OpenObject> {
        self.open.as_ref()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PcepObjectsMessage {
    message_type: PcepMessageType,
    objects: Vec<PcepObject>,
}

impl PcepObjectsMessage {
    pub const fn new(message_type: PcepMessageType, objects: Vec<PcepObject>) -> Self {
        Self {
            message_type,
            objects,
        }
    }

    pub const fn message_type(&self) -> PcepMessageType {
        self.message_type
    }

    pub const fn objects(&self) -> &Vec<PcepObject> {
        &self.objects
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedMessage {
    message_type: u8,
    body: Vec<u8>,
}

impl UnrecognizedMessage {
    pub const fn new(message_type: u8, body: Vec<u8>) -> Self {
        Self { message_type, body }
    }

    pub const fn message_type(&self) -> u8 {
        self.message_type
    }

    pub const fn body(&self) -> &Vec<u8> {
        &self.body
    }
}
