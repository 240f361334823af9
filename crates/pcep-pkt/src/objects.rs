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

//! PCEP objects [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440#section-7.2)
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Object-Class  |   OT  |Res|P|I|   Object Length (bytes)       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! //                        (Object body)                        //
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use crate::{
    iana::PcepObjectClass,
    subobjects::{EroSubobject, XroSubobject},
    tlvs::{PcepTlv, SrPceCapability},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object-Class and Object-Type, the key objects are parsed by
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ObjectCode {
    class: u8,
    object_type: u8,
}

impl ObjectCode {
    pub const fn new(class: u8, object_type: u8) -> Self {
        Self { class, object_type }
    }

    pub const fn class(&self) -> u8 {
        self.class
    }

    pub const fn object_type(&self) -> u8 {
        self.object_type
    }
}

impl fmt::Display for ObjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.object_type)
    }
}

pub const OPEN_OBJECT: ObjectCode = ObjectCode::new(PcepObjectClass::Open as u8, 1);
pub const ERO_OBJECT: ObjectCode = ObjectCode::new(PcepObjectClass::Ero as u8, 1);
pub const PCEP_ERROR_OBJECT: ObjectCode = ObjectCode::new(PcepObjectClass::PcepError as u8, 1);
pub const CLOSE_OBJECT: ObjectCode = ObjectCode::new(PcepObjectClass::Close as u8, 1);
pub const XRO_OBJECT: ObjectCode = ObjectCode::new(PcepObjectClass::Xro as u8, 1);

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PcepObject {
    processing_rule: bool,
    ignore: bool,
    value: PcepObjectValue,
}

impl PcepObject {
    pub const fn new(processing_rule: bool, ignore: bool, value: PcepObjectValue) -> Self {
        Self {
            processing_rule,
            ignore,
            value,
        }
    }

    /// Object without the P and I flags set
    pub const fn plain(value: PcepObjectValue) -> Self {
        Self::new(false, false, value)
    }

    /// P flag, the object must be taken into account by the PCE
    pub const fn processing_rule(&self) -> bool {
        self.processing_rule
    }

    /// I flag, the PCE ignored the object
    pub const fn ignore(&self) -> bool {
        self.ignore
    }

    pub const fn value(&self) -> &PcepObjectValue {
        &self.value
    }

    pub fn into_value(self) -> PcepObjectValue {
        self.value
    }
}

#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(PcepObjectKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum PcepObjectValue {
    Open(OpenObject),
    Ero(Ero),
    PcepError(PcepErrorObject),
    Close(CloseObject),
    Xro(Xro),
    /// Object nothing is registered for and that isn't flagged for
    /// processing
    Unrecognized(UnrecognizedObject),
}

impl PcepObjectValue {
    pub fn kind(&self) -> PcepObjectKind {
        PcepObjectKind::from(self)
    }

    pub const fn code(&self) -> ObjectCode {
        match self {
            Self::Open(_) => OPEN_OBJECT,
            Self::Ero(_) => ERO_OBJECT,
            Self::PcepError(_) => PCEP_ERROR_OBJECT,
            Self::Close(_) => CLOSE_OBJECT,
            Self::Xro(_) => XRO_OBJECT,
            Self::Unrecognized(value) => value.code,
        }
    }
}

/// OPEN object, carries the session proposal
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Ver |   Flags |   Keepalive   |  DeadTimer    |      SID      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// //                       Optional TLVs                         //
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Timers are in seconds, a zero keepalive disables keepalives and a zero
/// dead timer disables liveness detection.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct OpenObject {
    keepalive: u8,
    dead_timer: u8,
    session_id: u8,
    tlvs: Vec<PcepTlv>,
}

impl OpenObject {
    pub const fn new(keepalive: u8, dead_timer: u8, session_id: u8, tlvs: Vec<PcepTlv>) -> Self {
        Self {
            keepalive,
            dead_timer,
            session_id,
            tlvs,
        }
    }

    pub const fn keepalive(&self) -> u8 {
        self.keepalive
    }

    pub const fn dead_timer(&self) -> u8 {
        self.dead_timer
    }

    pub const fn session_id(&self) -> u8 {
        self.session_id
    }

    pub const fn tlvs(&self) -> &Vec<PcepTlv> {
        &self.tlvs
    }

    pub fn sr_capability(&self) -> Option<&SrPceCapability> {
        self.tlvs.iter().find_map(|tlv| match tlv {
            PcepTlv::SrPceCapability(value) => Some(value),
        })
    }
}

/// PCEP-ERROR object
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   Reserved    |      Flags    |   Error-Type  |  Error-value  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// //                     Optional TLVs                           //
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PcepErrorObject {
    error_type: u8,
    error_value: u8,
    tlvs: Vec<PcepTlv>,
}

impl PcepErrorObject {
    pub const fn new(error_type: u8, error_value: u8, tlvs: Vec<PcepTlv>) -> Self {
        Self {
            error_type,
            error_value,
            tlvs,
        }
    }

    pub const fn error_type(&self) -> u8 {
        self.error_type
    }

    pub const fn error_value(&self) -> u8 {
        self.error_value
    }

    pub const fn tlvs(&self) -> &Vec<PcepTlv> {
        &self.tlvs
    }
}

/// CLOSE object
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Reserved             |      Flags    |    Reason     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// //                         Optional TLVs                       //
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CloseObject {
    reason: u8,
    tlvs: Vec<PcepTlv>,
}

impl CloseObject {
    pub const fn new(reason: u8, tlvs: Vec<PcepTlv>) -> Self {
        Self { reason, tlvs }
    }

    pub const fn reason(&self) -> u8 {
        self.reason
    }

    pub const fn tlvs(&self) -> &Vec<PcepTlv> {
        &self.tlvs
    }
}

/// Explicit Route Object
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ero {
    subobjects: Vec<EroSubobject>,
}

impl Ero {
    pub const fn new(subobjects: Vec<EroSubobject>) -> Self {
        Self { subobjects }
    }

    pub const fn subobjects(&self) -> &Vec<EroSubobject> {
        &self.subobjects
    }
}

/// Exclude Route Object [RFC5521](https://datatracker.ietf.org/doc/html/rfc5521#section-2.1)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Reserved            |             Flags           |F|
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// //                        (Subobjects)                         //
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Xro {
    fail: bool,
    subobjects: Vec<XroSubobject>,
}

impl Xro {
    pub const fn new(fail: bool, subobjects: Vec<XroSubobject>) -> Self {
        Self { fail, subobjects }
    }

    /// F flag, the route being replaced must be excluded too
    pub const fn fail(&self) -> bool {
        self.fail
    }

    pub const fn subobjects(&self) -> &Vec<XroSubobject> {
        &self.subobjects
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UnrecognizedObject {
    code: ObjectCode,
    body: Vec<u8>,
}

impl UnrecognizedObject {
    pub const fn new(code: ObjectCode, body: Vec<u8>) -> Self {
        Self { code, body }
    }

    pub const fn code(&self) -> ObjectCode {
        self.code
    }

    pub const fn body(&self) -> &Vec<u8> {
        &self.body
    }
}
