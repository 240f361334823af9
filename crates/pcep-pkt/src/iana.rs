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

//! PCEP numbering from the IANA Path Computation Element Protocol (PCEP)
//! Numbers registry.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PcepMessageType {
    /// [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440)
    Open = 1,
    Keepalive = 2,
    PcReq = 3,
    PcRep = 4,
    PcNtf = 5,
    PcErr = 6,
    Close = 7,
    /// [RFC5886](https://datatracker.ietf.org/doc/html/rfc5886)
    PcMonReq = 8,
    PcMonRep = 9,
    /// [RFC8231](https://datatracker.ietf.org/doc/html/rfc8231)
    PcRpt = 10,
    PcUpd = 11,
    /// [RFC8281](https://datatracker.ietf.org/doc/html/rfc8281)
    PcInitiate = 12,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedPcepMessageType(pub u8);

impl From<PcepMessageType> for u8 {
    fn from(value: PcepMessageType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for PcepMessageType {
    type Error = UndefinedPcepMessageType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedPcepMessageType(value)),
        }
    }
}

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PcepObjectClass {
    Open = 1,
    RequestParameters = 2,
    NoPath = 3,
    EndPoints = 4,
    Bandwidth = 5,
    Metric = 6,
    Ero = 7,
    Rro = 8,
    Lspa = 9,
    Iro = 10,
    Svec = 11,
    Notification = 12,
    PcepError = 13,
    LoadBalancing = 14,
    Close = 15,
    /// [RFC5521](https://datatracker.ietf.org/doc/html/rfc5521)
    Xro = 17,
    /// [RFC8231](https://datatracker.ietf.org/doc/html/rfc8231)
    Lsp = 32,
    Srp = 33,
}

impl From<PcepObjectClass> for u8 {
    fn from(value: PcepObjectClass) -> Self {
        value as u8
    }
}

#[repr(u16)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PcepTlvType {
    NoPathVector = 1,
    OverloadDuration = 2,
    ReqMissing = 3,
    StatefulPceCapability = 16,
    SymbolicPathName = 17,
    /// [RFC8664](https://datatracker.ietf.org/doc/html/rfc8664#section-4.1.2)
    SrPceCapability = 26,
    PathSetupType = 28,
}

impl From<PcepTlvType> for u16 {
    fn from(value: PcepTlvType) -> Self {
        value as u16
    }
}

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EroSubobjectType {
    Ipv4Prefix = 1,
    Ipv6Prefix = 2,
    Unnumbered = 4,
    AsNumber = 32,
    /// [RFC8664](https://datatracker.ietf.org/doc/html/rfc8664#section-4.3.1)
    SrEro = 36,
}

impl From<EroSubobjectType> for u8 {
    fn from(value: EroSubobjectType) -> Self {
        value as u8
    }
}

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum XroSubobjectType {
    Ipv4Prefix = 1,
    Ipv6Prefix = 2,
    Unnumbered = 4,
    AsNumber = 32,
    Srlg = 34,
}

impl From<XroSubobjectType> for u8 {
    fn from(value: XroSubobjectType) -> Self {
        value as u8
    }
}

/// What an exclude-route subobject refers to
/// [RFC5521](https://datatracker.ietf.org/doc/html/rfc5521#section-2.1.1)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum XroAttribute {
    Interface = 0,
    Node = 1,
    Srlg = 2,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedXroAttribute(pub u8);

impl From<XroAttribute> for u8 {
    fn from(value: XroAttribute) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for XroAttribute {
    type Error = UndefinedXroAttribute;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedXroAttribute(value)),
        }
    }
}

/// Node or Adjacency Identifier type of an SR-ERO subobject
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SrNaiType {
    Absent = 0,
    Ipv4NodeId = 1,
    Ipv6NodeId = 2,
    Ipv4Adjacency = 3,
    Ipv6Adjacency = 4,
    UnnumberedAdjacency = 5,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedSrNaiType(pub u8);

impl From<SrNaiType> for u8 {
    fn from(value: SrNaiType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for SrNaiType {
    type Error = UndefinedSrNaiType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedSrNaiType(value)),
        }
    }
}

/// PCEP-ERROR type 1, session establishment failure, and its values
/// [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440#section-9.12)
pub const SESSION_ESTABLISHMENT_FAILURE: u8 = 1;

#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SessionEstablishmentError {
    NonOpenReceived = 1,
    OpenWaitExpired = 2,
    UnacceptableNonNegotiable = 3,
    UnacceptableNegotiable = 4,
    SecondUnacceptableOpen = 5,
    UnacceptableSuggestion = 6,
    KeepWaitExpired = 7,
}

impl From<SessionEstablishmentError> for u8 {
    fn from(value: SessionEstablishmentError) -> Self {
        value as u8
    }
}

/// Reason field of the CLOSE object
/// [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440#section-7.17)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CloseReason {
    NoExplanation = 1,
    DeadTimerExpired = 2,
    MalformedMessage = 3,
    TooManyUnknownRequests = 4,
    TooManyUnknownMessages = 5,
}

impl From<CloseReason> for u8 {
    fn from(value: CloseReason) -> Self {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type() {
        assert_eq!(PcepMessageType::try_from(10), Ok(PcepMessageType::PcRpt));
        assert_eq!(
            PcepMessageType::try_from(13),
            Err(UndefinedPcepMessageType(13))
        );
        assert_eq!(u8::from(PcepMessageType::PcErr), 6);
    }

    #[test]
    fn test_xro_attribute() {
        assert_eq!(XroAttribute::try_from(2), Ok(XroAttribute::Srlg));
        assert_eq!(XroAttribute::try_from(3), Err(UndefinedXroAttribute(3)));
    }

    #[test]
    fn test_nai_type() {
        assert_eq!(SrNaiType::try_from(5), Ok(SrNaiType::UnnumberedAdjacency));
        assert_eq!(SrNaiType::try_from(6), Err(UndefinedSrNaiType(6)));
    }
}
