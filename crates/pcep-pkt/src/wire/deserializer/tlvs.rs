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
    extensions::PcepExtensions,
    iana::PcepTlvType,
    tlvs::{PcepTlv, SrPceCapability},
    wire::{SR_CAPABILITY_LENGTH, SR_CAPABILITY_N_MASK, SR_CAPABILITY_X_MASK},
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u8},
    IResult,
};
use pathwire_parse_utils::{
    envelope::{parse_tlv_header, tlv_padding},
    ErrorKindSerdeDeref, Span,
};
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PcepTlvParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    MalformedTlv {
        code: u16,
        expected: usize,
        found: usize,
    },
}

/// TLV parsers bound in [PcepExtensions], given the TLV value only
pub fn parse_sr_pce_capability(
    buf: Span<'_>,
) -> IResult<Span<'_>, PcepTlv, LocatedPcepTlvParsingError<'_>> {
    if buf.len() != SR_CAPABILITY_LENGTH {
        return Err(nom::Err::Error(LocatedPcepTlvParsingError::new(
            buf,
            PcepTlvParsingError::MalformedTlv {
                code: PcepTlvType::SrPceCapability.into(),
                expected: SR_CAPABILITY_LENGTH,
                found: buf.len(),
            },
        )));
    }
    let (buf, _reserved) = be_u16(buf)?;
    let (buf, flags) = be_u8(buf)?;
    let (buf, msd) = be_u8(buf)?;
    Ok((
        buf,
        PcepTlv::SrPceCapability(SrPceCapability::new(
            flags & SR_CAPABILITY_N_MASK == SR_CAPABILITY_N_MASK,
            flags & SR_CAPABILITY_X_MASK == SR_CAPABILITY_X_MASK,
            msd,
        )),
    ))
}

/// Parse the TLVs trailing an object body till `buf` is empty. TLVs nothing
/// is registered for are skipped.
pub fn parse_tlvs<'a>(
    buf: Span<'a>,
    extensions: &PcepExtensions,
) -> IResult<Span<'a>, Vec<PcepTlv>, LocatedPcepTlvParsingError<'a>> {
    let mut buf = buf;
    let mut tlvs = vec![];
    while !buf.is_empty() {
        let (t, header) = parse_tlv_header(buf)?;
        let (t, value) = nom::bytes::complete::take(header.length)(t)?;
        // The last TLV of an object may come without its padding
        let padding = tlv_padding(header.length as usize).min(t.len());
        let (t, _) = nom::bytes::complete::take(padding)(t)?;
        buf = t;
        let Some(parser) = extensions.tlvs().parser(&header.code) else {
            log::debug!(
                "Skipping unrecognized PCEP TLV {} of {} bytes",
                header.code,
                header.length
            );
            continue;
        };
        let (_, tlv) = parser(value)?;
        tlvs.push(tlv);
    }
    Ok((buf, tlvs))
}
