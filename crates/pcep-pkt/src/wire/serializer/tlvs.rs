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
    iana::PcepTlvType,
    tlvs::PcepTlv,
    wire::{SR_CAPABILITY_N_MASK, SR_CAPABILITY_X_MASK},
};
use pathwire_parse_utils::envelope::format_tlv;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum PcepTlvWritingError {
    StdIOError(#[from_std_io_error] String),
}

/// TLV serializers bound in [crate::PcepExtensions], they write the whole
/// TLV including header and padding.
pub fn write_sr_pce_capability(
    tlv: &PcepTlv,
    writer: &mut dyn Write,
) -> Result<(), PcepTlvWritingError> {
    match tlv {
        PcepTlv::SrPceCapability(capability) => {
            let mut flags = 0;
            if capability.n_flag() {
                flags |= SR_CAPABILITY_N_MASK;
            }
            if capability.x_flag() {
                flags |= SR_CAPABILITY_X_MASK;
            }
            format_tlv(
                writer,
                PcepTlvType::SrPceCapability.into(),
                &[0, 0, flags, capability.msd()],
            )?;
            Ok(())
        }
    }
}
