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

//! TLVs carried at the end of PCEP objects

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, strum_macros::EnumDiscriminants,
)]
#[strum_discriminants(name(PcepTlvKind))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum PcepTlv {
    SrPceCapability(SrPceCapability),
}

impl PcepTlv {
    pub fn kind(&self) -> PcepTlvKind {
        PcepTlvKind::from(self)
    }
}

/// SR-PCE-CAPABILITY [RFC8664](https://datatracker.ietf.org/doc/html/rfc8664#section-4.1.2)
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            Reserved           |   Flags   |N|X|      MSD      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SrPceCapability {
    n_flag: bool,
    x_flag: bool,
    msd: u8,
}

impl SrPceCapability {
    pub const fn new(n_flag: bool, x_flag: bool, msd: u8) -> Self {
        Self {
            n_flag,
            x_flag,
            msd,
        }
    }

    /// The PCC is capable of resolving a NAI to a SID
    pub const fn n_flag(&self) -> bool {
        self.n_flag
    }

    /// No limit on the maximum SID depth, `msd` is then meaningless
    pub const fn x_flag(&self) -> bool {
        self.x_flag
    }

    pub const fn msd(&self) -> u8 {
        self.msd
    }
}
