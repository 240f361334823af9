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

pub mod deserializer;
pub mod serializer;

#[cfg(test)]
mod tests;

pub(crate) const PCEP_VERSION: u8 = 1;
pub(crate) const MESSAGE_HEADER_LENGTH: usize = 4;
pub(crate) const OBJECT_HEADER_LENGTH: usize = 4;

/// Message header: version in the top three bits, flags in the rest
pub(crate) const MESSAGE_VERSION_SHIFT: u8 = 5;

/// Object header flags, sharing an octet with the object type
pub(crate) const OBJECT_TYPE_SHIFT: u8 = 4;
pub(crate) const PROCESSING_RULE_MASK: u8 = 0x02;
pub(crate) const IGNORE_MASK: u8 = 0x01;

/// OPEN object: version in the top three bits of the first octet
pub(crate) const OPEN_VERSION_SHIFT: u8 = 5;

/// XRO flags
pub(crate) const XRO_FAIL_MASK: u16 = 0x0001;

/// SR-PCE-CAPABILITY flags
pub(crate) const SR_CAPABILITY_N_MASK: u8 = 0x02;
pub(crate) const SR_CAPABILITY_X_MASK: u8 = 0x01;
pub(crate) const SR_CAPABILITY_LENGTH: usize = 4;

/// SR-ERO: NT in the top four bits, then twelve bits of flags
pub(crate) const SR_ERO_NT_SHIFT: u16 = 12;
pub(crate) const SR_ERO_FLAGS_MASK: u16 = 0x0fff;
pub(crate) const SR_ERO_F_MASK: u16 = 0x0008;
pub(crate) const SR_ERO_S_MASK: u16 = 0x0004;
pub(crate) const SR_ERO_C_MASK: u16 = 0x0002;
pub(crate) const SR_ERO_M_MASK: u16 = 0x0001;

pub(crate) const IPV4_PREFIX_SUBOBJECT_LENGTH: usize = 6;
pub(crate) const IPV6_PREFIX_SUBOBJECT_LENGTH: usize = 18;
pub(crate) const SRLG_SUBOBJECT_LENGTH: usize = 5;
