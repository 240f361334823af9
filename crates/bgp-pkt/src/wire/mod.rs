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

pub(crate) const IPV4_LEN: u8 = 4;
pub(crate) const IPV6_LEN: u8 = 16;
pub(crate) const IPV6_WITH_LINK_LOCAL_LEN: u8 = 32;
pub(crate) const RD_LEN: u8 = 8;
pub(crate) const MPLS_LABEL_LEN: u8 = 3;
pub(crate) const MPLS_LABEL_LEN_BITS: u8 = 24;
pub(crate) const VPN_IPV4_NEXT_HOP_LEN: u8 = RD_LEN + IPV4_LEN;
pub(crate) const VPN_IPV6_NEXT_HOP_LEN: u8 = RD_LEN + IPV6_LEN;
pub(crate) const VPN_IPV6_WITH_LINK_LOCAL_NEXT_HOP_LEN: u8 = 2 * (RD_LEN + IPV6_LEN);

/// Path attribute flags
pub(crate) const OPTIONAL_PATH_ATTRIBUTE_MASK: u8 = 0x80;
pub(crate) const TRANSITIVE_PATH_ATTRIBUTE_MASK: u8 = 0x40;
pub(crate) const PARTIAL_PATH_ATTRIBUTE_MASK: u8 = 0x20;
pub(crate) const EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK: u8 = 0x10;
