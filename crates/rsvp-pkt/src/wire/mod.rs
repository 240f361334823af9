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

pub(crate) const IPV4_PREFIX_SUBOBJECT_LENGTH: usize = 6;
pub(crate) const IPV6_PREFIX_SUBOBJECT_LENGTH: usize = 18;
/// SRLG id, a reserved octet, then the attribute
pub(crate) const SRLG_SUBOBJECT_LENGTH: usize = 6;
