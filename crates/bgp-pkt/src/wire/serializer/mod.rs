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

//! Serializer library for BGP's wire protocol

pub mod capabilities;
pub mod nlri;
pub mod path_attribute;

use crate::wire::deserializer::prefix_octets;
use byteorder::WriteBytesExt;
use ipnet::{Ipv4Net, Ipv6Net};
use pathwire_parse_utils::WritablePdu;
use pathwire_serde_macros::WritingError;
use std::io::Write;

/// Writes only the octets a prefix of `prefix_len` bits occupies
#[inline]
pub(crate) fn write_prefix_octets<T: Write + ?Sized>(
    writer: &mut T,
    octets: &[u8],
    prefix_len: u8,
) -> std::io::Result<()> {
    writer.write_all(&octets[..prefix_octets(prefix_len).min(octets.len())])
}

/// Run `write` against a scratch buffer to learn how many bytes it emits
#[inline]
pub(crate) fn written_len<E>(write: impl FnOnce(&mut Vec<u8>) -> Result<(), E>) -> usize {
    let mut buf = Vec::new();
    match write(&mut buf) {
        Ok(()) => buf.len(),
        Err(_) => 0,
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum Ipv4PrefixWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<Ipv4PrefixWritingError> for Ipv4Net {
    /// 1-octet prefix length
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + prefix_octets(self.prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), Ipv4PrefixWritingError> {
        writer.write_u8(self.prefix_len())?;
        write_prefix_octets(writer, &self.addr().octets(), self.prefix_len())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum Ipv6PrefixWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<Ipv6PrefixWritingError> for Ipv6Net {
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + prefix_octets(self.prefix_len())
    }

    fn write<T: Write + ?Sized>(&self, writer: &mut T) -> Result<(), Ipv6PrefixWritingError> {
        writer.write_u8(self.prefix_len())?;
        write_prefix_octets(writer, &self.addr().octets(), self.prefix_len())?;
        Ok(())
    }
}
