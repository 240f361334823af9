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

//! Type-length envelopes shared by every subobject and TLV codec, so header
//! emission is identical across all of them.
//!
//! Subobjects (RSVP ERO/XRO, PCEP ERO/XRO):
//!
//! ```text
//!  0                   1
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+----------------//
//! |F|    Type     |     Length    | (Subobject contents)
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+----------------//
//! ```
//!
//! `Length` covers the two header bytes. `F` is the loose bit in an ERO and
//! the mandatory bit in an XRO.
//!
//! TLVs (PCEP):
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |             Type              |             Length            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! //                   Value (padded to 4 bytes)                 //
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! `Length` covers the value only, without header or padding.

use crate::Span;
use byteorder::{NetworkEndian, WriteBytesExt};
use nom::{
    error::ParseError,
    number::complete::{be_u16, be_u8},
    IResult,
};
use std::io;

pub const SUBOBJECT_HEADER_LENGTH: usize = 2;
pub const TLV_HEADER_LENGTH: usize = 4;

const SUBOBJECT_FLAG_MASK: u8 = 0x80;
const SUBOBJECT_TYPE_MASK: u8 = 0x7f;
const TLV_ALIGNMENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubobjectHeader {
    pub flag: bool,
    pub code: u8,
    pub length: u8,
}

impl SubobjectHeader {
    /// Number of content bytes following the header, `None` if the declared
    /// length can't even hold the header.
    pub const fn body_length(&self) -> Option<usize> {
        (self.length as usize).checked_sub(SUBOBJECT_HEADER_LENGTH)
    }
}

pub fn parse_subobject_header<'a, E: ParseError<Span<'a>>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, SubobjectHeader, E> {
    let (buf, first) = be_u8(buf)?;
    let (buf, length) = be_u8(buf)?;
    Ok((
        buf,
        SubobjectHeader {
            flag: first & SUBOBJECT_FLAG_MASK == SUBOBJECT_FLAG_MASK,
            code: first & SUBOBJECT_TYPE_MASK,
            length,
        },
    ))
}

/// Write a complete subobject: header computed from `body`, then `body`.
pub fn format_subobject<W: io::Write + ?Sized>(
    writer: &mut W,
    code: u8,
    flag: bool,
    body: &[u8],
) -> io::Result<()> {
    let length = body.len() + SUBOBJECT_HEADER_LENGTH;
    if length > u8::MAX as usize || code > SUBOBJECT_TYPE_MASK {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("subobject type {code} with {length} bytes doesn't fit its header"),
        ));
    }
    let first = if flag { code | SUBOBJECT_FLAG_MASK } else { code };
    writer.write_u8(first)?;
    writer.write_u8(length as u8)?;
    writer.write_all(body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvHeader {
    pub code: u16,
    pub length: u16,
}

pub fn parse_tlv_header<'a, E: ParseError<Span<'a>>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, TlvHeader, E> {
    let (buf, code) = be_u16(buf)?;
    let (buf, length) = be_u16(buf)?;
    Ok((buf, TlvHeader { code, length }))
}

/// Number of zero bytes that follow a TLV value of `length` bytes
#[inline]
pub const fn tlv_padding(length: usize) -> usize {
    (TLV_ALIGNMENT - length % TLV_ALIGNMENT) % TLV_ALIGNMENT
}

/// Write a complete TLV: header, `value`, then padding to a 4-byte boundary.
pub fn format_tlv<W: io::Write + ?Sized>(
    writer: &mut W,
    code: u16,
    value: &[u8],
) -> io::Result<()> {
    if value.len() > u16::MAX as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("TLV type {code} value of {} bytes is too long", value.len()),
        ));
    }
    writer.write_u16::<NetworkEndian>(code)?;
    writer.write_u16::<NetworkEndian>(value.len() as u16)?;
    writer.write_all(value)?;
    for _ in 0..tlv_padding(value.len()) {
        writer.write_u8(0)?;
    }
    Ok(())
}

/// Encoded size of a TLV with a value of `length` bytes, padding included
#[inline]
pub const fn tlv_length(length: usize) -> usize {
    TLV_HEADER_LENGTH + length + tlv_padding(length)
}
