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

//! Traits and helpers for reading and writing binary routing protocols

pub mod envelope;
mod span;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use span::Span;

use nom::IResult;
use std::fmt::Debug;

/// Readable Protocol Data Unit that doesn't need any external input while
/// parsing the packet.
pub trait ReadablePdu<'a, Error: Debug> {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, Error>
    where
        Self: Sized;
}

/// Readable Protocol Data Unit that needs one external input, typically the
/// codec registry used to resolve nested types.
pub trait ReadablePduWithOneInput<'a, T, Error> {
    fn from_wire(buf: Span<'a>, input: T) -> IResult<Span<'a>, Self, Error>
    where
        Self: Sized;
}

/// Readable Protocol Data Unit that needs two external inputs
pub trait ReadablePduWithTwoInputs<'a, T, U, Error> {
    fn from_wire(buf: Span<'a>, input1: T, input2: U) -> IResult<Span<'a>, Self, Error>
    where
        Self: Sized;
}

/// Writable Protocol Data Unit that doesn't need any external input while
/// writing the packet.
#[allow(clippy::len_without_is_empty)]
pub trait WritablePdu<Error> {
    const BASE_LENGTH: usize;

    /// The total number of bytes [`Self::write`] emits.
    fn len(&self) -> usize;

    fn write<T: std::io::Write + ?Sized>(&self, writer: &mut T) -> Result<(), Error>
    where
        Self: Sized;
}

/// Writable Protocol Data Unit that needs one external input while writing
#[allow(clippy::len_without_is_empty)]
pub trait WritablePduWithOneInput<I, Error> {
    const BASE_LENGTH: usize;

    /// The total number of bytes [`Self::write`] emits.
    fn len(&self, input: I) -> usize;

    fn write<T: std::io::Write + ?Sized>(&self, writer: &mut T, input: I) -> Result<(), Error>
    where
        Self: Sized;
}

/// Parsing error that remembers the [`Span`] where it occurred. The offset of
/// the span should point, as close as possible, to the first byte that
/// couldn't be parsed.
pub trait LocatedParsingError {
    type Span;
    type Error;

    fn span(&self) -> &Self::Span;
    fn error(&self) -> &Self::Error;
}

#[inline]
fn lift_error<Lin, L: From<Lin>>(err: nom::Err<Lin>) -> nom::Err<L> {
    match err {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(error) => nom::Err::Error(error.into()),
        nom::Err::Failure(failure) => nom::Err::Failure(failure.into()),
    }
}

/// Parse `T` and convert its located error into the caller's located error
#[inline]
pub fn parse_into_located<'a, Lin: Debug, L: From<Lin>, T: ReadablePdu<'a, Lin>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, T, L> {
    T::from_wire(buf).map_err(lift_error)
}

/// Same as [`parse_into_located`] for PDUs that take one external input
#[inline]
pub fn parse_into_located_one_input<
    'a,
    I,
    Lin: Debug,
    L: From<Lin>,
    T: ReadablePduWithOneInput<'a, I, Lin>,
>(
    buf: Span<'a>,
    input: I,
) -> IResult<Span<'a>, T, L> {
    T::from_wire(buf, input).map_err(lift_error)
}

#[inline]
pub fn parse_into_located_two_inputs<
    'a,
    I1,
    I2,
    Lin: Debug,
    L: From<Lin>,
    T: ReadablePduWithTwoInputs<'a, I1, I2, Lin>,
>(
    buf: Span<'a>,
    input1: I1,
    input2: I2,
) -> IResult<Span<'a>, T, L> {
    T::from_wire(buf, input1, input2).map_err(lift_error)
}

/// Keep repeating the parser till the buf is empty
#[inline]
pub fn parse_till_empty_into_located<'a, Lin: Debug, L: From<Lin>, T: ReadablePdu<'a, Lin>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, Vec<T>, L> {
    let mut buf = buf;
    let mut ret = Vec::new();
    while !buf.is_empty() {
        let (tmp, element) = parse_into_located(buf)?;
        ret.push(element);
        buf = tmp;
    }
    Ok((buf, ret))
}

/// Serde mirror of [`nom::error::ErrorKind`], use it as
/// `#[serde(with = "ErrorKindSerdeDeref")]` on error kind fields.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(remote = "nom::error::ErrorKind")]
pub enum ErrorKindSerdeDeref {
    Tag,
    MapRes,
    MapOpt,
    Alt,
    IsNot,
    IsA,
    SeparatedList,
    SeparatedNonEmptyList,
    Many0,
    Many1,
    ManyTill,
    Count,
    TakeUntil,
    LengthValue,
    TagClosure,
    Alpha,
    Digit,
    HexDigit,
    OctDigit,
    AlphaNumeric,
    Space,
    MultiSpace,
    LengthValueFn,
    Eof,
    Switch,
    TagBits,
    OneOf,
    NoneOf,
    Char,
    CrLf,
    RegexpMatch,
    RegexpMatches,
    RegexpFind,
    RegexpCapture,
    RegexpCaptures,
    TakeWhile1,
    Complete,
    Fix,
    Escaped,
    EscapedTransform,
    NonEmpty,
    ManyMN,
    Not,
    Permutation,
    Verify,
    TakeTill1,
    TakeWhileMN,
    TooLarge,
    Many0Count,
    Many1Count,
    Float,
    Satisfy,
    Fail,
}
