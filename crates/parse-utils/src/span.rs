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

//! Binary input for `nom` parsers that remembers how far into the original
//! buffer it points, so errors can report the offending byte offset.

use nom::{AsBytes, InputIter, InputLength, InputTake, Needed, Slice};
use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span<'a> {
    offset: usize,
    fragment: &'a [u8],
}

impl<'a> Span<'a> {
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            offset: 0,
            fragment: buffer,
        }
    }

    /// Build a span that claims to start `offset` bytes into some larger
    /// buffer. Mostly useful in tests to construct expected error locations.
    pub const fn new_from_offset(offset: usize, fragment: &'a [u8]) -> Self {
        Self { offset, fragment }
    }

    #[inline]
    pub const fn location_offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn fragment(&self) -> &'a [u8] {
        self.fragment
    }
}

impl<'a, R> Slice<R> for Span<'a>
where
    &'a [u8]: Slice<R>,
{
    #[inline]
    fn slice(&self, range: R) -> Self {
        let next = self.fragment.slice(range);
        let consumed = next.as_ptr() as usize - self.fragment.as_ptr() as usize;
        Self {
            offset: self.offset + consumed,
            fragment: next,
        }
    }
}

impl<'a> InputIter for Span<'a> {
    type Item = u8;
    type Iter = <&'a [u8] as InputIter>::Iter;
    type IterElem = <&'a [u8] as InputIter>::IterElem;

    #[inline]
    fn iter_indices(&self) -> Self::Iter {
        self.fragment.iter_indices()
    }

    #[inline]
    fn iter_elements(&self) -> Self::IterElem {
        self.fragment.iter_elements()
    }

    #[inline]
    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.fragment.position(predicate)
    }

    #[inline]
    fn slice_index(&self, count: usize) -> Result<usize, Needed> {
        self.fragment.slice_index(count)
    }
}

impl InputLength for Span<'_> {
    #[inline]
    fn input_len(&self) -> usize {
        self.fragment.len()
    }
}

impl InputTake for Span<'_> {
    #[inline]
    fn take(&self, count: usize) -> Self {
        self.slice(..count)
    }

    #[inline]
    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.slice(count..), self.slice(..count))
    }
}

impl AsBytes for Span<'_> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.fragment
    }
}

impl Deref for Span<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.fragment
    }
}

impl<'a> From<&'a [u8]> for Span<'a> {
    #[inline]
    fn from(buffer: &'a [u8]) -> Self {
        Self::new(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::{bytes::complete::take, number::complete::be_u16, IResult};

    #[test]
    fn test_slice_tracks_offset() {
        let buf = [1u8, 2, 3, 4, 5];
        let span = Span::new(&buf);
        let tail = span.slice(2..);
        assert_eq!(tail.location_offset(), 2);
        assert_eq!(tail.fragment(), &[3, 4, 5]);
        let middle = tail.slice(..1);
        assert_eq!(middle.location_offset(), 2);
        assert_eq!(middle.fragment(), &[3]);
    }

    #[test]
    fn test_nom_combinators() {
        let buf = [0x00, 0x1a, 0xff, 0xee, 0xdd];
        let span = Span::new(&buf);
        let parsed: IResult<Span<'_>, u16> = be_u16(span);
        let (rest, value) = parsed.unwrap();
        assert_eq!(value, 26);
        assert_eq!(rest, Span::new_from_offset(2, &buf[2..]));

        let parsed: IResult<Span<'_>, Span<'_>> = take(2usize)(rest);
        let (rest, taken) = parsed.unwrap();
        assert_eq!(taken, Span::new_from_offset(2, &buf[2..4]));
        assert_eq!(rest.location_offset(), 4);
        assert_eq!(rest.len(), 1);
    }
}
