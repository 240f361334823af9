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

//! Assertions used by the protocol crates to check parsing and serializing
//! against known byte sequences.

use crate::{
    ReadablePdu, ReadablePduWithOneInput, ReadablePduWithTwoInputs, Span, WritablePdu,
    WritablePduWithOneInput,
};
use nom::IResult;
use std::fmt::Debug;

/// Concatenate multiple byte slices into one buffer
pub fn combine(v: Vec<&[u8]>) -> Vec<u8> {
    v.iter().flat_map(|x| x.iter()).copied().collect()
}

fn assert_parsed<'a, T: PartialEq + Debug, E: Debug>(
    parsed: IResult<Span<'a>, T, E>,
    expected: &T,
) -> T {
    assert!(
        parsed.is_ok(),
        "Message failed parsing, while expecting it to pass.\n\tExpected : {expected:?}\n\tParsed msg: {parsed:?}"
    );
    let (span, value) = parsed.unwrap();
    assert_eq!(&value, expected);
    assert_eq!(
        span.fragment().len(),
        0,
        "Not all the input is consumed by the parser, didn't consume: {span:?}",
    );
    value
}

fn assert_parse_error<'a, T: Debug, E: Debug + PartialEq>(
    parsed: IResult<Span<'a>, T, E>,
    expected_err: &E,
) {
    assert!(
        parsed.is_err(),
        "Message was parsed, while expecting it to fail.\n\tExpected : {expected_err:?}\n\tParsed msg: {parsed:?}"
    );
    match parsed {
        Err(nom::Err::Error(parsed_error)) => assert_eq!(&parsed_error, expected_err),
        other => panic!("Expected the parser to fail with Err(nom::Err::Error(x)), got {other:?}"),
    }
}

/// Parse `input` and check it's fully consumed into `expected`
pub fn test_parsed_completely<'a, T, E>(input: &'a [u8], expected: &T) -> T
where
    T: ReadablePdu<'a, E> + PartialEq + Debug,
    E: Debug,
{
    assert_parsed(T::from_wire(Span::new(input)), expected)
}

pub fn test_parsed_completely_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected: &T,
) -> T
where
    T: ReadablePduWithOneInput<'a, I, E> + PartialEq + Debug,
    E: Debug,
{
    assert_parsed(T::from_wire(Span::new(input), parser_input), expected)
}

pub fn test_parsed_completely_with_two_inputs<'a, T, I, K, E>(
    input: &'a [u8],
    parser_input1: I,
    parser_input2: K,
    expected: &T,
) -> T
where
    T: ReadablePduWithTwoInputs<'a, I, K, E> + PartialEq + Debug,
    E: Debug,
{
    assert_parsed(
        T::from_wire(Span::new(input), parser_input1, parser_input2),
        expected,
    )
}

/// Parse `input` and check it fails with `expected_err`
pub fn test_parse_error<'a, T, E>(input: &'a [u8], expected_err: &E)
where
    T: ReadablePdu<'a, E> + Debug,
    E: Debug + PartialEq,
{
    assert_parse_error(T::from_wire(Span::new(input)), expected_err)
}

pub fn test_parse_error_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected_err: &E,
) where
    T: ReadablePduWithOneInput<'a, I, E> + Debug,
    E: Debug + PartialEq,
{
    assert_parse_error(T::from_wire(Span::new(input), parser_input), expected_err)
}

pub fn test_parse_error_with_two_inputs<'a, T, I, K, E>(
    input: &'a [u8],
    parser_input1: I,
    parser_input2: K,
    expected_err: &E,
) where
    T: ReadablePduWithTwoInputs<'a, I, K, E> + Debug,
    E: Debug + PartialEq,
{
    assert_parse_error(
        T::from_wire(Span::new(input), parser_input1, parser_input2),
        expected_err,
    )
}

/// Serialize `input` and compare against `expected`, also checking that
/// [`WritablePdu::len`] agrees with the written size.
pub fn test_write<T: WritablePdu<E>, E>(input: &T, expected: &[u8]) -> Result<(), E> {
    let mut buf: Vec<u8> = vec![];
    input.write(&mut buf)?;
    assert_eq!(
        buf, expected,
        "Serialized buffer is different from the expected one"
    );
    assert_eq!(
        input.len(),
        expected.len(),
        "len() is different from the serialized buffer length"
    );
    Ok(())
}

pub fn test_write_with_one_input<I: Copy, T: WritablePduWithOneInput<I, E>, E>(
    input: &T,
    writer_input: I,
    expected: &[u8],
) -> Result<(), E> {
    let mut buf: Vec<u8> = vec![];
    input.write(&mut buf, writer_input)?;
    assert_eq!(
        buf, expected,
        "Serialized buffer is different from the expected one"
    );
    assert_eq!(
        input.len(writer_input),
        expected.len(),
        "len() is different from the serialized buffer length"
    );
    Ok(())
}
