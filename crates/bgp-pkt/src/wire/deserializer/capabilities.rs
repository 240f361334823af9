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
    capabilities::{BgpCapability, BgpOpenParameter, UnrecognizedCapability},
    extensions::BgpExtensions,
    iana::BgpCapabilityCode,
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use pathwire_parse_utils::{
    parse_into_located_one_input, ErrorKindSerdeDeref, ReadablePduWithOneInput, Span,
};
use pathwire_registry::FamilyCode;
use pathwire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};

const MULTI_PROTOCOL_CAPABILITY_LENGTH: usize = 4;
const FOUR_OCTET_AS_CAPABILITY_LENGTH: usize = 4;

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpCapabilityParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidLength { code: u8, expected: u8, found: u8 },
}

fn expect_length<'a>(
    buf: Span<'a>,
    code: BgpCapabilityCode,
    expected: usize,
) -> Result<(), nom::Err<LocatedBgpCapabilityParsingError<'a>>> {
    if buf.len() == expected {
        return Ok(());
    }
    Err(nom::Err::Error(LocatedBgpCapabilityParsingError::new(
        buf,
        BgpCapabilityParsingError::InvalidLength {
            code: code as u8,
            expected: expected as u8,
            found: buf.len() as u8,
        },
    )))
}

/// Capability parsers bound in [BgpExtensions], given the capability value
/// only.
pub fn parse_multi_protocol(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    expect_length(
        buf,
        BgpCapabilityCode::MultiProtocolExtensions,
        MULTI_PROTOCOL_CAPABILITY_LENGTH,
    )?;
    let (buf, afi) = be_u16(buf)?;
    let (buf, _reserved) = be_u8(buf)?;
    let (buf, safi) = be_u8(buf)?;
    Ok((buf, BgpCapability::MultiProtocol(FamilyCode::new(afi, safi))))
}

pub fn parse_route_refresh(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    expect_length(buf, BgpCapabilityCode::RouteRefreshCapability, 0)?;
    Ok((buf, BgpCapability::RouteRefresh))
}

pub fn parse_four_octet_as(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    expect_length(
        buf,
        BgpCapabilityCode::FourOctetAs,
        FOUR_OCTET_AS_CAPABILITY_LENGTH,
    )?;
    let (buf, asn4) = be_u32(buf)?;
    Ok((buf, BgpCapability::FourOctetAs(asn4)))
}

impl<'a> ReadablePduWithOneInput<'a, &BgpExtensions, LocatedBgpCapabilityParsingError<'a>>
    for BgpCapability
{
    fn from_wire(
        buf: Span<'a>,
        extensions: &BgpExtensions,
    ) -> IResult<Span<'a>, Self, LocatedBgpCapabilityParsingError<'a>> {
        let (buf, code) = be_u8(buf)?;
        let (buf, length) = be_u8(buf)?;
        let (buf, value) = nom::bytes::complete::take(length)(buf)?;
        let Some(parser) = extensions.capabilities().parser(&code) else {
            log::debug!("Keeping unrecognized BGP capability {code} of {length} bytes");
            return Ok((
                buf,
                BgpCapability::Unrecognized(UnrecognizedCapability::new(
                    code,
                    value.fragment().to_vec(),
                )),
            ));
        };
        let (_, capability) = parser(value)?;
        Ok((buf, capability))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpOpenParameterParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    UnknownParameterType(u8),
    CapabilityError(#[from_located(module = "self")] BgpCapabilityParsingError),
}

/// Parameter parsers bound in [BgpExtensions], given the parameter value
/// only.
pub fn parse_capabilities_parameter<'a>(
    buf: Span<'a>,
    extensions: &BgpExtensions,
) -> IResult<Span<'a>, BgpOpenParameter, LocatedBgpOpenParameterParsingError<'a>> {
    let mut buf = buf;
    let mut capabilities = vec![];
    while !buf.is_empty() {
        let (t, capability): (_, BgpCapability) = parse_into_located_one_input(buf, extensions)?;
        capabilities.push(capability);
        buf = t;
    }
    Ok((buf, BgpOpenParameter::Capabilities(capabilities)))
}

impl<'a> ReadablePduWithOneInput<'a, &BgpExtensions, LocatedBgpOpenParameterParsingError<'a>>
    for BgpOpenParameter
{
    fn from_wire(
        buf: Span<'a>,
        extensions: &BgpExtensions,
    ) -> IResult<Span<'a>, Self, LocatedBgpOpenParameterParsingError<'a>> {
        let input = buf;
        let (buf, param_type) = be_u8(buf)?;
        let (buf, length) = be_u8(buf)?;
        let (buf, value) = nom::bytes::complete::take(length)(buf)?;
        let Some(parser) = extensions.parameters().parser(&param_type) else {
            return Err(nom::Err::Error(LocatedBgpOpenParameterParsingError::new(
                input,
                BgpOpenParameterParsingError::UnknownParameterType(param_type),
            )));
        };
        let (_, parameter) = parser(value, extensions)?;
        Ok((buf, parameter))
    }
}

/// Parse the optional parameters of an OPEN message, `buf` holds exactly the
/// parameters.
pub fn parse_open_parameters<'a>(
    buf: Span<'a>,
    extensions: &BgpExtensions,
) -> IResult<Span<'a>, Vec<BgpOpenParameter>, LocatedBgpOpenParameterParsingError<'a>> {
    let mut buf = buf;
    let mut parameters = vec![];
    while !buf.is_empty() {
        let (t, parameter): (_, BgpOpenParameter) =
            parse_into_located_one_input(buf, extensions)?;
        parameters.push(parameter);
        buf = t;
    }
    Ok((buf, parameters))
}
