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
    extensions::RsvpExtensions,
    iana::{UndefinedXroAttribute, XroAttribute},
    subobjects::{XroSubobject, XroSubobjectKind, XroSubobjectValue},
    wire::{deserializer::*, serializer::*},
};
use ipnet::IpNet;
use pathwire_parse_utils::{test_helpers::combine, LocatedParsingError, Span};
use rstest::rstest;
use std::sync::Arc;

fn extensions() -> Arc<RsvpExtensions> {
    RsvpExtensions::standard().unwrap()
}

fn write(subobjects: &[XroSubobject]) -> Result<Vec<u8>, SubobjectWritingError> {
    let mut buf = vec![];
    write_xro_subobjects(subobjects, &extensions(), &mut buf)?;
    Ok(buf)
}

#[test]
fn test_ipv4_prefix() -> Result<(), SubobjectWritingError> {
    let wire = [0x01, 0x08, 0xc0, 0x00, 0x02, 0x00, 0x18, 0x01];
    let expected = vec![XroSubobject::new(
        false,
        XroAttribute::Node,
        XroSubobjectValue::IpPrefix("192.0.2.0/24".parse::<IpNet>().unwrap()),
    )];
    let (rest, parsed) = parse_xro_subobjects(Span::new(&wire), &extensions()).unwrap();
    assert!(rest.is_empty());
    assert_eq!(parsed, expected);
    assert_eq!(write(&expected)?, wire);
    Ok(())
}

#[test]
fn test_ipv6_prefix() -> Result<(), SubobjectWritingError> {
    let wire = combine(vec![
        &[0x82, 0x14, 0x20, 0x01, 0x0d, 0xb8],
        &[0x00; 12],
        &[0x40, 0x00],
    ]);
    let expected = vec![XroSubobject::new(
        true,
        XroAttribute::Interface,
        XroSubobjectValue::IpPrefix("2001:db8::/64".parse::<IpNet>().unwrap()),
    )];
    let (_, parsed) = parse_xro_subobjects(Span::new(&wire), &extensions()).unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(write(&expected)?, wire);
    Ok(())
}

#[test]
fn test_srlg() -> Result<(), SubobjectWritingError> {
    let wire = [0xa2, 0x08, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x02];
    let expected = vec![XroSubobject::new(
        true,
        XroAttribute::Srlg,
        XroSubobjectValue::Srlg(42),
    )];
    let (_, parsed) = parse_xro_subobjects(Span::new(&wire), &extensions()).unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(write(&expected)?, wire);
    Ok(())
}

#[test_log::test]
fn test_unknown_subobject_skipped() {
    let wire = [
        0x04, 0x04, 0x00, 0x00, 0xa2, 0x08, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x02,
    ];
    let (rest, parsed) = parse_xro_subobjects(Span::new(&wire), &extensions()).unwrap();
    assert!(rest.is_empty());
    assert_eq!(
        parsed,
        vec![XroSubobject::new(
            true,
            XroAttribute::Srlg,
            XroSubobjectValue::Srlg(42)
        )]
    );
}

#[rstest]
#[case::pcep_shaped_srlg(
    vec![0xa2, 0x07, 0x00, 0x00, 0x00, 0x2a, 0x02],
    2,
    SubobjectParsingError::MalformedSubobject { code: 34, expected: 6, found: 5 }
)]
#[case::short_ipv4_prefix(
    vec![0x01, 0x07, 0xc0, 0x00, 0x02, 0x00, 0x18],
    2,
    SubobjectParsingError::MalformedSubobject { code: 1, expected: 6, found: 5 }
)]
#[case::unknown_mandatory(
    vec![0x84, 0x04, 0x00, 0x00],
    0,
    SubobjectParsingError::UnrecognizedMandatorySubobject(4)
)]
#[case::length_below_header(
    vec![0x01, 0x01],
    0,
    SubobjectParsingError::InvalidSubobjectLength(1)
)]
#[case::undefined_attribute(
    vec![0x01, 0x08, 0xc0, 0x00, 0x02, 0x00, 0x18, 0x07],
    7,
    SubobjectParsingError::UndefinedXroAttribute(UndefinedXroAttribute(7))
)]
#[case::prefix_too_long(
    vec![0x01, 0x08, 0xc0, 0x00, 0x02, 0x00, 0x21, 0x01],
    6,
    SubobjectParsingError::InvalidPrefixLength(33)
)]
fn test_parse_errors(
    #[case] wire: Vec<u8>,
    #[case] offset: usize,
    #[case] error: SubobjectParsingError,
) {
    assert_eq!(
        parse_xro_subobjects(Span::new(&wire), &extensions()),
        Err(nom::Err::Error(LocatedSubobjectParsingError::new(
            Span::new_from_offset(offset, &wire[offset..]),
            error
        )))
    );
}

#[test]
fn test_srlg_shapes_differ_from_pcep() {
    use pathwire_pcep_pkt::{
        iana::XroAttribute as PcepXroAttribute,
        subobjects::{XroSubobject as PcepXroSubobject, XroSubobjectValue as PcepXroValue},
        wire::{
            deserializer::subobjects::{
                parse_xro_subobjects as parse_pcep_xro_subobjects,
                SubobjectParsingError as PcepSubobjectParsingError,
            },
            serializer::subobjects::write_xro_srlg as write_pcep_xro_srlg,
        },
        PcepExtensions,
    };

    let mut pcep_wire = vec![];
    write_pcep_xro_srlg(
        &PcepXroSubobject::new(true, PcepXroAttribute::Srlg, PcepXroValue::Srlg(42)),
        &mut pcep_wire,
    )
    .unwrap();
    let err = parse_xro_subobjects(Span::new(&pcep_wire), &extensions()).unwrap_err();
    assert!(matches!(
        err,
        nom::Err::Error(located) if located.error() == &SubobjectParsingError::MalformedSubobject {
            code: 34,
            expected: 6,
            found: 5,
        }
    ));

    let rsvp_wire = write(&[XroSubobject::new(
        true,
        XroAttribute::Srlg,
        XroSubobjectValue::Srlg(42),
    )])
    .unwrap();
    let pcep_extensions = PcepExtensions::standard().unwrap();
    let err = parse_pcep_xro_subobjects(Span::new(&rsvp_wire), &pcep_extensions).unwrap_err();
    assert!(matches!(
        err,
        nom::Err::Error(located) if located.error() == &PcepSubobjectParsingError::MalformedSubobject {
            code: 34,
            expected: 5,
            found: 6,
        }
    ));
}

#[test]
fn test_write_errors() {
    let prefix = XroSubobject::new(
        false,
        XroAttribute::Interface,
        XroSubobjectValue::IpPrefix("192.0.2.1/32".parse::<IpNet>().unwrap()),
    );
    let mut buf = vec![];
    assert_eq!(
        write_xro_srlg(&prefix, &mut buf),
        Err(SubobjectWritingError::UnexpectedSubobject(
            XroSubobjectKind::IpPrefix
        ))
    );
    assert_eq!(
        write_xro_subobjects(&[prefix], &RsvpExtensions::new(), &mut buf),
        Err(SubobjectWritingError::UnregisteredSerializer(
            XroSubobjectKind::IpPrefix
        ))
    );
    assert!(buf.is_empty());
}
