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
    extensions::BaseExtension,
    iana::{SrNaiType, XroAttribute},
    objects::*,
    subobjects::*,
    tlvs::{PcepTlv, PcepTlvKind, SrPceCapability},
    wire::{
        deserializer::{objects::*, subobjects::SubobjectParsingError},
        serializer::objects::*,
        tests::standard_extensions,
    },
    PcepExtensions,
};
use pathwire_parse_utils::{
    test_helpers::{
        test_parse_error_with_one_input, test_parsed_completely_with_one_input,
        test_write_with_one_input,
    },
    Span, WritablePduWithOneInput,
};
use std::net::Ipv4Addr;

#[test]
fn test_open_object() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    let wire = [
        0x01, 0x10, 0x00, 0x10, 0x20, 0x1e, 0x78, 0x01, 0x00, 0x1a, 0x00, 0x04, 0x00, 0x00,
        0x03, 0x01,
    ];
    let expected = PcepObject::plain(PcepObjectValue::Open(OpenObject::new(
        30,
        120,
        1,
        vec![PcepTlv::SrPceCapability(SrPceCapability::new(true, true, 1))],
    )));
    let parsed = test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    match parsed.value() {
        PcepObjectValue::Open(open) => {
            assert_eq!(open.sr_capability(), Some(&SrPceCapability::new(true, true, 1)))
        }
        other => panic!("expected an OPEN object, got {other:?}"),
    }
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_open_object_errors() {
    let extensions = standard_extensions();
    let bad_version_wire = [0x01, 0x10, 0x00, 0x08, 0x40, 0x1e, 0x78, 0x01];
    let short_wire = [0x01, 0x10, 0x00, 0x06, 0x20, 0x1e];
    let bad_length_wire = [0x01, 0x10, 0x00, 0x02];

    test_parse_error_with_one_input::<PcepObject, _, LocatedPcepObjectParsingError<'_>>(
        &bad_version_wire,
        extensions.as_ref(),
        &LocatedPcepObjectParsingError::new(
            Span::new_from_offset(4, &bad_version_wire[4..]),
            PcepObjectParsingError::UnsupportedVersion(2),
        ),
    );
    test_parse_error_with_one_input::<PcepObject, _, LocatedPcepObjectParsingError<'_>>(
        &short_wire,
        extensions.as_ref(),
        &LocatedPcepObjectParsingError::new(
            Span::new_from_offset(4, &short_wire[4..]),
            PcepObjectParsingError::MalformedObject {
                class: 1,
                expected: 4,
                found: 2,
            },
        ),
    );
    test_parse_error_with_one_input::<PcepObject, _, LocatedPcepObjectParsingError<'_>>(
        &bad_length_wire,
        extensions.as_ref(),
        &LocatedPcepObjectParsingError::new(
            Span::new_from_offset(2, &bad_length_wire[2..]),
            PcepObjectParsingError::InvalidObjectLength(2),
        ),
    );
}

#[test]
fn test_close_object_flags() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    let wire = [0x0f, 0x13, 0x00, 0x08, 0x00, 0x00, 0x00, 0x02];
    let expected = PcepObject::new(
        true,
        true,
        PcepObjectValue::Close(CloseObject::new(2, vec![])),
    );
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_pcep_error_object() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    let wire = [0x0d, 0x10, 0x00, 0x08, 0x00, 0x00, 0x01, 0x04];
    let expected = PcepObject::plain(PcepObjectValue::PcepError(PcepErrorObject::new(
        1,
        4,
        vec![],
    )));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_ero_object() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    let wire = [
        0x07, 0x10, 0x00, 0x10, 0x24, 0x0c, 0x10, 0x00, 0x00, 0x01, 0xe2, 0x40, 0x4a, 0x7d,
        0x2b, 0x63,
    ];
    let expected = PcepObject::plain(PcepObjectValue::Ero(Ero::new(vec![EroSubobject::new(
        false,
        EroSubobjectValue::SrEro(SrEroSubobject::new(
            SrNaiType::Ipv4NodeId,
            false,
            false,
            Some(123456),
            Some(Nai::Ipv4Node(Ipv4Addr::new(74, 125, 43, 99))),
        )),
    )])));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_ero_object_subobject_error() {
    let extensions = standard_extensions();
    // SR-ERO with a SID and an IPv4 NAI announced but the NAI cut short
    let wire = [
        0x07, 0x10, 0x00, 0x0e, 0x24, 0x0a, 0x10, 0x00, 0x00, 0x01, 0xe2, 0x40, 0x4a, 0x7d,
    ];
    test_parse_error_with_one_input::<PcepObject, _, LocatedPcepObjectParsingError<'_>>(
        &wire,
        extensions.as_ref(),
        &LocatedPcepObjectParsingError::new(
            Span::new_from_offset(6, &wire[6..]),
            PcepObjectParsingError::SubobjectError(SubobjectParsingError::MalformedSubobject {
                code: 36,
                expected: 10,
                found: 8,
            }),
        ),
    );
}

#[test]
fn test_xro_object() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    let wire = [
        0x11, 0x10, 0x00, 0x0f, 0x00, 0x00, 0x00, 0x01, 0xa2, 0x07, 0x00, 0x00, 0x00, 0x01,
        0x02,
    ];
    let expected = PcepObject::plain(PcepObjectValue::Xro(Xro::new(
        true,
        vec![XroSubobject::new(
            true,
            XroAttribute::Srlg,
            XroSubobjectValue::Srlg(1),
        )],
    )));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_unrecognized_objects() -> Result<(), PcepObjectWritingError> {
    let extensions = standard_extensions();
    // LSP object, without and with the P flag
    let optional_wire = [0x20, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01];
    let mandatory_wire = [0x20, 0x12, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01];

    let unrecognized = PcepObject::plain(PcepObjectValue::Unrecognized(
        UnrecognizedObject::new(ObjectCode::new(32, 1), vec![0, 0, 0, 1]),
    ));
    test_parsed_completely_with_one_input(&optional_wire, extensions.as_ref(), &unrecognized);
    test_write_with_one_input(&unrecognized, extensions.as_ref(), &optional_wire)?;

    test_parse_error_with_one_input::<PcepObject, _, LocatedPcepObjectParsingError<'_>>(
        &mandatory_wire,
        extensions.as_ref(),
        &LocatedPcepObjectParsingError::new(
            Span::new(&mandatory_wire),
            PcepObjectParsingError::UnrecognizedMandatoryObject(ObjectCode::new(32, 1)),
        ),
    );

    // Dropped from an object list
    let list = [&optional_wire[..], &[0x0f, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01]].concat();
    let (_, objects) = parse_objects(Span::new(&list), extensions.as_ref()).unwrap();
    assert_eq!(
        objects,
        vec![PcepObject::plain(PcepObjectValue::Close(CloseObject::new(
            1,
            vec![]
        )))]
    );
    Ok(())
}

#[test]
fn test_unregistered_serializers() {
    let extensions = PcepExtensions::with_extensions(&[&BaseExtension]).unwrap();
    let open = PcepObject::plain(PcepObjectValue::Open(OpenObject::new(
        30,
        120,
        1,
        vec![PcepTlv::SrPceCapability(SrPceCapability::new(false, false, 3))],
    )));
    let mut buf = vec![];
    assert_eq!(
        open.write(&mut buf, extensions.as_ref()),
        Err(PcepObjectWritingError::UnregisteredTlvSerializer(
            PcepTlvKind::SrPceCapability
        ))
    );

    let empty = PcepExtensions::new();
    let close = PcepObject::plain(PcepObjectValue::Close(CloseObject::new(1, vec![])));
    assert_eq!(
        close.write(&mut buf, &empty),
        Err(PcepObjectWritingError::UnregisteredSerializer(
            PcepObjectKind::Close
        ))
    );
}

#[test]
fn test_object_serializer_rejects_other_object() {
    let extensions = standard_extensions();
    let close = PcepObjectValue::Close(CloseObject::new(1, vec![]));
    let mut buf = vec![];
    assert_eq!(
        write_open_object(&close, extensions.as_ref(), &mut buf),
        Err(PcepObjectWritingError::UnexpectedObject(PcepObjectKind::Close))
    );
}
