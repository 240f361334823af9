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
    iana::{PcepMessageType, SrNaiType},
    objects::*,
    subobjects::*,
    tlvs::{PcepTlv, SrPceCapability},
    wire::{deserializer::*, serializer::PcepMessageWritingError, tests::standard_extensions},
    PcepErrorMessage, PcepMessage, PcepObjectsMessage, UnrecognizedMessage,
};
use pathwire_parse_utils::{
    test_helpers::{
        combine, test_parse_error_with_one_input, test_parsed_completely_with_one_input,
        test_write_with_one_input,
    },
    Span,
};
use rstest::rstest;
use std::net::Ipv4Addr;

const OPEN_OBJECT_WIRE: [u8; 16] = [
    0x01, 0x10, 0x00, 0x10, 0x20, 0x1e, 0x78, 0x01, 0x00, 0x1a, 0x00, 0x04, 0x00, 0x00, 0x03,
    0x01,
];

fn open() -> OpenObject {
    OpenObject::new(
        30,
        120,
        1,
        vec![PcepTlv::SrPceCapability(SrPceCapability::new(true, true, 1))],
    )
}

#[test]
fn test_keepalive() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = [0x20, 0x02, 0x00, 0x04];
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &PcepMessage::Keepalive);
    test_write_with_one_input(&PcepMessage::Keepalive, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_open_message() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = combine(vec![&[0x20, 0x01, 0x00, 0x14], &OPEN_OBJECT_WIRE]);
    let expected = PcepMessage::Open(open());
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_close_message() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = [
        0x20, 0x07, 0x00, 0x0c, 0x0f, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x05,
    ];
    let expected = PcepMessage::Close(CloseObject::new(5, vec![]));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_error_message() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = combine(vec![
        &[0x20, 0x06, 0x00, 0x1c],
        &[0x0d, 0x10, 0x00, 0x08, 0x00, 0x00, 0x01, 0x04],
        &OPEN_OBJECT_WIRE,
    ]);
    let expected = PcepMessage::Error(PcepErrorMessage::new(
        vec![PcepErrorObject::new(1, 4, vec![])],
        Some(open()),
    ));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_objects_message() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = [
        0x20, 0x03, 0x00, 0x14, 0x07, 0x10, 0x00, 0x10, 0x24, 0x0c, 0x10, 0x00, 0x00, 0x01,
        0xe2, 0x40, 0x4a, 0x7d, 0x2b, 0x63,
    ];
    let expected = PcepMessage::Objects(PcepObjectsMessage::new(
        PcepMessageType::PcReq,
        vec![PcepObject::plain(PcepObjectValue::Ero(Ero::new(vec![
            EroSubobject::new(
                false,
                EroSubobjectValue::SrEro(SrEroSubobject::new(
                    SrNaiType::Ipv4NodeId,
                    false,
                    false,
                    Some(123456),
                    Some(Nai::Ipv4Node(Ipv4Addr::new(74, 125, 43, 99))),
                )),
            ),
        ])))],
    ));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_unrecognized_object_dropped_from_message() {
    let extensions = standard_extensions();
    let wire = [
        0x20, 0x0a, 0x00, 0x0c, 0x20, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01,
    ];
    test_parsed_completely_with_one_input(
        &wire,
        extensions.as_ref(),
        &PcepMessage::Objects(PcepObjectsMessage::new(PcepMessageType::PcRpt, vec![])),
    );
}

#[test]
fn test_unrecognized_message() -> Result<(), PcepMessageWritingError> {
    let extensions = standard_extensions();
    let wire = [0x20, 0x63, 0x00, 0x06, 0xab, 0xcd];
    let expected = PcepMessage::Unrecognized(UnrecognizedMessage::new(99, vec![0xab, 0xcd]));
    test_parsed_completely_with_one_input(&wire, extensions.as_ref(), &expected);
    test_write_with_one_input(&expected, extensions.as_ref(), &wire)?;
    Ok(())
}

#[test]
fn test_message_leaves_trailing_data() {
    let extensions = standard_extensions();
    let wire = [0x20, 0x02, 0x00, 0x04, 0x20, 0x02];
    let (rest, msg) =
        <PcepMessage as pathwire_parse_utils::ReadablePduWithOneInput<'_, _, _>>::from_wire(
            Span::new(&wire),
            extensions.as_ref(),
        )
        .unwrap();
    assert_eq!(msg, PcepMessage::Keepalive);
    assert_eq!(rest, Span::new_from_offset(4, &wire[4..]));
}

#[rstest]
#[case::bad_version(
    vec![0x40, 0x02, 0x00, 0x04],
    0,
    PcepMessageParsingError::UnsupportedVersion(2)
)]
#[case::short_length(
    vec![0x20, 0x02, 0x00, 0x03],
    2,
    PcepMessageParsingError::InvalidMessageLength(3)
)]
#[case::keepalive_with_body(
    vec![0x20, 0x02, 0x00, 0x05, 0x00],
    2,
    PcepMessageParsingError::InvalidMessageLength(5)
)]
#[case::error_without_error_object(
    vec![0x20, 0x06, 0x00, 0x04],
    4,
    PcepMessageParsingError::MissingObject { message_type: 6, class: 13 }
)]
#[case::open_without_object(
    vec![0x20, 0x01, 0x00, 0x04],
    4,
    PcepMessageParsingError::MissingObject { message_type: 1, class: 1 }
)]
#[case::open_carrying_close(
    vec![0x20, 0x01, 0x00, 0x0c, 0x0f, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01],
    4,
    PcepMessageParsingError::UnexpectedObject { message_type: 1, code: ObjectCode::new(15, 1) }
)]
#[case::error_open_first(
    vec![0x20, 0x06, 0x00, 0x0c, 0x01, 0x10, 0x00, 0x08, 0x20, 0x1e, 0x78, 0x00],
    4,
    PcepMessageParsingError::UnexpectedObject { message_type: 6, code: ObjectCode::new(1, 1) }
)]
fn test_message_errors(
    #[case] wire: Vec<u8>,
    #[case] offset: usize,
    #[case] error: PcepMessageParsingError,
) {
    let extensions = standard_extensions();
    test_parse_error_with_one_input::<PcepMessage, _, LocatedPcepMessageParsingError<'_>>(
        &wire,
        extensions.as_ref(),
        &LocatedPcepMessageParsingError::new(Span::new_from_offset(offset, &wire[offset..]), error),
    );
}

#[test]
fn test_two_open_objects() {
    let extensions = standard_extensions();
    let wire = combine(vec![
        &[0x20, 0x01, 0x00, 0x24],
        &OPEN_OBJECT_WIRE,
        &OPEN_OBJECT_WIRE,
    ]);
    test_parse_error_with_one_input::<PcepMessage, _, LocatedPcepMessageParsingError<'_>>(
        &wire,
        extensions.as_ref(),
        &LocatedPcepMessageParsingError::new(
            Span::new_from_offset(4, &wire[4..]),
            PcepMessageParsingError::UnexpectedObject {
                message_type: 1,
                code: ObjectCode::new(1, 1),
            },
        ),
    );
}
