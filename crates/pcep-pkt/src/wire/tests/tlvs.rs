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
    tlvs::{PcepTlv, SrPceCapability},
    wire::{
        deserializer::tlvs::{parse_tlvs, LocatedPcepTlvParsingError, PcepTlvParsingError},
        serializer::tlvs::{write_sr_pce_capability, PcepTlvWritingError},
        tests::standard_extensions,
    },
    PcepExtensions,
};
use pathwire_parse_utils::Span;

#[test]
fn test_sr_pce_capability() -> Result<(), PcepTlvWritingError> {
    let extensions = standard_extensions();
    let good_wire = [0x00, 0x1a, 0x00, 0x04, 0x00, 0x00, 0x03, 0x01];
    let no_flags_wire = [0x00, 0x1a, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0a];

    let good = PcepTlv::SrPceCapability(SrPceCapability::new(true, true, 1));
    let no_flags = PcepTlv::SrPceCapability(SrPceCapability::new(false, false, 10));

    let (rest, parsed) = parse_tlvs(Span::new(&good_wire), extensions.as_ref()).unwrap();
    assert!(rest.is_empty());
    assert_eq!(parsed, vec![good]);
    let (_, parsed) = parse_tlvs(Span::new(&no_flags_wire), extensions.as_ref()).unwrap();
    assert_eq!(parsed, vec![no_flags]);

    let mut buf = vec![];
    write_sr_pce_capability(&good, &mut buf)?;
    assert_eq!(buf, good_wire);
    let mut buf = vec![];
    write_sr_pce_capability(&no_flags, &mut buf)?;
    assert_eq!(buf, no_flags_wire);
    Ok(())
}

#[test]
fn test_sr_pce_capability_invalid_length() {
    let extensions = standard_extensions();
    let bad_wire = [0x00, 0x1a, 0x00, 0x03, 0x00, 0x00, 0x03, 0x00];
    let parsed = parse_tlvs(Span::new(&bad_wire), extensions.as_ref());
    assert_eq!(
        parsed,
        Err(nom::Err::Error(LocatedPcepTlvParsingError::new(
            Span::new_from_offset(4, &bad_wire[4..7]),
            PcepTlvParsingError::MalformedTlv {
                code: 26,
                expected: 4,
                found: 3,
            },
        )))
    );
}

#[test]
fn test_unrecognized_tlvs_are_skipped() {
    let extensions = standard_extensions();
    let wire = [
        0x00, 0x10, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, // stateful capability
        0x00, 0x63, 0x00, 0x01, 0xff, 0x00, 0x00, 0x00, // one byte value and padding
        0x00, 0x1a, 0x00, 0x04, 0x00, 0x00, 0x02, 0x05, // sr capability
    ];
    let (rest, parsed) = parse_tlvs(Span::new(&wire), extensions.as_ref()).unwrap();
    assert!(rest.is_empty());
    assert_eq!(
        parsed,
        vec![PcepTlv::SrPceCapability(SrPceCapability::new(
            true, false, 5
        ))]
    );
}

#[test]
fn test_last_tlv_without_padding() {
    let extensions = standard_extensions();
    let wire = [0x00, 0x63, 0x00, 0x01, 0xff];
    let (rest, parsed) = parse_tlvs(Span::new(&wire), extensions.as_ref()).unwrap();
    assert!(rest.is_empty());
    assert!(parsed.is_empty());
}

#[test]
fn test_sr_capability_needs_extension() {
    // Without the segment routing extension the TLV is unknown and skipped
    let extensions =
        PcepExtensions::with_extensions(&[&crate::extensions::BaseExtension]).unwrap();
    let wire = [0x00, 0x1a, 0x00, 0x04, 0x00, 0x00, 0x03, 0x01];
    let (_, parsed) = parse_tlvs(Span::new(&wire), extensions.as_ref()).unwrap();
    assert!(parsed.is_empty());
}
