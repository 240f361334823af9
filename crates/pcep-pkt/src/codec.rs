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
    wire::{
        deserializer::PcepMessageParsingError, serializer::PcepMessageWritingError,
        MESSAGE_HEADER_LENGTH,
    },
    PcepExtensions, PcepMessage,
};
use byteorder::{ByteOrder, NetworkEndian};
use bytes::{Buf, BufMut, BytesMut};
use nom::Needed;
use pathwire_parse_utils::{
    LocatedParsingError, ReadablePduWithOneInput, Span, WritablePduWithOneInput,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};

/// Frames PCEP messages on a byte stream
#[derive(Debug, Clone)]
pub struct PcepCodec {
    extensions: Arc<PcepExtensions>,
}

impl PcepCodec {
    pub const fn new(extensions: Arc<PcepExtensions>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &Arc<PcepExtensions> {
        &self.extensions
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PcepCodecDecoderError {
    IoError(String),
    Incomplete(Option<usize>),
    PcepMessageParsingError(PcepMessageParsingError),
}

impl From<std::io::Error> for PcepCodecDecoderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

impl Decoder for PcepCodec {
    type Item = PcepMessage;
    type Error = PcepCodecDecoderError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if buf.len() < MESSAGE_HEADER_LENGTH {
            return Ok(None);
        }
        let length = NetworkEndian::read_u16(&buf[2..MESSAGE_HEADER_LENGTH]) as usize;
        if buf.len() < length {
            return Ok(None);
        }
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Decoding buffer message: {buf:?}")
        }
        // A declared length shorter than the header is reported by the parser
        let frame = length.max(MESSAGE_HEADER_LENGTH);
        let decoding_result =
            match PcepMessage::from_wire(Span::new(&buf[..frame]), self.extensions.as_ref()) {
                Ok((_, msg)) => {
                    buf.advance(frame);
                    Ok(Some(msg))
                }
                Err(error) => {
                    log::error!("Error: {:?} buf: {:?}", error, buf.to_vec());
                    let err = match error {
                        nom::Err::Incomplete(needed) => {
                            let needed = match needed {
                                Needed::Unknown => None,
                                Needed::Size(size) => Some(size.get()),
                            };
                            PcepCodecDecoderError::Incomplete(needed)
                        }
                        nom::Err::Error(error) | nom::Err::Failure(error) => {
                            PcepCodecDecoderError::PcepMessageParsingError(error.error().clone())
                        }
                    };
                    Err(err)
                }
            };
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Decoding buffer result is: {decoding_result:?}");
        }
        decoding_result
    }
}

impl Encoder<PcepMessage> for PcepCodec {
    type Error = PcepMessageWritingError;

    fn encode(&mut self, msg: PcepMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Encoding message: {msg:?}")
        }
        msg.write(&mut dst.writer(), self.extensions.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CloseObject, OpenObject};

    fn codec() -> PcepCodec {
        PcepCodec::new(PcepExtensions::standard().expect("standard extensions"))
    }

    #[test]
    fn test_decode_waits_for_full_message() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&[0x20, 0x01, 0x00][..]);
        assert_eq!(codec.decode(&mut buf), Ok(None));
        // Open announcing 12 bytes, only 10 available so far
        buf.extend_from_slice(&[0x0c, 0x01, 0x10, 0x00, 0x08, 0x20, 0x1e]);
        assert_eq!(codec.decode(&mut buf), Ok(None));
        buf.extend_from_slice(&[0x78, 0x01]);
        assert_eq!(
            codec.decode(&mut buf),
            Ok(Some(PcepMessage::Open(OpenObject::new(30, 120, 1, vec![]))))
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_leaves_next_message() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&[0x20, 0x02, 0x00, 0x04, 0x20, 0x02][..]);
        assert_eq!(codec.decode(&mut buf), Ok(Some(PcepMessage::Keepalive)));
        assert_eq!(buf.as_ref(), &[0x20, 0x02]);
        assert_eq!(codec.decode(&mut buf), Ok(None));
    }

    #[test]
    fn test_decode_error() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&[0x40, 0x02, 0x00, 0x04][..]);
        assert_eq!(
            codec.decode(&mut buf),
            Err(PcepCodecDecoderError::PcepMessageParsingError(
                PcepMessageParsingError::UnsupportedVersion(2)
            ))
        );
    }

    #[test]
    fn test_encode() {
        let mut codec = codec();
        let mut buf = BytesMut::new();
        codec
            .encode(PcepMessage::Close(CloseObject::new(1, vec![])), &mut buf)
            .unwrap();
        codec.encode(PcepMessage::Keepalive, &mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[
                0x20, 0x07, 0x00, 0x0c, 0x0f, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x20,
                0x02, 0x00, 0x04
            ]
        );
    }
}
