// Copyright (C) 2022-present The NetGauze Authors.
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

//! Frames a byte stream into BGP messages, see [`BgpCodec`].

use byteorder::{ByteOrder, NetworkEndian};
use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    notification::BgpNotificationMessage,
    wire::{
        deserializer::{
            BgpMessageParsingError, BgpParsingContext, BgpParsingIgnoredErrors,
            BGP_MAX_MESSAGE_LENGTH, BGP_MIN_MESSAGE_LENGTH,
        },
        serializer::BgpMessageWritingError,
    },
    BgpMessage,
};
use bgpwire_parse_utils::{ReadablePduWithOneInput, WritablePduWithOneInput};

const BGP_MARKER_LENGTH: usize = 16;

/// Per frame error. Errors are yielded as items, so the stream keeps going
/// after them unless the codec lost track of the frame boundaries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpFrameError {
    /// No frame boundary can be found after this error, the codec yields
    /// nothing else.
    Desynchronized(BgpMessageParsingError),

    /// The frame was consumed, the next frame can be decoded.
    Malformed(BgpMessageParsingError),
}

impl BgpFrameError {
    pub const fn error(&self) -> &BgpMessageParsingError {
        match self {
            Self::Desynchronized(err) | Self::Malformed(err) => err,
        }
    }

    pub const fn is_desynchronized(&self) -> bool {
        matches!(self, Self::Desynchronized(_))
    }
}

impl From<BgpFrameError> for BgpNotificationMessage {
    fn from(value: BgpFrameError) -> Self {
        match value {
            BgpFrameError::Desynchronized(err) | BgpFrameError::Malformed(err) => err.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpCodecDecoderError {
    IoError(String),
}

impl From<std::io::Error> for BgpCodecDecoderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

impl std::fmt::Display for BgpCodecDecoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for BgpCodecDecoderError {}

pub type BgpFrame = Result<(BgpMessage, BgpParsingIgnoredErrors), BgpFrameError>;

/// BGP framing over a byte stream.
///
/// The read buffer of the `Framed` wrapping this codec is the receive buffer
/// of the session: bytes that don't make a complete message yet stay in it
/// until the next read.
///
/// Four octet AS numbers are used in both directions only once
/// [`BgpCodec::set_asn4`] is called, which the session does after both Open
/// messages were exchanged.
#[derive(Debug, Clone)]
pub struct BgpCodec {
    asn4: bool,
    desynchronized: bool,
    /// Bytes left of an oversized frame that are dropped without parsing
    skip: usize,
    ctx: BgpParsingContext,
}

impl Default for BgpCodec {
    fn default() -> Self {
        Self::new(false)
    }
}

impl BgpCodec {
    pub fn new(asn4: bool) -> Self {
        Self::with_context(BgpParsingContext::new(asn4, false, false))
    }

    pub fn with_context(ctx: BgpParsingContext) -> Self {
        Self {
            asn4: ctx.asn4(),
            desynchronized: false,
            skip: 0,
            ctx,
        }
    }

    pub const fn asn4(&self) -> bool {
        self.asn4
    }

    /// Switch the AS numbers width for all the following messages
    pub fn set_asn4(&mut self, asn4: bool) {
        self.asn4 = asn4;
        self.ctx.set_asn4(asn4);
    }

    pub const fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    fn desynchronize(&mut self, buf: &mut BytesMut, err: BgpMessageParsingError) -> BgpFrame {
        tracing::error!("Lost BGP message framing: {err:?}");
        self.desynchronized = true;
        buf.clear();
        Err(BgpFrameError::Desynchronized(err))
    }

    fn drop_skipped(&mut self, buf: &mut BytesMut) {
        let skipped = self.skip.min(buf.len());
        buf.advance(skipped);
        self.skip -= skipped;
    }
}

impl Decoder for BgpCodec {
    type Item = BgpFrame;
    type Error = BgpCodecDecoderError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.desynchronized {
            buf.clear();
            return Ok(None);
        }
        if self.skip > 0 {
            self.drop_skipped(buf);
            if self.skip > 0 {
                return Ok(None);
            }
        }
        if buf.len() < BGP_MIN_MESSAGE_LENGTH as usize {
            return Ok(None);
        }
        let marker = NetworkEndian::read_u128(&buf[..BGP_MARKER_LENGTH]);
        if marker != u128::MAX {
            let err = BgpMessageParsingError::ConnectionNotSynchronized(marker);
            return Ok(Some(self.desynchronize(buf, err)));
        }
        let length = NetworkEndian::read_u16(&buf[BGP_MARKER_LENGTH..BGP_MARKER_LENGTH + 2]);
        if length < BGP_MIN_MESSAGE_LENGTH {
            let err = BgpMessageParsingError::BadMessageLength(length);
            return Ok(Some(self.desynchronize(buf, err)));
        }
        if length > BGP_MAX_MESSAGE_LENGTH {
            tracing::warn!("Dropping BGP message with length {length} above the maximum");
            self.skip = length as usize;
            self.drop_skipped(buf);
            return Ok(Some(Err(BgpFrameError::Malformed(
                BgpMessageParsingError::BadMessageLength(length),
            ))));
        }
        let length = length as usize;
        if buf.len() < length {
            buf.reserve(length - buf.len());
            return Ok(None);
        }
        let frame = buf.split_to(length);
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("Decoding buffer message: {:?}", frame.as_ref());
        }
        let frame = match BgpMessage::from_wire(frame.as_ref(), &mut self.ctx) {
            Ok((_, msg)) => Ok((msg, self.ctx.reset_parsing_errors())),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                self.ctx.reset_parsing_errors();
                Err(BgpFrameError::Malformed(err.into_error()))
            }
            Err(nom::Err::Incomplete(_)) => {
                self.ctx.reset_parsing_errors();
                Err(BgpFrameError::Malformed(
                    BgpMessageParsingError::BadMessageLength(length as u16),
                ))
            }
        };
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("Decoding buffer result is: {frame:?}");
        }
        Ok(Some(frame))
    }
}

impl Encoder<BgpMessage> for BgpCodec {
    type Error = BgpMessageWritingError;

    fn encode(&mut self, msg: BgpMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("Encoding message: {msg:?}");
        }
        dst.reserve(msg.len(self.asn4));
        msg.write(&mut dst.writer(), self.asn4)
    }
}
