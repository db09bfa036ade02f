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

//! Deserializer for BGP Notification message

use crate::BgpNotificationMessage;
use bgpwire_parse_utils::{ErrorKindSerdeDeref, Located, ReadablePdu, Span};
use nom::{error::ErrorKind, number::complete::be_u8, IResult};
use serde::{Deserialize, Serialize};

/// BGP Notification Message Parsing errors
///
/// Unregistered codes and sub-codes are still represented in
/// [`BgpNotificationMessage`], so only a message too short to carry the code
/// and sub-code fails to parse.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpNotificationMessageParsingError {
    /// Errors triggered by the nom parser, see [nom::error::ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
}

parsing_error_conversions!(BgpNotificationMessageParsingError);

pub type LocatedBgpNotificationMessageParsingError<'a> =
    Located<'a, BgpNotificationMessageParsingError>;

impl<'a> ReadablePdu<'a, LocatedBgpNotificationMessageParsingError<'a>> for BgpNotificationMessage {
    fn from_wire(
        buf: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedBgpNotificationMessageParsingError<'a>> {
        let (buf, code) = be_u8(buf)?;
        let (buf, sub_code) = be_u8(buf)?;
        let (buf, value) = nom::bytes::complete::take(buf.len())(buf)?;
        Ok((
            buf,
            BgpNotificationMessage::from_parts(code, sub_code, value.to_vec()),
        ))
    }
}
