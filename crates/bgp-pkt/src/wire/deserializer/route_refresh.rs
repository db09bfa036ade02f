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

//! Deserializer for BGP Route Refresh message

use crate::{iana::AddressType, BgpRouteRefreshMessage};
use bgpwire_parse_utils::{ErrorKindSerdeDeref, Located, ReadablePduWithOneInput, Span};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};

/// BGP Route Refresh Message Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpRouteRefreshMessageParsingError {
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
}

parsing_error_conversions!(BgpRouteRefreshMessageParsingError);

pub type LocatedBgpRouteRefreshMessageParsingError<'a> =
    Located<'a, BgpRouteRefreshMessageParsingError>;

/// The input flags messages received with the pre-standard message type
impl<'a> ReadablePduWithOneInput<'a, bool, LocatedBgpRouteRefreshMessageParsingError<'a>>
    for BgpRouteRefreshMessage
{
    fn from_wire(
        buf: Span<'a>,
        cisco: bool,
    ) -> IResult<Span<'a>, Self, LocatedBgpRouteRefreshMessageParsingError<'a>> {
        let (buf, afi) = be_u16(buf)?;
        let (buf, reserved) = be_u8(buf)?;
        let (buf, safi) = be_u8(buf)?;
        Ok((
            buf,
            BgpRouteRefreshMessage::from_wire_parts(AddressType::new(afi, safi), reserved, cisco),
        ))
    }
}
