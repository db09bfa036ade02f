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

//! Deserializer for BGP Update message

use crate::{
    notification::UpdateMessageError,
    path_attribute::PathAttribute,
    wire::deserializer::{
        ipv4_prefix,
        path_attribute::{PathAttributeParsingError, RawPathAttribute},
        BgpParsingContext, Ipv4PrefixParsingError,
    },
    BgpUpdateMessage,
};
use bgpwire_parse_utils::{
    parse_till_empty_into_located_with, ErrorKindSerdeDeref, Located, ReadablePdu,
    ReadablePduWithOneInput, Span,
};
use nom::{error::ErrorKind, number::complete::be_u16, IResult};
use serde::{Deserialize, Serialize};

/// BGP Update Message Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpUpdateMessageParsingError {
    /// Errors triggered by the nom parser, see [nom::error::ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    /// An attribute header overruns the total path attribute length
    MalformedAttributeList,
    PathAttributeError(PathAttributeParsingError),
    /// Malformed prefix in the withdrawn routes or the NLRI fields
    Ipv4PrefixError(Ipv4PrefixParsingError),
}

parsing_error_conversions!(
    BgpUpdateMessageParsingError,
    PathAttributeError(PathAttributeParsingError),
    Ipv4PrefixError(Ipv4PrefixParsingError),
);

pub type LocatedBgpUpdateMessageParsingError<'a> = Located<'a, BgpUpdateMessageParsingError>;

impl From<BgpUpdateMessageParsingError> for UpdateMessageError {
    fn from(value: BgpUpdateMessageParsingError) -> Self {
        let value_less = vec![];
        match value {
            BgpUpdateMessageParsingError::NomError(_)
            | BgpUpdateMessageParsingError::MalformedAttributeList => {
                UpdateMessageError::MalformedAttributeList { value: value_less }
            }
            BgpUpdateMessageParsingError::Ipv4PrefixError(_) => {
                UpdateMessageError::InvalidNetworkField { value: value_less }
            }
            BgpUpdateMessageParsingError::PathAttributeError(err) => match err {
                PathAttributeParsingError::NomError(_)
                | PathAttributeParsingError::InvalidAttributeLength { .. } => {
                    UpdateMessageError::AttributeLengthError { value: value_less }
                }
                PathAttributeParsingError::UndefinedOrigin(_) => {
                    UpdateMessageError::InvalidOriginAttribute { value: value_less }
                }
                PathAttributeParsingError::UndefinedAsPathSegmentType(_) => {
                    UpdateMessageError::MalformedAsPath { value: value_less }
                }
                PathAttributeParsingError::Ipv4PrefixError(_)
                | PathAttributeParsingError::Ipv6PrefixError(_) => {
                    UpdateMessageError::InvalidNetworkField { value: value_less }
                }
                PathAttributeParsingError::InvalidNextHopLength(_) => {
                    UpdateMessageError::OptionalAttributeError { value: value_less }
                }
                PathAttributeParsingError::InvalidPathAttribute(_, _) => {
                    UpdateMessageError::AttributeFlagsError { value: value_less }
                }
            },
        }
    }
}

/// Parse the path attributes list. Malformed attribute values are skipped and
/// recorded in the context unless it asks to fail on them. Once an attribute
/// header overruns the list there is no way to find the next attribute, and
/// the whole message is rejected.
fn parse_path_attributes<'a>(
    buf: Span<'a>,
    ctx: &mut BgpParsingContext,
) -> Result<Vec<PathAttribute>, nom::Err<LocatedBgpUpdateMessageParsingError<'a>>> {
    let mut buf = buf;
    let mut path_attributes = Vec::new();
    while !buf.is_empty() {
        let (tmp, raw) = match RawPathAttribute::from_wire(buf) {
            Ok(value) => value,
            Err(_) => {
                return Err(nom::Err::Error(LocatedBgpUpdateMessageParsingError::new(
                    buf,
                    BgpUpdateMessageParsingError::MalformedAttributeList,
                )))
            }
        };
        buf = tmp;
        match raw.parse(ctx.asn4) {
            Ok(attr) => path_attributes.push(attr),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                if ctx.fail_on_malformed_path_attr {
                    return Err(nom::Err::Error(err.map_into()));
                }
                ctx.parsing_errors.path_attr_errors.push(err.into_error());
            }
            Err(nom::Err::Incomplete(needed)) => return Err(nom::Err::Incomplete(needed)),
        }
    }
    Ok(path_attributes)
}

impl<'a> ReadablePduWithOneInput<'a, &mut BgpParsingContext, LocatedBgpUpdateMessageParsingError<'a>>
    for BgpUpdateMessage
{
    fn from_wire(
        buf: Span<'a>,
        ctx: &mut BgpParsingContext,
    ) -> IResult<Span<'a>, Self, LocatedBgpUpdateMessageParsingError<'a>> {
        let (buf, withdrawn_buf) = nom::multi::length_data(be_u16)(buf)?;
        let (_, withdraw_routes) =
            parse_till_empty_into_located_with(withdrawn_buf, ipv4_prefix)?;
        let (buf, path_attributes_buf) = nom::multi::length_data(be_u16)(buf)?;
        let path_attributes = parse_path_attributes(path_attributes_buf, ctx)?;
        let (buf, nlri) = parse_till_empty_into_located_with(buf, ipv4_prefix)?;
        Ok((
            buf,
            BgpUpdateMessage::new(withdraw_routes, path_attributes, nlri),
        ))
    }
}
