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

use crate::{
    capabilities::BgpCapability,
    iana::{BgpOpenMessageParameterType, UndefinedBgpOpenMessageParameterType},
    notification::OpenMessageError,
    open::{BgpOpenMessageParameter, BGP_VERSION},
    wire::deserializer::{capabilities::BgpCapabilityParsingError, BgpParsingContext},
    BgpOpenMessage,
};
use bgpwire_parse_utils::{ErrorKindSerdeDeref, Located, ReadablePdu, ReadablePduWithOneInput, Span};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// BGP Open Message Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpOpenMessageParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    UnsupportedVersionNumber(u8),
    ParameterError(BgpParameterParsingError),
}

parsing_error_conversions!(
    BgpOpenMessageParsingError,
    ParameterError(BgpParameterParsingError),
);

pub type LocatedBgpOpenMessageParsingError<'a> = Located<'a, BgpOpenMessageParsingError>;

/// BGP Open Message Parameter Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpParameterParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    CapabilityError(BgpCapabilityParsingError),
}

parsing_error_conversions!(
    BgpParameterParsingError,
    CapabilityError(BgpCapabilityParsingError),
);

pub type LocatedBgpParameterParsingError<'a> = Located<'a, BgpParameterParsingError>;

impl From<BgpOpenMessageParsingError> for OpenMessageError {
    fn from(value: BgpOpenMessageParsingError) -> Self {
        match value {
            BgpOpenMessageParsingError::UnsupportedVersionNumber(_) => {
                // The data field carries the largest supported version number
                OpenMessageError::UnsupportedVersionNumber {
                    value: (BGP_VERSION as u16).to_be_bytes().to_vec(),
                }
            }
            BgpOpenMessageParsingError::NomError(_)
            | BgpOpenMessageParsingError::ParameterError(_) => {
                OpenMessageError::Unspecific { value: vec![] }
            }
        }
    }
}

impl<'a> ReadablePduWithOneInput<'a, &mut BgpParsingContext, LocatedBgpOpenMessageParsingError<'a>>
    for BgpOpenMessage
{
    fn from_wire(
        buf: Span<'a>,
        ctx: &mut BgpParsingContext,
    ) -> IResult<Span<'a>, Self, LocatedBgpOpenMessageParsingError<'a>> {
        let (buf, _) = nom::combinator::map_res(be_u8, |x| {
            if x == BGP_VERSION {
                Ok(x)
            } else {
                Err(BgpOpenMessageParsingError::UnsupportedVersionNumber(x))
            }
        })(buf)?;
        let (buf, my_as) = be_u16(buf)?;
        let (buf, hold_time) = be_u16(buf)?;
        let (buf, bgp_id) = be_u32(buf)?;
        let bgp_id = Ipv4Addr::from(bgp_id);
        let (buf, mut params_buf) = nom::multi::length_data(be_u8)(buf)?;
        let mut params = Vec::new();
        while !params_buf.is_empty() {
            let (tmp, param) =
                bgpwire_parse_utils::parse_into_located_one_input(params_buf, &mut *ctx)?;
            params.push(param);
            params_buf = tmp;
        }
        Ok((buf, BgpOpenMessage::new(my_as, hold_time, bgp_id, params)))
    }
}

impl<'a> ReadablePduWithOneInput<'a, &mut BgpParsingContext, LocatedBgpParameterParsingError<'a>>
    for BgpOpenMessageParameter
{
    fn from_wire(
        buf: Span<'a>,
        ctx: &mut BgpParsingContext,
    ) -> IResult<Span<'a>, Self, LocatedBgpParameterParsingError<'a>> {
        let (buf, param_type) = be_u8(buf)?;
        let (buf, value) = nom::multi::length_data(be_u8)(buf)?;
        match BgpOpenMessageParameterType::try_from(param_type) {
            Ok(BgpOpenMessageParameterType::Capability) => {
                let capabilities = parse_capabilities(value, ctx)?;
                Ok((buf, BgpOpenMessageParameter::Capabilities(capabilities)))
            }
            Err(UndefinedBgpOpenMessageParameterType(param_type)) => Ok((
                buf,
                BgpOpenMessageParameter::Unrecognized {
                    param_type,
                    value: value.to_vec(),
                },
            )),
        }
    }
}

/// Parse all the capabilities in a capabilities parameter. A capability with
/// a malformed value is skipped and recorded in the context, unless the
/// context asks to fail on it. A capability whose length overruns the
/// parameter is always an error.
fn parse_capabilities<'a>(
    buf: Span<'a>,
    ctx: &mut BgpParsingContext,
) -> Result<Vec<BgpCapability>, nom::Err<LocatedBgpParameterParsingError<'a>>> {
    let mut buf = buf;
    let mut capabilities = Vec::new();
    while !buf.is_empty() {
        let tlv_start = buf;
        let (tmp, _code) = be_u8(buf)?;
        let (tmp, _value) = nom::multi::length_data(be_u8)(tmp)?;
        let tlv = &tlv_start[..tlv_start.len() - tmp.len()];
        buf = tmp;
        match BgpCapability::from_wire(tlv) {
            Ok((_, capability)) => capabilities.push(capability),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                if ctx.fail_on_capability_error {
                    return Err(nom::Err::Error(err.map_into()));
                }
                ctx.parsing_errors.capability_errors.push(err.into_error());
            }
            Err(nom::Err::Incomplete(needed)) => return Err(nom::Err::Incomplete(needed)),
        }
    }
    Ok(capabilities)
}
