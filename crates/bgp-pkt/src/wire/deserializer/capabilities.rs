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
    capabilities::*,
    iana::{AddressType, BgpCapabilityCode},
    wire::{
        ADD_PATH_ADDRESS_FAMILY_LENGTH, ENHANCED_ROUTE_REFRESH_CAPABILITY_LENGTH,
        FOUR_OCTET_AS_CAPABILITY_LENGTH, GRACEFUL_RESTART_ADDRESS_FAMILY_LENGTH,
        MULTI_PROTOCOL_EXTENSIONS_CAPABILITY_LENGTH, ROUTE_REFRESH_CAPABILITY_LENGTH,
    },
};
use bgpwire_parse_utils::{ErrorKindSerdeDeref, Located, ReadablePdu, Span};
use nom::{
    error::{ErrorKind, FromExternalError, ParseError},
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};

/// BGP Capability Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpCapabilityParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    InvalidRouteRefreshLength(u8),
    InvalidEnhancedRouteRefreshLength(u8),
    InvalidMultiProtocolExtensionsLength(u8),
    InvalidFourOctetAsLength(u8),
    InvalidGracefulRestartLength(u8),
    InvalidAddPathLength(u8),
    InvalidAddPathSendReceiveValue(u8),
}

parsing_error_conversions!(BgpCapabilityParsingError);

pub type LocatedBgpCapabilityParsingError<'a> = Located<'a, BgpCapabilityParsingError>;

const GRACEFUL_RESTART_RESTART_BIT: u16 = 0x8000;
const GRACEFUL_RESTART_NOTIFICATION_BIT: u16 = 0x4000;
const GRACEFUL_RESTART_TIME_MASK: u16 = 0x0fff;
const GRACEFUL_RESTART_FORWARDING_STATE_BIT: u8 = 0x80;

const ADD_PATH_RECEIVE: u8 = 0x01;
const ADD_PATH_SEND: u8 = 0x02;

fn parse_unrecognized_capability(
    code: u8,
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, value) = nom::multi::length_count(be_u8, be_u8)(buf)?;
    Ok((
        buf,
        BgpCapability::Unrecognized(UnrecognizedCapability::new(code, value)),
    ))
}

/// Helper function to read and check the capability exact length
#[inline]
fn check_capability_length<'a, E, L: FromExternalError<Span<'a>, E> + ParseError<Span<'a>>>(
    buf: Span<'a>,
    expected: u8,
    err: fn(u8) -> E,
) -> IResult<Span<'a>, u8, L> {
    let (buf, length) = nom::combinator::map_res(be_u8, |length| {
        if length != expected {
            Err(err(length))
        } else {
            Ok(length)
        }
    })(buf)?;
    Ok((buf, length))
}

/// Capabilities with a list of fixed size address families, checks the
/// length is a multiple of the family length after a fixed size header
#[inline]
fn check_capability_list_length<'a>(
    buf: Span<'a>,
    header_len: u8,
    element_len: u8,
    err: fn(u8) -> BgpCapabilityParsingError,
) -> IResult<Span<'a>, Span<'a>, LocatedBgpCapabilityParsingError<'a>> {
    let (buf, length) = nom::combinator::map_res(be_u8, |length| {
        if length < header_len || (length - header_len) % element_len != 0 {
            Err(err(length))
        } else {
            Ok(length)
        }
    })(buf)?;
    nom::bytes::complete::take(length)(buf)
}

fn parse_address_type(buf: Span<'_>) -> IResult<Span<'_>, AddressType, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, afi) = be_u16(buf)?;
    let (buf, safi) = be_u8(buf)?;
    Ok((buf, AddressType::new(afi, safi)))
}

fn parse_multi_protocol_extensions_capability(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, _) = check_capability_length(buf, MULTI_PROTOCOL_EXTENSIONS_CAPABILITY_LENGTH, |x| {
        BgpCapabilityParsingError::InvalidMultiProtocolExtensionsLength(x)
    })?;
    let (buf, afi) = be_u16(buf)?;
    let (buf, _reserved) = be_u8(buf)?;
    let (buf, safi) = be_u8(buf)?;
    Ok((
        buf,
        BgpCapability::MultiProtocolExtensions(MultiProtocolExtensionsCapability::new(
            AddressType::new(afi, safi),
        )),
    ))
}

fn parse_four_octet_as_capability(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, _) = check_capability_length(buf, FOUR_OCTET_AS_CAPABILITY_LENGTH, |x| {
        BgpCapabilityParsingError::InvalidFourOctetAsLength(x)
    })?;
    let (buf, asn4) = be_u32(buf)?;
    Ok((buf, BgpCapability::FourOctetAs(FourOctetAsCapability::new(asn4))))
}

impl<'a> ReadablePdu<'a, LocatedBgpCapabilityParsingError<'a>> for GracefulRestartAddressFamily {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedBgpCapabilityParsingError<'a>> {
        let (buf, address_type) = parse_address_type(buf)?;
        let (buf, flags) = be_u8(buf)?;
        Ok((
            buf,
            GracefulRestartAddressFamily::new(
                flags & GRACEFUL_RESTART_FORWARDING_STATE_BIT == GRACEFUL_RESTART_FORWARDING_STATE_BIT,
                address_type,
            ),
        ))
    }
}

fn parse_graceful_restart_capability(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, value) = check_capability_list_length(
        buf,
        2,
        GRACEFUL_RESTART_ADDRESS_FAMILY_LENGTH,
        BgpCapabilityParsingError::InvalidGracefulRestartLength,
    )?;
    let (value, header) = be_u16(value)?;
    let restart = header & GRACEFUL_RESTART_RESTART_BIT == GRACEFUL_RESTART_RESTART_BIT;
    let graceful_notification =
        header & GRACEFUL_RESTART_NOTIFICATION_BIT == GRACEFUL_RESTART_NOTIFICATION_BIT;
    let time = header & GRACEFUL_RESTART_TIME_MASK;
    let (_, address_families) = bgpwire_parse_utils::parse_till_empty(value)?;
    Ok((
        buf,
        BgpCapability::GracefulRestartCapability(GracefulRestartCapability::new(
            restart,
            graceful_notification,
            time,
            address_families,
        )),
    ))
}

impl<'a> ReadablePdu<'a, LocatedBgpCapabilityParsingError<'a>> for AddPathAddressFamily {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedBgpCapabilityParsingError<'a>> {
        let (buf, address_type) = parse_address_type(buf)?;
        let (buf, send_receive) = nom::combinator::map_res(be_u8, |x| {
            if x == 0 || x > (ADD_PATH_SEND | ADD_PATH_RECEIVE) {
                Err(BgpCapabilityParsingError::InvalidAddPathSendReceiveValue(x))
            } else {
                Ok(x)
            }
        })(buf)?;
        Ok((
            buf,
            AddPathAddressFamily::new(
                address_type,
                send_receive & ADD_PATH_SEND == ADD_PATH_SEND,
                send_receive & ADD_PATH_RECEIVE == ADD_PATH_RECEIVE,
            ),
        ))
    }
}

fn parse_add_path_capability(
    buf: Span<'_>,
) -> IResult<Span<'_>, BgpCapability, LocatedBgpCapabilityParsingError<'_>> {
    let (buf, value) = check_capability_list_length(
        buf,
        0,
        ADD_PATH_ADDRESS_FAMILY_LENGTH,
        BgpCapabilityParsingError::InvalidAddPathLength,
    )?;
    let (_, address_families) = bgpwire_parse_utils::parse_till_empty(value)?;
    Ok((
        buf,
        BgpCapability::AddPath(AddPathCapability::new(address_families)),
    ))
}

impl<'a> ReadablePdu<'a, LocatedBgpCapabilityParsingError<'a>> for BgpCapability {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedBgpCapabilityParsingError<'a>> {
        let (buf, code) = be_u8(buf)?;
        match BgpCapabilityCode::try_from(code) {
            Ok(BgpCapabilityCode::MultiProtocolExtensions) => {
                parse_multi_protocol_extensions_capability(buf)
            }
            Ok(BgpCapabilityCode::RouteRefreshCapability) => {
                let (buf, _) = check_capability_length(buf, ROUTE_REFRESH_CAPABILITY_LENGTH, |x| {
                    BgpCapabilityParsingError::InvalidRouteRefreshLength(x)
                })?;
                Ok((buf, BgpCapability::RouteRefresh))
            }
            Ok(BgpCapabilityCode::CiscoRouteRefresh) => {
                let (buf, _) = check_capability_length(buf, ROUTE_REFRESH_CAPABILITY_LENGTH, |x| {
                    BgpCapabilityParsingError::InvalidRouteRefreshLength(x)
                })?;
                Ok((buf, BgpCapability::CiscoRouteRefresh))
            }
            Ok(BgpCapabilityCode::EnhancedRouteRefresh) => {
                let (buf, _) =
                    check_capability_length(buf, ENHANCED_ROUTE_REFRESH_CAPABILITY_LENGTH, |x| {
                        BgpCapabilityParsingError::InvalidEnhancedRouteRefreshLength(x)
                    })?;
                Ok((buf, BgpCapability::EnhancedRouteRefresh))
            }
            Ok(BgpCapabilityCode::GracefulRestartCapability) => {
                parse_graceful_restart_capability(buf)
            }
            Ok(BgpCapabilityCode::FourOctetAs) => parse_four_octet_as_capability(buf),
            Ok(BgpCapabilityCode::AddPathCapability) => parse_add_path_capability(buf),
            Err(_) => parse_unrecognized_capability(code, buf),
        }
    }
}
