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

//! Deserializer library for BGP's wire protocol

/// Implements the conversions needed by the nom combinators for a parsing
/// error enum: `From<ErrorKind>` into its `NomError` variant, plus one
/// `From` impl for every wrapped error type.
macro_rules! parsing_error_conversions {
    ($error:ident $(, $variant:ident($inner:ty))* $(,)?) => {
        impl From<nom::error::ErrorKind> for $error {
            fn from(kind: nom::error::ErrorKind) -> Self {
                Self::NomError(kind)
            }
        }

        $(
            impl From<$inner> for $error {
                fn from(value: $inner) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

pub mod capabilities;
pub mod notification;
pub mod open;
pub mod path_attribute;
pub mod route_refresh;
pub mod update;

use crate::{
    iana::{BgpMessageType, UndefinedBgpMessageType},
    notification::{
        BgpNotificationMessage, MessageHeaderError, RouteRefreshError,
    },
    wire::deserializer::{
        capabilities::BgpCapabilityParsingError, notification::BgpNotificationMessageParsingError,
        open::BgpOpenMessageParsingError, path_attribute::PathAttributeParsingError,
        route_refresh::BgpRouteRefreshMessageParsingError, update::BgpUpdateMessageParsingError,
    },
    BgpMessage,
};
use bgpwire_parse_utils::{
    parse_into_located, parse_into_located_one_input, ErrorKindSerdeDeref, Located,
    ReadablePduWithOneInput, Span,
};
use ipnet::{Ipv4Net, Ipv6Net};
use nom::{
    error::ErrorKind,
    number::complete::{be_u128, be_u16, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Min message size in BGP is 19 octets. They're counted from
/// 16-octets synchronization header, 2-octets length, and 1 octet for type.
pub const BGP_MIN_MESSAGE_LENGTH: u16 = 19;

/// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271) defined max length as 4096.
pub const BGP_MAX_MESSAGE_LENGTH: u16 = 4096;

/// Header + version, AS, hold time, BGP ID and the optional parameters length
const BGP_OPEN_MIN_MESSAGE_LENGTH: u16 = 29;

/// Header + withdrawn routes length + total path attributes length
const BGP_UPDATE_MIN_MESSAGE_LENGTH: u16 = 23;

/// Header + error code and sub-code
const BGP_NOTIFICATION_MIN_MESSAGE_LENGTH: u16 = 21;

/// Header + AFI, reserved and SAFI
const BGP_ROUTE_REFRESH_MESSAGE_LENGTH: u16 = 23;

/// Errors that were found while parsing a message but didn't prevent the
/// message from being parsed. The offending element is left out of the
/// parsed message.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct BgpParsingIgnoredErrors {
    capability_errors: Vec<BgpCapabilityParsingError>,
    path_attr_errors: Vec<PathAttributeParsingError>,
}

impl BgpParsingIgnoredErrors {
    pub const fn capability_errors(&self) -> &Vec<BgpCapabilityParsingError> {
        &self.capability_errors
    }

    pub const fn path_attr_errors(&self) -> &Vec<PathAttributeParsingError> {
        &self.path_attr_errors
    }

    pub fn is_empty(&self) -> bool {
        self.capability_errors.is_empty() && self.path_attr_errors.is_empty()
    }
}

/// State carried across messages of the same session that changes how
/// messages are parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BgpParsingContext {
    asn4: bool,
    fail_on_capability_error: bool,
    fail_on_malformed_path_attr: bool,
    parsing_errors: BgpParsingIgnoredErrors,
}

impl BgpParsingContext {
    pub fn new(asn4: bool, fail_on_capability_error: bool, fail_on_malformed_path_attr: bool) -> Self {
        Self {
            asn4,
            fail_on_capability_error,
            fail_on_malformed_path_attr,
            parsing_errors: BgpParsingIgnoredErrors::default(),
        }
    }

    /// Four octet AS numbers, malformed capabilities and attributes are
    /// skipped
    pub fn asn4_default() -> Self {
        Self::new(true, false, false)
    }

    pub const fn asn4(&self) -> bool {
        self.asn4
    }

    pub fn set_asn4(&mut self, value: bool) {
        self.asn4 = value
    }

    pub const fn parsing_errors(&self) -> &BgpParsingIgnoredErrors {
        &self.parsing_errors
    }

    // Move out existing parsing errors and replace it with a new empty instant
    pub fn reset_parsing_errors(&mut self) -> BgpParsingIgnoredErrors {
        std::mem::take(&mut self.parsing_errors)
    }
}

impl Default for BgpParsingContext {
    /// Two octet AS numbers until the peers agree otherwise
    fn default() -> Self {
        Self::new(false, false, false)
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Ipv4PrefixParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    InvalidIpv4PrefixLen(u8),
}

parsing_error_conversions!(Ipv4PrefixParsingError);

pub type LocatedIpv4PrefixParsingError<'a> = Located<'a, Ipv4PrefixParsingError>;

/// Parse one length-prefixed IPv4 prefix, as found in the withdrawn routes,
/// the NLRI and the IPv4 multiprotocol NLRI fields
pub fn ipv4_prefix(
    buf: Span<'_>,
) -> IResult<Span<'_>, Ipv4Net, LocatedIpv4PrefixParsingError<'_>> {
    let input = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    if prefix_len > 32 {
        return Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
            input,
            Ipv4PrefixParsingError::InvalidIpv4PrefixLen(prefix_len),
        )));
    }
    // The prefix value must fall into the octet boundary, even if the prefix_len
    // doesn't. For example, prefix_len=19 => 3 octets
    let (buf, prefix) = nom::bytes::complete::take(prefix_len.div_ceil(8))(buf)?;
    let mut network = [0; 4];
    network[..prefix.len()].copy_from_slice(prefix);
    match Ipv4Net::new(Ipv4Addr::from(network), prefix_len) {
        Ok(net) => Ok((buf, net)),
        Err(_) => Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
            input,
            Ipv4PrefixParsingError::InvalidIpv4PrefixLen(prefix_len),
        ))),
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Ipv6PrefixParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    InvalidIpv6PrefixLen(u8),
}

parsing_error_conversions!(Ipv6PrefixParsingError);

pub type LocatedIpv6PrefixParsingError<'a> = Located<'a, Ipv6PrefixParsingError>;

pub fn ipv6_prefix(
    buf: Span<'_>,
) -> IResult<Span<'_>, Ipv6Net, LocatedIpv6PrefixParsingError<'_>> {
    let input = buf;
    let (buf, prefix_len) = be_u8(buf)?;
    if prefix_len > 128 {
        return Err(nom::Err::Error(LocatedIpv6PrefixParsingError::new(
            input,
            Ipv6PrefixParsingError::InvalidIpv6PrefixLen(prefix_len),
        )));
    }
    let (buf, prefix) = nom::bytes::complete::take(prefix_len.div_ceil(8))(buf)?;
    let mut network = [0; 16];
    network[..prefix.len()].copy_from_slice(prefix);
    match Ipv6Net::new(Ipv6Addr::from(network), prefix_len) {
        Ok(net) => Ok((buf, net)),
        Err(_) => Err(nom::Err::Error(LocatedIpv6PrefixParsingError::new(
            input,
            Ipv6PrefixParsingError::InvalidIpv6PrefixLen(prefix_len),
        ))),
    }
}

/// BGP Message Parsing errors
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpMessageParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),

    /// The first 16-bytes of a BGP message is NOT all set to `1`
    /// For simplicity, we carry the equivalent [`u128`] value that was invalid
    /// instead of the whole buffer
    ConnectionNotSynchronized(u128),

    /// Couldn't recognize the type octet in the BGPMessage, see
    /// [UndefinedBgpMessageType]
    UndefinedBgpMessageType(UndefinedBgpMessageType),

    /// BGP Message length is not in the defined \[min, max\] range for the
    /// given message type
    BadMessageLength(u16),

    BgpOpenMessageParsingError(BgpOpenMessageParsingError),

    BgpUpdateMessageParsingError(BgpUpdateMessageParsingError),

    BgpNotificationMessageParsingError(BgpNotificationMessageParsingError),

    BgpRouteRefreshMessageParsingError(BgpRouteRefreshMessageParsingError),
}

parsing_error_conversions!(
    BgpMessageParsingError,
    UndefinedBgpMessageType(UndefinedBgpMessageType),
    BgpOpenMessageParsingError(BgpOpenMessageParsingError),
    BgpUpdateMessageParsingError(BgpUpdateMessageParsingError),
    BgpNotificationMessageParsingError(BgpNotificationMessageParsingError),
    BgpRouteRefreshMessageParsingError(BgpRouteRefreshMessageParsingError),
);

pub type LocatedBgpMessageParsingError<'a> = Located<'a, BgpMessageParsingError>;

/// Check the length of a BGP message is valid according to it's type as
/// defined in [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-6.1)
#[inline]
const fn valid_message_length(message_type: BgpMessageType, length: u16) -> bool {
    match message_type {
        BgpMessageType::Open => length >= BGP_OPEN_MIN_MESSAGE_LENGTH,
        BgpMessageType::Update => length >= BGP_UPDATE_MIN_MESSAGE_LENGTH,
        BgpMessageType::Notification => length >= BGP_NOTIFICATION_MIN_MESSAGE_LENGTH,
        BgpMessageType::KeepAlive => length == BGP_MIN_MESSAGE_LENGTH,
        BgpMessageType::RouteRefresh | BgpMessageType::CiscoRouteRefresh => {
            length == BGP_ROUTE_REFRESH_MESSAGE_LENGTH
        }
    }
}

/// Parse [`BgpMessage`] length and type, then check that the length of a BGP
/// message is valid according to it's type.
#[inline]
fn parse_bgp_message_length_and_type(
    buf: Span<'_>,
) -> IResult<Span<'_>, (BgpMessageType, Span<'_>), LocatedBgpMessageParsingError<'_>> {
    let pre_len_buf = buf;
    let (buf, length) = be_u16(buf)?;
    let bad_length = || {
        nom::Err::Error(LocatedBgpMessageParsingError::new(
            pre_len_buf,
            BgpMessageParsingError::BadMessageLength(length),
        ))
    };

    // Fail early if the message length is not valid
    if !(BGP_MIN_MESSAGE_LENGTH..=BGP_MAX_MESSAGE_LENGTH).contains(&length) {
        return Err(bad_length());
    }

    // Only read the subset that is defined by the length, the marker and the
    // length field are already consumed
    let remainder_result: IResult<Span<'_>, Span<'_>, LocatedBgpMessageParsingError<'_>> =
        nom::bytes::complete::take(length - 18)(buf);
    let (remainder_buf, buf) = match remainder_result {
        Ok(value) => value,
        Err(_) => return Err(bad_length()),
    };
    let (buf, message_type) = nom::combinator::map_res(be_u8, BgpMessageType::try_from)(buf)?;
    if !valid_message_length(message_type, length) {
        return Err(bad_length());
    }
    Ok((remainder_buf, (message_type, buf)))
}

impl<'a> ReadablePduWithOneInput<'a, &mut BgpParsingContext, LocatedBgpMessageParsingError<'a>>
    for BgpMessage
{
    fn from_wire(
        buf: Span<'a>,
        ctx: &mut BgpParsingContext,
    ) -> IResult<Span<'a>, Self, LocatedBgpMessageParsingError<'a>> {
        let (buf, _) = nom::combinator::map_res(be_u128, |x| {
            if x == u128::MAX {
                Ok(x)
            } else {
                Err(BgpMessageParsingError::ConnectionNotSynchronized(x))
            }
        })(buf)?;

        // Parse both length and type together, since we need to do input validation on
        // the length based on the type of the message
        let (remainder_buf, (message_type, buf)) = parse_bgp_message_length_and_type(buf)?;
        let (buf, msg) = match message_type {
            BgpMessageType::Open => {
                let (buf, open) = parse_into_located_one_input(buf, &mut *ctx)?;
                (buf, BgpMessage::Open(open))
            }
            BgpMessageType::Update => {
                let (buf, update) = parse_into_located_one_input(buf, &mut *ctx)?;
                (buf, BgpMessage::Update(update))
            }
            BgpMessageType::Notification => {
                let (buf, notification) = parse_into_located(buf)?;
                (buf, BgpMessage::Notification(notification))
            }
            BgpMessageType::KeepAlive => (buf, BgpMessage::KeepAlive),
            BgpMessageType::RouteRefresh => {
                let (buf, route_refresh) = parse_into_located_one_input(buf, false)?;
                (buf, BgpMessage::RouteRefresh(route_refresh))
            }
            BgpMessageType::CiscoRouteRefresh => {
                let (buf, route_refresh) = parse_into_located_one_input(buf, true)?;
                (buf, BgpMessage::RouteRefresh(route_refresh))
            }
        };

        // Make sure we consumed the full BGP message as specified by its length
        if !buf.is_empty() {
            return Err(nom::Err::Error(LocatedBgpMessageParsingError::new(
                buf,
                BgpMessageParsingError::NomError(ErrorKind::NonEmpty),
            )));
        }
        Ok((remainder_buf, msg))
    }
}

impl From<BgpMessageParsingError> for BgpNotificationMessage {
    fn from(value: BgpMessageParsingError) -> Self {
        match value {
            BgpMessageParsingError::NomError(_) => {
                BgpNotificationMessage::MessageHeaderError(MessageHeaderError::Unspecific {
                    value: vec![],
                })
            }
            BgpMessageParsingError::ConnectionNotSynchronized(_) => {
                BgpNotificationMessage::MessageHeaderError(
                    MessageHeaderError::ConnectionNotSynchronized { value: vec![] },
                )
            }
            BgpMessageParsingError::UndefinedBgpMessageType(msg_type) => {
                BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageType {
                    value: vec![msg_type.0],
                })
            }
            BgpMessageParsingError::BadMessageLength(bad_length) => {
                BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageLength {
                    value: bad_length.to_be_bytes().to_vec(),
                })
            }
            BgpMessageParsingError::BgpOpenMessageParsingError(open_err) => {
                BgpNotificationMessage::OpenMessageError(open_err.into())
            }
            BgpMessageParsingError::BgpUpdateMessageParsingError(update_err) => {
                BgpNotificationMessage::UpdateMessageError(update_err.into())
            }
            BgpMessageParsingError::BgpNotificationMessageParsingError(_) => {
                BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageLength {
                    value: vec![],
                })
            }
            BgpMessageParsingError::BgpRouteRefreshMessageParsingError(_) => {
                BgpNotificationMessage::RouteRefreshError(RouteRefreshError::InvalidMessageLength {
                    value: vec![],
                })
            }
        }
    }
}
