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
    iana::UndefinedBgpMessageType,
    notification::{BgpNotificationMessage, MessageHeaderError},
    wire::deserializer::{
        ipv4_prefix, ipv6_prefix, BgpMessageParsingError, BgpParsingContext, Ipv4PrefixParsingError,
        Ipv6PrefixParsingError, LocatedBgpMessageParsingError, LocatedIpv4PrefixParsingError,
        LocatedIpv6PrefixParsingError,
    },
    BgpMessage,
};
use bgpwire_parse_utils::test_helpers::{combine, test_parse_error_with_one_input};
use ipnet::{Ipv4Net, Ipv6Net};
use nom::error::ErrorKind;
use rstest::rstest;
use std::str::FromStr;

mod capabilities;
mod keepalive;
mod notification;

pub(crate) const BGP_MARKER: &[u8] = &[0xff; 16];

#[test]
fn test_bad_marker() {
    let bad_marker_wire = combine(vec![&[0xff; 15], &[0xfe], &[0x00, 0x13, 0x04]]);
    let bad_marker = LocatedBgpMessageParsingError::new(
        &bad_marker_wire,
        BgpMessageParsingError::ConnectionNotSynchronized(u128::MAX - 1),
    );
    test_parse_error_with_one_input::<BgpMessage, &mut BgpParsingContext, LocatedBgpMessageParsingError<'_>>(
        &bad_marker_wire,
        &mut BgpParsingContext::default(),
        &bad_marker,
    );
}

#[test]
fn test_undefined_message_type() {
    let bad_type_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x09]]);
    let bad_type = LocatedBgpMessageParsingError::new(
        &bad_type_wire[18..],
        BgpMessageParsingError::UndefinedBgpMessageType(UndefinedBgpMessageType(9)),
    );
    test_parse_error_with_one_input::<BgpMessage, &mut BgpParsingContext, LocatedBgpMessageParsingError<'_>>(
        &bad_type_wire,
        &mut BgpParsingContext::default(),
        &bad_type,
    );
}

#[rstest]
#[case::below_header(&[0x00, 0x12, 0x04], 18)]
#[case::above_max(&[0x10, 0x01, 0x04], 4097)]
#[case::short_open(&[0x00, 0x1c, 0x01, 0x04, 0x00, 0x64, 0x00, 0xb4, 0x0a, 0x00, 0x00], 28)]
#[case::short_notification(&[0x00, 0x14, 0x03, 0x06], 20)]
#[case::long_keepalive(&[0x00, 0x14, 0x04, 0x00], 20)]
#[case::short_route_refresh(&[0x00, 0x16, 0x05, 0x00, 0x01, 0x00], 22)]
fn test_bad_message_length(#[case] after_marker: &[u8], #[case] length: u16) {
    let wire = combine(vec![BGP_MARKER, after_marker]);
    let expected = LocatedBgpMessageParsingError::new(
        &wire[16..],
        BgpMessageParsingError::BadMessageLength(length),
    );
    test_parse_error_with_one_input::<BgpMessage, &mut BgpParsingContext, LocatedBgpMessageParsingError<'_>>(
        &wire,
        &mut BgpParsingContext::default(),
        &expected,
    );
}

#[test]
fn test_header_errors_to_notification() {
    assert_eq!(
        BgpNotificationMessage::from(BgpMessageParsingError::ConnectionNotSynchronized(0)),
        BgpNotificationMessage::MessageHeaderError(
            MessageHeaderError::ConnectionNotSynchronized { value: vec![] }
        )
    );
    assert_eq!(
        BgpNotificationMessage::from(BgpMessageParsingError::BadMessageLength(18)),
        BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageLength {
            value: vec![0x00, 0x12]
        })
    );
    assert_eq!(
        BgpNotificationMessage::from(BgpMessageParsingError::UndefinedBgpMessageType(
            UndefinedBgpMessageType(9)
        )),
        BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageType {
            value: vec![9]
        })
    );
}

#[test]
fn test_ip_prefixes() {
    let good_v4 = [0x13, 0xc0, 0xa8, 0x20];
    let bad_len_v4 = [0x21, 0x0a, 0x00, 0x00, 0x00, 0x00];
    let truncated_v4 = [0x18, 0x0a];
    let good_v6 = [0x20, 0x20, 0x01, 0x0d, 0xb8];
    let bad_len_v6 = [0x81];

    assert_eq!(
        ipv4_prefix(&good_v4),
        Ok((&[][..], Ipv4Net::from_str("192.168.32.0/19").unwrap()))
    );
    assert_eq!(
        ipv4_prefix(&bad_len_v4),
        Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
            &bad_len_v4,
            Ipv4PrefixParsingError::InvalidIpv4PrefixLen(33)
        )))
    );
    assert_eq!(
        ipv4_prefix(&truncated_v4),
        Err(nom::Err::Error(LocatedIpv4PrefixParsingError::new(
            &truncated_v4[1..],
            Ipv4PrefixParsingError::NomError(ErrorKind::Eof)
        )))
    );
    assert_eq!(
        ipv6_prefix(&good_v6),
        Ok((&[][..], Ipv6Net::from_str("2001:db8::/32").unwrap()))
    );
    assert_eq!(
        ipv6_prefix(&bad_len_v6),
        Err(nom::Err::Error(LocatedIpv6PrefixParsingError::new(
            &bad_len_v6,
            Ipv6PrefixParsingError::InvalidIpv6PrefixLen(129)
        )))
    );
}
