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
    iana::AddressType,
    wire::{
        deserializer::capabilities::{
            BgpCapabilityParsingError, LocatedBgpCapabilityParsingError,
        },
        serializer::capabilities::BgpCapabilityWritingError,
    },
};
use bgpwire_parse_utils::test_helpers::{test_parse_error, test_parsed_completely, test_write};

#[test]
fn test_multi_protocol_extensions() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [0x01, 0x04, 0x00, 0x02, 0x00, 0x01];
    let bad_wire = [0x01, 0x03, 0x00, 0x02, 0x00];

    let good = BgpCapability::MultiProtocolExtensions(MultiProtocolExtensionsCapability::new(
        AddressType::IPV6_UNICAST,
    ));
    let bad = LocatedBgpCapabilityParsingError::new(
        &bad_wire[1..],
        BgpCapabilityParsingError::InvalidMultiProtocolExtensionsLength(3),
    );

    test_parsed_completely(&good_wire, &good);
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(&bad_wire, &bad);
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_route_refresh() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [0x02, 0x00];
    let cisco_wire = [0x80, 0x00];
    let enhanced_wire = [0x46, 0x00];
    let bad_wire = [0x02, 0x01, 0x00];

    let bad = LocatedBgpCapabilityParsingError::new(
        &bad_wire[1..],
        BgpCapabilityParsingError::InvalidRouteRefreshLength(1),
    );

    test_parsed_completely(&good_wire, &BgpCapability::RouteRefresh);
    test_parsed_completely(&cisco_wire, &BgpCapability::CiscoRouteRefresh);
    test_parsed_completely(&enhanced_wire, &BgpCapability::EnhancedRouteRefresh);
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(&bad_wire, &bad);
    test_write(&BgpCapability::RouteRefresh, &good_wire)?;
    test_write(&BgpCapability::CiscoRouteRefresh, &cisco_wire)?;
    test_write(&BgpCapability::EnhancedRouteRefresh, &enhanced_wire)?;
    Ok(())
}

#[test]
fn test_four_octet_as() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [0x41, 0x04, 0x00, 0x01, 0x00, 0x00];
    let bad_wire = [0x41, 0x02, 0x00, 0x01];

    let good = BgpCapability::FourOctetAs(FourOctetAsCapability::new(65536));
    let bad = LocatedBgpCapabilityParsingError::new(
        &bad_wire[1..],
        BgpCapabilityParsingError::InvalidFourOctetAsLength(2),
    );

    test_parsed_completely(&good_wire, &good);
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(&bad_wire, &bad);
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_graceful_restart() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [0x40, 0x06, 0x80, 0x78, 0x00, 0x01, 0x01, 0x80];
    let empty_wire = [0x40, 0x02, 0x40, 0x00];
    let bad_wire = [0x40, 0x03, 0x80, 0x78, 0x00];

    let good = BgpCapability::GracefulRestartCapability(GracefulRestartCapability::new(
        true,
        false,
        120,
        vec![GracefulRestartAddressFamily::new(
            true,
            AddressType::IPV4_UNICAST,
        )],
    ));
    let empty = BgpCapability::GracefulRestartCapability(GracefulRestartCapability::new(
        false,
        true,
        0,
        vec![],
    ));
    let bad = LocatedBgpCapabilityParsingError::new(
        &bad_wire[1..],
        BgpCapabilityParsingError::InvalidGracefulRestartLength(3),
    );

    test_parsed_completely(&good_wire, &good);
    test_parsed_completely(&empty_wire, &empty);
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(&bad_wire, &bad);
    test_write(&good, &good_wire)?;
    test_write(&empty, &empty_wire)?;
    Ok(())
}

#[test]
fn test_add_path() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [
        0x45, 0x08, 0x00, 0x01, 0x01, 0x01, 0x00, 0x02, 0x01, 0x03,
    ];
    let bad_value_wire = [0x45, 0x04, 0x00, 0x01, 0x01, 0x04];
    let bad_length_wire = [0x45, 0x05, 0x00, 0x01, 0x01, 0x01, 0x00];

    let good = BgpCapability::AddPath(AddPathCapability::new(vec![
        AddPathAddressFamily::new(AddressType::IPV4_UNICAST, false, true),
        AddPathAddressFamily::new(AddressType::IPV6_UNICAST, true, true),
    ]));
    let bad_value = LocatedBgpCapabilityParsingError::new(
        &bad_value_wire[5..],
        BgpCapabilityParsingError::InvalidAddPathSendReceiveValue(4),
    );
    let bad_length = LocatedBgpCapabilityParsingError::new(
        &bad_length_wire[1..],
        BgpCapabilityParsingError::InvalidAddPathLength(5),
    );

    test_parsed_completely(&good_wire, &good);
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(
        &bad_value_wire,
        &bad_value,
    );
    test_parse_error::<BgpCapability, LocatedBgpCapabilityParsingError<'_>>(
        &bad_length_wire,
        &bad_length,
    );
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_unrecognized_capability() -> Result<(), BgpCapabilityWritingError> {
    let good_wire = [0x49, 0x03, 0x01, 0x02, 0x03];
    let good = BgpCapability::Unrecognized(UnrecognizedCapability::new(73, vec![1, 2, 3]));

    test_parsed_completely(&good_wire, &good);
    test_write(&good, &good_wire)?;
    Ok(())
}
