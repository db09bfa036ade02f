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
    notification::{CeaseError, HoldTimerExpiredError, OpenMessageError},
    wire::{
        deserializer::{
            notification::{
                BgpNotificationMessageParsingError, LocatedBgpNotificationMessageParsingError,
            },
            BgpParsingContext,
        },
        serializer::{notification::BgpNotificationMessageWritingError, BgpMessageWritingError},
        tests::BGP_MARKER,
    },
    BgpMessage, BgpNotificationMessage,
};
use bgpwire_parse_utils::test_helpers::{
    combine, test_parse_error, test_parsed_completely, test_parsed_completely_with_one_input,
    test_write, test_write_with_one_input,
};
use nom::error::ErrorKind;

#[test]
fn test_notification() -> Result<(), BgpNotificationMessageWritingError> {
    let good_cease_wire = [0x06, 0x02, 0x05];
    let good_hold_timer_wire = [0x04, 0x00];
    let good_unknown_sub_code_wire = [0x02, 0x63, 0x01, 0x02];
    let good_unknown_code_wire = [0x2a, 0x01];
    let bad_incomplete_wire = [0x06];

    let good_cease = BgpNotificationMessage::CeaseError(CeaseError::AdministrativeShutdown {
        value: vec![0x05],
    });
    let good_hold_timer =
        BgpNotificationMessage::HoldTimerExpiredError(HoldTimerExpiredError::Unspecific {
            value: vec![],
        });
    let good_unknown_sub_code =
        BgpNotificationMessage::OpenMessageError(OpenMessageError::Other {
            sub_code: 0x63,
            value: vec![0x01, 0x02],
        });
    let good_unknown_code = BgpNotificationMessage::Unrecognized {
        code: 0x2a,
        sub_code: 0x01,
        value: vec![],
    };
    let bad_incomplete = LocatedBgpNotificationMessageParsingError::new(
        &bad_incomplete_wire[1..],
        BgpNotificationMessageParsingError::NomError(ErrorKind::Eof),
    );

    test_parsed_completely(&good_cease_wire, &good_cease);
    test_parsed_completely(&good_hold_timer_wire, &good_hold_timer);
    test_parsed_completely(&good_unknown_sub_code_wire, &good_unknown_sub_code);
    test_parsed_completely(&good_unknown_code_wire, &good_unknown_code);
    test_parse_error::<BgpNotificationMessage, LocatedBgpNotificationMessageParsingError<'_>>(
        &bad_incomplete_wire,
        &bad_incomplete,
    );

    test_write(&good_cease, &good_cease_wire)?;
    test_write(&good_hold_timer, &good_hold_timer_wire)?;
    test_write(&good_unknown_sub_code, &good_unknown_sub_code_wire)?;
    test_write(&good_unknown_code, &good_unknown_code_wire)?;
    Ok(())
}

#[test]
fn test_notification_message() -> Result<(), BgpMessageWritingError> {
    let good_wire = combine(vec![BGP_MARKER, &[0x00, 0x16, 0x03, 0x06, 0x02, 0x05]]);
    let good = BgpMessage::Notification(BgpNotificationMessage::CeaseError(
        CeaseError::AdministrativeShutdown { value: vec![0x05] },
    ));
    test_parsed_completely_with_one_input(&good_wire[..], &mut BgpParsingContext::default(), &good);
    test_write_with_one_input(&good, false, &good_wire)?;
    Ok(())
}
