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

//! Events driving the session FSM, named after
//! [RFC4271 Section 8.1](https://datatracker.ietf.org/doc/html/rfc4271#section-8.1).

use bgpwire_bgp_pkt::{
    codec::BgpFrameError,
    notification::{
        BgpNotificationMessage, MessageHeaderError, OpenMessageError, RouteRefreshError,
        UpdateMessageError,
    },
    open::BgpOpenMessage,
    route_refresh::BgpRouteRefreshMessage,
    update::BgpUpdateMessage,
    wire::deserializer::BgpParsingIgnoredErrors,
};

#[derive(Debug, Clone, Eq, PartialEq, strum_macros::Display)]
pub enum BgpEvent {
    /// **Event 1:** Local system administrator manually starts the peer
    /// connection, the local system initiates the TCP connection.
    ManualStart,

    /// **Event 4:** Local system administrator manually starts the peer
    /// connection, but waits for the peer to initiate the TCP connection.
    ManualStartPassive,

    /// **Event 2:** Local system administrator manually stops the peer
    /// connection.
    ManualStop,

    /// **Event 16/17:** The TCP connection is established, either by us or by
    /// the peer.
    TcpConnectionConfirmed,

    /// **Event 18:** The TCP connection failed or was closed by the peer.
    TcpConnectionFails,

    /// **Event 10**
    HoldTimerExpires,

    /// **Event 11**
    KeepAliveTimerExpires,

    /// **Event 19:** A valid Open message has been received
    BgpOpen(BgpOpenMessage),

    /// **Event 21:** A message with an invalid header has been received
    BgpHeaderErr(MessageHeaderError),

    /// **Event 22:** An Open message has been received with errors
    BgpOpenMsgErr(OpenMessageError),

    /// **Event 25:** A Notification message has been received
    NotifMsg(BgpNotificationMessage),

    /// **Event 26**
    KeepAliveMsg,

    /// **Event 27:** A valid Update message has been received. Attributes
    /// that failed to parse are left out of the message and listed in the
    /// ignored errors.
    UpdateMsg(BgpUpdateMessage, BgpParsingIgnoredErrors),

    /// **Event 28:** The Update message body can't be parsed
    UpdateMsgErr(UpdateMessageError),

    RouteRefreshMsg(BgpRouteRefreshMessage),

    /// Malformed Route Refresh message, see
    /// [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313#section-5)
    RouteRefreshMsgErr(RouteRefreshError),
}

impl From<BgpFrameError> for BgpEvent {
    fn from(value: BgpFrameError) -> Self {
        match BgpNotificationMessage::from(value) {
            BgpNotificationMessage::MessageHeaderError(err) => BgpEvent::BgpHeaderErr(err),
            BgpNotificationMessage::OpenMessageError(err) => BgpEvent::BgpOpenMsgErr(err),
            BgpNotificationMessage::UpdateMessageError(err) => BgpEvent::UpdateMsgErr(err),
            BgpNotificationMessage::RouteRefreshError(err) => BgpEvent::RouteRefreshMsgErr(err),
            BgpNotificationMessage::HoldTimerExpiredError(_)
            | BgpNotificationMessage::FiniteStateMachineError(_)
            | BgpNotificationMessage::CeaseError(_)
            | BgpNotificationMessage::Unrecognized { .. } => {
                BgpEvent::BgpHeaderErr(MessageHeaderError::Unspecific { value: vec![] })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgpwire_bgp_pkt::wire::deserializer::{
        open::BgpOpenMessageParsingError, update::BgpUpdateMessageParsingError,
        BgpMessageParsingError,
    };

    #[test]
    fn test_frame_error_to_event() {
        let header = BgpFrameError::Desynchronized(
            BgpMessageParsingError::ConnectionNotSynchronized(0),
        );
        assert_eq!(
            BgpEvent::from(header),
            BgpEvent::BgpHeaderErr(MessageHeaderError::ConnectionNotSynchronized {
                value: vec![]
            })
        );

        let open = BgpFrameError::Malformed(BgpMessageParsingError::BgpOpenMessageParsingError(
            BgpOpenMessageParsingError::UnsupportedVersionNumber(3),
        ));
        assert_eq!(
            BgpEvent::from(open),
            BgpEvent::BgpOpenMsgErr(OpenMessageError::UnsupportedVersionNumber {
                value: vec![0x00, 0x04]
            })
        );

        let update = BgpFrameError::Malformed(
            BgpMessageParsingError::BgpUpdateMessageParsingError(
                BgpUpdateMessageParsingError::MalformedAttributeList,
            ),
        );
        assert_eq!(
            BgpEvent::from(update),
            BgpEvent::UpdateMsgErr(UpdateMessageError::MalformedAttributeList { value: vec![] })
        );
    }
}
