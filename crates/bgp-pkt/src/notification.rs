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

//! Representations for BGP Notification message
//!
//! Every error family is an enum of the sub-codes registered at IANA, each
//! carrying the opaque diagnostic data. Sub-codes that are not registered are
//! kept in an `Other` variant, so any (code, sub-code) pair received from a
//! peer can be represented and written back unchanged.

use crate::iana::{
    BgpErrorNotificationCode, CeaseErrorSubCode, FiniteStateMachineErrorSubCode,
    HoldTimerExpiredErrorSubCode, MessageHeaderErrorSubCode, OpenMessageErrorSubCode,
    RouteRefreshMessageErrorSubCode, UpdateMessageErrorSubCode,
};
use serde::{Deserialize, Serialize};

/// Defines an error family enum from its IANA sub-code registry.
macro_rules! notification_sub_error {
    ($(#[$doc:meta])* $name:ident, $sub_code:ident, [$($variant:ident),+ $(,)?]) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
        pub enum $name {
            $($variant { value: Vec<u8> },)+
            /// Sub-code that is not registered for this error code
            Other { sub_code: u8, value: Vec<u8> },
        }

        impl $name {
            pub fn from_parts(sub_code: u8, value: Vec<u8>) -> Self {
                match $sub_code::try_from(sub_code) {
                    $(Ok($sub_code::$variant) => Self::$variant { value },)+
                    Err(_) => Self::Other { sub_code, value },
                }
            }

            pub fn sub_code(&self) -> u8 {
                match self {
                    $(Self::$variant { .. } => $sub_code::$variant.into(),)+
                    Self::Other { sub_code, .. } => *sub_code,
                }
            }

            pub fn value(&self) -> &[u8] {
                match self {
                    $(Self::$variant { value } => value,)+
                    Self::Other { value, .. } => value,
                }
            }
        }
    };
}

notification_sub_error!(
    /// Errors detected while processing the message header, see
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-6.1)
    MessageHeaderError,
    MessageHeaderErrorSubCode,
    [
        Unspecific,
        ConnectionNotSynchronized,
        BadMessageLength,
        BadMessageType,
    ]
);

notification_sub_error!(
    /// Errors detected while processing an Open message, see
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-6.2)
    OpenMessageError,
    OpenMessageErrorSubCode,
    [
        Unspecific,
        UnsupportedVersionNumber,
        BadPeerAs,
        BadBgpIdentifier,
        UnsupportedOptionalParameter,
        UnacceptableHoldTime,
        UnsupportedCapability,
    ]
);

notification_sub_error!(
    /// Errors detected while processing an Update message, see
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-6.3)
    UpdateMessageError,
    UpdateMessageErrorSubCode,
    [
        Unspecific,
        MalformedAttributeList,
        UnrecognizedWellKnownAttribute,
        MissingWellKnownAttribute,
        AttributeFlagsError,
        AttributeLengthError,
        InvalidOriginAttribute,
        InvalidNextHopAttribute,
        OptionalAttributeError,
        InvalidNetworkField,
        MalformedAsPath,
    ]
);

notification_sub_error!(
    HoldTimerExpiredError,
    HoldTimerExpiredErrorSubCode,
    [Unspecific]
);

notification_sub_error!(
    /// See [RFC6608](https://datatracker.ietf.org/doc/html/rfc6608)
    FiniteStateMachineError,
    FiniteStateMachineErrorSubCode,
    [
        UnspecifiedError,
        ReceiveUnexpectedMessageInOpenSentState,
        ReceiveUnexpectedMessageInOpenConfirmState,
        ReceiveUnexpectedMessageInEstablishedState,
    ]
);

notification_sub_error!(
    /// See [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    CeaseError,
    CeaseErrorSubCode,
    [
        MaximumNumberOfPrefixesReached,
        AdministrativeShutdown,
        PeerDeConfigured,
        AdministrativeReset,
        ConnectionRejected,
        OtherConfigurationChange,
        ConnectionCollisionResolution,
        OutOfResources,
    ]
);

notification_sub_error!(
    /// See [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313)
    RouteRefreshError,
    RouteRefreshMessageErrorSubCode,
    [InvalidMessageLength]
);

/// BGP Notification message
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Error code    | Error subcode |   Data (variable)             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpNotificationMessage {
    MessageHeaderError(MessageHeaderError),
    OpenMessageError(OpenMessageError),
    UpdateMessageError(UpdateMessageError),
    HoldTimerExpiredError(HoldTimerExpiredError),
    FiniteStateMachineError(FiniteStateMachineError),
    CeaseError(CeaseError),
    RouteRefreshError(RouteRefreshError),
    /// Error code that is not registered
    Unrecognized {
        code: u8,
        sub_code: u8,
        value: Vec<u8>,
    },
}

impl BgpNotificationMessage {
    /// Build a notification from its raw wire fields, never fails
    pub fn from_parts(code: u8, sub_code: u8, value: Vec<u8>) -> Self {
        match BgpErrorNotificationCode::try_from(code) {
            Ok(BgpErrorNotificationCode::MessageHeaderError) => {
                Self::MessageHeaderError(MessageHeaderError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::OpenMessageError) => {
                Self::OpenMessageError(OpenMessageError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::UpdateMessageError) => {
                Self::UpdateMessageError(UpdateMessageError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::HoldTimerExpired) => {
                Self::HoldTimerExpiredError(HoldTimerExpiredError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::FiniteStateMachineError) => {
                Self::FiniteStateMachineError(FiniteStateMachineError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::Cease) => {
                Self::CeaseError(CeaseError::from_parts(sub_code, value))
            }
            Ok(BgpErrorNotificationCode::RouteRefreshMessageError) => {
                Self::RouteRefreshError(RouteRefreshError::from_parts(sub_code, value))
            }
            Err(_) => Self::Unrecognized {
                code,
                sub_code,
                value,
            },
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::MessageHeaderError(_) => BgpErrorNotificationCode::MessageHeaderError.into(),
            Self::OpenMessageError(_) => BgpErrorNotificationCode::OpenMessageError.into(),
            Self::UpdateMessageError(_) => BgpErrorNotificationCode::UpdateMessageError.into(),
            Self::HoldTimerExpiredError(_) => BgpErrorNotificationCode::HoldTimerExpired.into(),
            Self::FiniteStateMachineError(_) => {
                BgpErrorNotificationCode::FiniteStateMachineError.into()
            }
            Self::CeaseError(_) => BgpErrorNotificationCode::Cease.into(),
            Self::RouteRefreshError(_) => BgpErrorNotificationCode::RouteRefreshMessageError.into(),
            Self::Unrecognized { code, .. } => *code,
        }
    }

    pub fn sub_code(&self) -> u8 {
        match self {
            Self::MessageHeaderError(error) => error.sub_code(),
            Self::OpenMessageError(error) => error.sub_code(),
            Self::UpdateMessageError(error) => error.sub_code(),
            Self::HoldTimerExpiredError(error) => error.sub_code(),
            Self::FiniteStateMachineError(error) => error.sub_code(),
            Self::CeaseError(error) => error.sub_code(),
            Self::RouteRefreshError(error) => error.sub_code(),
            Self::Unrecognized { sub_code, .. } => *sub_code,
        }
    }

    /// Opaque diagnostic data
    pub fn value(&self) -> &[u8] {
        match self {
            Self::MessageHeaderError(error) => error.value(),
            Self::OpenMessageError(error) => error.value(),
            Self::UpdateMessageError(error) => error.value(),
            Self::HoldTimerExpiredError(error) => error.value(),
            Self::FiniteStateMachineError(error) => error.value(),
            Self::CeaseError(error) => error.value(),
            Self::RouteRefreshError(error) => error.value(),
            Self::Unrecognized { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            BgpNotificationMessage::from_parts(2, 6, vec![]),
            BgpNotificationMessage::OpenMessageError(OpenMessageError::UnacceptableHoldTime {
                value: vec![]
            })
        );
        assert_eq!(
            BgpNotificationMessage::from_parts(1, 2, vec![0x00, 0x10]),
            BgpNotificationMessage::MessageHeaderError(MessageHeaderError::BadMessageLength {
                value: vec![0x00, 0x10]
            })
        );
        assert_eq!(
            BgpNotificationMessage::from_parts(4, 9, vec![1]),
            BgpNotificationMessage::HoldTimerExpiredError(HoldTimerExpiredError::Other {
                sub_code: 9,
                value: vec![1]
            })
        );
        assert_eq!(
            BgpNotificationMessage::from_parts(42, 1, vec![]),
            BgpNotificationMessage::Unrecognized {
                code: 42,
                sub_code: 1,
                value: vec![]
            }
        );
    }

    #[test]
    fn test_fields() {
        let cease = BgpNotificationMessage::CeaseError(CeaseError::AdministrativeShutdown {
            value: vec![0x05],
        });
        assert_eq!(cease.code(), 6);
        assert_eq!(cease.sub_code(), 2);
        assert_eq!(cease.value(), &[0x05]);

        let unknown_sub_code = BgpNotificationMessage::from_parts(5, 200, vec![7, 7]);
        assert_eq!(unknown_sub_code.code(), 5);
        assert_eq!(unknown_sub_code.sub_code(), 200);
        assert_eq!(unknown_sub_code.value(), &[7, 7]);
    }
}
