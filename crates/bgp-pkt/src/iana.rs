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

//! Contains BGP codes that are registered at IANA [BGP Parameters](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml)

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

/// Generates the `Undefined*` carrier and the integer conversions shared by
/// all the code registries below.
macro_rules! iana_code {
    ($code:ident, $undefined:ident, $repr:ty) => {
        #[doc = concat!("Value is not one of [`", stringify!($code), "`], the carried value is the undefined code.")]
        #[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
        pub struct $undefined(pub $repr);

        impl From<$code> for $repr {
            fn from(value: $code) -> Self {
                value as $repr
            }
        }

        impl TryFrom<$repr> for $code {
            type Error = $undefined;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match Self::from_repr(value) {
                    Some(val) => Ok(val),
                    None => Err($undefined(value)),
                }
            }
        }
    };
}

/// BGP Message types as registered in IANA [BGP Message Types](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-1)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BgpMessageType {
    Open = 1,
    Update = 2,
    Notification = 3,
    KeepAlive = 4,
    /// Route Refresh message is registered in [RFC2918](https://datatracker.ietf.org/doc/html/rfc2918)
    RouteRefresh = 5,
    /// Pre-standard route refresh still sent by Cisco speakers, same layout as
    /// [`BgpMessageType::RouteRefresh`]
    CiscoRouteRefresh = 128,
}

iana_code!(BgpMessageType, UndefinedBgpMessageType, u8);

/// BGP Path Attributes as defined by IANA [BGP Path Attributes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-2)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PathAttributeType {
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    Origin = 1,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    AsPath = 2,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    NextHop = 3,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    MultiExitDiscriminator = 4,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    LocalPreference = 5,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    AtomicAggregate = 6,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    Aggregator = 7,

    /// [RFC1997](https://datatracker.ietf.org/doc/html/rfc1997)
    Communities = 8,

    /// [RFC4456](https://datatracker.ietf.org/doc/html/rfc4456)
    OriginatorId = 9,

    /// [RFC4456](https://datatracker.ietf.org/doc/html/rfc4456)
    ClusterList = 10,

    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MpReachNlri = 14,

    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MpUnreachNlri = 15,

    /// [RFC4360](https://datatracker.ietf.org/doc/html/rfc4360)
    ExtendedCommunities = 16,

    /// [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
    As4Path = 17,

    /// [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
    As4Aggregator = 18,

    /// [RFC8092](https://datatracker.ietf.org/doc/html/rfc8092)
    LargeCommunities = 32,
}

iana_code!(PathAttributeType, UndefinedPathAttributeType, u8);

/// BGP Error (Notification) Codes as defined by IANA [BGP Error (Notification) Codes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-3)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BgpErrorNotificationCode {
    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    MessageHeaderError = 1,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    OpenMessageError = 2,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    UpdateMessageError = 3,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    HoldTimerExpired = 4,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    FiniteStateMachineError = 5,

    /// [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271)
    Cease = 6,

    /// [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313)
    RouteRefreshMessageError = 7,
}

iana_code!(
    BgpErrorNotificationCode,
    UndefinedBgpErrorNotificationCode,
    u8
);

/// Message Header Error sub-codes for [`BgpErrorNotificationCode::MessageHeaderError`] as defined by IANA [Message Header Error subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-5)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MessageHeaderErrorSubCode {
    /// [RFC Errata 4493](https://www.rfc-editor.org/errata_search.php?eid=4493)
    Unspecific = 0,
    ConnectionNotSynchronized = 1,
    BadMessageLength = 2,
    BadMessageType = 3,
}

iana_code!(
    MessageHeaderErrorSubCode,
    UndefinedMessageHeaderErrorSubCode,
    u8
);

/// OPEN Message Error sub-codes for [`BgpErrorNotificationCode::OpenMessageError`] as defined by IANA [OPEN Message Error subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-6)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OpenMessageErrorSubCode {
    /// [RFC Errata 4493](https://www.rfc-editor.org/errata_search.php?eid=4493)
    Unspecific = 0,
    UnsupportedVersionNumber = 1,
    BadPeerAs = 2,
    BadBgpIdentifier = 3,
    UnsupportedOptionalParameter = 4,
    UnacceptableHoldTime = 6,

    /// [RFC5492](https://datatracker.ietf.org/doc/html/rfc5492)
    UnsupportedCapability = 7,
}

iana_code!(
    OpenMessageErrorSubCode,
    UndefinedOpenMessageErrorSubCode,
    u8
);

/// UPDATE Message Error sub-codes for [`BgpErrorNotificationCode::UpdateMessageError`] as defined by IANA [UPDATE Message Error subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-7)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UpdateMessageErrorSubCode {
    /// [RFC Errata 4493](https://www.rfc-editor.org/errata_search.php?eid=4493)
    Unspecific = 0,
    MalformedAttributeList = 1,
    UnrecognizedWellKnownAttribute = 2,
    MissingWellKnownAttribute = 3,
    AttributeFlagsError = 4,
    AttributeLengthError = 5,
    InvalidOriginAttribute = 6,
    InvalidNextHopAttribute = 8,
    OptionalAttributeError = 9,
    InvalidNetworkField = 10,
    MalformedAsPath = 11,
}

iana_code!(
    UpdateMessageErrorSubCode,
    UndefinedUpdateMessageErrorSubCode,
    u8
);

/// Hold Timer Expired has no sub-codes registered, only zero is sent.
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum HoldTimerExpiredErrorSubCode {
    Unspecific = 0,
}

iana_code!(
    HoldTimerExpiredErrorSubCode,
    UndefinedHoldTimerExpiredErrorSubCode,
    u8
);

/// BGP Finite State Machine Error sub-codes for [`BgpErrorNotificationCode::FiniteStateMachineError`] as defined by IANA [BGP Finite State Machine Error Subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-finite-state-machine-error-subcodes)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FiniteStateMachineErrorSubCode {
    /// [RFC6608](https://datatracker.ietf.org/doc/html/rfc6608)
    UnspecifiedError = 0,

    /// [RFC6608](https://datatracker.ietf.org/doc/html/rfc6608)
    ReceiveUnexpectedMessageInOpenSentState = 1,

    /// [RFC6608](https://datatracker.ietf.org/doc/html/rfc6608)
    ReceiveUnexpectedMessageInOpenConfirmState = 2,

    /// [RFC6608](https://datatracker.ietf.org/doc/html/rfc6608)
    ReceiveUnexpectedMessageInEstablishedState = 3,
}

iana_code!(
    FiniteStateMachineErrorSubCode,
    UndefinedFiniteStateMachineErrorSubCode,
    u8
);

/// BGP Cease NOTIFICATION message Error sub-codes for [`BgpErrorNotificationCode::Cease`] as defined by IANA [BGP Cease NOTIFICATION message subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-8)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CeaseErrorSubCode {
    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    MaximumNumberOfPrefixesReached = 1,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486) and [RFC9003](https://datatracker.ietf.org/doc/html/rfc9003)
    AdministrativeShutdown = 2,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    PeerDeConfigured = 3,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486) and [RFC9003](https://datatracker.ietf.org/doc/html/rfc9003)
    AdministrativeReset = 4,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    ConnectionRejected = 5,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    OtherConfigurationChange = 6,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    ConnectionCollisionResolution = 7,

    /// [RFC4486](https://datatracker.ietf.org/doc/html/rfc4486)
    OutOfResources = 8,
}

iana_code!(CeaseErrorSubCode, UndefinedCeaseErrorSubCode, u8);

/// BGP ROUTE-REFRESH Message Error subcodes for [`BgpErrorNotificationCode::RouteRefreshMessageError`] as defined by IANA [BGP ROUTE-REFRESH Message Error subcodes](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#route-refresh-error-subcodes)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RouteRefreshMessageErrorSubCode {
    /// [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313)
    InvalidMessageLength = 1,
}

iana_code!(
    RouteRefreshMessageErrorSubCode,
    UndefinedRouteRefreshMessageErrorSubCode,
    u8
);

/// [BGP OPEN Optional Parameter Types](https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-11)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BgpOpenMessageParameterType {
    /// [RFC5492](https://datatracker.ietf.org/doc/html/rfc5492)
    Capability = 2,
}

iana_code!(
    BgpOpenMessageParameterType,
    UndefinedBgpOpenMessageParameterType,
    u8
);

/// [BGP Capabilities Codes](https://www.iana.org/assignments/capability-codes/capability-codes.xhtml)
#[repr(u8)]
#[derive(
    Display, FromRepr, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize,
)]
pub enum BgpCapabilityCode {
    /// [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MultiProtocolExtensions = 1,

    /// [RFC2918](https://datatracker.ietf.org/doc/html/rfc2918)
    RouteRefreshCapability = 2,

    /// [RFC4724](https://datatracker.ietf.org/doc/html/rfc4724)
    GracefulRestartCapability = 64,

    /// [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
    FourOctetAs = 65,

    /// [RFC7911](https://datatracker.ietf.org/doc/html/rfc7911)
    AddPathCapability = 69,

    /// [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313)
    EnhancedRouteRefresh = 70,

    /// Pre-standard route refresh capability
    CiscoRouteRefresh = 128,
}

iana_code!(BgpCapabilityCode, UndefinedBgpCapabilityCode, u8);

/// [Address Family Numbers](https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml)
#[repr(u16)]
#[derive(Display, FromRepr, Copy, Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AddressFamily {
    IPv4 = 1,
    IPv6 = 2,
    L2vpn = 25,
}

iana_code!(AddressFamily, UndefinedAddressFamily, u16);

/// [Subsequent Address Family Identifiers (SAFI) Parameters](https://www.iana.org/assignments/safi-namespace/safi-namespace.xhtml)
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SubsequentAddressFamily {
    Unicast = 1,
    Multicast = 2,
    NlriMplsLabels = 4,
    BgpEvpn = 70,
    MplsVpn = 128,
}

iana_code!(
    SubsequentAddressFamily,
    UndefinedSubsequentAddressFamily,
    u8
);

/// AFI/SAFI pair as carried on the wire.
///
/// The numbers are kept raw, since a peer may advertise or send address
/// families this crate has no model for and the pair still needs to be
/// negotiated, logged and archived.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct AddressType {
    afi: u16,
    safi: u8,
}

impl AddressType {
    pub const IPV4_UNICAST: AddressType = AddressType::new(1, 1);
    pub const IPV4_MULTICAST: AddressType = AddressType::new(1, 2);
    pub const IPV6_UNICAST: AddressType = AddressType::new(2, 1);
    pub const IPV6_MULTICAST: AddressType = AddressType::new(2, 2);

    /// Used when no address family can be attributed to a message
    pub const UNSPECIFIED: AddressType = AddressType::new(0, 0);

    pub const fn new(afi: u16, safi: u8) -> Self {
        Self { afi, safi }
    }

    pub const fn afi(&self) -> u16 {
        self.afi
    }

    pub const fn safi(&self) -> u8 {
        self.safi
    }

    pub fn address_family(&self) -> Result<AddressFamily, UndefinedAddressFamily> {
        AddressFamily::try_from(self.afi)
    }

    pub fn subsequent_address_family(
        &self,
    ) -> Result<SubsequentAddressFamily, UndefinedSubsequentAddressFamily> {
        SubsequentAddressFamily::try_from(self.safi)
    }
}

impl From<(AddressFamily, SubsequentAddressFamily)> for AddressType {
    fn from(value: (AddressFamily, SubsequentAddressFamily)) -> Self {
        AddressType::new(value.0.into(), value.1.into())
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.afi, self.safi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type() {
        assert_eq!(BgpMessageType::try_from(1), Ok(BgpMessageType::Open));
        assert_eq!(
            BgpMessageType::try_from(128),
            Ok(BgpMessageType::CiscoRouteRefresh)
        );
        assert_eq!(
            BgpMessageType::try_from(6),
            Err(UndefinedBgpMessageType(6))
        );
        assert_eq!(u8::from(BgpMessageType::RouteRefresh), 5);
    }

    #[test]
    fn test_address_type() {
        let ipv6_multicast: AddressType =
            (AddressFamily::IPv6, SubsequentAddressFamily::Multicast).into();
        assert_eq!(ipv6_multicast, AddressType::IPV6_MULTICAST);
        assert_eq!(ipv6_multicast.address_family(), Ok(AddressFamily::IPv6));
        assert_eq!(
            AddressType::new(16388, 71).address_family(),
            Err(UndefinedAddressFamily(16388))
        );
        assert_eq!(AddressType::IPV4_UNICAST.to_string(), "(1,1)");
    }
}
