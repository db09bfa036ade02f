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

//! BGP Capabilities advertised in BGP Open Messages.
//! See [RFC5492 Capabilities Advertisement with BGP-4](https://datatracker.ietf.org/doc/html/rfc5492)

use crate::iana::{AddressType, BgpCapabilityCode};
use serde::{Deserialize, Serialize};

/// BGP Capabilities are included as parameters in the
/// [`crate::open::BgpOpenMessage`] message to indicate support of certain BGP
/// Features.
///
/// See [RFC5492 Capabilities Advertisement with BGP-4](https://datatracker.ietf.org/doc/html/rfc5492)
///
/// ```text
/// +------------------------------+
/// | Capability Code (1 octet)    |
/// +------------------------------+
/// | Capability Length (1 octet)  |
/// +------------------------------+
/// | Capability Value (variable)  |
/// ~                              ~
/// +------------------------------+
/// ```
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpCapability {
    /// Defined in [RFC4760](https://datatracker.ietf.org/doc/html/rfc4760)
    MultiProtocolExtensions(MultiProtocolExtensionsCapability),

    /// Defined in [RFC2918](https://datatracker.ietf.org/doc/html/rfc2918)
    RouteRefresh,

    /// Defined in [RFC7313](https://datatracker.ietf.org/doc/html/rfc7313)
    EnhancedRouteRefresh,

    CiscoRouteRefresh,

    /// Defined in [RFC4724](https://datatracker.ietf.org/doc/html/rfc4724)
    GracefulRestartCapability(GracefulRestartCapability),

    AddPath(AddPathCapability),

    FourOctetAs(FourOctetAsCapability),

    Unrecognized(UnrecognizedCapability),
}

impl BgpCapability {
    pub const fn code(&self) -> Result<BgpCapabilityCode, u8> {
        match self {
            Self::MultiProtocolExtensions(_) => Ok(BgpCapabilityCode::MultiProtocolExtensions),
            Self::RouteRefresh => Ok(BgpCapabilityCode::RouteRefreshCapability),
            Self::EnhancedRouteRefresh => Ok(BgpCapabilityCode::EnhancedRouteRefresh),
            Self::CiscoRouteRefresh => Ok(BgpCapabilityCode::CiscoRouteRefresh),
            Self::GracefulRestartCapability(_) => Ok(BgpCapabilityCode::GracefulRestartCapability),
            Self::AddPath(_) => Ok(BgpCapabilityCode::AddPathCapability),
            Self::FourOctetAs(_) => Ok(BgpCapabilityCode::FourOctetAs),
            Self::Unrecognized(value) => Err(value.code),
        }
    }
}

/// Generic struct to carry all the unsupported BGP capabilities
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedCapability {
    code: u8,
    value: Vec<u8>,
}

impl UnrecognizedCapability {
    pub const fn new(code: u8, value: Vec<u8>) -> Self {
        Self { code, value }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn value(&self) -> &Vec<u8> {
        &self.value
    }
}

/// Capability advertisement to speak a multi-protocol for a given
/// [`AddressType`] as defined in [RFC4760 Multiprotocol Extensions for BGP-4](https://datatracker.ietf.org/doc/html/rfc4760)
///
/// ```text
/// 0       7      15      23      31
/// +-------+-------+-------+-------+
/// |      AFI      | Res.  | SAFI  |
/// +-------+-------+-------+-------+
/// ```
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MultiProtocolExtensionsCapability {
    address_type: AddressType,
}

impl MultiProtocolExtensionsCapability {
    pub const fn new(address_type: AddressType) -> Self {
        Self { address_type }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }
}

/// Defined in [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FourOctetAsCapability {
    asn4: u32,
}

impl FourOctetAsCapability {
    pub const fn new(asn4: u32) -> Self {
        Self { asn4 }
    }

    pub const fn asn4(&self) -> u32 {
        self.asn4
    }
}

/// Defined in [RFC4724](https://datatracker.ietf.org/doc/html/rfc4724)
///
/// ```text
/// +--------------------------------------------------+
/// | Restart Flags (4 bits)                           |
/// +--------------------------------------------------+
/// | Restart Time in seconds (12 bits)                |
/// +--------------------------------------------------+
/// | Address Family Identifier (16 bits)              |
/// +--------------------------------------------------+
/// | Subsequent Address Family Identifier (8 bits)    |
/// +--------------------------------------------------+
/// | Flags for Address Family (8 bits)                |
/// +--------------------------------------------------+
/// | ...                                              |
/// +--------------------------------------------------+
/// ```
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GracefulRestartCapability {
    restart: bool,
    graceful_notification: bool,
    time: u16,
    address_families: Vec<GracefulRestartAddressFamily>,
}

impl GracefulRestartCapability {
    pub fn new(
        restart: bool,
        graceful_notification: bool,
        time: u16,
        address_families: Vec<GracefulRestartAddressFamily>,
    ) -> Self {
        Self {
            restart,
            graceful_notification,
            time,
            address_families,
        }
    }

    pub const fn restart(&self) -> bool {
        self.restart
    }

    pub const fn graceful_notification(&self) -> bool {
        self.graceful_notification
    }

    /// Restart time in seconds, only the lower 12 bits are sent on the wire
    pub const fn time(&self) -> u16 {
        self.time
    }

    pub const fn address_families(&self) -> &Vec<GracefulRestartAddressFamily> {
        &self.address_families
    }
}

#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GracefulRestartAddressFamily {
    forwarding_state: bool,
    address_type: AddressType,
}

impl GracefulRestartAddressFamily {
    pub const fn new(forwarding_state: bool, address_type: AddressType) -> Self {
        Self {
            forwarding_state,
            address_type,
        }
    }

    pub const fn forwarding_state(&self) -> bool {
        self.forwarding_state
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }
}

/// Allows the advertisement on multiple paths for the same address prefix
/// without replacing any previous ones.
///
/// See [RFC7911](https://datatracker.ietf.org/doc/html/RFC7911)
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AddPathCapability {
    address_families: Vec<AddPathAddressFamily>,
}

impl AddPathCapability {
    pub const fn new(address_families: Vec<AddPathAddressFamily>) -> Self {
        Self { address_families }
    }

    pub const fn address_families(&self) -> &Vec<AddPathAddressFamily> {
        &self.address_families
    }
}

/// Single Address Family with Add Path capability enabled
/// ```text
/// +------------------------------------------------+
/// | Address Family Identifier (2 octets)           |
/// +------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet) |
/// +------------------------------------------------+
/// | Send/Receive (1 octet)                         |
/// +------------------------------------------------+
/// ```
#[derive(Debug, Hash, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AddPathAddressFamily {
    address_type: AddressType,
    send: bool,
    receive: bool,
}

impl AddPathAddressFamily {
    pub const fn new(address_type: AddressType, send: bool, receive: bool) -> Self {
        Self {
            address_type,
            send,
            receive,
        }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    ///  This field indicates whether the sender is able to send multiple paths
    /// to its peer the [`AddressType`]
    pub const fn send(&self) -> bool {
        self.send
    }

    ///  This field indicates whether the sender is able to receive multiple
    /// paths from its peer the [`AddressType`]
    pub const fn receive(&self) -> bool {
        self.receive
    }
}
