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

//! Representation for `RouteRefresh` BGP message.

use crate::iana::{AddressType, BgpMessageType};
use serde::{Deserialize, Serialize};

/// Route Refresh message as defined in
/// Route Refresh Capability for BGP-4 [RFC2918](https://datatracker.ietf.org/doc/html/rfc2918)
///
/// The same body is sent with the pre-standard message type 128 by Cisco
/// speakers, `cisco` records which of the two types was used.
///
/// ```text
///  0       7      15      23      31
/// +-------+-------+-------+-------+
/// |      AFI      | Res.  | SAFI  |
/// +-------+-------+-------+-------+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpRouteRefreshMessage {
    address_type: AddressType,
    reserved: u8,
    cisco: bool,
}

impl BgpRouteRefreshMessage {
    pub const fn new(address_type: AddressType) -> Self {
        Self {
            address_type,
            reserved: 0,
            cisco: false,
        }
    }

    pub const fn new_cisco(address_type: AddressType) -> Self {
        Self {
            address_type,
            reserved: 0,
            cisco: true,
        }
    }

    pub(crate) const fn from_wire_parts(address_type: AddressType, reserved: u8, cisco: bool) -> Self {
        Self {
            address_type,
            reserved,
            cisco,
        }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub const fn reserved(&self) -> u8 {
        self.reserved
    }

    pub const fn cisco(&self) -> bool {
        self.cisco
    }

    pub const fn message_type(&self) -> BgpMessageType {
        if self.cisco {
            BgpMessageType::CiscoRouteRefresh
        } else {
            BgpMessageType::RouteRefresh
        }
    }
}
