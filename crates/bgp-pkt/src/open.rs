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

//! Representations for BGP Open message

use crate::{capabilities::BgpCapability, iana::BgpCapabilityCode};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

pub const BGP_VERSION: u8 = 4;

/// Placeholder written in the 2-octet `My Autonomous System` field when the
/// real AS number doesn't fit, see [RFC6793](https://datatracker.ietf.org/doc/html/rfc6793)
pub const AS_TRANS: u16 = 23456;

/// BGP Open message
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+
/// |    Version    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     My Autonomous System      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Hold Time           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         BGP Identifier                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Opt Parm Len  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |             Optional Parameters (variable)                    |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpOpenMessage {
    version: u8,
    my_as: u16,
    hold_time: u16,
    bgp_id: Ipv4Addr,
    params: Vec<BgpOpenMessageParameter>,
}

impl BgpOpenMessage {
    pub fn new(
        my_as: u16,
        hold_time: u16,
        bgp_id: Ipv4Addr,
        params: Vec<BgpOpenMessageParameter>,
    ) -> BgpOpenMessage {
        BgpOpenMessage {
            version: BGP_VERSION,
            my_as,
            hold_time,
            bgp_id,
            params,
        }
    }

    pub const fn version(&self) -> u8 {
        self.version
    }

    pub const fn my_as(&self) -> u16 {
        self.my_as
    }

    /// The AS number of the sender, taking the four-octet AS capability into
    /// account when it's advertised.
    pub fn my_asn4(&self) -> u32 {
        self.capabilities()
            .find_map(|cap| match cap {
                BgpCapability::FourOctetAs(asn4) => Some(asn4.asn4()),
                _ => None,
            })
            .unwrap_or(self.my_as as u32)
    }

    pub const fn hold_time(&self) -> u16 {
        self.hold_time
    }

    pub const fn bgp_id(&self) -> Ipv4Addr {
        self.bgp_id
    }

    pub const fn params(&self) -> &Vec<BgpOpenMessageParameter> {
        &self.params
    }

    /// Shortcut to iterate over the capabilities from all the parameters
    pub fn capabilities(&self) -> impl Iterator<Item = &BgpCapability> {
        self.params
            .iter()
            .filter_map(|param| match param {
                BgpOpenMessageParameter::Capabilities(capabilities) => Some(capabilities),
                BgpOpenMessageParameter::Unrecognized { .. } => None,
            })
            .flatten()
    }

    /// Check if the peer advertised a given capability
    pub fn has_capability(&self, code: BgpCapabilityCode) -> bool {
        self.capabilities().any(|cap| cap.code() == Ok(code))
    }
}

/// Optional Parameter included in [`BgpOpenMessage`].
///
/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-...
/// |  Parm. Type   | Parm. Length  |  Parameter Value (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-...
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpOpenMessageParameter {
    /// Capabilities Advertisement
    Capabilities(Vec<BgpCapability>),

    /// Parameter types we don't interpret, kept to be written back as is
    Unrecognized { param_type: u8, value: Vec<u8> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::FourOctetAsCapability;

    #[test]
    fn test_my_asn4() {
        let two_octets = BgpOpenMessage::new(
            100,
            180,
            Ipv4Addr::new(10, 0, 0, 1),
            vec![BgpOpenMessageParameter::Capabilities(vec![
                BgpCapability::RouteRefresh,
            ])],
        );
        let four_octets = BgpOpenMessage::new(
            AS_TRANS,
            180,
            Ipv4Addr::new(10, 0, 0, 1),
            vec![
                BgpOpenMessageParameter::Unrecognized {
                    param_type: 1,
                    value: vec![0],
                },
                BgpOpenMessageParameter::Capabilities(vec![BgpCapability::FourOctetAs(
                    FourOctetAsCapability::new(4_200_000_000),
                )]),
            ],
        );
        assert_eq!(two_octets.my_asn4(), 100);
        assert!(!two_octets.has_capability(BgpCapabilityCode::FourOctetAs));
        assert_eq!(four_octets.my_asn4(), 4_200_000_000);
        assert!(four_octets.has_capability(BgpCapabilityCode::FourOctetAs));
        assert_eq!(four_octets.capabilities().count(), 1);
    }
}
