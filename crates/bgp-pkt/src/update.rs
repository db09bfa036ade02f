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

//! Representation for BGP Update message

use crate::{
    iana::AddressType,
    path_attribute::{MpReach, MpUnreach, PathAttribute, PathAttributeValue},
};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// UPDATE messages are used to transfer routing information between BGP peers
/// as defined by [RFC4271](https://datatracker.ietf.org/doc/html/RFC4271).
///
/// ```text
/// +-----------------------------------------------------+
/// |   Withdrawn Routes Length (2 octets)                |
/// +-----------------------------------------------------+
/// |   Withdrawn Routes (variable)                       |
/// +-----------------------------------------------------+
/// |   Total Path Attribute Length (2 octets)            |
/// +-----------------------------------------------------+
/// |   Path Attributes (variable)                        |
/// +-----------------------------------------------------+
/// |   Network Layer Reachability Information (variable) |
/// +-----------------------------------------------------+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpUpdateMessage {
    withdraw_routes: Vec<Ipv4Net>,
    path_attributes: Vec<PathAttribute>,
    nlri: Vec<Ipv4Net>,
}

impl BgpUpdateMessage {
    pub fn new(
        withdraw_routes: Vec<Ipv4Net>,
        path_attributes: Vec<PathAttribute>,
        nlri: Vec<Ipv4Net>,
    ) -> Self {
        BgpUpdateMessage {
            withdraw_routes,
            path_attributes,
            nlri,
        }
    }

    pub const fn withdraw_routes(&self) -> &Vec<Ipv4Net> {
        &self.withdraw_routes
    }

    pub const fn path_attributes(&self) -> &Vec<PathAttribute> {
        &self.path_attributes
    }

    pub const fn nlri(&self) -> &Vec<Ipv4Net> {
        &self.nlri
    }

    /// The first `MP_REACH_NLRI` attribute, if any
    pub fn mp_reach(&self) -> Option<&MpReach> {
        self.path_attributes
            .iter()
            .find_map(|attr| match attr.value() {
                PathAttributeValue::MpReach(mp_reach) => Some(mp_reach),
                _ => None,
            })
    }

    /// The first `MP_UNREACH_NLRI` attribute, if any
    pub fn mp_unreach(&self) -> Option<&MpUnreach> {
        self.path_attributes
            .iter()
            .find_map(|attr| match attr.value() {
                PathAttributeValue::MpUnreach(mp_unreach) => Some(mp_unreach),
                _ => None,
            })
    }

    /// Check if the update is an End-of-RIB marker as defined in
    /// [RFC4724](https://datatracker.ietf.org/doc/html/rfc4724#section-2).
    /// Returns the address family the marker is sent for.
    pub fn end_of_rib(&self) -> Option<AddressType> {
        if !self.withdraw_routes.is_empty() || !self.nlri.is_empty() {
            return None;
        }
        if self.path_attributes.is_empty() {
            return Some(AddressType::IPV4_UNICAST);
        }
        match self.path_attributes.as_slice() {
            [attr] => match attr.value() {
                PathAttributeValue::MpUnreach(mp_unreach) if mp_unreach.nlri().is_empty() => {
                    Some(mp_unreach.address_type())
                }
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_attribute::{MpNlri, Origin};
    use std::str::FromStr;

    #[test]
    fn test_end_of_rib() {
        let ipv4_eor = BgpUpdateMessage::new(vec![], vec![], vec![]);
        let ipv6_eor = BgpUpdateMessage::new(
            vec![],
            vec![PathAttribute::from(
                true,
                false,
                false,
                false,
                PathAttributeValue::MpUnreach(MpUnreach::new(
                    AddressType::IPV6_UNICAST,
                    MpNlri::Ipv6(vec![]),
                )),
            )
            .unwrap()],
            vec![],
        );
        let not_eor = BgpUpdateMessage::new(
            vec![],
            vec![PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::Origin(Origin::IGP),
            )
            .unwrap()],
            vec![Ipv4Net::from_str("10.0.0.0/8").unwrap()],
        );
        assert_eq!(ipv4_eor.end_of_rib(), Some(AddressType::IPV4_UNICAST));
        assert_eq!(ipv6_eor.end_of_rib(), Some(AddressType::IPV6_UNICAST));
        assert_eq!(ipv6_eor.mp_unreach().map(|x| x.address_type()), Some(AddressType::IPV6_UNICAST));
        assert!(ipv6_eor.mp_reach().is_none());
        assert_eq!(not_eor.end_of_rib(), None);
    }
}
