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

//! Hand-off of received messages to the archival and publishing
//! collaborators. Storage and transport are up to the implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use bgpwire_bgp_pkt::{
    iana::AddressType, notification::UpdateMessageError, update::BgpUpdateMessage,
    wire::deserializer::BgpParsingIgnoredErrors, BgpMessage,
};

/// Message type codes used by the archive records
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display)]
pub enum ArchiveMessageType {
    Open = 1,
    Update = 2,
    Notification = 3,
    KeepAlive = 4,
    /// Update message that didn't parse cleanly
    UpdateWithErrors = 6,
}

impl From<ArchiveMessageType> for u8 {
    fn from(value: ArchiveMessageType) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ArchivedMessage {
    Message(BgpMessage),
    /// Update with the attributes that failed to parse left out
    UpdateWithErrors {
        update: BgpUpdateMessage,
        errors: BgpParsingIgnoredErrors,
    },
    /// Update whose body couldn't be parsed at all
    MalformedUpdate(UpdateMessageError),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub timestamp: DateTime<Utc>,
    pub msg_type: ArchiveMessageType,
    pub msg: ArchivedMessage,
    pub afi_safi: AddressType,
    pub flush: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive receiver is closed")]
    Closed,
}

/// Sink for every Open, Update, Notification and KeepAlive received
pub trait MessageArchive: Send {
    fn write_msg(
        &mut self,
        timestamp: DateTime<Utc>,
        msg_type: ArchiveMessageType,
        msg: ArchivedMessage,
        afi_safi: AddressType,
        flush: bool,
    ) -> Result<(), ArchiveError>;
}

impl MessageArchive for mpsc::UnboundedSender<ArchiveRecord> {
    fn write_msg(
        &mut self,
        timestamp: DateTime<Utc>,
        msg_type: ArchiveMessageType,
        msg: ArchivedMessage,
        afi_safi: AddressType,
        flush: bool,
    ) -> Result<(), ArchiveError> {
        self.send(ArchiveRecord {
            timestamp,
            msg_type,
            msg,
            afi_safi,
            flush,
        })
        .map_err(|_| ArchiveError::Closed)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublishedUpdate {
    pub routing_key: String,
    pub update: BgpUpdateMessage,
}

/// Hand-off of cleanly parsed updates to an external bus
pub trait UpdatePublisher: Send {
    fn publish(&mut self, routing_key: &str, update: &BgpUpdateMessage)
        -> Result<(), ArchiveError>;
}

impl UpdatePublisher for mpsc::UnboundedSender<PublishedUpdate> {
    fn publish(
        &mut self,
        routing_key: &str,
        update: &BgpUpdateMessage,
    ) -> Result<(), ArchiveError> {
        self.send(PublishedUpdate {
            routing_key: routing_key.to_string(),
            update: update.clone(),
        })
        .map_err(|_| ArchiveError::Closed)
    }
}

/// Address family an update is about. IPv4 unicast when it carries
/// classic NLRI or withdrawn routes, otherwise the family of the
/// multiprotocol attributes.
pub fn classify_update(update: &BgpUpdateMessage) -> AddressType {
    if !update.nlri().is_empty() || !update.withdraw_routes().is_empty() {
        AddressType::IPV4_UNICAST
    } else if let Some(mp_reach) = update.mp_reach() {
        mp_reach.address_type()
    } else if let Some(mp_unreach) = update.mp_unreach() {
        mp_unreach.address_type()
    } else {
        AddressType::UNSPECIFIED
    }
}

/// Only classic NLRI is trusted when the update didn't parse cleanly
pub fn classify_update_with_errors(update: &BgpUpdateMessage) -> AddressType {
    if !update.nlri().is_empty() || !update.withdraw_routes().is_empty() {
        AddressType::IPV4_UNICAST
    } else {
        AddressType::UNSPECIFIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgpwire_bgp_pkt::path_attribute::{
        MpNextHop, MpNlri, MpReach, MpUnreach, PathAttribute, PathAttributeValue,
    };
    use ipnet::{Ipv4Net, Ipv6Net};
    use std::{
        net::{Ipv4Addr, Ipv6Addr},
        str::FromStr,
    };

    fn mp_reach_ipv6() -> PathAttribute {
        PathAttribute::from(
            true,
            false,
            false,
            false,
            PathAttributeValue::MpReach(MpReach::new(
                AddressType::IPV6_UNICAST,
                MpNextHop::Ipv6 {
                    global: Ipv6Addr::from_str("2001:db8::1").unwrap(),
                    link_local: None,
                },
                MpNlri::Ipv6(vec![Ipv6Net::from_str("2001:db8::/32").unwrap()]),
            )),
        )
        .unwrap()
    }

    fn mp_unreach_ipv6() -> PathAttribute {
        PathAttribute::from(
            true,
            false,
            false,
            false,
            PathAttributeValue::MpUnreach(MpUnreach::new(
                AddressType::IPV6_UNICAST,
                MpNlri::Ipv6(vec![]),
            )),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_update() {
        let nlri = BgpUpdateMessage::new(
            vec![],
            vec![mp_reach_ipv6()],
            vec![Ipv4Net::new(Ipv4Addr::new(10, 0, 0, 0), 8).unwrap()],
        );
        assert_eq!(classify_update(&nlri), AddressType::IPV4_UNICAST);

        let withdraw = BgpUpdateMessage::new(
            vec![Ipv4Net::new(Ipv4Addr::new(10, 0, 0, 0), 8).unwrap()],
            vec![],
            vec![],
        );
        assert_eq!(classify_update(&withdraw), AddressType::IPV4_UNICAST);

        let mp_reach = BgpUpdateMessage::new(vec![], vec![mp_reach_ipv6()], vec![]);
        assert_eq!(classify_update(&mp_reach), AddressType::IPV6_UNICAST);
        assert_eq!(
            classify_update_with_errors(&mp_reach),
            AddressType::UNSPECIFIED
        );

        let mp_unreach = BgpUpdateMessage::new(vec![], vec![mp_unreach_ipv6()], vec![]);
        assert_eq!(classify_update(&mp_unreach), AddressType::IPV6_UNICAST);

        let empty = BgpUpdateMessage::new(vec![], vec![], vec![]);
        assert_eq!(classify_update(&empty), AddressType::UNSPECIFIED);
    }

    #[test]
    fn test_mpsc_archive() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<ArchiveRecord>();
        let timestamp = Utc::now();
        tx.write_msg(
            timestamp,
            ArchiveMessageType::KeepAlive,
            ArchivedMessage::Message(BgpMessage::KeepAlive),
            AddressType::UNSPECIFIED,
            true,
        )
        .unwrap();
        let record = rx.try_recv().unwrap();
        assert_eq!(u8::from(record.msg_type), 4);
        assert_eq!(record.timestamp, timestamp);
        assert!(record.flush);

        drop(rx);
        let ret = tx.write_msg(
            timestamp,
            ArchiveMessageType::KeepAlive,
            ArchivedMessage::Message(BgpMessage::KeepAlive),
            AddressType::UNSPECIFIED,
            true,
        );
        assert_eq!(ret, Err(ArchiveError::Closed));
    }
}
