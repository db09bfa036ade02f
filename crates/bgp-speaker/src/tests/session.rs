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

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use tokio::{sync::mpsc, task::JoinHandle, time::Duration};
use tokio_test::io::Mock;

use bgpwire_bgp_pkt::{
    capabilities::{BgpCapability, FourOctetAsCapability, MultiProtocolExtensionsCapability},
    iana::AddressType,
    notification::{
        BgpNotificationMessage, CeaseError, FiniteStateMachineError, HoldTimerExpiredError,
        MessageHeaderError, OpenMessageError,
    },
    open::{BgpOpenMessage, BgpOpenMessageParameter},
    path_attribute::{
        As2PathSegment, As4PathSegment, AsPath, AsPathSegmentType, NextHop, Origin,
        PathAttribute, PathAttributeValue,
    },
    route_refresh::BgpRouteRefreshMessage,
    update::BgpUpdateMessage,
    BgpMessage,
};

use crate::{
    archive::{ArchiveMessageType, ArchiveRecord, ArchivedMessage, PublishedUpdate},
    capabilities::{CapabilitySet, RouteRefreshRefused},
    config::{CapabilityConfigBuilder, PeerConfig, PeerConfigBuilder},
    fsm::FsmState,
    session::{resolve_bgp_id, Session, SessionError, SessionHandle, SessionSummary},
    tests::*,
};

struct TestSession {
    task: JoinHandle<SessionSummary>,
    handle: SessionHandle,
    records: mpsc::UnboundedReceiver<ArchiveRecord>,
    published: mpsc::UnboundedReceiver<PublishedUpdate>,
}

impl TestSession {
    fn start(config: PeerConfig, io: Mock) -> Self {
        let (archive_tx, records) = mpsc::unbounded_channel();
        let (publish_tx, published) = mpsc::unbounded_channel();
        let (session, handle) = Session::new(config, io, MY_BGP_ID, archive_tx, publish_tx);
        Self {
            task: tokio::spawn(session.run(false)),
            handle,
            records,
            published,
        }
    }

    async fn wait_for(&self, state: FsmState) {
        self.handle
            .subscribe()
            .wait_for(|current| *current == state)
            .await
            .unwrap();
    }

    /// Archived records until one of the given type shows up
    async fn records_until(&mut self, msg_type: ArchiveMessageType) -> Vec<ArchiveRecord> {
        let mut records = vec![];
        while let Some(record) = self.records.recv().await {
            let found = record.msg_type == msg_type;
            records.push(record);
            if found {
                return records;
            }
        }
        panic!("archive closed before receiving a {msg_type} record")
    }
}

fn config() -> PeerConfig {
    PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR)
        .bgp_id(MY_BGP_ID)
        .build()
}

fn my_open(config: &PeerConfig) -> BgpMessage {
    let capabilities = CapabilitySet::from_config(config.capabilities(), MY_AS);
    BgpMessage::Open(BgpOpenMessage::new(
        MY_AS as u16,
        config.hold_time(),
        MY_BGP_ID,
        capabilities.open_params(),
    ))
}

fn peer_open(hold_time: u16) -> BgpMessage {
    BgpMessage::Open(BgpOpenMessage::new(
        PEER_AS as u16,
        hold_time,
        PEER_BGP_ID,
        vec![],
    ))
}

fn cease() -> BgpMessage {
    BgpMessage::Notification(BgpNotificationMessage::CeaseError(
        CeaseError::AdministrativeShutdown { value: vec![] },
    ))
}

fn update() -> BgpUpdateMessage {
    BgpUpdateMessage::new(
        vec![],
        vec![
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::Origin(Origin::IGP),
            )
            .unwrap(),
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::AsPath(AsPath::As2PathSegments(vec![As2PathSegment::new(
                    AsPathSegmentType::AsSequence,
                    vec![200],
                )])),
            )
            .unwrap(),
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::NextHop(NextHop::new(Ipv4Addr::new(10, 0, 0, 2))),
            )
            .unwrap(),
        ],
        vec![Ipv4Net::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap()],
    )
}

/// Exchange Open and KeepAlive messages with a peer that advertises no
/// capabilities and a hold time of 90 seconds
fn established(config: &PeerConfig) -> BgpIoMockBuilder {
    let mut builder = BgpIoMockBuilder::new();
    builder
        .write(my_open(config))
        .read(peer_open(90))
        .write(BgpMessage::KeepAlive)
        .read(BgpMessage::KeepAlive);
    builder
}

#[test_log::test(tokio::test)]
async fn test_established_then_stop() {
    let config = config();
    let io = established(&config).write(cease()).build();
    let mut session = TestSession::start(config, io);
    session.wait_for(FsmState::Established).await;
    assert_eq!(session.handle.state(), FsmState::Established);
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.hold_time, Some(90));
    assert_eq!(summary.keepalive_interval, Some(Duration::from_secs(30)));
    assert_eq!(
        summary.last_notification,
        Some(BgpNotificationMessage::CeaseError(
            CeaseError::AdministrativeShutdown { value: vec![] }
        ))
    );
    assert_eq!(summary.stats.open_sent(), 1);
    assert_eq!(summary.stats.open_received(), 1);
    assert_eq!(summary.stats.keepalive_sent(), 1);
    assert_eq!(summary.stats.keepalive_received(), 1);
    assert_eq!(summary.stats.notification_sent(), 1);
    assert_eq!(summary.stats.messages_sent(), 3);
    assert_eq!(summary.stats.messages_received(), 2);
    assert!(summary.stats.last_sent().is_some());
    assert!(summary.stats.last_received().is_some());

    let open = session.records.recv().await.unwrap();
    assert_eq!(open.msg_type, ArchiveMessageType::Open);
    assert_eq!(open.afi_safi, AddressType::UNSPECIFIED);
    assert!(open.flush);
    assert_eq!(open.msg, ArchivedMessage::Message(peer_open(90)));
    let keepalive = session.records.recv().await.unwrap();
    assert_eq!(keepalive.msg_type, ArchiveMessageType::KeepAlive);
    assert_eq!(keepalive.msg, ArchivedMessage::Message(BgpMessage::KeepAlive));
    assert_eq!(session.records.recv().await, None);
    // Standalone sessions don't publish
    assert_eq!(session.published.recv().await, None);
}

#[test_log::test(tokio::test)]
async fn test_keepalive_not_archived() {
    let config = PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR)
        .bgp_id(MY_BGP_ID)
        .write_keepalive(false)
        .build();
    let io = established(&config).write(cease()).build();
    let mut session = TestSession::start(config, io);
    session.wait_for(FsmState::Established).await;
    session.handle.stop().unwrap();
    session.task.await.unwrap();

    let open = session.records.recv().await.unwrap();
    assert_eq!(open.msg_type, ArchiveMessageType::Open);
    assert_eq!(session.records.recv().await, None);
}

#[test_log::test(tokio::test)]
async fn test_unacceptable_hold_time() {
    let config = config();
    let notification = BgpNotificationMessage::OpenMessageError(
        OpenMessageError::UnacceptableHoldTime { value: vec![0, 2] },
    );
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .read(peer_open(2))
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.hold_time, None);
    assert_eq!(summary.keepalive_interval, None);
    assert_eq!(summary.last_notification, Some(notification));
    assert_eq!(summary.stats.keepalive_sent(), 0);
    assert_eq!(summary.stats.notification_sent(), 1);
}

#[test_log::test(tokio::test)]
async fn test_bad_peer_as() {
    let config = config();
    let notification =
        BgpNotificationMessage::OpenMessageError(OpenMessageError::BadPeerAs {
            value: vec![0, 0, 0, 200],
        });
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .read(BgpMessage::Open(BgpOpenMessage::new(
            300,
            90,
            PEER_BGP_ID,
            vec![],
        )))
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification));
}

#[test_log::test(tokio::test)]
async fn test_keepalive_in_open_sent() {
    let config = config();
    let notification = BgpNotificationMessage::FiniteStateMachineError(
        FiniteStateMachineError::ReceiveUnexpectedMessageInOpenSentState { value: vec![] },
    );
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .read(BgpMessage::KeepAlive)
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification));
    assert_eq!(summary.stats.keepalive_received(), 1);
}

#[test_log::test(tokio::test)]
async fn test_malformed_path_attribute_keeps_session() {
    let config = config();
    let malformed_update = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0x00, 0x33, 0x02, // header
        0x00, 0x00, // no withdrawn routes
        0x00, 0x18, // path attributes length
        0x40, 0x01, 0x01, 0x00, // origin IGP
        0x40, 0x02, 0x04, 0x02, 0x01, 0x00, 0xc8, // as path [200]
        0x40, 0x03, 0x04, 0x0a, 0x00, 0x00, 0x02, // next hop 10.0.0.2
        0x80, 0x04, 0x03, 0x00, 0x00, 0x01, // MED with a short value
        0x18, 0xc0, 0xa8, 0x01, // 192.168.1.0/24
    ];
    let io = established(&config)
        .read_u8(&malformed_update)
        .write(cease())
        .build();
    let mut session = TestSession::start(config, io);
    let records = session
        .records_until(ArchiveMessageType::UpdateWithErrors)
        .await;
    assert_eq!(session.handle.state(), FsmState::Established);
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();

    let record = records.last().unwrap();
    assert_eq!(record.afi_safi, AddressType::IPV4_UNICAST);
    assert!(record.flush);
    match &record.msg {
        ArchivedMessage::UpdateWithErrors { update, errors } => {
            assert_eq!(update.nlri(), &update_nlri());
            assert_eq!(update.path_attributes().len(), 3);
            assert_eq!(errors.path_attr_errors().len(), 1);
            assert!(errors.capability_errors().is_empty());
        }
        other => panic!("unexpected archived message: {other:?}"),
    }
    assert_eq!(summary.stats.update_received(), 1);
    assert_eq!(
        summary.last_notification,
        Some(BgpNotificationMessage::CeaseError(
            CeaseError::AdministrativeShutdown { value: vec![] }
        ))
    );
    // Updates with errors are never published
    assert_eq!(session.published.recv().await, None);
}

fn update_nlri() -> Vec<Ipv4Net> {
    vec![Ipv4Net::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap()]
}

#[test_log::test(tokio::test)]
async fn test_update_published() {
    let config = PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR)
        .bgp_id(MY_BGP_ID)
        .standalone(false)
        .build();
    let io = established(&config)
        .read(BgpMessage::Update(update()))
        .write(cease())
        .build();
    let mut session = TestSession::start(config, io);
    let published = session.published.recv().await.unwrap();
    assert_eq!(published.routing_key, "192.168.0.2");
    assert_eq!(published.update, update());
    session.handle.stop().unwrap();
    (&mut session.task).await.unwrap();

    let records = session.records_until(ArchiveMessageType::Update).await;
    let record = records.last().unwrap();
    assert_eq!(record.afi_safi, AddressType::IPV4_UNICAST);
    assert_eq!(
        record.msg,
        ArchivedMessage::Message(BgpMessage::Update(update()))
    );
}

#[test_log::test(tokio::test)]
async fn test_send_update() {
    let config = config();
    let io = established(&config)
        .write(BgpMessage::Update(update()))
        .write(cease())
        .build();
    let session = TestSession::start(config, io);
    session.wait_for(FsmState::Established).await;
    session.handle.send_update(update()).await.unwrap();
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();

    assert_eq!(summary.stats.update_sent(), 1);
    assert_eq!(summary.stats.update_received(), 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_send_update_before_established() {
    let config = config();
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .wait(Duration::from_secs(10))
        .write(cease())
        .build();
    let session = TestSession::start(config, io);
    session.wait_for(FsmState::OpenSent).await;
    let ret = session.handle.send_update(update()).await;
    assert_eq!(ret, Err(SessionError::NotEstablished(FsmState::OpenSent)));
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.stats.update_sent(), 0);
}

#[test_log::test(tokio::test)]
async fn test_route_refresh_not_supported() {
    let config = config();
    let io = established(&config).write(cease()).build();
    let session = TestSession::start(config, io);
    session.wait_for(FsmState::Established).await;
    let ret = session.handle.send_route_refresh(1, 1).await;
    assert_eq!(
        ret,
        Err(SessionError::RouteRefresh(RouteRefreshRefused::NotSupported))
    );
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();
    assert_eq!(summary.stats.route_refresh_sent(), 0);
}

#[test_log::test(tokio::test)]
async fn test_route_refresh() {
    let config = config();
    let peer_open = BgpMessage::Open(BgpOpenMessage::new(
        PEER_AS as u16,
        90,
        PEER_BGP_ID,
        vec![BgpOpenMessageParameter::Capabilities(vec![
            BgpCapability::MultiProtocolExtensions(MultiProtocolExtensionsCapability::new(
                AddressType::IPV4_UNICAST,
            )),
            BgpCapability::RouteRefresh,
        ])],
    ));
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .read(peer_open)
        .write(BgpMessage::KeepAlive)
        .read(BgpMessage::KeepAlive)
        .write(BgpMessage::RouteRefresh(BgpRouteRefreshMessage::new(
            AddressType::IPV4_UNICAST,
        )))
        .write(cease())
        .build();
    let session = TestSession::start(config, io);
    session.wait_for(FsmState::Established).await;
    let ret = session.handle.send_route_refresh(2, 1).await;
    assert_eq!(
        ret,
        Err(SessionError::RouteRefresh(
            RouteRefreshRefused::AddressTypeNotAdvertised(AddressType::IPV6_UNICAST)
        ))
    );
    session.handle.send_route_refresh(1, 1).await.unwrap();
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();
    assert_eq!(summary.stats.route_refresh_sent(), 1);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_hold_timer_expires_in_open_sent() {
    let config = PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR)
        .bgp_id(MY_BGP_ID)
        .hold_time_large_value(5)
        .build();
    let notification = BgpNotificationMessage::HoldTimerExpiredError(
        HoldTimerExpiredError::Unspecific { value: vec![] },
    );
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let start = tokio::time::Instant::now();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(5));
    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_hold_timer_expires_in_established() {
    let config = config();
    let notification = BgpNotificationMessage::HoldTimerExpiredError(
        HoldTimerExpiredError::Unspecific { value: vec![] },
    );
    let io = established(&config)
        .write(BgpMessage::KeepAlive)
        .write(BgpMessage::KeepAlive)
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let start = tokio::time::Instant::now();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(90));
    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification));
    assert_eq!(summary.stats.keepalive_sent(), 3);
    assert_eq!(summary.stats.keepalive_received(), 1);
}

#[test_log::test(tokio::test)]
async fn test_peer_closes_connection() {
    let config = config();
    let io = established(&config).build();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, None);
    assert_eq!(summary.stats.notification_sent(), 0);
}

#[test_log::test(tokio::test)]
async fn test_notification_received() {
    let config = config();
    let notification = BgpNotificationMessage::CeaseError(CeaseError::AdministrativeReset {
        value: vec![],
    });
    let io = established(&config)
        .read(BgpMessage::Notification(notification.clone()))
        .build();
    let mut session = TestSession::start(config, io);
    let summary = (&mut session.task).await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification.clone()));
    assert_eq!(summary.stats.notification_received(), 1);
    assert_eq!(summary.stats.notification_sent(), 0);
    let records = session
        .records_until(ArchiveMessageType::Notification)
        .await;
    assert_eq!(
        records.last().map(|record| &record.msg),
        Some(&ArchivedMessage::Message(BgpMessage::Notification(
            notification
        )))
    );
}

/// Peer Open, KeepAlive exchange, then the given bytes from the peer
async fn header_error_in_established(wire: &[u8], expected: MessageHeaderError) {
    let config = config();
    let notification = BgpNotificationMessage::MessageHeaderError(expected);
    let io = established(&config)
        .read_u8(wire)
        .write(BgpMessage::Notification(notification.clone()))
        .build();
    let session = TestSession::start(config, io);
    let summary = session.task.await.unwrap();

    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.last_notification, Some(notification));
    assert_eq!(summary.stats.notification_sent(), 1);
    assert_eq!(summary.stats.keepalive_received(), 1);
}

#[test_log::test(tokio::test)]
async fn test_bad_marker_closes_session() {
    let mut wire = vec![0xff; 15];
    wire.extend_from_slice(&[0xfe, 0x00, 0x13, 0x04]);
    header_error_in_established(
        &wire,
        MessageHeaderError::ConnectionNotSynchronized { value: vec![] },
    )
    .await;
}

#[test_log::test(tokio::test)]
async fn test_unknown_message_type_closes_session() {
    let mut wire = vec![0xff; 16];
    wire.extend_from_slice(&[0x00, 0x13, 0x09]);
    header_error_in_established(
        &wire,
        MessageHeaderError::BadMessageType { value: vec![0x09] },
    )
    .await;
}

#[test_log::test(tokio::test)]
async fn test_oversized_message_closes_session() {
    let mut wire = vec![0xff; 16];
    // 5000 octets, above the 4096 maximum
    wire.extend_from_slice(&[0x13, 0x88, 0x02]);
    header_error_in_established(
        &wire,
        MessageHeaderError::BadMessageLength {
            value: vec![0x13, 0x88],
        },
    )
    .await;
}

fn update_as4() -> BgpUpdateMessage {
    BgpUpdateMessage::new(
        vec![],
        vec![
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::Origin(Origin::IGP),
            )
            .unwrap(),
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::AsPath(AsPath::As4PathSegments(vec![As4PathSegment::new(
                    AsPathSegmentType::AsSequence,
                    vec![65536],
                )])),
            )
            .unwrap(),
            PathAttribute::from(
                false,
                true,
                false,
                false,
                PathAttributeValue::NextHop(NextHop::new(Ipv4Addr::new(10, 0, 0, 2))),
            )
            .unwrap(),
        ],
        update_nlri(),
    )
}

#[test_log::test(tokio::test)]
async fn test_four_octet_as_from_remote_open() {
    // Four octet AS is left out of our Open, only the peer advertises it
    let config = PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR)
        .bgp_id(MY_BGP_ID)
        .capabilities(CapabilityConfigBuilder::new().four_bytes_as(false).build())
        .build();
    let peer_open = BgpMessage::Open(BgpOpenMessage::new(
        PEER_AS as u16,
        90,
        PEER_BGP_ID,
        vec![BgpOpenMessageParameter::Capabilities(vec![
            BgpCapability::FourOctetAs(FourOctetAsCapability::new(PEER_AS)),
        ])],
    ));
    let update_wire = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0x00, 0x2f, 0x02, // header
        0x00, 0x00, // no withdrawn routes
        0x00, 0x14, // path attributes length
        0x40, 0x01, 0x01, 0x00, // origin IGP
        0x40, 0x02, 0x06, 0x02, 0x01, 0x00, 0x01, 0x00, 0x00, // as path [65536]
        0x40, 0x03, 0x04, 0x0a, 0x00, 0x00, 0x02, // next hop 10.0.0.2
        0x18, 0xc0, 0xa8, 0x01, // 192.168.1.0/24
    ];
    let io = BgpIoMockBuilder::new()
        .write(my_open(&config))
        .read(peer_open)
        .write(BgpMessage::KeepAlive)
        .read(BgpMessage::KeepAlive)
        .read_u8(&update_wire)
        .write_u8(&update_wire)
        .write(cease())
        .build();
    let mut session = TestSession::start(config, io);
    let records = session.records_until(ArchiveMessageType::Update).await;
    session.handle.send_update(update_as4()).await.unwrap();
    session.handle.stop().unwrap();
    let summary = session.task.await.unwrap();

    let record = records.last().unwrap();
    assert_eq!(record.afi_safi, AddressType::IPV4_UNICAST);
    assert_eq!(
        record.msg,
        ArchivedMessage::Message(BgpMessage::Update(update_as4()))
    );
    assert_eq!(summary.state, FsmState::Idle);
    assert_eq!(summary.stats.update_received(), 1);
    assert_eq!(summary.stats.update_sent(), 1);
}

#[test]
fn test_resolve_bgp_id() {
    let local = "10.0.0.1:4000".parse().unwrap();
    let local_v6 = "[2001:db8::1]:4000".parse().unwrap();
    assert_eq!(resolve_bgp_id(&config(), Some(local)), MY_BGP_ID);
    let config = PeerConfigBuilder::new(MY_AS, PEER_AS, PEER_ADDR).build();
    assert_eq!(
        resolve_bgp_id(&config, Some(local)),
        Ipv4Addr::new(10, 0, 0, 1)
    );
    assert_eq!(resolve_bgp_id(&config, Some(local_v6)), Ipv4Addr::LOCALHOST);
    assert_eq!(resolve_bgp_id(&config, None), Ipv4Addr::LOCALHOST);
}
