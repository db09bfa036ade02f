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

//! A single BGP session over an established transport.
//!
//! [`Session::run`] is the only place where the session state is mutated. It
//! waits on the command channel, the two timers and the framed transport in a
//! single `select!`, so events of a session are processed one at a time and
//! in arrival order.

use std::{
    fmt::Debug,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::{mpsc, oneshot, watch},
    time::Interval,
};
use tokio_util::codec::Framed;

use bgpwire_bgp_pkt::{
    codec::{BgpCodec, BgpCodecDecoderError, BgpFrame},
    iana::AddressType,
    notification::BgpNotificationMessage,
    open::{BgpOpenMessage, AS_TRANS},
    update::BgpUpdateMessage,
    wire::serializer::BgpMessageWritingError,
    BgpMessage,
};

use crate::{
    archive::{
        classify_update, classify_update_with_errors, ArchiveMessageType, ArchivedMessage,
        MessageArchive, UpdatePublisher,
    },
    capabilities::{CapabilitySet, RouteRefreshRefused},
    config::PeerConfig,
    events::BgpEvent,
    fsm::{Fsm, FsmAction, FsmState},
};

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Io(String),

    #[error("failed to encode message: {0:?}")]
    Encode(BgpMessageWritingError),

    #[error("session is closed")]
    Closed,

    #[error("session is in {0} state, expected Established")]
    NotEstablished(FsmState),

    #[error(transparent)]
    RouteRefresh(#[from] RouteRefreshRefused),
}

impl From<BgpMessageWritingError> for SessionError {
    fn from(value: BgpMessageWritingError) -> Self {
        match value {
            BgpMessageWritingError::StdIOError(err) => SessionError::Io(err),
            err => SessionError::Encode(err),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SessionStats {
    created: DateTime<Utc>,
    messages_received: u64,
    messages_sent: u64,
    open_received: u64,
    open_sent: u64,
    update_received: u64,
    update_sent: u64,
    keepalive_received: u64,
    keepalive_sent: u64,
    notification_received: u64,
    notification_sent: u64,
    route_refresh_received: u64,
    route_refresh_sent: u64,
    last_received: Option<DateTime<Utc>>,
    last_sent: Option<DateTime<Utc>>,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            created: Utc::now(),
            ..Default::default()
        }
    }

    fn count_received(&mut self, msg: &BgpMessage, timestamp: DateTime<Utc>) {
        self.messages_received += 1;
        self.last_received = Some(timestamp);
        match msg {
            BgpMessage::Open(_) => self.open_received += 1,
            BgpMessage::Update(_) => self.update_received += 1,
            BgpMessage::Notification(_) => self.notification_received += 1,
            BgpMessage::KeepAlive => self.keepalive_received += 1,
            BgpMessage::RouteRefresh(_) => self.route_refresh_received += 1,
        }
    }

    fn count_sent(&mut self, msg: &BgpMessage) {
        self.messages_sent += 1;
        self.last_sent = Some(Utc::now());
        match msg {
            BgpMessage::Open(_) => self.open_sent += 1,
            BgpMessage::Update(_) => self.update_sent += 1,
            BgpMessage::Notification(_) => self.notification_sent += 1,
            BgpMessage::KeepAlive => self.keepalive_sent += 1,
            BgpMessage::RouteRefresh(_) => self.route_refresh_sent += 1,
        }
    }

    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub const fn messages_received(&self) -> u64 {
        self.messages_received
    }

    pub const fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    pub const fn open_received(&self) -> u64 {
        self.open_received
    }

    pub const fn open_sent(&self) -> u64 {
        self.open_sent
    }

    pub const fn update_received(&self) -> u64 {
        self.update_received
    }

    pub const fn update_sent(&self) -> u64 {
        self.update_sent
    }

    pub const fn keepalive_received(&self) -> u64 {
        self.keepalive_received
    }

    pub const fn keepalive_sent(&self) -> u64 {
        self.keepalive_sent
    }

    pub const fn notification_received(&self) -> u64 {
        self.notification_received
    }

    pub const fn notification_sent(&self) -> u64 {
        self.notification_sent
    }

    pub const fn route_refresh_received(&self) -> u64 {
        self.route_refresh_received
    }

    pub const fn route_refresh_sent(&self) -> u64 {
        self.route_refresh_sent
    }

    pub const fn last_received(&self) -> Option<DateTime<Utc>> {
        self.last_received
    }

    pub const fn last_sent(&self) -> Option<DateTime<Utc>> {
        self.last_sent
    }
}

/// What is left of a session once it's back to Idle
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionSummary {
    pub state: FsmState,
    pub stats: SessionStats,
    pub hold_time: Option<u16>,
    pub keepalive_interval: Option<Duration>,
    /// Last Notification sent to or received from the peer
    pub last_notification: Option<BgpNotificationMessage>,
}

#[derive(Debug)]
enum SessionCommand {
    SendUpdate(BgpUpdateMessage, oneshot::Sender<Result<(), SessionError>>),
    SendRouteRefresh(AddressType, oneshot::Sender<Result<(), SessionError>>),
    Stop,
}

/// Control a running [`Session`]
#[derive(Debug, Clone)]
pub struct SessionHandle {
    peer_addr: SocketAddr,
    commands: mpsc::UnboundedSender<SessionCommand>,
    state: watch::Receiver<FsmState>,
}

impl SessionHandle {
    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn state(&self) -> FsmState {
        *self.state.borrow()
    }

    /// Watch the state transitions of the session
    pub fn subscribe(&self) -> watch::Receiver<FsmState> {
        self.state.clone()
    }

    /// Send an Update, AS numbers are encoded with the width negotiated with
    /// the peer
    pub async fn send_update(&self, update: BgpUpdateMessage) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::SendUpdate(update, tx))
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Ask the peer to resend its routes, refused when the peer didn't
    /// advertise route refresh or the address family
    pub async fn send_route_refresh(&self, afi: u16, safi: u8) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::SendRouteRefresh(
                AddressType::new(afi, safi),
                tx,
            ))
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Shut the session down with a Cease notification
    pub fn stop(&self) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Stop)
            .map_err(|_| SessionError::Closed)
    }
}

/// Pick the BGP identifier: the configured one, else the local IPv4 address
/// of the connection, else the loopback address.
pub fn resolve_bgp_id(config: &PeerConfig, local_addr: Option<SocketAddr>) -> Ipv4Addr {
    if let Some(bgp_id) = config.bgp_id() {
        return bgp_id;
    }
    match local_addr.map(|addr| addr.ip()) {
        Some(IpAddr::V4(ip)) if !ip.is_unspecified() => ip,
        _ => Ipv4Addr::LOCALHOST,
    }
}

enum SessionInput {
    Command(Option<SessionCommand>),
    HoldTimer,
    KeepAliveTimer,
    Frame(Option<Result<BgpFrame, BgpCodecDecoderError>>),
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        None => std::future::pending().await,
        Some(interval) => {
            interval.tick().await;
        }
    }
}

fn start_timer(duration: Duration) -> Interval {
    let mut interval = tokio::time::interval(duration);
    interval.reset();
    interval
}

pub struct Session<I, A, P> {
    peer_addr: SocketAddr,
    config: PeerConfig,
    bgp_id: Ipv4Addr,
    fsm: Fsm,
    framed: Framed<I, BgpCodec>,
    local_capabilities: CapabilitySet,
    remote_capabilities: CapabilitySet,
    effective_capabilities: CapabilitySet,
    remote_open: Option<BgpOpenMessage>,
    stats: SessionStats,
    hold_timer: Option<Interval>,
    keepalive_timer: Option<Interval>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    commands_closed: bool,
    state_tx: watch::Sender<FsmState>,
    archive: A,
    publisher: P,
    last_notification: Option<BgpNotificationMessage>,
    closed: bool,
}

impl<I: Debug, A, P> Debug for Session<I, A, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer_addr", &self.peer_addr)
            .field("bgp_id", &self.bgp_id)
            .field("fsm", &self.fsm)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<I, A, P> Session<I, A, P>
where
    I: AsyncRead + AsyncWrite + Unpin,
    A: MessageArchive,
    P: UpdatePublisher,
{
    pub fn new(
        config: PeerConfig,
        io: I,
        bgp_id: Ipv4Addr,
        archive: A,
        publisher: P,
    ) -> (Self, SessionHandle) {
        let peer_addr = config.remote_addr();
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(FsmState::Idle);
        let local_capabilities =
            CapabilitySet::from_config(config.capabilities(), config.local_as());
        let session = Self {
            peer_addr,
            fsm: Fsm::from_config(&config),
            config,
            bgp_id,
            framed: Framed::new(io, BgpCodec::new(false)),
            local_capabilities,
            remote_capabilities: CapabilitySet::default(),
            effective_capabilities: CapabilitySet::default(),
            remote_open: None,
            stats: SessionStats::new(),
            hold_timer: None,
            keepalive_timer: None,
            commands,
            commands_closed: false,
            state_tx,
            archive,
            publisher,
            last_notification: None,
            closed: false,
        };
        let handle = SessionHandle {
            peer_addr,
            commands: commands_tx,
            state: state_rx,
        };
        (session, handle)
    }

    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub const fn state(&self) -> FsmState {
        self.fsm.state()
    }

    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub const fn local_capabilities(&self) -> &CapabilitySet {
        &self.local_capabilities
    }

    pub const fn remote_capabilities(&self) -> &CapabilitySet {
        &self.remote_capabilities
    }

    pub const fn effective_capabilities(&self) -> &CapabilitySet {
        &self.effective_capabilities
    }

    /// Drive the session until it goes back to Idle. `passive` tells if the
    /// transport was accepted from the peer rather than initiated by us.
    pub async fn run(mut self, passive: bool) -> SessionSummary {
        let start = if passive {
            BgpEvent::ManualStartPassive
        } else {
            BgpEvent::ManualStart
        };
        self.dispatch(start).await;
        self.dispatch(BgpEvent::TcpConnectionConfirmed).await;
        while self.fsm.state() != FsmState::Idle {
            let commands_open = !self.commands_closed;
            let input = tokio::select! {
                biased;
                cmd = self.commands.recv(), if commands_open => SessionInput::Command(cmd),
                frame = self.framed.next() => SessionInput::Frame(frame),
                _ = tick(&mut self.hold_timer) => SessionInput::HoldTimer,
                _ = tick(&mut self.keepalive_timer) => SessionInput::KeepAliveTimer,
            };
            match input {
                SessionInput::Command(Some(cmd)) => self.handle_command(cmd).await,
                SessionInput::Command(None) => {
                    tracing::debug!(
                        "[{}][{}] All session handles are dropped",
                        self.peer_addr,
                        self.fsm.state()
                    );
                    self.commands_closed = true;
                }
                SessionInput::HoldTimer => self.dispatch(BgpEvent::HoldTimerExpires).await,
                SessionInput::KeepAliveTimer => {
                    self.dispatch(BgpEvent::KeepAliveTimerExpires).await
                }
                SessionInput::Frame(frame) => {
                    let event = self.handle_frame(frame);
                    self.dispatch(event).await;
                }
            }
        }
        self.stop_timers();
        if !self.closed {
            self.close().await;
        }
        SessionSummary {
            state: self.fsm.state(),
            stats: self.stats,
            hold_time: self.fsm.negotiated_hold_time(),
            keepalive_interval: self.fsm.keepalive_interval(),
            last_notification: self.last_notification,
        }
    }

    /// Feed an event to the FSM and carry out the resulting actions. A
    /// transport failure while doing so is fed back as
    /// [`BgpEvent::TcpConnectionFails`].
    async fn dispatch(&mut self, event: BgpEvent) {
        if let Err(err) = self.handle_event(event).await {
            tracing::error!(
                "[{}][{}] Transport failure: {err}",
                self.peer_addr,
                self.fsm.state()
            );
            if let Err(err) = self.handle_event(BgpEvent::TcpConnectionFails).await {
                tracing::error!(
                    "[{}][{}] Error handling transport failure: {err}",
                    self.peer_addr,
                    self.fsm.state()
                );
            }
        }
    }

    async fn handle_event(&mut self, event: BgpEvent) -> Result<(), SessionError> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                "[{}][{}] handling: {event}",
                self.peer_addr,
                self.fsm.state()
            );
        }
        let pre_state = self.fsm.state();
        let actions = self.fsm.handle(event);
        let post_state = self.fsm.state();
        if post_state != pre_state {
            tracing::info!(
                "[{}][{}] Transitioned from {pre_state:?} to {post_state:?}",
                self.peer_addr,
                post_state,
            );
            self.state_tx.send_replace(post_state);
        }
        for action in actions {
            self.execute(action).await?;
        }
        Ok(())
    }

    async fn execute(&mut self, action: FsmAction) -> Result<(), SessionError> {
        match action {
            FsmAction::SendOpen => {
                let open = self.open_message();
                self.send(BgpMessage::Open(open)).await?;
            }
            FsmAction::SendKeepAlive => self.send(BgpMessage::KeepAlive).await?,
            FsmAction::SendNotification(notification) => {
                tracing::warn!(
                    "[{}][{}] Sending Notification error={}, sub error={}, data={:?}",
                    self.peer_addr,
                    self.fsm.state(),
                    notification.code(),
                    notification.sub_code(),
                    notification.value(),
                );
                self.last_notification = Some(notification.clone());
                self.send(BgpMessage::Notification(notification)).await?;
            }
            FsmAction::NegotiateCapabilities => self.negotiate_capabilities(),
            FsmAction::StartHoldTimer(duration) => {
                tracing::debug!(
                    "[{}][{}] Set hold timer to: {duration:?}",
                    self.peer_addr,
                    self.fsm.state()
                );
                self.hold_timer.replace(start_timer(duration));
            }
            FsmAction::ResetHoldTimer => {
                if let Some(interval) = self.hold_timer.as_mut() {
                    interval.reset();
                }
            }
            FsmAction::StartKeepAliveTimer(duration) => {
                tracing::debug!(
                    "[{}][{}] Set keepalive timer to: {duration:?}",
                    self.peer_addr,
                    self.fsm.state()
                );
                self.keepalive_timer.replace(start_timer(duration));
            }
            FsmAction::StopTimers => self.stop_timers(),
            FsmAction::CloseConnection => self.close().await,
        }
        Ok(())
    }

    fn open_message(&self) -> BgpOpenMessage {
        let my_as = u16::try_from(self.config.local_as()).unwrap_or(AS_TRANS);
        BgpOpenMessage::new(
            my_as,
            self.config.hold_time(),
            self.bgp_id,
            self.local_capabilities.open_params(),
        )
    }

    fn negotiate_capabilities(&mut self) {
        let Some(open) = self.remote_open.as_ref() else {
            return;
        };
        self.remote_capabilities = CapabilitySet::from_open(open);
        self.effective_capabilities =
            CapabilitySet::negotiate(&self.local_capabilities, &self.remote_capabilities);
        // The peer's advertisement alone decides the AS number width
        let asn4 = self.remote_capabilities.four_octet_as();
        self.framed.codec_mut().set_asn4(asn4);
        tracing::info!(
            "[{}][{}] Negotiated capabilities: {:?}, four octet AS: {asn4}",
            self.peer_addr,
            self.fsm.state(),
            self.effective_capabilities.codes().collect::<Vec<_>>(),
        );
    }

    fn stop_timers(&mut self) {
        self.hold_timer.take();
        self.keepalive_timer.take();
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.framed.close().await {
            tracing::warn!(
                "[{}][{}] Error closing the connection: {err:?}",
                self.peer_addr,
                self.fsm.state()
            );
        }
    }

    async fn send(&mut self, msg: BgpMessage) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                "[{}][{}] Sending message: {msg:?}",
                self.peer_addr,
                self.fsm.state()
            );
        } else {
            tracing::info!(
                "[{}][{}] Sending {} message",
                self.peer_addr,
                self.fsm.state(),
                msg.get_type()
            );
        }
        self.stats.count_sent(&msg);
        if matches!(msg, BgpMessage::KeepAlive | BgpMessage::Update(_)) {
            if let Some(interval) = self.keepalive_timer.as_mut() {
                interval.reset();
            }
        }
        self.framed.send(msg).await?;
        Ok(())
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::SendUpdate(update, reply) => {
                let ret = self.send_established(BgpMessage::Update(update)).await;
                let _ = reply.send(ret);
            }
            SessionCommand::SendRouteRefresh(address_type, reply) => {
                let ret = match self.remote_capabilities.route_refresh(address_type) {
                    Ok(route_refresh) => {
                        self.send_established(BgpMessage::RouteRefresh(route_refresh))
                            .await
                    }
                    Err(err) => {
                        tracing::warn!(
                            "[{}][{}] Not sending route refresh: {err}",
                            self.peer_addr,
                            self.fsm.state()
                        );
                        Err(err.into())
                    }
                };
                let _ = reply.send(ret);
            }
            SessionCommand::Stop => self.dispatch(BgpEvent::ManualStop).await,
        }
    }

    async fn send_established(&mut self, msg: BgpMessage) -> Result<(), SessionError> {
        let state = self.fsm.state();
        if state != FsmState::Established {
            return Err(SessionError::NotEstablished(state));
        }
        match self.send(msg).await {
            Ok(()) => Ok(()),
            Err(SessionError::Encode(err)) => {
                tracing::error!(
                    "[{}][{}] Error encoding message: {err:?}",
                    self.peer_addr,
                    state
                );
                Err(SessionError::Encode(err))
            }
            Err(err) => {
                tracing::error!("[{}][{}] Transport failure: {err}", self.peer_addr, state);
                self.dispatch(BgpEvent::TcpConnectionFails).await;
                Err(err)
            }
        }
    }

    fn archive_msg(
        &mut self,
        msg_type: ArchiveMessageType,
        msg: ArchivedMessage,
        afi_safi: AddressType,
    ) {
        let ret = self
            .archive
            .write_msg(Utc::now(), msg_type, msg, afi_safi, true);
        if let Err(err) = ret {
            tracing::warn!(
                "[{}][{}] Error archiving {msg_type} message: {err}",
                self.peer_addr,
                self.fsm.state()
            );
        }
    }

    /// Turn what came out of the transport into an FSM event, archiving and
    /// publishing received messages on the way.
    fn handle_frame(
        &mut self,
        frame: Option<Result<BgpFrame, BgpCodecDecoderError>>,
    ) -> BgpEvent {
        let frame = match frame {
            None => {
                tracing::info!(
                    "[{}][{}] Connection closed by peer",
                    self.peer_addr,
                    self.fsm.state()
                );
                return BgpEvent::TcpConnectionFails;
            }
            Some(Err(err)) => {
                tracing::error!(
                    "[{}][{}] Error reading from the connection: {err}",
                    self.peer_addr,
                    self.fsm.state()
                );
                return BgpEvent::TcpConnectionFails;
            }
            Some(Ok(frame)) => frame,
        };
        let (msg, errors) = match frame {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(
                    "[{}][{}] Received malformed message: {:?}",
                    self.peer_addr,
                    self.fsm.state(),
                    err.error()
                );
                let event = BgpEvent::from(err);
                if let BgpEvent::UpdateMsgErr(update_err) = &event {
                    self.archive_msg(
                        ArchiveMessageType::UpdateWithErrors,
                        ArchivedMessage::MalformedUpdate(update_err.clone()),
                        AddressType::UNSPECIFIED,
                    );
                }
                return event;
            }
        };
        let timestamp = Utc::now();
        self.stats.count_received(&msg, timestamp);
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                "[{}][{}] Received message: {msg:?}",
                self.peer_addr,
                self.fsm.state()
            );
        }
        match msg {
            BgpMessage::Open(open) => {
                tracing::info!(
                    "[{}][{}] Received Open version={}, ASN={}, hold time={}, id={}",
                    self.peer_addr,
                    self.fsm.state(),
                    open.version(),
                    open.my_asn4(),
                    open.hold_time(),
                    open.bgp_id(),
                );
                for err in errors.capability_errors() {
                    tracing::debug!(
                        "[{}][{}] Ignored BGP Capability parsing error: {err:?}",
                        self.peer_addr,
                        self.fsm.state(),
                    );
                }
                self.archive_msg(
                    ArchiveMessageType::Open,
                    ArchivedMessage::Message(BgpMessage::Open(open.clone())),
                    AddressType::UNSPECIFIED,
                );
                self.remote_open = Some(open.clone());
                BgpEvent::BgpOpen(open)
            }
            BgpMessage::Update(update) => {
                if errors.is_empty() {
                    self.archive_msg(
                        ArchiveMessageType::Update,
                        ArchivedMessage::Message(BgpMessage::Update(update.clone())),
                        classify_update(&update),
                    );
                    if !self.config.standalone() {
                        let routing_key = self.peer_addr.ip().to_string();
                        if let Err(err) = self.publisher.publish(&routing_key, &update) {
                            tracing::warn!(
                                "[{}][{}] Error publishing update: {err}",
                                self.peer_addr,
                                self.fsm.state()
                            );
                        }
                    }
                } else {
                    tracing::error!(
                        "[{}][{}] Update message error: sub error={:?}",
                        self.peer_addr,
                        self.fsm.state(),
                        errors.path_attr_errors(),
                    );
                    self.archive_msg(
                        ArchiveMessageType::UpdateWithErrors,
                        ArchivedMessage::UpdateWithErrors {
                            update: update.clone(),
                            errors: errors.clone(),
                        },
                        classify_update_with_errors(&update),
                    );
                }
                BgpEvent::UpdateMsg(update, errors)
            }
            BgpMessage::Notification(notification) => {
                tracing::info!(
                    "[{}][{}] Received Notification error={}, sub error={}, data={:?}",
                    self.peer_addr,
                    self.fsm.state(),
                    notification.code(),
                    notification.sub_code(),
                    notification.value(),
                );
                self.archive_msg(
                    ArchiveMessageType::Notification,
                    ArchivedMessage::Message(BgpMessage::Notification(notification.clone())),
                    AddressType::UNSPECIFIED,
                );
                self.last_notification = Some(notification.clone());
                BgpEvent::NotifMsg(notification)
            }
            BgpMessage::KeepAlive => {
                if self.config.write_keepalive() {
                    self.archive_msg(
                        ArchiveMessageType::KeepAlive,
                        ArchivedMessage::Message(BgpMessage::KeepAlive),
                        AddressType::UNSPECIFIED,
                    );
                }
                BgpEvent::KeepAliveMsg
            }
            BgpMessage::RouteRefresh(route_refresh) => {
                tracing::info!(
                    "[{}][{}] Received Route Refresh afi={}, reserved={}, safi={}",
                    self.peer_addr,
                    self.fsm.state(),
                    route_refresh.address_type().afi(),
                    route_refresh.reserved(),
                    route_refresh.address_type().safi(),
                );
                BgpEvent::RouteRefreshMsg(route_refresh)
            }
        }
    }
}
