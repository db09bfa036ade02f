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

//! BGP session finite state machine.
//!
//! [`Fsm`] only decides: it maps the current state and an event to the next
//! state and the list of actions to carry out. Sending messages, running
//! timers and the socket are left to the [`crate::session::Session`]
//! driving it.

use std::time::Duration;

use bgpwire_bgp_pkt::notification::{
    BgpNotificationMessage, CeaseError, FiniteStateMachineError, HoldTimerExpiredError,
    OpenMessageError,
};

use crate::{config::PeerConfig, events::BgpEvent};

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum_macros::Display)]
pub enum FsmState {
    Idle,
    Connect,
    Active,
    OpenSent,
    OpenConfirm,
    Established,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FsmAction {
    SendOpen,
    SendKeepAlive,
    SendNotification(BgpNotificationMessage),
    /// Compute the effective capabilities from the Open just received
    NegotiateCapabilities,
    StartHoldTimer(Duration),
    ResetHoldTimer,
    StartKeepAliveTimer(Duration),
    StopTimers,
    CloseConnection,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Fsm {
    state: FsmState,
    remote_as: u32,
    hold_time: u16,
    hold_time_large_value: u16,
    negotiated_hold_time: Option<u16>,
}

impl Fsm {
    pub const fn new(remote_as: u32, hold_time: u16, hold_time_large_value: u16) -> Self {
        Self {
            state: FsmState::Idle,
            remote_as,
            hold_time,
            hold_time_large_value,
            negotiated_hold_time: None,
        }
    }

    pub const fn from_config(config: &PeerConfig) -> Self {
        Self::new(
            config.remote_as(),
            config.hold_time(),
            config.hold_time_large_value(),
        )
    }

    pub const fn state(&self) -> FsmState {
        self.state
    }

    /// Hold time agreed with the peer, known once its Open is accepted
    pub const fn negotiated_hold_time(&self) -> Option<u16> {
        self.negotiated_hold_time
    }

    /// Keepalive interval derived from the negotiated hold time, zero when
    /// keepalives are disabled
    pub fn keepalive_interval(&self) -> Option<Duration> {
        self.negotiated_hold_time
            .map(|hold_time| Duration::from_secs(hold_time as u64) / 3)
    }

    /// Apply one event, returning the actions to execute in order
    pub fn handle(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match self.state {
            FsmState::Idle => self.handle_idle(event),
            FsmState::Connect | FsmState::Active => self.handle_connect_active(event),
            FsmState::OpenSent => self.handle_open_sent(event),
            FsmState::OpenConfirm => self.handle_open_confirm(event),
            FsmState::Established => self.handle_established(event),
        }
    }

    fn handle_idle(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            BgpEvent::ManualStart => {
                self.state = FsmState::Connect;
                vec![]
            }
            BgpEvent::ManualStartPassive => {
                self.state = FsmState::Active;
                vec![]
            }
            // All other events are ignored in Idle
            _ => vec![],
        }
    }

    fn handle_connect_active(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            BgpEvent::ManualStart | BgpEvent::ManualStartPassive => vec![],
            BgpEvent::TcpConnectionConfirmed => {
                self.state = FsmState::OpenSent;
                self.negotiated_hold_time = None;
                let mut actions = vec![FsmAction::SendOpen];
                if self.hold_time_large_value != 0 {
                    actions.push(FsmAction::StartHoldTimer(Duration::from_secs(
                        self.hold_time_large_value as u64,
                    )));
                }
                actions
            }
            BgpEvent::TcpConnectionFails => {
                self.state = if self.state == FsmState::Connect {
                    FsmState::Active
                } else {
                    FsmState::Idle
                };
                vec![FsmAction::StopTimers]
            }
            _ => self.idle(vec![]),
        }
    }

    fn handle_open_sent(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            BgpEvent::BgpOpen(open) => {
                if open.my_asn4() != self.remote_as {
                    return self.idle_with_notification(BgpNotificationMessage::OpenMessageError(
                        OpenMessageError::BadPeerAs {
                            value: self.remote_as.to_be_bytes().to_vec(),
                        },
                    ));
                }
                let hold_time = self.hold_time.min(open.hold_time());
                if hold_time == 1 || hold_time == 2 {
                    return self.idle_with_notification(BgpNotificationMessage::OpenMessageError(
                        OpenMessageError::UnacceptableHoldTime {
                            value: hold_time.to_be_bytes().to_vec(),
                        },
                    ));
                }
                self.negotiated_hold_time = Some(hold_time);
                self.state = FsmState::OpenConfirm;
                let mut actions = vec![FsmAction::NegotiateCapabilities, FsmAction::SendKeepAlive];
                if hold_time == 0 {
                    actions.push(FsmAction::StopTimers);
                } else {
                    let hold_time = Duration::from_secs(hold_time as u64);
                    actions.push(FsmAction::StartHoldTimer(hold_time));
                    actions.push(FsmAction::StartKeepAliveTimer(hold_time / 3));
                }
                actions
            }
            BgpEvent::KeepAliveMsg
            | BgpEvent::UpdateMsg(_, _)
            | BgpEvent::UpdateMsgErr(_)
            | BgpEvent::RouteRefreshMsg(_) => {
                self.idle_with_notification(BgpNotificationMessage::FiniteStateMachineError(
                    FiniteStateMachineError::ReceiveUnexpectedMessageInOpenSentState {
                        value: vec![],
                    },
                ))
            }
            // Timer isn't running yet
            BgpEvent::KeepAliveTimerExpires => vec![],
            event => self.handle_common(event),
        }
    }

    fn handle_open_confirm(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            BgpEvent::KeepAliveMsg => {
                self.state = FsmState::Established;
                self.reset_hold_timer()
            }
            BgpEvent::KeepAliveTimerExpires => vec![FsmAction::SendKeepAlive],
            BgpEvent::BgpOpen(_)
            | BgpEvent::UpdateMsg(_, _)
            | BgpEvent::UpdateMsgErr(_)
            | BgpEvent::RouteRefreshMsg(_) => {
                self.idle_with_notification(BgpNotificationMessage::FiniteStateMachineError(
                    FiniteStateMachineError::ReceiveUnexpectedMessageInOpenConfirmState {
                        value: vec![],
                    },
                ))
            }
            event => self.handle_common(event),
        }
    }

    fn handle_established(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            // A broken Update body was still delimited correctly
            BgpEvent::KeepAliveMsg
            | BgpEvent::UpdateMsg(_, _)
            | BgpEvent::UpdateMsgErr(_)
            | BgpEvent::RouteRefreshMsg(_) => self.reset_hold_timer(),
            BgpEvent::KeepAliveTimerExpires => vec![FsmAction::SendKeepAlive],
            BgpEvent::BgpOpen(_) => {
                self.idle_with_notification(BgpNotificationMessage::FiniteStateMachineError(
                    FiniteStateMachineError::ReceiveUnexpectedMessageInEstablishedState {
                        value: vec![],
                    },
                ))
            }
            event => self.handle_common(event),
        }
    }

    /// Events handled the same way in all the states with an open transport
    fn handle_common(&mut self, event: BgpEvent) -> Vec<FsmAction> {
        match event {
            BgpEvent::ManualStart
            | BgpEvent::ManualStartPassive
            | BgpEvent::TcpConnectionConfirmed => vec![],
            BgpEvent::ManualStop => {
                self.idle_with_notification(BgpNotificationMessage::CeaseError(
                    CeaseError::AdministrativeShutdown { value: vec![] },
                ))
            }
            BgpEvent::TcpConnectionFails => {
                self.state = FsmState::Idle;
                vec![FsmAction::StopTimers]
            }
            BgpEvent::HoldTimerExpires => {
                self.idle_with_notification(BgpNotificationMessage::HoldTimerExpiredError(
                    HoldTimerExpiredError::Unspecific { value: vec![] },
                ))
            }
            BgpEvent::BgpHeaderErr(err) => {
                self.idle_with_notification(BgpNotificationMessage::MessageHeaderError(err))
            }
            BgpEvent::BgpOpenMsgErr(err) => {
                self.idle_with_notification(BgpNotificationMessage::OpenMessageError(err))
            }
            BgpEvent::RouteRefreshMsgErr(err) => {
                self.idle_with_notification(BgpNotificationMessage::RouteRefreshError(err))
            }
            BgpEvent::NotifMsg(_) => self.idle(vec![]),
            // Left for the state specific handlers
            BgpEvent::KeepAliveTimerExpires
            | BgpEvent::BgpOpen(_)
            | BgpEvent::KeepAliveMsg
            | BgpEvent::UpdateMsg(_, _)
            | BgpEvent::UpdateMsgErr(_)
            | BgpEvent::RouteRefreshMsg(_) => vec![],
        }
    }

    fn reset_hold_timer(&self) -> Vec<FsmAction> {
        match self.negotiated_hold_time {
            Some(0) => vec![],
            _ => vec![FsmAction::ResetHoldTimer],
        }
    }

    fn idle(&mut self, mut actions: Vec<FsmAction>) -> Vec<FsmAction> {
        self.state = FsmState::Idle;
        actions.push(FsmAction::StopTimers);
        actions.push(FsmAction::CloseConnection);
        actions
    }

    fn idle_with_notification(&mut self, notification: BgpNotificationMessage) -> Vec<FsmAction> {
        self.idle(vec![FsmAction::SendNotification(notification)])
    }
}
