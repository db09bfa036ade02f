// Copyright (C) 2023-present The NetGauze Authors.
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

//! A BGP-4 speaker: per peer session state machine, capability negotiation
//! and the glue between the wire codec and the archival collaborators.
//!
//! Every session runs as its own tokio task, see [`session::Session::run`].
//! The task is controlled through a [`session::SessionHandle`].

pub mod archive;
pub mod capabilities;
pub mod config;
pub mod connection;
pub mod events;
pub mod fsm;
pub mod listener;
pub mod session;

#[cfg(test)]
mod tests;
