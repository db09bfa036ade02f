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

//! Establishing the transport of a session and spawning the session task

use async_trait::async_trait;
use std::{
    io,
    net::{IpAddr, SocketAddr},
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpSocket, TcpStream},
    task::JoinHandle,
};

use crate::{
    archive::{MessageArchive, UpdatePublisher},
    config::PeerConfig,
    session::{resolve_bgp_id, Session, SessionHandle, SessionSummary},
};

/// Open a connection to a peer
#[async_trait]
pub trait ActiveConnect<P, I: AsyncRead + AsyncWrite> {
    async fn connect(&mut self, peer_addr: P) -> io::Result<I>;
}

/// Connect over TCP, optionally binding the local side to the given address
#[derive(Debug, Clone, Default)]
pub struct TcpActiveConnect {
    local_addr: Option<IpAddr>,
}

impl TcpActiveConnect {
    pub const fn new(local_addr: Option<IpAddr>) -> Self {
        Self { local_addr }
    }

    pub const fn from_config(config: &PeerConfig) -> Self {
        Self::new(config.local_addr())
    }

    pub const fn local_addr(&self) -> Option<IpAddr> {
        self.local_addr
    }
}

#[async_trait]
impl ActiveConnect<SocketAddr, TcpStream> for TcpActiveConnect {
    async fn connect(&mut self, peer_addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = match self.local_addr {
            None => TcpStream::connect(peer_addr).await?,
            Some(local_ip) => {
                let socket = match peer_addr {
                    SocketAddr::V4(_) => TcpSocket::new_v4()?,
                    SocketAddr::V6(_) => TcpSocket::new_v6()?,
                };
                socket.bind(SocketAddr::new(local_ip, 0))?;
                socket.connect(peer_addr).await?
            }
        };
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

/// Spawn a session over an established TCP connection. `passive` tells
/// whether the connection was accepted from the peer.
pub fn spawn_tcp_session<A, P>(
    config: PeerConfig,
    stream: TcpStream,
    passive: bool,
    archive: A,
    publisher: P,
) -> (JoinHandle<SessionSummary>, SessionHandle)
where
    A: MessageArchive + 'static,
    P: UpdatePublisher + 'static,
{
    let bgp_id = resolve_bgp_id(&config, stream.local_addr().ok());
    let (session, handle) = Session::new(config, stream, bgp_id, archive, publisher);
    (tokio::spawn(session.run(passive)), handle)
}

/// Connect to the configured peer and spawn the session
pub async fn connect_session<C, A, P>(
    config: PeerConfig,
    connector: &mut C,
    archive: A,
    publisher: P,
) -> io::Result<(JoinHandle<SessionSummary>, SessionHandle)>
where
    C: ActiveConnect<SocketAddr, TcpStream> + Send,
    A: MessageArchive + 'static,
    P: UpdatePublisher + 'static,
{
    let peer_addr = config.remote_addr();
    tracing::info!("[{peer_addr}] Connecting to peer");
    let stream = match connector.connect(peer_addr).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!("[{peer_addr}] Failed to connect to peer: {err}");
            return Err(err);
        }
    };
    Ok(spawn_tcp_session(config, stream, false, archive, publisher))
}
