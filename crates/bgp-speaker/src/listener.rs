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

use futures::Stream;
use std::{
    io,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::net::{TcpListener, TcpStream};
use tokio_stream::StreamExt;
use tracing::{info, warn};

/// A modified version of Tokio's TcpListenerStream wrapper that returns the
/// peer socket along the incoming stream
#[derive(Debug)]
pub struct TcpListenerStream {
    inner: TcpListener,
}

impl TcpListenerStream {
    /// Create a new `TcpListenerStream`.
    pub fn new(listener: TcpListener) -> Self {
        Self { inner: listener }
    }

    /// Bind a listener on the given socket
    pub async fn bind(socket: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(socket).await?;
        info!("BGP listener listening on socket: {socket}");
        Ok(Self::new(listener))
    }

    /// Get back the inner `TcpListener`.
    pub fn into_inner(self) -> TcpListener {
        self.inner
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Wait for a connection coming from the given peer address, connections
    /// from anyone else are dropped.
    pub async fn accept_peer(
        &mut self,
        peer_addr: SocketAddr,
    ) -> io::Result<(TcpStream, SocketAddr)> {
        while let Some(incoming) = self.next().await {
            let (stream, addr) = incoming?;
            if addr.ip() != peer_addr.ip() {
                warn!("No peer configured for: {addr}, dropping connection");
                continue;
            }
            info!("[{addr}] Accepted connection");
            stream.set_nodelay(true)?;
            return Ok((stream, addr));
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "listener is closed",
        ))
    }
}

impl Stream for TcpListenerStream {
    type Item = io::Result<(TcpStream, SocketAddr)>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.poll_accept(cx) {
            Poll::Ready(Ok((stream, socket))) => Poll::Ready(Some(Ok((stream, socket)))),
            Poll::Ready(Err(err)) => Poll::Ready(Some(Err(err))),
            Poll::Pending => Poll::Pending,
        }
    }
}
