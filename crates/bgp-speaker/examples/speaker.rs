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

//! Run a single BGP session and print every archived message as JSON.
//!
//! Connect to a peer:
//! `cargo run --example speaker -- --local-as 100 --remote-as 200 --remote-addr 192.0.2.2:179`
//!
//! Or wait for the peer to connect with `--listen`.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::sync::mpsc;
use tracing::info;

use bgpwire_bgp_speaker::{
    archive::{ArchiveRecord, PublishedUpdate},
    config::{PeerConfig, PeerConfigBuilder, BGP_PORT, DEFAULT_HOLD_TIME},
    connection::{connect_session, spawn_tcp_session, TcpActiveConnect},
    listener::TcpListenerStream,
};

#[derive(clap::Parser, Debug)]
struct Args {
    #[arg(long)]
    local_as: u32,

    #[arg(long)]
    remote_as: u32,

    #[arg(long)]
    remote_addr: SocketAddr,

    #[arg(long, default_value_t = DEFAULT_HOLD_TIME)]
    hold_time: u16,

    #[arg(long)]
    bgp_id: Option<Ipv4Addr>,

    /// Wait for the peer to connect instead of connecting to it
    #[arg(long, default_value_t = false)]
    listen: bool,

    /// Publish received updates, printing them along the archived records
    #[arg(long, default_value_t = false)]
    publish: bool,
}

impl Args {
    fn peer_config(&self) -> PeerConfig {
        let mut builder = PeerConfigBuilder::new(self.local_as, self.remote_as, self.remote_addr)
            .hold_time(self.hold_time)
            .standalone(!self.publish);
        if let Some(bgp_id) = self.bgp_id {
            builder = builder.bgp_id(bgp_id);
        }
        builder.build()
    }
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()?;
    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    init_tracing()?;
    let args = Args::parse();
    let config = args.peer_config();

    let (archive_tx, mut archive_rx) = mpsc::unbounded_channel::<ArchiveRecord>();
    let (publish_tx, mut publish_rx) = mpsc::unbounded_channel::<PublishedUpdate>();

    let (session, handle) = if args.listen {
        let listen_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), BGP_PORT);
        let mut listener = TcpListenerStream::bind(listen_addr).await?;
        let (stream, _) = listener.accept_peer(config.remote_addr()).await?;
        spawn_tcp_session(config, stream, true, archive_tx, publish_tx)
    } else {
        let mut connector = TcpActiveConnect::from_config(&config);
        connect_session(config, &mut connector, archive_tx, publish_tx).await?
    };
    info!("[{}] Session started", handle.peer_addr());

    tokio::spawn(async move {
        while let Some(published) = publish_rx.recv().await {
            match serde_json::to_string(&published) {
                Ok(json) => println!("{json}"),
                Err(err) => tracing::error!("Error serializing published update: {err}"),
            }
        }
    });

    loop {
        tokio::select! {
            record = archive_rx.recv() => match record {
                Some(record) => match serde_json::to_string(&record) {
                    Ok(json) => println!("{json}"),
                    Err(err) => tracing::error!("Error serializing archive record: {err}"),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping the session");
                handle.stop()?;
                break;
            }
        }
    }
    let summary = session.await?;
    info!(
        "Session ended in {} state, received {} messages, sent {}, last notification: {:?}",
        summary.state,
        summary.stats.messages_received(),
        summary.stats.messages_sent(),
        summary.last_notification
    );
    Ok(())
}
