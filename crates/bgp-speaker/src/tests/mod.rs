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

use std::{
    io::Cursor,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use bgpwire_bgp_pkt::BgpMessage;
use bgpwire_parse_utils::WritablePduWithOneInput;

mod session;

pub(crate) const MY_AS: u32 = 100;
pub(crate) const PEER_AS: u32 = 200;
pub(crate) const HOLD_TIME: u16 = 180;
pub(crate) const MY_BGP_ID: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

pub(crate) const PEER_BGP_ID: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 2);
pub(crate) const PEER_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 2)), 179);

/// Wrap [tokio_test::io::Builder] allowing it to accept BgpMessages for read
/// and write mocks rather than `&[u8]`. Messages are encoded with two octets
/// AS numbers.
#[derive(Default, Debug)]
pub struct BgpIoMockBuilder {
    io_builder: tokio_test::io::Builder,
}

impl BgpIoMockBuilder {
    pub fn new() -> Self {
        Self {
            io_builder: tokio_test::io::Builder::new(),
        }
    }

    fn encode(msg: BgpMessage) -> Vec<u8> {
        let mut cursor = Cursor::new(vec![]);
        msg.write(&mut cursor, false).unwrap();
        cursor.into_inner()
    }

    /// See [tokio_test::io::Builder::read]
    pub fn read(&mut self, msg: BgpMessage) -> &mut Self {
        self.io_builder.read(&Self::encode(msg));
        self
    }

    /// See [tokio_test::io::Builder::read]
    pub fn read_u8(&mut self, buf: &[u8]) -> &mut Self {
        self.io_builder.read(buf);
        self
    }

    /// See [tokio_test::io::Builder::write]
    pub fn write(&mut self, msg: BgpMessage) -> &mut Self {
        self.io_builder.write(&Self::encode(msg));
        self
    }

    /// See [tokio_test::io::Builder::write]
    pub fn write_u8(&mut self, buf: &[u8]) -> &mut Self {
        self.io_builder.write(buf);
        self
    }

    /// See [tokio_test::io::Builder::wait]
    pub fn wait(&mut self, duration: Duration) -> &mut Self {
        self.io_builder.wait(duration);
        self
    }

    /// See [tokio_test::io::Builder::build]
    pub fn build(&mut self) -> tokio_test::io::Mock {
        self.io_builder.build()
    }
}
