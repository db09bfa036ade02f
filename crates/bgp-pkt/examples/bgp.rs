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

use bytes::BytesMut;
use std::{io::Cursor, net::Ipv4Addr};
use tokio_util::codec::{Decoder, Encoder};

use bgpwire_bgp_pkt::{
    capabilities::{BgpCapability, FourOctetAsCapability, MultiProtocolExtensionsCapability},
    codec::BgpCodec,
    iana::AddressType,
    open::{BgpOpenMessage, BgpOpenMessageParameter},
    wire::deserializer::BgpParsingContext,
    BgpMessage,
};
use bgpwire_parse_utils::{ReadablePduWithOneInput, WritablePduWithOneInput};

pub fn main() {
    let msg = BgpMessage::Open(BgpOpenMessage::new(
        100,
        180,
        Ipv4Addr::new(5, 5, 5, 5),
        vec![BgpOpenMessageParameter::Capabilities(vec![
            BgpCapability::MultiProtocolExtensions(MultiProtocolExtensionsCapability::new(
                AddressType::IPV4_UNICAST,
            )),
            BgpCapability::RouteRefresh,
            BgpCapability::FourOctetAs(FourOctetAsCapability::new(100)),
        ])],
    ));

    // Serialize the message into its BGP binary format, AS numbers in the
    // message body are written as four octets
    let mut buf: Vec<u8> = vec![];
    let mut cursor = Cursor::new(&mut buf);
    msg.write(&mut cursor, true).unwrap();
    println!("Open message on the wire: {buf:02x?}");

    // Deserialize the message from binary format
    let mut ctx = BgpParsingContext::new(true, false, false);
    let (_, msg_back) = BgpMessage::from_wire(buf.as_slice(), &mut ctx).unwrap();
    assert_eq!(msg, msg_back);

    // The codec frames messages out of a stream of bytes, a trailing partial
    // message stays in the buffer until the rest of it arrives
    let mut codec = BgpCodec::new(true);
    let mut stream = BytesMut::new();
    codec.encode(msg.clone(), &mut stream).unwrap();
    codec.encode(BgpMessage::KeepAlive, &mut stream).unwrap();
    let partial = stream.split_off(stream.len() - 5);
    let (decoded, ignored_errors) = codec.decode(&mut stream).unwrap().unwrap().unwrap();
    assert_eq!(decoded, msg);
    assert!(ignored_errors.is_empty());
    println!("Decoded: {decoded:?}");

    stream.extend_from_slice(&partial);
    let (decoded, _) = codec.decode(&mut stream).unwrap().unwrap().unwrap();
    assert_eq!(decoded, BgpMessage::KeepAlive);
    assert!(stream.is_empty());
}
