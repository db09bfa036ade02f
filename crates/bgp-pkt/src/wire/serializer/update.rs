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

//! Serializer for BGP Update message

use crate::{
    path_attribute::PathAttribute,
    wire::serializer::{path_attribute::PathAttributeWritingError, IpPrefixWritingError},
    BgpUpdateMessage,
};
use bgpwire_parse_utils::{WritablePdu, WritablePduWithOneInput};
use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::Ipv4Net;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum BgpUpdateMessageWritingError {
    StdIOError(String),
    PrefixError(IpPrefixWritingError),
    PathAttributeError(PathAttributeWritingError),
}

writing_error_conversions!(
    BgpUpdateMessageWritingError,
    PrefixError(IpPrefixWritingError),
    PathAttributeError(PathAttributeWritingError),
);

#[inline]
fn prefixes_len(prefixes: &[Ipv4Net]) -> usize {
    prefixes
        .iter()
        .map(WritablePdu::<IpPrefixWritingError>::len)
        .sum()
}

/// The input selects whether AS numbers are written as four octets
impl WritablePduWithOneInput<bool, BgpUpdateMessageWritingError> for BgpUpdateMessage {
    /// 2 octets withdrawn routes length and 2 octets total path attributes
    /// length
    const BASE_LENGTH: usize = 4;

    fn len(&self, asn4: bool) -> usize {
        let path_attrs_len = self
            .path_attributes()
            .iter()
            .map(|attr| attr.len(asn4))
            .sum::<usize>();
        Self::BASE_LENGTH
            + prefixes_len(self.withdraw_routes())
            + path_attrs_len
            + prefixes_len(self.nlri())
    }

    fn write<T: std::io::Write>(
        &self,
        writer: &mut T,
        asn4: bool,
    ) -> Result<(), BgpUpdateMessageWritingError> {
        writer.write_u16::<NetworkEndian>(prefixes_len(self.withdraw_routes()) as u16)?;
        for withdrawn in self.withdraw_routes() {
            withdrawn.write(writer)?;
        }
        let path_attrs_len = self
            .path_attributes()
            .iter()
            .map(|attr: &PathAttribute| attr.len(asn4))
            .sum::<usize>();
        writer.write_u16::<NetworkEndian>(path_attrs_len as u16)?;
        for path_attribute in self.path_attributes() {
            path_attribute.write(writer, asn4)?;
        }
        for nlri in self.nlri() {
            nlri.write(writer)?;
        }
        Ok(())
    }
}
