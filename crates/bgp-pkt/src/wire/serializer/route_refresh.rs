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

use crate::BgpRouteRefreshMessage;
use bgpwire_parse_utils::WritablePdu;
use byteorder::{NetworkEndian, WriteBytesExt};
use std::io::Write;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum BgpRouteRefreshMessageWritingError {
    StdIOError(String),
}

writing_error_conversions!(BgpRouteRefreshMessageWritingError);

impl WritablePdu<BgpRouteRefreshMessageWritingError> for BgpRouteRefreshMessage {
    /// 2 octets AFI, 1 octet reserved and 1 octet SAFI
    const BASE_LENGTH: usize = 4;

    fn len(&self) -> usize {
        Self::BASE_LENGTH
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpRouteRefreshMessageWritingError> {
        writer.write_u16::<NetworkEndian>(self.address_type().afi())?;
        writer.write_u8(self.reserved())?;
        writer.write_u8(self.address_type().safi())?;
        Ok(())
    }
}
