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

use crate::{
    capabilities::*,
    iana::AddressType,
    wire::{
        ADD_PATH_ADDRESS_FAMILY_LENGTH, ENHANCED_ROUTE_REFRESH_CAPABILITY_LENGTH,
        FOUR_OCTET_AS_CAPABILITY_LENGTH, GRACEFUL_RESTART_ADDRESS_FAMILY_LENGTH,
        MULTI_PROTOCOL_EXTENSIONS_CAPABILITY_LENGTH, ROUTE_REFRESH_CAPABILITY_LENGTH,
    },
};
use bgpwire_parse_utils::WritablePdu;
use byteorder::{NetworkEndian, WriteBytesExt};
use std::io::Write;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum BgpCapabilityWritingError {
    StdIOError(String),
    /// The capability value doesn't fit in the one octet length field
    CapabilityLengthOverflow(usize),
}

writing_error_conversions!(BgpCapabilityWritingError);

/// 2-octet restart flags and time in the graceful restart capability
const GRACEFUL_RESTART_HEADER_LENGTH: usize = 2;

#[inline]
fn write_address_type<T: Write>(
    writer: &mut T,
    address_type: AddressType,
) -> Result<(), BgpCapabilityWritingError> {
    writer.write_u16::<NetworkEndian>(address_type.afi())?;
    writer.write_u8(address_type.safi())?;
    Ok(())
}

impl BgpCapability {
    /// Length of the capability value, without the code and length octets
    fn value_len(&self) -> usize {
        match self {
            Self::MultiProtocolExtensions(_) => MULTI_PROTOCOL_EXTENSIONS_CAPABILITY_LENGTH as usize,
            Self::RouteRefresh | Self::CiscoRouteRefresh => ROUTE_REFRESH_CAPABILITY_LENGTH as usize,
            Self::EnhancedRouteRefresh => ENHANCED_ROUTE_REFRESH_CAPABILITY_LENGTH as usize,
            Self::GracefulRestartCapability(value) => {
                GRACEFUL_RESTART_HEADER_LENGTH
                    + value.address_families().len() * GRACEFUL_RESTART_ADDRESS_FAMILY_LENGTH as usize
            }
            Self::AddPath(value) => {
                value.address_families().len() * ADD_PATH_ADDRESS_FAMILY_LENGTH as usize
            }
            Self::FourOctetAs(_) => FOUR_OCTET_AS_CAPABILITY_LENGTH as usize,
            Self::Unrecognized(value) => value.value().len(),
        }
    }

    fn code_value(&self) -> u8 {
        match self.code() {
            Ok(code) => code.into(),
            Err(code) => code,
        }
    }
}

impl WritablePdu<BgpCapabilityWritingError> for BgpCapability {
    /// 1 octet for the code and a second for the length
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + self.value_len()
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpCapabilityWritingError> {
        let value_len = self.value_len();
        if value_len > u8::MAX as usize {
            return Err(BgpCapabilityWritingError::CapabilityLengthOverflow(value_len));
        }
        writer.write_u8(self.code_value())?;
        writer.write_u8(value_len as u8)?;
        match self {
            Self::MultiProtocolExtensions(value) => {
                writer.write_u16::<NetworkEndian>(value.address_type().afi())?;
                writer.write_u8(0)?;
                writer.write_u8(value.address_type().safi())?;
            }
            Self::RouteRefresh | Self::CiscoRouteRefresh | Self::EnhancedRouteRefresh => {}
            Self::GracefulRestartCapability(value) => {
                let mut header = value.time() & 0x0fff;
                if value.restart() {
                    header |= 0x8000;
                }
                if value.graceful_notification() {
                    header |= 0x4000;
                }
                writer.write_u16::<NetworkEndian>(header)?;
                for family in value.address_families() {
                    write_address_type(writer, family.address_type())?;
                    writer.write_u8(if family.forwarding_state() { 0x80 } else { 0x00 })?;
                }
            }
            Self::AddPath(value) => {
                for family in value.address_families() {
                    write_address_type(writer, family.address_type())?;
                    let mut send_receive = 0u8;
                    if family.receive() {
                        send_receive |= 0x01;
                    }
                    if family.send() {
                        send_receive |= 0x02;
                    }
                    writer.write_u8(send_receive)?;
                }
            }
            Self::FourOctetAs(value) => {
                writer.write_u32::<NetworkEndian>(value.asn4())?;
            }
            Self::Unrecognized(value) => {
                writer.write_all(value.value())?;
            }
        }
        Ok(())
    }
}

