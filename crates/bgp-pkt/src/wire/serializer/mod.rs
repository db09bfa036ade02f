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

//! Serializer library for BGP's wire protocol

/// Implements `From<std::io::Error>` into the `StdIOError` variant of a
/// writing error enum, plus one `From` impl for every wrapped error type.
macro_rules! writing_error_conversions {
    ($error:ident $(, $variant:ident($inner:ty))* $(,)?) => {
        impl From<std::io::Error> for $error {
            fn from(err: std::io::Error) -> Self {
                Self::StdIOError(err.to_string())
            }
        }

        $(
            impl From<$inner> for $error {
                fn from(value: $inner) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

pub mod capabilities;
pub mod notification;
pub mod open;
pub mod path_attribute;
pub mod route_refresh;
pub mod update;

use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::{Ipv4Net, Ipv6Net};
use std::io::Write;

use bgpwire_parse_utils::{WritablePdu, WritablePduWithOneInput};

use crate::{
    wire::{
        deserializer::BGP_MAX_MESSAGE_LENGTH,
        serializer::{
            notification::BgpNotificationMessageWritingError, open::BgpOpenMessageWritingError,
            route_refresh::BgpRouteRefreshMessageWritingError,
            update::BgpUpdateMessageWritingError,
        },
        BGP_HEADER_LENGTH,
    },
    BgpMessage,
};

/// Number of octets needed to carry a prefix of the given length
#[inline]
pub(crate) const fn prefix_octets(prefix_len: u8) -> usize {
    prefix_len.div_ceil(8) as usize
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum BgpMessageWritingError {
    /// The size of written message is larger than 4,096
    BgpMessageLengthOverflow(usize),

    StdIOError(String),

    /// Error encountered during writing a [crate::open::BgpOpenMessage]
    OpenError(BgpOpenMessageWritingError),

    /// Error encountered during writing a [crate::update::BgpUpdateMessage]
    UpdateError(BgpUpdateMessageWritingError),

    NotificationError(BgpNotificationMessageWritingError),

    RouteRefreshError(BgpRouteRefreshMessageWritingError),
}

writing_error_conversions!(
    BgpMessageWritingError,
    OpenError(BgpOpenMessageWritingError),
    UpdateError(BgpUpdateMessageWritingError),
    NotificationError(BgpNotificationMessageWritingError),
    RouteRefreshError(BgpRouteRefreshMessageWritingError),
);

/// The input selects whether AS numbers are written as four octets
impl WritablePduWithOneInput<bool, BgpMessageWritingError> for BgpMessage {
    const BASE_LENGTH: usize = BGP_HEADER_LENGTH as usize;

    fn len(&self, asn4: bool) -> usize {
        let body_len = match self {
            Self::Open(open) => open.len(),
            Self::Update(update) => update.len(asn4),
            Self::Notification(notification) => notification.len(),
            Self::KeepAlive => 0,
            Self::RouteRefresh(route_refresh) => route_refresh.len(),
        };
        Self::BASE_LENGTH + body_len
    }

    fn write<T: Write>(&self, writer: &mut T, asn4: bool) -> Result<(), BgpMessageWritingError> {
        let len = self.len(asn4);
        if len > BGP_MAX_MESSAGE_LENGTH as usize {
            return Err(BgpMessageWritingError::BgpMessageLengthOverflow(len));
        }
        writer.write_all(&u128::MAX.to_be_bytes())?;
        writer.write_u16::<NetworkEndian>(len as u16)?;
        writer.write_u8(self.get_type().into())?;
        match self {
            Self::Open(open) => open.write(writer)?,
            Self::Update(update) => update.write(writer, asn4)?,
            Self::Notification(notification) => notification.write(writer)?,
            Self::KeepAlive => {}
            Self::RouteRefresh(route_refresh) => route_refresh.write(writer)?,
        }
        Ok(())
    }
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum IpPrefixWritingError {
    StdIOError(String),
}

writing_error_conversions!(IpPrefixWritingError);

impl WritablePdu<IpPrefixWritingError> for Ipv4Net {
    /// 1 octet for the prefix length
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + prefix_octets(self.prefix_len())
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), IpPrefixWritingError> {
        writer.write_u8(self.prefix_len())?;
        writer.write_all(&self.network().octets()[..prefix_octets(self.prefix_len())])?;
        Ok(())
    }
}

impl WritablePdu<IpPrefixWritingError> for Ipv6Net {
    /// 1 octet for the prefix length
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + prefix_octets(self.prefix_len())
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), IpPrefixWritingError> {
        writer.write_u8(self.prefix_len())?;
        writer.write_all(&self.network().octets()[..prefix_octets(self.prefix_len())])?;
        Ok(())
    }
}
