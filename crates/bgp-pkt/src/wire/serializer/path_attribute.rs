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

//! Serializer for BGP Path Attributes

use crate::{
    open::AS_TRANS,
    path_attribute::*,
    wire::{
        deserializer::path_attribute::EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK,
        serializer::IpPrefixWritingError, IPV4_LEN, IPV6_LEN, IPV6_WITH_LINK_LOCAL_LEN,
    },
};
use bgpwire_parse_utils::{WritablePdu, WritablePduWithOneInput};
use byteorder::{NetworkEndian, WriteBytesExt};
use std::io::Write;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum PathAttributeWritingError {
    StdIOError(String),
    /// The attribute value doesn't fit in a two octets length field
    AttributeLengthOverflow(usize),
    /// An AS path segment carries more than 255 AS numbers
    AsPathSegmentOverflow(usize),
    /// The next hop doesn't fit in the one octet length field
    NextHopLengthOverflow(usize),
    PrefixError(IpPrefixWritingError),
}

writing_error_conversions!(
    PathAttributeWritingError,
    PrefixError(IpPrefixWritingError),
);

const OPTIONAL_PATH_ATTRIBUTE_MASK: u8 = 0x80;
const TRANSITIVE_PATH_ATTRIBUTE_MASK: u8 = 0x40;
const PARTIAL_PATH_ATTRIBUTE_MASK: u8 = 0x20;

/// AS numbers that don't fit in two octets are replaced with `AS_TRANS`
#[inline]
fn as2(asn: u32) -> u16 {
    u16::try_from(asn).unwrap_or(AS_TRANS)
}

#[inline]
fn as_number_len(asn4: bool) -> usize {
    if asn4 {
        4
    } else {
        2
    }
}

#[inline]
fn write_as_number<T: Write>(
    writer: &mut T,
    asn: u32,
    asn4: bool,
) -> Result<(), PathAttributeWritingError> {
    if asn4 {
        writer.write_u32::<NetworkEndian>(asn)?;
    } else {
        writer.write_u16::<NetworkEndian>(as2(asn))?;
    }
    Ok(())
}

fn write_as_segment<T: Write>(
    writer: &mut T,
    segment_type: AsPathSegmentType,
    as_numbers: impl ExactSizeIterator<Item = u32>,
    asn4: bool,
) -> Result<(), PathAttributeWritingError> {
    let count = as_numbers.len();
    if count > u8::MAX as usize {
        return Err(PathAttributeWritingError::AsPathSegmentOverflow(count));
    }
    writer.write_u8(segment_type.into())?;
    writer.write_u8(count as u8)?;
    for asn in as_numbers {
        write_as_number(writer, asn, asn4)?;
    }
    Ok(())
}

fn mp_next_hop_len(next_hop: &MpNextHop) -> usize {
    match next_hop {
        MpNextHop::Ipv4(_) => IPV4_LEN as usize,
        MpNextHop::Ipv6 {
            link_local: None, ..
        } => IPV6_LEN as usize,
        MpNextHop::Ipv6 {
            link_local: Some(_),
            ..
        } => IPV6_WITH_LINK_LOCAL_LEN as usize,
        MpNextHop::Unknown(value) => value.len(),
    }
}

fn mp_nlri_len(nlri: &MpNlri) -> usize {
    match nlri {
        MpNlri::Ipv4(prefixes) => prefixes
            .iter()
            .map(WritablePdu::<IpPrefixWritingError>::len)
            .sum(),
        MpNlri::Ipv6(prefixes) => prefixes
            .iter()
            .map(WritablePdu::<IpPrefixWritingError>::len)
            .sum(),
        MpNlri::Unknown(value) => value.len(),
    }
}

fn write_mp_nlri<T: Write>(writer: &mut T, nlri: &MpNlri) -> Result<(), PathAttributeWritingError> {
    match nlri {
        MpNlri::Ipv4(prefixes) => {
            for prefix in prefixes {
                prefix.write(writer)?;
            }
        }
        MpNlri::Ipv6(prefixes) => {
            for prefix in prefixes {
                prefix.write(writer)?;
            }
        }
        MpNlri::Unknown(value) => writer.write_all(value)?,
    }
    Ok(())
}

impl PathAttributeValue {
    /// Length of the attribute value, without the flags, code and length
    fn value_len(&self, asn4: bool) -> usize {
        match self {
            Self::Origin(_) => 1,
            Self::AsPath(AsPath::As2PathSegments(segments)) => segments
                .iter()
                .map(|segment| 2 + segment.as_numbers().len() * as_number_len(asn4))
                .sum(),
            Self::AsPath(AsPath::As4PathSegments(segments)) => segments
                .iter()
                .map(|segment| 2 + segment.as_numbers().len() * as_number_len(asn4))
                .sum(),
            Self::As4Path(value) => value
                .segments()
                .iter()
                .map(|segment| 2 + segment.as_numbers().len() * 4)
                .sum(),
            Self::NextHop(_) => 4,
            Self::MultiExitDiscriminator(_) => 4,
            Self::LocalPreference(_) => 4,
            Self::AtomicAggregate(_) => 0,
            Self::Aggregator(_) => as_number_len(asn4) + 4,
            Self::As4Aggregator(_) => 8,
            Self::Communities(value) => value.communities().len() * 4,
            Self::ExtendedCommunities(value) => value.communities().len() * 8,
            Self::LargeCommunities(value) => value.communities().len() * 12,
            Self::Originator(_) => 4,
            Self::ClusterList(value) => value.cluster_list().len() * 4,
            // AFI, SAFI, next hop length, next hop, reserved and the NLRI
            Self::MpReach(value) => {
                2 + 1 + 1 + mp_next_hop_len(value.next_hop()) + 1 + mp_nlri_len(value.nlri())
            }
            Self::MpUnreach(value) => 2 + 1 + mp_nlri_len(value.nlri()),
            Self::UnknownAttribute(value) => value.value().len(),
        }
    }

    fn type_code(&self) -> u8 {
        match self.path_attribute_type() {
            Ok(code) => code.into(),
            Err(code) => code,
        }
    }

    fn write_value<T: Write>(
        &self,
        writer: &mut T,
        asn4: bool,
    ) -> Result<(), PathAttributeWritingError> {
        match self {
            Self::Origin(value) => writer.write_u8((*value).into())?,
            Self::AsPath(AsPath::As2PathSegments(segments)) => {
                for segment in segments {
                    write_as_segment(
                        writer,
                        segment.segment_type(),
                        segment.as_numbers().iter().map(|asn| *asn as u32),
                        asn4,
                    )?;
                }
            }
            Self::AsPath(AsPath::As4PathSegments(segments)) => {
                for segment in segments {
                    write_as_segment(
                        writer,
                        segment.segment_type(),
                        segment.as_numbers().iter().copied(),
                        asn4,
                    )?;
                }
            }
            Self::As4Path(value) => {
                for segment in value.segments() {
                    write_as_segment(
                        writer,
                        segment.segment_type(),
                        segment.as_numbers().iter().copied(),
                        true,
                    )?;
                }
            }
            Self::NextHop(value) => writer.write_all(&value.next_hop().octets())?,
            Self::MultiExitDiscriminator(value) => {
                writer.write_u32::<NetworkEndian>(value.metric())?
            }
            Self::LocalPreference(value) => writer.write_u32::<NetworkEndian>(value.metric())?,
            Self::AtomicAggregate(_) => {}
            Self::Aggregator(Aggregator::As2Aggregator(value)) => {
                write_as_number(writer, value.asn() as u32, asn4)?;
                writer.write_all(&value.origin().octets())?;
            }
            Self::Aggregator(Aggregator::As4Aggregator(value)) => {
                write_as_number(writer, value.asn(), asn4)?;
                writer.write_all(&value.origin().octets())?;
            }
            Self::As4Aggregator(value) => {
                writer.write_u32::<NetworkEndian>(value.asn())?;
                writer.write_all(&value.origin().octets())?;
            }
            Self::Communities(value) => {
                for community in value.communities() {
                    writer.write_u32::<NetworkEndian>(community.value())?;
                }
            }
            Self::ExtendedCommunities(value) => {
                for community in value.communities() {
                    writer.write_all(community.value())?;
                }
            }
            Self::LargeCommunities(value) => {
                for community in value.communities() {
                    writer.write_u32::<NetworkEndian>(community.global_admin())?;
                    writer.write_u32::<NetworkEndian>(community.local_data1())?;
                    writer.write_u32::<NetworkEndian>(community.local_data2())?;
                }
            }
            Self::Originator(value) => writer.write_all(&value.id().octets())?,
            Self::ClusterList(value) => {
                for cluster_id in value.cluster_list() {
                    writer.write_all(&cluster_id.id().octets())?;
                }
            }
            Self::MpReach(value) => {
                let next_hop_len = mp_next_hop_len(value.next_hop());
                if next_hop_len > u8::MAX as usize {
                    return Err(PathAttributeWritingError::NextHopLengthOverflow(
                        next_hop_len,
                    ));
                }
                writer.write_u16::<NetworkEndian>(value.address_type().afi())?;
                writer.write_u8(value.address_type().safi())?;
                writer.write_u8(next_hop_len as u8)?;
                match value.next_hop() {
                    MpNextHop::Ipv4(addr) => writer.write_all(&addr.octets())?,
                    MpNextHop::Ipv6 { global, link_local } => {
                        writer.write_all(&global.octets())?;
                        if let Some(link_local) = link_local {
                            writer.write_all(&link_local.octets())?;
                        }
                    }
                    MpNextHop::Unknown(value) => writer.write_all(value)?,
                }
                writer.write_u8(0)?;
                write_mp_nlri(writer, value.nlri())?;
            }
            Self::MpUnreach(value) => {
                writer.write_u16::<NetworkEndian>(value.address_type().afi())?;
                writer.write_u8(value.address_type().safi())?;
                write_mp_nlri(writer, value.nlri())?;
            }
            Self::UnknownAttribute(value) => writer.write_all(value.value())?,
        }
        Ok(())
    }
}

impl PathAttribute {
    /// The extended length bit is kept as received, and forced when the value
    /// doesn't fit in one octet
    fn use_extended_length(&self, asn4: bool) -> bool {
        self.extended_length() || self.value().value_len(asn4) > u8::MAX as usize
    }
}

/// The input selects whether AS numbers are written as four octets
impl WritablePduWithOneInput<bool, PathAttributeWritingError> for PathAttribute {
    /// 1 octet for the flags and a second for the type code
    const BASE_LENGTH: usize = 2;

    fn len(&self, asn4: bool) -> usize {
        let length_len = if self.use_extended_length(asn4) { 2 } else { 1 };
        Self::BASE_LENGTH + length_len + self.value().value_len(asn4)
    }

    fn write<T: Write>(&self, writer: &mut T, asn4: bool) -> Result<(), PathAttributeWritingError> {
        let value_len = self.value().value_len(asn4);
        if value_len > u16::MAX as usize {
            return Err(PathAttributeWritingError::AttributeLengthOverflow(
                value_len,
            ));
        }
        let extended_length = self.use_extended_length(asn4);
        let mut flags = 0x00u8;
        if self.optional() {
            flags |= OPTIONAL_PATH_ATTRIBUTE_MASK;
        }
        if self.transitive() {
            flags |= TRANSITIVE_PATH_ATTRIBUTE_MASK;
        }
        if self.partial() {
            flags |= PARTIAL_PATH_ATTRIBUTE_MASK;
        }
        if extended_length {
            flags |= EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK;
        }
        writer.write_u8(flags)?;
        writer.write_u8(self.value().type_code())?;
        if extended_length {
            writer.write_u16::<NetworkEndian>(value_len as u16)?;
        } else {
            writer.write_u8(value_len as u8)?;
        }
        self.value().write_value(writer, asn4)
    }
}
