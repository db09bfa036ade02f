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

//! Deserializer for BGP Path Attributes

use crate::{
    iana::{AddressType, PathAttributeType},
    path_attribute::*,
    wire::{
        deserializer::{ipv4_prefix, ipv6_prefix, Ipv4PrefixParsingError, Ipv6PrefixParsingError},
        IPV4_LEN, IPV6_LEN, IPV6_WITH_LINK_LOCAL_LEN,
    },
};
use bgpwire_parse_utils::{
    parse_till_empty_into_located_with, ErrorKindSerdeDeref, Located, ReadablePdu,
    ReadablePduWithOneInput, Span,
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u128, be_u16, be_u32, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

const OPTIONAL_PATH_ATTRIBUTE_MASK: u8 = 0x80;
const TRANSITIVE_PATH_ATTRIBUTE_MASK: u8 = 0x40;
const PARTIAL_PATH_ATTRIBUTE_MASK: u8 = 0x20;
pub(crate) const EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK: u8 = 0x10;
const ORIGIN_LEN: u16 = 1;
const NEXT_HOP_LEN: u16 = 4;
const MULTI_EXIT_DISCRIMINATOR_LEN: u16 = 4;
const LOCAL_PREFERENCE_LEN: u16 = 4;
const ATOMIC_AGGREGATE_LEN: u16 = 0;
const AS2_AGGREGATOR_LEN: u16 = 6;
const AS4_AGGREGATOR_LEN: u16 = 8;
const ORIGINATOR_LEN: u16 = 4;
const CLUSTER_ID_LEN: u16 = 4;
const COMMUNITY_LEN: u16 = 4;
const EXTENDED_COMMUNITY_LEN: u16 = 8;
const LARGE_COMMUNITY_LEN: u16 = 12;

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PathAttributeParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(ErrorKind),
    /// The attribute length doesn't fit the attribute type, or the value
    /// wasn't fully consumed by the attribute parser
    InvalidAttributeLength {
        code: u8,
        length: PathAttributeLength,
    },
    UndefinedOrigin(UndefinedOrigin),
    UndefinedAsPathSegmentType(UndefinedAsPathSegmentType),
    Ipv4PrefixError(Ipv4PrefixParsingError),
    Ipv6PrefixError(Ipv6PrefixParsingError),
    InvalidNextHopLength(u8),
    InvalidPathAttribute(InvalidPathAttribute, PathAttributeValue),
}

parsing_error_conversions!(
    PathAttributeParsingError,
    UndefinedOrigin(UndefinedOrigin),
    UndefinedAsPathSegmentType(UndefinedAsPathSegmentType),
    Ipv4PrefixError(Ipv4PrefixParsingError),
    Ipv6PrefixError(Ipv6PrefixParsingError),
);

pub type LocatedPathAttributeParsingError<'a> = Located<'a, PathAttributeParsingError>;

/// A path attribute as framed on the wire: the flags, type code and length
/// are read, the value is not yet interpreted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RawPathAttribute<'a> {
    flags: u8,
    code: u8,
    length: PathAttributeLength,
    value: Span<'a>,
}

impl<'a> RawPathAttribute<'a> {
    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn length(&self) -> PathAttributeLength {
        self.length
    }

    pub const fn optional(&self) -> bool {
        self.flags & OPTIONAL_PATH_ATTRIBUTE_MASK == OPTIONAL_PATH_ATTRIBUTE_MASK
    }

    pub const fn transitive(&self) -> bool {
        self.flags & TRANSITIVE_PATH_ATTRIBUTE_MASK == TRANSITIVE_PATH_ATTRIBUTE_MASK
    }

    pub const fn partial(&self) -> bool {
        self.flags & PARTIAL_PATH_ATTRIBUTE_MASK == PARTIAL_PATH_ATTRIBUTE_MASK
    }

    pub const fn extended_length(&self) -> bool {
        self.flags & EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK == EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK
    }

    #[inline]
    fn invalid_length(&self) -> nom::Err<LocatedPathAttributeParsingError<'a>> {
        nom::Err::Error(LocatedPathAttributeParsingError::new(
            self.value,
            PathAttributeParsingError::InvalidAttributeLength {
                code: self.code,
                length: self.length,
            },
        ))
    }

    /// Fail when the value length is not exactly `expected`
    #[inline]
    fn check_length(&self, expected: u16) -> Result<(), nom::Err<LocatedPathAttributeParsingError<'a>>> {
        if u16::from(self.length) == expected {
            Ok(())
        } else {
            Err(self.invalid_length())
        }
    }

    /// Fail when the value length is not a multiple of `element_len`
    #[inline]
    fn check_length_multiple_of(
        &self,
        element_len: u16,
    ) -> Result<(), nom::Err<LocatedPathAttributeParsingError<'a>>> {
        if u16::from(self.length) % element_len == 0 {
            Ok(())
        } else {
            Err(self.invalid_length())
        }
    }
}

impl<'a> ReadablePdu<'a, LocatedPathAttributeParsingError<'a>> for RawPathAttribute<'a> {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedPathAttributeParsingError<'a>> {
        let (buf, flags) = be_u8(buf)?;
        let (buf, code) = be_u8(buf)?;
        let (buf, length) =
            if flags & EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK == EXTENDED_LENGTH_PATH_ATTRIBUTE_MASK {
                let (buf, raw) = be_u16(buf)?;
                (buf, PathAttributeLength::U16(raw))
            } else {
                let (buf, raw) = be_u8(buf)?;
                (buf, PathAttributeLength::U8(raw))
            };
        let (buf, value) = nom::bytes::complete::take(u16::from(length))(buf)?;
        Ok((
            buf,
            RawPathAttribute {
                flags,
                code,
                length,
                value,
            },
        ))
    }
}

impl<'a> RawPathAttribute<'a> {
    /// Interpret the attribute value and validate the attribute flags against
    /// the attribute type. `asn4` selects the width of the AS numbers in
    /// `AS_PATH` and `AGGREGATOR`.
    pub fn parse(
        &self,
        asn4: bool,
    ) -> Result<PathAttribute, nom::Err<LocatedPathAttributeParsingError<'a>>> {
        let buf = self.value;
        let (buf, value) = match PathAttributeType::try_from(self.code) {
            Ok(PathAttributeType::Origin) => {
                self.check_length(ORIGIN_LEN)?;
                let (buf, origin) = nom::combinator::map_res(be_u8, Origin::try_from)(buf)?;
                (buf, PathAttributeValue::Origin(origin))
            }
            Ok(PathAttributeType::AsPath) => {
                if asn4 {
                    let (buf, segments) = parse_as4_path_segments(buf)?;
                    (buf, PathAttributeValue::AsPath(AsPath::As4PathSegments(segments)))
                } else {
                    let (buf, segments) = parse_as2_path_segments(buf)?;
                    (buf, PathAttributeValue::AsPath(AsPath::As2PathSegments(segments)))
                }
            }
            Ok(PathAttributeType::NextHop) => {
                self.check_length(NEXT_HOP_LEN)?;
                let (buf, next_hop) = be_u32(buf)?;
                (
                    buf,
                    PathAttributeValue::NextHop(NextHop::new(Ipv4Addr::from(next_hop))),
                )
            }
            Ok(PathAttributeType::MultiExitDiscriminator) => {
                self.check_length(MULTI_EXIT_DISCRIMINATOR_LEN)?;
                let (buf, metric) = be_u32(buf)?;
                (
                    buf,
                    PathAttributeValue::MultiExitDiscriminator(MultiExitDiscriminator::new(metric)),
                )
            }
            Ok(PathAttributeType::LocalPreference) => {
                self.check_length(LOCAL_PREFERENCE_LEN)?;
                let (buf, metric) = be_u32(buf)?;
                (
                    buf,
                    PathAttributeValue::LocalPreference(LocalPreference::new(metric)),
                )
            }
            Ok(PathAttributeType::AtomicAggregate) => {
                self.check_length(ATOMIC_AGGREGATE_LEN)?;
                (buf, PathAttributeValue::AtomicAggregate(AtomicAggregate))
            }
            Ok(PathAttributeType::Aggregator) => {
                if asn4 {
                    self.check_length(AS4_AGGREGATOR_LEN)?;
                    let (buf, aggregator) = parse_as4_aggregator(buf)?;
                    (
                        buf,
                        PathAttributeValue::Aggregator(Aggregator::As4Aggregator(aggregator)),
                    )
                } else {
                    self.check_length(AS2_AGGREGATOR_LEN)?;
                    let (buf, asn) = be_u16(buf)?;
                    let (buf, origin) = be_u32(buf)?;
                    (
                        buf,
                        PathAttributeValue::Aggregator(Aggregator::As2Aggregator(
                            As2Aggregator::new(asn, Ipv4Addr::from(origin)),
                        )),
                    )
                }
            }
            Ok(PathAttributeType::Communities) => {
                self.check_length_multiple_of(COMMUNITY_LEN)?;
                let (buf, communities) = nom::multi::many0(be_u32)(buf)?;
                let communities = communities.into_iter().map(Community::new).collect();
                (
                    buf,
                    PathAttributeValue::Communities(Communities::new(communities)),
                )
            }
            Ok(PathAttributeType::OriginatorId) => {
                self.check_length(ORIGINATOR_LEN)?;
                let (buf, id) = be_u32(buf)?;
                (
                    buf,
                    PathAttributeValue::Originator(Originator::new(Ipv4Addr::from(id))),
                )
            }
            Ok(PathAttributeType::ClusterList) => {
                self.check_length_multiple_of(CLUSTER_ID_LEN)?;
                let (buf, ids) = nom::multi::many0(be_u32)(buf)?;
                let ids = ids
                    .into_iter()
                    .map(|id| ClusterId::new(Ipv4Addr::from(id)))
                    .collect();
                (buf, PathAttributeValue::ClusterList(ClusterList::new(ids)))
            }
            Ok(PathAttributeType::MpReachNlri) => {
                let (buf, mp_reach) = parse_mp_reach(buf)?;
                (buf, PathAttributeValue::MpReach(mp_reach))
            }
            Ok(PathAttributeType::MpUnreachNlri) => {
                let (buf, afi) = be_u16(buf)?;
                let (buf, safi) = be_u8(buf)?;
                let address_type = AddressType::new(afi, safi);
                let (buf, nlri) = parse_mp_nlri(buf, address_type)?;
                (
                    buf,
                    PathAttributeValue::MpUnreach(MpUnreach::new(address_type, nlri)),
                )
            }
            Ok(PathAttributeType::ExtendedCommunities) => {
                self.check_length_multiple_of(EXTENDED_COMMUNITY_LEN)?;
                let (buf, communities) = nom::multi::many0(nom::combinator::map(
                    nom::bytes::complete::take(EXTENDED_COMMUNITY_LEN),
                    |value: Span<'_>| {
                        let mut community = [0u8; 8];
                        community.copy_from_slice(value);
                        ExtendedCommunity::new(community)
                    },
                ))(buf)?;
                (
                    buf,
                    PathAttributeValue::ExtendedCommunities(ExtendedCommunities::new(communities)),
                )
            }
            Ok(PathAttributeType::As4Path) => {
                let (buf, segments) = parse_as4_path_segments(buf)?;
                (buf, PathAttributeValue::As4Path(As4Path::new(segments)))
            }
            Ok(PathAttributeType::As4Aggregator) => {
                self.check_length(AS4_AGGREGATOR_LEN)?;
                let (buf, aggregator) = parse_as4_aggregator(buf)?;
                (buf, PathAttributeValue::As4Aggregator(aggregator))
            }
            Ok(PathAttributeType::LargeCommunities) => {
                self.check_length_multiple_of(LARGE_COMMUNITY_LEN)?;
                let (buf, communities) = nom::multi::many0(nom::combinator::map(
                    nom::sequence::tuple((be_u32, be_u32, be_u32)),
                    |(global_admin, local_data1, local_data2)| {
                        LargeCommunity::new(global_admin, local_data1, local_data2)
                    },
                ))(buf)?;
                (
                    buf,
                    PathAttributeValue::LargeCommunities(LargeCommunities::new(communities)),
                )
            }
            Err(_) => (
                &buf[buf.len()..],
                PathAttributeValue::UnknownAttribute(UnknownAttribute::new(
                    self.code,
                    buf.to_vec(),
                )),
            ),
        };
        if !buf.is_empty() {
            return Err(self.invalid_length());
        }
        match PathAttribute::from(
            self.optional(),
            self.transitive(),
            self.partial(),
            self.extended_length(),
            value,
        ) {
            Ok(attr) => Ok(attr),
            Err((value, err)) => Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
                self.value,
                PathAttributeParsingError::InvalidPathAttribute(err, value),
            ))),
        }
    }
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedPathAttributeParsingError<'a>> for PathAttribute {
    fn from_wire(
        buf: Span<'a>,
        asn4: bool,
    ) -> IResult<Span<'a>, Self, LocatedPathAttributeParsingError<'a>> {
        let (buf, raw) = RawPathAttribute::from_wire(buf)?;
        let attr = raw.parse(asn4)?;
        Ok((buf, attr))
    }
}

fn parse_as4_aggregator(
    buf: Span<'_>,
) -> IResult<Span<'_>, As4Aggregator, LocatedPathAttributeParsingError<'_>> {
    let (buf, asn) = be_u32(buf)?;
    let (buf, origin) = be_u32(buf)?;
    Ok((buf, As4Aggregator::new(asn, Ipv4Addr::from(origin))))
}

fn parse_as2_path_segments(
    buf: Span<'_>,
) -> IResult<Span<'_>, Vec<As2PathSegment>, LocatedPathAttributeParsingError<'_>> {
    let mut buf = buf;
    let mut segments = Vec::new();
    while !buf.is_empty() {
        let (tmp, segment_type) =
            nom::combinator::map_res(be_u8, AsPathSegmentType::try_from)(buf)?;
        let (tmp, as_numbers) = nom::multi::length_count(be_u8, be_u16)(tmp)?;
        segments.push(As2PathSegment::new(segment_type, as_numbers));
        buf = tmp;
    }
    Ok((buf, segments))
}

fn parse_as4_path_segments(
    buf: Span<'_>,
) -> IResult<Span<'_>, Vec<As4PathSegment>, LocatedPathAttributeParsingError<'_>> {
    let mut buf = buf;
    let mut segments = Vec::new();
    while !buf.is_empty() {
        let (tmp, segment_type) =
            nom::combinator::map_res(be_u8, AsPathSegmentType::try_from)(buf)?;
        let (tmp, as_numbers) = nom::multi::length_count(be_u8, be_u32)(tmp)?;
        segments.push(As4PathSegment::new(segment_type, as_numbers));
        buf = tmp;
    }
    Ok((buf, segments))
}

/// Only IPv4 and IPv6 unicast and multicast are decoded, other families keep
/// the raw bytes
#[inline]
const fn is_decoded_family(address_type: AddressType) -> bool {
    (address_type.afi() == 1 || address_type.afi() == 2)
        && (address_type.safi() == 1 || address_type.safi() == 2)
}

fn parse_mp_next_hop(
    buf: Span<'_>,
    address_type: AddressType,
) -> IResult<Span<'_>, MpNextHop, LocatedPathAttributeParsingError<'_>> {
    let input = buf;
    let (buf, next_hop_len) = be_u8(buf)?;
    let (buf, next_hop_buf) = nom::bytes::complete::take(next_hop_len)(buf)?;
    if !is_decoded_family(address_type) {
        return Ok((buf, MpNextHop::Unknown(next_hop_buf.to_vec())));
    }
    let next_hop = match next_hop_len {
        IPV4_LEN => {
            let (_, addr) = be_u32(next_hop_buf)?;
            MpNextHop::Ipv4(Ipv4Addr::from(addr))
        }
        IPV6_LEN => {
            let (_, global) = be_u128(next_hop_buf)?;
            MpNextHop::Ipv6 {
                global: Ipv6Addr::from(global),
                link_local: None,
            }
        }
        IPV6_WITH_LINK_LOCAL_LEN => {
            let (next_hop_buf, global) = be_u128(next_hop_buf)?;
            let (_, link_local) = be_u128(next_hop_buf)?;
            MpNextHop::Ipv6 {
                global: Ipv6Addr::from(global),
                link_local: Some(Ipv6Addr::from(link_local)),
            }
        }
        len => {
            return Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
                input,
                PathAttributeParsingError::InvalidNextHopLength(len),
            )))
        }
    };
    Ok((buf, next_hop))
}

fn parse_mp_nlri(
    buf: Span<'_>,
    address_type: AddressType,
) -> IResult<Span<'_>, MpNlri, LocatedPathAttributeParsingError<'_>> {
    if !is_decoded_family(address_type) {
        return Ok((&buf[buf.len()..], MpNlri::Unknown(buf.to_vec())));
    }
    if address_type.afi() == 1 {
        let (buf, prefixes) = parse_till_empty_into_located_with(buf, ipv4_prefix)?;
        Ok((buf, MpNlri::Ipv4(prefixes)))
    } else {
        let (buf, prefixes) = parse_till_empty_into_located_with(buf, ipv6_prefix)?;
        Ok((buf, MpNlri::Ipv6(prefixes)))
    }
}

fn parse_mp_reach(buf: Span<'_>) -> IResult<Span<'_>, MpReach, LocatedPathAttributeParsingError<'_>> {
    let (buf, afi) = be_u16(buf)?;
    let (buf, safi) = be_u8(buf)?;
    let address_type = AddressType::new(afi, safi);
    let (buf, next_hop) = parse_mp_next_hop(buf, address_type)?;
    let (buf, _reserved) = be_u8(buf)?;
    let (buf, nlri) = parse_mp_nlri(buf, address_type)?;
    Ok((buf, MpReach::new(address_type, next_hop, nlri)))
}
