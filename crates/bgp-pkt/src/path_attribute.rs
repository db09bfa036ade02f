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

//! Contains the definitions for the [`PathAttribute`] that can be used in
//! [`crate::update::BgpUpdateMessage`].

use crate::iana::{AddressType, PathAttributeType};
use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use strum_macros::{Display, FromRepr};

/// General properties to check the validity of a given path attribute value
pub trait PathAttributeValueProperties {
    /// Check the validity of the `optional` bit in the [`PathAttribute`]:
    ///  - `Some(true)` optional must be set to `true`.
    ///  - `Some(false)` optional must be set to `false`.
    ///  - `None` optional can be set to either `true` or `false`.
    fn can_be_optional() -> Option<bool>;

    /// Check the validity of the `transitive` bit in the [`PathAttribute`]:
    ///  - `Some(true)` transitive must be set to `true`.
    ///  - `Some(false)` transitive must be set to `false`.
    ///  - `None` transitive can be set to either `true` or `false`.
    fn can_be_transitive() -> Option<bool>;
}

macro_rules! attribute_properties {
    ($name:ident, $optional:expr, $transitive:expr) => {
        impl PathAttributeValueProperties for $name {
            fn can_be_optional() -> Option<bool> {
                $optional
            }

            fn can_be_transitive() -> Option<bool> {
                $transitive
            }
        }
    };
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum InvalidPathAttribute {
    InvalidOptionalFlagValue(bool),
    InvalidTransitiveFlagValue(bool),
}

/// Path Attribute
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attr. Flags  |Attr. Type Code| Path value (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PathAttribute {
    /// Optional bit defines whether the attribute is optional (if set to
    /// `true`) or well-known (if set to `false`).
    optional: bool,
    /// Transitive bit defines whether an optional attribute is transitive (if
    /// set to `true`) or non-transitive (if set to `false`). For well-known
    /// attributes, the Transitive bit MUST be set to `true`.
    transitive: bool,
    partial: bool,
    extended_length: bool,
    value: PathAttributeValue,
}

impl PathAttribute {
    pub fn from(
        optional: bool,
        transitive: bool,
        partial: bool,
        extended_length: bool,
        value: PathAttributeValue,
    ) -> Result<PathAttribute, (PathAttributeValue, InvalidPathAttribute)> {
        if value
            .can_be_optional()
            .map(|x| x != optional)
            .unwrap_or(false)
        {
            return Err((
                value,
                InvalidPathAttribute::InvalidOptionalFlagValue(optional),
            ));
        }
        if value
            .can_be_transitive()
            .map(|x| x != transitive)
            .unwrap_or(false)
        {
            return Err((
                value,
                InvalidPathAttribute::InvalidTransitiveFlagValue(transitive),
            ));
        }
        Ok(PathAttribute {
            optional,
            transitive,
            partial,
            extended_length,
            value,
        })
    }

    pub const fn value(&self) -> &PathAttributeValue {
        &self.value
    }

    pub const fn optional(&self) -> bool {
        self.optional
    }

    pub const fn transitive(&self) -> bool {
        self.transitive
    }

    /// Partial bit defines whether the information contained in the optional
    /// transitive attribute is partial (if set to `true`) or complete (if
    /// set to `false`).
    pub const fn partial(&self) -> bool {
        self.partial
    }

    /// Extended Length bit defines whether the Attribute Length is one octet
    /// (if set to `false`) or two octets (if set to `true`).
    pub const fn extended_length(&self) -> bool {
        self.extended_length
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PathAttributeValue {
    Origin(Origin),
    AsPath(AsPath),
    NextHop(NextHop),
    MultiExitDiscriminator(MultiExitDiscriminator),
    LocalPreference(LocalPreference),
    AtomicAggregate(AtomicAggregate),
    Aggregator(Aggregator),
    Communities(Communities),
    Originator(Originator),
    ClusterList(ClusterList),
    MpReach(MpReach),
    MpUnreach(MpUnreach),
    ExtendedCommunities(ExtendedCommunities),
    As4Path(As4Path),
    As4Aggregator(As4Aggregator),
    LargeCommunities(LargeCommunities),
    UnknownAttribute(UnknownAttribute),
}

impl PathAttributeValue {
    /// The attribute type code, `Err` carries the code of unknown attributes
    pub const fn path_attribute_type(&self) -> Result<PathAttributeType, u8> {
        match self {
            Self::Origin(_) => Ok(PathAttributeType::Origin),
            Self::AsPath(_) => Ok(PathAttributeType::AsPath),
            Self::NextHop(_) => Ok(PathAttributeType::NextHop),
            Self::MultiExitDiscriminator(_) => Ok(PathAttributeType::MultiExitDiscriminator),
            Self::LocalPreference(_) => Ok(PathAttributeType::LocalPreference),
            Self::AtomicAggregate(_) => Ok(PathAttributeType::AtomicAggregate),
            Self::Aggregator(_) => Ok(PathAttributeType::Aggregator),
            Self::Communities(_) => Ok(PathAttributeType::Communities),
            Self::Originator(_) => Ok(PathAttributeType::OriginatorId),
            Self::ClusterList(_) => Ok(PathAttributeType::ClusterList),
            Self::MpReach(_) => Ok(PathAttributeType::MpReachNlri),
            Self::MpUnreach(_) => Ok(PathAttributeType::MpUnreachNlri),
            Self::ExtendedCommunities(_) => Ok(PathAttributeType::ExtendedCommunities),
            Self::As4Path(_) => Ok(PathAttributeType::As4Path),
            Self::As4Aggregator(_) => Ok(PathAttributeType::As4Aggregator),
            Self::LargeCommunities(_) => Ok(PathAttributeType::LargeCommunities),
            Self::UnknownAttribute(value) => Err(value.code),
        }
    }

    pub fn can_be_optional(&self) -> Option<bool> {
        match self {
            Self::Origin(_) => Origin::can_be_optional(),
            Self::AsPath(_) => AsPath::can_be_optional(),
            Self::NextHop(_) => NextHop::can_be_optional(),
            Self::MultiExitDiscriminator(_) => MultiExitDiscriminator::can_be_optional(),
            Self::LocalPreference(_) => LocalPreference::can_be_optional(),
            Self::AtomicAggregate(_) => AtomicAggregate::can_be_optional(),
            Self::Aggregator(_) => Aggregator::can_be_optional(),
            Self::Communities(_) => Communities::can_be_optional(),
            Self::Originator(_) => Originator::can_be_optional(),
            Self::ClusterList(_) => ClusterList::can_be_optional(),
            Self::MpReach(_) => MpReach::can_be_optional(),
            Self::MpUnreach(_) => MpUnreach::can_be_optional(),
            Self::ExtendedCommunities(_) => ExtendedCommunities::can_be_optional(),
            Self::As4Path(_) => As4Path::can_be_optional(),
            Self::As4Aggregator(_) => As4Aggregator::can_be_optional(),
            Self::LargeCommunities(_) => LargeCommunities::can_be_optional(),
            Self::UnknownAttribute(_) => UnknownAttribute::can_be_optional(),
        }
    }

    pub fn can_be_transitive(&self) -> Option<bool> {
        match self {
            Self::Origin(_) => Origin::can_be_transitive(),
            Self::AsPath(_) => AsPath::can_be_transitive(),
            Self::NextHop(_) => NextHop::can_be_transitive(),
            Self::MultiExitDiscriminator(_) => MultiExitDiscriminator::can_be_transitive(),
            Self::LocalPreference(_) => LocalPreference::can_be_transitive(),
            Self::AtomicAggregate(_) => AtomicAggregate::can_be_transitive(),
            Self::Aggregator(_) => Aggregator::can_be_transitive(),
            Self::Communities(_) => Communities::can_be_transitive(),
            Self::Originator(_) => Originator::can_be_transitive(),
            Self::ClusterList(_) => ClusterList::can_be_transitive(),
            Self::MpReach(_) => MpReach::can_be_transitive(),
            Self::MpUnreach(_) => MpUnreach::can_be_transitive(),
            Self::ExtendedCommunities(_) => ExtendedCommunities::can_be_transitive(),
            Self::As4Path(_) => As4Path::can_be_transitive(),
            Self::As4Aggregator(_) => As4Aggregator::can_be_transitive(),
            Self::LargeCommunities(_) => LargeCommunities::can_be_transitive(),
            Self::UnknownAttribute(_) => UnknownAttribute::can_be_transitive(),
        }
    }
}

/// ORIGIN is a well-known mandatory attribute that defines the origin of the
/// path information.
///
/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  len=1        | value         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Origin {
    IGP = 0,
    EGP = 1,
    Incomplete = 2,
}

attribute_properties!(Origin, Some(false), Some(true));

impl From<Origin> for u8 {
    fn from(value: Origin) -> Self {
        value as u8
    }
}

/// Error type used in [`TryFrom`] for [`Origin`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedOrigin(pub u8);

impl TryFrom<u8> for Origin {
    type Error = UndefinedOrigin;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedOrigin(value)),
        }
    }
}

/// `AS_PATH` is a well-known mandatory attribute that is composed
/// of a sequence of AS path segments. The width of the AS numbers depends on
/// whether the four-octet AS capability was negotiated for the session.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AsPath {
    As2PathSegments(Vec<As2PathSegment>),
    As4PathSegments(Vec<As4PathSegment>),
}

attribute_properties!(AsPath, Some(false), Some(true));

/// AS Path Segment Type, confederation types are defined in
/// [RFC5065](https://datatracker.ietf.org/doc/html/rfc5065)
///
/// ```text
/// 0
/// 0 1 2 3 4 5 6 7 8
/// +-+-+-+-+-+-+-+-+
/// | set=1 or seq=2|
/// +-+-+-+-+-+-+-+-+
/// ```
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AsPathSegmentType {
    AsSet = 1,
    AsSequence = 2,
    AsConfedSequence = 3,
    AsConfedSet = 4,
}

impl From<AsPathSegmentType> for u8 {
    fn from(value: AsPathSegmentType) -> Self {
        value as u8
    }
}

/// Error type used in [`TryFrom`] for [`AsPathSegmentType`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedAsPathSegmentType(pub u8);

impl TryFrom<u8> for AsPathSegmentType {
    type Error = UndefinedAsPathSegmentType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedAsPathSegmentType(value)),
        }
    }
}

///  Each AS path segment is represented by a triple:
/// <path segment type, path segment length, path segment value>.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct As2PathSegment {
    segment_type: AsPathSegmentType,
    as_numbers: Vec<u16>,
}

impl As2PathSegment {
    pub fn new(segment_type: AsPathSegmentType, as_numbers: Vec<u16>) -> Self {
        Self {
            segment_type,
            as_numbers,
        }
    }

    pub const fn segment_type(&self) -> AsPathSegmentType {
        self.segment_type
    }

    pub const fn as_numbers(&self) -> &Vec<u16> {
        &self.as_numbers
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct As4PathSegment {
    segment_type: AsPathSegmentType,
    as_numbers: Vec<u32>,
}

impl As4PathSegment {
    pub const fn new(segment_type: AsPathSegmentType, as_numbers: Vec<u32>) -> Self {
        Self {
            segment_type,
            as_numbers,
        }
    }

    pub const fn segment_type(&self) -> AsPathSegmentType {
        self.segment_type
    }

    pub const fn as_numbers(&self) -> &Vec<u32> {
        &self.as_numbers
    }
}

/// This is an optional transitive attribute that contains the AS path encoded
/// with four-octet AS numbers, regardless of the session AS width.
/// See [RFC6793](https://datatracker.ietf.org/doc/html/RFC6793)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct As4Path {
    segments: Vec<As4PathSegment>,
}

impl As4Path {
    pub const fn new(segments: Vec<As4PathSegment>) -> Self {
        Self { segments }
    }

    pub const fn segments(&self) -> &Vec<As4PathSegment> {
        &self.segments
    }
}

attribute_properties!(As4Path, Some(true), Some(true));

/// This is a well-known mandatory attribute that defines the
/// (unicast) IP address of the router that SHOULD be used as
/// the next hop to the destinations listed in the Network Layer
/// Reachability Information field of the UPDATE message.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NextHop {
    next_hop: Ipv4Addr,
}

impl NextHop {
    pub const fn new(next_hop: Ipv4Addr) -> Self {
        Self { next_hop }
    }

    pub const fn next_hop(&self) -> Ipv4Addr {
        self.next_hop
    }
}

attribute_properties!(NextHop, Some(false), Some(true));

/// This is an optional non-transitive attribute that is a
/// four-octet unsigned integer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MultiExitDiscriminator {
    metric: u32,
}

impl MultiExitDiscriminator {
    pub const fn new(metric: u32) -> Self {
        Self { metric }
    }

    pub const fn metric(&self) -> u32 {
        self.metric
    }
}

attribute_properties!(MultiExitDiscriminator, Some(true), Some(false));

/// `LOCAL_PREF` is a well-known attribute that is a four-octet
/// unsigned integer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LocalPreference {
    metric: u32,
}

impl LocalPreference {
    pub const fn new(metric: u32) -> Self {
        Self { metric }
    }

    pub const fn metric(&self) -> u32 {
        self.metric
    }
}

attribute_properties!(LocalPreference, Some(false), Some(true));

/// `ATOMIC_AGGREGATE` is a well-known discretionary attribute of length 0.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AtomicAggregate;

attribute_properties!(AtomicAggregate, Some(false), Some(true));

/// AGGREGATOR is an optional transitive attribute. The attribute contains the
/// last AS number that formed the aggregate route, followed by the IP
/// address of the BGP speaker that formed the aggregate route.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Aggregator {
    As2Aggregator(As2Aggregator),
    As4Aggregator(As4Aggregator),
}

attribute_properties!(Aggregator, Some(true), Some(true));

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct As2Aggregator {
    asn: u16,
    origin: Ipv4Addr,
}

impl As2Aggregator {
    pub const fn new(asn: u16, origin: Ipv4Addr) -> Self {
        Self { asn, origin }
    }

    pub const fn asn(&self) -> u16 {
        self.asn
    }

    pub const fn origin(&self) -> Ipv4Addr {
        self.origin
    }
}

/// Used both for the four-octet AGGREGATOR and the `AS4_AGGREGATOR`
/// attribute, they share the same layout.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct As4Aggregator {
    asn: u32,
    origin: Ipv4Addr,
}

impl As4Aggregator {
    pub const fn new(asn: u32, origin: Ipv4Addr) -> Self {
        Self { asn, origin }
    }

    pub const fn asn(&self) -> u32 {
        self.asn
    }

    pub const fn origin(&self) -> Ipv4Addr {
        self.origin
    }
}

attribute_properties!(As4Aggregator, Some(true), Some(true));

/// COMMUNITIES path attribute is an optional transitive attribute of variable
/// length. The attribute consists of a set of four octet values, each of which
/// specify a community.
///
/// See [RFC1997](https://datatracker.ietf.org/doc/html/rfc1997)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Communities {
    communities: Vec<Community>,
}

impl Communities {
    pub const fn new(communities: Vec<Community>) -> Self {
        Self { communities }
    }

    pub const fn communities(&self) -> &Vec<Community> {
        &self.communities
    }
}

attribute_properties!(Communities, Some(true), Some(true));

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Community(u32);

impl Community {
    pub const NO_EXPORT: Community = Community(0xFFFFFF01);
    pub const NO_ADVERTISE: Community = Community(0xFFFFFF02);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Parsing the community value assuming the high-order 16 bits is the ASN
    pub const fn collapse_asn(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn collapse_value(&self) -> u16 {
        (self.0 & 0x0000ffff) as u16
    }
}

/// See [RFC4360](https://datatracker.ietf.org/doc/html/rfc4360)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExtendedCommunities {
    communities: Vec<ExtendedCommunity>,
}

impl ExtendedCommunities {
    pub const fn new(communities: Vec<ExtendedCommunity>) -> Self {
        Self { communities }
    }

    pub const fn communities(&self) -> &Vec<ExtendedCommunity> {
        &self.communities
    }
}

attribute_properties!(ExtendedCommunities, Some(true), Some(true));

/// Extended community kept in its raw eight octets
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Type high    |  Type low(*)  |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+          Value                |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ExtendedCommunity([u8; 8]);

impl ExtendedCommunity {
    pub const fn new(value: [u8; 8]) -> Self {
        Self(value)
    }

    pub const fn type_high(&self) -> u8 {
        self.0[0]
    }

    pub const fn sub_type(&self) -> u8 {
        self.0[1]
    }

    pub const fn value(&self) -> &[u8; 8] {
        &self.0
    }
}

/// See [RFC8092](https://datatracker.ietf.org/doc/html/rfc8092)
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LargeCommunities {
    communities: Vec<LargeCommunity>,
}

impl LargeCommunities {
    pub const fn new(communities: Vec<LargeCommunity>) -> Self {
        Self { communities }
    }

    pub const fn communities(&self) -> &Vec<LargeCommunity> {
        &self.communities
    }
}

attribute_properties!(LargeCommunities, Some(true), Some(true));

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LargeCommunity {
    global_admin: u32,
    local_data1: u32,
    local_data2: u32,
}

impl LargeCommunity {
    pub const fn new(global_admin: u32, local_data1: u32, local_data2: u32) -> Self {
        Self {
            global_admin,
            local_data1,
            local_data2,
        }
    }

    pub const fn global_admin(&self) -> u32 {
        self.global_admin
    }

    pub const fn local_data1(&self) -> u32 {
        self.local_data1
    }

    pub const fn local_data2(&self) -> u32 {
        self.local_data2
    }
}

/// `ORIGINATOR_ID` is an optional, non-transitive BGP attribute carrying the
/// BGP Identifier of the originator of the route in the local AS.
///
/// [RFC4456](https://datatracker.ietf.org/doc/html/rfc4456) defines this value
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Originator(Ipv4Addr);

impl Originator {
    pub const fn new(id: Ipv4Addr) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> Ipv4Addr {
        self.0
    }
}

attribute_properties!(Originator, Some(true), Some(false));

/// `CLUSTER_LIST` is an optional, non-transitive BGP attribute. It is a
/// sequence of `CLUSTER_ID` values representing the reflection path that the
/// route has passed.
///
/// [RFC4456](https://datatracker.ietf.org/doc/html/rfc4456) defines this value
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterList(Vec<ClusterId>);

impl ClusterList {
    pub const fn new(cluster_list: Vec<ClusterId>) -> Self {
        Self(cluster_list)
    }

    pub const fn cluster_list(&self) -> &Vec<ClusterId> {
        &self.0
    }
}

attribute_properties!(ClusterList, Some(true), Some(false));

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterId(Ipv4Addr);

impl ClusterId {
    pub const fn new(id: Ipv4Addr) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> Ipv4Addr {
        self.0
    }
}

/// Next hop carried in [`MpReach`]. The form is picked by the next hop length
/// for the address families we decode, anything else is kept as raw bytes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MpNextHop {
    Ipv4(Ipv4Addr),
    Ipv6 {
        global: Ipv6Addr,
        link_local: Option<Ipv6Addr>,
    },
    Unknown(Vec<u8>),
}

/// NLRI carried in [`MpReach`] and [`MpUnreach`]
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MpNlri {
    Ipv4(Vec<Ipv4Net>),
    Ipv6(Vec<Ipv6Net>),
    Unknown(Vec<u8>),
}

impl MpNlri {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ipv4(prefixes) => prefixes.is_empty(),
            Self::Ipv6(prefixes) => prefixes.is_empty(),
            Self::Unknown(value) => value.is_empty(),
        }
    }
}

/// Multi-protocol Reachable NLRI (`MP_REACH_NLRI`) is an optional
/// non-transitive attribute that is used to advertise feasible routes for an
/// address family other than IPv4 unicast, along with their next hop.
///
/// see [RFC4760](https://www.rfc-editor.org/rfc/rfc4760)
///
/// ```text
/// +---------------------------------------------------------+
/// | Address Family Identifier (2 octets)                    |
/// +---------------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet)          |
/// +---------------------------------------------------------+
/// | Length of Next Hop Network Address (1 octet)            |
/// +---------------------------------------------------------+
/// | Network Address of Next Hop (variable)                  |
/// +---------------------------------------------------------+
/// | Reserved (1 octet)                                      |
/// +---------------------------------------------------------+
/// | Network Layer Reachability Information (variable)       |
/// +---------------------------------------------------------+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MpReach {
    address_type: AddressType,
    next_hop: MpNextHop,
    nlri: MpNlri,
}

impl MpReach {
    pub const fn new(address_type: AddressType, next_hop: MpNextHop, nlri: MpNlri) -> Self {
        Self {
            address_type,
            next_hop,
            nlri,
        }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub const fn next_hop(&self) -> &MpNextHop {
        &self.next_hop
    }

    pub const fn nlri(&self) -> &MpNlri {
        &self.nlri
    }
}

attribute_properties!(MpReach, Some(true), Some(false));

/// Multi-protocol Unreachable NLRI (`MP_UNREACH_NLRI`) is an optional
/// non-transitive attribute that can be used for the purpose of withdrawing
/// multiple unfeasible routes from service.
///
/// ```text
/// +---------------------------------------------------------+
/// | Address Family Identifier (2 octets)                    |
/// +---------------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet)          |
/// +---------------------------------------------------------+
/// | Withdrawn Routes (variable)                             |
/// +---------------------------------------------------------+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MpUnreach {
    address_type: AddressType,
    nlri: MpNlri,
}

impl MpUnreach {
    pub const fn new(address_type: AddressType, nlri: MpNlri) -> Self {
        Self { address_type, nlri }
    }

    pub const fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub const fn nlri(&self) -> &MpNlri {
        &self.nlri
    }
}

attribute_properties!(MpUnreach, Some(true), Some(false));

/// Path attribute can be of size `u8` or `u16` based on `extended_length` bit.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PathAttributeLength {
    U8(u8),
    U16(u16),
}

impl From<PathAttributeLength> for u16 {
    fn from(path_attr_len: PathAttributeLength) -> Self {
        match path_attr_len {
            PathAttributeLength::U8(len) => len.into(),
            PathAttributeLength::U16(len) => len,
        }
    }
}

/// Attribute type this crate has no model for, kept as is
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnknownAttribute {
    code: u8,
    value: Vec<u8>,
}

impl UnknownAttribute {
    pub const fn new(code: u8, value: Vec<u8>) -> Self {
        Self { code, value }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn value(&self) -> &Vec<u8> {
        &self.value
    }
}

attribute_properties!(UnknownAttribute, None, None);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_validation() {
        let good = PathAttribute::from(
            false,
            true,
            false,
            false,
            PathAttributeValue::Origin(Origin::IGP),
        );
        let bad_optional = PathAttribute::from(
            true,
            true,
            false,
            false,
            PathAttributeValue::Origin(Origin::IGP),
        );
        let bad_transitive = PathAttribute::from(
            true,
            true,
            false,
            false,
            PathAttributeValue::MultiExitDiscriminator(MultiExitDiscriminator::new(1)),
        );
        let unknown = PathAttribute::from(
            true,
            false,
            true,
            true,
            PathAttributeValue::UnknownAttribute(UnknownAttribute::new(99, vec![1])),
        );
        assert!(good.is_ok());
        assert_eq!(
            bad_optional,
            Err((
                PathAttributeValue::Origin(Origin::IGP),
                InvalidPathAttribute::InvalidOptionalFlagValue(true)
            ))
        );
        assert_eq!(
            bad_transitive.map_err(|(_, err)| err),
            Err(InvalidPathAttribute::InvalidTransitiveFlagValue(true))
        );
        assert!(unknown.is_ok());
    }

    #[test]
    fn test_community() {
        let community = Community::new(0xFDE8_0064);
        assert_eq!(community.collapse_asn(), 65000);
        assert_eq!(community.collapse_value(), 100);
        assert_eq!(Community::NO_EXPORT.value(), 0xFFFFFF01);
    }
}
