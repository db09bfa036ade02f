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

//! Capabilities advertised by each side of a session and their negotiation.

use std::collections::BTreeMap;

use bgpwire_bgp_pkt::{
    capabilities::{
        AddPathAddressFamily, AddPathCapability, BgpCapability, FourOctetAsCapability,
        GracefulRestartCapability, MultiProtocolExtensionsCapability,
    },
    iana::{AddressType, BgpCapabilityCode},
    open::{BgpOpenMessage, BgpOpenMessageParameter},
    route_refresh::BgpRouteRefreshMessage,
};

use crate::config::CapabilityConfig;

/// Capabilities indexed by their IANA code. Capabilities that may appear
/// more than once, such as multiprotocol extensions, keep every instance
/// under the same code.
///
/// Capabilities with codes this crate doesn't know are not kept, they can't
/// be negotiated.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CapabilitySet {
    capabilities: BTreeMap<BgpCapabilityCode, Vec<BgpCapability>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum RouteRefreshRefused {
    #[error("peer didn't advertise any route refresh capability")]
    NotSupported,

    #[error("peer didn't advertise multiprotocol capability for {0:?}")]
    AddressTypeNotAdvertised(AddressType),
}

impl CapabilitySet {
    /// Build the set advertised to the peer. The four octet AS capability
    /// carries our own AS number.
    pub fn from_config(config: &CapabilityConfig, local_as: u32) -> Self {
        let mut set = Self::default();
        for address_type in config.afi_safi() {
            set.insert(BgpCapability::MultiProtocolExtensions(
                MultiProtocolExtensionsCapability::new(*address_type),
            ));
        }
        if config.route_refresh() {
            set.insert(BgpCapability::RouteRefresh);
        }
        if config.cisco_route_refresh() {
            set.insert(BgpCapability::CiscoRouteRefresh);
        }
        if config.enhanced_route_refresh() {
            set.insert(BgpCapability::EnhancedRouteRefresh);
        }
        if config.four_bytes_as() {
            set.insert(BgpCapability::FourOctetAs(FourOctetAsCapability::new(
                local_as,
            )));
        }
        if config.graceful_restart() {
            set.insert(BgpCapability::GracefulRestartCapability(
                GracefulRestartCapability::new(false, false, 0, vec![]),
            ));
        }
        if config.add_path() {
            let address_families = config
                .afi_safi()
                .iter()
                .map(|address_type| AddPathAddressFamily::new(*address_type, false, true))
                .collect();
            set.insert(BgpCapability::AddPath(AddPathCapability::new(
                address_families,
            )));
        }
        set
    }

    /// Build the set the peer advertised in its Open message
    pub fn from_open(open: &BgpOpenMessage) -> Self {
        let mut set = Self::default();
        for capability in open.capabilities() {
            set.insert(capability.clone());
        }
        set
    }

    fn insert(&mut self, capability: BgpCapability) {
        if let Ok(code) = capability.code() {
            self.capabilities.entry(code).or_default().push(capability);
        }
    }

    /// Keep only the capabilities of `local` that `remote` advertised too.
    /// The parameters of `local` are kept as is.
    pub fn negotiate(local: &CapabilitySet, remote: &CapabilitySet) -> CapabilitySet {
        let capabilities = local
            .capabilities
            .iter()
            .filter(|(code, _)| remote.contains(**code))
            .map(|(code, caps)| (*code, caps.clone()))
            .collect();
        CapabilitySet { capabilities }
    }

    pub fn contains(&self, code: BgpCapabilityCode) -> bool {
        self.capabilities.contains_key(&code)
    }

    pub fn get(&self, code: BgpCapabilityCode) -> Option<&Vec<BgpCapability>> {
        self.capabilities.get(&code)
    }

    pub fn codes(&self) -> impl Iterator<Item = BgpCapabilityCode> + '_ {
        self.capabilities.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BgpCapability> {
        self.capabilities.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn four_octet_as(&self) -> bool {
        self.contains(BgpCapabilityCode::FourOctetAs)
    }

    /// Address families from the multiprotocol extensions capabilities
    pub fn address_types(&self) -> impl Iterator<Item = AddressType> + '_ {
        self.capabilities
            .get(&BgpCapabilityCode::MultiProtocolExtensions)
            .into_iter()
            .flatten()
            .filter_map(|cap| match cap {
                BgpCapability::MultiProtocolExtensions(mp) => Some(mp.address_type()),
                _ => None,
            })
    }

    /// All capabilities in a single Open message parameter, no parameter at
    /// all for an empty set
    pub fn open_params(&self) -> Vec<BgpOpenMessageParameter> {
        if self.is_empty() {
            return vec![];
        }
        vec![BgpOpenMessageParameter::Capabilities(
            self.iter().cloned().collect(),
        )]
    }

    /// Build a route refresh for a peer that advertised this set. The pre
    /// standard variant is preferred when the peer supports it.
    pub fn route_refresh(
        &self,
        address_type: AddressType,
    ) -> Result<BgpRouteRefreshMessage, RouteRefreshRefused> {
        let cisco = if self.contains(BgpCapabilityCode::CiscoRouteRefresh) {
            true
        } else if self.contains(BgpCapabilityCode::RouteRefreshCapability) {
            false
        } else {
            return Err(RouteRefreshRefused::NotSupported);
        };
        if !self.address_types().any(|x| x == address_type) {
            return Err(RouteRefreshRefused::AddressTypeNotAdvertised(address_type));
        }
        if cisco {
            Ok(BgpRouteRefreshMessage::new_cisco(address_type))
        } else {
            Ok(BgpRouteRefreshMessage::new(address_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CapabilityConfigBuilder;
    use rstest::rstest;
    use std::net::Ipv4Addr;

    fn remote(capabilities: Vec<BgpCapability>) -> CapabilitySet {
        let open = BgpOpenMessage::new(
            200,
            180,
            Ipv4Addr::new(10, 0, 0, 2),
            vec![BgpOpenMessageParameter::Capabilities(capabilities)],
        );
        CapabilitySet::from_open(&open)
    }

    fn mp(address_type: AddressType) -> BgpCapability {
        BgpCapability::MultiProtocolExtensions(MultiProtocolExtensionsCapability::new(
            address_type,
        ))
    }

    #[test]
    fn test_from_default_config() {
        let set = CapabilitySet::from_config(&CapabilityConfig::default(), 65536);
        assert_eq!(
            set.codes().collect::<Vec<_>>(),
            vec![
                BgpCapabilityCode::MultiProtocolExtensions,
                BgpCapabilityCode::RouteRefreshCapability,
                BgpCapabilityCode::GracefulRestartCapability,
                BgpCapabilityCode::FourOctetAs,
                BgpCapabilityCode::EnhancedRouteRefresh,
                BgpCapabilityCode::CiscoRouteRefresh,
            ]
        );
        assert_eq!(
            set.get(BgpCapabilityCode::FourOctetAs),
            Some(&vec![BgpCapability::FourOctetAs(FourOctetAsCapability::new(
                65536
            ))])
        );
        assert_eq!(
            set.address_types().collect::<Vec<_>>(),
            vec![AddressType::IPV4_UNICAST]
        );
    }

    #[test]
    fn test_add_path_receive_only() {
        let config = CapabilityConfigBuilder::new()
            .add_path(true)
            .afi_safi(vec![AddressType::IPV4_UNICAST, AddressType::IPV6_UNICAST])
            .build();
        let set = CapabilitySet::from_config(&config, 100);
        assert_eq!(
            set.get(BgpCapabilityCode::AddPathCapability),
            Some(&vec![BgpCapability::AddPath(AddPathCapability::new(vec![
                AddPathAddressFamily::new(AddressType::IPV4_UNICAST, false, true),
                AddPathAddressFamily::new(AddressType::IPV6_UNICAST, false, true),
            ]))])
        );
        assert_eq!(
            set.get(BgpCapabilityCode::MultiProtocolExtensions)
                .map(|caps| caps.len()),
            Some(2)
        );
    }

    #[test]
    fn test_from_open_drops_unrecognized() {
        let set = remote(vec![
            BgpCapability::RouteRefresh,
            BgpCapability::Unrecognized(
                bgpwire_bgp_pkt::capabilities::UnrecognizedCapability::new(73, vec![1]),
            ),
        ]);
        assert_eq!(
            set.codes().collect::<Vec<_>>(),
            vec![BgpCapabilityCode::RouteRefreshCapability]
        );
    }

    #[rstest]
    #[case(vec![], vec![])]
    #[case(
        vec![BgpCapability::RouteRefresh],
        vec![BgpCapabilityCode::RouteRefreshCapability]
    )]
    #[case(
        vec![
            BgpCapability::FourOctetAs(FourOctetAsCapability::new(200)),
            mp(AddressType::IPV6_UNICAST),
        ],
        vec![BgpCapabilityCode::MultiProtocolExtensions, BgpCapabilityCode::FourOctetAs]
    )]
    #[case(
        vec![
            BgpCapability::CiscoRouteRefresh,
            BgpCapability::Unrecognized(
                bgpwire_bgp_pkt::capabilities::UnrecognizedCapability::new(73, vec![]),
            ),
        ],
        vec![BgpCapabilityCode::CiscoRouteRefresh]
    )]
    fn test_negotiate(
        #[case] remote_caps: Vec<BgpCapability>,
        #[case] expected: Vec<BgpCapabilityCode>,
    ) {
        let config = CapabilityConfigBuilder::new()
            .graceful_restart(false)
            .build();
        let local = CapabilitySet::from_config(&config, 100);
        let remote = remote(remote_caps);
        let effective = CapabilitySet::negotiate(&local, &remote);
        assert_eq!(effective.codes().collect::<Vec<_>>(), expected);
        for code in effective.codes() {
            assert!(local.contains(code));
            assert!(remote.contains(code));
        }
        // Parameters are taken from the local side
        if let Some(caps) = effective.get(BgpCapabilityCode::MultiProtocolExtensions) {
            assert_eq!(caps, &vec![mp(AddressType::IPV4_UNICAST)]);
        }
        assert_eq!(
            effective.four_octet_as(),
            expected.contains(&BgpCapabilityCode::FourOctetAs)
        );
    }

    #[rstest]
    #[case(
        vec![BgpCapability::CiscoRouteRefresh, BgpCapability::RouteRefresh, mp(AddressType::IPV4_UNICAST)],
        AddressType::IPV4_UNICAST,
        Ok(BgpRouteRefreshMessage::new_cisco(AddressType::IPV4_UNICAST))
    )]
    #[case(
        vec![BgpCapability::RouteRefresh, mp(AddressType::IPV6_UNICAST)],
        AddressType::IPV6_UNICAST,
        Ok(BgpRouteRefreshMessage::new(AddressType::IPV6_UNICAST))
    )]
    #[case(
        vec![BgpCapability::EnhancedRouteRefresh, mp(AddressType::IPV4_UNICAST)],
        AddressType::IPV4_UNICAST,
        Err(RouteRefreshRefused::NotSupported)
    )]
    #[case(
        vec![BgpCapability::RouteRefresh, mp(AddressType::IPV4_UNICAST)],
        AddressType::IPV6_UNICAST,
        Err(RouteRefreshRefused::AddressTypeNotAdvertised(AddressType::IPV6_UNICAST))
    )]
    fn test_route_refresh_policy(
        #[case] remote_caps: Vec<BgpCapability>,
        #[case] address_type: AddressType,
        #[case] expected: Result<BgpRouteRefreshMessage, RouteRefreshRefused>,
    ) {
        assert_eq!(remote(remote_caps).route_refresh(address_type), expected);
    }
}
