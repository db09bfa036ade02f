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

//! Peer configuration handed to a session when it starts.
//!
//! For duration config, unsigned numbers are used to represent values in
//! seconds. The wire carries the hold time in seconds as `u16` as well.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use bgpwire_bgp_pkt::iana::AddressType;

/// Well known BGP TCP port
pub const BGP_PORT: u16 = 179;

/// Default hold time proposed in the Open message
pub const DEFAULT_HOLD_TIME: u16 = 180;

/// RFC 4271 recommends the hold timer large value to be 4 minutes
pub const DEFAULT_HOLD_TIME_LARGE_VALUE: u16 = 240;

const fn default_hold_time() -> u16 {
    DEFAULT_HOLD_TIME
}

const fn default_hold_time_large_value() -> u16 {
    DEFAULT_HOLD_TIME_LARGE_VALUE
}

const fn default_true() -> bool {
    true
}

fn default_afi_safi() -> Vec<AddressType> {
    vec![AddressType::IPV4_UNICAST]
}

/// Immutable configuration of a single peer session
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PeerConfig {
    local_as: u32,
    remote_as: u32,
    remote_addr: SocketAddr,
    /// Source address for outgoing connections
    #[serde(default)]
    local_addr: Option<IpAddr>,
    /// When not set, the local IPv4 address of the connection is used
    #[serde(default)]
    bgp_id: Option<Ipv4Addr>,
    #[serde(default = "default_hold_time")]
    hold_time: u16,
    /// Hold time used while waiting for the peer's Open message
    #[serde(default = "default_hold_time_large_value")]
    hold_time_large_value: u16,
    /// Standalone sessions don't publish updates
    #[serde(default = "default_true")]
    standalone: bool,
    #[serde(default = "default_true")]
    write_keepalive: bool,
    #[serde(default)]
    capabilities: CapabilityConfig,
}

impl PeerConfig {
    pub const fn local_as(&self) -> u32 {
        self.local_as
    }

    pub const fn remote_as(&self) -> u32 {
        self.remote_as
    }

    pub const fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub const fn local_addr(&self) -> Option<IpAddr> {
        self.local_addr
    }

    pub const fn bgp_id(&self) -> Option<Ipv4Addr> {
        self.bgp_id
    }

    pub const fn hold_time(&self) -> u16 {
        self.hold_time
    }

    pub const fn hold_time_large_value(&self) -> u16 {
        self.hold_time_large_value
    }

    pub const fn standalone(&self) -> bool {
        self.standalone
    }

    pub const fn write_keepalive(&self) -> bool {
        self.write_keepalive
    }

    pub const fn capabilities(&self) -> &CapabilityConfig {
        &self.capabilities
    }
}

/// Capabilities advertised in the Open message sent to the peer
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CapabilityConfig {
    #[serde(default = "default_true")]
    four_bytes_as: bool,
    #[serde(default = "default_true")]
    route_refresh: bool,
    #[serde(default = "default_true")]
    cisco_route_refresh: bool,
    #[serde(default = "default_true")]
    enhanced_route_refresh: bool,
    #[serde(default = "default_true")]
    graceful_restart: bool,
    /// Advertised as receive only for every configured address family.
    /// Path identifiers are not decoded, so it's off by default.
    #[serde(default)]
    add_path: bool,
    #[serde(default = "default_afi_safi")]
    afi_safi: Vec<AddressType>,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            four_bytes_as: true,
            route_refresh: true,
            cisco_route_refresh: true,
            enhanced_route_refresh: true,
            graceful_restart: true,
            add_path: false,
            afi_safi: default_afi_safi(),
        }
    }
}

impl CapabilityConfig {
    pub const fn four_bytes_as(&self) -> bool {
        self.four_bytes_as
    }

    pub const fn route_refresh(&self) -> bool {
        self.route_refresh
    }

    pub const fn cisco_route_refresh(&self) -> bool {
        self.cisco_route_refresh
    }

    pub const fn enhanced_route_refresh(&self) -> bool {
        self.enhanced_route_refresh
    }

    pub const fn graceful_restart(&self) -> bool {
        self.graceful_restart
    }

    pub const fn add_path(&self) -> bool {
        self.add_path
    }

    pub const fn afi_safi(&self) -> &Vec<AddressType> {
        &self.afi_safi
    }
}

#[derive(Debug, Default)]
pub struct CapabilityConfigBuilder {
    config: CapabilityConfig,
}

impl CapabilityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn four_bytes_as(mut self, value: bool) -> Self {
        self.config.four_bytes_as = value;
        self
    }

    pub const fn route_refresh(mut self, value: bool) -> Self {
        self.config.route_refresh = value;
        self
    }

    pub const fn cisco_route_refresh(mut self, value: bool) -> Self {
        self.config.cisco_route_refresh = value;
        self
    }

    pub const fn enhanced_route_refresh(mut self, value: bool) -> Self {
        self.config.enhanced_route_refresh = value;
        self
    }

    pub const fn graceful_restart(mut self, value: bool) -> Self {
        self.config.graceful_restart = value;
        self
    }

    pub const fn add_path(mut self, value: bool) -> Self {
        self.config.add_path = value;
        self
    }

    pub fn afi_safi(mut self, value: Vec<AddressType>) -> Self {
        self.config.afi_safi = value;
        self
    }

    pub fn build(self) -> CapabilityConfig {
        self.config
    }
}

#[derive(Debug)]
pub struct PeerConfigBuilder {
    config: PeerConfig,
}

impl PeerConfigBuilder {
    pub fn new(local_as: u32, remote_as: u32, remote_addr: SocketAddr) -> Self {
        Self {
            config: PeerConfig {
                local_as,
                remote_as,
                remote_addr,
                local_addr: None,
                bgp_id: None,
                hold_time: DEFAULT_HOLD_TIME,
                hold_time_large_value: DEFAULT_HOLD_TIME_LARGE_VALUE,
                standalone: true,
                write_keepalive: true,
                capabilities: CapabilityConfig::default(),
            },
        }
    }

    pub const fn local_addr(mut self, value: IpAddr) -> Self {
        self.config.local_addr = Some(value);
        self
    }

    pub const fn bgp_id(mut self, value: Ipv4Addr) -> Self {
        self.config.bgp_id = Some(value);
        self
    }

    pub const fn hold_time(mut self, value: u16) -> Self {
        self.config.hold_time = value;
        self
    }

    pub const fn hold_time_large_value(mut self, value: u16) -> Self {
        self.config.hold_time_large_value = value;
        self
    }

    pub const fn standalone(mut self, value: bool) -> Self {
        self.config.standalone = value;
        self
    }

    pub const fn write_keepalive(mut self, value: bool) -> Self {
        self.config.write_keepalive = value;
        self
    }

    pub fn capabilities(mut self, value: CapabilityConfig) -> Self {
        self.config.capabilities = value;
        self
    }

    pub fn build(self) -> PeerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: PeerConfig = serde_json::from_str(
            r#"{"local_as": 100, "remote_as": 200, "remote_addr": "10.0.0.2:179"}"#,
        )
        .unwrap();
        let expected = PeerConfigBuilder::new(100, 200, "10.0.0.2:179".parse().unwrap()).build();
        assert_eq!(config, expected);
        assert_eq!(config.hold_time(), 180);
        assert_eq!(config.hold_time_large_value(), 240);
        assert!(config.standalone());
        assert!(config.write_keepalive());
        assert!(config.capabilities().four_bytes_as());
        assert!(config.capabilities().cisco_route_refresh());
        assert!(!config.capabilities().add_path());
        assert_eq!(
            config.capabilities().afi_safi(),
            &vec![AddressType::IPV4_UNICAST]
        );
    }

    #[test]
    fn test_deserialize_capabilities() {
        let config: PeerConfig = serde_json::from_str(
            r#"{
                "local_as": 100,
                "remote_as": 200,
                "remote_addr": "10.0.0.2:179",
                "bgp_id": "10.0.0.1",
                "hold_time": 90,
                "standalone": false,
                "capabilities": {
                    "graceful_restart": false,
                    "afi_safi": [{"afi": 1, "safi": 1}, {"afi": 2, "safi": 1}]
                }
            }"#,
        )
        .unwrap();
        let capabilities = CapabilityConfigBuilder::new()
            .graceful_restart(false)
            .afi_safi(vec![AddressType::IPV4_UNICAST, AddressType::IPV6_UNICAST])
            .build();
        let expected = PeerConfigBuilder::new(100, 200, "10.0.0.2:179".parse().unwrap())
            .bgp_id(Ipv4Addr::new(10, 0, 0, 1))
            .hold_time(90)
            .standalone(false)
            .capabilities(capabilities)
            .build();
        assert_eq!(config, expected);
    }
}
