// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON structures of the Networking API.

use std::net::IpAddr;

use oscloud_derive::PaginatedResource;
use serde::{Deserialize, Serialize};

use crate::protocol_enum;

protocol_enum! {
    #[doc = "Possible network statuses."]
    #[non_exhaustive]
    enum NetworkStatus = Unknown {
        Active = "ACTIVE",
        Down = "DOWN",
        Building = "BUILD",
        Error = "ERROR",
        Unknown = "UNKNOWN"
    }
}

protocol_enum! {
    #[doc = "IP protocol version of a subnet."]
    enum IpVersion: u8 {
        V4 = 4,
        V6 = 6
    }
}

/// A network.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Network {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Network name.
    #[serde(default)]
    pub name: String,
    /// Administrative state (up or down).
    #[serde(default)]
    pub admin_state_up: bool,
    /// Network status.
    #[serde(default)]
    pub status: NetworkStatus,
    /// IDs of the subnets of this network.
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Whether the network is shared between projects.
    #[serde(default)]
    pub shared: bool,
    /// MTU of the network.
    #[serde(default)]
    pub mtu: Option<u32>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A fixed IP address of a port.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FixedIp {
    /// IP address.
    pub ip_address: IpAddr,
    /// ID of the subnet the address belongs to.
    pub subnet_id: String,
}

/// A port.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Port {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Port name.
    #[serde(default)]
    pub name: String,
    /// ID of the network the port belongs to.
    pub network_id: String,
    /// MAC address of the port.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// Fixed IP addresses of the port.
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
    /// Port status.
    #[serde(default)]
    pub status: NetworkStatus,
    /// ID of the device (e.g. a server) using the port.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Type of the device using the port.
    #[serde(default)]
    pub device_owner: Option<String>,
    /// Administrative state (up or down).
    #[serde(default)]
    pub admin_state_up: bool,
}

/// An allocation pool of a subnet.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AllocationPool {
    /// First address of the pool.
    pub start: IpAddr,
    /// Last address of the pool.
    pub end: IpAddr,
}

/// A subnet.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Subnet {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Subnet name.
    #[serde(default)]
    pub name: String,
    /// ID of the network the subnet belongs to.
    pub network_id: String,
    /// CIDR of the subnet.
    pub cidr: String,
    /// IP protocol version.
    pub ip_version: IpVersion,
    /// Gateway address (if any).
    #[serde(default)]
    pub gateway_ip: Option<IpAddr>,
    /// Whether DHCP is enabled.
    #[serde(default)]
    pub enable_dhcp: bool,
    /// Allocation pools of the subnet.
    #[serde(default)]
    pub allocation_pools: Vec<AllocationPool>,
    /// DNS servers advertised via DHCP.
    #[serde(default)]
    pub dns_nameservers: Vec<IpAddr>,
}
