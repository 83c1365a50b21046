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

//! JSON structures of the Compute API.

use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use oscloud_derive::PaginatedResource;
use serde::{Deserialize, Serialize};

use crate::common::{empty_as_default, Link, Ref};
use crate::protocol_enum;

protocol_enum! {
    #[doc = "Possible server statuses."]
    #[non_exhaustive]
    enum ServerStatus = Unknown {
        Active = "ACTIVE",
        Building = "BUILD",
        Deleted = "DELETED",
        Error = "ERROR",
        HardRebooting = "HARD_REBOOT",
        Migrating = "MIGRATING",
        Paused = "PAUSED",
        Rebooting = "REBOOT",
        Rebuilding = "REBUILD",
        Rescuing = "RESCUE",
        Resizing = "RESIZE",
        RevertingResize = "REVERT_RESIZE",
        Shelved = "SHELVED",
        ShelvedOffloaded = "SHELVED_OFFLOADED",
        ShutOff = "SHUTOFF",
        SoftDeleted = "SOFT_DELETED",
        Suspended = "SUSPENDED",
        Unknown = "UNKNOWN",
        VerifyingResize = "VERIFY_RESIZE"
    }
}

protocol_enum! {
    #[doc = "Power state of a server."]
    #[non_exhaustive]
    enum ServerPowerState: u8 = NoState {
        NoState = 0,
        Running = 1,
        Paused = 3,
        Shutdown = 4,
        Crashed = 6,
        Suspended = 7
    }
}

protocol_enum! {
    #[doc = "Type of a server address."]
    #[non_exhaustive]
    enum AddressType = Unknown {
        Fixed = "fixed",
        Floating = "floating",
        Unknown = ""
    }
}

/// An address of a server in one network.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerAddress {
    /// IP (v4 or v6) address.
    pub addr: IpAddr,
    /// Address type (fixed or floating).
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub addr_type: AddressType,
    /// MAC address (if reported).
    #[serde(rename = "OS-EXT-IPS-MAC:mac_addr", default)]
    pub mac_addr: Option<String>,
}

/// A server.
///
/// Most fields are optional since the Compute API returns a reduced variant of this structure
/// from mutating calls.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Server {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Server name.
    #[serde(default)]
    pub name: String,
    /// Server status.
    #[serde(default)]
    pub status: ServerStatus,
    /// Power state of the server.
    #[serde(rename = "OS-EXT-STS:power_state", default)]
    pub power_state: ServerPowerState,
    /// Flavor the server was created with.
    #[serde(default)]
    pub flavor: Option<Ref>,
    /// Image the server was created from.
    ///
    /// Empty for servers booted from a volume (the wire value is an empty string).
    #[serde(default, deserialize_with = "empty_as_default")]
    pub image: Option<Ref>,
    /// Addresses of the server, grouped by network name.
    #[serde(default)]
    pub addresses: HashMap<String, Vec<ServerAddress>>,
    /// Name of the key pair injected into the server.
    #[serde(default)]
    pub key_name: Option<String>,
    /// Availability zone of the server.
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
    /// Metadata key-value pairs.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Creation date and time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last update date and time.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// ID of the project owning the server.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// ID of the user owning the server.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Links to the server itself.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A flavor.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Flavor {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Flavor name.
    pub name: String,
    /// RAM size in MiB.
    #[serde(default)]
    pub ram: u64,
    /// Number of virtual CPUs.
    #[serde(default)]
    pub vcpus: u32,
    /// Root disk size in GiB.
    #[serde(default)]
    pub disk: u64,
    /// Ephemeral disk size in GiB.
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral", default)]
    pub ephemeral: u64,
    /// Whether the flavor is public.
    #[serde(rename = "os-flavor-access:is_public", default = "default_true")]
    pub is_public: bool,
    /// Links to the flavor itself.
    #[serde(default)]
    pub links: Vec<Link>,
}

fn default_true() -> bool {
    true
}

/// A key pair.
#[derive(Clone, Debug, Deserialize)]
pub struct KeyPair {
    /// Key pair name (unique per user).
    pub name: String,
    /// Public key in the OpenSSH format.
    pub public_key: String,
    /// Fingerprint of the public key.
    #[serde(default)]
    pub fingerprint: Option<String>,
}

/// A network to attach a new server to.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum ServerNetwork {
    /// Create a port on the given network.
    Network {
        /// ID of the network.
        uuid: String,
    },
    /// Use the given pre-existing port.
    Port {
        /// ID of the port.
        port: String,
    },
}
