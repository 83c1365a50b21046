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

//! JSON structures of the Block Storage API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use oscloud_derive::PaginatedResource;
use serde::Deserialize;

use crate::protocol_enum;

protocol_enum! {
    #[doc = "Possible volume statuses."]
    #[non_exhaustive]
    enum VolumeStatus = Unknown {
        Creating = "creating",
        Available = "available",
        Reserved = "reserved",
        Attaching = "attaching",
        Detaching = "detaching",
        InUse = "in-use",
        Maintenance = "maintenance",
        Deleting = "deleting",
        AwaitingTransfer = "awaiting-transfer",
        Error = "error",
        ErrorDeleting = "error_deleting",
        BackingUp = "backing-up",
        RestoringBackup = "restoring-backup",
        Downloading = "downloading",
        Uploading = "uploading",
        Retyping = "retyping",
        Extending = "extending",
        Unknown = "unknown"
    }
}

protocol_enum! {
    #[doc = "Possible snapshot statuses."]
    #[non_exhaustive]
    enum SnapshotStatus = Unknown {
        Creating = "creating",
        Available = "available",
        BackingUp = "backing-up",
        Deleting = "deleting",
        Error = "error",
        ErrorDeleting = "error_deleting",
        Deleted = "deleted",
        Unmanaging = "unmanaging",
        Restoring = "restoring",
        Unknown = "unknown"
    }
}

/// An attachment of a volume to a server.
#[derive(Clone, Debug, Deserialize)]
pub struct VolumeAttachment {
    /// ID of the attachment itself.
    #[serde(default)]
    pub attachment_id: Option<String>,
    /// ID of the server the volume is attached to.
    pub server_id: String,
    /// Device name on the server (e.g. `/dev/vdb`).
    #[serde(default)]
    pub device: Option<String>,
}

/// A volume.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Volume {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Volume name.
    #[serde(default)]
    pub name: Option<String>,
    /// Volume status.
    #[serde(default)]
    pub status: VolumeStatus,
    /// Size in GiB.
    #[serde(default)]
    pub size: u64,
    /// Volume type.
    #[serde(default)]
    pub volume_type: Option<String>,
    /// Availability zone of the volume.
    #[serde(default)]
    pub availability_zone: Option<String>,
    /// Whether the volume can be used to boot a server.
    ///
    /// The wire value is a string, not a boolean.
    #[serde(default)]
    pub bootable: Option<String>,
    /// Attachments of the volume.
    #[serde(default)]
    pub attachments: Vec<VolumeAttachment>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Metadata key-value pairs.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// ID of the snapshot the volume was created from.
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// ID of the volume this volume was cloned from.
    #[serde(default)]
    pub source_volid: Option<String>,
    /// Creation date and time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Volume {
    /// Whether the volume can be used to boot a server.
    #[inline]
    pub fn is_bootable(&self) -> bool {
        matches!(self.bootable.as_deref(), Some("true"))
    }
}

/// A snapshot of a volume.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Snapshot {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Snapshot name.
    #[serde(default)]
    pub name: Option<String>,
    /// ID of the volume the snapshot was taken from.
    pub volume_id: String,
    /// Snapshot status.
    #[serde(default)]
    pub status: SnapshotStatus,
    /// Size of the source volume in GiB.
    #[serde(default)]
    pub size: u64,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation date and time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
