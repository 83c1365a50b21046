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

//! JSON structures of the Image API.

use chrono::{DateTime, Utc};
use oscloud_derive::PaginatedResource;
use serde::Deserialize;

use crate::protocol_enum;

protocol_enum! {
    #[doc = "Possible image statuses."]
    #[non_exhaustive]
    enum ImageStatus = Unknown {
        Queued = "queued",
        Saving = "saving",
        Active = "active",
        Killed = "killed",
        Deleted = "deleted",
        PendingDelete = "pending_delete",
        Deactivated = "deactivated",
        Importing = "importing",
        Unknown = "unknown"
    }
}

protocol_enum! {
    #[doc = "Visibility of an image."]
    #[non_exhaustive]
    enum ImageVisibility = Shared {
        Public = "public",
        Private = "private",
        Shared = "shared",
        Community = "community"
    }
}

/// An image.
///
/// Unlike other services, the Image API returns resources without a wrapping object.
#[derive(Clone, Debug, Deserialize, PaginatedResource)]
pub struct Image {
    /// Unique ID.
    #[resource_id]
    pub id: String,
    /// Image name.
    #[serde(default)]
    pub name: Option<String>,
    /// Image status.
    #[serde(default)]
    pub status: ImageStatus,
    /// Image visibility.
    #[serde(default)]
    pub visibility: ImageVisibility,
    /// Container format (e.g. `bare`).
    #[serde(default)]
    pub container_format: Option<String>,
    /// Disk format (e.g. `qcow2`).
    #[serde(default)]
    pub disk_format: Option<String>,
    /// Size of the image data in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Checksum of the image data.
    #[serde(default)]
    pub checksum: Option<String>,
    /// Minimum required disk size in GiB.
    #[serde(default)]
    pub min_disk: u64,
    /// Minimum required RAM in MiB.
    #[serde(default)]
    pub min_ram: u64,
    /// Whether the image is protected from deletion.
    #[serde(default)]
    pub protected: bool,
    /// Image tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation date and time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update date and time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::{Image, ImageStatus, ImageVisibility};

    const IMAGE_FIXTURE: &str = r#"{
        "id": "1bea47ed-f6a9-463b-b423-14b9cca9ad27",
        "name": "cirros-0.3.2-x86_64-disk",
        "status": "active",
        "visibility": "public",
        "container_format": "bare",
        "disk_format": "qcow2",
        "size": 13167616,
        "checksum": "64d7c1cd2b6f60c92c14662941cb7913",
        "min_disk": 0,
        "min_ram": 0,
        "protected": false,
        "tags": ["tested"],
        "created_at": "2014-05-05T17:15:10Z",
        "updated_at": "2014-05-05T17:15:11Z",
        "self": "/v2/images/1bea47ed-f6a9-463b-b423-14b9cca9ad27",
        "file": "/v2/images/1bea47ed-f6a9-463b-b423-14b9cca9ad27/file",
        "schema": "/v2/schemas/image"
    }"#;

    #[test]
    fn test_image_parse() {
        let image: Image = serde_json::from_str(IMAGE_FIXTURE).unwrap();
        assert_eq!(image.name.unwrap(), "cirros-0.3.2-x86_64-disk");
        assert_eq!(image.status, ImageStatus::Active);
        assert_eq!(image.visibility, ImageVisibility::Public);
        assert_eq!(image.size, Some(13167616));
        assert_eq!(image.disk_format.unwrap(), "qcow2");
        assert_eq!(image.tags, vec!["tested"]);
        assert!(!image.protected);
    }
}
