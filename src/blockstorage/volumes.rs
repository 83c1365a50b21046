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

//! Volume management.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::{Volume, VolumeStatus};
use crate::services::BLOCK_STORAGE;
use crate::{waiter, Error, ErrorKind, Query, Session};

/// A query filter for volume listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum VolumeFilter {
    /// Filter by volume name.
    Name(String),
    /// Filter by volume status.
    Status(String),
    /// List volumes of all projects (admin only).
    AllTenants(bool),
}

/// A request to create a volume.
#[derive(Clone, Debug, Serialize)]
pub struct VolumeCreate {
    /// Size of the new volume in GiB.
    pub size: u64,
    /// Name of the new volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Volume type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    /// Snapshot to create the volume from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    /// Volume to clone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_volid: Option<String>,
    /// Availability zone to create the volume in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    /// Metadata key-value pairs.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl VolumeCreate {
    /// Create a request with only the required fields set.
    pub fn new(size: u64) -> VolumeCreate {
        VolumeCreate {
            size,
            name: None,
            description: None,
            volume_type: None,
            snapshot_id: None,
            source_volid: None,
            availability_zone: None,
            metadata: HashMap::new(),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.size == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Volume size must be positive",
            ));
        }
        Ok(())
    }
}

/// An update to a volume.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VolumeUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VolumeRoot {
    volume: Volume,
}

#[derive(Debug, Serialize)]
struct VolumeCreateRoot<'a> {
    volume: &'a VolumeCreate,
}

#[derive(Debug, Serialize)]
struct VolumeUpdateRoot<'a> {
    volume: &'a VolumeUpdate,
}

/// List all volumes, fetching every page.
pub async fn list(session: &Session, query: Query<VolumeFilter>) -> Result<Vec<Volume>, Error> {
    let stream = list_paginated(session, query, None, None).await?;
    stream.try_collect().await
}

/// List volumes page by page.
pub async fn list_paginated(
    session: &Session,
    query: Query<VolumeFilter>,
    limit: Option<usize>,
    starting_with: Option<String>,
) -> Result<impl Stream<Item = Result<Volume, Error>>, Error> {
    let builder = session
        .get(BLOCK_STORAGE, &["volumes", "detail"])
        .await?
        .query(&query);
    Ok(builder
        .fetch_json_paginated::<Volume>(limit, starting_with)
        .await)
}

/// Get a volume by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Volume, Error> {
    let root: VolumeRoot = session
        .get(BLOCK_STORAGE, &["volumes", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.volume)
}

/// Create a volume.
///
/// Volume creation is asynchronous on the cloud side; use
/// [wait_for_status](fn.wait_for_status.html) to wait for the volume to become available.
pub async fn create(session: &Session, request: VolumeCreate) -> Result<Volume, Error> {
    request.validate()?;
    let root: VolumeRoot = session
        .post(BLOCK_STORAGE, &["volumes"])
        .await?
        .json(&VolumeCreateRoot { volume: &request })
        .fetch_json()
        .await?;
    Ok(root.volume)
}

/// Update a volume.
pub async fn update(session: &Session, id: &str, request: VolumeUpdate) -> Result<Volume, Error> {
    let root: VolumeRoot = session
        .put(BLOCK_STORAGE, &["volumes", id])
        .await?
        .json(&VolumeUpdateRoot { volume: &request })
        .fetch_json()
        .await?;
    Ok(root.volume)
}

/// Delete a volume.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(BLOCK_STORAGE, &["volumes", id])
        .await?
        .send()
        .await?;
    Ok(())
}

/// Wait for a volume to reach the given status.
///
/// A volume in an error state fails the waiting with `OperationFailed`; exceeding the timeout
/// yields `OperationTimedOut`.
pub async fn wait_for_status(
    session: &Session,
    id: &str,
    target: VolumeStatus,
    interval: Duration,
    timeout: Option<Duration>,
) -> Result<(), Error> {
    waiter::wait_for(
        || async move {
            let volume = get(session, id).await?;
            if volume.status == target {
                Ok(true)
            } else if matches!(
                volume.status,
                VolumeStatus::Error | VolumeStatus::ErrorDeleting
            ) {
                Err(Error::new(
                    ErrorKind::OperationFailed,
                    format!("Volume {} has gone into the {} state", id, volume.status),
                ))
            } else {
                Ok(false)
            }
        },
        interval,
        timeout,
    )
    .await
}

#[cfg(test)]
mod test {
    use super::{VolumeCreate, VolumeFilter};
    use crate::common::test::compare;
    use crate::{ErrorKind, Query};

    #[test]
    fn test_create_zero_size() {
        let request = VolumeCreate::new(0);
        assert_eq!(
            request.validate().err().unwrap().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_create_body() {
        let mut request = VolumeCreate::new(10);
        request.name = Some("test-volume".into());
        request.volume_type = Some("lvmdriver-1".into());
        request.validate().unwrap();
        compare(
            r#"{"size": 10, "name": "test-volume", "volume_type": "lvmdriver-1"}"#,
            request,
        );
    }

    #[test]
    fn test_filter_query() {
        let query = Query::default()
            .with(VolumeFilter::Status("available".into()))
            .with(VolumeFilter::AllTenants(true));
        let query_string = serde_urlencoded::to_string(query).unwrap();
        assert_eq!(&query_string, "status=available&all_tenants=true");
    }
}
