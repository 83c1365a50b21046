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

//! Snapshot management.

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::Snapshot;
use crate::services::BLOCK_STORAGE;
use crate::{Error, ErrorKind, Query, Session};

/// A query filter for snapshot listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum SnapshotFilter {
    /// Filter by snapshot name.
    Name(String),
    /// Filter by snapshot status.
    Status(String),
    /// Filter by the source volume.
    VolumeId(String),
}

/// A request to create a snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct SnapshotCreate {
    /// ID of the volume to snapshot.
    pub volume_id: String,
    /// Name of the new snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether to snapshot a volume even when it is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl SnapshotCreate {
    /// Create a request with only the required fields set.
    pub fn new<S: Into<String>>(volume_id: S) -> SnapshotCreate {
        SnapshotCreate {
            volume_id: volume_id.into(),
            name: None,
            description: None,
            force: None,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.volume_id.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Snapshot volume ID is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRoot {
    snapshot: Snapshot,
}

#[derive(Debug, Serialize)]
struct SnapshotCreateRoot<'a> {
    snapshot: &'a SnapshotCreate,
}

/// List all snapshots, fetching every page.
pub async fn list(session: &Session, query: Query<SnapshotFilter>) -> Result<Vec<Snapshot>, Error> {
    let stream = list_paginated(session, query, None, None).await?;
    stream.try_collect().await
}

/// List snapshots page by page.
pub async fn list_paginated(
    session: &Session,
    query: Query<SnapshotFilter>,
    limit: Option<usize>,
    starting_with: Option<String>,
) -> Result<impl Stream<Item = Result<Snapshot, Error>>, Error> {
    let builder = session
        .get(BLOCK_STORAGE, &["snapshots", "detail"])
        .await?
        .query(&query);
    Ok(builder
        .fetch_json_paginated::<Snapshot>(limit, starting_with)
        .await)
}

/// Get a snapshot by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Snapshot, Error> {
    let root: SnapshotRoot = session
        .get(BLOCK_STORAGE, &["snapshots", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.snapshot)
}

/// Create a snapshot.
pub async fn create(session: &Session, request: SnapshotCreate) -> Result<Snapshot, Error> {
    request.validate()?;
    let root: SnapshotRoot = session
        .post(BLOCK_STORAGE, &["snapshots"])
        .await?
        .json(&SnapshotCreateRoot { snapshot: &request })
        .fetch_json()
        .await?;
    Ok(root.snapshot)
}

/// Delete a snapshot.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(BLOCK_STORAGE, &["snapshots", id])
        .await?
        .send()
        .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{SnapshotCreate, SnapshotFilter};
    use crate::common::test::compare;
    use crate::{ErrorKind, Query};

    #[test]
    fn test_create_missing_volume() {
        let request = SnapshotCreate::new("");
        assert_eq!(
            request.validate().err().unwrap().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_create_body() {
        let mut request = SnapshotCreate::new("5aa119a8");
        request.name = Some("snap-001".into());
        request.force = Some(true);
        request.validate().unwrap();
        compare(
            r#"{"volume_id": "5aa119a8", "name": "snap-001", "force": true}"#,
            request,
        );
    }

    #[test]
    fn test_filter_query() {
        let query = Query::default()
            .with(SnapshotFilter::VolumeId("5aa119a8".into()))
            .with(SnapshotFilter::Status("available".into()));
        let query_string = serde_urlencoded::to_string(query).unwrap();
        assert_eq!(&query_string, "volume_id=5aa119a8&status=available");
    }
}
