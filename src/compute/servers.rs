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

//! Server management.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::{Server, ServerNetwork, ServerStatus};
use crate::services::COMPUTE;
use crate::{waiter, Error, ErrorKind, Query, Session};

/// A query filter for server listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum ServerFilter {
    /// Filter by server name (regular expression matching).
    Name(String),
    /// Filter by server status.
    Status(String),
    /// Filter by flavor ID.
    #[query_item = "flavor"]
    FlavorId(String),
    /// Filter by image ID.
    #[query_item = "image"]
    ImageId(String),
    /// Filter by availability zone.
    AvailabilityZone(String),
    /// List servers of all projects (admin only).
    AllTenants(bool),
}

/// A request to create a server.
#[derive(Clone, Debug, Serialize)]
pub struct ServerCreate {
    /// Name of the new server.
    pub name: String,
    /// Flavor to use.
    #[serde(rename = "flavorRef")]
    pub flavor_ref: String,
    /// Image to boot from.
    #[serde(rename = "imageRef")]
    pub image_ref: String,
    /// Key pair to inject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Networks to attach the server to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<ServerNetwork>,
    /// Metadata key-value pairs.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    /// Availability zone to create the server in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    /// Configuration data passed to the server on boot (base64-encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl ServerCreate {
    /// Create a request with only the required fields set.
    pub fn new<S1, S2, S3>(name: S1, flavor_ref: S2, image_ref: S3) -> ServerCreate
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ServerCreate {
            name: name.into(),
            flavor_ref: flavor_ref.into(),
            image_ref: image_ref.into(),
            key_name: None,
            networks: Vec::new(),
            metadata: HashMap::new(),
            availability_zone: None,
            user_data: None,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Server name is required",
            ));
        }
        if self.flavor_ref.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Server flavor is required",
            ));
        }
        if self.image_ref.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Server image is required",
            ));
        }
        Ok(())
    }
}

/// An update to a server.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServerUpdate {
    /// New name of the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerRoot {
    server: Server,
}

#[derive(Debug, Serialize)]
struct ServerCreateRoot<'a> {
    server: &'a ServerCreate,
}

#[derive(Debug, Serialize)]
struct ServerUpdateRoot<'a> {
    server: &'a ServerUpdate,
}

/// List all servers, fetching every page.
pub async fn list(session: &Session, query: Query<ServerFilter>) -> Result<Vec<Server>, Error> {
    let stream = list_paginated(session, query, None, None).await?;
    stream.try_collect().await
}

/// List servers page by page.
///
/// The returned stream issues a new request whenever the current page is exhausted.
pub async fn list_paginated(
    session: &Session,
    query: Query<ServerFilter>,
    limit: Option<usize>,
    starting_with: Option<String>,
) -> Result<impl Stream<Item = Result<Server, Error>>, Error> {
    let builder = session
        .get(COMPUTE, &["servers", "detail"])
        .await?
        .query(&query);
    Ok(builder
        .fetch_json_paginated::<Server>(limit, starting_with)
        .await)
}

/// Get a server by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Server, Error> {
    let root: ServerRoot = session
        .get(COMPUTE, &["servers", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.server)
}

/// Create a server.
///
/// Server creation is asynchronous on the cloud side; use [wait_for_status](fn.wait_for_status.html)
/// to wait for the server to become active.
pub async fn create(session: &Session, request: ServerCreate) -> Result<Server, Error> {
    request.validate()?;
    let root: ServerRoot = session
        .post(COMPUTE, &["servers"])
        .await?
        .json(&ServerCreateRoot { server: &request })
        .fetch_json()
        .await?;
    Ok(root.server)
}

/// Update a server.
pub async fn update(session: &Session, id: &str, request: ServerUpdate) -> Result<Server, Error> {
    let root: ServerRoot = session
        .put(COMPUTE, &["servers", id])
        .await?
        .json(&ServerUpdateRoot { server: &request })
        .fetch_json()
        .await?;
    Ok(root.server)
}

/// Delete a server.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(COMPUTE, &["servers", id])
        .await?
        .send()
        .await?;
    Ok(())
}

/// Wait for a server to reach the given status.
///
/// Polls the server at the given interval. A server in the `ERROR` state fails the waiting
/// with `OperationFailed`; exceeding the timeout yields `OperationTimedOut`.
pub async fn wait_for_status(
    session: &Session,
    id: &str,
    target: ServerStatus,
    interval: Duration,
    timeout: Option<Duration>,
) -> Result<(), Error> {
    waiter::wait_for(
        || async move {
            let server = get(session, id).await?;
            if server.status == target {
                Ok(true)
            } else if server.status == ServerStatus::Error {
                Err(Error::new(
                    ErrorKind::OperationFailed,
                    format!("Server {} has gone into the ERROR state", id),
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
