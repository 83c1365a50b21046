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

//! Network management.

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::Network;
use crate::services::NETWORK;
use crate::{Error, Query, Session};

/// A query filter for network listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum NetworkFilter {
    /// Filter by network name.
    Name(String),
    /// Filter by network status.
    Status(String),
    /// Filter by the shared flag.
    Shared(bool),
}

/// A request to create a network.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NetworkCreate {
    /// Name of the new network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Administrative state (up or down).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    /// Whether to share the network between projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An update to a network.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NetworkUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New administrative state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NetworkRoot {
    network: Network,
}

#[derive(Debug, Serialize)]
struct NetworkCreateRoot<'a> {
    network: &'a NetworkCreate,
}

#[derive(Debug, Serialize)]
struct NetworkUpdateRoot<'a> {
    network: &'a NetworkUpdate,
}

/// List all networks, fetching every page.
pub async fn list(session: &Session, query: Query<NetworkFilter>) -> Result<Vec<Network>, Error> {
    let stream = list_paginated(session, query, None).await?;
    stream.try_collect().await
}

/// List networks page by page, following `next` links.
pub async fn list_paginated(
    session: &Session,
    query: Query<NetworkFilter>,
    limit: Option<usize>,
) -> Result<impl Stream<Item = Result<Network, Error>>, Error> {
    let builder = session.get(NETWORK, &["networks"]).await?.query(&query);
    Ok(builder.fetch_json_linked::<Network>(limit).await)
}

/// Get a network by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Network, Error> {
    let root: NetworkRoot = session
        .get(NETWORK, &["networks", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.network)
}

/// Create a network.
pub async fn create(session: &Session, request: NetworkCreate) -> Result<Network, Error> {
    let root: NetworkRoot = session
        .post(NETWORK, &["networks"])
        .await?
        .json(&NetworkCreateRoot { network: &request })
        .fetch_json()
        .await?;
    Ok(root.network)
}

/// Update a network.
pub async fn update(
    session: &Session,
    id: &str,
    request: NetworkUpdate,
) -> Result<Network, Error> {
    let root: NetworkRoot = session
        .put(NETWORK, &["networks", id])
        .await?
        .json(&NetworkUpdateRoot { network: &request })
        .fetch_json()
        .await?;
    Ok(root.network)
}

/// Delete a network.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(NETWORK, &["networks", id])
        .await?
        .send()
        .await?;
    Ok(())
}
