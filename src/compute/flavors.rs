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

//! Flavor management.

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::Deserialize;

use super::protocol::Flavor;
use crate::services::COMPUTE;
use crate::{Error, Query, Session};

/// A query filter for flavor listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum FlavorFilter {
    /// Only list flavors with at least this much disk (GiB).
    MinDisk(u64),
    /// Only list flavors with at least this much RAM (MiB).
    MinRam(u64),
    /// Filter by public visibility (admin only for non-public).
    IsPublic(bool),
}

#[derive(Debug, Deserialize)]
struct FlavorRoot {
    flavor: Flavor,
}

/// List all flavors with full details, fetching every page.
pub async fn list(session: &Session, query: Query<FlavorFilter>) -> Result<Vec<Flavor>, Error> {
    let stream = list_paginated(session, query, None, None).await?;
    stream.try_collect().await
}

/// List flavors page by page.
pub async fn list_paginated(
    session: &Session,
    query: Query<FlavorFilter>,
    limit: Option<usize>,
    starting_with: Option<String>,
) -> Result<impl Stream<Item = Result<Flavor, Error>>, Error> {
    let builder = session
        .get(COMPUTE, &["flavors", "detail"])
        .await?
        .query(&query);
    Ok(builder
        .fetch_json_paginated::<Flavor>(limit, starting_with)
        .await)
}

/// Get a flavor by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Flavor, Error> {
    let root: FlavorRoot = session
        .get(COMPUTE, &["flavors", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.flavor)
}
