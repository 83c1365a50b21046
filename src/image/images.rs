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

//! Image management.

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::Serialize;

use super::protocol::Image;
use crate::services::IMAGE;
use crate::{Error, ErrorKind, Query, Session};

/// A query filter for image listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum ImageFilter {
    /// Filter by image name.
    Name(String),
    /// Filter by image status.
    Status(String),
    /// Filter by visibility.
    Visibility(String),
    /// Filter by a tag.
    Tag(String),
}

/// A request to create an image.
///
/// Creating an image only registers its metadata; the image data is uploaded separately.
#[derive(Clone, Debug, Serialize)]
pub struct ImageCreate {
    /// Name of the new image.
    pub name: String,
    /// Container format (e.g. `bare`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_format: Option<String>,
    /// Disk format (e.g. `qcow2`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_format: Option<String>,
    /// Minimum required disk size in GiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_disk: Option<u64>,
    /// Minimum required RAM in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ram: Option<u64>,
    /// Image tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ImageCreate {
    /// Create a request with only the required fields set.
    pub fn new<S: Into<String>>(name: S) -> ImageCreate {
        ImageCreate {
            name: name.into(),
            container_format: None,
            disk_format: None,
            min_disk: None,
            min_ram: None,
            tags: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput, "Image name is required"));
        }
        Ok(())
    }
}

/// List all images, fetching every page.
pub async fn list(session: &Session, query: Query<ImageFilter>) -> Result<Vec<Image>, Error> {
    let stream = list_paginated(session, query, None, None).await?;
    stream.try_collect().await
}

/// List images page by page.
pub async fn list_paginated(
    session: &Session,
    query: Query<ImageFilter>,
    limit: Option<usize>,
    starting_with: Option<String>,
) -> Result<impl Stream<Item = Result<Image, Error>>, Error> {
    let builder = session.get(IMAGE, &["images"]).await?.query(&query);
    Ok(builder
        .fetch_json_paginated::<Image>(limit, starting_with)
        .await)
}

/// Get an image by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Image, Error> {
    // The Image API returns the resource without a wrapping object.
    session
        .get(IMAGE, &["images", id])
        .await?
        .fetch_json()
        .await
}

/// Create an image.
pub async fn create(session: &Session, request: ImageCreate) -> Result<Image, Error> {
    request.validate()?;
    session
        .post(IMAGE, &["images"])
        .await?
        .json(&request)
        .fetch_json()
        .await
}

/// Delete an image.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(IMAGE, &["images", id])
        .await?
        .send()
        .await?;
    Ok(())
}
