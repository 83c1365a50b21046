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

//! A stream of resources.

use std::fmt::Debug;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::pin_mut;
use futures::stream::{Stream, TryStreamExt};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Error;

/// A single resource.
///
/// This trait can normally be derived. You need to add a `#[resource_id]` attribute to the field
/// that serves as a pagination marker. You may also need to add a
/// `#[collection_name = "resources"]` attribute to the structure with a name of the field that
/// is returned in the collection (e.g. "servers" for Compute servers).
pub trait PaginatedResource {
    /// Type of an ID.
    type Id: Debug + Serialize + Send;

    /// Root type of the listing.
    type Root: DeserializeOwned + Send;

    /// Retrieve a copy of the ID.
    fn resource_id(&self) -> Self::Id;
}

/// A listing root that carries a link to the next page.
///
/// Implemented by listing roots of services that paginate with `next` links (e.g. Image and
/// Networking) rather than expecting the client to pass a marker. Normally generated as part
/// of deriving `PaginatedResource`.
pub trait PaginatedCollection {
    /// Link to the next page, if any.
    fn next_link(&self) -> Option<&Url>;
}

#[async_trait]
pub(crate) trait FetchNext {
    async fn fetch_next<Q: Serialize + Send + Sync, T: DeserializeOwned + Send>(
        &self,
        query: Q,
    ) -> Result<T, Error>;

    async fn fetch_url<T: DeserializeOwned + Send>(&self, url: Url) -> Result<T, Error>;
}

#[derive(Serialize)]
struct Query<T: Serialize + Send> {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<T>,
}

fn chunks<F, T>(
    builder: F,
    limit: Option<usize>,
    starting_with: Option<T::Id>,
) -> impl Stream<Item = Result<Vec<T>, Error>>
where
    F: FetchNext,
    T: PaginatedResource + Unpin,
    T::Id: Sync,
    T::Root: Into<Vec<T>>,
{
    let mut marker = starting_with;

    try_stream! {
        loop {
            let result: T::Root = builder
                .fetch_next(Query { limit, marker: marker.take() })
                .await?;
            let items = result.into();
            if let Some(last) = items.last() {
                marker = Some(last.resource_id());
                yield items;
            } else {
                break
            }
        }
    }
}

fn linked_chunks<F, T>(
    builder: F,
    limit: Option<usize>,
) -> impl Stream<Item = Result<Vec<T>, Error>>
where
    F: FetchNext,
    T: PaginatedResource + Unpin,
    T::Id: Sync,
    T::Root: PaginatedCollection + Into<Vec<T>>,
{
    try_stream! {
        let mut next = None;
        loop {
            let result: T::Root = match next.take() {
                Some(url) => builder.fetch_url(url).await?,
                None => {
                    builder
                        .fetch_next(Query { limit, marker: None::<T::Id> })
                        .await?
                }
            };
            next = result.next_link().cloned();
            let items = result.into();
            // An empty page stops the iteration even if a next link is present.
            if items.is_empty() {
                break
            }
            yield items;
            if next.is_none() {
                break
            }
        }
    }
}

/// Creates a paginated resource stream.
///
/// # Panics
///
/// Will panic during iteration if the request builder has a streaming body.
pub(crate) fn paginated<F, T>(
    builder: F,
    limit: Option<usize>,
    starting_with: Option<T::Id>,
) -> impl Stream<Item = Result<T, Error>>
where
    F: FetchNext,
    T: PaginatedResource + Unpin,
    T::Id: Sync,
    T::Root: Into<Vec<T>>,
{
    try_stream! {
        let iter = chunks(builder, limit, starting_with);
        pin_mut!(iter);
        while let Some(chunk) = iter.try_next().await? {
            for item in chunk {
                yield item;
            }
        }
    }
}

/// Creates a resource stream following `next` links.
///
/// # Panics
///
/// Will panic during iteration if the request builder has a streaming body.
pub(crate) fn linked<F, T>(builder: F, limit: Option<usize>) -> impl Stream<Item = Result<T, Error>>
where
    F: FetchNext,
    T: PaginatedResource + Unpin,
    T::Id: Sync,
    T::Root: PaginatedCollection + Into<Vec<T>>,
{
    try_stream! {
        let iter = linked_chunks(builder, limit);
        pin_mut!(iter);
        while let Some(chunk) = iter.try_next().await? {
            for item in chunk {
                yield item;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::pin_mut;
    use futures::stream::TryStreamExt;
    use reqwest::Url;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::super::{Error, ErrorKind};
    use super::{linked, paginated, FetchNext, PaginatedCollection, PaginatedResource};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ship {
        id: u32,
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct ShipsRoot {
        ships: Vec<Ship>,
        #[serde(default)]
        next: Option<Url>,
    }

    impl PaginatedResource for Ship {
        type Id = u32;
        type Root = ShipsRoot;
        fn resource_id(&self) -> u32 {
            self.id
        }
    }

    impl From<ShipsRoot> for Vec<Ship> {
        fn from(value: ShipsRoot) -> Vec<Ship> {
            value.ships
        }
    }

    impl PaginatedCollection for ShipsRoot {
        fn next_link(&self) -> Option<&Url> {
            self.next.as_ref()
        }
    }

    // Replays prepared pages, recording the markers and URLs it was asked for.
    struct Pages {
        pages: Mutex<Vec<serde_json::Value>>,
        markers: Mutex<Vec<Option<u32>>>,
        urls: Mutex<Vec<Url>>,
    }

    impl Pages {
        fn new(pages: Vec<serde_json::Value>) -> Pages {
            let mut pages = pages;
            pages.reverse();
            Pages {
                pages: Mutex::new(pages),
                markers: Mutex::new(Vec::new()),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn next_page<T: DeserializeOwned>(&self) -> Result<T, Error> {
            let page = self
                .pages
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::new(ErrorKind::ResourceNotFound, "no more pages"))?;
            serde_json::from_value(page).map_err(Error::from)
        }
    }

    #[derive(Deserialize)]
    struct RecordedQuery {
        marker: Option<u32>,
    }

    #[async_trait]
    impl FetchNext for &Pages {
        async fn fetch_next<Q: Serialize + Send + Sync, T: DeserializeOwned + Send>(
            &self,
            query: Q,
        ) -> Result<T, Error> {
            let query: RecordedQuery =
                serde_json::from_value(serde_json::to_value(query).unwrap()).unwrap();
            self.markers.lock().unwrap().push(query.marker);
            self.next_page()
        }

        async fn fetch_url<T: DeserializeOwned + Send>(&self, url: Url) -> Result<T, Error> {
            self.urls.lock().unwrap().push(url);
            self.next_page()
        }
    }

    #[tokio::test]
    async fn test_paginated_markers() {
        let pages = Pages::new(vec![
            json!({"ships": [{"id": 1, "name": "one"}, {"id": 2, "name": "two"}]}),
            json!({"ships": [{"id": 3, "name": "three"}]}),
            json!({"ships": []}),
        ]);

        let stream = paginated::<_, Ship>(&pages, None, None);
        pin_mut!(stream);
        let mut names = Vec::new();
        while let Some(ship) = stream.try_next().await.unwrap() {
            names.push(ship.name);
        }

        assert_eq!(names, vec!["one", "two", "three"]);
        assert_eq!(*pages.markers.lock().unwrap(), vec![None, Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_paginated_starting_with() {
        let pages = Pages::new(vec![json!({"ships": []})]);

        let stream = paginated::<_, Ship>(&pages, Some(10), Some(42));
        pin_mut!(stream);
        assert!(stream.try_next().await.unwrap().is_none());
        assert_eq!(*pages.markers.lock().unwrap(), vec![Some(42)]);
    }

    #[tokio::test]
    async fn test_linked_pages() {
        let pages = Pages::new(vec![
            json!({
                "ships": [{"id": 1, "name": "one"}],
                "next": "https://cloud.local/v2/ships?marker=1"
            }),
            json!({"ships": [{"id": 2, "name": "two"}]}),
        ]);

        let stream = linked::<_, Ship>(&pages, None);
        pin_mut!(stream);
        let mut ids = Vec::new();
        while let Some(ship) = stream.try_next().await.unwrap() {
            ids.push(ship.id);
        }

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(*pages.markers.lock().unwrap(), vec![None]);
        assert_eq!(
            *pages.urls.lock().unwrap(),
            vec![Url::parse("https://cloud.local/v2/ships?marker=1").unwrap()]
        );
    }

    #[tokio::test]
    async fn test_linked_empty_page_stops() {
        let pages = Pages::new(vec![json!({
            "ships": [],
            "next": "https://cloud.local/v2/ships?marker=1"
        })]);

        let stream = linked::<_, Ship>(&pages, None);
        pin_mut!(stream);
        assert!(stream.try_next().await.unwrap().is_none());
        assert!(pages.urls.lock().unwrap().is_empty());
    }
}
