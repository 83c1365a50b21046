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

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use serde::ser::{Error as SerError, SerializeSeq};
use serde::{Serialize, Serializer};

/// An item in a query.
pub trait QueryItem {
    /// Represent the item for serialization into a query.
    ///
    /// The first item of the resulting tuple is a key, the second - its value.
    fn query_item(&self) -> Result<(&str, Cow<str>), crate::Error>;
}

/// A helper for queries.
///
/// The type `T` must implement [QueryItem](trait.QueryItem.html).
///
/// ```rust
/// use std::borrow::Cow;
/// use oscloud::{Error, Query, QueryItem};
///
/// #[derive(Debug)]
/// enum ServerFilter {
///     Name(String),
///     AllTenants(bool),
///     Limit(usize),
/// }
///
/// impl QueryItem for ServerFilter {
///     fn query_item(&self) -> Result<(&str, Cow<str>), Error> {
///         Ok(match self {
///             ServerFilter::Name(s) => ("name", Cow::Borrowed(s)),
///             ServerFilter::AllTenants(b) => ("all_tenants", Cow::Owned(b.to_string())),
///             ServerFilter::Limit(l) => ("limit", Cow::Owned(l.to_string())),
///         })
///     }
/// }
///
/// let mut query = Query::default();
/// query.push(ServerFilter::AllTenants(true));
/// query.push(ServerFilter::Name("web1".into()));
/// query.push(ServerFilter::Limit(42));
/// let query_string = serde_urlencoded::to_string(query).expect("invalid query");
/// assert_eq!(&query_string, "all_tenants=true&name=web1&limit=42");
/// ```
///
/// It's usually better to derive `QueryItem` implementations:
///
/// ```rust
/// use oscloud::{Error, Query, QueryItem};
///
/// #[derive(Debug, QueryItem)]
/// enum ServerFilter {
///     Name(String),
///     AllTenants(bool),
///     #[query_item = "limit"]
///     WithLimit(usize),
/// }
///
/// let mut query = Query::default();
/// query.push(ServerFilter::AllTenants(true));
/// query.push(ServerFilter::Name("web1".into()));
/// query.push(ServerFilter::WithLimit(42));
/// let query_string = serde_urlencoded::to_string(query).expect("invalid query");
/// assert_eq!(&query_string, "all_tenants=true&name=web1&limit=42");
/// ```
///
/// `Query` helps avoiding creating very large structures when only few query items are
/// normally used.
#[derive(Debug, Clone)]
pub struct Query<T>(pub Vec<T>);

impl<T> Default for Query<T> {
    fn default() -> Query<T> {
        Query(Vec::new())
    }
}

impl<T> Query<T> {
    /// Add a query item.
    #[inline]
    pub fn with(mut self, item: T) -> Self {
        self.0.push(item);
        self
    }
}

impl<T> Deref for Query<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.0
    }
}

impl<T> DerefMut for Query<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }
}

impl<T> Serialize for Query<T>
where
    T: QueryItem,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for e in &self.0 {
            let item = e.query_item().map_err(SerError::custom)?;
            seq.serialize_element(&item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::{Error, ErrorKind};

    #[derive(Debug)]
    #[allow(dead_code)]
    enum MyQueryItem {
        Foo(String),
        Bar(bool),
        Broken,
    }

    impl QueryItem for MyQueryItem {
        fn query_item(&self) -> Result<(&str, Cow<str>), Error> {
            match self {
                MyQueryItem::Foo(s) => Ok(("foo", Cow::Borrowed(s))),
                MyQueryItem::Bar(b) => Ok(("bar", b.to_string().into())),
                MyQueryItem::Broken => Err(Error::new(ErrorKind::InvalidInput, "broken item")),
            }
        }
    }

    #[test]
    fn test_query() {
        let mut q = Query::default();
        let _ = q.push(MyQueryItem::Bar(true));
        let _ = q.push(MyQueryItem::Foo("foo1".into()));
        let _ = q.push(MyQueryItem::Foo("foo2".into()));
        let s = serde_urlencoded::to_string(q).unwrap();
        assert_eq!(&s, "bar=true&foo=foo1&foo=foo2");
    }

    #[test]
    fn test_query_empty() {
        let q: Query<MyQueryItem> = Query::default();
        let s = serde_urlencoded::to_string(q).unwrap();
        assert_eq!(&s, "");
    }

    #[test]
    fn test_query_item_error() {
        let q = Query::default().with(MyQueryItem::Broken);
        assert!(serde_urlencoded::to_string(q).is_err());
    }
}
