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

//! Reusable JSON structures shared between services.

use std::cmp::Ordering;

use reqwest::Url;
use serde::de::{DeserializeOwned, Error as DeserError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ApiVersion;

/// A link to a resource or a page.
///
/// Links with `rel == "next"` express pagination continuation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Link {
    /// Target URL.
    pub href: Url,
    /// Relationship between the referencing and the referenced object.
    pub rel: String,
}

/// Find the `next` link in a link array.
#[inline]
pub fn next_link(links: &[Link]) -> Option<&Url> {
    links.iter().find(|x| x.rel == "next").map(|x| &x.href)
}

/// A reference to another resource: an ID plus links.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Ref {
    /// Identity of the referenced resource.
    pub id: String,
    /// A set of links to the resource.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A short reference returned by listing APIs without details.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IdAndName {
    /// Resource ID.
    pub id: String,
    /// Resource name.
    pub name: String,
}

/// A reference to a resource by either its ID or its name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IdOrName {
    /// Resource ID.
    #[serde(rename = "id")]
    Id(String),
    /// Resource name.
    #[serde(rename = "name")]
    Name(String),
}

impl IdOrName {
    /// Create a reference from an ID.
    #[inline]
    pub fn from_id<S: Into<String>>(id: S) -> IdOrName {
        IdOrName::Id(id.into())
    }

    /// Create a reference from a name.
    #[inline]
    pub fn from_name<S: Into<String>>(name: S) -> IdOrName {
        IdOrName::Name(name.into())
    }
}

/// Status of a major API version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VersionStatus {
    /// The current version.
    Current,
    /// Supported version (that is not current).
    Supported,
    /// Deprecated version.
    Deprecated,
    /// Unknown version status.
    #[default]
    Unknown,
}

impl VersionStatus {
    /// If the version is considered stable.
    ///
    /// Unknown statuses are treated as stable.
    #[inline]
    pub fn is_stable(&self) -> bool {
        !matches!(self, VersionStatus::Deprecated)
    }
}

impl<T> From<T> for VersionStatus
where
    T: Into<String>,
{
    fn from(value: T) -> VersionStatus {
        match value.into().to_uppercase().as_ref() {
            "CURRENT" => VersionStatus::Current,
            "SUPPORTED" | "STABLE" => VersionStatus::Supported,
            "DEPRECATED" => VersionStatus::Deprecated,
            _ => VersionStatus::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for VersionStatus {
    fn deserialize<D>(deserializer: D) -> Result<VersionStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Ok(value.into())
    }
}

/// A single API version as returned by a version discovery document.
#[derive(Clone, Debug, Deserialize)]
pub struct Version {
    /// Major version ID.
    pub id: ApiVersion,
    /// Links to subresources of this API version.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Version status.
    #[serde(deserialize_with = "empty_as_default", default)]
    pub status: VersionStatus,
    /// Current microversion.
    #[serde(deserialize_with = "empty_as_default", default)]
    pub version: Option<ApiVersion>,
    /// Minimum supported microversion.
    #[serde(deserialize_with = "empty_as_default", default)]
    pub min_version: Option<ApiVersion>,
}

impl Version {
    /// Whether a version is considered stable according to its status.
    #[inline]
    pub fn is_stable(&self) -> bool {
        self.status.is_stable()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Deserialize a value treating an empty string as the `Default` value.
pub fn empty_as_default<'de, D, T>(des: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(des)?;
    match value {
        Value::String(ref s) if s.is_empty() => Ok(T::default()),
        _ => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use serde::{Deserialize, Serialize};

    use super::{next_link, empty_as_default, Link, Version, VersionStatus};
    use crate::ApiVersion;

    /// Assert that `value` serializes into the same JSON as `sample`.
    pub fn compare<T: Serialize>(sample: &str, value: T) {
        let expected: serde_json::Value = serde_json::from_str(sample).unwrap();
        let actual = serde_json::to_value(value).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_next_link() {
        let links: Vec<Link> = serde_json::from_str(
            r#"[{"href": "http://example.com/servers?marker=abc", "rel": "next"},
                {"href": "http://example.com/doc", "rel": "describedby"}]"#,
        )
        .unwrap();
        let next = next_link(&links).unwrap();
        assert_eq!(next.as_str(), "http://example.com/servers?marker=abc");
    }

    #[test]
    fn test_next_link_absent() {
        let links: Vec<Link> = serde_json::from_str(
            r#"[{"href": "http://example.com/doc", "rel": "describedby"}]"#,
        )
        .unwrap();
        assert!(next_link(&links).is_none());
    }

    #[derive(Debug, Deserialize)]
    struct EmptyAsDefault {
        #[serde(deserialize_with = "empty_as_default")]
        number: u8,
        #[serde(deserialize_with = "empty_as_default")]
        opt: Option<String>,
    }

    #[test]
    fn test_empty_as_default_with_values() {
        let r: EmptyAsDefault =
            serde_json::from_str(r#"{"number": 42, "opt": "value"}"#).unwrap();
        assert_eq!(r.number, 42);
        assert_eq!(r.opt.unwrap(), "value");
    }

    #[test]
    fn test_empty_as_default_with_empty_string() {
        let r: EmptyAsDefault = serde_json::from_str(r#"{"number": "", "opt": ""}"#).unwrap();
        assert_eq!(r.number, 0);
        assert!(r.opt.is_none());
    }

    #[test]
    fn test_version_status() {
        assert_eq!(VersionStatus::from("CURRENT"), VersionStatus::Current);
        assert_eq!(VersionStatus::from("Stable"), VersionStatus::Supported);
        assert_eq!(VersionStatus::from("deprecated"), VersionStatus::Deprecated);
        assert_eq!(VersionStatus::from("banana!"), VersionStatus::Unknown);
        assert!(VersionStatus::Current.is_stable());
        assert!(VersionStatus::Unknown.is_stable());
        assert!(!VersionStatus::Deprecated.is_stable());
    }

    const COMPUTE_VERSION: &str = r#"{
        "status": "CURRENT",
        "updated": "2013-07-23T11:33:21Z",
        "links": [
            {"href": "https://example.org:13774/v2.1/", "rel": "self"},
            {"href": "http://docs.openstack.org/", "rel": "describedby"}
        ],
        "min_version": "2.1",
        "version": "2.42",
        "id": "v2.1"
    }"#;

    #[test]
    fn test_version_parse() {
        let version: Version = serde_json::from_str(COMPUTE_VERSION).unwrap();
        assert_eq!(version.id, ApiVersion(2, 1));
        assert_eq!(version.status, VersionStatus::Current);
        assert_eq!(version.version, Some(ApiVersion(2, 42)));
        assert_eq!(version.min_version, Some(ApiVersion(2, 1)));
        assert!(version.is_stable());
    }
}
