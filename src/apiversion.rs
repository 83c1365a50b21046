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

//! API version (microversion) support.

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderValue;
use serde::de::{Error as DeserError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Error, ErrorKind};

/// An API version as used in microversion negotiation: (major, minor).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ApiVersion(pub u16, pub u16);

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

impl From<(u16, u16)> for ApiVersion {
    fn from(value: (u16, u16)) -> ApiVersion {
        ApiVersion(value.0, value.1)
    }
}

impl From<ApiVersion> for HeaderValue {
    fn from(value: ApiVersion) -> HeaderValue {
        HeaderValue::from_str(&value.to_string()).expect("version is always a valid header")
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Parse `X.Y`, `X` or `vX.Y` into an API version.
    fn from_str(s: &str) -> Result<ApiVersion, Error> {
        let stripped = s.strip_prefix('v').unwrap_or(s);
        let mut parts = stripped.splitn(2, '.');

        let major = parse_component(parts.next().unwrap_or(""), s)?;
        let minor = match parts.next() {
            Some(minor) => parse_component(minor, s)?,
            None => 0,
        };

        Ok(ApiVersion(major, minor))
    }
}

fn parse_component(component: &str, source: &str) -> Result<u16, Error> {
    component.parse().map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Invalid API version: expected X.Y or X, got {}", source),
        )
    })
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct ApiVersionVisitor;

impl<'de> Visitor<'de> for ApiVersionVisitor {
    type Value = ApiVersion;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string in format X.Y or X")
    }

    fn visit_str<E>(self, value: &str) -> Result<ApiVersion, E>
    where
        E: DeserError,
    {
        ApiVersion::from_str(value).map_err(DeserError::custom)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<ApiVersion, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ApiVersionVisitor)
    }
}
