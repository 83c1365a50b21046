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

//! JSON structures of the Identity V3 API.

use chrono::{DateTime, FixedOffset};
use reqwest::Url;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::IdOrName;

/// A reference to a project in a domain.
#[derive(Clone, Debug, Serialize)]
pub struct Project {
    /// Project ID or name.
    #[serde(flatten)]
    pub project: IdOrName,
    /// ID or name of the project domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<IdOrName>,
}

/// A scope of a token.
#[derive(Clone, Debug, Serialize)]
pub enum Scope {
    /// A token scoped to a project.
    #[serde(rename = "project")]
    Project(Project),
}

/// A user with a password.
#[derive(Clone, Debug)]
pub struct UserAndPassword {
    /// User ID or name.
    pub user: IdOrName,
    /// User password.
    pub password: String,
    /// ID or name of the user domain.
    pub domain: Option<IdOrName>,
}

#[derive(Serialize)]
struct UserBody<'a> {
    #[serde(flatten)]
    user: &'a IdOrName,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a IdOrName>,
}

impl Serialize for UserAndPassword {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut inner = serializer.serialize_struct("UserAndPassword", 1)?;
        inner.serialize_field(
            "user",
            &UserBody {
                user: &self.user,
                password: &self.password,
                domain: self.domain.as_ref(),
            },
        )?;
        inner.end()
    }
}

/// An authentication method.
#[derive(Clone, Debug)]
pub enum Identity {
    /// Authentication with a user and a password.
    Password(UserAndPassword),
    /// Authentication with an existing token.
    Token(String),
}

#[derive(Serialize)]
struct TokenBody<'a> {
    id: &'a str,
}

impl Serialize for Identity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut inner = serializer.serialize_struct("Identity", 2)?;
        match self {
            Identity::Password(ref user) => {
                inner.serialize_field("methods", &["password"])?;
                inner.serialize_field("password", user)?;
            }
            Identity::Token(ref token) => {
                inner.serialize_field("methods", &["token"])?;
                inner.serialize_field("token", &TokenBody { id: token })?;
            }
        }
        inner.end()
    }
}

/// An authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct Auth {
    /// Authentication method.
    pub identity: Identity,
    /// Requested token scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// The root of an authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRoot {
    /// Authentication request.
    pub auth: Auth,
}

/// An endpoint of a service from a service catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct Endpoint {
    /// Endpoint interface (public, internal or admin).
    pub interface: String,
    /// Endpoint region.
    #[serde(default)]
    pub region: String,
    /// Endpoint URL.
    pub url: Url,
}

/// A service catalog record for one service.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogRecord {
    /// Service type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// All registered endpoints of the service.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A role assigned to a token.
#[derive(Clone, Debug, Deserialize)]
pub struct Role {
    /// Role ID.
    #[serde(default)]
    pub id: String,
    /// Role name.
    pub name: String,
}

/// An issued token with its metadata.
#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    /// Expiration time of the token.
    pub expires_at: DateTime<FixedOffset>,
    /// A service catalog for the token scope.
    #[serde(default)]
    pub catalog: Vec<CatalogRecord>,
    /// Roles assigned to the token.
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// The root of an authentication response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenRoot {
    /// The issued token.
    pub token: Token,
}
