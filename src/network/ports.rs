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

//! Port management.

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::{FixedIp, Port};
use crate::services::NETWORK;
use crate::{Error, ErrorKind, Query, Session};

/// A query filter for port listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum PortFilter {
    /// Filter by port name.
    Name(String),
    /// Filter by the network the ports belong to.
    NetworkId(String),
    /// Filter by the device using the ports.
    DeviceId(String),
    /// Filter by the type of the device using the ports.
    DeviceOwner(String),
}

/// A request to create a port.
#[derive(Clone, Debug, Serialize)]
pub struct PortCreate {
    /// ID of the network to create the port on.
    pub network_id: String,
    /// Name of the new port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Administrative state (up or down).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    /// Fixed IP addresses to assign.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixed_ips: Vec<FixedIp>,
    /// ID of the device using the port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl PortCreate {
    /// Create a request with only the required fields set.
    pub fn new<S: Into<String>>(network_id: S) -> PortCreate {
        PortCreate {
            network_id: network_id.into(),
            name: None,
            admin_state_up: None,
            fixed_ips: Vec::new(),
            device_id: None,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.network_id.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Port network ID is required",
            ));
        }
        Ok(())
    }
}

/// An update to a port.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PortUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New administrative state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    /// New ID of the device using the port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PortRoot {
    port: Port,
}

#[derive(Debug, Serialize)]
struct PortCreateRoot<'a> {
    port: &'a PortCreate,
}

#[derive(Debug, Serialize)]
struct PortUpdateRoot<'a> {
    port: &'a PortUpdate,
}

/// List all ports, fetching every page.
pub async fn list(session: &Session, query: Query<PortFilter>) -> Result<Vec<Port>, Error> {
    let stream = list_paginated(session, query, None).await?;
    stream.try_collect().await
}

/// List ports page by page, following `next` links.
pub async fn list_paginated(
    session: &Session,
    query: Query<PortFilter>,
    limit: Option<usize>,
) -> Result<impl Stream<Item = Result<Port, Error>>, Error> {
    let builder = session.get(NETWORK, &["ports"]).await?.query(&query);
    Ok(builder.fetch_json_linked::<Port>(limit).await)
}

/// Get a port by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Port, Error> {
    let root: PortRoot = session
        .get(NETWORK, &["ports", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.port)
}

/// Create a port.
pub async fn create(session: &Session, request: PortCreate) -> Result<Port, Error> {
    request.validate()?;
    let root: PortRoot = session
        .post(NETWORK, &["ports"])
        .await?
        .json(&PortCreateRoot { port: &request })
        .fetch_json()
        .await?;
    Ok(root.port)
}

/// Update a port.
pub async fn update(session: &Session, id: &str, request: PortUpdate) -> Result<Port, Error> {
    let root: PortRoot = session
        .put(NETWORK, &["ports", id])
        .await?
        .json(&PortUpdateRoot { port: &request })
        .fetch_json()
        .await?;
    Ok(root.port)
}

/// Delete a port.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(NETWORK, &["ports", id])
        .await?
        .send()
        .await?;
    Ok(())
}
