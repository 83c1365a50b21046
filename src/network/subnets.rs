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

//! Subnet management.

use std::net::IpAddr;

use futures::stream::{Stream, TryStreamExt};
use oscloud_derive::QueryItem;
use serde::{Deserialize, Serialize};

use super::protocol::{IpVersion, Subnet};
use crate::services::NETWORK;
use crate::{Error, ErrorKind, Query, Session};

/// A query filter for subnet listings.
#[derive(Clone, Debug, QueryItem)]
#[non_exhaustive]
pub enum SubnetFilter {
    /// Filter by subnet name.
    Name(String),
    /// Filter by the network the subnets belong to.
    NetworkId(String),
    /// Filter by CIDR.
    Cidr(String),
}

/// A request to create a subnet.
#[derive(Clone, Debug, Serialize)]
pub struct SubnetCreate {
    /// ID of the network to create the subnet on.
    pub network_id: String,
    /// CIDR of the new subnet.
    pub cidr: String,
    /// IP protocol version.
    pub ip_version: IpVersion,
    /// Name of the new subnet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Gateway address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_ip: Option<IpAddr>,
    /// Whether to enable DHCP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dhcp: Option<bool>,
    /// DNS servers to advertise via DHCP.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns_nameservers: Vec<IpAddr>,
}

impl SubnetCreate {
    /// Create a request with only the required fields set.
    pub fn new<S1, S2>(network_id: S1, cidr: S2, ip_version: IpVersion) -> SubnetCreate
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        SubnetCreate {
            network_id: network_id.into(),
            cidr: cidr.into(),
            ip_version,
            name: None,
            gateway_ip: None,
            enable_dhcp: None,
            dns_nameservers: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.network_id.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Subnet network ID is required",
            ));
        }
        if self.cidr.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput, "Subnet CIDR is required"));
        }
        Ok(())
    }
}

/// An update to a subnet.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SubnetUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New gateway address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_ip: Option<IpAddr>,
    /// New DHCP setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dhcp: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SubnetRoot {
    subnet: Subnet,
}

#[derive(Debug, Serialize)]
struct SubnetCreateRoot<'a> {
    subnet: &'a SubnetCreate,
}

#[derive(Debug, Serialize)]
struct SubnetUpdateRoot<'a> {
    subnet: &'a SubnetUpdate,
}

/// List all subnets, fetching every page.
pub async fn list(session: &Session, query: Query<SubnetFilter>) -> Result<Vec<Subnet>, Error> {
    let stream = list_paginated(session, query, None).await?;
    stream.try_collect().await
}

/// List subnets page by page, following `next` links.
pub async fn list_paginated(
    session: &Session,
    query: Query<SubnetFilter>,
    limit: Option<usize>,
) -> Result<impl Stream<Item = Result<Subnet, Error>>, Error> {
    let builder = session.get(NETWORK, &["subnets"]).await?.query(&query);
    Ok(builder.fetch_json_linked::<Subnet>(limit).await)
}

/// Get a subnet by its ID.
pub async fn get(session: &Session, id: &str) -> Result<Subnet, Error> {
    let root: SubnetRoot = session
        .get(NETWORK, &["subnets", id])
        .await?
        .fetch_json()
        .await?;
    Ok(root.subnet)
}

/// Create a subnet.
pub async fn create(session: &Session, request: SubnetCreate) -> Result<Subnet, Error> {
    request.validate()?;
    let root: SubnetRoot = session
        .post(NETWORK, &["subnets"])
        .await?
        .json(&SubnetCreateRoot { subnet: &request })
        .fetch_json()
        .await?;
    Ok(root.subnet)
}

/// Update a subnet.
pub async fn update(session: &Session, id: &str, request: SubnetUpdate) -> Result<Subnet, Error> {
    let root: SubnetRoot = session
        .put(NETWORK, &["subnets", id])
        .await?
        .json(&SubnetUpdateRoot { subnet: &request })
        .fetch_json()
        .await?;
    Ok(root.subnet)
}

/// Delete a subnet.
pub async fn delete(session: &Session, id: &str) -> Result<(), Error> {
    let _ = session
        .delete(NETWORK, &["subnets", id])
        .await?
        .send()
        .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::super::protocol::IpVersion;
    use super::{SubnetCreate, SubnetFilter};
    use crate::common::test::compare;
    use crate::{ErrorKind, Query};

    #[test]
    fn test_create_missing_network() {
        let request = SubnetCreate::new("", "10.0.0.0/24", IpVersion::V4);
        assert_eq!(
            request.validate().err().unwrap().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_create_missing_cidr() {
        let request = SubnetCreate::new("d32019d3", "", IpVersion::V4);
        assert_eq!(
            request.validate().err().unwrap().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_create_body() {
        let mut request = SubnetCreate::new("d32019d3", "10.0.0.0/24", IpVersion::V4);
        request.name = Some("private-subnet".into());
        request.enable_dhcp = Some(true);
        request.validate().unwrap();
        compare(
            r#"{
                "network_id": "d32019d3",
                "cidr": "10.0.0.0/24",
                "ip_version": 4,
                "name": "private-subnet",
                "enable_dhcp": true
            }"#,
            request,
        );
    }

    #[test]
    fn test_filter_query() {
        let query = Query::default()
            .with(SubnetFilter::NetworkId("d32019d3".into()))
            .with(SubnetFilter::Cidr("10.0.0.0/24".into()));
        let query_string = serde_urlencoded::to_string(query).unwrap();
        assert_eq!(
            &query_string,
            "network_id=d32019d3&cidr=10.0.0.0%2F24"
        );
    }
}
