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

//! Internal service information cache.

use std::collections::HashMap;

use log::debug;
use reqwest::Url;
use tokio::sync::RwLock;

use super::client::AuthenticatedClient;
use super::protocol::ServiceInfo;
use super::services::ServiceType;
use super::{EndpointFilters, Error, ErrorKind};

/// Service information cache.
#[derive(Debug)]
pub struct EndpointCache {
    info: RwLock<HashMap<&'static str, ServiceInfo>>,
    pub filters: EndpointFilters,
    pub overrides: HashMap<String, Url>,
}

impl Clone for EndpointCache {
    /// Clone the cache removing the cached information but keeping filters and overrides.
    fn clone(&self) -> EndpointCache {
        EndpointCache {
            info: RwLock::new(HashMap::new()),
            filters: self.filters.clone(),
            overrides: self.overrides.clone(),
        }
    }
}

impl EndpointCache {
    /// Create a new empty cache.
    #[inline]
    pub fn new() -> Self {
        EndpointCache {
            info: RwLock::new(HashMap::new()),
            filters: EndpointFilters::default(),
            overrides: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn new_with(service_type: &'static str, service_info: ServiceInfo) -> Self {
        let mut hm = HashMap::new();
        let _ = hm.insert(service_type, service_info);
        EndpointCache {
            info: RwLock::new(hm),
            filters: EndpointFilters::default(),
            overrides: HashMap::new(),
        }
    }

    /// Clear the cache.
    #[inline]
    #[allow(dead_code)]
    pub fn clear(&mut self) -> &mut Self {
        self.info = RwLock::new(HashMap::new());
        self
    }

    /// Ensure service info and return the cache.
    pub async fn extract_service_info<Srv, F, T>(
        &self,
        client: &AuthenticatedClient,
        service: Srv,
        filter: F,
    ) -> Result<T, Error>
    where
        Srv: ServiceType + Send,
        F: FnOnce(&ServiceInfo) -> T + Send,
        T: Send,
    {
        let catalog_type = service.catalog_type();
        if let Some(info) = self.info.read().await.get(catalog_type) {
            return Ok(filter(info));
        }

        debug!(
            "No cached information for service {}, fetching",
            catalog_type
        );

        let mut lock = self.info.write().await;
        // Another future may have filled the cache while we were waiting for the write lock.
        Ok(if let Some(info) = lock.get(catalog_type) {
            filter(info)
        } else {
            let ep = match self.overrides.get(catalog_type) {
                Some(found) => found.clone(),
                None => client.get_endpoint(catalog_type, &self.filters).await?,
            };
            if ep.cannot_be_a_base() || !ep.has_host() {
                return Err(Error::new(
                    ErrorKind::InvalidResponse,
                    format!("Invalid URL {} received for service {}", ep, catalog_type),
                ));
            }
            let info = ServiceInfo::fetch(&service, ep, client).await?;
            let value = filter(&info);
            let _ = lock.insert(catalog_type, info);
            value
        })
    }
}

impl Default for EndpointCache {
    fn default() -> EndpointCache {
        EndpointCache::new()
    }
}
