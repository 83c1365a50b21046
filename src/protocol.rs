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

//! Version discovery bits.

use log::{debug, trace, warn};
use reqwest::{Method, Url};
use serde::Deserialize;

use super::client::AuthenticatedClient;
use super::common::Version;
use super::services::ServiceType;
use super::url;
use super::{ApiVersion, Error, ErrorKind};

/// A root of a version discovery document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Root {
    /// Multiple major versions.
    MultipleVersions {
        /// Major versions.
        versions: Vec<Version>,
    },
    /// One major version.
    OneVersion {
        /// The major version.
        version: Version,
    },
}

/// Information about an API endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Root endpoint.
    pub root_url: Url,
    /// Major API version.
    pub major_version: Option<ApiVersion>,
    /// Current API version (if supported).
    pub current_version: Option<ApiVersion>,
    /// Minimum API version (if supported).
    pub minimum_version: Option<ApiVersion>,
}

fn into_service_info(version: Version) -> Result<ServiceInfo, Error> {
    let endpoint = match version.links.iter().find(|x| x.rel == "self") {
        Some(link) => link.href.clone(),
        None => {
            return Err(Error::new(
                ErrorKind::InvalidResponse,
                "Invalid version discovery document: missing self link",
            ));
        }
    };

    Ok(ServiceInfo {
        root_url: endpoint,
        major_version: Some(version.id),
        current_version: version.version,
        minimum_version: version.min_version,
    })
}

impl Root {
    /// Fetch a version discovery root from the URL.
    pub async fn fetch(endpoint: Url, client: &AuthenticatedClient) -> Result<Root, Error> {
        debug!("Fetching version discovery document from {}", endpoint);
        client.request(Method::GET, endpoint).fetch_json().await
    }

    /// Extract `ServiceInfo` from a version discovery root.
    pub fn into_service_info<Srv: ServiceType>(self, service: &Srv) -> Result<ServiceInfo, Error> {
        trace!(
            "Available major versions for {} service: {:?}",
            service.catalog_type(),
            self
        );

        match self {
            Root::OneVersion { version } => {
                if service.major_version_supported(version.id) {
                    if !version.is_stable() {
                        warn!(
                            "Using version {:?} of {} API that is not marked as stable",
                            version,
                            service.catalog_type()
                        );
                    }

                    into_service_info(version)
                } else {
                    Err(Error::new(
                        ErrorKind::EndpointNotFound,
                        "Major version not supported",
                    ))
                }
            }
            Root::MultipleVersions { mut versions } => {
                versions.sort_unstable();
                match versions
                    .into_iter()
                    .rfind(|x| x.is_stable() && service.major_version_supported(x.id))
                {
                    Some(version) => into_service_info(version),
                    None => Err(Error::new_endpoint_not_found(service.catalog_type())),
                }
            }
        }
    }
}

impl ServiceInfo {
    /// Whether this service supports the given API version.
    ///
    /// Defaults to false if cannot be determined.
    #[inline]
    pub fn supports_api_version(&self, version: ApiVersion) -> bool {
        match (self.minimum_version, self.current_version) {
            (Some(min), Some(max)) => min <= version && max >= version,
            (None, Some(current)) => current == version,
            (Some(min), None) => version >= min,
            _ => false,
        }
    }

    /// Pick an API version from the list of supported ones.
    pub fn pick_api_version<I>(&self, versions: I) -> Option<ApiVersion>
    where
        I: IntoIterator<Item = ApiVersion>,
    {
        versions
            .into_iter()
            .filter(|item| self.supports_api_version(*item))
            .max()
    }

    /// Generic code to extract a `ServiceInfo` from a URL.
    pub async fn fetch<Srv: ServiceType>(
        service: &Srv,
        endpoint: Url,
        client: &AuthenticatedClient,
    ) -> Result<ServiceInfo, Error> {
        if !service.version_discovery_supported() {
            debug!(
                "Service {} does not support version discovery, using {}",
                service.catalog_type(),
                endpoint
            );
            return Ok(ServiceInfo {
                root_url: endpoint,
                major_version: None,
                current_version: None,
                minimum_version: None,
            });
        }

        // Workaround for old versions of Nova returning HTTP endpoints even
        // if accessed via HTTPS.
        let secure = endpoint.scheme() == "https";
        let catalog_type = service.catalog_type();

        let root = match Root::fetch(endpoint.clone(), client).await {
            Ok(root) => root,
            Err(e) if e.kind() == ErrorKind::ResourceNotFound => {
                if url::is_root(&endpoint) {
                    return Err(Error::new_endpoint_not_found(catalog_type));
                } else {
                    debug!("Got HTTP 404 from {}, trying parent endpoint", endpoint);
                    Root::fetch(url::pop(endpoint, true), client).await?
                }
            }
            Err(e) => return Err(e),
        };

        let mut info = root.into_service_info(service)?;

        // Older Nova returns insecure URLs even for the secure protocol.
        if secure && info.root_url.scheme() == "http" {
            let _ = info.root_url.set_scheme("https");
        }

        debug!("Received {:?} for {} service", info, catalog_type);
        Ok(info)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use reqwest::Url;

    use super::super::services::{COMPUTE, IDENTITY};
    use super::super::{ApiVersion, ErrorKind};
    use super::{Root, ServiceInfo};

    pub(crate) fn service_info(major: (u16, u16), min: (u16, u16), max: (u16, u16)) -> ServiceInfo {
        ServiceInfo {
            root_url: Url::parse("https://cloud.local/v2.1/").unwrap(),
            major_version: Some(major.into()),
            current_version: Some(max.into()),
            minimum_version: Some(min.into()),
        }
    }

    const ONE_VERSION: &str = r#"{
        "version": {
            "id": "v2.1",
            "status": "CURRENT",
            "version": "2.42",
            "min_version": "2.1",
            "links": [{"href": "https://cloud.local/v2.1/", "rel": "self"}]
        }
    }"#;

    const MULTIPLE_VERSIONS: &str = r#"{
        "versions": [
            {
                "id": "v2.0",
                "status": "DEPRECATED",
                "links": [{"href": "https://cloud.local/v2/", "rel": "self"}]
            },
            {
                "id": "v2.1",
                "status": "CURRENT",
                "version": "2.42",
                "min_version": "2.1",
                "links": [{"href": "https://cloud.local/v2.1/", "rel": "self"}]
            }
        ]
    }"#;

    const IDENTITY_VERSIONS: &str = r#"{
        "versions": [
            {
                "id": "v3.14",
                "status": "stable",
                "links": [{"href": "https://cloud.local/identity/v3/", "rel": "self"}]
            }
        ]
    }"#;

    #[test]
    fn test_one_version() {
        let root: Root = serde_json::from_str(ONE_VERSION).unwrap();
        let info = root.into_service_info(&COMPUTE).unwrap();
        assert_eq!(info.root_url.as_str(), "https://cloud.local/v2.1/");
        assert_eq!(info.major_version, Some(ApiVersion(2, 1)));
        assert_eq!(info.current_version, Some(ApiVersion(2, 42)));
        assert_eq!(info.minimum_version, Some(ApiVersion(2, 1)));
    }

    #[test]
    fn test_multiple_versions_pick_stable() {
        let root: Root = serde_json::from_str(MULTIPLE_VERSIONS).unwrap();
        let info = root.into_service_info(&COMPUTE).unwrap();
        assert_eq!(info.root_url.as_str(), "https://cloud.local/v2.1/");
        assert_eq!(info.major_version, Some(ApiVersion(2, 1)));
    }

    #[test]
    fn test_multiple_versions_none_supported() {
        let root: Root = serde_json::from_str(MULTIPLE_VERSIONS).unwrap();
        let err = root.into_service_info(&IDENTITY).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }

    #[test]
    fn test_identity_versions() {
        let root: Root = serde_json::from_str(IDENTITY_VERSIONS).unwrap();
        let info = root.into_service_info(&IDENTITY).unwrap();
        assert_eq!(info.root_url.as_str(), "https://cloud.local/identity/v3/");
        assert_eq!(info.major_version, Some(ApiVersion(3, 14)));
        assert!(info.current_version.is_none());
    }

    #[test]
    fn test_missing_self_link() {
        let root: Root = serde_json::from_str(
            r#"{"version": {"id": "v2.1", "status": "CURRENT", "links": []}}"#,
        )
        .unwrap();
        let err = root.into_service_info(&COMPUTE).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_one_version_unsupported_major() {
        let root: Root = serde_json::from_str(ONE_VERSION).unwrap();
        let err = root.into_service_info(&IDENTITY).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }

    #[test]
    fn test_supports_api_version() {
        let info = service_info((2, 1), (2, 1), (2, 42));
        assert!(info.supports_api_version(ApiVersion(2, 1)));
        assert!(info.supports_api_version(ApiVersion(2, 30)));
        assert!(info.supports_api_version(ApiVersion(2, 42)));
        assert!(!info.supports_api_version(ApiVersion(2, 43)));
        assert!(!info.supports_api_version(ApiVersion(2, 0)));
    }

    #[test]
    fn test_pick_api_version() {
        let info = service_info((2, 1), (2, 1), (2, 42));
        let picked = info.pick_api_version(vec![
            ApiVersion(2, 0),
            ApiVersion(2, 40),
            ApiVersion(2, 50),
        ]);
        assert_eq!(picked, Some(ApiVersion(2, 40)));
        assert!(info
            .pick_api_version(vec![ApiVersion(1, 0), ApiVersion(3, 0)])
            .is_none());
    }
}
