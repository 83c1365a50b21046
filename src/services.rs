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

//! OpenStack service types.

use http::header::{HeaderName, HeaderValue};

use super::ApiVersion;

/// Trait representing a service type.
pub trait ServiceType {
    /// Service type to pass to the catalog.
    fn catalog_type(&self) -> &'static str;

    /// Check whether this service type is compatible with the given major version.
    fn major_version_supported(&self, _version: ApiVersion) -> bool {
        true
    }

    /// Whether this service supports version discovery at all.
    fn version_discovery_supported(&self) -> bool {
        true
    }
}

/// Trait representing a service with API version support.
pub trait VersionedService: ServiceType {
    /// Get a header for this version.
    fn get_version_header(&self, version: ApiVersion) -> (HeaderName, HeaderValue);
}

/// A major version selector.
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub enum VersionSelector {
    /// Match the major component.
    Major(u16),
    /// Match the full version.
    ///
    /// Some service have a minor component in their major versions, e.g. 2.1.
    Exact(ApiVersion),
    /// A range of major versions.
    Range(ApiVersion, ApiVersion),
    /// Any major version.
    Any,
}

/// A generic service.
#[derive(Copy, Clone, Debug)]
pub struct GenericService {
    catalog_type: &'static str,
    major_version: VersionSelector,
}

impl GenericService {
    /// Create a new generic service.
    pub const fn new(catalog_type: &'static str, major_version: VersionSelector) -> GenericService {
        GenericService {
            catalog_type,
            major_version,
        }
    }
}

impl ServiceType for GenericService {
    fn catalog_type(&self) -> &'static str {
        self.catalog_type
    }

    fn major_version_supported(&self, version: ApiVersion) -> bool {
        match self.major_version {
            VersionSelector::Major(major) => version.0 == major,
            VersionSelector::Exact(expected) => version == expected,
            VersionSelector::Range(v1, v2) => v1 <= version && version <= v2,
            VersionSelector::Any => true,
        }
    }
}

/// The Bare Metal service.
#[derive(Copy, Clone, Debug)]
pub struct BareMetalService {
    __use_new: (),
}

impl BareMetalService {
    /// Create a Bare Metal service type.
    pub const fn new() -> BareMetalService {
        BareMetalService { __use_new: () }
    }
}

impl Default for BareMetalService {
    fn default() -> BareMetalService {
        BareMetalService::new()
    }
}

impl ServiceType for BareMetalService {
    fn catalog_type(&self) -> &'static str {
        "baremetal"
    }

    fn major_version_supported(&self, version: ApiVersion) -> bool {
        version.0 == 1
    }
}

impl VersionedService for BareMetalService {
    fn get_version_header(&self, version: ApiVersion) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-openstack-ironic-api-version"),
            version.into(),
        )
    }
}

/// The Compute service.
#[derive(Copy, Clone, Debug)]
pub struct ComputeService {
    __use_new: (),
}

impl ComputeService {
    /// Create a Compute service type.
    pub const fn new() -> ComputeService {
        ComputeService { __use_new: () }
    }
}

impl Default for ComputeService {
    fn default() -> ComputeService {
        ComputeService::new()
    }
}

impl ServiceType for ComputeService {
    fn catalog_type(&self) -> &'static str {
        "compute"
    }

    fn major_version_supported(&self, version: ApiVersion) -> bool {
        version.0 == 2
    }
}

impl VersionedService for ComputeService {
    fn get_version_header(&self, version: ApiVersion) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-openstack-nova-api-version"),
            version.into(),
        )
    }
}

/// The Volume (Block Storage) service.
#[derive(Copy, Clone, Debug)]
pub struct VolumeService {
    __use_new: (),
}

impl VolumeService {
    /// Create a Volume service type.
    pub const fn new() -> VolumeService {
        VolumeService { __use_new: () }
    }
}

impl Default for VolumeService {
    fn default() -> VolumeService {
        VolumeService::new()
    }
}

impl ServiceType for VolumeService {
    fn catalog_type(&self) -> &'static str {
        "volumev3"
    }

    fn major_version_supported(&self, version: ApiVersion) -> bool {
        version.0 == 3
    }
}

impl VersionedService for VolumeService {
    fn get_version_header(&self, version: ApiVersion) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-openstack-volume-api-version"),
            version.into(),
        )
    }
}

/// Bare Metal service.
pub const BAREMETAL: BareMetalService = BareMetalService::new();

/// Block Storage service (version 3).
pub const BLOCK_STORAGE: VolumeService = VolumeService::new();

/// Compute service.
pub const COMPUTE: ComputeService = ComputeService::new();

/// Identity service.
pub const IDENTITY: GenericService = GenericService::new("identity", VersionSelector::Major(3));

/// Image service.
pub const IMAGE: GenericService = GenericService::new("image", VersionSelector::Major(2));

/// Networking service.
pub const NETWORK: GenericService = GenericService::new("network", VersionSelector::Major(2));

/// Object Storage service.
#[derive(Copy, Clone, Debug)]
pub struct ObjectStorageService {
    __use_new: (),
}

impl ObjectStorageService {
    /// Create an Object Storage service type.
    pub const fn new() -> ObjectStorageService {
        ObjectStorageService { __use_new: () }
    }
}

impl Default for ObjectStorageService {
    fn default() -> ObjectStorageService {
        ObjectStorageService::new()
    }
}

impl ServiceType for ObjectStorageService {
    fn catalog_type(&self) -> &'static str {
        "object-store"
    }

    fn version_discovery_supported(&self) -> bool {
        false
    }
}

/// Object Storage service.
pub const OBJECT_STORAGE: ObjectStorageService = ObjectStorageService::new();

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::{ServiceType, VersionedService, BLOCK_STORAGE, COMPUTE, IDENTITY, OBJECT_STORAGE};
    use crate::ApiVersion;

    #[test]
    fn test_compute_versions() {
        assert_eq!(COMPUTE.catalog_type(), "compute");
        assert!(COMPUTE.major_version_supported(ApiVersion(2, 0)));
        assert!(COMPUTE.major_version_supported(ApiVersion(2, 1)));
        assert!(!COMPUTE.major_version_supported(ApiVersion(1, 0)));
        assert!(COMPUTE.version_discovery_supported());
    }

    #[test]
    fn test_compute_version_header() {
        let (name, value) = COMPUTE.get_version_header(ApiVersion(2, 42));
        assert_eq!(name.as_str(), "x-openstack-nova-api-version");
        assert_eq!(value.to_str().unwrap(), "2.42");
    }

    #[test]
    fn test_block_storage_version_header() {
        let (name, value) = BLOCK_STORAGE.get_version_header(ApiVersion(3, 59));
        assert_eq!(name.as_str(), "x-openstack-volume-api-version");
        assert_eq!(value.to_str().unwrap(), "3.59");
    }

    #[test]
    fn test_generic_major_version() {
        assert!(IDENTITY.major_version_supported(ApiVersion(3, 0)));
        assert!(!IDENTITY.major_version_supported(ApiVersion(2, 0)));
    }

    #[test]
    fn test_object_storage_no_discovery() {
        assert!(!OBJECT_STORAGE.version_discovery_supported());
    }
}
