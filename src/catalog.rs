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

//! Low-level code to work with the service catalog.

use log::debug;
use reqwest::Url;

use super::identity::protocol::{CatalogRecord, Endpoint};
use super::{EndpointFilters, Error};

/// Find an endpoint in the service catalog.
///
/// When several endpoints match the filters, the one with the most preferred
/// interface (the earliest in `filters.interfaces`) wins.
pub fn find_endpoint<'c>(
    catalog: &'c [CatalogRecord],
    service_type: &str,
    filters: &EndpointFilters,
) -> Result<&'c Endpoint, Error> {
    let svc = catalog
        .iter()
        .find(|x| x.service_type == *service_type)
        .ok_or_else(|| Error::new_endpoint_not_found(service_type))?;

    svc.endpoints
        .iter()
        .filter(|x| filters.check(x))
        .min_by_key(|x| filters.interfaces.find(&x.interface))
        .ok_or_else(|| Error::new_endpoint_not_found(service_type))
}

/// Extract an endpoint URL from the service catalog.
pub fn find_url(
    catalog: &[CatalogRecord],
    service_type: &str,
    filters: &EndpointFilters,
) -> Result<Url, Error> {
    let endp = find_endpoint(catalog, service_type, filters)?;
    debug!("Received {:?} for {}", endp, service_type);
    Ok(endp.url.clone())
}

#[cfg(test)]
pub mod test {
    use super::super::identity::protocol::{CatalogRecord, Endpoint};
    use super::super::{EndpointFilters, Error, ErrorKind, InterfaceType};

    fn endpoint(interface: &str, region: &str, url: &str) -> Endpoint {
        Endpoint {
            interface: String::from(interface),
            region: String::from(region),
            url: url.parse().unwrap(),
        }
    }

    fn demo_service1() -> CatalogRecord {
        CatalogRecord {
            service_type: String::from("identity"),
            endpoints: vec![
                endpoint("public", "RegionOne", "https://host.one/identity"),
                endpoint("internal", "RegionOne", "http://192.168.22.1/identity"),
                endpoint("public", "RegionTwo", "https://host.two:5000"),
            ],
        }
    }

    fn demo_service2() -> CatalogRecord {
        CatalogRecord {
            service_type: String::from("baremetal"),
            endpoints: vec![
                endpoint("public", "RegionOne", "https://host.one/baremetal"),
                endpoint("public", "RegionTwo", "https://host.two:6385"),
            ],
        }
    }

    pub fn demo_catalog() -> Vec<CatalogRecord> {
        vec![demo_service1(), demo_service2()]
    }

    fn find_endpoint<'a>(
        cat: &'a [CatalogRecord],
        service_type: &str,
        interface_type: InterfaceType,
        region: Option<&str>,
    ) -> Result<&'a Endpoint, Error> {
        let mut filters = EndpointFilters::default().with_interfaces(interface_type);
        if let Some(region) = region {
            filters.set_region(region);
        }
        super::find_endpoint(cat, service_type, &filters)
    }

    #[test]
    fn test_find_endpoint() {
        let cat = demo_catalog();

        let e1 = find_endpoint(&cat, "identity", InterfaceType::Public, None).unwrap();
        assert_eq!(e1.url.as_str(), "https://host.one/identity");

        let e2 = find_endpoint(&cat, "identity", InterfaceType::Internal, None).unwrap();
        assert_eq!(e2.url.as_str(), "http://192.168.22.1/identity");

        let e3 = find_endpoint(&cat, "baremetal", InterfaceType::Public, None).unwrap();
        assert_eq!(e3.url.as_str(), "https://host.one/baremetal");
    }

    #[test]
    fn test_find_endpoint_with_region() {
        let cat = demo_catalog();

        let e1 = find_endpoint(&cat, "identity", InterfaceType::Public, Some("RegionTwo")).unwrap();
        assert_eq!(e1.url.as_str(), "https://host.two:5000/");

        let e2 =
            find_endpoint(&cat, "identity", InterfaceType::Internal, Some("RegionOne")).unwrap();
        assert_eq!(e2.url.as_str(), "http://192.168.22.1/identity");
    }

    #[test]
    fn test_find_endpoint_interface_priority() {
        let cat = demo_catalog();

        let filters = EndpointFilters::default()
            .with_interfaces(vec![InterfaceType::Internal, InterfaceType::Public]);
        let e = super::find_endpoint(&cat, "identity", &filters).unwrap();
        assert_eq!(e.url.as_str(), "http://192.168.22.1/identity");

        // Baremetal has no internal endpoint, the public one is the fallback.
        let e = super::find_endpoint(&cat, "baremetal", &filters).unwrap();
        assert_eq!(e.url.as_str(), "https://host.one/baremetal");
    }

    fn assert_not_found(result: Result<&Endpoint, Error>) {
        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }

    #[test]
    fn test_find_endpoint_not_found() {
        let cat = demo_catalog();

        assert_not_found(find_endpoint(&cat, "foobar", InterfaceType::Public, None));
        assert_not_found(find_endpoint(
            &cat,
            "identity",
            InterfaceType::Public,
            Some("RegionFoo"),
        ));
        assert_not_found(find_endpoint(&cat, "baremetal", InterfaceType::Internal, None));
    }
}
