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

//! Asynchronous session for OpenStack API calls.

use std::sync::Arc;

use reqwest::{Client, Method, Url};

use super::cache::EndpointCache;
use super::client::{AuthenticatedClient, RequestBuilder};
use super::loading::CloudConfig;
use super::services::ServiceType;
use super::url;
use super::{Adapter, ApiVersion, AuthType, EndpointFilters, Error};

/// An OpenStack API session.
///
/// The session does not own the connection to the cloud, only caches the service catalog
/// information. Cloning a `Session` is cheap: clones share the authentication and the endpoint
/// cache. Changing endpoint filters or overrides detaches the clone's cache first.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), oscloud::Error> {
/// let session = oscloud::Session::from_env().await?;
/// let response = session
///     .get(oscloud::services::COMPUTE, &["servers"])
///     .await?
///     .send()
///     .await?;
/// # Ok(()) }
/// # #[tokio::main]
/// # async fn main() { example().await.unwrap(); }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    client: AuthenticatedClient,
    cache: Arc<EndpointCache>,
}

impl Session {
    /// Create a new session with a given authentication type.
    ///
    /// Refreshes the authentication to verify it before returning.
    pub async fn new<Auth: AuthType + 'static>(auth_type: Auth) -> Result<Session, Error> {
        Ok(AuthenticatedClient::new(Client::new(), auth_type)
            .await?
            .into())
    }

    /// Create a session from a named cloud in the `clouds.yaml` configuration file.
    pub async fn from_config<S: AsRef<str>>(cloud_name: S) -> Result<Session, Error> {
        CloudConfig::from_config(cloud_name)?.create_session().await
    }

    /// Create a session from environment variables.
    ///
    /// Uses `OS_CLOUD` to load a named cloud from the configuration files, otherwise reads the
    /// authentication parameters from the `OS_*` variables directly.
    pub async fn from_env() -> Result<Session, Error> {
        CloudConfig::from_env()?.create_session().await
    }

    /// Create an adapter for the specific service type.
    ///
    /// An adapter is a view of this session bound to one service, so that the service does not
    /// need to be passed to every call.
    ///
    /// ```rust,no_run
    /// # async fn example() -> Result<(), oscloud::Error> {
    /// let session = oscloud::Session::from_env().await?;
    /// let adapter = session.adapter(oscloud::services::COMPUTE);
    /// # Ok(()) }
    /// # #[tokio::main]
    /// # async fn main() { example().await.unwrap(); }
    /// ```
    #[inline]
    pub fn adapter<Srv>(&self, service: Srv) -> Adapter<Srv> {
        Adapter::from_session(self.clone(), service)
    }

    /// Convert this session into an adapter for the specific service type.
    #[inline]
    pub fn into_adapter<Srv>(self, service: Srv) -> Adapter<Srv> {
        Adapter::from_session(self, service)
    }

    /// Get a reference to the authentication type in use.
    #[inline]
    pub fn auth_type(&self) -> &dyn AuthType {
        self.client.auth_type()
    }

    /// Get a reference to the authenticated client in use.
    #[inline]
    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Endpoint filters in use.
    #[inline]
    pub fn endpoint_filters(&self) -> &EndpointFilters {
        &self.cache.filters
    }

    /// Modify endpoint filters.
    ///
    /// This call clears the cached service information for this session. It does not, however,
    /// affect clones of this session.
    #[inline]
    pub fn endpoint_filters_mut(&mut self) -> &mut EndpointFilters {
        &mut self.reset_cache().filters
    }

    /// Update the authentication token.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.client.refresh().await
    }

    /// Set a new authentication for this session.
    ///
    /// This call clears the cached service information for this session. It does not, however,
    /// affect clones of this session.
    #[inline]
    pub fn set_auth_type<Auth: AuthType + 'static>(&mut self, auth_type: Auth) {
        self.client.set_auth_type(auth_type);
        let _ = self.reset_cache();
    }

    /// Set endpoint filters, clearing the cached service information.
    #[inline]
    pub fn set_endpoint_filters(&mut self, filters: EndpointFilters) {
        self.reset_cache().filters = filters;
    }

    /// Set an override for the endpoint of the given service.
    ///
    /// Overrides bypass both the service catalog and version discovery.
    #[inline]
    pub fn set_endpoint_override<S: Into<String>>(&mut self, service_type: S, url: Url) {
        let _ = self
            .reset_cache()
            .overrides
            .insert(service_type.into(), url);
    }

    /// Convert this session into one with the provided authentication.
    #[inline]
    pub fn with_auth_type<Auth: AuthType + 'static>(mut self, auth_type: Auth) -> Session {
        self.set_auth_type(auth_type);
        self
    }

    /// Convert this session into one with the provided endpoint filters.
    #[inline]
    pub fn with_endpoint_filters(mut self, filters: EndpointFilters) -> Session {
        self.set_endpoint_filters(filters);
        self
    }

    /// Convert this session into one with an endpoint override for the given service.
    #[inline]
    pub fn with_endpoint_override<S: Into<String>>(mut self, service_type: S, url: Url) -> Session {
        self.set_endpoint_override(service_type, url);
        self
    }

    /// Get minimum/maximum API (micro)version information.
    ///
    /// Returns `None` if the range is not known, for example because the service does not
    /// support microversions.
    pub async fn get_api_versions<Srv: ServiceType + Send>(
        &self,
        service: Srv,
    ) -> Result<Option<(ApiVersion, ApiVersion)>, Error> {
        self.cache
            .extract_service_info(&self.client, service, |info| {
                match (info.minimum_version, info.current_version) {
                    (Some(min), Some(max)) => Some((min, max)),
                    _ => None,
                }
            })
            .await
    }

    /// Construct an endpoint for the given service from the path.
    pub async fn get_endpoint<Srv, I>(&self, service: Srv, path: I) -> Result<Url, Error>
    where
        Srv: ServiceType + Send,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        let path_iter = path.into_iter();
        self.cache
            .extract_service_info(&self.client, service, |info| {
                url::extend(info.root_url.clone(), path_iter)
            })
            .await
    }

    /// Get the currently used major version of the given service.
    ///
    /// Can return `None` if the service does not support major versions.
    pub async fn get_major_version<Srv: ServiceType + Send>(
        &self,
        service: Srv,
    ) -> Result<Option<ApiVersion>, Error> {
        self.cache
            .extract_service_info(&self.client, service, |info| info.major_version)
            .await
    }

    /// Pick the highest API version supported by the service.
    ///
    /// Returns `None` if none of the requested versions are available.
    pub async fn pick_api_version<Srv, I>(
        &self,
        service: Srv,
        versions: I,
    ) -> Result<Option<ApiVersion>, Error>
    where
        Srv: ServiceType + Send,
        I: IntoIterator<Item = ApiVersion>,
        I::IntoIter: Send,
    {
        let iter = versions.into_iter();
        self.cache
            .extract_service_info(&self.client, service, |info| info.pick_api_version(iter))
            .await
    }

    /// Check if the service supports the requested API version.
    pub async fn supports_api_version<Srv: ServiceType + Send>(
        &self,
        service: Srv,
        version: ApiVersion,
    ) -> Result<bool, Error> {
        self.cache
            .extract_service_info(&self.client, service, |info| {
                info.supports_api_version(version)
            })
            .await
    }

    /// Start an HTTP request to the given service.
    ///
    /// The `path` argument is a URL path relative to the service endpoint, broken into segments
    /// (query parameters are not supported here, use
    /// [query](client/struct.RequestBuilder.html#method.query) on the resulting builder).
    ///
    /// The result is a `RequestBuilder` that can be customized and sent later.
    pub async fn request<Srv, I>(
        &self,
        service: Srv,
        method: Method,
        path: I,
    ) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        let url = self.get_endpoint(service.clone(), path).await?;
        Ok(self.client.request_service(service, method, url))
    }

    /// Start a GET request.
    #[inline]
    pub async fn get<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(service, Method::GET, path).await
    }

    /// Start a POST request.
    #[inline]
    pub async fn post<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(service, Method::POST, path).await
    }

    /// Start a PUT request.
    #[inline]
    pub async fn put<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(service, Method::PUT, path).await
    }

    /// Start a PATCH request.
    #[inline]
    pub async fn patch<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(service, Method::PATCH, path).await
    }

    /// Start a DELETE request.
    #[inline]
    pub async fn delete<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        Srv: ServiceType + Send + Clone,
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(service, Method::DELETE, path).await
    }

    fn reset_cache(&mut self) -> &mut EndpointCache {
        // Arc::make_mut uses EndpointCache::clone, which drops the cached service information
        // but keeps filters and overrides.
        Arc::make_mut(&mut self.cache)
    }

    pub(crate) fn new_with_cache(client: AuthenticatedClient, cache: EndpointCache) -> Session {
        Session {
            client,
            cache: Arc::new(cache),
        }
    }
}

impl From<AuthenticatedClient> for Session {
    fn from(value: AuthenticatedClient) -> Session {
        Session::new_with_cache(value, EndpointCache::new())
    }
}

impl From<Session> for AuthenticatedClient {
    fn from(value: Session) -> AuthenticatedClient {
        value.client
    }
}

#[cfg(test)]
pub(crate) mod test {
    use reqwest::Url;

    use super::super::cache::EndpointCache;
    use super::super::client::AuthenticatedClient;
    use super::super::protocol::ServiceInfo;
    use super::super::services::{COMPUTE, OBJECT_STORAGE};
    use super::Session;

    pub(crate) const URL: &str = "http://127.0.0.1:5000/";

    pub(crate) async fn new_simple_session(url: &str) -> Session {
        let service_info = ServiceInfo {
            root_url: Url::parse(url).unwrap(),
            major_version: None,
            current_version: None,
            minimum_version: None,
        };
        new_session(url, service_info).await
    }

    pub(crate) async fn new_session(url: &str, service_info: ServiceInfo) -> Session {
        let client = AuthenticatedClient::new_noauth(url).await;
        let cache = EndpointCache::new_with("compute", service_info);
        Session::new_with_cache(client, cache)
    }

    #[tokio::test]
    async fn test_get_endpoint() {
        let s = new_simple_session(URL).await;
        let ep = s.get_endpoint(COMPUTE, &[""; 0]).await.unwrap();
        assert_eq!(&ep.to_string(), URL);
    }

    #[tokio::test]
    async fn test_get_endpoint_with_path() {
        let s = new_simple_session(URL).await;
        let ep = s.get_endpoint(COMPUTE, &["servers", "42"]).await.unwrap();
        assert_eq!(&ep.to_string(), "http://127.0.0.1:5000/servers/42");
    }

    #[tokio::test]
    async fn test_clone_shares_cache_until_mutated() {
        let s = new_simple_session(URL).await;
        let mut s2 = s.clone();

        // Clones resolve from the shared cache.
        let ep = s2.get_endpoint(COMPUTE, &[""; 0]).await.unwrap();
        assert_eq!(&ep.to_string(), URL);

        // An override mutation detaches the clone's cache from the original.
        s2.set_endpoint_override("object-store", Url::parse("http://127.0.0.1:8080/").unwrap());
        let ep = s2.get_endpoint(OBJECT_STORAGE, &[""; 0]).await.unwrap();
        assert_eq!(&ep.to_string(), "http://127.0.0.1:8080/");

        let ep = s.get_endpoint(OBJECT_STORAGE, &[""; 0]).await.unwrap();
        assert_eq!(&ep.to_string(), URL);
    }

    #[tokio::test]
    async fn test_get_major_version() {
        let s = new_session(
            URL,
            ServiceInfo {
                root_url: Url::parse(URL).unwrap(),
                major_version: Some((2, 1).into()),
                current_version: Some((2, 42).into()),
                minimum_version: Some((2, 1).into()),
            },
        )
        .await;
        let version = s.get_major_version(COMPUTE).await.unwrap();
        assert_eq!(version, Some((2, 1).into()));
    }

    #[tokio::test]
    async fn test_pick_api_version() {
        let s = new_session(
            URL,
            ServiceInfo {
                root_url: Url::parse(URL).unwrap(),
                major_version: Some((2, 1).into()),
                current_version: Some((2, 42).into()),
                minimum_version: Some((2, 1).into()),
            },
        )
        .await;
        let version = s
            .pick_api_version(COMPUTE, vec![(2, 30).into(), (2, 50).into()])
            .await
            .unwrap();
        assert_eq!(version, Some((2, 30).into()));
        assert!(s.supports_api_version(COMPUTE, (2, 30).into()).await.unwrap());
        assert!(!s.supports_api_version(COMPUTE, (2, 50).into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_endpoint_override() {
        let mut s = new_simple_session(URL).await;
        s.set_endpoint_override("baremetal", Url::parse("http://127.0.0.1:6385/").unwrap());
        assert_eq!(
            s.cache.overrides.get("baremetal").unwrap().as_str(),
            "http://127.0.0.1:6385/"
        );
    }
}
