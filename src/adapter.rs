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

//! Adapter for a specific service.

use http::header::{HeaderName, HeaderValue};
use reqwest::{Method, Url};

use super::client::{AuthenticatedClient, RequestBuilder};
use super::loading::CloudConfig;
use super::services::{ServiceType, VersionedService};
use super::{ApiVersion, AuthType, EndpointFilters, Error, Session};

/// Adapter for a specific service.
///
/// An `Adapter` is a [Session](struct.Session.html) with a fixed service type, so that the
/// service does not have to be passed to every call. The type parameter is normally one of the
/// constants from the [services](services/index.html) module.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), oscloud::Error> {
/// let adapter = oscloud::Adapter::from_env(oscloud::services::COMPUTE).await?;
/// let response = adapter.get(&["servers"]).await?.send().await?;
/// # Ok(()) }
/// # #[tokio::main]
/// # async fn main() { example().await.unwrap(); }
/// ```
#[derive(Debug, Clone)]
pub struct Adapter<Srv> {
    inner: Session,
    service: Srv,
    default_api_version: Option<(ApiVersion, (HeaderName, HeaderValue))>,
}

impl<Srv> Adapter<Srv> {
    /// Create a new adapter with a given authentication type.
    pub async fn new<Auth: AuthType + 'static>(
        auth_type: Auth,
        service: Srv,
    ) -> Result<Adapter<Srv>, Error> {
        Ok(Session::new(auth_type).await?.into_adapter(service))
    }

    /// Create an adapter for a named cloud from the `clouds.yaml` configuration file.
    pub async fn from_config<S: AsRef<str>>(
        cloud_name: S,
        service: Srv,
    ) -> Result<Adapter<Srv>, Error> {
        Ok(CloudConfig::from_config(cloud_name)?
            .create_session()
            .await?
            .into_adapter(service))
    }

    /// Create an adapter from environment variables.
    pub async fn from_env(service: Srv) -> Result<Adapter<Srv>, Error> {
        Ok(Session::from_env().await?.into_adapter(service))
    }

    pub(crate) fn from_session(session: Session, service: Srv) -> Adapter<Srv> {
        Adapter {
            inner: session,
            service,
            default_api_version: None,
        }
    }

    /// Get a reference to the authentication type in use.
    #[inline]
    pub fn auth_type(&self) -> &dyn AuthType {
        self.inner.auth_type()
    }

    /// Get a reference to the authenticated client in use.
    #[inline]
    pub fn client(&self) -> &AuthenticatedClient {
        self.inner.client()
    }

    /// Default API version used when no version is set on the request.
    #[inline]
    pub fn default_api_version(&self) -> Option<ApiVersion> {
        self.default_api_version.as_ref().map(|x| x.0)
    }

    /// Endpoint filters in use.
    #[inline]
    pub fn endpoint_filters(&self) -> &EndpointFilters {
        self.inner.endpoint_filters()
    }

    /// Modify endpoint filters, clearing the cached service information.
    #[inline]
    pub fn endpoint_filters_mut(&mut self) -> &mut EndpointFilters {
        self.inner.endpoint_filters_mut()
    }

    /// Update the authentication token.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.inner.refresh().await
    }

    /// Session used for this adapter.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.inner
    }

    /// Set a new authentication for this adapter, clearing the cached service information.
    #[inline]
    pub fn set_auth_type<Auth: AuthType + 'static>(&mut self, auth_type: Auth) {
        self.inner.set_auth_type(auth_type);
    }

    /// Set endpoint filters, clearing the cached service information.
    #[inline]
    pub fn set_endpoint_filters(&mut self, filters: EndpointFilters) {
        self.inner.set_endpoint_filters(filters);
    }

    /// Set an override for the endpoint of this service.
    #[inline]
    pub fn set_endpoint_override<S: Into<String>>(&mut self, service_type: S, url: Url) {
        self.inner.set_endpoint_override(service_type, url);
    }

    /// Convert this adapter into one with the provided authentication.
    #[inline]
    pub fn with_auth_type<Auth: AuthType + 'static>(mut self, auth_type: Auth) -> Adapter<Srv> {
        self.set_auth_type(auth_type);
        self
    }

    /// Convert this adapter into one with the provided endpoint filters.
    #[inline]
    pub fn with_endpoint_filters(mut self, filters: EndpointFilters) -> Adapter<Srv> {
        self.set_endpoint_filters(filters);
        self
    }
}

impl<Srv: VersionedService> Adapter<Srv> {
    /// Set the default API version.
    ///
    /// This version will be used for all requests that do not have a version set explicitly.
    pub fn set_default_api_version(&mut self, version: Option<ApiVersion>) {
        self.default_api_version =
            version.map(|ver| (ver, self.service.get_version_header(ver)));
    }

    /// Convert this adapter into one with the provided default API version.
    #[inline]
    pub fn with_default_api_version(mut self, version: Option<ApiVersion>) -> Adapter<Srv> {
        self.set_default_api_version(version);
        self
    }
}

impl<Srv: ServiceType + Send + Clone> Adapter<Srv> {
    /// Get minimum/maximum API (micro)version information.
    pub async fn get_api_versions(&self) -> Result<Option<(ApiVersion, ApiVersion)>, Error> {
        self.inner.get_api_versions(self.service.clone()).await
    }

    /// Construct an endpoint from the path.
    pub async fn get_endpoint<I>(&self, path: I) -> Result<Url, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.inner.get_endpoint(self.service.clone(), path).await
    }

    /// Get the currently used major version of this service.
    pub async fn get_major_version(&self) -> Result<Option<ApiVersion>, Error> {
        self.inner.get_major_version(self.service.clone()).await
    }

    /// Pick the highest API version supported by this service.
    pub async fn pick_api_version<I>(&self, versions: I) -> Result<Option<ApiVersion>, Error>
    where
        I: IntoIterator<Item = ApiVersion>,
        I::IntoIter: Send,
    {
        self.inner
            .pick_api_version(self.service.clone(), versions)
            .await
    }

    /// Check if this service supports the requested API version.
    pub async fn supports_api_version(&self, version: ApiVersion) -> Result<bool, Error> {
        self.inner
            .supports_api_version(self.service.clone(), version)
            .await
    }

    /// Start an HTTP request.
    ///
    /// If a default API version is set, it is added to the resulting builder.
    pub async fn request<I>(&self, method: Method, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        let builder = self
            .inner
            .request(self.service.clone(), method, path)
            .await?;
        Ok(match &self.default_api_version {
            Some((_ver, (name, value))) => builder.header(name.clone(), value.clone()),
            None => builder,
        })
    }

    /// Start a GET request.
    #[inline]
    pub async fn get<I>(&self, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(Method::GET, path).await
    }

    /// Start a POST request.
    #[inline]
    pub async fn post<I>(&self, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(Method::POST, path).await
    }

    /// Start a PUT request.
    #[inline]
    pub async fn put<I>(&self, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(Method::PUT, path).await
    }

    /// Start a PATCH request.
    #[inline]
    pub async fn patch<I>(&self, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(Method::PATCH, path).await
    }

    /// Start a DELETE request.
    #[inline]
    pub async fn delete<I>(&self, path: I) -> Result<RequestBuilder<Srv>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        self.request(Method::DELETE, path).await
    }
}

impl<Srv> From<Adapter<Srv>> for Session {
    fn from(value: Adapter<Srv>) -> Session {
        value.inner
    }
}

#[cfg(test)]
mod test {
    use super::super::services::{BAREMETAL, COMPUTE};
    use super::super::session::test::{new_simple_session, URL};
    use super::super::ApiVersion;

    #[tokio::test]
    async fn test_get_endpoint() {
        let adapter = new_simple_session(URL).await.into_adapter(COMPUTE);
        let ep = adapter.get_endpoint(&["servers"]).await.unwrap();
        assert_eq!(&ep.to_string(), "http://127.0.0.1:5000/servers");
    }

    #[tokio::test]
    async fn test_default_api_version() {
        let adapter = new_simple_session(URL)
            .await
            .into_adapter(BAREMETAL)
            .with_default_api_version(Some(ApiVersion(1, 42)));
        assert_eq!(adapter.default_api_version(), Some(ApiVersion(1, 42)));
    }
}
