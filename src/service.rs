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
//
// SPDX-License-Identifier: Apache-2.0
//! # Service clients
use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderValue;
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use tracing::debug;
use url::Url;

use crate::catalog::EndpointOpts;
use crate::endpoint_type::Availability;
use crate::error::AccessError;
use crate::provider::ProviderClient;

/// Header carrying the token on the service requests.
static AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Supported services.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceType {
    /// Compute service (v2).
    ComputeV2,
    /// Image service (v2).
    ImageV2,
    /// Block storage service (v3).
    BlockStorageV3,
}

impl ServiceType {
    /// Service type in the catalog.
    pub fn catalog_type(&self) -> &'static str {
        match self {
            Self::ComputeV2 => "compute",
            Self::ImageV2 => "image",
            Self::BlockStorageV3 => "volumev3",
        }
    }

    /// Path appended to the catalog url to form the resource base.
    fn resource_suffix(&self) -> &'static str {
        match self {
            Self::ImageV2 => "v2/",
            Self::ComputeV2 | Self::BlockStorageV3 => "",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_type())
    }
}

/// Client of a single service.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    provider: Arc<ProviderClient>,
    service_type: ServiceType,
    region: Option<String>,
    availability: Availability,
    /// Endpoint url from the catalog.
    endpoint: Url,
    /// Base for the resource urls.
    resource_base: Url,
}

impl ServiceClient {
    /// Derive the service client from the provider.
    ///
    /// No network calls are made: the endpoint is taken from the catalog
    /// obtained during the authentication.
    pub fn new(
        provider: Arc<ProviderClient>,
        service_type: ServiceType,
        region: Option<String>,
        availability: Availability,
    ) -> Result<Self, AccessError> {
        let endpoint = provider.endpoint_url(&EndpointOpts {
            service_type: service_type.catalog_type().into(),
            region: region.clone(),
            availability,
        })?;
        let resource_base = endpoint.join(service_type.resource_suffix())?;
        debug!("Using {} endpoint {}", service_type, resource_base);
        Ok(Self {
            provider,
            service_type,
            region,
            availability,
            endpoint,
            resource_base,
        })
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Endpoint url as found in the catalog.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Base url of the service resources.
    pub fn resource_base(&self) -> &Url {
        &self.resource_base
    }

    /// The authenticated provider.
    pub fn provider(&self) -> &Arc<ProviderClient> {
        &self.provider
    }

    /// Url of the resource relative to the resource base.
    pub fn url(&self, path: &str) -> Result<Url, AccessError> {
        Ok(self.resource_base.join(path.trim_start_matches('/'))?)
    }

    /// Prepare the authenticated request to the service resource.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AccessError> {
        let mut token = HeaderValue::from_str(self.provider.token().expose_secret())
            .map_err(|_| AccessError::InvalidToken)?;
        token.set_sensitive(true);
        Ok(self
            .provider
            .http_client()
            .request(method, self.url(path)?)
            .header(AUTH_TOKEN_HEADER, token))
    }
}

#[cfg(test)]
mod tests {
    use eyre::Result;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::auth::AuthOptionsBuilder;
    use crate::tests::mock_token_create;
    use crate::tls::TlsConfig;

    async fn provider(server: &MockServer) -> Result<Arc<ProviderClient>> {
        mock_token_create(server, "tok", &server.base_url()).await;
        let options = AuthOptionsBuilder::default()
            .identity_endpoint(server.url("/v3"))
            .username("u")
            .password("p")
            .build()?;
        Ok(Arc::new(
            ProviderClient::authenticate(TlsConfig::default(), options).await?,
        ))
    }

    #[tokio::test]
    async fn test_service_endpoints() -> Result<()> {
        let server = MockServer::start_async().await;
        let provider = provider(&server).await?;
        let base = server.base_url();

        let compute = ServiceClient::new(
            provider.clone(),
            ServiceType::ComputeV2,
            Some("RegionOne".into()),
            Availability::Internal,
        )?;
        assert_eq!(format!("{base}/compute-internal/v2.1/"), compute.resource_base().as_str());
        assert_eq!(Availability::Internal, compute.availability());
        assert_eq!(Some("RegionOne"), compute.region());

        let image = ServiceClient::new(
            provider.clone(),
            ServiceType::ImageV2,
            None,
            Availability::Public,
        )?;
        assert_eq!(format!("{base}/image/"), image.endpoint().as_str());
        assert_eq!(format!("{base}/image/v2/"), image.resource_base().as_str());

        let volume = ServiceClient::new(
            provider.clone(),
            ServiceType::BlockStorageV3,
            Some("RegionOne".into()),
            Availability::Public,
        )?;
        assert_eq!(format!("{base}/volume/v3/pid/"), volume.resource_base().as_str());

        assert!(matches!(
            ServiceClient::new(
                provider,
                ServiceType::BlockStorageV3,
                Some("RegionOne".into()),
                Availability::Admin,
            ),
            Err(AccessError::EndpointNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_request() -> Result<()> {
        let server = MockServer::start_async().await;
        let provider = provider(&server).await?;
        let flavors = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/flavors")
                    .header("x-auth-token", "tok");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"flavors": []}));
            })
            .await;

        let compute = ServiceClient::new(
            provider,
            ServiceType::ComputeV2,
            None,
            Availability::Public,
        )?;
        let rsp = compute.request(Method::GET, "/flavors")?.send().await?;
        assert!(rsp.status().is_success());
        flavors.assert_async().await;
        Ok(())
    }
}
