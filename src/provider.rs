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
//! # Provider client
//!
//! The authenticated handle: HTTP client bound to the identity service
//! together with the current token and the service catalog. All service
//! clients are derived from it.
use std::sync::{RwLock, RwLockReadGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use tracing::{debug, info};
use url::Url;

use crate::auth::AuthOptions;
use crate::auth::types::{Catalog, ErrorResponse, TokenResponse};
use crate::catalog::{EndpointOpts, normalize_url};
use crate::error::AccessError;
use crate::tls::TlsConfig;

/// Header carrying the issued token.
static SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Result of a successful authentication.
#[derive(Clone, Debug)]
pub struct Session {
    /// The token.
    pub token: SecretString,
    /// The date and time when the token expires.
    pub expires_at: DateTime<Utc>,
    /// ID of the authenticated user.
    pub user_id: String,
    /// ID of the project the token is scoped to.
    pub project_id: Option<String>,
    /// The service catalog.
    pub catalog: Catalog,
}

/// Authenticated provider client.
#[derive(Debug)]
pub struct ProviderClient {
    /// HTTP client with the configured TLS settings.
    http_client: Client,
    /// Identity v3 base url (with the trailing slash).
    identity_endpoint: Url,
    /// Options the session was obtained with.
    auth_options: AuthOptions,
    /// Current session.
    session: RwLock<Session>,
}

/// Whether the path segment is an API version like `v3` or `v2.0`.
fn is_version_segment(segment: &str) -> bool {
    segment.strip_prefix('v').is_some_and(|version| {
        version.starts_with(|c: char| c.is_ascii_digit())
            && version.chars().all(|c| c.is_ascii_digit() || c == '.')
    })
}

/// Derive the identity v3 base url from the configured endpoint.
///
/// A trailing version segment is replaced, so `https://id.example/v2.0` and
/// `https://id.example/v3` both become `https://id.example/v3/`. An
/// unversioned `https://id.example/identity` gets `v3/` appended.
pub fn identity_base_url(endpoint: &str) -> Result<Url, AccessError> {
    let mut url = normalize_url(endpoint)?;
    let path = url.path().trim_end_matches('/');
    let base = match path.rsplit_once('/') {
        Some((parent, last)) if is_version_segment(last) => format!("{parent}/"),
        _ => format!("{path}/"),
    };
    url.set_path(&base);
    Ok(url.join("v3/")?)
}

/// Build the HTTP client with the TLS settings applied.
pub fn build_http_client(tls: TlsConfig) -> Result<Client, AccessError> {
    let builder = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(90));
    Ok(tls.apply(builder).build()?)
}

/// Obtain the token from the identity service.
#[tracing::instrument(level = "debug", skip(http_client, options))]
async fn request_token(
    http_client: &Client,
    identity_endpoint: &Url,
    options: &AuthOptions,
) -> Result<Session, AccessError> {
    let body = options.to_auth_request()?;
    let response = http_client
        .post(identity_endpoint.join("auth/tokens")?)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
        debug!("Identity service returned {:?}", response);
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|err| err.error.message)
            .unwrap_or(text);
        return Err(AccessError::Authentication { status, message });
    }

    let token = SecretString::from(
        response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|val| val.to_str().ok())
            .ok_or(AccessError::MissingSubjectToken)?
            .to_string(),
    );
    let data: TokenResponse = response.json().await?;
    info!(
        "Authenticated user {} (token expires at {})",
        data.token.user.id, data.token.expires_at
    );

    Ok(Session {
        token,
        expires_at: data.token.expires_at,
        user_id: data.token.user.id,
        project_id: data.token.project.map(|project| project.id),
        catalog: data.token.catalog.unwrap_or_default(),
    })
}

impl ProviderClient {
    /// Authenticate with the options and return the handle.
    ///
    /// # Arguments
    /// * `tls` - TLS settings of the transport.
    /// * `options` - resolved authentication options.
    ///
    /// # Returns
    /// * Success with the authenticated [`ProviderClient`].
    /// * `AccessError::AuthOptions` when the options are incomplete.
    /// * `AccessError::Http` when the identity service cannot be reached.
    /// * `AccessError::Authentication` when the credentials are rejected.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn authenticate(tls: TlsConfig, options: AuthOptions) -> Result<Self, AccessError> {
        let identity_endpoint = identity_base_url(options.endpoint()?)?;
        let http_client = build_http_client(tls)?;
        let session = request_token(&http_client, &identity_endpoint, &options).await?;
        Ok(Self {
            http_client,
            identity_endpoint,
            auth_options: options,
            session: RwLock::new(session),
        })
    }

    /// Obtain a new token with the stored options.
    ///
    /// Only possible when `allow_reauth` is set in the options.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn reauthenticate(&self) -> Result<(), AccessError> {
        if !self.auth_options.allow_reauth {
            return Err(AccessError::ReauthenticationDisabled);
        }
        let session =
            request_token(&self.http_client, &self.identity_endpoint, &self.auth_options).await?;
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
        Ok(())
    }

    fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// HTTP client with the configured TLS settings.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Identity v3 base url.
    pub fn identity_endpoint(&self) -> &Url {
        &self.identity_endpoint
    }

    /// Options the session was obtained with.
    pub fn auth_options(&self) -> &AuthOptions {
        &self.auth_options
    }

    /// Current token.
    pub fn token(&self) -> SecretString {
        self.session().token.clone()
    }

    /// Expiration of the current token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.session().expires_at
    }

    /// Copy of the current session.
    pub fn current_session(&self) -> Session {
        self.session().clone()
    }

    /// Locate the service endpoint in the current catalog.
    pub fn endpoint_url(&self, opts: &EndpointOpts) -> Result<Url, AccessError> {
        self.session().catalog.endpoint_url(opts)
    }
}
