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
//! # Access configuration
//!
//! User provided settings of the access to the cloud.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::File;
use derive_builder::Builder;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::auth::{AuthField, AuthInfo, non_empty, non_empty_secret};
use crate::cloud_config::CloudProfile;
use crate::endpoint_type::{Availability, validate_endpoint_type};
use crate::env::*;
use crate::error::{AccessError, BuilderError};
use crate::provider::ProviderClient;

/// Access configuration.
///
/// Every field is optional. Unset fields may be filled from the environment
/// and from the cloud profile during [`AccessConfig::prepare`].
#[derive(Builder, Clone, Debug, Default, Deserialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into), default)]
#[serde(default)]
pub struct AccessConfig {
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<SecretString>,
    /// Identity service url.
    pub identity_endpoint: Option<String>,
    /// Project ID.
    pub tenant_id: Option<String>,
    /// Project name.
    pub tenant_name: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    /// Skip the server certificate verification.
    pub insecure: bool,
    pub region: Option<String>,
    /// One of `public`, `internal`, `admin` (or the legacy `publicURL`,
    /// `internalURL`, `adminURL`). Defaults to public.
    pub endpoint_type: Option<String>,
    /// CA bundle location.
    #[serde(rename = "cacert")]
    pub cacert_file: Option<PathBuf>,
    /// Client certificate location.
    #[serde(rename = "cert")]
    pub client_cert_file: Option<PathBuf>,
    /// Client key location.
    #[serde(rename = "key")]
    pub client_key_file: Option<PathBuf>,
    /// Existing token to authenticate with.
    pub token: Option<SecretString>,
    /// Name of the cloud in `clouds.yaml`.
    pub cloud: Option<String>,

    /// Authenticated handle, set by `prepare`.
    #[serde(skip)]
    #[builder(setter(skip))]
    pub(crate) provider: Option<Arc<ProviderClient>>,
}

fn secret_fallback<E>(value: Option<SecretString>, names: &[&str], env: &E) -> Option<SecretString>
where
    E: Environment + ?Sized,
{
    if non_empty_secret(&value).is_some() {
        return value;
    }
    fallback(None, names, env).map(SecretString::from)
}

fn path_fallback<E>(value: Option<PathBuf>, names: &[&str], env: &E) -> Option<PathBuf>
where
    E: Environment + ?Sized,
{
    if value
        .as_ref()
        .is_some_and(|path| !path.as_os_str().is_empty())
    {
        return value;
    }
    fallback(None, names, env).map(PathBuf::from)
}

fn is_unset_path(value: &Option<PathBuf>) -> bool {
    value.as_ref().is_none_or(|path| path.as_os_str().is_empty())
}

impl AccessConfig {
    /// Load the configuration from the file.
    ///
    /// The format is derived from the file extension (`yaml`, `json`,
    /// `toml`, `ini`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AccessError> {
        let path = path.as_ref();
        config::Config::builder()
            .add_source(File::from(path))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|source| AccessError::Config {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Fill the unset fields from the environment.
    ///
    /// The legacy `SDK_*` variables are consulted first, the standard `OS_*`
    /// variables afterwards. Non-empty fields are never replaced.
    pub fn apply_env_fallbacks<E: Environment + ?Sized>(&mut self, env: &E) {
        self.password = secret_fallback(self.password.take(), &[SDK_PASSWORD], env);
        self.region = fallback(self.region.take(), &[SDK_REGION, OS_REGION_NAME], env);
        self.tenant_name = fallback(self.tenant_name.take(), &[SDK_PROJECT], env);
        self.username = fallback(self.username.take(), &[SDK_USERNAME], env);

        self.cloud = fallback(self.cloud.take(), &[OS_CLOUD], env);
        self.cacert_file = path_fallback(self.cacert_file.take(), &[OS_CACERT], env);
        self.client_cert_file = path_fallback(self.client_cert_file.take(), &[OS_CERT], env);
        self.client_key_file = path_fallback(self.client_key_file.take(), &[OS_KEY], env);
    }

    /// Take the region, the endpoint type and the TLS settings from the
    /// profile where they are not configured.
    ///
    /// The profile `interface` is validated like an explicit endpoint type.
    pub fn apply_profile(&mut self, profile: &CloudProfile) -> Result<(), AccessError> {
        if non_empty(&self.endpoint_type).is_none()
            && let Some(interface) = non_empty(&profile.interface)
        {
            validate_endpoint_type(interface)?;
            self.endpoint_type = Some(interface.into());
        }
        if non_empty(&self.region).is_none() && non_empty(&profile.region_name).is_some() {
            self.region = profile.region_name.clone();
        }
        if is_unset_path(&self.cacert_file) {
            self.cacert_file = profile.cacert.clone();
        }
        if is_unset_path(&self.client_cert_file) {
            self.client_cert_file = profile.cert.clone();
        }
        if is_unset_path(&self.client_key_file) {
            self.client_key_file = profile.key.clone();
        }
        if profile.verify == Some(false) {
            self.insecure = true;
        }
        Ok(())
    }

    /// Authentication information from the explicit fields.
    pub fn auth_info(&self) -> AuthInfo {
        AuthInfo {
            auth_url: self.identity_endpoint.clone(),
            domain_id: self.domain_id.clone(),
            domain_name: self.domain_name.clone(),
            password: self.password.clone(),
            project_id: self.tenant_id.clone(),
            project_name: self.tenant_name.clone(),
            token: self.token.clone(),
            username: self.username.clone(),
            user_id: self.user_id.clone(),
        }
    }

    /// Explicit fields that override the resolved authentication options,
    /// in the order they are applied.
    pub fn overrides(&self) -> [(AuthField, Option<&str>); 9] {
        [
            (AuthField::Username, non_empty(&self.username)),
            (AuthField::UserId, non_empty(&self.user_id)),
            (
                AuthField::Password,
                non_empty_secret(&self.password).map(|val| val.expose_secret()),
            ),
            (
                AuthField::IdentityEndpoint,
                non_empty(&self.identity_endpoint),
            ),
            (AuthField::TenantId, non_empty(&self.tenant_id)),
            (AuthField::TenantName, non_empty(&self.tenant_name)),
            (AuthField::DomainId, non_empty(&self.domain_id)),
            (AuthField::DomainName, non_empty(&self.domain_name)),
            (
                AuthField::Token,
                non_empty_secret(&self.token).map(|val| val.expose_secret()),
            ),
        ]
    }

    /// Endpoint availability resolved from the endpoint type.
    pub fn availability(&self) -> Availability {
        Availability::from_endpoint_type(self.endpoint_type.as_deref().unwrap_or_default())
    }

    /// Whether the authentication already took place.
    pub fn is_prepared(&self) -> bool {
        self.provider.is_some()
    }

    /// The authenticated handle.
    pub fn provider(&self) -> Result<&Arc<ProviderClient>, AccessError> {
        self.provider.as_ref().ok_or(AccessError::NotPrepared)
    }
}
