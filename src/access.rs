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
//! # Access preparation
//!
//! Turn the [`AccessConfig`] into the authenticated provider and derive the
//! service clients from it.
use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{AuthOptions, AuthSource, non_empty};
use crate::cloud_config::{CloudConfigSource, CloudsYaml};
use crate::config::AccessConfig;
use crate::endpoint_type::validate_endpoint_type;
use crate::env::{Environment, SystemEnv};
use crate::error::AccessError;
use crate::provider::ProviderClient;
use crate::service::{ServiceClient, ServiceType};
use crate::tls::TlsConfig;

impl AccessConfig {
    /// Validate the configuration and authenticate.
    ///
    /// The process environment and the standard `clouds.yaml` locations are
    /// used.
    pub async fn prepare(&mut self) -> Result<(), Vec<AccessError>> {
        let env = SystemEnv;
        let clouds = CloudsYaml::from_env(&env);
        self.prepare_with(&env, &clouds).await
    }

    /// Validate the configuration and authenticate using the given
    /// environment and profile store.
    ///
    /// # Returns
    /// * `Ok(())` with the provider handle stored.
    /// * `Err` with exactly one error. The handle is left untouched.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn prepare_with<E, C>(&mut self, env: &E, clouds: &C) -> Result<(), Vec<AccessError>>
    where
        E: Environment + ?Sized,
        C: CloudConfigSource + ?Sized,
    {
        match self.authenticate(env, clouds).await {
            Ok(provider) => {
                info!(
                    "Authenticated as {} against {}",
                    provider.current_session().user_id,
                    provider.identity_endpoint()
                );
                self.provider = Some(Arc::new(provider));
                Ok(())
            }
            Err(err) => Err(vec![err]),
        }
    }

    async fn authenticate<E, C>(&mut self, env: &E, clouds: &C) -> Result<ProviderClient, AccessError>
    where
        E: Environment + ?Sized,
        C: CloudConfigSource + ?Sized,
    {
        let options = self.resolve_auth_options(env, clouds)?;
        let tls = TlsConfig::from_files(
            self.cacert_file.as_deref(),
            self.client_cert_file.as_deref(),
            self.client_key_file.as_deref(),
            self.insecure,
        )
        .await?;
        ProviderClient::authenticate(tls, options).await
    }

    /// Resolve the final authentication options.
    ///
    /// Validates the endpoint type, applies the environment fallbacks and the
    /// cloud profile to the configuration and merges the explicit fields over
    /// the options resolved from the profile.
    pub fn resolve_auth_options<E, C>(
        &mut self,
        env: &E,
        clouds: &C,
    ) -> Result<AuthOptions, AccessError>
    where
        E: Environment + ?Sized,
        C: CloudConfigSource + ?Sized,
    {
        if let Some(endpoint_type) = &self.endpoint_type {
            validate_endpoint_type(endpoint_type)?;
        }

        self.apply_env_fallbacks(env);

        let mut options = match non_empty(&self.cloud).map(ToOwned::to_owned) {
            Some(cloud) => {
                debug!("Using cloud profile {}", cloud);
                let profile = clouds.get_cloud(&cloud)?;
                self.apply_profile(&profile)?;
                AuthOptions::resolve(&AuthSource::Cloud(&profile))?
            }
            None => AuthOptions::resolve(&AuthSource::Explicit(self.auth_info()))?,
        };
        options.allow_reauth = true;

        for (field, value) in self.overrides() {
            if let Some(value) = value {
                options.set(field, value);
            }
        }
        options.validate()?;
        Ok(options)
    }

    fn service_client(&self, service_type: ServiceType) -> Result<ServiceClient, AccessError> {
        ServiceClient::new(
            self.provider()?.clone(),
            service_type,
            non_empty(&self.region).map(Into::into),
            self.availability(),
        )
    }

    /// Compute (v2) service client.
    pub fn compute_v2_client(&self) -> Result<ServiceClient, AccessError> {
        self.service_client(ServiceType::ComputeV2)
    }

    /// Image (v2) service client.
    pub fn image_v2_client(&self) -> Result<ServiceClient, AccessError> {
        self.service_client(ServiceType::ImageV2)
    }

    /// Block storage (v3) service client.
    pub fn block_storage_v3_client(&self) -> Result<ServiceClient, AccessError> {
        self.service_client(ServiceType::BlockStorageV3)
    }
}
