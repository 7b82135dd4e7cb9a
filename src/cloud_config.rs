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
//! # Cloud profiles
//!
//! Named connection profiles stored in `clouds.yaml`. Secrets may be kept in
//! a separate `secure.yaml` which is merged over the profiles.
use std::collections::HashMap;
use std::path::PathBuf;

use config::{File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::env::{Environment, OS_CLIENT_CONFIG_FILE, OS_CLIENT_SECURE_FILE};
use crate::error::AccessError;

static CLOUDS_FILE_NAME: &str = "clouds.yaml";
static SECURE_FILE_NAME: &str = "secure.yaml";

/// Content of the `clouds.yaml` file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CloudsFile {
    /// Cloud profiles by name.
    #[serde(default)]
    pub clouds: HashMap<String, CloudProfile>,
}

/// Single cloud profile.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CloudProfile {
    /// Authentication information.
    #[serde(default)]
    pub auth: ProfileAuth,
    /// Authentication plugin (`password`, `token`, `v3applicationcredential`,
    /// ...).
    pub auth_type: Option<String>,
    /// Region name.
    pub region_name: Option<String>,
    /// Preferred endpoint interface.
    pub interface: Option<String>,
    /// Identity API version.
    pub identity_api_version: Option<String>,
    /// Whether the server certificate must be verified.
    pub verify: Option<bool>,
    /// CA bundle location.
    pub cacert: Option<PathBuf>,
    /// Client certificate location.
    pub cert: Option<PathBuf>,
    /// Client key location.
    pub key: Option<PathBuf>,
}

/// The `auth` section of a cloud profile.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileAuth {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<SecretString>,
    #[serde(alias = "tenant_id")]
    pub project_id: Option<String>,
    #[serde(alias = "tenant_name")]
    pub project_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    pub default_domain: Option<String>,
    pub token: Option<SecretString>,
    pub application_credential_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_secret: Option<SecretString>,
}

/// Lookup of the cloud profiles by name.
#[cfg_attr(test, mockall::automock)]
pub trait CloudConfigSource {
    /// Return the profile of the named cloud.
    fn get_cloud(&self, name: &str) -> Result<CloudProfile, AccessError>;
}

/// `clouds.yaml` and `secure.yaml` files on the local filesystem.
#[derive(Clone, Debug, Default)]
pub struct CloudsYaml {
    /// Explicit `clouds.yaml` location.
    clouds_file: Option<PathBuf>,
    /// Explicit `secure.yaml` location.
    secure_file: Option<PathBuf>,
    /// Directories searched when no explicit location is given.
    search_dirs: Vec<PathBuf>,
}

impl CloudsYaml {
    /// Create the loader with explicit file locations and search directories.
    pub fn new(
        clouds_file: Option<PathBuf>,
        secure_file: Option<PathBuf>,
        search_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            clouds_file,
            secure_file,
            search_dirs,
        }
    }

    /// Loader with the standard search locations.
    ///
    /// `$OS_CLIENT_CONFIG_FILE` and `$OS_CLIENT_SECURE_FILE` take precedence
    /// over the current directory, `~/.config/openstack` and
    /// `/etc/openstack`.
    pub fn from_env<E: Environment + ?Sized>(env: &E) -> Self {
        let mut search_dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            search_dirs.push(cwd);
        }
        if let Some(home) = home::home_dir() {
            search_dirs.push(home.join(".config").join("openstack"));
        }
        search_dirs.push(PathBuf::from("/etc/openstack"));

        Self {
            clouds_file: env
                .var(OS_CLIENT_CONFIG_FILE)
                .filter(|val| !val.is_empty())
                .map(PathBuf::from),
            secure_file: env
                .var(OS_CLIENT_SECURE_FILE)
                .filter(|val| !val.is_empty())
                .map(PathBuf::from),
            search_dirs,
        }
    }

    /// All locations where the file is looked for, in order.
    fn candidates(&self, explicit: Option<&PathBuf>, file_name: &str) -> Vec<PathBuf> {
        explicit
            .cloned()
            .into_iter()
            .chain(self.search_dirs.iter().map(|dir| dir.join(file_name)))
            .collect()
    }

    /// Read and merge the profile files.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn load(&self) -> Result<CloudsFile, AccessError> {
        let clouds_candidates = self.candidates(self.clouds_file.as_ref(), CLOUDS_FILE_NAME);
        let clouds_path = clouds_candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| AccessError::CloudConfigNotFound(clouds_candidates.clone()))?;
        debug!("Using cloud profiles from {}", clouds_path.display());

        let mut builder = config::Config::builder()
            .add_source(File::from(clouds_path).format(FileFormat::Yaml));

        if let Some(secure_path) = self
            .candidates(self.secure_file.as_ref(), SECURE_FILE_NAME)
            .into_iter()
            .find(|path| path.is_file())
        {
            trace!("Merging secrets from {}", secure_path.display());
            builder = builder.add_source(
                File::from(secure_path)
                    .format(FileFormat::Yaml)
                    .required(false),
            );
        }

        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|source| AccessError::CloudConfig { source })
    }
}

impl CloudConfigSource for CloudsYaml {
    fn get_cloud(&self, name: &str) -> Result<CloudProfile, AccessError> {
        self.load()?
            .clouds
            .remove(name)
            .ok_or_else(|| AccessError::CloudNotFound(name.to_string()))
    }
}
