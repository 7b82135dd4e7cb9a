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

//! # OpenStack access
//!
//! Authenticated client handles for an OpenStack cloud built from the user
//! provided access configuration.
//!
//! The [`AccessConfig`] combines the explicitly configured credentials, the
//! legacy `SDK_*` and the standard `OS_*` environment variables and the named
//! profile from `clouds.yaml`. [`AccessConfig::prepare`] validates the
//! result, wires the TLS trust material into the HTTP transport and
//! authenticates against the Keystone v3 identity service. Afterwards the
//! compute, image and block storage service clients are derived from the
//! service catalog of the obtained token without further network calls.
//!
//! ```no_run
//! use openstack_access::{AccessConfig, AccessConfigBuilder};
//!
//! # async fn example() -> eyre::Result<()> {
//! let mut config: AccessConfig = AccessConfigBuilder::default()
//!     .identity_endpoint("https://keystone.example/v3")
//!     .username("demo")
//!     .password("secret")
//!     .tenant_name("demo")
//!     .domain_name("Default")
//!     .build()?;
//! config
//!     .prepare()
//!     .await
//!     .map_err(|errors| eyre::eyre!("{errors:?}"))?;
//! let compute = config.compute_v2_client()?;
//! println!("{}", compute.endpoint());
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod auth;
pub mod catalog;
pub mod cloud_config;
pub mod config;
pub mod endpoint_type;
pub mod env;
pub mod error;
pub mod provider;
pub mod service;
pub mod tls;

#[cfg(test)]
mod tests;

pub use crate::auth::{AuthInfo, AuthOptions};
pub use crate::cloud_config::{CloudConfigSource, CloudProfile, CloudsYaml};
pub use crate::config::{AccessConfig, AccessConfigBuilder};
pub use crate::endpoint_type::Availability;
pub use crate::env::{Environment, SystemEnv};
pub use crate::error::AccessError;
pub use crate::provider::ProviderClient;
pub use crate::service::{ServiceClient, ServiceType};
pub use crate::tls::TlsConfig;
