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
//! # Service catalog
//!
//! Locate the service endpoint in the catalog returned together with the
//! token.
use derive_builder::Builder;
use tracing::trace;
use url::Url;

use crate::auth::types::Catalog;
use crate::endpoint_type::Availability;
use crate::error::{AccessError, BuilderError};

/// Endpoint filters.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct EndpointOpts {
    /// Service type (`compute`, `image`, `volumev3`, ...).
    pub service_type: String,
    /// Region name. Endpoints of all regions match when unset.
    #[builder(default)]
    pub region: Option<String>,
    /// Endpoint interface.
    #[builder(default)]
    pub availability: Availability,
}

/// Ensure the url ends with the slash so that relative paths are appended.
pub fn normalize_url(url: &str) -> Result<Url, AccessError> {
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}

impl Catalog {
    /// Find the single endpoint matching the filters.
    ///
    /// # Returns
    /// * Success with the endpoint url (with the trailing slash).
    /// * `AccessError::EndpointNotFound` when nothing matches.
    /// * `AccessError::AmbiguousEndpoint` when different urls match.
    pub fn endpoint_url(&self, opts: &EndpointOpts) -> Result<Url, AccessError> {
        let region = opts.region.as_deref().filter(|val| !val.is_empty());
        let mut urls: Vec<&str> = self
            .0
            .iter()
            .filter(|service| service.r#type.as_deref() == Some(opts.service_type.as_str()))
            .flat_map(|service| service.endpoints.iter())
            .filter(|endpoint| endpoint.interface == opts.availability.as_str())
            .filter(|endpoint| match region {
                Some(region) => {
                    endpoint.region_id.as_deref() == Some(region)
                        || endpoint.region.as_deref() == Some(region)
                }
                None => true,
            })
            .map(|endpoint| endpoint.url.as_str())
            .collect();
        urls.sort_unstable();
        urls.dedup();
        trace!("Matching {} endpoints: {:?}", opts.service_type, urls);

        match urls.as_slice() {
            [] => Err(AccessError::EndpointNotFound {
                service_type: opts.service_type.clone(),
                region: region.map(Into::into),
                availability: opts.availability.to_string(),
            }),
            [url] => normalize_url(url),
            _ => Err(AccessError::AmbiguousEndpoint {
                service_type: opts.service_type.clone(),
                count: urls.len(),
                urls: urls.iter().map(|url| url.to_string()).collect(),
            }),
        }
    }
}
