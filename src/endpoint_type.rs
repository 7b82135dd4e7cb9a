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
//! # Endpoint type
//!
//! The endpoint type selects which network visibility variant of a service
//! url is taken from the catalog.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Endpoint types accepted in the configuration.
pub const VALID_ENDPOINT_TYPES: [&str; 7] = [
    "",
    "internal",
    "internalURL",
    "admin",
    "adminURL",
    "public",
    "publicURL",
];

/// Endpoint visibility, matching the catalog `interface` attribute.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Visible by end users on a publicly available network interface.
    #[default]
    Public,
    /// Visible by end users on an unmetered internal network interface.
    Internal,
    /// Visible by administrative users on a secure network interface.
    Admin,
}

impl Availability {
    /// Catalog `interface` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }

    /// Map the configured endpoint type to the availability.
    ///
    /// Anything that is not an internal or admin variant maps to public.
    pub fn from_endpoint_type(endpoint_type: &str) -> Self {
        match endpoint_type {
            "internal" | "internalURL" => Self::Internal,
            "admin" | "adminURL" => Self::Admin,
            _ => Self::Public,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verify the endpoint type is one of [`VALID_ENDPOINT_TYPES`].
pub fn validate_endpoint_type(endpoint_type: &str) -> Result<(), AccessError> {
    if VALID_ENDPOINT_TYPES.contains(&endpoint_type) {
        Ok(())
    } else {
        Err(AccessError::InvalidEndpointType(endpoint_type.to_string()))
    }
}
