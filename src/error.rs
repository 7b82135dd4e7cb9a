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
//! # Error
//!
//! Errors that can occur while preparing the access to the cloud or while
//! deriving the service clients.
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Access error.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Two or more catalog endpoints match the requested filters.
    #[error("discovered {count} matching endpoints for the {service_type} service: {urls:?}")]
    AmbiguousEndpoint {
        /// Service type.
        service_type: String,
        /// Number of matches.
        count: usize,
        /// The matching endpoint urls.
        urls: Vec<String>,
    },

    /// The identity service rejected the credentials.
    #[error("authentication failed with {status}: {message}")]
    Authentication {
        /// Response status.
        status: StatusCode,
        /// Error message returned by the identity service.
        message: String,
    },

    /// Authentication options cannot be derived from the given input.
    #[error("cannot determine authentication options: {0}")]
    AuthOptions(String),

    /// Structure builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Certificate or key material cannot be parsed.
    #[error("invalid certificate material in {path}")]
    Certificate {
        /// File with the certificate material.
        path: PathBuf,
        /// The source of the error.
        source: reqwest::Error,
    },

    /// Profile files cannot be read or parsed.
    #[error("cannot load cloud profiles: {source}")]
    CloudConfig {
        /// The source of the error.
        source: config::ConfigError,
    },

    /// No `clouds.yaml` file was found in any of the search locations.
    #[error("clouds.yaml not found in any of {0:?}")]
    CloudConfigNotFound(Vec<PathBuf>),

    /// Requested cloud is not part of the profile file.
    #[error("cloud {0} is not present in clouds.yaml")]
    CloudNotFound(String),

    /// Access configuration file cannot be read or parsed.
    #[error("cannot load access configuration from {path}: {source}")]
    Config {
        /// File location.
        path: PathBuf,
        /// The source of the error.
        source: config::ConfigError,
    },

    /// No endpoint matches the requested filters.
    #[error("no {availability} endpoint for the {service_type} service found in region {region:?}")]
    EndpointNotFound {
        /// Service type.
        service_type: String,
        /// Region name.
        region: Option<String>,
        /// Endpoint interface.
        availability: String,
    },

    /// HTTP transport error.
    #[error("http transport error: {}", source)]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// Endpoint type is not one of the supported values.
    #[error("invalid endpoint type provided: {0}")]
    InvalidEndpointType(String),

    /// Token cannot be used as the request header.
    #[error("token is not a valid header value")]
    InvalidToken,

    /// File cannot be read.
    #[error("cannot read {path}")]
    Io {
        /// File location.
        path: PathBuf,
        /// The source of the error.
        source: std::io::Error,
    },

    /// Identity service did not return the token header.
    #[error("identity service response has no X-Subject-Token header")]
    MissingSubjectToken,

    /// CA bundle does not contain any certificate.
    #[error("no CA certificates found in {path}")]
    NoCertificates {
        /// CA bundle location.
        path: PathBuf,
    },

    /// Service clients are requested before the authentication.
    #[error("access configuration is not prepared")]
    NotPrepared,

    /// Reauthentication requested while disabled.
    #[error("reauthentication is not allowed by the authentication options")]
    ReauthenticationDisabled,

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },
}

/// Builder error.
///
/// Returned by the `derive_builder` generated builders when a mandatory field
/// is not set.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BuilderError(String);

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BuilderError {
    fn from(value: String) -> Self {
        Self(value)
    }
}
