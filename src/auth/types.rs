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
//! # Identity v3 wire types
//!
//! Request and response bodies of the `/v3/auth/tokens` API.
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// An authentication request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AuthRequest {
    /// An identity object.
    pub auth: AuthRequestInner,
}

/// An authentication request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AuthRequestInner {
    /// An identity object.
    pub identity: Identity,

    /// The authorization scope, a project or a domain. An ID is sufficient to
    /// uniquely identify a project but if a project is specified by name,
    /// then the domain of the project must also be specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// An identity object.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Identity {
    /// The authentication methods.
    pub methods: Vec<String>,

    /// The password object, contains the authentication information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordAuth>,

    /// The token object, contains the authentication information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenAuth>,

    /// The application credential object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential: Option<ApplicationCredentialAuth>,
}

/// The password object, contains the authentication information.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordAuth {
    /// A user object.
    pub user: UserPassword,
}

/// User password information
#[derive(Clone, Debug, Serialize)]
pub struct UserPassword {
    /// User ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User Name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    /// User password
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// The token object, contains the authentication information.
#[derive(Clone, Debug, Serialize)]
pub struct TokenAuth {
    /// An authentication token.
    #[serde(serialize_with = "expose")]
    pub id: SecretString,
}

/// Application credential authentication.
#[derive(Clone, Debug, Serialize)]
pub struct ApplicationCredentialAuth {
    /// Application credential ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application credential name. Requires the owning user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The owner of the application credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserReference>,
    /// Application credential secret.
    #[serde(serialize_with = "expose")]
    pub secret: SecretString,
}

/// User identification without the secret.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserReference {
    /// User ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User Name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// The authorization scope.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project scope.
    Project(ScopeProject),
    /// Domain scope.
    Domain(Domain),
}

/// Project scope information.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ScopeProject {
    /// Project ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Domain information.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Domain {
    /// Domain ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Domain Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Token creation response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TokenResponse {
    /// Token
    pub token: Token,
}

/// Authorization token
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Token {
    /// The authentication methods used to obtain the token.
    #[serde(default)]
    pub methods: Vec<String>,

    /// The date and time when the token expires.
    pub expires_at: DateTime<Utc>,

    /// A user object.
    pub user: User,

    /// The project the token is scoped to.
    #[serde(default)]
    pub project: Option<Project>,

    /// The domain the token is scoped to.
    #[serde(default)]
    pub domain: Option<Domain>,

    /// A catalog object.
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

/// User information
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct User {
    /// User ID
    pub id: String,
    /// User Name
    #[serde(default)]
    pub name: Option<String>,
    /// User domain
    #[serde(default)]
    pub domain: Option<Domain>,
}

/// Project information.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project Name.
    #[serde(default)]
    pub name: Option<String>,
    /// Project domain.
    #[serde(default)]
    pub domain: Option<Domain>,
}

/// A catalog object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Catalog(pub Vec<CatalogService>);

/// A catalog service with its endpoints.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CatalogService {
    pub r#type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A Catalog Endpoint.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Endpoint {
    #[serde(default)]
    pub id: String,
    pub url: String,
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
}

/// Error body returned by the identity service.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error details.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub title: Option<String>,
}
