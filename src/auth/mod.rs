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
//! # Authentication options
//!
//! The credentials are resolved either from a cloud profile or from the
//! explicitly given [`AuthInfo`] into [`AuthOptions`], which are then turned
//! into the identity v3 authentication request.

use derive_builder::Builder;
use secrecy::{ExposeSecret, SecretString};
use tracing::trace;

pub mod types;

use crate::cloud_config::CloudProfile;
use crate::error::{AccessError, BuilderError};
use types::*;

/// Return the value when it is set and not empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|val| !val.is_empty())
}

/// Return the secret when it is set and not empty.
pub(crate) fn non_empty_secret(value: &Option<SecretString>) -> Option<&SecretString> {
    value
        .as_ref()
        .filter(|val| !val.expose_secret().is_empty())
}

fn domain(id: Option<&str>, name: Option<&str>) -> Option<Domain> {
    match (id, name) {
        (Some(id), _) => Some(Domain {
            id: Some(id.into()),
            name: None,
        }),
        (None, Some(name)) => Some(Domain {
            id: None,
            name: Some(name.into()),
        }),
        (None, None) => None,
    }
}

/// Authentication information given explicitly (not through a cloud
/// profile).
#[derive(Builder, Clone, Debug, Default)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into), default)]
pub struct AuthInfo {
    pub auth_url: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    pub password: Option<SecretString>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub token: Option<SecretString>,
    pub username: Option<String>,
    pub user_id: Option<String>,
}

/// Where the authentication options are resolved from.
#[derive(Clone, Debug)]
pub enum AuthSource<'a> {
    /// Named cloud profile.
    Cloud(&'a CloudProfile),
    /// Explicit authentication information.
    Explicit(AuthInfo),
}

/// Fields of the [`AuthOptions`] that may be overridden by the explicit
/// configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthField {
    Username,
    UserId,
    Password,
    IdentityEndpoint,
    TenantId,
    TenantName,
    DomainId,
    DomainName,
    Token,
}

/// Resolved authentication options.
#[derive(Builder, Clone, Debug, Default)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into), default)]
pub struct AuthOptions {
    /// Identity service url.
    pub identity_endpoint: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<SecretString>,
    /// Project ID.
    pub tenant_id: Option<String>,
    /// Project name.
    pub tenant_name: Option<String>,
    /// Domain of the user (and of the project unless the project domain is
    /// set separately).
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    /// Domain of the project when it differs from the domain of the user.
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    /// Existing token to authenticate with.
    pub token_id: Option<SecretString>,
    pub application_credential_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_secret: Option<SecretString>,
    /// Whether the stored options may be reused to obtain a new token.
    pub allow_reauth: bool,
}

impl AuthOptions {
    /// Resolve the options from the source.
    pub fn resolve(source: &AuthSource<'_>) -> Result<Self, AccessError> {
        match source {
            AuthSource::Cloud(profile) => Self::from_profile(profile),
            AuthSource::Explicit(info) => Ok(Self::from(info)),
        }
    }

    /// Resolve the options from the cloud profile.
    pub fn from_profile(profile: &CloudProfile) -> Result<Self, AccessError> {
        if let Some(version) = non_empty(&profile.identity_api_version)
            && !version.starts_with('3')
        {
            return Err(AccessError::AuthOptions(format!(
                "unsupported identity API version {version}"
            )));
        }
        let auth = &profile.auth;
        let default_domain = non_empty(&auth.default_domain);

        // User domain: explicit user domain, then the generic domain, then the
        // default one.
        let (domain_id, domain_name) =
            match (non_empty(&auth.user_domain_id), non_empty(&auth.user_domain_name)) {
                (None, None) => match (non_empty(&auth.domain_id), non_empty(&auth.domain_name)) {
                    (None, None) => (default_domain, None),
                    other => other,
                },
                other => other,
            };
        let (project_domain_id, project_domain_name) = match (
            non_empty(&auth.project_domain_id),
            non_empty(&auth.project_domain_name),
        ) {
            (None, None) => match (non_empty(&auth.domain_id), non_empty(&auth.domain_name)) {
                (None, None) => (default_domain, None),
                other => other,
            },
            other => other,
        };

        let mut options = Self {
            identity_endpoint: auth.auth_url.clone(),
            tenant_id: auth.project_id.clone(),
            tenant_name: auth.project_name.clone(),
            domain_id: domain_id.map(Into::into),
            domain_name: domain_name.map(Into::into),
            project_domain_id: project_domain_id.map(Into::into),
            project_domain_name: project_domain_name.map(Into::into),
            ..Default::default()
        };

        match profile.auth_type.as_deref().unwrap_or("password") {
            "" | "password" | "v3password" => {
                options.username = auth.username.clone();
                options.user_id = auth.user_id.clone();
                options.password = auth.password.clone();
            }
            "token" | "v3token" => {
                options.token_id = auth.token.clone();
            }
            "v3applicationcredential" => {
                options.username = auth.username.clone();
                options.user_id = auth.user_id.clone();
                options.application_credential_id = auth.application_credential_id.clone();
                options.application_credential_name = auth.application_credential_name.clone();
                options.application_credential_secret =
                    auth.application_credential_secret.clone();
            }
            other => {
                return Err(AccessError::AuthOptions(format!(
                    "unsupported auth type {other}"
                )));
            }
        }
        Ok(options)
    }

    /// Set the field to the value.
    pub fn set(&mut self, field: AuthField, value: &str) {
        trace!("Overriding {:?}", field);
        match field {
            AuthField::Username => self.username = Some(value.into()),
            AuthField::UserId => self.user_id = Some(value.into()),
            AuthField::Password => self.password = Some(value.into()),
            AuthField::IdentityEndpoint => self.identity_endpoint = Some(value.into()),
            AuthField::TenantId => self.tenant_id = Some(value.into()),
            AuthField::TenantName => self.tenant_name = Some(value.into()),
            AuthField::DomainId => self.domain_id = Some(value.into()),
            AuthField::DomainName => self.domain_name = Some(value.into()),
            AuthField::Token => self.token_id = Some(value.into()),
        }
    }

    /// Identity endpoint, which must be present.
    pub fn endpoint(&self) -> Result<&str, AccessError> {
        non_empty(&self.identity_endpoint)
            .ok_or_else(|| AccessError::AuthOptions("identity endpoint is required".into()))
    }

    /// Verify the options are complete enough to authenticate.
    pub fn validate(&self) -> Result<(), AccessError> {
        self.endpoint()?;
        self.to_auth_request().map(|_| ())
    }

    fn user_reference(&self) -> Option<UserReference> {
        match (non_empty(&self.user_id), non_empty(&self.username)) {
            (Some(id), _) => Some(UserReference {
                id: Some(id.into()),
                ..Default::default()
            }),
            (None, Some(name)) => Some(UserReference {
                id: None,
                name: Some(name.into()),
                domain: domain(non_empty(&self.domain_id), non_empty(&self.domain_name)),
            }),
            (None, None) => None,
        }
    }

    fn scope(&self) -> Option<Scope> {
        if let Some(id) = non_empty(&self.tenant_id) {
            return Some(Scope::Project(ScopeProject {
                id: Some(id.into()),
                ..Default::default()
            }));
        }
        non_empty(&self.tenant_name).map(|name| {
            let project_domain = domain(
                non_empty(&self.project_domain_id),
                non_empty(&self.project_domain_name),
            )
            .or_else(|| domain(non_empty(&self.domain_id), non_empty(&self.domain_name)));
            Scope::Project(ScopeProject {
                id: None,
                name: Some(name.into()),
                domain: project_domain,
            })
        })
    }

    /// Build the identity v3 authentication request.
    ///
    /// Token authentication wins over the application credential, which wins
    /// over the password. Application credentials are never scoped.
    pub fn to_auth_request(&self) -> Result<AuthRequest, AccessError> {
        let mut identity = Identity::default();
        let mut scope = self.scope();

        if let Some(token) = non_empty_secret(&self.token_id) {
            identity.methods.push("token".into());
            identity.token = Some(TokenAuth { id: token.clone() });
        } else if let Some(secret) = non_empty_secret(&self.application_credential_secret) {
            let id = non_empty(&self.application_credential_id);
            let name = non_empty(&self.application_credential_name);
            let user = match (id, name) {
                (Some(_), _) => None,
                (None, Some(_)) => Some(self.user_reference().ok_or_else(|| {
                    AccessError::AuthOptions(
                        "application credential name requires the user".into(),
                    )
                })?),
                (None, None) => {
                    return Err(AccessError::AuthOptions(
                        "application credential id or name is required".into(),
                    ));
                }
            };
            identity.methods.push("application_credential".into());
            identity.application_credential = Some(ApplicationCredentialAuth {
                id: id.map(Into::into),
                name: if id.is_none() { name.map(Into::into) } else { None },
                user,
                secret: secret.clone(),
            });
            scope = None;
        } else if let (Some(password), Some(user)) =
            (non_empty_secret(&self.password), self.user_reference())
        {
            identity.methods.push("password".into());
            identity.password = Some(PasswordAuth {
                user: UserPassword {
                    id: user.id,
                    name: user.name,
                    domain: user.domain,
                    password: password.clone(),
                },
            });
        } else {
            return Err(AccessError::AuthOptions(
                "no credentials provided: token, application credential or user with password is required".into(),
            ));
        }

        Ok(AuthRequest {
            auth: AuthRequestInner { identity, scope },
        })
    }
}

impl From<&AuthInfo> for AuthOptions {
    fn from(value: &AuthInfo) -> Self {
        Self {
            identity_endpoint: value.auth_url.clone(),
            username: value.username.clone(),
            user_id: value.user_id.clone(),
            password: value.password.clone(),
            tenant_id: value.project_id.clone(),
            tenant_name: value.project_name.clone(),
            domain_id: value.domain_id.clone(),
            domain_name: value.domain_name.clone(),
            token_id: value.token.clone(),
            ..Default::default()
        }
    }
}
