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
//! # Environment fallbacks
//!
//! Unset configuration fields may be taken from the process environment. The
//! lookup goes through the [`Environment`] trait so that the precedence rules
//! can be verified without touching the real process environment.
use std::collections::HashMap;

/// Legacy variable with the password.
pub const SDK_PASSWORD: &str = "SDK_PASSWORD";
/// Legacy variable with the region name.
pub const SDK_REGION: &str = "SDK_REGION";
/// Legacy variable with the project (tenant) name.
pub const SDK_PROJECT: &str = "SDK_PROJECT";
/// Legacy variable with the user name.
pub const SDK_USERNAME: &str = "SDK_USERNAME";

/// Name of the cloud in `clouds.yaml`.
pub const OS_CLOUD: &str = "OS_CLOUD";
/// Region name.
pub const OS_REGION_NAME: &str = "OS_REGION_NAME";
/// CA bundle location.
pub const OS_CACERT: &str = "OS_CACERT";
/// Client certificate location.
pub const OS_CERT: &str = "OS_CERT";
/// Client key location.
pub const OS_KEY: &str = "OS_KEY";
/// Explicit `clouds.yaml` location.
pub const OS_CLIENT_CONFIG_FILE: &str = "OS_CLIENT_CONFIG_FILE";
/// Explicit `secure.yaml` location.
pub const OS_CLIENT_SECURE_FILE: &str = "OS_CLIENT_SECURE_FILE";

/// Source of environment variables.
pub trait Environment {
    /// Return the value of the variable or `None` when it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|val| val.to_string())
    }
}

/// Resolve a value through the fallback chain.
///
/// A non-empty `value` is returned untouched. Otherwise the variables in
/// `names` are consulted in order and the first non-empty one wins. `None` is
/// returned when nothing in the chain carries a value.
pub fn fallback<E>(value: Option<String>, names: &[&str], env: &E) -> Option<String>
where
    E: Environment + ?Sized,
{
    if value.as_ref().is_some_and(|val| !val.is_empty()) {
        return value;
    }
    names
        .iter()
        .filter_map(|name| env.var(name))
        .find(|val| !val.is_empty())
}
