// Copyright 2025 The oscloud contributors
//
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

//! Support for `OS_` environment variables.

use std::env;

use super::super::{Error, ErrorKind};
use super::cloud::{Auth, CloudConfig};
use super::config::from_config;

// This is only used for unit testing.
trait Environment {
    fn get(&self, name: &'static str) -> Result<String, Error>;
}

#[derive(Debug, Clone, Copy)]
struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get(&self, name: &'static str) -> Result<String, Error> {
        env::var(name).map_err(|_| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Required environment variable {} is not provided", name),
            )
        })
    }
}

#[inline]
fn _from_env<E: Environment>(env: E) -> Result<CloudConfig, Error> {
    if let Ok(cloud_name) = env.get("OS_CLOUD") {
        return from_config(&cloud_name);
    }

    let auth = Auth {
        auth_url: env.get("OS_AUTH_URL").ok(),
        endpoint: env.get("OS_ENDPOINT").ok(),
        password: env.get("OS_PASSWORD").ok(),
        project_id: env.get("OS_PROJECT_ID").ok(),
        project_name: env.get("OS_PROJECT_NAME").ok(),
        project_domain_id: env.get("OS_PROJECT_DOMAIN_ID").ok(),
        project_domain_name: env.get("OS_PROJECT_DOMAIN_NAME").ok(),
        token: env.get("OS_TOKEN").ok(),
        username: env.get("OS_USERNAME").ok(),
        user_domain_name: env.get("OS_USER_DOMAIN_NAME").ok(),
    };

    Ok(CloudConfig {
        auth: Some(auth),
        auth_type: env.get("OS_AUTH_TYPE").ok(),
        cacert: env.get("OS_CACERT").ok(),
        interface: env.get("OS_INTERFACE").ok(),
        region_name: env.get("OS_REGION_NAME").ok(),
        options: Default::default(),
    })
}

/// Load a `CloudConfig` from environment variables.
///
/// With `OS_CLOUD` set, the configuration files are used instead, ignoring the other variables.
pub(crate) fn from_env() -> Result<CloudConfig, Error> {
    _from_env(RealEnvironment)
}
