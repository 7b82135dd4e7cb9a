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
//
//! Access preparation against a mocked identity service.

use std::collections::HashMap;

use eyre::{Result, eyre};
use httpmock::MockServer;
use reqwest::Method;
use secrecy::ExposeSecret;

use openstack_access::{
    AccessConfig, AccessConfigBuilder, AccessError, Availability, CloudsYaml, ServiceType,
};

mod common;

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

fn no_clouds() -> CloudsYaml {
    CloudsYaml::new(None, None, Vec::new())
}

async fn prepare(config: &mut AccessConfig, env: &HashMap<String, String>) -> Result<()> {
    config
        .prepare_with(env, &no_clouds())
        .await
        .map_err(|errors| eyre!("{errors:?}"))
}

#[tokio::test]
async fn test_password_authentication() -> Result<()> {
    let server = MockServer::start_async().await;
    let identity = common::mock_identity(&server).await;

    let mut config = AccessConfigBuilder::default()
        .cloud("")
        .username("u")
        .password("p")
        .identity_endpoint(server.url("/v3"))
        .build()?;
    prepare(&mut config, &no_env()).await?;
    identity.assert_async().await;

    let compute = config.compute_v2_client()?;
    assert_eq!(ServiceType::ComputeV2, compute.service_type());
    assert_eq!(Availability::Public, compute.availability());
    assert_eq!(
        format!("{}/compute/v2.1/", server.base_url()),
        compute.endpoint().as_str()
    );
    assert_eq!(
        "integration-token",
        compute.provider().token().expose_secret()
    );
    Ok(())
}

#[tokio::test]
async fn test_credentials_from_environment() -> Result<()> {
    let server = MockServer::start_async().await;
    let identity = common::mock_identity(&server).await;
    let env = HashMap::from([
        ("SDK_USERNAME".to_string(), "u".to_string()),
        ("SDK_PASSWORD".to_string(), "p".to_string()),
        ("OS_REGION_NAME".to_string(), "RegionOne".to_string()),
    ]);

    let mut config = AccessConfigBuilder::default()
        .identity_endpoint(server.url("/v3"))
        .endpoint_type("adminURL")
        .build()?;
    prepare(&mut config, &env).await?;
    identity.assert_async().await;

    assert_eq!(Some("RegionOne".to_string()), config.region);
    let compute = config.compute_v2_client()?;
    assert_eq!(Availability::Admin, compute.availability());
    assert_eq!(
        format!("{}/compute-admin/v2.1/", server.base_url()),
        compute.endpoint().as_str()
    );
    Ok(())
}

#[tokio::test]
async fn test_image_endpoint_selection_by_region() -> Result<()> {
    let server = MockServer::start_async().await;
    common::mock_identity(&server).await;

    let mut config = AccessConfigBuilder::default()
        .username("u")
        .password("p")
        .identity_endpoint(server.url("/v3"))
        .build()?;
    prepare(&mut config, &no_env()).await?;
    assert!(matches!(
        config.image_v2_client(),
        Err(AccessError::AmbiguousEndpoint { count: 2, .. })
    ));
    assert!(matches!(
        config.block_storage_v3_client(),
        Err(AccessError::EndpointNotFound { .. })
    ));

    config.region = Some("RegionTwo".into());
    let image = config.image_v2_client()?;
    assert_eq!(
        format!("{}/image-two/v2/", server.base_url()),
        image.resource_base().as_str()
    );
    Ok(())
}

#[tokio::test]
async fn test_service_request_carries_token() -> Result<()> {
    let server = MockServer::start_async().await;
    common::mock_identity(&server).await;
    let servers = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/compute/v2.1/servers")
                .header("x-auth-token", "integration-token");
            then.status(200).body(r#"{"servers": []}"#);
        })
        .await;

    let mut config = AccessConfigBuilder::default()
        .username("u")
        .password("p")
        .identity_endpoint(server.url("/v3"))
        .build()?;
    prepare(&mut config, &no_env()).await?;

    let rsp = config
        .compute_v2_client()?
        .request(Method::GET, "servers")?
        .send()
        .await?;
    assert_eq!(200, rsp.status().as_u16());
    servers.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_endpoint_type_performs_no_io() -> Result<()> {
    let server = MockServer::start_async().await;
    let identity = common::mock_identity(&server).await;

    let mut config = AccessConfigBuilder::default()
        .username("u")
        .password("p")
        .identity_endpoint(server.url("/v3"))
        .endpoint_type("external")
        .build()?;
    let errors = config
        .prepare_with(&no_env(), &no_clouds())
        .await
        .err()
        .unwrap_or_default();

    assert_eq!(1, errors.len());
    assert!(matches!(&errors[0], AccessError::InvalidEndpointType(_)));
    assert_eq!(0, identity.hits_async().await);
    assert!(matches!(
        config.compute_v2_client(),
        Err(AccessError::NotPrepared)
    ));
    Ok(())
}

#[tokio::test]
async fn test_missing_cloud_profile() -> Result<()> {
    let mut config = AccessConfigBuilder::default().cloud("devstack").build()?;
    let errors = config
        .prepare_with(&no_env(), &no_clouds())
        .await
        .err()
        .unwrap_or_default();

    assert_eq!(1, errors.len());
    assert!(matches!(&errors[0], AccessError::CloudConfigNotFound(_)));
    assert!(!config.is_prepared());
    Ok(())
}
