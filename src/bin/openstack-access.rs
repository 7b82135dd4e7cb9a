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
//! Access configuration check.
//!
//! This is the entry point of the `openstack-access` binary. It prepares the
//! access described by the configuration file and prints the endpoints of the
//! requested services.

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Report, Result, eyre};
use eyre::WrapErr;
use tracing::{Level, info};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_access::{AccessConfig, ServiceClient};

/// Prepare the `OpenStack` access and show the service endpoints.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the access config file (yaml, json, toml or ini).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the cloud in `clouds.yaml`. Overrides the config file.
    #[arg(long)]
    cloud: Option<String>,

    /// Endpoint type. Overrides the config file.
    #[arg(long)]
    endpoint_type: Option<String>,

    /// Services to resolve.
    #[arg(short, long, value_enum, num_args = 1.., default_values_t = [Service::Compute, Service::Image, Service::BlockStorage])]
    services: Vec<Service>,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Service {
    /// Compute (v2).
    Compute,
    /// Image (v2).
    Image,
    /// Block storage (v3).
    BlockStorage,
}

impl Service {
    fn client(&self, config: &AccessConfig) -> Result<ServiceClient> {
        Ok(match self {
            Self::Compute => config.compute_v2_client()?,
            Self::Image => config.image_v2_client()?,
            Self::BlockStorage => config.block_storage_v3_client()?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = Targets::new()
        .with_default(match args.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        })
        .with_target("hyper_util", Level::INFO)
        .with_target("rustls", Level::INFO);

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    let mut config = match &args.config {
        Some(path) => AccessConfig::from_file(path)
            .wrap_err_with(|| format!("Loading access config {}", path.display()))?,
        None => AccessConfig::default(),
    };
    if args.cloud.is_some() {
        config.cloud = args.cloud;
    }
    if args.endpoint_type.is_some() {
        config.endpoint_type = args.endpoint_type;
    }

    config.prepare().await.map_err(|errors| {
        eyre!(
            "Preparing the access failed: {}",
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        )
    })?;
    info!("Access prepared");

    for service in &args.services {
        let client = service.client(&config)?;
        println!(
            "{}\t{}\t{}",
            client.service_type(),
            client.availability(),
            client.resource_base()
        );
    }
    Ok(())
}
