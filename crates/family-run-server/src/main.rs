//! family-run: weekly family run tracker server

use anyhow::{Context, Result};
use clap::Parser;
use family_run::TrackerConfig;
use family_run_server::TrackerServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Weekly family run tracker
#[derive(Parser, Debug)]
#[command(name = "family-run")]
#[command(about = "Serve the family run tracker API", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "FAMILY_RUN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(long, env = "FAMILY_RUN_BIND")]
    bind: Option<SocketAddr>,

    /// Directory holding the JSON documents (overrides the config file)
    #[arg(long, env = "FAMILY_RUN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Family member allowed to log runs; repeat for each member
    #[arg(long = "member", value_name = "NAME")]
    members: Vec<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    fn into_config(self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TrackerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if !self.members.is_empty() {
            config.members = self.members;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Cli::parse().into_config()?;
    TrackerServer::start(config).await
}
