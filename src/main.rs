//! Cashbook main entry point

use anyhow::Context;
use cashbook_api::start_server;
use cashbook_config::Config;
use cashbook_core::{Books, ReportSettings};
use cashbook_store::{MemoryStore, Profile, Role};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cashbook")]
#[command(version = "0.1.0")]
#[command(about = "Small-business cash book with financial statements and ROI forecasts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(args.config.clone()).map_err(|e| {
        anyhow::anyhow!("Failed to load {}:\n{}", args.config.display(), e.to_details())
    })?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = if config.data.persist {
            let path = config.store_path();
            log::info!("Opening store: {}", path.display());
            MemoryStore::open(path).await.context("Failed to open store")?
        } else {
            log::warn!("Persistence disabled, data is kept in memory only");
            MemoryStore::new()
        };
        let store = Arc::new(store);

        let profiles = seed_profiles(&config)?;
        log::info!("Seeding {} profile(s) from configuration", profiles.len());
        store
            .upsert_profiles(profiles)
            .await
            .context("Failed to seed profiles")?;

        let books = Books::new(ReportSettings::from(&config.business), store);
        log::info!(
            "Initial capital {} {}",
            config.business.initial_capital,
            config.business.currency
        );

        start_server(config, Arc::new(books)).await
    })
}

/// Profile records for the configured users
fn seed_profiles(config: &Config) -> anyhow::Result<Vec<Profile>> {
    config
        .auth
        .users
        .iter()
        .map(|user| {
            let role: Role = user.role.parse().map_err(anyhow::Error::msg)?;
            Ok(Profile {
                id: user.id.clone(),
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                role,
                created_at: Utc::now(),
                updated_at: None,
            })
        })
        .collect()
}
