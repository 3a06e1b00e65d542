pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod web;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, cmd_admin, cmd_forge, cmd_initdb, cmd_serve};
pub use config::Config;

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => cmd_serve(config).await,

        Commands::Initdb { drop } => cmd_initdb(&config, drop).await,

        Commands::Forge => cmd_forge(&config).await,

        Commands::Admin { username, password } => cmd_admin(&config, username, password).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}
