//! Demo data command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::movie::{DEMO_MOVIES, DEMO_USER_NAME};

pub async fn cmd_forge(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    store.seed_demo(DEMO_USER_NAME, &DEMO_MOVIES).await?;

    println!("Done.");
    Ok(())
}
