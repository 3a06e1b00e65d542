//! Schema initialisation command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_initdb(config: &Config, drop: bool) -> anyhow::Result<()> {
    let store = Store::connect(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    store.init_schema(drop).await?;

    println!("Initialized database.");
    Ok(())
}
