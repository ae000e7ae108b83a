use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use fieldslot_api::{ApiState, config::ApiConfig};
use fieldslot_core::clock::SystemClock;
use fieldslot_db::{PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(
        &config.database_url,
        config.database_max_connections,
        config.acquire_timeout(),
    )
    .await?;
    initialize_database(&db_pool).await?;

    let store = Arc::new(PgStore::new(db_pool));
    let clock = Arc::new(SystemClock::new(config.schedule_timezone));
    let state = Arc::new(ApiState::new(store, clock, config.schedule_window_days));

    fieldslot_api::start_server(config, state).await?;

    Ok(())
}
