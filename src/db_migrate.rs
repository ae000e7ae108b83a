use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use fieldslot_db::{create_pool, schema::initialize_database};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    tracing::subscriber::set_global_default(FmtSubscriber::new())?;

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = create_pool(&database_url, 1, Duration::from_secs(10)).await?;

    initialize_database(&db_pool).await?;

    Ok(())
}
