use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use clinicslot_api::{
    config::{ApiConfig, StoreBackend},
    ApiState,
};
use clinicslot_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    let state = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

            // Create database connection pool and make sure the schema exists
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;

            ApiState::postgres(db_pool)
        }
        StoreBackend::Memory => ApiState::memory(),
    };

    // Start API server
    clinicslot_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
