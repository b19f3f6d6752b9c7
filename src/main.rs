//! FitVeda
//!
//! An MCP server for workout, meal, water and body measurement tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use fitveda::config::{AppConfig, StorageBackend};
use fitveda::mcp::FitvedaService;
use fitveda::store::{MemoryStore, RecordStore, SqliteStore};
use fitveda::tools::status::StatusTracker;
use fitveda::{ai, build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitveda=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = AppConfig::from_env()?;

    let (store, database_path): (Arc<dyn RecordStore>, _) = match config.storage {
        StorageBackend::Sqlite => {
            let db_path = config.database_path.clone();
            eprintln!("Database path: {}", db_path.display());

            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            eprintln!("Initializing database...");
            let database = db::Database::new(&db_path)?;

            database.with_conn(|conn| {
                db::migrations::run_migrations(conn)?;
                let version = db::migrations::get_schema_version(conn)?;
                eprintln!("Database schema version: {}", version);
                Ok(())
            })?;

            (Arc::new(SqliteStore::new(database)), Some(db_path))
        }
        StorageBackend::Memory => {
            eprintln!("Using in-memory storage; records are lost on exit");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    let estimator = ai::from_config(&config);
    eprintln!("Estimator: {}", estimator.name());

    let status_tracker = StatusTracker::new(config.storage, database_path, estimator.name());
    let service = FitvedaService::new(store, estimator, status_tracker);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
