use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use todo_hub::adapters::{HttpServer, HttpServerConfig};
use todo_hub::storage::sqlite::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todos.db".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());

    let store = Arc::new(SqliteStore::new(&database_url).await?);
    let server = HttpServer::new(store, HttpServerConfig { port: &port }).await?;
    tracing::info!(port = %port, "todo server started");
    server.run().await?;
    Ok(())
}
