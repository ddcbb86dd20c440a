//! Drives the master/detail client against an in-process server: create a
//! few todos, page through them, edit one, and delete it.
//!
//! Run with: `cargo run --example client_flow`

use std::sync::Arc;
use std::time::Duration;

use todo_hub::adapters::{HttpServer, HttpServerConfig};
use todo_hub::client::{ClientConfig, TodoApp, TodoClient};
use todo_hub::storage::memory::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let store = Arc::new(MemoryStore::new());
    let server = HttpServer::new(store, HttpServerConfig { port: "0" }).await?;
    let addr = server.local_addr()?;
    tokio::spawn(async move {
        server.run().await.expect("server failed");
    });

    let client = TodoClient::connect_with_retry(ClientConfig {
        base_url: format!("http://{addr}"),
        reconnect_interval: Duration::from_millis(200),
        max_retries: 5,
    })
    .await?;

    let mut app = TodoApp::new(client);
    for _ in 0..12 {
        app.create().await;
    }

    app.load_page(1).await;
    println!(
        "page 1 of {}: {} items",
        app.total_pages(),
        app.items().len()
    );
    app.load_page(2).await;
    println!(
        "page 2 of {}: {} items",
        app.total_pages(),
        app.items().len()
    );

    let id = app.items()[0].id.clone();
    app.select(&id);
    app.edit_title("Buy groceries");
    app.edit_description("<p>Milk, eggs, bread</p>");
    app.save().await;
    println!("saved: {}", app.editor().unwrap().todo.title);

    app.delete_selected().await;
    println!("after delete, page has {} items", app.items().len());

    for notice in app.take_notices() {
        println!("notice: {notice:?}");
    }
    Ok(())
}
