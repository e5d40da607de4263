//! comanda-watch: order board monitor
//!
//! Loads the menu once, then keeps the order board refreshed and reports new
//! pending orders until interrupted.

use anyhow::Context;
use comanda_client::message::ShopMessage;
use comanda_client::{poller, CatalogService, ClientConfig, DeliveryPriceStore, MessageBus, OrderBoard};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenv::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comanda_client=info,comanda_watch=info".into()),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!("Starting comanda-watch (api: {})", config.base_url);

    let http = config
        .build_http_client()
        .context("failed to build HTTP client")?;

    let catalog = CatalogService::new(http.clone()).load().await;
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty, continuing with order monitoring only");
    }

    let delivery = DeliveryPriceStore::open(&config.data_dir);
    tracing::info!(precio = delivery.get(), "Delivery price in effect");

    let bus = MessageBus::new();
    let mut rx = bus.subscribe();
    let delivery = tokio::spawn(delivery.follow(bus.subscribe()));
    let board = Arc::new(tokio::sync::Mutex::new(OrderBoard::new()));

    let refresh = poller::start_order_refresh(&config, board.clone(), http.clone());
    let check = poller::start_new_order_check(&config, http, bus.clone());

    let mut report = tokio::time::interval(config.order_refresh_interval());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            _ = report.tick() => {
                let counts = board.lock().await.counts();
                tracing::info!(total = counts.total, by_status = ?counts.by_code, "Order board");
            }
            msg = rx.recv() => match msg {
                Ok(ShopMessage::NewOrders { ids }) => {
                    tracing::info!(ids = ?ids, "New pending orders");
                }
                Ok(other) => tracing::debug!(kind = other.kind(), "Ignoring message"),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Message listener lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    refresh.shutdown().await;
    check.shutdown().await;

    // The pollers held the last bus handles, so the fee follower ends here
    drop(bus);
    drop(rx);
    let delivery = delivery.await.context("delivery price follower failed")?;
    tracing::info!(precio = delivery.get(), "Final delivery price");
    Ok(())
}
