//! Delivery fee override
//!
//! The admin panel overrides the delivery fee for the whole client. The value
//! survives restarts (JSON file under the data directory) and is pushed to
//! the other open views as `actualizar_precio_domicilio`.

use crate::config::DEFAULT_DELIVERY_PRICE;
use crate::message::{MessageBus, ShopMessage};
use serde::{Deserialize, Serialize};
use shared::{AppError, ErrorCode};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

const FILENAME: &str = "precio_domicilio.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredPrice {
    precio: f64,
    /// Unix millis of the last change
    updated_at: i64,
}

/// Persisted delivery fee
#[derive(Debug, Clone)]
pub struct DeliveryPriceStore {
    path: PathBuf,
    current: f64,
}

impl DeliveryPriceStore {
    /// Open the store in `data_dir`; a missing or unreadable file yields the
    /// default fee
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(FILENAME);
        let current = Self::read(&path).unwrap_or(DEFAULT_DELIVERY_PRICE);
        Self { path, current }
    }

    fn read(path: &Path) -> Option<f64> {
        if !path.exists() {
            return None;
        }
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read delivery price");
                return None;
            }
        };
        match serde_json::from_str::<StoredPrice>(&json) {
            Ok(stored) if stored.precio.is_finite() && stored.precio >= 0.0 => Some(stored.precio),
            Ok(stored) => {
                tracing::warn!(precio = stored.precio, "Ignoring invalid stored delivery price");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Delivery price file is corrupted");
                None
            }
        }
    }

    pub fn get(&self) -> f64 {
        self.current
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set and persist a new fee
    pub fn set(&mut self, precio: f64) -> crate::ClientResult<()> {
        if !precio.is_finite() || precio < 0.0 {
            return Err(AppError::new(ErrorCode::ValueOutOfRange)
                .with_detail("precio", precio.to_string())
                .into());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredPrice {
            precio,
            updated_at: shared::util::now_millis(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        self.current = precio;
        tracing::info!(precio, "Delivery price updated");
        Ok(())
    }

    /// Set, persist and announce a new fee to the other views
    pub fn update(&mut self, precio: f64, bus: &MessageBus) -> crate::ClientResult<()> {
        self.set(precio)?;
        bus.publish(ShopMessage::delivery_price(precio));
        Ok(())
    }

    /// Apply a fee received from another view; other messages are ignored
    ///
    /// Returns true when the message changed the in-memory fee.
    pub fn apply_message(&mut self, msg: &ShopMessage) -> bool {
        match msg {
            ShopMessage::DeliveryPriceUpdated { precio } if precio.is_finite() && *precio >= 0.0 => {
                let changed = self.current != *precio;
                self.current = *precio;
                changed
            }
            _ => false,
        }
    }

    /// Apply fee changes from `rx` until every bus handle is dropped, then
    /// hand the store back
    pub async fn follow(mut self, mut rx: broadcast::Receiver<ShopMessage>) -> Self {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if self.apply_message(&msg) {
                        tracing::debug!(precio = self.current, "Delivery price received");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Delivery price listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeliveryPriceStore::open(dir.path());
        assert_eq!(store.get(), 3000.0);
    }

    #[test]
    fn test_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DeliveryPriceStore::open(dir.path());
        store.set(4500.0).unwrap();

        let reopened = DeliveryPriceStore::open(dir.path());
        assert_eq!(reopened.get(), 4500.0);
    }

    #[test]
    fn test_corrupted_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILENAME), "not json").unwrap();
        assert_eq!(DeliveryPriceStore::open(dir.path()).get(), 3000.0);
    }

    #[test]
    fn test_rejects_negative() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DeliveryPriceStore::open(dir.path());
        assert!(store.set(-1.0).is_err());
        assert_eq!(store.get(), 3000.0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_apply_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DeliveryPriceStore::open(dir.path());
        assert!(store.apply_message(&ShopMessage::delivery_price(3800.0)));
        assert_eq!(store.get(), 3800.0);
        assert!(!store.apply_message(&ShopMessage::delivery_price(3800.0)));
        assert!(!store.apply_message(&ShopMessage::NewOrders { ids: vec![] }));
    }

    #[tokio::test]
    async fn test_update_announces() {
        let dir = tempfile::tempdir().unwrap();
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();
        let mut store = DeliveryPriceStore::open(dir.path());
        store.update(3200.0, &bus).unwrap();
        assert_eq!(rx.recv().await.unwrap(), ShopMessage::delivery_price(3200.0));
    }

    #[tokio::test]
    async fn test_follow_applies_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let bus = MessageBus::new();
        let store = DeliveryPriceStore::open(dir.path());
        let follower = tokio::spawn(store.follow(bus.subscribe()));

        bus.publish(ShopMessage::NewOrders { ids: vec![3] });
        bus.publish(ShopMessage::delivery_price(4200.0));
        bus.publish(ShopMessage::delivery_price(-5.0));
        drop(bus);

        let store = follower.await.unwrap();
        assert_eq!(store.get(), 4200.0);
        // Received fees are not written to disk
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_follow_recovers_from_lag() {
        let dir = tempfile::tempdir().unwrap();
        let bus = MessageBus::new();
        let rx = bus.subscribe();
        for precio in 0..300 {
            bus.publish(ShopMessage::delivery_price(f64::from(precio)));
        }
        drop(bus);

        let store = DeliveryPriceStore::open(dir.path()).follow(rx).await;
        assert_eq!(store.get(), 299.0);
    }
}
