//! Periodic background tasks
//!
//! The management view keeps two timers: the order list refresh and the
//! new-order check. Each is a [`Poller`] that can be started and stopped
//! explicitly; starting one that is already running does nothing.

use crate::message::{MessageBus, ShopMessage};
use crate::orders::{NewOrderTracker, OrderBoard};
use crate::{ClientConfig, HttpClient};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Clears the running flag when the loop task ends, however it ends
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Cancellable fixed-period task
///
/// [`Poller::is_running`] stays true until the loop task has actually
/// exited, so at most one loop per poller exists at any time.
#[derive(Debug)]
pub struct Poller {
    name: &'static str,
    period: Duration,
    running: Arc<AtomicBool>,
    task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl Poller {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the loop; `tick` runs once immediately and then every period
    ///
    /// Returns false, and spawns nothing, while a previous loop is still
    /// alive, including one that was stopped but has not exited yet.
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, tick: F) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(poller = self.name, "Poller already running");
            return false;
        }

        let token = CancellationToken::new();
        let guard = RunningGuard(self.running.clone());
        let name = self.name;
        let period = self.period;
        let cancel = token.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // A tick in flight is abandoned on cancel
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tick() => {}
                }
            }
            tracing::debug!(poller = name, "Poller loop exited");
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some((token, handle));

        tracing::info!(poller = self.name, period_secs = self.period.as_secs(), "Poller started");
        true
    }

    /// Request cancellation without waiting for the loop to exit
    pub fn stop(&self) {
        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((token, _)) = task.as_ref() {
            if !token.is_cancelled() {
                token.cancel();
                tracing::info!(poller = self.name, "Poller stopped");
            }
        }
    }

    /// Cancel the loop and wait until it has exited
    pub async fn shutdown(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some((token, handle)) = task else {
            return;
        };
        if !token.is_cancelled() {
            token.cancel();
            tracing::info!(poller = self.name, "Poller stopped");
        }
        if let Err(e) = handle.await {
            tracing::warn!(poller = self.name, error = %e, "Poller task failed");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Refreshes `board` every order refresh period
pub fn start_order_refresh(
    config: &ClientConfig,
    board: Arc<tokio::sync::Mutex<OrderBoard>>,
    http: HttpClient,
) -> Poller {
    let poller = Poller::new("order-refresh", config.order_refresh_interval());
    poller.start(move || {
        let board = board.clone();
        let http = http.clone();
        async move {
            OrderBoard::refresh(&board, &http).await;
        }
    });
    poller
}

/// Checks for new pending orders every new-order check period and publishes
/// [`ShopMessage::NewOrders`] when some appear
pub fn start_new_order_check(config: &ClientConfig, http: HttpClient, bus: MessageBus) -> Poller {
    let tracker = Arc::new(tokio::sync::Mutex::new(NewOrderTracker::new()));
    let poller = Poller::new("new-order-check", config.new_order_check_interval());
    poller.start(move || {
        let tracker = tracker.clone();
        let http = http.clone();
        let bus = bus.clone();
        async move {
            check_new_orders(&tracker, &http, &bus).await;
        }
    });
    poller
}

async fn check_new_orders(
    tracker: &tokio::sync::Mutex<NewOrderTracker>,
    http: &HttpClient,
    bus: &MessageBus,
) {
    let orders = match http.list_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            tracing::warn!(error = %e, "New-order check failed");
            return;
        }
    };
    let fresh = tracker.lock().await.observe(&orders);
    if !fresh.is_empty() {
        tracing::info!(count = fresh.len(), ids = ?fresh, "New orders");
        bus.publish(ShopMessage::NewOrders { ids: fresh });
    }
}
