//! Order management board
//!
//! Holds the last fetched order list, the current status filter and the
//! bookkeeping that keeps a slow refresh from overwriting a newer one.

use crate::{ClientResult, HttpClient};
use shared::models::OrderRecord;
use shared::order::{OrderStatus, OrderView, StatusCounts, StatusFilter};
use std::collections::HashSet;

/// Issued by [`OrderBoard::begin_refresh`], handed back to
/// [`OrderBoard::apply_refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Fetched orders plus view state
#[derive(Debug, Default)]
pub struct OrderBoard {
    orders: Vec<OrderRecord>,
    filter: StatusFilter,
    issued: u64,
    applied: u64,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Start a refresh; every call gets a newer ticket
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Store a fetched list unless a newer refresh was already applied
    ///
    /// Returns false when the response is stale and was dropped.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, orders: Vec<OrderRecord>) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "Dropping stale order list");
            return false;
        }
        self.applied = ticket.0;
        self.orders = orders;
        true
    }

    /// Fetch and apply the order list
    ///
    /// A failed fetch keeps the previous list and is only logged.
    pub async fn refresh(board: &tokio::sync::Mutex<Self>, http: &HttpClient) -> bool {
        let ticket = board.lock().await.begin_refresh();
        match http.list_orders().await {
            Ok(orders) => board.lock().await.apply_refresh(ticket, orders),
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh orders");
                false
            }
        }
    }

    /// Orders selected by the current filter, with display labels
    pub fn views(&self) -> Vec<OrderView> {
        self.filter
            .apply(&self.orders)
            .into_iter()
            .cloned()
            .map(OrderView::project)
            .collect()
    }

    /// Badge counts over the full list, ignoring the filter
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_orders(&self.orders)
    }

    pub fn get(&self, id: i64) -> Option<&OrderRecord> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Ids of orders still waiting to be prepared
    pub fn pending_ids(&self) -> HashSet<i64> {
        self.orders
            .iter()
            .filter(|o| o.estado == OrderStatus::Pendiente.code())
            .map(|o| o.id)
            .collect()
    }

    /// Change an order's status from a label picked in the UI
    ///
    /// The label is mapped back to its backend code before sending. The
    /// local copy is updated only after the backend accepted the change.
    pub async fn change_status(&mut self, http: &HttpClient, id: i64, label: &str) -> ClientResult<()> {
        let code = OrderView::status_code_for(label);
        http.update_order_status(id, &code).await?;
        tracing::info!(order_id = id, status = %code, "Order status changed");
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == id) {
            order.estado = code;
        }
        Ok(())
    }
}

/// Detects pending orders that appeared since the previous check
#[derive(Debug, Default)]
pub struct NewOrderTracker {
    known: Option<HashSet<i64>>,
}

impl NewOrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// New pending ids, ascending
    ///
    /// The first observation only primes the known set and reports nothing.
    pub fn observe(&mut self, orders: &[OrderRecord]) -> Vec<i64> {
        let pending: HashSet<i64> = orders
            .iter()
            .filter(|o| o.estado == OrderStatus::Pendiente.code())
            .map(|o| o.id)
            .collect();

        let mut fresh: Vec<i64> = match &self.known {
            Some(known) => pending.difference(known).copied().collect(),
            None => Vec::new(),
        };
        fresh.sort_unstable();
        self.known = Some(pending);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: i64, estado: &str) -> OrderRecord {
        serde_json::from_value(serde_json::json!({"id": id, "estado": estado})).unwrap()
    }

    #[test]
    fn test_stale_refresh_dropped() {
        let mut board = OrderBoard::new();
        let first = board.begin_refresh();
        let second = board.begin_refresh();

        assert!(board.apply_refresh(second, vec![order(2, "listo")]));
        assert!(!board.apply_refresh(first, vec![order(1, "pendiente")]));
        assert_eq!(board.orders().len(), 1);
        assert_eq!(board.orders()[0].id, 2);
    }

    #[test]
    fn test_in_order_refreshes_applied() {
        let mut board = OrderBoard::new();
        let first = board.begin_refresh();
        assert!(board.apply_refresh(first, vec![order(1, "pendiente")]));
        let second = board.begin_refresh();
        assert!(board.apply_refresh(second, vec![]));
        assert!(board.orders().is_empty());
    }

    #[test]
    fn test_views_and_counts() {
        let mut board = OrderBoard::new();
        let ticket = board.begin_refresh();
        board.apply_refresh(
            ticket,
            vec![order(1, "pendiente"), order(2, "listo"), order(3, "pendiente")],
        );

        board.set_filter(StatusFilter::parse("pendiente"));
        let views = board.views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].status, "Pendiente");

        // Counts ignore the filter
        let counts = board.counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.get(OrderStatus::Listo), 1);

        board.set_filter(StatusFilter::All);
        assert_eq!(board.views().len(), 3);
        assert_eq!(board.pending_ids(), HashSet::from([1, 3]));
    }

    #[test]
    fn test_new_order_tracker() {
        let mut tracker = NewOrderTracker::new();
        assert!(tracker.observe(&[order(1, "pendiente")]).is_empty());
        assert_eq!(
            tracker.observe(&[order(1, "pendiente"), order(4, "pendiente"), order(3, "pendiente")]),
            vec![3, 4]
        );
        assert!(tracker.observe(&[order(3, "pendiente"), order(4, "listo")]).is_empty());
        // An id that left the pending set and comes back counts as new
        assert_eq!(tracker.observe(&[order(4, "pendiente")]), vec![4]);
    }
}
