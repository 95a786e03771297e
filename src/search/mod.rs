//! Debounced product search.
//!
//! Every keystroke bumps a sequence number. Only the response carrying the
//! latest number is applied, so a slow early request can never overwrite
//! the results of a newer one.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use crate::api::{ApiError, CatalogApi};
use crate::domain::Product;

/// What the driver must do after the query changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchCommand {
    Clear,
    Schedule { seq: u64, query: String },
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Product>, ApiError>,
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    query: String,
    results: Vec<Product>,
    loading: bool,
    latest_seq: u64,
}

impl SearchState {
    pub fn query(&self) -> &str { &self.query }
    pub fn results(&self) -> &[Product] { &self.results }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn latest_seq(&self) -> u64 { self.latest_seq }

    /// Nothing matched a non-empty, settled query.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && !self.query.is_empty() && self.results.is_empty()
    }

    pub fn input(&mut self, raw: &str) -> SearchCommand {
        self.latest_seq += 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.query.clear();
            self.results.clear();
            self.loading = false;
            return SearchCommand::Clear;
        }
        self.query = raw.to_string();
        self.loading = true;
        SearchCommand::Schedule { seq: self.latest_seq, query: trimmed.to_string() }
    }

    /// Returns `false` when the response was superseded and dropped.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Product>, ApiError>) -> bool {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale search response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(products) => self.results = products,
            Err(e) => {
                error!(error = %e, query = %self.query, "Product search failed");
                self.results.clear();
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.input("");
    }
}

/// Owns the single pending debounce timer and reports responses over a
/// channel to whoever owns the [`SearchState`].
pub struct ProductSearch {
    api: Arc<dyn CatalogApi>,
    window: Duration,
    pending: Option<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<SearchOutcome>,
}

impl ProductSearch {
    pub fn new(api: Arc<dyn CatalogApi>, window: Duration) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, window, pending: None, outcomes: tx }, rx)
    }

    pub fn window(&self) -> Duration { self.window }

    pub fn dispatch(&mut self, command: SearchCommand) {
        self.cancel_pending();
        let SearchCommand::Schedule { seq, query } = command else { return };
        let api = Arc::clone(&self.api);
        let tx = self.outcomes.clone();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            debug!(seq, %query, "Searching products");
            let result = api.search_products(&query).await;
            // Receiver gone means the session ended.
            let _ = tx.send(SearchOutcome { seq, query, result });
        }));
    }

    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for ProductSearch {
    fn drop(&mut self) { self.cancel_pending(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i64, name: &str) -> Product {
        Product::new(id, name, Decimal::new(5, 0), 3).unwrap()
    }

    #[test]
    fn test_blank_query_clears_without_request() {
        let mut state = SearchState::default();
        assert!(matches!(state.input("cox"), SearchCommand::Schedule { .. }));
        assert_eq!(state.input("   "), SearchCommand::Clear);
        assert!(!state.is_loading());
        assert!(state.results().is_empty());
        assert_eq!(state.query(), "");
    }

    #[test]
    fn test_only_latest_response_applies() {
        let mut state = SearchState::default();
        let SearchCommand::Schedule { seq: first, .. } = state.input("co") else { panic!("expected schedule") };
        let SearchCommand::Schedule { seq: second, query } = state.input("coxinha ") else { panic!("expected schedule") };
        assert_eq!(query, "coxinha");
        assert!(state.apply(second, Ok(vec![product(1, "Coxinha")])));
        assert!(!state.apply(first, Ok(vec![product(2, "Cocada")])));
        assert_eq!(state.results()[0].name(), "Coxinha");
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failed_search_leaves_no_results() {
        let mut state = SearchState::default();
        let SearchCommand::Schedule { seq, .. } = state.input("pastel") else { panic!("expected schedule") };
        let err = ApiError::Status { status: 500, body: "boom".into() };
        assert!(state.apply(seq, Err(err)));
        assert!(state.results().is_empty());
        assert!(state.is_empty_result());
        assert!(matches!(state.input("pastel de queijo"), SearchCommand::Schedule { .. }));
    }

    #[test]
    fn test_reset_supersedes_pending() {
        let mut state = SearchState::default();
        let SearchCommand::Schedule { seq, .. } = state.input("suco") else { panic!("expected schedule") };
        state.reset();
        assert!(!state.apply(seq, Ok(vec![product(4, "Suco")])));
        assert!(state.results().is_empty());
    }
}
