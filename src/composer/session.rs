use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::api::{ApiError, CatalogApi};
use crate::composer::{CheckoutError, SaleComposer};
use crate::config::Config;
use crate::domain::{CartError, Product};
use crate::search::{ProductSearch, SearchOutcome};

/// A [`SaleComposer`] wired to the backend: debounced search and sale
/// submission. Search responses arrive on the receiver returned by
/// [`SaleSession::new`] and must be handed back via
/// [`SaleSession::apply_search`] by the task that owns the session.
///
/// A submitted sale is posted on its own task so the counter keeps taking
/// input; its result is applied by [`SaleSession::settle_submit`].
pub struct SaleSession {
    composer: SaleComposer,
    api: Arc<dyn CatalogApi>,
    search: ProductSearch,
    sales_tx: mpsc::UnboundedSender<Result<(), ApiError>>,
    sales_rx: mpsc::UnboundedReceiver<Result<(), ApiError>>,
}

impl SaleSession {
    pub fn new(api: Arc<dyn CatalogApi>, config: &Config) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (search, outcomes) = ProductSearch::new(Arc::clone(&api), config.search_debounce);
        let (sales_tx, sales_rx) = mpsc::unbounded_channel();
        let session = Self { composer: SaleComposer::new(&config.currency), api, search, sales_tx, sales_rx };
        (session, outcomes)
    }

    pub fn composer(&self) -> &SaleComposer { &self.composer }
    pub fn composer_mut(&mut self) -> &mut SaleComposer { &mut self.composer }

    /// Feeds the search box. Restarts the debounce window.
    pub fn type_query(&mut self, query: &str) {
        let command = self.composer.type_query(query);
        self.search.dispatch(command);
    }

    pub fn apply_search(&mut self, outcome: SearchOutcome) -> bool {
        debug!(seq = outcome.seq, query = %outcome.query, "Search response");
        self.composer.apply_search(outcome.seq, outcome.result)
    }

    pub fn add_product(&mut self, product: &Product) -> Result<(), CartError> {
        self.composer.add_product(product)?;
        self.search.cancel_pending();
        Ok(())
    }

    /// Adds the `index`-th entry of the current search results. Returns
    /// `None` when there is no such entry.
    pub fn pick_result(&mut self, index: usize) -> Option<Result<(), CartError>> {
        let product = self.composer.search().results().get(index)?.clone();
        Some(self.add_product(&product))
    }

    /// Validates the sale and posts it in the background. Rejections are
    /// also reported as notices on the composer.
    #[instrument(skip(self), fields(session = %self.composer.session_id()))]
    pub fn start_submit(&mut self) -> Result<(), CheckoutError> {
        let request = self.composer.begin_submit()?;
        let api = Arc::clone(&self.api);
        let tx = self.sales_tx.clone();
        tokio::spawn(async move {
            debug!(total = %request.total(), "Posting sale");
            let _ = tx.send(api.create_sale(&request).await);
        });
        Ok(())
    }

    /// Waits for the sale in flight and applies its result. Returns whether
    /// the backend accepted it. Never completes while nothing is in flight,
    /// and is cancel safe so it can sit in a `select!` loop.
    pub async fn settle_submit(&mut self) -> bool {
        if !self.composer.is_submitting() {
            return std::future::pending().await;
        }
        match self.sales_rx.recv().await {
            Some(result) => self.composer.finish_submit(result),
            None => std::future::pending().await,
        }
    }

    /// Submits the current sale and waits for the backend.
    pub async fn submit(&mut self) -> bool {
        if self.start_submit().is_err() {
            return false;
        }
        self.settle_submit().await
    }
}
