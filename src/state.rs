//! Shared application state passed to every handler.

use std::sync::Arc;

use crate::application::services::{AccountService, LinkService, TokenService};
use crate::infrastructure::store::KvStore;

/// Handles to the services and the store, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub account_service: Arc<AccountService>,
    pub token_service: Arc<TokenService>,
    /// Used directly only by the health check.
    pub store: Arc<dyn KvStore>,
    /// Public base URL used to build `short_url` values.
    pub base_url: String,
}

impl AppState {
    /// Wires all services on top of a single store.
    pub fn new(
        store: Arc<dyn KvStore>,
        token_service: TokenService,
        base_url: impl Into<String>,
        code_length: usize,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(store.clone(), code_length)),
            account_service: Arc::new(AccountService::new(store.clone())),
            token_service: Arc::new(token_service),
            store,
            base_url: base_url.into(),
        }
    }
}
