//! Shared application state.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::orders::OrderStore;
use crate::services::{DelhiveryClient, RazorpayClient};

/// Shared application state. Cheap to clone; handlers receive it via
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    razorpay: RazorpayClient,
    delhivery: DelhiveryClient,
    catalog: Catalog,
    orders: OrderStore,
}

impl AppState {
    /// Build state from config: API clients, the catalog, an empty order
    /// store.
    ///
    /// # Errors
    ///
    /// Returns error if either API client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let razorpay = RazorpayClient::new(&config.razorpay)?;
        let delhivery = DelhiveryClient::new(&config.delhivery)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                razorpay,
                delhivery,
                catalog: Catalog::load(),
                orders: OrderStore::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    #[must_use]
    pub fn delhivery(&self) -> &DelhiveryClient {
        &self.inner.delhivery
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }
}
