//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::InventoryStore;
use crate::services::{ActivityLog, AdjustmentService, AnalyticsService, SaleService};

/// Application state shared across all handlers.
///
/// Cheap to clone; all handlers see the same inner state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn InventoryStore>,
    adjustments: AdjustmentService,
    sales: SaleService,
    analytics: AnalyticsService,
}

impl AppState {
    /// Wire up the service layer over the given store.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn InventoryStore>, activity: ActivityLog) -> Self {
        let adjustments = AdjustmentService::new(Arc::clone(&store), activity.clone());
        let sales = SaleService::new(Arc::clone(&store), activity);
        let analytics = AnalyticsService::new(Arc::clone(&store), config.movement_window_days);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                adjustments,
                sales,
                analytics,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn adjustments(&self) -> &AdjustmentService {
        &self.inner.adjustments
    }

    #[must_use]
    pub fn sales(&self) -> &SaleService {
        &self.inner.sales
    }

    #[must_use]
    pub fn analytics(&self) -> &AnalyticsService {
        &self.inner.analytics
    }
}
