//! Service layer for business logic
//!
//! This module provides the survey core shared between the HTTP API and
//! the CLI. 所有组件都只依赖显式传入的存储和配置。

mod link_registry;
mod metrics_aggregator;
mod response_ledger;
mod status_resolver;

pub use link_registry::LinkRegistry;
pub use metrics_aggregator::{MetricsAggregator, NpsBand, NpsSummary, NpsTally, Trend, TrendPoint};
pub use response_ledger::{MAX_COMMENTS_CHARS, MAX_SCORE, MIN_SCORE, ResponseLedger};
pub use status_resolver::StatusResolver;

use std::sync::Arc;

use crate::config::SurveySettings;
use crate::storage::SeaOrmStorage;

/// 核心服务集合（HTTP 与 CLI 共用）
#[derive(Clone)]
pub struct SurveyServices {
    pub registry: Arc<LinkRegistry>,
    pub ledger: Arc<ResponseLedger>,
    pub resolver: Arc<StatusResolver>,
    pub metrics: Arc<MetricsAggregator>,
}

impl SurveyServices {
    pub fn new(storage: Arc<SeaOrmStorage>, settings: &SurveySettings) -> Self {
        let registry = Arc::new(LinkRegistry::new(storage.clone(), settings));
        let ledger = Arc::new(ResponseLedger::new(storage.clone()));
        let resolver = Arc::new(StatusResolver::new(ledger.clone()));
        let metrics = Arc::new(MetricsAggregator::new(storage));

        Self {
            registry,
            ledger,
            resolver,
            metrics,
        }
    }
}
