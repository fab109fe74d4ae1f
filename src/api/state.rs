use std::sync::Arc;

use crate::services::SurveyServices;
use crate::storage::SeaOrmStorage;

/// 请求处理共享状态（通过 `web::Data<AppState>` 注入）
#[derive(Clone)]
pub struct AppState {
    pub services: SurveyServices,
    pub storage: Arc<SeaOrmStorage>,
    /// 批量状态查询单次最多 token 数
    pub bulk_max_tokens: usize,
}

impl AppState {
    pub fn new(services: SurveyServices, storage: Arc<SeaOrmStorage>, bulk_max_tokens: usize) -> Self {
        Self {
            services,
            storage,
            bulk_max_tokens,
        }
    }
}
