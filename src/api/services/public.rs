//! 答卷者使用的公开 API
//!
//! 不需要登录：调查链接 token 本身就是凭证。

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

use crate::api::AppState;
use crate::errors::SurveyError;
use crate::services::ResponseLedger;

use super::admin::{TS_EXPORT_PATH, api_result};

#[derive(Deserialize, Clone, Debug)]
pub struct SubmitResponseRequest {
    pub token: String,
    /// 保留原始 JSON，非整数分数返回 InvalidScore 而不是反序列化失败；缺失时为 Null
    #[serde(default)]
    pub score: Value,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SubmitResponseResult {
    pub submitted_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CheckResponseResult {
    pub responded: bool,
}

/// 从 JSON 值中取出整数分数
fn parse_score(value: &Value) -> Result<i64, SurveyError> {
    value
        .as_i64()
        .ok_or_else(|| SurveyError::invalid_score(format!("Score must be an integer, got {}", value)))
}

pub struct PublicService;

impl PublicService {
    /// GET /responses/check/{token}
    pub async fn check_response(
        state: web::Data<AppState>,
        path: web::Path<String>,
    ) -> ActixResult<impl Responder> {
        let token = path.into_inner();
        let result = async {
            let link = state.services.registry.find_by_token(&token).await?;
            let responded = state.services.ledger.has_response(&link.id).await?;
            debug!("Public API: check link {} -> responded={}", link.id, responded);
            Ok::<_, SurveyError>(CheckResponseResult { responded })
        }
        .await;

        Ok(api_result(result))
    }

    /// POST /responses
    pub async fn submit_response(
        state: web::Data<AppState>,
        body: web::Json<SubmitResponseRequest>,
    ) -> ActixResult<impl Responder> {
        let body = body.into_inner();
        let result = async {
            let score = parse_score(&body.score)?;
            ResponseLedger::validate_score(score)?;

            let link = state.services.registry.find_by_token(&body.token).await?;
            let response = state
                .services
                .ledger
                .submit(&link.id, score, body.comments)
                .await?;

            Ok::<_, SurveyError>(SubmitResponseResult {
                submitted_at: response.submitted_at.to_rfc3339(),
            })
        }
        .await;

        Ok(api_result(result))
    }
}

/// 公开路由 `/v1/responses`
pub fn public_v1_routes() -> actix_web::Scope {
    web::scope("/v1/responses")
        .route("", web::post().to(PublicService::submit_response))
        .route("/check/{token}", web::get().to(PublicService::check_response))
}
