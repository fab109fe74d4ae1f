//! Admin API 链接操作

use std::collections::{HashMap, HashSet};

use actix_web::{Responder, Result as ActixResult, web};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::SurveyError;
use crate::storage::{LinkFilter, SurveyLink};
use crate::utils::TimeParser;

use super::helpers::{api_result, error_from_survey, non_blank, parse_date_range};
use super::types::{
    BulkStatusRequest, BulkStatusResponse, GetLinksQuery, LinkListResponse, LinkResponse,
    PostNewLink, RejectReason,
};

/// 创建调查链接
pub async fn post_link(
    state: web::Data<AppState>,
    body: web::Json<PostNewLink>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    let now = Utc::now();

    let expiry = match non_blank(body.expiry.as_ref()) {
        Some(raw) => match TimeParser::parse_expire_time_at(&raw, now) {
            Ok(dt) => Some(dt),
            Err(e) => {
                return Ok(error_from_survey(&SurveyError::invalid_expiry(format!(
                    "Invalid expiry '{}': {}",
                    raw, e
                ))));
            }
        },
        None => None,
    };

    let result = state
        .services
        .registry
        .create_at(body.campaign_id, expiry, now)
        .await
        .map(LinkResponse::from);

    Ok(api_result(result))
}

/// 列出调查链接
pub async fn get_links(
    state: web::Data<AppState>,
    query: web::Query<GetLinksQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(list_links(&state, query.into_inner()).await))
}

async fn list_links(state: &AppState, query: GetLinksQuery) -> Result<LinkListResponse, SurveyError> {
    let (created_after, created_before) =
        parse_date_range(query.date_from.as_deref(), query.date_to.as_deref())?;

    let filter = LinkFilter {
        campaign: non_blank(query.campaign.as_ref()),
        created_after,
        created_before,
        order: query.order.unwrap_or_default(),
    };

    let links = state.services.registry.list(&filter).await?;

    let statuses = if query.with_status.unwrap_or(false) {
        Some(
            state
                .services
                .resolver
                .resolve_bulk(&links, Utc::now())
                .await?,
        )
    } else {
        None
    };

    let links: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let status = statuses.as_ref().and_then(|s| s.get(&link.id).copied());
            LinkResponse {
                status,
                ..LinkResponse::from(link)
            }
        })
        .collect();

    debug!("Admin API: listed {} links", links.len());
    Ok(LinkListResponse {
        total: links.len(),
        links,
    })
}

/// 批量查询链接状态
pub async fn post_links_status(
    state: web::Data<AppState>,
    body: web::Json<BulkStatusRequest>,
) -> ActixResult<impl Responder> {
    Ok(api_result(bulk_status(&state, body.into_inner()).await))
}

async fn bulk_status(
    state: &AppState,
    body: BulkStatusRequest,
) -> Result<BulkStatusResponse, SurveyError> {
    if body.tokens.len() > state.bulk_max_tokens {
        return Err(SurveyError::validation(format!(
            "Too many tokens: {} (max {})",
            body.tokens.len(),
            state.bulk_max_tokens
        )));
    }

    let registry = &state.services.registry;
    let mut response = BulkStatusResponse::default();

    // 1. 本地校验 token，不触达存储层
    let mut by_id: HashMap<Uuid, Vec<String>> = HashMap::new();
    for token in body.tokens {
        match registry.codec().verify(&token) {
            Ok(id) => by_id.entry(id).or_default().push(token),
            Err(_) => {
                response.rejected.insert(token, RejectReason::InvalidToken);
            }
        }
    }

    // 2. 一次批量加载，未返回的 id 视为不存在
    let ids: Vec<Uuid> = by_id.keys().copied().collect();
    let links: Vec<SurveyLink> = registry.find_by_ids(&ids).await?;
    let found: HashSet<Uuid> = links.iter().map(|link| link.id).collect();
    for (id, tokens) in &by_id {
        if !found.contains(id) {
            for token in tokens {
                response.rejected.insert(token.clone(), RejectReason::NotFound);
            }
        }
    }

    // 3. 一次批量判定
    let statuses = state
        .services
        .resolver
        .resolve_bulk(&links, Utc::now())
        .await?;

    for link in &links {
        if let (Some(status), Some(tokens)) = (statuses.get(&link.id), by_id.get(&link.id)) {
            for token in tokens {
                response.statuses.insert(token.clone(), *status);
            }
        }
    }

    info!(
        "Admin API: bulk status resolved {} tokens, rejected {}",
        response.statuses.len(),
        response.rejected.len()
    );
    Ok(response)
}
