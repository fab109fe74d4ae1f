//! Admin API NPS 指标

use actix_web::{Responder, Result as ActixResult, web};

use crate::api::AppState;
use crate::errors::SurveyError;
use crate::services::NpsSummary;
use crate::storage::ResponseFilter;

use super::helpers::{api_result, non_blank, parse_date_range};
use super::types::MetricsQuery;

pub async fn get_metrics(
    state: web::Data<AppState>,
    query: web::Query<MetricsQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(summarize(&state, query.into_inner()).await))
}

async fn summarize(state: &AppState, query: MetricsQuery) -> Result<NpsSummary, SurveyError> {
    let (submitted_after, submitted_before) =
        parse_date_range(query.date_from.as_deref(), query.date_to.as_deref())?;

    let filter = ResponseFilter {
        submitted_after,
        submitted_before,
        campaign: non_blank(query.campaign.as_ref()),
        search: non_blank(query.search.as_ref()),
    };

    state.services.metrics.summarize(&filter).await
}
