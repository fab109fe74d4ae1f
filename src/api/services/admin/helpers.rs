//! Admin API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::errors::SurveyError;
use crate::utils::TimeParser;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 解析区间参数，起点取当天开始，终点包含当天全部时间
pub fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), SurveyError> {
    let from = from
        .filter(|s| !s.trim().is_empty())
        .map(TimeParser::parse_range_start)
        .transpose()
        .map_err(|e| SurveyError::validation(format!("date_from: {}", e)))?;
    let to = to
        .filter(|s| !s.trim().is_empty())
        .map(TimeParser::parse_range_end)
        .transpose()
        .map_err(|e| SurveyError::validation(format!("date_to: {}", e)))?;

    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(SurveyError::validation("date_from must not be after date_to"));
    }

    Ok((from, to))
}

/// 空白字符串视为未提供
pub fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 SurveyError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 内部错误只记录日志，不向调用方暴露细节。
pub fn error_from_survey(err: &SurveyError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    if err.is_internal() {
        error!("Internal error: {}", err);
        return error_response(status, error_code, "Internal server error");
    }
    error_response(status, error_code, err.message())
}

/// JSON 请求体解析失败时也返回统一的错误信封
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_from_survey(&SurveyError::validation(format!(
        "Invalid JSON body: {}",
        err
    )));
    InternalError::from_response(err, response).into()
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 SurveyError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<SurveyError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: SurveyError = e.into();
            error_from_survey(&err)
        }
    }
}
