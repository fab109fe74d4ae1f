//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use super::types::TS_EXPORT_PATH;
use crate::errors::SurveyError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
/// - 4000-4099: 回复错误
/// - 5000-5099: 指标错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    BatchSizeTooLarge = 1010,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkInvalidToken = 3001,
    LinkInvalidExpiry = 3002,
    LinkExpired = 3003,

    // 回复错误 4000-4099
    ResponseDuplicate = 4000,
    ResponseInvalidScore = 4001,

    // 指标错误 5000-5099
    MetricsQueryFailed = 5000,
}

impl From<&SurveyError> for ErrorCode {
    fn from(err: &SurveyError) -> Self {
        match err {
            SurveyError::InvalidToken(_) => ErrorCode::LinkInvalidToken,
            SurveyError::NotFound(_) => ErrorCode::LinkNotFound,
            SurveyError::InvalidExpiry(_) => ErrorCode::LinkInvalidExpiry,
            SurveyError::InvalidScore(_) => ErrorCode::ResponseInvalidScore,
            SurveyError::LinkExpired(_) => ErrorCode::LinkExpired,
            SurveyError::DuplicateResponse(_) => ErrorCode::ResponseDuplicate,
            SurveyError::Validation(_) => ErrorCode::BadRequest,
            SurveyError::Config(_)
            | SurveyError::DatabaseConfig(_)
            | SurveyError::DatabaseConnection(_)
            | SurveyError::DatabaseOperation(_) => ErrorCode::InternalServerError,
        }
    }
}

impl From<SurveyError> for ErrorCode {
    fn from(err: SurveyError) -> Self {
        ErrorCode::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ResponseDuplicate).unwrap(),
            "4000"
        );
    }

    #[test]
    fn test_taxonomy_kinds_map_to_distinct_codes() {
        let kinds = [
            SurveyError::invalid_token("x"),
            SurveyError::not_found("x"),
            SurveyError::invalid_expiry("x"),
            SurveyError::invalid_score("x"),
            SurveyError::link_expired("x"),
            SurveyError::duplicate_response("x"),
            SurveyError::database_operation("x"),
        ];
        let codes: std::collections::HashSet<i32> =
            kinds.iter().map(|e| ErrorCode::from(e) as i32).collect();
        assert_eq!(codes.len(), kinds.len());
    }
}
