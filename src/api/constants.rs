//! API 模块常量定义

/// API 版本 scope
pub const API_VERSION_SCOPE: &str = "/v1";

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 外部传入请求 ID 的最大长度
pub const MAX_REQUEST_ID_LEN: usize = 64;

/// JSON 请求体大小上限
pub const MAX_JSON_PAYLOAD_BYTES: usize = 256 * 1024;

/// JWT 主体
pub const ADMIN_SUBJECT: &str = "admin";

/// Access token 类型标记
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Refresh token 类型标记
pub const REFRESH_TOKEN_TYPE: &str = "refresh";
