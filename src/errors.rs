use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    InvalidToken(String),
    NotFound(String),
    InvalidExpiry(String),
    InvalidScore(String),
    LinkExpired(String),
    DuplicateResponse(String),
    Validation(String),
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
}

impl SurveyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SurveyError::InvalidToken(_) => "E001",
            SurveyError::NotFound(_) => "E002",
            SurveyError::InvalidExpiry(_) => "E003",
            SurveyError::InvalidScore(_) => "E004",
            SurveyError::LinkExpired(_) => "E005",
            SurveyError::DuplicateResponse(_) => "E006",
            SurveyError::Validation(_) => "E007",
            SurveyError::Config(_) => "E008",
            SurveyError::DatabaseConfig(_) => "E009",
            SurveyError::DatabaseConnection(_) => "E010",
            SurveyError::DatabaseOperation(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SurveyError::InvalidToken(_) => "Invalid Token",
            SurveyError::NotFound(_) => "Resource Not Found",
            SurveyError::InvalidExpiry(_) => "Invalid Expiry",
            SurveyError::InvalidScore(_) => "Invalid Score",
            SurveyError::LinkExpired(_) => "Link Expired",
            SurveyError::DuplicateResponse(_) => "Duplicate Response",
            SurveyError::Validation(_) => "Validation Error",
            SurveyError::Config(_) => "Configuration Error",
            SurveyError::DatabaseConfig(_) => "Database Configuration Error",
            SurveyError::DatabaseConnection(_) => "Database Connection Error",
            SurveyError::DatabaseOperation(_) => "Database Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SurveyError::InvalidToken(msg)
            | SurveyError::NotFound(msg)
            | SurveyError::InvalidExpiry(msg)
            | SurveyError::InvalidScore(msg)
            | SurveyError::LinkExpired(msg)
            | SurveyError::DuplicateResponse(msg)
            | SurveyError::Validation(msg)
            | SurveyError::Config(msg)
            | SurveyError::DatabaseConfig(msg)
            | SurveyError::DatabaseConnection(msg)
            | SurveyError::DatabaseOperation(msg) => msg,
        }
    }

    /// 映射 HTTP 状态码
    ///
    /// 存储层故障统一为 500，不向调用方暴露细节分类。
    pub fn http_status(&self) -> StatusCode {
        match self {
            SurveyError::InvalidToken(_)
            | SurveyError::InvalidExpiry(_)
            | SurveyError::InvalidScore(_)
            | SurveyError::Validation(_) => StatusCode::BAD_REQUEST,
            SurveyError::NotFound(_) => StatusCode::NOT_FOUND,
            SurveyError::LinkExpired(_) => StatusCode::GONE,
            SurveyError::DuplicateResponse(_) => StatusCode::CONFLICT,
            SurveyError::Config(_)
            | SurveyError::DatabaseConfig(_)
            | SurveyError::DatabaseConnection(_)
            | SurveyError::DatabaseOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于存储层/内部故障（对外表现为不透明的内部错误）
    pub fn is_internal(&self) -> bool {
        self.http_status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SurveyError {}

// 便捷的构造函数
impl SurveyError {
    pub fn invalid_token<T: Into<String>>(msg: T) -> Self {
        SurveyError::InvalidToken(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SurveyError::NotFound(msg.into())
    }

    pub fn invalid_expiry<T: Into<String>>(msg: T) -> Self {
        SurveyError::InvalidExpiry(msg.into())
    }

    pub fn invalid_score<T: Into<String>>(msg: T) -> Self {
        SurveyError::InvalidScore(msg.into())
    }

    pub fn link_expired<T: Into<String>>(msg: T) -> Self {
        SurveyError::LinkExpired(msg.into())
    }

    pub fn duplicate_response<T: Into<String>>(msg: T) -> Self {
        SurveyError::DuplicateResponse(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SurveyError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SurveyError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SurveyError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SurveyError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SurveyError::DatabaseOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SurveyError {
    fn from(err: sea_orm::DbErr) -> Self {
        SurveyError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SurveyError {
    fn from(err: std::io::Error) -> Self {
        SurveyError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SurveyError {
    fn from(err: serde_json::Error) -> Self {
        SurveyError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
