use serde::{Deserialize, Serialize};

use crate::errors::{Result, SurveyError};

/// 签名密钥最小长度（字节）
pub const MIN_SIGNING_SECRET_LEN: usize = 16;

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - survey: 链接签名密钥、默认有效期、批量查询上限
/// - api: 管理端认证与路由前缀
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SV，分隔符：__
    /// 示例：SV__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 SV，分隔符 __
            .add_source(
                Environment::with_prefix("SV")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 启动前校验
    pub fn validate(&self) -> Result<()> {
        if self.survey.signing_secret.len() < MIN_SIGNING_SECRET_LEN {
            return Err(SurveyError::config(format!(
                "survey.signing_secret 至少需要 {} 字节（可通过 SV__SURVEY__SIGNING_SECRET 设置）",
                MIN_SIGNING_SECRET_LEN
            )));
        }
        if self.survey.default_ttl_secs == 0 {
            return Err(SurveyError::config("survey.default_ttl_secs 不能为 0"));
        }
        if self.survey.bulk_max_tokens == 0 {
            return Err(SurveyError::config("survey.bulk_max_tokens 不能为 0"));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

impl LoggingConfig {
    /// 非空的日志文件路径，None 表示输出到控制台
    pub fn logging_file(&self) -> Option<&str> {
        self.file
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// 调查链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// 链接 token 的签名密钥（进程级，启动时加载一次，不支持轮换）
    #[serde(default)]
    pub signing_secret: String,
    /// 未指定 expiry 时的默认有效期（秒）
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// 批量状态查询单次最多 token 数
    #[serde(default = "default_bulk_max_tokens")]
    pub bulk_max_tokens: usize,
}

/// 管理 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 管理员登录口令，为空时管理 API 关闭
    #[serde(default)]
    pub admin_token: String,
    /// JWT 签名密钥，为空时启动时随机生成
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,
    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    #[serde(default = "default_health_prefix")]
    pub health_prefix: String,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "surveys.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    7 * 24 * 3600
}

fn default_bulk_max_tokens() -> usize {
    1000
}

fn default_access_token_minutes() -> u64 {
    15
}

fn default_refresh_token_days() -> u64 {
    7
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

fn default_public_prefix() -> String {
    "/api".to_string()
}

fn default_health_prefix() -> String {
    "/health".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            default_ttl_secs: default_ttl_secs(),
            bulk_max_tokens: default_bulk_max_tokens(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            admin_token: String::new(),
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
            admin_prefix: default_admin_prefix(),
            public_prefix: default_public_prefix(),
            health_prefix: default_health_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> StaticConfig {
        let mut config = StaticConfig::default();
        config.survey.signing_secret = "0123456789abcdef0123".to_string();
        config
    }

    #[test]
    fn test_default_ttl_is_seven_days() {
        assert_eq!(SurveyConfig::default().default_ttl_secs, 604_800);
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = StaticConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SurveyError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = valid_config();
        config.survey.default_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[survey]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.api.admin_prefix, "/admin");
    }
}
