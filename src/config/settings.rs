//! 核心组件的显式配置
//!
//! Token Codec 和 Link Registry 在构造时接收 `SurveySettings`，
//! 不在运行过程中读取全局配置。

use chrono::Duration;

use super::StaticConfig;
use crate::errors::{Result, SurveyError};

#[derive(Clone)]
pub struct SurveySettings {
    pub signing_secret: Vec<u8>,
    pub default_ttl: Duration,
}

impl SurveySettings {
    pub fn new(signing_secret: impl Into<Vec<u8>>, default_ttl: Duration) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            default_ttl,
        }
    }

    /// 从静态配置构造（启动时调用一次）
    pub fn from_static(config: &StaticConfig) -> Result<Self> {
        config.validate()?;
        let ttl_secs = i64::try_from(config.survey.default_ttl_secs)
            .map_err(|_| SurveyError::config("survey.default_ttl_secs 超出范围"))?;
        let default_ttl = Duration::try_seconds(ttl_secs)
            .ok_or_else(|| SurveyError::config("survey.default_ttl_secs 超出范围"))?;

        Ok(Self::new(
            config.survey.signing_secret.as_bytes().to_vec(),
            default_ttl,
        ))
    }
}

// 不在日志中打印密钥
impl std::fmt::Debug for SurveySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveySettings")
            .field("signing_secret", &"<redacted>")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
