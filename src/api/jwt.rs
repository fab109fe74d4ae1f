use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::api::constants::{ACCESS_TOKEN_TYPE, ADMIN_SUBJECT, REFRESH_TOKEN_TYPE};
use crate::config::ApiConfig;

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

impl AccessClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Refresh Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating admin tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    /// Create JwtService from config
    ///
    /// jwt_secret 为空时生成随机密钥，重启后已签发的 token 全部失效。
    pub fn from_config(api: &ApiConfig) -> Self {
        let secret = if api.jwt_secret.is_empty() {
            warn!("JWT secret not configured, generating random secret for this process");
            let bytes: [u8; 32] = rand::random();
            URL_SAFE_NO_PAD.encode(bytes)
        } else {
            api.jwt_secret.clone()
        };

        Self::new(&secret, api.access_token_minutes, api.refresh_token_days)
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }

    pub fn refresh_token_days(&self) -> u64 {
        self.refresh_token_days
    }

    /// Generate Access Token (short-lived)
    pub fn generate_access_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Generate Refresh Token (long-lived)
    pub fn generate_refresh_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.refresh_token_days as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate Access Token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }

    /// Validate Refresh Token
    pub fn validate_refresh_token(
        &self,
        token: &str,
    ) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
        let token_data =
            decode::<RefreshClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

/// 管理端凭证：登录口令 + JWT 签发
///
/// 以 `web::Data<AdminCredentials>` 注入，认证中间件和登录端点共用。
pub struct AdminCredentials {
    admin_token: String,
    jwt: JwtService,
}

impl AdminCredentials {
    pub fn new(admin_token: impl Into<String>, jwt: JwtService) -> Self {
        Self {
            admin_token: admin_token.into(),
            jwt,
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.admin_token.clone(), JwtService::from_config(api))
    }

    /// admin_token 为空时管理 API 关闭
    pub fn is_enabled(&self) -> bool {
        !self.admin_token.is_empty()
    }

    /// 常量时间比较登录口令
    pub fn check_password(&self, password: &str) -> bool {
        self.is_enabled() && bool::from(password.as_bytes().ct_eq(self.admin_token.as_bytes()))
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
