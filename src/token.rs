//! Survey link token codec
//!
//! Token 格式（base64url，无填充）：
//!
//! ```text
//! version(1) || nonce(12) || AES-256-GCM(link_id 16 bytes) + tag(16)
//! ```
//!
//! - 加密密钥 = SHA-256("surveylinker/token-key" || secret)
//! - nonce = SHA-256("surveylinker/token-nonce" || secret || link_id)[..12]
//!
//! nonce 由 (secret, id) 确定性派生，因此同一链接总是得到同一个 token；
//! 不持有密钥无法从 token 还原 link_id，也无法伪造。
//! 校验只依赖 token 本身和进程级密钥，不需要查库。

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::trace;
use uuid::Uuid;

use crate::errors::{Result, SurveyError};

const TOKEN_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;
const ID_LEN: usize = 16;
const TAG_LEN: usize = 16;
const TOKEN_BYTES: usize = 1 + NONCE_LEN + ID_LEN + TAG_LEN;

const KEY_DOMAIN: &[u8] = b"surveylinker/token-key";
const NONCE_DOMAIN: &[u8] = b"surveylinker/token-nonce";

/// Token 编解码器
///
/// 纯函数：输出只取决于输入和构造时传入的密钥。
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
    nonce_seed: [u8; 32],
}

impl TokenCodec {
    pub fn new(signing_secret: &[u8]) -> Self {
        let key = Sha256::new()
            .chain_update(KEY_DOMAIN)
            .chain_update(signing_secret)
            .finalize();
        let nonce_seed: [u8; 32] = Sha256::new()
            .chain_update(NONCE_DOMAIN)
            .chain_update(signing_secret)
            .finalize()
            .into();

        Self {
            cipher: Aes256Gcm::new(&key),
            nonce_seed,
        }
    }

    fn derive_nonce(&self, id: &Uuid) -> [u8; NONCE_LEN] {
        let digest = Sha256::new()
            .chain_update(self.nonce_seed)
            .chain_update(id.as_bytes())
            .finalize();
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }

    /// 为链接 id 生成 token
    pub fn mint(&self, id: &Uuid) -> Result<String> {
        let nonce = self.derive_nonce(id);
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), id.as_bytes().as_slice())
            .map_err(|_| SurveyError::config("token 加密失败"))?;

        let mut raw = Vec::with_capacity(TOKEN_BYTES);
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// 校验 token 并还原链接 id
    ///
    /// 任何失败（编码错误、长度不符、签名不匹配、密钥不同）都统一返回 `InvalidToken`。
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let invalid = || SurveyError::invalid_token("Invalid survey link token");

        let raw = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|e| {
            trace!("token base64 decode failed: {}", e);
            invalid()
        })?;

        if raw.len() != TOKEN_BYTES || raw[0] != TOKEN_VERSION {
            trace!("token has unexpected length {} or version", raw.len());
            return Err(invalid());
        }

        let (nonce, sealed) = raw[1..].split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| invalid())?;

        let id = Uuid::from_slice(&plain).map_err(|_| invalid())?;

        // 只接受规范形式：nonce 必须与 id 派生出的一致
        let expected = self.derive_nonce(&id);
        if !bool::from(expected.as_slice().ct_eq(nonce)) {
            return Err(invalid());
        }

        Ok(id)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCodec { .. }")
    }
}
