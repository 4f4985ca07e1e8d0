use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,  // Subject（学号）
    pub role: String, // 用户角色
    pub sid: String,  // 会话随机数，必须与用户当前记录一致
    pub iat: i64,     // Issued at (签发时间)
    pub exp: i64,     // Expiration time (时间戳)
}

/// HS256 令牌编解码
///
/// 过期判断不交给 jsonwebtoken，而由调用方用注入的时钟完成。
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: chrono::Duration,
}

impl JwtUtils {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry: chrono::Duration::minutes(config.access_token_expiry),
        }
    }

    /// 凭证有效期
    pub fn expiry(&self) -> chrono::Duration {
        self.expiry
    }

    // 生成 Access Token
    pub fn generate_access_token(
        &self,
        subject: &str,
        role: &str,
        session_nonce: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            sid: session_nonce.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    // 校验签名与结构，不检查过期
    pub fn decode_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 60,
        }
    }

    #[test]
    fn test_generate_and_decode() {
        let jwt = JwtUtils::new(&config("unit-test-secret"));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let token = jwt
            .generate_access_token("20230001", "student", "nonce-1", now)
            .unwrap();

        let claims = jwt.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "20230001");
        assert_eq!(claims.sid, "nonce-1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_decode_ignores_expiry() {
        let jwt = JwtUtils::new(&config("unit-test-secret"));
        let long_ago = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let token = jwt
            .generate_access_token("20230001", "student", "nonce-1", long_ago)
            .unwrap();
        assert!(jwt.decode_token(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtUtils::new(&config("secret-a"));
        let verifier = JwtUtils::new(&config("secret-b"));
        let token = issuer
            .generate_access_token("20230001", "student", "nonce-1", Utc::now())
            .unwrap();
        assert!(verifier.decode_token(&token).is_err());
        assert!(verifier.decode_token("not-a-jwt").is_err());
    }
}
