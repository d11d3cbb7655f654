//! # アクセストークン
//!
//! HS256 で署名した JWT の発行と検証を行う。
//!
//! クレーム:
//!
//! | クレーム | 内容 |
//! |---------|------|
//! | `sub` | ユーザー ID（UUID） |
//! | `email` | メールアドレス |
//! | `iat` | 発行時刻（UNIX 秒） |
//! | `exp` | 有効期限（UNIX 秒） |

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm,
    DecodingKey,
    EncodingKey,
    Header,
    Validation,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use todo_domain::{
    token::{AccessToken, IssuedToken, TokenSubject},
    user::{Email, UserId},
};
use uuid::Uuid;

use crate::InfraError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub:   String,
    email: String,
    iat:   i64,
    exp:   i64,
}

/// トークンの発行と検証を担当するトレイト
pub trait TokenService: Send + Sync {
    /// ユーザーに対してトークンを発行する
    fn issue(
        &self,
        user_id: &UserId,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, InfraError>;

    /// トークンを検証し、主体を返す
    ///
    /// # Errors
    ///
    /// 署名不一致・期限切れ・形式不正はいずれも
    /// [`InfraErrorKind::Token`](crate::InfraErrorKind::Token) になる。
    fn verify(&self, token: &str) -> Result<TokenSubject, InfraError>;
}

/// HS256 署名の JWT 実装
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation:   Validation,
    ttl:          Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(
        &self,
        user_id: &UserId,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, InfraError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| InfraError::unexpected("トークンの有効期限が表現できる範囲を超えています"))?;
        let claims = Claims {
            sub:   user_id.to_string(),
            email: email.as_str().to_string(),
            iat:   now.timestamp(),
            exp:   expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token: AccessToken::new(token),
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<TokenSubject, InfraError> {
        let claims =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| InfraError::from(jsonwebtoken::errors::Error::from(ErrorKind::InvalidSubject)))?;
        let email = Email::new(claims.email)
            .map_err(|_| InfraError::from(jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken)))?;

        Ok(TokenSubject {
            user_id: UserId::from_uuid(user_id),
            email,
        })
    }
}
