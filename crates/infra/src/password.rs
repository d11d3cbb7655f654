//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//!
//! OWASP 推奨パラメータ（RFC 9106）を使用:
//! - Memory: 64 MB
//! - Iterations: 1
//! - Parallelism: 1

use argon2::{
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString, rand_core::OsRng},
};
use todo_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// 存在しないユーザーでログインされた場合に照合するダミーハッシュ
///
/// ユーザーの有無で応答時間が変わらないよう、同じコストの検証を行う。
const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=1,p=1$olntqw+EoVpwH4B1vUAI0A$5yCA1izLODgz8nQOInDGwbuQB/AS0sIQDwpmIilve5M";

/// パスワードのハッシュ化と検証を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// パスワードをハッシュ化する
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;

    /// ダミーハッシュに対して検証を行い、結果を捨てる
    fn verify_dummy(&self, password: &PlainPassword) {
        let _ = self.verify(password, &PasswordHash::new(DUMMY_HASH));
    }
}

/// Argon2id によるパスワードハッシュの実装
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Result<Self, InfraError> {
        let params = Params::new(
            65536, // memory (KB) = 64 MB
            1,     // iterations
            1,     // parallelism
            None,  // output length (default: 32)
        )
        .map_err(|e| InfraError::password_hash(format!("Argon2 パラメータが不正です: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::password_hash(format!("ハッシュ化に失敗しました: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::password_hash(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new().unwrap()
    }

    #[rstest]
    fn test_ハッシュ化したパスワードを検証できる(hasher: Argon2PasswordHasher) {
        let password = PlainPassword::new("correct horse");

        let hash = hasher.hash(&password).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$v=19$m=65536,t=1,p=1$"));
        assert!(hasher.verify(&password, &hash).unwrap().is_match());
    }

    #[rstest]
    fn test_同じパスワードでもソルトが異なる(hasher: Argon2PasswordHasher) {
        let password = PlainPassword::new("correct horse");

        let first = hasher.hash(&password).unwrap();
        let second = hasher.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_異なるパスワードは一致しない(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&PlainPassword::new("correct horse")).unwrap();

        let result = hasher
            .verify(&PlainPassword::new("battery staple"), &hash)
            .unwrap();

        assert_eq!(result, PasswordVerifyResult::Mismatch);
    }

    #[rstest]
    fn test_ダミーハッシュは既知のパスワードと一致する(hasher: Argon2PasswordHasher) {
        let result = hasher
            .verify(
                &PlainPassword::new("password123"),
                &PasswordHash::new(DUMMY_HASH),
            )
            .unwrap();

        assert!(result.is_match());
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー(hasher: Argon2PasswordHasher) {
        let result = hasher.verify(
            &PlainPassword::new("password123"),
            &PasswordHash::new("not-a-valid-hash"),
        );

        assert!(result.is_err());
    }
}
