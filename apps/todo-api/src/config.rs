//! # Todo API 設定
//!
//! 環境変数から Todo API サーバーの設定を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `DATABASE_URL` | 空 | PostgreSQL 接続 URL |
//! | `NEON_DATABASE_URL` | 空 | `DATABASE_URL` が空のときに使う接続 URL |
//! | `JWT_SECRET` | 空 | トークン署名鍵（空なら起動しない） |
//! | `DEBUG` | `false` | `true`（大文字小文字を問わない）で SQL ログを出力 |
//! | `HOST` | `0.0.0.0` | バインドアドレス |
//! | `PORT` | `8000` | ポート番号 |
//! | `JWT_EXPIRATION_MINUTES` | `1440` | アクセストークンの有効期間（分、1 以上 525600 以下） |
//!
//! 読み込み時は型変換のみ行い、必須項目のチェックは起動時に
//! [`crate::startup::verify_startup`] が行う。

use std::{fmt, path::Path};

/// `.env` ファイルの位置（ワークスペースルート）
pub const DOTENV_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../.env");

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;

/// トークン有効期間の上限（365 日）。超える値はデフォルトに戻す
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

/// `.env` を読み込み、既存の環境変数を上書きする
///
/// ファイルが存在しない場合は `Ok(false)` を返す。
pub fn load_dotenv() -> Result<bool, dotenvy::Error> {
   load_dotenv_from(Path::new(DOTENV_PATH))
}

/// 指定パスの `.env` を読み込み、既存の環境変数を上書きする
pub fn load_dotenv_from(path: &Path) -> Result<bool, dotenvy::Error> {
   match dotenvy::from_path_override(path) {
      Ok(()) => Ok(true),
      Err(e) if e.not_found() => Ok(false),
      Err(e) => Err(e),
   }
}

/// `DEBUG` の値を真偽値に変換する
///
/// 大文字小文字を区別せず `"true"` と一致する場合のみ真。
pub fn parse_debug_flag(value: Option<&str>) -> bool {
   value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Todo API サーバーの設定
#[derive(Debug, Clone)]
pub struct AppConfig {
   pub server:   ServerConfig,
   pub database: DatabaseConfig,
   pub auth:     AuthConfig,
   /// デバッグモード（SQL ログ出力）
   pub debug:    bool,
}

/// バインド先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
   pub host: String,
   pub port: u16,
}

/// データベース接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
   pub url:      String,
   pub neon_url: String,
}

impl DatabaseConfig {
   /// 実際に接続する URL
   ///
   /// `DATABASE_URL` を優先し、空なら `NEON_DATABASE_URL` を使う。
   pub fn effective_url(&self) -> Option<&str> {
      [self.url.as_str(), self.neon_url.as_str()]
         .into_iter()
         .map(str::trim)
         .find(|url| !url.is_empty())
   }
}

/// トークン署名の設定
#[derive(Clone)]
pub struct AuthConfig {
   pub jwt_secret:        String,
   pub token_ttl_minutes: i64,
}

impl fmt::Debug for AuthConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("AuthConfig")
         .field("jwt_secret", &"[REDACTED]")
         .field("token_ttl_minutes", &self.token_ttl_minutes)
         .finish()
   }
}

impl AppConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Self {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// テストでは環境変数の代わりにマップを渡す。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
      let text = |key: &str| lookup(key).unwrap_or_default();

      Self {
         server:   ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
               .and_then(|v| v.trim().parse().ok())
               .unwrap_or(DEFAULT_PORT),
         },
         database: DatabaseConfig {
            url:      text("DATABASE_URL"),
            neon_url: text("NEON_DATABASE_URL"),
         },
         auth:     AuthConfig {
            jwt_secret:        text("JWT_SECRET"),
            token_ttl_minutes: lookup("JWT_EXPIRATION_MINUTES")
               .and_then(|v| v.trim().parse().ok())
               .filter(|minutes: &i64| (1..=MAX_TOKEN_TTL_MINUTES).contains(minutes))
               .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
         },
         debug:    parse_debug_flag(lookup("DEBUG").as_deref()),
      }
   }
}
