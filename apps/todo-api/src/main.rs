//! # Todo API サーバー
//!
//! ユーザーごとのタスクを管理する HTTP API サーバー。
//!
//! ## 環境変数
//!
//! [`todo_api::config`] を参照。ワークスペースルートの `.env` が存在すれば
//! 読み込み、既存の環境変数を上書きする。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p todo-api
//!
//! # 本番環境
//! JWT_SECRET=... DATABASE_URL=postgres://... cargo run -p todo-api --release
//! ```

use todo_api::{
   config::{self, AppConfig},
   startup,
};
use todo_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;

/// Todo API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // トレーシング初期化前に読み込み、結果は初期化後にログ出力する
   let dotenv = config::load_dotenv();

   let config = AppConfig::from_env();

   let tracing_config = TracingConfig::from_env("todo-api", config.debug);
   init_tracing(&tracing_config);
   let root_span = tracing_config.root_span();
   let entered = root_span.enter();

   match dotenv {
      Ok(true) => tracing::debug!(path = config::DOTENV_PATH, ".env を読み込みました"),
      Ok(false) => tracing::debug!(path = config::DOTENV_PATH, ".env が見つかりません"),
      Err(e) => tracing::warn!(error = %e, ".env の読み込みに失敗しました"),
   }

   tracing::info!(
      "Todo API サーバーを起動します: {}:{}",
      config.server.host,
      config.server.port
   );

   drop(entered);
   startup::run(config, startup::shutdown_signal())
      .instrument(root_span)
      .await
}
