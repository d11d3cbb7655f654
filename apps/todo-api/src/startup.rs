//! # 起動とシャットダウン
//!
//! 起動前チェック、DB エンジンの作成、サーバーの起動と停止を行う。
//!
//! ## 起動順序
//!
//! 1. [`verify_startup`]: 署名鍵と接続 URL の存在を確認（失敗したらリスナーを開かない）
//! 2. エンジン作成とマイグレーション
//! 3. ルーター構築、バインド、サーブ
//! 4. シャットダウンシグナル受信後、処理中のリクエストを待ってエンジンを破棄

use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use thiserror::Error;
use todo_infra::db::{self, Engine};
use tokio::net::TcpListener;

use crate::{
   app_builder::{AppDependencies, build_app},
   config::AppConfig,
};

/// 起動を中止する設定不備
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
   #[error("JWT_SECRET が設定されていません")]
   MissingSigningSecret,

   #[error("DATABASE_URL と NEON_DATABASE_URL のどちらも設定されていません")]
   MissingDatabaseUrl,
}

/// 起動に必要な設定がそろっているか確認し、接続 URL を返す
///
/// 署名鍵を先に確認する。空白だけの署名鍵も未設定として扱う。
pub fn verify_startup(config: &AppConfig) -> Result<&str, StartupError> {
   if config.auth.jwt_secret.trim().is_empty() {
      return Err(StartupError::MissingSigningSecret);
   }
   config
      .database
      .effective_url()
      .ok_or(StartupError::MissingDatabaseUrl)
}

/// Ctrl-C または SIGTERM を待つ
pub async fn shutdown_signal() {
   let ctrl_c = async {
      if let Err(e) = tokio::signal::ctrl_c().await {
         tracing::error!(error = %e, "Ctrl-C ハンドラの登録に失敗しました");
         std::future::pending::<()>().await;
      }
   };

   #[cfg(unix)]
   let terminate = async {
      match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
         Ok(mut signal) => {
            signal.recv().await;
         }
         Err(e) => {
            tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
         }
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      () = ctrl_c => {},
      () = terminate => {},
   }

   tracing::info!("シャットダウンシグナルを受信しました");
}

/// サーバーを起動し、`shutdown` が完了するまで処理を続ける
///
/// 戻る前に必ずエンジンを破棄する。
pub async fn run(
   config: AppConfig,
   shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
   let database_url = verify_startup(&config)?;

   let engine = Arc::new(
      Engine::connect_lazy(database_url, config.debug)
         .context("データベース接続設定の解析に失敗しました")?,
   );

   let result = serve(&config, engine.clone(), shutdown).await;

   engine.dispose().await;
   result
}

async fn serve(
   config: &AppConfig,
   engine: Arc<Engine>,
   shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
   db::run_migrations(engine.pool())
      .await
      .context("マイグレーションの実行に失敗しました")?;
   tracing::info!("マイグレーションを適用しました");

   let deps = AppDependencies::postgres(
      engine,
      &config.auth.jwt_secret,
      config.auth.token_ttl_minutes,
   )?;
   let app = build_app(deps);

   let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
      .parse()
      .context("バインドアドレスの解析に失敗しました")?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Todo API サーバーが起動しました: {}", addr);

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown)
      .await?;

   tracing::info!("サーバーを停止しました");
   Ok(())
}
