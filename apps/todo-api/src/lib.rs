//! # Todo API ライブラリ
//!
//! ユーザーごとのタスクを管理する HTTP API のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `config`: 環境変数と `.env` からの設定読み込み
//! - `startup`: 起動前チェック、サーバー起動、シャットダウン
//! - `app_builder`: DI とルーター構築
//! - `handler`: HTTP ハンドラ
//! - `middleware`: Bearer トークン認証
//! - `usecase`: ビジネスロジック
//! - `error`: API エラーと Problem Details への変換

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod startup;
pub mod usecase;
