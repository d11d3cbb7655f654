//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use todo_domain::{
    password::PasswordHash,
    task::{NewTask, Task, TaskDescription, TaskId, TaskTitle},
    user::{Email, User, UserId, UserName},
};
use todo_infra::{
    db::{DbSession, PgSessionFactory, SessionFactory},
    repository::{PostgresUserRepository, UserRepository},
};

/// テスト用の固定時刻
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
}

/// テスト用のセッションを開く
pub async fn open_session(pool: &PgPool) -> DbSession {
    PgSessionFactory::new(pool.clone()).open().await.unwrap()
}

/// テスト用ユーザーを作成する
pub fn build_user(email: &str) -> User {
    User::new(
        UserId::new(),
        Email::new(email).unwrap(),
        UserName::new("テストユーザー").unwrap(),
        test_now(),
    )
}

/// ユーザーを登録してコミットする
pub async fn insert_user(pool: &PgPool, email: &str) -> User {
    let user = build_user(email);
    let mut session = open_session(pool).await;
    PostgresUserRepository::new()
        .insert(&mut session, &user, &PasswordHash::new("$argon2id$dummy"))
        .await
        .unwrap();
    session.commit().await.unwrap();
    user
}

/// テスト用タスクを作成する（作成時刻を分単位でずらせる）
pub fn build_task(owner: &UserId, title: &str, minutes_after: i64) -> Task {
    Task::new(NewTask {
        id:          TaskId::new(),
        user_id:     owner.clone(),
        title:       TaskTitle::new(title).unwrap(),
        description: Some(TaskDescription::new("説明").unwrap()),
        now:         test_now() + Duration::minutes(minutes_after),
    })
}
