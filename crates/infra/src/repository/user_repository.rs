//! # UserRepository
//!
//! ユーザーと認証用パスワードハッシュの永続化を担当する。
//!
//! メールアドレスは正規化済み（小文字）の値で保存し、
//! `users.email` の UNIQUE 制約で重複登録を防ぐ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use todo_domain::{
    password::PasswordHash,
    user::{Email, User, UserId, UserName},
};
use uuid::Uuid;

use crate::{db::DbSession, error::InfraError};

/// ログイン照合用のユーザー情報
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user:          User,
    pub password_hash: PasswordHash,
}

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを登録する
    ///
    /// # Errors
    ///
    /// メールアドレスが登録済みの場合は Conflict を返す。
    async fn insert(
        &self,
        session: &mut DbSession,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), InfraError>;

    /// メールアドレスでユーザーを検索する
    async fn find_by_email(
        &self,
        session: &mut DbSession,
        email: &Email,
    ) -> Result<Option<UserCredentials>, InfraError>;

    /// ID でユーザーを検索する
    async fn find_by_id(
        &self,
        session: &mut DbSession,
        id: &UserId,
    ) -> Result<Option<User>, InfraError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id:            Uuid,
    email:         String,
    name:          String,
    password_hash: String,
    created_at:    DateTime<Utc>,
    updated_at:    DateTime<Utc>,
}

impl TryFrom<UserRow> for UserCredentials {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user:          User::from_db(
                UserId::from_uuid(row.id),
                Email::new(row.email)?,
                UserName::new(row.name)?,
                row.created_at,
                row.updated_at,
            ),
            password_hash: PasswordHash::new(row.password_hash),
        })
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user.id()))]
    async fn insert(
        &self,
        session: &mut DbSession,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), InfraError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.name().as_str())
        .bind(password_hash.as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(session.conn())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(InfraError::conflict("User", user.email().as_str()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(
        &self,
        session: &mut DbSession,
        email: &Email,
    ) -> Result<Option<UserCredentials>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(session.conn())
        .await?;

        row.map(UserCredentials::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(
        &self,
        session: &mut DbSession,
        id: &UserId,
    ) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(session.conn())
        .await?;

        Ok(row
            .map(UserCredentials::try_from)
            .transpose()?
            .map(|credentials| credentials.user))
    }
}
