//! # TaskRepository
//!
//! タスクの永続化を担当するリポジトリ。
//!
//! すべてのクエリは `user_id` を条件に含める。
//! 他ユーザーのタスクは「存在しない」ものとして扱われる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use todo_domain::{
    task::{Task, TaskDescription, TaskFilter, TaskId, TaskTitle},
    user::UserId,
};
use uuid::Uuid;

use crate::{db::DbSession, error::InfraError};

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// タスクを挿入する
    async fn insert(&self, session: &mut DbSession, task: &Task) -> Result<(), InfraError>;

    /// 所有者のタスクを ID で検索する
    async fn find_by_id(
        &self,
        session: &mut DbSession,
        id: &TaskId,
        user_id: &UserId,
    ) -> Result<Option<Task>, InfraError>;

    /// 所有者のタスクを作成日時の降順で取得する
    async fn find_all_by_user(
        &self,
        session: &mut DbSession,
        user_id: &UserId,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, InfraError>;

    /// タスクの内容を更新する
    ///
    /// 対象行がなかった場合は `false` を返す。
    async fn update(&self, session: &mut DbSession, task: &Task) -> Result<bool, InfraError>;

    /// タスクを削除する
    ///
    /// 対象行がなかった場合は `false` を返す。
    async fn delete(
        &self,
        session: &mut DbSession,
        id: &TaskId,
        user_id: &UserId,
    ) -> Result<bool, InfraError>;
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id:          Uuid,
    user_id:     Uuid,
    title:       String,
    description: Option<String>,
    completed:   bool,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = InfraError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task::from_db(
            TaskId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            TaskTitle::new(row.title)?,
            TaskDescription::optional(row.description)?,
            row.completed,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// PostgreSQL 実装の TaskRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresTaskRepository;

impl PostgresTaskRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(task_id = %task.id()))]
    async fn insert(&self, session: &mut DbSession, task: &Task) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.user_id().as_uuid())
        .bind(task.title().as_str())
        .bind(task.description().map(TaskDescription::as_str))
        .bind(task.completed())
        .bind(task.created_at())
        .bind(task.updated_at())
        .execute(session.conn())
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %user_id))]
    async fn find_by_id(
        &self,
        session: &mut DbSession,
        id: &TaskId,
        user_id: &UserId,
    ) -> Result<Option<Task>, InfraError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(session.conn())
        .await?;

        row.map(Task::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, completed = ?filter.completed))]
    async fn find_all_by_user(
        &self,
        session: &mut DbSession,
        user_id: &UserId,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, InfraError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::BOOLEAN IS NULL OR completed = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(filter.completed)
        .fetch_all(session.conn())
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(task_id = %task.id()))]
    async fn update(&self, session: &mut DbSession, task: &Task) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, completed = $5, updated_at = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.user_id().as_uuid())
        .bind(task.title().as_str())
        .bind(task.description().map(TaskDescription::as_str))
        .bind(task.completed())
        .bind(task.updated_at())
        .execute(session.conn())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %user_id))]
    async fn delete(
        &self,
        session: &mut DbSession,
        id: &TaskId,
        user_id: &UserId,
    ) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(session.conn())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
