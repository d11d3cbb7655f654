//! # タスクハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/tasks` - 一覧（`?completed=true|false` で絞り込み）
//! - `POST /api/tasks` - 作成
//! - `GET /api/tasks/{id}` - 取得
//! - `PUT /api/tasks/{id}` - 部分更新
//! - `PATCH /api/tasks/{id}/complete` - 完了状態の反転
//! - `DELETE /api/tasks/{id}` - 削除
//!
//! すべて認証ミドルウェアの内側に配置し、[`CurrentUser`] を前提とする。

use std::sync::Arc;

use axum::{
   Extension,
   Json,
   extract::{Path, Query, State},
   http::StatusCode,
   response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use todo_domain::task::{Task, TaskFilter, TaskId};
use uuid::Uuid;

use crate::{
   error::ApiError,
   middleware::CurrentUser,
   usecase::{CreateTaskInput, TaskUseCase, UpdateTaskInput},
};

/// タスクハンドラの共有状態
pub struct TaskState {
   pub usecase: Arc<dyn TaskUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// 一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
   pub completed: Option<bool>,
}

/// タスク作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
   pub title:       String,
   #[serde(default)]
   pub description: Option<String>,
}

/// タスク更新リクエスト
///
/// 省略したフィールドは変更しない。`description` は `null` でも空文字でも削除になる。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
   #[serde(default)]
   pub title:       Option<String>,
   #[serde(default, deserialize_with = "present")]
   pub description: Option<Option<String>>,
   #[serde(default)]
   pub completed:   Option<bool>,
}

/// キーがあれば値が `null` でも `Some` にする。キーが無ければ `default` で `None`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
   D: Deserializer<'de>,
   T: Deserialize<'de>,
{
   T::deserialize(deserializer).map(Some)
}

/// タスク情報
#[derive(Debug, Serialize)]
pub struct TaskRead {
   pub id:          Uuid,
   pub user_id:     Uuid,
   pub title:       String,
   pub description: Option<String>,
   pub completed:   bool,
   pub created_at:  DateTime<Utc>,
   pub updated_at:  DateTime<Utc>,
}

impl From<Task> for TaskRead {
   fn from(task: Task) -> Self {
      Self {
         id:          *task.id().as_uuid(),
         user_id:     *task.user_id().as_uuid(),
         title:       task.title().as_str().to_string(),
         description: task.description().map(|d| d.as_str().to_string()),
         completed:   task.completed(),
         created_at:  task.created_at(),
         updated_at:  task.updated_at(),
      }
   }
}

// --- ハンドラ ---

/// GET /api/tasks
pub async fn list_tasks(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Query(query): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, ApiError> {
   let tasks = state
      .usecase
      .list(&current.user_id, TaskFilter {
         completed: query.completed,
      })
      .await?;

   Ok(Json(
      tasks.into_iter().map(TaskRead::from).collect::<Vec<_>>(),
   ))
}

/// POST /api/tasks
pub async fn create_task(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let task = state
      .usecase
      .create(&current.user_id, CreateTaskInput {
         title:       req.title,
         description: req.description,
      })
      .await?;

   Ok((StatusCode::CREATED, Json(TaskRead::from(task))))
}

/// GET /api/tasks/{id}
pub async fn get_task(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
   let task = state
      .usecase
      .get(&current.user_id, &TaskId::from_uuid(id))
      .await?;

   Ok(Json(TaskRead::from(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Path(id): Path<Uuid>,
   Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let task = state
      .usecase
      .update(&current.user_id, &TaskId::from_uuid(id), UpdateTaskInput {
         title:       req.title,
         description: req.description,
         completed:   req.completed,
      })
      .await?;

   Ok(Json(TaskRead::from(task)))
}

/// PATCH /api/tasks/{id}/complete
pub async fn toggle_task(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
   let task = state
      .usecase
      .toggle_complete(&current.user_id, &TaskId::from_uuid(id))
      .await?;

   Ok(Json(TaskRead::from(task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
   State(state): State<Arc<TaskState>>,
   Extension(current): Extension<CurrentUser>,
   Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
   state
      .usecase
      .delete(&current.user_id, &TaskId::from_uuid(id))
      .await?;

   Ok(StatusCode::NO_CONTENT)
}
