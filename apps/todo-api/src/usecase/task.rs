//! # タスクユースケース
//!
//! ログイン中のユーザーが所有するタスクの CRUD を実装する。
//!
//! 他ユーザーのタスクは存在しないものとして扱い、404 を返す。

use std::sync::Arc;

use async_trait::async_trait;
use todo_domain::{
   DomainError,
   clock::Clock,
   task::{NewTask, Task, TaskChanges, TaskDescription, TaskFilter, TaskId, TaskTitle},
   user::UserId,
};
use todo_infra::{db::SessionFactory, repository::TaskRepository};

use crate::error::ApiError;

/// タスク作成の入力
#[derive(Debug)]
pub struct CreateTaskInput {
   pub title:       String,
   pub description: Option<String>,
}

/// タスク更新の入力
///
/// `None` のフィールドは変更しない。`description` は `Some(None)` か
/// 空文字で説明を削除する。
#[derive(Debug, Default)]
pub struct UpdateTaskInput {
   pub title:       Option<String>,
   pub description: Option<Option<String>>,
   pub completed:   Option<bool>,
}

impl UpdateTaskInput {
   fn into_changes(self) -> Result<TaskChanges, ApiError> {
      Ok(TaskChanges {
         title:       self.title.map(TaskTitle::new).transpose()?,
         description: self
            .description
            .map(TaskDescription::optional)
            .transpose()?,
         completed:   self.completed,
      })
   }
}

/// タスクユースケース
#[async_trait]
pub trait TaskUseCase: Send + Sync {
   async fn list(&self, user_id: &UserId, filter: TaskFilter) -> Result<Vec<Task>, ApiError>;

   async fn create(&self, user_id: &UserId, input: CreateTaskInput) -> Result<Task, ApiError>;

   async fn get(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, ApiError>;

   async fn update(
      &self,
      user_id: &UserId,
      task_id: &TaskId,
      input: UpdateTaskInput,
   ) -> Result<Task, ApiError>;

   /// 完了状態を反転する
   async fn toggle_complete(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, ApiError>;

   async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), ApiError>;
}

/// タスクユースケースの実装
pub struct TaskUseCaseImpl {
   sessions:        Arc<dyn SessionFactory>,
   task_repository: Arc<dyn TaskRepository>,
   clock:           Arc<dyn Clock>,
}

impl TaskUseCaseImpl {
   pub fn new(
      sessions: Arc<dyn SessionFactory>,
      task_repository: Arc<dyn TaskRepository>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         sessions,
         task_repository,
         clock,
      }
   }
}

fn task_not_found(task_id: &TaskId) -> ApiError {
   DomainError::task_not_found(task_id).into()
}

#[async_trait]
impl TaskUseCase for TaskUseCaseImpl {
   #[tracing::instrument(skip_all, fields(%user_id))]
   async fn list(&self, user_id: &UserId, filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
      let mut session = self.sessions.open().await?;

      let tasks = self
         .task_repository
         .find_all_by_user(&mut session, user_id, filter)
         .await?;
      Ok(tasks)
   }

   #[tracing::instrument(skip_all, fields(%user_id))]
   async fn create(&self, user_id: &UserId, input: CreateTaskInput) -> Result<Task, ApiError> {
      let task = Task::new(NewTask {
         id:          TaskId::new(),
         user_id:     user_id.clone(),
         title:       TaskTitle::new(input.title)?,
         description: TaskDescription::optional(input.description)?,
         now:         self.clock.now(),
      });

      let mut session = self.sessions.open().await?;
      self.task_repository.insert(&mut session, &task).await?;
      session.commit().await?;

      tracing::debug!(task_id = %task.id(), "タスクを作成しました");
      Ok(task)
   }

   #[tracing::instrument(skip_all, fields(%user_id, %task_id))]
   async fn get(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, ApiError> {
      let mut session = self.sessions.open().await?;

      self
         .task_repository
         .find_by_id(&mut session, task_id, user_id)
         .await?
         .ok_or_else(|| task_not_found(task_id))
   }

   #[tracing::instrument(skip_all, fields(%user_id, %task_id))]
   async fn update(
      &self,
      user_id: &UserId,
      task_id: &TaskId,
      input: UpdateTaskInput,
   ) -> Result<Task, ApiError> {
      let changes = input.into_changes()?;

      let mut session = self.sessions.open().await?;
      let task = self
         .task_repository
         .find_by_id(&mut session, task_id, user_id)
         .await?
         .ok_or_else(|| task_not_found(task_id))?;

      let updated = task.apply(changes, self.clock.now());
      if !self.task_repository.update(&mut session, &updated).await? {
         return Err(task_not_found(task_id));
      }
      session.commit().await?;

      Ok(updated)
   }

   #[tracing::instrument(skip_all, fields(%user_id, %task_id))]
   async fn toggle_complete(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, ApiError> {
      let mut session = self.sessions.open().await?;
      let task = self
         .task_repository
         .find_by_id(&mut session, task_id, user_id)
         .await?
         .ok_or_else(|| task_not_found(task_id))?;

      let toggled = task.toggled(self.clock.now());
      if !self.task_repository.update(&mut session, &toggled).await? {
         return Err(task_not_found(task_id));
      }
      session.commit().await?;

      Ok(toggled)
   }

   #[tracing::instrument(skip_all, fields(%user_id, %task_id))]
   async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), ApiError> {
      let mut session = self.sessions.open().await?;

      if !self
         .task_repository
         .delete(&mut session, task_id, user_id)
         .await?
      {
         return Err(task_not_found(task_id));
      }
      session.commit().await?;

      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use chrono::{DateTime, Duration, TimeZone, Utc};
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};
   use todo_domain::clock::FixedClock;
   use todo_infra::mock::{MockSessionFactory, MockTaskRepository};

   use super::*;

   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
   }

   struct Setup {
      sut:      TaskUseCaseImpl,
      tasks:    MockTaskRepository,
      sessions: MockSessionFactory,
      owner:    UserId,
   }

   #[fixture]
   fn setup() -> Setup {
      let tasks = MockTaskRepository::new();
      let sessions = MockSessionFactory::new();
      let sut = TaskUseCaseImpl::new(
         Arc::new(sessions.clone()),
         Arc::new(tasks.clone()),
         Arc::new(FixedClock::new(now())),
      );

      Setup {
         sut,
         tasks,
         sessions,
         owner: UserId::new(),
      }
   }

   fn existing_task(owner: &UserId, title: &str, created_at: DateTime<Utc>) -> Task {
      Task::new(NewTask {
         id:          TaskId::new(),
         user_id:     owner.clone(),
         title:       TaskTitle::new(title).unwrap(),
         description: Some(TaskDescription::new("メモ").unwrap()),
         now:         created_at,
      })
   }

   fn create_input(title: &str) -> CreateTaskInput {
      CreateTaskInput {
         title:       title.to_string(),
         description: None,
      }
   }

   #[rstest]
   #[tokio::test]
   async fn test_タスクを作成すると未完了で保存される(setup: Setup) {
      let task = setup
         .sut
         .create(
            &setup.owner,
            CreateTaskInput {
               title:       "  牛乳を買う ".to_string(),
               description: Some("2本".to_string()),
            },
         )
         .await
         .unwrap();

      assert_eq!(task.title().as_str(), "牛乳を買う");
      assert_eq!(task.description().map(|d| d.as_str()), Some("2本"));
      assert!(!task.completed());
      assert_eq!(task.created_at(), now());
      assert!(task.is_owned_by(&setup.owner));
      assert_eq!(setup.tasks.count(), 1);
      assert_eq!(setup.sessions.opened(), 1);
   }

   #[rstest]
   #[case("")]
   #[case("   ")]
   #[tokio::test]
   async fn test_空のタイトルはバリデーションエラー(setup: Setup, #[case] title: &str) {
      let result = setup.sut.create(&setup.owner, create_input(title)).await;

      assert!(matches!(result, Err(ApiError::Validation(_))));
      assert_eq!(setup.tasks.count(), 0);
   }

   #[rstest]
   #[tokio::test]
   async fn test_一覧は自分のタスクだけを新しい順に返す(setup: Setup) {
      let older = existing_task(&setup.owner, "古い", now() - Duration::hours(2));
      let newer = existing_task(&setup.owner, "新しい", now() - Duration::hours(1));
      setup.tasks.add_task(older.clone());
      setup.tasks.add_task(newer.clone());
      setup
         .tasks
         .add_task(existing_task(&UserId::new(), "他人", now()));

      let tasks = setup
         .sut
         .list(&setup.owner, TaskFilter::default())
         .await
         .unwrap();

      assert_eq!(tasks, vec![newer, older]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_完了状態で絞り込める(setup: Setup) {
      let done = existing_task(&setup.owner, "済", now()).toggled(now());
      let todo = existing_task(&setup.owner, "未", now());
      setup.tasks.add_task(done.clone());
      setup.tasks.add_task(todo.clone());

      let completed = setup
         .sut
         .list(&setup.owner, TaskFilter {
            completed: Some(true),
         })
         .await
         .unwrap();
      let pending = setup
         .sut
         .list(&setup.owner, TaskFilter {
            completed: Some(false),
         })
         .await
         .unwrap();

      assert_eq!(completed, vec![done]);
      assert_eq!(pending, vec![todo]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_他人のタスクは取得できない(setup: Setup) {
      let other = existing_task(&UserId::new(), "他人", now());
      setup.tasks.add_task(other.clone());

      let result = setup.sut.get(&setup.owner, other.id()).await;

      assert!(matches!(result, Err(ApiError::NotFound(_))));
   }

   #[rstest]
   #[tokio::test]
   async fn test_部分更新は指定したフィールドだけを変える(setup: Setup) {
      let task = existing_task(&setup.owner, "元のタイトル", now() - Duration::hours(1));
      setup.tasks.add_task(task.clone());

      let updated = setup
         .sut
         .update(&setup.owner, task.id(), UpdateTaskInput {
            title: Some("新しいタイトル".to_string()),
            ..Default::default()
         })
         .await
         .unwrap();

      assert_eq!(updated.title().as_str(), "新しいタイトル");
      assert_eq!(updated.description().map(|d| d.as_str()), Some("メモ"));
      assert!(!updated.completed());
      assert_eq!(updated.updated_at(), now());

      let stored = setup.sut.get(&setup.owner, task.id()).await.unwrap();
      assert_eq!(stored, updated);
   }

   #[rstest]
   #[tokio::test]
   async fn test_空の説明を渡すと説明が消える(setup: Setup) {
      let task = existing_task(&setup.owner, "タスク", now());
      setup.tasks.add_task(task.clone());

      let updated = setup
         .sut
         .update(&setup.owner, task.id(), UpdateTaskInput {
            description: Some(Some(String::new())),
            completed: Some(true),
            ..Default::default()
         })
         .await
         .unwrap();

      assert_eq!(updated.description(), None);
      assert!(updated.completed());
   }

   #[rstest]
   #[tokio::test]
   async fn test_説明にnullを渡しても説明が消える(setup: Setup) {
      let task = existing_task(&setup.owner, "タスク", now());
      setup.tasks.add_task(task.clone());

      let updated = setup
         .sut
         .update(&setup.owner, task.id(), UpdateTaskInput {
            description: Some(None),
            ..Default::default()
         })
         .await
         .unwrap();

      assert_eq!(updated.description(), None);
      assert_eq!(updated.title().as_str(), "タスク");
   }

   #[rstest]
   #[tokio::test]
   async fn test_他人のタスクは更新できない(setup: Setup) {
      let other = existing_task(&UserId::new(), "他人", now());
      setup.tasks.add_task(other.clone());

      let result = setup
         .sut
         .update(&setup.owner, other.id(), UpdateTaskInput {
            completed: Some(true),
            ..Default::default()
         })
         .await;

      assert!(matches!(result, Err(ApiError::NotFound(_))));
   }

   #[rstest]
   #[tokio::test]
   async fn test_完了状態を二回反転すると元に戻る(setup: Setup) {
      let task = existing_task(&setup.owner, "タスク", now());
      setup.tasks.add_task(task.clone());

      let first = setup
         .sut
         .toggle_complete(&setup.owner, task.id())
         .await
         .unwrap();
      let second = setup
         .sut
         .toggle_complete(&setup.owner, task.id())
         .await
         .unwrap();

      assert!(first.completed());
      assert!(!second.completed());
   }

   #[rstest]
   #[tokio::test]
   async fn test_削除したタスクは取得できなくなる(setup: Setup) {
      let task = existing_task(&setup.owner, "タスク", now());
      setup.tasks.add_task(task.clone());

      setup.sut.delete(&setup.owner, task.id()).await.unwrap();

      assert_eq!(setup.tasks.count(), 0);
      assert!(matches!(
         setup.sut.delete(&setup.owner, task.id()).await,
         Err(ApiError::NotFound(_))
      ));
   }

   #[rstest]
   #[tokio::test]
   async fn test_他人のタスクは削除できない(setup: Setup) {
      let other = existing_task(&UserId::new(), "他人", now());
      setup.tasks.add_task(other.clone());

      let result = setup.sut.delete(&setup.owner, other.id()).await;

      assert!(matches!(result, Err(ApiError::NotFound(_))));
      assert_eq!(setup.tasks.count(), 1);
   }

   #[derive(Debug, Clone, Copy)]
   enum Operation {
      Get,
      Update,
      Toggle,
      Delete,
   }

   #[rstest]
   #[case(Operation::Get)]
   #[case(Operation::Update)]
   #[case(Operation::Toggle)]
   #[case(Operation::Delete)]
   #[tokio::test]
   async fn test_404で終わってもセッションは解放される(
      setup: Setup,
      #[case] operation: Operation,
   ) {
      let other = existing_task(&UserId::new(), "他人", now());
      setup.tasks.add_task(other.clone());

      let result = match operation {
         Operation::Get => setup.sut.get(&setup.owner, other.id()).await.map(drop),
         Operation::Update => setup
            .sut
            .update(&setup.owner, other.id(), UpdateTaskInput::default())
            .await
            .map(drop),
         Operation::Toggle => setup
            .sut
            .toggle_complete(&setup.owner, other.id())
            .await
            .map(drop),
         Operation::Delete => setup.sut.delete(&setup.owner, other.id()).await,
      };

      assert!(matches!(result, Err(ApiError::NotFound(_))));
      assert_eq!(setup.sessions.opened(), 1);
      assert_eq!(setup.sessions.released(), 1);
   }

   #[rstest]
   #[tokio::test]
   async fn test_コミットしたセッションも解放される(setup: Setup) {
      setup
         .sut
         .create(&setup.owner, create_input("タスク"))
         .await
         .unwrap();

      assert_eq!(setup.sessions.opened(), 1);
      assert_eq!(setup.sessions.released(), 1);
   }
}
