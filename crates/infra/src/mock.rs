//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
   Arc,
   Mutex,
   atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use todo_domain::{
   password::PasswordHash,
   task::{Task, TaskFilter, TaskId},
   user::{Email, User, UserId},
};

use crate::{
   db::{DbSession, SessionFactory},
   error::InfraError,
   repository::{TaskRepository, UserCredentials, UserRepository},
};

// ===== MockSessionFactory =====

/// モックセッションを払い出す SessionFactory
///
/// 開いたセッション数と、手放されたセッション数を数える。
#[derive(Clone, Default)]
pub struct MockSessionFactory {
   opened:   Arc<AtomicUsize>,
   released: Arc<AtomicUsize>,
}

impl MockSessionFactory {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn opened(&self) -> usize {
      self.opened.load(Ordering::SeqCst)
   }

   /// commit・rollback・ドロップで手放されたセッション数
   pub fn released(&self) -> usize {
      self.released.load(Ordering::SeqCst)
   }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
   async fn open(&self) -> Result<DbSession, InfraError> {
      self.opened.fetch_add(1, Ordering::SeqCst);
      Ok(DbSession::mock_tracked(self.released.clone()))
   }
}

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
   users: Arc<Mutex<Vec<UserCredentials>>>,
}

impl MockUserRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add_user(&self, user: User, password_hash: PasswordHash) {
      self.users.lock().unwrap().push(UserCredentials {
         user,
         password_hash,
      });
   }

   pub fn count(&self) -> usize {
      self.users.lock().unwrap().len()
   }
}

#[async_trait]
impl UserRepository for MockUserRepository {
   async fn insert(
      &self,
      _session: &mut DbSession,
      user: &User,
      password_hash: &PasswordHash,
   ) -> Result<(), InfraError> {
      let mut users = self.users.lock().unwrap();
      if users.iter().any(|c| c.user.email() == user.email()) {
         return Err(InfraError::conflict("User", user.email().as_str()));
      }
      users.push(UserCredentials {
         user:          user.clone(),
         password_hash: password_hash.clone(),
      });
      Ok(())
   }

   async fn find_by_email(
      &self,
      _session: &mut DbSession,
      email: &Email,
   ) -> Result<Option<UserCredentials>, InfraError> {
      Ok(self
         .users
         .lock()
         .unwrap()
         .iter()
         .find(|c| c.user.email() == email)
         .cloned())
   }

   async fn find_by_id(
      &self,
      _session: &mut DbSession,
      id: &UserId,
   ) -> Result<Option<User>, InfraError> {
      Ok(self
         .users
         .lock()
         .unwrap()
         .iter()
         .find(|c| c.user.id() == id)
         .map(|c| c.user.clone()))
   }
}

// ===== MockTaskRepository =====

#[derive(Clone, Default)]
pub struct MockTaskRepository {
   tasks: Arc<Mutex<Vec<Task>>>,
}

impl MockTaskRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add_task(&self, task: Task) {
      self.tasks.lock().unwrap().push(task);
   }

   pub fn count(&self) -> usize {
      self.tasks.lock().unwrap().len()
   }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
   async fn insert(&self, _session: &mut DbSession, task: &Task) -> Result<(), InfraError> {
      self.tasks.lock().unwrap().push(task.clone());
      Ok(())
   }

   async fn find_by_id(
      &self,
      _session: &mut DbSession,
      id: &TaskId,
      user_id: &UserId,
   ) -> Result<Option<Task>, InfraError> {
      Ok(self
         .tasks
         .lock()
         .unwrap()
         .iter()
         .find(|t| t.id() == id && t.is_owned_by(user_id))
         .cloned())
   }

   async fn find_all_by_user(
      &self,
      _session: &mut DbSession,
      user_id: &UserId,
      filter: TaskFilter,
   ) -> Result<Vec<Task>, InfraError> {
      let mut tasks: Vec<Task> = self
         .tasks
         .lock()
         .unwrap()
         .iter()
         .filter(|t| t.is_owned_by(user_id))
         .filter(|t| filter.completed.is_none_or(|c| t.completed() == c))
         .cloned()
         .collect();
      tasks.sort_by(|a, b| {
         b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().as_uuid().cmp(a.id().as_uuid()))
      });
      Ok(tasks)
   }

   async fn update(&self, _session: &mut DbSession, task: &Task) -> Result<bool, InfraError> {
      let mut tasks = self.tasks.lock().unwrap();
      match tasks
         .iter_mut()
         .find(|t| t.id() == task.id() && t.is_owned_by(task.user_id()))
      {
         Some(existing) => {
            *existing = task.clone();
            Ok(true)
         }
         None => Ok(false),
      }
   }

   async fn delete(
      &self,
      _session: &mut DbSession,
      id: &TaskId,
      user_id: &UserId,
   ) -> Result<bool, InfraError> {
      let mut tasks = self.tasks.lock().unwrap();
      let before = tasks.len();
      tasks.retain(|t| !(t.id() == id && t.is_owned_by(user_id)));
      Ok(tasks.len() < before)
   }
}
