//! # タスク
//!
//! ユーザーが所有する Todo 項目を定義する。
//!
//! ## 不変条件
//!
//! - タスクは作成したユーザーだけが参照・変更できる（[`Task::is_owned_by`]）
//! - タイトルは 1〜200 文字
//! - 説明は任意。空白のみの説明は「説明なし」として扱う
//! - 状態を変更する操作は必ず `updated_at` を進める

use chrono::{DateTime, Utc};

use crate::{DomainError, user::UserId};

define_uuid_id! {
   /// タスク ID（UUID v7）
   pub struct TaskId;
}

define_validated_string! {
   /// タスクのタイトル（1〜200 文字）
   pub struct TaskTitle {
      label: "タイトル",
      max_chars: 200,
   }
}

define_validated_string! {
   /// タスクの説明（最大 2000 文字）
   pub struct TaskDescription {
      label: "説明",
      max_chars: 2000,
   }
}

impl TaskDescription {
   /// 任意入力の説明を検証する
   ///
   /// `None` や空白のみの文字列は `Ok(None)` になる。
   pub fn optional(value: Option<String>) -> Result<Option<Self>, DomainError> {
      match value {
         Some(v) if !v.trim().is_empty() => Self::new(v).map(Some),
         _ => Ok(None),
      }
   }
}

/// タスク一覧の絞り込み条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
   /// 完了状態で絞り込む（`None` なら全件）
   pub completed: Option<bool>,
}

/// タスク作成時の入力
#[derive(Debug, Clone)]
pub struct NewTask {
   pub id:          TaskId,
   pub user_id:     UserId,
   pub title:       TaskTitle,
   pub description: Option<TaskDescription>,
   pub now:         DateTime<Utc>,
}

/// タスクの部分更新
///
/// `None` のフィールドは変更しない。説明を消す場合は
/// `description: Some(None)` を指定する。
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
   pub title:       Option<TaskTitle>,
   pub description: Option<Option<TaskDescription>>,
   pub completed:   Option<bool>,
}

impl TaskChanges {
   pub fn is_empty(&self) -> bool {
      self.title.is_none() && self.description.is_none() && self.completed.is_none()
   }
}

/// タスクエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
   id:          TaskId,
   user_id:     UserId,
   title:       TaskTitle,
   description: Option<TaskDescription>,
   completed:   bool,
   created_at:  DateTime<Utc>,
   updated_at:  DateTime<Utc>,
}

impl Task {
   /// 未完了のタスクを作成する
   pub fn new(input: NewTask) -> Self {
      Self {
         id:          input.id,
         user_id:     input.user_id,
         title:       input.title,
         description: input.description,
         completed:   false,
         created_at:  input.now,
         updated_at:  input.now,
      }
   }

   /// 既存のデータから復元する
   pub fn from_db(
      id: TaskId,
      user_id: UserId,
      title: TaskTitle,
      description: Option<TaskDescription>,
      completed: bool,
      created_at: DateTime<Utc>,
      updated_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         user_id,
         title,
         description,
         completed,
         created_at,
         updated_at,
      }
   }

   pub fn id(&self) -> &TaskId {
      &self.id
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn title(&self) -> &TaskTitle {
      &self.title
   }

   pub fn description(&self) -> Option<&TaskDescription> {
      self.description.as_ref()
   }

   pub fn completed(&self) -> bool {
      self.completed
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }

   /// 指定ユーザーが所有者かどうか
   pub fn is_owned_by(&self, user_id: &UserId) -> bool {
      &self.user_id == user_id
   }

   /// 部分更新を適用した新しいタスクを返す
   ///
   /// 変更内容が空でも `updated_at` は進める。
   pub fn apply(self, changes: TaskChanges, now: DateTime<Utc>) -> Self {
      Self {
         title: changes.title.unwrap_or(self.title),
         description: changes.description.unwrap_or(self.description),
         completed: changes.completed.unwrap_or(self.completed),
         updated_at: now,
         ..self
      }
   }

   /// 完了状態を反転した新しいタスクを返す
   pub fn toggled(self, now: DateTime<Utc>) -> Self {
      Self {
         completed: !self.completed,
         updated_at: now,
         ..self
      }
   }
}

#[cfg(test)]
mod tests {
   use chrono::{Duration, TimeZone};
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;

   #[fixture]
   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
   }

   #[fixture]
   fn task(now: DateTime<Utc>) -> Task {
      Task::new(NewTask {
         id: TaskId::new(),
         user_id: UserId::new(),
         title: TaskTitle::new("牛乳を買う").unwrap(),
         description: Some(TaskDescription::new("低脂肪").unwrap()),
         now,
      })
   }

   #[rstest]
   fn test_新規タスクは未完了で作成される(task: Task, now: DateTime<Utc>) {
      assert!(!task.completed());
      assert_eq!(task.created_at(), now);
      assert_eq!(task.updated_at(), now);
   }

   #[rstest]
   fn test_所有者判定(task: Task) {
      let owner = task.user_id().clone();

      assert!(task.is_owned_by(&owner));
      assert!(!task.is_owned_by(&UserId::new()));
   }

   #[rstest]
   #[case("")]
   #[case("   ")]
   fn test_空のタイトルはエラーになる(#[case] input: &str) {
      assert!(matches!(
         TaskTitle::new(input),
         Err(DomainError::Validation(_))
      ));
   }

   #[rstest]
   fn test_タイトルは200文字まで許可される() {
      assert!(TaskTitle::new("a".repeat(200)).is_ok());
      assert!(TaskTitle::new("a".repeat(201)).is_err());
   }

   #[rstest]
   fn test_タイトルの前後の空白は除去される() {
      let title = TaskTitle::new("  掃除  ").unwrap();
      assert_eq!(title.as_str(), "掃除");
   }

   #[rstest]
   #[case(None)]
   #[case(Some(""))]
   #[case(Some("   "))]
   fn test_空の説明はnoneになる(#[case] input: Option<&str>) {
      let result = TaskDescription::optional(input.map(str::to_string)).unwrap();
      assert_eq!(result, None);
   }

   #[rstest]
   fn test_2000文字を超える説明はエラーになる() {
      let result = TaskDescription::optional(Some("a".repeat(2001)));
      assert!(matches!(result, Err(DomainError::Validation(_))));
   }

   #[rstest]
   fn test_部分更新は指定したフィールドだけを変更する(task: Task, now: DateTime<Utc>) {
      let later = now + Duration::minutes(5);
      let original_description = task.description().cloned();

      let updated = task.apply(
         TaskChanges {
            title: Some(TaskTitle::new("卵を買う").unwrap()),
            ..Default::default()
         },
         later,
      );

      assert_eq!(updated.title().as_str(), "卵を買う");
      assert_eq!(updated.description().cloned(), original_description);
      assert!(!updated.completed());
      assert_eq!(updated.created_at(), now);
      assert_eq!(updated.updated_at(), later);
   }

   #[rstest]
   fn test_部分更新で説明を消去できる(task: Task, now: DateTime<Utc>) {
      let updated = task.apply(
         TaskChanges {
            description: Some(None),
            completed: Some(true),
            ..Default::default()
         },
         now,
      );

      assert_eq!(updated.description(), None);
      assert!(updated.completed());
   }

   #[rstest]
   fn test_toggledは完了状態を反転する(task: Task, now: DateTime<Utc>) {
      let later = now + Duration::seconds(1);

      let done = task.toggled(later);
      assert!(done.completed());
      assert_eq!(done.updated_at(), later);

      let undone = done.toggled(later);
      assert!(!undone.completed());
   }

   #[rstest]
   fn test_変更内容が空かどうか() {
      assert!(TaskChanges::default().is_empty());
      assert!(
         !TaskChanges {
            completed: Some(false),
            ..Default::default()
         }
         .is_empty()
      );
   }
}
