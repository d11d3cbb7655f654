//! ルーター全体の結合テスト
//!
//! インメモリのリポジトリでアプリケーションを組み立て、
//! CORS・認証・タスク CRUD を HTTP レベルで検証する。

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
   Router,
   body::Body,
   http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use pretty_assertions::assert_eq;
use todo_api::{
   app_builder::{AppDependencies, build_app},
   handler::ReadinessProbe,
};
use todo_domain::clock::SystemClock;
use todo_infra::{
   Argon2PasswordHasher,
   InfraError,
   JwtTokenService,
   mock::{MockSessionFactory, MockTaskRepository, MockUserRepository},
};
use tower::ServiceExt;

struct AlwaysReady;

#[async_trait]
impl ReadinessProbe for AlwaysReady {
   async fn ping(&self) -> Result<(), InfraError> {
      Ok(())
   }
}

fn app() -> Router {
   let deps = AppDependencies::assemble(
      Arc::new(MockSessionFactory::new()),
      Arc::new(MockUserRepository::new()),
      Arc::new(MockTaskRepository::new()),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      Arc::new(JwtTokenService::new("integration-secret", Duration::minutes(30))),
      Arc::new(SystemClock),
      Arc::new(AlwaysReady),
   );
   build_app(deps)
}

async fn send(
   app: &Router,
   method: Method,
   uri: &str,
   token: Option<&str>,
   body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
   let mut builder = Request::builder().method(method).uri(uri);
   if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
   }
   let request = match body {
      Some(json) => builder
         .header(header::CONTENT_TYPE, "application/json")
         .body(Body::from(json.to_string()))
         .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
   };

   let response = app.clone().oneshot(request).await.unwrap();
   let status = response.status();
   let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   let json = if bytes.is_empty() {
      serde_json::Value::Null
   } else {
      serde_json::from_slice(&bytes).unwrap()
   };
   (status, json)
}

async fn register(app: &Router, email: &str) -> String {
   let (status, body) = send(
      app,
      Method::POST,
      "/api/auth/register",
      None,
      Some(serde_json::json!({
         "email": email,
         "password": "password123",
         "name": "Test User",
      })),
   )
   .await;
   assert_eq!(status, StatusCode::CREATED);
   body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_healthとルートは認証なしで応答する() {
   let app = app();

   let (status, body) = send(&app, Method::GET, "/health", None, None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(body, serde_json::json!({ "status": "healthy" }));

   let (status, body) = send(&app, Method::GET, "/", None, None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(body["version"], "0.1.0");

   let (status, body) = send(&app, Method::GET, "/health/ready", None, None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_許可オリジンからのプリフライトに応答する() {
   let request = Request::builder()
      .method(Method::OPTIONS)
      .uri("/api/tasks")
      .header(header::ORIGIN, "http://localhost:3000")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
      .body(Body::empty())
      .unwrap();

   let response = app().oneshot(request).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let headers = response.headers();
   assert_eq!(
      headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://localhost:3000"
   );
   assert_eq!(
      headers
         .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
         .unwrap(),
      "true"
   );
   assert_eq!(
      headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
      "POST"
   );
}

#[tokio::test]
async fn test_許可されていないオリジンにはallow_originを返さない() {
   let request = Request::builder()
      .method(Method::GET)
      .uri("/health")
      .header(header::ORIGIN, "http://evil.example.com")
      .body(Body::empty())
      .unwrap();

   let response = app().oneshot(request).await.unwrap();

   assert!(
      response
         .headers()
         .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
         .is_none()
   );
}

#[tokio::test]
async fn test_トークンなしのタスク操作は401() {
   let app = app();
   let id = uuid::Uuid::now_v7();

   for (method, uri) in [
      (Method::GET, "/api/tasks".to_string()),
      (Method::POST, "/api/tasks".to_string()),
      (Method::GET, format!("/api/tasks/{id}")),
      (Method::PUT, format!("/api/tasks/{id}")),
      (Method::PATCH, format!("/api/tasks/{id}/complete")),
      (Method::DELETE, format!("/api/tasks/{id}")),
      (Method::GET, "/api/auth/me".to_string()),
   ] {
      let (status, _) = send(&app, method.clone(), &uri, None, None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
   }
}

#[tokio::test]
async fn test_登録からタスクのcrudまで一通り動く() {
   let app = app();

   // 登録とログイン
   register(&app, "alice@example.com").await;
   let (status, body) = send(
      &app,
      Method::POST,
      "/api/auth/login",
      None,
      Some(serde_json::json!({ "email": "alice@example.com", "password": "password123" })),
   )
   .await;
   assert_eq!(status, StatusCode::OK);
   let token = body["access_token"].as_str().unwrap().to_string();
   let token = Some(token.as_str());

   let (status, me) = send(&app, Method::GET, "/api/auth/me", token, None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(me["email"], "alice@example.com");

   // 作成
   let (status, created) = send(
      &app,
      Method::POST,
      "/api/tasks",
      token,
      Some(serde_json::json!({ "title": "牛乳を買う", "description": "2本" })),
   )
   .await;
   assert_eq!(status, StatusCode::CREATED);
   assert_eq!(created["completed"], false);
   assert_eq!(created["user_id"], me["id"]);
   let task_uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

   // 一覧
   let (status, list) = send(&app, Method::GET, "/api/tasks", token, None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(list.as_array().unwrap().len(), 1);

   // 更新
   let (status, updated) = send(
      &app,
      Method::PUT,
      &task_uri,
      token,
      Some(serde_json::json!({ "title": "牛乳とパンを買う", "description": "" })),
   )
   .await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(updated["title"], "牛乳とパンを買う");
   assert_eq!(updated["description"], serde_json::Value::Null);

   // 完了
   let (status, toggled) = send(
      &app,
      Method::PATCH,
      &format!("{task_uri}/complete"),
      token,
      None,
   )
   .await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(toggled["completed"], true);

   let (_, done) = send(&app, Method::GET, "/api/tasks?completed=true", token, None).await;
   let (_, pending) = send(&app, Method::GET, "/api/tasks?completed=false", token, None).await;
   assert_eq!(done.as_array().unwrap().len(), 1);
   assert!(pending.as_array().unwrap().is_empty());

   // 削除
   let (status, _) = send(&app, Method::DELETE, &task_uri, token, None).await;
   assert_eq!(status, StatusCode::NO_CONTENT);
   let (status, _) = send(&app, Method::GET, &task_uri, token, None).await;
   assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_他人のタスクには触れない() {
   let app = app();
   let alice = register(&app, "alice@example.com").await;
   let bob = register(&app, "bob@example.com").await;

   let (_, created) = send(
      &app,
      Method::POST,
      "/api/tasks",
      Some(&alice),
      Some(serde_json::json!({ "title": "アリスのタスク" })),
   )
   .await;
   let task_uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

   let (status, _) = send(&app, Method::GET, &task_uri, Some(&bob), None).await;
   assert_eq!(status, StatusCode::NOT_FOUND);

   let (status, _) = send(
      &app,
      Method::PUT,
      &task_uri,
      Some(&bob),
      Some(serde_json::json!({ "completed": true })),
   )
   .await;
   assert_eq!(status, StatusCode::NOT_FOUND);

   let (status, _) = send(
      &app,
      Method::PATCH,
      &format!("{task_uri}/complete"),
      Some(&bob),
      None,
   )
   .await;
   assert_eq!(status, StatusCode::NOT_FOUND);

   let (status, _) = send(&app, Method::DELETE, &task_uri, Some(&bob), None).await;
   assert_eq!(status, StatusCode::NOT_FOUND);

   let (_, bobs) = send(&app, Method::GET, "/api/tasks", Some(&bob), None).await;
   assert!(bobs.as_array().unwrap().is_empty());

   let (status, alices) = send(&app, Method::GET, &task_uri, Some(&alice), None).await;
   assert_eq!(status, StatusCode::OK);
   assert_eq!(alices["completed"], false);
}

#[tokio::test]
async fn test_同じメールアドレスでの再登録は409() {
   let app = app();
   register(&app, "alice@example.com").await;

   let (status, body) = send(
      &app,
      Method::POST,
      "/api/auth/register",
      None,
      Some(serde_json::json!({
         "email": "alice@example.com",
         "password": "password123",
         "name": "Another",
      })),
   )
   .await;

   assert_eq!(status, StatusCode::CONFLICT);
   assert_eq!(body["status"], 409);
}
