//! Router tests driving the full HTTP surface against an in-memory database.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{create_router, AppState};
use crate::db::Database;
use crate::models::{User, Video, Visibility};
use crate::test_utils::{seed_link, seed_user, seed_video};

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::in_memory().await.unwrap();
        let router = create_router(AppState { db: db.clone() });
        Self { router, db }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

async fn seed_owner_and_video(app: &TestApp) -> (User, Video) {
    let owner = seed_user(&app.db, "owner@x.com").await;
    let video = seed_video(&app.db, &owner.id).await;
    (owner, video)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_link_returns_created_envelope() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;

    let (status, body) = app
        .post(
            "/api/link",
            json!({
                "creatorId": owner.id,
                "videoId": video.id,
                "visibility": "PUBLIC",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["videoId"], video.id);
    assert_eq!(body["data"]["visibility"], "PUBLIC");
    assert!(body["data"]["expiresAt"].is_null());
    assert!(body["data"]["lastViewedAt"].is_null());
    assert_eq!(body["data"]["creator"]["email"], "owner@x.com");
}

#[tokio::test]
async fn test_create_link_rejects_bad_input() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;

    let (status, body) = app
        .post("/api/link", json!({ "creatorId": owner.id, "videoId": video.id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post(
            "/api/link",
            json!({ "creatorId": owner.id, "videoId": video.id, "visibility": "public" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/link",
            json!({ "creatorId": owner.id, "videoId": "missing", "visibility": "PUBLIC" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/link")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_link_expires_after_patch_into_the_past() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;
    let uri = format!("/api/link/{}", link.id);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);

    let past = Utc::now() - Duration::hours(1);
    let (status, body) = app.patch(&uri, json!({ "expiresAt": past.to_rfc3339() })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["expiresAt"].is_string());

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["success"], false);

    let (status, _) = app.post(&format!("{}/resolve", uri), json!({})).await;
    assert_eq!(status, StatusCode::GONE);

    // Clearing the expiry reopens the link
    let (status, _) = app.patch(&uri, json!({ "expiresAt": null })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_link_twice() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;
    let uri = format!("/api/link/{}", link.id);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Share link deleted successfully");

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_links_by_video() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let other = seed_video(&app.db, &owner.id).await;
    seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;
    seed_link(&app.db, &video.id, &owner.id, Visibility::Private, None).await;
    seed_link(&app.db, &other.id, &owner.id, Visibility::Public, None).await;

    let (status, body) = app.get(&format!("/api/link?videoId={}", video.id)).await;
    assert_eq!(status, StatusCode::OK);
    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l["videoId"] == video.id.as_str()));

    let (status, _) = app.get("/api/link").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_and_list_accesses() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;

    let (status, _) = app
        .post("/api/access", json!({ "videoId": video.id, "viewerEmail": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, first) = app
        .post(
            "/api/access",
            json!({ "shareLinkId": link.id, "videoId": video.id, "viewerEmail": "a@x.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app
        .post("/api/access", json!({ "shareLinkId": link.id, "videoId": video.id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(second["data"]["viewerEmail"].is_null());

    let (status, body) = app.get(&format!("/api/access?videoId={}", video.id)).await;
    assert_eq!(status, StatusCode::OK);
    let accesses = body["data"].as_array().unwrap();
    assert_eq!(accesses.len(), 2);
    assert_eq!(accesses[0]["id"], second["data"]["id"]);
    assert_eq!(accesses[1]["id"], first["data"]["id"]);

    let (_, detail) = app.get(&format!("/api/link/{}", link.id)).await;
    assert!(detail["data"]["lastViewedAt"].is_string());
}

#[tokio::test]
async fn test_resolve_private_link() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    seed_user(&app.db, "a@x.com").await;
    seed_user(&app.db, "b@x.com").await;

    let (status, created) = app
        .post(
            "/api/link",
            json!({
                "creatorId": owner.id,
                "videoId": video.id,
                "visibility": "PRIVATE",
                "userWhitelist": ["a@x.com"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let link_id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/link/{}/resolve", link_id);

    let (status, body) = app.post(&uri, json!({ "viewerEmail": "b@x.com" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = app.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&uri, json!({ "viewerEmail": "A@x.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shareLinkId"], link_id.as_str());
    assert_eq!(body["data"]["redirectTo"], format!("/video/{}", video.id));
    assert_eq!(body["data"]["access"]["viewerEmail"], "a@x.com");

    // Denied attempts leave no trace in the access log
    let (_, accesses) = app.get(&format!("/api/access?videoId={}", video.id)).await;
    assert_eq!(accesses["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolve_rejects_malformed_body() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;
    let uri = format!("/api/link/{}/resolve", link.id);

    let (status, body) = app.post(&uri, json!({ "viewerEmail": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .body(Body::from(r#"{"viewerEmail":"a@x.com"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was recorded for the rejected attempts
    let (_, accesses) = app.get(&format!("/api/access?videoId={}", video.id)).await;
    assert!(accesses["data"].as_array().unwrap().is_empty());

    let (status, body) = app.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access"]["viewerEmail"].is_null());
}

#[tokio::test]
async fn test_record_access_with_mismatched_video_is_bad_request() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let other = seed_video(&app.db, &owner.id).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;

    let (status, _) = app
        .post("/api/access", json!({ "shareLinkId": link.id, "videoId": other.id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, accesses) = app.get(&format!("/api/access?videoId={}", other.id)).await;
    assert!(accesses["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_video_removes_its_links() {
    let app = TestApp::new().await;
    let (owner, video) = seed_owner_and_video(&app).await;
    let link = seed_link(&app.db, &video.id, &owner.id, Visibility::Public, None).await;

    let (status, _) = app.delete(&format!("/api/video/{}", video.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/link/{}", link.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_and_video_provisioning() {
    let app = TestApp::new().await;

    let (status, user) = app
        .post("/api/user", json!({ "id": "user-1", "email": "Owner@X.com", "name": "Owner" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["data"]["email"], "owner@x.com");

    let (status, video) = app
        .post(
            "/api/video",
            json!({ "userId": "user-1", "name": "clip.mp4", "fileSize": 1024 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(video["data"]["status"], "PROCESSING");
    let video_id = video["data"]["id"].as_str().unwrap().to_string();

    let (status, ready) = app
        .patch(
            &format!("/api/video/{}/assets", video_id),
            json!({ "videoURL": "https://cdn/x.mp4", "thumbnailURL": "https://cdn/x.jpg" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["data"]["status"], "READY");

    let (status, list) = app.get("/api/video?userId=user-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}
