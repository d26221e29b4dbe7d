//! HTTP scenarios shared by the in-memory and PostgreSQL suites.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use blog_api::infrastructure::database::BlogPostStore;
use blog_api::ServerHandle;

const POST_FIELDS: [&str; 5] = ["author", "content", "created", "id", "title"];

fn sorted_keys(post: &Value) -> Vec<String> {
    let mut keys: Vec<String> = post.as_object().expect("post should be an object").keys().cloned().collect();
    keys.sort();
    keys
}

pub async fn list_returns_all_posts(server: &ServerHandle) {
    let res = Client::new().get(format!("{}/posts", server.base_url())).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Vec<Value> = res.json().await.unwrap();
    assert!(!body.is_empty());
    assert_eq!(body.len() as u64, server.store().count().await.unwrap());
}

pub async fn list_returns_right_fields(server: &ServerHandle) {
    let res = Client::new().get(format!("{}/posts", server.base_url())).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .headers()
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json")));

    let body: Vec<Value> = res.json().await.unwrap();
    assert!(!body.is_empty());
    for post in &body {
        assert_eq!(sorted_keys(post), POST_FIELDS);
    }

    let first = &body[0];
    let id: Uuid = serde_json::from_value(first["id"].clone()).unwrap();
    let stored = server.store().find_by_id(id).await.unwrap().expect("listed post should exist");
    assert_eq!(first["title"], stored.title);
    assert_eq!(first["content"], stored.content);
    assert_eq!(first["author"], stored.author.display_name());
}

pub async fn create_adds_post(server: &ServerHandle) {
    let new_post = json!({
        "title": "T",
        "content": "C",
        "author": {"firstName": "A", "lastName": "B"}
    });
    let res = Client::new()
        .post(format!("{}/posts", server.base_url()))
        .json(&new_post)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(sorted_keys(&body), POST_FIELDS);
    assert_eq!(body["title"], "T");
    assert_eq!(body["content"], "C");
    assert_eq!(body["author"], "A B");

    let id: Uuid = serde_json::from_value(body["id"].clone()).unwrap();
    let stored = server.store().find_by_id(id).await.unwrap().expect("created post should exist");
    assert_eq!(stored.title, "T");
    assert_eq!(stored.content, "C");
    assert_eq!(stored.author.display_name(), "A B");
}

pub async fn create_rejects_missing_fields(server: &ServerHandle) {
    let before = server.store().count().await.unwrap();
    let res = Client::new()
        .post(format!("{}/posts", server.base_url()))
        .json(&json!({"title": "T", "author": {"firstName": "A"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["validation_errors"]["content"].is_array());
    assert!(body["validation_errors"]["author.lastName"].is_array());
    assert_eq!(server.store().count().await.unwrap(), before);
}

pub async fn update_applies_sent_fields(server: &ServerHandle) {
    let post = server.store().find_one().await.unwrap().expect("seeded post");
    let update = json!({"id": post.id, "title": "foo foo foo", "content": "bar bar bar"});

    let client = Client::new();
    let res = client
        .put(format!("{}/posts/{}", server.base_url(), post.id))
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = client.get(format!("{}/posts/{}", server.base_url(), post.id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "foo foo foo");
    assert_eq!(body["content"], "bar bar bar");
    assert_eq!(body["author"], post.author.display_name());

    let stored = server.store().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.created, post.created);
}

pub async fn update_merges_author(server: &ServerHandle) {
    let post = server.store().find_one().await.unwrap().expect("seeded post");
    let res = Client::new()
        .put(format!("{}/posts/{}", server.base_url(), post.id))
        .json(&json!({"author": {"lastName": "Hopper"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let stored = server.store().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.author.first_name, post.author.first_name);
    assert_eq!(stored.author.last_name, "Hopper");
    assert_eq!(stored.title, post.title);
}

pub async fn update_missing_post_is_not_found(server: &ServerHandle) {
    let res = Client::new()
        .put(format!("{}/posts/{}", server.base_url(), Uuid::new_v4()))
        .json(&json!({"title": "nobody home"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

pub async fn delete_removes_post(server: &ServerHandle) {
    let post = server.store().find_one().await.unwrap().expect("seeded post");
    let before = server.store().count().await.unwrap();

    let res = Client::new()
        .delete(format!("{}/posts/{}", server.base_url(), post.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    assert!(server.store().find_by_id(post.id).await.unwrap().is_none());
    assert_eq!(server.store().count().await.unwrap(), before - 1);
}

pub async fn delete_missing_post_is_not_found(server: &ServerHandle) {
    let res = Client::new()
        .delete(format!("{}/posts/{}", server.base_url(), Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

pub async fn update_rejects_malformed_author(server: &ServerHandle) {
    let post = server.store().find_one().await.unwrap().expect("seeded post");
    let res = Client::new()
        .put(format!("{}/posts/{}", server.base_url(), post.id))
        .json(&json!({"id": post.id, "title": "foo foo foo", "content": "bar bar bar", "author": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "JSON_PARSE_ERROR");
    let stored = server.store().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, post.title);
}

pub async fn create_rejects_non_json_body(server: &ServerHandle) {
    let res = Client::new()
        .post(format!("{}/posts", server.base_url()))
        .header("content-type", "text/plain")
        .body("title=T&content=C")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "INVALID_CONTENT_TYPE");
}
