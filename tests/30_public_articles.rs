mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Publish an article for the given token and return its id.
async fn publish_article(base_url: &str, token: &str, title: &str) -> Result<String> {
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/current/articles", base_url))
        .header("access-token", token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "draft creation failed");
    let draft = res.json::<serde_json::Value>().await?;
    let id = draft["id"].as_str().unwrap().to_string();

    let res = client
        .patch(format!("{}/api/v1/current/articles/{}", base_url, id))
        .header("access-token", token)
        .json(&json!({ "article": { "title": title, "content": "body", "status": "published" } }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "publish failed");

    Ok(id)
}

#[tokio::test]
async fn published_articles_are_listed_with_owner() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_email, token) = common::sign_up_user(&server.base_url, "author").await?;
    let id = publish_article(&server.base_url, &token, "published piece").await?;

    let res = client
        .get(format!("{}/api/v1/articles", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let articles = res.json::<serde_json::Value>().await?;
    let articles = articles.as_array().expect("array body");

    let mine = articles
        .iter()
        .find(|a| a["id"] == json!(id))
        .expect("published article present in public list");
    assert_eq!(mine["status"], json!("published"));
    assert_eq!(mine["user"]["name"], json!("author"));
    assert!(mine["user"]["id"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn drafts_never_appear_in_public_endpoints() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_email, token) = common::sign_up_user(&server.base_url, "drafter").await?;

    // Create a draft and leave it unpublished
    let res = client
        .post(format!("{}/api/v1/current/articles", server.base_url))
        .header("access-token", &token)
        .send()
        .await?;
    let draft = res.json::<serde_json::Value>().await?;
    let draft_id = draft["id"].as_str().unwrap();
    assert_eq!(draft["status"], json!("unsaved"));

    // Not in the public list
    let res = client
        .get(format!("{}/api/v1/articles", server.base_url))
        .send()
        .await?;
    let articles = res.json::<serde_json::Value>().await?;
    assert!(articles
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["id"] != json!(draft_id)));

    // Not reachable by id either, even for its owner
    let res = client
        .get(format!("{}/api/v1/articles/{}", server.base_url, draft_id))
        .header("access-token", &token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn public_show_returns_published_article() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_email, token) = common::sign_up_user(&server.base_url, "shower").await?;
    let id = publish_article(&server.base_url, &token, "findable").await?;

    let res = client
        .get(format!("{}/api/v1/articles/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let article = res.json::<serde_json::Value>().await?;
    assert_eq!(article["title"], json!("findable"));
    assert_eq!(article["status"], json!("published"));
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let res = client
            .get(format!("{}/api/v1/articles/{}", server.base_url, id))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "id: {}", id);

        let body = res.json::<serde_json::Value>().await?;
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }
    Ok(())
}
