mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(&server.base_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true, "unexpected body: {}", body);
    assert!(
        body["data"]["endpoints"]["cases"].is_string(),
        "missing cases endpoint entry: {}",
        body
    );

    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    let status = res.status();
    let body = res.json::<serde_json::Value>().await?;

    if common::db_configured() {
        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["data"]["database"], "ok");
    } else {
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "body: {}", body);
        assert_eq!(body["data"]["status"], "degraded");
    }

    Ok(())
}
