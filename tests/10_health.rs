mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_ok_with_a_live_store() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["timestamp"].is_string(), "missing timestamp: {}", body);
    Ok(())
}

#[tokio::test]
async fn health_degrades_when_the_store_is_down() -> Result<()> {
    let app = common::spawn_app().await?;
    app.store.set_unavailable(true);

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn root_lists_field_types() -> Result<()> {
    let app = common::spawn_app().await?;

    let body = app
        .client
        .get(app.url("/"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    let types: Vec<&str> = body["data"]["field_types"]
        .as_array()
        .expect("field_types should be an array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    for tag in ["name", "email", "phone", "number", "boolean", "date", "country", "word", "uuid"] {
        assert!(types.contains(&tag), "missing {} in {:?}", tag, types);
    }
    Ok(())
}
