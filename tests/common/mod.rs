#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use mockdup::app::{app, AppState};
use mockdup::config::AppConfig;
use mockdup::testing::MemoryStore;

/// A server on its own port backed by a fresh in-memory store
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> Result<TestApp> {
    let mut config = AppConfig::development();
    // Minimum bcrypt cost keeps signup fast
    config.security.bcrypt_cost = 4;
    config.generation.max_count = 100;
    config.api.static_dir = None;

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone());

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let test_app = TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    };
    test_app.wait_ready(Duration::from_secs(5)).await?;
    Ok(test_app)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Sign up and return the issued token
    pub async fn signup(&self, name: &str, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "name": name, "email": email, "password": "hunter22" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());

        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("signup response has no token")
    }

    /// Create a project and return its id
    pub async fn create_project(&self, token: &str, name: &str, prefix: Option<&str>) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/api/projects"))
            .bearer_auth(token)
            .json(&json!({ "name": name, "prefix": prefix }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "project create failed: {}", res.status());

        let body: Value = res.json().await?;
        body["data"]["projectId"].as_i64().context("response has no projectId")
    }

    /// POST /api/resources and hand back the raw response
    pub async fn post_resource(&self, token: &str, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/resources"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }
}
