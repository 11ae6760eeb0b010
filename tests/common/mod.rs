use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/blog-api-rust");
        cmd.env("BLOG_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/v1/health_check", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Data-path tests need a live PostgreSQL; they no-op when DATABASE_URL is
/// absent so the suite still runs on machines without one.
pub fn database_available() -> bool {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_ok() {
        return true;
    }
    eprintln!("skipping: DATABASE_URL is not set");
    false
}

/// Register a fresh user and return (email, access token). Email is unique
/// per call so tests do not collide across runs.
#[allow(dead_code)]
pub async fn sign_up_user(base_url: &str, label: &str) -> Result<(String, String)> {
    let client = reqwest::Client::new();
    let email = format!("{}-{}@example.com", label, uuid_suffix());

    let res = client
        .post(format!("{}/api/v1/auth", base_url))
        .json(&json!({ "name": label, "email": email, "password": "password" }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "sign up failed with status {}",
        res.status()
    );

    let token = res
        .headers()
        .get("access-token")
        .context("sign up response missing access-token header")?
        .to_str()?
        .to_string();

    Ok((email, token))
}

fn uuid_suffix() -> String {
    // Nanosecond timestamp plus pid is unique enough for test emails
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}", nanos, std::process::id())
}
