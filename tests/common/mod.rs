use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Live-store integration tests only run when pointed at a real database.
pub fn live_store_uri() -> Option<String> {
    std::env::var("BLOGIFY_TEST_MONGODB_URI").ok()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(store_uri: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/blogify-api");
        cmd.env("PORT", port.to_string())
            .env("MONGODB_URI", store_uri)
            .env("DB_NAME", "blogify_test")
            .env("ACCESS_TOKEN_SECRET", "integration-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server(store_uri: &str) -> Result<&'static TestServer> {
    let server =
        SERVER.get_or_init(|| TestServer::spawn(store_uri).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a token the spawned server will accept (same shared secret).
pub async fn token_for(server: &TestServer, email: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/jwt", server.base_url))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "token issuance failed");
    let body = res.json::<serde_json::Value>().await?;
    body["token"]
        .as_str()
        .map(|s| s.to_string())
        .context("no token in response")
}
