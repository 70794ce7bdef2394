//! Test helpers for integration tests
//!
//! Provides utilities for spawning the API and gateway servers, seeding
//! users, and making HTTP and WebSocket requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use realm_api::{bootstrap, create_app, create_app_state, AppState};
use realm_common::AppConfig;
use realm_core::entities::Profile;
use realm_core::traits::ProfileRepository;
use realm_core::Snowflake;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// A seeded user and a valid access token for it
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Snowflake,
    pub username: String,
    pub token: String,
}

/// API server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        bootstrap(&state).await?;

        let app = create_app(state.clone());

        // Port 0 lets the OS pick, so parallel tests never collide
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Seed a profile and mint an access token for it
    pub async fn create_user(&self, prefix: &str) -> Result<TestUser> {
        let ctx = self.state.service_context();
        let id = ctx.generate_id();
        let username = format!("{prefix}{id}");

        ctx.profile_repo()
            .upsert(&Profile::new(id, username.clone()))
            .await
            .context("Failed to seed profile")?;
        let token = self.state.jwt_service().issue_access_token(id)?;

        Ok(TestUser {
            id,
            username,
            token,
        })
    }

    /// Mint a token for a user id without a profile row
    pub fn token_for(&self, id: Snowflake) -> Result<String> {
        Ok(self.state.jwt_service().issue_access_token(id)?)
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }
}

/// Gateway server instance that manages lifecycle
pub struct TestGateway {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a gateway with the test configuration
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        let state = realm_gateway::create_gateway_state(config).await?;
        let app = realm_gateway::create_app(state);

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Open a WebSocket and consume the Hello frame
    pub async fn connect(&self) -> Result<GatewayClient> {
        let url = format!("ws://{}/gateway", self.addr);
        let (stream, _) = connect_async(url).await?;
        let mut client = GatewayClient { stream };

        let hello = client.recv().await?;
        anyhow::ensure!(hello["op"] == 10, "Expected Hello, got {hello}");
        Ok(client)
    }
}

/// Thin JSON-frame client over a gateway WebSocket
pub struct GatewayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    /// Send one JSON frame
    pub async fn send(&mut self, frame: Value) -> Result<()> {
        self.stream.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Receive the next text frame as JSON, failing after five seconds
    pub async fn recv(&mut self) -> Result<Value> {
        loop {
            let next = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .context("Timed out waiting for a gateway frame")?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Close(frame))) => {
                    anyhow::bail!("Gateway closed the connection: {frame:?}")
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => anyhow::bail!("Gateway stream ended"),
            }
        }
    }

    /// Receive frames until a dispatch of the given type arrives
    pub async fn recv_dispatch(&mut self, event_type: &str) -> Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame["op"] == 0 && frame["t"] == event_type {
                return Ok(frame);
            }
        }
    }

    /// Receive frames until the server closes, returning the close code
    pub async fn recv_close_code(&mut self) -> Result<Option<u16>> {
        loop {
            let next = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .context("Timed out waiting for close")?;
            match next {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(None),
            }
        }
    }

    /// Identify and wait for READY
    pub async fn identify(&mut self, token: &str) -> Result<Value> {
        self.send(serde_json::json!({ "op": 2, "d": { "token": token } }))
            .await?;
        self.recv_dispatch("READY").await
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Every test request comes from 127.0.0.1
    config.rate_limit.requests_per_second = 10_000;
    config.rate_limit.burst = 10_000;

    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("Error body without a code")
}
