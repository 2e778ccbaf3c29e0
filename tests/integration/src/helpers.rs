//! Test helpers for integration tests
//!
//! Spawns the full axum application on a loopback listener, backed by the
//! in-memory store, and wraps an HTTP client pointed at it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reveal_api::{create_app, AppState};
use reveal_cache::{MemoryKv, VoteLedgerStore};
use reveal_common::{
    AppConfig, AppSettings, CorsConfig, Environment, JwtConfig, RedisConfig, ServerConfig,
    TokenService,
};
use reveal_core::{AtomicKv, RandomIdGenerator};
use reveal_service::{LogFeedbackSink, ServiceContext};
use reqwest::{Client, Response};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Signing secret shared by every test server
pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    kv: Arc<dyn AtomicKv>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on a fresh in-memory store
    pub async fn start() -> Result<Self> {
        let kv: Arc<dyn AtomicKv> = Arc::new(MemoryKv::new());

        let context = ServiceContext::new(
            Arc::clone(&kv),
            Arc::new(TokenService::new(TEST_SECRET)),
            Arc::new(RandomIdGenerator),
            Arc::new(LogFeedbackSink),
        );
        let state = AppState::new(context, test_config());
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Give the listener a beat to start accepting
        tokio::time::sleep(Duration::from_millis(50)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            kv,
            _handle: handle,
        })
    }

    /// Base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Direct handle to the server's ledger, for seeding state the HTTP
    /// surface does not expose (e.g. the out-of-scope reveal action)
    pub fn ledger(&self) -> VoteLedgerStore {
        VoteLedgerStore::new(Arc::clone(&self.kv))
    }

    /// POST JSON to a path
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// POST JSON with an explicit client IP header
    pub async fn post_json_from<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ip: &str,
    ) -> Result<Response> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .header("x-forwarded-for", ip)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// GET a path
    pub async fn get(&self, path: &str) -> Result<Response> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?;
        Ok(response)
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "reveal-server-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        redis: RedisConfig {
            url: None,
            max_connections: 10,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        cors: CorsConfig::default(),
    }
}
