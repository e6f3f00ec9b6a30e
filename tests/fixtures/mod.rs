//! Test server fixture for integration tests.
#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use aqchat_relay::{ServerConfig, run, run_with_state, ui::AppState};

/// A relay instance running on a dedicated port for one test.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Spawn the relay on `port` and wait until it accepts connections.
    pub async fn start(port: u16) -> Self {
        let config = ServerConfig {
            port,
            ws_path: "/ws/websocket".to_string(),
        };
        tokio::spawn(async move {
            if let Err(e) = run(config).await {
                eprintln!("test server error: {e}");
            }
        });

        let server = Self { port };
        server.wait_ready().await;
        server
    }

    /// Spawn the relay on `port` over pre-built shared state, e.g. to
    /// inject a misbehaving history store.
    pub async fn start_with_state(port: u16, state: Arc<AppState>) -> Self {
        let config = ServerConfig {
            port,
            ws_path: "/ws/websocket".to_string(),
        };
        tokio::spawn(async move {
            if let Err(e) = run_with_state(config, state).await {
                eprintln!("test server error: {e}");
            }
        });

        let server = Self { port };
        server.wait_ready().await;
        server
    }

    async fn wait_ready(&self) {
        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server on port {} did not become ready", self.port);
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws/websocket", self.port)
    }
}
