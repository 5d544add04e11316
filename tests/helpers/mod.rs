//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use bili_duration::{Config, Part};

/// Minimal HTTP server answering every request with one canned reply
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn spawn(status: u16, content_type: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                seen.lock().unwrap().push(String::from_utf8_lossy(&head).into_owned());

                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub async fn json(status: u16, body: &str) -> Self {
        Self::spawn(status, "application/json", body.to_string()).await
    }

    pub async fn text(status: u16, body: &str) -> Self {
        Self::spawn(status, "text/plain; charset=utf-8", body.to_string()).await
    }

    /// Raw request heads received so far, lowercased
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.to_lowercase())
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL nothing is listening on
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config_for(api_base: &str) -> Config {
    let mut config = Config::default();
    config.upstream.api_base = api_base.to_string();
    config.upstream.timeout_seconds = 5;
    config
}

pub fn pagelist_body(durations: &[u64]) -> String {
    let items: Vec<serde_json::Value> = durations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            serde_json::json!({
                "cid": 10_000 + i as u64,
                "page": i + 1,
                "from": "vupload",
                "part": format!("第{}集", i + 1),
                "duration": d,
                "vid": "",
                "weblink": ""
            })
        })
        .collect();

    serde_json::json!({ "code": 0, "message": "0", "ttl": 1, "data": items }).to_string()
}

pub fn parts(durations: &[u64]) -> Vec<Part> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| Part::new(10_000 + i as u64, i as u32 + 1, format!("第{}集", i + 1), *d))
        .collect()
}
