//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use http_file_server::config::ServerConfig;
use http_file_server::net::listener::Listener;
use http_file_server::{HttpServer, Shutdown};

/// A server running on an ephemeral port with its own serve directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub directory: PathBuf,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start() -> Self {
        let directory = std::env::temp_dir().join(format!("http-file-server-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&directory).unwrap();

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.files.directory = format!("{}/", directory.display());

        let listener = Listener::bind(&config.listener).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(&config);
        tokio::spawn(server.run(listener, shutdown.subscribe()));

        Self {
            addr,
            directory,
            shutdown,
        }
    }

    /// Send raw bytes, then read until the server closes the connection.
    pub async fn send_raw(&self, raw: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(raw).await.unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).await.unwrap();
        received
    }

    pub async fn send(&self, raw: &str) -> RawResponse {
        RawResponse::parse(&self.send_raw(raw.as_bytes()).await)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let _ = std::fs::remove_dir_all(&self.directory);
    }
}

/// A response split into its parts.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(wire: &[u8]) -> Self {
        let end = wire
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response head terminator");
        let head = std::str::from_utf8(&wire[..end]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (k, v) = line.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();
        Self {
            status_line,
            headers,
            body: wire[end + 4..].to_vec(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status_line.split(' ').nth(1).unwrap().parse().unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
