use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use informes_common::clock::Clock;
use informes_common::config::{Config, Secret};
use informes_common::error::PublishError;
use informes_common::index::LINK_MARKER;
use informes_common::publish::PublishRepository;
use informes_core::http::{build_router, AppState};
use informes_core::service::ReportService;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const SECRET: &str = "s3cret";
pub const BOUNDARY: &str = "----informes-test-boundary";

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// A site root in a temp dir.
pub struct Site {
    pub dir: TempDir,
}

impl Site {
    pub fn with_index(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), content).expect("write index");
        Self { dir }
    }

    pub fn with_marker() -> Self {
        Self::with_index(&landing_page())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config::new(self.path());
        cfg.api_secret = Secret::new(SECRET);
        cfg
    }

    pub fn index(&self) -> String {
        fs::read_to_string(self.path().join("index.html")).expect("read index")
    }

    /// Sorted file names under `reports/`, empty when the directory is missing.
    pub fn reports(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.path().join("reports")) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn report(&self, name: &str) -> String {
        fs::read_to_string(self.path().join("reports").join(name)).expect("read report")
    }
}

pub fn landing_page() -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n        <ul>\n            {LINK_MARKER}\n        </ul>\n</body>\n</html>\n"
    )
}

/// Records commit messages instead of running git.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishRepository for RecordingPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(PublishError::Command {
                command: "push --force origin main:main".to_string(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: unable to access remote".to_string(),
            });
        }
        Ok(())
    }
}

/// Starts at a fixed instant and moves one second forward on every read.
pub struct SteppingClock {
    start: NaiveDateTime,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + TimeDelta::seconds(n)
    }
}

pub async fn spawn_app(
    cfg: &Config,
    publisher: RecordingPublisher,
    clock: impl Clock + 'static,
) -> SocketAddr {
    let service = ReportService::new(cfg, Box::new(publisher), Box::new(clock));
    let app = build_router(AppState::new(service), cfg.max_body_bytes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

/// One multipart part.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn report(content: &'a [u8]) -> Self {
        Self {
            name: "reportFile",
            filename: Some("informe.html"),
            content,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\nContent-Type: text/html\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post_request(
    addr: SocketAddr,
    api_key: Option<&str>,
    content_type: &str,
    body: &[u8],
) -> Vec<u8> {
    let mut head = format!(
        "POST /trigger-report HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n",
        body.len()
    );
    if let Some(key) = api_key {
        head.push_str(&format!("X-API-KEY: {key}\r\n"));
    }
    head.push_str("\r\n");
    let mut request = head.into_bytes();
    request.extend_from_slice(body);
    request
}

pub fn trigger_request(addr: SocketAddr, api_key: Option<&str>, parts: &[Part<'_>]) -> Vec<u8> {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    post_request(addr, api_key, &content_type, &multipart_body(parts))
}

pub fn get_request(addr: SocketAddr, path: &str) -> Vec<u8> {
    format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n").into_bytes()
}

/// Sends `request` and returns the status code and body.
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream.write_all(request).await.expect("write request");

    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
            Err(_) if !raw.is_empty() => break,
            Err(e) => panic!("read response: {e}"),
        }
    }

    let response = String::from_utf8_lossy(&raw).into_owned();
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, body.to_string())
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("json body")
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Runs git in `dir` and returns trimmed stdout, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
