//! Test utilities for heatpump-console integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use heatpump_console::{ClientBuilder, HeatpumpClient};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the mock backend answers on a path.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A complete JSON body with the given status.
    Json { status: u16, body: String },
    /// A close-delimited body written chunk by chunk, with a pause between chunks.
    Chunks { chunks: Vec<Vec<u8>>, pause: Duration },
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Json {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Reply::Json {
            status,
            body: json!({ "error": message }).to_string(),
        }
    }

    pub fn chunks(chunks: Vec<Vec<u8>>) -> Self {
        Reply::Chunks {
            chunks,
            pause: Duration::from_millis(5),
        }
    }
}

/// A minimal HTTP/1.1 server with canned replies per path.
///
/// Every request target (path and query) is recorded in arrival order.
pub struct MockBackend {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start serving `routes` (path → reply) on an ephemeral port.
    pub async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let _ = serve(socket, &routes, &recorded).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL to configure the client with.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// A client pointed at this backend, ignoring the environment.
    pub fn client(&self) -> HeatpumpClient {
        self.client_with(|builder| builder)
    }

    /// A client pointed at this backend, with extra builder settings.
    pub fn client_with(
        &self,
        configure: impl FnOnce(ClientBuilder) -> ClientBuilder,
    ) -> HeatpumpClient {
        configure(
            HeatpumpClient::builder()
                .use_environment(false)
                .base_url(self.base_url()),
        )
        .build()
        .expect("client builds")
    }

    /// Request targets received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut socket: TcpStream,
    routes: &HashMap<String, Reply>,
    recorded: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    recorded.lock().expect("requests lock").push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let reply = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| Reply::error(404, "not found"));

    match reply {
        Reply::Json { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
                reason = if status < 400 { "OK" } else { "Error" },
                len = body.len(),
            );
            socket.write_all(response.as_bytes()).await?;
        }
        Reply::Chunks { chunks, pause } => {
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n")
                .await?;
            socket.flush().await?;
            for chunk in chunks {
                tokio::time::sleep(pause).await;
                socket.write_all(&chunk).await?;
                socket.flush().await?;
            }
        }
    }
    socket.shutdown().await
}

/// One `command_progress` line (without the newline), fields in the given order.
pub fn progress_line(time: Option<&str>, command_id: &str, status: &str) -> String {
    let mut record = Map::new();
    if let Some(time) = time {
        record.insert("time".to_string(), Value::from(time));
    }
    record.insert("command_id".to_string(), Value::from(command_id));
    record.insert("status".to_string(), Value::from(status));
    json!({ "command_progress": record }).to_string()
}

/// Builder for progress stream bodies.
///
/// Lines are collected first; [`build`](Self::build) then cuts the body into
/// chunks, either one per line or at fixed byte offsets.
pub struct ScenarioBuilder {
    body: Vec<u8>,
    line_ends: Vec<usize>,
    chunk_size: Option<usize>,
    command_id: String,
}

impl ScenarioBuilder {
    /// Create a new scenario builder.
    pub fn new() -> Self {
        Self {
            body: Vec::new(),
            line_ends: Vec::new(),
            chunk_size: None,
            command_id: "cmd-123".to_string(),
        }
    }

    /// Set the command id stamped on progress records.
    pub fn command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = id.into();
        self
    }

    /// Add a progress record with a timestamp.
    pub fn timed(self, time: &str, status: &str) -> Self {
        let line = progress_line(Some(time), &self.command_id, status);
        self.raw_line(&line)
    }

    /// Add a progress record without a timestamp.
    pub fn untimed(self, status: &str) -> Self {
        let line = progress_line(None, &self.command_id, status);
        self.raw_line(&line)
    }

    /// Add a line verbatim, followed by a newline.
    pub fn raw_line(mut self, line: &str) -> Self {
        self.body.extend_from_slice(line.as_bytes());
        self.body.push(b'\n');
        self.line_ends.push(self.body.len());
        self
    }

    /// Add text with no terminating newline.
    pub fn unterminated(mut self, text: &str) -> Self {
        self.body.extend_from_slice(text.as_bytes());
        self.line_ends.push(self.body.len());
        self
    }

    /// Cut the body every `size` bytes instead of at line ends.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size.max(1));
        self
    }

    /// The chunks of the body.
    pub fn build(&self) -> Vec<Vec<u8>> {
        match self.chunk_size {
            Some(size) => self.body.chunks(size).map(<[u8]>::to_vec).collect(),
            None => {
                let mut start = 0;
                self.line_ends
                    .iter()
                    .map(|&end| {
                        let chunk = self.body[start..end].to_vec();
                        start = end;
                        chunk
                    })
                    .collect()
            }
        }
    }

    /// The chunks as a stream for `ProgressStream::from_chunks`.
    pub fn stream(
        &self,
    ) -> impl futures::Stream<Item = std::result::Result<Bytes, std::io::Error>> + Send + 'static {
        futures::stream::iter(self.build().into_iter().map(|chunk| Ok(Bytes::from(chunk))))
    }

    /// The chunks as a mock backend reply.
    pub fn reply(&self) -> Reply {
        Reply::chunks(self.build())
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}
