/*!
Stub de serveur Zabbix JSON-RPC pour les tests.

Écoute sur un vrai socket TCP (127.0.0.1:0), parle juste assez de HTTP/1.1
pour servir des réponses JSON-RPC scriptées par méthode, et enregistre
chaque appel reçu pour les assertions.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One JSON-RPC call as received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
    pub auth: Option<String>,
    pub id: u64,
}

/// What the stub answers for a given method.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// `{"result": <value>}` envelope.
    Result(Value),
    /// `{"error": {"code", "message"}}` envelope.
    ApiError { code: i64, message: String },
    /// Close the connection without answering (transport failure).
    Drop,
}

/// Per-method response table plus an optional artificial delay,
/// applied before every response (slow-server simulation).
#[derive(Debug, Clone, Default)]
pub struct ResponseScript {
    routes: HashMap<String, ScriptedResponse>,
    delay: Option<Duration>,
}

impl ResponseScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: &str, response: ScriptedResponse) -> Self {
        self.routes.insert(method.to_string(), response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock Zabbix API server bound to an ephemeral local port.
pub struct MockZabbixServer {
    endpoint: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockZabbixServer {
    /// Binds the listener and starts serving in a background task.
    pub async fn start(script: ResponseScript) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let calls = Arc::new(Mutex::new(Vec::new()));

        let script = Arc::new(script);
        let accept_calls = calls.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let calls = accept_calls.clone();
                let script = script.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, calls, script).await;
                });
            }
        });

        Ok(Self {
            endpoint: format!("http://{addr}/api_jsonrpc.php"),
            calls,
        })
    }

    /// URL to hand to the client under test.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls restricted to one method.
    pub fn calls_for(&self, method: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method)
            .cloned()
            .collect()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    script: Arc<ResponseScript>,
) -> Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // headers first
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            anyhow::bail!("connection closed before request");
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            anyhow::bail!("request headers too large");
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut content_length = 0usize;
    for line in headers.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body: Value = serde_json::from_slice(&buf[header_end..header_end + content_length])?;
    let method = body["method"].as_str().unwrap_or_default().to_string();
    calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        params: body["params"].clone(),
        auth: body["auth"].as_str().map(str::to_string),
        id: body["id"].as_u64().unwrap_or(0),
    });

    if let Some(delay) = script.delay {
        tokio::time::sleep(delay).await;
    }

    let scripted = script
        .routes
        .get(&method)
        .cloned()
        .unwrap_or(ScriptedResponse::Result(Value::Array(Vec::new())));

    let envelope = match scripted {
        // closing without a response surfaces as a transport error client-side
        ScriptedResponse::Drop => return Ok(()),
        ScriptedResponse::Result(result) => {
            json!({ "jsonrpc": "2.0", "result": result, "id": body["id"] })
        }
        ScriptedResponse::ApiError { code, message } => json!({
            "jsonrpc": "2.0",
            "error": { "code": code, "message": message, "data": null },
            "id": body["id"],
        }),
    };

    let payload = envelope.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
