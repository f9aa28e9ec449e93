//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Request bodies received by a mock backend, in arrival order.
pub type Recorded = Arc<Mutex<Vec<String>>>;

/// Start a mock backend on an ephemeral port that answers every request with
/// `status` and `body`, recording each request body.
pub async fn start_recording_backend(status: u16, body: &'static str) -> (SocketAddr, Recorded) {
    start_backend_with(move |_| (status, body.to_string())).await
}

/// Start a mock JSON-RPC node. `answer` maps a method name and its params to
/// either a result or an error message; ids are echoed back.
pub async fn start_json_rpc_backend<F>(answer: F) -> (SocketAddr, Recorded)
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    start_backend_with(move |request_body| {
        let request: Value = serde_json::from_str(request_body).unwrap_or(Value::Null);
        let method = request["method"].as_str().unwrap_or_default();
        let response = match answer(method, &request["params"]) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": { "code": -32000, "message": message }
            }),
        };
        (200, response.to_string())
    })
    .await
}

async fn start_backend_with<F>(respond: F) -> (SocketAddr, Recorded)
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let sink = sink.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let request_body = read_body(&mut socket).await;
                        let (status, body) = respond(&request_body);
                        sink.lock().unwrap().push(request_body);

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorded)
}

/// Read one HTTP/1.1 request and return its body.
async fn read_body(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            let body_start = header_end + 4;
            if buf.len() >= body_start + content_length {
                return String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                    .into_owned();
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

pub mod fakes;
