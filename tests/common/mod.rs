//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const PATH: &str = "/api/updateAppleHealthData";

/// One request seen by the capture server.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Captured {
    pub content_type: Option<String>,
    pub body: String,
}

pub type Captures = Arc<Mutex<Vec<Captured>>>;

#[derive(Clone)]
struct CaptureState {
    captures: Captures,
    status: StatusCode,
    reply: &'static str,
}

async fn capture(State(state): State<CaptureState>, headers: HeaderMap, body: String) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.captures.lock().unwrap().push(Captured { content_type, body });
    (state.status, state.reply)
}

/// Start a receiver that records every POST to [`PATH`] and answers with `status` and `reply`.
pub async fn start_capture_server(status: StatusCode, reply: &'static str) -> (String, Captures) {
    let captures: Captures = Arc::new(Mutex::new(Vec::new()));
    let state = CaptureState {
        captures: captures.clone(),
        status,
        reply,
    };
    let app = Router::new().route(PATH, post(capture)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (endpoint(addr), captures)
}

pub fn endpoint(addr: SocketAddr) -> String {
    format!("http://{}{}", addr, PATH)
}

/// Read one HTTP/1.1 request (headers plus Content-Length body).
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            return;
        }
    }
}

/// Start a backend that reads each request, waits `delay`, writes `response` verbatim and closes.
pub async fn start_raw_backend(response: &'static str, delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_request(&mut socket).await;
                        tokio::time::sleep(delay).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
