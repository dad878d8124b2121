//! Canned upstream and a one-shot local HTTP server for tests.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{RawResponse, Transport, TransportError};

#[derive(Clone)]
enum Canned {
    Response(u16, Value),
    Failure,
}

/// Answers registered URIs; anything else gets a 404 like the real API.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    routes: HashMap<String, Canned>,
    calls: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, uri: &str, status: u16, body: Value) -> Self {
        self.with(uri, Canned::Response(status, body))
    }

    pub fn failing(self, uri: &str) -> Self {
        self.with(uri, Canned::Failure)
    }

    /// Number of `get` calls made so far, shared between clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with(mut self, uri: &str, canned: Canned) -> Self {
        self.routes.insert(uri.to_string(), canned);
        self
    }
}

#[async_trait]
impl Transport for FakeUpstream {
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.routes.get(uri) {
            Some(Canned::Response(status, body)) => Ok(RawResponse {
                status: *status,
                reason: reason(*status).to_string(),
                body: body.clone(),
            }),
            Some(Canned::Failure) => Err(request_error().into()),
            None => Ok(RawResponse {
                status: 404,
                reason: reason(404).to_string(),
                body: json!({"error": "not-found"}),
            }),
        }
    }
}

/// A genuine reqwest error, obtained from a request that cannot be built.
fn request_error() -> reqwest::Error {
    match reqwest::Client::new().get("not a url").build() {
        Ok(_) => panic!("relative url accepted"),
        Err(err) => err,
    }
}

/// Serves one HTTP response on a local port and reports the request line it saw.
pub fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request);
        let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
    });
    (base_url, rx)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

pub fn artist_json(id: u64, name: &str) -> Value {
    json!({"id": id, "name": name, "various": false, "composer": false})
}

pub fn concert_json(title: &str, artist: Value) -> Value {
    json!({
        "concertTitle": title,
        "afishaUrl": "https://afisha.yandex.ru/moscow/concert/kino-2024",
        "city": "Москва",
        "place": "ВТБ Арена",
        "address": "Ленинградский пр., 36",
        "datetime": "2024-06-15T20:00:00+0300",
        "mapUrl": "https://yandex.ru/maps/?ll=37.55,55.79",
        "images": ["https://avatars.mds.yandex.net/get-afishanew/1/a/orig"],
        "minPrice": {"value": 3500, "currency": "RUB"},
        "artist": artist,
    })
}
