//! Shared helpers for the HTTP adapter integration tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// A request captured by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A one-shot HTTP server answering a single request with a fixed reply.
pub struct CannedServer {
    base_url: String,
    requests: Receiver<CapturedRequest>,
    handle: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Serve `body` with `status` (e.g. `"200 OK"`) to the first request.
    pub fn respond(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap_or_else(|err| {
            panic!("failed to bind canned server: {err}");
        });
        let address = listener.local_addr().unwrap_or_else(|err| {
            panic!("failed to read canned server address: {err}");
        });
        let (sender, requests) = mpsc::channel();
        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            if let Some(request) = serve(stream, status, body) {
                let _ = sender.send(request);
            }
        });
        Self {
            base_url: format!("http://{address}"),
            requests,
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request the server received, once it has been answered.
    pub fn received(mut self) -> CapturedRequest {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_else(|_| panic!("canned server panicked"));
        }
        self.requests
            .recv()
            .unwrap_or_else(|err| panic!("canned server captured no request: {err}"))
    }
}

fn serve(stream: TcpStream, status: &str, body: &str) -> Option<CapturedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_owned(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut request_body = vec![0; length];
    reader.read_exact(&mut request_body).ok()?;

    let reply = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = stream;
    stream.write_all(reply.as_bytes()).ok()?;
    stream.flush().ok()?;

    Some(CapturedRequest {
        request_line: request_line.trim_end().to_owned(),
        headers,
        body: String::from_utf8_lossy(&request_body).into_owned(),
    })
}
