//! HTTP surfaces
//!
//! - `/api/og`: dynamic image, always PNG
//! - `/api/image`: configurable image, `format=png|svg|json`
//! - `/api/model`: JSON render model for interactive clients
//! - `/healthz`: liveness probe
//!
//! Routing is a pure function of the request line, the configuration and the
//! reference instant ([`handle`]), so it is tested without sockets. The clock
//! is read only when a live request arrives.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{Local, NaiveDateTime};
use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use tiny_http::{Header, Request, Response, Server};

use crate::config::ServiceConfig;
use crate::params::RenderParams;
use crate::rendering::OutputFormat;
use crate::{render_params, Error, Rendered, Result};

/// A response ready to be written to the socket.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body.as_bytes().to_vec())
    }

    fn error(err: &Error) -> Self {
        let status = if err.is_client_error() { 400 } else { 500 };
        let body = serde_json::json!({ "error": err.to_string() }).to_string();
        Self::new(status, "application/json", body.into_bytes())
    }

    fn rendered(out: Rendered, max_age: u32) -> Self {
        let mut reply = Self::new(200, out.content_type(), Vec::new());
        reply.header("Cache-Control", format!("public, max-age={max_age}"));
        reply.header("ETag", etag(&out.body));
        reply.header("X-Year-Progress-Days-Left", out.label.days_left.to_string());
        reply.header("X-Year-Progress-Percent", format!("{:.1}", out.label.percent_elapsed));
        reply.header("X-Year-Progress-Label", header_label(&out.label.text()));
        reply.body = out.body;
        reply
    }

    fn header(&mut self, name: &str, value: String) {
        self.headers.push((name.to_string(), value));
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Header-safe form of the label: the middle dot becomes a hyphen and any
/// other non-ASCII character is dropped.
fn header_label(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{00b7}' => Some('-'),
            c if c.is_ascii() && !c.is_ascii_control() => Some(c),
            _ => None,
        })
        .collect()
}

/// Strong validator: first 16 bytes of the body's SHA-256.
pub fn etag(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    format!("\"{}\"", hex::encode(&digest[..16]))
}

fn render_route(query: &str, config: &ServiceConfig, now: NaiveDateTime, forced: Option<OutputFormat>) -> Reply {
    let result = RenderParams::from_query(query, config, now).and_then(|mut params| {
        if let Some(format) = forced {
            params.format = format;
        }
        render_params(&params)
    });
    match result {
        Ok(out) => Reply::rendered(out, config.cache_max_age_secs),
        Err(err) => Reply::error(&err),
    }
}

/// Route one request. `now` is used when the query carries no `date`.
pub fn handle(method: &str, url: &str, config: &ServiceConfig, now: NaiveDateTime) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    if !(method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD")) {
        let mut reply = Reply::text(405, "method not allowed");
        reply.header("Allow", "GET, HEAD".to_string());
        return reply;
    }

    match path.trim_end_matches('/') {
        "/healthz" => Reply::text(200, "ok"),
        "/api/og" => render_route(query, config, now, Some(OutputFormat::Png)),
        "/api/image" => render_route(query, config, now, None),
        "/api/model" => render_route(query, config, now, Some(OutputFormat::Json)),
        _ => Reply::text(404, "not found"),
    }
}

fn respond(request: Request, config: &ServiceConfig) {
    let method = request.method().as_str().to_string();
    let url = request.url().to_string();
    let reply = handle(&method, &url, config, Local::now().naive_local());

    match reply.status {
        200..=399 => debug!("{method} {url} -> {} ({} bytes)", reply.status, reply.body.len()),
        400..=499 => warn!("{method} {url} -> {}", reply.status),
        _ => error!("{method} {url} -> {}", reply.status),
    }

    let head_only = method.eq_ignore_ascii_case("HEAD");
    let body = if head_only { Vec::new() } else { reply.body };
    let mut response = Response::from_data(body).with_status_code(reply.status);
    for (name, value) in &reply.headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(h) => response.add_header(h),
            Err(()) => warn!("dropping unencodable header {name}"),
        }
    }
    if let Err(e) = request.respond(response) {
        warn!("failed to write response for {url}: {e}");
    }
}

/// Listening server with a fixed pool of request threads.
pub struct YearServer {
    server: Arc<Server>,
    config: Arc<ServiceConfig>,
}

/// Handle to a server running in the background.
pub struct ServerHandle {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl YearServer {
    pub fn bind(config: ServiceConfig) -> Result<Self> {
        let server = Server::http(config.bind.as_str())
            .map_err(|e| Error::Other(format!("Failed to bind {}: {}", config.bind, e)))?;
        Ok(Self { server: Arc::new(server), config: Arc::new(config) })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Start the worker threads and return immediately.
    pub fn spawn(self) -> Result<ServerHandle> {
        let workers = self.config.workers.max(1);
        info!(
            "serving on {} with {} workers ({:?} parameters)",
            self.server.server_addr(),
            workers,
            self.config.param_policy
        );

        let stopping = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::with_capacity(workers);
        for id in 0..workers {
            let server = Arc::clone(&self.server);
            let config = Arc::clone(&self.config);
            let stopping = Arc::clone(&stopping);
            let t = thread::Builder::new()
                .name(format!("yeardots-http-{id}"))
                .spawn(move || loop {
                    match server.recv() {
                        Ok(request) => respond(request, &config),
                        Err(_) if stopping.load(Ordering::SeqCst) => break,
                        Err(e) => warn!("accept failed on worker {id}: {e}"),
                    }
                })
                .map_err(Error::Io)?;
            threads.push(t);
        }

        Ok(ServerHandle { server: self.server, stopping, threads })
    }

    /// Serve until the process exits.
    pub fn run(self) -> Result<()> {
        let handle = self.spawn()?;
        handle.join();
        Ok(())
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Stop accepting requests and wait for the workers.
    pub fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        for _ in &self.threads {
            self.server.unblock();
        }
        self.join();
    }

    fn join(self) {
        for t in self.threads {
            if t.join().is_err() {
                error!("http worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn health_check() {
        let r = handle("GET", "/healthz", &ServiceConfig::default(), now());
        assert_eq!(r.status, 200);
        assert_eq!(r.body, b"ok");
    }

    #[test]
    fn unknown_path_and_method() {
        let cfg = ServiceConfig::default();
        assert_eq!(handle("GET", "/nope", &cfg, now()).status, 404);
        let r = handle("POST", "/api/og", &cfg, now());
        assert_eq!(r.status, 405);
        assert_eq!(r.header_value("allow"), Some("GET, HEAD"));
    }

    #[test]
    fn og_is_always_png() {
        let r = handle("GET", "/api/og?format=svg&width=100&height=200", &ServiceConfig::default(), now());
        assert_eq!(r.status, 200);
        assert_eq!(r.header_value("Content-Type"), Some("image/png"));
        assert_eq!(&r.body[0..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(r.header_value("X-Year-Progress-Days-Left"), Some("364"));
        assert_eq!(r.header_value("X-Year-Progress-Label"), Some("364 days left - 0.0%"));
    }

    #[test]
    fn header_label_is_ascii() {
        assert_eq!(header_label("1 day left \u{00b7} 99.5%"), "1 day left - 99.5%");
        assert_eq!(header_label("caf\u{e9}\n"), "caf");
    }

    #[test]
    fn worker_survives_spurious_recv_error() {
        use std::io::{Read, Write};
        use std::net::TcpStream;

        let cfg = ServiceConfig { bind: "127.0.0.1:0".to_string(), workers: 1, ..Default::default() };
        let running = YearServer::bind(cfg).unwrap().spawn().unwrap();
        let addr = running.local_addr().unwrap();

        // Wakes the only worker with an error while no shutdown is pending
        running.server.unblock();

        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("ok"));

        running.shutdown();
    }

    #[test]
    fn etag_is_stable() {
        assert_eq!(etag(b"abc"), etag(b"abc"));
        assert_ne!(etag(b"abc"), etag(b"abd"));
        assert_eq!(etag(b"").len(), 34);
    }
}
