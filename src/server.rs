//! Static file host for the client pages.
//!
//! Serves `GET`/`HEAD` requests for files under a root directory over
//! HTTP/1.1, one task per connection, closing each connection after the
//! response. Unknown paths get `404.html` with a 404 status. With layout
//! stitching enabled, HTML pages are sent with their shared fragments already
//! inserted.

use anyhow::{Context, Result};
use reqwest::Url;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{Instrument, debug, info, warn};

use crate::layout::{Fragment, FsFragmentSource, default_fragments, load_layout};

const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// How long a client may take to send its request line and headers.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const NOT_FOUND_PAGE: &str = "404.html";

pub const INDEX_PAGE: &str = "index.html";

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }

    /// Serializes the status line, headers and (unless `head_only`) the body.
    pub fn to_bytes(&self, head_only: bool) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        if self.status == 405 {
            out.push_str("Allow: GET, HEAD\r\n");
        }
        out.push_str("\r\n");

        let mut bytes = out.into_bytes();
        if !head_only {
            bytes.extend_from_slice(&self.body);
        }
        bytes
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// The directory being served and how HTML pages are post-processed.
pub struct StaticSite {
    root: PathBuf,
    stitch_layout: bool,
    fragments: Vec<Fragment>,
    request_timeout: Duration,
}

impl StaticSite {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stitch_layout: false,
            fragments: default_fragments(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Connections that have not sent a complete request head within
    /// `timeout` are dropped.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Insert shared fragments, read from the site root, into every HTML page served.
    pub fn with_layout(mut self, fragments: Vec<Fragment>) -> Self {
        self.stitch_layout = true;
        self.fragments = fragments;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request target to a file under the root.
    ///
    /// The target is parsed as a URL path, so percent-escapes are decoded and
    /// `.`/`..` segments (escaped or not) are resolved against `/` and can
    /// never climb above the root. `None` for targets that are not a path.
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        let path = target.split(['?', '#']).next().unwrap_or("/");
        if !path.starts_with('/') || path.starts_with("//") {
            return None;
        }
        let url = Url::parse("file:///").ok()?.join(path).ok()?;
        let decoded = url.to_file_path().ok()?;

        let mut resolved = self.root.clone();
        for component in decoded.components() {
            match component {
                Component::RootDir => continue,
                Component::Normal(segment) => resolved.push(segment.to_str()?),
                _ => return None,
            }
        }
        if url.path().ends_with('/') {
            resolved.push(INDEX_PAGE);
        }
        Some(resolved)
    }

    /// Builds the response for one request.
    pub async fn respond(&self, method: &str, target: &str) -> Response {
        if method != "GET" && method != "HEAD" {
            return Response::text(405, "Method Not Allowed");
        }

        let Some(mut path) = self.resolve(target) else {
            return self.not_found().await;
        };

        if tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            path.push(INDEX_PAGE);
        }

        match tokio::fs::read(&path).await {
            Ok(body) => {
                let content_type = content_type(&path);
                let body = if self.stitch_layout && content_type.starts_with("text/html") {
                    self.stitch(body).await
                } else {
                    body
                };
                Response {
                    status: 200,
                    content_type,
                    body,
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "File not served");
                self.not_found().await
            }
        }
    }

    async fn stitch(&self, body: Vec<u8>) -> Vec<u8> {
        let page = match String::from_utf8(body) {
            Ok(page) => page,
            Err(e) => return e.into_bytes(),
        };
        let source = Arc::new(FsFragmentSource::new(&self.root));
        load_layout(&page, source, &self.fragments)
            .await
            .html
            .into_bytes()
    }

    async fn not_found(&self) -> Response {
        match tokio::fs::read(self.root.join(NOT_FOUND_PAGE)).await {
            Ok(body) => Response {
                status: 404,
                content_type: "text/html; charset=utf-8",
                body,
            },
            Err(_) => Response::text(404, "Not Found"),
        }
    }
}

async fn read_request_head<S: AsyncRead + Unpin>(stream: &mut S) -> Result<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buf.len() > MAX_REQUEST_HEAD {
            anyhow::bail!("request head exceeds {MAX_REQUEST_HEAD} bytes");
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Splits `"GET /path HTTP/1.1"` into method and target.
fn parse_request_line(head: &str) -> Option<(&str, &str)> {
    let line = head.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    Some((method, target))
}

/// Reads one request from `stream`, writes the response and closes the stream.
pub async fn handle_connection<S>(mut stream: S, site: &StaticSite) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let head = tokio::time::timeout(site.request_timeout, read_request_head(&mut stream))
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "no complete request within {}ms",
                site.request_timeout.as_millis()
            )
        })??;

    let (response, head_only) = match parse_request_line(&head) {
        Some((method, target)) => {
            let response = site.respond(method, target).await;
            info!(method, target, status = response.status, "Request");
            (response, method == "HEAD")
        }
        None => (Response::text(400, "Bad Request"), false),
    };

    stream.write_all(&response.to_bytes(head_only)).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Accepts connections forever, handling each on its own task.
pub async fn serve(listener: TcpListener, site: Arc<StaticSite>) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let site = site.clone();
        let span = tracing::info_span!("connection", peer = %peer);
        tokio::spawn(
            async move {
                if let Err(e) = handle_connection(stream, &site).await {
                    warn!(error = %e, "Connection failed");
                }
            }
            .instrument(span),
        );
    }
}

/// Binds `addr` and serves `site` until the process stops.
#[tracing::instrument(skip(site), fields(root = %site.root().display()))]
pub async fn run(addr: SocketAddr, site: StaticSite) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(url = %format!("http://localhost:{}", listener.local_addr()?.port()), "Server running");
    serve(listener, Arc::new(site)).await
}
