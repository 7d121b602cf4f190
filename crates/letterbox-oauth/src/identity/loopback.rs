//! Loopback redirect receiver for desktop consent.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::debug;
use url::Url;

use crate::error::Result;

const CLOSE_PAGE: &str = "<html><body style=\"font-family: serif\">\
<p>You may close this window and return to your letterbox.</p></body></html>";

const NOT_FOUND: &[u8] = b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// How long an accepted connection may stay silent before it is dropped.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters carried by the provider's redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Redirect {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Accepts connections until one carries the authorization redirect.
///
/// Each connection is served on its own task, so a browser's idle
/// preconnect socket cannot hold up the real redirect. Unrelated requests
/// (a browser asking for `/favicon.ico`, say) get a 404 and the listener
/// keeps waiting. Connections still open on return are dropped.
pub(crate) async fn receive_redirect(listener: &TcpListener) -> Result<Redirect> {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                connections.spawn(serve_connection(stream, peer));
            }
            Some(joined) = connections.join_next() => {
                if let Ok(Some(redirect)) = joined {
                    return Ok(redirect);
                }
            }
        }
    }
}

/// Reads one request and answers it. Returns the redirect if it was one.
async fn serve_connection(mut stream: TcpStream, peer: SocketAddr) -> Option<Redirect> {
    let mut buf = vec![0u8; 8192];
    let read = match tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)).await {
        Ok(Ok(read)) => read,
        Ok(Err(e)) => {
            debug!(%peer, "Loopback read failed: {e}");
            return None;
        }
        Err(_) => {
            debug!(%peer, "Dropping idle loopback connection");
            return None;
        }
    };
    let request = String::from_utf8_lossy(&buf[..read]);

    let Some(redirect) = parse_request(&request) else {
        debug!(%peer, "Ignoring unrelated loopback request");
        let _ = stream.write_all(NOT_FOUND).await;
        return None;
    };

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{CLOSE_PAGE}",
        CLOSE_PAGE.len()
    );
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        debug!(%peer, "Could not send the close page: {e}");
    }
    let _ = stream.shutdown().await;
    Some(redirect)
}

/// Extracts the redirect parameters from a raw HTTP request.
pub(crate) fn parse_request(request: &str) -> Option<Redirect> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let target = parts.next()?;
    let url = Url::parse(&format!("http://127.0.0.1{target}")).ok()?;
    if url.path() != "/" {
        return None;
    }

    let mut redirect = Redirect::default();
    for (key, value) in url.query_pairs() {
        let value = Some(value.into_owned());
        match key.as_ref() {
            "code" => redirect.code = value,
            "state" => redirect.state = value,
            "error" => redirect.error = value,
            "error_description" => redirect.error_description = value,
            _ => {}
        }
    }

    (redirect.code.is_some() || redirect.error.is_some()).then_some(redirect)
}
