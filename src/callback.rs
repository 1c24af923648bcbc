//! Loopback redirect capture: serve the redirect URI locally and pick the
//! authorization code off the first matching request.
//!
//! A `localhost` redirect is served on both 127.0.0.1 and ::1, since browsers
//! differ in which one they try first.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tiny_http::{Header, Request, Response, Server};
use url::Url;

use crate::error::BootstrapError;
use crate::prompt;

const DONE_PAGE: &str = "<!doctype html><html><body><h1>Authorization received</h1>\
<p>You can close this tab and return to the terminal.</p></body></html>";
const DENIED_PAGE: &str = "<!doctype html><html><body><h1>Authorization failed</h1>\
<p>Return to the terminal for details.</p></body></html>";

/// Where a loopback redirect URI must be served.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoopbackTarget {
    /// Socket addresses to bind; the first one is required.
    bind: Vec<String>,
    /// `host:port` as written in the redirect URI.
    display: String,
    path: String,
}

pub struct LoopbackListener {
    servers: Vec<Arc<Server>>,
    addr: String,
    path: String,
}

impl LoopbackListener {
    /// Bind the listener if `redirect_uri` is an http loopback URI.
    /// Returns `Ok(None)` for anything else (e.g. the out-of-band URN).
    pub fn bind(redirect_uri: &str) -> Result<Option<Self>, BootstrapError> {
        let Some(target) = loopback_target(redirect_uri) else {
            return Ok(None);
        };

        let mut servers = Vec::new();
        for (i, addr) in target.bind.iter().enumerate() {
            match Server::http(addr.as_str()) {
                Ok(server) => servers.push(Arc::new(server)),
                Err(e) if i == 0 => {
                    return Err(BootstrapError::Callback {
                        addr: addr.clone(),
                        reason: e.to_string(),
                    });
                }
                // ::1 may be unavailable (IPv6 disabled); 127.0.0.1 still serves.
                Err(e) => tracing::warn!(%addr, error = %e, "could not bind secondary loopback address"),
            }
        }
        tracing::debug!(addrs = ?target.bind, path = %target.path, "listening for authorization redirect");
        Ok(Some(Self {
            servers,
            addr: target.display,
            path: target.path,
        }))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Block until the browser lands on the redirect path with a `code` or
    /// `error` parameter. Other requests (favicon and friends) get a 404.
    pub fn wait_for_code(self) -> Result<String, BootstrapError> {
        let (tx, rx) = mpsc::channel();
        for server in &self.servers {
            let server = Arc::clone(server);
            let tx = tx.clone();
            thread::spawn(move || {
                loop {
                    let received = server.recv();
                    let failed = received.is_err();
                    if tx.send(received).is_err() || failed {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let result = self.serve(&rx);
        for server in &self.servers {
            server.unblock();
        }
        result
    }

    fn serve(&self, rx: &mpsc::Receiver<std::io::Result<Request>>) -> Result<String, BootstrapError> {
        loop {
            let request = match rx.recv() {
                Ok(Ok(request)) => request,
                Ok(Err(e)) => {
                    return Err(BootstrapError::Callback {
                        addr: self.addr.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(_) => {
                    return Err(BootstrapError::Callback {
                        addr: self.addr.clone(),
                        reason: "listener stopped".to_string(),
                    });
                }
            };

            let (path, query) = match request.url().split_once('?') {
                Some((path, query)) => (path.to_string(), query.to_string()),
                None => (request.url().to_string(), String::new()),
            };
            let has_answer = query
                .split('&')
                .any(|pair| pair.starts_with("code=") || pair.starts_with("error="));
            if path != self.path || !has_answer {
                tracing::debug!(url = %request.url(), "ignoring request");
                let _ = request.respond(Response::from_string("Not Found").with_status_code(404));
                continue;
            }

            let result = prompt::code_from_query(&query);
            let page = if result.is_ok() { DONE_PAGE } else { DENIED_PAGE };
            let mut response = Response::from_string(page);
            if let Ok(header) = "Content-Type: text/html; charset=utf-8".parse::<Header>() {
                response = response.with_header(header);
            }
            if let Err(e) = request.respond(response) {
                tracing::warn!(error = %e, "could not answer the browser");
            }
            return result;
        }
    }
}

/// Bind addresses and path for http redirect URIs that point at this machine.
fn loopback_target(redirect_uri: &str) -> Option<LoopbackTarget> {
    let url = Url::parse(redirect_uri).ok()?;
    if url.scheme() != "http" {
        return None;
    }
    let port = url.port_or_known_default()?;
    let (bind, display) = match url.host()? {
        url::Host::Domain("localhost") => (
            vec![format!("127.0.0.1:{}", port), format!("[::1]:{}", port)],
            format!("localhost:{}", port),
        ),
        url::Host::Ipv4(ip) if ip.is_loopback() => {
            let addr = format!("{}:{}", ip, port);
            (vec![addr.clone()], addr)
        }
        url::Host::Ipv6(ip) if ip.is_loopback() => {
            let addr = format!("[{}]:{}", ip, port);
            (vec![addr.clone()], addr)
        }
        _ => return None,
    };
    Some(LoopbackTarget {
        bind,
        display,
        path: url.path().to_string(),
    })
}
