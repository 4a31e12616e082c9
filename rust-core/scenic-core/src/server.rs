//! # HTTP Server
//!
//! HTTP/1 driver for a [`Dispatcher`], built on Hyper and Tokio.
//! Implements graceful shutdown with signal handling.
//!
//! ## Key Features
//!
//! - Async connection handling with Tokio, one task per connection
//! - Handler stacks run on the blocking pool, off the reactor
//! - Graceful shutdown on Ctrl-C with connection draining
//! - Body size limit (413 Payload Too Large)
//! - `x-request-id` generated when the client sends none

use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Method, Router};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// HTTP Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub address: SocketAddr,
    /// Enable keep-alive connections
    pub keep_alive: bool,
    /// Shutdown timeout for graceful shutdown (default: 30 seconds)
    pub shutdown_timeout: Duration,
    /// Max request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 8000).into(),
            keep_alive: true,
            shutdown_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
        }
    }
}

/// Install the JSON `tracing` subscriber
///
/// Honours `RUST_LOG`, defaulting to `scenic_core=info`. Calling it twice is
/// harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scenic_core=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}

/// HTTP server over a finished router
pub struct Server {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    /// Create a server with the default configuration
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: Arc::new(Dispatcher::new(router)),
        }
    }

    /// Bind the server to an address
    #[must_use]
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.config.address = addr;
        self
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set max request body size
    pub fn set_max_body_size(&mut self, bytes: usize) {
        self.config.max_body_size = bytes;
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The dispatcher requests are handed to
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Start the server with graceful shutdown
    ///
    /// # Errors
    ///
    /// `Error::BindError` if the address cannot be bound, `Error::Io` if
    /// accepting fails.
    pub async fn serve(&self) -> Result<()> {
        let addr = self.config.address;
        let bind_error = |source| Error::BindError {
            address: addr.to_string(),
            source,
        };

        let socket = if addr.is_ipv4() {
            tokio::net::TcpSocket::new_v4()
        } else {
            tokio::net::TcpSocket::new_v6()
        }?;
        socket.set_reuseaddr(true)?;
        socket.bind(addr).map_err(bind_error)?;
        let listener = socket.listen(1024).map_err(bind_error)?;

        info!(address = %addr, "Server listening");

        let active = Arc::new(AtomicUsize::new(0));
        let max_body_size = self.config.max_body_size;
        let keep_alive = self.config.keep_alive;
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, remote_addr) = accept_result?;
                    let io = TokioIo::new(stream);
                    let dispatcher = Arc::clone(&self.dispatcher);
                    let connection = ActiveConnection::open(&active);

                    tokio::task::spawn(async move {
                        let _connection = connection;

                        let service = service_fn(move |req| {
                            let dispatcher = Arc::clone(&dispatcher);
                            async move {
                                let method = req.method().clone();
                                let path = req.uri().path().to_string();
                                let version = req.version();

                                let resp = handle_request(req, dispatcher, remote_addr, max_body_size).await;
                                info!(
                                    remote = %remote_addr,
                                    method = %method,
                                    path = %path,
                                    version = ?version,
                                    status = resp.status().as_u16(),
                                    "Request served"
                                );
                                Ok::<_, hyper::Error>(resp)
                            }
                        });

                        if let Err(err) = http1::Builder::new()
                            .keep_alive(keep_alive)
                            .serve_connection(io, service)
                            .await
                        {
                            error!(remote = %remote_addr, error = ?err, "Error serving connection");
                        }
                    });
                }
                () = &mut shutdown => {
                    info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let drain = async {
            while active.load(Ordering::Relaxed) > 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        if tokio::time::timeout(self.config.shutdown_timeout, drain)
            .await
            .is_err()
        {
            info!(
                open = active.load(Ordering::Relaxed),
                "Shutdown timeout reached with open connections"
            );
        }
        Ok(())
    }

    /// Execute a test request directly without network stack
    pub async fn test_request(
        &self,
        method: Method,
        path: &str,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Response {
        if body
            .as_ref()
            .is_some_and(|b| b.len() > self.config.max_body_size)
        {
            let mut res = Response::new().with_status(413);
            res.end("Payload Too Large");
            return res;
        }

        let mut req = Request::new(method, path, headers, body);
        req.set_header("x-client-ip", "test");
        run_blocking(Arc::clone(&self.dispatcher), req).await
    }
}

/// One open connection in the drain count, released on drop
struct ActiveConnection(Arc<AtomicUsize>);

impl ActiveConnection {
    fn open(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(active))
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to install Ctrl-C handler, shutdown by signal disabled");
        std::future::pending::<()>().await;
    }
}

/// Dispatch on the blocking pool, stamping the request id on both sides
async fn run_blocking(dispatcher: Arc<Dispatcher>, mut req: Request) -> Response {
    let request_id = match req.header("x-request-id") {
        Some(id) => id.to_string(),
        None => {
            let id = generate_request_id();
            req.set_header("x-request-id", &id);
            id
        }
    };

    let mut res = match tokio::task::spawn_blocking(move || dispatcher.dispatch(req)).await {
        Ok(res) => res,
        Err(err) => {
            error!(error = %err, request_id = %request_id, "Dispatch task failed");
            let mut res = Response::new().with_status(500);
            res.end("Internal Server Error");
            res
        }
    };
    res.set_header("x-request-id", &request_id);
    res
}

async fn handle_request(
    req: hyper::Request<hyper::body::Incoming>,
    dispatcher: Arc<Dispatcher>,
    remote_addr: SocketAddr,
    max_body_size: usize,
) -> hyper::Response<Full<Bytes>> {
    let mut request = match Request::from_hyper_with_limit(req, max_body_size).await {
        Ok(Some(request)) => request,
        Ok(None) => return plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        Err(Error::PayloadTooLarge { .. }) => {
            return plain(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
        }
        Err(e) => {
            error!(error = %e, "Failed to parse request");
            return plain(StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    request.set_header("x-client-ip", &remote_addr.ip().to_string());
    run_blocking(dispatcher, request).await.into_hyper()
}

fn plain(status: StatusCode, body: &'static str) -> hyper::Response<Full<Bytes>> {
    let mut resp = hyper::Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *resp.status_mut() = status;
    resp
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", now.as_nanos(), counter)
}
