//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Bodies are read in full
//! (bounded by `max_body_bytes`) before routing, under the same request
//! timeout as the dispatch itself.

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::auth::AuthSecret;
use crate::config::Args;
use crate::routes::{self, error_response, FullBody};
use crate::store::ContentStore;
use crate::types::{GatewayError, Result};

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn ContentStore>,
    pub auth: AuthSecret,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn ContentStore>, auth: AuthSecret) -> Self {
        Self {
            args,
            store,
            auth,
            started_at: Instant::now(),
        }
    }
}

/// Bind the configured address and serve until the process exits
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;
    info!("Listening on {}", state.args.listen);
    serve(listener, state).await
}

/// Accept loop over an already-bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    info!("Store backend: {}", state.store.backend());

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Collect the request body, refusing anything over `limit` bytes
async fn read_body(body: Incoming, limit: usize) -> Result<Bytes> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(GatewayError::PayloadTooLarge("Request body too large".into()))
        }
        Err(err) => Err(GatewayError::BadRequest(format!(
            "Failed to read request body: {}",
            err
        ))),
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<FullBody>, Infallible> {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        peer = %addr,
    );

    async move {
        let started = Instant::now();
        let (parts, body) = req.into_parts();

        // One deadline covers reading the body and dispatching
        let timeout_ms = state.args.request_timeout_ms;
        let outcome = tokio::time::timeout(state.args.request_timeout(), async {
            match read_body(body, state.args.max_body_bytes).await {
                Ok(bytes) => {
                    routes::dispatch(&state, &parts.method, parts.uri.path(), &parts.headers, bytes)
                        .await
                }
                Err(err) => Err(err),
            }
        })
        .await
        .unwrap_or_else(|_| Err(GatewayError::Timeout(timeout_ms)));

        let response = match outcome {
            Ok(response) => response,
            Err(err) => error_response(&err),
        };

        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(response)
    }
    .instrument(span)
    .await
}
