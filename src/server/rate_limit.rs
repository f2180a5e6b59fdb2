//! Per-client request-rate admission for the HTTP surface.
//!
//! Fixed window per client IP. This is the pluggable outer policy the
//! relay core assumes has already run; the engine itself never consults
//! it. Requests over the limit get a 429 with the usual error envelope.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use super::handlers::{AppState, ErrorResponse};
use crate::config::RateLimitConfig;

/// Fixed-window per-client request counter.
///
/// Designed to be shared across request tasks. `DashMap` gives lock-free
/// concurrent access per client; no lock is held across an await point
/// (the check is synchronous).
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    disabled: bool,
    clients: DashMap<IpAddr, Window>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    /// Creates a limiter from config; `max_requests == 0` disables it.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            disabled: config.max_requests == 0,
            clients: DashMap::new(),
        }
    }

    /// Records one request from `client` and returns whether it is admitted.
    pub fn check(&self, client: IpAddr) -> bool {
        if self.disabled {
            return true;
        }

        let now = Instant::now();
        let mut window = self.clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            debug!(client = %client, "request over rate limit");
            return false;
        }
        window.count += 1;
        true
    }
}

/// Axum middleware applying the limiter before any handler runs.
///
/// Requests without connect info (in-process router tests) share one
/// loopback bucket.
pub(crate) async fn admit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |info| info.0.ip());

    if state.rate_limiter.check(client) {
        next.run(request).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                ok: false,
                error: "too many requests, try again later".to_string(),
            }),
        )
            .into_response()
    }
}
