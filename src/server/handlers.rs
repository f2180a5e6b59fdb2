//! Route handlers and wire types.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ServerConfig;
use crate::relay::admission::exceeds_ceiling;
use crate::relay::{RelayEngine, RelayError, RelaySession};

use super::rate_limit::RateLimiter;

/// Shared per-process state: the engine and the request-rate limiter.
pub struct AppState {
    pub(crate) engine: RelayEngine,
    pub(crate) rate_limiter: RateLimiter,
}

impl AppState {
    /// Builds state with the production engine.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            engine: RelayEngine::new(&config.relay),
            rate_limiter: RateLimiter::new(&config.rate_limit),
        }
    }

    /// Builds state around an existing engine (tests inject doubles here).
    #[must_use]
    pub fn with_engine(config: &ServerConfig, engine: RelayEngine) -> Self {
        Self {
            engine,
            rate_limiter: RateLimiter::new(&config.rate_limit),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UrlQuery {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProbeResponse {
    ok: bool,
    content_type: String,
    content_length: u64,
    filename: String,
    too_large: bool,
    is_likely_video: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) ok: bool,
    pub(crate) error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
}

/// `GET /probe?url=...` — metadata without a download.
pub(crate) async fn probe(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(raw) = query.url else {
        return error_response(&RelayError::invalid_input("missing url query parameter"));
    };

    match state.engine.probe(&raw).await {
        Ok(metadata) => {
            let too_large = exceeds_ceiling(
                metadata.content_length,
                state.engine.max_content_length(),
            );
            Json(ProbeResponse {
                ok: true,
                content_type: metadata.content_type,
                content_length: metadata.content_length,
                filename: metadata.filename,
                too_large,
                is_likely_video: metadata.is_likely_media,
            })
            .into_response()
        }
        Err(error) => error_response(&error),
    }
}

/// `GET /download?url=...` — stream the resource as an attachment.
pub(crate) async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(raw) = query.url else {
        return error_response(&RelayError::invalid_input("missing url query parameter"));
    };

    match state.engine.open_relay(&raw).await {
        Ok(session) => relay_response(&raw, session),
        Err(error) => error_response(&error),
    }
}

/// `GET /health` — trivial liveness probe.
pub(crate) async fn health() -> Response {
    Json(HealthResponse { ok: true }).into_response()
}

/// Builds the streaming attachment response from an open session.
///
/// Content-Length is set if and only if the upstream declared one; the
/// body is the relay stream, so dropping the connection drops the
/// upstream read.
fn relay_response(raw: &str, session: RelaySession) -> Response {
    let mut builder = HttpResponse::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, session.content_type())
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", session.filename()),
        );
    if let Some(length) = session.content_length() {
        builder = builder.header(CONTENT_LENGTH, length);
    }

    match builder.body(Body::from_stream(session.into_stream())) {
        Ok(response) => response,
        Err(error) => {
            // Upstream declared a content type that is not a legal header
            // value; nothing has been sent yet, so report a fetch failure.
            warn!(url = %raw, error = %error, "failed to build relay response headers");
            error_response(&RelayError::fetch_failed(raw, 0))
        }
    }
}

/// Maps the error taxonomy onto response statuses.
pub(crate) fn error_response(error: &RelayError) -> Response {
    let status = match error {
        RelayError::InvalidInput { .. }
        | RelayError::DisallowedScheme { .. }
        | RelayError::UpstreamUnreachable { .. } => StatusCode::BAD_REQUEST,
        RelayError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        RelayError::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        RelayError::UpstreamFetchFailed { .. } => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            ok: false,
            error: error.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(error: &RelayError) -> StatusCode {
        error_response(error).status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(&RelayError::invalid_input("missing")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&RelayError::disallowed_scheme("ftp")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&RelayError::too_large(600, 500)),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(&RelayError::unsupported_type("text/html")),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(&RelayError::fetch_failed("https://example.com/", 503)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_probe_response_serializes_camel_case() {
        let json = serde_json::to_value(ProbeResponse {
            ok: true,
            content_type: "video/mp4".to_string(),
            content_length: 1_048_576,
            filename: "movie.mp4".to_string(),
            too_large: false,
            is_likely_video: true,
        })
        .unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["contentType"], "video/mp4");
        assert_eq!(json["contentLength"], 1_048_576);
        assert_eq!(json["filename"], "movie.mp4");
        assert_eq!(json["tooLarge"], false);
        assert_eq!(json["isLikelyVideo"], true);
    }
}
