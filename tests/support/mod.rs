//! Upstream doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use vidrelay_core::relay::{ByteStream, UpstreamError};
use vidrelay_core::{Upstream, UpstreamResponse};

/// Replays queued HEAD/GET outcomes in order; panics on unscripted calls.
#[derive(Default)]
pub struct ScriptedUpstream {
    head_script: Mutex<VecDeque<Result<UpstreamResponse, UpstreamError>>>,
    get_script: Mutex<VecDeque<Result<UpstreamResponse, UpstreamError>>>,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_head(self, outcome: Result<UpstreamResponse, UpstreamError>) -> Self {
        self.head_script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn on_get(self, outcome: Result<UpstreamResponse, UpstreamError>) -> Self {
        self.get_script.lock().unwrap().push_back(outcome);
        self
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn head(
        &self,
        url: &vidrelay_core::ValidatedUrl,
    ) -> Result<UpstreamResponse, UpstreamError> {
        self.head_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted HEAD call for {url}"))
    }

    async fn get(
        &self,
        url: &vidrelay_core::ValidatedUrl,
    ) -> Result<UpstreamResponse, UpstreamError> {
        self.get_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted GET call for {url}"))
    }
}

/// A bodiless response with the given headers.
pub fn response(
    status: u16,
    content_type: Option<&str>,
    content_length: Option<u64>,
) -> UpstreamResponse {
    UpstreamResponse {
        status,
        content_type: content_type.map(str::to_string),
        content_length,
        body: None,
    }
}

/// A response whose body yields the given chunks.
pub fn response_with_body(
    status: u16,
    content_type: Option<&str>,
    content_length: Option<u64>,
    chunks: &[&[u8]],
) -> UpstreamResponse {
    let owned: Vec<Result<Bytes, std::io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    let mut r = response(status, content_type, content_length);
    r.body = Some(Box::pin(futures_util::stream::iter(owned)) as ByteStream);
    r
}

/// Upstream whose GET body ticks forever, one counted chunk at a time.
///
/// Used to observe that a client disconnect stops upstream reads: the
/// counter stops moving once the relay stream is dropped.
pub struct TickingUpstream {
    reads: Arc<AtomicUsize>,
    tick: Duration,
}

impl TickingUpstream {
    pub fn new(tick: Duration) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reads: Arc::clone(&reads),
                tick,
            },
            reads,
        )
    }
}

#[async_trait]
impl Upstream for TickingUpstream {
    async fn head(
        &self,
        _url: &vidrelay_core::ValidatedUrl,
    ) -> Result<UpstreamResponse, UpstreamError> {
        Ok(response(200, Some("video/mp4"), None))
    }

    async fn get(
        &self,
        _url: &vidrelay_core::ValidatedUrl,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let reads = Arc::clone(&self.reads);
        let tick = self.tick;
        let body = futures_util::stream::unfold(0u64, move |n| {
            let reads = Arc::clone(&reads);
            async move {
                tokio::time::sleep(tick).await;
                reads.fetch_add(1, Ordering::SeqCst);
                Some((
                    Ok::<Bytes, std::io::Error>(Bytes::from_static(&[0u8; 1024])),
                    n + 1,
                ))
            }
        });
        let mut r = response(200, Some("video/mp4"), None);
        r.body = Some(Box::pin(body) as ByteStream);
        Ok(r)
    }
}
