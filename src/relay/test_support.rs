//! Shared upstream doubles for unit tests.
//!
//! `ScriptedUpstream` replays queued HEAD/GET outcomes in order and counts
//! calls, so tests can assert the prober's fallback order and the relay's
//! cancellation behavior without a network.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;

use super::client::{ByteStream, Upstream, UpstreamResponse};
use super::error::UpstreamError;
use super::validate::ValidatedUrl;

/// Upstream double that replays scripted responses and counts calls.
#[derive(Default)]
pub(crate) struct ScriptedUpstream {
    head_script: Mutex<VecDeque<Result<UpstreamResponse, UpstreamError>>>,
    get_script: Mutex<VecDeque<Result<UpstreamResponse, UpstreamError>>>,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl ScriptedUpstream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next HEAD call.
    pub(crate) fn on_head(self, outcome: Result<UpstreamResponse, UpstreamError>) -> Self {
        self.head_script.lock().unwrap().push_back(outcome);
        self
    }

    /// Queues the outcome of the next GET call.
    pub(crate) fn on_get(self, outcome: Result<UpstreamResponse, UpstreamError>) -> Self {
        self.get_script.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn head(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.head_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted HEAD call for {url}"))
    }

    async fn get(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.get_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted GET call for {url}"))
    }
}

/// A bodiless response with the given headers.
pub(crate) fn response(
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
pub(crate) fn response_with_body(
    status: u16,
    content_type: Option<&str>,
    content_length: Option<u64>,
    chunks: &[&[u8]],
) -> UpstreamResponse {
    let mut r = response(status, content_type, content_length);
    r.body = Some(body_from_chunks(chunks));
    r
}

/// A transport-level failure.
pub(crate) fn transport_error(message: &str) -> UpstreamError {
    UpstreamError::new("https://example.com/", message)
}

/// A body stream over fixed chunks.
pub(crate) fn body_from_chunks(chunks: &[&[u8]]) -> ByteStream {
    let owned: Vec<Result<Bytes, std::io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    Box::pin(futures_util::stream::iter(owned))
}

/// A body stream that counts how many chunks have been pulled from it.
pub(crate) fn counting_body(chunks: &[&[u8]], reads: Arc<AtomicUsize>) -> ByteStream {
    let stream = futures_util::stream::iter(
        chunks
            .iter()
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect::<Vec<Result<Bytes, std::io::Error>>>(),
    )
    .inspect(move |_| {
        reads.fetch_add(1, Ordering::SeqCst);
    });
    Box::pin(stream)
}

/// A body stream that yields the given chunks and then an I/O error.
pub(crate) fn failing_body(chunks: &[&[u8]], error_message: &str) -> ByteStream {
    let mut items: Vec<Result<Bytes, std::io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    items.push(Err(std::io::Error::other(error_message.to_string())));
    Box::pin(futures_util::stream::iter(items))
}
