//! Probe-then-stream proxy engine.
//!
//! This module implements the core relay pipeline: validating an untrusted
//! URL, probing the remote resource's metadata with the cheapest possible
//! upstream request, deciding whether a download may proceed, and relaying
//! the upstream byte stream to the client with prompt cancellation when the
//! client disconnects.
//!
//! # Overview
//!
//! - [`validate`] turns a raw string into a [`ValidatedUrl`] — the sole
//!   trust boundary; no other component accepts raw strings.
//! - [`probe`] issues a HEAD request (falling back to GET) and returns
//!   [`ResourceMetadata`] without downloading the body.
//! - [`admission`] decides, from probed metadata, whether a download is
//!   allowed (size ceiling, accepted content-type classes).
//! - [`RelayEngine`] ties the pipeline together and opens a
//!   [`RelaySession`] whose [`RelayStream`] pipes upstream bytes to the
//!   caller.
//!
//! # Example
//!
//! ```no_run
//! use vidrelay_core::config::RelayConfig;
//! use vidrelay_core::relay::RelayEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RelayEngine::new(&RelayConfig::default());
//! let metadata = engine.probe("https://example.com/movie.mp4").await?;
//! println!("{} ({} bytes)", metadata.filename, metadata.content_length);
//! # Ok(())
//! # }
//! ```

pub mod admission;
mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod probe;
mod stream;
mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use admission::AdmissionDecision;
pub use client::{ByteStream, HttpUpstream, Upstream, UpstreamResponse};
pub use engine::RelayEngine;
pub use error::{RelayError, UpstreamError};
pub use filename::derive_filename;
pub use probe::{ResourceMetadata, probe};
pub use stream::{RelaySession, RelayState, RelayStream};
pub use validate::{ValidatedUrl, validate};
