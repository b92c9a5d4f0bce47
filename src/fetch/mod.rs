//! HTTP byte fetching with a bounded per-request timeout.
//!
//! Downloads here are whole-body and best-effort: given hundreds of
//! untrusted third-party URLs, most failures are expected and not
//! actionable, so callers drop failed records rather than retrying.

mod client;
mod error;

pub use client::{FETCH_TIMEOUT_SECS, HttpClient};
pub use error::FetchError;
