//! Imgspider Core Library
//!
//! This library provides the core functionality for the imgspider tool,
//! which harvests a bounded number of images for a search term from an
//! infinite-scroll search listing.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`discovery`] - Headless-rendered listing discovery and reference extraction
//! - [`queue`] - In-memory reference handoff between feeder and workers
//! - [`fetch`] - HTTP byte fetching with a bounded per-request timeout
//! - [`pipeline`] - Concurrent worker pool gated by a shared completion counter

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod discovery;
pub mod fetch;
pub mod pipeline;
pub mod queue;

pub(crate) mod user_agent;

// Re-export commonly used types
pub use discovery::{
    Discovered, DiscoveryError, DiscoverySettings, Extraction, ReferenceRecord, discover,
    extract_references, listing_url,
};
pub use fetch::{FetchError, HttpClient};
pub use pipeline::{
    CompletionCounter, DEFAULT_WORKERS, HarvestStats, PoolError, SaveOutcome, WorkerPool,
};
pub use queue::{ReferenceQueue, spawn_feeder};
