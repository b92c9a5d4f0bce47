//! Shared completion state: the single source of truth for "are we done".
//!
//! Claiming an output index, writing the file, and advancing the counter all
//! happen inside one mutex hold. Two workers can therefore never claim the
//! same index, the count can never pass the quota, and a failed write never
//! consumes an index slot - saved files are always exactly `0..saved_count`.

use std::path::Path;

use tokio::sync::Mutex;
use tracing::{info, warn};

/// Fallback extension when the markup-reported one is unusable.
const FALLBACK_EXTENSION: &str = "jpg";

/// Result of one save attempt against the shared counter.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Bytes were persisted under the claimed index.
    Saved {
        /// Zero-based output file index.
        index: usize,
    },
    /// The quota is already met; nothing was written. Workers treat this as
    /// the shutdown signal.
    QuotaReached,
    /// The filesystem write failed; the index slot was not consumed.
    WriteFailed,
}

/// Shared save counter gating the worker pool against the quota.
#[derive(Debug)]
pub struct CompletionCounter {
    quota: usize,
    saved: Mutex<usize>,
}

impl CompletionCounter {
    /// Creates a counter for the given quota (files to save).
    #[must_use]
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            saved: Mutex::new(0),
        }
    }

    /// Returns the configured quota.
    #[must_use]
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Returns the number of files saved so far.
    pub async fn saved_count(&self) -> usize {
        *self.saved.lock().await
    }

    /// Returns true once the quota is met.
    pub async fn is_complete(&self) -> bool {
        self.saved_count().await >= self.quota
    }

    /// Attempts to claim the next index and persist `bytes` as
    /// `{output_dir}/{index}.{extension}`.
    ///
    /// The quota re-check, index assignment, write, and increment form one
    /// atomic unit under the counter's lock.
    pub async fn save(&self, output_dir: &Path, extension: &str, bytes: &[u8]) -> SaveOutcome {
        let mut saved = self.saved.lock().await;

        if *saved >= self.quota {
            return SaveOutcome::QuotaReached;
        }

        let index = *saved;
        let path = output_dir.join(format!("{index}.{}", sanitize_extension(extension)));

        match tokio::fs::write(&path, bytes).await {
            Ok(()) => {
                *saved += 1;
                info!(
                    extension,
                    total = *saved,
                    path = %path.display(),
                    "image saved"
                );
                SaveOutcome::Saved { index }
            }
            Err(e) => {
                // Counter not advanced: the slot stays available for the
                // next successful save, keeping indices gap-free.
                warn!(path = %path.display(), error = %e, "image write failed");
                SaveOutcome::WriteFailed
            }
        }
    }
}

/// Normalizes a markup-reported extension into a safe filename suffix.
///
/// The extension is untrusted page data; strip anything that is not ASCII
/// alphanumeric so it cannot smuggle path separators into the output path.
fn sanitize_extension(extension: &str) -> String {
    let cleaned: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        FALLBACK_EXTENSION.to_string()
    } else {
        cleaned
    }
}
