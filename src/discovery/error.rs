//! Error types for the discovery stage.
//!
//! Extraction and rendering failures carry enough context to tell a fatal
//! "nothing to scrape" outcome apart from infrastructure problems.

use thiserror::Error;

/// Errors raised while extracting references from a markup snapshot.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The well-known container element is absent from the markup.
    ///
    /// This is fatal for the whole run: a listing without the container has
    /// no scrapeable content at all. Malformed candidate elements inside a
    /// present container are NOT errors - they are skipped and counted.
    #[error("no image container ({selector}) found in markup")]
    NoContainer {
        /// The CSS selector that failed to match.
        selector: &'static str,
    },
}

/// Errors raised by a [`PageRenderer`](super::renderer::PageRenderer) implementation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The rendering session could not be started.
    #[error("failed to launch renderer: {message}")]
    Launch {
        /// Description of the launch failure.
        message: String,
    },

    /// Navigation to the listing URL failed.
    #[error("failed to open {url}: {message}")]
    Navigation {
        /// The URL that could not be opened.
        url: String,
        /// Description of the navigation failure.
        message: String,
    },

    /// An action on an already-open page failed (scroll, markup capture).
    #[error("renderer session error: {message}")]
    Session {
        /// Description of the session failure.
        message: String,
    },
}

impl RenderError {
    /// Creates a launch error.
    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    /// Creates a navigation error.
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}

/// Errors raised by the incremental discovery loop.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The rendered listing has no scrapeable content (container missing).
    ///
    /// Terminates the whole run with a non-zero status before any
    /// downloading begins.
    #[error("no images found at {url}: {source}")]
    NoContent {
        /// The listing URL that produced the empty markup.
        url: String,
        /// The underlying extraction failure.
        #[source]
        source: ExtractError,
    },

    /// The renderer failed while driving the listing page.
    #[error("renderer error: {0}")]
    Render(#[from] RenderError),
}

impl DiscoveryError {
    /// Creates a no-content error for a listing URL.
    pub fn no_content(url: impl Into<String>, source: ExtractError) -> Self {
        Self::NoContent {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_no_container_display() {
        let error = ExtractError::NoContainer {
            selector: "div#imgid",
        };
        let msg = error.to_string();
        assert!(msg.contains("div#imgid"), "Expected selector in: {msg}");
        assert!(msg.contains("no image container"), "Unexpected: {msg}");
    }

    #[test]
    fn test_render_error_navigation_display() {
        let error = RenderError::navigation("https://example.com/listing", "timed out");
        let msg = error.to_string();
        assert!(msg.contains("https://example.com/listing"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn test_discovery_error_no_content_display() {
        let error = DiscoveryError::no_content(
            "https://example.com/listing",
            ExtractError::NoContainer {
                selector: "div#imgid",
            },
        );
        let msg = error.to_string();
        assert!(msg.contains("no images found"), "Unexpected: {msg}");
        assert!(msg.contains("https://example.com/listing"));
    }
}
