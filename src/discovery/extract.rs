//! Reference extraction from rendered listing markup.
//!
//! A listing snapshot carries one well-known container element whose child
//! items each describe a downloadable image through two data attributes:
//! the source URL and the file extension. Real-world markup is frequently
//! incomplete, so a candidate missing either attribute is skipped (and
//! counted) rather than treated as an error.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::error::ExtractError;

/// CSS selector for the container holding all image candidates.
pub const CONTAINER_SELECTOR: &str = "div#imgid";

/// CSS selector for candidate elements inside the container.
const CANDIDATE_SELECTOR: &str = "li";

/// Attribute carrying the image source URL.
pub const URL_ATTRIBUTE: &str = "data-objurl";

/// Attribute carrying the image file extension.
pub const EXTENSION_ATTRIBUTE: &str = "data-ext";

#[allow(clippy::expect_used)]
static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CONTAINER_SELECTOR).expect("static selector is valid"));

#[allow(clippy::expect_used)]
static CANDIDATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CANDIDATE_SELECTOR).expect("static selector is valid"));

/// One downloadable image reference: source URL plus reported extension.
///
/// Produced during extraction and consumed exactly once by a download worker.
/// No identity beyond structural equality; duplicates are not filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    /// Source URL of the image bytes.
    pub url: String,
    /// File extension as reported by the listing markup (not validated
    /// against actual byte content).
    pub extension: String,
}

impl ReferenceRecord {
    /// Creates a reference record.
    #[must_use]
    pub fn new(url: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extension: extension.into(),
        }
    }
}

/// Result of extracting references from one markup snapshot.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Well-formed references in document order.
    pub records: Vec<ReferenceRecord>,
    /// Candidates skipped for missing a required attribute.
    pub malformed: usize,
}

impl Extraction {
    /// Returns the number of well-formed references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no well-formed references were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extracts image references from a rendered markup snapshot.
///
/// Re-extraction from the same snapshot is idempotent; the returned records
/// follow document order.
///
/// # Errors
///
/// Returns [`ExtractError::NoContainer`] when the well-known container
/// element is absent - the listing has no scrapeable content and the run
/// must stop.
pub fn extract_references(markup: &str) -> Result<Extraction, ExtractError> {
    let document = Html::parse_document(markup);

    let container = document
        .select(&CONTAINER)
        .next()
        .ok_or(ExtractError::NoContainer {
            selector: CONTAINER_SELECTOR,
        })?;

    let mut extraction = Extraction::default();
    for candidate in container.select(&CANDIDATE) {
        let url = candidate.value().attr(URL_ATTRIBUTE);
        let extension = candidate.value().attr(EXTENSION_ATTRIBUTE);
        match (url, extension) {
            (Some(url), Some(extension)) => {
                extraction.records.push(ReferenceRecord::new(url, extension));
            }
            _ => extraction.malformed += 1,
        }
    }

    Ok(extraction)
}
