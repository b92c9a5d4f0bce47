//! Incremental discovery of image references from an infinite-scroll listing.
//!
//! The listing reveals more candidates as the page is scrolled, so discovery
//! drives a renderer through repeated scroll-and-settle cycles, re-extracting
//! references after each cycle until the extracted count reaches the target
//! or the scroll bound is hit. Over-shoot past the target is expected and
//! acceptable - the save quota is enforced downstream, not here.

mod error;
mod extract;
mod renderer;

pub use error::{DiscoveryError, ExtractError, RenderError};
pub use extract::{
    CONTAINER_SELECTOR, EXTENSION_ATTRIBUTE, Extraction, ReferenceRecord, URL_ATTRIBUTE,
    extract_references,
};
pub use renderer::{ChromeRenderer, PageRenderer};

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Query template for the image search listing.
const LISTING_URL_TEMPLATE: &str = "https://image.baidu.com/search/index?tn=baiduimage&word=";

/// Settle delays and bounds for the discovery loop.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Wait after the initial page load.
    pub initial_settle: Duration,
    /// Wait after each scroll-to-end trigger.
    pub scroll_settle: Duration,
    /// Wait after the loop before the final snapshot, letting any remaining
    /// lazy content finish loading.
    pub final_settle: Duration,
    /// Maximum scroll rounds before discovery returns whatever it found.
    ///
    /// A listing with structurally fewer available items than the target
    /// would otherwise spin forever.
    pub max_rounds: usize,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            initial_settle: Duration::from_secs(3),
            scroll_settle: Duration::from_secs(1),
            final_settle: Duration::from_secs(5),
            max_rounds: 60,
        }
    }
}

impl DiscoverySettings {
    /// Settings with no settle delays, for listings that are already static.
    #[must_use]
    pub fn immediate(max_rounds: usize) -> Self {
        Self {
            initial_settle: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            final_settle: Duration::ZERO,
            max_rounds,
        }
    }
}

/// Outcome of the discovery stage.
#[derive(Debug)]
pub struct Discovered {
    /// References found in the final snapshot; may exceed the target count.
    pub records: Vec<ReferenceRecord>,
    /// Malformed candidates skipped in the final snapshot.
    pub malformed: usize,
    /// Scroll rounds performed.
    pub rounds: usize,
}

/// Builds the listing URL for a search term (URL-encoded).
#[must_use]
pub fn listing_url(search_term: &str) -> String {
    format!("{LISTING_URL_TEMPLATE}{}", urlencoding::encode(search_term))
}

/// Discovers image references for a search term by scrolling the listing
/// until at least `target_count` references are visible or the scroll bound
/// is exhausted (partial success, not an error).
///
/// Runs strictly before the download pipeline; there is no concurrency here.
///
/// # Errors
///
/// Returns [`DiscoveryError::NoContent`] when the rendered markup has no
/// scrapeable container (fatal for the whole run), or
/// [`DiscoveryError::Render`] when the renderer fails.
#[instrument(skip(renderer, settings))]
pub async fn discover<R: PageRenderer>(
    renderer: &mut R,
    search_term: &str,
    target_count: usize,
    settings: &DiscoverySettings,
) -> Result<Discovered, DiscoveryError> {
    let url = listing_url(search_term);
    info!(url = %url, target_count, "starting discovery");

    renderer.open(&url).await?;
    sleep(settings.initial_settle).await;

    let mut rounds = 0;
    loop {
        rounds += 1;
        renderer.scroll_to_end().await?;
        sleep(settings.scroll_settle).await;

        let markup = renderer.current_markup().await?;
        let extraction =
            extract_references(&markup).map_err(|e| DiscoveryError::no_content(&url, e))?;
        debug!(
            round = rounds,
            found = extraction.len(),
            malformed = extraction.malformed,
            "scrolled listing"
        );

        if extraction.len() >= target_count {
            break;
        }
        if rounds >= settings.max_rounds {
            warn!(
                rounds,
                found = extraction.len(),
                target_count,
                "scroll bound reached before target; continuing with partial discovery"
            );
            break;
        }
    }

    // Final snapshot after the long settle so late-loading entries count too.
    sleep(settings.final_settle).await;
    let markup = renderer.current_markup().await?;
    let extraction = extract_references(&markup).map_err(|e| DiscoveryError::no_content(&url, e))?;

    info!(
        found = extraction.len(),
        malformed = extraction.malformed,
        rounds,
        "discovery complete"
    );

    Ok(Discovered {
        records: extraction.records,
        malformed: extraction.malformed,
        rounds,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Scripted renderer: serves one markup snapshot per capture, repeating
    /// the last snapshot once the script is exhausted.
    struct FakeRenderer {
        snapshots: Vec<String>,
        captures: usize,
        scrolls: usize,
        opened: Option<String>,
    }

    impl FakeRenderer {
        fn new(snapshots: Vec<String>) -> Self {
            Self {
                snapshots,
                captures: 0,
                scrolls: 0,
                opened: None,
            }
        }
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        async fn open(&mut self, url: &str) -> Result<(), RenderError> {
            self.opened = Some(url.to_string());
            Ok(())
        }

        async fn scroll_to_end(&mut self) -> Result<(), RenderError> {
            self.scrolls += 1;
            Ok(())
        }

        async fn current_markup(&mut self) -> Result<String, RenderError> {
            let index = self.captures.min(self.snapshots.len() - 1);
            self.captures += 1;
            Ok(self.snapshots[index].clone())
        }

        async fn close(&mut self) {}
    }

    /// Builds a listing snapshot with `good` well-formed and `bad` malformed
    /// candidates.
    fn snapshot(good: usize, bad: usize) -> String {
        let mut items = String::new();
        for i in 0..good {
            items.push_str(&format!(
                "<li data-objurl=\"https://img.example/{i}.jpg\" data-ext=\"jpg\"></li>"
            ));
        }
        for _ in 0..bad {
            items.push_str("<li data-objurl=\"https://img.example/broken.jpg\"></li>");
        }
        format!("<html><body><div id=\"imgid\"><ul>{items}</ul></div></body></html>")
    }

    #[tokio::test]
    async fn test_discover_stops_after_one_round_when_target_visible() {
        // 5 well-formed + 2 malformed in one snapshot, target 5
        let mut renderer = FakeRenderer::new(vec![snapshot(5, 2)]);
        let settings = DiscoverySettings::immediate(10);

        let discovered = discover(&mut renderer, "cats", 5, &settings).await.unwrap();

        assert_eq!(discovered.rounds, 1);
        assert_eq!(discovered.records.len(), 5);
        assert_eq!(discovered.malformed, 2);
        assert_eq!(renderer.scrolls, 1);
    }

    #[tokio::test]
    async fn test_discover_scrolls_until_target_reached() {
        let mut renderer =
            FakeRenderer::new(vec![snapshot(2, 0), snapshot(4, 0), snapshot(6, 0)]);
        let settings = DiscoverySettings::immediate(10);

        let discovered = discover(&mut renderer, "cats", 5, &settings).await.unwrap();

        assert_eq!(discovered.rounds, 3);
        // Over-shoot past the target is expected
        assert_eq!(discovered.records.len(), 6);
    }

    #[tokio::test]
    async fn test_discover_returns_partial_result_at_scroll_bound() {
        // The listing never grows past 2 items; discovery must not spin
        let mut renderer = FakeRenderer::new(vec![snapshot(2, 0)]);
        let settings = DiscoverySettings::immediate(3);

        let discovered = discover(&mut renderer, "cats", 100, &settings).await.unwrap();

        assert_eq!(discovered.rounds, 3);
        assert_eq!(discovered.records.len(), 2);
    }

    #[tokio::test]
    async fn test_discover_missing_container_is_fatal() {
        let mut renderer =
            FakeRenderer::new(vec!["<html><body><p>nothing here</p></body></html>".to_string()]);
        let settings = DiscoverySettings::immediate(3);

        let result = discover(&mut renderer, "cats", 5, &settings).await;

        assert!(matches!(result, Err(DiscoveryError::NoContent { .. })));
    }

    #[tokio::test]
    async fn test_discover_opens_encoded_listing_url() {
        let mut renderer = FakeRenderer::new(vec![snapshot(1, 0)]);
        let settings = DiscoverySettings::immediate(1);

        discover(&mut renderer, "molten lava", 1, &settings)
            .await
            .unwrap();

        let opened = renderer.opened.unwrap();
        assert!(opened.starts_with("https://image.baidu.com/search/index?tn=baiduimage&word="));
        assert!(opened.ends_with("molten%20lava"));
    }

    #[test]
    fn test_listing_url_embeds_plain_term() {
        assert_eq!(
            listing_url("cats"),
            "https://image.baidu.com/search/index?tn=baiduimage&word=cats"
        );
    }
}
