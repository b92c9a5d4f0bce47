//! Rendering seam for the discovery stage.
//!
//! Discovery only needs four operations from a renderer: open a URL, trigger
//! a scroll to the end of the view, capture the current markup, and shut
//! down. [`ChromeRenderer`] implements them over CDP with a headless
//! Chromium; tests use scripted fakes.

use async_trait::async_trait;

use super::error::RenderError;

/// Driver for a rendered listing page.
///
/// Settle delays between actions are the caller's responsibility; an
/// implementation performs each action as fast as it can.
#[async_trait]
pub trait PageRenderer: Send {
    /// Opens the given URL in the rendering session.
    async fn open(&mut self, url: &str) -> Result<(), RenderError>;

    /// Scrolls the rendered view to its end, triggering lazy content loads.
    async fn scroll_to_end(&mut self) -> Result<(), RenderError>;

    /// Captures the current markup of the rendered page.
    async fn current_markup(&mut self) -> Result<String, RenderError>;

    /// Shuts the rendering session down. Best-effort; never fails.
    async fn close(&mut self);
}

#[cfg(feature = "browser")]
mod chrome {
    use async_trait::async_trait;
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, info};

    use super::PageRenderer;
    use crate::discovery::error::RenderError;

    /// Script used to drag the rendered view to the bottom of the page.
    const SCROLL_TO_END_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

    /// Headless Chromium renderer over the Chrome DevTools Protocol.
    pub struct ChromeRenderer {
        browser: Browser,
        handler: JoinHandle<()>,
        page: Option<Page>,
    }

    impl ChromeRenderer {
        /// Launches a headless Chromium instance.
        ///
        /// # Errors
        ///
        /// Returns [`RenderError::Launch`] when no usable Chromium can be
        /// started.
        pub async fn launch_headless() -> Result<Self, RenderError> {
            info!("launching headless browser");

            let config = BrowserConfig::builder()
                .arg("--no-sandbox")
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(RenderError::launch)?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| RenderError::launch(e.to_string()))?;

            // The CDP event stream must be pumped for the session to work.
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                browser,
                handler,
                page: None,
            })
        }

        fn page(&self) -> Result<&Page, RenderError> {
            self.page
                .as_ref()
                .ok_or_else(|| RenderError::session("no page open"))
        }
    }

    #[async_trait]
    impl PageRenderer for ChromeRenderer {
        async fn open(&mut self, url: &str) -> Result<(), RenderError> {
            debug!(url, "opening listing page");
            let page = self
                .browser
                .new_page(url)
                .await
                .map_err(|e| RenderError::navigation(url, e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| RenderError::navigation(url, e.to_string()))?;
            self.page = Some(page);
            Ok(())
        }

        async fn scroll_to_end(&mut self) -> Result<(), RenderError> {
            self.page()?
                .evaluate(SCROLL_TO_END_SCRIPT)
                .await
                .map_err(|e| RenderError::session(e.to_string()))?;
            Ok(())
        }

        async fn current_markup(&mut self) -> Result<String, RenderError> {
            self.page()?
                .content()
                .await
                .map_err(|e| RenderError::session(e.to_string()))
        }

        async fn close(&mut self) {
            if let Some(page) = self.page.take() {
                let _ = page.close().await;
            }
            let _ = self.browser.close().await;
            self.handler.abort();
        }
    }
}

#[cfg(feature = "browser")]
pub use chrome::ChromeRenderer;

// Stub for when browser support is not compiled in.
#[cfg(not(feature = "browser"))]
pub struct ChromeRenderer;

#[cfg(not(feature = "browser"))]
impl ChromeRenderer {
    /// Always fails: browser support was not compiled in.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Launch`] unconditionally.
    pub async fn launch_headless() -> Result<Self, RenderError> {
        Err(RenderError::launch(
            "browser support not compiled; rebuild with: cargo build --features browser",
        ))
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn open(&mut self, _url: &str) -> Result<(), RenderError> {
        Err(RenderError::session("browser support not compiled"))
    }

    async fn scroll_to_end(&mut self) -> Result<(), RenderError> {
        Err(RenderError::session("browser support not compiled"))
    }

    async fn current_markup(&mut self) -> Result<String, RenderError> {
        Err(RenderError::session("browser support not compiled"))
    }

    async fn close(&mut self) {}
}
