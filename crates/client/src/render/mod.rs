//! Browser page driver for the topic pages.
//!
//! The orchestrator talks to a [`PageDriver`]; the production implementation
//! ([`BrowserSession`], feature `render`) drives one Chrome/Chromium tab
//! through chromiumoxide and keeps its cookie jar for the whole run.

#[cfg(feature = "render")]
mod browser;

#[cfg(feature = "render")]
pub use browser::BrowserSession;

use harvest_core::StoredCookie;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to get page content.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Wait selector did not appear in time.
    #[error("selector {selector:?} not found within {timeout_ms}ms")]
    Timeout { selector: String, timeout_ms: u64 },

    /// Reading or writing cookies failed.
    #[error("cookie operation failed: {0}")]
    Cookies(String),

    /// Browser closed unexpectedly.
    #[error("browser closed unexpectedly")]
    BrowserClosed,
}

/// Options for launching the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: false, so the operator can log in).
    pub headless: bool,

    /// Window dimensions (default: 1400x900).
    pub viewport: (u32, u32),
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self { headless: false, viewport: (1400, 900) }
    }
}

/// A single browser tab the harvester drives sequentially.
#[async_trait::async_trait]
pub trait PageDriver: Send {
    /// Navigate the tab to `url`.
    async fn goto(&mut self, url: &Url) -> Result<(), RenderError>;

    /// Wait until `selector` matches an element, up to `timeout`.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Current rendered HTML of the tab.
    async fn content(&mut self) -> Result<String, RenderError>;

    /// All cookies of the browser context.
    async fn cookies(&mut self) -> Result<Vec<StoredCookie>, RenderError>;

    /// Inject previously saved cookies.
    async fn set_cookies(&mut self, cookies: Vec<StoredCookie>) -> Result<(), RenderError>;
}
