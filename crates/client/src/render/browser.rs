//! chromiumoxide implementation of [`PageDriver`].

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Cookie, CookieParam, CookieSameSite, TimeSinceEpoch};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use harvest_core::StoredCookie;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

use super::{LaunchOptions, PageDriver, RenderError};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One browser with a single tab, owned by the harvester for the whole run.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chrome/Chromium and open a blank tab.
    ///
    /// The browser uses a background task to handle Chrome DevTools Protocol
    /// events; it lives until [`BrowserSession::close`].
    pub async fn launch(opts: &LaunchOptions) -> Result<Self, RenderError> {
        let (width, height) = opts.viewport;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport { width, height, ..Default::default() });
        if !opts.headless {
            builder = builder.with_head();
        }

        let (browser, mut handler) = Browser::launch(builder.build().map_err(RenderError::BrowserLaunch)?)
            .await
            .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        tracing::info!(headless = opts.headless, width, height, "browser launched");
        Ok(Self { browser, page, handler })
    }

    /// The event task ends when the DevTools connection drops.
    fn ensure_open(&self) -> Result<(), RenderError> {
        if self.handler.is_finished() {
            return Err(RenderError::BrowserClosed);
        }
        Ok(())
    }

    /// Close the browser and stop the event task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        self.browser.wait().await.ok();
        self.handler.abort();
    }
}

fn to_stored(cookie: Cookie) -> StoredCookie {
    StoredCookie {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        expires: cookie.expires,
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: cookie.same_site.as_ref().map(|s| s.as_ref().to_string()),
    }
}

fn to_param(cookie: StoredCookie) -> Result<CookieParam, RenderError> {
    let mut builder = CookieParam::builder()
        .name(cookie.name)
        .value(cookie.value)
        .domain(cookie.domain)
        .path(cookie.path)
        .secure(cookie.secure)
        .http_only(cookie.http_only);

    if cookie.expires > 0.0 {
        builder = builder.expires(TimeSinceEpoch::new(cookie.expires));
    }
    if let Some(same_site) = cookie
        .same_site
        .as_deref()
        .and_then(|s| s.parse::<CookieSameSite>().ok())
    {
        builder = builder.same_site(same_site);
    }

    builder.build().map_err(RenderError::Cookies)
}

#[async_trait::async_trait]
impl PageDriver for BrowserSession {
    async fn goto(&mut self, url: &Url) -> Result<(), RenderError> {
        self.ensure_open()?;
        self.page
            .goto(url.as_str())
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), RenderError> {
        self.ensure_open()?;
        let page = &self.page;
        let found = tokio::time::timeout(timeout, async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        found.map_err(|_| RenderError::Timeout { selector: selector.to_string(), timeout_ms: timeout.as_millis() as u64 })
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        self.ensure_open()?;
        self.page
            .content()
            .await
            .map_err(|e| RenderError::ContentRetrieval(e.to_string()))
    }

    async fn cookies(&mut self) -> Result<Vec<StoredCookie>, RenderError> {
        let cookies = self
            .browser
            .get_cookies()
            .await
            .map_err(|e| RenderError::Cookies(e.to_string()))?;
        Ok(cookies.into_iter().map(to_stored).collect())
    }

    async fn set_cookies(&mut self, cookies: Vec<StoredCookie>) -> Result<(), RenderError> {
        let mut params = Vec::with_capacity(cookies.len());
        for cookie in cookies {
            if cookie.domain.is_empty() {
                tracing::warn!(name = %cookie.name, "skipping saved cookie without domain");
                continue;
            }
            params.push(to_param(cookie)?);
        }

        let count = params.len();
        self.browser
            .set_cookies(params)
            .await
            .map_err(|e| RenderError::Cookies(e.to_string()))?;
        tracing::debug!(count, "cookies injected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_param_keeps_fields() {
        let param = to_param(StoredCookie {
            name: "remixsid".into(),
            value: "abc".into(),
            domain: ".vk.com".into(),
            path: "/".into(),
            expires: 1_900_000_000.0,
            http_only: true,
            secure: true,
            same_site: Some("Lax".into()),
        })
        .unwrap();

        assert_eq!(param.name, "remixsid");
        assert_eq!(param.value, "abc");
        assert_eq!(param.domain.as_deref(), Some(".vk.com"));
        assert_eq!(param.secure, Some(true));
        assert!(param.expires.is_some());
        assert!(param.same_site.is_some());
    }

    #[test]
    fn test_to_param_session_cookie() {
        let param = to_param(StoredCookie {
            name: "s".into(),
            value: "v".into(),
            domain: "example.com".into(),
            path: "/".into(),
            expires: -1.0,
            http_only: false,
            secure: false,
            same_site: Some("bogus".into()),
        })
        .unwrap();

        assert!(param.expires.is_none());
        assert!(param.same_site.is_none());
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_browser_session_launch() {
        let session = BrowserSession::launch(&LaunchOptions { headless: true, ..Default::default() }).await;
        assert!(session.is_ok());
        session.unwrap().close().await;
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_closed_browser_reports_closed() {
        let mut session = BrowserSession::launch(&LaunchOptions { headless: true, ..Default::default() })
            .await
            .unwrap();
        session.browser.close().await.unwrap();
        session.browser.wait().await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let url = Url::parse("about:blank").unwrap();
        assert!(matches!(session.goto(&url).await, Err(RenderError::BrowserClosed)));
        assert!(matches!(session.content().await, Err(RenderError::BrowserClosed)));
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_goto_and_wait() {
        let mut session = BrowserSession::launch(&LaunchOptions { headless: true, ..Default::default() })
            .await
            .unwrap();
        let url = Url::parse("https://example.com").unwrap();

        session.goto(&url).await.unwrap();
        session.wait_for("h1", Duration::from_secs(10)).await.unwrap();
        let html = session.content().await.unwrap();
        assert!(html.contains("<h1>"));

        let missing = session.wait_for("div.bp_post", Duration::from_millis(600)).await;
        assert!(matches!(missing, Err(RenderError::Timeout { .. })));
        session.close().await;
    }
}
