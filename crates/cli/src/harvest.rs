//! Pagination state machine.
//!
//! ```text
//! Probing ──posts visible──────────────────────────┐
//!    │ timeout                                     ▼
//!    └─▶ AwaitingLogin ──posts visible──▶ Collecting { offset } ──past max──▶ Done
//!              │ timeout                   ▲          │
//!              ▼                           └─ +step ──┘
//!            fatal
//! ```
//!
//! Each `Collecting` step loads one page, extracts, retries once in place if
//! nothing was found, merges new records and rewrites the records file.

use chrono::NaiveDate;
use harvest_client::extract::{DateLocale, ExtractedPost, PostExtractor, RelativeDateNormalizer, clean_text};
use harvest_client::{PageDriver, RenderError};
use harvest_core::{AppConfig, DedupKey, PostRecord, RecordStore, SeenKeys, SessionState};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Failures that end a run.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Posts never appeared, even after the login window.
    #[error("could not confirm access to posts after the login wait: {0}")]
    AccessNotConfirmed(#[source] RenderError),

    /// A page in the offset range could not be loaded.
    #[error("page at offset {offset} failed: {source}")]
    Page {
        offset: u32,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Driver(#[from] RenderError),

    #[error(transparent)]
    Storage(#[from] harvest_core::Error),
}

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Probing,
    AwaitingLogin,
    Collecting { offset: u32 },
    Done,
}

/// Fixed run parameters.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub topic_url: Url,
    pub page_step: u32,
    pub max_offset: u32,
    pub probe_timeout: Duration,
    pub content_timeout: Duration,
    pub login_wait: Duration,
    pub empty_retry: Duration,
    pub state_path: PathBuf,
}

impl HarvestSettings {
    pub fn from_config(config: &AppConfig, topic_url: Url) -> Self {
        Self {
            topic_url,
            page_step: config.page_step,
            max_offset: config.max_offset,
            probe_timeout: config.probe_timeout(),
            content_timeout: config.content_timeout(),
            login_wait: config.login_wait(),
            empty_retry: config.empty_retry(),
            state_path: config.state_path.clone(),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestSummary {
    pub records: usize,
    pub pages_skipped: usize,
}

/// Owns the driver and every piece of run state.
pub struct Harvester<D> {
    driver: D,
    extractor: PostExtractor,
    dates: RelativeDateNormalizer,
    today: NaiveDate,
    settings: HarvestSettings,
    store: RecordStore,
    records: Vec<PostRecord>,
    seen: SeenKeys,
    pages_skipped: usize,
    /// Last loaded or saved session; its `origins` are written back as-is.
    session: SessionState,
}

impl<D: PageDriver> Harvester<D> {
    pub fn new(
        driver: D, extractor: PostExtractor, locale: &'static DateLocale, today: NaiveDate, settings: HarvestSettings,
        store: RecordStore,
    ) -> Self {
        Self {
            driver,
            extractor,
            dates: RelativeDateNormalizer::new(locale),
            today,
            settings,
            store,
            records: Vec::new(),
            seen: SeenKeys::new(),
            pages_skipped: 0,
            session: SessionState::default(),
        }
    }

    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Inject cookies from the saved session, if any.
    ///
    /// Never fails: a missing or unusable session only means starting fresh.
    pub async fn restore_session(&mut self) {
        let Some(state) = SessionState::load(&self.settings.state_path) else {
            return;
        };
        let cookies = state.cookies.clone();
        self.session = state;
        if let Err(e) = self.driver.set_cookies(cookies).await {
            tracing::warn!("could not restore saved cookies: {e}");
        }
    }

    /// Drive the state machine to completion.
    pub async fn run(&mut self) -> Result<HarvestSummary, HarvestError> {
        let mut phase = Phase::Probing;
        while phase != Phase::Done {
            phase = self.step(phase).await?;
        }

        self.store.save(&self.records)?;
        tracing::info!(
            total = self.records.len(),
            skipped = self.pages_skipped,
            path = %self.store.path().display(),
            "harvest finished"
        );

        Ok(HarvestSummary { records: self.records.len(), pages_skipped: self.pages_skipped })
    }

    /// Perform one transition.
    pub async fn step(&mut self, phase: Phase) -> Result<Phase, HarvestError> {
        match phase {
            Phase::Probing => {
                tracing::info!(url = %self.settings.topic_url, "opening topic");
                let url = self.settings.topic_url.clone();
                self.driver.goto(&url).await?;

                match self.wait_for_posts(self.settings.probe_timeout).await {
                    Ok(()) => {
                        self.save_session().await?;
                        Ok(Phase::Collecting { offset: 0 })
                    }
                    Err(e) => {
                        tracing::debug!("posts not visible on first load: {e}");
                        Ok(Phase::AwaitingLogin)
                    }
                }
            }
            Phase::AwaitingLogin => {
                tracing::warn!(
                    wait_secs = self.settings.login_wait.as_secs(),
                    "posts not visible; log in in the browser window if asked"
                );
                tokio::time::sleep(self.settings.login_wait).await;

                let url = self.settings.topic_url.clone();
                self.driver
                    .goto(&url)
                    .await
                    .map_err(HarvestError::AccessNotConfirmed)?;
                self.wait_for_posts(self.settings.content_timeout)
                    .await
                    .map_err(HarvestError::AccessNotConfirmed)?;

                self.save_session().await?;
                Ok(Phase::Collecting { offset: 0 })
            }
            Phase::Collecting { offset } if offset > self.settings.max_offset => Ok(Phase::Done),
            Phase::Collecting { offset } => {
                self.collect_page(offset).await?;
                Ok(match offset.checked_add(self.settings.page_step) {
                    Some(next) => Phase::Collecting { offset: next },
                    None => Phase::Done,
                })
            }
            Phase::Done => Ok(Phase::Done),
        }
    }

    async fn wait_for_posts(&mut self, timeout: Duration) -> Result<(), RenderError> {
        let selector = self.extractor.config().post_selector.clone();
        self.driver.wait_for(&selector, timeout).await
    }

    async fn save_session(&mut self) -> Result<(), HarvestError> {
        self.session.cookies = self.driver.cookies().await?;
        self.session.save(&self.settings.state_path)?;
        Ok(())
    }

    /// Topic URL with `offset=<n>` set, other query parameters kept.
    pub fn page_url(&self, offset: u32) -> Url {
        let mut url = self.settings.topic_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "offset")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("offset", &offset.to_string());
        url
    }

    async fn extract_current(&mut self) -> Result<Vec<ExtractedPost>, RenderError> {
        let html = self.driver.content().await?;
        Ok(self.extractor.extract_page(&html))
    }

    async fn collect_page(&mut self, offset: u32) -> Result<(), HarvestError> {
        let url = self.page_url(offset);
        tracing::info!(offset, %url, "reading page");

        let page_err = |source| HarvestError::Page { offset, source };
        self.driver.goto(&url).await.map_err(page_err)?;
        self.wait_for_posts(self.settings.content_timeout)
            .await
            .map_err(page_err)?;

        let mut items = self.extract_current().await.map_err(page_err)?;
        if items.is_empty() {
            tracing::info!(offset, "no posts found; retrying once");
            tokio::time::sleep(self.settings.empty_retry).await;
            items = self.extract_current().await.map_err(page_err)?;
            if items.is_empty() {
                tracing::warn!(offset, "still no posts; skipping offset");
                self.pages_skipped += 1;
                return Ok(());
            }
        }

        let added = self.merge(offset, items);
        tracing::info!(offset, added, total = self.records.len(), "page merged");
        self.store.save(&self.records)?;
        Ok(())
    }

    /// Clean, dedup and append extracted posts; returns how many were new.
    pub fn merge(&mut self, offset: u32, items: Vec<ExtractedPost>) -> usize {
        let mut added = 0;

        for (index, item) in items.into_iter().enumerate() {
            let text = clean_text(&item.text);
            if text.is_empty() {
                continue;
            }

            let post_id = clean_text(&item.post_id);
            let author = clean_text(&item.author);
            let date = self.dates.normalize(&clean_text(&item.date_text), self.today);

            let key = DedupKey::for_post(offset, index, &post_id, &date, &text);
            if !self.seen.insert(key) {
                continue;
            }

            // Cleaning can make two URLs equal, so dedup afterwards.
            let clean_list = |list: Vec<String>| -> Vec<String> {
                let mut out: Vec<String> = Vec::with_capacity(list.len());
                for url in list.iter().map(|s| clean_text(s)) {
                    if !url.is_empty() && !out.contains(&url) {
                        out.push(url);
                    }
                }
                out
            };

            self.records.push(PostRecord {
                offset,
                post_id,
                author,
                date,
                text,
                emojis: clean_list(item.emojis),
                photos: clean_list(item.photos),
            });
            added += 1;
        }

        added
    }
}
