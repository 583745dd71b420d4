//! `collect` subcommand.

use anyhow::Result;
use clap::Args;
use harvest_core::AppConfig;

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Topic URL (overrides FORUM_HARVEST_TOPIC_URL)
    #[arg(long)]
    pub topic_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Last offset to visit
    #[arg(long)]
    pub max_offset: Option<u32>,

    /// Records file to write
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,
}

impl CollectArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.topic_url {
            config.topic_url = Some(url.clone());
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(max) = self.max_offset {
            config.max_offset = max;
        }
        if let Some(path) = &self.output {
            config.records_path = path.clone();
        }
    }
}

#[cfg(feature = "render")]
pub async fn run(args: &CollectArgs) -> Result<()> {
    use crate::harvest::{HarvestSettings, Harvester};
    use harvest_client::{BrowserSession, DateLocale, ExtractConfig, LaunchOptions, PostExtractor};
    use harvest_core::RecordStore;

    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    let topic_url = config.require_topic_url()?;

    let extractor = PostExtractor::new(ExtractConfig::default())?;
    let settings = HarvestSettings::from_config(&config, topic_url);
    let store = RecordStore::new(config.records_path.clone());
    let today = chrono::Local::now().date_naive();

    let launch = LaunchOptions { headless: config.headless, viewport: (config.viewport_width, config.viewport_height) };
    let browser = BrowserSession::launch(&launch).await?;

    let mut harvester = Harvester::new(
        browser,
        extractor,
        DateLocale::from_name(config.date_locale),
        today,
        settings,
        store,
    );
    harvester.restore_session().await;
    let outcome = harvester.run().await;
    harvester.into_driver().close().await;

    let summary = outcome?;
    tracing::info!(
        records = summary.records,
        skipped_pages = summary.pages_skipped,
        path = %config.records_path.display(),
        "done"
    );
    Ok(())
}

#[cfg(not(feature = "render"))]
pub async fn run(_args: &CollectArgs) -> Result<()> {
    anyhow::bail!("collect needs a browser; rebuild with the `render` feature")
}
