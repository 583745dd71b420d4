//! `export` subcommand.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use harvest_client::{ArchiveOptions, DateLocale, render_archive};
use harvest_core::{AppConfig, Error, RecordStore};
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_TITLE: &str = "Personal Archive";
const DEFAULT_BASE_URL: &str = "https://vk.com";

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Records file (defaults to the configured records path)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Markdown file to write
    #[arg(long)]
    pub output: PathBuf,

    /// Archive title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Origin for relative image URLs
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let input = args.input.clone().unwrap_or_else(|| config.records_path.clone());
    let base_url = Url::parse(&args.base_url).with_context(|| format!("invalid --base-url {:?}", args.base_url))?;

    let count = export(&input, &args.output, &args.title, base_url, DateLocale::from_name(config.date_locale))?;
    tracing::info!(records = count, path = %args.output.display(), "archive written");
    Ok(())
}

/// Render `input` into `output`; returns the number of records read.
fn export(input: &Path, output: &Path, title: &str, base_url: Url, locale: &DateLocale) -> Result<usize, Error> {
    let records = RecordStore::new(input).load()?;
    let opts = ArchiveOptions {
        title: title.to_string(),
        source: input.display().to_string(),
        base_url,
        generated_at: Utc::now(),
    };

    let markdown = render_archive(&records, locale, &opts);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(output, markdown).map_err(|e| Error::io(output, e))?;
    Ok(records.len())
}
