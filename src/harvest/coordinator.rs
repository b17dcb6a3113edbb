//! Run coordinator - one complete harvest
//!
//! A run fetches the source page, extracts and shuffles the candidate
//! links, and hands them to the saver. Every failure inside a run is caught
//! here, logged once at error level and counted in the report; nothing
//! propagates past this module.

use crate::config::Config;
use crate::harvest::fetcher::{build_http_client, fetch_page};
use crate::harvest::parser::{extract_candidates, parse_page};
use crate::harvest::saver::{save_new_images, MAX_IMAGES_PER_RUN};
use crate::output::RunReport;
use crate::storage::{ImageFiles, ImageStore, SqliteStorage};
use crate::FlowerError;
use rand::Rng;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Runs one harvest against an already opened store and client
///
/// Never fails: an error is logged and reported as `errors: 1` with
/// nothing counted as saved, since no records were committed.
pub async fn run<S, R>(config: &Config, store: &mut S, client: &Client, rng: &mut R) -> RunReport
where
    S: ImageStore + ?Sized,
    R: Rng + ?Sized,
{
    match harvest(config, store, client, rng).await {
        Ok(saved) => RunReport::saved(saved),
        Err(e) => report_failure(&e),
    }
}

/// Opens the configured database and HTTP client, then runs one harvest
///
/// Setup failures are caught and reported like any other run error.
pub async fn run_with_config(config: &Config) -> RunReport {
    let (mut store, client) = match prepare(config) {
        Ok(prepared) => prepared,
        Err(e) => return report_failure(&e),
    };

    let mut rng = rand::rng();
    run(config, &mut store, &client, &mut rng).await
}

fn prepare(config: &Config) -> Result<(SqliteStorage, Client), FlowerError> {
    let store = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let client = build_http_client(&config.client)?;
    Ok((store, client))
}

fn report_failure(error: &FlowerError) -> RunReport {
    tracing::error!("flower-images run error: {}", error);
    RunReport::failed()
}

async fn harvest<S, R>(
    config: &Config,
    store: &mut S,
    client: &Client,
    rng: &mut R,
) -> Result<usize, FlowerError>
where
    S: ImageStore + ?Sized,
    R: Rng + ?Sized,
{
    let page_url = Url::parse(&config.source.page_url)?;

    tracing::info!("Fetching source page {}", page_url);
    let html = fetch_page(client, page_url.as_str()).await?;

    let links = extract_candidates(&html, &page_url, &config.source.image_link_pattern, rng);
    tracing::info!("Found {} candidate images", links.len());

    let files = ImageFiles::new(&config.storage.default_storage);
    let saved = save_new_images(client, store, &files, &page_url, &links).await?;

    tracing::info!("Harvest finished: {} new images", saved);
    Ok(saved)
}

/// A candidate as seen by a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunCandidate {
    pub link: String,
    pub already_saved: bool,
}

/// What a real run would start from, without any downloads or writes
#[derive(Debug, Clone)]
pub struct DryRunReport {
    pub page_url: String,
    pub image_count: usize,
    pub candidates: Vec<DryRunCandidate>,
}

impl DryRunReport {
    /// Distinct candidates that are not recorded yet
    pub fn new_links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = Vec::new();
        for candidate in self.candidates.iter().filter(|c| !c.already_saved) {
            if !links.contains(&candidate.link.as_str()) {
                links.push(&candidate.link);
            }
        }
        links
    }

    /// Upper bound on what a real run would save right now
    pub fn would_save(&self) -> usize {
        self.new_links().len().min(MAX_IMAGES_PER_RUN)
    }
}

/// Fetches and filters the source page and checks candidates against the store
///
/// Candidates stay in document order. Nothing is downloaded or written.
pub async fn dry_run<S: ImageStore + ?Sized>(
    config: &Config,
    store: &S,
    client: &Client,
) -> Result<DryRunReport, FlowerError> {
    let page_url = Url::parse(&config.source.page_url)?;
    let html = fetch_page(client, page_url.as_str()).await?;
    let parsed = parse_page(&html, &page_url, &config.source.image_link_pattern);

    let mut candidates = Vec::with_capacity(parsed.candidates.len());
    for link in parsed.candidates {
        let already_saved = store.find_by_link(&link)?.is_some();
        candidates.push(DryRunCandidate {
            link,
            already_saved,
        });
    }

    Ok(DryRunReport {
        page_url: page_url.to_string(),
        image_count: parsed.image_count,
        candidates,
    })
}
