//! Harvest module: one scheduled scrape-and-save run
//!
//! This module contains the core logic, including:
//! - HTTP fetching of the source page and the images
//! - Candidate link extraction and shuffling
//! - Saving new images with the per-run cap
//! - Run coordination with a single top-level error handler

mod coordinator;
mod fetcher;
mod parser;
mod saver;

pub use coordinator::{dry_run, run, run_with_config, DryRunCandidate, DryRunReport};
pub use fetcher::{build_http_client, download_image, fetch_page, MAX_REDIRECTS};
pub use parser::{extract_candidates, parse_page, ParsedPage};
pub use saver::{save_new_images, MAX_IMAGES_PER_RUN};
