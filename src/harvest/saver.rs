//! Image saver: downloads new candidates and records them
//!
//! For each candidate, in order:
//! 1. skip it if the store already has a record with the same link
//! 2. download it
//! 3. write the bytes to `<default-storage>/images/<uuid>`
//! 4. stage an `ImageRecord` for it
//! 5. stop once `MAX_IMAGES_PER_RUN` images are staged
//!
//! Staged records are committed in a single batch at the end. Any error
//! returns immediately and drops the staged records uncommitted.

use crate::harvest::fetcher::download_image;
use crate::storage::{ImageFiles, ImageStore, NewImageRecord, MAX_LINK_LENGTH};
use crate::FlowerError;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Hard cap on images saved by one run
pub const MAX_IMAGES_PER_RUN: usize = 3;

/// Saves at most [`MAX_IMAGES_PER_RUN`] images not yet present in `store`
///
/// Links are recorded exactly as given. They are only resolved against
/// `page_url` to build the request, so protocol-relative values can be fetched.
///
/// A link repeated in `links` is downloaded once: after the first copy is
/// staged, later copies are skipped even though the store does not know
/// about it until the final commit.
///
/// # Arguments
///
/// * `client` - HTTP client used for the downloads
/// * `store` - Record store checked for existing links and committed to at the end
/// * `files` - Destination for downloaded bytes
/// * `page_url` - Page the links were extracted from
/// * `links` - Candidate URLs, processed in the given order
///
/// # Returns
///
/// * `Ok(usize)` - Number of images saved and committed (0 to 3)
/// * `Err(FlowerError)` - First download, filesystem or storage failure
pub async fn save_new_images<S: ImageStore + ?Sized>(
    client: &Client,
    store: &mut S,
    files: &ImageFiles,
    page_url: &Url,
    links: &[String],
) -> Result<usize, FlowerError> {
    let mut staged: Vec<NewImageRecord> = Vec::with_capacity(MAX_IMAGES_PER_RUN);
    let mut staged_links: HashSet<&str> = HashSet::new();

    for link in links {
        if staged_links.contains(link.as_str()) {
            tracing::debug!("Skipping {}: already saved in this run", link);
            continue;
        }

        if link.chars().count() > MAX_LINK_LENGTH {
            tracing::warn!(
                "Skipping link longer than {} characters: {}...",
                MAX_LINK_LENGTH,
                link.chars().take(80).collect::<String>()
            );
            continue;
        }

        if let Some(existing) = store.find_by_link(link)? {
            tracing::debug!("Skipping {}: recorded as image {}", link, existing.id);
            continue;
        }

        let request_url = page_url.join(link)?;
        tracing::debug!("Downloading {}", request_url);
        let bytes = download_image(client, request_url.as_str()).await?;
        let file_location = files.store(&bytes)?;

        tracing::info!("Saved {} as {}", link, file_location);
        staged.push(NewImageRecord::new(link.as_str(), file_location));
        staged_links.insert(link.as_str());

        if staged.len() >= MAX_IMAGES_PER_RUN {
            break;
        }
    }

    let ids = store.commit_batch(&staged)?;
    tracing::debug!("Committed {} image records", ids.len());

    Ok(staged.len())
}
