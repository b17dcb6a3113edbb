//! Statistics over the image record store
//!
//! This module provides functionality for extracting and displaying
//! what has been harvested so far.

use crate::storage::{ImageFiles, ImageRecord, ImageStore};
use crate::FlowerError;

/// Image store statistics summary
#[derive(Debug, Clone)]
pub struct ImageStatistics {
    /// Total number of stored records
    pub total_images: u64,

    /// Newest records, newest first
    pub latest: Vec<ImageRecord>,

    /// Records among `latest` whose file is missing on disk
    pub missing_files: Vec<ImageRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The record store to query
/// * `files` - Image directory used to check that recorded files exist
/// * `latest_limit` - How many of the newest records to include
///
/// # Returns
///
/// * `Ok(ImageStatistics)` - Successfully loaded statistics
/// * `Err(FlowerError)` - Failed to query the store
pub fn load_statistics<S: ImageStore + ?Sized>(
    storage: &S,
    files: &ImageFiles,
    latest_limit: usize,
) -> Result<ImageStatistics, FlowerError> {
    let total_images = storage.count_images()?;
    let latest = storage.latest_images(latest_limit)?;

    let missing_files = latest
        .iter()
        .filter(|record| match &record.file_location {
            Some(location) => !files.absolute_path(location).is_file(),
            None => true,
        })
        .cloned()
        .collect();

    Ok(ImageStatistics {
        total_images,
        latest,
        missing_files,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ImageStatistics) {
    println!("=== Image Statistics ===\n");

    println!("Overview:");
    println!("  Total images saved: {}", stats.total_images);
    println!();

    if !stats.latest.is_empty() {
        println!("Latest Images ({}):", stats.latest.len());
        for record in &stats.latest {
            println!(
                "  #{} {} -> {} ({})",
                record.id,
                record.link,
                record.file_location.as_deref().unwrap_or("-"),
                record.created_at
            );
        }
        println!();
    }

    if !stats.missing_files.is_empty() {
        println!("Missing Files ({}):", stats.missing_files.len());
        for record in &stats.missing_files {
            println!("  - #{} {}", record.id, record.link);
        }
        println!();
    }
}
