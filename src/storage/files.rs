//! On-disk storage for downloaded image bytes

use std::fs::DirBuilder;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Subdirectory of the storage base that holds downloaded images
pub const IMAGE_DIRECTORY: &str = "images";

/// Writes images as `<base>/images/<uuid>`
#[derive(Debug, Clone)]
pub struct ImageFiles {
    base: PathBuf,
}

impl ImageFiles {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base.join(IMAGE_DIRECTORY)
    }

    /// Resolves a stored relative location against the base directory
    pub fn absolute_path(&self, file_location: &str) -> PathBuf {
        self.base.join(file_location)
    }

    /// Stores `bytes` under a freshly generated v4 UUID
    ///
    /// Creates the images directory on demand and returns the location
    /// relative to the base, e.g. `images/9b2e...`.
    pub fn store(&self, bytes: &[u8]) -> io::Result<String> {
        let dir = self.images_dir();
        if !dir.exists() {
            create_image_dir(&dir)?;
            tracing::debug!("Created image directory {}", dir.display());
        }

        let file_name = Uuid::new_v4().to_string();
        let full_path = dir.join(&file_name);
        std::fs::write(&full_path, bytes)?;

        tracing::debug!("Stored {} bytes at {}", bytes.len(), full_path.display());

        Ok(Path::new(IMAGE_DIRECTORY)
            .join(file_name)
            .to_string_lossy()
            .into_owned())
    }
}

#[cfg(unix)]
fn create_image_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_image_dir(dir: &Path) -> io::Result<()> {
    DirBuilder::new().recursive(true).create(dir)
}
