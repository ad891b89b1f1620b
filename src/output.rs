//! Output-directory layout and artifact persistence
//!
//! One run writes everything under a single root:
//! `images/{token_id}.png`, `metadata/{token_id}.json`, `manifest.csv`
//! and a short README describing the layout.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths of every artifact a run produces, rooted at the output dir.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join("metadata")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.csv")
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join("README.txt")
    }

    pub fn image_path(&self, token_id: u32) -> PathBuf {
        self.images_dir().join(format!("{}.png", token_id))
    }

    pub fn metadata_path(&self, token_id: u32) -> PathBuf {
        self.metadata_dir().join(format!("{}.json", token_id))
    }

    /// Create the images/ and metadata/ directories.
    pub fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(self.images_dir())?;
        fs::create_dir_all(self.metadata_dir())
    }
}

/// Save an RGBA image to a PNG file, creating parent directories as
/// needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    image.save(path)?;
    Ok(())
}

/// Write a value as pretty-printed JSON, creating parent directories as
/// needed.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = io::BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Write the post-run README describing the output layout.
pub fn write_readme(path: &Path) -> io::Result<()> {
    fs::write(
        path,
        "Output structure:\n\
         - images/: final PNGs (upload to IPFS/ArDrive)\n\
         - metadata/: ERC-721 JSON metadata\n\
         - manifest.csv: a flat view of each token's chosen traits\n\
         \n\
         Suggested next steps:\n\
         1) Upload images/ and capture the CID/TxID.\n\
         2) If using a separate images base URI, re-run the generator with --images-suburi.\n\
         3) Pin/store metadata/ and point your contract's baseURI at the metadata directory.\n",
    )
}
