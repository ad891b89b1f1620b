//! Flat manifest table of accepted editions
//!
//! The manifest is the canonical cross-reference from token id to
//! chosen traits: `token_id, signature, <one column per layer>`. It
//! stays loadable as plain tabular data for downstream rarity analysis.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::models::Edition;

/// Streaming CSV writer for the run's manifest.
///
/// Rows are appended as editions are accepted; `finish` flushes so
/// partial output survives an exhausted run.
pub struct ManifestWriter {
    writer: csv::Writer<File>,
    layers: Vec<String>,
}

impl ManifestWriter {
    /// Create the manifest file and write its header row.
    pub fn create(path: &Path, layers: &[String]) -> Result<Self, csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header: Vec<&str> = vec!["token_id", "signature"];
        header.extend(layers.iter().map(|l| l.as_str()));
        writer.write_record(&header)?;

        Ok(Self {
            writer,
            layers: layers.to_vec(),
        })
    }

    /// Append one accepted edition.
    pub fn append(&mut self, edition: &Edition) -> Result<(), csv::Error> {
        let mut row: Vec<String> = Vec::with_capacity(2 + self.layers.len());
        row.push(edition.token_id.to_string());
        row.push(edition.signature.clone());
        for layer in &self.layers {
            let trait_name = edition
                .chosen
                .get(layer)
                .map(|choice| choice.trait_name.as_str())
                .unwrap_or("");
            row.push(trait_name.to_string());
        }
        self.writer.write_record(&row)
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
