//! Subcommand implementations.

pub mod bands;
pub mod classify;
pub mod style;
pub mod tile_url;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use map_common::VectorFeature;
use serde::Serialize;

/// Read a JSON array of features from a file, or stdin for `-`.
pub fn read_features(path: &Path) -> Result<Vec<VectorFeature>> {
    if path.as_os_str() == "-" {
        return serde_json::from_reader(io::stdin().lock())
            .context("Failed to parse features from stdin");
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open features file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse features file {}", path.display()))
}

/// Write pretty JSON to a file, or stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
