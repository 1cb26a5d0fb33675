//! Thin adapters between files and the pipeline's data model.

pub mod diagnostics;
pub mod sacpz;
pub mod table;
pub mod waveform;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Ms2PsdError, Result};

/// Hidden sibling of `path` used while it is being written
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
}

/// Write `path` through a temporary sibling and rename it into place.
///
/// Readers see either the previous file, nothing, or the complete new file.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let temp_path = temp_sibling(path);
    let outcome = File::create(&temp_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    });

    if let Err(e) = outcome.and_then(|_| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(Ms2PsdError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write '{}': {}", path.display(), e),
        )));
    }
    log::debug!("Wrote {}", path.display());
    Ok(())
}
