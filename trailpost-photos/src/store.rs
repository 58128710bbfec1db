//! The persisted album file.

use crate::error::PhotosError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use trailpost_types::Album;

/// Replace the album file with `albums` (pretty JSON).
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see the old file or the new one.
pub fn write_albums(path: &Path, albums: &[Album]) -> Result<(), PhotosError> {
    let write_err = |source| PhotosError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let json = serde_json::to_string_pretty(albums).map_err(|source| PhotosError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

pub fn read_albums(path: &Path) -> Result<Vec<Album>, PhotosError> {
    let text = std::fs::read_to_string(path).map_err(|source| PhotosError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PhotosError::Json {
        path: path.to_path_buf(),
        source,
    })
}
