//! Filesystem utilities.
//!
//! Safe primitives for writing exported subtitle artifacts. A partial write
//! (power loss, crash) must not leave a half-written `.srt`/`.vtt` on disk,
//! so writes go through a temp file + rename swap.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{CoreError, CoreResult};

// =============================================================================
// Output Path Validation
// =============================================================================

/// Validates an output path for write operations: absolute, not a
/// directory, parent created if missing.
pub fn validate_output_path(path: &str, label: &str) -> CoreResult<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} is empty")));
    }

    let pb = PathBuf::from(trimmed);
    if !pb.is_absolute() {
        return Err(CoreError::Validation(format!(
            "{label} must be an absolute path: {}",
            pb.display()
        )));
    }

    if let Some(parent) = pb.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    if pb.exists() && pb.is_dir() {
        return Err(CoreError::Validation(format!(
            "{label} points to a directory: {}",
            pb.display()
        )));
    }

    Ok(pb)
}

// =============================================================================
// Atomic Writes
// =============================================================================

/// Write bytes to `path` using an atomic replace pattern.
///
/// Implementation notes:
/// - Write to a sibling temporary file.
/// - Flush and sync the temp file.
/// - Swap into place by renaming.
/// - If the destination exists, it is first moved aside as a `.bak` file,
///   then removed.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_path(path, "tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    atomic_replace(path, &tmp_path)?;
    Ok(())
}

/// Write a text artifact atomically
pub fn atomic_write_text(path: &Path, text: &str) -> CoreResult<()> {
    atomic_write_bytes(path, text.as_bytes())
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_file_name(format!("{file_name}.{suffix}"));
    sibling
}

fn atomic_replace(dest: &Path, src_tmp: &Path) -> CoreResult<()> {
    // Fast path: dest does not exist.
    if !dest.exists() {
        std::fs::rename(src_tmp, dest)?;
        return Ok(());
    }

    // Windows: rename-over-existing may fail depending on filesystem; use a backup swap.
    let bak = sibling_path(dest, "bak");

    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(src_tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            // Try to restore the old file.
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(src_tmp);
            Err(CoreError::Io(e))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subtitles_en.srt");

        atomic_write_text(&path, "one").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");

        atomic_write_text(&path, "two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");

        // No stray temp/backup files left behind
        assert!(!sibling_path(&path, "tmp").exists());
        assert!(!sibling_path(&path, "bak").exists());
    }

    #[test]
    fn test_validate_output_path_rejects_relative() {
        let result = validate_output_path("relative/out.srt", "outputPath");
        assert!(matches!(result.unwrap_err(), CoreError::Validation(_)));
    }

    #[test]
    fn test_validate_output_path_rejects_empty() {
        assert!(validate_output_path("", "outputPath").is_err());
    }

    #[test]
    fn test_validate_output_path_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("out.vtt");
        let path_str = nested.to_string_lossy().to_string();

        let result = validate_output_path(&path_str, "outputPath");
        assert!(result.is_ok());
        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn test_validate_output_path_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();

        let result = validate_output_path(&dir_str, "outputPath");
        assert!(result.is_err());
    }
}
