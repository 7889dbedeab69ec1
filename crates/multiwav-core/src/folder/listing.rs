//! Folder listing.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::options::Options;

/// Audio files directly inside `folder` whose extension is accepted by
/// `options`, sorted by path. Subfolders (backups included) are not entered.
pub fn list(folder: &Path, options: &Options) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", folder.display()),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| options.accepts_extension(ext))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    // Sort for deterministic processing order
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_audio_files_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.wav", "a.WAV", "c.wave", "notes.txt"] {
            fs::write(tmp.path().join(name), b"").unwrap();
        }
        fs::create_dir(tmp.path().join("bak")).unwrap();
        fs::write(tmp.path().join("bak").join("a.wav"), b"").unwrap();

        let files = list(tmp.path(), &Options::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.WAV", "b.wav", "c.wave"]);
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(list(&tmp.path().join("nope"), &Options::default()).is_err());
    }
}
