//! Input path collection

use pixcut_image::{ImageError, Result, is_supported_input};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of expanding the command-line inputs.
#[derive(Debug, Default)]
pub struct Inputs {
    /// Absolute image paths, in first-seen order
    pub files: Vec<PathBuf>,
    /// Explicitly named files with an unrecognized extension
    pub skipped: Vec<PathBuf>,
}

/// Expand files and directories into a de-duplicated list of absolute image
/// paths, in first-seen order.
///
/// Directories are walked recursively in file-name order. Explicit files with
/// an unrecognized extension are reported in `skipped`.
pub fn collect(paths: &[PathBuf]) -> Result<Inputs> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    ImageError::config(format!("cannot read {}: {e}", path.display()))
                })?;
                if entry.file_type().is_file() && is_supported_input(entry.path()) {
                    push_unique(entry.path(), &mut seen, &mut files)?;
                }
            }
        } else if path.is_file() {
            if is_supported_input(path) {
                push_unique(path, &mut seen, &mut files)?;
            } else {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
                skipped.push(path.clone());
            }
        } else {
            return Err(ImageError::config(format!(
                "input not found: {}",
                path.display()
            )));
        }
    }

    if files.is_empty() {
        return Err(ImageError::config("no supported images among the inputs"));
    }

    tracing::debug!(count = files.len(), skipped = skipped.len(), "collected inputs");
    Ok(Inputs { files, skipped })
}

fn push_unique(path: &Path, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) -> Result<()> {
    let absolute = std::path::absolute(path)?;
    if seen.insert(absolute.clone()) {
        files.push(absolute);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_walks_directories_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        touch(&dir.path().join("b.PNG"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("notes.txt"));
        touch(&nested.join("c.webp"));

        let files = collect(&[dir.path().to_path_buf()]).unwrap().files;
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.webp"]);
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_deduplicates_in_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        touch(&a);
        touch(&b);

        let files = collect(&[b.clone(), dir.path().to_path_buf(), b.clone()])
            .unwrap()
            .files;
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_reports_skipped_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.jpg");
        let notes = dir.path().join("notes.txt");
        touch(&image);
        touch(&notes);

        let inputs = collect(&[notes.clone(), image.clone()]).unwrap();
        assert_eq!(inputs.files, vec![image]);
        assert_eq!(inputs.skipped, vec![notes]);
    }

    #[test]
    fn test_missing_input() {
        let err = collect(&[PathBuf::from("/nonexistent/x.jpg")]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_nothing_supported() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("readme.txt");
        touch(&txt);
        assert!(collect(&[txt]).unwrap_err().is_config());
    }
}
