//! Document loading from the filesystem.
//!
//! Collects `.txt` files recursively under a data directory. Unreadable
//! files are skipped with a warning by default; with `strict` they abort
//! the load instead. Files are visited in sorted path order so corpus
//! construction is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use docmind_core::{Document, IngestError};
use tracing::{debug, info, warn};

/// Load every `.txt` file under `data_dir` (recursively) as a `Document`.
///
/// Each document's metadata records its path relative to `data_dir` as the
/// source. A missing or unreadable directory is always an error; unreadable
/// individual files follow the `strict` policy.
pub fn load_documents(data_dir: &Path, strict: bool) -> Result<Vec<Document>, IngestError> {
    let mut paths = Vec::new();
    collect_txt_files(data_dir, &mut paths)?;
    paths.sort();

    info!(count = paths.len(), dir = %data_dir.display(), "Found .txt files");

    let mut documents = Vec::new();
    let mut skipped = 0usize;

    for path in &paths {
        match fs::read_to_string(path) {
            Ok(text) => {
                let source = path
                    .strip_prefix(data_dir)
                    .unwrap_or(path)
                    .display()
                    .to_string();
                debug!(source = %source, "Loaded document");
                documents.push(Document::new(text, source));
            }
            Err(e) if strict => {
                return Err(IngestError::UnreadableDocument {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "Some documents could not be loaded");
    }
    info!(loaded = documents.len(), "Documents loaded");

    Ok(documents)
}

fn collect_txt_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), IngestError> {
    let entries = fs::read_dir(dir).map_err(|e| IngestError::UnreadableDocument {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| IngestError::UnreadableDocument {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_txt_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_txt_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("nested/b.txt"), "beta").unwrap();
        fs::write(dir.path().join("ignored.md"), "not text").unwrap();

        let docs = load_documents(dir.path(), false).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.source, "a.txt");
        assert_eq!(docs[0].text, "alpha");
        assert!(docs[1].metadata.source.ends_with("b.txt"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = load_documents(Path::new("/nonexistent/docmind-data"), false);
        assert!(matches!(
            result,
            Err(IngestError::UnreadableDocument { .. })
        ));
    }

    #[test]
    fn invalid_utf8_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.txt"), "fine").unwrap();
        let mut bad = fs::File::create(dir.path().join("bad.txt")).unwrap();
        bad.write_all(&[0xff, 0xfe, 0xfd]).unwrap();

        let docs = load_documents(dir.path(), false).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.source, "good.txt");
    }

    #[test]
    fn invalid_utf8_fails_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = fs::File::create(dir.path().join("bad.txt")).unwrap();
        bad.write_all(&[0xff, 0xfe, 0xfd]).unwrap();

        let result = load_documents(dir.path(), true);
        assert!(matches!(
            result,
            Err(IngestError::UnreadableDocument { .. })
        ));
    }

    #[test]
    fn empty_directory_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let docs = load_documents(dir.path(), false).unwrap();
        assert!(docs.is_empty());
    }
}
