//! Local file discovery: pick the data directory and list the files to upload.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("data folder not found (tried: {})", display_paths(.tried))]
    DirectoryNotFound { tried: Vec<PathBuf> },
    #[error("no .{extension} files found in {}", .dir.display())]
    NoMatchingFiles { dir: PathBuf, extension: String },
    #[error("failed to read {}: {source}", .dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the first candidate that exists and is a directory.
pub fn resolve_data_dir(candidates: &[PathBuf]) -> Result<PathBuf, DiscoverError> {
    for dir in candidates {
        if dir.is_dir() {
            info!(dir = %dir.display(), "Using data directory");
            return Ok(dir.clone());
        }
        debug!(dir = %dir.display(), "Candidate data directory does not exist");
    }
    error!(tried = %display_paths(candidates), "No data directory found");
    Err(DiscoverError::DirectoryNotFound {
        tried: candidates.to_vec(),
    })
}

/// Lists regular files directly inside `dir` whose extension is `extension`.
///
/// Subdirectories are not descended into. Results are sorted by name.
pub fn list_matching(dir: &Path, extension: &str) -> Result<Vec<LocalFile>, DiscoverError> {
    let io_err = |source| DiscoverError::Io {
        dir: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "Skipping file with non UTF-8 name");
            continue;
        };
        files.push(LocalFile {
            name: name.to_string(),
            path: path.clone(),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    if files.is_empty() {
        error!(dir = %dir.display(), extension, "No matching files found");
        return Err(DiscoverError::NoMatchingFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    info!(dir = %dir.display(), count = files.len(), "Found files to upload");
    Ok(files)
}

/// Resolves the data directory from `candidates` and lists its matching files.
pub fn discover_files(
    candidates: &[PathBuf],
    extension: &str,
) -> Result<Vec<LocalFile>, DiscoverError> {
    let dir = resolve_data_dir(candidates)?;
    list_matching(&dir, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn falls_back_to_second_candidate() {
        let root = tempdir().unwrap();
        let data = root.path().join("data/raw");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("a.csv"), "x,y\n").unwrap();

        let candidates = vec![root.path().join("missing/raw"), data.clone()];
        let files = discover_files(&candidates, "csv").unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.csv");
        assert_eq!(files[0].path, data.join("a.csv"));
    }

    #[test]
    fn reports_every_candidate_when_none_exist() {
        let root = tempdir().unwrap();
        let candidates = vec![root.path().join("one"), root.path().join("two")];

        match discover_files(&candidates, "csv") {
            Err(DiscoverError::DirectoryNotFound { tried }) => assert_eq!(tried, candidates),
            other => panic!("expected DirectoryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn only_top_level_files_with_the_extension_are_listed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "1").unwrap();
        fs::write(dir.path().join("a.csv"), "1").unwrap();
        fs::write(dir.path().join("notes.txt"), "1").unwrap();
        fs::write(dir.path().join("upper.CSV"), "1").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();
        fs::write(dir.path().join("nested.csv/c.csv"), "1").unwrap();

        let names: Vec<_> = list_matching(dir.path(), "csv")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();

        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();

        let err = list_matching(dir.path(), "csv").unwrap_err();
        assert!(matches!(err, DiscoverError::NoMatchingFiles { .. }));
        assert!(err.to_string().contains(".csv"));
    }
}
