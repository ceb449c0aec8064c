//! Problem instance corpus.
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::ConfigError;

/// Ordered list of problem instance files, read from a directory once.
///
/// The list is immutable for the lifetime of the environment. Entries are sorted by
/// path, so iterating selection schedules do not depend on the platform's directory
/// enumeration order.
pub struct Corpus {
    directory: PathBuf,
    files: Vec<PathBuf>,
}

impl Corpus {
    /// Read the corpus from a directory.
    ///
    /// Only plain files are listed; subdirectories are ignored. The directory must
    /// contain at least one instance.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Corpus, ConfigError> {
        let directory = directory.into();

        let entries = fs::read_dir(&directory).map_err(|source| ConfigError::ReadDir {
            path: directory.clone(),
            source,
        })?;

        let mut files = vec![];
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::ReadDir {
                path: directory.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(ConfigError::EmptyCorpus { path: directory });
        }

        info!(
            "corpus at {}: {} problem instances",
            directory.display(),
            files.len()
        );

        Ok(Corpus { directory, files })
    }

    /// Number of instances in the corpus.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Path of the instance with the given index.
    pub fn path(&self, index: usize) -> &Path {
        &self.files[index]
    }

    /// Index of the instance with the given file name, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.files
            .iter()
            .position(|path| path.file_name() == Some(OsStr::new(name)))
    }

    /// Directory this corpus was read from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test::corpus_dir;

    #[test]
    fn lists_files_in_sorted_order() {
        let dir = corpus_dir(&["c.cnf", "a.cnf", "b.cnf"]);
        let corpus = Corpus::new(dir.path()).unwrap();

        assert_eq!(corpus.len(), 3);
        let names: Vec<_> = (0..corpus.len())
            .map(|index| corpus.path(index).file_name().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["a.cnf", "b.cnf", "c.cnf"]);
    }

    #[test]
    fn ignores_subdirectories() {
        let dir = corpus_dir(&["a.cnf"]);
        fs::create_dir(dir.path().join("nested")).unwrap();

        let corpus = Corpus::new(dir.path()).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn empty_directory_is_a_configuration_error() {
        let dir = corpus_dir(&[]);
        match Corpus::new(dir.path()) {
            Err(ConfigError::EmptyCorpus { path }) => assert_eq!(path, dir.path()),
            other => panic!("empty corpus not rejected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let dir = corpus_dir(&[]);
        let missing = dir.path().join("missing");
        match Corpus::new(&missing) {
            Err(ConfigError::ReadDir { path, .. }) => assert_eq!(path, missing),
            other => panic!("missing directory not rejected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn position_resolves_file_names() {
        let dir = corpus_dir(&["a.cnf", "b.cnf"]);
        let corpus = Corpus::new(dir.path()).unwrap();

        assert_eq!(corpus.position("b.cnf"), Some(1));
        assert_eq!(corpus.position("z.cnf"), None);
    }
}
