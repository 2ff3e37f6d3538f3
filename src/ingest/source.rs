use std::fs::File;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading raw log lines from a source.
///
/// These are the only faults allowed to abort a run: they occur before the
/// analysis pipeline executes. Everything downstream degrades per record
/// instead of failing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a file: {0}")]
    NotAFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// A provider of raw log lines.
///
/// One operation: produce all lines, newline-stripped, in order, as a finite
/// sequence. File, stream, or in-memory backing is irrelevant to the
/// pipeline, which depends only on this trait.
pub trait Source {
    fn read(&mut self) -> Result<Vec<String>, SourceError>;
}

/// Reads log lines from a file on disk.
///
/// The file content is decoded lossily: CI logs routinely contain stray
/// non-UTF-8 bytes and a single bad byte must not abort the run.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn read(&mut self) -> Result<Vec<String>, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }
        if !self.path.is_file() {
            return Err(SourceError::NotAFile(self.path.clone()));
        }
        let mut buffer = Vec::new();
        File::open(&self.path)
            .and_then(|mut file| file.read_to_end(&mut buffer))
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let text = String::from_utf8_lossy(&buffer);
        Ok(split_lines(&text))
    }
}

/// Reads log lines from standard input until EOF.
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for StdinSource {
    fn read(&mut self) -> Result<Vec<String>, SourceError> {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(SourceError::Stdin)?;
        let text = String::from_utf8_lossy(&buffer);
        Ok(split_lines(&text))
    }
}

/// An in-memory source, mainly useful in tests and as an embedding API.
pub struct MemorySource {
    lines: Vec<String>,
}

impl MemorySource {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Source for MemorySource {
    fn read(&mut self) -> Result<Vec<String>, SourceError> {
        Ok(self.lines.clone())
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_source_strips_newlines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\r\ntwo\nthree").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        let lines = source.read().unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let mut source = FileSource::new("/definitely/not/here.log");
        match source.read() {
            Err(SourceError::NotFound(path)) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.log"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileSource::new(dir.path());
        assert!(matches!(source.read(), Err(SourceError::NotAFile(_))));
    }

    #[test]
    fn memory_source_round_trips() {
        let mut source = MemorySource::new(["a", "b"]);
        assert_eq!(source.read().unwrap(), vec!["a", "b"]);
        // Idempotent: a second read returns the same lines.
        assert_eq!(source.read().unwrap(), vec!["a", "b"]);
    }
}
