//! Byte-sink abstraction the generator context finalizes into.

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Provides named byte sinks for persisted artifacts.
///
/// The generator context is a higher-level, in-memory abstraction over this;
/// it only hands buffers to a provider at finalization.
pub trait OutputStreamProvider {
    /// Creates a new byte sink, truncating any existing artifact of that name.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the sink cannot be created.
    fn create(&mut self, name: &str) -> io::Result<Box<dyn Write>>;

    /// Opens a byte sink for appending, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the sink cannot be opened.
    fn open_for_append(&mut self, name: &str) -> io::Result<Box<dyn Write>>;
}

/// Writes artifacts as plain files under a root directory.
#[derive(Debug)]
pub struct DiskOutputStreamProvider {
    root: PathBuf,
}

impl DiskOutputStreamProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let path: PathBuf = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

impl OutputStreamProvider for DiskOutputStreamProvider {
    fn create(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let path: PathBuf = self.resolve(name)?;
        Ok(Box::new(File::create(path)?))
    }

    fn open_for_append(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let path: PathBuf = self.resolve(name)?;
        Ok(Box::new(fs::OpenOptions::new().create(true).append(true).open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_truncates_existing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());

        let mut first: Box<dyn Write> = provider.create("out.txt").expect("create should succeed");
        first.write_all(b"old content\n").expect("write should succeed");
        drop(first);

        let mut second: Box<dyn Write> = provider.create("out.txt").expect("create should succeed");
        second.write_all(b"new\n").expect("write should succeed");
        drop(second);

        let written: String =
            fs::read_to_string(dir.path().join("out.txt")).expect("file should exist");
        assert_eq!(written, "new\n");
    }

    #[test]
    fn open_for_append_extends_existing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());

        let mut sink: Box<dyn Write> = provider.create("out.txt").expect("create should succeed");
        sink.write_all(b"line 1\n").expect("write should succeed");
        drop(sink);

        let mut appender: Box<dyn Write> = provider
            .open_for_append("out.txt")
            .expect("append open should succeed");
        appender.write_all(b"line 2\n").expect("write should succeed");
        drop(appender);

        let written: String =
            fs::read_to_string(dir.path().join("out.txt")).expect("file should exist");
        assert_eq!(written, "line 1\nline 2\n");
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut provider = DiskOutputStreamProvider::new(dir.path());

        let mut sink: Box<dyn Write> = provider
            .create("nested/dir/out.txt")
            .expect("create should succeed");
        sink.write_all(b"x\n").expect("write should succeed");
        drop(sink);

        assert!(dir.path().join("nested/dir/out.txt").is_file());
    }
}
