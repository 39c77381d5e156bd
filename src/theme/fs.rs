//! The filesystem as seen by theme resolution.
//!
//! Theme resolution only ever needs two things from the filesystem: whether a
//! path exists, and the contents of a text file. The [`Filesystem`] trait
//! captures exactly that, so that resolution can be run against the real
//! filesystem ([`HostFs`]) or an in-memory one ([`MemoryFs`]).

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A read-only view of a filesystem.
pub trait Filesystem {
    /// Whether a file exists at `path`. No validation of its content is done.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

/// The real filesystem of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl Filesystem for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// A fully in-memory filesystem containing only files.
///
/// Useful for unit tests. The whole tree lives in a map from absolute paths to
/// file contents. Every call through the [`Filesystem`] trait is counted, so
/// tests can assert how often resolution touched the disk.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
    accesses: Cell<usize>,
    reads: Cell<usize>,
}

impl MemoryFs {
    /// Creates an empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a file, replacing any previous content.
    pub fn insert<P, S>(&mut self, path: P, content: S)
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style version of [`insert`](Self::insert).
    #[must_use]
    pub fn with_file<P, S>(mut self, path: P, content: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        self.insert(path, content);
        self
    }

    /// The total number of calls made through the [`Filesystem`] trait.
    pub fn accesses(&self) -> usize {
        self.accesses.get()
    }

    /// The number of [`read_to_string`](Filesystem::read_to_string) calls made.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Resets the access counters to zero.
    pub fn reset_counters(&self) {
        self.accesses.set(0);
        self.reads.set(0);
    }
}

impl Filesystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.accesses.set(self.accesses.get() + 1);
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.accesses.set(self.accesses.get() + 1);
        self.reads.set(self.reads.get() + 1);
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_memory_fs_counts_accesses() {
        let fs = MemoryFs::new().with_file("/etc/motd", "hello");

        assert!(fs.exists(Path::new("/etc/motd")));
        assert!(!fs.exists(Path::new("/etc/issue")));
        assert_eq!(fs.read_to_string(Path::new("/etc/motd")).unwrap(), "hello");
        assert_eq!(
            fs.read_to_string(Path::new("/etc/issue")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        assert_eq!(fs.accesses(), 4);
        assert_eq!(fs.reads(), 2);

        fs.reset_counters();
        assert_eq!(fs.accesses(), 0);
    }

    #[test]
    fn test_host_fs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gtk.css");

        assert!(!HostFs.exists(&path));

        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "@define-color theme_bg_color #000000;").unwrap();

        assert!(HostFs.exists(&path));
        assert!(HostFs.read_to_string(&path).unwrap().starts_with("@define-color"));
    }
}
