//! Filesystem collaborator used by extraction methods.
//!
//! Methods never touch the filesystem directly for output; they hand the
//! finished byte buffer to this trait, which keeps decoding pure and lets
//! tests substitute an in-memory sink.

use std::fs;
use std::io;
use std::path::Path;

/// Minimal write-side filesystem surface.
pub trait Filesystem {
    /// Create a directory and any missing parents. Must be idempotent:
    /// an already-existing directory is not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Write an entire file in one call, replacing any existing file.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dir_all_is_idempotent() {
        let dir = std::env::temp_dir().join("decant-fs-idempotent");
        let fs = LocalFilesystem;
        fs.create_dir_all(&dir).unwrap();
        fs.create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
