//! Archive format identification.

use std::path::Path;

/// Archive formats known to the extraction methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Single-file gzip (RFC 1952).
    Gzip,
    /// Zip archive.
    Zip,
    /// 7-Zip archive.
    SevenZ,
}

impl Format {
    /// Guess the format from a file extension.
    ///
    /// This is a hint for method dispatch, not a validation of the file
    /// contents; methods still fail with a typed error on malformed input.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "gz" => Some(Format::Gzip),
            "zip" => Some(Format::Zip),
            "7z" => Some(Format::SevenZ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_from_extension() {
        assert_eq!(Format::from_path("data.gz"), Some(Format::Gzip));
        assert_eq!(Format::from_path("data.GZ"), Some(Format::Gzip));
        assert_eq!(Format::from_path("bundle.zip"), Some(Format::Zip));
        assert_eq!(Format::from_path("bundle.7z"), Some(Format::SevenZ));
        assert_eq!(Format::from_path("notes.txt"), None);
        assert_eq!(Format::from_path("noext"), None);
    }
}
