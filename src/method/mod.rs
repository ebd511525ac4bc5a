//! Extraction method implementations.
//!
//! Every strategy for getting bytes out of an archive implements
//! [`ExtractionMethod`], so a dispatcher can treat a native decoder and a
//! shelled-out command uniformly and fall back between them.

pub mod command;
pub mod gzip;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::Format;

/// Relative decompression speed of a method, used to rank candidates.
///
/// Native bit-level decoding is the slowest option; dedicated tools and
/// library bindings rank above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpeedLevel {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

/// One interchangeable extraction strategy.
pub trait ExtractionMethod {
    /// Whether this method can run in the current environment at all
    /// (required binaries present, platform supported).
    fn is_supported(&self) -> bool;

    /// Whether this method understands the given archive format.
    fn supports_format(&self, format: Format) -> bool;

    /// Relative speed ranking for dispatch.
    fn speed_level(&self) -> SpeedLevel;

    /// Extract `file` into `target`, returning the path that was written.
    ///
    /// Fails with [`crate::Error::UnsupportedFormat`] when asked for a
    /// format this method does not handle.
    fn extract(&self, file: &Path, target: &Path, format: Format) -> Result<PathBuf>;
}
