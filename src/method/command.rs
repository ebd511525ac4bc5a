//! Command-line extraction via the `7z` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::method::{ExtractionMethod, SpeedLevel};

/// Extraction strategy that shells out to `7z e`.
///
/// Unlike [`crate::GzipExtractor`] this method depends on an external
/// binary, so `is_supported` must be checked before dispatching to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SevenZipCommand;

impl SevenZipCommand {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionMethod for SevenZipCommand {
    fn is_supported(&self) -> bool {
        !cfg!(windows) && command_exists("7z")
    }

    fn supports_format(&self, format: Format) -> bool {
        matches!(format, Format::SevenZ | Format::Zip | Format::Gzip)
    }

    fn speed_level(&self) -> SpeedLevel {
        SpeedLevel::Highest
    }

    fn extract(&self, file: &Path, target: &Path, format: Format) -> Result<PathBuf> {
        if !self.supports_format(format) {
            return Err(Error::UnsupportedFormat);
        }

        std::fs::create_dir_all(target)?;

        let mut output_flag = std::ffi::OsString::from("-o");
        output_flag.push(target.as_os_str());

        debug!(file = %file.display(), target = %target.display(), "running 7z");
        let status = Command::new("7z")
            .arg("e")
            .arg("-y")
            .arg(file)
            .arg(output_flag)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::command(format!("failed to spawn 7z: {e}")))?;

        if !status.success() {
            return Err(Error::command(format!("7z exited with {status}")));
        }

        Ok(target.to_path_buf())
    }
}

fn command_exists(name: &str) -> bool {
    Command::new(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
