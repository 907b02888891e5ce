use log::{debug, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::image_format::{append_extension, ImageFormat};
use crate::process::{capture, probe, run_tool};

const TOOL: &str = "magick";

/// ImageMagick wrapper for identification and intermediate re-encodes
#[derive(Debug, Clone)]
pub struct Magick {
    program: String,
}

impl Magick {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub async fn probe(&self) -> ConvertResult<()> {
        probe(TOOL, &self.program, "-version").await
    }

    /// `identify -regard-warnings` turns decoder warnings into a failing exit
    pub async fn is_corrupt(&self, path: &Path) -> ConvertResult<bool> {
        let output = capture(
            TOOL,
            &self.program,
            [
                OsStr::new("identify"),
                OsStr::new("-regard-warnings"),
                path.as_os_str(),
            ],
        )
        .await?;

        if !output.status.success() {
            debug!(
                "identify rejected {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(!output.status.success())
    }

    /// Reads the actual format from file content, independent of the extension.
    /// Multi-frame images report one line per frame, the first one wins.
    pub async fn identify_format(&self, path: &Path) -> ConvertResult<ImageFormat> {
        let output = run_tool(
            TOOL,
            &self.program,
            [
                OsStr::new("identify"),
                OsStr::new("-format"),
                OsStr::new("%m\\n"),
                path.as_os_str(),
            ],
        )
        .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let name = stdout.lines().map(str::trim).find(|line| !line.is_empty());

        match name {
            Some(name) => Ok(ImageFormat::from_magick(name)),
            None => Err(ConvertError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Re-encodes a damaged image into a fresh file of the same format.
    ///
    /// `photo.jpg` becomes `photo.recovered.jpg`; the input is left alone.
    pub async fn recover(&self, path: &Path) -> ConvertResult<PathBuf> {
        let output = recovered_path(path);
        if output.exists() {
            return Err(ConvertError::OutputExists(output));
        }

        let result = run_tool(
            TOOL,
            &self.program,
            [
                path.as_os_str(),
                OsStr::new("-auto-orient"),
                output.as_os_str(),
            ],
        )
        .await;

        if let Err(e) = result {
            remove_partial(&output);
            return Err(ConvertError::RecoveryFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }

        if !output.exists() {
            return Err(ConvertError::RecoveryFailed {
                path: path.to_path_buf(),
                reason: format!("{} was not written", output.display()),
            });
        }

        Ok(output)
    }

    /// Converts to PNG next to the input, for formats cjxl can't read
    pub async fn to_png(&self, path: &Path) -> ConvertResult<PathBuf> {
        let output = append_extension(path, "png");
        if output.exists() {
            return Err(ConvertError::OutputExists(output));
        }

        let result = run_tool(
            TOOL,
            &self.program,
            [
                path.as_os_str(),
                OsStr::new("-auto-orient"),
                output.as_os_str(),
            ],
        )
        .await;

        if let Err(e) = result {
            remove_partial(&output);
            return Err(e);
        }

        if !output.exists() {
            return Err(ConvertError::OutputMissing(output));
        }

        Ok(output)
    }
}

/// Only called for paths that did not exist before the tool ran
fn remove_partial(output: &Path) {
    if output.exists() {
        if let Err(e) = std::fs::remove_file(output) {
            warn!("Failed to remove partial output {}: {}", output.display(), e);
        }
    }
}

fn recovered_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match path.extension() {
        Some(ext) => format!("{}.recovered.{}", stem, ext.to_string_lossy()),
        None => format!("{}.recovered", stem),
    };

    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovered_path() {
        assert_eq!(
            recovered_path(Path::new("/photos/a.jpg")),
            PathBuf::from("/photos/a.recovered.jpg")
        );
        assert_eq!(
            recovered_path(Path::new("/photos/raw")),
            PathBuf::from("/photos/raw.recovered")
        );
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let magick = Magick::new("/nonexistent/magick");
        assert!(matches!(
            magick.probe().await,
            Err(ConvertError::ToolNotFound { tool: "magick", .. })
        ));
    }
}
