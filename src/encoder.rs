use std::ffi::OsStr;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::process::{probe, run_tool};

const TOOL: &str = "cjxl";

/// Mathematically lossless, maximum effort, JPEG inputs recompressed
/// without keeping reconstruction data
pub const CJXL_SETTINGS: [&str; 8] = [
    "--distance",
    "0",
    "--effort",
    "10",
    "--lossless_jpeg",
    "1",
    "--allow_jpeg_reconstruction",
    "0",
];

#[derive(Debug, Clone)]
pub struct Cjxl {
    program: String,
}

impl Cjxl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub async fn probe(&self) -> ConvertResult<()> {
        probe(TOOL, &self.program, "--version").await
    }

    pub async fn encode(&self, input: &Path, output: &Path) -> ConvertResult<()> {
        let args = [input.as_os_str(), output.as_os_str()]
            .into_iter()
            .chain(CJXL_SETTINGS.iter().map(OsStr::new));

        run_tool(TOOL, &self.program, args).await?;

        if !output.exists() {
            return Err(ConvertError::OutputMissing(output.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_are_lossless() {
        assert_eq!(
            CJXL_SETTINGS.join(" "),
            "--distance 0 --effort 10 --lossless_jpeg 1 --allow_jpeg_reconstruction 0"
        );
    }
}
