use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::error::ConvertResult;
use crate::process::{probe, run_tool};

const TOOL: &str = "exiftool";

/// Writes metadata through exiftool.
///
/// Every call passes `-overwrite_original` so exiftool never leaves
/// `*_original` backups next to the converted files, and `-m` so minor
/// warnings don't fail the write.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: String,
}

impl ExifTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub async fn probe(&self) -> ConvertResult<()> {
        probe(TOOL, &self.program, "-ver").await
    }

    /// Copies every tag from `source` onto `target`, keeping group assignments
    pub async fn transfer_metadata(&self, source: &Path, target: &Path) -> ConvertResult<()> {
        run_tool(
            TOOL,
            &self.program,
            [
                OsStr::new("-overwrite_original"),
                OsStr::new("-m"),
                OsStr::new("-TagsFromFile"),
                source.as_os_str(),
                OsStr::new("-all:all>all:all"),
                target.as_os_str(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Sets the Title tag to the file's own name
    pub async fn set_title(&self, path: &Path) -> ConvertResult<()> {
        let title = title_arg(path);
        run_tool(
            TOOL,
            &self.program,
            [
                OsStr::new("-overwrite_original"),
                OsStr::new("-m"),
                title.as_os_str(),
                path.as_os_str(),
            ],
        )
        .await?;

        Ok(())
    }
}

fn title_arg(path: &Path) -> OsString {
    let mut arg = OsString::from("-Title=");
    if let Some(name) = path.file_name() {
        arg.push(name);
    }
    arg
}
