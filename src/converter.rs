use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::Config;
use crate::encoder::Cjxl;
use crate::error::{ConvertError, ConvertResult};
use crate::image_format::{append_extension, extension_matches};
use crate::image_tools::Magick;
use crate::metadata_writer::ExifTool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub source: PathBuf,
    pub output: PathBuf,
    pub old_size: u64,
    pub new_size: u64,
}

/// Files touched while converting one source image.
///
/// The original may be renamed once (when its extension lies about its
/// format); everything else listed here was created by the pipeline.
#[derive(Debug)]
struct WorkFiles {
    original: PathBuf,
    renamed_original: Option<PathBuf>,
    intermediates: Vec<PathBuf>,
    output: Option<PathBuf>,
}

impl WorkFiles {
    fn new(original: &Path) -> Self {
        Self {
            original: original.to_path_buf(),
            renamed_original: None,
            intermediates: Vec::new(),
            output: None,
        }
    }

    /// Where the original currently lives on disk
    fn original_on_disk(&self) -> &Path {
        self.renamed_original.as_deref().unwrap_or(&self.original)
    }

    async fn remove_intermediates(&mut self) {
        for path in self.intermediates.drain(..) {
            remove_quietly(&path).await;
        }
    }

    async fn restore_original_name(&mut self) {
        if let Some(renamed) = self.renamed_original.take() {
            if let Err(e) = fs::rename(&renamed, &self.original).await {
                warn!(
                    "Failed to rename {} back to {}: {}",
                    renamed.display(),
                    self.original.display(),
                    e
                );
            }
        }
    }

    /// Undo everything after a failed step; the source ends up where it started
    async fn rollback(&mut self) {
        self.remove_intermediates().await;
        if let Some(output) = self.output.take() {
            remove_quietly(&output).await;
        }
        self.restore_original_name().await;
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("This file could not be deleted: {} ({})", path.display(), e);
        }
    }
}

/// Converts single images to lossless JPEG XL, one external tool call at a time
#[derive(Debug, Clone)]
pub struct Converter {
    magick: Magick,
    cjxl: Cjxl,
    exiftool: ExifTool,
    keep_originals: bool,
}

impl Converter {
    pub fn new(config: &Config) -> Self {
        Self {
            magick: Magick::new(config.tools.magick.clone()),
            cjxl: Cjxl::new(config.tools.cjxl.clone()),
            exiftool: ExifTool::new(config.tools.exiftool.clone()),
            keep_originals: config.keep_originals,
        }
    }

    /// Makes sure all three tools can be started before any file is touched
    pub async fn preflight(&self) -> ConvertResult<()> {
        self.magick.probe().await?;
        self.cjxl.probe().await?;
        self.exiftool.probe().await?;
        Ok(())
    }

    pub async fn convert(&self, source: &Path) -> ConvertResult<Conversion> {
        let old_size = fs::metadata(source).await?.len();
        let mut work = WorkFiles::new(source);

        match self.run_pipeline(&mut work).await {
            Ok((output, new_size)) => {
                self.finish(&mut work).await;
                Ok(Conversion {
                    source: source.to_path_buf(),
                    output,
                    old_size,
                    new_size,
                })
            }
            Err(e) => {
                work.rollback().await;
                Err(e)
            }
        }
    }

    /// Returns the output path and its final size
    async fn run_pipeline(&self, work: &mut WorkFiles) -> ConvertResult<(PathBuf, u64)> {
        let mut current = work.original.clone();

        if self.magick.is_corrupt(&current).await? {
            warn!("This file is corrupted: {}", current.display());
            info!("Trying to recover image");
            let recovered = self.magick.recover(&current).await?;
            info!("Recovery successful: {}", recovered.display());
            work.intermediates.push(recovered.clone());
            current = recovered;
        }

        let format = self.magick.identify_format(&current).await?;
        debug!("{} identified as {}", current.display(), format);

        if !extension_matches(&current, &format) {
            let restored = append_extension(&current, format.extension());
            if restored.exists() {
                return Err(ConvertError::OutputExists(restored));
            }
            fs::rename(&current, &restored).await?;
            info!(
                "Restored file type: {} -> {}",
                current.display(),
                restored.display()
            );

            if current == work.original {
                work.renamed_original = Some(restored.clone());
            } else if let Some(slot) = work.intermediates.iter_mut().find(|p| **p == current) {
                *slot = restored.clone();
            }
            current = restored;
        }

        let output = append_extension(work.original_on_disk(), "jxl");
        if output.exists() {
            return Err(ConvertError::OutputExists(output));
        }

        if !format.is_jxl_encodable() {
            debug!("{} is not readable by cjxl, converting to PNG", format);
            let png = self.magick.to_png(&current).await?;
            work.intermediates.push(png.clone());
            current = png;
        }

        work.output = Some(output.clone());
        self.cjxl.encode(&current, &output).await?;

        self.exiftool
            .transfer_metadata(work.original_on_disk(), &output)
            .await?;
        self.exiftool.set_title(&output).await?;

        let new_size = fs::metadata(&output).await?.len();
        Ok((output, new_size))
    }

    async fn finish(&self, work: &mut WorkFiles) {
        work.remove_intermediates().await;

        if self.keep_originals {
            work.restore_original_name().await;
        } else {
            remove_quietly(work.original_on_disk()).await;
        }
    }
}
