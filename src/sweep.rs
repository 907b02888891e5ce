use log::{error, info};

use crate::config::Config;
use crate::converter::Converter;
use crate::error::ConvertResult;
use crate::file_scanner::{self, FileScanner};
use crate::report::{readable_bytes, RunSummary, SavingsTracker};

/// Converts every candidate image below `config.root`, one after another.
///
/// A failing file is logged and left in place; only an unusable toolchain
/// aborts the run.
pub async fn run(config: &Config) -> ConvertResult<RunSummary> {
    let converter = Converter::new(config);
    if !config.dry_run {
        converter.preflight().await?;
    }

    let scanner = FileScanner::new(&config.root, config.follow_links);
    let files = scanner.scan();
    let images = file_scanner::images(&files);
    let size_before = file_scanner::total_size(&files);

    info!("Given path: {}", config.root.display());
    info!("Total files: {}", files.len());
    info!("Supported image files: {}", images.len());
    info!("Directory size: {}", readable_bytes(size_before as i64));

    let mut summary = RunSummary {
        root: config.root.display().to_string(),
        total_files: files.len(),
        candidates: images.len(),
        size_before,
        ..RunSummary::default()
    };

    if config.dry_run {
        for image in &images {
            info!("Would convert: {}", image.path.display());
        }
        summary.size_after = size_before;
        return Ok(summary);
    }

    let mut savings = SavingsTracker::default();
    let total = images.len();

    for (index, image) in images.iter().enumerate() {
        info!("Current file: {}", image.path.display());

        match converter.convert(&image.path).await {
            Ok(conversion) => {
                savings.record(conversion.old_size, conversion.new_size);
                summary.converted += 1;
                info!("{}", savings.status_line());
                info!(
                    "Converted image {}/{}: {}",
                    index + 1,
                    total,
                    conversion.output.display()
                );
            }
            Err(e) => {
                summary.failed += 1;
                error!(
                    "Skipping {} ({}/{}): {}",
                    image.path.display(),
                    index + 1,
                    total,
                    e
                );
            }
        }
    }

    summary.size_after = file_scanner::total_size(&scanner.scan());

    info!("{}", summary.size_line());
    info!(
        "Done: {} converted, {} failed",
        summary.converted, summary.failed
    );

    Ok(summary)
}
