use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use jxl_sweep::{sweep, Config};

#[derive(Parser, Debug)]
#[command(
    name = "jxl-sweep",
    version,
    about = "Convert every image in a directory to lossless JPEG XL"
)]
struct Cli {
    /// Directory to scan recursively
    directory: PathBuf,

    /// List the images that would be converted without touching anything
    #[arg(long)]
    dry_run: bool,

    /// Keep the source files next to the new .jxl files
    #[arg(long)]
    keep_originals: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_links: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::from_env(&cli.directory)
        .with_context(|| format!("Invalid media directory {}", cli.directory.display()))?;
    config.dry_run = cli.dry_run;
    config.keep_originals = cli.keep_originals;
    config.follow_links = cli.follow_links;

    info!("Tools: {:?}", config.tools);

    let summary = sweep::run(&config)
        .await
        .context("Conversion could not start")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if summary.failed > 0 {
        bail!("{} of {} images failed to convert", summary.failed, summary.candidates);
    }

    Ok(())
}
