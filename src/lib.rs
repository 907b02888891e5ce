//! Batch conversion of image folders to lossless JPEG XL.
//!
//! Drives `magick`, `cjxl` and `exiftool` as external processes: each source
//! image is checked, encoded, gets its metadata copied over and a title tag
//! set, and is then removed.

pub mod config;
pub mod converter;
pub mod encoder;
pub mod error;
pub mod file_scanner;
pub mod image_format;
pub mod image_tools;
pub mod metadata_writer;
pub mod process;
pub mod report;
pub mod sweep;

pub use config::{Config, ToolPaths};
pub use converter::{Conversion, Converter};
pub use error::{ConvertError, ConvertResult};
pub use report::RunSummary;
