use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::image_format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_size: u64,
}

pub struct FileScanner {
    root: PathBuf,
    follow_links: bool,
}

impl FileScanner {
    pub fn new(root: impl Into<PathBuf>, follow_links: bool) -> Self {
        Self {
            root: root.into(),
            follow_links,
        }
    }

    /// Recursively collects every regular file below the root, sorted by path
    pub fn scan(&self) -> Vec<ScannedFile> {
        if !self.root.exists() {
            warn!("Directory does not exist: {}", self.root.display());
            return Vec::new();
        }

        info!("Scanning directory: {}", self.root.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(file) = Self::process_file(entry.path()) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn process_file(path: &Path) -> Option<ScannedFile> {
        match path.metadata() {
            Ok(metadata) => Some(ScannedFile {
                path: path.to_path_buf(),
                file_size: metadata.len(),
            }),
            Err(e) => {
                warn!("Failed to read metadata for {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Keeps only files the converter should handle
pub fn images(files: &[ScannedFile]) -> Vec<ScannedFile> {
    files
        .iter()
        .filter(|file| image_format::is_candidate(&file.path))
        .cloned()
        .collect()
}

pub fn total_size(files: &[ScannedFile]) -> u64 {
    files.iter().map(|file| file.file_size).sum()
}
