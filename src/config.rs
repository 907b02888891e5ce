use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub cjxl: String,
    pub exiftool: String,
    pub magick: String,
}

impl ToolPaths {
    /// Each tool falls back to its bare name, resolved through `PATH`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cjxl: env::var("CJXL_PATH").unwrap_or(defaults.cjxl),
            exiftool: env::var("EXIFTOOL_PATH").unwrap_or(defaults.exiftool),
            magick: env::var("MAGICK_PATH").unwrap_or(defaults.magick),
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            cjxl: "cjxl".to_string(),
            exiftool: "exiftool".to_string(),
            magick: "magick".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub tools: ToolPaths,
    pub dry_run: bool,
    pub keep_originals: bool,
    pub follow_links: bool,
}

impl Config {
    /// Validates `root` and reads tool locations from the environment.
    /// Flags start disabled; the CLI switches them on.
    pub fn from_env(root: &Path) -> ConvertResult<Self> {
        Ok(Config {
            root: validate_root(root)?,
            tools: ToolPaths::from_env(),
            dry_run: false,
            keep_originals: false,
            follow_links: false,
        })
    }
}

fn validate_root(root: &Path) -> ConvertResult<PathBuf> {
    if !root.exists() {
        return Err(ConvertError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory(root.to_path_buf()));
    }
    Ok(normalize(root))
}

/// Lexical cleanup: drops `.` segments and trailing separators,
/// folds `..` into its parent where one is known
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if last_is_normal {
                    normalized.pop();
                } else {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_env(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(ConvertError::PathNotFound(_))));
    }

    #[test]
    fn test_root_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("photo.jpg");
        File::create(&file).unwrap();

        let result = Config::from_env(&file);
        assert!(matches!(result, Err(ConvertError::NotADirectory(_))));
    }

    #[test]
    fn test_valid_root_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_env(temp_dir.path()).unwrap();

        assert_eq!(config.root, temp_dir.path());
        assert!(!config.dry_run);
        assert!(!config.keep_originals);
        assert!(!config.follow_links);
    }

    #[test]
    fn test_default_tool_names() {
        let tools = ToolPaths::default();
        assert_eq!(tools.cjxl, "cjxl");
        assert_eq!(tools.exiftool, "exiftool");
        assert_eq!(tools.magick, "magick");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("photos/./2020/")), PathBuf::from("photos/2020"));
        assert_eq!(normalize(Path::new("photos/2020/../2021")), PathBuf::from("photos/2021"));
        assert_eq!(normalize(Path::new("../photos")), PathBuf::from("../photos"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("/srv/./media")), PathBuf::from("/srv/media"));
    }
}
