use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions picked up by a directory scan
const CANDIDATE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "apng", "tiff", "tif", "heic", "jp2", "webp", "exr", "pam",
    "pgm", "ppm", "pfm", "pgx",
];

/// Inputs cjxl reads directly, everything else goes through PNG first
const JXL_ENCODABLE_EXTENSIONS: &[&str] = &[
    "exr", "gif", "jpg", "jpeg", "pam", "pgm", "ppm", "pfm", "pgx", "png", "apng", "jxl",
];

/// Returns true when a scan should hand this file to the converter
pub fn is_candidate(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| CANDIDATE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Returns true when cjxl accepts this file as input without an intermediate
pub fn is_jxl_encodable(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| JXL_ENCODABLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Appends `.ext` to the full file name, keeping any existing extension.
///
/// `photo.jpg` + `jxl` becomes `photo.jpg.jxl`.
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Image format as reported by ImageMagick's `%m` escape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Apng,
    Gif,
    Tiff,
    Heic,
    Jp2,
    Webp,
    Exr,
    Pam,
    Pgm,
    Ppm,
    Pfm,
    Pgx,
    Bmp,
    Jxl,
    Other(String),
}

impl ImageFormat {
    pub fn from_magick(name: &str) -> Self {
        let name = name.trim().trim_matches(|c: char| c == '\'' || c == '"');
        match name.to_uppercase().as_str() {
            "JPEG" | "JPG" => ImageFormat::Jpeg,
            "PNG" | "PNG8" | "PNG24" | "PNG32" | "PNG48" | "PNG64" => ImageFormat::Png,
            "APNG" => ImageFormat::Apng,
            "GIF" | "GIF87" => ImageFormat::Gif,
            "TIFF" | "TIF" | "TIFF64" => ImageFormat::Tiff,
            "HEIC" | "HEIF" => ImageFormat::Heic,
            "JP2" | "J2K" | "JPC" => ImageFormat::Jp2,
            "WEBP" => ImageFormat::Webp,
            "EXR" => ImageFormat::Exr,
            "PAM" => ImageFormat::Pam,
            "PGM" => ImageFormat::Pgm,
            "PPM" | "PNM" => ImageFormat::Ppm,
            "PFM" => ImageFormat::Pfm,
            "PGX" => ImageFormat::Pgx,
            "BMP" | "BMP2" | "BMP3" => ImageFormat::Bmp,
            "JXL" => ImageFormat::Jxl,
            other => ImageFormat::Other(other.to_lowercase()),
        }
    }

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Apng => "apng",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Heic => "heic",
            ImageFormat::Jp2 => "jp2",
            ImageFormat::Webp => "webp",
            ImageFormat::Exr => "exr",
            ImageFormat::Pam => "pam",
            ImageFormat::Pgm => "pgm",
            ImageFormat::Ppm => "ppm",
            ImageFormat::Pfm => "pfm",
            ImageFormat::Pgx => "pgx",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Jxl => "jxl",
            ImageFormat::Other(ext) => ext.as_str(),
        }
    }

    fn aliases(&self) -> &[&str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Png => &["png", "apng"],
            ImageFormat::Tiff => &["tif", "tiff"],
            ImageFormat::Heic => &["heic", "heif"],
            ImageFormat::Jp2 => &["jp2", "j2k", "jpc"],
            ImageFormat::Ppm => &["ppm", "pnm"],
            _ => &[],
        }
    }

    pub fn is_jxl_encodable(&self) -> bool {
        JXL_ENCODABLE_EXTENSIONS.contains(&self.extension())
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            other => write!(f, "{}", other.extension().to_uppercase()),
        }
    }
}

/// True when the path's extension already names `format`
pub fn extension_matches(path: &Path, format: &ImageFormat) -> bool {
    let Some(ext) = lowercase_extension(path) else {
        return false;
    };

    ext == format.extension() || format.aliases().contains(&ext.as_str())
}
