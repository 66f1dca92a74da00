//! File acceptance policy and per-extension lookups
//!
//! Everything the client decides from a file name alone lives here: whether
//! a file may be staged, which category it belongs to, which syntax tag its
//! code block gets, and how its size reads to a human.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default upload ceiling per file (500 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Default maximum task description length, in characters
pub const DEFAULT_MAX_TASK_LENGTH: usize = 2000;

/// Extensions the backend accepts, lowercase and without the dot
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // Source code
    "py", "js", "ts", "jsx", "tsx", "html", "css", "scss", "sass", "less", "java", "cpp", "c", "h",
    "hpp", "cs", "php", "rb", "go", "rs", "swift", "kt", "scala", "clj", "hs", "ml", "fs", "vb",
    "pas", "pl", "r", "lua",
    // Data and config
    "json", "xml", "yaml", "yml", "toml", "ini", "cfg", "conf", "csv", "tsv", "sql", "db",
    "sqlite", "sqlite3",
    // Documentation
    "md", "rst", "txt", "rtf", "tex", "adoc", "org",
    // Scripts and build files
    "sh", "bash", "zsh", "fish", "ps1", "bat", "cmd", "dockerfile", "makefile", "cmake", "gradle",
    "maven",
    // Archives
    "zip", "tar", "gz", "bz2", "xz", "7z", "rar",
    // Audio
    "wav", "mp3", "m4a", "flac", "ogg", "aac",
    // Video
    "mp4", "mov", "avi", "mkv", "webm", "flv",
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "svg",
    // Office documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
];

const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "html", "css", "java", "cpp", "c", "php", "rb", "go", "rs",
];
const DATA_EXTENSIONS: &[&str] = &["json", "xml", "yaml", "yml", "csv", "sql"];
const MEDIA_EXTENSIONS: &[&str] = &["wav", "mp3", "mp4", "mov", "jpg", "jpeg", "png", "gif"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "tar", "gz", "bz2", "xz", "7z"];

/// Extract the lowercased extension of a file name.
///
/// The extension is whatever follows the last `.`; a name without any dot
/// is its own extension, which is how `Makefile` and `Dockerfile` match the
/// allow-list. Returns `None` for names ending in a dot.
pub fn extension_of(name: &str) -> Option<String> {
    let last = name.rsplit('.').next().unwrap_or(name);
    if last.is_empty() {
        None
    } else {
        Some(last.to_lowercase())
    }
}

/// Coarse file category used for icons and list metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Code,
    Data,
    Media,
    Archive,
    Other,
}

impl FileCategory {
    /// Categorize a file by its name
    pub fn from_name(name: &str) -> Self {
        match extension_of(name) {
            Some(ext) => Self::from_extension(&ext),
            None => FileCategory::Other,
        }
    }

    /// Categorize a lowercase extension
    pub fn from_extension(ext: &str) -> Self {
        if CODE_EXTENSIONS.contains(&ext) {
            FileCategory::Code
        } else if DATA_EXTENSIONS.contains(&ext) {
            FileCategory::Data
        } else if MEDIA_EXTENSIONS.contains(&ext) {
            FileCategory::Media
        } else if ARCHIVE_EXTENSIONS.contains(&ext) {
            FileCategory::Archive
        } else {
            FileCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Code => "code",
            FileCategory::Data => "data",
            FileCategory::Media => "media",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }

    /// Icon class for a backend-supplied type string.
    ///
    /// The backend reports finer types (`audio`, `documentation`, ...) than
    /// the client categories; anything unknown falls back to the generic icon.
    pub fn icon_for_type(kind: &str) -> &'static str {
        match kind {
            "code" => "fas fa-code",
            "data" => "fas fa-database",
            "media" | "audio" | "video" | "image" => "fas fa-photo-video",
            "archive" => "fas fa-file-archive",
            _ => "fas fa-file",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntax-highlight language tag for a file, `text` when unknown
pub fn language_for_file(name: &str) -> &'static str {
    let Some(ext) = extension_of(name) else {
        return "text";
    };
    match ext.as_str() {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "html" => "html",
        "css" => "css",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        _ => "text",
    }
}

/// Format a byte count for display (`0 B`, `1.5 KB`, `500 MB`).
///
/// One decimal place, trailing `.0` dropped, capped at gigabytes.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

/// Why a file was refused at staging time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooLarge { name: String, max_size: u64 },
    UnsupportedType { extension: Option<String> },
}

impl Rejection {
    /// Oversized files are reported as errors, unknown types as warnings
    pub fn is_error(&self) -> bool {
        matches!(self, Rejection::TooLarge { .. })
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooLarge { name, max_size } => write!(
                f,
                "File \"{}\" is too large (max {})",
                name,
                format_file_size(*max_size)
            ),
            Rejection::UnsupportedType { extension } => write!(
                f,
                "File type \"{}\" is not supported",
                extension.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Staging policy: size ceiling plus the extension allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePolicy {
    /// Per-file byte ceiling; `None` accepts any size
    pub max_file_size: Option<u64>,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl FilePolicy {
    pub fn new(max_file_size: Option<u64>) -> Self {
        Self { max_file_size }
    }

    /// Check a candidate file. Size is checked before type.
    pub fn validate(&self, name: &str, size: u64) -> Result<(), Rejection> {
        if let Some(max_size) = self.max_file_size {
            if size > max_size {
                return Err(Rejection::TooLarge {
                    name: name.to_string(),
                    max_size,
                });
            }
        }

        let extension = extension_of(name);
        match extension.as_deref() {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => Ok(()),
            _ => Err(Rejection::UnsupportedType { extension }),
        }
    }
}
