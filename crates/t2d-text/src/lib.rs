//! T2D Text - Input acquisition and text preparation
//!
//! Covers everything that happens before entity extraction:
//! - Reading raw text from files, stdin or inline strings
//! - Character repair and normalization
//! - Sentence segmentation
//! - Heuristic language detection

pub mod lang;
pub mod normalize;
pub mod segment;

pub use lang::{detect_language, Language};
pub use normalize::{canonicalize_currency, collapse_whitespace, normalize};
pub use segment::{split_on_punctuation, Segmenter, SentenceDetector, UnicodeSentenceDetector};

use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while acquiring or preparing text
#[derive(Error, Debug)]
pub enum TextError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the input
    #[error("IO error reading {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid UTF-8
    #[error("Text encoding error in {0}: input must be UTF-8")]
    EncodingError(String),

    /// Input exceeds the configured length limit
    #[error("Input too long: {length} characters (limit {limit})")]
    TooLong { length: usize, limit: usize },

    /// Sentence detector failure
    #[error("Sentence segmentation failed: {0}")]
    Segmentation(String),
}

pub type Result<T> = std::result::Result<T, TextError>;

impl From<TextError> for t2d_core::T2dError {
    fn from(e: TextError) -> Self {
        t2d_core::T2dError::Input(e.to_string())
    }
}

// ============================================================================
// Input Sources
// ============================================================================

/// Supported input file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Markdown,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Self::PlainText,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path; files without an extension are plain text
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::PlainText)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where raw text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
    Inline(String),
}

impl InputSource {
    /// Interpret a CLI argument: absent or `-` means stdin
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdin,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Human-readable description for logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }

    /// Read the full text, decoding as UTF-8
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map_err(|e| TextError::IoError {
                        path: self.describe(),
                        source: e,
                    })?;
                decode_utf8(bytes, &self.describe())
            }
            Self::File(path) => {
                let file_type = FileType::from_path(path);
                if file_type == FileType::Unknown {
                    return Err(TextError::UnsupportedFormat(
                        path.extension()
                            .and_then(|e| e.to_str())
                            .unwrap_or("none")
                            .to_string(),
                    ));
                }

                let bytes = std::fs::read(path).map_err(|e| TextError::IoError {
                    path: self.describe(),
                    source: e,
                })?;
                decode_utf8(bytes, &self.describe())
            }
        }
    }
}

fn decode_utf8(bytes: Vec<u8>, origin: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| TextError::EncodingError(origin.to_string()))
}

/// Reject input longer than `max_chars` characters
pub fn validate_text_length(text: &str, max_chars: usize) -> Result<()> {
    let length = text.chars().count();
    if length > max_chars {
        return Err(TextError::TooLong {
            length,
            limit: max_chars,
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
