use std::fmt;
use std::path::Path;
use std::str::FromStr;
use crate::utils::OptimizerError;

/// Extension of every file the optimizer writes.
pub const OUTPUT_EXTENSION: &str = "avif";

/// Image formats accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl InputFormat {
    pub const ALL: [InputFormat; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::WebP];

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Gif => &["gif"],
            Self::WebP => &["webp"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::WebP => "WebP",
        })
    }
}

impl FromStr for InputFormat {
    type Err = OptimizerError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.matches_extension(ext))
            .ok_or_else(|| OptimizerError::format(format!(
                "Unsupported image format: {}", ext.to_lowercase()
            )))
    }
}

/// Get format from file extension
pub fn format_from_path(path: &Path) -> Result<InputFormat, OptimizerError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| OptimizerError::format(
            format!("File has no extension: {}", path.display())
        ))?;

    InputFormat::from_str(ext)
}
