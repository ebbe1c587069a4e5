use std::path::PathBuf;

use thiserror::Error;

use crate::models::SectionKind;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize portfolio: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to parse portfolio: {0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section {id} is a {kind} section and has no such field")]
    FieldMismatch { id: String, kind: SectionKind },

    #[error("Unsupported portfolio version: {0}")]
    UnsupportedVersion(u32),

    #[error("Could not read image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 模块内统一使用的 Result 别名
pub type Result<T> = std::result::Result<T, PortfolioError>;
