use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("Unsupported game version: {0}")]
    UnsupportedVersion(String),

    #[error(
        "No metadata file found in {}. Please ensure META-INF/mods.toml, META-INF/neoforge.mods.toml or fabric.mod.json exists.",
        .root.display()
    )]
    MissingMetadata { root: PathBuf },

    #[error("Malformed metadata in {}: {reason}", .path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown package type: {0} (expected data_pack, resource_pack or mod)")]
    UnknownPackageType(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json5(#[from] json5::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        Error::Custom(msg.into())
    }

    pub fn malformed<T: Into<String>>(path: impl Into<PathBuf>, reason: T) -> Self {
        Error::MalformedMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
