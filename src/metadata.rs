use crate::error::Error;
use crate::result::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const FORGE_MANIFEST: &str = "META-INF/mods.toml";
pub const NEOFORGE_MANIFEST: &str = "META-INF/neoforge.mods.toml";
pub const FABRIC_MANIFEST: &str = "fabric.mod.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Forge,
    NeoForge,
    Fabric,
}

impl LoaderKind {
    /// Loaders in detection priority order
    pub const ALL: [LoaderKind; 3] = [LoaderKind::Forge, LoaderKind::NeoForge, LoaderKind::Fabric];

    /// Manifest location relative to the source root
    pub fn manifest(&self) -> &'static str {
        match self {
            LoaderKind::Forge => FORGE_MANIFEST,
            LoaderKind::NeoForge => NEOFORGE_MANIFEST,
            LoaderKind::Fabric => FABRIC_MANIFEST,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Forge => "forge",
            LoaderKind::NeoForge => "neoforge",
            LoaderKind::Fabric => "fabric",
        }
    }
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `META-INF/mods.toml` and `META-INF/neoforge.mods.toml`
#[derive(Debug, Deserialize)]
pub struct ModsToml {
    #[serde(default)]
    pub mods: Vec<ModEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModEntry {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// `fabric.mod.json`
#[derive(Debug, Deserialize)]
pub struct FabricModJson {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Parsed loader manifest, tagged with the loader it belongs to
#[derive(Debug)]
pub enum ModMetadata {
    Forge { path: PathBuf, manifest: ModsToml },
    NeoForge { path: PathBuf, manifest: ModsToml },
    Fabric { path: PathBuf, manifest: FabricModJson },
}

impl ModMetadata {
    /// Read the first manifest found under `root`, in loader priority order.
    /// Nothing is cached; every call reads the file again.
    pub fn load(root: &Path) -> Result<Self> {
        for kind in LoaderKind::ALL {
            let path = root.join(kind.manifest());
            if path.is_file() {
                return Self::read(kind, path);
            }
        }

        Err(Error::MissingMetadata {
            root: root.to_path_buf(),
        })
    }

    fn read(kind: LoaderKind, path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let metadata = match kind {
            LoaderKind::Forge => ModMetadata::Forge {
                manifest: toml::from_str(&content)?,
                path,
            },
            LoaderKind::NeoForge => ModMetadata::NeoForge {
                manifest: toml::from_str(&content)?,
                path,
            },
            LoaderKind::Fabric => ModMetadata::Fabric {
                manifest: json5::from_str(&content)?,
                path,
            },
        };
        Ok(metadata)
    }

    pub fn kind(&self) -> LoaderKind {
        match self {
            ModMetadata::Forge { .. } => LoaderKind::Forge,
            ModMetadata::NeoForge { .. } => LoaderKind::NeoForge,
            ModMetadata::Fabric { .. } => LoaderKind::Fabric,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ModMetadata::Forge { path, .. }
            | ModMetadata::NeoForge { path, .. }
            | ModMetadata::Fabric { path, .. } => path,
        }
    }

    /// Mod version: `mods[0].version` or the top-level fabric `version`
    pub fn version(&self) -> Result<&str> {
        match self {
            ModMetadata::Forge { path, manifest } | ModMetadata::NeoForge { path, manifest } => {
                first_mod(path, manifest)?
                    .version
                    .as_deref()
                    .ok_or_else(|| Error::malformed(path, "mods[0] has no `version`"))
            }
            ModMetadata::Fabric { path, manifest } => manifest
                .version
                .as_deref()
                .ok_or_else(|| Error::malformed(path, "missing top-level `version`")),
        }
    }

    /// Human readable name: `mods[0].displayName` or the fabric `name`
    pub fn display_name(&self) -> Result<&str> {
        match self {
            ModMetadata::Forge { path, manifest } | ModMetadata::NeoForge { path, manifest } => {
                first_mod(path, manifest)?
                    .display_name
                    .as_deref()
                    .ok_or_else(|| Error::malformed(path, "mods[0] has no `displayName`"))
            }
            ModMetadata::Fabric { path, manifest } => manifest
                .name
                .as_deref()
                .ok_or_else(|| Error::malformed(path, "missing top-level `name`")),
        }
    }
}

fn first_mod<'a>(path: &Path, manifest: &'a ModsToml) -> Result<&'a ModEntry> {
    manifest
        .mods
        .first()
        .ok_or_else(|| Error::malformed(path, "`mods` list is empty"))
}
