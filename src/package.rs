use crate::archive;
use crate::config::Config;
use crate::context::Context;
use crate::error::Error;
use crate::metadata::{LoaderKind, ModMetadata};
use crate::result::Result;
use crate::tpl::Tpl;
use crate::utils;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    DataPack,
    ResourcePack,
    Mod,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::DataPack => "data_pack",
            PackageType::ResourcePack => "resource_pack",
            PackageType::Mod => "mod",
        }
    }

    /// Filename component identifying the package kind
    pub fn suffix(&self) -> &'static str {
        match self {
            PackageType::DataPack => "data",
            PackageType::ResourcePack => "resource",
            PackageType::Mod => "mod",
        }
    }

    /// Mods are loaded as jars; packs are plain zips
    pub fn extension(&self) -> &'static str {
        match self {
            PackageType::Mod => "jar",
            PackageType::DataPack | PackageType::ResourcePack => "zip",
        }
    }

    /// Paths under the source root that make up this package
    pub fn entries(&self) -> &'static [&'static str] {
        match self {
            PackageType::DataPack => &["data", "pack.png", "pack.mcmeta"],
            PackageType::ResourcePack => &["assets", "pack.png", "pack.mcmeta"],
            PackageType::Mod => &[
                "assets",
                "data",
                "META-INF",
                "pack.png",
                "pack.mcmeta",
                "fabric.mod.json",
            ],
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data_pack" => Ok(PackageType::DataPack),
            "resource_pack" => Ok(PackageType::ResourcePack),
            "mod" => Ok(PackageType::Mod),
            other => Err(Error::UnknownPackageType(other.to_string())),
        }
    }
}

/// Builds data pack, resource pack and mod archives from per-version source roots
pub struct Packager<'a> {
    ctx: &'a Context,
    config: &'a Config,
}

impl<'a> Packager<'a> {
    pub fn new(ctx: &'a Context, config: &'a Config) -> Self {
        Self { ctx, config }
    }

    pub fn resolve_metadata(&self, game_version: &str) -> Result<(LoaderKind, ModMetadata)> {
        let root = self.config.versions.root(game_version)?;
        let metadata = ModMetadata::load(root)?;
        Ok((metadata.kind(), metadata))
    }

    pub fn resolve_version(&self, game_version: &str) -> Result<String> {
        let (kind, metadata) = self.resolve_metadata(game_version)?;
        if self.ctx.verbose {
            cliclack::log::remark(format!(
                "Using {} metadata from {}",
                kind,
                metadata.path().display()
            ))?;
        }
        Ok(metadata.version()?.to_string())
    }

    /// Existing source paths for `package_type`; missing ones are skipped
    pub fn resolve_file_set(
        &self,
        package_type: PackageType,
        game_version: &str,
    ) -> Result<Vec<PathBuf>> {
        let root = self.config.versions.root(game_version)?;
        Ok(package_type
            .entries()
            .iter()
            .map(|entry| root.join(entry))
            .filter(|path| path.exists())
            .collect())
    }

    pub fn resolve_output_filename(
        &self,
        package_type: PackageType,
        package_version: &str,
        game_version: &str,
    ) -> Result<String> {
        let (_, metadata) = self.resolve_metadata(game_version)?;
        let name = metadata.display_name()?.replace(' ', "_");

        let mut tpl = Tpl::new();
        tpl.register("NAME", name);
        tpl.register("SUFFIX", package_type.suffix());
        tpl.register("GAME_VERSION", game_version);
        tpl.register("VERSION", package_version);

        Ok(format!(
            "{}.{}",
            tpl.parse(&self.config.filename),
            package_type.extension()
        ))
    }

    /// Write `{output-folder}/{package_version}/{filename}`, replacing any previous archive
    pub fn package(&self, package_type: PackageType, game_version: &str) -> Result<()> {
        let package_version = self.resolve_version(game_version)?;
        let filename = self.resolve_output_filename(package_type, &package_version, game_version)?;
        let sources = self.resolve_file_set(package_type, game_version)?;
        let root = self.config.versions.root(game_version)?;

        let output_dir = self.config.output_folder.join(&package_version);
        utils::ensure_dir(&output_dir)?;

        let output_path = output_dir.join(&filename);
        if utils::remove_file_if_exists(&output_path)? && self.ctx.verbose {
            cliclack::log::remark(format!("Replacing {}", output_path.display()))?;
        }

        if self.ctx.verbose {
            cliclack::log::remark(format!(
                "Collecting {} from {}",
                package_type,
                root.display()
            ))?;
        }

        let entries = archive::create_zip(self.ctx, root, &sources, &output_path)?;

        cliclack::log::success(format!(
            "Packaged {} for version {} ({}) to {} [{} entries]",
            package_type, package_version, game_version, filename, entries
        ))?;

        Ok(())
    }
}
