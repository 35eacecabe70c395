use crate::context::Context;
use crate::error::Error;
use crate::package::PackageType;
use crate::result::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the project root when none is given explicitly
pub const CONFIG_FILE: &str = "packager.toml";

pub const DEFAULT_OUTPUT_FOLDER: &str = "versions";
pub const DEFAULT_FILENAME: &str = "$NAME-$SUFFIX-$GAME_VERSION-$VERSION";

/// Raw `packager.toml` contents; every key is optional
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(rename = "output-folder", default)]
    pub output_folder: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub versions: Option<BTreeMap<String, String>>,

    #[serde(rename = "package", default)]
    pub plan: Option<Vec<PlanStep>>,
}

/// A single `package(type, game_version)` call of the driver plan
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PlanStep {
    #[serde(rename = "type")]
    pub package_type: PackageType,

    #[serde(rename = "game-version")]
    pub game_version: String,
}

impl PlanStep {
    pub fn new(package_type: PackageType, game_version: impl Into<String>) -> Self {
        Self {
            package_type,
            game_version: game_version.into(),
        }
    }
}

/// Fixed mapping from game version label to source root, read-only once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMap {
    roots: BTreeMap<String, PathBuf>,
}

impl VersionMap {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PathBuf>,
    {
        Self {
            roots: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Source root for a game version, or `UnsupportedVersion`
    pub fn root(&self, game_version: &str) -> Result<&Path> {
        self.roots
            .get(game_version)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::UnsupportedVersion(game_version.to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Resolved packaging configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub versions: VersionMap,
    pub output_folder: PathBuf,
    pub filename: String,
    pub plan: Vec<PlanStep>,
}

impl Config {
    /// Built-in configuration rooted at `base_dir`
    pub fn defaults(base_dir: &Path) -> Self {
        Self::from_toml(base_dir, ConfigToml::default())
    }

    /// Load `packager.toml` (or the file named in the context), falling back to defaults
    pub fn load(ctx: &Context) -> Result<Self> {
        let path = match &ctx.config_path {
            Some(explicit) => {
                let path = ctx.base_dir.join(explicit);
                if !path.is_file() {
                    return Err(Error::ConfigNotFound(path));
                }
                path
            }
            None => {
                let path = ctx.base_dir.join(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::defaults(&ctx.base_dir));
                }
                path
            }
        };

        let content = fs::read_to_string(&path)?;
        Self::parse(&ctx.base_dir, &content)
    }

    pub fn parse(base_dir: &Path, content: &str) -> Result<Self> {
        let raw: ConfigToml = toml::from_str(content)?;
        let config = Self::from_toml(base_dir, raw);
        if config.versions.is_empty() {
            return Err(Error::InvalidConfig(
                "[versions] must map at least one game version to a source root".to_string(),
            ));
        }
        Ok(config)
    }

    fn from_toml(base_dir: &Path, raw: ConfigToml) -> Self {
        let versions = match raw.versions {
            Some(versions) => VersionMap::new(
                versions
                    .into_iter()
                    .map(|(label, root)| (label, base_dir.join(root))),
            ),
            None => VersionMap::new(
                [("1.20.1", "1.20.1/src/main"), ("1.21.1", "1.21.1/src/main")]
                    .into_iter()
                    .map(|(label, root)| (label, base_dir.join(root))),
            ),
        };

        let output_folder = base_dir.join(
            raw.output_folder
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_FOLDER),
        );

        let filename = raw
            .filename
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let plan = raw.plan.unwrap_or_else(|| {
            ["1.20.1", "1.21.1"]
                .into_iter()
                .flat_map(|version| {
                    [
                        PlanStep::new(PackageType::ResourcePack, version),
                        PlanStep::new(PackageType::Mod, version),
                    ]
                })
                .collect()
        });

        Config {
            versions,
            output_folder,
            filename,
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let base = Path::new("/project");
        let config = Config::defaults(base);

        assert_eq!(config.output_folder, base.join("versions"));
        assert_eq!(config.filename, DEFAULT_FILENAME);
        assert_eq!(
            config.versions.root("1.20.1").unwrap(),
            base.join("1.20.1/src/main")
        );
        assert_eq!(
            config.plan,
            vec![
                PlanStep::new(PackageType::ResourcePack, "1.20.1"),
                PlanStep::new(PackageType::Mod, "1.20.1"),
                PlanStep::new(PackageType::ResourcePack, "1.21.1"),
                PlanStep::new(PackageType::Mod, "1.21.1"),
            ]
        );
    }

    #[test]
    fn test_unknown_version_is_unsupported() {
        let config = Config::defaults(Path::new("/project"));
        let err = config.versions.root("1.19").unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(v) if v == "1.19"));
    }

    #[test]
    fn test_parse_overrides() {
        let base = Path::new("/project");
        let config = Config::parse(
            base,
            r#"
output-folder = "dist"
filename = "$NAME-$VERSION"

[versions]
"1.20.4" = "forge/src/main"

[[package]]
type = "data_pack"
game-version = "1.20.4"
"#,
        )
        .unwrap();

        assert_eq!(config.output_folder, base.join("dist"));
        assert_eq!(config.filename, "$NAME-$VERSION");
        assert_eq!(config.versions.labels().collect::<Vec<_>>(), vec!["1.20.4"]);
        assert_eq!(config.plan, vec![PlanStep::new(PackageType::DataPack, "1.20.4")]);
    }

    #[test]
    fn test_empty_versions_rejected() {
        let err = Config::parse(Path::new("/project"), "[versions]\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_package_type_rejected() {
        let err = Config::parse(
            Path::new("/project"),
            "[[package]]\ntype = \"texture_pack\"\ngame-version = \"1.20.1\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let config = Config::load(&ctx).unwrap();
        assert_eq!(config.plan.len(), 4);
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(
            dir.path().to_path_buf(),
            Some(PathBuf::from("custom.toml")),
            false,
        );
        let err = Config::load(&ctx).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[versions]\n\"1.21.1\" = \"neoforge/src/main\"\n",
        )
        .unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let config = Config::load(&ctx).unwrap();
        assert_eq!(
            config.versions.root("1.21.1").unwrap(),
            dir.path().join("neoforge/src/main")
        );
    }
}
