use crate::error::Error;
use crate::package::PackageType;
use crate::result::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for the packager
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Path to alternative configuration file
    pub config: Option<PathBuf>,

    /// Package a single type/version pair instead of running the plan
    pub single: Option<(PackageType, String)>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Result<Self> {
        let matches = command().get_matches();
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &clap::ArgMatches) -> Result<Self> {
        let package_type = matches
            .get_one::<String>("type")
            .map(|s| s.parse::<PackageType>())
            .transpose()?;
        let game_version = matches.get_one::<String>("game-version").cloned();

        let single = match (package_type, game_version) {
            (Some(package_type), Some(game_version)) => Some((package_type, game_version)),
            (None, None) => None,
            _ => {
                return Err(Error::custom(
                    "--type and --game-version must be given together",
                ));
            }
        };

        Ok(Self {
            verbose: matches.get_flag("verbose"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            single,
        })
    }
}

fn command() -> Command {
    Command::new("mod-packager")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Packages data packs, resource packs and mod jars for each supported game version")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("PATH")
                .help("Project root containing the per-version source trees"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to alternative configuration file (default: packager.toml)"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .value_name("TYPE")
                .help("Package type to build (data_pack, resource_pack or mod) instead of running the configured plan"),
        )
        .arg(
            Arg::new("game-version")
                .short('g')
                .long("game-version")
                .value_name("VERSION")
                .help("Game version to build instead of running the configured plan"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
}
