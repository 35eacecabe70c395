use std::path::PathBuf;

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (show every archived entry)
    pub verbose: bool,

    /// Project root; source roots and the output folder resolve against it
    pub base_dir: PathBuf,

    /// Explicit configuration file, if one was requested on the command line
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(base_dir: PathBuf, config_path: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            verbose,
            base_dir,
            config_path,
        }
    }
}
