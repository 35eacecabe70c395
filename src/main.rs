mod archive;
mod args;
mod config;
mod context;
mod error;
mod metadata;
mod package;
mod result;
mod tpl;
mod utils;

use args::Args;
use config::{Config, PlanStep};
use context::Context;
use package::Packager;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let Args {
        verbose,
        path,
        config,
        single,
    } = Args::parse()?;

    let base_dir = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let ctx = Context::new(base_dir, config, verbose);

    cliclack::intro("mod-packager")?;

    let config = Config::load(&ctx)?;
    if verbose {
        let labels: Vec<&str> = config.versions.labels().collect();
        cliclack::log::remark(format!("Game versions: {}", labels.join(", ")))?;
    }

    let plan = match single {
        Some((package_type, game_version)) => vec![PlanStep::new(package_type, game_version)],
        None => config.plan.clone(),
    };

    // The first failure aborts the remaining steps.
    let packager = Packager::new(&ctx, &config);
    for step in &plan {
        packager.package(step.package_type, &step.game_version)?;
    }

    cliclack::outro(format!(
        "{} package(s) written to {}",
        plan.len(),
        display_relative(&ctx, &config.output_folder)
    ))?;
    Ok(())
}

fn display_relative(ctx: &Context, path: &Path) -> String {
    path.strip_prefix(&ctx.base_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
