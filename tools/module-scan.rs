//! Scan a directory of module manifests and report the load plan
//!
//! Discovers `*.module.toml` manifests, orders them by weight and
//! dependencies, optionally instantiates them, and prints one line per module.
//!
//! Usage:
//!   module-scan --base-path <dir> [--no-auto-load] [--serial] [--strict] [--json]

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use bllvm_module_loader::utils::init_logging_from_config;
use bllvm_module_loader::{LoaderConfig, LoadSummary, ModuleManager};

const MANIFEST_PATTERN: &str = "**/*.module.toml";

#[derive(Parser, Debug)]
#[command(name = "module-scan", about = "Discover and load module manifests")]
struct Args {
    /// Directory to scan (defaults to ./src/modules)
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Include glob, repeatable
    #[arg(long)]
    include: Vec<String>,

    /// Exclude glob, repeatable (added to the defaults)
    #[arg(long)]
    exclude: Vec<String>,

    /// Only scan the top level of the base path
    #[arg(long)]
    no_recursive: bool,

    /// Build the registry without instantiating modules
    #[arg(long)]
    no_auto_load: bool,

    /// Instantiate modules one at a time
    #[arg(long)]
    serial: bool,

    /// Reject duplicates, missing dependencies and invalid descriptors
    #[arg(long)]
    strict: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Loader configuration file (TOML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit non-zero if any module failed to load
    #[arg(long)]
    fail_on_error: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(LoaderConfig, bool, bool)> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_file(path)?,
            None => {
                let mut config = LoaderConfig::default();
                config.loader.include = vec![MANIFEST_PATTERN.to_string()];
                config
            }
        };

        let loader = &mut config.loader;
        loader.apply_env_overrides();
        if let Some(base_path) = self.base_path {
            loader.base_path = base_path;
        }
        if !self.include.is_empty() {
            loader.include = self.include;
        }
        loader.exclude.extend(self.exclude);
        loader.recursive &= !self.no_recursive;
        loader.auto_load &= !self.no_auto_load;
        loader.parallel &= !self.serial;
        loader.strict |= self.strict;

        Ok((config, self.json, self.fail_on_error))
    }
}

fn print_table(summaries: &[LoadSummary]) {
    println!("{:<32} {:<8} {}", "MODULE", "LOADED", "ERROR");
    for summary in summaries {
        println!(
            "{:<32} {:<8} {}",
            summary.name,
            summary.loaded,
            summary.error.as_deref().unwrap_or("-")
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, json, fail_on_error) = Args::parse().into_config()?;
    init_logging_from_config(config.logging.as_ref());

    info!("Module scan starting in {:?}", config.loader.base_path);

    let mut manager = ModuleManager::with_manifests();
    let results = match manager.scan_and_load(&config.loader).await {
        Ok(results) => results,
        Err(e) => {
            error!("Module scan aborted: {}", e);
            std::process::exit(2);
        }
    };

    let summaries: Vec<LoadSummary> = results.iter().map(|r| r.summary()).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_table(&summaries);
    }

    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    if failed > 0 {
        error!("{} of {} modules failed to load", failed, summaries.len());
        if fail_on_error {
            std::process::exit(1);
        }
    }

    Ok(())
}
