//! Module discovery
//!
//! Walks a directory tree and returns candidate resource paths whose path
//! relative to the scan root matches an include pattern and no exclude pattern.

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::LoaderOptions;
use crate::module::registry::pattern::PatternSet;
use crate::module::traits::ModuleError;
use crate::utils::result_to_option;

/// Module discovery scanner
#[derive(Debug, Clone)]
pub struct ModuleDiscovery {
    /// Base directory to scan for modules
    base_path: PathBuf,
    include: PatternSet,
    exclude: PatternSet,
    recursive: bool,
}

impl ModuleDiscovery {
    /// Create a new scanner; fails if any pattern does not compile
    pub fn new<P, S>(
        base_path: P,
        include: &[S],
        exclude: &[S],
        recursive: bool,
    ) -> Result<Self, ModuleError>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        Ok(Self {
            base_path: absolute(base_path.as_ref()),
            include: PatternSet::new(include)?,
            exclude: PatternSet::new(exclude)?,
            recursive,
        })
    }

    /// Build a scanner from loader options
    ///
    /// Strict options reject invalid patterns, otherwise they are dropped with a warning.
    pub fn from_options(options: &LoaderOptions) -> Result<Self, ModuleError> {
        if options.strict {
            return Self::new(
                &options.base_path,
                &options.include,
                &options.exclude,
                options.recursive,
            );
        }

        Ok(Self {
            base_path: absolute(&options.base_path),
            include: PatternSet::lenient(&options.include),
            exclude: PatternSet::lenient(&options.exclude),
            recursive: options.recursive,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Discover candidate module files
    ///
    /// A missing base directory yields no candidates. Unreadable entries are
    /// skipped. Entries are visited in file-name order.
    pub fn discover(&self) -> Vec<PathBuf> {
        info!("Scanning for modules in {:?}", self.base_path);

        if !self.base_path.exists() {
            warn!("Directory {:?} does not exist", self.base_path);
            return Vec::new();
        }

        let mut found = Vec::new();
        self.walk(&self.base_path, &mut found);

        info!("Found {} potential module files", found.len());
        found
    }

    fn walk(&self, dir: &Path, found: &mut Vec<PathBuf>) {
        let context = format!("Failed to read directory {:?}", dir);
        let Some(entries) = result_to_option(fs::read_dir(dir), &context) else {
            return;
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!("Failed to read directory entry in {:?}: {}", dir, e);
                    None
                }
            })
            .collect();
        paths.sort();

        for path in paths {
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            if metadata.is_dir() {
                if !self.recursive {
                    continue;
                }
                // Symlinked directories could loop back into the tree
                if path.symlink_metadata().map(|m| m.file_type().is_symlink()).unwrap_or(false) {
                    debug!("Not following symlinked directory {:?}", path);
                    continue;
                }
                self.walk(&path, found);
            } else if metadata.is_file() {
                let Some(relative) = self.relative_path(&path) else {
                    continue;
                };
                if self.include.is_match(&relative) && !self.exclude.is_match(&relative) {
                    debug!("Candidate module file: {}", relative);
                    found.push(path);
                }
            }
        }
    }

    /// Path relative to the scan root, `/`-separated on every platform
    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }
}

/// Scan `base_path` for files matching `include` and not `exclude`
pub fn scan<P, S>(
    base_path: P,
    include: &[S],
    exclude: &[S],
    recursive: bool,
) -> Result<Vec<PathBuf>, ModuleError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    Ok(ModuleDiscovery::new(base_path, include, exclude, recursive)?.discover())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
