//! # Context: Configuration and Views
//!
//! The CLI (or any other client) starts by building a [`KfilterContext`]:
//! the merged configuration plus the directories named views are looked up in.
//!
//! ## Project Detection
//!
//! [`find_project_dir`] walks up from `CWD` looking for a `.kfilter/`
//! directory, stopping at `HOME` or the filesystem root. The closest one wins,
//! so a repository can ship its own views and matcher tables.
//!
//! ## Global Directory
//!
//! The OS-appropriate config directory (via the `directories` crate), unless
//! `KFILTER_CONFIG_DIR` is set. The override is primarily used by tests to
//! isolate global state.
//!
//! ## Views
//!
//! [`KfilterContext::resolve_view`] accepts either a path to a view file or a
//! bare view name. A name is looked up as `views/<name>.toml` (then `.json`)
//! in the project directory first, then in the global directory.

use std::path::{Path, PathBuf};

use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::{BaseDirs, ProjectDirs};

use crate::config::KfilterConfig;
use crate::error::{KfilterError, Result};
use crate::view::ViewDefinition;

pub const PROJECT_DIR_NAME: &str = ".kfilter";
pub const CONFIG_FILE_NAME: &str = "kfilter.toml";

pub struct KfilterContext {
    pub config: KfilterConfig,
    pub project_dir: Option<PathBuf>,
    pub global_dir: PathBuf,
}

/// Find the closest `.kfilter` directory at or above `cwd`.
/// Returns None if none is found before reaching home or root.
pub fn find_project_dir(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// The global config directory, honoring `KFILTER_CONFIG_DIR`.
pub fn global_config_dir() -> PathBuf {
    std::env::var("KFILTER_CONFIG_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            ProjectDirs::from("io", "konflux", "kfilter")
                .map(|dirs| dirs.config_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from(PROJECT_DIR_NAME))
}

/// Load configuration and locate the project directory.
///
/// The global file provides defaults and the project file overrides it. A
/// missing or unreadable file falls back to the compiled defaults.
pub fn initialize(cwd: &Path) -> KfilterContext {
    let project_dir = find_project_dir(cwd);
    let global_dir = global_config_dir();

    let mut search_paths = vec![SearchPath::Path(global_dir.clone())];
    if let Some(dir) = &project_dir {
        search_paths.push(SearchPath::Path(dir.clone()));
    }

    let config: KfilterConfig = Clapfig::builder()
        .app_name("kfilter")
        .file_name(CONFIG_FILE_NAME)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring invalid config");
            KfilterConfig::default()
        });

    tracing::debug!(
        project = ?project_dir,
        global = %global_dir.display(),
        "initialized context"
    );

    KfilterContext {
        config,
        project_dir,
        global_dir,
    }
}

impl KfilterContext {
    /// Directories searched for named views, in priority order.
    pub fn view_dirs(&self) -> Vec<PathBuf> {
        self.project_dir
            .iter()
            .map(|dir| dir.join("views"))
            .chain(std::iter::once(self.global_dir.join("views")))
            .collect()
    }

    /// Resolve a view argument (a path or a bare name) to a file.
    pub fn resolve_view(&self, view: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(view);
        if direct.is_file() {
            return Ok(direct);
        }

        for dir in self.view_dirs() {
            for ext in ["toml", "json"] {
                let candidate = dir.join(format!("{view}.{ext}"));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(KfilterError::InvalidInput(format!("view not found: {view}")))
    }

    pub fn load_view(&self, view: &str) -> Result<ViewDefinition> {
        let path = self.resolve_view(view)?;
        ViewDefinition::load(&path)
    }
}
