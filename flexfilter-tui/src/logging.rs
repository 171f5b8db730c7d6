//! Per-catalog log files.
//!
//! A run over `issues.json` logs to `issues.log`, in the directory passed
//! with `--log-dir` or else in the platform cache directory. Starting a new
//! run archives the previous `issues.log` as `issues.<timestamp>.log` and
//! prunes old archives of that catalog only.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::AppError;

/// Archived logs kept per catalog.
const KEEP_ARCHIVED: usize = 10;

/// Sortable timestamp; archives are ordered by name.
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFiles {
    dir: PathBuf,
    stem: String,
}

impl LogFiles {
    /// Log files for `catalog`, placed in `dir` or the cache directory.
    ///
    /// Returns `None` when no directory is given and the platform has no
    /// home directory to derive one from.
    pub fn for_catalog(catalog: &Path, dir: Option<PathBuf>) -> Option<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None => ProjectDirs::from("dev", "flexfilter", "flexfilter-tui")?
                .cache_dir()
                .to_path_buf(),
        };
        let stem = catalog
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "catalog".to_string());
        Some(Self { dir, stem })
    }

    /// Log file of the current run.
    pub fn current(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.stem))
    }

    /// Archive the previous run's log and prune old archives.
    pub fn rotate(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let current = self.current();
        if current.exists() {
            let stamp = chrono::Local::now().format(STAMP_FORMAT);
            fs::rename(&current, self.dir.join(format!("{}.{}.log", self.stem, stamp)))?;
        }

        self.prune()?;
        Ok(())
    }

    /// Archives of this catalog, oldest first.
    fn archived(&self) -> io::Result<Vec<PathBuf>> {
        let mut archives: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| self.is_archive(path))
            .collect();
        archives.sort();
        Ok(archives)
    }

    /// Matches `<stem>.<timestamp>.log` but not logs of other catalogs whose
    /// name merely starts with the same stem.
    fn is_archive(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.strip_prefix(self.stem.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(".log"))
            .is_some_and(|stamp| {
                !stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit() || c == 'T')
            })
    }

    /// Delete all but the newest archives. Returns how many were removed.
    fn prune(&self) -> io::Result<usize> {
        let archives = self.archived()?;
        let excess = archives.len().saturating_sub(KEEP_ARCHIVED);
        let removed = archives
            .iter()
            .take(excess)
            .filter(|path| fs::remove_file(path).is_ok())
            .count();
        Ok(removed)
    }

    /// Rotate, then route the `log` facade into the current file.
    pub fn init(&self) -> Result<(), AppError> {
        self.rotate()?;
        let file = File::create(self.current())?;
        WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
        Ok(())
    }
}
