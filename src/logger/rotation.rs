//! Log file rotation

use crate::logger::config::{RotationConfig, RotationStrategy};
use crate::logger::error::LoggerError;
use jiff::{SignedDuration, Timestamp, Zoned};
use std::fs;
use std::path::{Path, PathBuf};

/// Decides when the active file rolls over and prunes old rotations
pub struct RotationManager {
    config: RotationConfig,
    last_rotation: Timestamp,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            last_rotation: Timestamp::now(),
        }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        match self.config.strategy {
            RotationStrategy::Size => current_file_size >= self.config.max_size,
            RotationStrategy::Daily => {
                let elapsed = Timestamp::now().duration_since(self.last_rotation);
                elapsed >= SignedDuration::from_hours(24)
            }
        }
    }

    /// Move the active file aside and drop rotations beyond `max_files`.
    pub fn rotate(&mut self, current_path: &Path) -> Result<(), LoggerError> {
        if current_path.exists() {
            let rotated = Self::rotated_path(current_path);
            fs::rename(current_path, &rotated).map_err(|e| {
                LoggerError::rotation(format!(
                    "rename {} -> {}: {}",
                    current_path.display(),
                    rotated.display(),
                    e
                ))
            })?;
        }

        self.last_rotation = Timestamp::now();
        self.prune(current_path)
    }

    /// `bot.log` -> `bot.20261019_101500_000123456-000.log`
    fn rotated_path(base_path: &Path) -> PathBuf {
        let now = Zoned::now();
        let stamp = format!(
            "{}_{:09}",
            now.strftime("%Y%m%d_%H%M%S"),
            now.subsec_nanosecond()
        );
        Self::rotated_path_with_stamp(base_path, &stamp)
    }

    /// Every part of the name is fixed width, so names sort chronologically
    /// even when a counter is needed.
    fn rotated_path_with_stamp(base_path: &Path, stamp: &str) -> PathBuf {
        let stem = base_path.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base_path.extension().map(|e| e.to_string_lossy());

        let name = |n: u32| match &ext {
            Some(ext) => format!("{stem}.{stamp}-{n:03}.{ext}"),
            None => format!("{stem}.{stamp}-{n:03}"),
        };

        let mut n = 0;
        let mut candidate = base_path.with_file_name(name(n));
        while candidate.exists() {
            n += 1;
            candidate = base_path.with_file_name(name(n));
        }
        candidate
    }

    pub(crate) fn rotated_files(base_path: &Path) -> Result<Vec<PathBuf>, LoggerError> {
        let parent = match base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            base_path.file_stem().unwrap_or_default().to_string_lossy()
        );
        let active = base_path.file_name().unwrap_or_default();

        let mut files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let name = path.file_name().unwrap_or_default();
                name != active && name.to_string_lossy().starts_with(&prefix)
            })
            .collect();

        // timestamped names sort chronologically
        files.sort();
        Ok(files)
    }

    fn prune(&self, base_path: &Path) -> Result<(), LoggerError> {
        let files = Self::rotated_files(base_path)?;
        let excess = files.len().saturating_sub(self.config.max_files);
        for old in files.iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}
