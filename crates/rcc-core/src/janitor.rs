//! Eviction of ephemeral artifacts
//!
//! A sweep runs in a detached background thread on a random subset of
//! invocations and deletes cache files not accessed for a while. The invoking
//! process never waits for it.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use walkdir::WalkDir;

use crate::config::JanitorConfig;
use crate::error::{RccError, Result};
use crate::layout::{BINARY_EXT, SOURCE_EXT, STAGING_EXT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub failed: usize,
}

/// Sources, binaries and leftover staging binaries
fn is_cache_artifact(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext == SOURCE_EXT || ext == BINARY_EXT || ext == STAGING_EXT
    )
}

fn cache_files(dir: &Path) -> impl Iterator<Item = (PathBuf, fs::Metadata)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_cache_artifact(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some((entry.into_path(), metadata))
        })
}

fn remove(path: &Path, report: &mut SweepReport) {
    match fs::remove_file(path) {
        Ok(()) => report.removed += 1,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to evict");
            report.failed += 1;
        }
    }
}

/// Delete artifacts in `dir` last accessed more than `max_age` before `now`
pub fn sweep(dir: &Path, max_age: Duration, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();
    for (path, metadata) in cache_files(dir) {
        let Ok(accessed) = metadata.accessed().or_else(|_| metadata.modified()) else {
            continue;
        };
        let accessed: DateTime<Utc> = accessed.into();
        if now - accessed > max_age {
            remove(&path, &mut report);
        }
    }
    report
}

/// Delete every artifact in `dir`
pub fn clean_all(dir: &Path) -> Result<SweepReport> {
    if !dir.is_dir() {
        return Err(RccError::installation("cache directory", dir));
    }
    let mut report = SweepReport::default();
    for (path, _) in cache_files(dir) {
        remove(&path, &mut report);
    }
    tracing::info!(removed = report.removed, failed = report.failed, "cache cleaned");
    Ok(report)
}

/// One chance in `one_in`; zero never sweeps
pub fn should_sweep<R: Rng>(rng: &mut R, one_in: u32) -> bool {
    one_in != 0 && rng.gen_range(0..one_in) == 0
}

/// Maybe start a background sweep of `dir`.
///
/// The returned handle may be dropped; the thread then runs detached and dies
/// with the process. A sweep cut short that way leaves only complete files
/// behind, and whatever it did not reach is swept by a later invocation.
pub fn maybe_spawn(dir: &Path, config: &JanitorConfig) -> Option<thread::JoinHandle<SweepReport>> {
    if !should_sweep(&mut rand::thread_rng(), config.one_in) {
        return None;
    }
    let dir = dir.to_path_buf();
    let max_age = Duration::days(i64::from(config.max_age_days));
    tracing::debug!(dir = %dir.display(), "starting cache sweep");
    Some(thread::spawn(move || {
        let report = sweep(&dir, max_age, Utc::now());
        tracing::debug!(removed = report.removed, failed = report.failed, "cache sweep finished");
        report
    }))
}
