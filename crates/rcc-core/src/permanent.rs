//! Named artifacts that are never evicted
//!
//! `permanent/<name>.cpp|.bin|.desc`. A name is an explicit pin: creating it
//! always recompiles. The description is written once and survives failed
//! rebuilds; only removal clears it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::cache::compile_pair;
use crate::compiler::CompilerCommandBuilder;
use crate::error::{RccError, Result};
use crate::layout::{CacheLayout, BINARY_EXT, DESC_EXT, SOURCE_EXT};
use crate::process::{run_binary, RunStatus};
use crate::request::BuildRequest;
use crate::suggest::suggest_similar;
use crate::template::Template;

/// Description stored when none was given
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermanentState {
    Built,
    /// Source or description present, binary missing
    BuildFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermanentListing {
    pub name: String,
    pub description: Option<String>,
    pub state: PermanentState,
}

/// Outcome of removing a batch of permanents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<String>,
    /// Names with nothing to remove or whose files could not be removed
    pub failed: Vec<String>,
    /// One message per file that could not be removed
    pub errors: Vec<String>,
}

impl RemovalReport {
    pub fn summary(&self) -> String {
        format!(
            "Removed {} permanent(s), {} failed.",
            self.removed.len(),
            self.failed.len()
        )
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reject names that would escape the permanent directory or hide the files
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        crate::bail_invalid!("permanent name", "(empty)");
    }
    if name.starts_with('.') || name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        crate::bail_invalid!("permanent name", name);
    }
    Ok(())
}

pub struct PermanentStore<'a> {
    layout: &'a CacheLayout,
}

impl<'a> PermanentStore<'a> {
    pub fn new(layout: &'a CacheLayout) -> Self {
        Self { layout }
    }

    /// Compile `request` as the permanent it names, unconditionally.
    ///
    /// Returns `false` if compilation failed; the failure has been reported.
    /// A stored description is only replaced by an explicitly given one after
    /// a successful build.
    #[tracing::instrument(skip_all, fields(name = request.permanent().unwrap_or_default()))]
    pub fn create(&self, request: &BuildRequest) -> Result<bool> {
        let Some(name) = request.permanent() else {
            return Err(RccError::Other(
                "no permanent name given for creation".to_string(),
            ));
        };
        validate_name(name)?;
        if !request.has_code() {
            return Err(RccError::Other(
                "no code to compile as permanent program".to_string(),
            ));
        }

        let builder = CompilerCommandBuilder::new(self.layout, request.compiler())?;
        let template = Template::load(&self.layout.template_path())?;
        let rendered = template.render_request(request)?;
        let entry = self.layout.permanent_entry(name);

        let given = request.description().filter(|d| !d.is_empty());
        let mut description_written = false;
        if let Some(desc) = given {
            if !entry.description.exists() {
                write_description(&entry.description, desc)?;
                description_written = true;
            }
        }

        if !compile_pair(&builder, request, &entry.pair, &rendered, &[], false)? {
            return Ok(false);
        }

        match given {
            Some(desc) if !description_written => write_description(&entry.description, desc)?,
            None if !entry.description.exists() => {
                write_description(&entry.description, DEFAULT_DESCRIPTION)?
            }
            _ => {}
        }
        tracing::info!(name, "permanent created");
        Ok(true)
    }

    /// Every stored permanent, sorted by name
    pub fn list(&self) -> Result<Vec<PermanentListing>> {
        let dir = self.layout.permanent_dir();
        let mut found: BTreeMap<String, (bool, Option<String>)> = BTreeMap::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry =
                entry.map_err(|e| RccError::io_operation("list permanents", dir.display(), e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };

            let slot = match ext {
                SOURCE_EXT | BINARY_EXT | DESC_EXT => {
                    found.entry(stem.to_string()).or_insert((false, None))
                }
                _ => continue,
            };
            if ext == BINARY_EXT {
                slot.0 = true;
            } else if ext == DESC_EXT {
                slot.1 = Some(
                    fs::read_to_string(path)
                        .map_err(|e| RccError::io_operation("read", path.display(), e))?,
                );
            }
        }

        Ok(found
            .into_iter()
            .map(|(name, (built, description))| PermanentListing {
                name,
                description,
                state: if built {
                    PermanentState::Built
                } else {
                    PermanentState::BuildFailed
                },
            })
            .collect())
    }

    /// Run permanent `name` with `program_args`
    pub fn run(&self, name: &str, program_args: &[String]) -> Result<RunStatus> {
        validate_name(name)?;
        let entry = self.layout.permanent_entry(name);

        if !entry.pair.binary.is_file() {
            if entry.pair.source.exists() || entry.description.exists() {
                return Err(RccError::PermanentBuildFailed {
                    name: name.to_string(),
                });
            }
            return Err(RccError::PermanentNotFound {
                name: name.to_string(),
                suggestion: self.suggest(name),
            });
        }

        let status = run_binary(&entry.pair.binary, program_args)?;
        status.report();
        Ok(status)
    }

    /// Closest built permanent to an unknown `name`
    pub fn suggest(&self, name: &str) -> Option<String> {
        let listing = match self.list() {
            Ok(listing) => listing,
            Err(e) => {
                tracing::debug!(error = %e, "cannot list permanents for suggestion");
                return None;
            }
        };
        suggest_similar(
            name,
            listing
                .iter()
                .filter(|p| p.state == PermanentState::Built)
                .map(|p| p.name.as_str()),
        )
    }

    /// Remove each named permanent, continuing past per-file failures
    pub fn remove(&self, names: &[String]) -> RemovalReport {
        let mut report = RemovalReport::default();

        for name in names {
            if let Err(e) = validate_name(name) {
                report.errors.push(e.to_string());
                report.failed.push(name.clone());
                continue;
            }

            let entry = self.layout.permanent_entry(name);
            let mut removed_any = false;
            let mut had_error = false;
            for path in [&entry.pair.source, &entry.pair.binary, &entry.description] {
                match remove_if_present(path) {
                    Ok(removed) => removed_any |= removed,
                    Err(e) => {
                        had_error = true;
                        report
                            .errors
                            .push(format!("failed to remove {}: {}", path.display(), e));
                    }
                }
            }

            if removed_any && !had_error {
                tracing::debug!(name = %name, "permanent removed");
                report.removed.push(name.clone());
            } else {
                if !removed_any && !had_error {
                    report
                        .errors
                        .push(format!("permanent '{}' does not exist", name));
                }
                report.failed.push(name.clone());
            }
        }

        report
    }
}

fn write_description(path: &Path, description: &str) -> Result<()> {
    fs::write(path, description)
        .map_err(|e| RccError::io_operation("write description", path.display(), e))
}

/// `Ok(false)` if there was nothing to remove
fn remove_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
