//! Ephemeral, content-addressed build cache
//!
//! Each request maps to `cache/<key>.cpp` and `cache/<key>.bin`. A binary is
//! only trusted when the stored source is byte-identical to the source rendered
//! for the current request; anything else is a key collision and is rebuilt.

use std::fs;
use std::time::Instant;

use crate::compiler::{CompileJob, CompilerCommandBuilder};
use crate::error::Result;
use crate::layout::{ArtifactPair, CacheLayout};
use crate::process::{exec_command_line, run_binary, run_shell, RunStatus};
use crate::request::BuildRequest;
use crate::template::Template;
use crate::trace_time;

/// Result of checking the cache for a rendered source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
    /// A binary exists under the key but was built from different source
    Collision { stored: String },
}

/// Result of a build-and-run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Ran(RunStatus),
    CompileFailed,
}

impl BuildOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildOutcome::Ran(status) => status.exit_code(),
            BuildOutcome::CompileFailed => 1,
        }
    }
}

/// Check whether `pair` holds a binary built from exactly `rendered`
pub fn lookup(pair: &ArtifactPair, rendered: &str) -> Lookup {
    if !pair.binary.is_file() {
        return Lookup::Miss;
    }
    match fs::read_to_string(&pair.source) {
        Ok(stored) if stored == rendered => Lookup::Hit,
        Ok(stored) => Lookup::Collision { stored },
        Err(e) => {
            tracing::debug!(source = %pair.source.display(), error = %e, "cached source unreadable");
            Lookup::Miss
        }
    }
}

/// Write `rendered` next to the binary and compile it.
///
/// The compiler writes to a process-unique staging path which is renamed over
/// the binary on success, so no reader ever executes a half-written binary.
/// Returns `false` if the compiler failed. Unless `silent`, a failure is reported
/// with the commands needed to reproduce it.
pub(crate) fn compile_pair(
    builder: &CompilerCommandBuilder<'_>,
    request: &BuildRequest,
    pair: &ArtifactPair,
    rendered: &str,
    program_args: &[String],
    silent: bool,
) -> Result<bool> {
    fs::write(&pair.source, rendered).map_err(crate::map_io_err!("write source", pair.source))?;

    let staging = pair.staging_binary();
    let command = builder.build(&CompileJob::new(request, &pair.source, &staging));
    tracing::debug!(command = %command, silent, "compile");

    let start = Instant::now();
    let status = run_shell(&command, silent)?;
    trace_time!(start, "compile", success = status.success());

    if status.success() {
        fs::rename(&staging, &pair.binary)
            .map_err(crate::map_io_err!("publish binary", pair.binary))?;
        return Ok(true);
    }

    if staging.exists() {
        if let Err(e) = fs::remove_file(&staging) {
            tracing::warn!(path = %staging.display(), error = %e, "failed to remove staging binary");
        }
    }

    if !silent {
        let reproduce = builder.build(&CompileJob::new(request, &pair.source, &pair.binary));
        eprintln!("OUTPUT CPP: {}", pair.source.display());
        eprintln!("COMPILATION FAILED!");
        eprintln!("COMPILE COMMAND: {}", reproduce);
        eprintln!(
            "EXECUTE COMMAND: {}",
            exec_command_line(&pair.binary, program_args)
        );
    }
    Ok(false)
}

/// Ephemeral artifact store for one cache root
pub struct BuildCache<'a> {
    layout: &'a CacheLayout,
    template: Template,
}

impl<'a> BuildCache<'a> {
    /// Open the cache, loading the installed template
    pub fn open(layout: &'a CacheLayout) -> Result<Self> {
        Ok(Self {
            layout,
            template: Template::load(&layout.template_path())?,
        })
    }

    /// Make sure a binary for `request` exists, compiling on a miss.
    ///
    /// Returns `None` if compilation failed.
    #[tracing::instrument(skip_all, fields(key))]
    pub fn prepare(
        &self,
        request: &BuildRequest,
        program_args: &[String],
        silent: bool,
    ) -> Result<Option<ArtifactPair>> {
        let builder = CompilerCommandBuilder::new(self.layout, request.compiler())?;
        let key = request.cache_key();
        tracing::Span::current().record("key", key.as_str());

        let rendered = self.template.render_request(request)?;
        let pair = self.layout.ephemeral_pair(&key);

        match lookup(&pair, &rendered) {
            Lookup::Hit => {
                tracing::debug!("running cached binary");
                return Ok(Some(pair));
            }
            Lookup::Miss => tracing::debug!("cache miss"),
            Lookup::Collision { stored } => {
                tracing::warn!(
                    key = key.as_str(),
                    stored = %stored,
                    generated = %rendered,
                    "cache key collision, recompiling"
                );
            }
        }

        if compile_pair(&builder, request, &pair, &rendered, program_args, silent)? {
            Ok(Some(pair))
        } else {
            Ok(None)
        }
    }

    /// Build `request` if needed, then run it with `program_args`
    pub fn run(
        &self,
        request: &BuildRequest,
        program_args: &[String],
        silent: bool,
    ) -> Result<BuildOutcome> {
        let Some(pair) = self.prepare(request, program_args, silent)? else {
            return Ok(BuildOutcome::CompileFailed);
        };

        tracing::debug!(command = %exec_command_line(&pair.binary, program_args), "executing");
        let start = Instant::now();
        let status = run_binary(&pair.binary, program_args)?;
        trace_time!(start, "run");
        status.report();
        Ok(BuildOutcome::Ran(status))
    }
}
