//! Compiler command construction
//!
//! Two toolchain families are supported:
//! - [`ToolchainFamily::AutoMatch`] (g++): picks a precompiled header variant from
//!   `rcc_template.hpp.gch/` by itself; only the search path and the kitchen-sink
//!   toggle are passed.
//! - [`ToolchainFamily::ExplicitInclude`] (clang++): the precompiled header must be
//!   named with `-include-pch`, and a flag mismatch is a hard error, so
//!   compatibility is probed (and memoized) before it is used.

pub mod pch;

use std::path::{Path, PathBuf};

use crate::error::{RccError, Result};
use crate::layout::CacheLayout;
use crate::process::{quote_if_needed, quote_path};
use crate::request::BuildRequest;

pub use pch::{PchProbe, ProbeFields};

/// Macro toggling the kitchen-sink header inside the support header
pub const INCLUDE_ALL_FLAG: &str = "-DRCC_INCLUDE_ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// Precompiled header is auto-selected by the toolchain
    AutoMatch,
    /// Precompiled header is named explicitly and must match the flags
    ExplicitInclude,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: String,
    pub family: ToolchainFamily,
}

impl Toolchain {
    /// Classify a compiler by its file name
    pub fn detect(compiler: &str) -> Result<Self> {
        let name = Path::new(compiler)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let family = if name.contains("clang") {
            ToolchainFamily::ExplicitInclude
        } else if name.contains("g++") || name.contains("gcc") {
            ToolchainFamily::AutoMatch
        } else {
            return Err(RccError::UnsupportedCompiler {
                name: compiler.to_string(),
            });
        };

        Ok(Self {
            compiler: compiler.to_string(),
            family,
        })
    }
}

/// One compilation: the request plus where sources and output live
#[derive(Debug, Clone)]
pub struct CompileJob<'a> {
    pub request: &'a BuildRequest,
    /// Rendered source followed by any additional user sources
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
}

impl<'a> CompileJob<'a> {
    pub fn new(request: &'a BuildRequest, rendered: &Path, output: &Path) -> Self {
        let mut sources = vec![rendered.to_path_buf()];
        sources.extend(request.extra_sources().iter().map(PathBuf::from));
        Self {
            request,
            sources,
            output: output.to_path_buf(),
        }
    }
}

/// Compile command line for `job`.
///
/// Order: compiler, `-std=`, compiler flags, kitchen-sink toggle, explicit
/// precompiled header, support include path, output, sources, extra flags.
pub fn compile_command(
    toolchain: &Toolchain,
    job: &CompileJob<'_>,
    support_dir: &Path,
    pch: Option<&Path>,
) -> String {
    let mut parts = vec![quote_if_needed(&toolchain.compiler)];
    parts.push(job.request.cxxflags_string());
    if job.request.includes_all() {
        parts.push(INCLUDE_ALL_FLAG.to_string());
    }
    if let (ToolchainFamily::ExplicitInclude, Some(pch)) = (toolchain.family, pch) {
        parts.push(format!("-Xclang -include-pch -Xclang {}", quote_path(pch)));
    }
    parts.push(format!("-I{}", quote_path(support_dir)));
    parts.push(format!("-o {}", quote_path(&job.output)));
    parts.extend(job.sources.iter().map(|s| quote_path(s)));
    let extra = job.request.extra_flags_string();
    if !extra.is_empty() {
        parts.push(extra);
    }
    parts.join(" ")
}

/// Builds compile commands against an installed layout
pub struct CompilerCommandBuilder<'a> {
    layout: &'a CacheLayout,
    toolchain: Toolchain,
}

impl<'a> CompilerCommandBuilder<'a> {
    pub fn new(layout: &'a CacheLayout, compiler: &str) -> Result<Self> {
        Ok(Self {
            layout,
            toolchain: Toolchain::detect(compiler)?,
        })
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn build(&self, job: &CompileJob<'_>) -> String {
        let pch = match self.toolchain.family {
            ToolchainFamily::AutoMatch => None,
            ToolchainFamily::ExplicitInclude => self.compatible_pch(job.request),
        };
        compile_command(
            &self.toolchain,
            job,
            self.layout.templates_dir(),
            pch.as_deref(),
        )
    }

    /// The explicit precompiled header, if it is installed and the probe accepts it
    fn compatible_pch(&self, request: &BuildRequest) -> Option<PathBuf> {
        let pch = self.layout.pch_path(request.includes_all());
        if !pch.is_file() {
            tracing::debug!(pch = %pch.display(), "pch_not_installed");
            return None;
        }
        let probe = PchProbe::new(self.layout, &self.toolchain.compiler);
        if probe.is_compatible(request, &pch) {
            Some(pch)
        } else {
            None
        }
    }
}
