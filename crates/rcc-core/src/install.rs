//! Installation of a cache root (`rcc init`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assets::{TEMPLATE_HEADER, TEMPLATE_SOURCE};
use crate::compiler::{Toolchain, ToolchainFamily, INCLUDE_ALL_FLAG};
use crate::config::{RccConfig, CONFIG_FILE};
use crate::error::{RccError, Result};
use crate::layout::CacheLayout;
use crate::process::{quote_if_needed, quote_path, run_shell};
use crate::request::BuildRequest;
use crate::trace_time;

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Overwrite the template and header even if present
    pub force: bool,
    /// Build precompiled headers with the configured compiler
    pub build_pch: bool,
    /// Written as `config.toml` if none exists; its compiler builds the headers
    pub config: RccConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub written: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
    pub pch_built: Vec<PathBuf>,
    pub pch_failed: Vec<PathBuf>,
}

/// Create the directory structure and install assets under `root`
#[tracing::instrument(skip(root, options), fields(root = %root.display()))]
pub fn install(root: &Path, options: &InstallOptions) -> Result<InstallReport> {
    let layout = CacheLayout::at(root);
    let mut report = InstallReport::default();

    fs::create_dir_all(layout.templates_dir()).map_err(|e| {
        RccError::io_operation("create directory", layout.templates_dir().display(), e)
    })?;
    layout.create_writable_dirs()?;

    for (path, content) in [
        (layout.template_path(), TEMPLATE_SOURCE),
        (layout.header_path(), TEMPLATE_HEADER),
    ] {
        write_asset(&path, content, options.force, &mut report)?;
    }

    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        report.kept.push(config_path);
    } else {
        options.config.save(&config_path)?;
        report.written.push(config_path);
    }

    if options.build_pch {
        build_precompiled_headers(&layout, &options.config, &mut report)?;
    }

    Ok(report)
}

fn write_asset(path: &Path, content: &str, force: bool, report: &mut InstallReport) -> Result<()> {
    if path.exists() && !force {
        report.kept.push(path.to_path_buf());
        return Ok(());
    }
    fs::write(path, content).map_err(crate::map_io_err!("write", path))?;
    report.written.push(path.to_path_buf());
    Ok(())
}

/// Build the default and kitchen-sink variants for the configured compiler.
///
/// A failing variant is recorded, not fatal: compilation falls back to raw headers.
fn build_precompiled_headers(
    layout: &CacheLayout,
    config: &RccConfig,
    report: &mut InstallReport,
) -> Result<()> {
    let toolchain = Toolchain::detect(&config.compiler)?;

    let targets = match toolchain.family {
        ToolchainFamily::AutoMatch => {
            let gch_dir = layout.gch_dir();
            fs::create_dir_all(&gch_dir).map_err(crate::map_io_err!("create directory", gch_dir))?;
            [
                (gch_dir.join("default.gch"), false),
                (gch_dir.join("all.gch"), true),
            ]
        }
        ToolchainFamily::ExplicitInclude => {
            [(layout.pch_path(false), false), (layout.pch_path(true), true)]
        }
    };

    for (output, include_all) in targets {
        let request = BuildRequest::builder(&config.compiler, &config.std)
            .cxxflags(config.cxxflags.iter().cloned())
            .build();
        let mut command = format!(
            "{} {}",
            quote_if_needed(&config.compiler),
            request.cxxflags_string()
        );
        if include_all {
            command.push(' ');
            command.push_str(INCLUDE_ALL_FLAG);
        }
        command.push_str(&format!(
            " -x c++-header {} -o {}",
            quote_path(&layout.header_path()),
            quote_path(&output)
        ));

        tracing::info!(command = %command, "building precompiled header");
        let start = Instant::now();
        let ok = run_shell(&command, false)
            .map(|status| status.success())
            .unwrap_or(false);
        trace_time!(start, "build_pch", ok = ok);

        if ok {
            report.pch_built.push(output);
        } else {
            report.pch_failed.push(output);
        }
    }
    Ok(())
}
