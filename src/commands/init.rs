//! `rcc init` command

use std::path::Path;

use rcc_core::config::RccConfig;
use rcc_core::error::Result;
use rcc_core::install::{install, InstallOptions};

/// Install assets into `root`; a config already present there is honored
pub fn execute(root: &Path, pch: bool, force: bool) -> Result<i32> {
    let options = InstallOptions {
        force,
        build_pch: pch,
        config: RccConfig::load_or_default(root)?,
    };
    let report = install(root, &options)?;

    println!("Initialized rcc at {}", root.display());
    for path in &report.written {
        println!("  wrote {}", path.display());
    }
    for path in &report.kept {
        println!("  kept {}", path.display());
    }
    for path in &report.pch_built {
        println!("  built {}", path.display());
    }
    for path in &report.pch_failed {
        eprintln!(
            "warning: failed to build {}; snippets compile without it",
            path.display()
        );
    }
    Ok(0)
}
