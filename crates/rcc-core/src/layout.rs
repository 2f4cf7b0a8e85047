//! On-disk layout of the rcc cache root
//!
//! ```text
//! <root>/
//!   config.toml            optional defaults
//!   cache/<key>.cpp|.bin   ephemeral artifacts
//!   permanent/<name>.cpp|.bin|.desc
//!   templates/             installed template, header and precompiled headers
//!   pch_probe/<hash>       memoized precompiled-header probe results
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{
    GCH_DIR, PCH_ALL_FILE, PCH_FILE, TEMPLATE_HEADER_FILE, TEMPLATE_SOURCE_FILE,
};
use crate::error::{RccError, Result};
use crate::hash::CacheKey;

pub const EPHEMERAL_DIR: &str = "cache";
pub const PERMANENT_DIR: &str = "permanent";
pub const TEMPLATES_DIR: &str = "templates";
pub const PCH_PROBE_DIR: &str = "pch_probe";

pub const SOURCE_EXT: &str = "cpp";
pub const BINARY_EXT: &str = "bin";
pub const DESC_EXT: &str = "desc";
/// Suffix of binaries still being written by a compiler
pub const STAGING_EXT: &str = "tmp";

/// Resolved directory structure, constructed once and passed to every component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
    ephemeral_dir: PathBuf,
    permanent_dir: PathBuf,
    templates_dir: PathBuf,
    probe_dir: PathBuf,
}

impl CacheLayout {
    /// Paths under `root`, without touching the filesystem
    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ephemeral_dir: root.join(EPHEMERAL_DIR),
            permanent_dir: root.join(PERMANENT_DIR),
            templates_dir: root.join(TEMPLATES_DIR),
            probe_dir: root.join(PCH_PROBE_DIR),
        }
    }

    /// Validate an installed cache root.
    ///
    /// The root, the templates directory, the template and the header must exist;
    /// they are installed assets and their absence is fatal. The writable
    /// subdirectories are created on demand.
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn resolve(root: &Path) -> Result<Self> {
        let layout = Self::at(root);

        if !layout.root.is_dir() {
            return Err(RccError::installation("cache directory", &layout.root));
        }
        if !layout.templates_dir.is_dir() {
            return Err(RccError::installation(
                "templates directory",
                &layout.templates_dir,
            ));
        }
        if !layout.template_path().is_file() {
            return Err(RccError::installation("template file", layout.template_path()));
        }
        if !layout.header_path().is_file() {
            return Err(RccError::installation("template header", layout.header_path()));
        }

        layout.create_writable_dirs()?;
        Ok(layout)
    }

    /// Create the ephemeral, permanent and probe directories if missing
    pub fn create_writable_dirs(&self) -> Result<()> {
        for dir in [&self.ephemeral_dir, &self.permanent_dir, &self.probe_dir] {
            if !dir.is_dir() {
                fs::create_dir_all(dir)
                    .map_err(|e| RccError::io_operation("create directory", dir.display(), e))?;
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ephemeral_dir(&self) -> &Path {
        &self.ephemeral_dir
    }

    pub fn permanent_dir(&self) -> &Path {
        &self.permanent_dir
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn probe_dir(&self) -> &Path {
        &self.probe_dir
    }

    pub fn template_path(&self) -> PathBuf {
        self.templates_dir.join(TEMPLATE_SOURCE_FILE)
    }

    pub fn header_path(&self) -> PathBuf {
        self.templates_dir.join(TEMPLATE_HEADER_FILE)
    }

    /// Directory the auto-matching toolchain searches for precompiled variants
    pub fn gch_dir(&self) -> PathBuf {
        self.templates_dir.join(GCH_DIR)
    }

    /// Precompiled header the explicit-include toolchain must be given
    pub fn pch_path(&self, include_all: bool) -> PathBuf {
        self.templates_dir
            .join(if include_all { PCH_ALL_FILE } else { PCH_FILE })
    }

    pub fn ephemeral_pair(&self, key: &CacheKey) -> ArtifactPair {
        ArtifactPair::new(&self.ephemeral_dir, key.as_str())
    }

    pub fn permanent_entry(&self, name: &str) -> PermanentEntry {
        PermanentEntry {
            pair: ArtifactPair::new(&self.permanent_dir, name),
            description: self
                .permanent_dir
                .join(format!("{}.{}", name, DESC_EXT)),
        }
    }

    pub fn probe_record_path(&self, key: &CacheKey) -> PathBuf {
        self.probe_dir.join(key.as_str())
    }
}

/// Co-located source and binary sharing a stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    pub source: PathBuf,
    pub binary: PathBuf,
}

impl ArtifactPair {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            source: dir.join(format!("{}.{}", stem, SOURCE_EXT)),
            binary: dir.join(format!("{}.{}", stem, BINARY_EXT)),
        }
    }

    /// Process-unique path the compiler writes to before the result is renamed
    /// over [`ArtifactPair::binary`]
    pub fn staging_binary(&self) -> PathBuf {
        self.binary.with_extension(format!(
            "{}.{}.{}",
            BINARY_EXT,
            std::process::id(),
            STAGING_EXT
        ))
    }
}

/// A named artifact pair plus its description file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermanentEntry {
    pub pair: ArtifactPair,
    pub description: PathBuf,
}
