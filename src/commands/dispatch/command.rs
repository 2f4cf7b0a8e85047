//! Command trait and context for dispatching commands

use std::path::Path;
use std::time::Instant;

use rcc_core::config::RccConfig;
use rcc_core::error::Result;
use rcc_core::layout::CacheLayout;
use tracing::debug;

use crate::cli::Cli;

/// Shared context for command execution against an installed cache root
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub layout: CacheLayout,
    pub config: RccConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    /// Validate the cache root and load its configuration
    pub fn open(cli: &'a Cli, root: &Path, start: Instant) -> Result<Self> {
        let layout = CacheLayout::resolve(root)?;
        let config = RccConfig::load_or_default(root)?;
        debug!(elapsed = ?start.elapsed(), "open_cache");
        Ok(Self {
            cli,
            layout,
            config,
            start,
        })
    }
}

/// Trait for commands that can be executed; the result is the process exit code
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<i32>;
}

/// No code and nothing else to do
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<i32> {
        println!("rcc {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Run C++ snippets in the terminal, e.g. rcc '2+3*5'");
        println!();
        println!("Run `rcc --help` for usage information.");
        Ok(0)
    }
}
