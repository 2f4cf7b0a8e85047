//! Command dispatch logic for rcc

use std::time::Instant;

use rcc_core::config::resolve_cache_root;
use rcc_core::error::Result;
use rcc_core::janitor;
use tracing::debug;

use crate::cli::{BuildArgs, Cli, Commands, SnippetArgs};
use crate::commands::{init, permanent, snippet};

mod command;

pub use command::{Command, CommandContext, NoCommand};

/// What one invocation does, from either the subcommand or the legacy flags
#[derive(Debug)]
pub enum Action<'a> {
    Init { pch: bool, force: bool },
    Clean,
    List { zsh: bool },
    Remove { names: &'a [String] },
    RunPermanent { name: &'a str, program_args: &'a [String] },
    Create { name: &'a str, desc: Option<&'a str>, build: &'a BuildArgs },
    Snippet { args: &'a SnippetArgs },
}

impl<'a> Action<'a> {
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Init { pch, force }) => Action::Init {
                pch: *pch,
                force: *force,
            },
            Some(Commands::Clean) => Action::Clean,
            Some(Commands::List {
                fetch_autocompletion_zsh,
            }) => Action::List {
                zsh: *fetch_autocompletion_zsh,
            },
            Some(Commands::Remove { names }) => Action::Remove { names },
            Some(Commands::Run { name, program_args }) => Action::RunPermanent { name, program_args },
            Some(Commands::Create { name, desc, build }) => Action::Create {
                name,
                desc: desc.as_deref(),
                build,
            },
            None => Self::from_flags(&cli.snippet),
        }
    }

    fn from_flags(args: &'a SnippetArgs) -> Self {
        if args.list_permanent {
            Action::List { zsh: false }
        } else if !args.remove_permanent.is_empty() {
            Action::Remove {
                names: &args.remove_permanent,
            }
        } else if let Some(name) = &args.run_permanent {
            Action::RunPermanent {
                name,
                program_args: &args.program_args,
            }
        } else if let Some(name) = &args.permanent {
            Action::Create {
                name,
                desc: args.desc.as_deref(),
                build: &args.build,
            }
        } else {
            Action::Snippet { args }
        }
    }

    fn wants_clean(&self, cli: &Cli) -> bool {
        matches!(self, Action::Clean) || cli.snippet.clean_cache
    }
}

impl Command for Action<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        match self {
            Action::Init { .. } | Action::Clean => Ok(0),
            Action::List { zsh } => permanent::list(ctx, *zsh),
            Action::Remove { names } => permanent::remove(ctx, names),
            Action::RunPermanent { name, program_args } => {
                permanent::run(ctx, name, program_args)
            }
            Action::Create { name, desc, build } => permanent::create(ctx, name, *desc, build),
            Action::Snippet { args } => snippet::execute(ctx, args),
        }
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<i32> {
    let root = resolve_cache_root(cli.cache_dir.as_deref())?;
    debug!(root = %root.display(), elapsed = ?start.elapsed(), "resolve_root");

    let action = Action::from_cli(cli);
    if let Action::Init { pch, force } = action {
        return init::execute(&root, pch, force);
    }

    let ctx = CommandContext::open(cli, &root, start)?;

    if action.wants_clean(cli) {
        let report = janitor::clean_all(ctx.layout.ephemeral_dir())?;
        println!("Removed {} cached file(s).", report.removed);
    } else {
        // Detached: never joined, dies with the process
        let _ = janitor::maybe_spawn(ctx.layout.ephemeral_dir(), &ctx.config.janitor);
    }

    let code = action.execute(&ctx)?;
    debug!(elapsed = ?ctx.start.elapsed(), code, "execute_command");
    Ok(code)
}
