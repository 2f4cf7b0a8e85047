//! CLI argument parsing for rcc
//!
//! Uses clap for argument parsing. Free-form items (code fragments and compiler
//! flags) are classified by [`items::classify`]; everything after `--` goes to
//! the executed program.

pub mod items;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// RCC - run C++ snippets in the terminal
#[derive(Parser, Debug)]
#[command(name = "rcc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Arguments after `--` are passed to the program.")]
pub struct Cli {
    /// Cache root (default: $RCC_CACHE_DIR, then the platform cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub snippet: SnippetArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// What to compile: code, flags and extra inputs
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Code fragments and compiler flags (`-std=...`, `-O2`, `-lm`, ...)
    #[arg(value_name = "ITEMS", allow_hyphen_values = true)]
    pub items: Vec<String>,

    /// Include an additional header (bits/stdc++.h selects the kitchen-sink header)
    #[arg(long, value_name = "HEADER", action = clap::ArgAction::Append)]
    pub include: Vec<String>,

    /// Include bits/stdc++.h; this increases compile time
    #[arg(long)]
    pub include_all: bool,

    /// Compile with an additional source file
    #[arg(long, value_name = "FILE", action = clap::ArgAction::Append)]
    pub compile_with: Vec<PathBuf>,

    /// Code placed above the main function
    #[arg(long, value_name = "CODE", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub put_above_main: Vec<String>,

    /// Define a function
    #[arg(long, value_name = "CODE", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub function: Vec<String>,

    /// Add a code fragment explicitly
    #[arg(long, value_name = "CODE", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Compiler to use (g++, gcc, clang++, clang)
    #[arg(long)]
    pub compiler: Option<String>,
}

/// Arguments of the default mode: build and run a snippet, or manage permanents
#[derive(Args, Debug, Clone, Default)]
pub struct SnippetArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Arguments passed to the program, taken from after `--`
    #[arg(skip)]
    pub program_args: Vec<String>,

    /// Compile the code as a permanent program with this name
    #[arg(long, value_name = "NAME")]
    pub permanent: Option<String>,

    /// Description of the permanent program
    #[arg(long, requires = "permanent")]
    pub desc: Option<String>,

    /// Run a permanent program
    #[arg(long, value_name = "NAME", conflicts_with = "permanent")]
    pub run_permanent: Option<String>,

    /// List all permanent programs and exit
    #[arg(long)]
    pub list_permanent: bool,

    /// Remove permanent programs and exit
    #[arg(
        long,
        value_name = "NAME",
        num_args = 1..,
        conflicts_with_all = ["permanent", "run_permanent", "list_permanent"]
    )]
    pub remove_permanent: Vec<String>,

    /// Delete cached sources and binaries; permanent programs are kept
    #[arg(long)]
    pub clean_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a permanent program, same as --permanent
    Create {
        /// Name of the permanent program
        name: String,

        /// Description of the permanent program
        #[arg(long)]
        desc: Option<String>,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Run a permanent program, same as --run-permanent
    Run {
        /// Name of the permanent program
        name: String,

        /// Arguments passed to the program, taken from after `--`
        #[arg(skip)]
        program_args: Vec<String>,
    },

    /// List all permanent programs, same as --list-permanent
    List {
        /// Print `name:description` lines for zsh completion
        #[arg(long)]
        fetch_autocompletion_zsh: bool,
    },

    /// Remove permanent programs, same as --remove-permanent
    #[command(alias = "rm")]
    Remove {
        /// Names of the permanent programs
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Delete cached sources and binaries, same as --clean-cache
    Clean,

    /// Install the template, header and default config into the cache root
    Init {
        /// Also build precompiled headers for the configured compiler
        #[arg(long)]
        pch: bool,

        /// Overwrite an existing template and header
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Parse the process arguments, exiting with a usage error on failure
    pub fn parse_with_program_args() -> Self {
        Self::try_parse_with_program_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`; everything after the first `--` goes to the program.
    ///
    /// The separator is split off before clap sees it, since the free-form
    /// items accept hyphenated values and would otherwise swallow it.
    pub fn try_parse_with_program_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let program_args = match args.iter().skip(1).position(|a| a == "--") {
            Some(pos) => args
                .split_off(pos + 1)
                .into_iter()
                .skip(1)
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            None => Vec::new(),
        };

        let mut cli = Self::try_parse_from(args)?;
        match &mut cli.command {
            Some(Commands::Run {
                program_args: run_args,
                ..
            }) => *run_args = program_args,
            _ => cli.snippet.program_args = program_args,
        }
        Ok(cli)
    }
}
