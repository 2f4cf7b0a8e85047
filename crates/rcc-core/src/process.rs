//! Child process boundary: compiler command lines and program runs

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{RccError, Result};

/// Wrap `s` in double quotes if it contains whitespace
pub fn quote_if_needed(s: &str) -> String {
    if s.chars().any(char::is_whitespace) {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

pub fn quote_path(path: &Path) -> String {
    quote_if_needed(&path.to_string_lossy())
}

/// Program arguments as shown to the user, single-quoted if they contain whitespace
pub fn format_args(args: &[String]) -> String {
    args.iter()
        .map(|a| {
            if a.chars().any(char::is_whitespace) {
                format!("'{}'", a)
            } else {
                a.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Command line that runs `binary` with pass-through arguments
pub fn exec_command_line(binary: &Path, args: &[String]) -> String {
    let args = format_args(args);
    if args.is_empty() {
        quote_path(binary)
    } else {
        format!("{} {}", quote_path(binary), args)
    }
}

/// Run a command line through `sh -c`, waiting for it to finish.
///
/// With `silent` the child's stdout and stderr are discarded.
pub fn run_shell(command_line: &str, silent: bool) -> Result<ExitStatus> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    if silent {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    }
    cmd.status().map_err(|e| RccError::Spawn {
        program: "sh".to_string(),
        reason: e.to_string(),
    })
}

/// How a program run through rcc terminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Normal exit with this code
    Exited(i32),
    /// Killed by this signal
    Signaled(i32),
    /// Neither exited nor signaled
    Abnormal(String),
}

impl RunStatus {
    pub fn from_exit_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return RunStatus::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return RunStatus::Signaled(signal);
            }
        }
        RunStatus::Abnormal(format!("{:?}", status))
    }

    /// Exit code rcc returns: the program's own, or 1 for abnormal termination
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Exited(code) => *code,
            RunStatus::Signaled(_) | RunStatus::Abnormal(_) => 1,
        }
    }

    /// Report abnormal termination on stderr
    pub fn report(&self) {
        match self {
            RunStatus::Exited(_) => {}
            RunStatus::Signaled(signal) => eprintln!("Killed by signal {}", signal),
            RunStatus::Abnormal(status) => eprintln!("Unexpected exit status {}", status),
        }
    }
}

/// Run a compiled binary with pass-through arguments, inheriting stdio
pub fn run_binary(binary: &Path, args: &[String]) -> Result<RunStatus> {
    let status = Command::new(binary)
        .args(args)
        .status()
        .map_err(|e| RccError::Spawn {
            program: binary.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(RunStatus::from_exit_status(status))
}
