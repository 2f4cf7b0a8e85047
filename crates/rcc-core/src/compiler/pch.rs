//! Precompiled-header compatibility probing for explicit-include toolchains
//!
//! A probe preprocesses an empty input with the candidate header and the flags
//! that can change how the header is interpreted. The outcome is memoized in
//! `pch_probe/<hash>` as four lines: standard, filtered flags, filtered extra
//! flags, `true`/`false`. The literal fields are compared on read so that a hash
//! collision is a miss rather than a wrong answer.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use regex::RegexSet;

use crate::hash::CacheKey;
use crate::layout::CacheLayout;
use crate::process::{quote_if_needed, quote_path, run_shell};
use crate::request::BuildRequest;
use crate::trace_time;

use super::INCLUDE_ALL_FLAG;

static IRRELEVANT_FLAGS: OnceLock<RegexSet> = OnceLock::new();

/// Flags with no bearing on header structure: output paths, warnings, linking,
/// dependency generation, diagnostics formatting, verbosity
fn irrelevant_flags() -> &'static RegexSet {
    IRRELEVANT_FLAGS.get_or_init(|| {
        RegexSet::new([
            r"^-o",
            r"^-W",
            r"^-w$",
            r"^-pedantic",
            r"^-l",
            r"^-L",
            r"^-pthread$",
            r"^-(static|shared|rdynamic|pie|no-pie|s)$",
            r"^-fuse-ld=",
            r"^-M(D|MD|M|P)?$",
            r"^-M[FTQ]",
            r"^-fdiagnostics-",
            r"^-f(no-)?color-diagnostics$",
            r"^-(c|S|E|v)$",
        ])
        .unwrap_or_else(|_| RegexSet::empty())
    })
}

/// Flags whose value is the next argument when written on their own
const TAKES_VALUE: &[&str] = &["-o", "-MF", "-MT", "-MQ", "-L", "-l"];

/// Drop flags that cannot affect precompiled-header compatibility
pub fn filter_flags(flags: &[String]) -> Vec<String> {
    let set = irrelevant_flags();
    let mut out = Vec::with_capacity(flags.len());
    let mut skip_next = false;
    for flag in flags {
        if skip_next {
            skip_next = false;
            continue;
        }
        if set.is_match(flag) {
            skip_next = TAKES_VALUE.contains(&flag.as_str());
            continue;
        }
        out.push(flag.clone());
    }
    out
}

/// The three fields a probe result depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFields {
    pub std: String,
    pub flags: String,
    pub extra_flags: String,
}

impl ProbeFields {
    pub fn from_request(request: &BuildRequest) -> Self {
        let mut flags = filter_flags(request.cxxflags());
        if request.includes_all() {
            flags.push(INCLUDE_ALL_FLAG.to_string());
        }
        Self {
            std: request.std_flag(),
            flags: flags.join(" "),
            extra_flags: filter_flags(request.extra_flags()).join(" "),
        }
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::from_canonical(&format!(
            "{}\n{}\n{}",
            self.std, self.flags, self.extra_flags
        ))
    }

    fn to_record(&self, compatible: bool) -> String {
        format!(
            "{}\n{}\n{}\n{}\n",
            self.std, self.flags, self.extra_flags, compatible
        )
    }

    /// Parse a stored record; `None` if it is malformed or belongs to other fields
    fn parse_record(&self, content: &str) -> Option<bool> {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() != 4 {
            return None;
        }
        if lines[0] != self.std || lines[1] != self.flags || lines[2] != self.extra_flags {
            return None;
        }
        match lines[3] {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Memoizing compatibility probe
pub struct PchProbe<'a> {
    layout: &'a CacheLayout,
    compiler: &'a str,
}

impl<'a> PchProbe<'a> {
    pub fn new(layout: &'a CacheLayout, compiler: &'a str) -> Self {
        Self { layout, compiler }
    }

    /// Whether `pch` may be used with `request`'s flags
    pub fn is_compatible(&self, request: &BuildRequest, pch: &Path) -> bool {
        let fields = ProbeFields::from_request(request);
        let record_path = self.layout.probe_record_path(&fields.key());

        if let Some(compatible) = self.read_record(&record_path, &fields) {
            tracing::debug!(compatible, record = %record_path.display(), "pch_probe_cached");
            return compatible;
        }

        let compatible = self.run_probe(&fields, pch);
        if let Err(e) = fs::write(&record_path, fields.to_record(compatible)) {
            tracing::warn!(record = %record_path.display(), error = %e, "failed to write pch probe record");
        }
        compatible
    }

    fn read_record(&self, path: &Path, fields: &ProbeFields) -> Option<bool> {
        let content = fs::read_to_string(path).ok()?;
        let parsed = fields.parse_record(&content);
        if parsed.is_none() {
            tracing::warn!(record = %path.display(), "pch probe record is corrupt or collided, probing again");
        }
        parsed
    }

    /// Preprocess an empty input with the header; exit status decides
    fn run_probe(&self, fields: &ProbeFields, pch: &Path) -> bool {
        let command = self.probe_command(fields, pch);
        tracing::debug!(command = %command, "pch_probe");
        let start = Instant::now();
        let compatible = run_shell(&command, true)
            .map(|status| status.success())
            .unwrap_or(false);
        trace_time!(start, "pch_probe", compatible = compatible);
        compatible
    }

    pub fn probe_command(&self, fields: &ProbeFields, pch: &Path) -> String {
        let mut parts = vec![quote_if_needed(self.compiler), fields.std.clone()];
        if !fields.flags.is_empty() {
            parts.push(fields.flags.clone());
        }
        parts.push(format!("-Xclang -include-pch -Xclang {}", quote_path(pch)));
        parts.push(format!("-I{}", quote_path(self.layout.templates_dir())));
        parts.push("-x c++ -E /dev/null -o /dev/null".to_string());
        if !fields.extra_flags.is_empty() {
            parts.push(fields.extra_flags.clone());
        }
        parts.join(" ")
    }
}
