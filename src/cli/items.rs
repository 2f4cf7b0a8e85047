//! Classification of free-form command-line items
//!
//! An item that starts with `-` followed by a letter is a compiler flag:
//! - `-std=...` selects the language standard
//! - `-l...` is a linker flag
//! - any other flag is a compiler flag before the first code fragment and an
//!   extra flag after it
//!
//! Everything else is a code fragment.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedItems {
    pub std: Option<String>,
    pub cxxflags: Vec<String>,
    pub extra_flags: Vec<String>,
    pub code: Vec<String>,
}

fn is_flag(item: &str) -> bool {
    let mut chars = item.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Split `items` into flags and code; `code` holds fragments given with `--code`
pub fn classify(items: &[String], code: Vec<String>) -> ClassifiedItems {
    let mut out = ClassifiedItems {
        code,
        ..Default::default()
    };

    for item in items {
        if !is_flag(item) {
            out.code.push(item.clone());
        } else if let Some(std) = item.strip_prefix("-std=") {
            out.std = Some(std.to_string());
        } else if item.starts_with("-l") || !out.code.is_empty() {
            out.extra_flags.push(item.clone());
        } else {
            out.cxxflags.push(item.clone());
        }
    }

    out
}
