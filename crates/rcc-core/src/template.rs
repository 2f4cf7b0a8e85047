//! Boilerplate template rendering
//!
//! The installed template contains five placeholders, each exactly once. Rendering
//! scans the template a single time, then substitutes from the highest offset down
//! so that lower offsets stay valid and substituted text is never rescanned.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RccError, Result};
use crate::hash::IdentifierTag;
use crate::request::BuildRequest;

/// The placeholders a template must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Includes,
    AboveMain,
    Functions,
    Codes,
    Identifier,
}

/// Every placeholder, in the order they are reported
pub const PLACEHOLDERS: [Placeholder; 5] = [
    Placeholder::Includes,
    Placeholder::AboveMain,
    Placeholder::Functions,
    Placeholder::Codes,
    Placeholder::Identifier,
];

impl Placeholder {
    pub fn marker(self) -> &'static str {
        match self {
            Placeholder::Includes => "{{RCC_INCLUDES}}",
            Placeholder::AboveMain => "{{RCC_ABOVE_MAIN}}",
            Placeholder::Functions => "{{RCC_FUNCTIONS}}",
            Placeholder::Codes => "{{RCC_CODES}}",
            Placeholder::Identifier => "{{RCC_IDENTIFIER}}",
        }
    }

    fn index(self) -> usize {
        PLACEHOLDERS
            .iter()
            .position(|p| *p == self)
            .unwrap_or_default()
    }
}

/// Replacement text for each placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParts {
    pub includes: String,
    pub above_main: String,
    pub functions: String,
    pub codes: String,
    pub identifier: String,
}

impl TemplateParts {
    /// Replacement texts for a request
    pub fn for_request(request: &BuildRequest, identifier: &IdentifierTag) -> Self {
        let includes = request
            .includes()
            .iter()
            .map(|inc| {
                if inc.starts_with('<') || inc.starts_with('"') {
                    format!("#include {}", inc)
                } else {
                    format!("#include <{}>", inc)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            includes,
            above_main: request.above_main().join("\n"),
            functions: request.functions().join("\n"),
            codes: request.code(),
            identifier: identifier.as_str().to_string(),
        }
    }

    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Includes => &self.includes,
            Placeholder::AboveMain => &self.above_main,
            Placeholder::Functions => &self.functions,
            Placeholder::Codes => &self.codes,
            Placeholder::Identifier => &self.identifier,
        }
    }
}

/// A loaded boilerplate template
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    text: String,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(RccError::installation("template file", path));
        }
        let text = fs::read_to_string(path)
            .map_err(|e| RccError::io_operation("read template", path.display(), e))?;
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the template for a request
    pub fn render_request(&self, request: &BuildRequest) -> Result<String> {
        self.render(&TemplateParts::for_request(
            request,
            &request.identifier_tag(),
        ))
    }

    /// Substitute every placeholder.
    ///
    /// A template that does not contain each placeholder exactly once is a broken
    /// installation, reported with the full list of expected placeholders.
    pub fn render(&self, parts: &TemplateParts) -> Result<String> {
        let mut occurrences: Vec<(usize, Placeholder)> = PLACEHOLDERS
            .iter()
            .flat_map(|&p| self.text.match_indices(p.marker()).map(move |(i, _)| (i, p)))
            .collect();

        let mut found = [0usize; PLACEHOLDERS.len()];
        for (_, p) in &occurrences {
            found[p.index()] += 1;
        }
        if found.iter().any(|&n| n != 1) {
            return Err(RccError::TemplatePlaceholders {
                path: self.path.clone(),
                found: found.to_vec(),
            });
        }

        occurrences.sort_by(|a, b| b.0.cmp(&a.0));

        let mut out = self.text.clone();
        for (offset, p) in occurrences {
            out.replace_range(offset..offset + p.marker().len(), parts.get(p));
        }
        Ok(out)
    }
}
