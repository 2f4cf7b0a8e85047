//! Build requests
//!
//! A [`BuildRequest`] is everything that determines the rendered source and the
//! compile command of one snippet. It is immutable once built; the auto-wrap
//! strategy derives a sibling request with [`BuildRequest::with_code_fragments`].

use crate::hash::{CacheKey, IdentifierTag};

/// Header that turns on the kitchen-sink precompiled-header variant
pub const INCLUDE_ALL_HEADER: &str = "bits/stdc++.h";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    code_fragments: Vec<String>,
    compiler: String,
    std: String,
    cxxflags: Vec<String>,
    extra_flags: Vec<String>,
    includes: Vec<String>,
    above_main: Vec<String>,
    functions: Vec<String>,
    extra_sources: Vec<String>,
    permanent: Option<String>,
    description: Option<String>,
}

impl BuildRequest {
    pub fn builder(compiler: impl Into<String>, std: impl Into<String>) -> BuildRequestBuilder {
        BuildRequestBuilder {
            request: BuildRequest {
                code_fragments: Vec::new(),
                compiler: compiler.into(),
                std: std.into(),
                cxxflags: Vec::new(),
                extra_flags: Vec::new(),
                includes: Vec::new(),
                above_main: Vec::new(),
                functions: Vec::new(),
                extra_sources: Vec::new(),
                permanent: None,
                description: None,
            },
        }
    }

    /// Same request with different code fragments
    pub fn with_code_fragments(&self, fragments: Vec<String>) -> Self {
        Self {
            code_fragments: fragments,
            ..self.clone()
        }
    }

    pub fn code_fragments(&self) -> &[String] {
        &self.code_fragments
    }

    /// Code fragments concatenated as they appear in `main`
    pub fn code(&self) -> String {
        self.code_fragments.concat()
    }

    pub fn has_code(&self) -> bool {
        !self.code_fragments.is_empty()
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    pub fn std(&self) -> &str {
        &self.std
    }

    /// The `-std=` flag, accepting both `c++17` and `-std=c++17` spellings
    pub fn std_flag(&self) -> String {
        if self.std.starts_with("-std=") {
            self.std.clone()
        } else {
            format!("-std={}", self.std)
        }
    }

    pub fn cxxflags(&self) -> &[String] {
        &self.cxxflags
    }

    pub fn extra_flags(&self) -> &[String] {
        &self.extra_flags
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn above_main(&self) -> &[String] {
        &self.above_main
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn extra_sources(&self) -> &[String] {
        &self.extra_sources
    }

    pub fn permanent(&self) -> Option<&str> {
        self.permanent.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the kitchen-sink header was requested
    pub fn includes_all(&self) -> bool {
        self.includes.iter().any(|inc| inc == INCLUDE_ALL_HEADER)
    }

    /// `-std=...` followed by the compiler flags
    pub fn cxxflags_string(&self) -> String {
        let mut parts = vec![self.std_flag()];
        parts.extend(self.cxxflags.iter().cloned());
        parts.join(" ")
    }

    pub fn extra_flags_string(&self) -> String {
        self.extra_flags.join(" ")
    }

    /// Hash input for the cache key.
    ///
    /// Fields are joined with single letters that may also occur inside the fields,
    /// so distinct requests can share a key. Lookup compares the full rendered
    /// source, which makes that harmless.
    pub fn canonical_key_text(&self) -> String {
        let mut s = self.code();
        s.push('a');
        s.push_str(&self.compiler);
        s.push('b');
        s.push_str(&self.cxxflags_string());
        s.push('a');
        s.push_str(&self.extra_flags_string());
        s.push('c');
        s.push_str(&self.includes.join(" "));
        s.push('k');
        s.push_str(&self.above_main.join("\n"));
        s.push('e');
        s.push_str(&self.functions.join("\n"));
        s.push('r');
        s.push_str(&self.extra_sources.join(" "));
        s
    }

    /// Hash input for the identifier tag: configuration only, no code
    pub fn canonical_identifier_text(&self) -> String {
        let mut s = self.compiler.clone();
        s.push('n');
        s.push_str(&self.cxxflags_string());
        s.push('i');
        s.push_str(&self.extra_flags_string());
        s.push('n');
        s.push_str(&self.includes.join(" "));
        s.push('i');
        s.push_str(&self.extra_sources.join(" "));
        s
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_canonical(&self.canonical_key_text())
    }

    pub fn identifier_tag(&self) -> IdentifierTag {
        IdentifierTag::from_canonical(&self.canonical_identifier_text())
    }
}

/// Builder for [`BuildRequest`]
#[derive(Debug, Clone)]
pub struct BuildRequestBuilder {
    request: BuildRequest,
}

impl BuildRequestBuilder {
    pub fn code(mut self, fragment: impl Into<String>) -> Self {
        self.request.code_fragments.push(fragment.into());
        self
    }

    pub fn cxxflag(mut self, flag: impl Into<String>) -> Self {
        self.request.cxxflags.push(flag.into());
        self
    }

    pub fn cxxflags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.cxxflags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn extra_flag(mut self, flag: impl Into<String>) -> Self {
        self.request.extra_flags.push(flag.into());
        self
    }

    pub fn include(mut self, header: impl Into<String>) -> Self {
        self.request.includes.push(header.into());
        self
    }

    pub fn above_main(mut self, code: impl Into<String>) -> Self {
        self.request.above_main.push(code.into());
        self
    }

    pub fn function(mut self, code: impl Into<String>) -> Self {
        self.request.functions.push(code.into());
        self
    }

    pub fn extra_source(mut self, path: impl Into<String>) -> Self {
        self.request.extra_sources.push(path.into());
        self
    }

    pub fn permanent(mut self, name: impl Into<String>) -> Self {
        self.request.permanent = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.request.description = Some(desc.into());
        self
    }

    pub fn build(self) -> BuildRequest {
        self.request
    }
}
