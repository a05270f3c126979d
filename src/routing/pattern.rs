//! Path template compilation.
//!
//! # Responsibilities
//! - Join a declared template onto its parent prefix and collapse duplicate slashes
//! - Emit an anchored, case-insensitive regex with one capture per segment
//! - Record which capture groups carry dynamic parameters
//!
//! # Design Decisions
//! - Compiled once at registration, immutable afterwards
//! - Malformed templates fail here, never at match time
//! - A dynamic segment compiles to an optional group so a missing or empty value
//!   still matches loosely; the matcher rejects it and moves on
//! - The separator lives inside the optional group, so `/dynamic/:id` never
//!   matches `/dynamicfoo`

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Upper bound on the compiled regex size for a single template.
const MAX_PATTERN_SIZE: usize = 1 << 20;

/// Characters that can never appear in a path template.
const FORBIDDEN_CHARS: [char; 3] = ['?', '#', '*'];

/// Errors raised while compiling a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template {template:?} contains invalid character {found:?}")]
    InvalidCharacter { template: String, found: char },

    #[error("template {template:?} has a dynamic segment with an empty name")]
    EmptyParamName { template: String },

    #[error("template {template:?} declares parameter {name:?} more than once")]
    DuplicateParam { template: String, name: String },

    #[error("template {template:?} starts with a dynamic segment")]
    DynamicRoot { template: String },

    #[error("template {template:?} failed to compile: {reason}")]
    Regex { template: String, reason: String },
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    full_path: String,
    /// `None` for the wildcard, which accepts every location.
    regex: Option<Regex>,
    param_names: Vec<Option<String>>,
    is_wildcard: bool,
    nested: bool,
}

impl CompiledPattern {
    /// Compile `template` under an optional parent prefix.
    ///
    /// With `nested` set the pattern also accepts any deeper path under the
    /// template, because a nested level resolves the remainder itself.
    pub fn compile(
        template: &str,
        parent_prefix: Option<&str>,
        nested: bool,
    ) -> Result<Self, TemplateError> {
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        if let Some(found) = template
            .chars()
            .find(|c| c.is_whitespace() || FORBIDDEN_CHARS.contains(c))
        {
            return Err(TemplateError::InvalidCharacter {
                template: template.to_string(),
                found,
            });
        }

        let full_path = join_path(parent_prefix.unwrap_or(""), template);
        let mut source = String::from("^");
        let mut param_names: Vec<Option<String>> = Vec::new();

        for (index, segment) in full_path.split('/').filter(|s| !s.is_empty()).enumerate() {
            match segment.strip_prefix(':') {
                Some("") => {
                    return Err(TemplateError::EmptyParamName {
                        template: full_path.clone(),
                    });
                }
                Some(_) if index == 0 => {
                    return Err(TemplateError::DynamicRoot {
                        template: full_path.clone(),
                    });
                }
                Some(name) => {
                    if param_names.iter().flatten().any(|existing| existing == name) {
                        return Err(TemplateError::DuplicateParam {
                            template: full_path.clone(),
                            name: name.to_string(),
                        });
                    }
                    source.push_str("(?:/([^/]*))?");
                    param_names.push(Some(name.to_string()));
                }
                None => {
                    source.push_str("/(");
                    source.push_str(&regex::escape(segment));
                    source.push(')');
                    param_names.push(None);
                }
            }
        }

        if nested {
            source.push_str("/.*");
        } else if normalize_path(template) == "/" {
            // Root needs its slash spelled out; the segment loop emits nothing for it.
            source.push('/');
        }
        source.push('$');

        let regex = build_regex(&source).map_err(|reason| TemplateError::Regex {
            template: full_path.clone(),
            reason,
        })?;

        Ok(Self {
            full_path,
            regex: Some(regex),
            param_names,
            is_wildcard: false,
            nested,
        })
    }

    /// The fallback pattern: matches any location and never yields params.
    pub fn wildcard(nested: bool) -> Self {
        Self {
            full_path: "*".to_string(),
            regex: None,
            param_names: Vec::new(),
            is_wildcard: true,
            nested,
        }
    }

    /// The normalized full path this pattern was compiled from (`*` for the wildcard).
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The regex source, useful for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or("^.*$", Regex::as_str)
    }

    /// Capture-aligned parameter names; `None` marks a literal segment.
    pub fn param_names(&self) -> &[Option<String>] {
        &self.param_names
    }

    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// True when this pattern fronts a nested route-tree level.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Anchored match without parameter validation.
    pub fn is_match(&self, location: &str) -> bool {
        self.regex.as_ref().map_or(true, |regex| regex.is_match(location))
    }

    /// Capture groups for a non-wildcard match.
    pub(crate) fn captures<'t>(&self, location: &'t str) -> Option<regex::Captures<'t>> {
        self.regex.as_ref()?.captures(location)
    }
}

/// Join a prefix and a template with a single separator and no trailing slash.
pub fn join_path(prefix: &str, template: &str) -> String {
    let mut joined = normalize_path(&format!("{}/{}", prefix, template));
    if joined.len() > 1 && joined.ends_with('/') {
        joined.pop();
    }
    joined
}

/// Collapse every run of `/` into a single slash.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        let is_slash = c == '/';
        if !(is_slash && previous_slash) {
            normalized.push(c);
        }
        previous_slash = is_slash;
    }
    normalized
}

fn build_regex(source: &str) -> Result<Regex, String> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(MAX_PATTERN_SIZE)
        .build()
        .map_err(|e| e.to_string())
}
