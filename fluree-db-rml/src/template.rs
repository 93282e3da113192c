//! Template parsing and expansion
//!
//! A template is a string with `{name}` placeholders. Each placeholder names a
//! field of the current record; expansion substitutes every value of every
//! placeholder, producing the cartesian product of candidate strings.
//!
//! # Syntax
//!
//! - `{name}` opens at a `{` not immediately preceded by a backslash and closes
//!   at the first following `}` not immediately preceded by a backslash.
//!   Placeholders do not nest, hold at least one character and never span a
//!   line break.
//! - `\{` and `\}` are literal braces, both in template text and inside a
//!   placeholder name.
//! - Names are otherwise taken verbatim: no trimming, no case folding.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::CoercionPolicy;
use crate::context::IterationContext;
use crate::error::RmlResult;
use crate::iri::to_iri_safe;

/// A placeholder occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Referenced field name, unescaped
    pub name: String,
    /// The placeholder exactly as written, braces and escapes included
    pub raw: String,
    /// Byte offset of the opening brace
    pub start: usize,
    /// Byte offset one past the closing brace
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Template text as written; escapes are resolved after substitution
    Literal(String),
    Placeholder(Placeholder),
}

/// Parsed template
///
/// Parsing happens once at construction; [`Template::generate`] only walks the
/// pre-split segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Template {
    pattern: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template pattern
    ///
    /// Every string is a valid pattern: unmatched braces are template text.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let placeholders = parse_placeholders(&pattern);

        let mut segments = Vec::with_capacity(placeholders.len() * 2 + 1);
        let mut cursor = 0;
        for placeholder in placeholders {
            if placeholder.start > cursor {
                segments.push(Segment::Literal(
                    pattern[cursor..placeholder.start].to_string(),
                ));
            }
            cursor = placeholder.end;
            segments.push(Segment::Placeholder(placeholder));
        }
        if cursor < pattern.len() {
            segments.push(Segment::Literal(pattern[cursor..].to_string()));
        }

        Self { pattern, segments }
    }

    /// The pattern as written
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder occurrences in pattern order, repeats included
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    /// Field names referenced by this template, in pattern order
    pub fn referenced_names(&self) -> Vec<&str> {
        self.placeholders().map(|p| p.name.as_str()).collect()
    }

    /// Check if the template has no placeholders
    pub fn is_constant(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Expand the template against a record
    ///
    /// Placeholders are substituted in pattern order; for each one, every
    /// current candidate is combined with every value of the referenced field,
    /// so earlier placeholders vary slowest. Null values are dropped. A
    /// placeholder without values yields no candidates at all, which is the
    /// normal "no term" outcome.
    ///
    /// With `safe`, substituted values are IRI-safe encoded. Once every
    /// placeholder is substituted, remaining `\{` and `\}` sequences are
    /// unescaped in each candidate, substituted text included.
    pub fn generate<C>(&self, ctx: &C, safe: bool, policy: CoercionPolicy) -> RmlResult<Vec<String>>
    where
        C: IterationContext + ?Sized,
    {
        let mut candidates = vec![String::new()];

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    for candidate in &mut candidates {
                        candidate.push_str(text);
                    }
                }
                Segment::Placeholder(placeholder) => {
                    let values = ctx.strings_for(&placeholder.name, policy)?;
                    if values.is_empty() {
                        tracing::debug!(
                            template = %self.pattern,
                            reference = %placeholder.name,
                            "No values for placeholder, template yields no terms"
                        );
                        return Ok(Vec::new());
                    }

                    let values: Vec<Cow<'_, str>> = values
                        .iter()
                        .map(|v| {
                            if safe {
                                Cow::Owned(to_iri_safe(v))
                            } else {
                                Cow::Borrowed(v.as_str())
                            }
                        })
                        .collect();

                    let mut expanded = Vec::with_capacity(candidates.len() * values.len());
                    for candidate in &candidates {
                        for value in &values {
                            let mut s = String::with_capacity(candidate.len() + value.len());
                            s.push_str(candidate);
                            s.push_str(value);
                            expanded.push(s);
                        }
                    }
                    candidates = expanded;
                }
            }
        }

        Ok(candidates
            .iter()
            .map(|candidate| unescape_braces(candidate))
            .collect())
    }
}

impl From<String> for Template {
    fn from(pattern: String) -> Self {
        Template::new(pattern)
    }
}

impl From<&str> for Template {
    fn from(pattern: &str) -> Self {
        Template::new(pattern)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.pattern
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Expand a template pattern against a record
///
/// Convenience for one-off expansion; parse once with [`Template::new`] when
/// the same pattern is expanded for many records.
pub fn expand_template<C>(
    pattern: &str,
    ctx: &C,
    safe: bool,
    policy: CoercionPolicy,
) -> RmlResult<Vec<String>>
where
    C: IterationContext + ?Sized,
{
    Template::new(pattern).generate(ctx, safe, policy)
}

/// Placeholder body: non-empty, no line terminators, and the closing `}`
/// not preceded by a backslash. The opening brace is checked separately in
/// [`parse_placeholders`].
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^\n\r\x{85}\x{2028}\x{2029}]*?[^\\\n\r\x{85}\x{2028}\x{2029}])\}")
        .expect("valid regex")
});

/// Find the placeholder occurrences of a pattern, in order
///
/// An opening `{` immediately preceded by a backslash is literal; matching
/// resumes at the next character.
pub fn parse_placeholders(pattern: &str) -> Vec<Placeholder> {
    let bytes = pattern.as_bytes();
    let mut placeholders = Vec::new();
    let mut pos = 0;

    while let Some(cap) = PLACEHOLDER_RE.captures_at(pattern, pos) {
        let (Some(full), Some(body)) = (cap.get(0), cap.get(1)) else {
            break;
        };
        if full.start() > 0 && bytes[full.start() - 1] == b'\\' {
            pos = full.start() + 1;
            continue;
        }
        placeholders.push(Placeholder {
            name: unescape_braces(body.as_str()),
            raw: full.as_str().to_string(),
            start: full.start(),
            end: full.end(),
        });
        pos = full.end();
    }

    placeholders
}

/// Unescape literal braces in template text
fn unescape_braces(text: &str) -> String {
    text.replace("\\{", "{").replace("\\}", "}")
}
