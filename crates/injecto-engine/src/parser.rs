//! Directive syntax recognition.
//!
//! Directives live in comments:
//!
//! - `# @section <key> begin` / `# @section <key> end`
//! - `# @param <key>`
//!
//! Keys are made of word characters, dots and hyphens.

use std::sync::LazyLock;

use regex::Regex;

static SECTION_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*@section\s+([\w.-]+)\s+begin").unwrap());

static SECTION_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*@section\s+([\w.-]+)\s+end").unwrap());

static PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*@param\s+([\w.-]+)").unwrap());

/// Assignment shape of a parameter target: `key:`, `key =`, `- key:`.
static ASSIGNMENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-\s+)?[\w.-]+\s*[:=]").unwrap());

static TRAILING_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*#.*").unwrap());

/// Section marker found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionMarker<'a> {
    /// `# @section <key> begin`
    Begin(&'a str),
    /// `# @section <key> end`
    End(&'a str),
}

/// Parse a section marker. `begin` wins if a line somehow carries both.
pub(crate) fn parse_section_marker(line: &str) -> Option<SectionMarker<'_>> {
    if let Some(key) = capture_key(&SECTION_BEGIN, line) {
        return Some(SectionMarker::Begin(key));
    }
    capture_key(&SECTION_END, line).map(SectionMarker::End)
}

/// Parse a parameter directive, returning its key.
pub(crate) fn parse_param(line: &str) -> Option<&str> {
    capture_key(&PARAM, line)
}

fn capture_key<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parsed parameter target line (without terminator).
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct AssignmentLine<'a> {
    /// Everything up to and including `:` / `=`.
    pub prefix: &'a str,
    /// Inline comment after the old value, with its leading whitespace.
    pub trailing_comment: &'a str,
}

impl<'a> AssignmentLine<'a> {
    /// Match the assignment shape; `None` if the line has no assignable target.
    pub(crate) fn parse(body: &'a str) -> Option<Self> {
        let prefix = ASSIGNMENT_PREFIX.find(body)?;
        let value_part = &body[prefix.end()..];
        let trailing_comment = TRAILING_COMMENT
            .find(value_part)
            .map_or("", |m| m.as_str());
        Some(Self {
            prefix: prefix.as_str(),
            trailing_comment,
        })
    }

    /// Rebuild the line with a new value.
    pub(crate) fn with_value(&self, value: &str) -> String {
        format!(
            "{} {value}{}",
            self.prefix.trim_end(),
            self.trailing_comment
        )
    }
}
