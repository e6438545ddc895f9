//! Directive processing engine for Injecto.
//!
//! Rewrites the text of one file according to comment directives:
//!
//! - **Sections**: `# @section <path> begin` ... `# @section <path> end`
//!   comments out the enclosed lines when `<path>` resolves to `false` and
//!   uncomments them otherwise. Sections nest; the innermost open section
//!   governs each line.
//! - **Parameters**: `# @param <path>` replaces the value on the following
//!   `key: value` / `key = value` / `- key: value` line, keeping indentation,
//!   the key and any trailing comment.
//!
//! # Architecture
//!
//! Each file goes through two sequential passes:
//!
//! 1. **Section pass**: a single top-down walk with an explicit stack of
//!    [`SectionFrame`]s toggles comment state.
//! 2. **Parameter pass**: runs on the section pass output, so a line that was
//!    just uncommented can receive its value.
//!
//! Problems with individual directives never abort processing; they are
//! returned as [`DirectiveWarning`]s.
//!
//! # Example
//!
//! ```
//! use injecto_data::{DataSource, load_and_merge};
//! use injecto_engine::Engine;
//!
//! let data = load_and_merge(&[DataSource::inline(
//!     "values",
//!     "db:\n  port: 9000\ncache: false\n",
//! )])
//! .unwrap();
//!
//! let input = "\
//! ## @param db.port
//! port = 5432  # default
//! ## @section cache begin
//! cache_size: 64
//! ## @section cache end
//! ";
//!
//! let result = Engine::new(&data).process(input);
//! assert_eq!(
//!     result.text,
//!     "\
//! ## @param db.port
//! port = 9000  # default
//! ## @section cache begin
//! ## cache_size: 64
//! ## @section cache end
//! "
//! );
//! assert_eq!(result.replacements, 1);
//! assert_eq!(result.section_toggles, 1);
//! ```

mod line;
mod param;
mod parser;
mod section;
mod warning;

use injecto_data::DataTree;

pub use section::{SectionFrame, SectionStack};
pub use warning::DirectiveWarning;

/// Result of processing one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    /// Rewritten text.
    pub text: String,
    /// Whether `text` differs from the input.
    pub changed: bool,
    /// Lines whose comment state was toggled by sections.
    pub section_toggles: usize,
    /// Lines whose value was replaced by parameters.
    pub replacements: usize,
    /// Directives that could not be applied.
    pub warnings: Vec<DirectiveWarning>,
}

/// Applies directives using a merged data tree.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    data: &'a DataTree,
}

impl<'a> Engine<'a> {
    /// Create an engine over `data`.
    #[must_use]
    pub fn new(data: &'a DataTree) -> Self {
        Self { data }
    }

    /// Run the section pass, then the parameter pass, over `input`.
    #[must_use]
    pub fn process(&self, input: &str) -> ProcessedFile {
        let lines = line::split_lines(input);
        let mut warnings = Vec::new();

        let sections = section::run(self.data, &lines, &mut warnings);
        let params = param::run(self.data, &sections.lines, &mut warnings);

        let text = params.lines.concat();
        ProcessedFile {
            changed: text != input,
            text,
            section_toggles: sections.toggles,
            replacements: params.replacements,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use injecto_data::{DataSource, load_and_merge};

    use super::*;

    fn data(yaml: &str) -> DataTree {
        load_and_merge(&[DataSource::inline("test", yaml)]).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let data = data("a: 1");
        let result = Engine::new(&data).process("");
        assert_eq!(result.text, "");
        assert!(!result.changed);
    }

    #[test]
    fn test_plain_file_unchanged() {
        let data = data("a: 1");
        let input = "key: value\n# comment\n\nother = 2\n";
        let result = Engine::new(&data).process(input);
        assert_eq!(result.text, input);
        assert!(!result.changed);
        assert_eq!(result.section_toggles, 0);
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_uncommented_line_receives_param() {
        let data = data("redis:\n  enabled: true\n  host: cache.internal");
        let input = "\
# @section redis.enabled begin
# @param redis.host
# host: localhost
# @section redis.enabled end
";
        let result = Engine::new(&data).process(input);
        assert_eq!(
            result.text,
            "\
# @section redis.enabled begin
# @param redis.host
host: \"cache.internal\"
# @section redis.enabled end
"
        );
        assert_eq!(result.section_toggles, 1);
        assert_eq!(result.replacements, 1);
        assert!(result.changed);
    }

    #[test]
    fn test_disabled_section_keeps_param_target() {
        let data = data("redis:\n  enabled: false\n  host: cache.internal");
        let input = "\
# @section redis.enabled begin
# @param redis.host
host: localhost
# @section redis.enabled end
";
        let result = Engine::new(&data).process(input);
        assert_eq!(
            result.text,
            "\
# @section redis.enabled begin
# @param redis.host
# host: localhost
# @section redis.enabled end
"
        );
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_second_run_is_stable() {
        let data = data("flag: false\nname: svc\nport: 8080");
        let input = "\
# @param name
name: old
# @section flag begin
debug: true
  # @param port
  port: 1
# @section flag end
";
        let engine = Engine::new(&data);
        let first = engine.process(input);
        assert!(first.changed);

        let second = engine.process(&first.text);
        assert_eq!(second.text, first.text);
        assert!(!second.changed);
        assert_eq!(second.section_toggles, 0);
        assert_eq!(second.replacements, 0);
    }

    #[test]
    fn test_warnings_collected_from_both_passes() {
        let data = data("a: false");
        let input = "\
# @section a begin
# @section b end
# @section a end
# @param missing
key: 1
";
        let result = Engine::new(&data).process(input);
        let lines: Vec<_> = result.warnings.iter().map(DirectiveWarning::line).collect();
        assert_eq!(lines, vec![2, 4]);
    }
}
