//! Parameter pass: replace the value on the line after each `@param`.

use injecto_data::{DataTree, format_value};

use crate::line::{is_commented, split_terminator};
use crate::parser::{AssignmentLine, parse_param};
use crate::warning::DirectiveWarning;

/// Output of the parameter pass.
#[derive(Debug)]
pub(crate) struct ParamPassOutput {
    /// Lines after substitution (same count as the input).
    pub lines: Vec<String>,
    /// Lines whose value actually changed.
    pub replacements: usize,
}

/// Run the parameter pass over the section pass output.
///
/// Directives are read from `lines`; only the target line (the one after the
/// directive) is ever rewritten.
pub(crate) fn run(
    data: &DataTree,
    lines: &[String],
    warnings: &mut Vec<DirectiveWarning>,
) -> ParamPassOutput {
    let mut output = lines.to_vec();
    let mut replacements = 0;

    for (idx, line) in lines.iter().enumerate() {
        let Some(path) = parse_param(line) else {
            continue;
        };
        let line_no = idx + 1;
        let warning_path = || path.to_owned();

        let Some(target) = lines.get(idx + 1) else {
            warnings.push(DirectiveWarning::DirectiveOnLastLine {
                line: line_no,
                path: warning_path(),
            });
            continue;
        };

        let Some(value) = data.resolve(path) else {
            warnings.push(DirectiveWarning::PathNotFound {
                line: line_no,
                path: warning_path(),
            });
            continue;
        };
        if value.is_null() {
            warnings.push(DirectiveWarning::NullValue {
                line: line_no,
                path: warning_path(),
            });
            continue;
        }

        // Disabled lines (e.g. inside a commented-out section) keep their value
        if is_commented(target) {
            continue;
        }

        let (body, terminator) = split_terminator(target);
        let Some(assignment) = AssignmentLine::parse(body) else {
            warnings.push(DirectiveWarning::NoAssignmentTarget {
                line: line_no,
                path: warning_path(),
            });
            continue;
        };

        let formatted = match format_value(value) {
            Ok(formatted) => formatted,
            Err(error) => {
                warnings.push(DirectiveWarning::UnsupportedValue {
                    line: line_no,
                    path: warning_path(),
                    error,
                });
                continue;
            }
        };

        let new_line = format!("{}{terminator}", assignment.with_value(&formatted));
        if output[idx + 1] != new_line {
            output[idx + 1] = new_line;
            replacements += 1;
        }
    }

    ParamPassOutput {
        lines: output,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use injecto_data::{DataSource, FormatError, load_and_merge};

    use super::*;

    fn run_text(yaml: &str, text: &str) -> (String, usize, Vec<DirectiveWarning>) {
        let data = load_and_merge(&[DataSource::inline("test", yaml)]).unwrap();
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_owned).collect();
        let mut warnings = Vec::new();
        let out = run(&data, &lines, &mut warnings);
        (out.lines.concat(), out.replacements, warnings)
    }

    #[test]
    fn test_replaces_equals_value_keeping_comment() {
        let (out, count, warnings) = run_text(
            "db:\n  port: 9000",
            "# @param db.port\nport = 5432  # default\n",
        );
        assert_eq!(out, "# @param db.port\nport = 9000  # default\n");
        assert_eq!(count, 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_replaces_quoted_string() {
        let (out, count, _) = run_text(
            "app:\n  name: new",
            "# @param app.name\nname: \"old\"\n",
        );
        assert_eq!(out, "# @param app.name\nname: \"new\"\n");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_keeps_indentation_and_sequence_marker() {
        let (out, _, _) = run_text(
            "svc: api",
            "services:\n  # @param svc\n  - name: web\n",
        );
        assert_eq!(out, "services:\n  # @param svc\n  - name: \"api\"\n");
    }

    #[test]
    fn test_preserves_crlf_terminator() {
        let (out, _, _) = run_text("n: 2", "# @param n\r\nreplicas: 1\r\n");
        assert_eq!(out, "# @param n\r\nreplicas: 2\r\n");
    }

    #[test]
    fn test_unterminated_last_line_stays_unterminated() {
        let (out, _, _) = run_text("n: 2", "# @param n\nreplicas: 1");
        assert_eq!(out, "# @param n\nreplicas: 2");
    }

    #[test]
    fn test_unchanged_value_not_counted() {
        let input = "# @param n\nreplicas: 2\n";
        let (out, count, _) = run_text("n: 2", input);
        assert_eq!(out, input);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_structured_values() {
        let (out, _, _) = run_text(
            "hosts: [a, b]\nflags:\n  debug: true",
            "# @param hosts\nhosts: []\n# @param flags\nflags: {}\n",
        );
        assert_eq!(
            out,
            "# @param hosts\nhosts: [\"a\", \"b\"]\n# @param flags\nflags: {\"debug\": true}\n"
        );
    }

    #[test]
    fn test_boolean_value() {
        let (out, _, _) = run_text("on: false", "# @param on\nenabled = yes\n");
        assert_eq!(out, "# @param on\nenabled = false\n");
    }

    #[test]
    fn test_missing_path_warns_and_skips() {
        let input = "# @param db.host\nhost: localhost\n";
        let (out, count, warnings) = run_text("db:\n  port: 1", input);
        assert_eq!(out, input);
        assert_eq!(count, 0);
        assert_eq!(
            warnings,
            vec![DirectiveWarning::PathNotFound {
                line: 1,
                path: "db.host".to_owned()
            }]
        );
    }

    #[test]
    fn test_null_value_warns_and_skips() {
        let input = "# @param v\nvalue: 1\n";
        let (out, _, warnings) = run_text("v: ~", input);
        assert_eq!(out, input);
        assert!(matches!(warnings[0], DirectiveWarning::NullValue { line: 1, .. }));
    }

    #[test]
    fn test_commented_target_skipped_silently() {
        let input = "# @param v\n# value: 1\n";
        let (out, count, warnings) = run_text("v: 2", input);
        assert_eq!(out, input);
        assert_eq!(count, 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_no_assignment_shape_warns() {
        let input = "# @param v\njust text\n";
        let (out, _, warnings) = run_text("v: 2", input);
        assert_eq!(out, input);
        assert!(matches!(
            warnings[0],
            DirectiveWarning::NoAssignmentTarget { line: 1, .. }
        ));
    }

    #[test]
    fn test_directive_on_last_line_warns() {
        let input = "a: 1\n# @param v\n";
        let (out, _, warnings) = run_text("v: 2", input);
        assert_eq!(out, input);
        assert_eq!(
            warnings,
            vec![DirectiveWarning::DirectiveOnLastLine {
                line: 2,
                path: "v".to_owned()
            }]
        );
    }

    #[test]
    fn test_unsupported_value_warns() {
        let input = "# @param v\nvalue: 1\n";
        let (out, _, warnings) = run_text("v: !secret abc", input);
        assert_eq!(out, input);
        assert_eq!(
            warnings,
            vec![DirectiveWarning::UnsupportedValue {
                line: 1,
                path: "v".to_owned(),
                error: FormatError::UnsupportedValueType("tagged value"),
            }]
        );
    }

    #[test]
    fn test_consecutive_directives_only_last_applies() {
        let input = "# @param a\n# @param b\nkey: 0\n";
        let (out, count, warnings) = run_text("a: 1\nb: 2", input);
        assert_eq!(out, "# @param a\n# @param b\nkey: 2\n");
        assert_eq!(count, 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_multiple_directives_in_file() {
        let input = "\
# @param app.name
name: old
# @param app.port
port: 80 # http
other: untouched
";
        let (out, count, _) = run_text("app:\n  name: svc\n  port: 8080", input);
        assert_eq!(
            out,
            "\
# @param app.name
name: \"svc\"
# @param app.port
port: 8080 # http
other: untouched
"
        );
        assert_eq!(count, 2);
    }
}
