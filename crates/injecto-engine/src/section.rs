//! Section pass: comment or uncomment lines inside `@section` blocks.

use injecto_data::{DataTree, Value};

use crate::line::{comment_out, is_blank, is_commented, uncomment};
use crate::parser::{SectionMarker, parse_section_marker};
use crate::warning::DirectiveWarning;

/// One open `@section` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFrame {
    /// Dotted path named by the opening marker.
    pub key: String,
    /// True iff the path resolved to exactly boolean `false`.
    pub should_be_commented: bool,
}

impl SectionFrame {
    /// Build a frame from the resolved value of its key.
    ///
    /// Only `false` comments the block out; any other value (or absence)
    /// leaves it active.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            key: key.into(),
            should_be_commented: matches!(value, Some(Value::Bool(false))),
        }
    }

    /// Apply this frame's policy to a non-marker line.
    ///
    /// Returns the toggled line, or `None` if the line stays as is.
    fn apply(&self, line: &str) -> Option<String> {
        if self.should_be_commented {
            (!is_commented(line) && !is_blank(line)).then(|| comment_out(line))
        } else if is_commented(line) {
            uncomment(line)
        } else {
            None
        }
    }
}

/// Stack of open sections. The innermost frame governs each line.
#[derive(Debug, Default)]
pub struct SectionStack {
    frames: Vec<SectionFrame>,
}

impl SectionStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost open frame.
    #[must_use]
    pub fn innermost(&self) -> Option<&SectionFrame> {
        self.frames.last()
    }

    /// Number of open frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a section.
    pub fn push(&mut self, frame: SectionFrame) {
        self.frames.push(frame);
    }

    /// Close the innermost section if its key is `key`.
    ///
    /// On mismatch the stack is left untouched and the key of the innermost
    /// open frame (if any) is returned as the error.
    pub fn close(&mut self, key: &str) -> Result<SectionFrame, Option<String>> {
        match self.frames.pop() {
            Some(top) if top.key == key => Ok(top),
            Some(top) => {
                let open = top.key.clone();
                self.frames.push(top);
                Err(Some(open))
            }
            None => Err(None),
        }
    }
}

/// Output of the section pass.
#[derive(Debug)]
pub(crate) struct SectionPassOutput {
    /// Lines after toggling (same count as the input).
    pub lines: Vec<String>,
    /// Lines whose comment state changed.
    pub toggles: usize,
}

/// Run the section pass over `lines`.
pub(crate) fn run(
    data: &DataTree,
    lines: &[&str],
    warnings: &mut Vec<DirectiveWarning>,
) -> SectionPassOutput {
    let mut stack = SectionStack::new();
    let mut output = Vec::with_capacity(lines.len());
    let mut toggles = 0;

    for (idx, &line) in lines.iter().enumerate() {
        let marker = parse_section_marker(line);

        let toggled = match (marker, stack.innermost()) {
            (None, Some(frame)) => frame.apply(line).filter(|toggled| toggled != line),
            _ => None,
        };
        if let Some(toggled) = toggled {
            toggles += 1;
            output.push(toggled);
        } else {
            output.push(line.to_owned());
        }

        match marker {
            Some(SectionMarker::Begin(key)) => {
                let value = data.resolve(key);
                if value.is_none() {
                    warnings.push(DirectiveWarning::PathNotFound {
                        line: idx + 1,
                        path: key.to_owned(),
                    });
                }
                stack.push(SectionFrame::new(key, value));
            }
            Some(SectionMarker::End(key)) => {
                if let Err(open) = stack.close(key) {
                    warnings.push(DirectiveWarning::MismatchedSectionEnd {
                        line: idx + 1,
                        key: key.to_owned(),
                        open,
                    });
                }
            }
            None => {}
        }
    }

    SectionPassOutput {
        lines: output,
        toggles,
    }
}
