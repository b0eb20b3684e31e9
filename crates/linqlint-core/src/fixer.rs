//! Applies `ReplaceWith` fixes to source text.

use crate::diagnostic::{Diagnostic, Fix};
use crate::parser::ParsedFile;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FixError {
    #[error("fix range {line}:{column} is outside the source")]
    OutOfRange { line: usize, column: usize },
    #[error("fix range ends before it starts at {line}:{column}")]
    InvertedRange { line: usize, column: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub source: String,
    pub applied: usize,
    pub skipped: usize,
}

/// Applies the first fix of every diagnostic to `file`'s source.
///
/// Fixes are taken in position order; a fix overlapping one already taken
/// is skipped and counted.
pub fn apply_fixes(file: &ParsedFile, diagnostics: &[Diagnostic]) -> Result<FixOutcome, FixError> {
    let mut edits = Vec::new();
    for fix in diagnostics.iter().filter_map(|d| d.fixes.first()) {
        edits.push(resolve_edit(file, fix)?);
    }
    edits.sort_by_key(|edit| (edit.start, edit.end));

    let source = file.source();
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut applied = 0;
    let mut skipped = 0;

    for edit in edits {
        if edit.start < cursor {
            skipped += 1;
            continue;
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(edit.new_text);
        cursor = edit.end;
        applied += 1;
    }
    output.push_str(&source[cursor..]);

    tracing::debug!(applied, skipped, "applied fixes");
    Ok(FixOutcome {
        source: output,
        applied,
        skipped,
    })
}

struct Edit<'f> {
    start: usize,
    end: usize,
    new_text: &'f str,
}

fn resolve_edit<'f>(file: &ParsedFile, fix: &'f Fix) -> Result<Edit<'f>, FixError> {
    let start = file
        .offset_of(fix.line, fix.column)
        .ok_or(FixError::OutOfRange {
            line: fix.line,
            column: fix.column,
        })?;
    let end = file
        .offset_of(fix.end_line, fix.end_column)
        .ok_or(FixError::OutOfRange {
            line: fix.end_line,
            column: fix.end_column,
        })?;
    if end < start {
        return Err(FixError::InvertedRange {
            line: fix.line,
            column: fix.column,
        });
    }

    Ok(Edit {
        start,
        end,
        new_text: fix.new_text(),
    })
}
