//! Visitor context providing file information during AST traversal.

use swc_common::Span;

use crate::parser::ParsedFile;

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &'a ParsedFile {
        self.file
    }

    /// 1-based `(line, column)` of the start of `span`.
    pub fn span_to_location(&self, span: Span) -> Option<(usize, usize)> {
        let (lo, _) = self.file.byte_range(span)?;
        self.file.position_of(lo)
    }

    pub fn get_source_text(&self, span: Span) -> Option<&'a str> {
        let (lo, hi) = self.file.byte_range(span)?;
        Some(&self.file.source()[lo..hi])
    }
}
