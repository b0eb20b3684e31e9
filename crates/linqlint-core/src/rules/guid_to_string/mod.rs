//! no-guid-to-string rule (P001): Flags `uniqueidentifier` columns converted
//! to `string` inside linq query text
//!
//! Query text is the first argument of a configured sink call such as
//! `linq.execute(...)`. The argument is followed through `+` chains and
//! through local variables back to string literals and templates, whose raw
//! text is scanned for `.someId.toString() === "..."`. Where the comparand is
//! a plain quoted string the comparison is rewritten to compare against
//! `new Guid("...")`.

mod dedup;
mod fix;
mod flatten;
mod location;
mod matcher;
mod resolver;
mod scanner;

use swc_common::Spanned;
use swc_ecma_ast::{CallExpr, Expr, Module};

use crate::config::QueryConfig;
use crate::diagnostic::{Diagnostic, Fix};
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::semantic::{DeclarationLookup, SemanticModel};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

use dedup::Deduplicator;
use flatten::{flatten, flatten_argument, unwrap_expr};
use location::{Position, locate};
use resolver::{VariableResolver, VisitedDeclarators};

pub use matcher::QueryCallMatcher;

pub const RULE_ID: &str = "P001";
pub const RULE_NAME: &str = "no-guid-to-string";
pub const MESSAGE: &str =
    "Possible conversion of `uniqueidentifier` to `string`. This could impact performance.";
pub const FIX_TITLE: &str = "Convert `string` to `Guid` instead";

const METADATA: RuleMetadata = RuleMetadata {
    id: RULE_ID,
    name: RULE_NAME,
    description: "Disallow comparing stringified uniqueidentifier columns in linq queries",
    severity: Severity::Warning,
    docs_url: None,
    examples: Some(
        "// Bad\nlinq.execute('from o in Orders where o.id.toString() === \"42\" select o');\n\n// Good\nlinq.execute('from o in Orders where o.id === new Guid(\"42\") select o');",
    ),
};

pub struct GuidToString {
    metadata: RuleMetadata,
    matcher: QueryCallMatcher,
}

impl GuidToString {
    pub fn new() -> Self {
        Self::with_options(QueryConfig::default())
    }

    pub fn with_options(options: QueryConfig) -> Self {
        Self {
            metadata: METADATA,
            matcher: QueryCallMatcher::new(&options),
        }
    }

    /// Runs the rule over `module` using `lookup` to resolve identifiers.
    pub fn check_module<'a>(
        &self,
        module: &'a Module,
        ctx: &VisitorContext,
        lookup: &dyn DeclarationLookup<'a>,
    ) -> Vec<Diagnostic> {
        let mut visitor = GuidToStringVisitor {
            matcher: &self.matcher,
            resolver: VariableResolver::new(lookup),
            severity: self.metadata.severity,
            dedup: Deduplicator::new(),
            diagnostics: Vec::new(),
        };

        walk_ast(module, &mut visitor, ctx);
        visitor.diagnostics
    }
}

impl Default for GuidToString {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for GuidToString {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let model = SemanticModel::build(module);
        let ctx = VisitorContext::new(file);
        self.check_module(module, &ctx, &model)
    }
}

struct GuidToStringVisitor<'a, 'l> {
    matcher: &'l QueryCallMatcher,
    resolver: VariableResolver<'a, 'l>,
    severity: Severity,
    dedup: Deduplicator,
    diagnostics: Vec<Diagnostic>,
}

impl GuidToStringVisitor<'_, '_> {
    fn check_leaf(
        &mut self,
        leaf: &Expr,
        ctx: &VisitorContext,
        visited: &mut VisitedDeclarators,
    ) {
        match unwrap_expr(leaf) {
            leaf @ (Expr::Lit(_) | Expr::Tpl(_)) => self.scan_leaf(leaf, ctx),
            Expr::Ident(ident) => {
                let resolver = self.resolver;
                resolver.follow(ident, visited, |init, visited| {
                    for next in flatten(init) {
                        self.check_leaf(next, ctx, visited);
                    }
                });
            }
            _ => {}
        }
    }

    fn scan_leaf(&mut self, leaf: &Expr, ctx: &VisitorContext) {
        let span = leaf.span();
        let (Some(raw), Some((line, column))) =
            (ctx.get_source_text(span), ctx.span_to_location(span))
        else {
            tracing::trace!(?span, "leaf without source position, skipping");
            return;
        };
        let start = Position::new(line, column);

        for found in scanner::scan(raw) {
            let reported = found.reported_range();
            let Some((from, to)) = locate(start, raw, reported.clone()) else {
                continue;
            };
            if !self
                .dedup
                .first_sighting((from.line, from.column, to.line, to.column))
            {
                continue;
            }
            tracing::trace!(
                line = from.line,
                column = from.column,
                quoted = found.comparand.is_some(),
                "guid comparison"
            );

            let fixes = fix::rewrite(&raw[reported])
                .map(|new_text| {
                    Fix::replace(FIX_TITLE, new_text, from.line, from.column, to.line, to.column)
                })
                .into_iter();

            let diagnostic = Diagnostic::new(
                RULE_ID,
                self.severity,
                MESSAGE,
                &ctx.file().metadata().filename,
                from.line,
                from.column,
            )
            .with_end(to.line, to.column)
            .with_suggestion("Compare the identifier with a `Guid` value instead of its string form")
            .with_fixes(fixes);

            self.diagnostics.push(diagnostic);
        }
    }
}

impl AstVisitor for GuidToStringVisitor<'_, '_> {
    fn visit_call_expr(&mut self, node: &CallExpr, ctx: &VisitorContext) {
        if let Some(arg) = self.matcher.query_argument(node) {
            tracing::trace!(span = ?node.span, "query call");
            let mut visited = VisitedDeclarators::new();
            for leaf in flatten_argument(arg) {
                self.check_leaf(leaf, ctx, &mut visited);
            }
        }
    }
}
