//! Visitor pattern for AST traversal.
//!
//! Provides a uniform way to traverse AST nodes with context information.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::AstVisitor;

use swc_ecma_ast::Module;
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    fn visit_call_expr(&mut self, node: &swc_ecma_ast::CallExpr) {
        self.visitor.visit_call_expr(node, self.ctx);
        node.visit_children_with(self);
    }
}

/// Walks `module` in source order, calling back into `visitor`.
pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker { visitor, ctx };
    module.visit_with(&mut walker);
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::CallExpr;

    use super::*;
    use crate::parser::ParsedFile;

    #[test]
    fn visitor_finds_nested_call_expressions() {
        let code = r#"
linq.execute(q);
function load() {
    return linq.executeWritable(build(q));
}
"#;
        let parsed = ParsedFile::from_source("test.js", code);
        let ctx = VisitorContext::new(&parsed);

        struct CallCollector {
            calls: Vec<String>,
        }

        impl AstVisitor for CallCollector {
            fn visit_call_expr(&mut self, node: &CallExpr, ctx: &VisitorContext) {
                if let Some(text) = ctx.get_source_text(node.span) {
                    self.calls.push(text.to_string());
                }
            }
        }

        let mut collector = CallCollector { calls: Vec::new() };
        walk_ast(parsed.module().unwrap(), &mut collector, &ctx);

        assert_eq!(
            collector.calls,
            vec!["linq.execute(q)", "linq.executeWritable(build(q))", "build(q)"]
        );
    }
}
