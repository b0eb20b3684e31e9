//! AstVisitor trait for uniform AST traversal.

use swc_ecma_ast::CallExpr;

use super::context::VisitorContext;

pub trait AstVisitor {
    fn visit_call_expr(&mut self, _node: &CallExpr, _ctx: &VisitorContext) {}
}
