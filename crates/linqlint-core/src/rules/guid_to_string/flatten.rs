//! Decomposes `+` concatenation chains into their leaf expressions.

use swc_ecma_ast::{BinaryOp, Expr, ExprOrSpread};

/// Leaves of a call argument. Spread arguments yield nothing.
pub fn flatten_argument(arg: &ExprOrSpread) -> Vec<&Expr> {
    if arg.spread.is_some() {
        return Vec::new();
    }
    flatten(&arg.expr)
}

/// Leaves of a `+` chain in source order; `a + b + c` gives `[a, b, c]`.
/// Parentheses and TypeScript assertions are looked through, anything else
/// is a single leaf.
pub fn flatten(expr: &Expr) -> Vec<&Expr> {
    let mut leaves = Vec::new();
    collect(expr, &mut leaves);
    leaves
}

fn collect<'e>(expr: &'e Expr, leaves: &mut Vec<&'e Expr>) {
    match unwrap_expr(expr) {
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            collect(&bin.left, leaves);
            collect(&bin.right, leaves);
        }
        leaf => leaves.push(leaf),
    }
}

/// Strips parentheses and type-only wrappers such as `as const`,
/// `satisfies T`, `<T>x` and `x!`.
pub fn unwrap_expr(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(inner) => &inner.expr,
            Expr::TsAs(inner) => &inner.expr,
            Expr::TsConstAssertion(inner) => &inner.expr,
            Expr::TsSatisfies(inner) => &inner.expr,
            Expr::TsTypeAssertion(inner) => &inner.expr,
            Expr::TsNonNull(inner) => &inner.expr,
            _ => return expr,
        };
    }
}

#[cfg(test)]
mod tests {
    use swc_common::Spanned;
    use swc_ecma_ast::{ModuleItem, Stmt};

    use super::*;
    use crate::parser::ParsedFile;

    /// Source text of each leaf of the first call's first argument.
    fn leaves_of(code: &str) -> Vec<String> {
        leaves_in("test.js", code)
    }

    fn leaves_in(filename: &str, code: &str) -> Vec<String> {
        let parsed = ParsedFile::from_source(filename, code);
        let module = parsed.module().expect("parse failed");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected an expression statement");
        };
        let Expr::Call(call) = &*stmt.expr else {
            panic!("expected a call");
        };

        flatten_argument(&call.args[0])
            .into_iter()
            .map(|leaf| {
                let (lo, hi) = parsed.byte_range(leaf.span()).unwrap();
                parsed.source()[lo..hi].to_string()
            })
            .collect()
    }

    #[test]
    fn single_expression_is_one_leaf() {
        assert_eq!(leaves_of("f('a');"), vec!["'a'"]);
        assert_eq!(leaves_of("f(build(q));"), vec!["build(q)"]);
    }

    #[test]
    fn concatenation_is_flattened_in_source_order() {
        assert_eq!(leaves_of("f('a' + b + `c`);"), vec!["'a'", "b", "`c`"]);
    }

    #[test]
    fn parenthesized_groups_are_transparent() {
        assert_eq!(leaves_of("f(('a' + (b)) + ('c' + d));"), vec!["'a'", "b", "'c'", "d"]);
    }

    #[test]
    fn type_assertions_are_transparent() {
        assert_eq!(
            leaves_in("test.ts", "f(('a' as string) + (b satisfies string) + c!);"),
            vec!["'a'", "b", "c"]
        );
        assert_eq!(leaves_in("test.ts", "f(<string>'a' + b);"), vec!["'a'", "b"]);
    }

    #[test]
    fn other_operators_are_leaves() {
        assert_eq!(leaves_of("f('a' - b + c);"), vec!["'a' - b", "c"]);
        assert_eq!(leaves_of("f(ok ? 'a' : 'b');"), vec!["ok ? 'a' : 'b'"]);
    }

    #[test]
    fn spread_argument_yields_nothing() {
        assert!(leaves_of("f(...parts);").is_empty());
    }
}
