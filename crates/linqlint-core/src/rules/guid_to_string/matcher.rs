//! Recognizes calls to the watched query sink.

use swc_ecma_ast::{CallExpr, Callee, Expr, ExprOrSpread, MemberProp};

use crate::config::QueryConfig;

#[derive(Debug, Clone)]
pub struct QueryCallMatcher {
    object: String,
    methods: Vec<String>,
}

impl QueryCallMatcher {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            object: config.object.clone(),
            methods: config.methods.clone(),
        }
    }

    /// `<object>.<method>(arg, ...)` with plain identifiers on both sides of
    /// the dot. Computed access such as `linq["execute"]` never matches.
    pub fn matches(&self, call: &CallExpr) -> bool {
        self.query_argument(call).is_some()
    }

    /// The query text argument of a matching call.
    pub fn query_argument<'c>(&self, call: &'c CallExpr) -> Option<&'c ExprOrSpread> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        let Expr::Member(member) = &**callee else {
            return None;
        };
        let Expr::Ident(object) = &*member.obj else {
            return None;
        };
        let MemberProp::Ident(property) = &member.prop else {
            return None;
        };

        let method = &*property.sym;
        if &*object.sym != self.object.as_str() || !self.methods.iter().any(|m| m == method) {
            return None;
        }

        call.args.first()
    }
}

impl Default for QueryCallMatcher {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::{ModuleItem, Stmt};

    use super::*;
    use crate::parser::ParsedFile;

    fn call_of(parsed: &ParsedFile) -> &CallExpr {
        let module = parsed.module().expect("parse failed");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected an expression statement");
        };
        let Expr::Call(call) = &*stmt.expr else {
            panic!("expected a call");
        };
        call
    }

    fn matches_with(matcher: &QueryCallMatcher, code: &str) -> bool {
        let parsed = ParsedFile::from_source("test.js", code);
        matcher.matches(call_of(&parsed))
    }

    fn matches(code: &str) -> bool {
        matches_with(&QueryCallMatcher::default(), code)
    }

    #[test]
    fn matches_default_methods() {
        assert!(matches("linq.execute(q);"));
        assert!(matches("linq.executeWritable(q, params);"));
    }

    #[test]
    fn requires_an_argument() {
        assert!(!matches("linq.execute();"));
    }

    #[test]
    fn other_objects_and_methods_do_not_match() {
        assert!(!matches("db.execute(q);"));
        assert!(!matches("linq.run(q);"));
        assert!(!matches("execute(q);"));
        assert!(!matches("this.linq.execute(q);"));
    }

    #[test]
    fn computed_member_does_not_match() {
        assert!(!matches(r#"linq["execute"](q);"#));
    }

    #[test]
    fn configured_sink_is_respected() {
        let matcher = QueryCallMatcher::new(&QueryConfig {
            object: "db".to_string(),
            methods: vec!["query".to_string()],
        });

        assert!(matches_with(&matcher, "db.query(q);"));
        assert!(!matches_with(&matcher, "linq.execute(q);"));
    }

    #[test]
    fn query_argument_is_the_first_argument() {
        let parsed = ParsedFile::from_source("test.js", "linq.execute(q, params);");

        let arg = QueryCallMatcher::default()
            .query_argument(call_of(&parsed))
            .unwrap();
        assert!(matches!(&*arg.expr, Expr::Ident(ident) if &*ident.sym == "q"));
    }
}
