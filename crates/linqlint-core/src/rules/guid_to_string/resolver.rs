//! Follows identifiers back to the initializer of their declarator.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{Expr, Ident};

use crate::semantic::DeclarationLookup;

/// Declarators already followed from one call site, keyed by declarator span.
///
/// Entries are never removed, so each declarator is expanded at most once
/// per call site however many routes lead to it.
#[derive(Debug, Default)]
pub struct VisitedDeclarators {
    seen: HashSet<Span>,
}

impl VisitedDeclarators {
    pub fn new() -> Self {
        Self::default()
    }

    fn first_visit(&mut self, declarator: Span) -> bool {
        self.seen.insert(declarator)
    }
}

#[derive(Clone, Copy)]
pub struct VariableResolver<'a, 'l> {
    lookup: &'l dyn DeclarationLookup<'a>,
}

impl<'a, 'l> VariableResolver<'a, 'l> {
    pub fn new(lookup: &'l dyn DeclarationLookup<'a>) -> Self {
        Self { lookup }
    }

    /// Runs `visit` on the initializer `ident` refers to.
    ///
    /// Nothing happens when the name is unresolved, the declarator has no
    /// initializer, or the declarator was already followed from this call
    /// site.
    pub fn follow<F>(&self, ident: &Ident, visited: &mut VisitedDeclarators, visit: F)
    where
        F: FnOnce(&'a Expr, &mut VisitedDeclarators),
    {
        let Some(declarator) = self.lookup.lookup_declaration(&ident.sym, ident.span) else {
            return;
        };
        let Some(init) = declarator.init.as_deref() else {
            return;
        };
        if !visited.first_visit(declarator.span) {
            tracing::trace!(name = %ident.sym, "declarator already followed");
            return;
        }

        visit(init, visited);
    }
}
