//! Semantic analysis module
//!
//! Provides the scope tree and symbol table for a module, and answers
//! "which declarator does this name refer to here" for rules that follow
//! data through local variables.

pub mod builder;
pub mod scope;
pub mod symbols;

use std::collections::HashMap;

use swc_common::Span;
use swc_ecma_ast::{Module, VarDeclarator};

pub use builder::ScopeBuilder;
pub use scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbols::{DeclarationKind, Symbol, SymbolId, SymbolKind, SymbolTable};

/// Scope lookup capability handed to rules.
///
/// Returns the nearest enclosing simple-name declarator for `name` as seen
/// from `at`. Names bound by patterns, parameters, imports, functions or
/// classes resolve to `None`, as do names with no local binding at all.
pub trait DeclarationLookup<'a> {
    fn lookup_declaration(&self, name: &str, at: Span) -> Option<&'a VarDeclarator>;
}

pub struct SemanticModel<'a> {
    pub scope_tree: ScopeTree,
    pub symbol_table: SymbolTable,
    pub declarators: HashMap<SymbolId, &'a VarDeclarator>,
}

impl<'a> SemanticModel<'a> {
    pub fn build(module: &'a Module) -> Self {
        ScopeBuilder::build(module)
    }

    pub fn resolve(&self, name: &str, at: Span) -> Option<SymbolId> {
        let scope = self.scope_tree.innermost_at(at.lo)?;
        self.symbol_table.lookup(name, scope, &self.scope_tree)
    }
}

impl<'a> DeclarationLookup<'a> for SemanticModel<'a> {
    fn lookup_declaration(&self, name: &str, at: Span) -> Option<&'a VarDeclarator> {
        let symbol = self.resolve(name, at)?;
        self.declarators.get(&symbol).copied()
    }
}
