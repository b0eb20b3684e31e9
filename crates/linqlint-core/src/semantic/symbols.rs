//! Symbol table for tracking declarations
//!
//! Stores every binding with the scope it lives in and supports lookup
//! with scope chain traversal.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;
use swc_ecma_ast::VarDeclKind;

use super::scope::{ScopeId, ScopeTree};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Class,
    Parameter,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Using,
    Function,
    Class,
    Parameter,
    Import,
}

impl From<VarDeclKind> for DeclarationKind {
    fn from(kind: VarDeclKind) -> Self {
        match kind {
            VarDeclKind::Var => DeclarationKind::Var,
            VarDeclKind::Let => DeclarationKind::Let,
            VarDeclKind::Const => DeclarationKind::Const,
        }
    }
}

impl DeclarationKind {
    pub fn symbol_kind(self) -> SymbolKind {
        match self {
            DeclarationKind::Var | DeclarationKind::Let => SymbolKind::Variable,
            DeclarationKind::Const | DeclarationKind::Using => SymbolKind::Constant,
            DeclarationKind::Function => SymbolKind::Function,
            DeclarationKind::Class => SymbolKind::Class,
            DeclarationKind::Parameter => SymbolKind::Parameter,
            DeclarationKind::Import => SymbolKind::Import,
        }
    }
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub declaration_kind: DeclarationKind,
    pub scope: ScopeId,
    pub span: Span,
}

pub struct SymbolTable {
    arena: Arena<Symbol>,
    by_scope: HashMap<ScopeId, HashMap<String, SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    /// Redeclaring a name in the same scope replaces the earlier binding.
    pub fn declare(
        &mut self,
        name: &str,
        declaration_kind: DeclarationKind,
        scope: ScopeId,
        span: Span,
    ) -> SymbolId {
        let id = self.arena.alloc_with_id(|id| Symbol {
            id,
            name: name.to_string(),
            kind: declaration_kind.symbol_kind(),
            declaration_kind,
            scope,
            span,
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    pub fn lookup(&self, name: &str, scope: ScopeId, scope_tree: &ScopeTree) -> Option<SymbolId> {
        scope_tree.ancestors(scope).find_map(|s| {
            self.by_scope
                .get(&s.id)
                .and_then(|symbols| symbols.get(name).copied())
        })
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id]
    }

    pub fn symbols_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.by_scope
            .get(&scope)
            .into_iter()
            .flat_map(|symbols| symbols.values().map(|&id| &self.arena[id]))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}
