//! Scope builder producing a [`SemanticModel`] from a module
//!
//! Traversal is hand-written instead of going through `swc_ecma_visit` so
//! that declarators can be kept as references tied to the module's lifetime.

use std::collections::HashMap;

use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, Class, ClassMember, Decl, Expr, ForHead,
    ForInStmt, ForOfStmt, ForStmt, Function, ImportSpecifier, JSXAttrOrSpread, JSXAttrValue,
    JSXElement, JSXElementChild, JSXExpr, MemberProp, Module, ModuleDecl, ModuleItem,
    ObjectPatProp, OptChainBase, ParamOrTsParamProp, Pat, Prop, PropName, PropOrSpread, Stmt,
    SwitchStmt, TryStmt, TsParamPropParam, VarDecl, VarDeclOrExpr, VarDeclarator,
};

use super::SemanticModel;
use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::symbols::{DeclarationKind, SymbolId, SymbolTable};

pub struct ScopeBuilder<'a> {
    scope_tree: ScopeTree,
    symbol_table: SymbolTable,
    declarators: HashMap<SymbolId, &'a VarDeclarator>,
    current_scope: ScopeId,
}

impl<'a> ScopeBuilder<'a> {
    pub fn build(module: &'a Module) -> SemanticModel<'a> {
        let mut scope_tree = ScopeTree::new();
        let root = scope_tree.create_scope(ScopeKind::Module, None, module.span);

        let mut builder = Self {
            scope_tree,
            symbol_table: SymbolTable::new(),
            declarators: HashMap::new(),
            current_scope: root,
        };
        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(decl) => builder.visit_module_decl(decl),
                ModuleItem::Stmt(stmt) => builder.visit_stmt(stmt),
            }
        }

        tracing::trace!(
            symbols = builder.symbol_table.len(),
            declarators = builder.declarators.len(),
            "built semantic model"
        );

        SemanticModel {
            scope_tree: builder.scope_tree,
            symbol_table: builder.symbol_table,
            declarators: builder.declarators,
        }
    }

    fn visit_module_decl(&mut self, decl: &'a ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare_symbol(&local.sym, DeclarationKind::Import, local.span);
                }
            }
            ModuleDecl::ExportDecl(export_decl) => self.visit_decl(&export_decl.decl),
            ModuleDecl::ExportDefaultDecl(export_default) => {
                if let Some(fn_expr) = export_default.decl.as_fn_expr() {
                    if let Some(ident) = &fn_expr.ident {
                        self.declare_symbol(&ident.sym, DeclarationKind::Function, ident.span);
                    }
                    self.visit_function(&fn_expr.function);
                } else if let Some(class_expr) = export_default.decl.as_class() {
                    if let Some(ident) = &class_expr.ident {
                        self.declare_symbol(&ident.sym, DeclarationKind::Class, ident.span);
                    }
                    self.visit_class(&class_expr.class);
                }
            }
            ModuleDecl::ExportDefaultExpr(export_expr) => self.visit_expr(&export_expr.expr),
            _ => {}
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Block(block) => self.visit_block_stmt(block),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::For(for_stmt) => self.visit_for_stmt(for_stmt),
            Stmt::ForIn(for_in) => self.visit_for_in_stmt(for_in),
            Stmt::ForOf(for_of) => self.visit_for_of_stmt(for_of),
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test);
                self.with_scope(ScopeKind::While, while_stmt.span, |this| {
                    this.visit_stmt(&while_stmt.body)
                });
            }
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body);
                self.visit_expr(&do_while.test);
            }
            Stmt::Switch(switch_stmt) => self.visit_switch_stmt(switch_stmt),
            Stmt::Try(try_stmt) => self.visit_try_stmt(try_stmt),
            Stmt::With(with_stmt) => {
                self.visit_expr(&with_stmt.obj);
                self.visit_stmt(&with_stmt.body);
            }
            Stmt::Labeled(labeled) => self.visit_stmt(&labeled.body),
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Throw(throw_stmt) => self.visit_expr(&throw_stmt.arg),
            Stmt::Expr(expr_stmt) => self.visit_expr(&expr_stmt.expr),
            _ => {}
        }
    }

    fn visit_decl(&mut self, decl: &'a Decl) {
        match decl {
            Decl::Var(var_decl) => self.visit_var_decl(var_decl),
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.visit_var_declarator(declarator, DeclarationKind::Using);
                }
            }
            Decl::Fn(fn_decl) => {
                self.declare_symbol(
                    &fn_decl.ident.sym,
                    DeclarationKind::Function,
                    fn_decl.ident.span,
                );
                self.visit_function(&fn_decl.function);
            }
            Decl::Class(class_decl) => {
                self.declare_symbol(
                    &class_decl.ident.sym,
                    DeclarationKind::Class,
                    class_decl.ident.span,
                );
                self.visit_class(&class_decl.class);
            }
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, var_decl: &'a VarDecl) {
        let kind = DeclarationKind::from(var_decl.kind);
        for declarator in &var_decl.decls {
            self.visit_var_declarator(declarator, kind);
        }
    }

    /// Only a plain `name = init` binding is recorded as resolvable; every
    /// name a pattern introduces still shadows outer bindings.
    fn visit_var_declarator(&mut self, declarator: &'a VarDeclarator, kind: DeclarationKind) {
        match &declarator.name {
            Pat::Ident(binding) => {
                let id = self.declare_symbol(&binding.id.sym, kind, binding.id.span);
                self.declarators.insert(id, declarator);
            }
            pat => self.declare_pat(pat, kind),
        }

        if let Some(init) = &declarator.init {
            self.visit_expr(init);
        }
    }

    fn visit_function(&mut self, func: &'a Function) {
        let Some(body) = &func.body else {
            return;
        };

        self.with_scope(ScopeKind::Function, func.span, |this| {
            for param in &func.params {
                this.declare_pat(&param.pat, DeclarationKind::Parameter);
            }
            for stmt in &body.stmts {
                this.visit_stmt(stmt);
            }
        });
    }

    fn visit_arrow_expr(&mut self, arrow: &'a ArrowExpr) {
        self.with_scope(ScopeKind::ArrowFunction, arrow.span, |this| {
            for param in &arrow.params {
                this.declare_pat(param, DeclarationKind::Parameter);
            }
            match &*arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => {
                    for stmt in &block.stmts {
                        this.visit_stmt(stmt);
                    }
                }
                BlockStmtOrExpr::Expr(expr) => this.visit_expr(expr),
            }
        });
    }

    fn visit_class(&mut self, class: &'a Class) {
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }

        self.with_scope(ScopeKind::Class, class.span, |this| {
            for member in &class.body {
                match member {
                    ClassMember::Method(method) => {
                        this.visit_prop_name(&method.key);
                        this.visit_function(&method.function);
                    }
                    ClassMember::PrivateMethod(method) => this.visit_function(&method.function),
                    ClassMember::Constructor(ctor) => {
                        let Some(body) = &ctor.body else {
                            continue;
                        };
                        this.with_scope(ScopeKind::Function, ctor.span, |this| {
                            for param in &ctor.params {
                                match param {
                                    ParamOrTsParamProp::Param(p) => {
                                        this.declare_pat(&p.pat, DeclarationKind::Parameter);
                                    }
                                    ParamOrTsParamProp::TsParamProp(ts_param) => {
                                        match &ts_param.param {
                                            TsParamPropParam::Ident(binding) => {
                                                this.declare_symbol(
                                                    &binding.id.sym,
                                                    DeclarationKind::Parameter,
                                                    binding.id.span,
                                                );
                                            }
                                            TsParamPropParam::Assign(assign) => {
                                                this.declare_pat(
                                                    &assign.left,
                                                    DeclarationKind::Parameter,
                                                );
                                                this.visit_expr(&assign.right);
                                            }
                                        }
                                    }
                                }
                            }
                            for stmt in &body.stmts {
                                this.visit_stmt(stmt);
                            }
                        });
                    }
                    ClassMember::ClassProp(prop) => {
                        if let Some(value) = &prop.value {
                            this.visit_expr(value);
                        }
                    }
                    ClassMember::PrivateProp(prop) => {
                        if let Some(value) = &prop.value {
                            this.visit_expr(value);
                        }
                    }
                    ClassMember::StaticBlock(block) => {
                        this.with_scope(ScopeKind::Function, block.body.span, |this| {
                            for stmt in &block.body.stmts {
                                this.visit_stmt(stmt);
                            }
                        });
                    }
                    _ => {}
                }
            }
        });
    }

    fn visit_block_stmt(&mut self, block: &'a BlockStmt) {
        self.with_scope(ScopeKind::Block, block.span, |this| {
            for stmt in &block.stmts {
                this.visit_stmt(stmt);
            }
        });
    }

    fn visit_for_stmt(&mut self, for_stmt: &'a ForStmt) {
        self.with_scope(ScopeKind::For, for_stmt.span, |this| {
            match &for_stmt.init {
                Some(VarDeclOrExpr::VarDecl(var_decl)) => this.visit_var_decl(var_decl),
                Some(VarDeclOrExpr::Expr(expr)) => this.visit_expr(expr),
                None => {}
            }
            if let Some(test) = &for_stmt.test {
                this.visit_expr(test);
            }
            if let Some(update) = &for_stmt.update {
                this.visit_expr(update);
            }
            this.visit_stmt(&for_stmt.body);
        });
    }

    fn visit_for_in_stmt(&mut self, for_in: &'a ForInStmt) {
        self.visit_for_each(&for_in.left, &for_in.right, &for_in.body, for_in.span);
    }

    fn visit_for_of_stmt(&mut self, for_of: &'a ForOfStmt) {
        self.visit_for_each(&for_of.left, &for_of.right, &for_of.body, for_of.span);
    }

    /// The loop binding is declared without an initializer, so it never
    /// resolves to the iterated expression.
    fn visit_for_each(&mut self, left: &'a ForHead, right: &'a Expr, body: &'a Stmt, span: Span) {
        self.visit_expr(right);
        self.with_scope(ScopeKind::For, span, |this| {
            match left {
                ForHead::VarDecl(var_decl) => {
                    let kind = DeclarationKind::from(var_decl.kind);
                    for declarator in &var_decl.decls {
                        this.declare_pat(&declarator.name, kind);
                    }
                }
                ForHead::UsingDecl(using) => {
                    for declarator in &using.decls {
                        this.declare_pat(&declarator.name, DeclarationKind::Using);
                    }
                }
                ForHead::Pat(_) => {}
            }
            this.visit_stmt(body);
        });
    }

    fn visit_switch_stmt(&mut self, switch_stmt: &'a SwitchStmt) {
        self.visit_expr(&switch_stmt.discriminant);
        self.with_scope(ScopeKind::Switch, switch_stmt.span, |this| {
            for case in &switch_stmt.cases {
                if let Some(test) = &case.test {
                    this.visit_expr(test);
                }
                for stmt in &case.cons {
                    this.visit_stmt(stmt);
                }
            }
        });
    }

    fn visit_try_stmt(&mut self, try_stmt: &'a TryStmt) {
        self.with_scope(ScopeKind::Try, try_stmt.block.span, |this| {
            for stmt in &try_stmt.block.stmts {
                this.visit_stmt(stmt);
            }
        });

        if let Some(catch) = &try_stmt.handler {
            self.visit_catch_clause(catch);
        }

        if let Some(finalizer) = &try_stmt.finalizer {
            self.visit_block_stmt(finalizer);
        }
    }

    fn visit_catch_clause(&mut self, catch: &'a CatchClause) {
        self.with_scope(ScopeKind::Catch, catch.span, |this| {
            if let Some(param) = &catch.param {
                this.declare_pat(param, DeclarationKind::Parameter);
            }
            for stmt in &catch.body.stmts {
                this.visit_stmt(stmt);
            }
        });
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Arrow(arrow) => self.visit_arrow_expr(arrow),
            Expr::Fn(fn_expr) => self.visit_function(&fn_expr.function),
            Expr::Class(class_expr) => self.visit_class(&class_expr.class),
            Expr::Call(call) => {
                if let Some(callee) = call.callee.as_expr() {
                    self.visit_expr(callee);
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::New(new_expr) => {
                self.visit_expr(&new_expr.callee);
                for arg in new_expr.args.iter().flatten() {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::Member(member) => {
                self.visit_expr(&member.obj);
                if let MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            Expr::Array(arr) => {
                for elem in arr.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            Expr::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.visit_expr(&spread.expr),
                        PropOrSpread::Prop(prop) => self.visit_prop(prop),
                    }
                }
            }
            Expr::Assign(assign) => self.visit_expr(&assign.right),
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Update(update) => self.visit_expr(&update.arg),
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::OptChain(opt_chain) => match &*opt_chain.base {
                OptChainBase::Member(member) => {
                    self.visit_expr(&member.obj);
                    if let MemberProp::Computed(computed) = &member.prop {
                        self.visit_expr(&computed.expr);
                    }
                }
                OptChainBase::Call(call) => {
                    self.visit_expr(&call.callee);
                    for arg in &call.args {
                        self.visit_expr(&arg.expr);
                    }
                }
            },
            Expr::TsAs(ts_as) => self.visit_expr(&ts_as.expr),
            Expr::TsTypeAssertion(assertion) => self.visit_expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            Expr::TsSatisfies(satisfies) => self.visit_expr(&satisfies.expr),
            Expr::TsInstantiation(inst) => self.visit_expr(&inst.expr),
            Expr::TsConstAssertion(const_assert) => self.visit_expr(&const_assert.expr),
            Expr::JSXElement(element) => self.visit_jsx_element(element),
            Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_element_child(child);
                }
            }
            _ => {}
        }
    }

    fn visit_prop(&mut self, prop: &'a Prop) {
        match prop {
            Prop::KeyValue(kv) => {
                self.visit_prop_name(&kv.key);
                self.visit_expr(&kv.value);
            }
            Prop::Assign(assign) => self.visit_expr(&assign.value),
            Prop::Method(method) => {
                self.visit_prop_name(&method.key);
                self.visit_function(&method.function);
            }
            Prop::Getter(getter) => {
                if let Some(body) = &getter.body {
                    self.with_scope(ScopeKind::Function, getter.span, |this| {
                        for stmt in &body.stmts {
                            this.visit_stmt(stmt);
                        }
                    });
                }
            }
            Prop::Setter(setter) => {
                if let Some(body) = &setter.body {
                    self.with_scope(ScopeKind::Function, setter.span, |this| {
                        this.declare_pat(&setter.param, DeclarationKind::Parameter);
                        for stmt in &body.stmts {
                            this.visit_stmt(stmt);
                        }
                    });
                }
            }
            Prop::Shorthand(_) => {}
        }
    }

    fn visit_prop_name(&mut self, name: &'a PropName) {
        if let PropName::Computed(computed) = name {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_jsx_element(&mut self, element: &'a JSXElement) {
        for attr in &element.opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => {
                    if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value {
                        self.visit_jsx_expr(&container.expr);
                    }
                }
                JSXAttrOrSpread::SpreadElement(spread) => self.visit_expr(&spread.expr),
            }
        }

        for child in &element.children {
            self.visit_jsx_element_child(child);
        }
    }

    fn visit_jsx_element_child(&mut self, child: &'a JSXElementChild) {
        match child {
            JSXElementChild::JSXExprContainer(container) => self.visit_jsx_expr(&container.expr),
            JSXElementChild::JSXSpreadChild(spread) => self.visit_expr(&spread.expr),
            JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
            JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_element_child(child);
                }
            }
            JSXElementChild::JSXText(_) => {}
        }
    }

    fn visit_jsx_expr(&mut self, expr: &'a JSXExpr) {
        if let JSXExpr::Expr(expr) = expr {
            self.visit_expr(expr);
        }
    }

    /// Declares every name a pattern binds and visits default values.
    fn declare_pat(&mut self, pat: &'a Pat, kind: DeclarationKind) {
        match pat {
            Pat::Ident(binding) => {
                self.declare_symbol(&binding.id.sym, kind, binding.id.span);
            }
            Pat::Array(array_pat) => {
                for elem in array_pat.elems.iter().flatten() {
                    self.declare_pat(elem, kind);
                }
            }
            Pat::Object(object_pat) => {
                for prop in &object_pat.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.visit_prop_name(&kv.key);
                            self.declare_pat(&kv.value, kind);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare_symbol(&assign.key.sym, kind, assign.key.span);
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.declare_pat(&rest.arg, kind),
                    }
                }
            }
            Pat::Rest(rest_pat) => self.declare_pat(&rest_pat.arg, kind),
            Pat::Assign(assign_pat) => {
                self.declare_pat(&assign_pat.left, kind);
                self.visit_expr(&assign_pat.right);
            }
            Pat::Expr(_) | Pat::Invalid(_) => {}
        }
    }

    fn declare_symbol(&mut self, name: &str, kind: DeclarationKind, span: Span) -> SymbolId {
        let scope = if kind == DeclarationKind::Var {
            self.find_hoisting_scope()
        } else {
            self.current_scope
        };

        self.symbol_table.declare(name, kind, scope, span)
    }

    fn with_scope(&mut self, kind: ScopeKind, span: Span, f: impl FnOnce(&mut Self)) {
        let parent_scope = self.current_scope;
        let scope = self.scope_tree.create_scope(kind, Some(parent_scope), span);
        self.current_scope = scope;
        f(self);
        self.current_scope = parent_scope;
    }

    fn find_hoisting_scope(&self) -> ScopeId {
        let current = self.current_scope;

        self.scope_tree
            .ancestors(current)
            .find(|scope| scope.kind.is_var_boundary())
            .map_or(current, |scope| scope.id)
    }
}
