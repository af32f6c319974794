//! Name resolution.
//!
//! Rewrites every [`ExprKind::Ref`] in a batch of surface declarations to
//! carry the [`Name`] it binds to. Locals are scoped per declaration;
//! globals persist across the batch. Locals live in a persistent map, so
//! entering a binder snapshots the scope and leaving it restores the
//! snapshot wholesale; `fun a => fun a => a` resolves the body to the inner
//! `a` with the outer binding reinstated afterwards.

use std::collections::HashMap;

use id_arena::Id;
use tracing::{debug, trace};

use crate::{
    ast::{Decl, DefDecl, Expr, ExprKind, ExampleDecl, Name, Param},
    ctxt::GlobalCtxt,
    error::ElabError,
    intern::Symbol,
};

pub struct Resolver<'gcx> {
    gcx: &'gcx GlobalCtxt,
    locals: im::HashMap<Symbol, Name>,
    globals: HashMap<Symbol, Name>,
}

impl<'gcx> Resolver<'gcx> {
    pub fn new(gcx: &'gcx GlobalCtxt) -> Self {
        Self {
            gcx,
            locals: im::HashMap::new(),
            globals: HashMap::new(),
        }
    }

    pub fn run(&mut self, decls: &[Decl]) -> Result<Vec<Decl>, ElabError> {
        decls.iter().map(|d| self.decl(d)).collect()
    }

    fn decl(&mut self, decl: &Decl) -> Result<Decl, ElabError> {
        match decl {
            Decl::Def(d) => {
                debug!(name = %d.name.text, "resolving definition");
                let (params, ret, body) = self.def_or_example(&d.params, d.ret, d.body)?;

                if !d.name.is_unbound() {
                    if self.globals.contains_key(&d.name.text) {
                        return Err(ElabError::DuplicateVariable {
                            name: d.name.text,
                            span: d.span,
                        });
                    }
                    self.globals.insert(d.name.text, d.name);
                }

                Ok(Decl::Def(DefDecl {
                    span: d.span,
                    name: d.name,
                    params,
                    ret,
                    body,
                }))
            }
            Decl::Example(e) => {
                debug!("resolving example");
                let (params, ret, body) = self.def_or_example(&e.params, e.ret, e.body)?;
                Ok(Decl::Example(ExampleDecl {
                    span: e.span,
                    params,
                    ret,
                    body,
                }))
            }
            Decl::Data(d) => Err(ElabError::Unsupported {
                what: "inductive datatype declarations",
                span: d.span,
            }),
        }
    }

    /// Parameters resolve left to right, each type in the scope of the
    /// preceding parameters only; the return type and body see all of them.
    fn def_or_example(
        &mut self,
        params: &[Param<Id<Expr>>],
        ret: Id<Expr>,
        body: Id<Expr>,
    ) -> Result<(Vec<Param<Id<Expr>>>, Id<Expr>, Id<Expr>), ElabError> {
        self.locals = im::HashMap::new();

        let mut resolved = Vec::with_capacity(params.len());
        for p in params {
            let ty = self.expr(p.ty)?;
            self.insert_local(p.name);
            resolved.push(Param {
                name: p.name,
                ty,
                implicit: p.implicit,
            });
        }
        let ret = self.expr(ret)?;
        let body = self.expr(body)?;
        Ok((resolved, ret, body))
    }

    pub fn expr(&mut self, e: Id<Expr>) -> Result<Id<Expr>, ElabError> {
        let node = self.gcx.arenas.ast.expr(e);
        match node.kind {
            ExprKind::Ref(v) => {
                let name = self
                    .locals
                    .get(&v.text)
                    .or_else(|| self.globals.get(&v.text))
                    .copied()
                    .ok_or(ElabError::UndefinedVariable {
                        name: v.text,
                        span: node.span,
                    })?;
                trace!(text = %v.text, id = ?name.id, "resolved reference");
                Ok(Expr::new(self.gcx, ExprKind::Ref(name), node.span))
            }
            ExprKind::FnType(p, ret) => {
                let ty = self.expr(p.ty)?;
                let ret = self.guard_local(p.name, ret)?;
                Ok(Expr::new(
                    self.gcx,
                    ExprKind::FnType(
                        Param {
                            name: p.name,
                            ty,
                            implicit: p.implicit,
                        },
                        ret,
                    ),
                    node.span,
                ))
            }
            ExprKind::Fn(v, body) => {
                let body = self.guard_local(v, body)?;
                Ok(Expr::new(self.gcx, ExprKind::Fn(v, body), node.span))
            }
            ExprKind::Call(f, x, spec) => {
                let f = self.expr(f)?;
                let x = self.expr(x)?;
                Ok(Expr::new(self.gcx, ExprKind::Call(f, x, spec), node.span))
            }
            ExprKind::Type | ExprKind::Hole(_) => Ok(e),
        }
    }

    /// Resolve `e` with `v` in scope, restoring the surrounding scope
    /// afterwards no matter how resolution went.
    fn guard_local(&mut self, v: Name, e: Id<Expr>) -> Result<Id<Expr>, ElabError> {
        let saved = self.locals.clone();
        self.insert_local(v);
        let ret = self.expr(e);
        self.locals = saved;
        ret
    }

    fn insert_local(&mut self, v: Name) {
        if v.is_unbound() {
            return;
        }
        self.locals.insert(v.text, v);
    }
}

#[cfg(test)]
mod tests {
    use super::Resolver;
    use crate::{
        ast::{Decl, DefDecl, Expr, ExprKind, Name, Span},
        ctxt::GlobalCtxt,
        error::ElabError,
        intern::Symbol,
    };

    fn sp(lo: u32) -> Span {
        Span::new(lo, lo + 1)
    }

    // def <name> := Type
    fn def_const(gcx: &GlobalCtxt, text: &str) -> Decl {
        Decl::Def(DefDecl {
            span: sp(0),
            name: Name::new(gcx, Symbol::intern(text)),
            params: vec![],
            ret: Expr::new(gcx, ExprKind::Type, sp(1)),
            body: Expr::new(gcx, ExprKind::Type, sp(2)),
        })
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let gcx = GlobalCtxt::new();
        let decls = vec![def_const(&gcx, "a"), def_const(&gcx, "a")];
        let err = Resolver::new(&gcx).run(&decls).unwrap_err();
        assert!(matches!(err, ElabError::DuplicateVariable { name, .. }
            if name == Symbol::intern("a")));
    }

    #[test]
    fn undefined_reference_is_rejected() {
        let gcx = GlobalCtxt::new();
        let c = Name::new(&gcx, Symbol::intern("c"));
        let decls = vec![Decl::Def(DefDecl {
            span: sp(0),
            name: Name::new(&gcx, Symbol::intern("b")),
            params: vec![],
            ret: Expr::new(&gcx, ExprKind::Type, sp(1)),
            body: Expr::new(&gcx, ExprKind::Ref(c), sp(2)),
        })];
        let err = Resolver::new(&gcx).run(&decls).unwrap_err();
        assert!(matches!(err, ElabError::UndefinedVariable { name, .. }
            if name == Symbol::intern("c")));
    }

    #[test]
    fn shadowing_resolves_to_the_inner_binder() {
        // fun a => fun a => a
        let gcx = GlobalCtxt::new();
        let outer = Name::new(&gcx, Symbol::intern("a"));
        let inner = Name::new(&gcx, Symbol::intern("a"));
        let occurrence = Name::new(&gcx, Symbol::intern("a"));
        let body = Expr::new(&gcx, ExprKind::Ref(occurrence), sp(3));
        let inner_fn = Expr::new(&gcx, ExprKind::Fn(inner, body), sp(2));
        let outer_fn = Expr::new(&gcx, ExprKind::Fn(outer, inner_fn), sp(1));

        let mut resolver = Resolver::new(&gcx);
        resolver.insert_local(outer);
        let resolved = resolver.guard_local(inner, body).unwrap();
        let ExprKind::Ref(name) = gcx.arenas.ast.expr(resolved).kind else {
            panic!("expected a reference");
        };
        assert_eq!(name.id, inner.id);

        // and the full tree resolves without the outer binding leaking
        let mut resolver = Resolver::new(&gcx);
        let resolved = resolver.expr(outer_fn).unwrap();
        let ExprKind::Fn(_, b) = gcx.arenas.ast.expr(resolved).kind else {
            panic!("expected a function");
        };
        let ExprKind::Fn(p, b) = gcx.arenas.ast.expr(b).kind else {
            panic!("expected a nested function");
        };
        let ExprKind::Ref(name) = gcx.arenas.ast.expr(b).kind else {
            panic!("expected a reference");
        };
        assert_eq!(name.id, p.id);
        assert_eq!(p.id, inner.id);
    }

    #[test]
    fn resolution_is_deterministic() {
        // The same program built in two fresh contexts resolves to the same
        // name ids.
        let probe = |gcx: &GlobalCtxt| {
            let decls = vec![def_const(gcx, "a")];
            let out = Resolver::new(gcx).run(&decls).unwrap();
            let Decl::Def(d) = &out[0] else { unreachable!() };
            d.name.id
        };
        assert_eq!(probe(&GlobalCtxt::new()), probe(&GlobalCtxt::new()));
    }
}
