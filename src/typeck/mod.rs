//! The bidirectional engine: `check` against a known type, `infer` a type,
//! mutually recursive, with implicit-argument insertion and placeholder
//! creation. Placeholder *solving* lives in [`unify`]; substitution and beta
//! reduction in [`inline`].
//!
//! One [`TypeckCtxt`] checks one batch of declarations, in source order, and
//! is then discarded. Globals and holes accumulate over the batch; locals
//! are scoped per declaration.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use id_arena::Id;
use tracing::{debug, trace};

use crate::{
    ast::{ArgSpec, Decl, Expr, ExprKind, Name, NameId, Param, Span},
    ctxt::GlobalCtxt,
    error::ElabError,
};

use self::{
    ast::{Answer, Hole, HoleTable, Term, TermKind},
    inline::Inliner,
    pretty::{meta_name, render, render_param},
    unify::Converter,
};

pub mod ast;
pub mod inline;
pub mod pretty;
pub mod unify;

/// Engine recursion limit, shared by checking, inlining, and conversion.
/// Hitting it reports [`ElabError::TooComplex`] instead of blowing the call
/// stack.
const MAX_DEPTH: u32 = 2048;

/// The shared recursion-depth counter of one checker run.
#[derive(Debug, Default)]
pub struct Depth(Cell<u32>);

impl Depth {
    fn enter(&self, span: Span) -> Result<(), ElabError> {
        let d = self.0.get();
        if d >= MAX_DEPTH {
            return Err(ElabError::TooComplex { span });
        }
        self.0.set(d + 1);
        Ok(())
    }

    fn exit(&self) {
        self.0.set(self.0.get() - 1);
    }
}

/// A fully elaborated definition. `params`, `ret`, and `body` are core
/// terms; the declaration's type and value are folds over the parameters
/// ([`TypeckCtxt::def_type`], [`TypeckCtxt::def_value`]).
#[derive(Clone, Debug)]
pub struct CheckedDef {
    pub span: Span,
    pub name: Name,
    pub params: Vec<Param<Id<Term>>>,
    pub ret: Id<Term>,
    pub body: Id<Term>,
}

#[derive(Clone, Debug)]
pub enum CheckedDecl {
    Def(CheckedDef),
    /// Checked like a definition but never registered globally.
    Example {
        span: Span,
        params: Vec<Param<Id<Term>>>,
        ret: Id<Term>,
        body: Id<Term>,
    },
}

pub struct TypeckCtxt<'gcx> {
    gcx: &'gcx GlobalCtxt,
    globals: HashMap<NameId, CheckedDef>,
    locals: im::OrdMap<NameId, Param<Id<Term>>>,
    holes: RefCell<HoleTable>,
    depth: Depth,
}

impl<'gcx> TypeckCtxt<'gcx> {
    pub fn new(gcx: &'gcx GlobalCtxt) -> Self {
        Self {
            gcx,
            globals: HashMap::new(),
            locals: im::OrdMap::new(),
            holes: RefCell::new(HoleTable::default()),
            depth: Depth::default(),
        }
    }

    /// Check a batch of resolved declarations in order, then fail on the
    /// first hole the whole run left unsolved.
    pub fn run(&mut self, decls: &[Decl]) -> Result<Vec<CheckedDecl>, ElabError> {
        let ret = decls
            .iter()
            .map(|d| self.decl(d))
            .collect::<Result<Vec<_>, _>>()?;

        let holes = self.holes.borrow();
        for (id, hole) in holes.iter_enumerated() {
            if hole.answer.is_unsolved() {
                let ty = self.inliner().run(hole.answer.ty)?;
                return Err(ElabError::UnsolvedMeta {
                    name: meta_name(id, hole.is_user),
                    context: hole
                        .locals
                        .values()
                        .map(|p| render_param(self.gcx, p))
                        .collect(),
                    ty: render(self.gcx, ty),
                    span: hole.span,
                });
            }
        }
        Ok(ret)
    }

    fn decl(&mut self, decl: &Decl) -> Result<CheckedDecl, ElabError> {
        match decl {
            Decl::Def(d) => {
                debug!(name = %d.name.text, "checking definition");
                let (params, ret, body) = self.def_or_example(&d.params, d.ret, d.body)?;
                let checked = CheckedDef {
                    span: d.span,
                    name: d.name,
                    params,
                    ret,
                    body,
                };
                self.globals.insert(d.name.id, checked.clone());
                Ok(CheckedDecl::Def(checked))
            }
            Decl::Example(e) => {
                debug!("checking example");
                let (params, ret, body) = self.def_or_example(&e.params, e.ret, e.body)?;
                Ok(CheckedDecl::Example {
                    span: e.span,
                    params,
                    ret,
                    body,
                })
            }
            Decl::Data(d) => Err(ElabError::Unsupported {
                what: "inductive datatype declarations",
                span: d.span,
            }),
        }
    }

    fn def_or_example(
        &mut self,
        params: &[Param<Id<Expr>>],
        ret: Id<Expr>,
        body: Id<Expr>,
    ) -> Result<(Vec<Param<Id<Term>>>, Id<Term>, Id<Term>), ElabError> {
        self.locals = im::OrdMap::new();
        let typ = self.gcx.arenas.term.common().typ;

        let mut checked = Vec::with_capacity(params.len());
        for p in params {
            let ty = self.check(p.ty, typ)?;
            let param = Param {
                name: p.name,
                ty,
                implicit: p.implicit,
            };
            self.locals.insert(p.name.id, param);
            checked.push(param);
        }
        let ret = self.check(ret, typ)?;
        let body = self.check(body, ret)?;
        Ok((checked, ret, body))
    }

    pub fn check(&mut self, e: Id<Expr>, want: Id<Term>) -> Result<Id<Term>, ElabError> {
        let node = self.gcx.arenas.ast.expr(e);
        self.depth.enter(node.span)?;

        let ret = if let ExprKind::Fn(param_name, body) = node.kind {
            let want = self.inliner().run(want)?;
            let TermKind::FnType(want_param, want_ret) = self.gcx.arenas.term.term(want).kind
            else {
                return Err(ElabError::TypeMismatch {
                    want: render(self.gcx, want),
                    got: "function".to_string(),
                    span: node.span,
                });
            };
            // align the function type's binder with the lambda's own
            let renamed = Term::new(self.gcx, TermKind::Ref(param_name), node.span);
            let want_ret = self.inliner().run_with(want_param.name, renamed, want_ret)?;
            let param = Param {
                name: param_name,
                ty: want_param.ty,
                implicit: want_param.implicit,
            };
            let body = self.check_with(param, body, want_ret)?;
            Term::new(self.gcx, TermKind::Fn(param, body), node.span)
        } else {
            let (mut val, mut got) = self.infer(e)?;
            got = self.inliner().run(got)?;
            let want = self.inliner().run(want)?;

            // A leading unnamed implicit on the inferred type can still be
            // filled here before the two sides are compared.
            if let Some(new_f) = self.insert_implicits(e, got, ArgSpec::Explicit)? {
                (val, got) = self.infer(new_f)?;
            }

            if !self.converter().eq(got, want)? {
                return Err(ElabError::TypeMismatch {
                    want: render(self.gcx, want),
                    got: render(self.gcx, got),
                    span: node.span,
                });
            }
            val
        };
        self.depth.exit();
        Ok(ret)
    }

    pub fn infer(&mut self, e: Id<Expr>) -> Result<(Id<Term>, Id<Term>), ElabError> {
        let node = self.gcx.arenas.ast.expr(e);
        self.depth.enter(node.span)?;
        let typ = self.gcx.arenas.term.common().typ;

        let ret = match node.kind {
            ExprKind::Ref(v) => {
                if let Some(p) = self.locals.get(&v.id) {
                    let ty = p.ty;
                    (Term::new(self.gcx, TermKind::Ref(v), node.span), ty)
                } else if let Some(d) = self.globals.get(&v.id).cloned() {
                    (self.def_value(&d), self.def_type(&d))
                } else {
                    // resolution guaranteed the name exists somewhere
                    return Err(ElabError::Ice {
                        msg: "unresolved reference survived name resolution",
                        span: node.span,
                    });
                }
            }
            ExprKind::FnType(p, ret) => {
                let p_ty = self.check(p.ty, typ)?;
                let param = Param {
                    name: p.name,
                    ty: p_ty,
                    implicit: p.implicit,
                };
                let ret = self.check_with(param, ret, typ)?;
                (
                    Term::new(self.gcx, TermKind::FnType(param, ret), node.span),
                    typ,
                )
            }
            ExprKind::Call(f, x, spec) => {
                let (f_val, f_ty) = self.infer(f)?;

                if let Some(new_f) = self.insert_implicits(f, f_ty, spec)? {
                    let call = Expr::new(self.gcx, ExprKind::Call(new_f, x, spec), node.span);
                    let ret = self.infer(call)?;
                    self.depth.exit();
                    return Ok(ret);
                }

                match self.gcx.arenas.term.term(f_ty).kind {
                    TermKind::FnType(p, f_ret) => {
                        let x_tm = self.check_with(p, x, p.ty)?;
                        let ty = self.inliner().run_with(p.name, x_tm, f_ret)?;
                        let val = self.inliner().apply(f_val, x_tm)?;
                        (val, ty)
                    }
                    _ => {
                        let f_span = self.gcx.arenas.ast.expr(f).span;
                        return Err(ElabError::TypeMismatch {
                            want: "function".to_string(),
                            got: render(self.gcx, f_ty),
                            span: f_span,
                        });
                    }
                }
            }
            ExprKind::Type => (typ, typ),
            ExprKind::Hole(is_user) => {
                let ty = self.fresh_hole(node.span, is_user, typ);
                let val = self.fresh_hole(node.span, is_user, ty);
                (val, ty)
            }
            ExprKind::Fn(..) => {
                // lambdas only check against a known function type
                return Err(ElabError::Ice {
                    msg: "cannot infer the type of a bare function",
                    span: node.span,
                });
            }
        };
        self.depth.exit();
        Ok(ret)
    }

    /// Rewrite `f` with as many synthetic placeholder applications as its
    /// type's leading implicit parameters call for, or `None` when nothing
    /// needs inserting.
    fn insert_implicits(
        &mut self,
        f: Id<Expr>,
        f_ty: Id<Term>,
        spec: ArgSpec,
    ) -> Result<Option<Id<Expr>>, ElabError> {
        match spec {
            ArgSpec::Inserted => Ok(None),
            ArgSpec::Explicit => match self.gcx.arenas.term.term(f_ty).kind {
                TermKind::FnType(p, _) if p.implicit => Ok(Some(self.call_placeholder(f))),
                _ => Ok(None),
            },
            ArgSpec::Named(target) => {
                // nothing to insert unless the type opens with an implicit
                // parameter; a named argument then binds positionally
                let TermKind::FnType(first, _) = self.gcx.arenas.term.term(f_ty).kind else {
                    return Ok(None);
                };
                if !first.implicit {
                    return Ok(None);
                }
                let f_span = self.gcx.arenas.ast.expr(f).span;
                let mut pending = 0usize;
                let mut ty = f_ty;
                loop {
                    let TermKind::FnType(p, ret) = self.gcx.arenas.term.term(ty).kind else {
                        return Err(ElabError::UndefinedImplicit {
                            name: target,
                            span: f_span,
                        });
                    };
                    if !p.implicit {
                        return Err(ElabError::UndefinedImplicit {
                            name: target,
                            span: f_span,
                        });
                    }
                    if p.name.text == target {
                        break;
                    }
                    pending += 1;
                    ty = ret;
                }
                if pending == 0 {
                    return Ok(None);
                }
                trace!(pending, target = %target, "inserting placeholders for named implicit");
                let mut f = f;
                for _ in 0..pending {
                    f = self.call_placeholder(f);
                }
                Ok(Some(f))
            }
        }
    }

    /// `f` becomes `f ?` with a synthetic, non-user placeholder argument
    /// marked to block further insertion in front of it.
    fn call_placeholder(&mut self, f: Id<Expr>) -> Id<Expr> {
        let span = self.gcx.arenas.ast.expr(f).span;
        let ph = Expr::new(self.gcx, ExprKind::Hole(false), span);
        Expr::new(self.gcx, ExprKind::Call(f, ph, ArgSpec::Inserted), span)
    }

    fn check_with(
        &mut self,
        p: Param<Id<Term>>,
        e: Id<Expr>,
        want: Id<Term>,
    ) -> Result<Id<Term>, ElabError> {
        let old = self.locals.insert(p.name.id, p);
        let ret = self.check(e, want);
        match old {
            Some(old) => {
                self.locals.insert(p.name.id, old);
            }
            None => {
                self.locals.remove(&p.name.id);
            }
        }
        ret
    }

    fn fresh_hole(&mut self, span: Span, is_user: bool, ty: Id<Term>) -> Id<Term> {
        let hole = Hole {
            span,
            is_user,
            locals: self.locals.clone(),
            answer: Answer::new(ty),
        };
        let id = self.holes.borrow_mut().insert(hole);
        trace!(hole = ?id, is_user, "created hole");
        Term::new(self.gcx, TermKind::Meta(id, is_user), span)
    }

    /// A definition's type: its parameters folded into function types over
    /// the return type.
    pub fn def_type(&self, d: &CheckedDef) -> Id<Term> {
        d.params
            .iter()
            .rev()
            .fold(d.ret, |ret, &p| {
                Term::new(self.gcx, TermKind::FnType(p, ret), d.span)
            })
    }

    /// A definition's value: its parameters folded into lambdas over the
    /// body.
    pub fn def_value(&self, d: &CheckedDef) -> Id<Term> {
        d.params
            .iter()
            .rev()
            .fold(d.body, |body, &p| {
                Term::new(self.gcx, TermKind::Fn(p, body), d.span)
            })
    }

    fn inliner(&self) -> Inliner<'_> {
        Inliner::new(self.gcx, &self.holes, &self.depth)
    }

    fn converter(&self) -> Converter<'_> {
        Converter::new(self.gcx, &self.holes, &self.depth)
    }
}
