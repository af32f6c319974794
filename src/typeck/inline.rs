//! Inlining: substitution of solved placeholders and beta reduction.
//!
//! An [`Inliner`] is constructed fresh for each use, reads the hole table,
//! and never mutates it: unsolved metas pass through untouched. Solutions
//! may themselves contain further solved metas, so substitution recurses
//! until the term is stable — `run` is idempotent once every reachable meta
//! is solved.

use std::{cell::RefCell, collections::HashMap};

use id_arena::Id;

use crate::{
    ast::{Name, NameId, Param},
    ctxt::GlobalCtxt,
    error::ElabError,
};

use super::{
    ast::{HoleTable, Term, TermKind},
    Depth,
};

pub struct Inliner<'a> {
    gcx: &'a GlobalCtxt,
    holes: &'a RefCell<HoleTable>,
    depth: &'a Depth,
    env: HashMap<NameId, Id<Term>>,
}

impl<'a> Inliner<'a> {
    pub fn new(gcx: &'a GlobalCtxt, holes: &'a RefCell<HoleTable>, depth: &'a Depth) -> Self {
        Self {
            gcx,
            holes,
            depth,
            env: HashMap::new(),
        }
    }

    pub fn run(&mut self, t: Id<Term>) -> Result<Id<Term>, ElabError> {
        self.term(t)
    }

    /// Like [`Inliner::run`], additionally substituting `name` with `to`
    /// throughout.
    pub fn run_with(
        &mut self,
        name: Name,
        to: Id<Term>,
        t: Id<Term>,
    ) -> Result<Id<Term>, ElabError> {
        self.env.insert(name.id, to);
        self.term(t)
    }

    /// Beta-reduce `f` applied to `x` when `f` is a lambda; otherwise leave
    /// the application suspended (the callee is headed by an unresolved
    /// local or placeholder).
    pub fn apply(&mut self, f: Id<Term>, x: Id<Term>) -> Result<Id<Term>, ElabError> {
        let f_tm = self.gcx.arenas.term.term(f);
        if let TermKind::Fn(p, body) = f_tm.kind {
            let old = self.env.insert(p.name.id, x);
            let ret = self.term(body);
            match old {
                Some(old) => {
                    self.env.insert(p.name.id, old);
                }
                None => {
                    self.env.remove(&p.name.id);
                }
            }
            ret
        } else {
            Ok(Term::new(self.gcx, TermKind::App(f, x), f_tm.span))
        }
    }

    fn term(&mut self, t: Id<Term>) -> Result<Id<Term>, ElabError> {
        let tm = self.gcx.arenas.term.term(t);
        self.depth.enter(tm.span)?;
        let ret = match tm.kind {
            TermKind::Type => t,
            TermKind::Ref(n) => match self.env.get(&n.id) {
                Some(&to) => to,
                None => t,
            },
            TermKind::Meta(id, _) => {
                let answer = self.holes.borrow().get(id).answer;
                match answer.term {
                    Some(solution) => self.term(solution)?,
                    None => t,
                }
            }
            TermKind::FnType(p, ret) => {
                let ty = self.term(p.ty)?;
                let ret = self.term(ret)?;
                Term::new(
                    self.gcx,
                    TermKind::FnType(Param { ty, ..p }, ret),
                    tm.span,
                )
            }
            TermKind::Fn(p, body) => {
                let ty = self.term(p.ty)?;
                let body = self.term(body)?;
                Term::new(self.gcx, TermKind::Fn(Param { ty, ..p }, body), tm.span)
            }
            TermKind::App(f, x) => {
                let f = self.term(f)?;
                let x = self.term(x)?;
                self.apply(f, x)?
            }
        };
        self.depth.exit();
        Ok(ret)
    }
}
