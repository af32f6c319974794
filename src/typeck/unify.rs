//! Definitional equality, with placeholder solving as part of comparison.
//!
//! Solved metas are dereferenced lazily while comparing; an unsolved meta
//! unifies with whatever stands opposite it by solving it to that term. All
//! mutation of the hole table happens here, through [`HoleTable::solve`].

use std::cell::RefCell;

use id_arena::Id;
use tracing::trace;

use crate::{ctxt::GlobalCtxt, error::ElabError};

use super::{
    ast::{HoleId, HoleTable, Term, TermKind},
    inline::Inliner,
    Depth,
};

pub struct Converter<'a> {
    gcx: &'a GlobalCtxt,
    holes: &'a RefCell<HoleTable>,
    depth: &'a Depth,
}

impl<'a> Converter<'a> {
    pub fn new(gcx: &'a GlobalCtxt, holes: &'a RefCell<HoleTable>, depth: &'a Depth) -> Self {
        Self { gcx, holes, depth }
    }

    /// Decide whether `a` and `b` are definitionally equal, solving unsolved
    /// metas along the way.
    ///
    /// There is no occurs check: solving a hole to a term that mentions the
    /// hole itself is not guarded against beyond the trivial same-hole case,
    /// and later inlining of such a solution ends in
    /// [`ElabError::TooComplex`].
    pub fn eq(&self, a: Id<Term>, b: Id<Term>) -> Result<bool, ElabError> {
        let a_tm = self.gcx.arenas.term.term(a);
        let b_tm = self.gcx.arenas.term.term(b);
        self.depth.enter(a_tm.span)?;
        let ret = match (a_tm.kind, b_tm.kind) {
            (TermKind::Meta(i, _), TermKind::Meta(j, _)) if i == j => true,
            (TermKind::Meta(i, _), _) => self.solve_or_eq(i, b)?,
            (_, TermKind::Meta(j, _)) => self.solve_or_eq(j, a)?,
            (TermKind::Type, TermKind::Type) => true,
            (TermKind::Ref(n), TermKind::Ref(m)) => n.id == m.id,
            (TermKind::FnType(p, a_ret), TermKind::FnType(q, b_ret)) => {
                // alpha equivalence: rename q to p in the other body
                self.eq(p.ty, q.ty)? && {
                    let renamed = Term::new(self.gcx, TermKind::Ref(p.name), b_tm.span);
                    let b_ret = self.inliner().run_with(q.name, renamed, b_ret)?;
                    self.eq(a_ret, b_ret)?
                }
            }
            (TermKind::Fn(p, a_body), TermKind::Fn(q, b_body)) => {
                self.eq(p.ty, q.ty)? && {
                    let renamed = Term::new(self.gcx, TermKind::Ref(p.name), b_tm.span);
                    let b_body = self.inliner().run_with(q.name, renamed, b_body)?;
                    self.eq(a_body, b_body)?
                }
            }
            (TermKind::App(f, x), TermKind::App(g, y)) => self.eq(f, g)? && self.eq(x, y)?,
            _ => false,
        };
        self.depth.exit();
        Ok(ret)
    }

    /// Compare against the hole's solution, or make `other` the solution.
    fn solve_or_eq(&self, id: HoleId, other: Id<Term>) -> Result<bool, ElabError> {
        let answer = self.holes.borrow().get(id).answer;
        match answer.term {
            Some(solution) => self.eq(solution, other),
            None => {
                trace!(hole = ?id, "solved hole");
                self.holes.borrow_mut().solve(id, other);
                Ok(true)
            }
        }
    }

    fn inliner(&self) -> Inliner<'a> {
        Inliner::new(self.gcx, self.holes, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::{
        ast::{Name, Param, Span},
        ctxt::GlobalCtxt,
        intern::Symbol,
        typeck::{
            ast::{Answer, Hole, HoleTable, Term, TermKind},
            Depth,
        },
    };

    use super::Converter;

    fn id_fn_type(gcx: &GlobalCtxt, text: &str) -> id_arena::Id<Term> {
        // (<text> : Type) -> <text>
        let typ = gcx.arenas.term.common().typ;
        let n = Name::new(gcx, Symbol::intern(text));
        let p = Param {
            name: n,
            ty: typ,
            implicit: false,
        };
        let ret = Term::new(gcx, TermKind::Ref(n), Span::DUMMY);
        Term::new(gcx, TermKind::FnType(p, ret), Span::DUMMY)
    }

    #[test]
    fn function_types_are_alpha_equivalent() {
        let gcx = GlobalCtxt::new();
        let holes = RefCell::new(HoleTable::default());
        let depth = Depth::default();
        let converter = Converter::new(&gcx, &holes, &depth);
        let a = id_fn_type(&gcx, "a");
        let b = id_fn_type(&gcx, "b");
        assert!(converter.eq(a, b).unwrap());
    }

    #[test]
    fn distinct_references_differ() {
        let gcx = GlobalCtxt::new();
        let holes = RefCell::new(HoleTable::default());
        let depth = Depth::default();
        let converter = Converter::new(&gcx, &holes, &depth);
        let n = Name::new(&gcx, Symbol::intern("x"));
        let m = Name::new(&gcx, Symbol::intern("x"));
        let rn = Term::new(&gcx, TermKind::Ref(n), Span::DUMMY);
        let rm = Term::new(&gcx, TermKind::Ref(m), Span::DUMMY);
        assert!(converter.eq(rn, rn).unwrap());
        assert!(!converter.eq(rn, rm).unwrap());
    }

    #[test]
    fn comparing_an_unsolved_meta_solves_it() {
        let gcx = GlobalCtxt::new();
        let typ = gcx.arenas.term.common().typ;
        let mut table = HoleTable::default();
        let h = table.insert(Hole {
            span: Span::DUMMY,
            is_user: false,
            locals: im::OrdMap::new(),
            answer: Answer::new(typ),
        });
        let holes = RefCell::new(table);
        let depth = Depth::default();
        let converter = Converter::new(&gcx, &holes, &depth);

        let m = Term::new(&gcx, TermKind::Meta(h, false), Span::DUMMY);
        assert!(converter.eq(m, typ).unwrap());
        let solved = holes.borrow().get(h).answer.term.unwrap();
        assert!(matches!(gcx.arenas.term.term(solved).kind, TermKind::Type));

        // solved metas compare through their solution
        assert!(converter.eq(m, typ).unwrap());
        let n = Name::new(&gcx, Symbol::intern("n"));
        let other = Term::new(&gcx, TermKind::Ref(n), Span::DUMMY);
        assert!(!converter.eq(m, other).unwrap());
    }

    #[test]
    fn shape_mismatch_is_unequal() {
        let gcx = GlobalCtxt::new();
        let holes = RefCell::new(HoleTable::default());
        let depth = Depth::default();
        let converter = Converter::new(&gcx, &holes, &depth);
        let typ = gcx.arenas.term.common().typ;
        let a = id_fn_type(&gcx, "a");
        assert!(!converter.eq(a, typ).unwrap());
    }
}
