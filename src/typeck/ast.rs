//! The core representation produced by elaboration, and the hole table.
//!
//! Core terms are fully explicit: every implicit application has been
//! inserted, every reference carries the unique [`Name`] of its binder, and
//! placeholders appear as [`TermKind::Meta`] references into the checker's
//! hole table.

use id_arena::Id;
use index_vec::IndexVec;

use crate::{
    ast::{Name, NameId, Param, Span},
    ctxt::GlobalCtxt,
};

index_vec::define_index_type! {
    pub struct HoleId = u32;

    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
    DEBUG_FORMAT = "HoleId({})";
    DISPLAY_FORMAT = "{}";
    IMPL_RAW_CONVERSIONS = true;
}

#[derive(Copy, Clone, Debug)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
}

impl Term {
    pub fn new(gcx: &GlobalCtxt, kind: TermKind, span: Span) -> Id<Term> {
        gcx.arenas.term.term.borrow_mut().alloc(Term { kind, span })
    }
}

#[derive(Copy, Clone, Debug)]
pub enum TermKind {
    /// The universe; `Type : Type`, no stratification.
    Type,
    /// A reference to a binder, identified by its unique name.
    Ref(Name),
    FnType(Param<Id<Term>>, Id<Term>),
    /// A substitution-based lambda: applying it substitutes the parameter's
    /// name in the body.
    Fn(Param<Id<Term>>, Id<Term>),
    /// A suspended application whose callee is not (yet) a lambda.
    App(Id<Term>, Id<Term>),
    /// A placeholder, by hole id; `true` iff user-written.
    Meta(HoleId, bool),
}

/// A placeholder's record: where it was created, the local typing context at
/// that point (captured by value, for error reporting), and its [`Answer`].
#[derive(Clone, Debug)]
pub struct Hole {
    pub span: Span,
    pub is_user: bool,
    pub locals: im::OrdMap<NameId, Param<Id<Term>>>,
    pub answer: Answer,
}

/// A hole's type and, once unification has solved it, its value. Solving is
/// write-once: a solved answer is never reassigned.
#[derive(Copy, Clone, Debug)]
pub struct Answer {
    pub ty: Id<Term>,
    pub term: Option<Id<Term>>,
}

impl Answer {
    pub fn new(ty: Id<Term>) -> Answer {
        Answer { ty, term: None }
    }

    pub fn is_unsolved(&self) -> bool {
        self.term.is_none()
    }
}

/// The holes of one checker run, in creation order. Only grows; the single
/// mutation site is [`HoleTable::solve`], reached through
/// [`crate::typeck::unify::Converter`].
#[derive(Debug, Default)]
pub struct HoleTable {
    holes: IndexVec<HoleId, Hole>,
}

impl HoleTable {
    pub fn insert(&mut self, hole: Hole) -> HoleId {
        self.holes.push(hole)
    }

    pub fn get(&self, id: HoleId) -> &Hole {
        &self.holes[id]
    }

    pub fn solve(&mut self, id: HoleId, term: Id<Term>) {
        let answer = &mut self.holes[id].answer;
        assert!(answer.is_unsolved(), "hole {id:?} solved twice");
        answer.term = Some(term);
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (HoleId, &Hole)> {
        self.holes.iter_enumerated()
    }
}
