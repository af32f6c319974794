//! The global context: every arena and fresh-id counter for one compilation
//! unit. One [`GlobalCtxt`] is created per checked unit and discarded with
//! it; nothing in the crate reaches for process-wide state.

use std::cell::{Cell, RefCell};

use id_arena::{Arena, Id};

use crate::{
    ast::{AstId, Expr, NameId},
    typeck::ast::{Term, TermKind},
};

#[derive(Debug, Default)]
pub struct GlobalCtxt {
    pub arenas: Arenas,
    next_name_id: Cell<u32>,
}

impl GlobalCtxt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name_id(&self) -> NameId {
        let id = self.next_name_id.get();
        assert!(id < u32::MAX);
        self.next_name_id.replace(id + 1);
        NameId::from_raw(id)
    }
}

#[derive(Debug, Default)]
pub struct Arenas {
    pub ast: AstArenas,
    pub term: TermArenas,
}

#[derive(Debug)]
pub struct AstArenas {
    pub expr: RefCell<Arena<Expr>>,
    next_ast_id: Cell<u32>,
}

impl AstArenas {
    pub fn expr(&self, id: Id<Expr>) -> Expr {
        self.expr.borrow()[id]
    }

    pub fn next_ast_id(&self) -> AstId {
        let id = self.next_ast_id.get();
        assert!(id < u32::MAX);
        self.next_ast_id.replace(id + 1);
        AstId::from_raw(id)
    }
}

impl Default for AstArenas {
    fn default() -> Self {
        Self {
            expr: Default::default(),
            next_ast_id: Cell::new(1),
        }
    }
}

#[derive(Debug)]
pub struct TermArenas {
    pub term: RefCell<Arena<Term>>,
    common: CommonTerms,
}

/// Terms allocated once up front and shared.
#[derive(Copy, Clone, Debug)]
pub struct CommonTerms {
    /// The universe `Type`.
    pub typ: Id<Term>,
}

impl TermArenas {
    pub fn term(&self, id: Id<Term>) -> Term {
        self.term.borrow()[id]
    }

    pub fn common(&self) -> CommonTerms {
        self.common
    }
}

impl Default for TermArenas {
    fn default() -> Self {
        let term: RefCell<Arena<Term>> = Default::default();
        let typ = term.borrow_mut().alloc(Term {
            kind: TermKind::Type,
            span: crate::ast::Span::DUMMY,
        });
        Self {
            term,
            common: CommonTerms { typ },
        }
    }
}
