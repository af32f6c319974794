//! The surface tree consumed by the checker.
//!
//! Nodes arrive from an external parser with byte-offset spans and raw
//! textual names; [`crate::resolve`] rewrites every [`ExprKind::Ref`] to the
//! [`Name`] it binds to, and [`crate::typeck`] elaborates the result into the
//! core representation in [`crate::typeck::ast`].

use std::fmt;

use id_arena::Id;

use crate::{ctxt::GlobalCtxt, intern::Symbol};

index_vec::define_index_type! {
    pub struct AstId = u32;

    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
    DEBUG_FORMAT = "AstId({})";
    DISPLAY_FORMAT = "{}";
    IMPL_RAW_CONVERSIONS = true;
}

index_vec::define_index_type! {
    pub struct NameId = u32;

    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
    DEBUG_FORMAT = "NameId({})";
    DISPLAY_FORMAT = "{}";
    IMPL_RAW_CONVERSIONS = true;
}

/// A byte range into the compilation unit's source text.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    lo: u32,
    hi: u32,
}

impl Span {
    pub const DUMMY: Span = Span {
        lo: u32::MAX,
        hi: u32::MAX,
    };

    pub fn new(lo: u32, hi: u32) -> Span {
        Span { lo, hi }
    }

    pub fn lo(self) -> u32 {
        self.lo
    }

    pub fn hi(self) -> u32 {
        self.hi
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.lo, self.hi)
    }
}

impl ariadne::Span for Span {
    type SourceId = ();

    fn source(&self) -> &Self::SourceId {
        &()
    }

    fn start(&self) -> usize {
        self.lo as usize
    }

    fn end(&self) -> usize {
        self.hi as usize
    }
}

/// A binder identity. Two names denote the same binder iff their [`NameId`]s
/// match; `text` is carried for display and named-implicit matching only.
///
/// The name `_` is unbound: it is never entered into any scope and never
/// resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Name {
    pub id: NameId,
    pub text: Symbol,
}

impl Name {
    /// Mint a name with a fresh id. Ids are handed out by the [`GlobalCtxt`],
    /// never a process-wide counter, so runs are reproducible.
    pub fn new(gcx: &GlobalCtxt, text: Symbol) -> Name {
        Name {
            id: gcx.next_name_id(),
            text,
        }
    }

    pub fn unbound(gcx: &GlobalCtxt) -> Name {
        Name::new(gcx, Symbol::unbound())
    }

    pub fn is_unbound(self) -> bool {
        self.text.is_unbound()
    }
}

/// A binder together with its annotated type, generic over the surface
/// (`Id<Expr>`) and core (`Id<Term>`) payloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Param<T> {
    pub name: Name,
    pub ty: T,
    pub implicit: bool,
}

/// How an argument was supplied at a call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArgSpec {
    /// An ordinary explicit application, `f x`. Implicit parameters in front
    /// of it are filled by placeholder insertion.
    Explicit,
    /// A placeholder argument synthesized by the checker itself; blocks any
    /// further insertion in front of it.
    Inserted,
    /// A named implicit argument, `f (T := x)`.
    Named(Symbol),
}

#[derive(Copy, Clone, Debug)]
pub struct Expr {
    pub id: AstId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(gcx: &GlobalCtxt, kind: ExprKind, span: Span) -> Id<Expr> {
        let id = gcx.arenas.ast.next_ast_id();
        gcx.arenas
            .ast
            .expr
            .borrow_mut()
            .alloc(Expr { id, kind, span })
    }
}

#[derive(Copy, Clone, Debug)]
pub enum ExprKind {
    /// The universe `Type`, typed by itself.
    Type,
    Ref(Name),
    FnType(Param<Id<Expr>>, Id<Expr>),
    Fn(Name, Id<Expr>),
    Call(Id<Expr>, Id<Expr>, ArgSpec),
    /// A placeholder; `true` iff written by the user (`_`) rather than
    /// synthesized (elided return types, inserted implicit arguments).
    Hole(bool),
}

/// A top-level declaration, in source order.
#[derive(Clone, Debug)]
pub enum Decl {
    Def(DefDecl),
    Example(ExampleDecl),
    Data(DataDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Def(d) => d.span,
            Decl::Example(e) => e.span,
            Decl::Data(d) => d.span,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DefDecl {
    pub span: Span,
    pub name: Name,
    pub params: Vec<Param<Id<Expr>>>,
    pub ret: Id<Expr>,
    pub body: Id<Expr>,
}

/// An anonymous checked-but-never-registered declaration.
#[derive(Clone, Debug)]
pub struct ExampleDecl {
    pub span: Span,
    pub params: Vec<Param<Id<Expr>>>,
    pub ret: Id<Expr>,
    pub body: Id<Expr>,
}

/// An inductive datatype declaration. Present in the surface tree for
/// forward compatibility; elaboration of these is not implemented yet.
#[derive(Clone, Debug)]
pub struct DataDecl {
    pub span: Span,
    pub name: Name,
    pub params: Vec<Param<Id<Expr>>>,
    pub ctors: Vec<CtorDecl>,
}

#[derive(Clone, Debug)]
pub struct CtorDecl {
    pub span: Span,
    pub name: Name,
    pub params: Vec<Param<Id<Expr>>>,
    pub constraints: Vec<(Symbol, Id<Expr>)>,
}

#[cfg(test)]
mod tests {
    use super::Name;
    use crate::{ctxt::GlobalCtxt, intern::Symbol};

    #[test]
    fn fresh_names_are_distinct() {
        let gcx = GlobalCtxt::new();
        let a = Name::new(&gcx, Symbol::intern("i"));
        let b = Name::new(&gcx, Symbol::intern("i"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn unbound_names_never_bind() {
        let gcx = GlobalCtxt::new();
        assert!(Name::unbound(&gcx).is_unbound());
        assert!(!Name::new(&gcx, Symbol::intern("a")).is_unbound());
    }
}
