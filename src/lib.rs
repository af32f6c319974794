//! dione is a type checker for a minimal dependently typed language: one
//! universe (`Type : Type`), dependent function types with implicit
//! parameters, lambdas, applications, and placeholders (`_`) solved by
//! unification during definitional-equality comparison.
//!
//! The pipeline is resolution ([`resolve`]) followed by bidirectional
//! elaboration ([`typeck`]); parsing is left to the embedder, which builds
//! the surface tree of [`ast`] directly. [`run`] drives a whole batch of
//! declarations and reports failure as a structured [`error::ElabError`],
//! renderable with [`diag::report`].

pub mod ast;
pub mod ctxt;
pub mod diag;
pub mod error;
mod intern;
pub mod resolve;
pub mod typeck;

pub use intern::Symbol;

use ast::Decl;
use ctxt::GlobalCtxt;
use error::ElabError;
use resolve::Resolver;
use typeck::{CheckedDecl, TypeckCtxt};

/// Resolve and elaborate a batch of declarations, in order. The batch fails
/// as a whole on the first error, including any placeholder left unsolved
/// once every declaration has been checked.
pub fn run(gcx: &GlobalCtxt, decls: &[Decl]) -> Result<Vec<CheckedDecl>, ElabError> {
    let decls = Resolver::new(gcx).run(decls)?;
    TypeckCtxt::new(gcx).run(&decls)
}
