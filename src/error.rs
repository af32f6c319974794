//! Error types.
//!
//! [`ElabError`] is the structured diagnostic taxonomy the checker produces;
//! it carries names, rendered types, and spans, never formatted messages —
//! rendering with line/column positions is [`crate::diag`]'s job (or the
//! embedding driver's). [`DioneError`] is the outer error type for embedders.

use thiserror::Error;

use crate::{ast::Span, intern::Symbol};

/// The error type used within dione.
#[derive(Error, Debug)]
pub enum DioneError {
    /// IO errors
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    /// Formatting errors
    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),
    /// A structured diagnostic from resolution or checking.
    #[error(transparent)]
    Elab(#[from] ElabError),
    /// Any other error, using [`eyre`]
    #[error(transparent)]
    Other(#[from] eyre::Report),
}

/// A handy alias for [`Result<T, DioneError>`], genericized over `T`.
pub type DioneResult<T> = Result<T, DioneError>;

/// A structured diagnostic. Each variant is a distinct condition; the first
/// one raised aborts the whole batch.
///
/// The `UnknownCase` family belongs to the unfinished inductive-datatype
/// extension and is carried for forward compatibility only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElabError {
    #[error("duplicate variable `{name}`")]
    DuplicateVariable { name: Symbol, span: Span },

    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: Symbol, span: Span },

    /// `want` and `got` are pretty-rendered types (or the literal word
    /// `function` when one side is only known to be a function).
    #[error("type mismatch: want `{want}`, got `{got}`")]
    TypeMismatch { want: String, got: String, span: Span },

    /// A placeholder the whole run could not solve. `context` holds the
    /// rendered local bindings captured where the placeholder was created,
    /// in binding order.
    #[error("unsolved placeholder `{name}`")]
    UnsolvedMeta {
        name: String,
        context: Vec<String>,
        ty: String,
        span: Span,
    },

    #[error("undefined implicit parameter `{name}`")]
    UndefinedImplicit { name: Symbol, span: Span },

    #[error("cannot match case `{got}` of type `{want}`")]
    UnknownCase { want: String, got: String, span: Span },

    #[error("duplicate case `{name}`")]
    DuplicateCase { name: Symbol, span: Span },

    #[error("want {want} case parameter(s), got {got}")]
    CaseParamMismatch { want: usize, got: usize, span: Span },

    #[error("missing case(s): {names:?}")]
    MissingCases { names: Vec<Symbol>, span: Span },

    /// A declaration form the checker does not elaborate yet.
    #[error("{what} are not supported yet")]
    Unsupported { what: &'static str, span: Span },

    /// The engine's recursion limit was hit before the term bottomed out.
    #[error("program too complex")]
    TooComplex { span: Span },

    /// An internal invariant violation. Never a user-facing semantic error;
    /// seeing one of these is a bug in the checker.
    #[error("internal error: {msg}")]
    Ice { msg: &'static str, span: Span },
}

impl ElabError {
    pub fn span(&self) -> Span {
        match self {
            ElabError::DuplicateVariable { span, .. }
            | ElabError::UndefinedVariable { span, .. }
            | ElabError::TypeMismatch { span, .. }
            | ElabError::UnsolvedMeta { span, .. }
            | ElabError::UndefinedImplicit { span, .. }
            | ElabError::UnknownCase { span, .. }
            | ElabError::DuplicateCase { span, .. }
            | ElabError::CaseParamMismatch { span, .. }
            | ElabError::MissingCases { span, .. }
            | ElabError::Unsupported { span, .. }
            | ElabError::TooComplex { span }
            | ElabError::Ice { span, .. } => *span,
        }
    }
}
