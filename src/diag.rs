//! Rendering [`ElabError`]s as [`ariadne`] reports.
//!
//! The checker itself only produces structured [`ElabError`] values; turning
//! them into source-annotated terminal output is this module's job, so that
//! embedders that want the structured form never pay for the rendering.

use ariadne::{Label, Report, ReportKind};
use itertools::Itertools;

use crate::{ast::Span, error::ElabError};

pub type Diagnostic = Report<'static, Span>;

/// Build the report for a single error. The caller supplies the source to
/// [`Diagnostic::eprint`] (or `write`) it against.
pub fn report(err: &ElabError) -> Diagnostic {
    let span = err.span();
    let builder = Report::build(ReportKind::Error, (), span.lo() as usize)
        .with_message(err.to_string());
    let builder = match err {
        ElabError::DuplicateVariable { name, .. } => builder
            .with_label(Label::new(span).with_message(format!("`{name}` redefined here")))
            .with_note("top-level definitions and parameters must have unique names"),
        ElabError::UndefinedVariable { .. } => {
            builder.with_label(Label::new(span).with_message("not found in this scope"))
        }
        ElabError::TypeMismatch { want, got, .. } => builder.with_label(
            Label::new(span).with_message(format!("this has type `{got}`, but `{want}` was expected")),
        ),
        ElabError::UnsolvedMeta { name, context, ty, .. } => {
            let builder = builder
                .with_label(Label::new(span).with_message(format!("`{name}` created here")))
                .with_note(format!("`{name}` is a placeholder of type `{ty}`"));
            if context.is_empty() {
                builder
            } else {
                builder.with_help(format!(
                    "the placeholder may mention {}",
                    context.iter().map(|p| format!("`{p}`")).join(", ")
                ))
            }
        }
        ElabError::UndefinedImplicit { name, .. } => builder.with_label(
            Label::new(span).with_message(format!("no implicit parameter `{name}` to bind")),
        ),
        ElabError::UnknownCase { want, .. } => builder
            .with_label(Label::new(span).with_message(format!("not a constructor of `{want}`"))),
        ElabError::DuplicateCase { name, .. } => builder
            .with_label(Label::new(span).with_message(format!("`{name}` already covered"))),
        ElabError::CaseParamMismatch { want, got, .. } => builder.with_label(
            Label::new(span).with_message(format!("this case binds {got} parameter(s), not {want}")),
        ),
        ElabError::MissingCases { names, .. } => builder.with_label(
            Label::new(span).with_message(format!(
                "missing {}",
                names.iter().map(|n| format!("`{n}`")).join(", ")
            )),
        ),
        ElabError::Unsupported { .. } => {
            builder.with_label(Label::new(span).with_message("used here"))
        }
        ElabError::TooComplex { .. } => builder
            .with_label(Label::new(span).with_message("while elaborating this"))
            .with_help("the recursion limit was reached; simplify the definition"),
        ElabError::Ice { .. } => builder
            .with_label(Label::new(span).with_message("while elaborating this"))
            .with_note("this is a bug, not an error in the input"),
    };
    builder.finish()
}

#[cfg(test)]
mod tests {
    use ariadne::Source;

    use crate::{ast::Span, error::ElabError, intern::Symbol};

    use super::report;

    #[test]
    fn renders_against_source() {
        let err = ElabError::UndefinedVariable {
            name: Symbol::intern("banana"),
            span: Span::new(16, 22),
        };
        let mut out = Vec::new();
        report(&err)
            .write(Source::from("def f : Type := banana"), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("undefined variable `banana`"));
    }
}
