//! Rendering of core terms for diagnostics. No surface-syntax guarantees
//! beyond what error messages need.

use id_arena::Id;
use pretty::RcDoc;

use crate::{ast::Param, ctxt::GlobalCtxt};

use super::ast::{HoleId, Term, TermKind};

const PREC_ARROW: usize = 1;
const PREC_APP: usize = 2;
const PREC_PRIMARY: usize = 3;

fn maybe_paren(x: usize, y: usize, doc: RcDoc<'static>) -> RcDoc<'static> {
    if y < x {
        RcDoc::text("(").append(doc).append(")").group()
    } else {
        doc
    }
}

/// The display name of a placeholder: `?n`, or `?un` for a user-written one.
pub fn meta_name(id: HoleId, is_user: bool) -> String {
    if is_user {
        format!("?u{}", id.index())
    } else {
        format!("?{}", id.index())
    }
}

pub fn pp_term(prec: usize, gcx: &GlobalCtxt, t: Id<Term>) -> RcDoc<'static> {
    match gcx.arenas.term.term(t).kind {
        TermKind::Type => RcDoc::text("Type"),
        TermKind::Ref(n) => RcDoc::text(n.text.as_str()),
        TermKind::Meta(id, is_user) => RcDoc::text(meta_name(id, is_user)),
        TermKind::FnType(p, ret) => {
            let doc = pp_param(gcx, &p)
                .append(RcDoc::space())
                .append("->")
                .append(RcDoc::space())
                .append(pp_term(PREC_ARROW, gcx, ret));
            maybe_paren(prec, PREC_ARROW, doc)
        }
        TermKind::Fn(p, body) => {
            let doc = RcDoc::text("fun ")
                .append(p.name.text.as_str())
                .append(RcDoc::space())
                .append("=>")
                .append(RcDoc::space())
                .append(pp_term(PREC_ARROW, gcx, body));
            maybe_paren(prec, PREC_ARROW, doc)
        }
        TermKind::App(f, x) => {
            let doc = pp_term(PREC_APP, gcx, f)
                .append(RcDoc::space())
                .append(pp_term(PREC_PRIMARY, gcx, x));
            maybe_paren(prec, PREC_APP, doc)
        }
    }
}

fn pp_param(gcx: &GlobalCtxt, p: &Param<Id<Term>>) -> RcDoc<'static> {
    let (open, close) = if p.implicit { ("{", "}") } else { ("(", ")") };
    RcDoc::text(open)
        .append(p.name.text.as_str())
        .append(RcDoc::text(" : "))
        .append(pp_term(PREC_ARROW, gcx, p.ty))
        .append(close)
        .group()
}

pub fn render(gcx: &GlobalCtxt, t: Id<Term>) -> String {
    let mut w = Vec::new();
    pp_term(0, gcx, t).render(80, &mut w).unwrap();
    String::from_utf8(w).unwrap()
}

/// One captured local binding, as shown in unsolved-placeholder context.
pub fn render_param(gcx: &GlobalCtxt, p: &Param<Id<Term>>) -> String {
    let mut w = Vec::new();
    pp_param(gcx, p).render(80, &mut w).unwrap();
    String::from_utf8(w).unwrap()
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Name, Param, Span},
        ctxt::GlobalCtxt,
        intern::Symbol,
        typeck::ast::{Term, TermKind},
    };

    use super::render;

    #[test]
    fn renders_nested_function_types() {
        // {a : Type} -> (b : a) -> a
        let gcx = GlobalCtxt::new();
        let typ = gcx.arenas.term.common().typ;
        let a = Name::new(&gcx, Symbol::intern("a"));
        let b = Name::new(&gcx, Symbol::intern("b"));
        let ra = Term::new(&gcx, TermKind::Ref(a), Span::DUMMY);
        let inner = Term::new(
            &gcx,
            TermKind::FnType(
                Param {
                    name: b,
                    ty: ra,
                    implicit: false,
                },
                ra,
            ),
            Span::DUMMY,
        );
        let outer = Term::new(
            &gcx,
            TermKind::FnType(
                Param {
                    name: a,
                    ty: typ,
                    implicit: true,
                },
                inner,
            ),
            Span::DUMMY,
        );
        assert_eq!(render(&gcx, outer), "{a : Type} -> (b : a) -> a");
    }

    #[test]
    fn renders_applications_with_parens() {
        let gcx = GlobalCtxt::new();
        let f = Name::new(&gcx, Symbol::intern("f"));
        let x = Name::new(&gcx, Symbol::intern("x"));
        let rf = Term::new(&gcx, TermKind::Ref(f), Span::DUMMY);
        let rx = Term::new(&gcx, TermKind::Ref(x), Span::DUMMY);
        let fx = Term::new(&gcx, TermKind::App(rf, rx), Span::DUMMY);
        let ffx = Term::new(&gcx, TermKind::App(rf, fx), Span::DUMMY);
        assert_eq!(render(&gcx, ffx), "f (f x)");
    }
}
