//! Interned identifier text. A [`Symbol`] is a cheap, `Copy` handle to a
//! deduplicated string; all identifier text in the surface tree and the core
//! representation goes through here.

use std::fmt;

use internment::Intern;

/// The reserved text of the unbound binder.
const UNBOUND: &str = "_";

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Intern<String>);

impl Symbol {
    pub fn intern(s: &str) -> Symbol {
        Symbol(Intern::from_ref(s))
    }

    pub fn unbound() -> Symbol {
        Symbol::intern(UNBOUND)
    }

    pub fn is_unbound(self) -> bool {
        self.as_str() == UNBOUND
    }

    pub fn as_str(self) -> &'static str {
        let s: &'static String = self.0.as_ref();
        s.as_str()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;

    #[test]
    fn interning_deduplicates() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
        assert_ne!(Symbol::intern("foo"), Symbol::intern("bar"));
    }

    #[test]
    fn unbound_is_reserved() {
        assert!(Symbol::unbound().is_unbound());
        assert!(!Symbol::intern("x").is_unbound());
    }
}
