//! String interning for identifier and module-path deduplication.

use rustc_hash::FxHashMap;
use std::rc::Rc;

/// An interned string. Cheap to copy and compare (pointer + length only
/// matters for `Eq`/`Hash` via the underlying `Rc<str>` contents, but since
/// all atoms for a given string come from the same interner, pointer
/// equality would also work within one interner's lifetime).
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Atom(Rc<str>);

impl Atom {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for Atom {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A single-threaded string interner. Not `Send`/`Sync` by design — each
/// compilation context owns one rather than sharing a global table.
#[derive(Default)]
pub struct Interner {
    table: FxHashMap<Rc<str>, ()>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some((existing, _)) = self.table.get_key_value(s) {
            return Atom(existing.clone());
        }
        let rc: Rc<str> = Rc::from(s);
        self.table.insert(rc.clone(), ());
        Atom(rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo");
    }

    #[test]
    fn distinct_strings_are_distinct() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }
}
