//! String interning for identifier symbols
//!
//! Identifier and literal text is interned once at the concrete-syntax
//! boundary and flows through the symbol table and IR as a cheap `Symbol`.

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;
use std::sync::{Arc, Mutex};

/// Thread-safe string interner
#[derive(Clone)]
pub struct Interner {
    inner: Arc<Mutex<ThreadedRodeo>>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ThreadedRodeo::new())),
        }
    }

    /// Intern a string, returning its symbol
    pub fn intern(&self, text: &str) -> Symbol {
        self.lock().get_or_intern(text)
    }

    /// Look up a previously interned string without interning it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.lock().get(text)
    }

    /// Resolve a symbol back to its string
    pub fn resolve(&self, sym: Symbol) -> String {
        self.lock().resolve(&sym).to_string()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThreadedRodeo> {
        // A poisoned interner still holds valid strings
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_roundtrip() {
        let interner = Interner::new();
        let sym = interner.intern("makeArgList");
        assert_eq!(interner.resolve(sym), "makeArgList");
        assert_eq!(interner.get("makeArgList"), Some(sym));
        assert_eq!(interner.get("neverSeen"), None);
    }

    #[test]
    fn test_same_text_same_symbol() {
        let interner = Interner::new();
        assert_eq!(interner.intern("x"), interner.intern("x"));
    }
}
