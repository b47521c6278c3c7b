//! Scope tree and symbol table
//!
//! Built by the IR builder as it walks a file, then consulted read-only by
//! the lowering stage. Each scope maps names to [`Binding`]s; `lookup` walks
//! outward through ancestors, `insert` touches only the given scope. Absence
//! at lookup time is not inherently an error — callers decide (a call to an
//! unknown name still lowers, through the value namespace).

use rustc_hash::FxHashMap;
use sk_ir::{DefId, ScopeId, Ty};
use sk_intern::Symbol;
use sk_span::Span;
use thiserror::Error;

/// Classification of a declared name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Declared by a function declaration; calls go through the function
    /// namespace
    Function,
    /// Declared by a variable declaration; calls go through `funcall`
    Variable,
    /// Introduced by an import or ambient module declaration
    ImportedName,
    /// A function or lambda parameter
    Argument,
}

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The file's top-level scope
    File,
    /// A named function's body
    Function,
    /// An arrow function's body
    Lambda,
}

/// What a name in scope resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The declaring IR node
    pub def: DefId,
    /// Classification
    pub kind: SymbolKind,
    /// Declared static type
    pub ty: Ty,
    /// Where it was declared
    pub span: Span,
}

/// A single scope in the tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// Parent scope (`None` for the file scope)
    pub parent: Option<ScopeId>,
    /// Kind of scope
    pub kind: ScopeKind,
    /// Names declared directly in this scope
    bindings: FxHashMap<Symbol, Binding>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            bindings: FxHashMap::default(),
        }
    }
}

/// Errors from scope-tree manipulation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// `exit_scope` was called on the file scope
    #[error("attempted to exit the file's root scope")]
    ExitedRootScope,
}

/// Scope tree for one compilation unit
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree containing only the file scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None, ScopeKind::File)],
        }
    }

    /// The file's root scope
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a child scope under `parent`
    pub fn enter_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(parent), kind));
        id
    }

    /// Close `scope`, returning its parent
    ///
    /// The scope itself stays in the tree — lowering resolves against the
    /// completed tree later — but construction moves back to the parent.
    ///
    /// # Errors
    ///
    /// [`ResolveError::ExitedRootScope`] when `scope` is the file scope.
    pub fn exit_scope(&self, scope: ScopeId) -> Result<ScopeId, ResolveError> {
        self.scopes[scope.0 as usize]
            .parent
            .ok_or(ResolveError::ExitedRootScope)
    }

    /// Declare a name in `scope` only
    ///
    /// Re-declaring a name in the same scope replaces the earlier binding;
    /// the surface language allows redeclaration and the last one is the one
    /// later references see.
    pub fn insert(&mut self, scope: ScopeId, name: Symbol, binding: Binding) {
        self.scopes[scope.0 as usize].bindings.insert(name, binding);
    }

    /// Resolve `name` from `scope`, walking outward through ancestors
    ///
    /// Returns `None` when no scope on the chain declares the name.
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<&Binding> {
        let mut current = scope;
        loop {
            let scope_data = &self.scopes[current.0 as usize];
            if let Some(binding) = scope_data.bindings.get(&name) {
                return Some(binding);
            }
            current = scope_data.parent?;
        }
    }

    /// Kind of a scope
    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope.0 as usize].kind
    }

    /// Get a scope by id
    pub fn get(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.0 as usize]
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
