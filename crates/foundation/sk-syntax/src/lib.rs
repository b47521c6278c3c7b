//! Concrete syntax contract between the surface-language frontend and the
//! IR builder
//!
//! Parsing is an external collaborator: a host frontend hands us a tree of
//! [`CstNode`]s whose kinds are already resolved (function declaration, call,
//! literal, …) together with identifier/literal text and raw directive
//! strings pulled from leading comments. This crate only defines that tree
//! and a small arena-backed [`CstBuilder`] for assembling it.

use la_arena::{Arena, Idx};
use sk_intern::{Interner, Symbol};
use sk_span::{FileId, Span};

/// Id of a node in a [`SourceUnit`]'s arena
pub type CstId = Idx<CstNode>;

/// One concrete syntax node
#[derive(Debug, Clone, PartialEq)]
pub struct CstNode {
    /// The kind of this node
    pub kind: CstKind,
    /// Source location
    pub span: Span,
}

/// A parsed compilation unit, ready for IR building
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// All nodes of this unit
    pub arena: Arena<CstNode>,
    /// The `SourceFile` root node
    pub root: CstId,
    /// Which file this unit came from
    pub file: FileId,
}

impl SourceUnit {
    /// Get a node by id
    pub fn node(&self, id: CstId) -> &CstNode {
        &self.arena[id]
    }
}

/// Declaration keyword of a variable list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    /// `const`
    Const,
    /// `let`
    Let,
}

/// Binary operators of the surface language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `===` (the frontend folds `==` into this as well)
    Eq,
    /// `!==`
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `++x`
    Increment,
    /// `--x`
    Decrement,
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    /// `x++`
    Increment,
    /// `x--`
    Decrement,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
}

/// A surface type annotation
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnn {
    /// `number`
    Number,
    /// `string`
    Str,
    /// `boolean`
    Boolean,
    /// `null` / `undefined`
    Null,
    /// `any` (or no usable annotation)
    Any,
    /// `T[]`
    Array(Box<TypeAnn>),
    /// `Map<K, V>`
    Map(Box<TypeAnn>, Box<TypeAnn>),
    /// `{ field: T, … }`
    Object(Vec<FieldAnn>),
    /// `(args) => R`
    Function(Vec<TypeAnn>, Box<TypeAnn>),
}

/// One field of an object-shape annotation
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAnn {
    /// Field name
    pub name: Symbol,
    /// Field type
    pub ty: TypeAnn,
}

/// A declared function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Symbol,
    /// Declared type, if annotated
    pub ty: Option<TypeAnn>,
}

/// A function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Function name
    pub name: Symbol,
    /// Raw directive texts from the leading comment
    pub directives: Vec<String>,
    /// Parameters in declaration order
    pub params: Vec<Param>,
    /// Declared return type, if annotated
    pub return_ty: Option<TypeAnn>,
    /// Body statements
    pub body: Vec<CstId>,
}

/// One declarator of a variable list (`const a = 1, b = 2` has two)
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    /// Bound name
    pub name: Symbol,
    /// Declared type, if annotated
    pub ty: Option<TypeAnn>,
    /// Initializer expression
    pub init: Option<CstId>,
}

/// One member of an enum declaration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberCst {
    /// Member name
    pub name: Symbol,
    /// Explicit initializer, if present (must be a literal)
    pub init: Option<CstId>,
}

/// Concrete syntax node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum CstKind {
    /// Root of a compilation unit
    SourceFile {
        /// Module name derived from the file name by the host
        module_name: Symbol,
        /// Top-level statements
        statements: Vec<CstId>,
    },

    // ---- declarations & statements ----
    /// Function declaration statement
    Function(FunctionDecl),
    /// `const` / `let` declaration list
    VariableList {
        /// Declaring keyword
        keyword: DeclKeyword,
        /// Raw directive texts from the leading comment
        directives: Vec<String>,
        /// Declarators, left to right
        decls: Vec<VarDeclarator>,
    },
    /// Enum declaration
    Enum {
        /// Enum name
        name: Symbol,
        /// Raw directive texts from the leading comment
        directives: Vec<String>,
        /// Members in declaration order
        members: Vec<EnumMemberCst>,
    },
    /// `import { a, b } from "mod"`
    NamedImport {
        /// Imported names
        names: Vec<Symbol>,
        /// Module specifier text
        module: Symbol,
    },
    /// `import * as ns from "mod"`
    NamespaceImport {
        /// Namespace alias
        alias: Symbol,
        /// Module specifier text
        module: Symbol,
    },
    /// Ambient `declare module` block
    ModuleDecl {
        /// Declared module name
        name: Symbol,
        /// Declarations inside the block
        body: Vec<CstId>,
    },
    /// Expression statement
    ExprStmt(CstId),
    /// `if` statement
    If {
        /// Condition expression
        condition: CstId,
        /// Then-branch statements
        then_branch: Vec<CstId>,
        /// Else-branch statements, if present
        else_branch: Option<Vec<CstId>>,
    },
    /// `while` loop
    While {
        /// Condition expression
        condition: CstId,
        /// Body statements
        body: Vec<CstId>,
    },
    /// Classic `for (init; cond; update)` loop
    For {
        /// Init statement (a variable list or expression statement)
        init: Option<CstId>,
        /// Condition expression
        condition: Option<CstId>,
        /// Update expression
        update: Option<CstId>,
        /// Body statements
        body: Vec<CstId>,
    },
    /// `for (const x of xs)` loop
    ForOf {
        /// Loop binding
        binding: Symbol,
        /// Iterated collection expression
        iterable: CstId,
        /// Body statements
        body: Vec<CstId>,
    },
    /// `for (const k in o)` loop
    ForIn {
        /// Loop binding
        binding: Symbol,
        /// Enumerated object expression
        object: CstId,
        /// Body statements
        body: Vec<CstId>,
    },
    /// `return` statement
    Return {
        /// Returned value, if any
        value: Option<CstId>,
    },
    /// Braced statement block
    Block {
        /// Statements
        statements: Vec<CstId>,
    },

    // ---- expressions ----
    /// Identifier reference
    Identifier(Symbol),
    /// String literal (unescaped text)
    StringLit(String),
    /// Number literal
    NumberLit(f64),
    /// Boolean literal
    BoolLit(bool),
    /// `null` / `undefined`
    NullLit,
    /// Array literal
    ArrayLit {
        /// Element expressions
        elements: Vec<CstId>,
    },
    /// Object literal
    ObjectLit {
        /// Properties as (name, value) pairs, in source order
        properties: Vec<(Symbol, CstId)>,
    },
    /// Call expression
    Call {
        /// Callee expression
        callee: CstId,
        /// Arguments
        args: Vec<CstId>,
    },
    /// `obj.prop`
    PropertyAccess {
        /// Object expression
        object: CstId,
        /// Property name
        property: Symbol,
    },
    /// `obj[index]`
    ElementAccess {
        /// Object expression
        object: CstId,
        /// Index expression
        index: CstId,
    },
    /// Binary expression
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: CstId,
        /// Right operand
        rhs: CstId,
    },
    /// Prefix unary expression
    UnaryPrefix {
        /// Operator
        op: PrefixOp,
        /// Operand
        operand: CstId,
    },
    /// Postfix unary expression
    UnaryPostfix {
        /// Operator
        op: PostfixOp,
        /// Operand
        operand: CstId,
    },
    /// `delete` expression
    Delete {
        /// Deleted place (property or element access)
        target: CstId,
    },
    /// Arrow function; expression bodies arrive desugared to a single
    /// `Return` statement
    Arrow {
        /// Parameters
        params: Vec<Param>,
        /// Body statements
        body: Vec<CstId>,
    },
    /// Assignment expression
    Assign {
        /// Operator
        op: AssignOp,
        /// Assigned place
        target: CstId,
        /// Value expression
        value: CstId,
    },

    /// A surface construct this compiler does not translate (class,
    /// interface-as-value, spread, …); building one is a hard error
    Unsupported {
        /// Human-readable construct kind
        kind: &'static str,
    },
}

/// Helper to assemble a [`SourceUnit`]
pub struct CstBuilder {
    arena: Arena<CstNode>,
    interner: Interner,
    file: FileId,
}

impl CstBuilder {
    /// Creates a builder for one compilation unit
    pub fn new(interner: Interner, file: FileId) -> Self {
        Self {
            arena: Arena::new(),
            interner,
            file,
        }
    }

    /// Allocates a node and returns its id
    pub fn alloc(&mut self, kind: CstKind, span: Span) -> CstId {
        self.arena.alloc(CstNode { kind, span })
    }

    /// Interns identifier text
    pub fn intern(&self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    /// Shared interner handle
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Gets a reference to a node
    pub fn get(&self, id: CstId) -> &CstNode {
        &self.arena[id]
    }

    /// Allocates an identifier node
    pub fn ident(&mut self, text: &str) -> CstId {
        let sym = self.intern(text);
        self.alloc(CstKind::Identifier(sym), Span::default())
    }

    /// Allocates a number literal node
    pub fn number(&mut self, value: f64) -> CstId {
        self.alloc(CstKind::NumberLit(value), Span::default())
    }

    /// Allocates a string literal node
    pub fn string(&mut self, text: &str) -> CstId {
        self.alloc(CstKind::StringLit(text.to_string()), Span::default())
    }

    /// Allocates a boolean literal node
    pub fn boolean(&mut self, value: bool) -> CstId {
        self.alloc(CstKind::BoolLit(value), Span::default())
    }

    /// Allocates a null literal node
    pub fn null(&mut self) -> CstId {
        self.alloc(CstKind::NullLit, Span::default())
    }

    /// Wraps an expression in an expression statement
    pub fn expr_stmt(&mut self, expr: CstId) -> CstId {
        let span = self.arena[expr].span;
        self.alloc(CstKind::ExprStmt(expr), span)
    }

    /// Consumes the builder, allocating the `SourceFile` root
    pub fn finish(mut self, module_name: &str, statements: Vec<CstId>) -> SourceUnit {
        let module_name = self.intern(module_name);
        let root = self.alloc(
            CstKind::SourceFile {
                module_name,
                statements,
            },
            Span::default(),
        );
        SourceUnit {
            arena: self.arena,
            root,
            file: self.file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_roundtrip() {
        let mut builder = CstBuilder::new(Interner::new(), FileId(0));
        let lhs = builder.number(1.0);
        let rhs = builder.number(2.0);
        let sum = builder.alloc(
            CstKind::Binary {
                op: BinaryOp::Add,
                lhs,
                rhs,
            },
            Span::default(),
        );
        let stmt = builder.expr_stmt(sum);
        let unit = builder.finish("main", vec![stmt]);

        let CstKind::SourceFile { statements, .. } = &unit.node(unit.root).kind else {
            panic!("root must be a SourceFile");
        };
        assert_eq!(statements, &vec![stmt]);
    }
}
