//! Language-agnostic intermediate representation (IR)
//!
//! The IR abstracts the surface program away from its concrete syntax. Nodes
//! are created once by the builder and never mutated; every node is tagged
//! with the scope it originated in, and every declaration-producing node
//! carries its directives. Expressions and statements live in per-file
//! arenas; functions and enums live in id-keyed tables.

pub mod ty;

pub use ty::Ty;

use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sk_directive::DirectiveSet;
use sk_intern::Symbol;
use sk_span::{FileId, Span};

/// IR expression id
pub type ExprId = Idx<Expr>;
/// IR statement id
pub type StmtId = Idx<Stmt>;

/// Unique id for a function or lambda within one file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

/// Unique id for an enum declaration within one file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnumId(pub u32);

/// Id of a scope in the symbol table's scope tree
///
/// Defined here (rather than in the resolver) because IR nodes are tagged
/// with their originating scope.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

/// What a resolved name refers to
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum DefId {
    /// A function or lambda declaration
    Function(FunctionId),
    /// An enum declaration
    Enum(EnumId),
    /// One declarator of a variable-declaration list
    Local {
        /// The declaring statement
        stmt: StmtId,
        /// Declarator position within the list
        index: u32,
    },
    /// A function parameter
    Param {
        /// The declaring function
        function: FunctionId,
        /// Parameter position
        index: u32,
    },
    /// A name introduced by an import or an ambient module declaration
    Import {
        /// The declaring statement
        stmt: StmtId,
    },
}

/// Binary operators (language-agnostic)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
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
    Not,
    Neg,
    Increment,
    Decrement,
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

/// An IR expression, tagged with origin scope and source span
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The expression itself
    pub kind: ExprKind,
    /// Source location
    pub span: Span,
    /// Scope this expression was built in
    pub scope: ScopeId,
}

/// One property of an object literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    /// Property name
    pub name: Symbol,
    /// Property value
    pub value: ExprId,
}

/// IR expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Identifier reference
    Identifier(Symbol),
    /// String literal
    StringLiteral(String),
    /// Number literal
    NumberLiteral(f64),
    /// Boolean literal
    BooleanLiteral(bool),
    /// Null literal
    Null,
    /// Array literal
    ArrayLiteral {
        /// Elements in order
        elements: Vec<ExprId>,
    },
    /// Object literal
    ObjectLiteral {
        /// Properties in source order
        properties: Vec<Property>,
    },
    /// `obj[index]`
    ElementAccess {
        /// Indexed expression
        object: ExprId,
        /// Index expression
        index: ExprId,
    },
    /// `obj.prop`
    PropertyAccess {
        /// Object expression
        object: ExprId,
        /// Property name
        property: Symbol,
    },
    /// Binary expression
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        lhs: ExprId,
        /// Right operand
        rhs: ExprId,
    },
    /// Prefix unary expression
    UnaryPrefix {
        /// Operator
        op: PrefixOp,
        /// Operand
        operand: ExprId,
    },
    /// Postfix unary expression
    UnaryPostfix {
        /// Operator
        op: PostfixOp,
        /// Operand
        operand: ExprId,
    },
    /// `delete` expression
    DeleteExpression {
        /// Deleted place
        target: ExprId,
    },
    /// Call expression
    CallExpression {
        /// Callee expression
        callee: ExprId,
        /// Arguments
        args: Vec<ExprId>,
    },
    /// Arrow function; the function itself lives in the file's table
    Lambda(FunctionId),
    /// Assignment expression
    Assignment {
        /// Operator
        op: AssignOp,
        /// Assigned place
        target: ExprId,
        /// Value
        value: ExprId,
    },
}

/// An IR statement, tagged with origin scope and source span
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// The statement itself
    pub kind: StmtKind,
    /// Source location
    pub span: Span,
    /// Scope this statement was built in
    pub scope: ScopeId,
}

/// One declarator of a variable-declaration list
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Bound name
    pub name: Symbol,
    /// Static type, from the annotation or the initializer's shape
    pub ty: Ty,
    /// Initializer expression, if present
    pub init: Option<ExprId>,
}

/// IR statement variants
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Variable-declaration list (`const a = 1, b = 2`)
    VariableDeclaration {
        /// Directives from the leading comment
        directives: DirectiveSet,
        /// Declarators, left to right
        decls: Vec<VarDecl>,
    },
    /// Function declaration
    FunctionDeclaration(FunctionId),
    /// Expression statement
    ExprStmt(ExprId),
    /// `if` statement
    If {
        /// Condition
        condition: ExprId,
        /// Then branch
        then_branch: Vec<StmtId>,
        /// Else branch, if present
        else_branch: Option<Vec<StmtId>>,
    },
    /// `while` loop
    While {
        /// Condition
        condition: ExprId,
        /// Body
        body: Vec<StmtId>,
    },
    /// Classic three-clause `for` loop
    For {
        /// Init statement
        init: Option<StmtId>,
        /// Condition
        condition: Option<ExprId>,
        /// Update expression
        update: Option<ExprId>,
        /// Body
        body: Vec<StmtId>,
    },
    /// `for … of` loop
    ForOf {
        /// Loop binding
        binding: Symbol,
        /// Iterated collection
        iterable: ExprId,
        /// Body
        body: Vec<StmtId>,
    },
    /// `for … in` loop; carried through the IR so the lowering stage can
    /// reject it with a precise error
    ForIn {
        /// Loop binding
        binding: Symbol,
        /// Enumerated object
        object: ExprId,
        /// Body
        body: Vec<StmtId>,
    },
    /// `return` statement
    ReturnStatement {
        /// Returned value, if any
        value: Option<ExprId>,
    },
    /// Braced statement block
    Block {
        /// Statements
        statements: Vec<StmtId>,
    },
    /// Enum declaration; the members live in the file's enum table
    EnumDeclaration(EnumId),
    /// `import { a, b } from "mod"`
    NamedImport {
        /// Imported names
        names: Vec<Symbol>,
        /// Module specifier
        module: Symbol,
    },
    /// `import * as ns from "mod"`
    NamespaceImport {
        /// Namespace alias
        alias: Symbol,
        /// Module specifier
        module: Symbol,
    },
    /// Ambient module declaration; registers names, emits nothing
    ModuleDeclaration {
        /// Declared module name
        name: Symbol,
    },
}

/// A declared function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    /// Parameter name
    pub name: Symbol,
    /// Static type
    pub ty: Ty,
}

/// A function or lambda
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Unique id
    pub id: FunctionId,
    /// Name; `None` for lambdas
    pub name: Option<Symbol>,
    /// Parameters in declaration order
    pub params: Vec<FuncParam>,
    /// Body statements
    pub body: Vec<StmtId>,
    /// Directives from the leading comment
    pub directives: DirectiveSet,
    /// The scope this function's body opens
    pub body_scope: ScopeId,
    /// Source location
    pub span: Span,
}

/// The value of an enum member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    /// Explicit numeric initializer
    Number(f64),
    /// Explicit string initializer
    Str(String),
}

/// One member of an enum
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Member name
    pub name: Symbol,
    /// Explicit initializer; absent means the member's own name
    pub value: Option<MemberValue>,
}

/// An enum declaration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// Unique id
    pub id: EnumId,
    /// Enum name
    pub name: Symbol,
    /// Members in declaration order
    pub members: Vec<EnumMember>,
    /// Directives from the leading comment
    pub directives: DirectiveSet,
    /// Source location
    pub span: Span,
}

/// IR of one compilation unit (source file)
#[derive(Debug, Clone)]
pub struct IrFile {
    /// Module name derived from the file name
    pub module_name: Symbol,
    /// Which file this unit came from
    pub file: FileId,
    /// Top-level statements in source order
    pub statements: Vec<StmtId>,
    /// Expression arena
    pub exprs: Arena<Expr>,
    /// Statement arena
    pub stmts: Arena<Stmt>,
    /// Functions and lambdas
    pub functions: FxHashMap<FunctionId, Function>,
    /// Enum declarations
    pub enums: FxHashMap<EnumId, EnumDef>,
    /// The file's root scope
    pub root_scope: ScopeId,
}

impl IrFile {
    /// Get an expression by id
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    /// Get a statement by id
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    /// Get a function by id; ids handed out by the builder are always valid
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(&id)
    }

    /// Get an enum by id
    pub fn enum_def(&self, id: EnumId) -> Option<&EnumDef> {
        self.enums.get(&id)
    }
}
