//! Target AST node set
//!
//! A small recursive tree over `Box`/`Vec`. Identifier names arrive already
//! mangled to the target's hyphenated convention; the emitter never touches
//! name text.

/// Which namespace an identifier reference lives in
///
/// The target dialect keeps function slots and value slots distinct; a
/// function-namespace reference in value position must be sharp-quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Function slot (`#'name` in value position)
    Function,
    /// Value slot
    Variable,
}

/// Which indexing form an element access emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerKind {
    /// `(elt seq i)`
    Array,
    /// `(aref str i)`
    Str,
    /// `(gethash key map)`
    Map,
}

/// Direction of a postfix mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixKind {
    /// `x++`
    Increment,
    /// `x--`
    Decrement,
}

/// One property of an object literal
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key symbol text
    pub name: String,
    /// Value expression
    pub value: Node,
}

/// One binding of a `let*` form
#[derive(Debug, Clone, PartialEq)]
pub struct LetItem {
    /// Bound name
    pub name: String,
    /// Bound value; `None` binds nil
    pub value: Option<Node>,
}

/// Parameter list of a function definition
#[derive(Debug, Clone, PartialEq)]
pub enum ParamList {
    /// Ordinary positional parameters
    Positional(Vec<String>),
    /// Keyword parameters (`&key`), for the named-argument convention
    Keyword(Vec<String>),
}

/// A target AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Identifier reference
    Identifier {
        /// Mangled name text
        name: String,
        /// Function or value namespace
        namespace: Namespace,
    },
    /// String literal
    StringLit(String),
    /// Quoted symbol literal (`'name`)
    SymbolLit(String),
    /// Number literal
    NumberLit(f64),
    /// Boolean literal (`t` / `nil`)
    BooleanLit(bool),
    /// `nil`
    Nil,
    /// Array literal (quoted data by default)
    ArrayLiteral(Vec<Node>),
    /// Object literal as an association list (quoted data by default)
    ObjectLiteral(Vec<Property>),
    /// Element access
    Indexer {
        /// Which indexing form
        kind: IndexerKind,
        /// Indexed expression
        object: Box<Node>,
        /// Index expression
        index: Box<Node>,
    },
    /// Property access off an object value
    PropertyAccess {
        /// Object expression
        object: Box<Node>,
        /// Property symbol text
        property: String,
    },
    /// Assignment to a place
    Assignment {
        /// Target place
        target: Box<Node>,
        /// Value expression
        value: Box<Node>,
    },
    /// Binary expression; `op` is the target operator text
    BinaryExpression {
        /// Operator text (`+`, `equal`, `and`, …)
        op: &'static str,
        /// Left operand
        lhs: Box<Node>,
        /// Right operand
        rhs: Box<Node>,
    },
    /// Prefix unary expression
    UnaryPrefix {
        /// Operator text (`not`, `-`, …)
        op: &'static str,
        /// Operand
        operand: Box<Node>,
    },
    /// Postfix mutation, yielding the pre-mutation value
    ///
    /// Renders as binding the current value of the place into `temp`,
    /// mutating the place, then yielding `temp`.
    UnaryPostfix {
        /// Mutated place
        place: Box<Node>,
        /// Direction
        kind: PostfixKind,
        /// Unit-unique temporary name
        temp: String,
    },
    /// Direct head-position call of a function-namespace name
    CallDirect {
        /// Mangled callee name
        callee: String,
        /// Arguments
        args: Vec<Node>,
    },
    /// Indirect call of a value holding a callable
    CallIndirect {
        /// Callee expression
        callee: Box<Node>,
        /// Arguments
        args: Vec<Node>,
    },
    /// Call under the named-argument convention
    CallNamed {
        /// Mangled callee name
        callee: String,
        /// Keyword arguments as (field, value) pairs
        fields: Vec<(String, Node)>,
    },
    /// Function definition
    Defun {
        /// Defining keyword (`defun`, `cl-defun`, or a custom form)
        form: String,
        /// Mangled name
        name: String,
        /// Parameters
        params: ParamList,
        /// Whether to mark the definition `(interactive)`
        interactive: bool,
        /// Unit-unique non-local-return block name
        block: String,
        /// Body statements
        body: Vec<Node>,
    },
    /// Anonymous function
    Lambda {
        /// Parameters
        params: Vec<String>,
        /// Unit-unique non-local-return block name
        block: String,
        /// Body statements
        body: Vec<Node>,
    },
    /// `let*` binding scope
    LetBinding {
        /// Bindings in order
        items: Vec<LetItem>,
        /// Body statements
        body: Vec<Node>,
    },
    /// Statement sequence in single-expression position
    ///
    /// One statement renders bare; more wrap in `progn`.
    Body(Vec<Node>),
    /// Conditional
    If {
        /// Condition
        condition: Box<Node>,
        /// Then branch
        then_branch: Box<Node>,
        /// Else branch, if present
        else_branch: Option<Box<Node>>,
    },
    /// Per-element iteration (`dolist`)
    ForOf {
        /// Fresh loop variable
        binding: String,
        /// Iterated sequence expression
        sequence: Box<Node>,
        /// Body statements
        body: Vec<Node>,
    },
    /// `while` loop
    While {
        /// Condition
        condition: Box<Node>,
        /// Body statements
        body: Vec<Node>,
    },
    /// Non-local exit from the named block
    ReturnStatement {
        /// Enclosing block name
        block: String,
        /// Returned value, if any
        value: Option<Box<Node>>,
    },
    /// Top-level enum: mutation of the pre-declared binding to the member
    /// alist
    Enum {
        /// Mangled enum name
        name: String,
        /// Members as (name, value) data
        members: Vec<Property>,
    },
    /// `(require 'module)` for a named import
    ModuleImport {
        /// Mangled module feature name
        module: String,
    },
    /// `(require 'module)` for a namespace import
    NamespaceImport {
        /// Mangled module feature name
        module: String,
    },
}

/// One compiled file, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Feature name for the trailing `provide`
    pub feature: String,
    /// Names of top-level bindings, pre-declared before any form runs
    pub defvars: Vec<String>,
    /// Top-level forms in order
    pub forms: Vec<Node>,
}
