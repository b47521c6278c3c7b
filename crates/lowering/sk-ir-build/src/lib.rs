//! Concrete syntax → IR building
//!
//! Walks a [`SourceUnit`] bottom-up per statement/expression, producing IR
//! nodes and populating the scope tree as it goes. A function or arrow opens
//! a new scope, gets its parameters inserted as `Argument`, has its body
//! built inside that scope, and is then itself inserted as `Function` into
//! the *enclosing* scope. Variable declarations insert as `Variable` at the
//! point of declaration; imports insert `ImportedName`. Unsupported concrete
//! syntax is a hard error naming the kind and location.

mod error;

pub use error::BuildError;

use la_arena::Arena;
use rustc_hash::FxHashMap;
use sk_directive::DirectiveSet;
use sk_intern::{Interner, Symbol};
use sk_ir::{
    BinOp, DefId, EnumDef, EnumId, EnumMember, Expr, ExprId, ExprKind, FuncParam, Function,
    FunctionId, IrFile, MemberValue, Property, ScopeId, Stmt, StmtId, StmtKind, Ty, VarDecl,
};
use sk_resolve::{Binding, ScopeKind, ScopeTree, SymbolKind};
use sk_span::{FileId, FileSpan, Span};
use sk_syntax::{
    AssignOp, BinaryOp, CstId, CstKind, EnumMemberCst, FunctionDecl, Param, PostfixOp, PrefixOp,
    SourceUnit, TypeAnn, VarDeclarator,
};

/// The output of building one compilation unit
#[derive(Debug, Clone)]
pub struct BuiltUnit {
    /// The IR
    pub ir: IrFile,
    /// The completed scope tree, consulted read-only during lowering
    pub scopes: ScopeTree,
}

/// Build the IR for one compilation unit
///
/// # Errors
///
/// Returns [`BuildError`] on the first unsupported construct or malformed
/// directive; the unit's partial IR is discarded.
pub fn build_unit(unit: &SourceUnit, interner: &Interner) -> Result<BuiltUnit, BuildError> {
    let CstKind::SourceFile {
        module_name,
        statements,
    } = &unit.node(unit.root).kind
    else {
        return Err(Builder::unexpected(unit, unit.root));
    };

    let mut builder = Builder::new(unit, interner.clone());
    let mut top_level = Vec::with_capacity(statements.len());
    for &stmt in statements {
        top_level.push(builder.build_stmt(stmt)?);
    }
    Ok(builder.finish(*module_name, top_level))
}

/// Builder state for one unit
struct Builder<'cst> {
    unit: &'cst SourceUnit,
    interner: Interner,
    scopes: ScopeTree,
    current_scope: ScopeId,
    exprs: Arena<Expr>,
    stmts: Arena<Stmt>,
    functions: FxHashMap<FunctionId, Function>,
    enums: FxHashMap<EnumId, EnumDef>,
    next_function_id: u32,
    next_enum_id: u32,
    file: FileId,
}

impl<'cst> Builder<'cst> {
    fn new(unit: &'cst SourceUnit, interner: Interner) -> Self {
        let scopes = ScopeTree::new();
        let current_scope = scopes.root();
        Self {
            unit,
            interner,
            scopes,
            current_scope,
            exprs: Arena::new(),
            stmts: Arena::new(),
            functions: FxHashMap::default(),
            enums: FxHashMap::default(),
            next_function_id: 0,
            next_enum_id: 0,
            file: unit.file,
        }
    }

    fn finish(self, module_name: Symbol, statements: Vec<StmtId>) -> BuiltUnit {
        let root_scope = self.scopes.root();
        BuiltUnit {
            ir: IrFile {
                module_name,
                file: self.file,
                statements,
                exprs: self.exprs,
                stmts: self.stmts,
                functions: self.functions,
                enums: self.enums,
                root_scope,
            },
            scopes: self.scopes,
        }
    }

    fn span(&self, id: CstId) -> Span {
        self.unit.node(id).span
    }

    fn file_span(&self, id: CstId) -> FileSpan {
        FileSpan::new(self.file, self.span(id))
    }

    fn unsupported(&self, kind: &str, at: CstId) -> BuildError {
        BuildError::UnsupportedConstruct {
            kind: kind.to_string(),
            span: self.file_span(at),
        }
    }

    /// Error for a node kind that cannot appear where it did
    fn unexpected(unit: &SourceUnit, at: CstId) -> BuildError {
        BuildError::UnsupportedConstruct {
            kind: kind_name(&unit.node(at).kind).to_string(),
            span: FileSpan::new(unit.file, unit.node(at).span),
        }
    }

    fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.alloc(Expr {
            kind,
            span,
            scope: self.current_scope,
        })
    }

    fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.stmts.alloc(Stmt {
            kind,
            span,
            scope: self.current_scope,
        })
    }

    fn next_function(&mut self) -> FunctionId {
        let id = FunctionId(self.next_function_id);
        self.next_function_id += 1;
        id
    }

    fn next_enum(&mut self) -> EnumId {
        let id = EnumId(self.next_enum_id);
        self.next_enum_id += 1;
        id
    }

    fn directives(&self, texts: &[String]) -> Result<DirectiveSet, BuildError> {
        Ok(DirectiveSet::parse_all(
            texts.iter().map(String::as_str),
            &self.interner,
        )?)
    }

    // ---- statements ----

    fn build_stmt(&mut self, id: CstId) -> Result<StmtId, BuildError> {
        let span = self.span(id);
        // Clone the node out of the CST arena; building recurses arbitrarily
        // and the borrow would otherwise pin `self`.
        let kind = self.unit.node(id).kind.clone();
        match kind {
            CstKind::Function(decl) => self.build_function_decl(&decl, span, id),
            CstKind::VariableList {
                directives, decls, ..
            } => self.build_variable_list(&directives, &decls, span),
            CstKind::Enum {
                name,
                directives,
                members,
            } => self.build_enum(name, &directives, &members, span),
            CstKind::NamedImport { names, module } => {
                let stmt = self.alloc_stmt(StmtKind::NamedImport { names: names.clone(), module }, span);
                for name in names {
                    self.insert_import(name, stmt, span);
                }
                Ok(stmt)
            }
            CstKind::NamespaceImport { alias, module } => {
                let stmt = self.alloc_stmt(StmtKind::NamespaceImport { alias, module }, span);
                self.insert_import(alias, stmt, span);
                Ok(stmt)
            }
            CstKind::ModuleDecl { name, body } => self.build_module_decl(name, &body, span),
            CstKind::ExprStmt(expr) => {
                let expr = self.build_expr(expr)?;
                Ok(self.alloc_stmt(StmtKind::ExprStmt(expr), span))
            }
            CstKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.build_expr(condition)?;
                let then_branch = self.build_stmts(&then_branch)?;
                let else_branch = match else_branch {
                    Some(stmts) => Some(self.build_stmts(&stmts)?),
                    None => None,
                };
                Ok(self.alloc_stmt(
                    StmtKind::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    span,
                ))
            }
            CstKind::While { condition, body } => {
                let condition = self.build_expr(condition)?;
                let body = self.build_stmts(&body)?;
                Ok(self.alloc_stmt(StmtKind::While { condition, body }, span))
            }
            CstKind::For {
                init,
                condition,
                update,
                body,
            } => {
                let init = match init {
                    Some(init) => Some(self.build_stmt(init)?),
                    None => None,
                };
                let condition = match condition {
                    Some(condition) => Some(self.build_expr(condition)?),
                    None => None,
                };
                let update = match update {
                    Some(update) => Some(self.build_expr(update)?),
                    None => None,
                };
                let body = self.build_stmts(&body)?;
                Ok(self.alloc_stmt(
                    StmtKind::For {
                        init,
                        condition,
                        update,
                        body,
                    },
                    span,
                ))
            }
            CstKind::ForOf {
                binding,
                iterable,
                body,
            } => {
                let iterable = self.build_expr(iterable)?;
                let body = self.build_stmts(&body)?;
                let stmt = self.alloc_stmt(
                    StmtKind::ForOf {
                        binding,
                        iterable,
                        body,
                    },
                    span,
                );
                self.insert_local(binding, stmt, 0, Ty::Unknown, span);
                Ok(stmt)
            }
            CstKind::ForIn {
                binding,
                object,
                body,
            } => {
                // Carried through so lowering can reject it with a precise
                // error; names still resolve if a later frontend enables it.
                let object = self.build_expr(object)?;
                let body = self.build_stmts(&body)?;
                let stmt = self.alloc_stmt(
                    StmtKind::ForIn {
                        binding,
                        object,
                        body,
                    },
                    span,
                );
                self.insert_local(binding, stmt, 0, Ty::Unknown, span);
                Ok(stmt)
            }
            CstKind::Return { value } => {
                let value = match value {
                    Some(value) => Some(self.build_expr(value)?),
                    None => None,
                };
                Ok(self.alloc_stmt(StmtKind::ReturnStatement { value }, span))
            }
            CstKind::Block { statements } => {
                let statements = self.build_stmts(&statements)?;
                Ok(self.alloc_stmt(StmtKind::Block { statements }, span))
            }
            CstKind::Unsupported { kind } => Err(self.unsupported(kind, id)),
            _ => Err(self.unsupported(kind_name(&self.unit.node(id).kind), id)),
        }
    }

    fn build_stmts(&mut self, ids: &[CstId]) -> Result<Vec<StmtId>, BuildError> {
        ids.iter().map(|&id| self.build_stmt(id)).collect()
    }

    fn build_function_decl(
        &mut self,
        decl: &FunctionDecl,
        span: Span,
        at: CstId,
    ) -> Result<StmtId, BuildError> {
        let directives = self.directives(&decl.directives)?;
        let id = self.build_function(Some(decl.name), &decl.params, &decl.body, directives, span)?;
        let stmt = self.alloc_stmt(StmtKind::FunctionDeclaration(id), span);
        self.scopes.insert(
            self.current_scope,
            decl.name,
            Binding {
                def: DefId::Function(id),
                kind: SymbolKind::Function,
                ty: Ty::Function,
                span: self.span(at),
            },
        );
        Ok(stmt)
    }

    /// Shared path for named functions and arrows: open a scope, insert the
    /// parameters as arguments, build the body, close the scope.
    fn build_function(
        &mut self,
        name: Option<Symbol>,
        params: &[Param],
        body: &[CstId],
        directives: DirectiveSet,
        span: Span,
    ) -> Result<FunctionId, BuildError> {
        let id = self.next_function();
        let scope_kind = if name.is_some() {
            ScopeKind::Function
        } else {
            ScopeKind::Lambda
        };
        let body_scope = self.scopes.enter_scope(self.current_scope, scope_kind);
        self.current_scope = body_scope;

        let mut ir_params = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            let ty = param.ty.as_ref().map_or(Ty::Unknown, lower_type_ann);
            self.scopes.insert(
                body_scope,
                param.name,
                Binding {
                    def: DefId::Param {
                        function: id,
                        index: index as u32,
                    },
                    kind: SymbolKind::Argument,
                    ty: ty.clone(),
                    span,
                },
            );
            ir_params.push(FuncParam {
                name: param.name,
                ty,
            });
        }

        let body = self.build_stmts(body);
        // Close the body scope; the tree keeps it for lowering-time lookups.
        self.current_scope = self.scopes.exit_scope(body_scope)?;
        let body = body?;

        self.functions.insert(
            id,
            Function {
                id,
                name,
                params: ir_params,
                body,
                directives,
                body_scope,
                span,
            },
        );
        Ok(id)
    }

    fn build_variable_list(
        &mut self,
        directives: &[String],
        decls: &[VarDeclarator],
        span: Span,
    ) -> Result<StmtId, BuildError> {
        let directives = self.directives(directives)?;
        let mut ir_decls = Vec::with_capacity(decls.len());
        for decl in decls {
            let init = match decl.init {
                Some(init) => Some(self.build_expr(init)?),
                None => None,
            };
            let ty = match (&decl.ty, init) {
                (Some(ann), _) => lower_type_ann(ann),
                (None, Some(init)) => self.shape_ty(init),
                (None, None) => Ty::Unknown,
            };
            ir_decls.push(VarDecl {
                name: decl.name,
                ty,
                init,
            });
        }
        let stmt = self.alloc_stmt(
            StmtKind::VariableDeclaration {
                directives,
                decls: ir_decls.clone(),
            },
            span,
        );
        for (index, decl) in ir_decls.into_iter().enumerate() {
            self.insert_local(decl.name, stmt, index as u32, decl.ty, span);
        }
        Ok(stmt)
    }

    fn build_enum(
        &mut self,
        name: Symbol,
        directives: &[String],
        members: &[EnumMemberCst],
        span: Span,
    ) -> Result<StmtId, BuildError> {
        let directives = self.directives(directives)?;
        let mut ir_members = Vec::with_capacity(members.len());
        for member in members {
            let value = match member.init {
                None => None,
                Some(init) => match &self.unit.node(init).kind {
                    CstKind::NumberLit(value) => Some(MemberValue::Number(*value)),
                    CstKind::StringLit(text) => Some(MemberValue::Str(text.clone())),
                    _ => return Err(self.unsupported("non-literal enum member initializer", init)),
                },
            };
            ir_members.push(EnumMember {
                name: member.name,
                value,
            });
        }
        let id = self.next_enum();
        self.enums.insert(
            id,
            EnumDef {
                id,
                name,
                members: ir_members,
                directives,
                span,
            },
        );
        let stmt = self.alloc_stmt(StmtKind::EnumDeclaration(id), span);
        self.scopes.insert(
            self.current_scope,
            name,
            Binding {
                def: DefId::Enum(id),
                kind: SymbolKind::Variable,
                ty: Ty::Unknown,
                span,
            },
        );
        Ok(stmt)
    }

    /// Ambient `declare module` block: register the declared names so call
    /// sites resolve, emit nothing.
    fn build_module_decl(
        &mut self,
        name: Symbol,
        body: &[CstId],
        span: Span,
    ) -> Result<StmtId, BuildError> {
        let stmt = self.alloc_stmt(StmtKind::ModuleDeclaration { name }, span);
        for &decl in body {
            let decl_span = self.span(decl);
            match &self.unit.node(decl).kind {
                CstKind::Function(func) => {
                    // A bodyless ambient function is still a function: call
                    // sites invoke it through the function namespace, and its
                    // directives (renames in particular) apply.
                    let directives = self.directives(&func.directives)?;
                    let params = func.params.clone();
                    let id = self.build_function(
                        Some(func.name),
                        &params,
                        &[],
                        directives,
                        decl_span,
                    )?;
                    self.scopes.insert(
                        self.current_scope,
                        func.name,
                        Binding {
                            def: DefId::Function(id),
                            kind: SymbolKind::Function,
                            ty: Ty::Function,
                            span: decl_span,
                        },
                    );
                }
                CstKind::VariableList { decls, .. } => {
                    for var in decls {
                        let ty = var.ty.as_ref().map_or(Ty::Unknown, lower_type_ann);
                        self.scopes.insert(
                            self.current_scope,
                            var.name,
                            Binding {
                                def: DefId::Import { stmt },
                                kind: SymbolKind::ImportedName,
                                ty,
                                span: decl_span,
                            },
                        );
                    }
                }
                _ => return Err(self.unsupported("ambient declaration", decl)),
            }
        }
        Ok(stmt)
    }

    fn insert_local(&mut self, name: Symbol, stmt: StmtId, index: u32, ty: Ty, span: Span) {
        self.scopes.insert(
            self.current_scope,
            name,
            Binding {
                def: DefId::Local { stmt, index },
                kind: SymbolKind::Variable,
                ty,
                span,
            },
        );
    }

    fn insert_import(&mut self, name: Symbol, stmt: StmtId, span: Span) {
        self.scopes.insert(
            self.current_scope,
            name,
            Binding {
                def: DefId::Import { stmt },
                kind: SymbolKind::ImportedName,
                ty: Ty::Unknown,
                span,
            },
        );
    }

    // ---- expressions ----

    fn build_expr(&mut self, id: CstId) -> Result<ExprId, BuildError> {
        let span = self.span(id);
        let kind = self.unit.node(id).kind.clone();
        match kind {
            CstKind::Identifier(name) => Ok(self.alloc_expr(ExprKind::Identifier(name), span)),
            CstKind::StringLit(text) => Ok(self.alloc_expr(ExprKind::StringLiteral(text), span)),
            CstKind::NumberLit(value) => Ok(self.alloc_expr(ExprKind::NumberLiteral(value), span)),
            CstKind::BoolLit(value) => Ok(self.alloc_expr(ExprKind::BooleanLiteral(value), span)),
            CstKind::NullLit => Ok(self.alloc_expr(ExprKind::Null, span)),
            CstKind::ArrayLit { elements } => {
                let elements = self.build_exprs(&elements)?;
                Ok(self.alloc_expr(ExprKind::ArrayLiteral { elements }, span))
            }
            CstKind::ObjectLit { properties } => {
                let mut ir_props = Vec::with_capacity(properties.len());
                for (name, value) in properties {
                    let value = self.build_expr(value)?;
                    ir_props.push(Property { name, value });
                }
                Ok(self.alloc_expr(
                    ExprKind::ObjectLiteral {
                        properties: ir_props,
                    },
                    span,
                ))
            }
            CstKind::Call { callee, args } => {
                let callee = self.build_expr(callee)?;
                let args = self.build_exprs(&args)?;
                Ok(self.alloc_expr(ExprKind::CallExpression { callee, args }, span))
            }
            CstKind::PropertyAccess { object, property } => {
                let object = self.build_expr(object)?;
                Ok(self.alloc_expr(ExprKind::PropertyAccess { object, property }, span))
            }
            CstKind::ElementAccess { object, index } => {
                let object = self.build_expr(object)?;
                let index = self.build_expr(index)?;
                Ok(self.alloc_expr(ExprKind::ElementAccess { object, index }, span))
            }
            CstKind::Binary { op, lhs, rhs } => {
                let lhs = self.build_expr(lhs)?;
                let rhs = self.build_expr(rhs)?;
                Ok(self.alloc_expr(
                    ExprKind::Binary {
                        op: lower_binary_op(op),
                        lhs,
                        rhs,
                    },
                    span,
                ))
            }
            CstKind::UnaryPrefix { op, operand } => {
                let operand = self.build_expr(operand)?;
                Ok(self.alloc_expr(
                    ExprKind::UnaryPrefix {
                        op: lower_prefix_op(op),
                        operand,
                    },
                    span,
                ))
            }
            CstKind::UnaryPostfix { op, operand } => {
                let operand = self.build_expr(operand)?;
                Ok(self.alloc_expr(
                    ExprKind::UnaryPostfix {
                        op: lower_postfix_op(op),
                        operand,
                    },
                    span,
                ))
            }
            CstKind::Delete { target } => {
                let target = self.build_expr(target)?;
                Ok(self.alloc_expr(ExprKind::DeleteExpression { target }, span))
            }
            CstKind::Arrow { params, body } => {
                let id =
                    self.build_function(None, &params, &body, DirectiveSet::new(), span)?;
                Ok(self.alloc_expr(ExprKind::Lambda(id), span))
            }
            CstKind::Assign { op, target, value } => {
                let target = self.build_expr(target)?;
                let value = self.build_expr(value)?;
                Ok(self.alloc_expr(
                    ExprKind::Assignment {
                        op: lower_assign_op(op),
                        target,
                        value,
                    },
                    span,
                ))
            }
            CstKind::Unsupported { kind } => Err(self.unsupported(kind, id)),
            _ => Err(self.unsupported(kind_name(&self.unit.node(id).kind), id)),
        }
    }

    fn build_exprs(&mut self, ids: &[CstId]) -> Result<Vec<ExprId>, BuildError> {
        ids.iter().map(|&id| self.build_expr(id)).collect()
    }

    /// Static type from an initializer's shape, used when a declarator has
    /// no annotation
    fn shape_ty(&self, init: ExprId) -> Ty {
        match &self.exprs[init].kind {
            ExprKind::NumberLiteral(_) => Ty::Number,
            ExprKind::StringLiteral(_) => Ty::Str,
            ExprKind::BooleanLiteral(_) => Ty::Boolean,
            ExprKind::Null => Ty::Null,
            ExprKind::ArrayLiteral { .. } => Ty::Array(Box::new(Ty::Unknown)),
            ExprKind::Lambda(_) => Ty::Function,
            _ => Ty::Unknown,
        }
    }
}

fn lower_type_ann(ann: &TypeAnn) -> Ty {
    match ann {
        TypeAnn::Number => Ty::Number,
        TypeAnn::Str => Ty::Str,
        TypeAnn::Boolean => Ty::Boolean,
        TypeAnn::Null => Ty::Null,
        TypeAnn::Any => Ty::Unknown,
        TypeAnn::Array(elem) => Ty::Array(Box::new(lower_type_ann(elem))),
        TypeAnn::Map(key, value) => Ty::Map(
            Box::new(lower_type_ann(key)),
            Box::new(lower_type_ann(value)),
        ),
        TypeAnn::Object(fields) => Ty::Object(
            fields
                .iter()
                .map(|field| sk_ir::ty::Field {
                    name: field.name,
                    ty: lower_type_ann(&field.ty),
                })
                .collect(),
        ),
        TypeAnn::Function(..) => Ty::Function,
    }
}

fn lower_binary_op(op: BinaryOp) -> BinOp {
    match op {
        BinaryOp::Add => BinOp::Add,
        BinaryOp::Sub => BinOp::Sub,
        BinaryOp::Mul => BinOp::Mul,
        BinaryOp::Div => BinOp::Div,
        BinaryOp::Mod => BinOp::Mod,
        BinaryOp::Eq => BinOp::Eq,
        BinaryOp::Ne => BinOp::Ne,
        BinaryOp::Lt => BinOp::Lt,
        BinaryOp::Le => BinOp::Le,
        BinaryOp::Gt => BinOp::Gt,
        BinaryOp::Ge => BinOp::Ge,
        BinaryOp::And => BinOp::And,
        BinaryOp::Or => BinOp::Or,
    }
}

fn lower_prefix_op(op: PrefixOp) -> sk_ir::PrefixOp {
    match op {
        PrefixOp::Not => sk_ir::PrefixOp::Not,
        PrefixOp::Neg => sk_ir::PrefixOp::Neg,
        PrefixOp::Increment => sk_ir::PrefixOp::Increment,
        PrefixOp::Decrement => sk_ir::PrefixOp::Decrement,
    }
}

fn lower_postfix_op(op: PostfixOp) -> sk_ir::PostfixOp {
    match op {
        PostfixOp::Increment => sk_ir::PostfixOp::Increment,
        PostfixOp::Decrement => sk_ir::PostfixOp::Decrement,
    }
}

fn lower_assign_op(op: AssignOp) -> sk_ir::AssignOp {
    match op {
        AssignOp::Assign => sk_ir::AssignOp::Assign,
        AssignOp::AddAssign => sk_ir::AssignOp::AddAssign,
        AssignOp::SubAssign => sk_ir::AssignOp::SubAssign,
        AssignOp::MulAssign => sk_ir::AssignOp::MulAssign,
        AssignOp::DivAssign => sk_ir::AssignOp::DivAssign,
    }
}

/// Display name for a CST kind, used in errors
fn kind_name(kind: &CstKind) -> &'static str {
    match kind {
        CstKind::SourceFile { .. } => "source file",
        CstKind::Function(_) => "function declaration",
        CstKind::VariableList { .. } => "variable declaration",
        CstKind::Enum { .. } => "enum declaration",
        CstKind::NamedImport { .. } => "named import",
        CstKind::NamespaceImport { .. } => "namespace import",
        CstKind::ModuleDecl { .. } => "module declaration",
        CstKind::ExprStmt(_) => "expression statement",
        CstKind::If { .. } => "if statement",
        CstKind::While { .. } => "while loop",
        CstKind::For { .. } => "for loop",
        CstKind::ForOf { .. } => "for-of loop",
        CstKind::ForIn { .. } => "for-in loop",
        CstKind::Return { .. } => "return statement",
        CstKind::Block { .. } => "block",
        CstKind::Identifier(_) => "identifier",
        CstKind::StringLit(_) => "string literal",
        CstKind::NumberLit(_) => "number literal",
        CstKind::BoolLit(_) => "boolean literal",
        CstKind::NullLit => "null literal",
        CstKind::ArrayLit { .. } => "array literal",
        CstKind::ObjectLit { .. } => "object literal",
        CstKind::Call { .. } => "call expression",
        CstKind::PropertyAccess { .. } => "property access",
        CstKind::ElementAccess { .. } => "element access",
        CstKind::Binary { .. } => "binary expression",
        CstKind::UnaryPrefix { .. } => "unary expression",
        CstKind::UnaryPostfix { .. } => "postfix expression",
        CstKind::Delete { .. } => "delete expression",
        CstKind::Arrow { .. } => "arrow function",
        CstKind::Assign { .. } => "assignment",
        CstKind::Unsupported { kind } => kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_syntax::CstBuilder;

    fn one_function_unit() -> (SourceUnit, Interner) {
        let interner = Interner::new();
        let mut cst = CstBuilder::new(interner.clone(), FileId(0));
        let value = cst.number(1.0);
        let ret = cst.alloc(CstKind::Return { value: Some(value) }, Span::default());
        let func = cst.alloc(
            CstKind::Function(FunctionDecl {
                name: cst.intern("one"),
                directives: Vec::new(),
                params: Vec::new(),
                return_ty: Some(TypeAnn::Number),
                body: vec![ret],
            }),
            Span::default(),
        );
        (cst.finish("main", vec![func]), interner)
    }

    #[test]
    fn test_function_registers_in_enclosing_scope() {
        let (unit, interner) = one_function_unit();
        let built = build_unit(&unit, &interner).unwrap();

        let name = interner.intern("one");
        let binding = built.scopes.lookup(built.ir.root_scope, name).unwrap();
        assert_eq!(binding.kind, SymbolKind::Function);
        assert!(matches!(binding.def, DefId::Function(_)));
    }

    #[test]
    fn test_params_are_arguments_in_body_scope() {
        let interner = Interner::new();
        let mut cst = CstBuilder::new(interner.clone(), FileId(0));
        let body_ref = cst.ident("a");
        let ret = cst.alloc(
            CstKind::Return {
                value: Some(body_ref),
            },
            Span::default(),
        );
        let func = cst.alloc(
            CstKind::Function(FunctionDecl {
                name: cst.intern("id"),
                directives: Vec::new(),
                params: vec![Param {
                    name: cst.intern("a"),
                    ty: Some(TypeAnn::Number),
                }],
                return_ty: None,
                body: vec![ret],
            }),
            Span::default(),
        );
        let unit = cst.finish("main", vec![func]);
        let built = build_unit(&unit, &interner).unwrap();

        let func = built
            .ir
            .functions
            .values()
            .next()
            .expect("one function built");
        let binding = built
            .scopes
            .lookup(func.body_scope, interner.intern("a"))
            .unwrap();
        assert_eq!(binding.kind, SymbolKind::Argument);
        assert_eq!(binding.ty, Ty::Number);
    }

    #[test]
    fn test_unsupported_construct_is_fatal() {
        let interner = Interner::new();
        let mut cst = CstBuilder::new(interner.clone(), FileId(0));
        let class = cst.alloc(
            CstKind::Unsupported {
                kind: "class declaration",
            },
            Span::new(10, 20),
        );
        let unit = cst.finish("main", vec![class]);

        let err = build_unit(&unit, &interner).unwrap_err();
        let BuildError::UnsupportedConstruct { kind, span } = err else {
            panic!("expected UnsupportedConstruct, got {err:?}");
        };
        assert_eq!(kind, "class declaration");
        assert_eq!(span.span, Span::new(10, 20));
    }

    #[test]
    fn test_named_import_inserts_imported_names() {
        let interner = Interner::new();
        let mut cst = CstBuilder::new(interner.clone(), FileId(0));
        let import = cst.alloc(
            CstKind::NamedImport {
                names: vec![cst.intern("helperFn")],
                module: cst.intern("./helpers"),
            },
            Span::default(),
        );
        let unit = cst.finish("main", vec![import]);
        let built = build_unit(&unit, &interner).unwrap();

        let binding = built
            .scopes
            .lookup(built.ir.root_scope, interner.intern("helperFn"))
            .unwrap();
        assert_eq!(binding.kind, SymbolKind::ImportedName);
    }

    #[test]
    fn test_malformed_directive_is_fatal() {
        let interner = Interner::new();
        let mut cst = CstBuilder::new(interner.clone(), FileId(0));
        let func = cst.alloc(
            CstKind::Function(FunctionDecl {
                name: cst.intern("f"),
                directives: vec!["[Name]".to_string()],
                params: Vec::new(),
                return_ty: None,
                body: Vec::new(),
            }),
            Span::default(),
        );
        let unit = cst.finish("main", vec![func]);

        assert!(matches!(
            build_unit(&unit, &interner),
            Err(BuildError::Directive(_))
        ));
    }
}
