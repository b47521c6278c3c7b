//! IR → target AST lowering
//!
//! Expression lowering is a pure structural recursion: every IR expression
//! variant maps to one target variant through an operator-translation table.
//! Statement-sequence lowering is the central algorithm: sibling statements
//! are processed left to right, and a variable declaration absorbs all of
//! its following siblings into the body of its own `let*` scope, because the
//! target dialect nests lexical scopes explicitly. Top-level declarations
//! are the exception: they mutate pre-declared file-level bindings instead,
//! so they stay visible across the whole compiled file.
//!
//! Temporary names and non-local-return block names come from counters owned
//! by the per-unit [`LowerCtx`], never from process-wide state, so
//! independent units can lower in parallel.

mod error;
pub mod mangle;

pub use error::LowerError;
pub use mangle::hyphenate;

use sk_directive::DirectiveSet;
use sk_elisp::{
    BLOCK_PREFIX, IndexerKind, LetItem, Namespace, Node, ParamList, PostfixKind, Property,
    RUNTIME_ADD, SourceFile, TEMP_PREFIX,
};
use sk_intern::{Interner, Symbol};
use sk_ir::{
    AssignOp, BinOp, DefId, EnumDef, EnumId, ExprId, ExprKind, Function, FunctionId, IrFile,
    MemberValue, PrefixOp, PostfixOp, ScopeId, StmtId, StmtKind, Ty,
};
use sk_resolve::{Binding, ScopeTree, SymbolKind};
use sk_span::{FileSpan, Span};

/// Lower one compilation unit's IR to a target AST
///
/// # Errors
///
/// Returns [`LowerError`] on the first unsupported node, unbound return,
/// directive misuse, or internal resolution failure; the unit's partial
/// output is discarded.
pub fn lower_file(
    ir: &IrFile,
    scopes: &ScopeTree,
    interner: &Interner,
) -> Result<SourceFile, LowerError> {
    let mut ctx = LowerCtx {
        ir,
        scopes,
        interner,
        next_temp: 0,
        next_block: 0,
        frames: Vec::new(),
    };

    let defvars = ctx.collect_defvars()?;
    let forms = ctx.lower_seq(&ir.statements, true)?;
    Ok(SourceFile {
        feature: feature_name(&interner.resolve(ir.module_name)),
        defvars,
        forms,
    })
}

/// One open function/lambda during lowering
///
/// Return statements walk this stack outward to find their block; the stack
/// never crosses into sibling scopes because frames are pushed and popped
/// strictly around body lowering.
struct Frame {
    /// The block name returns in this function target
    block: String,
    /// The record parameter of a named-arguments function, whose property
    /// accesses collapse to bare keyword-parameter references
    named_param: Option<Symbol>,
}

/// Per-unit lowering state
struct LowerCtx<'a> {
    ir: &'a IrFile,
    scopes: &'a ScopeTree,
    interner: &'a Interner,
    next_temp: u32,
    next_block: u32,
    frames: Vec<Frame>,
}

impl<'a> LowerCtx<'a> {
    fn fresh_temp(&mut self) -> String {
        let name = format!("{TEMP_PREFIX}{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    fn fresh_block(&mut self) -> String {
        let name = format!("{BLOCK_PREFIX}{}", self.next_block);
        self.next_block += 1;
        name
    }

    fn file_span(&self, span: Span) -> FileSpan {
        FileSpan::new(self.ir.file, span)
    }

    fn function_def(&self, id: FunctionId, span: Span) -> Result<&'a Function, LowerError> {
        self.ir
            .function(id)
            .ok_or_else(|| LowerError::SymbolResolutionFailure {
                name: format!("function #{}", id.0),
                scope: self.ir.root_scope.0,
                span: self.file_span(span),
            })
    }

    fn enum_def(&self, id: EnumId, span: Span) -> Result<&'a EnumDef, LowerError> {
        self.ir
            .enum_def(id)
            .ok_or_else(|| LowerError::SymbolResolutionFailure {
                name: format!("enum #{}", id.0),
                scope: self.ir.root_scope.0,
                span: self.file_span(span),
            })
    }

    // ---- names ----

    fn symbol_text(&self, sym: Symbol) -> String {
        self.interner.resolve(sym)
    }

    /// Emitted name for a declaration: hyphenation, overridden entirely by
    /// `[Name: …]`, with `[Predicate]` appending `?`
    fn decorated_name(&self, name: Symbol, directives: &DirectiveSet) -> String {
        let mut base = match directives.rename() {
            Some(rename) => self.symbol_text(rename),
            None => hyphenate(&self.symbol_text(name)),
        };
        if directives.is_predicate() {
            base.push('?');
        }
        base
    }

    /// Emitted name for a reference, following its binding's declaration
    /// directives when it has any
    fn reference_name(&self, name: Symbol, binding: Option<&Binding>) -> String {
        let directives = binding.and_then(|binding| match binding.def {
            DefId::Function(id) => self.ir.function(id).map(|func| &func.directives),
            DefId::Enum(id) => self.ir.enum_def(id).map(|def| &def.directives),
            DefId::Local { stmt, .. } => match &self.ir.stmt(stmt).kind {
                StmtKind::VariableDeclaration { directives, .. } => Some(directives),
                _ => None,
            },
            DefId::Param { .. } | DefId::Import { .. } => None,
        });
        match directives {
            Some(directives) => self.decorated_name(name, directives),
            None => hyphenate(&self.symbol_text(name)),
        }
    }

    // ---- statement sequences ----

    /// Lower an ordered sibling sequence into one nesting level
    ///
    /// A variable declaration (or enum) that is not at file top level takes
    /// the remaining siblings as the body of its own `let*` and ends this
    /// level.
    fn lower_seq(&mut self, stmts: &[StmtId], root: bool) -> Result<Vec<Node>, LowerError> {
        let mut out = Vec::new();
        for (index, &id) in stmts.iter().enumerate() {
            let stmt = self.ir.stmt(id);
            match &stmt.kind {
                StmtKind::VariableDeclaration { directives, decls } if !root => {
                    let mut items = Vec::with_capacity(decls.len());
                    for decl in decls {
                        let value = match decl.init {
                            Some(init) => Some(self.lower_expr(init)?),
                            None => None,
                        };
                        items.push(LetItem {
                            name: self.decorated_name(decl.name, directives),
                            value,
                        });
                    }
                    let body = self.lower_seq(&stmts[index + 1..], false)?;
                    out.push(Node::LetBinding { items, body });
                    return Ok(out);
                }
                StmtKind::EnumDeclaration(enum_id) if !root => {
                    let def = self.enum_def(*enum_id, stmt.span)?;
                    let items = vec![LetItem {
                        name: self.decorated_name(def.name, &def.directives),
                        value: Some(Node::ObjectLiteral(self.enum_members(def))),
                    }];
                    let body = self.lower_seq(&stmts[index + 1..], false)?;
                    out.push(Node::LetBinding { items, body });
                    return Ok(out);
                }
                StmtKind::VariableDeclaration { directives, decls } => {
                    // File top level: mutate the pre-declared bindings so
                    // they persist across the whole compiled file.
                    for decl in decls {
                        let Some(init) = decl.init else { continue };
                        let value = self.lower_expr(init)?;
                        out.push(Node::Assignment {
                            target: Box::new(Node::Identifier {
                                name: self.decorated_name(decl.name, directives),
                                namespace: Namespace::Variable,
                            }),
                            value: Box::new(value),
                        });
                    }
                }
                StmtKind::EnumDeclaration(enum_id) => {
                    let def = self.enum_def(*enum_id, stmt.span)?;
                    out.push(Node::Enum {
                        name: self.decorated_name(def.name, &def.directives),
                        members: self.enum_members(def),
                    });
                }
                StmtKind::ModuleDeclaration { .. } => {
                    // Ambient declarations register names at build time and
                    // emit nothing.
                }
                _ => {
                    let node = self.lower_stmt(id)?;
                    out.push(node);
                }
            }
        }
        Ok(out)
    }

    fn lower_stmt(&mut self, id: StmtId) -> Result<Node, LowerError> {
        let stmt = self.ir.stmt(id);
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::FunctionDeclaration(func_id) => self.lower_defun(*func_id, span),
            StmtKind::ExprStmt(expr) => self.lower_expr(*expr),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.lower_expr(*condition)?;
                let then_branch = Node::Body(self.lower_seq(then_branch, false)?);
                let else_branch = match else_branch {
                    Some(stmts) => Some(Box::new(Node::Body(self.lower_seq(stmts, false)?))),
                    None => None,
                };
                Ok(Node::If {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch,
                })
            }
            StmtKind::While { condition, body } => {
                let condition = self.lower_expr(*condition)?;
                let body = self.lower_seq(body, false)?;
                Ok(Node::While {
                    condition: Box::new(condition),
                    body,
                })
            }
            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => self.lower_for(*init, *condition, *update, body),
            StmtKind::ForOf {
                binding,
                iterable,
                body,
            } => {
                let sequence = self.lower_expr(*iterable)?;
                let body = self.lower_seq(body, false)?;
                Ok(Node::ForOf {
                    binding: hyphenate(&self.symbol_text(*binding)),
                    sequence: Box::new(sequence),
                    body,
                })
            }
            StmtKind::ForIn { .. } => Err(LowerError::UnsupportedConstruct {
                kind: "for-in statement".to_string(),
                span: self.file_span(span),
            }),
            StmtKind::ReturnStatement { value } => {
                let value = match value {
                    Some(value) => Some(Box::new(self.lower_expr(*value)?)),
                    None => None,
                };
                let Some(frame) = self.frames.last() else {
                    return Err(LowerError::UnboundReturnTarget {
                        span: self.file_span(span),
                    });
                };
                Ok(Node::ReturnStatement {
                    block: frame.block.clone(),
                    value,
                })
            }
            StmtKind::Block { statements } => Ok(Node::Body(self.lower_seq(statements, false)?)),
            StmtKind::NamedImport { module, .. } => Ok(Node::ModuleImport {
                module: feature_name(&self.symbol_text(*module)),
            }),
            StmtKind::NamespaceImport { module, .. } => Ok(Node::NamespaceImport {
                module: feature_name(&self.symbol_text(*module)),
            }),
            StmtKind::VariableDeclaration { .. }
            | StmtKind::EnumDeclaration(_)
            | StmtKind::ModuleDeclaration { .. } => {
                // Handled by lower_seq; reaching here means a builder bug.
                Err(LowerError::SymbolResolutionFailure {
                    name: "declaration outside a statement sequence".to_string(),
                    scope: stmt.scope.0,
                    span: self.file_span(span),
                })
            }
        }
    }

    /// Classic three-clause loop: init bindings wrap a `while` whose body
    /// ends with the update expression
    fn lower_for(
        &mut self,
        init: Option<StmtId>,
        condition: Option<ExprId>,
        update: Option<ExprId>,
        body: &[StmtId],
    ) -> Result<Node, LowerError> {
        let condition = match condition {
            Some(condition) => self.lower_expr(condition)?,
            None => Node::BooleanLit(true),
        };
        let mut body = self.lower_seq(body, false)?;
        if let Some(update) = update {
            body.push(self.lower_expr(update)?);
        }
        let while_node = Node::While {
            condition: Box::new(condition),
            body,
        };

        match init {
            None => Ok(while_node),
            Some(init) => {
                let init_stmt = self.ir.stmt(init);
                match &init_stmt.kind {
                    StmtKind::VariableDeclaration { directives, decls } => {
                        let mut items = Vec::with_capacity(decls.len());
                        for decl in decls {
                            let value = match decl.init {
                                Some(expr) => Some(self.lower_expr(expr)?),
                                None => None,
                            };
                            items.push(LetItem {
                                name: self.decorated_name(decl.name, directives),
                                value,
                            });
                        }
                        Ok(Node::LetBinding {
                            items,
                            body: vec![while_node],
                        })
                    }
                    StmtKind::ExprStmt(expr) => {
                        let init_node = self.lower_expr(*expr)?;
                        Ok(Node::Body(vec![init_node, while_node]))
                    }
                    _ => Err(LowerError::UnsupportedConstruct {
                        kind: "for-loop initializer".to_string(),
                        span: self.file_span(init_stmt.span),
                    }),
                }
            }
        }
    }

    // ---- functions ----

    fn lower_defun(&mut self, id: FunctionId, span: Span) -> Result<Node, LowerError> {
        let func = self.function_def(id, span)?;
        let name = self.decorated_name(
            func.name.unwrap_or(self.ir.module_name),
            &func.directives,
        );

        let (params, named_param) = self.lower_params(func, span)?;
        let block = self.fresh_block();

        self.frames.push(Frame {
            block: block.clone(),
            named_param,
        });
        let body = self.lower_seq(&func.body, false);
        self.frames.pop();
        let body = body?;

        let form = match func.directives.custom_form() {
            Some(form) => self.symbol_text(form),
            None if matches!(params, ParamList::Keyword(_)) => "cl-defun".to_string(),
            None => "defun".to_string(),
        };

        Ok(Node::Defun {
            form,
            name,
            params,
            interactive: func.directives.is_interactive(),
            block,
            body,
        })
    }

    /// Parameter list for a definition; a named-arguments function must have
    /// exactly one parameter whose declared type enumerates fields, which
    /// become keyword parameters
    fn lower_params(
        &self,
        func: &Function,
        span: Span,
    ) -> Result<(ParamList, Option<Symbol>), LowerError> {
        if !func.directives.is_named_arguments() {
            let names = func
                .params
                .iter()
                .map(|param| hyphenate(&self.symbol_text(param.name)))
                .collect();
            return Ok((ParamList::Positional(names), None));
        }

        let [param] = func.params.as_slice() else {
            return Err(LowerError::NamedArgumentsMisuse {
                reason: format!(
                    "function declares {} parameters, expected exactly one",
                    func.params.len()
                ),
                span: self.file_span(span),
            });
        };
        let Some(fields) = param.ty.fields() else {
            return Err(LowerError::NamedArgumentsMisuse {
                reason: "parameter type does not enumerate named fields".to_string(),
                span: self.file_span(span),
            });
        };
        let names = fields
            .iter()
            .map(|field| hyphenate(&self.symbol_text(field.name)))
            .collect();
        Ok((ParamList::Keyword(names), Some(param.name)))
    }

    fn lower_lambda(&mut self, id: FunctionId, span: Span) -> Result<Node, LowerError> {
        let func = self.function_def(id, span)?;
        let params = func
            .params
            .iter()
            .map(|param| hyphenate(&self.symbol_text(param.name)))
            .collect();
        let block = self.fresh_block();

        self.frames.push(Frame {
            block: block.clone(),
            named_param: None,
        });
        let body = self.lower_seq(&func.body, false);
        self.frames.pop();

        Ok(Node::Lambda {
            params,
            block,
            body: body?,
        })
    }

    // ---- expressions ----

    fn lower_expr(&mut self, id: ExprId) -> Result<Node, LowerError> {
        let expr = self.ir.expr(id);
        let span = expr.span;
        let scope = expr.scope;
        match &expr.kind {
            ExprKind::Identifier(name) => Ok(self.lower_identifier(*name, scope)),
            ExprKind::StringLiteral(text) => Ok(Node::StringLit(text.clone())),
            ExprKind::NumberLiteral(value) => Ok(Node::NumberLit(*value)),
            ExprKind::BooleanLiteral(value) => Ok(Node::BooleanLit(*value)),
            ExprKind::Null => Ok(Node::Nil),
            ExprKind::ArrayLiteral { elements } => {
                let elements = elements
                    .iter()
                    .map(|&element| self.lower_expr(element))
                    .collect::<Result<_, _>>()?;
                Ok(Node::ArrayLiteral(elements))
            }
            ExprKind::ObjectLiteral { properties } => {
                let mut lowered = Vec::with_capacity(properties.len());
                for property in properties {
                    lowered.push(Property {
                        name: hyphenate(&self.symbol_text(property.name)),
                        value: self.lower_expr(property.value)?,
                    });
                }
                Ok(Node::ObjectLiteral(lowered))
            }
            ExprKind::ElementAccess { object, index } => {
                let kind = match self.static_ty(*object) {
                    Ty::Map(..) => IndexerKind::Map,
                    Ty::Str => IndexerKind::Str,
                    _ => IndexerKind::Array,
                };
                Ok(Node::Indexer {
                    kind,
                    object: Box::new(self.lower_expr(*object)?),
                    index: Box::new(self.lower_expr(*index)?),
                })
            }
            ExprKind::PropertyAccess { object, property } => {
                // Inside a named-arguments function, projections off the
                // record parameter collapse to its keyword parameters.
                if let Some(frame) = self.frames.last()
                    && let Some(named) = frame.named_param
                    && let ExprKind::Identifier(obj_name) = &self.ir.expr(*object).kind
                    && named == *obj_name
                {
                    return Ok(Node::Identifier {
                        name: hyphenate(&self.symbol_text(*property)),
                        namespace: Namespace::Variable,
                    });
                }
                Ok(Node::PropertyAccess {
                    object: Box::new(self.lower_expr(*object)?),
                    property: hyphenate(&self.symbol_text(*property)),
                })
            }
            ExprKind::Binary { op, lhs, rhs } => self.lower_binary(*op, *lhs, *rhs),
            ExprKind::UnaryPrefix { op, operand } => match op {
                PrefixOp::Not => Ok(Node::UnaryPrefix {
                    op: "not",
                    operand: Box::new(self.lower_expr(*operand)?),
                }),
                PrefixOp::Neg => Ok(Node::UnaryPrefix {
                    op: "-",
                    operand: Box::new(self.lower_expr(*operand)?),
                }),
                PrefixOp::Increment | PrefixOp::Decrement => {
                    // Prefix mutation yields the post-mutation value, which
                    // the assignment form already does.
                    let step = if *op == PrefixOp::Increment { "1+" } else { "1-" };
                    let place = self.lower_expr(*operand)?;
                    let stepped = Node::CallDirect {
                        callee: step.to_string(),
                        args: vec![self.lower_expr(*operand)?],
                    };
                    Ok(Node::Assignment {
                        target: Box::new(place),
                        value: Box::new(stepped),
                    })
                }
            },
            ExprKind::UnaryPostfix { op, operand } => {
                let kind = match op {
                    PostfixOp::Increment => PostfixKind::Increment,
                    PostfixOp::Decrement => PostfixKind::Decrement,
                };
                let temp = self.fresh_temp();
                Ok(Node::UnaryPostfix {
                    place: Box::new(self.lower_expr(*operand)?),
                    kind,
                    temp,
                })
            }
            ExprKind::DeleteExpression { target } => self.lower_delete(*target, span),
            ExprKind::CallExpression { callee, args } => self.lower_call(*callee, args, span),
            ExprKind::Lambda(func_id) => self.lower_lambda(*func_id, span),
            ExprKind::Assignment { op, target, value } => {
                let lowered_value = match op {
                    AssignOp::Assign => self.lower_expr(*value)?,
                    AssignOp::AddAssign => self.lower_add(*target, *value)?,
                    AssignOp::SubAssign => self.compound(*target, *value, "-")?,
                    AssignOp::MulAssign => self.compound(*target, *value, "*")?,
                    AssignOp::DivAssign => self.compound(*target, *value, "/")?,
                };
                Ok(Node::Assignment {
                    target: Box::new(self.lower_expr(*target)?),
                    value: Box::new(lowered_value),
                })
            }
        }
    }

    fn lower_identifier(&self, name: Symbol, scope: ScopeId) -> Node {
        let binding = self.scopes.lookup(scope, name);
        let namespace = match binding {
            Some(binding) if binding.kind == SymbolKind::Function => Namespace::Function,
            _ => Namespace::Variable,
        };
        Node::Identifier {
            name: self.reference_name(name, binding),
            namespace,
        }
    }

    fn lower_binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<Node, LowerError> {
        let text = match op {
            BinOp::Add => return self.lower_add(lhs, rhs),
            BinOp::Ne => {
                let equal = Node::BinaryExpression {
                    op: "equal",
                    lhs: Box::new(self.lower_expr(lhs)?),
                    rhs: Box::new(self.lower_expr(rhs)?),
                };
                return Ok(Node::UnaryPrefix {
                    op: "not",
                    operand: Box::new(equal),
                });
            }
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "mod",
            BinOp::Eq => "equal",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        Ok(Node::BinaryExpression {
            op: text,
            lhs: Box::new(self.lower_expr(lhs)?),
            rhs: Box::new(self.lower_expr(rhs)?),
        })
    }

    /// `+` is numeric-only in the target dialect; unless both operands are
    /// statically numbers, the runtime coercion helper takes over
    fn lower_add(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Node, LowerError> {
        let numeric = self.static_ty(lhs).is_numeric() && self.static_ty(rhs).is_numeric();
        let lhs = self.lower_expr(lhs)?;
        let rhs = self.lower_expr(rhs)?;
        if numeric {
            Ok(Node::BinaryExpression {
                op: "+",
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        } else {
            Ok(Node::CallDirect {
                callee: RUNTIME_ADD.to_string(),
                args: vec![lhs, rhs],
            })
        }
    }

    fn compound(
        &mut self,
        target: ExprId,
        value: ExprId,
        op: &'static str,
    ) -> Result<Node, LowerError> {
        Ok(Node::BinaryExpression {
            op,
            lhs: Box::new(self.lower_expr(target)?),
            rhs: Box::new(self.lower_expr(value)?),
        })
    }

    fn lower_delete(&mut self, target: ExprId, span: Span) -> Result<Node, LowerError> {
        let target_expr = self.ir.expr(target);
        match &target_expr.kind {
            ExprKind::ElementAccess { object, index }
                if matches!(self.static_ty(*object), Ty::Map(..)) =>
            {
                Ok(Node::CallDirect {
                    callee: "remhash".to_string(),
                    args: vec![self.lower_expr(*index)?, self.lower_expr(*object)?],
                })
            }
            ExprKind::PropertyAccess { object, property }
                if matches!(self.ir.expr(*object).kind, ExprKind::Identifier(_)) =>
            {
                let place = self.lower_expr(*object)?;
                let removed = Node::CallDirect {
                    callee: "assq-delete-all".to_string(),
                    args: vec![
                        Node::SymbolLit(hyphenate(&self.symbol_text(*property))),
                        place.clone(),
                    ],
                };
                Ok(Node::Assignment {
                    target: Box::new(place),
                    value: Box::new(removed),
                })
            }
            _ => Err(LowerError::UnsupportedConstruct {
                kind: "delete of this operand".to_string(),
                span: self.file_span(span),
            }),
        }
    }

    /// Call resolution: a name classified `Function` is invoked in head
    /// position (or with keyword arguments when it declares the
    /// named-arguments convention); everything else — variables, arguments,
    /// imported names, unresolved names — is a value holding a callable and
    /// goes through the explicit indirect-invocation form.
    fn lower_call(
        &mut self,
        callee: ExprId,
        args: &[ExprId],
        span: Span,
    ) -> Result<Node, LowerError> {
        let callee_expr = self.ir.expr(callee);
        if let ExprKind::Identifier(name) = &callee_expr.kind {
            let name = *name;
            let binding = self.scopes.lookup(callee_expr.scope, name).cloned();
            if let Some(binding) = binding
                && binding.kind == SymbolKind::Function
                && let DefId::Function(func_id) = binding.def
            {
                let func = self.function_def(func_id, span)?;
                let callee_name = self.decorated_name(name, &func.directives);
                if func.directives.is_named_arguments() {
                    return self.lower_named_call(func_id, callee_name, args, span);
                }
                let args = args
                    .iter()
                    .map(|&arg| self.lower_expr(arg))
                    .collect::<Result<_, _>>()?;
                return Ok(Node::CallDirect {
                    callee: callee_name,
                    args,
                });
            }
        }

        let callee = self.lower_expr(callee)?;
        let args = args
            .iter()
            .map(|&arg| self.lower_expr(arg))
            .collect::<Result<_, _>>()?;
        Ok(Node::CallIndirect {
            callee: Box::new(callee),
            args,
        })
    }

    /// Named-argument call: bind the single argument once into a fresh
    /// temporary, then pass every declared field as a keyword argument
    /// projecting off the temporary
    fn lower_named_call(
        &mut self,
        func_id: FunctionId,
        callee_name: String,
        args: &[ExprId],
        span: Span,
    ) -> Result<Node, LowerError> {
        let func = self.function_def(func_id, span)?;
        let [arg] = args else {
            return Err(LowerError::NamedArgumentsMisuse {
                reason: format!("call passes {} arguments, expected exactly one", args.len()),
                span: self.file_span(span),
            });
        };
        let [param] = func.params.as_slice() else {
            return Err(LowerError::NamedArgumentsMisuse {
                reason: format!(
                    "function declares {} parameters, expected exactly one",
                    func.params.len()
                ),
                span: self.file_span(span),
            });
        };
        let Some(fields) = param.ty.fields() else {
            return Err(LowerError::NamedArgumentsMisuse {
                reason: "parameter type does not enumerate named fields".to_string(),
                span: self.file_span(span),
            });
        };

        let field_names: Vec<String> = fields
            .iter()
            .map(|field| hyphenate(&self.symbol_text(field.name)))
            .collect();
        let temp = self.fresh_temp();
        let argument = self.lower_expr(*arg)?;

        let keyword_args = field_names
            .into_iter()
            .map(|field| {
                let projection = Node::PropertyAccess {
                    object: Box::new(Node::Identifier {
                        name: temp.clone(),
                        namespace: Namespace::Variable,
                    }),
                    property: field.clone(),
                };
                (field, projection)
            })
            .collect();

        Ok(Node::LetBinding {
            items: vec![LetItem {
                name: temp,
                value: Some(argument),
            }],
            body: vec![Node::CallNamed {
                callee: callee_name,
                fields: keyword_args,
            }],
        })
    }

    // ---- static types ----

    /// Shallow static type of an expression, driving the `+` coercion rule
    /// and indexer selection
    fn static_ty(&self, id: ExprId) -> Ty {
        let expr = self.ir.expr(id);
        match &expr.kind {
            ExprKind::NumberLiteral(_) => Ty::Number,
            ExprKind::StringLiteral(_) => Ty::Str,
            ExprKind::BooleanLiteral(_) => Ty::Boolean,
            ExprKind::Null => Ty::Null,
            ExprKind::ArrayLiteral { .. } => Ty::Array(Box::new(Ty::Unknown)),
            ExprKind::ObjectLiteral { .. } => Ty::Object(Vec::new()),
            ExprKind::Lambda(_) => Ty::Function,
            ExprKind::Identifier(name) => self
                .scopes
                .lookup(expr.scope, *name)
                .map_or(Ty::Unknown, |binding| binding.ty.clone()),
            ExprKind::PropertyAccess { object, property } => match self.static_ty(*object) {
                Ty::Object(fields) => fields
                    .iter()
                    .find(|field| field.name == *property)
                    .map_or(Ty::Unknown, |field| field.ty.clone()),
                _ => Ty::Unknown,
            },
            ExprKind::ElementAccess { object, .. } => match self.static_ty(*object) {
                Ty::Array(element) => *element,
                Ty::Map(_, value) => *value,
                Ty::Str => Ty::Str,
                _ => Ty::Unknown,
            },
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinOp::Add => {
                    let (lhs, rhs) = (self.static_ty(*lhs), self.static_ty(*rhs));
                    if lhs.is_numeric() && rhs.is_numeric() {
                        Ty::Number
                    } else if lhs == Ty::Str || rhs == Ty::Str {
                        Ty::Str
                    } else {
                        Ty::Unknown
                    }
                }
                BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => Ty::Number,
                BinOp::Eq
                | BinOp::Ne
                | BinOp::Lt
                | BinOp::Le
                | BinOp::Gt
                | BinOp::Ge
                | BinOp::And
                | BinOp::Or => Ty::Boolean,
            },
            ExprKind::UnaryPrefix { op, .. } => match op {
                PrefixOp::Not => Ty::Boolean,
                PrefixOp::Neg | PrefixOp::Increment | PrefixOp::Decrement => Ty::Number,
            },
            ExprKind::UnaryPostfix { .. } => Ty::Number,
            ExprKind::Assignment { value, .. } => self.static_ty(*value),
            ExprKind::DeleteExpression { .. } | ExprKind::CallExpression { .. } => Ty::Unknown,
        }
    }

    // ---- top-level bindings ----

    /// Names of top-level bindings, emitted as a `defvar` preamble so the
    /// later `setq` mutations have a binding to hit
    fn collect_defvars(&self) -> Result<Vec<String>, LowerError> {
        let mut names = Vec::new();
        for &id in &self.ir.statements {
            let stmt = self.ir.stmt(id);
            match &stmt.kind {
                StmtKind::VariableDeclaration { directives, decls } => {
                    for decl in decls {
                        names.push(self.decorated_name(decl.name, directives));
                    }
                }
                StmtKind::EnumDeclaration(enum_id) => {
                    let def = self.enum_def(*enum_id, stmt.span)?;
                    names.push(self.decorated_name(def.name, &def.directives));
                }
                _ => {}
            }
        }
        Ok(names)
    }

    fn enum_members(&self, def: &EnumDef) -> Vec<Property> {
        def.members
            .iter()
            .map(|member| {
                let value = match &member.value {
                    Some(MemberValue::Number(value)) => Node::NumberLit(*value),
                    Some(MemberValue::Str(text)) => Node::StringLit(text.clone()),
                    // An initializer-less member stands for its own name
                    None => Node::StringLit(self.symbol_text(member.name)),
                };
                Property {
                    name: hyphenate(&self.symbol_text(member.name)),
                    value,
                }
            })
            .collect()
    }
}

/// Feature name for a module specifier: last path segment, extension
/// stripped, hyphenated
fn feature_name(specifier: &str) -> String {
    let segment = specifier
        .rsplit('/')
        .next()
        .unwrap_or(specifier);
    let stem = match segment.split_once('.') {
        Some(("", _)) | None => segment,
        Some((stem, _)) => stem,
    };
    hyphenate(stem)
}
