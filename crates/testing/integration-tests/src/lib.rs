//! Test infrastructure for end-to-end pipeline tests
//!
//! [`ProgramBuilder`] assembles concrete-syntax programs the way a host
//! frontend would hand them to the compiler, and runs them through the
//! Build → Lower → Emit pipeline.

use sk_driver::{CompileError, CompiledUnit};
use sk_elisp::SourceFile as ElispFile;
use sk_intern::Interner;
use sk_span::{FileId, Span};
use sk_syntax::{
    AssignOp, BinaryOp, CstBuilder, CstId, CstKind, DeclKeyword, EnumMemberCst, FieldAnn,
    FunctionDecl, Param, PostfixOp, PrefixOp, SourceUnit, TypeAnn, VarDeclarator,
};

/// Builds one concrete-syntax compilation unit for tests
pub struct ProgramBuilder {
    cst: CstBuilder,
    interner: Interner,
    statements: Vec<CstId>,
}

impl ProgramBuilder {
    /// Fresh builder for one unit
    pub fn new() -> Self {
        Self::with_interner(Interner::new(), FileId(0))
    }

    /// Builder sharing an interner with sibling units
    pub fn with_interner(interner: Interner, file: FileId) -> Self {
        Self {
            cst: CstBuilder::new(interner.clone(), file),
            interner,
            statements: Vec::new(),
        }
    }

    /// Append a top-level statement
    pub fn add(&mut self, stmt: CstId) {
        self.statements.push(stmt);
    }

    // ---- expressions ----

    /// Identifier expression
    pub fn ident(&mut self, name: &str) -> CstId {
        self.cst.ident(name)
    }

    /// Number literal
    pub fn number(&mut self, value: f64) -> CstId {
        self.cst.number(value)
    }

    /// String literal
    pub fn string(&mut self, text: &str) -> CstId {
        self.cst.string(text)
    }

    /// Binary expression
    pub fn binary(&mut self, op: BinaryOp, lhs: CstId, rhs: CstId) -> CstId {
        self.cst
            .alloc(CstKind::Binary { op, lhs, rhs }, Span::default())
    }

    /// Call expression
    pub fn call(&mut self, callee: CstId, args: Vec<CstId>) -> CstId {
        self.cst
            .alloc(CstKind::Call { callee, args }, Span::default())
    }

    /// Call of a named callee
    pub fn call_name(&mut self, name: &str, args: Vec<CstId>) -> CstId {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    /// Object literal
    pub fn object(&mut self, properties: &[(&str, CstId)]) -> CstId {
        let properties = properties
            .iter()
            .map(|(name, value)| (self.cst.intern(name), *value))
            .collect();
        self.cst
            .alloc(CstKind::ObjectLit { properties }, Span::default())
    }

    /// Prefix `++`
    pub fn prefix_increment(&mut self, operand: CstId) -> CstId {
        self.cst.alloc(
            CstKind::UnaryPrefix {
                op: PrefixOp::Increment,
                operand,
            },
            Span::default(),
        )
    }

    /// Postfix `++`
    pub fn postfix_increment(&mut self, operand: CstId) -> CstId {
        self.cst.alloc(
            CstKind::UnaryPostfix {
                op: PostfixOp::Increment,
                operand,
            },
            Span::default(),
        )
    }

    /// `obj.prop`
    pub fn property(&mut self, object: CstId, name: &str) -> CstId {
        let property = self.cst.intern(name);
        self.cst
            .alloc(CstKind::PropertyAccess { object, property }, Span::default())
    }

    /// Plain `=` assignment expression
    pub fn assign(&mut self, target: CstId, value: CstId) -> CstId {
        self.cst.alloc(
            CstKind::Assign {
                op: AssignOp::Assign,
                target,
                value,
            },
            Span::default(),
        )
    }

    /// Object-shape type annotation
    pub fn object_ty(&self, fields: &[(&str, TypeAnn)]) -> TypeAnn {
        TypeAnn::Object(
            fields
                .iter()
                .map(|(name, ty)| FieldAnn {
                    name: self.cst.intern(name),
                    ty: ty.clone(),
                })
                .collect(),
        )
    }

    /// Arrow function over statement body
    pub fn arrow(&mut self, params: &[&str], body: Vec<CstId>) -> CstId {
        let params = params
            .iter()
            .map(|name| Param {
                name: self.cst.intern(name),
                ty: None,
            })
            .collect();
        self.cst.alloc(CstKind::Arrow { params, body }, Span::default())
    }

    // ---- statements ----

    /// Expression statement
    pub fn expr_stmt(&mut self, expr: CstId) -> CstId {
        self.cst.expr_stmt(expr)
    }

    /// `return` statement
    pub fn ret(&mut self, value: Option<CstId>) -> CstId {
        self.cst.alloc(CstKind::Return { value }, Span::default())
    }

    /// Single-declarator `const`
    pub fn const_decl(&mut self, name: &str, ty: Option<TypeAnn>, init: Option<CstId>) -> CstId {
        let name = self.cst.intern(name);
        self.cst.alloc(
            CstKind::VariableList {
                keyword: DeclKeyword::Const,
                directives: Vec::new(),
                decls: vec![VarDeclarator { name, ty, init }],
            },
            Span::default(),
        )
    }

    /// Function declaration with typed parameters and raw directive texts
    pub fn function(
        &mut self,
        name: &str,
        directives: &[&str],
        params: &[(&str, Option<TypeAnn>)],
        body: Vec<CstId>,
    ) -> CstId {
        let decl = FunctionDecl {
            name: self.cst.intern(name),
            directives: directives.iter().map(ToString::to_string).collect(),
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: self.cst.intern(name),
                    ty: ty.clone(),
                })
                .collect(),
            return_ty: None,
            body,
        };
        self.cst.alloc(CstKind::Function(decl), Span::default())
    }

    /// Enum declaration
    pub fn enum_decl(&mut self, name: &str, members: &[(&str, Option<CstId>)]) -> CstId {
        let name = self.cst.intern(name);
        let members = members
            .iter()
            .map(|(member, init)| EnumMemberCst {
                name: self.cst.intern(member),
                init: *init,
            })
            .collect();
        self.cst.alloc(
            CstKind::Enum {
                name,
                directives: Vec::new(),
                members,
            },
            Span::default(),
        )
    }

    /// Named import
    pub fn named_import(&mut self, names: &[&str], module: &str) -> CstId {
        let names = names.iter().map(|name| self.cst.intern(name)).collect();
        let module = self.cst.intern(module);
        self.cst
            .alloc(CstKind::NamedImport { names, module }, Span::default())
    }

    /// Namespace import
    pub fn namespace_import(&mut self, alias: &str, module: &str) -> CstId {
        let alias = self.cst.intern(alias);
        let module = self.cst.intern(module);
        self.cst
            .alloc(CstKind::NamespaceImport { alias, module }, Span::default())
    }

    /// Ambient `declare module` block
    pub fn ambient_module(&mut self, name: &str, body: Vec<CstId>) -> CstId {
        let name = self.cst.intern(name);
        self.cst
            .alloc(CstKind::ModuleDecl { name, body }, Span::default())
    }

    /// Classic three-clause `for` loop
    pub fn for_loop(
        &mut self,
        init: Option<CstId>,
        condition: Option<CstId>,
        update: Option<CstId>,
        body: Vec<CstId>,
    ) -> CstId {
        self.cst.alloc(
            CstKind::For {
                init,
                condition,
                update,
                body,
            },
            Span::default(),
        )
    }

    /// `for … of` loop
    pub fn for_of(&mut self, binding: &str, iterable: CstId, body: Vec<CstId>) -> CstId {
        let binding = self.cst.intern(binding);
        self.cst.alloc(
            CstKind::ForOf {
                binding,
                iterable,
                body,
            },
            Span::default(),
        )
    }

    /// `if` statement
    pub fn if_stmt(
        &mut self,
        condition: CstId,
        then_branch: Vec<CstId>,
        else_branch: Option<Vec<CstId>>,
    ) -> CstId {
        self.cst.alloc(
            CstKind::If {
                condition,
                then_branch,
                else_branch,
            },
            Span::default(),
        )
    }

    /// `for … in` statement (unsupported by the compiler; used to test the
    /// error path)
    pub fn for_in(&mut self, binding: &str, object: CstId, body: Vec<CstId>) -> CstId {
        let binding = self.cst.intern(binding);
        self.cst.alloc(
            CstKind::ForIn {
                binding,
                object,
                body,
            },
            Span::default(),
        )
    }

    // ---- pipeline ----

    /// Finish the unit without compiling it
    pub fn finish(self, module: &str) -> (SourceUnit, Interner) {
        let unit = self.cst.finish(module, self.statements);
        (unit, self.interner)
    }

    /// Run Build → Lower, returning the target AST
    ///
    /// # Errors
    ///
    /// Propagates any per-unit [`CompileError`].
    pub fn lower(self, module: &str) -> Result<ElispFile, CompileError> {
        let (unit, interner) = self.finish(module);
        let built = sk_driver::build(&unit, &interner)?;
        sk_driver::lower(&built, &interner)
    }

    /// Run the full pipeline, returning the compiled unit
    ///
    /// # Errors
    ///
    /// Propagates any per-unit [`CompileError`].
    pub fn compile(self, module: &str) -> Result<CompiledUnit, CompileError> {
        let (unit, interner) = self.finish(module);
        sk_driver::compile_unit(&unit, &interner)
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// All non-local-return block names appearing in emitted text, in order
pub fn block_names(text: &str) -> Vec<String> {
    text.match_indices("(cl-block ")
        .map(|(start, marker)| {
            let rest = &text[start + marker.len()..];
            rest.chars()
                .take_while(|character| {
                    !character.is_whitespace() && *character != ')' && *character != '('
                })
                .collect()
        })
        .collect()
}

/// How many times `needle` occurs in `haystack`
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.match_indices(needle).count()
}
