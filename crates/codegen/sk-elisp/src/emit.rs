//! Text emission
//!
//! Expressions render on one line; scope-bearing statement forms (function
//! definitions, `let*`, `progn`, conditionals, loops) render across lines at
//! a given indentation. Quoted data positions use [`Node::quoted_inline`],
//! which keeps compile-time literals as literal data and marks everything
//! else for evaluation with an unquote.

use crate::ast::{IndexerKind, LetItem, Namespace, Node, ParamList, PostfixKind, SourceFile};
use crate::{FILE_HEADER, RUNTIME_REQUIRE};
use std::fmt::Write as _;

impl SourceFile {
    /// Render the whole file, header and `provide` trailer included
    pub fn emit(&self) -> String {
        let mut out = String::new();
        out.push_str(FILE_HEADER);
        out.push_str("\n\n");
        let _ = writeln!(out, "(require '{RUNTIME_REQUIRE})");

        if !self.defvars.is_empty() {
            out.push('\n');
            for name in &self.defvars {
                let _ = writeln!(out, "(defvar {name} nil)");
            }
        }

        for form in &self.forms {
            out.push('\n');
            form.emit(&mut out, 0);
            out.push('\n');
        }

        out.push('\n');
        let _ = writeln!(out, "(provide '{})", self.feature);
        out
    }
}

impl Node {
    /// Render at `indent`, appending to `out`
    ///
    /// The first line carries no indentation (the caller has already placed
    /// it); continuation lines are indented relative to `indent`.
    pub fn emit(&self, out: &mut String, indent: usize) {
        match self {
            Self::Defun {
                form,
                name,
                params,
                interactive,
                block,
                body,
            } => {
                let _ = write!(out, "({form} {name} {}", params_text(params));
                if *interactive {
                    let _ = write!(out, "\n{}(interactive)", pad(indent + 2));
                }
                let _ = write!(out, "\n{}(cl-block {block}", pad(indent + 2));
                emit_body_lines(out, body, indent + 4);
                out.push_str("))");
            }
            Self::LetBinding { items, body } => {
                out.push_str("(let* (");
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        let _ = write!(out, "\n{}", pad(indent + 7));
                    }
                    out.push_str(&item.inline());
                }
                out.push(')');
                emit_body_lines(out, body, indent + 2);
                out.push(')');
            }
            Self::Body(statements) => match statements.as_slice() {
                [] => out.push_str("nil"),
                [single] => single.emit(out, indent),
                many => {
                    out.push_str("(progn");
                    emit_body_lines(out, many, indent + 2);
                    out.push(')');
                }
            },
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let _ = write!(out, "(if {}\n{}", condition.inline(), pad(indent + 4));
                then_branch.emit(out, indent + 4);
                if let Some(else_branch) = else_branch {
                    let _ = write!(out, "\n{}", pad(indent + 2));
                    else_branch.emit(out, indent + 2);
                }
                out.push(')');
            }
            Self::While { condition, body } => {
                let _ = write!(out, "(while {}", condition.inline());
                emit_body_lines(out, body, indent + 2);
                out.push(')');
            }
            Self::ForOf {
                binding,
                sequence,
                body,
            } => {
                let _ = write!(out, "(dolist ({binding} {})", sequence.inline());
                emit_body_lines(out, body, indent + 2);
                out.push(')');
            }
            other => out.push_str(&other.inline()),
        }
    }

    /// Single-line plain rendering
    pub fn inline(&self) -> String {
        match self {
            Self::Identifier { name, namespace } => match namespace {
                Namespace::Function => format!("#'{name}"),
                Namespace::Variable => name.clone(),
            },
            Self::StringLit(text) => format!("\"{}\"", escape_string(text)),
            Self::SymbolLit(name) => format!("'{name}"),
            Self::NumberLit(value) => number_text(*value),
            Self::BooleanLit(true) => "t".to_string(),
            Self::BooleanLit(false) | Self::Nil => "nil".to_string(),
            Self::ArrayLiteral(_) | Self::ObjectLiteral(_) => {
                let mark = if self.is_literal_tree() { "'" } else { "`" };
                format!("{mark}{}", self.quoted_inline())
            }
            Self::Indexer {
                kind,
                object,
                index,
            } => match kind {
                IndexerKind::Array => format!("(elt {} {})", object.inline(), index.inline()),
                IndexerKind::Str => format!("(aref {} {})", object.inline(), index.inline()),
                IndexerKind::Map => format!("(gethash {} {})", index.inline(), object.inline()),
            },
            Self::PropertyAccess { object, property } => {
                format!("(alist-get '{property} {})", object.inline())
            }
            Self::Assignment { target, value } => place_mutation(target, &value.inline()),
            Self::BinaryExpression { op, lhs, rhs } => {
                format!("({op} {} {})", lhs.inline(), rhs.inline())
            }
            Self::UnaryPrefix { op, operand } => format!("({op} {})", operand.inline()),
            Self::UnaryPostfix { place, kind, temp } => {
                let step = match kind {
                    PostfixKind::Increment => "1+",
                    PostfixKind::Decrement => "1-",
                };
                let mutation = place_mutation(place, &format!("({step} {})", place.inline()));
                format!("(let* (({temp} {})) {mutation} {temp})", place.inline())
            }
            Self::CallDirect { callee, args } => call_text(callee, args),
            Self::CallIndirect { callee, args } => {
                let mut text = format!("(funcall {}", callee.inline());
                for arg in args {
                    text.push(' ');
                    text.push_str(&arg.inline());
                }
                text.push(')');
                text
            }
            Self::CallNamed { callee, fields } => {
                let mut text = format!("({callee}");
                for (field, value) in fields {
                    let _ = write!(text, " :{field} {}", value.inline());
                }
                text.push(')');
                text
            }
            Self::Defun {
                form,
                name,
                params,
                interactive,
                block,
                body,
            } => {
                let mut text = format!("({form} {name} {}", params_text(params));
                if *interactive {
                    text.push_str(" (interactive)");
                }
                let _ = write!(text, " (cl-block {block}");
                for statement in body {
                    text.push(' ');
                    text.push_str(&statement.inline());
                }
                text.push_str("))");
                text
            }
            Self::Lambda {
                params,
                block,
                body,
            } => {
                let mut text = format!("(lambda ({})", params.join(" "));
                let _ = write!(text, " (cl-block {block}");
                for statement in body {
                    text.push(' ');
                    text.push_str(&statement.inline());
                }
                text.push_str("))");
                text
            }
            Self::LetBinding { items, body } => {
                let items_text: Vec<String> = items.iter().map(LetItem::inline).collect();
                let mut text = format!("(let* ({})", items_text.join(" "));
                for statement in body {
                    text.push(' ');
                    text.push_str(&statement.inline());
                }
                text.push(')');
                text
            }
            Self::Body(statements) => match statements.as_slice() {
                [] => "nil".to_string(),
                [single] => single.inline(),
                many => {
                    let parts: Vec<String> = many.iter().map(Node::inline).collect();
                    format!("(progn {})", parts.join(" "))
                }
            },
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    condition.inline(),
                    then_branch.inline(),
                    else_branch.inline()
                ),
                None => format!("(if {} {})", condition.inline(), then_branch.inline()),
            },
            Self::ForOf {
                binding,
                sequence,
                body,
            } => {
                let mut text = format!("(dolist ({binding} {})", sequence.inline());
                for statement in body {
                    text.push(' ');
                    text.push_str(&statement.inline());
                }
                text.push(')');
                text
            }
            Self::While { condition, body } => {
                let mut text = format!("(while {}", condition.inline());
                for statement in body {
                    text.push(' ');
                    text.push_str(&statement.inline());
                }
                text.push(')');
                text
            }
            Self::ReturnStatement { block, value } => match value {
                Some(value) => format!("(cl-return-from {block} {})", value.inline()),
                None => format!("(cl-return-from {block})"),
            },
            Self::Enum { name, members } => {
                let pairs: Vec<String> = members
                    .iter()
                    .map(|member| format!("({} . {})", member.name, member.value.quoted_inline()))
                    .collect();
                format!("(setq {name} '({}))", pairs.join(" "))
            }
            Self::ModuleImport { module } | Self::NamespaceImport { module } => {
                format!("(require '{module})")
            }
        }
    }

    /// Single-line quoted rendering, for positions inside quoted data
    ///
    /// Defaults to the plain rendering; containers drop their own quote mark
    /// (the enclosing quote already covers them), and anything that is not a
    /// compile-time literal renders unquoted so it evaluates when the
    /// surrounding structure is instantiated.
    pub fn quoted_inline(&self) -> String {
        match self {
            Self::StringLit(_) | Self::NumberLit(_) | Self::BooleanLit(_) | Self::Nil => {
                self.inline()
            }
            // Already under the enclosing quote
            Self::SymbolLit(name) => name.clone(),
            Self::ArrayLiteral(elements) => {
                let parts: Vec<String> = elements.iter().map(Node::quoted_inline).collect();
                format!("({})", parts.join(" "))
            }
            Self::ObjectLiteral(properties) => {
                let parts: Vec<String> = properties
                    .iter()
                    .map(|property| {
                        format!("({} . {})", property.name, property.value.quoted_inline())
                    })
                    .collect();
                format!("({})", parts.join(" "))
            }
            other => format!(",{}", other.inline()),
        }
    }

    /// Whether this tree is compile-time literal data throughout
    pub fn is_literal_tree(&self) -> bool {
        match self {
            Self::StringLit(_)
            | Self::SymbolLit(_)
            | Self::NumberLit(_)
            | Self::BooleanLit(_)
            | Self::Nil => true,
            Self::ArrayLiteral(elements) => elements.iter().all(Node::is_literal_tree),
            Self::ObjectLiteral(properties) => properties
                .iter()
                .all(|property| property.value.is_literal_tree()),
            _ => false,
        }
    }
}

impl LetItem {
    fn inline(&self) -> String {
        match &self.value {
            Some(value) => format!("({} {})", self.name, value.inline()),
            None => self.name.clone(),
        }
    }
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

/// Append `statements` one per line at `indent` (no-op when empty)
fn emit_body_lines(out: &mut String, statements: &[Node], indent: usize) {
    for statement in statements {
        let _ = write!(out, "\n{}", pad(indent));
        statement.emit(out, indent);
    }
}

fn params_text(params: &ParamList) -> String {
    match params {
        ParamList::Positional(names) => format!("({})", names.join(" ")),
        ParamList::Keyword(names) => format!("(&key {})", names.join(" ")),
    }
}

fn call_text(callee: &str, args: &[Node]) -> String {
    let mut text = format!("({callee}");
    for arg in args {
        text.push(' ');
        text.push_str(&arg.inline());
    }
    text.push(')');
    text
}

/// Render a mutation of `target` to `value_text`, picking the target
/// dialect's place-appropriate form
fn place_mutation(target: &Node, value_text: &str) -> String {
    match target {
        Node::Identifier { name, .. } => format!("(setq {name} {value_text})"),
        Node::Indexer {
            kind: IndexerKind::Map,
            object,
            index,
        } => format!(
            "(puthash {} {value_text} {})",
            index.inline(),
            object.inline()
        ),
        other => format!("(setf {} {value_text})", other.inline()),
    }
}

fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Integral values print without a trailing `.0`
fn number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Property;

    fn var(name: &str) -> Node {
        Node::Identifier {
            name: name.to_string(),
            namespace: Namespace::Variable,
        }
    }

    #[test]
    fn test_literal_array_uses_plain_quote() {
        let array = Node::ArrayLiteral(vec![
            Node::NumberLit(1.0),
            Node::NumberLit(2.0),
            Node::NumberLit(3.0),
        ]);
        assert_eq!(array.inline(), "'(1 2 3)");
    }

    #[test]
    fn test_non_literal_element_is_unquoted() {
        let array = Node::ArrayLiteral(vec![Node::NumberLit(1.0), var("x")]);
        assert_eq!(array.inline(), "`(1 ,x)");
    }

    #[test]
    fn test_nested_object_shares_outer_quote() {
        let object = Node::ObjectLiteral(vec![Property {
            name: "point".to_string(),
            value: Node::ArrayLiteral(vec![var("x"), Node::NumberLit(0.0)]),
        }]);
        assert_eq!(object.inline(), "`((point . (,x 0)))");
    }

    #[test]
    fn test_call_inside_literal_evaluates() {
        let object = Node::ObjectLiteral(vec![Property {
            name: "size".to_string(),
            value: Node::CallDirect {
                callee: "compute-size".to_string(),
                args: vec![],
            },
        }]);
        assert_eq!(object.inline(), "`((size . ,(compute-size)))");
    }

    #[test]
    fn test_function_namespace_reference() {
        let reference = Node::Identifier {
            name: "do-thing".to_string(),
            namespace: Namespace::Function,
        };
        assert_eq!(reference.inline(), "#'do-thing");
    }

    #[test]
    fn test_body_wraps_only_multiple_statements() {
        let single = Node::Body(vec![var("x")]);
        assert_eq!(single.inline(), "x");

        let double = Node::Body(vec![var("x"), var("y")]);
        assert_eq!(double.inline(), "(progn x y)");
    }

    #[test]
    fn test_defun_renders_block_and_params() {
        let defun = Node::Defun {
            form: "defun".to_string(),
            name: "add-pair".to_string(),
            params: ParamList::Positional(vec!["a".to_string(), "b".to_string()]),
            interactive: false,
            block: "blk-0".to_string(),
            body: vec![Node::ReturnStatement {
                block: "blk-0".to_string(),
                value: Some(Box::new(Node::BinaryExpression {
                    op: "+",
                    lhs: Box::new(var("a")),
                    rhs: Box::new(var("b")),
                })),
            }],
        };
        let mut out = String::new();
        defun.emit(&mut out, 0);
        assert_eq!(
            out,
            "(defun add-pair (a b)\n  (cl-block blk-0\n    (cl-return-from blk-0 (+ a b))))"
        );
    }

    #[test]
    fn test_postfix_yields_previous_value() {
        let postfix = Node::UnaryPostfix {
            place: Box::new(var("x")),
            kind: PostfixKind::Increment,
            temp: "shrike--tmp-0".to_string(),
        };
        assert_eq!(
            postfix.inline(),
            "(let* ((shrike--tmp-0 x)) (setq x (1+ x)) shrike--tmp-0)"
        );
    }

    #[test]
    fn test_map_assignment_uses_puthash() {
        let assignment = Node::Assignment {
            target: Box::new(Node::Indexer {
                kind: IndexerKind::Map,
                object: Box::new(var("table")),
                index: Box::new(Node::StringLit("k".to_string())),
            }),
            value: Box::new(Node::NumberLit(1.0)),
        };
        assert_eq!(assignment.inline(), "(puthash \"k\" 1 table)");
    }

    #[test]
    fn test_string_escaping() {
        let text = Node::StringLit("say \"hi\"\n".to_string());
        assert_eq!(text.inline(), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_source_file_layout() {
        let file = SourceFile {
            feature: "main".to_string(),
            defvars: vec!["counter".to_string()],
            forms: vec![Node::Assignment {
                target: Box::new(var("counter")),
                value: Box::new(Node::NumberLit(0.0)),
            }],
        };
        let text = file.emit();
        assert!(text.starts_with(";;; -*- lexical-binding: t -*-\n"));
        assert!(text.contains("(require 'cl-lib)"));
        assert!(text.contains("(defvar counter nil)"));
        assert!(text.contains("(setq counter 0)"));
        assert!(text.ends_with("(provide 'main)\n"));
    }
}
