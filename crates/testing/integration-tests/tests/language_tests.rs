//! Feature-level tests: directives, quoting, enums, imports, loops

use integration_tests::ProgramBuilder;
use sk_driver::CompileError;
use sk_ir_build::BuildError;
use sk_syntax::{BinaryOp, TypeAnn};

#[test]
fn test_identifier_hyphenation() {
    // function makeArgList() {}  …called from run()
    let mut program = ProgramBuilder::new();
    let make = program.function("makeArgList", &[], &[], vec![]);
    program.add(make);
    let call = program.call_name("makeArgList", vec![]);
    let call_stmt = program.expr_stmt(call);
    let run = program.function("run", &[], &[], vec![call_stmt]);
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(defun make-arg-list ()"), "{text}");
    assert!(text.contains("(make-arg-list)"), "{text}");
}

#[test]
fn test_rename_directive_overrides_hyphenation() {
    let mut program = ProgramBuilder::new();
    let func = program.function("doRunThing", &["[Name: shrike-go]"], &[], vec![]);
    program.add(func);
    let call = program.call_name("doRunThing", vec![]);
    let call_stmt = program.expr_stmt(call);
    let run = program.function("run", &[], &[], vec![call_stmt]);
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(defun shrike-go ()"), "{text}");
    assert!(text.contains("(shrike-go)"), "call site follows the rename: {text}");
    assert!(!text.contains("do-run-thing"), "{text}");
}

#[test]
fn test_predicate_directive_appends_suffix() {
    let mut program = ProgramBuilder::new();
    let func = program.function("isEmpty", &["[Predicate]"], &[("value", None)], vec![]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(defun is-empty? (value)"), "{text}");
}

#[test]
fn test_interactive_and_custom_form_directives() {
    let mut program = ProgramBuilder::new();
    let command = program.function("refreshView", &["[Interactive]"], &[], vec![]);
    program.add(command);
    let macro_like = program.function("withGuard", &["[Form: defmacro]"], &[("body", None)], vec![]);
    program.add(macro_like);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(defun refresh-view ()\n  (interactive)"), "{text}");
    assert!(text.contains("(defmacro with-guard (body)"), "{text}");
}

#[test]
fn test_malformed_directive_reports_raw_text() {
    let mut program = ProgramBuilder::new();
    let func = program.function("f", &["[Frobnicate]"], &[], vec![]);
    program.add(func);

    let err = program.compile("main").unwrap_err();
    let CompileError::Build(BuildError::Directive(directive_err)) = err else {
        panic!("expected a directive error, got {err:?}");
    };
    assert!(
        directive_err.to_string().contains("[Frobnicate]"),
        "error must name the offending text: {directive_err}"
    );
}

#[test]
fn test_object_literal_quoting() {
    // function getY() { return 2; }
    // function f() { const point = { x: 1, y: getY() }; }
    let mut program = ProgramBuilder::new();
    let two = program.number(2.0);
    let ret_two = program.ret(Some(two));
    let get_y = program.function("getY", &[], &[], vec![ret_two]);
    program.add(get_y);

    let one = program.number(1.0);
    let y_call = program.call_name("getY", vec![]);
    let point = program.object(&[("x", one), ("y", y_call)]);
    let decl = program.const_decl("point", None, Some(point));
    let func = program.function("f", &[], &[], vec![decl]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(
        text.contains("`((x . 1) (y . ,(get-y)))"),
        "the call must evaluate inside the quoted structure: {text}"
    );
}

#[test]
fn test_literal_object_stays_plain_data() {
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let two = program.number(2.0);
    let point = program.object(&[("x", one), ("y", two)]);
    let decl = program.const_decl("point", None, Some(point));
    let func = program.function("f", &[], &[], vec![decl]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("'((x . 1) (y . 2))"), "{text}");
}

#[test]
fn test_enum_lowering_at_root_and_nested() {
    // enum Color { Red, Green = 5 } at top level…
    let mut root_program = ProgramBuilder::new();
    let five = root_program.number(5.0);
    let decl = root_program.enum_decl("Color", &[("Red", None), ("Green", Some(five))]);
    root_program.add(decl);
    let root_text = root_program.compile("main").unwrap().text;
    assert!(root_text.contains("(defvar color nil)"), "{root_text}");
    assert!(
        root_text.contains("(setq color '((red . \"Red\") (green . 5)))"),
        "{root_text}"
    );

    // …and the same enum inside a function scopes its siblings.
    let mut nested_program = ProgramBuilder::new();
    let five = nested_program.number(5.0);
    let decl = nested_program.enum_decl("Color", &[("Red", None), ("Green", Some(five))]);
    let color_ref = nested_program.ident("Color");
    let use_stmt = nested_program.expr_stmt(color_ref);
    let func = nested_program.function("f", &[], &[], vec![decl, use_stmt]);
    nested_program.add(func);
    let nested_text = nested_program.compile("main").unwrap().text;
    assert!(
        nested_text.contains("(let* ((color '((red . \"Red\") (green . 5))))"),
        "{nested_text}"
    );
}

#[test]
fn test_named_import_emits_require_and_indirect_calls() {
    // import { formatLine } from "./textUtils";
    // function run() { formatLine(); }
    let mut program = ProgramBuilder::new();
    let import = program.named_import(&["formatLine"], "./textUtils");
    program.add(import);
    let call = program.call_name("formatLine", vec![]);
    let call_stmt = program.expr_stmt(call);
    let run = program.function("run", &[], &[], vec![call_stmt]);
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(require 'text-utils)"), "{text}");
    assert!(
        text.contains("(funcall format-line)"),
        "imported names call through the value namespace: {text}"
    );
}

#[test]
fn test_for_of_binds_fresh_variable() {
    // function sum(xs: number[]) { let total = 0; for (x of xs) { total = total + x; } }
    let mut program = ProgramBuilder::new();
    let zero = program.number(0.0);
    let decl_total = program.const_decl("total", Some(TypeAnn::Number), Some(zero));
    let total_ref = program.ident("total");
    let x_ref = program.ident("x");
    let sum = program.binary(BinaryOp::Add, total_ref, x_ref);
    let total_target = program.ident("total");
    let update = program.assign(total_target, sum);
    let update_stmt = program.expr_stmt(update);
    let xs_ref = program.ident("xs");
    let loop_stmt = program.for_of("x", xs_ref, vec![update_stmt]);
    let func = program.function(
        "sum",
        &[],
        &[("xs", Some(TypeAnn::Array(Box::new(TypeAnn::Number))))],
        vec![decl_total, loop_stmt],
    );
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(dolist (x xs)"), "{text}");
}

#[test]
fn test_if_branches_nest_their_own_sequences() {
    // function f(flag) { if (flag) { const a = 1; a; } else { return 2; } }
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let decl_a = program.const_decl("a", None, Some(one));
    let a_ref = program.ident("a");
    let a_stmt = program.expr_stmt(a_ref);
    let two = program.number(2.0);
    let ret_two = program.ret(Some(two));
    let flag_ref = program.ident("flag");
    let branch = program.if_stmt(flag_ref, vec![decl_a, a_stmt], Some(vec![ret_two]));
    let func = program.function("f", &[], &[("flag", None)], vec![branch]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(if flag"), "{text}");
    assert!(
        text.contains("(let* ((a 1))"),
        "the then-branch declaration opens its own scope: {text}"
    );
    assert!(text.contains("(cl-return-from blk-0 2)"), "{text}");
}

#[test]
fn test_classic_for_lowers_to_let_wrapped_while() {
    // function f() { for (let i = 0; i < 3; ++i) { step(); } }
    let mut program = ProgramBuilder::new();
    let zero = program.number(0.0);
    let init = program.const_decl("i", Some(TypeAnn::Number), Some(zero));
    let i_ref = program.ident("i");
    let three = program.number(3.0);
    let condition = program.binary(BinaryOp::Lt, i_ref, three);
    let i_target = program.ident("i");
    let update = program.prefix_increment(i_target);
    let step_call = program.call_name("step", vec![]);
    let step_stmt = program.expr_stmt(step_call);
    let loop_stmt = program.for_loop(Some(init), Some(condition), Some(update), vec![step_stmt]);
    let func = program.function("f", &[], &[], vec![loop_stmt]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(let* ((i 0))"), "{text}");
    assert!(text.contains("(while (< i 3)"), "{text}");
    assert!(
        text.contains("(setq i (1+ i))"),
        "the update runs at the end of each iteration: {text}"
    );
}

#[test]
fn test_namespace_import_emits_require() {
    let mut program = ProgramBuilder::new();
    let import = program.namespace_import("buffers", "./bufferOps");
    program.add(import);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(require 'buffer-ops)"), "{text}");
}

#[test]
fn test_ambient_module_functions_call_directly() {
    // declare module "editor" { function insertText(s: string); }
    // function run() { insertText("hi"); }
    let mut program = ProgramBuilder::new();
    let insert = program.function("insertText", &[], &[("s", Some(TypeAnn::Str))], vec![]);
    let ambient = program.ambient_module("editor", vec![insert]);
    program.add(ambient);

    let hello = program.string("hi");
    let call = program.call_name("insertText", vec![hello]);
    let call_stmt = program.expr_stmt(call);
    let run = program.function("run", &[], &[], vec![call_stmt]);
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert!(
        text.contains("(insert-text \"hi\")"),
        "ambient functions are real functions at the call site: {text}"
    );
    assert!(
        !text.contains("(defun insert-text"),
        "ambient declarations emit no definition: {text}"
    );
}

#[test]
fn test_property_assignment_uses_place_form() {
    // function f(config) { config.size = 5; }
    let mut program = ProgramBuilder::new();
    let config_ref = program.ident("config");
    let place = program.property(config_ref, "size");
    let five = program.number(5.0);
    let assignment = program.assign(place, five);
    let stmt = program.expr_stmt(assignment);
    let func = program.function("f", &[], &[("config", None)], vec![stmt]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(
        text.contains("(setf (alist-get 'size config) 5)"),
        "{text}"
    );
}
