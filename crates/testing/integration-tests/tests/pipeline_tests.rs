//! End-to-end tests across Build → Lower → Emit

use expect_test::expect;
use integration_tests::{ProgramBuilder, block_names, count_occurrences};
use sk_driver::CompileError;
use sk_elisp::Node;
use sk_intern::Interner;
use sk_lower::LowerError;
use sk_span::FileId;
use sk_syntax::{BinaryOp, TypeAnn};
use std::collections::HashSet;

#[test]
fn test_scoping_nesting() {
    // function f() { const a = 1; const b = 2; a + b; }
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let decl_a = program.const_decl("a", None, Some(one));
    let two = program.number(2.0);
    let decl_b = program.const_decl("b", None, Some(two));
    let a_ref = program.ident("a");
    let b_ref = program.ident("b");
    let sum = program.binary(BinaryOp::Add, a_ref, b_ref);
    let use_both = program.expr_stmt(sum);
    let func = program.function("f", &[], &[], vec![decl_a, decl_b, use_both]);
    program.add(func);

    let lowered = program.lower("main").unwrap();
    let Node::Defun { body, .. } = &lowered.forms[0] else {
        panic!("expected a function definition, got {:?}", lowered.forms[0]);
    };

    // `a`'s scope strictly contains `b`'s scope, which contains the use.
    let [Node::LetBinding {
        items: outer_items,
        body: outer_body,
    }] = body.as_slice()
    else {
        panic!("expected the function body to be one let scope, got {body:?}");
    };
    assert_eq!(outer_items.len(), 1);
    assert_eq!(outer_items[0].name, "a");

    let [Node::LetBinding {
        items: inner_items,
        body: inner_body,
    }] = outer_body.as_slice()
    else {
        panic!("expected `b`'s let nested inside `a`'s, got {outer_body:?}");
    };
    assert_eq!(inner_items.len(), 1);
    assert_eq!(inner_items[0].name, "b");
    assert_eq!(inner_body.len(), 1, "the use lives inside both scopes");
}

#[test]
fn test_block_ids_are_unique_per_file() {
    // function f() { return 1; }
    // function g() { const h = () => { return 2; }; h(); }
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let ret_one = program.ret(Some(one));
    let func_f = program.function("f", &[], &[], vec![ret_one]);
    program.add(func_f);

    let two = program.number(2.0);
    let ret_two = program.ret(Some(two));
    let lambda = program.arrow(&[], vec![ret_two]);
    let decl_h = program.const_decl("h", None, Some(lambda));
    let call_h = program.call_name("h", vec![]);
    let call_stmt = program.expr_stmt(call_h);
    let func_g = program.function("g", &[], &[], vec![decl_h, call_stmt]);
    program.add(func_g);

    let text = program.compile("main").unwrap().text;
    let blocks = block_names(&text);
    assert_eq!(blocks.len(), 3, "two functions and one lambda: {text}");
    let distinct: HashSet<&String> = blocks.iter().collect();
    assert_eq!(distinct.len(), blocks.len(), "block ids collide: {blocks:?}");
}

#[test]
fn test_call_namespace_correctness() {
    // function helper() {}
    // function run(ext) { const cb = () => {}; helper(); cb(); ext(); }
    let mut program = ProgramBuilder::new();
    let helper = program.function("helper", &[], &[], vec![]);
    program.add(helper);

    let lambda = program.arrow(&[], vec![]);
    let decl_cb = program.const_decl("cb", None, Some(lambda));
    let call_helper = program.call_name("helper", vec![]);
    let helper_stmt = program.expr_stmt(call_helper);
    let call_cb = program.call_name("cb", vec![]);
    let cb_stmt = program.expr_stmt(call_cb);
    let call_ext = program.call_name("ext", vec![]);
    let ext_stmt = program.expr_stmt(call_ext);
    let run = program.function(
        "run",
        &[],
        &[("ext", None)],
        vec![decl_cb, helper_stmt, cb_stmt, ext_stmt],
    );
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert!(text.contains("(helper)"), "function call must be direct: {text}");
    assert!(
        !text.contains("(funcall helper)") && !text.contains("(funcall #'helper)"),
        "function call must never be indirect: {text}"
    );
    assert!(
        text.contains("(funcall cb)"),
        "variable call must be indirect: {text}"
    );
    assert!(
        text.contains("(funcall ext)"),
        "argument call must be indirect: {text}"
    );
}

#[test]
fn test_postfix_increment_yields_previous_value() {
    // function f() { let x = 5; x++; }
    let mut program = ProgramBuilder::new();
    let five = program.number(5.0);
    let decl_x = program.const_decl("x", None, Some(five));
    let x_ref = program.ident("x");
    let bump = program.postfix_increment(x_ref);
    let bump_stmt = program.expr_stmt(bump);
    let func = program.function("f", &[], &[], vec![decl_x, bump_stmt]);
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(
        text.contains("(let* ((shrike--tmp-0 x)) (setq x (1+ x)) shrike--tmp-0)"),
        "postfix must stash the old value, mutate, then yield the stash: {text}"
    );
}

#[test]
fn test_named_arguments_single_evaluation() {
    // function makeArg() { return { width: 1, height: 2 }; }
    // [NamedArguments] function configure(opts: {width, height}) {}
    // function run() { configure(makeArg()); }
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let two = program.number(2.0);
    let record = program.object(&[("width", one), ("height", two)]);
    let ret_record = program.ret(Some(record));
    let make_arg = program.function("makeArg", &[], &[], vec![ret_record]);
    program.add(make_arg);

    let opts_ty = program.object_ty(&[("width", TypeAnn::Number), ("height", TypeAnn::Number)]);
    let configure = program.function(
        "configure",
        &["[NamedArguments]"],
        &[("opts", Some(opts_ty))],
        vec![],
    );
    program.add(configure);

    let arg = program.call_name("makeArg", vec![]);
    let call = program.call_name("configure", vec![arg]);
    let call_stmt = program.expr_stmt(call);
    let run = program.function("run", &[], &[], vec![call_stmt]);
    program.add(run);

    let text = program.compile("main").unwrap().text;
    assert_eq!(
        count_occurrences(&text, "(make-arg)"),
        1,
        "argument expression must be evaluated exactly once: {text}"
    );
    assert!(
        text.contains("(cl-defun configure (&key width height)"),
        "declaration must take keyword parameters: {text}"
    );
    assert!(
        text.contains(":width (alist-get 'width shrike--tmp-")
            && text.contains(":height (alist-get 'height shrike--tmp-"),
        "each field must project off the temporary: {text}"
    );
}

#[test]
fn test_end_to_end_function_lowering() {
    // function f(a: number, b: number) { const x = a + b; return x; }
    let mut program = ProgramBuilder::new();
    let a_ref = program.ident("a");
    let b_ref = program.ident("b");
    let sum = program.binary(BinaryOp::Add, a_ref, b_ref);
    let decl_x = program.const_decl("x", None, Some(sum));
    let x_ref = program.ident("x");
    let ret_x = program.ret(Some(x_ref));
    let func = program.function(
        "f",
        &[],
        &[("a", Some(TypeAnn::Number)), ("b", Some(TypeAnn::Number))],
        vec![decl_x, ret_x],
    );
    program.add(func);

    let text = program.compile("main").unwrap().text;
    expect![[r#"
        ;;; -*- lexical-binding: t -*-

        (require 'cl-lib)

        (defun f (a b)
          (cl-block blk-0
            (let* ((x (+ a b)))
              (cl-return-from blk-0 x))))

        (provide 'main)
    "#]]
    .assert_eq(&text);
}

#[test]
fn test_add_coerces_only_for_non_numeric_operands() {
    // function g(a: string, b: number) { return a + b; }
    let mut program = ProgramBuilder::new();
    let a_ref = program.ident("a");
    let b_ref = program.ident("b");
    let sum = program.binary(BinaryOp::Add, a_ref, b_ref);
    let ret_sum = program.ret(Some(sum));
    let func = program.function(
        "g",
        &[],
        &[("a", Some(TypeAnn::Str)), ("b", Some(TypeAnn::Number))],
        vec![ret_sum],
    );
    program.add(func);

    let text = program.compile("main").unwrap().text;
    assert!(
        text.contains("(shrike-add a b)"),
        "a string operand must route through the runtime helper: {text}"
    );
    assert!(!text.contains("(+ a b)"), "native + must not be used: {text}");
}

#[test]
fn test_root_vs_nested_variable_declaration() {
    // Top level: const x = 5;
    let mut root_program = ProgramBuilder::new();
    let five = root_program.number(5.0);
    let decl = root_program.const_decl("x", None, Some(five));
    root_program.add(decl);
    let root_text = root_program.compile("main").unwrap().text;
    assert!(root_text.contains("(defvar x nil)"), "{root_text}");
    assert!(root_text.contains("(setq x 5)"), "{root_text}");
    assert!(!root_text.contains("(let*"), "{root_text}");

    // Same declaration shape inside a function body.
    let mut nested_program = ProgramBuilder::new();
    let five = nested_program.number(5.0);
    let decl = nested_program.const_decl("x", None, Some(five));
    let func = nested_program.function("f", &[], &[], vec![decl]);
    nested_program.add(func);
    let nested_text = nested_program.compile("main").unwrap().text;
    assert!(nested_text.contains("(let* ((x 5))"), "{nested_text}");
    assert!(!nested_text.contains("(setq x 5)"), "{nested_text}");
}

#[test]
fn test_return_outside_function_is_fatal() {
    let mut program = ProgramBuilder::new();
    let one = program.number(1.0);
    let ret = program.ret(Some(one));
    program.add(ret);

    let err = program.compile("main").unwrap_err();
    assert!(
        matches!(
            err,
            CompileError::Lower(LowerError::UnboundReturnTarget { .. })
        ),
        "got {err:?}"
    );
}

#[test]
fn test_for_in_is_unsupported() {
    let mut program = ProgramBuilder::new();
    let object = program.ident("table");
    let loop_stmt = program.for_in("key", object, vec![]);
    let func = program.function("f", &[], &[("table", None)], vec![loop_stmt]);
    program.add(func);

    let err = program.compile("main").unwrap_err();
    let CompileError::Lower(LowerError::UnsupportedConstruct { kind, .. }) = err else {
        panic!("expected an unsupported-construct error, got {err:?}");
    };
    assert_eq!(kind, "for-in statement");
}

#[test]
fn test_failing_unit_does_not_abort_siblings() {
    let interner = Interner::new();

    let mut bad = ProgramBuilder::with_interner(interner.clone(), FileId(0));
    let one = bad.number(1.0);
    let ret = bad.ret(Some(one));
    bad.add(ret);
    let (bad_unit, _) = bad.finish("bad");

    let mut good = ProgramBuilder::with_interner(interner.clone(), FileId(1));
    let func = good.function("f", &[], &[], vec![]);
    good.add(func);
    let (good_unit, _) = good.finish("good");

    let results = sk_driver::compile_units(&[bad_unit, good_unit], &interner);
    assert!(results[0].is_err());
    let compiled = results[1].as_ref().expect("sibling unit must still compile");
    assert!(compiled.text.contains("(defun f ()"));
}

#[test]
fn test_named_arguments_requires_single_record_parameter() {
    // [NamedArguments] function bad(a: number, b: number) {}
    let mut program = ProgramBuilder::new();
    let func = program.function(
        "bad",
        &["[NamedArguments]"],
        &[("a", Some(TypeAnn::Number)), ("b", Some(TypeAnn::Number))],
        vec![],
    );
    program.add(func);

    let err = program.compile("main").unwrap_err();
    assert!(
        matches!(
            err,
            CompileError::Lower(LowerError::NamedArgumentsMisuse { .. })
        ),
        "got {err:?}"
    );
}
