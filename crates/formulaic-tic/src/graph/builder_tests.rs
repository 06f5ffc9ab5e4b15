//! Tests for the graph wiring done by individual builder calls.

use super::builder::*;
use crate::literal::IntLiteral;
use crate::primitive::Primitive;
use crate::test_utils;
use crate::types::Type;
use crate::Error;

#[test]
fn variable_use_and_equation() {
    let mut b = GraphBuilder::new();

    b.bind_var("x", 0).unwrap();
    b.bind_equation("y", 0).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: [..] <: y
    x: [..] <: #0
    y: [..]
    ");
}

#[test]
fn integer_literal_gets_range() {
    let mut b = GraphBuilder::new();

    b.bind_int_literal(0, IntLiteral::decimal(300)).unwrap();
    b.bind_equation("x", 0).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: [uint12..real] ~real <: x
    V0 -> #0
    x: [..]
    ");
}

#[test]
fn constant_takes_composite_shape() {
    let mut b = GraphBuilder::new();

    b.bind_constant(0, &Type::array(Primitive::I32.into()))
        .unwrap();
    b.bind_equation("xs", 0).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: V0[] <: xs
    V0: int32
    V1 -> #0
    xs: [..]
    ");
}

#[test]
fn primitive_equation_sets_preference() {
    let mut b = GraphBuilder::new();

    b.bind_constant(0, &Primitive::Text.into()).unwrap();
    b.bind_equation("s", 0).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: text <: s
    V0 -> #0
    s: [..] ~text
    ");
}

#[test]
fn if_else_shares_branch_type() {
    let mut b = GraphBuilder::new();

    b.bind_if_else(&[0], &[1, 2], 3).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: bool
    V0 -> #0
    #3: [..]
    #1 -> #3
    #2 -> #3
    ");
}

#[test]
fn function_definition() {
    let mut b = GraphBuilder::new();

    b.bind_var("a", 0).unwrap();
    b.define_function("f", &["a"], 0, None).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: [..]
    a: [..] <: #0
    f: (a)->#0
    ");
}

#[test]
fn forward_call_joins_definition() {
    let mut b = GraphBuilder::new();

    b.record_call(Callee::Named("g"), &[0], 1).unwrap();
    b.define_function("g", &["n"], 2, None).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: [..] <: V0
    #1: [..]
    g: (V0)->#1
    V0: [..]
    n -> V0
    #2 -> #1
    V1 -> g
    ");
}

#[test]
fn field_access_bounds_struct() {
    let mut b = GraphBuilder::new();

    b.bind_var("p", 0).unwrap();
    b.bind_field_access(0, "age", 1).unwrap();

    insta::assert_snapshot!(b.dump(), @r"
    #0: [..] <: V0
    p: [..] <: #0
    #1: [..]
    V0: {age:#1}
    ");
}

#[test]
fn duplicate_definition() {
    let mut b = GraphBuilder::new();
    b.define_function("f", &[], 0, None).unwrap();

    let err = b.define_function("f", &[], 1, None).unwrap_err();

    assert_eq!(err, Error::DuplicateDefinition { name: "f".into() });
}

#[test]
fn variable_cannot_be_redefined_as_function() {
    let mut b = GraphBuilder::new();
    b.declare_var_type("f", &Primitive::I32.into()).unwrap();

    let err = b.define_function("f", &["x"], 0, None).unwrap_err();

    assert_eq!(err, Error::DuplicateDefinition { name: "f".into() });
}

#[test]
fn call_arity_mismatch() {
    let mut b = GraphBuilder::new();

    let err = b
        .record_call(Callee::Signature(&test_utils::compare()), &[0], 1)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid binding at #1: `<T0[..] cmp>(T0, T0)->bool` expects 2 arguments, got 1"
    );
}

#[test]
fn user_function_arity_mismatch() {
    let mut b = GraphBuilder::new();
    b.define_function("f", &["a", "b"], 0, None).unwrap();

    let err = b.record_call(Callee::Named("f"), &[1], 2).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid binding at f: function expects 2 arguments, got 1"
    );
}

#[test]
fn primitive_is_not_callable() {
    let mut b = GraphBuilder::new();
    b.bind_constant(0, &Primitive::I32.into()).unwrap();

    let err = b.record_call(Callee::Node(0), &[], 1).unwrap_err();

    assert_eq!(err.to_string(), "invalid binding at #0: a primitive cannot be called");
}

#[test]
fn variable_use_of_bound_node() {
    let mut b = GraphBuilder::new();
    b.bind_constant(0, &Primitive::Bool.into()).unwrap();

    let err = b.bind_var("x", 0).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid binding at #0: variable `x` used where a primitive is already bound"
    );
}

#[test]
fn constants_must_be_concrete() {
    let mut b = GraphBuilder::new();

    let generic = b.bind_constant(0, &Type::Generic(0)).unwrap_err();
    let abstract_type = b.bind_constant(1, &Primitive::I96.into()).unwrap_err();

    assert_eq!(
        generic.to_string(),
        "invalid binding at #0: `T0` is not a concrete type"
    );
    assert_eq!(
        abstract_type.to_string(),
        "invalid binding at #1: `int96` cannot be used as a concrete type"
    );
}

#[test]
fn unsatisfiable_integer_bounds() {
    let mut b = GraphBuilder::new();

    let err = b
        .bind_integer(0, Primitive::Text, Primitive::I32, Primitive::I32)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidBinding { .. }));
}

#[test]
fn struct_fields_are_unique() {
    let mut b = GraphBuilder::new();

    let err = b.build_struct(2, &[("a", 0), ("a", 1)]).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid binding at #2: field `a` is defined twice"
    );
}

#[test]
fn conflicting_constants() {
    let mut b = GraphBuilder::new();
    b.bind_constant(0, &Primitive::Text.into()).unwrap();

    let err = b.bind_constant(0, &Primitive::I32.into()).unwrap_err();

    assert!(matches!(err, Error::CannotMerge { .. }));
}
