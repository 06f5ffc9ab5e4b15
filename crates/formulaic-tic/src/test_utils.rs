//! Built-in signatures and helpers shared by tests.

use std::fmt::Write;

use crate::primitive::Primitive;
use crate::result::TypeInferenceResult;
use crate::types::{GenericConstraint, Signature, Type};

fn t0() -> Type {
    Type::Generic(0)
}

/// `<`, `<=`, `>`, `>=`: `<T cmp>(T, T)->bool`.
pub fn compare() -> Signature {
    Signature::generic(
        [GenericConstraint::comparable()],
        [t0(), t0()],
        Primitive::Bool.into(),
    )
}

/// `+`, `-`, `*`: `<T[..real]>(T, T)->T`.
pub fn arithmetic() -> Signature {
    Signature::generic(
        [GenericConstraint::bounded(None, Some(Primitive::Real))],
        [t0(), t0()],
        t0(),
    )
}

/// `xs.filter(f)`: `<T>(T[], (T)->bool)->T[]`.
pub fn filter() -> Signature {
    Signature::generic(
        [GenericConstraint::any()],
        [
            Type::array(t0()),
            Type::function([t0()], Primitive::Bool.into()),
        ],
        Type::array(t0()),
    )
}

/// `xs.map(f)`: `<T, R>(T[], (T)->R)->R[]`.
pub fn map() -> Signature {
    Signature::generic(
        [GenericConstraint::any(), GenericConstraint::any()],
        [Type::array(t0()), Type::function([t0()], Type::Generic(1))],
        Type::array(Type::Generic(1)),
    )
}

/// `abs(x)`: `<T[..real]>(T)->T`.
pub fn abs() -> Signature {
    Signature::generic(
        [GenericConstraint::bounded(None, Some(Primitive::Real))],
        [t0()],
        t0(),
    )
}

/// `len(s)`: `(text)->int32`.
pub fn len() -> Signature {
    Signature::new([Primitive::Text.into()], Primitive::I32.into())
}

/// One `name: type` line per named node, for snapshots.
pub fn named_types(result: &TypeInferenceResult) -> String {
    let mut out = String::new();
    for (name, ty) in result.named_types() {
        writeln!(out, "{name}: {ty}").expect("String write never fails");
    }
    out
}
