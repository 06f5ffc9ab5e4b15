use super::*;
use crate::primitive::Primitive::*;

#[test]
fn display_composites() {
    assert_eq!(Type::array(I32.into()).to_string(), "int32[]");
    assert_eq!(
        Type::function([I32.into(), Text.into()], Bool.into()).to_string(),
        "(int32, text)->bool"
    );
    assert_eq!(
        Type::array(Type::function([Real.into()], Real.into())).to_string(),
        "((real)->real)[]"
    );
    assert_eq!(
        Type::structure([("name", Text.into()), ("age", I32.into())]).to_string(),
        "{age:int32, name:text}"
    );
    assert_eq!(Type::array(Type::Generic(1)).to_string(), "T1[]");
}

#[test]
fn is_generic_looks_through_members() {
    assert!(!Type::array(I32.into()).is_generic());
    assert!(Type::function([Type::Generic(0)], Bool.into()).is_generic());
    assert!(Type::structure([("a", Type::array(Type::Generic(0)))]).is_generic());
}

#[test]
fn signature_renumbers_generics() {
    let pool = vec![
        GenericConstraint::any(),
        GenericConstraint::comparable(),
        GenericConstraint::bounded(Some(U8), Some(Real)),
    ];
    let ty = Type::function([Type::Generic(2), Type::Generic(1)], Type::Generic(2));

    let sig = Signature::from_function_type(&ty, &pool).unwrap();

    assert_eq!(sig.args, vec![Type::Generic(0), Type::Generic(1)]);
    assert_eq!(sig.ret, Type::Generic(0));
    assert_eq!(sig.generics, vec![pool[2].clone(), pool[1].clone()]);
    assert_eq!(sig.to_string(), "<T0[uint8..real], T1[..] cmp>(T0, T1)->T0");
}

#[test]
fn signature_requires_function_type() {
    assert!(Signature::from_function_type(&Type::Primitive(I32), &[]).is_none());
}

#[test]
fn signature_serializes_with_readable_names() {
    let sig = Signature::new([Type::array(I32.into())], Type::Primitive(Bool));
    let json = serde_json::to_string(&sig).unwrap();
    assert_eq!(
        json,
        r#"{"generics":[],"args":[{"array":{"primitive":"int32"}}],"ret":{"primitive":"bool"}}"#
    );
}
