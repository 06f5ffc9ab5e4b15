use super::*;
use Primitive::*;

#[test]
fn widening_is_reflexive() {
    for p in ALL_PRIMITIVES {
        assert!(p.widens_to(p), "{p}");
        assert!(p.widens_to(Any), "{p}");
    }
}

#[test]
fn signed_chain() {
    assert!(I8.widens_to(I16));
    assert!(I8.widens_to(I64));
    assert!(I32.widens_to(Real));
    assert!(!I64.widens_to(I32));
    assert!(!I8.widens_to(U64));
}

#[test]
fn unsigned_chain() {
    assert!(U8.widens_to(U64));
    assert!(U8.widens_to(I16));
    assert!(U16.widens_to(I32));
    assert!(U32.widens_to(I64));
    assert!(!U64.widens_to(I64));
    assert!(!U32.widens_to(I32));
}

#[test]
fn non_numeric_only_widen_to_any() {
    for p in [Bool, Char, Text] {
        for other in ALL_PRIMITIVES {
            assert_eq!(p.widens_to(other), other == p || other == Any, "{p} -> {other}");
        }
    }
}

#[test]
fn lca_of_mixed_signedness() {
    assert_eq!(I16.lca(U16), I32);
    assert_eq!(I32.lca(U32), I64);
    assert_eq!(I64.lca(U64), I96);
    assert_eq!(U8.lca(I8), I16);
    assert_eq!(U16.lca(I8), I32);
}

#[test]
fn lca_of_unrelated_is_any() {
    assert_eq!(Bool.lca(Char), Any);
    assert_eq!(I32.lca(Text), Any);
    assert_eq!(Real.lca(Bool), Any);
}

#[test]
fn gcd_picks_bridging_primitive() {
    assert_eq!(I32.gcd(U32), Some(U24));
    assert_eq!(I16.gcd(U16), Some(U12));
    assert_eq!(I64.gcd(U64), Some(U48));
    assert_eq!(I32.gcd(U64), Some(U24));
}

#[test]
fn gcd_without_common_descendant() {
    assert_eq!(I8.gcd(U8), None);
    assert_eq!(Bool.gcd(I32), None);
    assert_eq!(Real.gcd(Any), Some(Real));
}

#[test]
fn concretize_up_prefers_signed() {
    assert_eq!(U12.concretize_up(), I16);
    assert_eq!(U24.concretize_up(), I32);
    assert_eq!(U48.concretize_up(), I64);
    assert_eq!(I96.concretize_up(), Real);
    assert_eq!(U8.concretize_up(), U8);
}

#[test]
fn concretize_down() {
    assert_eq!(I96.concretize_down(), Some(I64));
    assert_eq!(U48.concretize_down(), Some(U32));
    assert_eq!(U24.concretize_down(), Some(U16));
    assert_eq!(U12.concretize_down(), Some(U8));
    assert_eq!(Real.concretize_down(), Some(Real));
}

#[test]
fn comparable() {
    assert!(I32.is_comparable());
    assert!(U12.is_comparable());
    assert!(Char.is_comparable());
    assert!(Text.is_comparable());
    assert!(!Bool.is_comparable());
    assert!(!Any.is_comparable());
}

#[test]
fn concrete_orders_are_linear_extensions() {
    for (i, a) in CONCRETE_ASCENDING.iter().enumerate() {
        for b in &CONCRETE_ASCENDING[..i] {
            assert!(!a.widens_to(*b) || a == b, "{a} listed after {b}");
        }
    }
    for (i, a) in CONCRETE_DESCENDING.iter().enumerate() {
        for b in &CONCRETE_DESCENDING[..i] {
            assert!(!b.widens_to(*a) || a == b, "{a} listed after {b}");
        }
    }
}

#[test]
fn display_names() {
    assert_eq!(I96.to_string(), "int96");
    assert_eq!(U8.to_string(), "uint8");
    assert_eq!(Real.to_string(), "real");
}
