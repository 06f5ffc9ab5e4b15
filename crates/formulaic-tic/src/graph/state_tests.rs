use super::state::*;
use crate::primitive::Primitive::{self, *};

fn bounds(descendant: Option<Primitive>, ancestor: Option<Primitive>) -> Constraints {
    Constraints::new(descendant, ancestor, None)
}

#[test]
fn fits_checks_every_bound() {
    let c = bounds(Some(U8), Some(I32));
    assert!(c.fits(U8));
    assert!(c.fits(I16));
    assert!(c.fits(I32));
    assert!(!c.fits(I8));
    assert!(!c.fits(I64));

    let cmp = Constraints {
        comparable: true,
        ..Constraints::default()
    };
    assert!(cmp.fits(Text));
    assert!(cmp.fits(Real));
    assert!(!cmp.fits(Bool));
    assert!(!cmp.fits(Any));
}

#[test]
fn failed_update_leaves_bounds_unchanged() {
    let mut c = bounds(None, Some(I32));
    let before = c.clone();

    assert!(!c.add_descendant(Text));
    assert_eq!(c, before);
    assert!(!c.add_ancestor(Text));
    assert_eq!(c, before);

    let mut boolean = bounds(Some(Bool), None);
    assert!(!boolean.require_comparable());
    assert!(!boolean.comparable);
}

#[test]
fn bounds_tighten() {
    let mut c = Constraints::default();
    assert!(c.is_free());

    assert!(c.add_descendant(U8));
    assert!(c.add_descendant(I8));
    assert_eq!(c.descendant, Some(I16));

    assert!(c.add_ancestor(Real));
    assert!(c.add_ancestor(I64));
    assert_eq!(c.ancestor, Some(I64));
    assert!(!c.is_free());
}

#[test]
fn merge_keeps_own_preference() {
    let a = Constraints::new(Some(U8), None, Some(I32));
    let b = Constraints::new(None, Some(Real), Some(Real));

    let merged = a.merge(&b).unwrap();

    assert_eq!(merged, Constraints::new(Some(U8), Some(Real), Some(I32)));
    assert_eq!(b.merge(&a).unwrap().preferred, Some(Real));
    assert_eq!(bounds(Some(Text), None).merge(&bounds(None, Some(Real))), None);
}

#[test]
fn merge_drops_preference_that_no_longer_fits() {
    let decimal = Constraints::new(Some(U8), Some(Real), Some(Real));
    let hex = Constraints::new(Some(U8), Some(I96), Some(I32));

    assert_eq!(decimal.merge(&hex).unwrap().preferred, Some(I32));
}

#[test]
fn pinned_requires_concrete_equal_bounds() {
    assert_eq!(bounds(Some(I32), Some(I32)).pinned(), Some(I32));
    assert_eq!(bounds(Some(I96), Some(I96)).pinned(), None);
    assert_eq!(bounds(Some(I16), Some(I32)).pinned(), None);
}

#[test]
fn composites_need_unbounded_constraints() {
    assert!(Constraints::default().accepts_composite());
    assert!(bounds(None, Some(Any)).accepts_composite());
    assert!(!bounds(None, Some(Real)).accepts_composite());
    assert!(!bounds(Some(U8), None).accepts_composite());
}

#[test]
fn covariant_defaults() {
    let preferred = Constraints::new(Some(U8), Some(Real), Some(I32));
    assert_eq!(preferred.solve_covariant(Real), I32);

    let unfit_preference = Constraints::new(Some(U16), Some(Real), Some(I8));
    assert_eq!(unfit_preference.solve_covariant(Real), U16);

    assert_eq!(Constraints::default().solve_covariant(Real), Real);
    assert_eq!(Constraints::default().solve_covariant(Text), Text);
    assert_eq!(bounds(None, Some(I32)).solve_covariant(Real), I32);
    assert_eq!(bounds(Some(Text), Some(Real)).solve_covariant(Real), Any);
}

#[test]
fn contravariant_defaults() {
    assert_eq!(bounds(None, Some(I64)).solve_contravariant(Real), I64);
    assert_eq!(Constraints::default().solve_contravariant(Real), Any);

    let cmp = Constraints {
        comparable: true,
        ..Constraints::default()
    };
    assert_eq!(cmp.solve_contravariant(Real), Real);
}

#[test]
fn display_uses_generic_notation() {
    let c = Constraints {
        descendant: Some(U8),
        ancestor: Some(Real),
        preferred: Some(I32),
        comparable: true,
    };
    assert_eq!(c.to_string(), "[uint8..real] ~int32 cmp");
    assert_eq!(Constraints::default().to_string(), "[..]");
}
