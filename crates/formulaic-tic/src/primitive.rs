//! Primitive types and the implicit widening lattice.
//!
//! `any` is the top. Numeric values widen along two chains, signed
//! (`int8 → int16 → int32 → int64`) and unsigned (`uint8 → … → uint64`),
//! which meet in the abstract `int96` before reaching `real`.
//!
//! A few abstract primitives exist only to make joins and meets unique:
//! `uint12` holds values that fit both `int16` and `uint16`, `uint24` fits
//! `int32` and `uint32`, `uint48` fits `int64` and `uint64`. Abstract
//! primitives appear as constraint bounds and are never a final type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A primitive type of the formula language.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Primitive {
    #[serde(rename = "any")]
    Any = 0,
    #[serde(rename = "bool")]
    Bool = 1,
    #[serde(rename = "char")]
    Char = 2,
    #[serde(rename = "text")]
    Text = 3,
    #[serde(rename = "real")]
    Real = 4,
    /// Any integer, signed or unsigned.
    #[serde(rename = "int96")]
    I96 = 5,
    #[serde(rename = "int64")]
    I64 = 6,
    #[serde(rename = "int32")]
    I32 = 7,
    #[serde(rename = "int16")]
    I16 = 8,
    #[serde(rename = "int8")]
    I8 = 9,
    #[serde(rename = "uint64")]
    U64 = 10,
    /// Fits both `int64` and `uint64`.
    #[serde(rename = "uint48")]
    U48 = 11,
    #[serde(rename = "uint32")]
    U32 = 12,
    /// Fits both `int32` and `uint32`.
    #[serde(rename = "uint24")]
    U24 = 13,
    #[serde(rename = "uint16")]
    U16 = 14,
    /// Fits both `int16` and `uint16`.
    #[serde(rename = "uint12")]
    U12 = 15,
    #[serde(rename = "uint8")]
    U8 = 16,
}

/// Every primitive, top first.
pub const ALL_PRIMITIVES: [Primitive; 17] = [
    Primitive::Any,
    Primitive::Bool,
    Primitive::Char,
    Primitive::Text,
    Primitive::Real,
    Primitive::I96,
    Primitive::I64,
    Primitive::I32,
    Primitive::I16,
    Primitive::I8,
    Primitive::U64,
    Primitive::U48,
    Primitive::U32,
    Primitive::U24,
    Primitive::U16,
    Primitive::U12,
    Primitive::U8,
];

/// Concrete primitives, every type listed after all concrete types below it.
///
/// The first entry satisfying a lower bound is the narrowest fit. Signed
/// types come first among incomparable candidates.
pub(crate) const CONCRETE_ASCENDING: [Primitive; 13] = [
    Primitive::I8,
    Primitive::U8,
    Primitive::I16,
    Primitive::U16,
    Primitive::I32,
    Primitive::U32,
    Primitive::I64,
    Primitive::U64,
    Primitive::Real,
    Primitive::Bool,
    Primitive::Char,
    Primitive::Text,
    Primitive::Any,
];

/// Concrete primitives, every type listed before all concrete types below it.
pub(crate) const CONCRETE_DESCENDING: [Primitive; 13] = [
    Primitive::Any,
    Primitive::Text,
    Primitive::Char,
    Primitive::Bool,
    Primitive::Real,
    Primitive::I64,
    Primitive::U64,
    Primitive::I32,
    Primitive::U32,
    Primitive::I16,
    Primitive::U16,
    Primitive::I8,
    Primitive::U8,
];

impl Primitive {
    /// Direct parents in the widening lattice.
    pub fn parents(self) -> &'static [Primitive] {
        use Primitive::*;
        match self {
            Any => &[],
            Bool | Char | Text | Real => &[Any],
            I96 => &[Real],
            I64 | U64 => &[I96],
            U48 => &[I64, U64],
            I32 => &[I64],
            U32 => &[U48],
            U24 => &[I32, U32],
            I16 => &[I32],
            U16 => &[U24],
            U12 => &[I16, U16],
            I8 => &[I16],
            U8 => &[U12],
        }
    }

    /// Whether a value of `self` implicitly converts to `other`.
    ///
    /// Reflexive and transitive.
    pub fn widens_to(self, other: Primitive) -> bool {
        self == other || self.parents().iter().any(|p| p.widens_to(other))
    }

    /// Whether this primitive only exists as a bound.
    pub fn is_abstract(self) -> bool {
        matches!(
            self,
            Primitive::I96 | Primitive::U48 | Primitive::U24 | Primitive::U12
        )
    }

    pub fn is_concrete(self) -> bool {
        !self.is_abstract()
    }

    pub fn is_numeric(self) -> bool {
        self.widens_to(Primitive::Real)
    }

    /// Whether values of this type support ordering comparisons.
    pub fn is_comparable(self) -> bool {
        self.is_numeric() || matches!(self, Primitive::Char | Primitive::Text)
    }

    /// Least common ancestor (join). Always exists, `any` at worst.
    pub fn lca(self, other: Primitive) -> Primitive {
        if self.widens_to(other) {
            return other;
        }
        if other.widens_to(self) {
            return self;
        }
        let uppers: Vec<Primitive> = ALL_PRIMITIVES
            .into_iter()
            .filter(|&c| self.widens_to(c) && other.widens_to(c))
            .collect();
        uppers
            .iter()
            .copied()
            .find(|&c| uppers.iter().all(|&u| c.widens_to(u)))
            .unwrap_or(Primitive::Any)
    }

    /// Greatest common descendant (meet). `None` when the types share no
    /// descendant, e.g. `int8` and `uint8`.
    pub fn gcd(self, other: Primitive) -> Option<Primitive> {
        if self.widens_to(other) {
            return Some(self);
        }
        if other.widens_to(self) {
            return Some(other);
        }
        let lowers: Vec<Primitive> = ALL_PRIMITIVES
            .into_iter()
            .filter(|&c| c.widens_to(self) && c.widens_to(other))
            .collect();
        lowers
            .iter()
            .copied()
            .find(|&c| lowers.iter().all(|&l| l.widens_to(c)))
    }

    /// Narrowest concrete primitive this one widens to.
    pub fn concretize_up(self) -> Primitive {
        CONCRETE_ASCENDING
            .into_iter()
            .find(|&c| self.widens_to(c))
            .unwrap_or(Primitive::Any)
    }

    /// Widest concrete primitive that widens to this one.
    pub fn concretize_down(self) -> Option<Primitive> {
        CONCRETE_DESCENDING
            .into_iter()
            .find(|&c| c.widens_to(self))
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Any => "any",
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::Text => "text",
            Primitive::Real => "real",
            Primitive::I96 => "int96",
            Primitive::I64 => "int64",
            Primitive::I32 => "int32",
            Primitive::I16 => "int16",
            Primitive::I8 => "int8",
            Primitive::U64 => "uint64",
            Primitive::U48 => "uint48",
            Primitive::U32 => "uint32",
            Primitive::U24 => "uint24",
            Primitive::U16 => "uint16",
            Primitive::U12 => "uint12",
            Primitive::U8 => "uint8",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "primitive_tests.rs"]
mod primitive_tests;
