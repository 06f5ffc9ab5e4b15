//! Bounds for integer literals.
//!
//! A literal gets the narrowest type that holds its value as descendant
//! bound, so `255` can become any type from `uint8` up. Decimal literals may
//! widen all the way to `real`; hex and binary literals stay integers.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::graph::SyntaxId;
use crate::graph::builder::GraphBuilder;
use crate::primitive::Primitive;
use crate::types::Type;
use crate::{Error, NodeName, Result};

/// How the literal was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Radix {
    Decimal,
    /// `0x..` or `0b..`.
    HexOrBinary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntLiteral {
    pub value: i128,
    pub radix: Radix,
}

impl IntLiteral {
    pub fn decimal(value: i128) -> Self {
        Self {
            value,
            radix: Radix::Decimal,
        }
    }

    pub fn hex(value: i128) -> Self {
        Self {
            value,
            radix: Radix::HexOrBinary,
        }
    }
}

/// Type information derived from a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralBounds {
    /// Too large to adapt; the literal has exactly this type.
    Exact(Primitive),
    Range {
        descendant: Primitive,
        ancestor: Primitive,
        preferred: Primitive,
    },
}

/// Narrowest primitive holding a non-negative value.
fn unsigned_descendant(value: i128) -> Option<Primitive> {
    let bound = if value <= i128::from(u8::MAX) {
        Primitive::U8
    } else if value <= i128::from(i16::MAX) {
        Primitive::U12
    } else if value <= i128::from(u16::MAX) {
        Primitive::U16
    } else if value <= i128::from(i32::MAX) {
        Primitive::U24
    } else if value <= i128::from(u32::MAX) {
        Primitive::U32
    } else if value <= i128::from(i64::MAX) {
        Primitive::U48
    } else {
        return None;
    };
    Some(bound)
}

fn signed_descendant(value: i128) -> Primitive {
    if value >= i128::from(i16::MIN) {
        Primitive::I16
    } else if value >= i128::from(i32::MIN) {
        Primitive::I32
    } else {
        Primitive::I64
    }
}

/// Bounds for `literal`, or `None` when it fits no integer type.
pub fn integer_bounds(literal: IntLiteral, config: &Config) -> Option<LiteralBounds> {
    let value = literal.value;
    if value > i128::from(u64::MAX) || value < i128::from(i64::MIN) {
        return None;
    }

    let bounds = match literal.radix {
        Radix::Decimal => {
            let descendant = if value >= 0 {
                unsigned_descendant(value).unwrap_or(Primitive::U64)
            } else {
                signed_descendant(value)
            };
            LiteralBounds::Range {
                descendant,
                ancestor: Primitive::Real,
                preferred: config.integer_preferred,
            }
        }
        Radix::HexOrBinary if value >= 0 => match unsigned_descendant(value) {
            Some(descendant) => LiteralBounds::Range {
                descendant,
                ancestor: Primitive::I96,
                preferred: if value <= i128::from(i32::MAX) {
                    Primitive::I32
                } else {
                    Primitive::I64
                },
            },
            None => LiteralBounds::Exact(Primitive::U64),
        },
        Radix::HexOrBinary => match signed_descendant(value) {
            Primitive::I64 => LiteralBounds::Exact(Primitive::I64),
            descendant => LiteralBounds::Range {
                descendant,
                ancestor: Primitive::I64,
                preferred: Primitive::I32,
            },
        },
    };
    Some(bounds)
}

impl GraphBuilder {
    /// Integer literal with bounds derived from its value and radix.
    pub fn bind_int_literal(&mut self, node: SyntaxId, literal: IntLiteral) -> Result<()> {
        match integer_bounds(literal, &self.config) {
            Some(LiteralBounds::Exact(p)) => self.bind_constant(node, &Type::Primitive(p)),
            Some(LiteralBounds::Range {
                descendant,
                ancestor,
                preferred,
            }) => self.bind_integer(node, descendant, ancestor, preferred),
            None => Err(Error::InvalidBinding {
                node: NodeName::Syntax(node),
                reason: format!("integer literal {} is out of range", literal.value),
            }),
        }
    }
}

#[cfg(test)]
#[path = "literal_tests.rs"]
mod literal_tests;
