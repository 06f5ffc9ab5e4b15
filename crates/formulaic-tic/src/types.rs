//! Public type model: resolved types, generic constraints and signatures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::primitive::Primitive;

/// A resolved type, or a type template when it contains generics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Primitive(Primitive),
    Array(Box<Type>),
    Function { args: Vec<Type>, ret: Box<Type> },
    /// Record with named fields. A struct with more fields widens to one
    /// with fewer.
    Struct(BTreeMap<String, Type>),
    /// Index into the generic list of the enclosing signature or result.
    Generic(u32),
}

impl Type {
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn function(args: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Type::Function {
            args: args.into_iter().collect(),
            ret: Box::new(ret),
        }
    }

    /// Struct type from `(name, type)` pairs, e.g. `{age:int32}`.
    pub fn structure<'a>(fields: impl IntoIterator<Item = (&'a str, Type)>) -> Self {
        Type::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| (name.to_owned(), ty))
                .collect(),
        )
    }

    /// Whether any generic occurs inside this type.
    pub fn is_generic(&self) -> bool {
        match self {
            Type::Primitive(_) => false,
            Type::Generic(_) => true,
            Type::Array(element) => element.is_generic(),
            Type::Function { args, ret } => ret.is_generic() || args.iter().any(Type::is_generic),
            Type::Struct(fields) => fields.values().any(Type::is_generic),
        }
    }

    /// Calls `f` for every generic occurrence, left to right.
    pub fn for_each_generic(&self, f: &mut impl FnMut(u32)) {
        match self {
            Type::Primitive(_) => {}
            Type::Generic(index) => f(*index),
            Type::Array(element) => element.for_each_generic(f),
            Type::Function { args, ret } => {
                for arg in args {
                    arg.for_each_generic(f);
                }
                ret.for_each_generic(f);
            }
            Type::Struct(fields) => {
                for ty in fields.values() {
                    ty.for_each_generic(f);
                }
            }
        }
    }

    /// Rewrites generic indices through `map`.
    pub fn map_generics(&self, map: &impl Fn(u32) -> u32) -> Type {
        match self {
            Type::Primitive(p) => Type::Primitive(*p),
            Type::Generic(index) => Type::Generic(map(*index)),
            Type::Array(element) => Type::array(element.map_generics(map)),
            Type::Function { args, ret } => Type::Function {
                args: args.iter().map(|a| a.map_generics(map)).collect(),
                ret: Box::new(ret.map_generics(map)),
            },
            Type::Struct(fields) => Type::Struct(
                fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), ty.map_generics(map)))
                    .collect(),
            ),
        }
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Type::Primitive(p)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Generic(index) => write!(f, "T{index}"),
            Type::Array(element) => match element.as_ref() {
                Type::Function { .. } => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            Type::Function { args, ret } => {
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")->{ret}")
            }
            Type::Struct(fields) => {
                f.write_str("{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}:{ty}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Bounds a generic parameter carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericConstraint {
    /// The generic must be at least as wide as this.
    pub descendant: Option<Primitive>,
    /// The generic must widen to this.
    pub ancestor: Option<Primitive>,
    /// Used when nothing else decides the type.
    pub preferred: Option<Primitive>,
    /// The generic must support ordering comparisons.
    pub comparable: bool,
}

impl GenericConstraint {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn bounded(descendant: Option<Primitive>, ancestor: Option<Primitive>) -> Self {
        Self {
            descendant,
            ancestor,
            ..Self::default()
        }
    }

    pub fn comparable() -> Self {
        Self {
            comparable: true,
            ..Self::default()
        }
    }

    pub fn preferred(mut self, preferred: Primitive) -> Self {
        self.preferred = Some(preferred);
        self
    }
}

impl fmt::Display for GenericConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(d) = self.descendant {
            write!(f, "{d}")?;
        }
        f.write_str("..")?;
        if let Some(a) = self.ancestor {
            write!(f, "{a}")?;
        }
        f.write_str("]")?;
        if let Some(p) = self.preferred {
            write!(f, " ~{p}")?;
        }
        if self.comparable {
            f.write_str(" cmp")?;
        }
        Ok(())
    }
}

/// Callable descriptor: generic parameters, argument types, return type.
///
/// Built-in functions are described by the host; user functions come back
/// from a solve and can be called from another graph, each call taking
/// fresh type variables for the generics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub generics: Vec<GenericConstraint>,
    pub args: Vec<Type>,
    pub ret: Type,
}

impl Signature {
    pub fn new(args: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Self {
            generics: Vec::new(),
            args: args.into_iter().collect(),
            ret,
        }
    }

    pub fn generic(
        generics: impl IntoIterator<Item = GenericConstraint>,
        args: impl IntoIterator<Item = Type>,
        ret: Type,
    ) -> Self {
        Self {
            generics: generics.into_iter().collect(),
            args: args.into_iter().collect(),
            ret,
        }
    }

    /// Builds a signature from a resolved function type whose generic
    /// indices point into `pool`. Generics are renumbered in order of first
    /// appearance.
    pub(crate) fn from_function_type(ty: &Type, pool: &[GenericConstraint]) -> Option<Self> {
        let Type::Function { args, ret } = ty else {
            return None;
        };
        let mut used: Vec<u32> = Vec::new();
        ty.for_each_generic(&mut |index| {
            if !used.contains(&index) {
                used.push(index);
            }
        });
        let local = |index: u32| {
            used.iter()
                .position(|&u| u == index)
                .map_or(index, |p| p as u32)
        };
        Some(Self {
            generics: used
                .iter()
                .map(|&index| pool.get(index as usize).cloned().unwrap_or_default())
                .collect(),
            args: args.iter().map(|a| a.map_generics(&local)).collect(),
            ret: ret.map_generics(&local),
        })
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.generics.is_empty() {
            f.write_str("<")?;
            for (i, g) in self.generics.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "T{i}{g}")?;
            }
            f.write_str(">")?;
        }
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")->{}", self.ret)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
