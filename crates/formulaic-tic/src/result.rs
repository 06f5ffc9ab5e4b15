//! Solved types for a script.

use indexmap::IndexMap;
use serde::Serialize;

use crate::graph::SyntaxId;
use crate::types::{GenericConstraint, Signature, Type};

/// Output of a successful solve.
///
/// `Type::Generic(i)` anywhere in the result refers to `generics()[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TypeInferenceResult {
    pub(crate) syntax_types: Vec<Option<Type>>,
    pub(crate) named_types: IndexMap<String, Type>,
    pub(crate) generics: Vec<GenericConstraint>,
    pub(crate) functions: IndexMap<String, Signature>,
    pub(crate) generic_calls: IndexMap<SyntaxId, Vec<Type>>,
}

impl TypeInferenceResult {
    /// Type of the expression with order number `id`.
    pub fn syntax_type(&self, id: SyntaxId) -> Option<&Type> {
        self.syntax_types.get(id as usize)?.as_ref()
    }

    /// Type of a variable, argument or function.
    pub fn named_type(&self, name: &str) -> Option<&Type> {
        self.named_types.get(name)
    }

    pub fn named_types(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.named_types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Signature of a user function, with its own generic numbering.
    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.functions.iter().map(|(name, sig)| (name.as_str(), sig))
    }

    /// Resolved generic arguments of the call or function reference at `id`.
    pub fn generic_call_args(&self, id: SyntaxId) -> Option<&[Type]> {
        self.generic_calls.get(&id).map(Vec::as_slice)
    }

    /// Generics kept in function signatures.
    pub fn generics(&self) -> &[GenericConstraint] {
        &self.generics
    }

    pub fn generic_count(&self) -> usize {
        self.generics.len()
    }

    pub fn has_generics(&self) -> bool {
        !self.generics.is_empty()
    }
}
