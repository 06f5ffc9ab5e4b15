//! Lowering of public [`Type`]s into graph nodes.

use std::collections::BTreeMap;

use crate::types::{Signature, Type};
use crate::{Error, Result};

use super::state::{Constraints, NodeState};
use super::{Graph, NodeId, NodeName};

impl Graph {
    /// Fresh type variables for a signature's generics.
    pub(crate) fn instantiate(&mut self, signature: &Signature) -> Vec<NodeId> {
        signature
            .generics
            .iter()
            .map(|g| self.type_var(NodeState::Constraints(Constraints::from_generic(g))))
            .collect()
    }

    /// A node holding `ty`. Generic indices refer to `generics`.
    pub(crate) fn lower(
        &mut self,
        ty: &Type,
        generics: &[NodeId],
        origin: &NodeName,
    ) -> Result<NodeId> {
        let state = match ty {
            Type::Generic(index) => {
                return generics.get(*index as usize).copied().ok_or_else(|| {
                    Error::InvalidBinding {
                        node: origin.clone(),
                        reason: format!("generic T{index} is not declared"),
                    }
                });
            }
            Type::Primitive(p) => {
                if p.is_abstract() {
                    return Err(Error::InvalidBinding {
                        node: origin.clone(),
                        reason: format!("`{p}` cannot be used as a concrete type"),
                    });
                }
                NodeState::Primitive(*p)
            }
            Type::Array(element) => NodeState::Array(self.lower(element, generics, origin)?),
            Type::Function { args, ret } => {
                let mut lowered = Vec::with_capacity(args.len());
                for arg in args {
                    lowered.push(self.lower(arg, generics, origin)?);
                }
                NodeState::Function {
                    args: lowered,
                    ret: self.lower(ret, generics, origin)?,
                }
            }
            Type::Struct(fields) => {
                let mut lowered = BTreeMap::new();
                for (name, ty) in fields {
                    lowered.insert(name.clone(), self.lower(ty, generics, origin)?);
                }
                NodeState::Struct {
                    fields: lowered,
                    open: false,
                }
            }
        };
        Ok(self.type_var(state))
    }

    /// Lowers a type that must not mention generics.
    pub(crate) fn lower_concrete(&mut self, ty: &Type, origin: &NodeName) -> Result<NodeId> {
        if ty.is_generic() {
            return Err(Error::InvalidBinding {
                node: origin.clone(),
                reason: format!("`{ty}` is not a concrete type"),
            });
        }
        self.lower(ty, &[], origin)
    }
}
