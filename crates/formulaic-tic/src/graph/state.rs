//! Per-node type state.

use std::collections::BTreeMap;
use std::fmt;

use crate::primitive::{CONCRETE_ASCENDING, CONCRETE_DESCENDING, Primitive};
use crate::types::GenericConstraint;

use super::NodeId;

/// Shape a node's type currently has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeState {
    Primitive(Primitive),
    Constraints(Constraints),
    Array(NodeId),
    Function { args: Vec<NodeId>, ret: NodeId },
    /// Record type. An open struct was inferred from field accesses and
    /// gains fields as more accesses reach it; a closed one is a literal or
    /// a declared type.
    Struct {
        fields: BTreeMap<String, NodeId>,
        open: bool,
    },
    /// Alias left behind by a merge.
    Ref(NodeId),
}

impl NodeState {
    pub fn free() -> Self {
        NodeState::Constraints(Constraints::default())
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            NodeState::Array(_) | NodeState::Function { .. } | NodeState::Struct { .. }
        )
    }

    pub fn as_constraints(&self) -> Option<&Constraints> {
        match self {
            NodeState::Constraints(c) => Some(c),
            _ => None,
        }
    }

    /// Member nodes of a composite, in declaration order.
    pub fn members(&self) -> Vec<NodeId> {
        match self {
            NodeState::Array(element) => vec![*element],
            NodeState::Function { args, ret } => {
                let mut members = args.clone();
                members.push(*ret);
                members
            }
            NodeState::Struct { fields, .. } => fields.values().copied().collect(),
            NodeState::Primitive(_) | NodeState::Constraints(_) | NodeState::Ref(_) => Vec::new(),
        }
    }

    /// Rewrites member ids through `f`.
    pub fn map_members(&mut self, mut f: impl FnMut(NodeId) -> NodeId) {
        match self {
            NodeState::Array(element) => *element = f(*element),
            NodeState::Function { args, ret } => {
                for arg in args.iter_mut() {
                    *arg = f(*arg);
                }
                *ret = f(*ret);
            }
            NodeState::Struct { fields, .. } => {
                for member in fields.values_mut() {
                    *member = f(*member);
                }
            }
            NodeState::Primitive(_) | NodeState::Constraints(_) | NodeState::Ref(_) => {}
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            NodeState::Primitive(_) => "primitive",
            NodeState::Constraints(_) => "constraint",
            NodeState::Array(_) => "array",
            NodeState::Function { .. } => "function",
            NodeState::Struct { .. } => "struct",
            NodeState::Ref(_) => "reference",
        }
    }
}

/// Bounds on a node whose type is not fixed yet.
///
/// The eventual type `t` must satisfy `descendant ⊑ t ⊑ ancestor`, and be
/// comparable when `comparable` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Constraints {
    pub descendant: Option<Primitive>,
    pub ancestor: Option<Primitive>,
    pub preferred: Option<Primitive>,
    pub comparable: bool,
}

impl Constraints {
    pub fn new(
        descendant: Option<Primitive>,
        ancestor: Option<Primitive>,
        preferred: Option<Primitive>,
    ) -> Self {
        Self {
            descendant,
            ancestor,
            preferred,
            comparable: false,
        }
    }

    pub fn from_generic(generic: &GenericConstraint) -> Self {
        Self {
            descendant: generic.descendant,
            ancestor: generic.ancestor,
            preferred: generic.preferred,
            comparable: generic.comparable,
        }
    }

    pub fn to_generic(&self) -> GenericConstraint {
        GenericConstraint {
            descendant: self.descendant,
            ancestor: self.ancestor,
            preferred: self.preferred,
            comparable: self.comparable,
        }
    }

    /// No bound at all.
    pub fn is_free(&self) -> bool {
        self.descendant.is_none() && self.ancestor.is_none() && !self.comparable
    }

    /// Whether a composite type satisfies these bounds.
    pub fn accepts_composite(&self) -> bool {
        self.descendant.is_none()
            && !self.comparable
            && matches!(self.ancestor, None | Some(Primitive::Any))
    }

    /// Whether `p` lies within the bounds.
    pub fn fits(&self, p: Primitive) -> bool {
        self.descendant.is_none_or(|d| d.widens_to(p))
            && self.ancestor.is_none_or(|a| p.widens_to(a))
            && (!self.comparable || p.is_comparable())
    }

    /// Whether some concrete primitive lies within the bounds.
    pub fn is_satisfiable(&self) -> bool {
        CONCRETE_ASCENDING.into_iter().any(|p| self.fits(p))
    }

    /// Joins `p` into the descendant bound. Returns `false` when the bounds
    /// become unsatisfiable; `self` is left unchanged in that case.
    pub fn add_descendant(&mut self, p: Primitive) -> bool {
        let descendant = self.descendant.map_or(p, |d| d.lca(p));
        self.try_update(Self {
            descendant: Some(descendant),
            ..self.clone()
        })
    }

    /// Meets `p` into the ancestor bound.
    pub fn add_ancestor(&mut self, p: Primitive) -> bool {
        let ancestor = match self.ancestor {
            None => p,
            Some(a) => match a.gcd(p) {
                Some(meet) => meet,
                None => return false,
            },
        };
        self.try_update(Self {
            ancestor: Some(ancestor),
            ..self.clone()
        })
    }

    pub fn require_comparable(&mut self) -> bool {
        self.try_update(Self {
            comparable: true,
            ..self.clone()
        })
    }

    fn try_update(&mut self, candidate: Self) -> bool {
        if !candidate.is_satisfiable() {
            return false;
        }
        *self = candidate;
        true
    }

    /// Intersection of two bound sets. `self`'s preferred type wins unless
    /// only `other`'s still fits.
    pub fn merge(&self, other: &Constraints) -> Option<Constraints> {
        let descendant = match (self.descendant, other.descendant) {
            (Some(a), Some(b)) => Some(a.lca(b)),
            (a, b) => a.or(b),
        };
        let ancestor = match (self.ancestor, other.ancestor) {
            (Some(a), Some(b)) => Some(a.gcd(b)?),
            (a, b) => a.or(b),
        };
        let mut merged = Constraints {
            descendant,
            ancestor,
            preferred: None,
            comparable: self.comparable || other.comparable,
        };
        if !merged.is_satisfiable() {
            return None;
        }
        merged.preferred = [self.preferred, other.preferred]
            .into_iter()
            .flatten()
            .find(|&p| merged.fits(p))
            .or(self.preferred.or(other.preferred));
        Some(merged)
    }

    /// The single concrete primitive the bounds pin down, if any.
    pub fn pinned(&self) -> Option<Primitive> {
        match (self.descendant, self.ancestor) {
            (Some(d), Some(a)) if d == a && d.is_concrete() && self.fits(d) => Some(d),
            _ => None,
        }
    }

    fn preferred_fit(&self) -> Option<Primitive> {
        self.preferred.filter(|&p| p.is_concrete() && self.fits(p))
    }

    /// Narrowest concrete primitive within the bounds.
    pub fn narrowest(&self) -> Option<Primitive> {
        CONCRETE_ASCENDING.into_iter().find(|&p| self.fits(p))
    }

    /// Widest concrete primitive within the bounds.
    pub fn widest(&self) -> Option<Primitive> {
        CONCRETE_DESCENDING.into_iter().find(|&p| self.fits(p))
    }

    /// Default for a leaf whose values flow outward: preferred, then the
    /// narrowest type above the descendant bound, then `default_type`, then
    /// the widest type below the ancestor bound.
    pub fn solve_covariant(&self, default_type: Primitive) -> Primitive {
        if let Some(p) = self.preferred_fit() {
            return p;
        }
        if self.descendant.is_some() {
            return self.narrowest().unwrap_or(Primitive::Any);
        }
        if default_type.is_concrete() && self.fits(default_type) {
            return default_type;
        }
        self.widest().unwrap_or(Primitive::Any)
    }

    /// Default for a leaf that only receives values: the widest type the
    /// ancestor bound allows.
    pub fn solve_contravariant(&self, default_type: Primitive) -> Primitive {
        if self.comparable && self.ancestor.is_none() {
            return self.solve_covariant(default_type);
        }
        self.widest().unwrap_or(Primitive::Any)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_generic())
    }
}
