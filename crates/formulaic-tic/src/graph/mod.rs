//! Constraint graph: an arena of type nodes joined by ancestor edges.
//!
//! A node is addressed by a syntax order number, a variable or function
//! name, or an internal type variable. Edges point from a node to the nodes
//! it must be assignable to. Merging two nodes leaves the secondary as a
//! `Ref` to the main node; readers resolve ids through [`Graph::resolve`].

pub(crate) mod builder;
mod lower;
pub(crate) mod state;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod state_tests;

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{Error, Result};
use state::{Constraints, NodeState};

/// Syntax node order number assigned by the host.
pub type SyntaxId = u32;

/// Index of a node in the graph arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a node is known to the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NodeName {
    /// Expression node, by order number.
    Syntax(SyntaxId),
    /// Variable, argument or function.
    Named(String),
    /// Type variable introduced by the solver.
    TypeVar(u32),
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeName::Syntax(id) => write!(f, "#{id}"),
            NodeName::Named(name) => f.write_str(name),
            NodeName::TypeVar(n) => write!(f, "V{n}"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub name: NodeName,
    pub state: NodeState,
    /// Nodes this one must be assignable to.
    pub ancestors: Vec<NodeId>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Graph {
    nodes: Vec<Node>,
    syntax: Vec<Option<NodeId>>,
    named: IndexMap<String, NodeId>,
    type_vars: u32,
    /// Return nodes of defined functions.
    pub outputs: Vec<NodeId>,
    /// Argument nodes of defined functions.
    pub inputs: Vec<NodeId>,
    /// Variables defined by script equations.
    pub globals: Vec<NodeId>,
    /// Defined functions by name.
    pub functions: IndexMap<String, NodeId>,
    /// Instantiated generic variables per call site.
    pub generic_calls: IndexMap<SyntaxId, Vec<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn state(&self, id: NodeId) -> &NodeState {
        &self.nodes[id.index()].state
    }

    pub fn set_state(&mut self, id: NodeId, state: NodeState) {
        self.nodes[id.index()].state = state;
    }

    pub fn name(&self, id: NodeId) -> &NodeName {
        &self.nodes[id.index()].name
    }

    fn push(&mut self, name: NodeName, state: NodeState) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            state,
            ancestors: Vec::new(),
        });
        id
    }

    /// Node for a syntax order number, created on first use.
    pub fn syntax_node(&mut self, syntax: SyntaxId) -> NodeId {
        let index = syntax as usize;
        if index >= self.syntax.len() {
            self.syntax.resize(index + 1, None);
        }
        if let Some(id) = self.syntax[index] {
            return id;
        }
        let id = self.push(NodeName::Syntax(syntax), NodeState::free());
        self.syntax[index] = Some(id);
        id
    }

    /// Node for a variable or function name, created on first use.
    pub fn named_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.named.get(name) {
            return id;
        }
        let id = self.push(NodeName::Named(name.to_owned()), NodeState::free());
        self.named.insert(name.to_owned(), id);
        id
    }

    #[cfg(test)]
    pub fn lookup_named(&self, name: &str) -> Option<NodeId> {
        self.named.get(name).copied()
    }

    pub fn named(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.named.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn syntax_ids(&self) -> impl Iterator<Item = (SyntaxId, NodeId)> + '_ {
        self.syntax
            .iter()
            .enumerate()
            .filter_map(|(i, id)| id.map(|id| (i as SyntaxId, id)))
    }

    pub fn type_var(&mut self, state: NodeState) -> NodeId {
        let n = self.type_vars;
        self.type_vars += 1;
        self.push(NodeName::TypeVar(n), state)
    }

    pub fn fresh_var(&mut self) -> NodeId {
        self.type_var(NodeState::free())
    }

    /// Follows references to the terminal node.
    pub fn resolve(&self, mut id: NodeId) -> NodeId {
        for _ in 0..=self.nodes.len() {
            match self.nodes[id.index()].state {
                NodeState::Ref(target) => id = target,
                _ => return id,
            }
        }
        id
    }

    /// Like [`Graph::resolve`], but reports a reference cycle.
    pub fn try_resolve(&self, mut id: NodeId) -> Result<NodeId> {
        for _ in 0..=self.nodes.len() {
            match self.nodes[id.index()].state {
                NodeState::Ref(target) => id = target,
                _ => return Ok(id),
            }
        }
        Err(Error::ReferenceCycle {
            node: self.name(id).clone(),
        })
    }

    /// Records `descendant ≤ ancestor`. Returns whether the edge is new.
    pub fn add_ancestor(&mut self, descendant: NodeId, ancestor: NodeId) -> bool {
        let descendant = self.resolve(descendant);
        let ancestor = self.resolve(ancestor);
        if descendant == ancestor {
            return false;
        }
        let list = &mut self.nodes[descendant.index()].ancestors;
        if list.contains(&ancestor) {
            return false;
        }
        list.push(ancestor);
        true
    }

    /// Resolved ancestors of `id`, without duplicates or self edges.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let id = self.resolve(id);
        let mut out = Vec::new();
        for &a in &self.nodes[id.index()].ancestors {
            let a = self.resolve(a);
            if a != id && !out.contains(&a) {
                out.push(a);
            }
        }
        out
    }

    /// Rewrites the ancestor list of `id` to resolved, distinct entries.
    pub fn normalize_ancestors(&mut self, id: NodeId) {
        let id = self.resolve(id);
        let resolved = self.ancestors(id);
        self.nodes[id.index()].ancestors = resolved;
    }

    /// Resolved members of a composite node.
    pub fn members(&self, id: NodeId) -> Vec<NodeId> {
        self.state(id)
            .members()
            .into_iter()
            .map(|m| self.resolve(m))
            .collect()
    }

    /// Merges two nodes, preferring a named node or type variable over a
    /// syntax node as the representative.
    pub fn unify(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let a = self.resolve(a);
        let b = self.resolve(b);
        let a_syntax = matches!(self.name(a), NodeName::Syntax(_));
        let b_syntax = matches!(self.name(b), NodeName::Syntax(_));
        if a_syntax && !b_syntax {
            self.merge_nodes(b, a)
        } else {
            self.merge_nodes(a, b)
        }
    }

    /// Makes `secondary` a reference to `main`, joining their states and
    /// moving the secondary's ancestor edges over.
    pub fn merge_nodes(&mut self, main: NodeId, secondary: NodeId) -> Result<NodeId> {
        let main = self.resolve(main);
        let secondary = self.resolve(secondary);
        if main == secondary {
            return Ok(main);
        }

        let main_state = self.state(main).clone();
        let secondary_state =
            std::mem::replace(&mut self.nodes[secondary.index()].state, NodeState::Ref(main));
        let moved = std::mem::take(&mut self.nodes[secondary.index()].ancestors);

        let merged = self.merge_states(main, secondary, &main_state, &secondary_state)?;
        if let NodeState::Ref(_) = self.state(main) {
            // Absorbed while merging members: fold the result into the new root.
            let root = self.resolve(main);
            let folded = self.type_var(merged);
            self.merge_nodes(root, folded)?;
        } else {
            self.set_state(main, merged);
        }

        for ancestor in moved {
            self.add_ancestor(main, ancestor);
        }
        self.normalize_ancestors(main);
        Ok(main)
    }

    fn merge_states(
        &mut self,
        main: NodeId,
        secondary: NodeId,
        a: &NodeState,
        b: &NodeState,
    ) -> Result<NodeState> {
        use NodeState::*;

        let merged = match (a, b) {
            (Ref(target), other) | (other, Ref(target)) => {
                let target = self.state(self.resolve(*target)).clone();
                return self.merge_states(main, secondary, &target, other);
            }
            (Primitive(p), Primitive(q)) => (p == q).then_some(Primitive(*p)),
            (Primitive(p), Constraints(c)) | (Constraints(c), Primitive(p)) => {
                c.fits(*p).then_some(Primitive(*p))
            }
            (Constraints(x), Constraints(y)) => x.merge(y).map(|c| match c.pinned() {
                Some(p) => Primitive(p),
                None => Constraints(c),
            }),
            (Constraints(c), composite) | (composite, Constraints(c))
                if composite.is_composite() =>
            {
                c.accepts_composite().then(|| composite.clone())
            }
            (Array(x), Array(y)) => Some(Array(self.merge_nodes(*x, *y)?)),
            (
                Function { args: a1, ret: r1 },
                Function { args: a2, ret: r2 },
            ) if a1.len() == a2.len() => {
                let mut args = Vec::with_capacity(a1.len());
                for (x, y) in a1.iter().zip(a2) {
                    args.push(self.merge_nodes(*x, *y)?);
                }
                let ret = self.merge_nodes(*r1, *r2)?;
                Some(Function { args, ret })
            }
            (
                Struct {
                    fields: f1,
                    open: o1,
                },
                Struct {
                    fields: f2,
                    open: o2,
                },
            ) => self.merge_structs(f1, *o1, f2, *o2)?,
            _ => None,
        };

        merged.ok_or_else(|| Error::CannotMerge {
            first: self.name(main).clone(),
            first_type: self.describe_state(a),
            second: self.name(secondary).clone(),
            second_type: self.describe_state(b),
        })
    }

    /// Two closed structs keep their common fields and two open ones
    /// collect every field. An open struct merged into a closed one must
    /// name only fields the closed one has.
    fn merge_structs(
        &mut self,
        f1: &BTreeMap<String, NodeId>,
        o1: bool,
        f2: &BTreeMap<String, NodeId>,
        o2: bool,
    ) -> Result<Option<NodeState>> {
        let keep: Vec<&String> = match (o1, o2) {
            (false, false) => f1.keys().filter(|name| f2.contains_key(*name)).collect(),
            (true, true) => f1.keys().chain(f2.keys()).collect(),
            (true, false) if f1.keys().all(|name| f2.contains_key(name)) => f2.keys().collect(),
            (false, true) if f2.keys().all(|name| f1.contains_key(name)) => f1.keys().collect(),
            _ => return Ok(None),
        };

        let mut fields = BTreeMap::new();
        for name in keep {
            if fields.contains_key(name) {
                continue;
            }
            let member = match (f1.get(name), f2.get(name)) {
                (Some(&x), Some(&y)) => self.merge_nodes(x, y)?,
                (Some(&x), None) | (None, Some(&x)) => x,
                (None, None) => continue,
            };
            fields.insert(name.clone(), member);
        }
        Ok(Some(NodeState::Struct {
            fields,
            open: o1 && o2,
        }))
    }

    /// Error for a failed `descendant ≤ ancestor` edge.
    pub fn incompatible(&self, descendant: NodeId, ancestor: NodeId) -> Error {
        Error::IncompatibleTypes {
            descendant: self.name(descendant).clone(),
            descendant_type: self.describe(descendant),
            ancestor: self.name(ancestor).clone(),
            ancestor_type: self.describe(ancestor),
        }
    }

    /// Short rendering of a node's current type, for messages and dumps.
    pub fn describe(&self, id: NodeId) -> String {
        self.describe_at(id, 0)
    }

    fn describe_at(&self, id: NodeId, depth: usize) -> String {
        if depth > 4 {
            return "..".to_owned();
        }
        let id = self.resolve(id);
        self.describe_state_at(self.state(id), depth)
    }

    pub fn describe_state(&self, state: &NodeState) -> String {
        self.describe_state_at(state, 0)
    }

    fn describe_state_at(&self, state: &NodeState, depth: usize) -> String {
        match state {
            NodeState::Primitive(p) => p.to_string(),
            NodeState::Constraints(c) => c.to_string(),
            NodeState::Array(element) => format!("{}[]", self.describe_at(*element, depth + 1)),
            NodeState::Function { args, ret } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|a| self.describe_at(*a, depth + 1))
                    .collect();
                format!("({})->{}", args.join(", "), self.describe_at(*ret, depth + 1))
            }
            NodeState::Struct { fields, .. } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(name, id)| format!("{name}:{}", self.describe_at(*id, depth + 1)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            NodeState::Ref(target) => self.describe_at(*target, depth),
        }
    }

    /// Constraint bounds of a resolved node, if it still has any.
    pub fn constraints(&self, id: NodeId) -> Option<&Constraints> {
        self.state(id).as_constraints()
    }

    pub fn constraints_mut(&mut self, id: NodeId) -> Option<&mut Constraints> {
        match &mut self.nodes[id.index()].state {
            NodeState::Constraints(c) => Some(c),
            _ => None,
        }
    }
}
