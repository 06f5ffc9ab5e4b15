//! Turns the propagated graph into concrete or deliberately generic types.
//!
//! Constraint leaves reachable from a function's return type are kept as
//! generics, unless a script variable reaches them too. Every other
//! constraint gets a default: leaves that only
//! receive values (arguments of function-typed parameters) take the widest
//! type their ancestor bound allows, all remaining ones the narrowest type
//! that holds what flows into them. Each choice is pushed to neighbouring
//! nodes as a bound before the next one is made.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::config::Config;
use crate::graph::state::NodeState;
use crate::graph::{Graph, NodeId};
use crate::primitive::Primitive;
use crate::result::TypeInferenceResult;
use crate::types::{GenericConstraint, Signature, Type};
use crate::{Error, Result};

pub(crate) fn finalize(
    mut graph: Graph,
    order: &[NodeId],
    config: &Config,
) -> Result<TypeInferenceResult> {
    collapse_references(&mut graph)?;

    let mut live: IndexSet<NodeId> = order.iter().map(|&id| graph.resolve(id)).collect();
    for id in graph.ids() {
        if !matches!(graph.state(id), NodeState::Ref(_)) {
            live.insert(id);
        }
    }
    let mut descendants: Vec<Vec<NodeId>> = vec![Vec::new(); graph.len()];
    for &id in &live {
        for ancestor in graph.ancestors(id) {
            descendants[ancestor.index()].push(id);
        }
    }

    let mut surface = IndexSet::new();
    let mut visited = HashSet::new();
    for &output in &graph.outputs {
        collect_leaves(&graph, output, &mut surface, &mut visited);
    }
    // A function used by the script itself is typed for that use.
    let mut bound = IndexSet::new();
    let mut visited = HashSet::new();
    for &global in &graph.globals {
        collect_leaves(&graph, global, &mut bound, &mut visited);
    }
    surface.retain(|id| !bound.contains(id));

    let mut contravariant = IndexSet::new();
    let mut visited = HashSet::new();
    for &input in &graph.inputs {
        let input = graph.resolve(input);
        if let NodeState::Function { args, .. } = graph.state(input) {
            for &arg in args {
                collect_leaves(&graph, arg, &mut contravariant, &mut visited);
            }
        }
    }

    for &id in live.iter().rev() {
        if !contravariant.contains(&id) || surface.contains(&id) {
            continue;
        }
        if let Some(bounds) = graph.constraints(id) {
            let choice = bounds.solve_contravariant(config.default_type);
            fix(&mut graph, id, choice, &descendants)?;
        }
    }
    for &id in &live {
        if surface.contains(&id) {
            continue;
        }
        if let Some(bounds) = graph.constraints(id) {
            let choice = bounds.solve_covariant(config.default_type);
            fix(&mut graph, id, choice, &descendants)?;
        }
    }

    let mut generic_index = HashMap::new();
    let mut generics = Vec::new();
    for &id in &surface {
        if let Some(bounds) = graph.constraints(id) {
            generic_index.insert(id, generics.len() as u32);
            generics.push(bounds.to_generic());
        }
    }
    tracing::debug!(generics = generics.len(), "finalized type graph");

    ResultBuilder {
        graph: &graph,
        generic_index,
        generics,
    }
    .build()
}

/// Points every reference straight at its terminal node and rewrites
/// composite members and ancestor lists to terminal nodes.
fn collapse_references(graph: &mut Graph) -> Result<()> {
    for id in graph.ids() {
        let root = graph.try_resolve(id)?;
        if root != id {
            graph.set_state(id, NodeState::Ref(root));
        }
    }
    for id in graph.ids() {
        let mut state = graph.state(id).clone();
        if state.is_composite() {
            state.map_members(|m| graph.resolve(m));
            graph.set_state(id, state);
        }
        if !matches!(graph.state(id), NodeState::Ref(_)) {
            graph.normalize_ancestors(id);
        }
    }
    Ok(())
}

/// Constraint leaves of the type at `id`.
fn collect_leaves(
    graph: &Graph,
    id: NodeId,
    out: &mut IndexSet<NodeId>,
    visited: &mut HashSet<NodeId>,
) {
    let id = graph.resolve(id);
    if !visited.insert(id) {
        return;
    }
    match graph.state(id) {
        NodeState::Constraints(_) => {
            out.insert(id);
        }
        state if state.is_composite() => {
            for member in graph.members(id) {
                collect_leaves(graph, member, out, visited);
            }
        }
        _ => {}
    }
}

/// Settles `id` to `choice` and narrows its neighbours accordingly.
fn fix(
    graph: &mut Graph,
    id: NodeId,
    choice: Primitive,
    descendants: &[Vec<NodeId>],
) -> Result<()> {
    graph.set_state(id, NodeState::Primitive(choice));

    for ancestor in graph.ancestors(id) {
        let accepted = match graph.constraints_mut(ancestor) {
            Some(bounds) => bounds.add_descendant(choice),
            None => match graph.state(ancestor) {
                NodeState::Primitive(upper) => choice.widens_to(*upper),
                _ => true,
            },
        };
        if !accepted {
            return Err(graph.incompatible(id, ancestor));
        }
        settle_pinned(graph, ancestor);
    }

    for &descendant in &descendants[id.index()] {
        let descendant = graph.resolve(descendant);
        let accepted = match graph.constraints_mut(descendant) {
            Some(bounds) => bounds.add_ancestor(choice),
            None => match graph.state(descendant) {
                NodeState::Primitive(lower) => lower.widens_to(choice),
                _ => true,
            },
        };
        if !accepted {
            return Err(graph.incompatible(descendant, id));
        }
        settle_pinned(graph, descendant);
    }
    Ok(())
}

fn settle_pinned(graph: &mut Graph, id: NodeId) {
    if let Some(p) = graph.constraints(id).and_then(|c| c.pinned()) {
        graph.set_state(id, NodeState::Primitive(p));
    }
}

struct ResultBuilder<'g> {
    graph: &'g Graph,
    generic_index: HashMap<NodeId, u32>,
    generics: Vec<GenericConstraint>,
}

impl ResultBuilder<'_> {
    fn build(self) -> Result<TypeInferenceResult> {
        let graph = self.graph;

        let mut syntax_types = Vec::new();
        for (syntax, id) in graph.syntax_ids() {
            let index = syntax as usize;
            if syntax_types.len() <= index {
                syntax_types.resize(index + 1, None);
            }
            syntax_types[index] = Some(self.type_of(id)?);
        }

        let mut named_types = IndexMap::new();
        for (name, id) in graph.named() {
            named_types.insert(name.to_owned(), self.type_of(id)?);
        }

        let mut functions = IndexMap::new();
        for (name, &id) in &graph.functions {
            let ty = self.type_of(id)?;
            if let Some(signature) = Signature::from_function_type(&ty, &self.generics) {
                functions.insert(name.clone(), signature);
            }
        }

        let mut generic_calls = IndexMap::new();
        for (&call, vars) in &graph.generic_calls {
            let args = vars
                .iter()
                .map(|&var| self.type_of(var))
                .collect::<Result<Vec<_>>>()?;
            generic_calls.insert(call, args);
        }

        Ok(TypeInferenceResult {
            syntax_types,
            named_types,
            generics: self.generics,
            functions,
            generic_calls,
        })
    }

    fn type_of(&self, id: NodeId) -> Result<Type> {
        self.type_at(id, &mut Vec::new())
    }

    fn type_at(&self, id: NodeId, path: &mut Vec<NodeId>) -> Result<Type> {
        let graph = self.graph;
        let id = graph.resolve(id);
        if path.contains(&id) {
            return Err(Error::RecursiveType {
                nodes: path.iter().map(|&n| graph.name(n).clone()).collect(),
            });
        }
        path.push(id);
        let ty = match graph.state(id) {
            NodeState::Primitive(p) => Type::Primitive(*p),
            // Every constraint off the output surface was fixed above.
            NodeState::Constraints(_) => self
                .generic_index
                .get(&id)
                .map_or(Type::Primitive(Primitive::Any), |&index| Type::Generic(index)),
            NodeState::Array(element) => Type::array(self.type_at(*element, path)?),
            NodeState::Function { args, ret } => {
                let mut arg_types = Vec::with_capacity(args.len());
                for &arg in args {
                    arg_types.push(self.type_at(arg, path)?);
                }
                Type::Function {
                    args: arg_types,
                    ret: Box::new(self.type_at(*ret, path)?),
                }
            }
            NodeState::Struct { fields, .. } => {
                let mut field_types = std::collections::BTreeMap::new();
                for (name, &field) in fields {
                    field_types.insert(name.clone(), self.type_at(field, path)?);
                }
                Type::Struct(field_types)
            }
            NodeState::Ref(target) => self.type_at(*target, path)?,
        };
        path.pop();
        Ok(ty)
    }
}
