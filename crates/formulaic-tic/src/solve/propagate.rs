//! Bound propagation over primitive and constraint nodes.

use crate::graph::state::NodeState;
use crate::graph::{Graph, NodeId};
use crate::primitive::Primitive;
use crate::Result;

/// Joins every node's lower bound into its ancestors, descendants first.
pub(crate) fn upward(graph: &mut Graph, order: &[NodeId]) -> Result<()> {
    for &id in order {
        let id = graph.resolve(id);
        for ancestor in graph.ancestors(id) {
            push_up(graph, id, ancestor)?;
        }
    }
    Ok(())
}

fn push_up(graph: &mut Graph, descendant: NodeId, ancestor: NodeId) -> Result<()> {
    let lower = match graph.state(descendant) {
        NodeState::Primitive(p) => *p,
        NodeState::Constraints(c) => match c.descendant {
            Some(p) => p,
            None => return Ok(()),
        },
        _ => return Ok(()),
    };

    let accepted = match graph.state(ancestor) {
        NodeState::Primitive(upper) => lower.widens_to(*upper),
        NodeState::Constraints(_) => add_bound(graph, ancestor, |c| c.add_descendant(lower)),
        _ => false,
    };
    if accepted {
        Ok(())
    } else {
        Err(graph.incompatible(descendant, ancestor))
    }
}

/// Meets every node's upper bound into its descendants, ancestors first.
pub(crate) fn downward(graph: &mut Graph, order: &[NodeId]) -> Result<()> {
    for &id in order.iter().rev() {
        let id = graph.resolve(id);
        for ancestor in graph.ancestors(id) {
            push_down(graph, ancestor, id)?;
        }
    }
    Ok(())
}

fn push_down(graph: &mut Graph, ancestor: NodeId, descendant: NodeId) -> Result<()> {
    let (upper, comparable) = match graph.state(ancestor) {
        NodeState::Primitive(p) => (Some(*p), false),
        NodeState::Constraints(c) => (c.ancestor, c.comparable),
        _ => return Ok(()),
    };
    if upper.is_none() && !comparable {
        return Ok(());
    }

    let accepted = match graph.state(descendant) {
        NodeState::Primitive(p) => {
            upper.is_none_or(|u| p.widens_to(u)) && (!comparable || p.is_comparable())
        }
        NodeState::Constraints(_) => add_bound(graph, descendant, |c| {
            upper.is_none_or(|u| c.add_ancestor(u)) && (!comparable || c.require_comparable())
        }),
        _ => upper == Some(Primitive::Any) && !comparable,
    };
    if accepted {
        Ok(())
    } else {
        Err(graph.incompatible(descendant, ancestor))
    }
}

/// Merges pairs of constraint nodes joined by an edge whenever their
/// combined bounds stay satisfiable, ancestors first.
pub(crate) fn destruct(graph: &mut Graph, order: &[NodeId]) -> Result<()> {
    for &id in order.iter().rev() {
        for ancestor in graph.ancestors(id) {
            let descendant = graph.resolve(id);
            let ancestor = graph.resolve(ancestor);
            if descendant == ancestor {
                continue;
            }
            let (Some(lower), Some(upper)) =
                (graph.constraints(descendant), graph.constraints(ancestor))
            else {
                continue;
            };
            if upper.merge(lower).is_some() {
                graph.merge_nodes(ancestor, descendant)?;
            }
        }
    }
    Ok(())
}

/// Tightens a constraint node in place, turning it into a primitive once
/// the bounds pin one down.
fn add_bound(
    graph: &mut Graph,
    id: NodeId,
    apply: impl FnOnce(&mut crate::graph::state::Constraints) -> bool,
) -> bool {
    let Some(bounds) = graph.constraints_mut(id) else {
        return false;
    };
    if !apply(bounds) {
        return false;
    }
    if let Some(p) = bounds.pinned() {
        graph.set_state(id, NodeState::Primitive(p));
    }
    true
}
