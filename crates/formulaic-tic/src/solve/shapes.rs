//! Spreads composite shapes along ancestor edges.
//!
//! After expansion every ancestor edge touching a composite joins two
//! composites of the same shape, and their members are related by edges of
//! their own: array elements and function returns covariantly, function
//! arguments contravariantly, struct fields covariantly for every field the
//! ancestor names. An open struct lacking one of those fields gains a fresh
//! member for it. Bound propagation then only deals with primitives.

use std::collections::BTreeMap;

use crate::graph::state::NodeState;
use crate::graph::{Graph, NodeId};
use crate::primitive::Primitive;
use crate::Result;

/// One sweep over the graph. Returns whether any node or edge was added.
pub(crate) fn expand(graph: &mut Graph) -> Result<bool> {
    let mut changed = false;
    for id in graph.ids() {
        if matches!(graph.state(id), NodeState::Ref(_)) {
            continue;
        }
        for ancestor in graph.ancestors(id) {
            changed |= expand_edge(graph, id, ancestor)?;
        }
    }
    Ok(changed)
}

fn expand_edge(graph: &mut Graph, descendant: NodeId, ancestor: NodeId) -> Result<bool> {
    let lower = graph.state(descendant);
    let upper = graph.state(ancestor);
    match (lower.is_composite(), upper.is_composite()) {
        (false, false) => Ok(false),
        (true, true) => relate(graph, descendant, ancestor),
        (true, false) => match upper {
            NodeState::Primitive(Primitive::Any) => Ok(false),
            NodeState::Constraints(c) if c.accepts_composite() => {
                adopt_shape(graph, ancestor, descendant);
                relate(graph, descendant, ancestor)?;
                Ok(true)
            }
            _ => Err(graph.incompatible(descendant, ancestor)),
        },
        (false, true) => match lower {
            NodeState::Constraints(c) if c.accepts_composite() => {
                adopt_shape(graph, descendant, ancestor);
                relate(graph, descendant, ancestor)?;
                Ok(true)
            }
            _ => Err(graph.incompatible(descendant, ancestor)),
        },
    }
}

/// Gives `target` the shape of `model` with fresh members.
fn adopt_shape(graph: &mut Graph, target: NodeId, model: NodeId) {
    let shape = match graph.state(model).clone() {
        NodeState::Array(_) => NodeState::Array(graph.fresh_var()),
        NodeState::Function { args, .. } => NodeState::Function {
            args: args.iter().map(|_| graph.fresh_var()).collect(),
            ret: graph.fresh_var(),
        },
        NodeState::Struct { fields, .. } => NodeState::Struct {
            fields: fields
                .keys()
                .map(|name| (name.clone(), graph.fresh_var()))
                .collect::<BTreeMap<_, _>>(),
            open: true,
        },
        other => other,
    };
    graph.set_state(target, shape);
}

/// Relates the members of two composites joined by `descendant ≤ ancestor`.
fn relate(graph: &mut Graph, descendant: NodeId, ancestor: NodeId) -> Result<bool> {
    let mut added = false;
    match (graph.state(descendant).clone(), graph.state(ancestor).clone()) {
        (NodeState::Array(lower), NodeState::Array(upper)) => {
            added |= graph.add_ancestor(lower, upper);
        }
        (
            NodeState::Function {
                args: lower_args,
                ret: lower_ret,
            },
            NodeState::Function {
                args: upper_args,
                ret: upper_ret,
            },
        ) if lower_args.len() == upper_args.len() => {
            for (&lower, &upper) in lower_args.iter().zip(&upper_args) {
                added |= graph.add_ancestor(upper, lower);
            }
            added |= graph.add_ancestor(lower_ret, upper_ret);
        }
        (
            NodeState::Struct {
                fields: mut lower,
                open,
            },
            NodeState::Struct { fields: upper, .. },
        ) => {
            let mut grown = false;
            for (name, &field) in &upper {
                let own = match lower.get(name) {
                    Some(&own) => own,
                    None if open => {
                        let own = graph.fresh_var();
                        lower.insert(name.clone(), own);
                        grown = true;
                        own
                    }
                    None => return Err(graph.incompatible(descendant, ancestor)),
                };
                added |= graph.add_ancestor(own, field);
            }
            if grown {
                graph.set_state(
                    descendant,
                    NodeState::Struct {
                        fields: lower,
                        open,
                    },
                );
                added = true;
            }
        }
        _ => return Err(graph.incompatible(descendant, ancestor)),
    }
    Ok(added)
}
