//! Cycle-aware ordering of the constraint graph.
//!
//! A node must come after everything that widens into it and after the
//! members of its composite type. Strongly connected components of that
//! relation are either membership cycles (a type containing itself, an
//! error) or ancestor cycles (nodes constraining each other, collapsed into
//! one node).

use std::collections::HashSet;

use tracing::debug;

use crate::graph::state::NodeState;
use crate::graph::{Graph, NodeId, NodeName};
use crate::{Error, Result};

/// Orders all live nodes descendants first, collapsing ancestor cycles.
#[cfg(test)]
pub(crate) fn sort(graph: &mut Graph) -> Result<Vec<NodeId>> {
    let limit = super::round_limit(graph);
    sort_within(graph, limit)
}

/// Like [`sort`], giving up after `limit` attempts.
pub(crate) fn sort_within(graph: &mut Graph, limit: usize) -> Result<Vec<NodeId>> {
    for _ in 0..limit {
        let successors = successors(graph);
        let sccs = SccFinder::find(graph, &successors);

        let mut cycles = Vec::new();
        for scc in &sccs {
            if let Some(nodes) = membership_cycle(graph, scc) {
                return Err(Error::RecursiveType { nodes });
            }
            if scc.len() > 1 {
                cycles.push(scc.clone());
            }
        }

        if cycles.is_empty() {
            return Ok(sccs.into_iter().rev().flatten().collect());
        }
        for cycle in cycles {
            collapse(graph, &cycle)?;
        }
    }
    Err(Error::SolverLimit { iterations: limit })
}

/// Successor lists: ancestors plus composites containing the node.
fn successors(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut out = vec![Vec::new(); graph.len()];
    for id in graph.ids() {
        if matches!(graph.state(id), NodeState::Ref(_)) {
            continue;
        }
        out[id.index()].extend(graph.ancestors(id));
    }
    for id in graph.ids() {
        if !graph.state(id).is_composite() {
            continue;
        }
        for member in graph.members(id) {
            let list = &mut out[member.index()];
            if !list.contains(&id) {
                list.push(id);
            }
        }
    }
    out
}

fn membership_cycle(graph: &Graph, scc: &[NodeId]) -> Option<Vec<NodeName>> {
    let set: HashSet<NodeId> = scc.iter().copied().collect();
    let contains_member = scc.iter().any(|&id| {
        graph.state(id).is_composite() && graph.members(id).iter().any(|m| set.contains(m))
    });
    contains_member.then(|| scc.iter().map(|&id| graph.name(id).clone()).collect())
}

/// Merges an ancestor cycle into one node.
fn collapse(graph: &mut Graph, cycle: &[NodeId]) -> Result<()> {
    debug!(size = cycle.len(), "collapsing ancestor cycle");
    let main = cycle
        .iter()
        .copied()
        .find(|&id| matches!(graph.name(id), NodeName::Named(_)))
        .unwrap_or(cycle[0]);
    for &id in cycle {
        graph.merge_nodes(main, id)?;
    }
    graph.normalize_ancestors(main);
    Ok(())
}

/// Tarjan's algorithm. Components come out sinks first.
struct SccFinder<'a> {
    successors: &'a [Vec<NodeId>],
    index: usize,
    stack: Vec<NodeId>,
    on_stack: Vec<bool>,
    indices: Vec<Option<usize>>,
    lowlinks: Vec<usize>,
    sccs: Vec<Vec<NodeId>>,
}

impl<'a> SccFinder<'a> {
    fn find(graph: &Graph, successors: &'a [Vec<NodeId>]) -> Vec<Vec<NodeId>> {
        let n = graph.len();
        let mut finder = Self {
            successors,
            index: 0,
            stack: Vec::new(),
            on_stack: vec![false; n],
            indices: vec![None; n],
            lowlinks: vec![0; n],
            sccs: Vec::new(),
        };

        for id in graph.ids() {
            if matches!(graph.state(id), NodeState::Ref(_)) {
                continue;
            }
            if finder.indices[id.index()].is_none() {
                finder.strongconnect(id);
            }
        }

        finder.sccs
    }

    /// Visits everything reachable from `root`. Frames on the work stack
    /// hold a node and the position of its next successor.
    fn strongconnect(&mut self, root: NodeId) {
        let successors = self.successors;
        self.visit(root);
        let mut work = vec![(root, 0)];

        while let Some((node, cursor)) = work.pop() {
            let v = node.index();
            if let Some(&next) = successors[v].get(cursor) {
                work.push((node, cursor + 1));
                let w = next.index();
                match self.indices[w] {
                    None => {
                        self.visit(next);
                        work.push((next, 0));
                    }
                    Some(index) if self.on_stack[w] => {
                        self.lowlinks[v] = self.lowlinks[v].min(index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            if let Some(&(parent, _)) = work.last() {
                let p = parent.index();
                self.lowlinks[p] = self.lowlinks[p].min(self.lowlinks[v]);
            }
            if Some(self.lowlinks[v]) == self.indices[v] {
                let mut scc = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w.index()] = false;
                    scc.push(w);
                    if w == node {
                        break;
                    }
                }
                scc.reverse();
                self.sccs.push(scc);
            }
        }
    }

    fn visit(&mut self, node: NodeId) {
        let v = node.index();
        self.indices[v] = Some(self.index);
        self.lowlinks[v] = self.index;
        self.index += 1;
        self.stack.push(node);
        self.on_stack[v] = true;
    }
}
