//! Solving a constraint graph.
//!
//! Stages, in order:
//! 1. Sort and expand: order the graph, collapse ancestor cycles, spread
//!    composite shapes along edges; repeated until expansion adds nothing.
//! 2. Upward propagation of lower bounds.
//! 3. Downward propagation of upper bounds.
//! 4. Destruction: merge compatible constraint nodes joined by an edge.
//! 5. Finalization.

mod finalize;
mod propagate;
mod shapes;
pub(crate) mod toposort;


use tracing::{Level, debug, trace};

use crate::config::Config;
use crate::dump::GraphPrinter;
use crate::graph::{Graph, NodeId};
use crate::result::TypeInferenceResult;
use crate::{Error, Result};

#[tracing::instrument(skip_all, fields(nodes = graph.len()))]
pub(crate) fn solve(mut graph: Graph, config: &Config) -> Result<TypeInferenceResult> {
    trace_graph(&graph, "initial");

    let order = settle(&mut graph)?;
    debug!(nodes = order.len(), "sorted type graph");
    trace_graph(&graph, "sorted");

    propagate::upward(&mut graph, &order)?;
    trace_graph(&graph, "upward");

    propagate::downward(&mut graph, &order)?;
    trace_graph(&graph, "downward");

    propagate::destruct(&mut graph, &order)?;
    trace_graph(&graph, "destruction");

    finalize::finalize(graph, &order, config)
}

/// Sorts and expands until the graph stops changing. Returns the final
/// order.
pub(crate) fn settle(graph: &mut Graph) -> Result<Vec<NodeId>> {
    let limit = round_limit(graph);
    settle_within(graph, limit)
}

/// At most `n²` rounds for a graph of `n` nodes.
pub(crate) fn round_limit(graph: &Graph) -> usize {
    graph.len().max(1).pow(2)
}

pub(crate) fn settle_within(graph: &mut Graph, limit: usize) -> Result<Vec<NodeId>> {
    for round in 0..limit {
        let order = toposort::sort_within(graph, limit)?;
        if !shapes::expand(graph)? {
            return Ok(order);
        }
        trace!(round, nodes = graph.len(), "expanded composite shapes");
    }
    Err(Error::SolverLimit { iterations: limit })
}

fn trace_graph(graph: &Graph, stage: &str) {
    if tracing::enabled!(Level::TRACE) {
        trace!(stage, "type graph:\n{}", GraphPrinter::new(graph).show_refs(false).dump());
    }
}
