//! Dump helpers for graph inspection and testing.

use std::fmt::Write;

use crate::graph::state::NodeState;
use crate::graph::{Graph, NodeId};

/// Printer for a constraint graph, one node per line:
///
/// ```text
/// x: [uint8..real] ~real <: #1
/// #0 -> x
/// ```
///
/// Composite members are printed by name, so shared structure stays visible.
pub(crate) struct GraphPrinter<'a> {
    graph: &'a Graph,
    show_refs: bool,
}

impl<'a> GraphPrinter<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            show_refs: true,
        }
    }

    /// Whether nodes merged into others get a line of their own.
    pub fn show_refs(mut self, show: bool) -> Self {
        self.show_refs = show;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        let graph = self.graph;
        for id in graph.ids() {
            let name = graph.name(id);
            if let NodeState::Ref(target) = graph.state(id) {
                if self.show_refs {
                    writeln!(w, "{name} -> {}", graph.name(graph.resolve(*target)))?;
                }
                continue;
            }

            write!(w, "{name}: ")?;
            self.format_state(w, graph.state(id))?;
            let ancestors = graph.ancestors(id);
            if !ancestors.is_empty() {
                w.write_str(" <: ")?;
                self.format_names(w, &ancestors)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn format_state(&self, w: &mut String, state: &NodeState) -> std::fmt::Result {
        match state {
            NodeState::Primitive(p) => write!(w, "{p}"),
            NodeState::Constraints(c) => write!(w, "{c}"),
            NodeState::Array(element) => {
                self.format_names(w, &[*element])?;
                w.write_str("[]")
            }
            NodeState::Function { args, ret } => {
                w.write_str("(")?;
                self.format_names(w, args)?;
                w.write_str(")->")?;
                self.format_names(w, &[*ret])
            }
            NodeState::Struct { fields, .. } => {
                w.write_str("{")?;
                for (i, (field, &member)) in fields.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    write!(w, "{field}:")?;
                    self.format_names(w, &[member])?;
                }
                w.write_str("}")
            }
            NodeState::Ref(target) => write!(w, "-> {}", self.graph.name(*target)),
        }
    }

    fn format_names(&self, w: &mut String, ids: &[NodeId]) -> std::fmt::Result {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                w.write_str(", ")?;
            }
            write!(w, "{}", self.graph.name(self.graph.resolve(id)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dump_tests.rs"]
mod dump_tests;
