//! Formulaic TIC: type inference for an embeddable formula language.
//!
//! The host walks its syntax tree and reports every expression to a
//! [`GraphBuilder`], which wires a constraint graph over primitive widening
//! bounds and composite shapes. [`GraphBuilder::solve`] resolves the graph
//! into a [`TypeInferenceResult`].
//!
//! # Example
//!
//! ```
//! use formulaic_tic::{GraphBuilder, IntLiteral, Primitive, Type};
//!
//! // x = 5
//! let mut builder = GraphBuilder::new();
//! builder.bind_int_literal(0, IntLiteral::decimal(5)).unwrap();
//! builder.bind_equation("x", 0).unwrap();
//!
//! let result = builder.solve().unwrap();
//! assert_eq!(result.named_type("x"), Some(&Type::Primitive(Primitive::Real)));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
mod dump;
pub mod events;
mod graph;
pub mod literal;
pub mod primitive;
pub mod result;
mod solve;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use events::{CallTarget, SetupEvent, solve_events};
pub use graph::builder::{Callee, GraphBuilder};
pub use graph::{NodeName, SyntaxId};
pub use literal::{IntLiteral, LiteralBounds, Radix, integer_bounds};
pub use primitive::{ALL_PRIMITIVES, Primitive};
pub use result::TypeInferenceResult;
pub use types::{GenericConstraint, Signature, Type};

/// Errors raised while building or solving a constraint graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An edge `descendant ≤ ancestor` cannot hold.
    #[error("{descendant} ({descendant_type}) is not assignable to {ancestor} ({ancestor_type})")]
    IncompatibleTypes {
        descendant: NodeName,
        descendant_type: String,
        ancestor: NodeName,
        ancestor_type: String,
    },

    /// Two nodes that must share a type have incompatible shapes.
    #[error("cannot unify {first} ({first_type}) with {second} ({second_type})")]
    CannotMerge {
        first: NodeName,
        first_type: String,
        second: NodeName,
        second_type: String,
    },

    /// A type that contains itself, e.g. `a = [a]`.
    #[error("recursive type through {}", join_names(.nodes))]
    RecursiveType { nodes: Vec<NodeName> },

    #[error("function `{name}` is defined twice")]
    DuplicateDefinition { name: String },

    /// A builder call that contradicts what is already known about a node.
    #[error("invalid binding at {node}: {reason}")]
    InvalidBinding { node: NodeName, reason: String },

    #[error("solver did not settle after {iterations} rounds")]
    SolverLimit { iterations: usize },

    #[error("reference cycle at {node}")]
    ReferenceCycle { node: NodeName },
}

impl Error {
    /// Whether the error points at a solver defect rather than at the script.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::SolverLimit { .. } | Error::ReferenceCycle { .. })
    }
}

fn join_names(nodes: &[NodeName]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for graph building and solving.
pub type Result<T> = std::result::Result<T, Error>;
