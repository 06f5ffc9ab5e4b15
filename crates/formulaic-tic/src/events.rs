//! Owned, replayable form of builder calls.
//!
//! A host that keeps the setup as data can apply the same list to several
//! builders, cache it, or ship it around as JSON.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::graph::SyntaxId;
use crate::graph::builder::{Callee, GraphBuilder};
use crate::literal::IntLiteral;
use crate::primitive::Primitive;
use crate::result::TypeInferenceResult;
use crate::types::{Signature, Type};
use crate::Result;

/// Owned counterpart of [`Callee`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTarget {
    Signature(Signature),
    Node(SyntaxId),
    Named(String),
}

impl CallTarget {
    pub fn as_callee(&self) -> Callee<'_> {
        match self {
            CallTarget::Signature(signature) => Callee::Signature(signature),
            CallTarget::Node(node) => Callee::Node(*node),
            CallTarget::Named(name) => Callee::Named(name),
        }
    }
}

/// One builder call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SetupEvent {
    BindVar {
        name: String,
        node: SyntaxId,
    },
    BindConstant {
        node: SyntaxId,
        ty: Type,
    },
    BindInteger {
        node: SyntaxId,
        descendant: Primitive,
        ancestor: Primitive,
        preferred: Primitive,
    },
    BindIntLiteral {
        node: SyntaxId,
        literal: IntLiteral,
    },
    BindIfElse {
        conditions: Vec<SyntaxId>,
        branches: Vec<SyntaxId>,
        result: SyntaxId,
    },
    DeclareVarType {
        name: String,
        ty: Type,
    },
    BindEquation {
        name: String,
        expr: SyntaxId,
    },
    DefineFunction {
        name: String,
        args: Vec<String>,
        body: SyntaxId,
        #[serde(default)]
        declared_ret: Option<Type>,
    },
    RecordCall {
        callee: CallTarget,
        args: Vec<SyntaxId>,
        ret: SyntaxId,
    },
    BindFunctionReference {
        node: SyntaxId,
        signature: Signature,
    },
    BuildArray {
        result: SyntaxId,
        elements: Vec<SyntaxId>,
    },
    BuildLambda {
        body: SyntaxId,
        lambda: SyntaxId,
        args: Vec<String>,
        #[serde(default)]
        declared_ret: Option<Type>,
    },
    BuildStruct {
        result: SyntaxId,
        fields: Vec<(String, SyntaxId)>,
    },
    BindFieldAccess {
        node: SyntaxId,
        field: String,
        result: SyntaxId,
    },
}

impl GraphBuilder {
    /// Performs the builder call `event` describes.
    pub fn apply(&mut self, event: &SetupEvent) -> Result<()> {
        match event {
            SetupEvent::BindVar { name, node } => self.bind_var(name, *node),
            SetupEvent::BindConstant { node, ty } => self.bind_constant(*node, ty),
            SetupEvent::BindInteger {
                node,
                descendant,
                ancestor,
                preferred,
            } => self.bind_integer(*node, *descendant, *ancestor, *preferred),
            SetupEvent::BindIntLiteral { node, literal } => self.bind_int_literal(*node, *literal),
            SetupEvent::BindIfElse {
                conditions,
                branches,
                result,
            } => self.bind_if_else(conditions, branches, *result),
            SetupEvent::DeclareVarType { name, ty } => self.declare_var_type(name, ty),
            SetupEvent::BindEquation { name, expr } => self.bind_equation(name, *expr),
            SetupEvent::DefineFunction {
                name,
                args,
                body,
                declared_ret,
            } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.define_function(name, &args, *body, declared_ret.as_ref())
            }
            SetupEvent::RecordCall { callee, args, ret } => {
                self.record_call(callee.as_callee(), args, *ret)
            }
            SetupEvent::BindFunctionReference { node, signature } => {
                self.bind_function_reference(*node, signature)
            }
            SetupEvent::BuildArray { result, elements } => self.build_array(*result, elements),
            SetupEvent::BuildLambda {
                body,
                lambda,
                args,
                declared_ret,
            } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.build_lambda(*body, *lambda, &args, declared_ret.as_ref())
            }
            SetupEvent::BuildStruct { result, fields } => {
                let fields: Vec<(&str, SyntaxId)> = fields
                    .iter()
                    .map(|(name, value)| (name.as_str(), *value))
                    .collect();
                self.build_struct(*result, &fields)
            }
            SetupEvent::BindFieldAccess {
                node,
                field,
                result,
            } => self.bind_field_access(*node, field, *result),
        }
    }
}

/// Builds a fresh graph from `events` and solves it.
pub fn solve_events(events: &[SetupEvent], config: &Config) -> Result<TypeInferenceResult> {
    let mut builder = GraphBuilder::with_config(config.clone());
    for event in events {
        builder.apply(event)?;
    }
    tracing::debug!(events = events.len(), nodes = builder.node_count(), "applied setup events");
    builder.solve()
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
