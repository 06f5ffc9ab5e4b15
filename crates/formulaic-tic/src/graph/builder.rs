//! Syntax-level operations that wire the constraint graph.
//!
//! The host calls one operation per syntax node, in any order: nodes are
//! created on first reference. Each operation either records an edge or
//! merges nodes immediately, so shape conflicts between explicit bindings
//! surface at the call site.

use std::collections::BTreeMap;

use tracing::trace;

use crate::config::Config;
use crate::primitive::Primitive;
use crate::result::TypeInferenceResult;
use crate::types::{Signature, Type};
use crate::{Error, Result};

use super::state::{Constraints, NodeState};
use super::{Graph, NodeId, NodeName, SyntaxId};

/// What a call expression invokes.
#[derive(Clone, Copy, Debug)]
pub enum Callee<'a> {
    /// A function with a known signature, e.g. a built-in.
    Signature(&'a Signature),
    /// The value of another expression.
    Node(SyntaxId),
    /// A user function or a variable holding a function.
    Named(&'a str),
}

/// Builds a constraint graph and solves it.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    pub(crate) graph: Graph,
    pub(crate) config: Config,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            graph: Graph::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// A use of variable `name` at `node`: the variable widens to the use.
    pub fn bind_var(&mut self, name: &str, node: SyntaxId) -> Result<()> {
        trace!(name, node, "bind variable");
        let id = self.resolved_syntax(node);
        if !matches!(self.graph.state(id), NodeState::Constraints(_)) {
            return Err(Error::InvalidBinding {
                node: NodeName::Syntax(node),
                reason: format!(
                    "variable `{name}` used where a {} is already bound",
                    self.graph.state(id).shape_name()
                ),
            });
        }
        let named = self.graph.named_node(name);
        self.graph.add_ancestor(named, id);
        Ok(())
    }

    /// Forces `node` to a concrete type.
    pub fn bind_constant(&mut self, node: SyntaxId, ty: &Type) -> Result<()> {
        trace!(node, %ty, "bind constant");
        let id = self.graph.syntax_node(node);
        let value = self.graph.lower_concrete(ty, &NodeName::Syntax(node))?;
        self.graph.merge_nodes(id, value)?;
        Ok(())
    }

    /// Integer literal adapting to its context.
    pub fn bind_integer(
        &mut self,
        node: SyntaxId,
        descendant: Primitive,
        ancestor: Primitive,
        preferred: Primitive,
    ) -> Result<()> {
        trace!(node, %descendant, %ancestor, %preferred, "bind integer");
        let bounds = Constraints::new(Some(descendant), Some(ancestor), Some(preferred));
        if !bounds.is_satisfiable() {
            return Err(Error::InvalidBinding {
                node: NodeName::Syntax(node),
                reason: format!("literal bounds {bounds} admit no type"),
            });
        }
        let state = match bounds.pinned() {
            Some(p) => NodeState::Primitive(p),
            None => NodeState::Constraints(bounds),
        };
        let id = self.graph.syntax_node(node);
        let literal = self.graph.type_var(state);
        self.graph.merge_nodes(id, literal)?;
        Ok(())
    }

    /// `if c1 then b1 if c2 then b2 else b3`: conditions are `bool`, the
    /// result is one type shared by all branches.
    pub fn bind_if_else(
        &mut self,
        conditions: &[SyntaxId],
        branches: &[SyntaxId],
        result: SyntaxId,
    ) -> Result<()> {
        trace!(?conditions, ?branches, result, "bind if-else");
        for &condition in conditions {
            let id = self.graph.syntax_node(condition);
            let boolean = self.graph.type_var(NodeState::Primitive(Primitive::Bool));
            self.graph.merge_nodes(id, boolean)?;
        }
        let result = self.graph.syntax_node(result);
        for &branch in branches {
            let id = self.graph.syntax_node(branch);
            self.graph.unify(result, id)?;
        }
        Ok(())
    }

    /// Declared type of a variable or argument, e.g. `x:int32`.
    pub fn declare_var_type(&mut self, name: &str, ty: &Type) -> Result<()> {
        trace!(name, %ty, "declare variable type");
        let named = self.graph.named_node(name);
        let value = self.graph.lower_concrete(ty, &NodeName::Named(name.to_owned()))?;
        self.graph.merge_nodes(named, value)?;
        Ok(())
    }

    /// `name = expr`.
    pub fn bind_equation(&mut self, name: &str, expr: SyntaxId) -> Result<()> {
        trace!(name, expr, "bind equation");
        let value = self.resolved_syntax(expr);
        let named = self.graph.named_node(name);
        let named = self.graph.resolve(named);
        if let NodeState::Primitive(p) = *self.graph.state(value)
            && let Some(bounds) = self.graph.constraints_mut(named)
            && bounds.preferred.is_none()
        {
            bounds.preferred = Some(p);
        }
        self.graph.add_ancestor(value, named);
        self.graph.globals.push(named);
        Ok(())
    }

    /// `name(args) = body`, optionally with a declared return type.
    pub fn define_function(
        &mut self,
        name: &str,
        args: &[&str],
        body: SyntaxId,
        declared_ret: Option<&Type>,
    ) -> Result<()> {
        trace!(name, ?args, body, "define function");
        if self.graph.functions.contains_key(name) {
            return Err(Error::DuplicateDefinition {
                name: name.to_owned(),
            });
        }
        let function = self.graph.named_node(name);
        let function = self.graph.resolve(function);
        let forward = match self.graph.state(function) {
            NodeState::Constraints(c) if c.is_free() && c.preferred.is_none() => false,
            NodeState::Function { args: params, .. } if params.len() == args.len() => true,
            _ => {
                return Err(Error::DuplicateDefinition {
                    name: name.to_owned(),
                });
            }
        };

        let params: Vec<NodeId> = args.iter().map(|arg| self.graph.named_node(arg)).collect();
        let body = self.graph.syntax_node(body);
        let ret = match declared_ret {
            Some(ty) => {
                let ret = self
                    .graph
                    .lower_concrete(ty, &NodeName::Named(name.to_owned()))?;
                self.graph.add_ancestor(body, ret);
                ret
            }
            None => body,
        };

        let shape = NodeState::Function {
            args: params.clone(),
            ret,
        };
        if forward {
            let defined = self.graph.type_var(shape);
            self.graph.merge_nodes(function, defined)?;
        } else {
            self.graph.set_state(function, shape);
        }

        self.graph.outputs.push(ret);
        self.graph.inputs.extend(params);
        self.graph.functions.insert(name.to_owned(), function);
        Ok(())
    }

    /// `callee(args)` producing `ret`.
    pub fn record_call(
        &mut self,
        callee: Callee<'_>,
        args: &[SyntaxId],
        ret: SyntaxId,
    ) -> Result<()> {
        trace!(?callee, ?args, ret, "record call");
        let arg_ids: Vec<NodeId> = args.iter().map(|&a| self.graph.syntax_node(a)).collect();
        let ret_id = self.graph.syntax_node(ret);
        match callee {
            Callee::Signature(signature) => {
                self.call_signature(signature, &arg_ids, ret_id, ret)
            }
            Callee::Node(node) => {
                let function = self.graph.syntax_node(node);
                self.call_function_node(function, &arg_ids, ret_id)
            }
            Callee::Named(name) => {
                let function = self.graph.named_node(name);
                self.call_function_node(function, &arg_ids, ret_id)
            }
        }
    }

    fn call_signature(
        &mut self,
        signature: &Signature,
        args: &[NodeId],
        ret: NodeId,
        ret_syntax: SyntaxId,
    ) -> Result<()> {
        let origin = NodeName::Syntax(ret_syntax);
        if signature.arity() != args.len() {
            return Err(Error::InvalidBinding {
                node: origin,
                reason: format!(
                    "`{signature}` expects {} arguments, got {}",
                    signature.arity(),
                    args.len()
                ),
            });
        }
        let generics = self.graph.instantiate(signature);
        for (&arg, ty) in args.iter().zip(&signature.args) {
            let param = self.graph.lower(ty, &generics, &origin)?;
            self.graph.add_ancestor(arg, param);
        }
        let returned = self.graph.lower(&signature.ret, &generics, &origin)?;
        self.graph.merge_nodes(ret, returned)?;
        if !generics.is_empty() {
            self.graph.generic_calls.insert(ret_syntax, generics);
        }
        Ok(())
    }

    fn call_function_node(&mut self, function: NodeId, args: &[NodeId], ret: NodeId) -> Result<()> {
        let function = self.graph.resolve(function);
        match self.graph.state(function).clone() {
            NodeState::Function { args: params, ret: returned } => {
                if params.len() != args.len() {
                    return Err(Error::InvalidBinding {
                        node: self.graph.name(function).clone(),
                        reason: format!(
                            "function expects {} arguments, got {}",
                            params.len(),
                            args.len()
                        ),
                    });
                }
                for (&arg, &param) in args.iter().zip(&params) {
                    self.graph.add_ancestor(arg, param);
                }
                self.graph.merge_nodes(returned, ret)?;
            }
            NodeState::Constraints(c) if c.accepts_composite() => {
                let params: Vec<NodeId> = args.iter().map(|_| self.graph.fresh_var()).collect();
                for (&arg, &param) in args.iter().zip(&params) {
                    self.graph.add_ancestor(arg, param);
                }
                self.graph
                    .set_state(function, NodeState::Function { args: params, ret });
            }
            other => {
                return Err(Error::InvalidBinding {
                    node: self.graph.name(function).clone(),
                    reason: format!("a {} cannot be called", other.shape_name()),
                });
            }
        }
        Ok(())
    }

    /// A generic function used as a value, e.g. `map(xs, abs)`.
    pub fn bind_function_reference(&mut self, node: SyntaxId, signature: &Signature) -> Result<()> {
        trace!(node, %signature, "bind function reference");
        let id = self.graph.syntax_node(node);
        let generics = self.graph.instantiate(signature);
        let ty = Type::Function {
            args: signature.args.clone(),
            ret: Box::new(signature.ret.clone()),
        };
        let value = self.graph.lower(&ty, &generics, &NodeName::Syntax(node))?;
        self.graph.merge_nodes(id, value)?;
        if !generics.is_empty() {
            self.graph.generic_calls.insert(node, generics);
        }
        Ok(())
    }

    /// `[e1, e2, ...]`: one element type shared by every element.
    pub fn build_array(&mut self, result: SyntaxId, elements: &[SyntaxId]) -> Result<()> {
        trace!(result, ?elements, "build array");
        let element = self.graph.fresh_var();
        for &e in elements {
            let id = self.graph.syntax_node(e);
            self.graph.unify(element, id)?;
        }
        let id = self.graph.syntax_node(result);
        let array = self.graph.type_var(NodeState::Array(element));
        self.graph.merge_nodes(id, array)?;
        Ok(())
    }

    /// `(args) => body` or `(args):ty => body`.
    pub fn build_lambda(
        &mut self,
        body: SyntaxId,
        lambda: SyntaxId,
        args: &[&str],
        declared_ret: Option<&Type>,
    ) -> Result<()> {
        trace!(body, lambda, ?args, "build lambda");
        let params: Vec<NodeId> = args.iter().map(|arg| self.graph.named_node(arg)).collect();
        let body = self.graph.syntax_node(body);
        let ret = match declared_ret {
            Some(ty) => {
                let ret = self.graph.lower_concrete(ty, &NodeName::Syntax(lambda))?;
                self.graph.add_ancestor(body, ret);
                ret
            }
            None => body,
        };
        let id = self.graph.syntax_node(lambda);
        let function = self
            .graph
            .type_var(NodeState::Function { args: params, ret });
        self.graph.merge_nodes(id, function)?;
        Ok(())
    }

    /// `@{ name = value; ... }`.
    pub fn build_struct(&mut self, result: SyntaxId, fields: &[(&str, SyntaxId)]) -> Result<()> {
        trace!(result, ?fields, "build struct");
        let mut members = BTreeMap::new();
        for &(name, value) in fields {
            let id = self.graph.syntax_node(value);
            if members.insert(name.to_owned(), id).is_some() {
                return Err(Error::InvalidBinding {
                    node: NodeName::Syntax(result),
                    reason: format!("field `{name}` is defined twice"),
                });
            }
        }
        let id = self.graph.syntax_node(result);
        let value = self.graph.type_var(NodeState::Struct {
            fields: members,
            open: false,
        });
        self.graph.merge_nodes(id, value)?;
        Ok(())
    }

    /// `node.field` producing `result`.
    pub fn bind_field_access(
        &mut self,
        node: SyntaxId,
        field: &str,
        result: SyntaxId,
    ) -> Result<()> {
        trace!(node, field, result, "bind field access");
        let id = self.graph.syntax_node(node);
        let value = self.graph.syntax_node(result);
        let shape = self.graph.type_var(NodeState::Struct {
            fields: BTreeMap::from([(field.to_owned(), value)]),
            open: true,
        });
        self.graph.add_ancestor(id, shape);
        Ok(())
    }

    /// Current graph, one node per line.
    pub fn dump(&self) -> String {
        crate::dump::GraphPrinter::new(&self.graph).dump()
    }

    /// Solves the graph.
    pub fn solve(self) -> Result<TypeInferenceResult> {
        crate::solve::solve(self.graph, &self.config)
    }

    fn resolved_syntax(&mut self, node: SyntaxId) -> NodeId {
        let id = self.graph.syntax_node(node);
        self.graph.resolve(id)
    }
}
