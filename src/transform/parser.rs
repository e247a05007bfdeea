//! The central call-site algorithm: recognize, validate, walk, emit.
//!
//! One [`Transformer`] is created per host adapter and re-entered once
//! per candidate call site by the host's own traversal. All state that
//! spans call sites lives in the [`TransformContext`].

use crate::diagnostics::NameofError;
use crate::ir::{CallKind, NameofCall, NameofResult, ParsedNode, PathPart};
use crate::ir::path_part::IndexKind;

use super::adapter::Adapter;
use super::context::TransformContext;
use super::serialize;

/// Which member of the macro a callee names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacroMember {
    Plain,
    Full,
    Interpolate,
}

/// Host-agnostic engine for one adapter.
pub struct Transformer<'a, A: Adapter> {
    adapter: &'a A,
}

impl<'a, A: Adapter> Transformer<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        self.adapter
    }

    /// Stage 1: recognize a call site.
    ///
    /// Returns the parsed call when `node` is a call expression whose
    /// callee names the expected macro identifier (directly, or through
    /// the `.full` / `.interpolate` members).
    pub fn find_call(
        &self,
        node: &A::Node,
        ctx: &TransformContext,
    ) -> Option<NameofCall<A::Node>> {
        if !self.adapter.is_call_expression(node) {
            return None;
        }
        let ParsedNode::Call(call) = self.adapter.parse(node) else {
            return None;
        };

        let member = self.classify_callee(&call.callee, ctx)?;
        let kind = match member {
            MacroMember::Full => CallKind::Full,
            MacroMember::Interpolate => CallKind::Interpolate,
            MacroMember::Plain if call.args.is_empty() && !call.type_args.is_empty() => {
                CallKind::Typed
            }
            MacroMember::Plain => CallKind::Default,
        };

        Some(NameofCall {
            source: call.source,
            kind,
            arguments: call.args,
            type_arguments: call.type_args,
        })
    }

    /// Stages 2-6 for one recognized call site.
    ///
    /// Returns `Ok(Some(result))` when the call site resolves to a
    /// substitution, and `Ok(None)` for an `interpolate` call that was
    /// registered for consumption by an enclosing call.
    pub fn process(
        &self,
        call: &NameofCall<A::Node>,
        ctx: &mut TransformContext,
    ) -> Result<Option<NameofResult<A::Node>>, NameofError> {
        if call.kind == CallKind::Interpolate {
            self.register_interpolation(call, ctx)?;
            return Ok(None);
        }

        let parts = self.resolve_argument(call, ctx)?;
        let result = match call.kind {
            CallKind::Full => serialize::full_path(self.adapter, &parts)?,
            _ => serialize::last_segment(self.adapter, &parts)?,
        };
        Ok(Some(result))
    }

    /// Register a standalone `interpolate` call found by the traversal.
    ///
    /// The call stays in the pending registry until an enclosing `nameof`
    /// consumes it; leftovers surface as `UnusedInterpolation` when the
    /// context drains.
    pub fn register_interpolation(
        &self,
        call: &NameofCall<A::Node>,
        ctx: &mut TransformContext,
    ) -> Result<(), NameofError> {
        self.expect_interpolate_argument(call)?;
        ctx.register_interpolation(
            self.adapter.span(&call.source),
            self.adapter.extract_code(&call.source),
        );
        Ok(())
    }

    fn expect_interpolate_argument<'c>(
        &self,
        call: &'c NameofCall<A::Node>,
    ) -> Result<&'c A::Node, NameofError> {
        match call.arguments.as_slice() {
            [argument] => Ok(argument),
            arguments => Err(NameofError::invalid_interpolate_call(
                arguments.len(),
                &self.adapter.extract_code(&call.source),
                self.adapter.span(&call.source),
            )),
        }
    }

    /// Stage 2 + 3: arity validation and argument-form resolution.
    fn resolve_argument(
        &self,
        call: &NameofCall<A::Node>,
        ctx: &mut TransformContext,
    ) -> Result<Vec<PathPart<A::Node>>, NameofError> {
        match call.arguments.as_slice() {
            [argument] => self.walk_argument(argument, ctx),
            [] if !call.type_arguments.is_empty() => {
                let node = self.adapter.parse(&call.type_arguments[0]);
                self.flatten(node, ctx)
            }
            arguments => Err(NameofError::invalid_default_call(
                arguments.len(),
                &self.adapter.extract_code(&call.source),
                self.adapter.span(&call.source),
            )),
        }
    }

    /// An argument is either a bare accessor expression or a lambda whose
    /// returned expression is walked with the parameter segment dropped.
    fn walk_argument(
        &self,
        argument: &A::Node,
        ctx: &mut TransformContext,
    ) -> Result<Vec<PathPart<A::Node>>, NameofError> {
        match self.adapter.parse(argument) {
            ParsedNode::Function { body: None, source } => Err(NameofError::no_return_expression(
                &self.adapter.extract_code(&source),
                self.adapter.span(&source),
            )),
            ParsedNode::Function {
                body: Some(body),
                source,
            } => {
                let mut parts = self.flatten(*body, ctx)?;
                if parts.len() <= 1 {
                    return Err(NameofError::missing_property_access(
                        &self.adapter.extract_code(&source),
                        self.adapter.span(&source),
                    ));
                }
                // the parameter itself is never part of the result
                parts.remove(0);
                Ok(parts)
            }
            node => self.flatten(node, ctx),
        }
    }

    /// Stage 4: flatten a parsed tree into its accessor path, root first.
    fn flatten(
        &self,
        node: ParsedNode<A::Node>,
        ctx: &mut TransformContext,
    ) -> Result<Vec<PathPart<A::Node>>, NameofError> {
        match node {
            ParsedNode::Identifier { name, source } => {
                Ok(vec![PathPart::Identifier { name, source }])
            }
            ParsedNode::PropertyAccess {
                target,
                name,
                source,
            } => {
                let mut parts = self.flatten(*target, ctx)?;
                parts.push(PathPart::PropertyAccessor { name, source });
                Ok(parts)
            }
            ParsedNode::IndexAccess {
                target,
                index,
                source,
            } => {
                let mut parts = self.flatten(*target, ctx)?;
                let index = self.resolve_index(*index, ctx)?;
                parts.push(PathPart::IndexAccessor { index, source });
                Ok(parts)
            }
            ParsedNode::Call(call) => {
                let source = call.source.clone();
                match self.classify_callee(&call.callee, ctx) {
                    Some(MacroMember::Plain | MacroMember::Full) => {
                        Err(NameofError::nested_nameof(
                            &self.adapter.extract_code(&source),
                            self.adapter.span(&source),
                        ))
                    }
                    // interpolate is only meaningful inside an index
                    Some(MacroMember::Interpolate) => Err(NameofError::unsupported_scenario(
                        &self.adapter.extract_code(&source),
                        self.adapter.span(&source),
                    )),
                    None => Ok(vec![PathPart::Unsupported { source }]),
                }
            }
            ParsedNode::ImportType {
                qualifier: None,
                source,
            } => Err(NameofError::missing_import_type_qualifier(
                &self.adapter.extract_code(&source),
                self.adapter.span(&source),
            )),
            // the import('module') base carries no emittable name
            ParsedNode::ImportType {
                qualifier: Some(qualifier),
                ..
            } => self.flatten(*qualifier, ctx),
            ParsedNode::Function { source, .. }
            | ParsedNode::StringLiteral { source, .. }
            | ParsedNode::NumericLiteral { source, .. }
            | ParsedNode::Unsupported { source } => Ok(vec![PathPart::Unsupported { source }]),
        }
    }

    /// Stage 5: classify an index expression.
    ///
    /// Literal indices keep their text; an `interpolate` sub-call becomes
    /// a slot and is consumed from the pending registry; anything else is
    /// an unsupported accessor.
    fn resolve_index(
        &self,
        index: ParsedNode<A::Node>,
        ctx: &mut TransformContext,
    ) -> Result<IndexKind<A::Node>, NameofError> {
        match index {
            ParsedNode::NumericLiteral { text, .. } => Ok(IndexKind::Numeric(text)),
            ParsedNode::StringLiteral { value, .. } => Ok(IndexKind::Text(value)),
            ParsedNode::Call(call)
                if matches!(
                    self.classify_callee(&call.callee, ctx),
                    Some(MacroMember::Interpolate)
                ) =>
            {
                let call = NameofCall {
                    source: call.source,
                    kind: CallKind::Interpolate,
                    arguments: call.args,
                    type_arguments: call.type_args,
                };
                let expression = self.expect_interpolate_argument(&call)?.clone();
                ctx.consume_interpolation(self.adapter.span(&call.source));
                Ok(IndexKind::Interpolation(expression))
            }
            other => Err(NameofError::unsupported_accessor_type(
                &self.adapter.extract_code(other.source()),
                self.adapter.span(other.source()),
            )),
        }
    }

    fn classify_callee(
        &self,
        callee: &ParsedNode<A::Node>,
        ctx: &TransformContext,
    ) -> Option<MacroMember> {
        match callee {
            ParsedNode::Identifier { name, .. } if name == ctx.macro_name() => {
                Some(MacroMember::Plain)
            }
            ParsedNode::PropertyAccess { target, name, .. } => match target.as_ref() {
                ParsedNode::Identifier { name: object, .. } if object == ctx.macro_name() => {
                    match name.as_str() {
                        "full" => Some(MacroMember::Full),
                        "interpolate" => Some(MacroMember::Interpolate),
                        _ => None,
                    }
                }
                _ => None,
            },
            _ => None,
        }
    }
}
