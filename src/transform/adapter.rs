//! The per-host capability contract.
//!
//! One implementation exists per host integration style; the engine is
//! generic over this trait and never names a host tree type.

use crate::diagnostics::SourceSpan;
use crate::ir::{NameofResult, ParsedNode};

/// Bridges the engine to one concrete host tree.
pub trait Adapter {
    /// The host node handle stored throughout the IR.
    type Node: Clone;

    /// The rendered artifact: replacement text for a text-substitution
    /// host, a replacement node for an in-tree rewriting host.
    type Output;

    /// Structural test: is this node a call expression at all?
    fn is_call_expression(&self, node: &Self::Node) -> bool;

    /// The classification switch: parse one host node into the IR,
    /// recursing through accessor targets and unwrapping parenthesized
    /// expressions, non-null assertions, and type assertions.
    fn parse(&self, node: &Self::Node) -> ParsedNode<Self::Node>;

    /// The node's original source text, for diagnostics.
    fn extract_code(&self, node: &Self::Node) -> String;

    /// The node's byte range within its source file.
    fn span(&self, node: &Self::Node) -> SourceSpan;

    /// Render a fully resolved result into the host-native artifact.
    fn dump(&self, result: &NameofResult<Self::Node>) -> Self::Output;
}
