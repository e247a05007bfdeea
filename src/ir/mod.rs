//! Host-agnostic intermediate representation for `nameof` calls.
//!
//! The IR decouples the transformation engine from any concrete host tree:
//! a host adapter parses its own nodes into [`ParsedNode`]s, the engine
//! flattens them into [`PathPart`] sequences, and emission produces a
//! [`NameofResult`] that the adapter renders back into host syntax.

pub mod call;
pub mod node;
pub mod output;
pub mod path_part;

pub use call::{CallKind, NameofCall};
pub use node::{CallNode, ParsedNode};
pub use output::{NameofResult, Segment};
pub use path_part::{IndexKind, PathPart};
