//! Parsed nodes: the host-independent shape of an argument subtree.
//!
//! A host adapter classifies its own tree into this closed set once per
//! node; the engine never touches host types directly. Wrapper syntax
//! (parentheses, non-null assertions, type assertions) is unwrapped by
//! the adapter before classification and never appears here.

/// A parsed call expression: callee plus raw argument handles.
///
/// Arguments and type arguments stay as host node handles; the engine
/// parses the one it needs after arity validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode<T> {
    pub callee: Box<ParsedNode<T>>,
    pub type_args: Vec<T>,
    pub args: Vec<T>,
    pub source: T,
}

/// A host node classified into the grammar's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode<T> {
    /// Any call expression, macro or not; the engine decides which.
    Call(CallNode<T>),

    /// A bare identifier (or `this`).
    Identifier { name: String, source: T },

    /// `target.name`
    PropertyAccess {
        target: Box<ParsedNode<T>>,
        name: String,
        source: T,
    },

    /// `target[index]`
    IndexAccess {
        target: Box<ParsedNode<T>>,
        index: Box<ParsedNode<T>>,
        source: T,
    },

    /// An `import('module')` type reference, optionally qualified
    /// (`import('module').A.B`). A missing qualifier is a grammar error
    /// surfaced by the engine.
    ImportType {
        qualifier: Option<Box<ParsedNode<T>>>,
        source: T,
    },

    /// A lambda or function-expression argument. `body` is the parsed
    /// returned expression; `None` when the body has no returned value.
    Function {
        body: Option<Box<ParsedNode<T>>>,
        source: T,
    },

    /// String literal. Legal only as an index; unsupported at a path root.
    StringLiteral { value: String, source: T },

    /// Numeric literal. Holds the source text so `arr[0]` round-trips.
    NumericLiteral { text: String, source: T },

    /// Everything else: template literals, spreads, array literals,
    /// arbitrary operators.
    Unsupported { source: T },
}

impl<T> ParsedNode<T> {
    /// The host node this parsed node was built from.
    pub fn source(&self) -> &T {
        match self {
            ParsedNode::Call(call) => &call.source,
            ParsedNode::Identifier { source, .. }
            | ParsedNode::PropertyAccess { source, .. }
            | ParsedNode::IndexAccess { source, .. }
            | ParsedNode::ImportType { source, .. }
            | ParsedNode::Function { source, .. }
            | ParsedNode::StringLiteral { source, .. }
            | ParsedNode::NumericLiteral { source, .. }
            | ParsedNode::Unsupported { source } => source,
        }
    }
}
