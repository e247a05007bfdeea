//! Path parts: the closed set of accessor-path segment kinds.
//!
//! A parsed argument flattens into an ordered sequence of path parts
//! (its accessor path). Every part keeps a handle to the host node it
//! was built from so diagnostics and text reconstruction can point back
//! at the original source.

/// The index expression of an [`PathPart::IndexAccessor`].
///
/// Only literal indices and interpolation slots are legal; anything else
/// (a nested property chain, a variable) is rejected during flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexKind<T> {
    /// Numeric literal index: `arr[0]`. Holds the literal's source text.
    Numeric(String),

    /// String literal index: `obj["prop"]`. Holds the decoded string value.
    Text(String),

    /// An `interpolate(expr)` slot. Holds the captured expression node.
    Interpolation(T),
}

/// One segment of an accessor path.
///
/// Kind is fixed at construction; a part is never reclassified.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPart<T> {
    /// A bare identifier, including `this`.
    Identifier { name: String, source: T },

    /// A `.name` property access.
    PropertyAccessor { name: String, source: T },

    /// A computed `[index]` access.
    IndexAccessor { index: IndexKind<T>, source: T },

    /// A captured interpolation expression standing in for literal text.
    Interpolation { expression: T },

    /// Any node shape the grammar does not recognize.
    Unsupported { source: T },
}

impl<T> PathPart<T> {
    /// The host node this part was built from.
    pub fn source(&self) -> &T {
        match self {
            PathPart::Identifier { source, .. }
            | PathPart::PropertyAccessor { source, .. }
            | PathPart::IndexAccessor { source, .. }
            | PathPart::Unsupported { source } => source,
            PathPart::Interpolation { expression } => expression,
        }
    }

    /// Whether this part is a recognized path element (not `Unsupported`).
    pub fn is_supported(&self) -> bool {
        !matches!(self, PathPart::Unsupported { .. })
    }
}
