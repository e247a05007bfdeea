//! Stage 6: turn an accessor path into result segments.
//!
//! `nameof` keeps only the last segment; `nameof.full` joins the whole
//! path, dot-separated for names and bracket-appended for indices. Any
//! interpolation slot turns the result into a template.

use crate::diagnostics::NameofError;
use crate::ir::path_part::IndexKind;
use crate::ir::{NameofResult, PathPart};

use super::adapter::Adapter;

/// Emit the last path segment (`nameof(expr)`, `nameof<T>()`).
pub fn last_segment<A: Adapter>(
    adapter: &A,
    parts: &[PathPart<A::Node>],
) -> Result<NameofResult<A::Node>, NameofError> {
    let mut result = NameofResult::new();

    let Some(last) = parts.last() else {
        return Ok(result);
    };

    match last {
        PathPart::Identifier { name, .. } | PathPart::PropertyAccessor { name, .. } => {
            result.push_literal(name);
        }
        PathPart::IndexAccessor { index, .. } => push_index_value(&mut result, index),
        PathPart::Interpolation { expression } => result.push_interpolation(expression.clone()),
        PathPart::Unsupported { source } => {
            return Err(NameofError::unsupported_node(
                &adapter.extract_code(source),
                adapter.span(source),
            ));
        }
    }

    Ok(result)
}

/// Emit the joined path (`nameof.full(expr)`, `nameof.full<T>()`).
pub fn full_path<A: Adapter>(
    adapter: &A,
    parts: &[PathPart<A::Node>],
) -> Result<NameofResult<A::Node>, NameofError> {
    // an unsupported segment can only be the path root; alone it means
    // the whole argument was unsupported
    if let [PathPart::Unsupported { source }] = parts {
        return Err(NameofError::unsupported_node(
            &adapter.extract_code(source),
            adapter.span(source),
        ));
    }

    let parts = match parts.first() {
        Some(PathPart::Unsupported { .. }) => &parts[1..],
        _ => parts,
    };

    let mut result = NameofResult::new();
    let mut emitted = false;

    for part in parts {
        match part {
            PathPart::Identifier { name, .. } | PathPart::PropertyAccessor { name, .. } => {
                if emitted {
                    result.push_literal(".");
                }
                result.push_literal(name);
            }
            // index segments are bracket-joined, never dot-joined
            PathPart::IndexAccessor { index, .. } => {
                result.push_literal("[");
                match index {
                    IndexKind::Numeric(text) => result.push_literal(text),
                    IndexKind::Text(value) => {
                        result.push_literal("\"");
                        result.push_literal(value);
                        result.push_literal("\"");
                    }
                    IndexKind::Interpolation(expression) => {
                        result.push_interpolation(expression.clone());
                    }
                }
                result.push_literal("]");
            }
            PathPart::Interpolation { expression } => {
                if emitted {
                    result.push_literal(".");
                }
                result.push_interpolation(expression.clone());
            }
            PathPart::Unsupported { source } => {
                return Err(NameofError::unsupported_node(
                    &adapter.extract_code(source),
                    adapter.span(source),
                ));
            }
        }
        emitted = true;
    }

    Ok(result)
}

fn push_index_value<T: Clone>(result: &mut NameofResult<T>, index: &IndexKind<T>) {
    match index {
        IndexKind::Numeric(text) | IndexKind::Text(text) => result.push_literal(text),
        IndexKind::Interpolation(expression) => result.push_interpolation(expression.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ErrorKind, SourceSpan};
    use crate::ir::{ParsedNode, Segment};

    /// A minimal adapter over string handles, for exercising the join
    /// rules without a host tree.
    struct TextOnly;

    impl Adapter for TextOnly {
        type Node = String;
        type Output = String;

        fn is_call_expression(&self, _node: &String) -> bool {
            false
        }

        fn parse(&self, node: &String) -> ParsedNode<String> {
            ParsedNode::Unsupported {
                source: node.clone(),
            }
        }

        fn extract_code(&self, node: &String) -> String {
            node.clone()
        }

        fn span(&self, _node: &String) -> SourceSpan {
            SourceSpan::default()
        }

        fn dump(&self, result: &NameofResult<String>) -> String {
            result.literal_text().unwrap_or_default().to_string()
        }
    }

    fn ident(name: &str) -> PathPart<String> {
        PathPart::Identifier {
            name: name.to_string(),
            source: name.to_string(),
        }
    }

    fn prop(name: &str) -> PathPart<String> {
        PathPart::PropertyAccessor {
            name: name.to_string(),
            source: name.to_string(),
        }
    }

    fn index(kind: IndexKind<String>) -> PathPart<String> {
        PathPart::IndexAccessor {
            index: kind,
            source: String::new(),
        }
    }

    #[test]
    fn test_last_segment_takes_final_name() {
        let parts = vec![ident("window"), prop("alert"), prop("length")];
        let result = last_segment(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("length"));
    }

    #[test]
    fn test_last_segment_index_drops_brackets() {
        let parts = vec![ident("obj"), index(IndexKind::Text("prop".to_string()))];
        let result = last_segment(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("prop"));
    }

    #[test]
    fn test_full_path_joins_with_dots() {
        let parts = vec![ident("window"), prop("alert"), prop("length")];
        let result = full_path(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("window.alert.length"));
    }

    #[test]
    fn test_full_path_brackets_index_segments() {
        let parts = vec![
            ident("a"),
            prop("b"),
            index(IndexKind::Numeric("0".to_string())),
            prop("c"),
        ];
        let result = full_path(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("a.b[0].c"));
    }

    #[test]
    fn test_full_path_quotes_string_index() {
        let parts = vec![ident("obj"), index(IndexKind::Text("prop".to_string()))];
        let result = full_path(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("obj[\"prop\"]"));
    }

    #[test]
    fn test_full_path_skips_unsupported_root() {
        let parts = vec![
            PathPart::Unsupported {
                source: "[]".to_string(),
            },
            prop("length"),
        ];
        let result = full_path(&TextOnly, &parts).unwrap();
        assert_eq!(result.literal_text(), Some("length"));
    }

    #[test]
    fn test_fully_unsupported_path_errors() {
        let parts = vec![PathPart::Unsupported {
            source: "[0]".to_string(),
        }];
        let error = full_path(&TextOnly, &parts).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnsupportedNode);
        let error = last_segment(&TextOnly, &parts).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnsupportedNode);
    }

    #[test]
    fn test_interpolated_index_becomes_template() {
        let parts = vec![
            ident("a"),
            index(IndexKind::Interpolation("key".to_string())),
        ];
        let result = full_path(&TextOnly, &parts).unwrap();
        assert!(result.is_template());
        assert_eq!(
            result.segments,
            vec![
                Segment::Literal("a[".to_string()),
                Segment::Interpolation("key".to_string()),
                Segment::Literal("]".to_string()),
            ]
        );
    }
}
