//! Text-substitution host: rewrite call sites as `{start, end, text}`
//! spans spliced once against the original buffer.
//!
//! Call sites are processed innermost-first; a transformation recorded
//! for an enclosing call subsumes any transformation previously recorded
//! within its range. Applying the surviving disjoint spans in ascending
//! order keeps offsets valid no matter how substitutions change lengths.

use std::cell::RefCell;

use anyhow::Result;
use swc_common::BytePos;
use swc_ecma_ast::{CallExpr, Expr};
use swc_ecma_visit::{Visit, VisitWith};

use crate::diagnostics::{ErrorHandler, FailFast, NameofError, SourceSpan};
use crate::ir::{NameofResult, ParsedNode, Segment};
use crate::transform::{Adapter, TransformContext, TransformOptions, Transformer};

use super::swc::{self, SourceText, SwcNode};

/// The outcome of one file's substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// The rewritten file text; `None` when nothing was replaced.
    pub file_text: Option<String>,
    /// Whether any call site was substituted.
    pub replaced: bool,
}

/// One recorded text replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Adapter that renders results as replacement text.
pub struct TextAdapter<'a> {
    source: SourceText<'a>,
    edits: RefCell<Vec<Transformation>>,
}

impl<'a> TextAdapter<'a> {
    pub(crate) fn new(text: &'a str, base: BytePos) -> Self {
        Self {
            source: SourceText::new(text, base),
            edits: RefCell::new(Vec::new()),
        }
    }

    /// Record a transformation. A transformation whose range encloses
    /// previously recorded ones replaces them: their effect is already
    /// reflected in the enclosing replacement text.
    pub(crate) fn record(&self, edit: Transformation) {
        let mut edits = self.edits.borrow_mut();
        while edits
            .last()
            .is_some_and(|last| last.start >= edit.start && last.end <= edit.end)
        {
            edits.pop();
        }
        edits.push(edit);
    }

    pub(crate) fn take_edits(&self) -> Vec<Transformation> {
        self.edits.take()
    }

    /// Source text of a span with any recorded transformations inside it
    /// applied, so interpolation slots reproduce already-substituted
    /// nested call sites.
    fn code_with_edits(&self, span: SourceSpan) -> String {
        let edits = self.edits.borrow();
        let mut contained: Vec<&Transformation> = edits
            .iter()
            .filter(|edit| span.contains(&SourceSpan::new(edit.start, edit.end)))
            .collect();

        if contained.is_empty() {
            return self.source.code(span).to_string();
        }
        contained.sort_by_key(|edit| edit.start);

        let mut output = String::new();
        let mut last = span.start;
        for edit in contained {
            output.push_str(self.source.code(SourceSpan::new(last, edit.start)));
            output.push_str(&edit.text);
            last = edit.end;
        }
        output.push_str(self.source.code(SourceSpan::new(last, span.end)));
        output
    }
}

impl Adapter for TextAdapter<'_> {
    type Node = SwcNode;
    type Output = String;

    fn is_call_expression(&self, node: &SwcNode) -> bool {
        swc::is_call_expression(node)
    }

    fn parse(&self, node: &SwcNode) -> ParsedNode<SwcNode> {
        swc::classify(node)
    }

    fn extract_code(&self, node: &SwcNode) -> String {
        self.source.code(self.span(node)).to_string()
    }

    fn span(&self, node: &SwcNode) -> SourceSpan {
        self.source.to_source_span(node.span())
    }

    fn dump(&self, result: &NameofResult<SwcNode>) -> String {
        if let Some(text) = result.literal_text() {
            return format!("\"{}\"", swc::escape_string_literal(text));
        }

        let mut output = String::from("`");
        for segment in &result.segments {
            match segment {
                Segment::Literal(text) => output.push_str(&swc::escape_template_text(text)),
                Segment::Interpolation(node) => {
                    output.push_str("${");
                    output.push_str(&self.code_with_edits(self.span(node)));
                    output.push('}');
                }
            }
        }
        output.push('`');
        output
    }
}

struct TextVisitor<'a, 'h> {
    transformer: Transformer<'a, TextAdapter<'a>>,
    ctx: TransformContext,
    handler: &'h mut dyn ErrorHandler,
    failure: Option<NameofError>,
}

impl Visit for TextVisitor<'_, '_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        // innermost call sites substitute first
        call.visit_children_with(self);
        if self.failure.is_some() {
            return;
        }

        let node = SwcNode::Expr(Box::new(Expr::Call(call.clone())));
        let Some(nameof_call) = self.transformer.find_call(&node, &self.ctx) else {
            return;
        };

        match self.transformer.process(&nameof_call, &mut self.ctx) {
            Ok(Some(result)) => {
                let adapter = self.transformer.adapter();
                let text = adapter.dump(&result);
                let span = adapter.span(&nameof_call.source);
                adapter.record(Transformation {
                    start: span.start,
                    end: span.end,
                    text,
                });
            }
            // an interpolate call was registered; nothing to substitute yet
            Ok(None) => {}
            Err(error) => {
                if let Err(fatal) = self.handler.handle(error) {
                    self.failure = Some(fatal);
                }
            }
        }
    }
}

/// Substitute every `nameof` call in one file, failing on the first bad
/// call site.
pub fn replace_in_text(file_name: &str, file_text: &str) -> Result<Substitution> {
    replace_in_text_with(
        file_name,
        file_text,
        &TransformOptions::default(),
        &mut FailFast,
    )
}

/// Substitute with caller-supplied options and error handling. With a
/// collecting handler, a bad call site is recorded and left untouched
/// while the rest of the file is still processed.
pub fn replace_in_text_with(
    file_name: &str,
    file_text: &str,
    options: &TransformOptions,
    handler: &mut dyn ErrorHandler,
) -> Result<Substitution> {
    let parsed = swc::parse_source(file_name, file_text)?;
    let adapter = TextAdapter::new(file_text, parsed.base);

    let mut visitor = TextVisitor {
        transformer: Transformer::new(&adapter),
        ctx: TransformContext::new(options),
        handler,
        failure: None,
    };
    parsed.module.visit_with(&mut visitor);

    let TextVisitor {
        mut ctx,
        handler,
        mut failure,
        ..
    } = visitor;

    if failure.is_none() {
        for error in ctx.drain() {
            if let Err(fatal) = handler.handle(error) {
                failure = Some(fatal);
                break;
            }
        }
    }
    if let Some(error) = failure {
        return Err(error.into());
    }

    let mut edits = adapter.take_edits();
    if edits.is_empty() {
        return Ok(Substitution {
            file_text: None,
            replaced: false,
        });
    }
    edits.sort_by_key(|edit| edit.start);

    Ok(Substitution {
        file_text: Some(splice(file_text, &edits)),
        replaced: true,
    })
}

/// Apply disjoint edits in ascending start order.
fn splice(source: &str, edits: &[Transformation]) -> String {
    let mut output = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        output.push_str(&source[last..edit.start]);
        output.push_str(&edit.text);
        last = edit.end;
    }
    output.push_str(&source[last..]);
    output
}
