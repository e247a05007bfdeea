//! Module-rewriting host: macro-style rewriting of a parsed module.
//!
//! Instead of recording text spans, this host replaces call-expression
//! nodes in place: plain paths become string literals, interpolated
//! paths become template expressions holding the captured subtrees. A
//! reference to the macro identifier that is not the callee of a call
//! expression is an integration-level error, distinct from the grammar
//! diagnostics.

use anyhow::{Result, anyhow};
use swc_common::{BytePos, DUMMY_SP};
use swc_ecma_ast::{Expr, Invalid, Lit, Module, Str, Tpl, TplElement};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::diagnostics::{ErrorHandler, NameofError, SourceSpan};
use crate::ir::{CallKind, NameofResult, ParsedNode, Segment};
use crate::transform::{Adapter, TransformContext, TransformOptions, Transformer};
use crate::utils::line_col;

use super::swc::{self, SourceText, SwcNode};

/// The outcome of rewriting one module.
#[derive(Debug)]
pub struct TransformedModule {
    pub module: Module,
    /// Number of call sites rewritten.
    pub replaced: usize,
}

/// Adapter that renders results as replacement AST nodes.
pub struct ModuleAdapter<'a> {
    source: SourceText<'a>,
}

impl<'a> ModuleAdapter<'a> {
    pub(crate) fn new(text: &'a str, base: BytePos) -> Self {
        Self {
            source: SourceText::new(text, base),
        }
    }

    fn build_template(&self, result: &NameofResult<SwcNode>) -> Expr {
        let mut exprs: Vec<Box<Expr>> = Vec::new();
        let mut quasis: Vec<TplElement> = Vec::new();
        let mut pending = String::new();

        for segment in &result.segments {
            match segment {
                Segment::Literal(text) => pending.push_str(text),
                Segment::Interpolation(node) => {
                    quasis.push(template_element(&pending, false));
                    pending.clear();
                    exprs.push(match node {
                        SwcNode::Expr(expr) => expr.clone(),
                        // slots only ever capture expressions
                        _ => Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })),
                    });
                }
            }
        }
        quasis.push(template_element(&pending, true));

        Expr::Tpl(Tpl {
            span: DUMMY_SP,
            exprs,
            quasis,
        })
    }
}

fn template_element(text: &str, tail: bool) -> TplElement {
    TplElement {
        span: DUMMY_SP,
        tail,
        cooked: Some(text.to_string().into()),
        raw: swc::escape_template_text(text).into(),
    }
}

impl Adapter for ModuleAdapter<'_> {
    type Node = SwcNode;
    type Output = Expr;

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

    fn dump(&self, result: &NameofResult<SwcNode>) -> Expr {
        match result.literal_text() {
            Some(text) => Expr::Lit(Lit::Str(Str {
                span: DUMMY_SP,
                value: text.to_string().into(),
                raw: None,
            })),
            None => self.build_template(result),
        }
    }
}

struct ModuleRewriter<'a, 'h> {
    transformer: Transformer<'a, ModuleAdapter<'a>>,
    ctx: TransformContext,
    handler: &'h mut dyn ErrorHandler,
    failure: Option<NameofError>,
    stray: Option<SourceSpan>,
    replaced: usize,
}

impl ModuleRewriter<'_, '_> {
    fn report(&mut self, error: NameofError) {
        if let Err(fatal) = self.handler.handle(error) {
            self.failure = Some(fatal);
        }
    }

    /// Visit a call's arguments but not its callee, so the macro
    /// identifier in callee position is not mistaken for a stray
    /// reference.
    fn visit_call_arguments(&mut self, expr: &mut Expr) {
        if let Expr::Call(call) = expr {
            for arg in &mut call.args {
                arg.expr.visit_mut_with(self);
            }
        }
    }
}

impl VisitMut for ModuleRewriter<'_, '_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.failure.is_some() || self.stray.is_some() {
            return;
        }

        let nameof_call = match expr {
            Expr::Call(_) => {
                let node = SwcNode::Expr(Box::new(expr.clone()));
                self.transformer.find_call(&node, &self.ctx)
            }
            _ => None,
        };

        let Some(nameof_call) = nameof_call else {
            if let Expr::Ident(ident) = expr
                && ident.sym.as_str() == self.ctx.macro_name()
            {
                let node = SwcNode::Expr(Box::new(expr.clone()));
                self.stray = Some(self.transformer.adapter().span(&node));
                return;
            }
            expr.visit_mut_children_with(self);
            return;
        };

        if nameof_call.kind == CallKind::Interpolate {
            // stays pending unless an enclosing call already consumed it
            if let Err(error) = self
                .transformer
                .register_interpolation(&nameof_call, &mut self.ctx)
            {
                self.report(error);
            }
            self.visit_call_arguments(expr);
            return;
        }

        match self.transformer.process(&nameof_call, &mut self.ctx) {
            Ok(Some(result)) => {
                let mut replacement = self.transformer.adapter().dump(&result);
                // captured interpolation expressions may hold further
                // call sites of their own
                replacement.visit_mut_with(self);
                *expr = replacement;
                self.replaced += 1;
            }
            Ok(None) => {}
            Err(error) => {
                self.report(error);
                self.visit_call_arguments(expr);
            }
        }
    }
}

/// Parse `source` and rewrite every `nameof` call site in place.
pub fn transform_source(
    file_name: &str,
    source: &str,
    options: &TransformOptions,
    handler: &mut dyn ErrorHandler,
) -> Result<TransformedModule> {
    let parsed = swc::parse_source(file_name, source)?;
    let mut module = parsed.module;
    let adapter = ModuleAdapter::new(source, parsed.base);

    let mut rewriter = ModuleRewriter {
        transformer: Transformer::new(&adapter),
        ctx: TransformContext::new(options),
        handler,
        failure: None,
        stray: None,
        replaced: 0,
    };
    module.visit_mut_with(&mut rewriter);

    let ModuleRewriter {
        mut ctx,
        handler,
        mut failure,
        stray,
        replaced,
        ..
    } = rewriter;

    if let Some(span) = stray {
        let (line, col) = line_col(source, span.start);
        return Err(anyhow!(
            "could not find a call expression for `{}` at {}:{}:{}",
            options.macro_name,
            file_name,
            line,
            col
        ));
    }

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

    Ok(TransformedModule { module, replaced })
}
