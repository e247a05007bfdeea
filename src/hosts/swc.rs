//! Shared SWC host node model and classification.
//!
//! Owned node handles keep the IR independent of the visited tree's
//! lifetime; spans survive cloning, so diagnostics and text extraction
//! keep pointing at the original buffer.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, GLOBALS, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    BlockStmt, BlockStmtOrExpr, Callee, Expr, Lit, MemberProp, Module, Stmt, TsEntityName,
    TsImportType, TsType, TsTypeQueryExpr,
};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::diagnostics::SourceSpan;
use crate::ir::{CallNode, ParsedNode};

/// A handle to one SWC node, owned by the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum SwcNode {
    Expr(Box<Expr>),
    Type(Box<TsType>),
    EntityName(Box<TsEntityName>),
    /// A spread argument (`...x`); always unsupported.
    Spread(Box<Expr>),
}

impl SwcNode {
    pub fn span(&self) -> Span {
        match self {
            SwcNode::Expr(expr) => expr.span(),
            SwcNode::Type(ty) => ty.span(),
            SwcNode::EntityName(name) => name.span(),
            SwcNode::Spread(expr) => expr.span(),
        }
    }
}

/// Structural call-expression test on the raw host node.
pub(crate) fn is_call_expression(node: &SwcNode) -> bool {
    match node {
        SwcNode::Expr(expr) => {
            matches!(unwrap_expr(expr), Expr::Call(call) if matches!(call.callee, Callee::Expr(_)))
        }
        _ => false,
    }
}

/// The classification switch over any host node handle.
pub(crate) fn classify(node: &SwcNode) -> ParsedNode<SwcNode> {
    match node {
        SwcNode::Expr(expr) => classify_expr(expr),
        SwcNode::Type(ty) => classify_type(ty),
        SwcNode::EntityName(name) => classify_entity_name(name),
        SwcNode::Spread(_) => ParsedNode::Unsupported {
            source: node.clone(),
        },
    }
}

/// Unwrap parentheses, TypeScript assertions and non-null assertions.
/// Handles: `(expr)`, `expr as T`, `expr as const`, `expr satisfies T`,
/// `<T>expr`, `expr!`
fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_expr(&ts_sat.expr),
        Expr::TsTypeAssertion(ts_assert) => unwrap_expr(&ts_assert.expr),
        Expr::TsNonNull(non_null) => unwrap_expr(&non_null.expr),
        _ => expr,
    }
}

fn unwrap_type(ty: &TsType) -> &TsType {
    match ty {
        TsType::TsParenthesizedType(paren) => unwrap_type(&paren.type_ann),
        _ => ty,
    }
}

fn classify_expr(expr: &Expr) -> ParsedNode<SwcNode> {
    let expr = unwrap_expr(expr);
    let source = SwcNode::Expr(Box::new(expr.clone()));

    match expr {
        Expr::Ident(ident) => ParsedNode::Identifier {
            name: ident.sym.to_string(),
            source,
        },
        Expr::This(_) => ParsedNode::Identifier {
            name: "this".to_string(),
            source,
        },
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => ParsedNode::PropertyAccess {
                target: Box::new(classify_expr(&member.obj)),
                name: prop.sym.to_string(),
                source,
            },
            MemberProp::Computed(computed) => ParsedNode::IndexAccess {
                target: Box::new(classify_expr(&member.obj)),
                index: Box::new(classify_expr(&computed.expr)),
                source,
            },
            MemberProp::PrivateName(_) => ParsedNode::Unsupported { source },
        },
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => ParsedNode::Call(CallNode {
                callee: Box::new(classify_expr(callee)),
                type_args: call
                    .type_args
                    .iter()
                    .flat_map(|args| args.params.iter().map(|param| SwcNode::Type(param.clone())))
                    .collect(),
                args: call
                    .args
                    .iter()
                    .map(|arg| match arg.spread {
                        Some(_) => SwcNode::Spread(arg.expr.clone()),
                        None => SwcNode::Expr(arg.expr.clone()),
                    })
                    .collect(),
                source,
            }),
            _ => ParsedNode::Unsupported { source },
        },
        Expr::Arrow(arrow) => ParsedNode::Function {
            body: match &*arrow.body {
                BlockStmtOrExpr::Expr(body) => Some(Box::new(classify_expr(body))),
                BlockStmtOrExpr::BlockStmt(block) => {
                    returned_expr(block).map(|body| Box::new(classify_expr(body)))
                }
            },
            source,
        },
        Expr::Fn(fn_expr) => ParsedNode::Function {
            body: fn_expr
                .function
                .body
                .as_ref()
                .and_then(returned_expr)
                .map(|body| Box::new(classify_expr(body))),
            source,
        },
        Expr::Lit(Lit::Str(string)) => ParsedNode::StringLiteral {
            value: string.value.as_str().unwrap_or_default().to_string(),
            source,
        },
        Expr::Lit(Lit::Num(number)) => ParsedNode::NumericLiteral {
            text: number
                .raw
                .as_ref()
                .map(|raw| raw.to_string())
                .unwrap_or_else(|| number.value.to_string()),
            source,
        },
        _ => ParsedNode::Unsupported { source },
    }
}

fn returned_expr(block: &BlockStmt) -> Option<&Expr> {
    block.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return(ret) => ret.arg.as_deref(),
        _ => None,
    })
}

fn classify_type(ty: &TsType) -> ParsedNode<SwcNode> {
    let ty = unwrap_type(ty);
    let source = SwcNode::Type(Box::new(ty.clone()));

    match ty {
        TsType::TsTypeRef(type_ref) => classify_entity_name(&type_ref.type_name),
        TsType::TsImportType(import) => import_type_node(import, source),
        TsType::TsTypeQuery(query) => match &query.expr_name {
            TsTypeQueryExpr::TsEntityName(entity) => classify_entity_name(entity),
            TsTypeQueryExpr::Import(import) => import_type_node(import, source),
        },
        _ => ParsedNode::Unsupported { source },
    }
}

fn import_type_node(import: &TsImportType, source: SwcNode) -> ParsedNode<SwcNode> {
    ParsedNode::ImportType {
        qualifier: import
            .qualifier
            .as_ref()
            .map(|qualifier| Box::new(classify_entity_name(qualifier))),
        source,
    }
}

fn classify_entity_name(name: &TsEntityName) -> ParsedNode<SwcNode> {
    let source = SwcNode::EntityName(Box::new(name.clone()));
    match name {
        TsEntityName::Ident(ident) => ParsedNode::Identifier {
            name: ident.sym.to_string(),
            source,
        },
        TsEntityName::TsQualifiedName(qualified) => ParsedNode::PropertyAccess {
            target: Box::new(classify_entity_name(&qualified.left)),
            name: qualified.right.sym.to_string(),
            source,
        },
    }
}

/// Source-text window shared by both adapters: converts SWC spans to
/// file-relative offsets and slices node text for diagnostics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceText<'a> {
    text: &'a str,
    base: BytePos,
}

impl<'a> SourceText<'a> {
    pub(crate) fn new(text: &'a str, base: BytePos) -> Self {
        Self { text, base }
    }

    pub(crate) fn to_source_span(&self, span: Span) -> SourceSpan {
        let start = span.lo.0.saturating_sub(self.base.0) as usize;
        let end = span.hi.0.saturating_sub(self.base.0) as usize;
        SourceSpan::new(start.min(self.text.len()), end.min(self.text.len()))
    }

    pub(crate) fn code(&self, span: SourceSpan) -> &'a str {
        &self.text[span.start..span.end]
    }
}

/// A parsed file plus the offset of its first byte in the source map.
pub(crate) struct ParsedSource {
    pub module: Module,
    pub base: BytePos,
}

/// Parse TS/TSX source into a module AST.
///
/// JSX parsing is enabled by file extension; an extensionless name is
/// assumed to be tsx.
pub(crate) fn parse_source(file_name: &str, source: &str) -> Result<ParsedSource> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Arc::new(SourceMap::default());
        let source_file = source_map
            .new_source_file(FileName::Real(file_name.into()).into(), source.to_string());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: is_tsx(file_name),
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("failed to parse {}: {:?}", file_name, e))?;

        Ok(ParsedSource {
            module,
            base: source_file.start_pos,
        })
    })
}

fn is_tsx(file_name: &str) -> bool {
    !(file_name.ends_with(".ts") || file_name.ends_with(".mts") || file_name.ends_with(".cts"))
}

/// Escape text for inclusion in a double-quoted string literal.
pub(crate) fn escape_string_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text for a template-literal quasi.
pub(crate) fn escape_template_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => escaped.push_str("\\$"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
