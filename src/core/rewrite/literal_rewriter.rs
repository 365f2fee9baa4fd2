//! AST walker that extracts translatable literals and rewrites them into lookup calls.
//!
//! Rewrite rules by literal shape:
//!
//! - string literal as a JSX attribute value: `title="你好"` → `title={_i18n("id", "你好")}`
//! - string literal directly under an array element, object property value,
//!   assignment right-hand side, variable initializer, binary/logical operand,
//!   `new` argument or call argument: `"你好"` → `_i18n("id", "你好")`
//! - JSX text: `<p> 你好 </p>` → `<p>{_i18n("id", "你好")}</p>`
//! - untagged template literal with a translatable static part:
//!   `` `你好 ${name}` `` → `_i18n("id", "你好 {0}", [name])`
//!
//! Any other string literal that passes the detector (object keys, import sources,
//! literal types, ...) is still reported to the registry but left in place.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrayLit, AssignExpr, BinExpr, CallExpr, Expr, ExprOrSpread, JSXAttr, JSXAttrValue,
    JSXExprContainer, JSXText, KeyValueProp, Lit, NewExpr, Str, Tpl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::edits::TextEdit;
use crate::core::parsers::jsx::ParsedSource;
use crate::core::session::ExtractionSession;
use crate::utils::js_string_literal;

/// Whether the expression currently being visited sits directly in a position
/// whose string literal gets rewritten in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralParent {
    Rewritable,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringShape {
    /// Value of a JSX attribute; needs an expression container.
    JsxAttr,
    /// Plain expression position.
    Inline,
    /// Reported but not rewritten.
    TrackOnly,
}

/// A literal that was replaced by a lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub id: i32,
    pub text: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in chars.
    pub column: usize,
}

#[derive(Debug, Default)]
pub struct RewriteResult {
    pub edits: Vec<TextEdit>,
    pub replacements: Vec<Replacement>,
}

/// Build the message text of a template literal: static parts verbatim (raw),
/// each expression as `{n}` in source order.
///
/// swc keeps `quasis.len() == exprs.len() + 1`, interleaved in source order.
pub fn template_message(tpl: &Tpl) -> String {
    let mut message = String::new();
    for (index, quasi) in tpl.quasis.iter().enumerate() {
        message.push_str(&quasi.raw);
        if index < tpl.exprs.len() {
            message.push_str(&format!("{{{}}}", index));
        }
    }
    message
}

pub struct LiteralRewriter<'a> {
    session: &'a mut ExtractionSession,
    file_path: &'a str,
    parsed: &'a ParsedSource,
    /// Local name of the lookup function.
    lookup: &'a str,
    parent: LiteralParent,
    result: RewriteResult,
}

impl<'a> LiteralRewriter<'a> {
    pub fn new(
        session: &'a mut ExtractionSession,
        file_path: &'a str,
        parsed: &'a ParsedSource,
        lookup: &'a str,
    ) -> Self {
        Self {
            session,
            file_path,
            parsed,
            lookup,
            parent: LiteralParent::Other,
            result: RewriteResult::default(),
        }
    }

    pub fn rewrite(mut self) -> RewriteResult {
        let parsed = self.parsed;
        parsed.module.visit_with(&mut self);
        self.result
    }

    fn with_parent<F>(&mut self, parent: LiteralParent, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let prev = self.parent;
        self.parent = parent;
        f(self);
        self.parent = prev;
    }

    /// 1-based (line, column) of `pos`.
    fn location(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.parsed.source_map.lookup_char_pos(pos);
        (loc.line, loc.col.0 + 1)
    }

    /// Report `text` at `pos` if the detector accepts it; returns its id.
    fn detect_and_report(&mut self, text: &str, pos: BytePos) -> Option<(i32, usize, usize)> {
        if !self.session.should_extract(text, Some(self.file_path)) {
            return None;
        }
        let (line, column) = self.location(pos);
        let id = self
            .session
            .report_occurrence(self.file_path, text, line, column);
        Some((id, line, column))
    }

    fn lookup_call(&self, id: i32, text: &str) -> String {
        format!(
            "{}(\"{}\", {})",
            self.lookup,
            id,
            js_string_literal(text)
        )
    }

    fn push_replacement(&mut self, id: i32, text: &str, line: usize, column: usize) {
        self.result.replacements.push(Replacement {
            id,
            text: text.to_string(),
            line,
            column,
        });
    }

    fn replace_span(&mut self, span: Span, replacement: String) {
        self.result
            .edits
            .push(TextEdit::replace_span(self.parsed, span, replacement));
    }

    fn handle_string(&mut self, node: &Str, shape: StringShape) {
        if node.span.is_dummy() {
            return;
        }
        let Some(value) = node.value.as_str() else {
            return;
        };
        let text = value.trim();
        let Some((id, line, column)) = self.detect_and_report(text, node.span.lo) else {
            return;
        };

        let call = self.lookup_call(id, text);
        match shape {
            StringShape::JsxAttr => self.replace_span(node.span, format!("{{{}}}", call)),
            StringShape::Inline => self.replace_span(node.span, call),
            StringShape::TrackOnly => return,
        }
        self.push_replacement(id, text, line, column);
    }

    /// Rewrite `tpl` when any static part is translatable. Returns whether it did.
    ///
    /// The call is emitted as edits over the gaps between the expressions so the
    /// expressions' own source (and any rewrites inside them) stays untouched.
    fn handle_template(&mut self, tpl: &Tpl) -> bool {
        if tpl.span.is_dummy() {
            return false;
        }
        let file_path = self.file_path;
        let translatable = tpl
            .quasis
            .iter()
            .any(|quasi| self.session.should_extract(&quasi.raw, Some(file_path)));
        if !translatable {
            return false;
        }

        let message = template_message(tpl);
        let (line, column) = self.location(tpl.span.lo);
        let id = self
            .session
            .report_occurrence(self.file_path, &message, line, column);
        let head = format!(
            "{}(\"{}\", {}, [",
            self.lookup,
            id,
            js_string_literal(&message)
        );

        match (tpl.exprs.first(), tpl.exprs.last()) {
            (Some(first), Some(last)) => {
                let start = self.parsed.offset(tpl.span.lo);
                let first_start = self.parsed.offset(first.span().lo);
                self.result
                    .edits
                    .push(TextEdit::replace(start, first_start, head));

                for pair in tpl.exprs.windows(2) {
                    let gap_start = self.parsed.offset(pair[0].span().hi);
                    let gap_end = self.parsed.offset(pair[1].span().lo);
                    self.result
                        .edits
                        .push(TextEdit::replace(gap_start, gap_end, ", "));
                }

                let last_end = self.parsed.offset(last.span().hi);
                let end = self.parsed.offset(tpl.span.hi);
                self.result
                    .edits
                    .push(TextEdit::replace(last_end, end, "])"));
            }
            _ => self.replace_span(tpl.span, format!("{}])", head)),
        }

        self.push_replacement(id, &message, line, column);
        true
    }

    fn visit_argument(&mut self, arg: &ExprOrSpread) {
        let parent = if arg.spread.is_none() {
            LiteralParent::Rewritable
        } else {
            LiteralParent::Other
        };
        self.with_parent(parent, |this| arg.expr.visit_with(this));
    }
}

impl<'a> Visit for LiteralRewriter<'a> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Lit(Lit::Str(s)) => {
                let shape = match self.parent {
                    LiteralParent::Rewritable => StringShape::Inline,
                    LiteralParent::Other => StringShape::TrackOnly,
                };
                self.handle_string(s, shape);
            }
            // Parentheses don't change the literal's position.
            Expr::Paren(paren) => paren.expr.visit_with(self),
            Expr::Tpl(tpl) => {
                self.with_parent(LiteralParent::Other, |this| {
                    this.handle_template(tpl);
                    tpl.visit_children_with(this);
                });
            }
            _ => {
                self.with_parent(LiteralParent::Other, |this| {
                    node.visit_children_with(this);
                });
            }
        }
    }

    /// String literals outside expression position (object keys, import sources, ...).
    fn visit_str(&mut self, node: &Str) {
        self.handle_string(node, StringShape::TrackOnly);
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        node.name.visit_with(self);
        match &node.value {
            Some(JSXAttrValue::Str(s)) => self.handle_string(s, StringShape::JsxAttr),
            Some(value) => value.visit_with(self),
            None => {}
        }
    }

    fn visit_jsx_expr_container(&mut self, node: &JSXExprContainer) {
        self.with_parent(LiteralParent::Other, |this| {
            node.visit_children_with(this);
        });
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        if node.span.is_dummy() {
            return;
        }
        let text = node.value.trim();
        if text.is_empty() {
            return;
        }
        // Point the location at the first visible character.
        let leading = node.raw.len() - node.raw.trim_start().len();
        let pos = node.span.lo + BytePos(leading as u32);
        let Some((id, line, column)) = self.detect_and_report(text, pos) else {
            return;
        };

        let call = self.lookup_call(id, text);
        self.replace_span(node.span, format!("{{{}}}", call));
        self.push_replacement(id, text, line, column);
    }

    fn visit_array_lit(&mut self, node: &ArrayLit) {
        for elem in node.elems.iter().flatten() {
            self.visit_argument(elem);
        }
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        self.with_parent(LiteralParent::Other, |this| node.key.visit_with(this));
        self.with_parent(LiteralParent::Rewritable, |this| node.value.visit_with(this));
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        self.with_parent(LiteralParent::Other, |this| node.left.visit_with(this));
        self.with_parent(LiteralParent::Rewritable, |this| node.right.visit_with(this));
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        self.with_parent(LiteralParent::Other, |this| node.name.visit_with(this));
        if let Some(init) = &node.init {
            self.with_parent(LiteralParent::Rewritable, |this| init.visit_with(this));
        }
    }

    fn visit_bin_expr(&mut self, node: &BinExpr) {
        self.with_parent(LiteralParent::Rewritable, |this| {
            node.left.visit_with(this);
            node.right.visit_with(this);
        });
    }

    fn visit_new_expr(&mut self, node: &NewExpr) {
        self.with_parent(LiteralParent::Other, |this| {
            node.callee.visit_with(this);
            node.type_args.visit_with(this);
        });
        for arg in node.args.iter().flatten() {
            self.visit_argument(arg);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.with_parent(LiteralParent::Other, |this| {
            node.callee.visit_with(this);
            node.type_args.visit_with(this);
        });
        for arg in &node.args {
            self.visit_argument(arg);
        }
    }
}
