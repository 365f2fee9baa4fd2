//! The per-file binding for the injected lookup function.

use std::collections::HashSet;

use swc_ecma_ast::{Expr, ExprStmt, Ident, Lit, Module, ModuleItem, Stmt};
use swc_ecma_visit::{Visit, VisitWith};

use super::edits::TextEdit;
use crate::core::parsers::jsx::ParsedSource;
use crate::utils::js_string_literal;

/// Collects every identifier name used anywhere in a module.
#[derive(Default)]
struct IdentCollector {
    names: HashSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, node: &Ident) {
        self.names.insert(node.sym.to_string());
    }
}

/// Generate `_<hint>`, `_<hint>2`, `_<hint>3`, ... and return the first name that no
/// identifier in `module` already uses.
pub fn unique_binding_name(module: &Module, hint: &str) -> String {
    let mut collector = IdentCollector::default();
    module.visit_with(&mut collector);

    let base = format!("_{}", hint);
    if !collector.names.contains(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !collector.names.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Byte offset where the import goes: after a shebang line and after the leading
/// directive prologue (`"use client";` and friends).
fn import_offset(parsed: &ParsedSource) -> usize {
    let mut offset = if parsed.module.shebang.is_some() {
        parsed
            .code()
            .find('\n')
            .map_or(parsed.code().len(), |newline| newline + 1)
    } else {
        0
    };

    for item in &parsed.module.body {
        match item {
            ModuleItem::Stmt(Stmt::Expr(ExprStmt { span, expr }))
                if matches!(&**expr, Expr::Lit(Lit::Str(_))) =>
            {
                offset = parsed.offset(span.hi);
            }
            _ => break,
        }
    }
    offset
}

/// Edit that inserts `import { <name> as <binding> } from "<source>";`.
pub fn import_edit(parsed: &ParsedSource, binding: &str, name: &str, source: &str) -> TextEdit {
    let statement = format!(
        "import {{ {} as {} }} from {};",
        name,
        binding,
        js_string_literal(source)
    );
    let offset = import_offset(parsed);
    let at_line_start = offset == 0 || parsed.code()[..offset].ends_with('\n');
    if at_line_start {
        TextEdit::insert(offset, format!("{}\n", statement))
    } else {
        TextEdit::insert(offset, format!("\n{}", statement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::jsx::parse_source;
    use crate::core::rewrite::edits::apply_edits;

    fn parse(code: &str) -> ParsedSource {
        parse_source(code.to_string(), "test.jsx").unwrap()
    }

    #[test]
    fn test_unique_name_without_collision() {
        let parsed = parse("const a = 1;");
        assert_eq!(unique_binding_name(&parsed.module, "i18n"), "_i18n");
    }

    #[test]
    fn test_unique_name_skips_used_names() {
        let parsed = parse("const _i18n = 1; function f(_i18n2) { return _i18n2; }");
        assert_eq!(unique_binding_name(&parsed.module, "i18n"), "_i18n3");
    }

    #[test]
    fn test_import_at_file_start() {
        let code = "const a = 1;\n";
        let parsed = parse(code);
        let edit = import_edit(&parsed, "_i18n", "i18n", "mickey-i18n");
        assert_eq!(
            apply_edits(code, vec![edit]),
            "import { i18n as _i18n } from \"mickey-i18n\";\nconst a = 1;\n"
        );
    }

    #[test]
    fn test_import_after_directives() {
        let code = "'use client';\nconst a = 1;\n";
        let parsed = parse(code);
        let edit = import_edit(&parsed, "_i18n", "i18n", "mickey-i18n");
        assert_eq!(
            apply_edits(code, vec![edit]),
            "'use client';\nimport { i18n as _i18n } from \"mickey-i18n\";\nconst a = 1;\n"
        );
    }

    #[test]
    fn test_import_after_shebang() {
        let code = "#!/usr/bin/env node\nrun();\n";
        let parsed = parse(code);
        let edit = import_edit(&parsed, "_t", "t", "lib");
        assert_eq!(
            apply_edits(code, vec![edit]),
            "#!/usr/bin/env node\nimport { t as _t } from \"lib\";\nrun();\n"
        );
    }
}
