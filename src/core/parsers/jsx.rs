use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use swc_common::{BytePos, FileName, Globals, SourceFile, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed source file together with everything needed to map spans back to
/// text: the source map for line/column lookups and the source file for byte
/// offsets.
pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub source_file: Arc<SourceFile>,
}

impl ParsedSource {
    /// The original source text.
    pub fn code(&self) -> &str {
        &self.source_file.src
    }

    /// Byte offset of `pos` within the source text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos - self.source_file.start_pos).0 as usize
    }

    /// Source text covered by `span`.
    pub fn snippet(&self, span: Span) -> &str {
        &self.code()[self.offset(span.lo)..self.offset(span.hi)]
    }
}

/// Pick the parser syntax from the file extension.
///
/// Plain `.ts` files are parsed without JSX so that `<T>value` casts keep working;
/// everything else accepts JSX.
fn syntax_for(file_path: &str) -> Syntax {
    let is_plain_ts = matches!(
        Path::new(file_path).extension().and_then(|e| e.to_str()),
        Some("ts" | "mts" | "cts")
    );
    Syntax::Typescript(TsSyntax {
        tsx: !is_plain_ts,
        ..Default::default()
    })
}

/// Parse JS/JSX/TS/TSX source code string into an AST.
///
/// Each call gets its own SourceMap, so files can be parsed in parallel.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    let source_map = Arc::new(SourceMap::default());

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind()))?;

        Ok(ParsedSource {
            module,
            source_map: source_map.clone(),
            source_file,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsx_in_js_file() {
        let parsed = parse_source(
            "const a = <div title=\"x\">hi</div>;".to_string(),
            "src/app.js",
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 1);
        assert_eq!(parsed.code(), "const a = <div title=\"x\">hi</div>;");
    }

    #[test]
    fn test_parse_ts_type_assertion() {
        let parsed = parse_source("const a = <number>b;".to_string(), "src/util.ts");
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_snippet_uses_file_offsets() {
        let parsed = parse_source("let x = 'abc';".to_string(), "a.js").unwrap();
        let span = parsed.module.span;
        assert_eq!(parsed.snippet(span), "let x = 'abc';");
    }

    #[test]
    fn test_parse_error() {
        let result = parse_source("const a = {".to_string(), "broken.js");
        let err = result.err().unwrap();
        assert!(err.to_string().contains("broken.js"));
    }
}
