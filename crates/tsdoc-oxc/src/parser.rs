//! Parser façade over `oxc_parser`
//!
//! Source type is inferred from the file name, so `.d.ts` and `.tsx` files
//! parse with the right grammar. Any syntax error fails the file.

use crate::error::{FrontendError, Result};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse diagnostic information
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub message: String,
}

/// Parsed program borrowing its allocator and source text
pub struct ParsedUnit<'a> {
    pub program: oxc_ast::ast::Program<'a>,
    pub source_text: &'a str,
}

/// Source type for a path, falling back to plain TypeScript.
pub fn source_type_for(path: &str) -> SourceType {
    SourceType::from_path(path).unwrap_or(SourceType::ts())
}

/// Parse `source` as the file at `path`.
pub fn parse<'a>(allocator: &'a Allocator, path: &str, source: &'a str) -> Result<ParsedUnit<'a>> {
    let result = Parser::new(allocator, source, source_type_for(path)).parse();

    let diagnostics: Vec<ParseDiagnostic> = result
        .errors
        .iter()
        .map(|err| ParseDiagnostic {
            message: err.to_string(),
        })
        .collect();

    if !diagnostics.is_empty() || result.panicked {
        return Err(FrontendError::Parse {
            path: path.to_string(),
            message: diagnostics
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    Ok(ParsedUnit {
        program: result.program,
        source_text: source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_files_parse_as_typescript() {
        assert!(source_type_for("/p/src/a.d.ts").is_typescript());
        assert!(source_type_for("/p/src/a.d.ts").is_typescript_definition());
        assert!(source_type_for("/p/src/a.tsx").is_jsx());
    }

    #[test]
    fn syntax_errors_fail_the_file() {
        let allocator = Allocator::default();
        let err = match parse(&allocator, "/p/src/a.ts", "export class {") {
            Err(err) => err,
            Ok(_) => panic!("expected a parse error"),
        };
        assert!(matches!(err, FrontendError::Parse { ref path, .. } if path == "/p/src/a.ts"));
    }

    #[test]
    fn parses_typescript_syntax() {
        let allocator = Allocator::default();
        let unit = parse(&allocator, "/p/src/a.ts", "export interface A { x?: string }").unwrap();
        assert_eq!(unit.program.body.len(), 1);
    }
}
