use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Language, Parser, Tree};

/// Thin wrapper over tree-sitter with per-extension grammar selection.
///
/// `.ts` files use the TypeScript grammar, `.js`/`.jsx` the JavaScript
/// grammar, and everything else (including `.tsx` and sliced SFC scripts)
/// the TSX grammar, which tolerates both type annotations and JSX.
pub struct SourceParser {
    parser: Parser,
    current: GrammarKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrammarKind {
    TypeScript,
    JavaScript,
    Tsx,
}

impl GrammarKind {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => GrammarKind::TypeScript,
            Some("js") | Some("jsx") => GrammarKind::JavaScript,
            _ => GrammarKind::Tsx,
        }
    }

    fn language(self) -> Language {
        match self {
            GrammarKind::TypeScript => tree_sitter_typescript::language_typescript(),
            GrammarKind::JavaScript => tree_sitter_javascript::language(),
            GrammarKind::Tsx => tree_sitter_typescript::language_tsx(),
        }
    }
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&GrammarKind::Tsx.language())
            .map_err(|e| anyhow::anyhow!("Failed to set language: {}", e))?;

        Ok(Self {
            parser,
            current: GrammarKind::Tsx,
        })
    }

    pub fn parse(&mut self, source: &str, file_path: &Path) -> Result<Tree> {
        let grammar = GrammarKind::for_path(file_path);
        if grammar != self.current {
            self.parser
                .set_language(&grammar.language())
                .map_err(|e| anyhow::anyhow!("Failed to switch language: {}", e))?;
            self.current = grammar;
        }

        self.parser
            .parse(source, None)
            .with_context(|| format!("Failed to parse source for: {}", file_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_tsx_with_types_and_jsx() {
        let mut parser = SourceParser::new().unwrap();
        let src = "interface P { x: number }\nconst A = (p: P) => <div>{p.x}</div>;";
        let tree = parser.parse(src, &PathBuf::from("A.tsx")).unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn switches_grammars_between_files() {
        let mut parser = SourceParser::new().unwrap();
        let ts = parser
            .parse("const x: number = 1;", &PathBuf::from("a.ts"))
            .unwrap();
        assert!(!ts.root_node().has_error());

        let js = parser
            .parse("const App = () => <div />;", &PathBuf::from("a.jsx"))
            .unwrap();
        assert!(!js.root_node().has_error());
    }
}
