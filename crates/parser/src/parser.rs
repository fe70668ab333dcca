use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::queries::{QueryStrings, QUERY_TABLE};
use crate::types::{ElementKind, StructuralElement};
use std::collections::HashMap;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Extracts structural elements from source text using per-language
/// tree-sitter queries.
///
/// Queries are compiled once per parser instance and reused across files.
/// Parsing is best-effort: malformed source yields whatever the query
/// cursor still matches, and unsupported languages yield an empty sequence.
pub struct StructuralParser {
    parser: Parser,
    queries: HashMap<Language, CompiledQueries>,
}

/// Pre-compiled queries for a specific language
struct CompiledQueries {
    grammar: tree_sitter::Language,
    classes: Query,
    functions: Query,
    imports: Query,
}

impl CompiledQueries {
    fn compile(language: Language, strings: &QueryStrings) -> Result<Self> {
        let grammar = language
            .grammar()
            .ok_or_else(|| ParserError::tree_sitter(format!("no grammar for {}", language.as_str())))?;

        let compile_one = |source: &str| {
            Query::new(&grammar, source)
                .map_err(|e| ParserError::query(language.as_str(), e.to_string()))
        };

        Ok(Self {
            classes: compile_one(strings.classes)?,
            functions: compile_one(strings.functions)?,
            imports: compile_one(strings.imports)?,
            grammar,
        })
    }
}

impl StructuralParser {
    /// Create a parser with the full query table compiled.
    ///
    /// # Errors
    ///
    /// Returns an error if any language's queries fail to compile against
    /// its grammar. This indicates a defect in the query table, not in any
    /// input file.
    pub fn new() -> Result<Self> {
        let mut queries = HashMap::new();
        for (&language, strings) in QUERY_TABLE.iter() {
            queries.insert(language, CompiledQueries::compile(language, strings)?);
        }

        Ok(Self {
            parser: Parser::new(),
            queries,
        })
    }

    /// Parse source text into structural elements, ordered by start line.
    ///
    /// Never fails: unsupported languages and unparseable input degrade to
    /// an empty (or partial) sequence so one bad file cannot abort a scan.
    pub fn parse(&mut self, text: &str, language: Language) -> Vec<StructuralElement> {
        let Some(compiled) = self.queries.get(&language) else {
            return Vec::new();
        };

        if let Err(e) = self.parser.set_language(&compiled.grammar) {
            log::warn!("failed to set {} grammar: {e}", language.as_str());
            return Vec::new();
        }

        let Some(tree) = self.parser.parse(text, None) else {
            log::debug!("tree-sitter returned no tree for {} input", language.as_str());
            return Vec::new();
        };

        let mut elements = Vec::new();
        collect(&compiled.classes, ElementKind::Class, tree.root_node(), text, &mut elements);
        collect(&compiled.functions, ElementKind::Function, tree.root_node(), text, &mut elements);
        collect(&compiled.imports, ElementKind::Import, tree.root_node(), text, &mut elements);

        // Stable sort: elements sharing a start line keep per-kind order.
        elements.sort_by_key(|e| e.start_line);
        elements
    }
}

/// Run one element-kind query and append its matches.
fn collect(
    query: &Query,
    kind: ElementKind,
    root: Node,
    text: &str,
    elements: &mut Vec<StructuralElement>,
) {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, text.as_bytes());

    while let Some(match_) = matches.next() {
        let mut name: Option<String> = None;
        let mut definition: Option<Node> = None;

        for capture in match_.captures {
            let capture_name = query.capture_names()[capture.index as usize];
            match capture_name {
                "name" => {
                    name = capture
                        .node
                        .utf8_text(text.as_bytes())
                        .ok()
                        .map(str::to_string);
                }
                "module" => {
                    // Strip string quotes from path-style specifiers.
                    name = capture
                        .node
                        .utf8_text(text.as_bytes())
                        .ok()
                        .map(|t| t.trim_matches(|c| c == '"' || c == '\'').to_string());
                }
                _ if capture_name == kind.as_str() => {
                    definition = Some(capture.node);
                }
                _ => {}
            }
        }

        if let (Some(name), Some(node)) = (name, definition) {
            if name.is_empty() {
                continue;
            }
            elements.push(StructuralElement::new(
                kind,
                name,
                node.start_position().row as u32 + 1,
                node.end_position().row as u32 + 1,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str, language: Language) -> Vec<StructuralElement> {
        StructuralParser::new().unwrap().parse(text, language)
    }

    #[test]
    fn extracts_python_function() {
        let elements = parse("def hello(): ...\n", Language::Python);
        assert_eq!(
            elements,
            vec![StructuralElement::new(ElementKind::Function, "hello", 1, 1)]
        );
    }

    #[test]
    fn extracts_python_class_and_methods() {
        let source = "\
class Greeter:
    def greet(self):
        return 'hi'

    def wave(self):
        pass
";
        let elements = parse(source, Language::Python);

        let class: Vec<_> = elements.iter().filter(|e| e.kind == ElementKind::Class).collect();
        assert_eq!(class.len(), 1);
        assert_eq!(class[0].name, "Greeter");
        assert_eq!(class[0].start_line, 1);
        assert_eq!(class[0].end_line, 6);

        let functions: Vec<_> = elements
            .iter()
            .filter(|e| e.kind == ElementKind::Function)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(functions, vec!["greet", "wave"]);
    }

    #[test]
    fn extracts_python_import_forms() {
        let source = "\
import os.path
import json as j
from collections import OrderedDict
from ..pkg import util
";
        let names: Vec<_> = parse(source, Language::Python)
            .into_iter()
            .filter(|e| e.kind == ElementKind::Import)
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["os.path", "json", "collections", "..pkg"]);
    }

    #[test]
    fn extracts_rust_elements() {
        let source = "\
use std::collections::HashMap;

struct Config {
    name: String,
}

fn main() {
    let _ = HashMap::<String, Config>::new();
}
";
        let elements = parse(source, Language::Rust);

        assert!(elements
            .iter()
            .any(|e| e.kind == ElementKind::Import && e.name == "std::collections::HashMap"));
        assert!(elements
            .iter()
            .any(|e| e.kind == ElementKind::Class && e.name == "Config"));
        assert!(elements
            .iter()
            .any(|e| e.kind == ElementKind::Function && e.name == "main"));
    }

    #[test]
    fn extracts_javascript_import_without_quotes() {
        let source = "import { helper } from './util.js';\nfunction run() {}\n";
        let elements = parse(source, Language::JavaScript);

        let import = elements
            .iter()
            .find(|e| e.kind == ElementKind::Import)
            .unwrap();
        assert_eq!(import.name, "./util.js");

        assert!(elements
            .iter()
            .any(|e| e.kind == ElementKind::Function && e.name == "run"));
    }

    #[test]
    fn typescript_interface_counts_as_class() {
        let source = "interface Shape { area(): number }\nclass Circle {}\n";
        let names: Vec<_> = parse(source, Language::TypeScript)
            .into_iter()
            .filter(|e| e.kind == ElementKind::Class)
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Shape", "Circle"]);
    }

    #[test]
    fn unsupported_language_yields_empty() {
        assert!(parse("def x(): pass", Language::Unknown).is_empty());
    }

    #[test]
    fn malformed_source_yields_partial_result() {
        let source = "def ok(): ...\n\ndef broken(:\n";
        let elements = parse(source, Language::Python);
        assert!(elements
            .iter()
            .any(|e| e.kind == ElementKind::Function && e.name == "ok"));
    }

    #[test]
    fn elements_are_ordered_by_start_line() {
        let source = "\
import sys

def first(): ...

class Later:
    pass
";
        let elements = parse(source, Language::Python);
        let lines: Vec<_> = elements.iter().map(|e| e.start_line).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted);
    }
}
