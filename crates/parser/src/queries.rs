//! Declarative structural pattern tables.
//!
//! Each supported language maps to one tree-sitter query per element kind:
//! class definitions, function definitions, and import statements. Adding a
//! language is adding a table entry here, not new parsing code.
//!
//! Capture conventions shared by every entry:
//! - `@name` / `@module` — the identifier text for the element
//! - `@class` / `@function` / `@import` — the definition node whose span
//!   becomes the element's line range

use crate::language::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Query source text for one language, one pattern per element kind.
pub(crate) struct QueryStrings {
    pub classes: &'static str,
    pub functions: &'static str,
    pub imports: &'static str,
}

const RUST_CLASSES: &str = r#"
    (struct_item name: (type_identifier) @name) @class
    (enum_item name: (type_identifier) @name) @class
    (trait_item name: (type_identifier) @name) @class
"#;

const RUST_FUNCTIONS: &str = r#"
    (function_item name: (identifier) @name) @function
"#;

const RUST_IMPORTS: &str = r#"
    (use_declaration argument: (_) @module) @import
"#;

const PYTHON_CLASSES: &str = r#"
    (class_definition name: (identifier) @name) @class
"#;

const PYTHON_FUNCTIONS: &str = r#"
    (function_definition name: (identifier) @name) @function
"#;

// Covers `import a.b`, `import a.b as c`, `from a.b import x`,
// and relative forms like `from ..pkg import x`.
const PYTHON_IMPORTS: &str = r#"
    (import_statement name: (dotted_name) @module) @import
    (import_statement name: (aliased_import name: (dotted_name) @module)) @import
    (import_from_statement module_name: (dotted_name) @module) @import
    (import_from_statement module_name: (relative_import) @module) @import
"#;

const JAVASCRIPT_CLASSES: &str = r#"
    (class_declaration name: (identifier) @name) @class
"#;

const JAVASCRIPT_FUNCTIONS: &str = r#"
    (function_declaration name: (identifier) @name) @function
    (method_definition name: (property_identifier) @name) @function
"#;

const JAVASCRIPT_IMPORTS: &str = r#"
    (import_statement source: (string) @module) @import
"#;

const TYPESCRIPT_CLASSES: &str = r#"
    (class_declaration name: (type_identifier) @name) @class
    (interface_declaration name: (type_identifier) @name) @class
"#;

const TYPESCRIPT_FUNCTIONS: &str = r#"
    (function_declaration name: (identifier) @name) @function
    (method_definition name: (property_identifier) @name) @function
"#;

const TYPESCRIPT_IMPORTS: &str = r#"
    (import_statement source: (string) @module) @import
"#;

/// Language identifier → named structural patterns.
pub(crate) static QUERY_TABLE: Lazy<HashMap<Language, QueryStrings>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        Language::Rust,
        QueryStrings {
            classes: RUST_CLASSES,
            functions: RUST_FUNCTIONS,
            imports: RUST_IMPORTS,
        },
    );
    table.insert(
        Language::Python,
        QueryStrings {
            classes: PYTHON_CLASSES,
            functions: PYTHON_FUNCTIONS,
            imports: PYTHON_IMPORTS,
        },
    );
    table.insert(
        Language::JavaScript,
        QueryStrings {
            classes: JAVASCRIPT_CLASSES,
            functions: JAVASCRIPT_FUNCTIONS,
            imports: JAVASCRIPT_IMPORTS,
        },
    );
    table.insert(
        Language::TypeScript,
        QueryStrings {
            classes: TYPESCRIPT_CLASSES,
            functions: TYPESCRIPT_FUNCTIONS,
            imports: TYPESCRIPT_IMPORTS,
        },
    );
    table
});
