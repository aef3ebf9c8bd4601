//! # Flatscript Composer
//!
//! Flattens a multi-fragment C# document into the single script body expected
//! by consumers that accept exactly one unstructured file: no namespaces, no
//! using-directives, the program body first and supporting types after it.
//!
//! ## Architecture
//!
//! ```text
//! SyntaxSource (async, e.g. CSharpDocument over tree-sitter)
//!     │
//!     └──> SyntaxNode tree
//!          │
//!          ├──> DeclarationClassifier
//!          │    ├─> program bucket   (members of class `Program`)
//!          │    └─> extension bucket (every other top-level declaration)
//!          │
//!          ├──> TextAssembler      (verbatim text, "\n\n" / " " joiners)
//!          ├──> IndentNormalizer   (common indent removed, CRLF lines)
//!          │
//!          └──> ScriptComposer     (program + "\n\n}\n\n" + extension tail)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use flatscript_composer::{CSharpDocument, GeneratorConfig, ScriptGenerator};
//!
//! let code = r#"
//! namespace Demo
//! {
//!     class Program
//!     {
//!         void Main() { Echo("tick"); }
//!     }
//! }
//! "#;
//!
//! let generator = ScriptGenerator::new(GeneratorConfig::default()).unwrap();
//! let root = CSharpDocument::from_source("Program.cs", code).parse().unwrap();
//! let script = generator.generate_from_root(&root).unwrap();
//! assert_eq!(script, "void Main() { Echo(\"tick\"); }");
//! ```

mod assembler;
mod classifier;
mod composer;
mod config;
mod csharp;
mod error;
mod generator;
mod indent;
mod source;
mod types;

pub use assembler::{split_lines, RenderedBlock, Seam, TextAssembler};
pub use classifier::{Bucket, Classification, DeclarationClassifier};
pub use composer::{NormalizedBlock, ScriptComposer, SEAM};
pub use config::{GeneratorConfig, UnstitchedPolicy};
pub use csharp::{CSharpDocument, Fragment};
pub use error::{ComposeError, Result};
pub use generator::ScriptGenerator;
pub use indent::{IndentNormalizer, CRLF};
pub use source::SyntaxSource;
pub use types::{DeclarationKind, NodeKind, SyntaxNode};
