use crate::error::{ComposeError, Result};
use crate::source::SyntaxSource;
use crate::types::{DeclarationKind, NodeKind, SyntaxNode};
use async_trait::async_trait;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// One named piece of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub text: String,
}

/// A C# document made of one or more fragments, parsed with tree-sitter
#[derive(Debug, Clone)]
pub struct CSharpDocument {
    fragments: Vec<Fragment>,
    attach_comments: bool,
}

impl Default for CSharpDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CSharpDocument {
    /// Create an empty document
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fragments: Vec::new(),
            attach_comments: true,
        }
    }

    /// Create a document from a single fragment
    pub fn from_source(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.add_fragment(name, text);
        doc
    }

    /// Read every file in `paths` as one fragment, in the given order
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut doc = Self::new();
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path)?;
            doc.add_fragment(path.to_string_lossy(), text);
        }
        Ok(doc)
    }

    /// Append a fragment
    pub fn add_fragment(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.fragments.push(Fragment {
            name: name.into(),
            text: text.into(),
        });
    }

    /// Builder: fold adjacent comments into declaration text
    #[must_use]
    pub const fn with_comments(mut self, attach: bool) -> Self {
        self.attach_comments = attach;
        self
    }

    /// Fragments in insertion order
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Check if `path` looks like a C# source file
    pub fn is_source_path(path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
    }

    /// Parse all fragments into one tree
    pub fn parse(&self) -> Result<SyntaxNode> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| ComposeError::tree_sitter(format!("Failed to set language: {e}")))?;

        let mut units = Vec::with_capacity(self.fragments.len());
        for fragment in &self.fragments {
            let tree = parser
                .parse(&fragment.text, None)
                .ok_or_else(|| ComposeError::parse(format!("Failed to parse {}", fragment.name)))?;

            let root = tree.root_node();
            if root.has_error() {
                log::warn!(
                    "{} contains syntax errors; declarations are taken as parsed",
                    fragment.name
                );
            }

            let lowering = Lowering {
                source: &fragment.text,
                attach_comments: self.attach_comments,
            };
            let unit = lowering.lower(root);
            log::debug!(
                "Parsed {}: {} declaration(s)",
                fragment.name,
                unit.declaration_count()
            );
            units.push(unit);
        }

        Ok(SyntaxNode::root(units))
    }
}

#[async_trait]
impl SyntaxSource for CSharpDocument {
    async fn syntax_root(&self) -> Result<SyntaxNode> {
        self.parse()
    }
}

/// Map a tree-sitter node kind onto the collected declaration kinds
fn declaration_kind(kind: &str) -> Option<DeclarationKind> {
    match kind {
        "class_declaration" => Some(DeclarationKind::Class),
        "struct_declaration" => Some(DeclarationKind::Struct),
        "method_declaration" => Some(DeclarationKind::Method),
        "field_declaration" => Some(DeclarationKind::Field),
        "property_declaration" => Some(DeclarationKind::Property),
        "event_declaration" => Some(DeclarationKind::Event),
        "event_field_declaration" => Some(DeclarationKind::EventField),
        "delegate_declaration" => Some(DeclarationKind::Delegate),
        "constructor_declaration" => Some(DeclarationKind::Constructor),
        "enum_declaration" => Some(DeclarationKind::Enum),
        _ => None,
    }
}

/// Converts a tree-sitter tree into owned [`SyntaxNode`]s
struct Lowering<'s> {
    source: &'s str,
    attach_comments: bool,
}

impl Lowering<'_> {
    fn lower(&self, node: Node) -> SyntaxNode {
        match declaration_kind(node.kind()) {
            Some(kind) => self.lower_declaration(node, kind, node.start_byte(), node.end_byte()),
            None => SyntaxNode::other(node.kind(), self.lower_children(node)),
        }
    }

    /// Lower named children, folding comments into neighbouring declarations
    fn lower_children(&self, node: Node) -> Vec<SyntaxNode> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();

        let mut out = Vec::new();
        let mut leading: Option<Node> = None;
        let mut prev_end_row = None;
        let mut idx = 0;

        while idx < children.len() {
            let child = children[idx];
            idx += 1;

            if child.kind() == "comment" {
                // A comment sharing a line with the previous node trails it.
                let trails_previous = prev_end_row == Some(child.start_position().row);
                if self.attach_comments && !trails_previous && leading.is_none() {
                    leading = Some(child);
                }
                continue;
            }
            prev_end_row = Some(child.end_position().row);

            let Some(kind) = declaration_kind(child.kind()) else {
                leading = None;
                if child.is_named() {
                    out.push(self.lower(child));
                }
                continue;
            };

            let start = leading.take().map_or(child.start_byte(), |c| c.start_byte());
            let mut end = child.end_byte();

            // A block comment starting on the line the declaration ends on belongs
            // to it. `//` comments never do: extension text is packed onto one line.
            if self.attach_comments {
                if let Some(next) = children.get(idx) {
                    if next.kind() == "comment"
                        && next.start_position().row == child.end_position().row
                        && !self.text(*next).starts_with("//")
                    {
                        end = next.end_byte();
                        prev_end_row = Some(next.end_position().row);
                        idx += 1;
                    }
                }
            }

            out.push(self.lower_declaration(child, kind, start, end));
        }

        out
    }

    fn lower_declaration(
        &self,
        node: Node,
        kind: DeclarationKind,
        start: usize,
        end: usize,
    ) -> SyntaxNode {
        let token = last_token(node);
        let closing_brace = (token.kind() == "}" && !token.is_missing())
            .then(|| token.start_byte() - start);

        // Only classes are descended into; other declarations travel whole.
        let children = if kind == DeclarationKind::Class {
            self.lower_children(node)
        } else {
            Vec::new()
        };

        SyntaxNode {
            kind: NodeKind::Declaration(kind),
            name: self.declared_name(node),
            text: self.source[start..end].to_string(),
            closing_brace,
            start_line: node.start_position().row + 1,
            children,
        }
    }

    /// Name of a declaration; fields and event fields name their first variable
    fn declared_name(&self, node: Node) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.text(name).to_string());
        }

        let mut cursor = node.walk();
        let variables = node
            .children(&mut cursor)
            .find(|c| c.kind() == "variable_declaration")?;

        let mut cursor = variables.walk();
        let declarator = variables
            .children(&mut cursor)
            .find(|c| c.kind() == "variable_declarator")?;

        let name = declarator.child_by_field_name("name").or_else(|| {
            let mut cursor = declarator.walk();
            let found = declarator
                .children(&mut cursor)
                .find(|c| c.kind() == "identifier");
            found
        })?;

        Some(self.text(name).to_string())
    }

    fn text(&self, node: Node) -> &str {
        &self.source[node.start_byte()..node.end_byte()]
    }
}

/// Rightmost leaf of `node`, ignoring comments and other extras
fn last_token(node: Node) -> Node {
    let mut current = node;
    loop {
        let next = (0..current.child_count())
            .rev()
            .filter_map(|i| current.child(i))
            .find(|c| !c.is_extra());

        match next {
            Some(child) => current = child,
            None => return current,
        }
    }
}
