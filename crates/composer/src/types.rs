use serde::{Deserialize, Serialize};

/// A node of the owned syntax tree handed to the generator
///
/// Nodes are built once by a [`SyntaxSource`](crate::SyntaxSource) and never
/// mutated afterwards; the pipeline only references and renders them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyntaxNode {
    /// What this node is
    pub kind: NodeKind,

    /// Declared name (identifier only, no type parameters)
    pub name: Option<String>,

    /// Verbatim source text; empty for non-declaration nodes
    pub text: String,

    /// Byte offset into `text` of the closing `}` when that brace is the
    /// last significant token of the declaration
    pub closing_brace: Option<usize>,

    /// Start line (1-indexed, 0 when unknown)
    pub start_line: usize,

    /// Child nodes in source order
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a document root over the given children
    #[must_use]
    pub fn root(children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: NodeKind::Root,
            name: None,
            text: String::new(),
            closing_brace: None,
            start_line: 0,
            children,
        }
    }

    /// Create a pass-through node of an arbitrary kind
    pub fn other(kind: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: NodeKind::Other(kind.into()),
            name: None,
            text: String::new(),
            closing_brace: None,
            start_line: 0,
            children,
        }
    }

    /// Create a declaration from its verbatim text
    ///
    /// The closing brace is taken to be the last non-whitespace character of
    /// `text` when that character is `}`. Sources with token data should
    /// override it with [`SyntaxNode::with_closing_brace`].
    pub fn declaration(
        kind: DeclarationKind,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let trimmed = text.trim_end();
        let closing_brace = trimmed
            .ends_with('}')
            .then(|| trimmed.len() - 1);

        Self {
            kind: NodeKind::Declaration(kind),
            name: Some(name.into()),
            text,
            closing_brace,
            start_line: 0,
            children: Vec::new(),
        }
    }

    /// Builder: set closing brace offset
    #[must_use]
    pub const fn with_closing_brace(mut self, offset: Option<usize>) -> Self {
        self.closing_brace = offset;
        self
    }

    /// Builder: set children
    #[must_use]
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Declaration kind, if this node is a declaration
    #[must_use]
    pub const fn declaration_kind(&self) -> Option<DeclarationKind> {
        match self.kind {
            NodeKind::Declaration(kind) => Some(kind),
            _ => None,
        }
    }

    /// Name with any namespace qualifier stripped (`A.B.Program` -> `Program`)
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.rsplit('.').next())
    }

    /// Count declaration nodes in this subtree (including self)
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        let own = usize::from(self.declaration_kind().is_some());
        own + self
            .children
            .iter()
            .map(Self::declaration_count)
            .sum::<usize>()
    }
}

/// Kind of a syntax tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum NodeKind {
    /// Document root; children are fragments or top-level items
    Root,
    /// A declaration the classifier knows how to place
    Declaration(DeclarationKind),
    /// Any other node; only its children are inspected
    Other(String),
}

/// Closed set of declaration kinds the classifier collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum DeclarationKind {
    Class,
    Struct,
    Method,
    Field,
    Property,
    Event,
    EventField,
    Delegate,
    Constructor,
    Enum,
}

impl DeclarationKind {
    /// Every collected kind
    pub const ALL: [DeclarationKind; 10] = [
        Self::Class,
        Self::Struct,
        Self::Method,
        Self::Field,
        Self::Property,
        Self::Event,
        Self::EventField,
        Self::Delegate,
        Self::Constructor,
        Self::Enum,
    ];

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Method => "method",
            Self::Field => "field",
            Self::Property => "property",
            Self::Event => "event",
            Self::EventField => "event-field",
            Self::Delegate => "delegate",
            Self::Constructor => "constructor",
            Self::Enum => "enum",
        }
    }
}
