use crate::types::{DeclarationKind, NodeKind, SyntaxNode};

/// Destination of a collected declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Members of the program class; they form the script body
    Program,
    /// Everything else; appended after the body
    Extension,
}

impl Bucket {
    /// Separator placed between rendered declarations of this bucket
    #[must_use]
    pub const fn joiner(self) -> &'static str {
        match self {
            Self::Program => "\n\n",
            Self::Extension => " ",
        }
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Extension => "extension",
        }
    }
}

/// Top-level declarations partitioned by bucket, each in source order
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub program: Vec<&'a SyntaxNode>,
    pub extension: Vec<&'a SyntaxNode>,
}

impl<'a> Classification<'a> {
    /// Declarations of one bucket
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[&'a SyntaxNode] {
        match bucket {
            Bucket::Program => &self.program,
            Bucket::Extension => &self.extension,
        }
    }

    fn push(&mut self, bucket: Bucket, node: &'a SyntaxNode) {
        match bucket {
            Bucket::Program => self.program.push(node),
            Bucket::Extension => self.extension.push(node),
        }
    }
}

/// Partitions a syntax tree into program and extension declarations
pub struct DeclarationClassifier<'c> {
    program_class: &'c str,
}

impl<'c> DeclarationClassifier<'c> {
    /// Create a classifier that redirects members of `program_class`
    #[must_use]
    pub const fn new(program_class: &'c str) -> Self {
        Self { program_class }
    }

    /// Walk `root` depth-first, pre-order, and collect declarations
    #[must_use]
    pub fn classify<'a>(&self, root: &'a SyntaxNode) -> Classification<'a> {
        let mut out = Classification::default();
        self.visit(root, Bucket::Extension, &mut out);
        out
    }

    fn visit<'a>(&self, node: &'a SyntaxNode, active: Bucket, out: &mut Classification<'a>) {
        match &node.kind {
            NodeKind::Declaration(DeclarationKind::Class)
                if node.simple_name() == Some(self.program_class) =>
            {
                // The redirect ends with this call; the caller's bucket is restored on return.
                self.visit_children(node, Bucket::Program, out);
            }
            NodeKind::Declaration(
                DeclarationKind::Class
                | DeclarationKind::Struct
                | DeclarationKind::Method
                | DeclarationKind::Field
                | DeclarationKind::Property
                | DeclarationKind::Event
                | DeclarationKind::EventField
                | DeclarationKind::Delegate
                | DeclarationKind::Constructor
                | DeclarationKind::Enum,
            ) => out.push(active, node),
            NodeKind::Root | NodeKind::Other(_) => self.visit_children(node, active, out),
        }
    }

    fn visit_children<'a>(
        &self,
        node: &'a SyntaxNode,
        active: Bucket,
        out: &mut Classification<'a>,
    ) {
        for child in &node.children {
            self.visit(child, active, out);
        }
    }
}
