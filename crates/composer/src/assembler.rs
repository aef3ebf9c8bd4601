use crate::classifier::Bucket;
use crate::types::SyntaxNode;

/// Location of the closing brace that ends a rendered block
///
/// Stored as the number of `}` characters that follow the closing brace token
/// (inside trailing trivia such as `} // }`). Indent normalization only
/// removes whitespace, so counting braces from the end finds the same token
/// before and after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seam {
    trailing_braces: usize,
}

impl Seam {
    /// Derive the seam from the last significant token of `node`
    #[must_use]
    pub fn of(node: &SyntaxNode) -> Option<Self> {
        let offset = node.closing_brace?;
        if node.text.as_bytes().get(offset) != Some(&b'}') {
            log::debug!(
                "closing brace offset {offset} does not point at '}}' in {:?}",
                node.name
            );
            return None;
        }

        let trailing_braces = node.text[offset + 1..].matches('}').count();
        Some(Self { trailing_braces })
    }

    /// Remove the closing brace token from `text`, keeping everything else
    #[must_use]
    pub fn strip(self, text: &str) -> Option<String> {
        let (index, _) = text.rmatch_indices('}').nth(self.trailing_braces)?;
        let mut out = String::with_capacity(text.len() - 1);
        out.push_str(&text[..index]);
        out.push_str(&text[index + 1..]);
        Some(out)
    }
}

/// One bucket rendered to text and split into lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub lines: Vec<String>,
    /// Closing brace of the last declaration, if it ends in one
    pub seam: Option<Seam>,
    /// Number of declarations rendered into this block
    pub declarations: usize,
}

/// Renders bucket contents to verbatim text
pub struct TextAssembler;

impl TextAssembler {
    /// Join the trimmed text of `nodes` with the bucket's separator
    #[must_use]
    pub fn render(nodes: &[&SyntaxNode], bucket: Bucket) -> String {
        nodes
            .iter()
            .map(|node| node.text.trim())
            .collect::<Vec<_>>()
            .join(bucket.joiner())
    }

    /// Render `nodes` and split the result into lines
    #[must_use]
    pub fn assemble(nodes: &[&SyntaxNode], bucket: Bucket) -> RenderedBlock {
        let text = Self::render(nodes, bucket);

        RenderedBlock {
            lines: split_lines(&text),
            seam: nodes.last().and_then(|node| Seam::of(node)),
            declarations: nodes.len(),
        }
    }
}

/// Split on CRLF or bare LF; empty segments are kept
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclarationKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_program_bucket_uses_blank_line() {
        let a = SyntaxNode::declaration(DeclarationKind::Method, "A", "  void A() { }  \n");
        let b = SyntaxNode::declaration(DeclarationKind::Method, "B", "\tvoid B() { }");

        let text = TextAssembler::render(&[&a, &b], Bucket::Program);
        assert_eq!(text, "void A() { }\n\nvoid B() { }");
    }

    #[test]
    fn test_extension_bucket_packs_with_space() {
        let a = SyntaxNode::declaration(DeclarationKind::Class, "A", "class A\n{\n}\n");
        let b = SyntaxNode::declaration(DeclarationKind::Enum, "E", "enum E { X }");

        let block = TextAssembler::assemble(&[&a, &b], Bucket::Extension);
        assert_eq!(block.lines, vec!["class A", "{", "} enum E { X }"]);
        assert_eq!(block.declarations, 2);
        assert!(block.seam.is_some());
    }

    #[test]
    fn test_split_lines_mixed_endings() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\rb"), vec!["a\rb"]);
    }

    #[test]
    fn test_empty_bucket() {
        let block = TextAssembler::assemble(&[], Bucket::Extension);
        assert_eq!(block.lines, vec![""]);
        assert_eq!(block.seam, None);
        assert_eq!(block.declarations, 0);
    }

    #[test]
    fn test_seam_only_from_last_node() {
        let class = SyntaxNode::declaration(DeclarationKind::Class, "A", "class A { }");
        let field = SyntaxNode::declaration(DeclarationKind::Field, "x", "int x;");

        let block = TextAssembler::assemble(&[&class, &field], Bucket::Extension);
        assert_eq!(block.seam, None);
    }

    #[test]
    fn test_seam_skips_braces_in_trailing_comment() {
        let text = "class A { } // closes }";
        let node = SyntaxNode::declaration(DeclarationKind::Class, "A", text)
            .with_closing_brace(Some(10));

        let seam = Seam::of(&node).unwrap();
        assert_eq!(seam.strip(text).unwrap(), "class A {  // closes }");
    }

    #[test]
    fn test_seam_rejects_bad_offset() {
        let node = SyntaxNode::declaration(DeclarationKind::Class, "A", "class A { }")
            .with_closing_brace(Some(2));
        assert_eq!(Seam::of(&node), None);
    }
}
