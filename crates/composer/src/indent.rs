//! Common-indent removal for rendered blocks.
//!
//! The block's indent `W` is measured in visual units (a tab counts as
//! `tab_width`, anything else as one), but it is applied as a raw character
//! count: each line loses at most `W` leading whitespace characters. Lines
//! indented with a different mix of tabs and spaces than the line that set
//! `W` can therefore be stripped unevenly. Output compatibility depends on
//! this, so it is kept as is.

/// Line separator of normalized blocks
pub const CRLF: &str = "\r\n";

/// Removes the minimal common indentation from a block of lines
#[derive(Debug, Clone, Copy)]
pub struct IndentNormalizer {
    tab_width: usize,
}

impl Default for IndentNormalizer {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl IndentNormalizer {
    #[must_use]
    pub const fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    /// Visual width of the leading whitespace of `line`
    #[must_use]
    pub fn visual_width(&self, line: &str) -> usize {
        line.chars()
            .take_while(|c| c.is_whitespace())
            .map(|c| if c == '\t' { self.tab_width } else { 1 })
            .sum()
    }

    /// Strip the common indent and join the result with CRLF
    #[must_use]
    pub fn normalize<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let lines: Vec<&str> = lines
            .iter()
            .map(|line| {
                let line = line.as_ref();
                if line.trim().is_empty() { "" } else { line }
            })
            .collect();

        // Unindented lines do not count; only a positive width can set W.
        let indent = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| self.visual_width(line))
            .filter(|&width| width > 0)
            .min();

        let Some(indent) = indent else {
            return lines.join(CRLF);
        };

        lines
            .iter()
            .map(|line| strip_prefix_chars(line, indent))
            .collect::<Vec<_>>()
            .join(CRLF)
    }
}

/// Drop up to `count` leading characters, stopping early at non-whitespace
fn strip_prefix_chars(line: &str, count: usize) -> &str {
    for (position, (offset, ch)) in line.char_indices().enumerate() {
        if position == count {
            return &line[offset..];
        }
        if !ch.is_whitespace() {
            return &line[offset..];
        }
    }
    ""
}
