use crate::error::Result;
use crate::types::SyntaxNode;
use async_trait::async_trait;

/// A compiled document that can hand over its syntax tree
///
/// Retrieval is the only point where generation suspends. Errors returned
/// here reach the caller of [`ScriptGenerator::generate`](crate::ScriptGenerator::generate)
/// unchanged.
#[async_trait]
pub trait SyntaxSource: Send + Sync {
    async fn syntax_root(&self) -> Result<SyntaxNode>;
}

/// An already-built tree is its own source
#[async_trait]
impl SyntaxSource for SyntaxNode {
    async fn syntax_root(&self) -> Result<SyntaxNode> {
        Ok(self.clone())
    }
}
