use thiserror::Error;

/// Result type for script composition
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Errors that can occur while producing a flat script
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Failed to parse a source fragment
    #[error("Parse error: {0}")]
    Parse(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Extension declarations exist but do not end in a closing brace
    #[error("{declarations} extension declaration(s) cannot be stitched: block does not close with '}}'")]
    UnstitchedExtension { declarations: usize },
}

impl ComposeError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
