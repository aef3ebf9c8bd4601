use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for script generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Simple name of the class whose members form the script body
    pub program_class: String,

    /// Visual width of a tab when measuring indentation
    pub tab_width: usize,

    /// What to do with extension content that has no closing brace to stitch on
    pub unstitched_extension: UnstitchedPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program_class: "Program".to_string(),
            tab_width: 4,
            unstitched_extension: UnstitchedPolicy::Drop,
        }
    }
}

impl GeneratorConfig {
    /// Create config that refuses to silently lose extension content
    pub fn strict() -> Self {
        Self {
            unstitched_extension: UnstitchedPolicy::Fail,
            ..Default::default()
        }
    }

    /// Create config that keeps unstitchable extension content after the body
    pub fn lossless() -> Self {
        Self {
            unstitched_extension: UnstitchedPolicy::Append,
            ..Default::default()
        }
    }

    /// Parse config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate().map_err(ComposeError::invalid_config)?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let name = self.program_class.trim();
        if name.is_empty() {
            return Err("program_class must not be empty".to_string());
        }

        if name != self.program_class {
            return Err(format!(
                "program_class ({:?}) must not have surrounding whitespace",
                self.program_class
            ));
        }

        if name.contains('.') {
            return Err(format!(
                "program_class ({}) must be a simple name without namespace qualifier",
                self.program_class
            ));
        }

        if self.tab_width == 0 {
            return Err("tab_width must be > 0".to_string());
        }

        Ok(())
    }
}

/// Policy for extension content that does not end in a closing brace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnstitchedPolicy {
    /// Emit the program part only (compatible output), warning when content is lost
    #[default]
    Drop,

    /// Refuse to generate
    Fail,

    /// Emit the extension content after the program part without a seam
    Append,
}

impl UnstitchedPolicy {
    /// Get policy name as used in config files and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Fail => "fail",
            Self::Append => "append",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.program_class, "Program");
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.unstitched_extension, UnstitchedPolicy::Drop);
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(GeneratorConfig::strict().validate().is_ok());
        assert!(GeneratorConfig::lossless().validate().is_ok());
        assert_eq!(
            GeneratorConfig::strict().unstitched_extension,
            UnstitchedPolicy::Fail
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = GeneratorConfig::default();

        config.program_class = "  ".to_string();
        assert!(config.validate().is_err());

        config.program_class = "Game.Program".to_string();
        assert!(config.validate().is_err());

        config.program_class = " Program".to_string();
        assert!(config.validate().is_err());

        config.program_class = "Program\t".to_string();
        assert!(config.validate().is_err());

        config.program_class = "Script".to_string();
        config.tab_width = 0;
        assert!(config.validate().is_err());

        config.tab_width = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GeneratorConfig::from_toml_str("unstitched_extension = \"append\"\n").unwrap();
        assert_eq!(config.unstitched_extension, UnstitchedPolicy::Append);
        assert_eq!(config.program_class, "Program");
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("tab_width = 0"),
            Err(ComposeError::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("tab_width = \"wide\""),
            Err(ComposeError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flatscript.toml");
        std::fs::write(&path, "program_class = \"Script\"\ntab_width = 2\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.program_class, "Script");
        assert_eq!(config.tab_width, 2);
    }

    #[test]
    fn test_policy_names() {
        for policy in [
            UnstitchedPolicy::Drop,
            UnstitchedPolicy::Fail,
            UnstitchedPolicy::Append,
        ] {
            let text = format!("unstitched_extension = \"{}\"", policy.as_str());
            let config = GeneratorConfig::from_toml_str(&text).unwrap();
            assert_eq!(config.unstitched_extension, policy);
        }
    }
}
