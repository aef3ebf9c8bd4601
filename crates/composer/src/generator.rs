use crate::assembler::TextAssembler;
use crate::classifier::{Bucket, DeclarationClassifier};
use crate::composer::{NormalizedBlock, ScriptComposer};
use crate::config::GeneratorConfig;
use crate::error::{ComposeError, Result};
use crate::indent::IndentNormalizer;
use crate::source::SyntaxSource;
use crate::types::SyntaxNode;

/// Main entry point: turns one document into one flat script
pub struct ScriptGenerator {
    config: GeneratorConfig,
}

impl ScriptGenerator {
    /// Create a new generator with configuration
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate().map_err(ComposeError::invalid_config)?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fetch the tree from `source` and generate the script
    pub async fn generate<S>(&self, source: &S) -> Result<String>
    where
        S: SyntaxSource + ?Sized,
    {
        let root = source.syntax_root().await?;
        self.generate_from_root(&root)
    }

    /// Generate the script from an already available tree
    pub fn generate_from_root(&self, root: &SyntaxNode) -> Result<String> {
        let classification = DeclarationClassifier::new(&self.config.program_class).classify(root);
        log::debug!(
            "Classified {} {} and {} {} declaration(s)",
            classification.program.len(),
            Bucket::Program.as_str(),
            classification.extension.len(),
            Bucket::Extension.as_str()
        );

        for bucket in [Bucket::Program, Bucket::Extension] {
            for node in classification.bucket(bucket) {
                log::trace!(
                    "{}: {} {} (line {})",
                    bucket.as_str(),
                    node.declaration_kind().map_or("?", |k| k.as_str()),
                    node.name.as_deref().unwrap_or("<anonymous>"),
                    node.start_line
                );
            }
        }

        if classification.program.is_empty() {
            log::debug!("No members found in class {}", self.config.program_class);
        }

        let normalizer = IndentNormalizer::new(self.config.tab_width);

        let program = TextAssembler::assemble(&classification.program, Bucket::Program);
        let program_text = normalizer.normalize(&program.lines);

        let extension = TextAssembler::assemble(&classification.extension, Bucket::Extension);
        let extension = NormalizedBlock {
            text: normalizer.normalize(&extension.lines),
            seam: extension.seam,
            declarations: extension.declarations,
        };

        ScriptComposer::new(self.config.unstitched_extension).compose(&program_text, &extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnstitchedPolicy;
    use crate::types::DeclarationKind;
    use pretty_assertions::assert_eq;

    fn program(members: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::declaration(DeclarationKind::Class, "Program", "class Program { }")
            .with_children(vec![SyntaxNode::other("declaration_list", members)])
    }

    fn generator() -> ScriptGenerator {
        ScriptGenerator::new(GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_single_method_program() {
        let method = "void Main() { Echo(\"hi\"); }";
        let tree = SyntaxNode::root(vec![program(vec![SyntaxNode::declaration(
            DeclarationKind::Method,
            "Main",
            format!("\n        {method}\n"),
        )])]);

        assert_eq!(generator().generate_from_root(&tree).unwrap(), method);
    }

    #[test]
    fn test_program_with_helper_class() {
        let tree = SyntaxNode::root(vec![
            program(vec![SyntaxNode::declaration(
                DeclarationKind::Method,
                "Main",
                "void Main() { }",
            )]),
            SyntaxNode::declaration(
                DeclarationKind::Class,
                "Helper",
                "class Helper\n    {\n        int x;\n    }",
            ),
        ]);

        let script = generator().generate_from_root(&tree).unwrap();
        assert_eq!(
            script,
            "void Main() { }\n\n}\n\nclass Helper\r\n{\r\n    int x;\r\n"
        );
    }

    #[test]
    fn test_program_members_are_deindented() {
        let tree = SyntaxNode::root(vec![program(vec![
            SyntaxNode::declaration(DeclarationKind::Field, "count", "int count;"),
            SyntaxNode::declaration(
                DeclarationKind::Method,
                "Main",
                "void Main()\n        {\n            count++;\n        }",
            ),
        ])]);

        let script = generator().generate_from_root(&tree).unwrap();
        assert_eq!(
            script,
            "int count;\r\n\r\nvoid Main()\r\n{\r\n    count++;\r\n}"
        );
    }

    #[test]
    fn test_no_program_class() {
        let tree = SyntaxNode::root(vec![SyntaxNode::declaration(
            DeclarationKind::Class,
            "Helper",
            "class Helper { }",
        )]);

        let script = generator().generate_from_root(&tree).unwrap();
        assert_eq!(script, "\n\n}\n\nclass Helper { ");
    }

    #[test]
    fn test_empty_tree() {
        let script = generator()
            .generate_from_root(&SyntaxNode::root(vec![]))
            .unwrap();
        assert_eq!(script, "");
    }

    #[test]
    fn test_unstitched_policy_applies() {
        let tree = SyntaxNode::root(vec![
            program(vec![SyntaxNode::declaration(
                DeclarationKind::Method,
                "Main",
                "void Main() { }",
            )]),
            SyntaxNode::declaration(DeclarationKind::Field, "stray", "int stray;"),
        ]);

        assert_eq!(
            generator().generate_from_root(&tree).unwrap(),
            "void Main() { }"
        );

        let strict = ScriptGenerator::new(GeneratorConfig::strict()).unwrap();
        assert!(matches!(
            strict.generate_from_root(&tree),
            Err(ComposeError::UnstitchedExtension { declarations: 1 })
        ));

        let config = GeneratorConfig {
            unstitched_extension: UnstitchedPolicy::Append,
            ..Default::default()
        };
        let lossless = ScriptGenerator::new(config).unwrap();
        assert_eq!(
            lossless.generate_from_root(&tree).unwrap(),
            "void Main() { }\n\nint stray;"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            tab_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            ScriptGenerator::new(config),
            Err(ComposeError::InvalidConfig(_))
        ));
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl SyntaxSource for FailingSource {
        async fn syntax_root(&self) -> Result<SyntaxNode> {
            Err(ComposeError::parse("compilation unavailable"))
        }
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let err = generator().generate(&FailingSource).await.unwrap_err();
        assert!(matches!(err, ComposeError::Parse(msg) if msg == "compilation unavailable"));
    }

    #[tokio::test]
    async fn test_generate_awaits_source() {
        let tree = SyntaxNode::root(vec![program(vec![SyntaxNode::declaration(
            DeclarationKind::Method,
            "Main",
            "void Main() { }",
        )])]);

        let script = generator().generate(&tree).await.unwrap();
        assert_eq!(script, "void Main() { }");
    }
}
