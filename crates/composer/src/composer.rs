use crate::assembler::Seam;
use crate::config::UnstitchedPolicy;
use crate::error::{ComposeError, Result};

/// Text placed between the program part and a stitched extension part
pub const SEAM: &str = "\n\n}\n\n";

/// A rendered and indent-normalized bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBlock {
    pub text: String,
    pub seam: Option<Seam>,
    pub declarations: usize,
}

impl NormalizedBlock {
    /// Block with nothing in it
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            text: String::new(),
            seam: None,
            declarations: 0,
        }
    }
}

/// Merges the program and extension parts into the final script
pub struct ScriptComposer {
    policy: UnstitchedPolicy,
}

impl ScriptComposer {
    #[must_use]
    pub const fn new(policy: UnstitchedPolicy) -> Self {
        Self { policy }
    }

    /// Compose `program` and `extension` into one script
    ///
    /// When the extension block closes with a brace, that brace is removed and
    /// the script becomes `program + "\n\n}\n\n" + extension`. The extra `}`
    /// closes the consumer's implicit wrapper around the program body, and the
    /// consumer supplies the brace that was removed.
    pub fn compose(&self, program: &str, extension: &NormalizedBlock) -> Result<String> {
        if let Some(tail) = extension.seam.and_then(|seam| seam.strip(&extension.text)) {
            let mut script = String::with_capacity(program.len() + SEAM.len() + tail.len());
            script.push_str(program);
            script.push_str(SEAM);
            script.push_str(&tail);
            return Ok(script);
        }

        if extension.text.trim().is_empty() {
            return Ok(program.to_string());
        }

        match self.policy {
            UnstitchedPolicy::Drop => {
                log::warn!(
                    "Dropping {} extension declaration(s): block does not end with a closing brace",
                    extension.declarations
                );
                Ok(program.to_string())
            }
            UnstitchedPolicy::Fail => Err(ComposeError::UnstitchedExtension {
                declarations: extension.declarations,
            }),
            UnstitchedPolicy::Append => Ok(format!("{program}\n\n{}", extension.text)),
        }
    }
}
