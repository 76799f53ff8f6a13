//! Fixed system prompts, embedded at build time and optionally overridden
//! from a directory at startup.

use std::path::Path;

use anyhow::{Context, Result};

const CHATBOT: &str = include_str!("../../prompts/chatbot.txt");
const SEARCH: &str = include_str!("../../prompts/search.txt");
const COMPILE: &str = include_str!("../../prompts/compile.txt");
const COMPARE: &str = include_str!("../../prompts/compare.txt");
const SHOPPING_SYSTEM: &str = include_str!("../../prompts/shopping_system.txt");

/// Prompt set shared by every domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    /// Chat turn system prompt
    pub chatbot: String,
    /// Per-item web search instructions
    pub search: String,
    /// Compile-the-comparison instructions
    pub compile: String,
    /// Two-item compare instructions
    pub compare: String,
    /// Shopping advisor system message
    pub shopping_system: String,
}

impl Prompts {
    /// The prompts compiled into the binary.
    pub fn embedded() -> Self {
        Self {
            chatbot: CHATBOT.to_string(),
            search: SEARCH.to_string(),
            compile: COMPILE.to_string(),
            compare: COMPARE.to_string(),
            shopping_system: SHOPPING_SYSTEM.trim().to_string(),
        }
    }

    /// Embedded prompts, with any file present in `dir` taking precedence.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut prompts = Self::embedded();
        let Some(dir) = dir else {
            return Ok(prompts);
        };

        let slots: [(&str, &mut String); 5] = [
            ("chatbot.txt", &mut prompts.chatbot),
            ("search.txt", &mut prompts.search),
            ("compile.txt", &mut prompts.compile),
            ("compare.txt", &mut prompts.compare),
            ("shopping_system.txt", &mut prompts.shopping_system),
        ];

        for (file, slot) in slots {
            let path = dir.join(file);
            if !path.exists() {
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt file {}", path.display()))?;
            tracing::info!(path = %path.display(), "Prompt overridden from file");
            *slot = text.trim().to_string();
        }

        Ok(prompts)
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self::embedded()
    }
}
