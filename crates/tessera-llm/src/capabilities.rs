use std::collections::HashSet;

use tessera_config::ModelsConfig;

/// Per-model request-shape requirements, fixed at startup
#[derive(Debug, Clone, Default)]
pub struct ModelCapabilities {
    structured_content: HashSet<String>,
    thinking: HashSet<String>,
}

impl ModelCapabilities {
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self {
            structured_content: config.structured_content.iter().cloned().collect(),
            thinking: config.thinking.iter().cloned().collect(),
        }
    }

    /// Whether the model only accepts array-of-parts message content
    pub fn requires_structured_content(&self, model: &str) -> bool {
        self.structured_content.contains(model)
    }

    /// Whether the model understands the thinking extension
    pub fn supports_thinking(&self, model: &str) -> bool {
        self.thinking.contains(model)
    }
}
