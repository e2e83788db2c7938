use serde::Deserialize;

/// How reasoning output is surfaced and requested
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReasoningConfig {
    /// Merge upstream reasoning into the answer inside `<think>` markers
    #[serde(default)]
    pub display: bool,
    /// Ask thinking-capable models to emit reasoning
    #[serde(default)]
    pub thinking_mode: bool,
}
