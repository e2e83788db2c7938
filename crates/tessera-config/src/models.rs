use indexmap::IndexMap;
use serde::Deserialize;

/// Caller-facing model names mapped to upstream model ids
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "nvidia/llama-3.1-nemotron-ultra-253b-v1"),
    ("gpt-4", "qwen/qwen3-coder-480b-a35b-instruct"),
    ("gpt-4-turbo", "moonshotai/kimi-k2-instruct-0905"),
    ("gpt-4o", "deepseek-ai/deepseek-v3.1"),
    ("claude-3-opus", "openai/gpt-oss-120b"),
    ("claude-3-sonnet", "openai/gpt-oss-20b"),
    ("gemini-pro", "qwen/qwen3-next-80b-a3b-thinking"),
];

/// Upstream models that only accept array-of-parts message content
const DEFAULT_STRUCTURED_CONTENT: &[&str] = &[
    "meta/llama-3.2-11b-vision-instruct",
    "meta/llama-3.2-90b-vision-instruct",
    "microsoft/phi-3.5-vision-instruct",
    "nvidia/neva-22b",
];

/// Upstream models that understand the thinking request extension
const DEFAULT_THINKING: &[&str] = &[
    "deepseek-ai/deepseek-v3.1",
    "qwen/qwen3-next-80b-a3b-thinking",
    "moonshotai/kimi-k2-thinking",
];

/// Model catalog configuration
///
/// Any list given in the config file replaces the built-in default wholesale.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    /// Static alias table, in the order `/v1/models` lists it
    #[serde(default = "default_aliases")]
    pub aliases: IndexMap<String, String>,
    /// Models requiring structured (array) message content
    #[serde(default = "default_structured_content")]
    pub structured_content: Vec<String>,
    /// Models supporting the thinking extension
    #[serde(default = "default_thinking")]
    pub thinking: Vec<String>,
    /// Size-tier defaults used when a model cannot be resolved
    #[serde(default)]
    pub fallback: FallbackModels,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            structured_content: default_structured_content(),
            thinking: default_thinking(),
            fallback: FallbackModels::default(),
        }
    }
}

/// Fallback model per size tier
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackModels {
    #[serde(default = "default_large")]
    pub large: String,
    #[serde(default = "default_medium")]
    pub medium: String,
    #[serde(default = "default_small")]
    pub small: String,
}

impl Default for FallbackModels {
    fn default() -> Self {
        Self {
            large: default_large(),
            medium: default_medium(),
            small: default_small(),
        }
    }
}

fn default_aliases() -> IndexMap<String, String> {
    DEFAULT_ALIASES
        .iter()
        .map(|(alias, model)| ((*alias).to_owned(), (*model).to_owned()))
        .collect()
}

fn default_structured_content() -> Vec<String> {
    DEFAULT_STRUCTURED_CONTENT.iter().map(|m| (*m).to_owned()).collect()
}

fn default_thinking() -> Vec<String> {
    DEFAULT_THINKING.iter().map(|m| (*m).to_owned()).collect()
}

fn default_large() -> String {
    "meta/llama-3.1-405b-instruct".to_owned()
}

fn default_medium() -> String {
    "meta/llama-3.1-70b-instruct".to_owned()
}

fn default_small() -> String {
    "meta/llama-3.1-8b-instruct".to_owned()
}
