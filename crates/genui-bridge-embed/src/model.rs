//! Model sniffing — decide whether a model's output goes to the generative UI component.

use genui_bridge_core::ModelDescriptor;
use genui_bridge_core::config::{DEFAULT_EMBED_PREFIX, EmbedConfig};

/// How a message body should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Hand the content to the generative UI component.
    GenUi,
    /// Plain markdown.
    Markdown,
}

/// Prefix rules for model ids and names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPolicy {
    prefixes: Vec<String>,
}

impl Default for EmbedPolicy {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_EMBED_PREFIX.to_string()],
        }
    }
}

impl EmbedPolicy {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn from_config(config: &EmbedConfig) -> Self {
        Self::new(config.model_prefixes.clone())
    }

    pub fn should_embed(&self, model: Option<&ModelDescriptor>) -> bool {
        let Some(model) = model else {
            return false;
        };
        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| self.prefixes.iter().any(|p| v.starts_with(p.as_str())))
        };
        matches(&model.id) || matches(&model.name)
    }

    pub fn render_mode(&self, model: Option<&ModelDescriptor>) -> RenderMode {
        if self.should_embed(model) {
            RenderMode::GenUi
        } else {
            RenderMode::Markdown
        }
    }
}

/// [`EmbedPolicy::should_embed`] with the default `c1` prefix.
pub fn should_embed(model: Option<&ModelDescriptor>) -> bool {
    EmbedPolicy::default().should_embed(model)
}
