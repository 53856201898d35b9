use std::sync::Arc;

use serde::Deserialize;

use crate::error::RenderResult;
use crate::processor::{NonceProcessor, SanitizeProcessor, SecurityProcessor};
use crate::random::RandomSource;
use crate::renderer::SecureHtmlRenderer;

/// Declarative description of a [`SecureHtmlRenderer`].
///
/// ```json
/// { "processors": [{ "kind": "nonce", "nonce": "r4nd0m" }, { "kind": "sanitize" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessorConfig {
    Nonce { nonce: String },
    Sanitize,
}

impl ProcessorConfig {
    fn build(&self) -> Arc<dyn SecurityProcessor> {
        match self {
            ProcessorConfig::Nonce { nonce } => Arc::new(NonceProcessor::new(nonce.clone())),
            ProcessorConfig::Sanitize => Arc::new(SanitizeProcessor),
        }
    }
}

impl RendererConfig {
    pub fn from_json(source: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_processor(mut self, processor: ProcessorConfig) -> Self {
        self.processors.push(processor);
        self
    }

    /// Builds the renderer with the configured processors in order.
    pub fn build(&self, random: Arc<dyn RandomSource>) -> SecureHtmlRenderer {
        let processors = self.processors.iter().map(ProcessorConfig::build).collect();
        let renderer = SecureHtmlRenderer::new(random).with_processors(processors);
        tracing::debug!(
            processors = renderer.processors().len(),
            "built secure html renderer"
        );
        renderer
    }
}
