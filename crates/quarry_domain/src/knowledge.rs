use serde::{Deserialize, Serialize};

use crate::{KnowledgeBaseId, ModelId};

/// Sampling parameters forwarded unmodified to the generation collaborator.
///
/// Both values are expected in `[0, 1]`; the collaborator owns any further
/// interpretation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationConfig {
    pub const fn new(temperature: f32, top_p: f32) -> Self {
        Self { temperature, top_p }
    }
}

/// A ranked passage returned from the knowledge base, with optional
/// relevance score and source provenance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub content: String,
    pub score: Option<f64>,
    pub source_uri: Option<String>,
}

/// The retrieval-augmented-generation collaborator.
///
/// The three operations are an opaque, externally supplied capability set:
/// callers depend only on these signatures, never on how a given
/// implementation classifies, retrieves, or generates.
#[async_trait::async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Classifies whether a prompt is in scope for the assistant's domain.
    async fn valid_prompt(&self, prompt: &str, model: &ModelId) -> anyhow::Result<bool>;

    /// Returns passages relevant to the query, most relevant first.
    async fn query_knowledge_base(
        &self,
        query: &str,
        knowledge_base: &KnowledgeBaseId,
    ) -> anyhow::Result<Vec<RetrievedPassage>>;

    /// Produces free-text output for the prompt under the given sampling
    /// configuration.
    async fn generate_response(
        &self,
        prompt: &str,
        model: &ModelId,
        config: &GenerationConfig,
    ) -> anyhow::Result<String>;
}
