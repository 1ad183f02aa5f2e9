use std::io::Write;

use crate::{GenerationConfig, KnowledgeBaseId, KnowledgeService, ModelId};

/// Literal scope probes: one in-scope prompt and two out-of-scope prompts.
/// The expectation strings are console annotations for the human reader,
/// not a correctness oracle.
pub const SCOPE_PROBES: [(&str, &str); 3] = [
    ("What are the specifications of the excavator?", "Valid - about heavy machinery"),
    ("How does your AI model work?", "Invalid - asking about model architecture"),
    ("Tell me about cooking recipes", "Invalid - not about heavy machinery"),
];

pub const RETRIEVAL_QUERY: &str = "What are the specifications of the excavator X950?";

pub const SIMPLE_PROMPT: &str = "Describe the bulldozer in one sentence.";

/// Contrasting sampling configurations, demonstrating the effect of
/// temperature/top_p on determinism.
pub const CONTRASTING_CONFIGS: [(GenerationConfig, &str); 2] = [
    (GenerationConfig::new(0.0, 0.1), "Low temperature, low top_p (deterministic)"),
    (GenerationConfig::new(1.0, 1.0), "High temperature, high top_p (creative)"),
];

const PASSAGE_PREVIEW_CHARS: usize = 200;
const CONTEXT_PASSAGE_CHARS: usize = 500;
const RESPONSE_PREVIEW_CHARS: usize = 150;

/// Truncates to at most `max` characters, respecting char boundaries.
fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Manual smoke-test report over the three knowledge-service operations.
///
/// Writes numbered sections to the given sink; the human reads the output,
/// nothing in here asserts. Collaborator errors propagate to the caller and
/// may terminate the run, which is acceptable for a diagnostic tool.
pub struct SmokeReport<'a, S> {
    service: &'a S,
    model: ModelId,
    knowledge_base: KnowledgeBaseId,
}

impl<'a, S: KnowledgeService> SmokeReport<'a, S> {
    pub fn new(service: &'a S, model: ModelId, knowledge_base: KnowledgeBaseId) -> Self {
        Self { service, model, knowledge_base }
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let bar = "=".repeat(80);
        let rule = "-".repeat(80);

        writeln!(out, "{bar}")?;
        writeln!(out, "KNOWLEDGE BASE SMOKE TEST")?;
        writeln!(out, "{bar}")?;

        writeln!(out, "\n1. Exercising valid_prompt")?;
        writeln!(out, "{rule}")?;
        for (prompt, expected) in SCOPE_PROBES {
            writeln!(out, "\nPrompt: {prompt}")?;
            writeln!(out, "Expected: {expected}")?;
            let is_valid = self.service.valid_prompt(prompt, &self.model).await?;
            writeln!(out, "Result: {}", if is_valid { "VALID" } else { "INVALID" })?;
        }

        writeln!(out, "\n\n2. Exercising query_knowledge_base")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "\nQuery: {RETRIEVAL_QUERY}")?;
        writeln!(out, "\nRetrieving from knowledge base...")?;
        let passages =
            self.service.query_knowledge_base(RETRIEVAL_QUERY, &self.knowledge_base).await?;
        writeln!(out, "\nFound {} results", passages.len())?;
        for (i, passage) in passages.iter().take(2).enumerate() {
            writeln!(out, "\n--- Result {} ---", i + 1)?;
            writeln!(
                out,
                "Content preview: {}...",
                preview(&passage.content, PASSAGE_PREVIEW_CHARS)
            )?;
            match passage.score {
                Some(score) => writeln!(out, "Score: {score}")?,
                None => writeln!(out, "Score: N/A")?,
            }
            if let Some(uri) = &passage.source_uri {
                writeln!(out, "Source: s3://{uri}")?;
            }
        }

        writeln!(out, "\n\n3. Exercising generate_response")?;
        writeln!(out, "{rule}")?;
        if !passages.is_empty() {
            let context = passages
                .iter()
                .take(2)
                .map(|passage| preview(&passage.content, CONTEXT_PASSAGE_CHARS))
                .collect::<Vec<_>>()
                .join("\n");
            let full_prompt = format!(
                "Based on the following information about heavy machinery, answer the user's question.\n\
                 \n\
                 Context:\n\
                 {context}\n\
                 \n\
                 User Question: {RETRIEVAL_QUERY}\n\
                 \n\
                 Please provide a concise answer based only on the information provided."
            );
            let config = GenerationConfig::new(0.7, 0.9);
            writeln!(out, "\nGenerating response with:")?;
            writeln!(out, "  Temperature: {}", config.temperature)?;
            writeln!(out, "  Top P: {}", config.top_p)?;
            let response =
                self.service.generate_response(&full_prompt, &self.model, &config).await?;
            writeln!(out, "\n--- Generated Response ---")?;
            writeln!(out, "{response}")?;
        }

        writeln!(out, "\n\n4. Contrasting sampling configurations")?;
        writeln!(out, "{rule}")?;
        for (config, label) in CONTRASTING_CONFIGS {
            writeln!(out, "\n{label}")?;
            writeln!(out, "Temperature: {}, Top P: {}", config.temperature, config.top_p)?;
            let response =
                self.service.generate_response(SIMPLE_PROMPT, &self.model, &config).await?;
            writeln!(out, "Response: {}...", preview(&response, RESPONSE_PREVIEW_CHARS))?;
        }

        writeln!(out, "\n{bar}")?;
        writeln!(out, "SMOKE TEST COMPLETE")?;
        writeln!(out, "{bar}")?;
        Ok(())
    }
}
