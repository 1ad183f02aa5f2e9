use anyhow::Context as _;
use aws_sdk_bedrockagentruntime::types::KnowledgeBaseQuery;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};
use quarry_domain::{
    GenerationConfig, KnowledgeBaseId, KnowledgeService, ModelId, RetrievedPassage,
};

/// Instruction used to screen prompts for scope. The model answers with a
/// single YES/NO verdict at deterministic sampling settings.
const SCOPE_INSTRUCTION: &str = "You screen user prompts for an assistant that answers \
questions about heavy machinery (excavators, bulldozers, cranes and similar equipment). \
Reply with exactly YES if the prompt below is a question about heavy machinery, or NO if \
it is off-topic or asks about the assistant itself.";

const VERDICT_CONFIG: GenerationConfig = GenerationConfig::new(0.0, 0.1);

/// Knowledge service backed by Amazon Bedrock: the Converse API for
/// generation and prompt screening, the Agent Runtime Retrieve API for
/// knowledge-base queries.
pub struct BedrockKnowledgeService {
    runtime: aws_sdk_bedrockruntime::Client,
    agent: aws_sdk_bedrockagentruntime::Client,
}

impl BedrockKnowledgeService {
    /// Builds both clients from the default AWS credential chain.
    pub async fn connect(region: Option<String>) -> anyhow::Result<Self> {
        let config = crate::sdk_config(region.as_deref()).await;
        Ok(Self {
            runtime: aws_sdk_bedrockruntime::Client::new(&config),
            agent: aws_sdk_bedrockagentruntime::Client::new(&config),
        })
    }

    async fn converse(
        &self,
        prompt: &str,
        model: &ModelId,
        config: &GenerationConfig,
    ) -> anyhow::Result<String> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Bedrock message: {e}"))?;
        let inference = InferenceConfiguration::builder()
            .temperature(config.temperature)
            .top_p(config.top_p)
            .build();

        let output = self
            .runtime
            .converse()
            .model_id(model.as_str())
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .context("Failed to call Bedrock converse API")?;

        extract_text(output.output)
    }
}

#[async_trait::async_trait]
impl KnowledgeService for BedrockKnowledgeService {
    async fn valid_prompt(&self, prompt: &str, model: &ModelId) -> anyhow::Result<bool> {
        let question = format!("{SCOPE_INSTRUCTION}\n\nPrompt: {prompt}");
        let verdict = self.converse(&question, model, &VERDICT_CONFIG).await?;
        Ok(is_affirmative(&verdict))
    }

    async fn query_knowledge_base(
        &self,
        query: &str,
        knowledge_base: &KnowledgeBaseId,
    ) -> anyhow::Result<Vec<RetrievedPassage>> {
        let retrieval_query = KnowledgeBaseQuery::builder().text(query).build();

        let output = self
            .agent
            .retrieve()
            .knowledge_base_id(knowledge_base.as_str())
            .retrieval_query(retrieval_query)
            .send()
            .await
            .context("Failed to call Bedrock knowledge base retrieve API")?;

        Ok(output.retrieval_results.into_iter().map(into_passage).collect())
    }

    async fn generate_response(
        &self,
        prompt: &str,
        model: &ModelId,
        config: &GenerationConfig,
    ) -> anyhow::Result<String> {
        self.converse(prompt, model, config).await
    }
}

fn extract_text(
    output: Option<aws_sdk_bedrockruntime::types::ConverseOutput>,
) -> anyhow::Result<String> {
    let message = match output {
        Some(aws_sdk_bedrockruntime::types::ConverseOutput::Message(message)) => message,
        _ => anyhow::bail!("Bedrock converse returned no message"),
    };
    Ok(message
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(""))
}

fn into_passage(
    result: aws_sdk_bedrockagentruntime::types::KnowledgeBaseRetrievalResult,
) -> RetrievedPassage {
    let content = result.content.map(|content| content.text).unwrap_or_default();
    let source_uri =
        result.location.and_then(|location| location.s3_location).and_then(|s3| s3.uri);
    RetrievedPassage { content, score: result.score, source_uri }
}

fn is_affirmative(verdict: &str) -> bool {
    verdict.trim().to_ascii_lowercase().starts_with("yes")
}
