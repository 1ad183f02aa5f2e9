use anyhow::Context as _;
use quarry_domain::{KnowledgeBaseId, ModelId};

/// Target identifiers for the statement-execution API, read from `QUARRY_*`
/// environment variables at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct DataApiSettings {
    /// ARN of the Aurora cluster the statements run against.
    pub cluster_arn: String,
    /// ARN of the Secrets Manager secret holding the database credentials.
    pub secret_arn: String,
    /// Name of the target database on the cluster.
    pub database: String,
    /// AWS region override; the SDK default applies when unset.
    pub region: Option<String>,
}

impl DataApiSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds settings from an injectable variable lookup so tests never
    /// touch the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            cluster_arn: require(&lookup, "QUARRY_CLUSTER_ARN")?,
            secret_arn: require(&lookup, "QUARRY_SECRET_ARN")?,
            database: require(&lookup, "QUARRY_DATABASE")?,
            region: lookup("QUARRY_AWS_REGION"),
        })
    }
}

/// Model and knowledge-base identifiers for the smoke harness, read from
/// `QUARRY_*` environment variables at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct BedrockSettings {
    pub model: ModelId,
    pub knowledge_base: KnowledgeBaseId,
    pub region: Option<String>,
}

impl BedrockSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            model: ModelId::new(require(&lookup, "QUARRY_MODEL_ID")?),
            knowledge_base: KnowledgeBaseId::new(require(&lookup, "QUARRY_KNOWLEDGE_BASE_ID")?),
            region: lookup("QUARRY_AWS_REGION"),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key).with_context(|| format!("environment variable {key} is not set"))
}
