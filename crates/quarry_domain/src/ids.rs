use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a foundation model on the generation provider.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Hash, Eq, Display)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        ModelId(value)
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        ModelId(value.to_string())
    }
}

/// Identifier of a retrieval index holding ranked text passages.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Hash, Eq, Display)]
#[serde(transparent)]
pub struct KnowledgeBaseId(String);

impl KnowledgeBaseId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for KnowledgeBaseId {
    fn from(value: String) -> Self {
        KnowledgeBaseId(value)
    }
}

impl From<&str> for KnowledgeBaseId {
    fn from(value: &str) -> Self {
        KnowledgeBaseId(value.to_string())
    }
}
