// src/generator.rs
//! The blueprint generator collaborator, consulted on cache misses.

use crate::config::ENV_GENERATOR_URL;
use crate::error::AppError;
use crate::model::Blueprint;
use crate::types::ValidatedUrl;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Turns a prompt into a fresh blueprint.
#[async_trait::async_trait]
pub trait BlueprintGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Blueprint, AppError>;
}

/// Generator endpoints answer with either the document itself or an
/// envelope around it.
#[derive(Deserialize)]
#[serde(untagged)]
enum GeneratorResponse {
    Envelope { blueprint: Blueprint },
    Bare(Blueprint),
}

impl GeneratorResponse {
    fn into_blueprint(self) -> Blueprint {
        match self {
            GeneratorResponse::Envelope { blueprint } | GeneratorResponse::Bare(blueprint) => {
                blueprint
            }
        }
    }
}

/// POSTs `{"prompt": ...}` to a generation service.
#[derive(Clone)]
pub struct HttpBlueprintGenerator {
    client: Client,
    endpoint: ValidatedUrl,
}

impl HttpBlueprintGenerator {
    pub fn new(endpoint: ValidatedUrl) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self { client, endpoint })
    }

    async fn request(&self, prompt: &str) -> Result<Blueprint, String> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("could not read response: {}", e))?;
        if !status.is_success() {
            return Err(format!("generator returned {}: {}", status, text));
        }

        serde_json::from_str::<GeneratorResponse>(&text)
            .map(GeneratorResponse::into_blueprint)
            .map_err(|e| format!("response is not a blueprint: {}", e))
    }
}

#[async_trait::async_trait]
impl BlueprintGenerator for HttpBlueprintGenerator {
    async fn generate(&self, prompt: &str) -> Result<Blueprint, AppError> {
        log::info!("Generating blueprint via {}", self.endpoint);
        self.request(prompt).await.map_err(AppError::GenerationFailed)
    }
}

/// Stands in when no generation service is configured; every miss fails.
pub struct MissingGenerator;

#[async_trait::async_trait]
impl BlueprintGenerator for MissingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Blueprint, AppError> {
        Err(AppError::MissingConfiguration(format!(
            "cache miss and {} environment variable not set",
            ENV_GENERATOR_URL
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_enveloped_documents() {
        let bare = r#"{"title": "Habits", "databases": [], "pages": []}"#;
        let parsed: GeneratorResponse = serde_json::from_str(bare).unwrap();
        assert_eq!(parsed.into_blueprint().title, "Habits");

        let wrapped = r#"{"success": true, "blueprint": {"title": "Goals"}}"#;
        let parsed: GeneratorResponse = serde_json::from_str(wrapped).unwrap();
        assert_eq!(parsed.into_blueprint().title, "Goals");
    }

    #[test]
    fn documents_without_title_are_rejected() {
        assert!(serde_json::from_str::<GeneratorResponse>(r#"{"pages": []}"#).is_err());
    }
}
