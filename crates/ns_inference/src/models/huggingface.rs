use std::fmt;

use async_trait::async_trait;
use ns_core::config::InferenceConfig;
use ns_core::{Error, Result, Sentiment, SentimentLabel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{best_label, SentimentModel};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The endpoint answers `[[{..}]]` for a single input, some deployments flatten it.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassifyResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            ClassifyResponse::Flat(scores) => scores,
        }
    }
}

pub struct HuggingFaceModel {
    client: Client,
    endpoint: String,
    token: String,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl HuggingFaceModel {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let token = config
            .hf_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Config("HuggingFace access token is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            endpoint: format!("{}/{}", config.hf_api_url.trim_end_matches('/'), config.model_id),
            token,
        })
    }

    /// Build the client and make sure the hosted model answers before any article is processed.
    pub async fn connect(config: &InferenceConfig) -> Result<Self> {
        let model = Self::new(config)?;
        info!("Checking HuggingFace model at {}", model.endpoint);
        if let Err(e) = model.classify("Quarterly results were in line with expectations.").await {
            return Err(Error::ModelLoad(format!(
                "HuggingFace model {} is not available: {}",
                config.model_id, e
            )));
        }
        Ok(model)
    }
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Inference(format!(
                "HuggingFace returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let scores = serde_json::from_str::<ClassifyResponse>(&body)?.into_scores();
        debug!("HuggingFace returned {} label scores", scores.len());
        best_label(
            scores
                .into_iter()
                .map(|s| (SentimentLabel::parse(&s.label), s.score)),
        )
    }
}
