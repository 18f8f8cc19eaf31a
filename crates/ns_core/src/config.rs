use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";
pub const DEFAULT_MODEL_DIR: &str = "models/finbert-tone";
pub const DEFAULT_HF_API_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const FINBERT_MODEL_ID: &str = "yiyanghkust/finbert-tone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModelKind {
    /// Local FinBERT weights run through candle
    #[default]
    Finbert,
    /// Hosted HuggingFace inference API
    Huggingface,
    /// Keyword lexicon, no model download
    Dummy,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Finbert => "finbert",
            ModelKind::Huggingface => "huggingface",
            ModelKind::Dummy => "dummy",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_NEWS_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("a NewsAPI key is required (NEWSAPI_KEY)".to_string()));
        }
        validate_url("news API url", &self.base_url)
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub model: ModelKind,
    pub model_id: String,
    pub model_dir: PathBuf,
    pub hf_api_url: String,
    pub hf_token: Option<String>,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("model", &self.model)
            .field("model_id", &self.model_id)
            .field("model_dir", &self.model_dir)
            .field("hf_api_url", &self.hf_api_url)
            .field("hf_token", &self.hf_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            model_id: FINBERT_MODEL_ID.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            hf_api_url: DEFAULT_HF_API_URL.to_string(),
            hf_token: None,
        }
    }
}

impl InferenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model == ModelKind::Huggingface {
            if self.hf_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return Err(Error::Config(
                    "the huggingface model needs an access token (HF_TOKEN)".to_string(),
                ));
            }
            validate_url("HuggingFace API url", &self.hf_api_url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub news_api: NewsApiConfig,
    pub inference: InferenceConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.news_api.validate()?;
        self.inference.validate()
    }
}

fn validate_url(what: &str, raw: &str) -> Result<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("invalid {} '{}': {}", what, raw, e)))
}
