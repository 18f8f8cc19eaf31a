use std::sync::Arc;

use ns_core::config::{InferenceConfig, ModelKind};
use ns_core::{Error, Result, Sentiment, SentimentLabel};
use tracing::info;

pub use ns_core::SentimentModel;

pub mod dummy;
#[cfg(feature = "finbert")]
pub mod finbert;
pub mod huggingface;

/// Build and initialise the configured backend. This is the only place a model is loaded.
pub async fn create_model(config: &InferenceConfig) -> Result<Arc<dyn SentimentModel>> {
    config.validate()?;
    let model: Arc<dyn SentimentModel> = match config.model {
        ModelKind::Dummy => Arc::new(dummy::DummyModel::new()),
        ModelKind::Huggingface => Arc::new(huggingface::HuggingFaceModel::connect(config).await?),
        ModelKind::Finbert => load_finbert(config).await?,
    };
    info!("🧠 Sentiment model ready (using {})", model.name());
    Ok(model)
}

#[cfg(feature = "finbert")]
async fn load_finbert(config: &InferenceConfig) -> Result<Arc<dyn SentimentModel>> {
    Ok(Arc::new(finbert::FinBertModel::load(config).await?))
}

#[cfg(not(feature = "finbert"))]
async fn load_finbert(_config: &InferenceConfig) -> Result<Arc<dyn SentimentModel>> {
    Err(Error::ModelLoad(
        "this build does not include the finbert backend (enable the `finbert` feature)".to_string(),
    ))
}

/// Pick the highest scoring label.
pub(crate) fn best_label<I>(scores: I) -> Result<Sentiment>
where
    I: IntoIterator<Item = (SentimentLabel, f32)>,
{
    scores
        .into_iter()
        .fold(None::<(SentimentLabel, f32)>, |best, (label, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((label, score)),
        })
        .map(|(label, score)| Sentiment::new(label, score))
        .ok_or_else(|| Error::Inference("model returned no scores".to_string()))
}
