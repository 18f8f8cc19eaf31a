use async_trait::async_trait;
use crate::types::Sentiment;
use crate::Result;

#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Classify a single piece of text into one sentiment label
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}
