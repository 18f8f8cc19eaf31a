pub mod models;

pub use models::{create_model, SentimentModel};

pub mod prelude {
    pub use super::models::create_model;
    pub use ns_core::config::{InferenceConfig, ModelKind};
    pub use ns_core::{Error, Result, Sentiment, SentimentLabel, SentimentModel};
}
