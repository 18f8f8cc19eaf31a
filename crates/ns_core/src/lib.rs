pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod types;

pub use aggregate::SentimentTimeline;
pub use error::Error;
pub use fetcher::ArticleFetcher;
pub use models::SentimentModel;
pub use pipeline::SentimentPipeline;
pub use types::{
    classifier_input, Article, ArticleSource, ClassifiedArticle, DailySentimentCount, Sentiment,
    SentimentLabel, SentimentReport,
};

pub type Result<T> = std::result::Result<T, Error>;
