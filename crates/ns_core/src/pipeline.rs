use std::sync::Arc;

use tracing::{debug, info};

use crate::aggregate::SentimentTimeline;
use crate::fetcher::ArticleFetcher;
use crate::models::SentimentModel;
use crate::types::{classifier_input, ClassifiedArticle, SentimentReport};
use crate::{Error, Result};

/// Fetch, classify and aggregate news for one company.
///
/// Both collaborators are injected so the expensive model load happens once,
/// outside of any request.
#[derive(Clone)]
pub struct SentimentPipeline {
    fetcher: Arc<dyn ArticleFetcher>,
    model: Arc<dyn SentimentModel>,
}

impl SentimentPipeline {
    pub fn new(fetcher: Arc<dyn ArticleFetcher>, model: Arc<dyn SentimentModel>) -> Self {
        Self { fetcher, model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn fetcher_name(&self) -> &str {
        self.fetcher.name()
    }

    pub async fn run(&self, company: &str) -> Result<SentimentReport> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::InvalidQuery("company name must not be empty".to_string()));
        }

        info!("🔎 Fetching articles for {} from {}", company, self.fetcher_name());
        let articles = self.fetcher.fetch(company).await?;
        info!("📰 Fetched {} articles for {}", articles.len(), company);

        let mut classified = Vec::with_capacity(articles.len());
        for article in articles {
            let sentiment = self.model.classify(&classifier_input(&article)).await?;
            debug!("{} -> {} ({:.3})", article.title, sentiment.label, sentiment.score);
            classified.push(ClassifiedArticle { article, sentiment });
        }

        let timeline = SentimentTimeline::from_classified(&classified);
        info!(
            "✨ Classified {} articles across {} days using {}",
            classified.len(),
            timeline.len(),
            self.model_name()
        );

        Ok(SentimentReport {
            company: company.to_string(),
            articles: classified,
            timeline: timeline.into_counts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::types::fixtures::article;
    use crate::types::{Article, Sentiment, SentimentLabel};

    struct StaticFetcher {
        articles: Vec<Article>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(articles: Vec<Article>) -> Self {
            Self {
                articles,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArticleFetcher for StaticFetcher {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, _company: &str) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.articles.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ArticleFetcher for FailingFetcher {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self, _company: &str) -> Result<Vec<Article>> {
            Err(Error::Provider {
                code: "rateLimited".to_string(),
                message: "too many requests".to_string(),
            })
        }
    }

    /// Answers from a title-keyed table; unknown titles are an inference error.
    struct TableModel {
        labels: HashMap<String, SentimentLabel>,
    }

    impl TableModel {
        fn new(pairs: &[(&str, SentimentLabel)]) -> Self {
            Self {
                labels: pairs
                    .iter()
                    .map(|(title, label)| (title.to_string(), label.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SentimentModel for TableModel {
        fn name(&self) -> &str {
            "table"
        }

        async fn classify(&self, text: &str) -> Result<Sentiment> {
            let title = text.split(". ").next().unwrap_or_default();
            self.labels
                .get(title)
                .map(|label| Sentiment::new(label.clone(), 1.0))
                .ok_or_else(|| Error::Inference(format!("no label for {}", title)))
        }
    }

    #[test]
    fn test_collaborator_names() {
        let pipeline = SentimentPipeline::new(
            Arc::new(StaticFetcher::new(vec![])),
            Arc::new(TableModel::new(&[])),
        );
        assert_eq!(pipeline.fetcher_name(), "static");
        assert_eq!(pipeline.model_name(), "table");
    }

    #[tokio::test]
    async fn test_empty_fetch_is_not_an_error() {
        let pipeline = SentimentPipeline::new(
            Arc::new(StaticFetcher::new(vec![])),
            Arc::new(TableModel::new(&[])),
        );
        let report = pipeline.run("Acme Corp").await.unwrap();
        assert_eq!(report.company, "Acme Corp");
        assert!(report.is_empty());
        assert!(report.timeline.is_empty());
    }

    #[tokio::test]
    async fn test_blank_company_is_rejected_before_fetching() {
        let fetcher = Arc::new(StaticFetcher::new(vec![]));
        let pipeline = SentimentPipeline::new(fetcher.clone(), Arc::new(TableModel::new(&[])));
        let err = pipeline.run("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_report_keeps_article_order_and_aggregates() {
        let articles = vec![
            article("one", "2024-03-06T10:00:00Z"),
            article("two", "2024-03-05T11:00:00Z"),
            article("three", "2024-03-05T09:00:00Z"),
        ];
        let model = TableModel::new(&[
            ("one", SentimentLabel::Positive),
            ("two", SentimentLabel::Positive),
            ("three", SentimentLabel::Negative),
        ]);
        let pipeline = SentimentPipeline::new(Arc::new(StaticFetcher::new(articles)), Arc::new(model));

        let report = pipeline.run("  Acme  ").await.unwrap();
        assert_eq!(report.company, "Acme");
        let titles: Vec<_> = report.articles.iter().map(|c| c.article.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].positive, 1);
        assert_eq!(report.timeline[1].positive, 1);
        assert_eq!(report.timeline[1].negative, 1);
    }

    #[tokio::test]
    async fn test_rerun_with_frozen_inputs_is_identical() {
        let articles = vec![
            article("a", "2024-03-06T10:00:00Z"),
            article("b", "2024-03-04T11:00:00Z"),
            article("c", "2024-03-06T09:00:00Z"),
        ];
        let model = TableModel::new(&[
            ("a", SentimentLabel::Neutral),
            ("b", SentimentLabel::Negative),
            ("c", SentimentLabel::Positive),
        ]);
        let pipeline = SentimentPipeline::new(Arc::new(StaticFetcher::new(articles)), Arc::new(model));

        let first = pipeline.run("Acme").await.unwrap();
        let second = pipeline.run("Acme").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_single_classification_failure_aborts_run() {
        let articles = vec![
            article("known", "2024-03-06T10:00:00Z"),
            article("unknown", "2024-03-06T11:00:00Z"),
        ];
        let model = TableModel::new(&[("known", SentimentLabel::Positive)]);
        let pipeline = SentimentPipeline::new(Arc::new(StaticFetcher::new(articles)), Arc::new(model));

        let err = pipeline.run("Acme").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let pipeline = SentimentPipeline::new(Arc::new(FailingFetcher), Arc::new(TableModel::new(&[])));
        let err = pipeline.run("Acme").await.unwrap_err();
        assert!(err.is_upstream());
    }
}
