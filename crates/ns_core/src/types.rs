use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source: ArticleSource,
    pub url: String,
    pub published_at: DateTime<FixedOffset>,
    pub author: Option<String>,
    pub url_to_image: Option<String>,
}

impl Article {
    /// Calendar day of publication, in the offset the provider reported.
    pub fn published_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// Text fed to the classifier for an article: `"{title}. {description}"`.
pub fn classifier_input(article: &Article) -> String {
    format!("{}. {}", article.title, article.description)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// A label the model produced outside the known three.
    Unrecognized(String),
}

impl SentimentLabel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Positive" => SentimentLabel::Positive,
            "Negative" => SentimentLabel::Negative,
            "Neutral" => SentimentLabel::Neutral,
            _ => SentimentLabel::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SentimentLabel {
    fn from(raw: String) -> Self {
        SentimentLabel::parse(&raw)
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Model confidence for `label`, in `[0, 1]`.
    pub score: f32,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, score: f32) -> Self {
        Self { label, score }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedArticle {
    pub article: Article,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySentimentCount {
    pub date: NaiveDate,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl DailySentimentCount {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            positive: 0,
            negative: 0,
            neutral: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub company: String,
    pub articles: Vec<ClassifiedArticle>,
    pub timeline: Vec<DailySentimentCount>,
}

impl SentimentReport {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn article(title: &str, published_at: &str) -> Article {
        Article {
            title: title.to_string(),
            description: format!("{} description", title),
            source: ArticleSource {
                id: Some("reuters".to_string()),
                name: "Reuters".to_string(),
            },
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            published_at: DateTime::parse_from_rfc3339(published_at).unwrap(),
            author: None,
            url_to_image: None,
        }
    }
}
