use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ns_core::config::NewsApiConfig;
use ns_core::{Article, ArticleFetcher, ArticleSource, Error, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::sources::{sources_param, DateRange, LOOKBACK_DAYS};

const USER_AGENT: &str = concat!("ns/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<RawArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

impl RawArticle {
    fn into_article(self, position: usize) -> Result<Article> {
        let missing = |field: &str| {
            Error::MalformedArticle(format!("article #{} has no {}", position, field))
        };

        let title = self.title.ok_or_else(|| missing("title"))?;
        let url = self.url.ok_or_else(|| missing("url"))?;
        let source = self.source.ok_or_else(|| missing("source"))?;
        let source_name = source.name.ok_or_else(|| missing("source.name"))?;
        let published_raw = self.published_at.ok_or_else(|| missing("publishedAt"))?;
        let published_at = DateTime::parse_from_rfc3339(&published_raw)
            .map_err(|e| {
                Error::MalformedArticle(format!(
                    "article #{} has an invalid publishedAt '{}': {}",
                    position, published_raw, e
                ))
            })?;

        Ok(Article {
            title,
            description: self.description.unwrap_or_default(),
            source: ArticleSource {
                id: source.id,
                name: source_name,
            },
            url,
            published_at,
            author: self.author,
            url_to_image: self.url_to_image,
        })
    }
}

/// Turn a raw `/v2/everything` reply into articles, or the provider's error.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<Vec<Article>> {
    let parsed: EverythingResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => return Err(Error::Serialization(e)),
        Err(_) => {
            return Err(Error::Provider {
                code: status.as_str().to_string(),
                message: body.chars().take(200).collect(),
            })
        }
    };

    if !status.is_success() || parsed.status != "ok" {
        return Err(Error::Provider {
            code: parsed.code.unwrap_or_else(|| status.as_str().to_string()),
            message: parsed
                .message
                .unwrap_or_else(|| format!("request failed with status {}", status)),
        });
    }

    debug!("Provider reported {} total results", parsed.total_results.unwrap_or(0));
    parsed
        .articles
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_article(i))
        .collect()
}

pub fn query_params(company: &str, range: &DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("q", company.to_string()),
        ("sources", sources_param()),
        ("language", "en".to_string()),
        ("from", range.from_param()),
        ("to", range.to_param()),
        ("sortBy", "publishedAt".to_string()),
    ]
}

pub struct NewsApiFetcher {
    client: Client,
    config: NewsApiConfig,
}

impl fmt::Debug for NewsApiFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiFetcher")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl NewsApiFetcher {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/everything", self.config.base_url.trim_end_matches('/'))
    }

    /// Same as [`ArticleFetcher::fetch`] with an explicit window.
    pub async fn fetch_range(&self, company: &str, range: &DateRange) -> Result<Vec<Article>> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::InvalidQuery("company name must not be empty".to_string()));
        }

        info!(
            "🌐 Querying NewsAPI for '{}' between {} and {}",
            company,
            range.from_param(),
            range.to_param()
        );
        let response = self
            .client
            .get(self.endpoint())
            .header("X-Api-Key", &self.config.api_key)
            .query(&query_params(company, range))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let articles = parse_response(status, &body)?;
        info!("📥 NewsAPI returned {} articles for '{}'", articles.len(), company);
        Ok(articles)
    }
}

#[async_trait]
impl ArticleFetcher for NewsApiFetcher {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, company: &str) -> Result<Vec<Article>> {
        let range = DateRange::trailing(Utc::now(), LOOKBACK_DAYS);
        self.fetch_range(company, &range).await
    }
}
