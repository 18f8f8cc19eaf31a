//! View models for the dashboard: chart series and article cards.

use ns_core::{ClassifiedArticle, DailySentimentCount, SentimentLabel, SentimentReport};

pub const CHART_DATE_FORMAT: &str = "%B %d %Y";
pub const CARD_TIMESTAMP_FORMAT: &str = "%B %d, %Y %H:%M";

pub fn sentiment_color(label: &SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "green",
        SentimentLabel::Negative => "red",
        SentimentLabel::Neutral => "grey",
        SentimentLabel::Unrecognized(_) => "white",
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub color: &'static str,
    pub values: Vec<u32>,
}

/// Stacked bar data: one category per day, one series per sentiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn from_timeline(timeline: &[DailySentimentCount]) -> Self {
        let series = |name, color, pick: fn(&DailySentimentCount) -> u32| ChartSeries {
            name,
            color,
            values: timeline.iter().map(pick).collect(),
        };

        Self {
            categories: timeline
                .iter()
                .map(|day| day.date.format(CHART_DATE_FORMAT).to_string())
                .collect(),
            series: vec![
                series("positive", "green", |d| d.positive),
                series("negative", "red", |d| d.negative),
                series("neutral", "grey", |d| d.neutral),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Height of the tallest stacked bar.
    pub fn max_total(&self) -> u32 {
        (0..self.categories.len())
            .map(|i| self.series.iter().map(|s| s.values[i]).sum::<u32>())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub headline: String,
    pub source: String,
    pub author: Option<String>,
    pub timestamp: String,
    pub description: String,
    pub url: String,
    pub label: String,
    pub color: &'static str,
}

impl ArticleCard {
    pub fn from_classified(item: &ClassifiedArticle) -> Self {
        let article = &item.article;
        Self {
            headline: article.title.clone(),
            source: article.source.name.clone(),
            author: article.author.clone().filter(|a| !a.trim().is_empty()),
            timestamp: article.published_at.format(CARD_TIMESTAMP_FORMAT).to_string(),
            description: article.description.clone(),
            url: article.url.clone(),
            label: item.sentiment.label.to_string(),
            color: sentiment_color(&item.sentiment.label),
        }
    }

    pub fn to_html(&self) -> String {
        let color = self.color;
        let byline = match &self.author {
            Some(author) => format!(" &middot; {}", escape_html(author)),
            None => String::new(),
        };
        format!(
            r#"<div class="card" style="border:1px solid {color}; padding:10px; margin:10px 0;">
  <strong style="color:{color};"><a href="{url}" target="_blank" rel="noopener" style="color:inherit;">{headline}</a></strong><br>
  <span style="color:gray; font-size:small;">{source} - {timestamp}{byline}</span><br>
  {description}<br>
  <strong style="color:{color};">Sentiment: {label}</strong>
</div>"#,
            url = escape_html(&self.url),
            headline = escape_html(&self.headline),
            source = escape_html(&self.source),
            timestamp = self.timestamp,
            description = escape_html(&self.description),
            label = escape_html(&self.label),
        )
    }
}

/// One card per article, in report order.
pub fn cards(report: &SentimentReport) -> Vec<ArticleCard> {
    report.articles.iter().map(ArticleCard::from_classified).collect()
}
