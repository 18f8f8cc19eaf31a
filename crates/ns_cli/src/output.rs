use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use ns_core::{SentimentLabel, SentimentReport};
use ns_web::view::{ArticleCard, CHART_DATE_FORMAT};

fn label_color(label: &SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Grey,
        SentimentLabel::Unrecognized(_) => Color::White,
    }
}

/// Plain-text rendering of a report: daily table then the article list.
pub fn write_report<W: Write>(out: &mut W, report: &SentimentReport, styled: bool) -> io::Result<()> {
    writeln!(
        out,
        "Sentiment for {}: {} articles over {} days",
        report.company,
        report.articles.len(),
        report.timeline.len()
    )?;
    if report.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{:<20}{:>10}{:>10}{:>10}", "Date", "Positive", "Negative", "Neutral")?;
    for day in &report.timeline {
        writeln!(
            out,
            "{:<20}{:>10}{:>10}{:>10}",
            day.date.format(CHART_DATE_FORMAT).to_string(),
            day.positive,
            day.negative,
            day.neutral
        )?;
    }

    for item in &report.articles {
        let card = ArticleCard::from_classified(item);
        let tag = format!("[{}]", card.label);
        writeln!(out)?;
        if styled {
            writeln!(out, "{} {}", tag.with(label_color(&item.sentiment.label)).bold(), card.headline)?;
        } else {
            writeln!(out, "{} {}", tag, card.headline)?;
        }
        writeln!(out, "    {} - {}", card.source, card.timestamp)?;
        if !card.description.is_empty() {
            writeln!(out, "    {}", card.description)?;
        }
        writeln!(out, "    {}", card.url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};
    use ns_core::{Article, ArticleSource, ClassifiedArticle, DailySentimentCount, Sentiment};

    use super::*;

    fn render(report: &SentimentReport) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, report, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_report_prints_summary_only() {
        let report = SentimentReport {
            company: "Acme Corp".to_string(),
            articles: vec![],
            timeline: vec![],
        };
        assert_eq!(render(&report), "Sentiment for Acme Corp: 0 articles over 0 days\n");
    }

    #[test]
    fn test_report_lists_days_and_articles() {
        let report = SentimentReport {
            company: "Acme".to_string(),
            articles: vec![ClassifiedArticle {
                article: Article {
                    title: "Acme rallies".to_string(),
                    description: String::new(),
                    source: ArticleSource {
                        id: None,
                        name: "Bloomberg".to_string(),
                    },
                    url: "https://bloomberg.com/acme".to_string(),
                    published_at: DateTime::parse_from_rfc3339("2024-03-05T09:30:00Z")
                        .unwrap(),
                    author: None,
                    url_to_image: None,
                },
                sentiment: Sentiment::new(SentimentLabel::Positive, 0.9),
            }],
            timeline: vec![DailySentimentCount {
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                positive: 1,
                negative: 0,
                neutral: 0,
            }],
        };
        let text = render(&report);
        assert!(text.contains("March 05 2024"));
        assert!(text.contains("[Positive] Acme rallies"));
        assert!(text.contains("    Bloomberg - March 05, 2024 09:30"));
        assert!(text.ends_with("    https://bloomberg.com/acme\n"));
    }
}
