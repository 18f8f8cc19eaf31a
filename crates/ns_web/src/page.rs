use ns_core::SentimentReport;

use crate::chart::render_svg;
use crate::view::{cards, escape_html, ChartData};

const STYLE: &str = r#"
body { background:#0e1117; color:#fafafa; font-family:"Source Sans Pro", sans-serif; max-width:900px; margin:0 auto; padding:2rem 1rem; }
h1 { font-size:2.2rem; }
form { margin:1.5rem 0; }
label { display:block; margin-bottom:.4rem; }
input[type=text] { width:70%; padding:.5rem; background:#262730; color:#fafafa; border:1px solid #555; border-radius:4px; }
button { padding:.5rem 1rem; margin-left:.5rem; }
a { color:inherit; }
.error { border:1px solid #ff4b4b; color:#ff4b4b; padding:10px; }
.muted { color:gray; }
"#;

/// Full dashboard page. `report` and `error` are mutually exclusive in practice.
pub fn render_page(company: &str, report: Option<&SentimentReport>, error: Option<&str>) -> String {
    let mut body = String::new();

    body.push_str("<h1>Company News Sentiment Analysis</h1>\n");
    body.push_str(&format!(
        r#"<form method="get" action="/">
  <label for="company">Enter a company name:</label>
  <input type="text" id="company" name="company" value="{}" autofocus>
  <button type="submit">Analyse</button>
</form>
"#,
        escape_html(company)
    ));

    if let Some(message) = error {
        body.push_str(&format!(
            r#"<div class="error"><strong>Something went wrong while analysing {}.</strong><br><small>{}</small></div>
"#,
            escape_html(company),
            escape_html(message)
        ));
    }

    if let Some(report) = report {
        if report.is_empty() {
            body.push_str(&format!(
                "<p class=\"muted\">No articles found for {} in the last 30 days.</p>\n",
                escape_html(&report.company)
            ));
        } else {
            body.push_str("<h2>Sentiment over time</h2>\n");
            body.push_str(&render_svg(&ChartData::from_timeline(&report.timeline)));
            body.push('\n');

            let cards = cards(report);
            body.push_str(&format!("<h2>{} News Articles Analysed</h2>\n", cards.len()));
            for card in &cards {
                body.push_str(&card.to_html());
                body.push('\n');
            }
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Company News Sentiment Analysis</title>
<style>{STYLE}</style>
</head>
<body>
{body}</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};
    use ns_core::{Article, ArticleSource, ClassifiedArticle, DailySentimentCount, Sentiment, SentimentLabel};

    use super::*;

    fn report(n: usize) -> SentimentReport {
        let articles = (0..n)
            .map(|i| ClassifiedArticle {
                article: Article {
                    title: format!("Headline {}", i),
                    description: "desc".to_string(),
                    source: ArticleSource {
                        id: None,
                        name: "BBC News".to_string(),
                    },
                    url: format!("https://bbc.co.uk/{}", i),
                    published_at: DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z")
                        .unwrap(),
                    author: None,
                    url_to_image: None,
                },
                sentiment: Sentiment::new(SentimentLabel::Positive, 0.8),
            })
            .collect::<Vec<_>>();
        let timeline = if n == 0 {
            vec![]
        } else {
            vec![DailySentimentCount {
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                positive: n as u32,
                negative: 0,
                neutral: 0,
            }]
        };
        SentimentReport {
            company: "Acme Corp".to_string(),
            articles,
            timeline,
        }
    }

    #[test]
    fn test_form_only_page() {
        let html = render_page("", None, None);
        assert!(html.contains("<h1>Company News Sentiment Analysis</h1>"));
        assert!(html.contains(r#"name="company""#));
        assert!(!html.contains("<svg"));
        assert!(!html.contains(r#"class="card""#));
    }

    #[test]
    fn test_empty_report_has_no_chart_or_cards() {
        let html = render_page("Acme Corp", Some(&report(0)), None);
        assert!(!html.contains("<svg"));
        assert!(!html.contains(r#"class="card""#));
        assert!(!html.contains("Sentiment over time"));
        assert!(html.contains("No articles found for Acme Corp"));
    }

    #[test]
    fn test_report_renders_chart_and_one_card_per_article() {
        let html = render_page("Acme Corp", Some(&report(4)), None);
        assert!(html.contains("<h2>Sentiment over time</h2>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("<h2>4 News Articles Analysed</h2>"));
        assert_eq!(html.matches(r#"class="card""#).count(), 4);
        let first = html.find("Headline 0").unwrap();
        let last = html.find("Headline 3").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_error_is_escaped() {
        let html = render_page("<Acme>", None, Some("News provider error (429): slow <down>"));
        assert!(html.contains(r#"class="error""#));
        assert!(html.contains("&lt;Acme&gt;"));
        assert!(html.contains("slow &lt;down&gt;"));
        assert!(!html.contains("<Acme>"));
    }
}
