use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use ns_core::Error;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::page::render_page;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    pub company: Option<String>,
}

impl CompanyQuery {
    fn company(&self) -> Option<&str> {
        self.company.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> Response {
    let Some(company) = query.company() else {
        return Html(render_page("", None, None)).into_response();
    };

    match state.pipeline.run(company).await {
        Ok(report) => Html(render_page(company, Some(&report), None)).into_response(),
        Err(e) => {
            error!("❌ Sentiment analysis for {} failed: {}", company, e);
            let page = render_page(company, None, Some(&e.to_string()));
            (status_for(&e), Html(page)).into_response()
        }
    }
}

pub async fn sentiment_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> Response {
    let company = query.company().unwrap_or_default();
    match state.pipeline.run(company).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("❌ Sentiment report for '{}' failed: {}", company, e);
            (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_company_is_absent() {
        let query = CompanyQuery {
            company: Some("   ".to_string()),
        };
        assert_eq!(query.company(), None);
        let query = CompanyQuery {
            company: Some(" Acme ".to_string()),
        };
        assert_eq!(query.company(), Some("Acme"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&Error::InvalidQuery("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&Error::Provider {
                code: "rateLimited".to_string(),
                message: "slow down".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::Inference("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
