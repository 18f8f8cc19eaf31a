use chrono::{DateTime, Duration, Utc};

/// Days of history requested from the provider.
pub const LOOKBACK_DAYS: i64 = 30;

/// Publishers the search is restricted to, as NewsAPI source ids.
pub const PUBLISHER_ALLOW_LIST: &[&str] = &[
    "bbc-news",
    "financial-post",
    "bloomberg",
    "business-insider",
    "reuters",
    "the-wall-street-journal",
];

pub fn sources_param() -> String {
    PUBLISHER_ALLOW_LIST.join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// The `days`-long window ending at `now`.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            from: now - Duration::days(days),
            to: now,
        }
    }

    pub fn from_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sources_param_lists_every_publisher() {
        assert_eq!(
            sources_param(),
            "bbc-news,financial-post,bloomberg,business-insider,reuters,the-wall-street-journal"
        );
    }

    #[test]
    fn test_trailing_window_crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
        let range = DateRange::trailing(now, LOOKBACK_DAYS);
        assert_eq!(range.from_param(), "2024-02-09");
        assert_eq!(range.to_param(), "2024-03-10");
    }
}
