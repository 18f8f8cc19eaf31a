use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::{ClassifiedArticle, DailySentimentCount, SentimentLabel};

/// Per-day sentiment counts, kept in the order each day was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentTimeline {
    counts: Vec<DailySentimentCount>,
    index: HashMap<NaiveDate, usize>,
}

impl SentimentTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_classified(results: &[ClassifiedArticle]) -> Self {
        let mut timeline = Self::new();
        for result in results {
            timeline.record(result.article.published_date(), &result.sentiment.label);
        }
        timeline
    }

    /// Count one article for `date`. Labels outside the known three fall into `neutral`.
    pub fn record(&mut self, date: NaiveDate, label: &SentimentLabel) {
        let counts = &mut self.counts;
        let idx = *self.index.entry(date).or_insert_with(|| {
            counts.push(DailySentimentCount::new(date));
            counts.len() - 1
        });

        let day = &mut self.counts[idx];
        match label {
            SentimentLabel::Positive => day.positive += 1,
            SentimentLabel::Negative => day.negative += 1,
            SentimentLabel::Neutral | SentimentLabel::Unrecognized(_) => day.neutral += 1,
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailySentimentCount> {
        self.index.get(&date).map(|&idx| &self.counts[idx])
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailySentimentCount> {
        self.counts.iter()
    }

    pub fn into_counts(self) -> Vec<DailySentimentCount> {
        self.counts
    }
}
