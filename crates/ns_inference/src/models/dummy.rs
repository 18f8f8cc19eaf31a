use std::fmt;

use ns_core::{Result, Sentiment, SentimentLabel};

use super::SentimentModel;

const POSITIVE_WORDS: &[&str] = &[
    "beat", "beats", "boost", "boosts", "gain", "gains", "growth", "grow", "grows", "profit",
    "profits", "rally", "rallies", "record", "rise", "rises", "rose", "soar", "soars", "strong",
    "surge", "surges", "upgrade", "upgraded", "win", "wins", "climb", "climbs", "outperform",
];

const NEGATIVE_WORDS: &[&str] = &[
    "cut", "cuts", "decline", "declines", "drop", "drops", "fall", "falls", "fell", "fraud",
    "lawsuit", "layoffs", "loss", "losses", "miss", "misses", "plunge", "plunges", "probe",
    "recall", "slump", "slumps", "weak", "downgrade", "downgraded", "fine", "fined", "sue", "sued",
];

/// Lexicon classifier: counts finance words, no weights to load.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }

    fn score(text: &str) -> (usize, usize) {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .fold((0, 0), |(pos, neg), word| {
                if POSITIVE_WORDS.contains(&word.as_str()) {
                    (pos + 1, neg)
                } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                    (pos, neg + 1)
                } else {
                    (pos, neg)
                }
            })
    }
}

#[async_trait::async_trait]
impl SentimentModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let (pos, neg) = Self::score(text);
        let hits = (pos + neg) as f32;
        let sentiment = if pos > neg {
            Sentiment::new(SentimentLabel::Positive, pos as f32 / hits)
        } else if neg > pos {
            Sentiment::new(SentimentLabel::Negative, neg as f32 / hits)
        } else {
            Sentiment::new(SentimentLabel::Neutral, 1.0)
        };
        Ok(sentiment)
    }
}
