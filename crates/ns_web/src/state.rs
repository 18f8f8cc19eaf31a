use ns_core::SentimentPipeline;

pub struct AppState {
    pub pipeline: SentimentPipeline,
}

impl AppState {
    pub fn new(pipeline: SentimentPipeline) -> Self {
        Self { pipeline }
    }
}
