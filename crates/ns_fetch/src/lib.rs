pub mod newsapi;
pub mod sources;

pub use newsapi::NewsApiFetcher;
pub use sources::{DateRange, LOOKBACK_DAYS, PUBLISHER_ALLOW_LIST};

pub mod prelude {
    pub use super::newsapi::NewsApiFetcher;
    pub use ns_core::{Article, ArticleFetcher, Error, Result};
}
