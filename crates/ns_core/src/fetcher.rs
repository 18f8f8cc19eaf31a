use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Returns the name of the news provider
    fn name(&self) -> &str;

    /// Fetch recent articles mentioning `company`, newest first
    async fn fetch(&self, company: &str) -> Result<Vec<Article>>;
}
