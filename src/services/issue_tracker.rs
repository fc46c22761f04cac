use async_trait::async_trait;

use crate::domain::ticket::SearchResult;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// The address `search_tickets` will call for `jql`.
    fn request_url(&self, jql: &str) -> AppResult<String>;

    async fn search_tickets(&self, jql: &str) -> AppResult<SearchResult>;
}
