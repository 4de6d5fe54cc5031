use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. [`BasicClient`](super::BasicClient) is the
/// production implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
