use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared requests. Implemented by [`super::BasicClient`] and by
/// test doubles that must never reach the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
