use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Implemented by the transport and by every
/// decorator that rewrites requests on their way out.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
