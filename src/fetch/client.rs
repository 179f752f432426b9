use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam over the outbound HTTP stack so upstream calls can be faked in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
