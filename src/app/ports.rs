use async_trait::async_trait;

/// Outbound HTTP capability used to reach the upstream NEO API.
///
/// `Err` carries a transport-level message (connect failure, timeout, body
/// read); any response that arrives, whatever its status, is `Ok`.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
