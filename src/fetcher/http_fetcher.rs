use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

use crate::app::{DashError, Result};
use crate::fetcher::{FetchRequest, Fetcher, Method};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        // GitHub rejects requests without a user agent.
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("devdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>> {
        let url = request.url.clone();
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        if let Some(token) = &request.bearer_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                builder = builder.header(AUTHORIZATION, value);
            }
        }

        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }

        if let Some(body) = &request.json_body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        } else if request.method == Method::Put {
            // Star endpoints expect an explicit empty body.
            builder = builder.body(Vec::new());
        }

        tracing::debug!("{:?} {}", request.method, request.url);
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Upstream {
                status: status.as_u16(),
                url: request.url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions"))
            .and(query_param("site", "stackoverflow"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items":[]}"#))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/questions?site=stackoverflow", server.uri())).unwrap();
        let body = fetcher.fetch(&FetchRequest::get(url)).await.unwrap();
        assert_eq!(body, br#"{"items":[]}"#);
    }

    #[tokio::test]
    async fn test_bearer_token_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/starred/rust-lang/rust"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/user/starred/rust-lang/rust", server.uri())).unwrap();
        let request = FetchRequest::new(Method::Put, url).with_bearer("secret");
        let body = fetcher.fetch(&request).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/search/repositories", server.uri())).unwrap();
        let err = fetcher.fetch(&FetchRequest::get(url)).await.unwrap_err();
        assert!(matches!(err, DashError::Upstream { status: 403, .. }));
    }
}
