use crate::config::TernClientConfig;
use crate::error::{Result, TernClientError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub(crate) fn new(config: &TernClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&config.secret_key).map_err(|e| {
            TernClientError::Config(format!("invalid secret key header value: {e}"))
        })?;
        auth_value.set_sensitive(true);
        headers.insert("X-Secret-Key", auth_value);

        let inner = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let resp = self.inner.get(self.url(path)).send().await?;
        self.parse(resp).await
    }

    pub(crate) async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let resp = self.inner.post(self.url(path)).json(body).send().await?;
        self.parse(resp).await
    }

    pub(crate) async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self.inner.post(self.url(path)).json(body).send().await?;
        self.check_status(resp).await
    }

    pub(crate) async fn put_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self.inner.put(self.url(path)).json(body).send().await?;
        self.check_status(resp).await
    }

    pub(crate) async fn delete_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self.inner.delete(self.url(path)).json(body).send().await?;
        self.check_status(resp).await
    }

    async fn parse<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R> {
        if !resp.status().is_success() {
            return Err(self.error_for(resp).await);
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(TernClientError::Deserialization)
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<()> {
        if !resp.status().is_success() {
            return Err(self.error_for(resp).await);
        }
        Ok(())
    }

    async fn error_for(&self, resp: reqwest::Response) -> TernClientError {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return TernClientError::Unauthorized;
        }
        let message = self.extract_error_message(resp).await;
        match status {
            StatusCode::NOT_FOUND => TernClientError::NotFound(message),
            StatusCode::CONFLICT => TernClientError::Conflict(message),
            _ => TernClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn extract_error_message(&self, resp: reqwest::Response) -> String {
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from))
            .unwrap_or(text)
    }
}
