//! 创建短链接的上游调用
//!
//! POST `{endpoint}/api/v1/shorten`，请求体 `{"url": ...}`，
//! 成功响应体 `{"id": ...}`。同步 HTTP 在 `spawn_blocking` 中执行。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ureq::Agent;

use super::UpstreamError;
use crate::config::UpstreamConfig;

/// 上游分配的短链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub id: String,
}

/// 创建短链接的后端抽象（测试中注入假实现）
#[async_trait]
pub trait ShortenBackend: Send + Sync {
    async fn create(&self, url: &str) -> Result<CreatedLink, UpstreamError>;
}

#[derive(Serialize)]
struct ShortenRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ShortenResponse {
    id: String,
}

/// HTTP 实现
pub struct HttpShortenClient {
    agent: Agent,
    endpoint: String,
}

impl HttpShortenClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn create_sync(agent: Agent, url: String, target: String) -> Result<CreatedLink, UpstreamError> {
        let resp = agent
            .post(&url)
            .send_json(ShortenRequest { url: &target })
            .map_err(|e| {
                warn!("Shorten request to \"{}\" failed: {}", url, e);
                UpstreamError::Unreachable(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.into_body().read_to_string().unwrap_or_default();
            debug!("Shorten request rejected with {}: {}", status, message);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ShortenResponse = resp
            .into_body()
            .read_json()
            .map_err(|e| UpstreamError::Protocol(e.to_string()))?;
        Ok(CreatedLink { id: body.id })
    }
}

#[async_trait]
impl ShortenBackend for HttpShortenClient {
    async fn create(&self, url: &str) -> Result<CreatedLink, UpstreamError> {
        let agent = self.agent.clone();
        let request_url = format!("{}/api/v1/shorten", self.endpoint);
        let target = url.to_string();

        tokio::task::spawn_blocking(move || Self::create_sync(agent, request_url, target))
            .await
            .unwrap_or_else(|e| {
                warn!("Shorten spawn_blocking failed: {}", e);
                Err(UpstreamError::Unreachable(e.to_string()))
            })
    }
}
