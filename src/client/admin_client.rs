//! 管理接口的上游调用
//!
//! 链接列表 / 访问日志的只读分页查询，以及禁用 / 恢复操作。
//! 分页基于游标：响应中的 `next_page_state` 原样回传即请求下一页。
//! 请求尽力携带原始客户端的 IP 和 User-Agent。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ureq::Agent;

use super::{ClientHints, UpstreamError};
use crate::config::UpstreamConfig;

/// 管理视图中的一条链接记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLinkRecord {
    pub id: String,
    pub original_url: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub enabled: bool,
    pub disabled_at: Option<String>,
    pub last_access_at: Option<String>,
}

/// 链接列表的一页
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLinkPage {
    pub items: Vec<AdminLinkRecord>,
    /// 下一页游标（不透明令牌），无下一页时为 None
    pub next_page_state: Option<String>,
}

/// 一条访问日志记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogRecord {
    pub ts: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub status_code: u16,
}

/// 访问日志的一页
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogPage {
    pub items: Vec<AccessLogRecord>,
    pub next_page_state: Option<String>,
}

/// 管理接口客户端
pub struct AdminClient {
    agent: Agent,
    endpoint: String,
}

impl AdminClient {
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

    /// 链接列表（创建时间新到旧，游标分页）
    pub async fn list_links(
        &self,
        limit: usize,
        page_state: Option<String>,
        hints: ClientHints,
    ) -> Result<AdminLinkPage, UpstreamError> {
        let agent = self.agent.clone();
        let url = format!("{}/api/v1/admin/links", self.endpoint);
        run_blocking(move || {
            let mut req = agent.get(&url).query("limit", limit.to_string());
            if let Some(state) = &page_state {
                req = req.query("page_state", state);
            }
            let resp = with_hints(req, &hints)
                .call()
                .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;
            read_page(resp)
        })
        .await
    }

    /// 单条链接的访问日志（游标分页）
    pub async fn list_access_logs(
        &self,
        id: &str,
        limit: usize,
        page_state: Option<String>,
        hints: ClientHints,
    ) -> Result<AccessLogPage, UpstreamError> {
        let agent = self.agent.clone();
        let url = format!(
            "{}/api/v1/admin/links/{}/logs",
            self.endpoint,
            urlencoding::encode(id)
        );
        run_blocking(move || {
            let mut req = agent.get(&url).query("limit", limit.to_string());
            if let Some(state) = &page_state {
                req = req.query("page_state", state);
            }
            let resp = with_hints(req, &hints)
                .call()
                .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;
            read_page(resp)
        })
        .await
    }

    /// 禁用链接
    pub async fn disable_link(&self, id: &str, hints: ClientHints) -> Result<(), UpstreamError> {
        self.post_action(id, "disable", hints).await
    }

    /// 恢复链接
    pub async fn restore_link(&self, id: &str, hints: ClientHints) -> Result<(), UpstreamError> {
        self.post_action(id, "restore", hints).await
    }

    async fn post_action(
        &self,
        id: &str,
        action: &str,
        hints: ClientHints,
    ) -> Result<(), UpstreamError> {
        let agent = self.agent.clone();
        let url = format!(
            "{}/api/v1/admin/links/{}/{}",
            self.endpoint,
            urlencoding::encode(id),
            action
        );
        run_blocking(move || {
            let resp = with_hints(agent.post(&url), &hints)
                .send_empty()
                .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                let message = resp.into_body().read_to_string().unwrap_or_default();
                return Err(UpstreamError::Status {
                    status: status.as_u16(),
                    message,
                });
            }
            Ok(())
        })
        .await
    }
}

fn with_hints<B>(
    mut req: ureq::RequestBuilder<B>,
    hints: &ClientHints,
) -> ureq::RequestBuilder<B> {
    if let Some(ip) = &hints.ip {
        req = req.header("x-forwarded-for", ip);
    }
    if let Some(ua) = &hints.user_agent {
        req = req.header("user-agent", ua);
    }
    req
}

fn read_page<T: serde::de::DeserializeOwned>(
    resp: ureq::http::Response<ureq::Body>,
) -> Result<T, UpstreamError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.into_body().read_to_string().unwrap_or_default();
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            message,
        });
    }
    resp.into_body()
        .read_json()
        .map_err(|e| UpstreamError::Protocol(e.to_string()))
}

async fn run_blocking<T, F>(f: F) -> Result<T, UpstreamError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, UpstreamError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|e| {
        warn!("Admin request spawn_blocking failed: {}", e);
        Err(UpstreamError::Unreachable(e.to_string()))
    })
}
