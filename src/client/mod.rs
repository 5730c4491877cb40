//! 上游短链接服务的 HTTP 客户端
//!
//! 创建短链接与管理接口都是对外部服务的不透明请求/响应调用。
//! 客户端一律不做自动重试，失败原因分类后交给上层决定提示文案。

pub mod admin_client;
pub mod shorten_client;

pub use admin_client::{
    AccessLogPage, AccessLogRecord, AdminClient, AdminLinkPage, AdminLinkRecord,
};
pub use shorten_client::{CreatedLink, HttpShortenClient, ShortenBackend};

/// 转发给上游的原始客户端信息（尽力而为，缺失时不携带）
#[derive(Debug, Clone, Default)]
pub struct ClientHints {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// 上游调用失败的分类
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// 网络层失败，没有收到任何响应
    Unreachable(String),
    /// 收到非成功状态码；message 为响应体文本（可能为空）
    Status { status: u16, message: String },
    /// 成功状态码但响应体不符合约定
    Protocol(String),
}

impl UpstreamError {
    /// 面向用户的提示消息
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::Unreachable(_) => {
                "Could not reach the shortening service. Please try again later.".to_string()
            }
            UpstreamError::Status { message, .. } => {
                if message.trim().is_empty() {
                    "Failed to shorten URL".to_string()
                } else {
                    message.clone()
                }
            }
            UpstreamError::Protocol(_) => "Failed to shorten URL".to_string(),
        }
    }
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Unreachable(msg) => write!(f, "upstream unreachable: {}", msg),
            UpstreamError::Status { status, message } => {
                write!(f, "upstream returned {}: {}", status, message)
            }
            UpstreamError::Protocol(msg) => write!(f, "upstream protocol error: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}
