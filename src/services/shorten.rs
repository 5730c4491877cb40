//! 短链接创建流程
//!
//! 这里是权威校验所在：归一化失败则绝不发起上游请求。页面侧的预览
//! 校验只是提前反馈，永远不被信任为唯一闸门。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::client::{ShortenBackend, UpstreamError};
use crate::history::{should_prompt_share, CreateCounter, HistoryItem, HistoryStore};
use crate::validate::{normalize_url, UrlRejection};

/// 一次提交的结果
#[derive(Debug, Clone)]
pub enum ShortenOutcome {
    /// 创建成功
    Created {
        id: String,
        short_path: String,
        /// 是否应向用户弹出分享提示
        share_prompt: bool,
    },
    /// 输入被权威校验拒绝，未发起任何网络副作用
    Rejected(UrlRejection),
    /// 上游调用失败
    Failed(UpstreamError),
}

/// 创建短链接的编排服务
pub struct ShortenService {
    backend: Arc<dyn ShortenBackend>,
    history: Arc<HistoryStore>,
    counter: Arc<CreateCounter>,
}

impl ShortenService {
    pub fn new(
        backend: Arc<dyn ShortenBackend>,
        history: Arc<HistoryStore>,
        counter: Arc<CreateCounter>,
    ) -> Self {
        Self {
            backend,
            history,
            counter,
        }
    }

    /// 提交一条原始输入
    ///
    /// 1. 权威归一化；拒绝则直接返回分类结果
    /// 2. 调用上游创建短链接
    /// 3. 成功后写入本地历史、递增创建计数、计算分享提示标志
    ///
    /// 历史与计数属于增强功能，它们的失败不会影响返回的创建结果。
    pub async fn shorten(&self, raw_input: &str) -> ShortenOutcome {
        let normalized = match normalize_url(raw_input) {
            Ok(n) => n,
            Err(rejection) => {
                debug!("Submission rejected: {}", rejection.kind());
                return ShortenOutcome::Rejected(rejection);
            }
        };

        let created = match self.backend.create(&normalized.serialized).await {
            Ok(created) => created,
            Err(e) => {
                info!("Shorten request failed: {}", e);
                return ShortenOutcome::Failed(e);
            }
        };

        let short_path = format!("/{}", created.id);
        self.history.add(HistoryItem {
            id: created.id.clone(),
            short_path: short_path.clone(),
            original_url: normalized.serialized,
            created_at: Utc::now().timestamp_millis(),
        });

        let count = self.counter.bump();
        let share_prompt = should_prompt_share(count);
        info!(
            "Short link created: {} (create_count={}, share_prompt={})",
            short_path, count, share_prompt
        );

        ShortenOutcome::Created {
            id: created.id,
            short_path,
            share_prompt,
        }
    }
}
