//! 创建计数与分享提示
//!
//! 成功创建短链接的次数计数，仅用于决定是否弹出分享提示。
//! 与历史缓存共用同一存储介质，但正确性互不依赖。

use std::sync::Arc;

use tracing::debug;

use super::kv::KeyValueStore;
use super::{CREATE_COUNT_STORAGE_KEY, SHARE_PROMPT_INTERVAL, SHARE_PROMPT_MILESTONE};

/// 创建计数器
pub struct CreateCounter {
    kv: Arc<dyn KeyValueStore>,
}

impl CreateCounter {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 计数加一并返回新值
    ///
    /// 计数缺失、不可解析或为负时按 0 处理。读写失败降级为返回 0
    /// （分享提示不触发而已，不影响主流程）。
    pub fn bump(&self) -> u64 {
        let current = self
            .kv
            .get(CREATE_COUNT_STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(0) as u64;

        let next = current + 1;
        match self.kv.set(CREATE_COUNT_STORAGE_KEY, &next.to_string()) {
            Ok(()) => next,
            Err(e) => {
                debug!("创建计数写入失败（忽略）: {}", e);
                0
            }
        }
    }
}

/// 分享提示判定：第 3 次，以及之后每第 10 次
pub fn should_prompt_share(count: u64) -> bool {
    count == SHARE_PROMPT_MILESTONE || (count > 0 && count % SHARE_PROMPT_INTERVAL == 0)
}
