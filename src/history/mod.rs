//! 本地历史记录缓存
//!
//! 记录用户在本设备上创建过的短链接：有界（最多 [`MAX_HISTORY_ITEMS`] 条）、
//! 按创建时间倒序、跨两代存储模式（v1/v2）自动迁移，并通过订阅机制向
//! 多个并发读者广播变更。底层键值存储通过 [`kv::KeyValueStore`] 注入，
//! 方便在测试中替换为内存实现。
//!
//! 历史记录和分享计数都是非关键增强功能：存储层的任何故障都在本模块
//! 边界内吞掉，降级为空集合 / 零计数，绝不向调用方传播。

pub mod counter;
pub mod kv;
pub mod store;

pub use counter::{should_prompt_share, CreateCounter};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use store::{HistoryItem, HistoryStore, HistorySubscription};

/// 历史记录第一代存储键（旧格式，目标字段可能是完整 URL `shortUrl`）
pub const HISTORY_STORAGE_KEY_V1: &str = "short-url:history:v1";
/// 历史记录第二代存储键（当前格式）
pub const HISTORY_STORAGE_KEY_V2: &str = "short-url:history:v2";
/// 历史记录上限，超出时淘汰最旧的记录
pub const MAX_HISTORY_ITEMS: usize = 20;

/// 创建计数存储键
pub const CREATE_COUNT_STORAGE_KEY: &str = "short-url:create-count:v1";
/// 首次弹出分享提示的计数
pub const SHARE_PROMPT_MILESTONE: u64 = 3;
/// 之后每隔多少次创建再次提示
pub const SHARE_PROMPT_INTERVAL: u64 = 10;

/// 判断键是否属于历史记录存储（任一代）
pub fn is_history_storage_key(key: &str) -> bool {
    key == HISTORY_STORAGE_KEY_V1 || key == HISTORY_STORAGE_KEY_V2
}
