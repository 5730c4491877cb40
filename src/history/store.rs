//! 历史记录存储
//!
//! 所有操作同步作用于注入的键值存储。存储故障一律吞掉并降级为空集合，
//! 历史记录是增强功能，不允许拖垮主流程。

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::kv::{KeyValueStore, WatchId};
use super::{
    is_history_storage_key, HISTORY_STORAGE_KEY_V1, HISTORY_STORAGE_KEY_V2, MAX_HISTORY_ITEMS,
};

/// 一条本地历史记录
///
/// 持久化为 camelCase JSON（`id` / `shortPath` / `originalUrl` / `createdAt`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// 短链接标识，由后端分配，集合内唯一
    pub id: String,
    /// 根相对路径（`/` + id），恒以 `/` 开头
    pub short_path: String,
    /// 用户提交的归一化目标 URL（迁移来的旧记录可能为空串）
    pub original_url: String,
    /// 创建时间（epoch 毫秒），唯一排序键
    pub created_at: i64,
}

type ChangeCallback = Arc<dyn Fn() + Send + Sync>;
type ListenerRegistry = Arc<Mutex<Vec<(u64, ChangeCallback)>>>;

/// 订阅凭据：显式调用 [`HistorySubscription::unsubscribe`] 或随 Drop 注销
pub struct HistorySubscription {
    listeners: ListenerRegistry,
    listener_id: u64,
    kv: Arc<dyn KeyValueStore>,
    watch_id: WatchId,
}

impl HistorySubscription {
    pub fn unsubscribe(self) {
        // Drop 完成实际清理
    }
}

impl Drop for HistorySubscription {
    fn drop(&mut self) {
        self.listeners
            .lock()
            .retain(|(id, _)| *id != self.listener_id);
        self.kv.unwatch(self.watch_id);
    }
}

/// 快照缓存：仅当底层原始值（键 + 内容）变化时才重新解析
struct SnapshotState {
    raw: Option<(&'static str, String)>,
    items: Arc<Vec<HistoryItem>>,
}

/// 历史记录存储
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
    listeners: ListenerRegistry,
    next_listener_id: AtomicU64,
    snapshot: Mutex<Option<SnapshotState>>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicU64::new(0),
            snapshot: Mutex::new(None),
        }
    }

    /// 读取当前历史记录：优先 v2 键，缺失时回退 v1 键
    ///
    /// 逐条解析并丢弃结构非法的记录，按 id 去重（较新的 `createdAt` 胜出），
    /// 按 `createdAt` 倒序排序并截断到上限。整体解析失败返回空集合。
    /// 首次从 v1 数据成功加载且 v2 尚不存在时，把归一化后的集合写回 v2
    /// 键（一次性、幂等的迁移）。
    pub fn load(&self) -> Vec<HistoryItem> {
        let (raw, from_v2) = match self.read_raw() {
            Some((key, raw)) => (raw, key == HISTORY_STORAGE_KEY_V2),
            None => return Vec::new(),
        };

        let items = parse_items(&raw);

        if !from_v2 && !items.is_empty() {
            // v1 -> v2 一次性迁移
            self.save(&items);
        }

        items
    }

    /// 将集合原样序列化到 v2 键；存储故障吞掉（降级为“未持久化”）
    pub fn save(&self, items: &[HistoryItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                debug!("历史记录序列化失败（忽略）: {}", e);
                return;
            }
        };
        if let Err(e) = self.kv.set(HISTORY_STORAGE_KEY_V2, &json) {
            debug!("历史记录写入失败（忽略）: {}", e);
        }
    }

    /// 插入一条记录：同 id 的旧记录被替换并提升到新的时间位置
    pub fn add(&self, item: HistoryItem) {
        let mut items = self.load();
        items.retain(|existing| existing.id != item.id);
        items.insert(0, item);
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(MAX_HISTORY_ITEMS);
        self.save(&items);
        self.notify_changed();
    }

    /// 删除指定 id 的记录
    pub fn remove(&self, id: &str) {
        let mut items = self.load();
        items.retain(|item| item.id != id);
        self.save(&items);
        self.notify_changed();
    }

    /// 清空历史记录
    pub fn clear(&self) {
        self.save(&[]);
        self.notify_changed();
    }

    /// 订阅变更
    ///
    /// 同时注册两条通知路径：本实例 `add`/`remove`/`clear` 之后的进程内
    /// 通知，以及键值存储针对两个历史键的 watch 信号（其他并发读者写入
    /// 时触发）。二者合计为 at-least-once 投递。
    pub fn subscribe(&self, on_change: impl Fn() + Send + Sync + 'static) -> HistorySubscription {
        let callback: ChangeCallback = Arc::new(on_change);

        let listener_id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((listener_id, callback.clone()));

        let watch_id = self.kv.watch(Arc::new(move |key| {
            if is_history_storage_key(key) {
                callback();
            }
        }));

        HistorySubscription {
            listeners: self.listeners.clone(),
            listener_id,
            kv: self.kv.clone(),
            watch_id,
        }
    }

    /// 引用稳定的集合视图
    ///
    /// 底层原始值（键 + 内容）未变化时返回同一个 `Arc`，依赖引用相等性
    /// 跳过重算的消费者在两次变更之间拿到的是同一对象。
    ///
    /// 原始值只读取一次，缓存的键值正是被解析的那份内容。持锁期间不碰
    /// 存储；v1 -> v2 的迁移写回推迟到释放锁之后，watch 回调里的订阅者
    /// 可以安全地重入本方法。
    pub fn snapshot(&self) -> Arc<Vec<HistoryItem>> {
        let raw = self.read_raw();

        let (items, migrate) = {
            let mut cached = self.snapshot.lock();
            if let Some(state) = cached.as_ref() {
                if state.raw == raw {
                    return state.items.clone();
                }
            }
            let (parsed, from_v1) = match &raw {
                Some((key, content)) => (parse_items(content), *key == HISTORY_STORAGE_KEY_V1),
                None => (Vec::new(), false),
            };
            let migrate = from_v1 && !parsed.is_empty();
            let items = Arc::new(parsed);
            *cached = Some(SnapshotState {
                raw,
                items: items.clone(),
            });
            (items, migrate)
        };

        if migrate {
            self.save(&items);
        }
        items
    }

    /// 无法访问持久化存储的执行环境中的视图：“未知”，区别于“已知为空”
    pub fn server_snapshot() -> Option<Arc<Vec<HistoryItem>>> {
        None
    }

    fn read_raw(&self) -> Option<(&'static str, String)> {
        if let Some(raw) = self.kv.get(HISTORY_STORAGE_KEY_V2) {
            return Some((HISTORY_STORAGE_KEY_V2, raw));
        }
        self.kv
            .get(HISTORY_STORAGE_KEY_V1)
            .map(|raw| (HISTORY_STORAGE_KEY_V1, raw))
    }

    fn notify_changed(&self) {
        let callbacks: Vec<ChangeCallback> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb();
        }
    }
}

/// 解析持久化的原始 JSON 为归一化集合（逐条容忍、去重、排序、截断）
///
/// 纯函数，不访问存储。整体解析失败返回空集合。
fn parse_items(raw: &str) -> Vec<HistoryItem> {
    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(raw) else {
        return Vec::new();
    };

    let mut items: Vec<HistoryItem> = values.iter().filter_map(parse_record).collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.id.clone()));
    items.truncate(MAX_HISTORY_ITEMS);
    items
}

/// 迁移用路径归一化：旧记录的目标字段可能是完整 URL
///
/// 以 `/` 开头的值原样保留；完整 URL 提取其路径；其余（含相对路径）
/// 视为非法，整条记录丢弃。
fn normalize_short_path(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if value.starts_with('/') {
        return Some(value.to_string());
    }
    let url = Url::parse(value).ok()?;
    let path = url.path();
    if path.is_empty() {
        Some("/".to_string())
    } else if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{}", path))
    }
}

/// 宽容地解析单条持久化记录，结构非法时返回 `None`
///
/// 必须有非空字符串 `id`、数值 `createdAt`，以及可归一化的
/// `shortPath`（或旧格式的 `shortUrl`）。`originalUrl` 缺失时取空串。
fn parse_record(value: &serde_json::Value) -> Option<HistoryItem> {
    let obj = value.as_object()?;

    let id = obj.get("id")?.as_str()?;
    if id.is_empty() {
        return None;
    }

    let created_at = obj.get("createdAt")?.as_i64()?;

    let original_url = obj
        .get("originalUrl")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let short_path = match obj.get("shortPath").and_then(|v| v.as_str()) {
        Some(path) => normalize_short_path(path)?,
        None => {
            let short_url = obj.get("shortUrl").and_then(|v| v.as_str())?;
            normalize_short_path(short_url)?
        }
    };

    Some(HistoryItem {
        id: id.to_string(),
        short_path,
        original_url,
        created_at,
    })
}
