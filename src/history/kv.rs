//! 键值存储抽象
//!
//! 历史缓存和创建计数共用的持久化介质。`watch` 变更通知对应浏览器
//! storage 事件的角色：同一存储的其他读者（其他视图/进程内实例）
//! 在写入完成后收到被修改的键。

use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::errors::{Result, ShortfrontError};

pub type WatchId = u64;
pub type WatchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// 面向本地持久化的键值存储
///
/// 写入语义为 last-writer-wins，不提供跨键事务。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// 注册变更回调；仅在写入成功落盘后触发，参数为被修改的键
    fn watch(&self, callback: WatchCallback) -> WatchId;
    fn unwatch(&self, id: WatchId);
}

/// watch 回调注册表（File/Memory 两种实现共用）
#[derive(Default)]
struct WatcherRegistry {
    next_id: AtomicU64,
    watchers: Mutex<Vec<(WatchId, WatchCallback)>>,
}

impl WatcherRegistry {
    fn register(&self, callback: WatchCallback) -> WatchId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.watchers.lock().push((id, callback));
        id
    }

    fn unregister(&self, id: WatchId) {
        self.watchers.lock().retain(|(wid, _)| *wid != id);
    }

    fn notify(&self, key: &str) {
        // 先复制再调用，避免回调中再次订阅时死锁
        let callbacks: Vec<WatchCallback> = self
            .watchers
            .lock()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb(key);
        }
    }
}

/// 文件后端：JSON 对象文件 + 内存写穿缓存
pub struct FileKvStore {
    file_path: String,
    cache: RwLock<HashMap<String, String>>,
    watchers: WatcherRegistry,
}

impl FileKvStore {
    pub fn new(file_path: impl Into<String>) -> Result<Self> {
        let file_path = file_path.into();
        let entries = Self::load_from_file(&file_path)?;
        info!("FileKvStore 初始化完成，已加载 {} 个键", entries.len());
        Ok(Self {
            file_path,
            cache: RwLock::new(entries),
            watchers: WatcherRegistry::default(),
        })
    }

    fn load_from_file(path: &str) -> Result<HashMap<String, String>> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ShortfrontError::serialization(format!("解析存储文件失败: {}", e))
            }),
            Err(_) => {
                // 文件不存在，创建空的存储
                fs::write(path, "{}").map_err(|e| {
                    ShortfrontError::file_operation(format!("创建存储文件失败: {}", e))
                })?;
                debug!("已创建空的存储文件: {}", path);
                Ok(HashMap::new())
            }
        }
    }

    fn save_to_file(&self, entries: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut cache = self.cache.write();
            cache.insert(key.to_string(), value.to_string());
            self.save_to_file(&cache)?;
        }
        self.watchers.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let removed = {
            let mut cache = self.cache.write();
            let removed = cache.remove(key).is_some();
            if removed {
                self.save_to_file(&cache)?;
            }
            removed
        };
        if removed {
            self.watchers.notify(key);
        }
        Ok(())
    }

    fn watch(&self, callback: WatchCallback) -> WatchId {
        self.watchers.register(callback)
    }

    fn unwatch(&self, id: WatchId) {
        self.watchers.unregister(id);
    }
}

/// 内存后端：用于测试和无持久化运行
///
/// `fail_writes` 打开后所有写入返回错误，用于模拟配额耗尽等存储故障。
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    watchers: WatcherRegistry,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储写入故障（如配额耗尽）
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShortfrontError::file_operation("storage quota exceeded"));
        }
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        self.watchers.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShortfrontError::file_operation("storage quota exceeded"));
        }
        if self.entries.write().remove(key).is_some() {
            self.watchers.notify(key);
        }
        Ok(())
    }

    fn watch(&self, callback: WatchCallback) -> WatchId {
        self.watchers.register(callback)
    }

    fn unwatch(&self, id: WatchId) {
        self.watchers.unregister(id);
    }
}
