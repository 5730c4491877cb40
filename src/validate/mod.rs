//! URL 验证模块
//!
//! 判断用户输入是否为可接受的跳转目标，并归一化为规范的绝对 URL。
//! 预览接口和提交入口共用同一套纯函数，两处的判定永远一致。

pub mod hostname;
pub mod normalizer;

pub use hostname::is_acceptable_host;
pub use normalizer::{normalize_url, NormalizedUrl, UrlRejection};
