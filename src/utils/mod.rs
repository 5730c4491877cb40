//! 通用工具

pub mod headers;

pub use headers::extract_client_hints;
