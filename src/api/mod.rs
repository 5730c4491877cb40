//! HTTP 服务层

pub mod services;
