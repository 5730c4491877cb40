//! 业务服务层

pub mod shorten;

pub use shorten::{ShortenOutcome, ShortenService};
