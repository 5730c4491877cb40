pub mod admin;
pub mod frontend;
pub mod health;
pub mod history;
pub mod shorten;

pub use admin::AdminProxyService;
pub use frontend::FrontendService;
pub use health::HealthService;
pub use history::HistoryApiService;
pub use shorten::ShortenApiService;
