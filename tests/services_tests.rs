use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use shortfront::client::{CreatedLink, ShortenBackend, UpstreamError};
use shortfront::history::{CreateCounter, HistoryStore, KeyValueStore, MemoryKvStore};
use shortfront::services::{ShortenOutcome, ShortenService};
use shortfront::validate::UrlRejection;

/// 可编程的假后端：记录每次收到的 URL，按预设响应返回
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    response: Mutex<Result<CreatedLink, UpstreamError>>,
}

impl FakeBackend {
    fn returning_id(id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Mutex::new(Ok(CreatedLink { id: id.to_string() })),
        }
    }

    fn failing_with(error: UpstreamError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Mutex::new(Err(error)),
        }
    }

    fn set_response(&self, response: Result<CreatedLink, UpstreamError>) {
        *self.response.lock() = response;
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ShortenBackend for FakeBackend {
    async fn create(&self, url: &str) -> Result<CreatedLink, UpstreamError> {
        self.calls.lock().push(url.to_string());
        self.response.lock().clone()
    }
}

fn service_with(
    backend: Arc<FakeBackend>,
) -> (ShortenService, Arc<HistoryStore>, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    let history = Arc::new(HistoryStore::new(kv.clone() as Arc<dyn KeyValueStore>));
    let counter = Arc::new(CreateCounter::new(kv.clone() as Arc<dyn KeyValueStore>));
    let service = ShortenService::new(backend, history.clone(), counter);
    (service, history, kv)
}

#[tokio::test]
async fn test_rejected_input_never_reaches_backend() {
    let backend = Arc::new(FakeBackend::returning_id("x"));
    let (service, history, _kv) = service_with(backend.clone());

    for raw in ["", "   ", "ftp://example.com", "https://a..b.com/x"] {
        let outcome = service.shorten(raw).await;
        assert!(
            matches!(outcome, ShortenOutcome::Rejected(_)),
            "expected rejection for {:?}",
            raw
        );
    }

    assert!(backend.calls().is_empty());
    assert!(history.load().is_empty());
}

#[tokio::test]
async fn test_rejection_carries_classification() {
    let backend = Arc::new(FakeBackend::returning_id("x"));
    let (service, _history, _kv) = service_with(backend);

    let outcome = service.shorten("http://example.com").await;
    let ShortenOutcome::Rejected(rejection) = outcome else {
        panic!("expected rejection");
    };
    assert!(matches!(rejection, UrlRejection::SchemeNotHttps));
}

#[tokio::test]
async fn test_successful_create_records_history() {
    let backend = Arc::new(FakeBackend::returning_id("abc123"));
    let (service, history, _kv) = service_with(backend.clone());

    let outcome = service.shorten("example.com/path?q=1").await;
    let ShortenOutcome::Created {
        id,
        short_path,
        share_prompt,
    } = outcome
    else {
        panic!("expected created outcome");
    };

    assert_eq!(id, "abc123");
    assert_eq!(short_path, "/abc123");
    assert!(!share_prompt);

    // 后端收到的是归一化后的 URL，不是原始输入
    assert_eq!(backend.calls(), vec!["https://example.com/path?q=1"]);

    let items = history.load();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "abc123");
    assert_eq!(items[0].short_path, "/abc123");
    assert_eq!(items[0].original_url, "https://example.com/path?q=1");
    assert!(items[0].created_at > 0);
}

#[tokio::test]
async fn test_share_prompt_on_third_create() {
    let backend = Arc::new(FakeBackend::returning_id("a"));
    let (service, _history, _kv) = service_with(backend.clone());

    for (i, expected_prompt) in [(1, false), (2, false), (3, true), (4, false)] {
        backend.set_response(Ok(CreatedLink {
            id: format!("id{}", i),
        }));
        let outcome = service.shorten("https://example.com/").await;
        let ShortenOutcome::Created { share_prompt, .. } = outcome else {
            panic!("expected created outcome");
        };
        assert_eq!(share_prompt, expected_prompt, "create #{}", i);
    }
}

#[tokio::test]
async fn test_upstream_status_failure_leaves_state_untouched() {
    let backend = Arc::new(FakeBackend::failing_with(UpstreamError::Status {
        status: 400,
        message: "url is not allowed".to_string(),
    }));
    let (service, history, kv) = service_with(backend);

    let outcome = service.shorten("https://example.com/").await;
    let ShortenOutcome::Failed(error) = outcome else {
        panic!("expected failed outcome");
    };
    assert_eq!(error.user_message(), "url is not allowed");

    assert!(history.load().is_empty());
    assert_eq!(kv.get(shortfront::history::CREATE_COUNT_STORAGE_KEY), None);
}

#[tokio::test]
async fn test_upstream_unreachable_failure() {
    let backend = Arc::new(FakeBackend::failing_with(UpstreamError::Unreachable(
        "connection refused".to_string(),
    )));
    let (service, history, _kv) = service_with(backend);

    let outcome = service.shorten("https://example.com/").await;
    let ShortenOutcome::Failed(error) = outcome else {
        panic!("expected failed outcome");
    };
    assert!(matches!(error, UpstreamError::Unreachable(_)));
    assert_eq!(
        error.user_message(),
        "Could not reach the shortening service. Please try again later."
    );
    assert!(history.load().is_empty());
}

#[tokio::test]
async fn test_resubmit_same_id_keeps_single_entry() {
    let backend = Arc::new(FakeBackend::returning_id("same"));
    let (service, history, _kv) = service_with(backend);

    service.shorten("https://example.com/a").await;
    service.shorten("https://example.com/b").await;

    let items = history.load();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].original_url, "https://example.com/b");
}
