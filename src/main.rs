use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::{debug, info};

use shortfront::api::services::{
    AdminProxyService, FrontendService, HealthService, HistoryApiService, ShortenApiService,
};
use shortfront::client::{AdminClient, HttpShortenClient};
use shortfront::config;
use shortfront::history::{CreateCounter, FileKvStore, HistoryStore, KeyValueStore};
use shortfront::services::ShortenService;
use shortfront::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = config::get_config();
    let _log_guard = init_logging(&config.logging);

    let kv: Arc<dyn KeyValueStore> = match FileKvStore::new(config.history.file.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let history = Arc::new(HistoryStore::new(kv.clone()));
    let counter = Arc::new(CreateCounter::new(kv.clone()));
    let backend = Arc::new(HttpShortenClient::new(&config.upstream));
    let shorten_service = Arc::new(ShortenService::new(
        backend,
        history.clone(),
        counter.clone(),
    ));
    let admin_client = Arc::new(AdminClient::new(&config.upstream));

    // 进程内订阅：历史变更打点
    let history_for_log = history.clone();
    let _history_subscription = history.subscribe(move || {
        debug!("History updated, {} items", history_for_log.load().len());
    });

    info!("Upstream endpoint: {}", config.upstream.endpoint);
    info!("History store file: {}", config.history.file);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(shorten_service.clone()))
            .app_data(web::Data::new(history.clone()))
            .app_data(web::Data::new(admin_client.clone()))
            .service(
                web::scope("/api/v1")
                    .route("/shorten", web::post().to(ShortenApiService::post_shorten))
                    .route("/validate", web::post().to(ShortenApiService::post_validate))
                    .route("/history", web::get().to(HistoryApiService::get_history))
                    .route("/history", web::delete().to(HistoryApiService::clear_history))
                    .route(
                        "/history/{id}",
                        web::delete().to(HistoryApiService::delete_item),
                    ),
            )
            .service(
                web::scope("/admin")
                    .route("/links", web::get().to(AdminProxyService::get_links))
                    .route(
                        "/links/{id}/logs",
                        web::get().to(AdminProxyService::get_access_logs),
                    )
                    .route(
                        "/links/{id}/disable",
                        web::post().to(AdminProxyService::post_disable),
                    )
                    .route(
                        "/links/{id}/restore",
                        web::post().to(AdminProxyService::post_restore),
                    ),
            )
            .route("/healthz/live", web::get().to(HealthService::liveness))
            .route("/healthz/ready", web::get().to(HealthService::readiness))
            .route("/", web::get().to(FrontendService::handle_index))
            .route(
                "/assets/{path:.*}",
                web::get().to(FrontendService::handle_static),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
