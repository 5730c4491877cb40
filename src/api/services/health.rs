//! 存活 / 就绪探针

use actix_web::HttpResponse;

pub struct HealthService;

impl HealthService {
    /// GET /healthz/live
    pub async fn liveness() -> HttpResponse {
        HttpResponse::Ok().body("Ok")
    }

    /// GET /healthz/ready
    pub async fn readiness() -> HttpResponse {
        HttpResponse::Ok().body("Ok")
    }
}
