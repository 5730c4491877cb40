//! 本地历史记录接口

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::history::HistoryStore;

pub struct HistoryApiService;

impl HistoryApiService {
    /// GET /api/v1/history
    pub async fn get_history(store: web::Data<Arc<HistoryStore>>) -> HttpResponse {
        let snapshot = store.snapshot();
        HttpResponse::Ok().json(snapshot.as_ref())
    }

    /// DELETE /api/v1/history/{id}
    pub async fn delete_item(
        store: web::Data<Arc<HistoryStore>>,
        path: web::Path<String>,
    ) -> HttpResponse {
        store.remove(&path.into_inner());
        HttpResponse::NoContent().finish()
    }

    /// DELETE /api/v1/history
    pub async fn clear_history(store: web::Data<Arc<HistoryStore>>) -> HttpResponse {
        store.clear();
        HttpResponse::NoContent().finish()
    }
}
