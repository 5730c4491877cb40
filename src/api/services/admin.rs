//! 管理视图代理接口
//!
//! 只读列表与禁用/恢复操作全部透传给上游，不在本地保存任何状态。
//! 游标令牌原样进出，客户端 IP / User-Agent 尽力转发。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::client::{AdminClient, UpstreamError};
use crate::utils::extract_client_hints;

/// 列表接口的默认页大小
const DEFAULT_PAGE_LIMIT: usize = 20;

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub page_state: Option<String>,
}

pub struct AdminProxyService;

impl AdminProxyService {
    /// GET /admin/links
    pub async fn get_links(
        client: web::Data<Arc<AdminClient>>,
        query: web::Query<PageQuery>,
        req: HttpRequest,
    ) -> HttpResponse {
        let hints = extract_client_hints(&req);
        let result = client
            .list_links(
                query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
                query.page_state.clone(),
                hints,
            )
            .await;
        match result {
            Ok(page) => HttpResponse::Ok().json(page),
            Err(e) => upstream_error_response(e),
        }
    }

    /// GET /admin/links/{id}/logs
    pub async fn get_access_logs(
        client: web::Data<Arc<AdminClient>>,
        path: web::Path<String>,
        query: web::Query<PageQuery>,
        req: HttpRequest,
    ) -> HttpResponse {
        let hints = extract_client_hints(&req);
        let result = client
            .list_access_logs(
                &path.into_inner(),
                query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
                query.page_state.clone(),
                hints,
            )
            .await;
        match result {
            Ok(page) => HttpResponse::Ok().json(page),
            Err(e) => upstream_error_response(e),
        }
    }

    /// POST /admin/links/{id}/disable
    pub async fn post_disable(
        client: web::Data<Arc<AdminClient>>,
        path: web::Path<String>,
        req: HttpRequest,
    ) -> HttpResponse {
        let hints = extract_client_hints(&req);
        match client.disable_link(&path.into_inner(), hints).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(e) => upstream_error_response(e),
        }
    }

    /// POST /admin/links/{id}/restore
    pub async fn post_restore(
        client: web::Data<Arc<AdminClient>>,
        path: web::Path<String>,
        req: HttpRequest,
    ) -> HttpResponse {
        let hints = extract_client_hints(&req);
        match client.restore_link(&path.into_inner(), hints).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(e) => upstream_error_response(e),
        }
    }
}

/// 上游错误映射：不可达 → 503，上游状态码尽量原样透传
fn upstream_error_response(error: UpstreamError) -> HttpResponse {
    match &error {
        UpstreamError::Unreachable(_) => {
            HttpResponse::ServiceUnavailable().json(json!({ "error": error.user_message() }))
        }
        UpstreamError::Status { status, .. } => {
            let status =
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            HttpResponse::build(status).json(json!({ "error": error.user_message() }))
        }
        UpstreamError::Protocol(_) => {
            HttpResponse::BadGateway().json(json!({ "error": error.user_message() }))
        }
    }
}
