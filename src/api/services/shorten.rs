//! 提交与预览校验接口

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::client::UpstreamError;
use crate::services::{ShortenOutcome, ShortenService};
use crate::validate::normalize_url;

#[derive(Deserialize)]
pub struct ShortenBody {
    pub url: String,
}

pub struct ShortenApiService;

impl ShortenApiService {
    /// POST /api/v1/shorten
    ///
    /// 权威校验 + 上游创建。校验失败返回 400 与分类后的提示文案，
    /// 上游不可达返回 503，上游报错返回 502。
    pub async fn post_shorten(
        service: web::Data<Arc<ShortenService>>,
        body: web::Json<ShortenBody>,
    ) -> HttpResponse {
        match service.shorten(&body.url).await {
            ShortenOutcome::Created {
                id,
                short_path,
                share_prompt,
            } => HttpResponse::Ok().json(json!({
                "id": id,
                "shortPath": short_path,
                "sharePrompt": share_prompt,
            })),
            ShortenOutcome::Rejected(rejection) => HttpResponse::BadRequest().json(json!({
                "error": rejection.user_message(),
                "kind": rejection.kind(),
            })),
            ShortenOutcome::Failed(e @ UpstreamError::Unreachable(_)) => {
                HttpResponse::ServiceUnavailable().json(json!({ "error": e.user_message() }))
            }
            ShortenOutcome::Failed(e) => {
                HttpResponse::BadGateway().json(json!({ "error": e.user_message() }))
            }
        }
    }

    /// POST /api/v1/validate
    ///
    /// 预览校验（仅供页面提前反馈）。与提交路径共用同一归一化函数，
    /// 但本接口的结果不被信任为提交闸门。
    pub async fn post_validate(body: web::Json<ShortenBody>) -> HttpResponse {
        match normalize_url(&body.url) {
            Ok(normalized) => HttpResponse::Ok().json(json!({
                "valid": true,
                "normalized": normalized.serialized,
            })),
            Err(rejection) => HttpResponse::Ok().json(json!({
                "valid": false,
                "message": rejection.user_message(),
                "kind": rejection.kind(),
            })),
        }
    }
}
