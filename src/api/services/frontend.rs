//! 入口页面与静态资源
//!
//! 页面构建产物通过 RustEmbed 编译进二进制。

use actix_web::{HttpRequest, HttpResponse};
use rust_embed::Embed;
use tracing::{debug, trace};

#[derive(Embed)]
#[folder = "web/dist/"]
struct FrontendAssets;

pub struct FrontendService;

impl FrontendService {
    /// 处理首页
    pub async fn handle_index() -> HttpResponse {
        trace!("Serving frontend index page");
        match FrontendAssets::get("index.html") {
            Some(content) => {
                let html = String::from_utf8_lossy(&content.data)
                    .replace("%SHORTFRONT_VERSION%", env!("CARGO_PKG_VERSION"));
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }
            None => HttpResponse::NotFound().body("Not found"),
        }
    }

    /// 处理静态资源文件
    pub async fn handle_static(req: HttpRequest) -> HttpResponse {
        let path = req.match_info().query("path");
        trace!("Serving static file: {}", path);

        let asset_path = format!("assets/{}", path);
        match FrontendAssets::get(&asset_path) {
            Some(content) => HttpResponse::Ok()
                .content_type(Self::get_content_type(path))
                .body(content.data.into_owned()),
            None => {
                debug!("Static file not found: {}", path);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    fn get_content_type(path: &str) -> &'static str {
        match path.rsplit('.').next() {
            Some("css") => "text/css; charset=utf-8",
            Some("js") => "application/javascript; charset=utf-8",
            Some("svg") => "image/svg+xml",
            Some("png") => "image/png",
            Some("ico") => "image/x-icon",
            Some("woff2") => "font/woff2",
            Some("html") => "text/html; charset=utf-8",
            _ => "application/octet-stream",
        }
    }
}
