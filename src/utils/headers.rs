//! 请求头处理工具
//!
//! 提取原始客户端 IP 与 User-Agent，用于透传给上游管理接口。

use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;

use crate::client::ClientHints;

/// 从请求中提取透传给上游的客户端信息
pub fn extract_client_hints(req: &HttpRequest) -> ClientHints {
    ClientHints {
        ip: extract_forwarded_ip_from_headers(req.headers()),
        user_agent: req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from),
    }
}

/// 从 HeaderMap 提取转发的客户端 IP
///
/// 优先级：X-Real-IP → X-Forwarded-For 的第一个条目 → X-Client-IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .or_else(|| {
            headers
                .get("x-client-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_prefers_x_real_ip() {
        let h = headers(&[
            ("x-real-ip", "203.0.113.9"),
            ("x-forwarded-for", "198.51.100.1, 10.0.0.1"),
        ]);
        assert_eq!(
            extract_forwarded_ip_from_headers(&h),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let h = headers(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1")]);
        assert_eq!(
            extract_forwarded_ip_from_headers(&h),
            Some("198.51.100.1".to_string())
        );
    }

    #[test]
    fn test_client_ip_fallback() {
        let h = headers(&[("x-client-ip", "192.0.2.7")]);
        assert_eq!(
            extract_forwarded_ip_from_headers(&h),
            Some("192.0.2.7".to_string())
        );
    }

    #[test]
    fn test_no_headers() {
        let h = headers(&[]);
        assert_eq!(extract_forwarded_ip_from_headers(&h), None);
    }
}
