//! URL 归一化
//!
//! 将用户输入转换为规范的 https 绝对 URL，或给出分类后的拒绝原因。
//! 归一化满足幂等性：对成功结果的 `serialized` 再次归一化得到同一字符串。

use url::Url;

use super::hostname::is_acceptable_host;

/// 归一化成功的结果（不落盘，仅在请求期间存在）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// 归一化后的协议，恒为 `https`
    pub scheme: String,
    /// ASCII 形式的主机名（国际化域名已转为 punycode）
    pub host: String,
    /// 规范的绝对 URL 字符串
    pub serialized: String,
}

/// URL 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRejection {
    EmptyInput,
    SchemeNotHttps,
    MalformedUrl,
    InvalidHost,
}

impl UrlRejection {
    /// 获取面向用户的提示消息
    pub fn user_message(&self) -> &'static str {
        match self {
            UrlRejection::EmptyInput => "URL cannot be empty",
            UrlRejection::SchemeNotHttps => "Only https:// URLs are supported",
            UrlRejection::MalformedUrl => "Invalid URL format",
            UrlRejection::InvalidHost => "Invalid domain name",
        }
    }

    /// 机器可读的分类标识（API 响应中使用）
    pub fn kind(&self) -> &'static str {
        match self {
            UrlRejection::EmptyInput => "empty_input",
            UrlRejection::SchemeNotHttps => "scheme_not_https",
            UrlRejection::MalformedUrl => "malformed_url",
            UrlRejection::InvalidHost => "invalid_host",
        }
    }
}

impl std::fmt::Display for UrlRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for UrlRejection {}

/// 将用户输入归一化为规范的 https 绝对 URL
///
/// 步骤：
/// 1. 去除首尾空白；空输入 → `EmptyInput`
/// 2. 无协议前缀时补 `https://`
/// 3. 已有协议但不是 `https` → `SchemeNotHttps`（`http` 也不接受）
/// 4. 对整个候选串做 URI 百分号编码（处理非 ASCII / 路径不安全字符）
/// 5. 解析为绝对 URL；主机类解析错误 → `InvalidHost`，其余 → `MalformedUrl`
/// 6. 复查解析后协议为 `https`
/// 7. 主机名的 ASCII 形式为空 → `InvalidHost`
/// 8. 主机名分类器拒绝 → `InvalidHost`
pub fn normalize_url(input: &str) -> Result<NormalizedUrl, UrlRejection> {
    let value = input.trim();
    if value.is_empty() {
        return Err(UrlRejection::EmptyInput);
    }

    let with_scheme = if has_scheme_prefix(value) {
        if !value.to_ascii_lowercase().starts_with("https:") {
            return Err(UrlRejection::SchemeNotHttps);
        }
        value.to_string()
    } else {
        format!("https://{}", value)
    };

    let encoded = encode_uri(&with_scheme);

    let parsed = Url::parse(&encoded).map_err(|e| match e {
        url::ParseError::EmptyHost
        | url::ParseError::IdnaError
        | url::ParseError::InvalidIpv4Address
        | url::ParseError::InvalidIpv6Address
        | url::ParseError::InvalidDomainCharacter => UrlRejection::InvalidHost,
        _ => UrlRejection::MalformedUrl,
    })?;

    if parsed.scheme() != "https" {
        return Err(UrlRejection::SchemeNotHttps);
    }

    // `url` crate 已对域名做 IDNA 转换，host_str 即 ASCII 形式
    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => return Err(UrlRejection::InvalidHost),
    };

    if !is_acceptable_host(&host) {
        return Err(UrlRejection::InvalidHost);
    }

    Ok(NormalizedUrl {
        scheme: parsed.scheme().to_string(),
        host,
        serialized: parsed.to_string(),
    })
}

/// 判断是否已有 URI 协议前缀（`[A-Za-z][A-Za-z0-9+.-]*:`）
fn has_scheme_prefix(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        if c == ':' {
            return true;
        }
        if !(c.is_ascii_alphanumeric() || c == '+' || c == '.' || c == '-') {
            return false;
        }
    }
    false
}

/// encodeURI 风格的百分号编码
///
/// 保留字母数字与 `;,/?:@&=+$-_.!~*'()#`；其余字符按 UTF-8 字节编码。
/// `%` 直接透传（不再编码），保证对已编码结果的再归一化是幂等的。
/// `[` `]` 同样透传，IPv6 字面量主机的方括号必须原样保留。
fn encode_uri(value: &str) -> String {
    const KEEP: &[u8] = b";,/?:@&=+$-_.!~*'()#%[]";

    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || (c.is_ascii() && KEEP.contains(&(c as u8))) {
            out.push(c);
        } else {
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push('%');
                out.push(char::from_digit((byte >> 4) as u32, 16).unwrap().to_ascii_uppercase());
                out.push(char::from_digit((byte & 0xf) as u32, 16).unwrap().to_ascii_uppercase());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_https() {
        let n = normalize_url("example.com").unwrap();
        assert_eq!(n.serialized, "https://example.com/");
        assert_eq!(n.scheme, "https");
        assert_eq!(n.host, "example.com");
    }

    #[test]
    fn test_rejects_http() {
        assert_eq!(
            normalize_url("http://example.com"),
            Err(UrlRejection::SchemeNotHttps)
        );
        assert_eq!(
            normalize_url("ftp://example.com"),
            Err(UrlRejection::SchemeNotHttps)
        );
        assert_eq!(
            normalize_url("javascript:alert(1)"),
            Err(UrlRejection::SchemeNotHttps)
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_url(""), Err(UrlRejection::EmptyInput));
        assert_eq!(normalize_url("   "), Err(UrlRejection::EmptyInput));
    }

    #[test]
    fn test_invalid_ipv4_classified_as_invalid_host() {
        assert_eq!(
            normalize_url("https://999.999.999.999"),
            Err(UrlRejection::InvalidHost)
        );
    }

    #[test]
    fn test_localhost_with_port() {
        let n = normalize_url("https://localhost:8080/x").unwrap();
        assert_eq!(n.serialized, "https://localhost:8080/x");
        assert_eq!(n.host, "localhost");
    }

    #[test]
    fn test_empty_label_rejected() {
        assert_eq!(
            normalize_url("https://a..b.com"),
            Err(UrlRejection::InvalidHost)
        );
    }

    #[test]
    fn test_single_label_rejected() {
        assert_eq!(
            normalize_url("https://example"),
            Err(UrlRejection::InvalidHost)
        );
    }

    #[test]
    fn test_idna_host() {
        let n = normalize_url("https://bücher.de/straße").unwrap();
        assert_eq!(n.host, "xn--bcher-kva.de");
        assert!(n.serialized.starts_with("https://xn--bcher-kva.de/"));
        assert!(n.serialized.contains('%'));
    }

    #[test]
    fn test_non_ascii_path_percent_encoded() {
        let n = normalize_url("https://example.com/あ い").unwrap();
        assert_eq!(
            n.serialized,
            "https://example.com/%E3%81%82%20%E3%81%84"
        );
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "example.com",
            "https://example.com/path?query=1",
            "https://bücher.de/straße",
            "https://example.com/あ い",
            "https://localhost:8080/x",
            "https://[::1]/p",
        ] {
            let first = normalize_url(input).unwrap();
            let second = normalize_url(&first.serialized).unwrap();
            assert_eq!(first, second, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_scheme_prefix_detection() {
        assert!(has_scheme_prefix("https://a.com"));
        assert!(has_scheme_prefix("mailto:x@y.com"));
        assert!(has_scheme_prefix("a+b-c.d:rest"));
        assert!(!has_scheme_prefix("example.com/path:8080")); // '/' 在 ':' 之前
        assert!(!has_scheme_prefix("1http://a.com"));
        assert!(!has_scheme_prefix("example.com"));
    }

    #[test]
    fn test_encode_uri_keeps_reserved() {
        assert_eq!(
            encode_uri("https://a.com/p?q=1&r=2#f"),
            "https://a.com/p?q=1&r=2#f"
        );
        assert_eq!(encode_uri("a b"), "a%20b");
        assert_eq!(encode_uri("%20"), "%20"); // 不重复编码
        assert_eq!(encode_uri("[::1]"), "[::1]");
        assert_eq!(encode_uri("あ"), "%E3%81%82");
    }
}
