//! 主机名分类器
//!
//! 纯语法检查，不做任何 DNS 解析或存在性验证。

/// 判断主机名是否为可接受的跳转目标主机
///
/// 接受以下四类（大小写不敏感）：
/// 1. `localhost`
/// 2. IPv6 字面量（含冒号即视为 IPv6，包括带方括号的形式）
/// 3. IPv4 字面量（四组 0-255 的十进制数）
/// 4. 语法合法的 DNS 域名（至少两级、TLD ≥ 2 字符、标签 1-63 字符，
///    仅字母/数字/连字符且不以连字符开头或结尾）
pub fn is_acceptable_host(hostname: &str) -> bool {
    let hostname = hostname.to_ascii_lowercase();

    if hostname.is_empty() {
        return false;
    }
    if hostname == "localhost" {
        return true;
    }

    if hostname.contains(':') {
        return true;
    }
    if is_ipv4_literal(&hostname) {
        return true;
    }

    if !hostname.contains('.') {
        return false;
    }
    if hostname.starts_with('.') || hostname.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.iter().any(|l| l.is_empty()) {
        return false;
    }
    if labels.len() < 2 {
        return false;
    }

    // 顶级标签至少 2 字符
    let Some(tld) = labels.last() else {
        return false;
    };
    if tld.len() < 2 {
        return false;
    }

    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
    }

    true
}

/// 四组点分十进制，每组 0-255，不允许空组或非数字
fn is_ipv4_literal(hostname: &str) -> bool {
    let parts: Vec<&str> = hostname.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|p| {
        !p.is_empty()
            && p.chars().all(|c| c.is_ascii_digit())
            && p.parse::<u32>().map(|n| n <= 255).unwrap_or(false)
    })
}
