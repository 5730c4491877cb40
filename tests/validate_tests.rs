use shortfront::validate::{is_acceptable_host, normalize_url, UrlRejection};

#[test]
fn test_scenario_table() {
    // 无协议输入补 https://
    let n = normalize_url("example.com").unwrap();
    assert_eq!(n.serialized, "https://example.com/");

    // http 一律拒绝
    assert_eq!(
        normalize_url("http://example.com"),
        Err(UrlRejection::SchemeNotHttps)
    );

    // 非法 IPv4：每组必须 0-255
    assert_eq!(
        normalize_url("https://999.999.999.999"),
        Err(UrlRejection::InvalidHost)
    );

    // localhost 带端口和路径
    assert_eq!(
        normalize_url("https://localhost:8080/x").unwrap().serialized,
        "https://localhost:8080/x"
    );

    // 空标签
    assert_eq!(
        normalize_url("https://a..b.com"),
        Err(UrlRejection::InvalidHost)
    );

    // 空输入
    assert_eq!(normalize_url(""), Err(UrlRejection::EmptyInput));
    assert_eq!(normalize_url("  \t "), Err(UrlRejection::EmptyInput));
}

#[test]
fn test_rejection_messages_are_specific() {
    assert_eq!(
        normalize_url("").unwrap_err().user_message(),
        "URL cannot be empty"
    );
    assert_eq!(
        normalize_url("http://example.com").unwrap_err().user_message(),
        "Only https:// URLs are supported"
    );
    assert_eq!(
        normalize_url("https://a..b.com").unwrap_err().user_message(),
        "Invalid domain name"
    );
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "example.com",
        "sub.example.co.jp/path?q=1#frag",
        "https://example.com/with space",
        "https://bücher.de/straße",
        "https://192.168.1.1/x",
        "https://[2001:db8::1]:8443/y",
        "https://localhost",
    ];
    for input in inputs {
        let first = normalize_url(input).unwrap();
        let second = normalize_url(&first.serialized).unwrap();
        assert_eq!(
            first.serialized, second.serialized,
            "re-normalizing changed the result for {}",
            input
        );
        assert_eq!(first, second);
    }
}

#[test]
fn test_classifier_is_pure() {
    let hosts = [
        "example.com",
        "localhost",
        "[::1]",
        "10.0.0.1",
        "a..b.com",
        "",
    ];
    for host in hosts {
        let first = is_acceptable_host(host);
        for _ in 0..3 {
            assert_eq!(is_acceptable_host(host), first);
        }
    }
}

#[test]
fn test_normalized_host_is_ascii() {
    let n = normalize_url("https://bücher.de").unwrap();
    assert!(n.host.is_ascii());
    assert_eq!(n.scheme, "https");
}
