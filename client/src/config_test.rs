use super::*;

#[test]
fn defaults_apply_when_options_absent() {
    let cfg = ApiConfig::from_values(None, None);
    assert_eq!(cfg.api_host, DEFAULT_API_HOST);
    assert_eq!(cfg.api_base_path, DEFAULT_API_BASE_PATH);
    assert_eq!(cfg.base_url(), "http://localhost:8080/api");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = ApiConfig::from_values(Some("   "), Some(""));
    assert_eq!(cfg, ApiConfig::default());
}

#[test]
fn overrides_are_normalized() {
    let cfg = ApiConfig::from_values(Some("https://api.example.test/"), Some("v2/"));
    assert_eq!(cfg.api_host, "https://api.example.test");
    assert_eq!(cfg.api_base_path, "/v2");
    assert_eq!(cfg.base_url(), "https://api.example.test/v2");
}

#[test]
fn root_base_path_becomes_empty_prefix() {
    let cfg = ApiConfig::from_values(Some("https://api.example.test"), Some("/"));
    assert_eq!(cfg.api_base_path, "");
    assert_eq!(cfg.resolve("/users/me"), "https://api.example.test/users/me");
}

#[test]
fn resolve_prefixes_relative_paths() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.resolve("/auth/login"), "http://localhost:8080/api/auth/login");
    assert_eq!(cfg.resolve("todo/7"), "http://localhost:8080/api/todo/7");
}

#[test]
fn resolve_leaves_absolute_urls_alone() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.resolve("https://cdn.example.test/a.png"), "https://cdn.example.test/a.png");
    assert_eq!(cfg.resolve("HTTP://other.test/x"), "HTTP://other.test/x");
}

#[test]
fn is_absolute_url_rejects_relative_and_other_schemes() {
    assert!(!is_absolute_url("/api/x"));
    assert!(!is_absolute_url("ftp://x"));
    assert!(!is_absolute_url("http"));
    assert!(is_absolute_url("https://x"));
}

#[test]
fn oauth_urls_use_base() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.kakao_login_url(), "http://localhost:8080/api/oauth2/authorization/kakao");
    assert_eq!(cfg.naver_login_url(), "http://localhost:8080/api/oauth2/authorization/naver");
}
