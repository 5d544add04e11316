mod helpers;

use bili_duration::upstream::{BackendClient, BilibiliClient, PartsProvider};
use bili_duration::{create_provider, DomainError, UpstreamError};
use helpers::{config_for, dead_base_url, pagelist_body, parts, StubServer};
use tokio_test::{assert_err, assert_ok};

const BVID: &str = "BV1xx411c7mD";

#[tokio::test]
async fn test_bilibili_client_fetches_parts() {
    let server = StubServer::json(200, &pagelist_body(&[120, 300, 180])).await;
    let client = BilibiliClient::new(&config_for(&server.base_url).upstream).unwrap();

    let fetched = assert_ok!(client.fetch_parts(BVID).await);
    assert_eq!(fetched, parts(&[120, 300, 180]));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("get /x/player/pagelist?bvid=bv1xx411c7md "));
    assert!(requests[0].contains("referer: https://www.bilibili.com/video/bv1xx411c7md"));
    assert!(requests[0].contains("user-agent: mozilla/5.0"));
}

#[tokio::test]
async fn test_bilibili_client_status_error() {
    let server = StubServer::text(412, "request was banned").await;
    let client = BilibiliClient::new(&config_for(&server.base_url).upstream).unwrap();

    let err = assert_err!(client.fetch_parts(BVID).await);
    assert_eq!(
        err,
        DomainError::Upstream(UpstreamError::Status {
            status: 412,
            message: "request was banned".to_string()
        })
    );
}

#[tokio::test]
async fn test_bilibili_client_api_code_error() {
    let server = StubServer::json(200, r#"{"code":-404,"message":"啥都木有","ttl":1}"#).await;
    let client = BilibiliClient::new(&config_for(&server.base_url).upstream).unwrap();

    let err = assert_err!(client.fetch_parts(BVID).await);
    assert_eq!(
        err,
        DomainError::Upstream(UpstreamError::Api {
            code: -404,
            message: "啥都木有".to_string()
        })
    );
}

#[tokio::test]
async fn test_bilibili_client_empty_list() {
    let server = StubServer::json(200, &pagelist_body(&[])).await;
    let client = BilibiliClient::new(&config_for(&server.base_url).upstream).unwrap();

    let err = assert_err!(client.fetch_parts(BVID).await);
    assert!(matches!(err, DomainError::EmptyResult { .. }));
}

#[tokio::test]
async fn test_bilibili_client_unreachable() {
    let client = BilibiliClient::new(&config_for(&dead_base_url().await).upstream).unwrap();

    let err = assert_err!(client.fetch_parts(BVID).await);
    assert!(matches!(err, DomainError::Upstream(UpstreamError::Transport(_))));
}

#[tokio::test]
async fn test_backend_client_round_trip() {
    let body = serde_json::json!({ "parts": parts(&[60, 90]) }).to_string();
    let server = StubServer::json(200, &body).await;
    let client = BackendClient::new(&server.base_url, &config_for("https://api.bilibili.com").upstream).unwrap();

    let fetched = assert_ok!(client.fetch_parts(BVID).await);
    assert_eq!(fetched, parts(&[60, 90]));
    assert!(server.requests()[0].starts_with("get /bilibili-parts?url=bv1xx411c7md "));
}

#[tokio::test]
async fn test_backend_client_not_found() {
    let server = StubServer::text(404, "no parts for this video\n").await;
    let client = BackendClient::new(&server.base_url, &config_for("https://api.bilibili.com").upstream).unwrap();

    let err = assert_err!(client.fetch_parts(BVID).await);
    assert_eq!(err, DomainError::EmptyResult { bvid: Some(BVID.to_string()) });
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_create_provider_prefers_backend() {
    let mut config = config_for("https://api.bilibili.com");
    assert_eq!(create_provider(&config).unwrap().name(), "bilibili");

    config.upstream.backend_url = Some("http://localhost:2323".to_string());
    assert_eq!(create_provider(&config).unwrap().name(), "backend");
}
