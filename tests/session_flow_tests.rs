mod helpers;

use std::time::Duration;

use bili_duration::render::render;
use bili_duration::upstream::BilibiliClient;
use bili_duration::{
    extract_identifier, format_duration, ClickOutcome, DomainError, Field, Focus, RangeViolation,
    Session,
};
use helpers::{config_for, pagelist_body, StubServer};
use std::sync::Arc;

async fn loaded_session(durations: &[u64]) -> (Session, StubServer) {
    let server = StubServer::json(200, &pagelist_body(durations)).await;
    let config = config_for(&server.base_url);
    let provider = Arc::new(BilibiliClient::new(&config.upstream).unwrap());
    let session = Session::new(provider, &config.session);

    session
        .search("https://www.bilibili.com/video/BV1xxxxxxxxx/?p=2")
        .await
        .unwrap();
    (session, server)
}

#[test]
fn test_identifier_from_shared_link() {
    assert_eq!(
        extract_identifier("https://www.bilibili.com/video/BV1xxxxxxxxx/?p=2").as_deref(),
        Some("BV1xxxxxxxxx")
    );
}

#[tokio::test]
async fn test_three_parts_at_double_speed() {
    let (session, _server) = loaded_session(&[120, 300, 180]).await;

    session.on_speed_change("2.0");
    session.on_blur(Field::Speed);

    let snap = session.snapshot();
    assert_eq!((snap.from, snap.to), (1, 3));
    assert_eq!(snap.total_duration, 600);
    assert_eq!(snap.adjusted_total_duration, 300.0);
    assert_eq!(format_duration(snap.total_duration as f64), "10:00");
    assert_eq!(format_duration(snap.adjusted_total_duration), "5:00");

    let text = render(&snap);
    assert!(text.contains("Total (P1-P3): 10:00"));
    assert!(text.contains("Adjusted (2x): 5:00"));
}

#[tokio::test]
async fn test_to_never_drops_below_from() {
    let (session, _server) = loaded_session(&[10, 20, 30, 40, 50]).await;

    session.on_from_change("3");
    session.on_blur(Field::From);
    session.on_to_change("0");
    session.on_blur(Field::To);

    let snap = session.snapshot();
    assert_eq!((snap.from, snap.to), (3, 3));
    assert_eq!(snap.total_duration, 30);
}

#[tokio::test]
async fn test_from_focus_click_past_end_is_rejected() {
    let (session, _server) = loaded_session(&[10, 20, 30, 40, 50]).await;
    session.on_to_change("3");
    session.on_blur(Field::To);

    session.on_focus(Field::From);
    let err = session.on_part_click(4).unwrap_err();

    assert_eq!(err, DomainError::RangeConstraint(RangeViolation::StartAfterEnd));
    let snap = session.snapshot();
    assert_eq!(snap.from, 1);
    assert_eq!(snap.toast_message.as_deref(), Some("start cannot exceed end"));
}

#[tokio::test]
async fn test_click_gesture_then_new_search_resets_window() {
    let (session, server) = loaded_session(&[60, 60, 60, 60]).await;

    assert_eq!(session.on_part_click(1).unwrap(), ClickOutcome::Started(2));
    assert_eq!(
        session.on_part_click(2).unwrap(),
        ClickOutcome::Extended { from: 2, to: 3 }
    );
    assert_eq!(session.snapshot().total_duration, 120);

    session.search("BV1xxxxxxxxx").await.unwrap();
    let snap = session.snapshot();
    assert_eq!((snap.from, snap.to), (1, 4));
    assert_eq!(snap.total_duration, 240);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_failed_search_keeps_session_usable() {
    let (session, _server) = loaded_session(&[60, 60]).await;

    let err = session.search("no identifier here").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let snap = session.snapshot();
    assert!(snap.parts.is_empty());
    assert_eq!((snap.from, snap.to), (1, 1));
    assert!(render(&snap).starts_with("Error: invalid input"));

    session.search("BV1xxxxxxxxx").await.unwrap();
    assert!(session.snapshot().error_message.is_none());
}

#[tokio::test]
async fn test_focus_drops_after_grace_delay() {
    let (session, _server) = loaded_session(&[60, 60, 60]).await;
    tokio::time::pause();

    session.on_focus(Field::To);
    session.on_blur(Field::To);
    assert_eq!(session.snapshot().focus, Focus::To);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.snapshot().focus, Focus::None);
}
