use archivist_client::{PageSource, Session};
use archivist_core::{ArchiveError, ClientConfig};
use std::sync::Arc;

#[tokio::test]
async fn fetch_after_close_fails_with_session_closed() {
    let session = Session::new(&ClientConfig::default()).expect("build session");
    session.close().await;

    let err = session.fetch("/works/1", None).await.unwrap_err();
    assert!(matches!(err, ArchiveError::SessionClosed));

    let err = session.post("/works/1", &[("k", "v")]).await.unwrap_err();
    assert!(matches!(err, ArchiveError::SessionClosed));

    // closing twice is a no-op
    session.close().await;
}

#[tokio::test]
async fn session_rejects_invalid_configuration() {
    let mut config = ClientConfig::default();
    config.network.base_url = "archiveofourown.org".to_string();

    let err = Session::new(&config).unwrap_err();
    assert!(matches!(err, ArchiveError::Config(_)));
}

#[tokio::test]
async fn session_is_usable_as_a_shared_page_source() {
    let session = Session::new(&ClientConfig::default()).expect("build session");
    assert!(!session.is_authenticated());

    // entities take the session as a trait object behind an Arc
    let source: Arc<dyn PageSource> = Arc::new(session);
    let _clone = Arc::clone(&source);
}
