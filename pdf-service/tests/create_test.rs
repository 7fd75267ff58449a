mod common;

use common::TestApp;
use lopdf::Document;
use std::collections::HashSet;

#[tokio::test]
async fn create_returns_unique_ids() {
    let app = TestApp::spawn().await;

    let mut ids = HashSet::new();
    for _ in 0..5 {
        ids.insert(app.create_pdf().await);
    }
    assert_eq!(5, ids.len());

    app.cleanup().await;
}

#[tokio::test]
async fn created_document_is_a_valid_single_page_pdf() {
    let app = TestApp::spawn().await;

    let id = app.create_pdf().await;
    let response = app.fetch_pdf(&id).await;
    assert!(response.status().is_success());

    let bytes = response.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&bytes).expect("Fetched bytes are not a valid PDF");
    assert_eq!(1, doc.get_pages().len());

    app.cleanup().await;
}

#[tokio::test]
async fn create_does_not_disturb_existing_documents() {
    let app = TestApp::spawn().await;

    // First create sets up the storage root; keep its bytes around.
    let first = app.create_pdf().await;
    let before = app
        .fetch_pdf(&first)
        .await
        .bytes()
        .await
        .expect("Failed to read body");

    // Creating into the now-existing root must succeed and leave the first
    // document untouched.
    let second = app.create_pdf().await;
    assert_ne!(first, second);

    let after = app
        .fetch_pdf(&first)
        .await
        .bytes()
        .await
        .expect("Failed to read body");
    assert_eq!(before, after);

    app.cleanup().await;
}
