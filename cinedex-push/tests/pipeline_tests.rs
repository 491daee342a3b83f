//! End-to-end tests of the push workflows against a mock platform.

mod common;

use std::fs;

use cinedex_push::{BatchPolicy, BatchStatus, PushError, PushPipeline, decode_payload};
use common::{Behavior, Call, MockPlatform};
use serde_json::json;

fn policy(size: usize) -> BatchPolicy {
    BatchPolicy::builder().batch_size(size).build().unwrap()
}

fn write_fields(dir: &tempfile::TempDir, count: usize) -> std::path::PathBuf {
    let fields: Vec<_> = (0..count)
        .map(|i| json!({ "name": format!("field{i}"), "type": "STRING", "facet": i % 2 == 0 }))
        .collect();
    let path = dir.path().join("fields.json");
    fs::write(&path, serde_json::to_string(&fields).unwrap()).unwrap();
    path
}

fn write_docs(dir: &tempfile::TempDir, count: usize) -> std::path::PathBuf {
    let lines: Vec<String> = (0..count)
        .map(|i| {
            json!({
                "documentId": format!("https://www.imdb.com/title/tt{i:07}/"),
                "title": format!("Movie {i}"),
                "rating": 8.1,
                "data": format!("plot of movie {i}")
            })
            .to_string()
        })
        .collect();
    let path = dir.path().join("docs.jsonl");
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[tokio::test]
async fn six_hundred_fields_are_created_in_three_calls() {
    let mock = MockPlatform::spawn(Behavior::default()).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fields(&dir, 600);

    let pipeline = PushPipeline::new(&config).unwrap();
    let report = pipeline.add_fields_from_file(&path, BatchPolicy::fields()).await.unwrap();

    assert!(report.is_success());
    let counts: Vec<usize> = mock
        .calls()
        .into_iter()
        .map(|c| match c {
            Call::Fields { count, authorization } => {
                assert_eq!(authorization.as_deref(), Some("Bearer test-token"));
                count
            }
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(counts, vec![250, 250, 100]);
}

#[tokio::test]
async fn failed_field_batch_is_reported_and_the_rest_continue() {
    let mock = MockPlatform::spawn(Behavior { failing_field_batch: Some(0), ..Behavior::default() })
        .await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fields(&dir, 5);

    let pipeline = PushPipeline::new(&config).unwrap();
    let report = pipeline.add_fields_from_file(&path, policy(2)).await.unwrap();

    assert_eq!(mock.calls().len(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.submitted(), 2);
    match &report.batches[0].status {
        BatchStatus::Failed(msg) => assert!(msg.contains("already exists"), "{msg}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn each_batch_stages_uploads_and_pushes_in_order() {
    let mock = MockPlatform::spawn(Behavior::default()).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_docs(&dir, 7);

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, policy(3)).await.unwrap();

    assert!(summary.rejected.is_empty());
    assert!(summary.report.is_success());
    assert_eq!(summary.report.batches.len(), 3);

    let calls = mock.calls();
    assert_eq!(calls.len(), 9);
    for (batch, window) in calls.chunks(3).enumerate() {
        let n = batch * 3 + 1;
        assert_eq!(window[0], Call::Files);
        match &window[1] {
            Call::Upload { path, authorized, encryption, body } => {
                assert_eq!(path, &format!("/upload/{n}"));
                assert!(!authorized, "bearer token must not reach the staging location");
                assert_eq!(encryption.as_deref(), Some("AES256"));
                let docs = body["addOrUpdate"].as_array().unwrap();
                assert_eq!(docs.len(), if batch == 2 { 1 } else { 3 });
                let first = &docs[0];
                assert!(first.get("data").is_none());
                assert_eq!(first["compressionType"], json!("ZLIB"));
                let text = decode_payload(first["compressedBinaryData"].as_str().unwrap()).unwrap();
                assert_eq!(text, format!("plot of movie {}", batch * 3));
            }
            other => panic!("expected upload, got {other:?}"),
        }
        assert_eq!(
            window[2],
            Call::Push { source_id: "src-1".into(), file_id: format!("file-{n}") }
        );
    }
}

#[tokio::test]
async fn failed_upload_skips_the_ingest_call() {
    let mock = MockPlatform::spawn(Behavior { upload_status: 403, ..Behavior::default() }).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_docs(&dir, 2);

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, BatchPolicy::documents()).await.unwrap();

    assert_eq!(summary.report.failed(), 1);
    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Files);
    assert!(matches!(calls[1], Call::Upload { .. }));
    assert!(!calls.iter().any(|c| matches!(c, Call::Push { .. })));
}

#[tokio::test]
async fn staging_response_without_file_id_fails_the_batch() {
    let mock = MockPlatform::spawn(Behavior { omit_file_id: true, ..Behavior::default() }).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_docs(&dir, 1);

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, BatchPolicy::documents()).await.unwrap();

    assert_eq!(mock.calls(), vec![Call::Files]);
    match &summary.report.batches[0].status {
        BatchStatus::Failed(msg) => assert!(msg.contains("fileId"), "{msg}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

/// Push two single-document batches and check that the first failed with
/// `needle` in its message while the second still went through all three steps.
async fn first_batch_fails_and_second_completes(behavior: Behavior, needle: &str) -> Vec<Call> {
    let mock = MockPlatform::spawn(behavior).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_docs(&dir, 2);

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, policy(1)).await.unwrap();

    assert_eq!(summary.report.failed(), 1);
    assert_eq!(summary.report.submitted(), 1);
    match &summary.report.batches[0].status {
        BatchStatus::Failed(msg) => assert!(msg.contains(needle), "{msg}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(summary.report.batches[1].status, BatchStatus::Submitted);

    let calls = mock.calls();
    let tail = &calls[calls.len() - 3..];
    assert_eq!(tail[0], Call::Files);
    assert!(matches!(tail[1], Call::Upload { .. }));
    assert!(matches!(tail[2], Call::Push { .. }));
    calls
}

#[tokio::test]
async fn staging_error_status_ends_the_batch_before_upload() {
    let calls = first_batch_fails_and_second_completes(
        Behavior { failing_files_call: Some(0), ..Behavior::default() },
        "staging unavailable",
    )
    .await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Files);
}

#[tokio::test]
async fn staging_response_without_upload_uri_ends_the_batch() {
    let calls = first_batch_fails_and_second_completes(
        Behavior { omit_upload_uri_on: Some(0), ..Behavior::default() },
        "uploadUri",
    )
    .await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Files);
}

#[tokio::test]
async fn staging_response_without_required_headers_ends_the_batch() {
    let calls = first_batch_fails_and_second_completes(
        Behavior { omit_required_headers_on: Some(0), ..Behavior::default() },
        "requiredHeaders",
    )
    .await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Files);
}

#[tokio::test]
async fn ingest_error_status_fails_the_batch_and_the_next_one_runs() {
    let calls = first_batch_fails_and_second_completes(
        Behavior { failing_push_call: Some(0), ..Behavior::default() },
        "source is rebuilding",
    )
    .await;
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0], Call::Files);
    assert!(matches!(calls[1], Call::Upload { .. }));
    assert!(matches!(calls[2], Call::Push { .. }));
}

#[tokio::test]
async fn empty_document_file_makes_no_remote_calls() {
    let mock = MockPlatform::spawn(Behavior::default()).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.jsonl");
    fs::write(&path, "").unwrap();

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, BatchPolicy::documents()).await.unwrap();

    assert!(summary.report.batches.is_empty());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn rejected_records_never_reach_the_platform() {
    let mock = MockPlatform::spawn(Behavior::default()).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.jsonl");
    fs::write(&path, "{\"documentId\":\"\",\"data\":\"x\"}\n").unwrap();

    let pipeline = PushPipeline::new(&config).unwrap();
    let summary = pipeline.push_documents_from_file(&path, BatchPolicy::documents()).await.unwrap();

    assert_eq!(summary.rejected.len(), 1);
    assert!(matches!(summary.rejected[0], PushError::Encode(_)));
    assert!(mock.calls().is_empty());
}

fn write_tsv(dir: &tempfile::TempDir, rows: usize) -> std::path::PathBuf {
    let mut content = String::from("uri\ttitle\n");
    for i in 0..rows {
        content.push_str(&format!("file://dummyfiles/{i}\tDoc {i}\n"));
    }
    let path = dir.path().join("test_documents.tsv");
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_query_reports_equal_counts() {
    let mock = MockPlatform::spawn(Behavior { total_count: 10, ..Behavior::default() }).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_tsv(&dir, 10);

    let pipeline = PushPipeline::new(&config).unwrap();
    let check = pipeline.test_query(&path, cinedex_push::DEFAULT_TEST_QUERY).await.unwrap();

    assert!(check.matches());
    assert_eq!(check.to_string(), "Expected 10, found 10 matching documents.");
    assert_eq!(
        mock.calls(),
        vec![Call::Search { organization_id: "org-1".into(), query: "@uri=\"*dummyfiles*\"".into() }]
    );
}

#[tokio::test]
async fn test_query_reports_mismatch_with_both_numbers() {
    let mock = MockPlatform::spawn(Behavior { total_count: 9, ..Behavior::default() }).await;
    let config = mock.config();
    let dir = tempfile::tempdir().unwrap();
    let path = write_tsv(&dir, 10);

    let pipeline = PushPipeline::new(&config).unwrap();
    let check = pipeline.test_query(&path, cinedex_push::DEFAULT_TEST_QUERY).await.unwrap();

    assert!(!check.matches());
    let rendered = check.to_string();
    assert!(rendered.contains("Expected 10"));
    assert!(rendered.contains("found 9"));
}
