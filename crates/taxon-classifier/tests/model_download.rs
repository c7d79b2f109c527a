// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model download tests against a local mock server.

use taxon_classifier::ModelManager;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_files() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model.onnx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 2048]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tokenizer.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"version\":\"1.0\"}"))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn downloads_missing_files_once() {
    let server = server_with_files().await;
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(
        dir.path().to_path_buf(),
        "test-model",
        format!("{}/model.onnx", server.uri()),
        format!("{}/tokenizer.json", server.uri()),
    );

    assert!(!manager.is_model_available());
    let model_path = manager.ensure_model().await.unwrap();
    assert_eq!(model_path, manager.model_path());
    assert!(manager.is_model_available());
    assert_eq!(std::fs::read(&model_path).unwrap().len(), 2048);

    // Second call is served from the cache; `expect(1)` verifies on drop.
    manager.ensure_model().await.unwrap();
}

#[tokio::test]
async fn existing_files_are_not_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(
        dir.path().to_path_buf(),
        "cached",
        format!("{}/model.onnx", server.uri()),
        format!("{}/tokenizer.json", server.uri()),
    );
    std::fs::create_dir_all(manager.model_dir()).unwrap();
    std::fs::write(manager.model_path(), b"onnx").unwrap();
    std::fs::write(manager.tokenizer_path(), b"{}").unwrap();

    manager.ensure_model().await.unwrap();
}

#[tokio::test]
async fn failed_download_leaves_no_partial_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model.onnx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(
        dir.path().to_path_buf(),
        "missing",
        format!("{}/model.onnx", server.uri()),
        format!("{}/tokenizer.json", server.uri()),
    );

    let err = manager.ensure_model().await.unwrap_err();
    assert!(err.is_classifier());
    assert!(!manager.model_path().exists());
    assert!(!manager.model_dir().join("model.part").exists());
}
