//! Tests for PublicDriveClient with mocked HTTP responses.

use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use drive_fetch::error::DriveError;
use drive_fetch::models::{DownloadStatus, FileCategory, FileEntry};
use drive_fetch::{FolderLister, PublicDriveClient};

fn listing_html(entries: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><div class=\"listing\">");
    for (id, name) in entries {
        html.push_str(&format!(
            "<div data-id=\"{}\"><span data-tooltip=\"{}\">{}</span></div>",
            id, name, name
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn client_for(server: &ServerGuard, dir: &TempDir) -> PublicDriveClient {
    PublicDriveClient::with_base_url(&server.url(), dir.path()).unwrap()
}

async fn mock_download(server: &mut ServerGuard, file_id: &str, status: usize, body: &[u8]) {
    server
        .mock("GET", "/uc")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("export".into(), "download".into()),
            Matcher::UrlEncoded("id".into(), file_id.into()),
        ]))
        .with_status(status)
        .with_body(body)
        .create_async()
        .await;
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_files_in_page_order() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/ABC123")
            .with_status(200)
            .with_body(listing_html(&[("id1", "report.pdf"), ("id2", "notes.txt")]))
            .create_async()
            .await;

        let client = client_for(&server, &dir);
        let files = client.list_files("ABC123").await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "id1");
        assert_eq!(files[0].name, "report.pdf");
        assert_eq!(files[0].category, FileCategory::Pdf);
        assert_eq!(files[0].view_url, format!("{}/file/d/id1/view", server.url()));
        assert_eq!(files[1].id, "id2");
        assert_eq!(files[1].category, FileCategory::Text);
    }

    #[tokio::test]
    async fn listing_is_reachable_through_the_lister_trait() {
        async fn list_with<L: FolderLister>(
            lister: &L,
            folder_id: &str,
        ) -> drive_fetch::Result<Vec<FileEntry>> {
            lister.list_folder(folder_id).await
        }

        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/TRAIT")
            .with_status(200)
            .with_body(listing_html(&[("id9", "data.csv")]))
            .create_async()
            .await;

        let client = client_for(&server, &dir);
        let files = list_with(&client, "TRAIT").await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].category, FileCategory::Csv);
    }

    #[tokio::test]
    async fn empty_page_yields_empty_list() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/EMPTY")
            .with_status(200)
            .with_body("<html><body>This folder is empty</body></html>")
            .create_async()
            .await;

        let client = client_for(&server, &dir);
        let files = client.list_files("EMPTY").await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn http_failure_is_an_error_not_an_empty_list() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/BROKEN")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server, &dir);
        match client.list_files("BROKEN").await {
            Err(DriveError::ApiError { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn token_mismatch_fails_loudly() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        // Two ids but only one tooltip
        let html = r#"<div data-id="id1"></div><div data-id="id2"></div><span data-tooltip="x.txt"></span>"#;
        server
            .mock("GET", "/drive/folders/SKEWED")
            .with_status(200)
            .with_body(html)
            .create_async()
            .await;

        let client = client_for(&server, &dir);
        match client.list_files("SKEWED").await {
            Err(DriveError::ListingMismatch { ids, names }) => {
                assert_eq!(ids, 2);
                assert_eq!(names, 1);
            }
            other => panic!("expected ListingMismatch, got {:?}", other),
        }
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn download_records_exact_byte_count() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        let body = vec![0xABu8; 2048];
        mock_download(&mut server, "id1", 200, &body).await;

        let client = client_for(&server, &dir);
        let downloaded = client.download_file("id1", "report.pdf").await.unwrap();

        assert_eq!(downloaded.size_bytes, 2048);
        assert_eq!(downloaded.path, dir.path().join("report.pdf"));
        assert_eq!(std::fs::read(&downloaded.path).unwrap(), body);
    }

    #[tokio::test]
    async fn http_404_fails_with_status() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        mock_download(&mut server, "missing", 404, b"").await;

        let client = client_for(&server, &dir);
        match client.download_file("missing", "gone.txt").await {
            Err(DriveError::ApiError { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected ApiError, got {:?}", other),
        }
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[tokio::test]
    async fn unsafe_names_rejected_before_any_request() {
        let dir = TempDir::new().unwrap();
        // Unroutable base; sanitization must fail before the request is sent
        let client = PublicDriveClient::with_base_url("http://127.0.0.1:1", dir.path()).unwrap();

        for name in ["../evil.sh", "a/b.txt", "a\\b.txt", "..", ""] {
            match client.download_file("id1", name).await {
                Err(DriveError::UnsafeFileName(n)) => assert_eq!(n, name),
                other => panic!("expected UnsafeFileName for {:?}, got {:?}", name, other),
            }
        }
    }
}

mod process_folder {
    use super::*;

    #[tokio::test]
    async fn end_to_end_two_successful_downloads() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/ABC123")
            .with_status(200)
            .with_body(listing_html(&[("id1", "report.pdf"), ("id2", "notes.txt")]))
            .create_async()
            .await;
        mock_download(&mut server, "id1", 200, &vec![1u8; 2048]).await;
        mock_download(&mut server, "id2", 200, &vec![2u8; 100]).await;

        let client = client_for(&server, &dir);
        let url = format!("{}/drive/folders/ABC123", server.url());
        let summary = client.process_folder(&url).await.unwrap();

        assert_eq!(summary.folder_id, "ABC123");
        assert_eq!(summary.folder_url, url);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.successful_downloads, 2);
        assert_eq!(summary.failed_downloads, 0);

        match &summary.files[0].status {
            DownloadStatus::Success { file_size_bytes, file_size_mb, .. } => {
                assert_eq!(*file_size_bytes, 2048);
                assert_eq!(*file_size_mb, 0.0);
            }
            other => panic!("expected success, got {:?}", other),
        }

        let report = summary.to_string();
        assert!(report.contains("✓ report.pdf (0.00 MB)"));
        assert!(report.contains("✓ notes.txt"));
        assert!(report.contains("Successful Downloads: 2"));

        // Second run overwrites in place, no duplicates or versions
        let again = client.process_folder(&url).await.unwrap();
        assert_eq!(again.successful_downloads, 2);
        assert_eq!(std::fs::read(dir.path().join("report.pdf")).unwrap(), vec![1u8; 2048]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn failed_download_does_not_abort_remaining() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/drive/folders/MIXED")
            .with_status(200)
            .with_body(listing_html(&[("bad", "gone.pdf"), ("good", "kept.txt")]))
            .create_async()
            .await;
        mock_download(&mut server, "bad", 404, b"").await;
        mock_download(&mut server, "good", 200, b"hello").await;

        let client = client_for(&server, &dir);
        let url = format!("{}/drive/folders/MIXED", server.url());
        let summary = client.process_folder(&url).await.unwrap();

        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.successful_downloads, 1);
        assert_eq!(summary.failed_downloads, 1);

        match &summary.files[0].status {
            DownloadStatus::Failed { error } => assert!(error.contains("404"), "{}", error),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(summary.files[1].is_success());
        assert_eq!(std::fs::read(dir.path().join("kept.txt")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn invalid_url_aborts_before_listing() {
        let dir = TempDir::new().unwrap();
        let client = PublicDriveClient::with_base_url("http://127.0.0.1:1", dir.path()).unwrap();

        match client.process_folder("https://example.com/nothing-here").await {
            Err(DriveError::InvalidUrlOrId(_)) => {}
            other => panic!("expected InvalidUrlOrId, got {:?}", other),
        }
    }
}
