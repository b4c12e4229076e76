//! Integration tests for the full extraction pipeline.
//!
//! HTTP behaviour (redirects, status handling) runs against a local mockito
//! server. PDF parsing is replaced by a fixed-text extractor so the
//! segmentation results are deterministic; the default extractor is only
//! exercised on its rejection path.

use edgequake_pdf2tasks::pipeline::input::fetch_url;
use edgequake_pdf2tasks::{
    extract_tasks, extract_tasks_from_text, extract_tasks_sync, extract_tasks_to_file,
    write_tasks, ErrorKind, ExtractionConfig, OutputFormat, Pdf2TasksError, TaskRecord,
    TextExtractor,
};
use mockito::Server;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

const TEXTBOOK: &str = "\
Алгебра 7 клас
Розділ 1. Лінійні рівняння

Вправа 1
Розв'яжіть рівняння:
2x + 3 = 7.
Вправа 2
Спростіть \"вираз\".
\x0C
Теорія без вправ.
\x0C
§ 2. Повторення
1) Обчисліть суму.
2 і 2.
2) Обчисліть добуток.
№ 145 Доведіть тотожність.
";

struct FixedText(&'static str);

impl TextExtractor for FixedText {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, Pdf2TasksError> {
        Ok(self.0.to_string())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn fixed_config() -> ExtractionConfig {
    ExtractionConfig::builder()
        .extractor(Arc::new(FixedText(TEXTBOOK)))
        .build()
        .expect("valid config")
}

/// Read a CSV document with a standard reader; returns (header, rows).
fn read_csv(csv: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv.as_bytes());
    let header = reader
        .headers()
        .expect("header row")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("well-formed row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

// ── Fetcher ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn follows_relative_and_absolute_redirects() {
    init_tracing();
    let mut server = Server::new_async().await;
    let url = server.url();

    let first = server
        .mock("GET", "/book")
        .with_status(302)
        .with_header("location", "/mirror/book.pdf")
        .create_async()
        .await;
    let second = server
        .mock("GET", "/mirror/book.pdf")
        .with_status(301)
        .with_header("location", &format!("{url}/final.pdf"))
        .create_async()
        .await;
    let last = server
        .mock("GET", "/final.pdf")
        .with_status(200)
        .with_body("%PDF-1.7 body")
        .create_async()
        .await;

    let bytes = fetch_url(&format!("{url}/book"), &ExtractionConfig::default())
        .await
        .expect("download should succeed");

    assert_eq!(bytes, b"%PDF-1.7 body");
    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
}

#[tokio::test]
async fn redirect_loop_stops_at_limit() {
    let mut server = Server::new_async().await;
    let url = server.url();

    // The initial request plus three followed hops.
    let looping = server
        .mock("GET", "/loop")
        .with_status(307)
        .with_header("location", "/loop")
        .expect(4)
        .create_async()
        .await;

    let config = ExtractionConfig::builder().max_redirects(3).build().unwrap();
    let err = fetch_url(&format!("{url}/loop"), &config).await.unwrap_err();

    match err {
        Pdf2TasksError::TooManyRedirects { limit, .. } => assert_eq!(limit, 3),
        other => panic!("unexpected error: {other:?}"),
    }
    looping.assert_async().await;
}

#[tokio::test]
async fn non_200_terminal_status_is_a_download_error() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/moved")
        .with_status(302)
        .with_header("location", "/gone.pdf")
        .create_async()
        .await;
    server
        .mock("GET", "/gone.pdf")
        .with_status(404)
        .create_async()
        .await;

    let err = fetch_url(&format!("{url}/moved"), &ExtractionConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Download);
    match err {
        Pdf2TasksError::DownloadFailed { url: failed, status } => {
            assert_eq!(status, 404);
            assert!(failed.ends_with("/gone.pdf"), "got: {failed}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn redirect_without_location_is_terminal() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/odd")
        .with_status(304)
        .create_async()
        .await;

    let err = fetch_url(&format!("{url}/odd"), &ExtractionConfig::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, Pdf2TasksError::DownloadFailed { status: 304, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn other_success_codes_are_rejected() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/partial.pdf")
        .with_status(206)
        .with_body("%PDF")
        .create_async()
        .await;

    let err = fetch_url(&format!("{url}/partial.pdf"), &ExtractionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2TasksError::DownloadFailed { status: 206, .. }));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = fetch_url(
        &format!("http://127.0.0.1:{port}/book.pdf"),
        &ExtractionConfig::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(matches!(err, Pdf2TasksError::Network { .. }), "got: {err:?}");
}

#[tokio::test]
async fn silent_server_hits_download_timeout() {
    // The kernel completes the handshake from the backlog; nothing ever answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = ExtractionConfig::builder()
        .download_timeout_secs(1)
        .build()
        .unwrap();
    let err = fetch_url(&format!("http://127.0.0.1:{port}/slow.pdf"), &config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    match err {
        Pdf2TasksError::DownloadTimeout { secs, url } => {
            assert_eq!(secs, 1);
            assert!(url.ends_with("/slow.pdf"), "got: {url}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    drop(listener);
}

#[tokio::test]
async fn unusable_location_is_an_invalid_redirect() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/book")
        .with_status(302)
        .with_header("location", "http://[broken/book.pdf")
        .create_async()
        .await;

    let err = fetch_url(&format!("{url}/book"), &ExtractionConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Download);
    match err {
        Pdf2TasksError::InvalidRedirect { url: from, location } => {
            assert!(from.ends_with("/book"), "got: {from}");
            assert_eq!(location, "http://[broken/book.pdf");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Full pipeline ────────────────────────────────────────────────────────────

#[tokio::test]
async fn downloads_and_segments_textbook() {
    init_tracing();
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/algebra.pdf")
        .with_status(200)
        .with_body("%PDF-1.4 stub")
        .create_async()
        .await;

    let output = extract_tasks(format!("{url}/algebra.pdf"), &fixed_config())
        .await
        .expect("extraction should succeed");

    let summary: Vec<(usize, usize, Option<&str>)> = output
        .tasks
        .iter()
        .map(|t| (t.page, t.index, t.id.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, 1, Some("1")),
            (1, 2, Some("2")),
            (3, 1, Some("1")),
            (3, 2, Some("2")),
            (3, 3, Some("145")),
        ]
    );
    assert_eq!(
        output.tasks[0].text,
        "Вправа 1\nРозв'яжіть рівняння:\n2x + 3 = 7."
    );
    assert_eq!(output.tasks[2].text, "1) Обчисліть суму.\n2 і 2.");

    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.pages_with_tasks, 2);
    assert_eq!(output.stats.total_tasks, 5);
    assert_eq!(output.stats.document_bytes, "%PDF-1.4 stub".len());
}

#[tokio::test]
async fn default_extractor_rejects_html_error_page() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/book.pdf")
        .with_status(200)
        .with_body("<!DOCTYPE html><p>Maintenance</p>")
        .create_async()
        .await;

    let err = extract_tasks(format!("{url}/book.pdf"), &ExtractionConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Extraction);
}

#[tokio::test]
async fn writes_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();
    let out = dir.path().join("out/tasks.json");

    let stats = extract_tasks_to_file(
        pdf.to_str().unwrap(),
        &out,
        OutputFormat::from_path(&out),
        &fixed_config(),
    )
    .await
    .unwrap();
    assert_eq!(stats.total_tasks, 5);

    let json = std::fs::read_to_string(&out).unwrap();
    assert!(json.starts_with("[\n  {\n    \"page\": 1,\n    \"index\": 1,\n    \"id\": \"1\","));
    let parsed: Vec<TaskRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 5);
    assert_eq!(parsed[4].text, "№ 145 Доведіть тотожність.");
}

#[tokio::test]
async fn csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();
    let out = dir.path().join("tasks.csv");

    extract_tasks_to_file(pdf.to_str().unwrap(), &out, OutputFormat::Csv, &fixed_config())
        .await
        .unwrap();
    let expected = extract_tasks_from_text(TEXTBOOK, &ExtractionConfig::default())
        .unwrap()
        .tasks;

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(!csv.contains('\r'));
    assert!(!csv.ends_with('\n'));

    let (header, rows) = read_csv(&csv);
    assert_eq!(header, vec!["page", "index", "id", "text"]);
    assert_eq!(rows.len(), expected.len());
    for (row, task) in rows.iter().zip(&expected) {
        assert_eq!(row[0], task.page.to_string());
        assert_eq!(row[1], task.index.to_string());
        assert_eq!(row[2], task.id.clone().unwrap_or_default());
        assert_eq!(row[3], task.text.replace('\n', " "));
    }
    // Embedded quotes survive the trip.
    assert_eq!(rows[1][3], "Вправа 2 Спростіть \"вираз\".");
}

#[tokio::test]
async fn csv_text_with_commas_and_crlf_stays_one_field() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tasks.csv");
    let tasks = vec![
        TaskRecord {
            page: 4,
            index: 1,
            id: Some("12".into()),
            text: "Вправа 12\r\nОбчисліть 1, 2, 3\r\nі \"4\", 5.".into(),
        },
        TaskRecord {
            page: 4,
            index: 2,
            id: None,
            text: "a,b\nc".into(),
        },
    ];

    write_tasks(&tasks, &out, OutputFormat::Csv).await.unwrap();

    let (_, rows) = read_csv(&std::fs::read_to_string(&out).unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["4", "1", "12", "Вправа 12 Обчисліть 1, 2, 3 і \"4\", 5."],
            vec!["4", "2", "", "a,b c"],
        ]
    );
}

#[test]
fn sync_wrapper_reads_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();

    let output = extract_tasks_sync(pdf.to_str().unwrap(), &fixed_config()).unwrap();
    assert_eq!(output.tasks.len(), 5);
}

#[test]
fn custom_keywords_replace_defaults() {
    let config = ExtractionConfig::builder()
        .keywords(["Exercise"])
        .build()
        .unwrap();
    let text = "Intro\nExercise 3\nSolve it.\nВправа 4\n\n\nEXERCISE\nProve it.";
    let output = extract_tasks_from_text(text, &config).unwrap();

    let ids: Vec<_> = output.tasks.iter().map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("3"), Some("EXERCISE")]);
    assert_eq!(output.tasks[0].text, "Exercise 3\nSolve it.\nВправа 4");
    assert_eq!(output.tasks[1].page, 2);
}
