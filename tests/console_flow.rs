use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ailabel::console::{self, ConsoleOptions};
use ailabel::{
    Catalog, CatalogRow, SessionOptions, SessionState, UploadError, UploadReceipt, UploadSink,
};

#[derive(Default)]
struct CountingSink {
    fail: AtomicBool,
    uploads: AtomicUsize,
}

#[async_trait::async_trait]
impl UploadSink for CountingSink {
    async fn upload(&self, filename: &str, _payload: &[u8]) -> Result<UploadReceipt, UploadError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UploadError::config("offline"));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadReceipt {
            location: filename.to_string(),
        })
    }
}

fn catalog() -> Catalog {
    Catalog::from_rows([CatalogRow {
        title: Some("Blue Mug".to_string()),
        variants: ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec(),
        images: Some("['https://img/mug.jpg']".to_string()),
    }])
    .unwrap()
}

async fn drive(
    input: &str,
    options: ConsoleOptions,
    sink: &CountingSink,
) -> (console::ConsoleSummary, SessionState, String) {
    let catalog = catalog();
    let mut state = SessionState::new(&SessionOptions { rng_seed: Some(21) });
    let mut out = Vec::new();
    let summary = console::run(
        &catalog,
        &mut state,
        sink,
        &options,
        Cursor::new(input.as_bytes()),
        &mut out,
    )
    .await
    .unwrap();
    (summary, state, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn picks_are_recorded_and_exported_on_quit() {
    let sink = CountingSink::default();
    let (summary, state, out) = drive("a\nb\nx\nA\nq\n", ConsoleOptions::default(), &sink).await;

    assert_eq!(summary.rounds, 3);
    assert_eq!(summary.exported, 3);
    assert_eq!(summary.pending, 0);
    assert_eq!(state.pending_count(), 0);
    assert_eq!(sink.uploads.load(Ordering::SeqCst), 1);

    assert!(out.contains("Original Title: Blue Mug"));
    assert!(out.contains("Images: https://img/mug.jpg"));
    assert!(out.contains("Version A: "));
    assert!(out.contains("Unrecognized input: x"));
    assert!(out.contains("Exported 3 comparisons"));
    assert!(out.trim_end().ends_with("Comparisons made: 3"));
}

#[tokio::test]
async fn periodic_export_fires_every_n_judgments() {
    let sink = CountingSink::default();
    let options = ConsoleOptions {
        export_every: Some(2),
        ..ConsoleOptions::default()
    };
    let (summary, _, _) = drive("a\nb\na\nb\na\nq\n", options, &sink).await;

    assert_eq!(summary.rounds, 5);
    assert_eq!(summary.exported, 5);
    // Two periodic exports plus the final one on quit.
    assert_eq!(sink.uploads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failed_export_keeps_judgments_and_end_of_input_quits() {
    let sink = CountingSink::default();
    sink.fail.store(true, Ordering::SeqCst);

    let (summary, state, out) = drive("e\nb\nr\ne\n", ConsoleOptions::default(), &sink).await;

    assert!(out.contains("No comparisons to export yet."));
    assert!(out.contains("Export failed"));
    assert!(out.contains("title_idx"));
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.exported, 0);
    assert_eq!(summary.pending, 1);
    assert_eq!(state.pending_count(), 1);
}

#[tokio::test]
async fn export_on_quit_can_be_disabled() {
    let sink = CountingSink::default();
    let options = ConsoleOptions {
        export_on_quit: false,
        ..ConsoleOptions::default()
    };
    let (summary, state, _) = drive("a\nq\n", options, &sink).await;

    assert_eq!(summary.pending, 1);
    assert_eq!(state.pending_count(), 1);
    assert_eq!(sink.uploads.load(Ordering::SeqCst), 0);
}
