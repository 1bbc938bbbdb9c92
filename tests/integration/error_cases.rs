//! Integration tests for error handling and edge cases.

use img2pdf::config::GenerationSettings;
use img2pdf::entry::ImageEntry;
use img2pdf::error::{DecodeError, Img2PdfError};
use img2pdf::generate::{CancelFlag, Generator, NoProgress, RunState, generate_pdf};

use crate::common::{RecordingSink, corrupt_entry, png_entry};

fn five_entries() -> Vec<ImageEntry> {
    (0..5).map(|i| png_entry(&format!("e{i}"), 24, 24)).collect()
}

#[tokio::test]
async fn test_error_empty_input() {
    let sink = RecordingSink::default();
    let result = generate_pdf(&[], &GenerationSettings::default(), &sink).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Img2PdfError::EmptyDocument));
    assert!(!err.user_message().is_empty());
    assert_eq!(*sink.started.lock().unwrap(), None);
    assert!(sink.progress().is_empty());
}

#[tokio::test]
async fn test_error_cancel_after_first_of_five() {
    struct CancelOnFirst {
        cancel: CancelFlag,
        seen: std::sync::Mutex<Vec<f64>>,
    }

    impl img2pdf::generate::ProgressSink for CancelOnFirst {
        fn on_progress(&self, fraction: f64) {
            self.seen.lock().unwrap().push(fraction);
            self.cancel.cancel();
        }
    }

    let cancel = CancelFlag::new();
    let sink = CancelOnFirst {
        cancel: cancel.clone(),
        seen: Default::default(),
    };
    let generator = Generator::new();

    let result = generator
        .generate(&five_entries(), &GenerationSettings::default(), &sink, &cancel)
        .await;

    match result {
        Err(Img2PdfError::Cancelled { completed, total }) => {
            assert_eq!(completed, 1);
            assert_eq!(total, 5);
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(generator.state(), RunState::Failed);
    assert!(!sink.seen.lock().unwrap().contains(&1.0));
}

#[tokio::test]
async fn test_error_cancelled_before_start() {
    let cancel = CancelFlag::new();
    cancel.cancel();

    let result = Generator::new()
        .generate(&five_entries(), &GenerationSettings::default(), &NoProgress, &cancel)
        .await;

    assert!(matches!(result, Err(Img2PdfError::Cancelled { total: 5, .. })));
}

#[tokio::test]
async fn test_error_all_entries_failed() {
    let entries = vec![
        corrupt_entry("a"),
        ImageEntry::new("b", "b.txt", b"hello".to_vec()),
    ];
    let sink = RecordingSink::default();

    let result = generate_pdf(&entries, &GenerationSettings::default(), &sink).await;

    match result {
        Err(Img2PdfError::AllEntriesFailed { total, first_error }) => {
            assert_eq!(total, 2);
            assert!(matches!(first_error, DecodeError::Corrupt { .. }));
        }
        other => panic!("expected AllEntriesFailed, got {other:?}"),
    }
    assert_eq!(sink.skipped().len(), 2);
    assert!(!sink.progress().contains(&1.0));
}

#[tokio::test]
async fn test_error_concurrent_run_is_busy() {
    let generator = Generator::new();
    let entries = five_entries();
    let settings = GenerationSettings::default();
    let (cancel_a, cancel_b) = (CancelFlag::new(), CancelFlag::new());

    let (first, second) = tokio::join!(
        generator.generate(&entries, &settings, &NoProgress, &cancel_a),
        generator.generate(&entries, &settings, &NoProgress, &cancel_b),
    );

    let busy = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(Img2PdfError::Busy)))
        .count();
    assert_eq!(busy, 1);
    assert!(first.is_ok() || second.is_ok());
    assert_eq!(generator.state(), RunState::Completed);
}

#[tokio::test]
async fn test_independent_generators_run_concurrently() {
    let entries = five_entries();
    let settings = GenerationSettings::default();
    let a = Generator::new();
    let b = Generator::new();
    let (cancel_a, cancel_b) = (CancelFlag::new(), CancelFlag::new());

    let (first, second) = tokio::join!(
        a.generate(&entries, &settings, &NoProgress, &cancel_a),
        b.generate(&entries, &settings, &NoProgress, &cancel_b),
    );

    assert_eq!(first.unwrap().bytes, second.unwrap().bytes);
}

#[tokio::test]
async fn test_error_duplicate_ids() {
    let entries = vec![png_entry("same", 10, 10), png_entry("same", 20, 20)];
    let result = generate_pdf(&entries, &GenerationSettings::default(), &NoProgress).await;
    assert!(matches!(result, Err(Img2PdfError::DuplicateEntryId { .. })));
}

#[tokio::test]
async fn test_error_invalid_settings() {
    assert!(GenerationSettings::from_json(r#"{"margin": -1}"#).is_err());

    let settings = GenerationSettings {
        margin: 500.0,
        ..Default::default()
    };
    let result = generate_pdf(&[png_entry("a", 10, 10)], &settings, &NoProgress).await;
    let err = result.unwrap_err();
    assert!(matches!(err, Img2PdfError::InvalidSettings { .. }));
    assert!(!err.is_fatal());
}
