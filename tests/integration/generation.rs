//! Integration tests for end-to-end PDF generation.

use image::ImageFormat;
use img2pdf::assemble::DocumentInfo;
use img2pdf::config::{GenerationSettings, QualityTier};
use img2pdf::entry::ImageEntry;
use img2pdf::error::DecodeError;
use img2pdf::generate::{CancelFlag, Generator, NoProgress, RunState, generate_pdf};
use img2pdf::validation::inspect_pdf;
use rstest::rstest;

use crate::common::{
    RecordingSink, corrupt_entry, encode, init_tracing, jpeg_bytes, page_sizes, png_bytes,
    png_entry, textured_image,
};

#[tokio::test]
async fn test_auto_pages_follow_each_image() {
    init_tracing();

    let entries = vec![
        png_entry("tall", 200, 300),
        png_entry("wide", 300, 200),
        png_entry("square", 50, 50),
    ];

    let pdf = generate_pdf(&entries, &GenerationSettings::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(
        page_sizes(&pdf.bytes),
        vec![(528, 792), (792, 528), (792, 792)]
    );
    assert_eq!(pdf.report.pages_written, 3);
    assert!(pdf.report.is_complete());
}

#[tokio::test]
async fn test_corrupt_entry_is_skipped() {
    init_tracing();

    let entries = vec![
        corrupt_entry("broken"),
        png_entry("a", 60, 40),
        png_entry("b", 40, 60),
    ];
    let sink = RecordingSink::default();
    let generator = Generator::new();

    let pdf = generator
        .generate(&entries, &GenerationSettings::default(), &sink, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(generator.state(), RunState::Completed);
    assert_eq!(page_sizes(&pdf.bytes), vec![(792, 528), (528, 792)]);

    let report = &pdf.report;
    assert_eq!(report.total_entries, 3);
    assert_eq!(report.pages_written, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(report.skipped[0].id, "broken");
    assert!(matches!(report.skipped[0].error, DecodeError::Corrupt { .. }));
    assert!(report.summary().contains("skipped 1 image(s)"));

    assert_eq!(sink.skipped(), vec![(0, "broken".to_string())]);
}

#[tokio::test]
async fn test_progress_reports_every_entry() {
    let entries: Vec<ImageEntry> = (0..4).map(|i| png_entry(&format!("p{i}"), 20, 20)).collect();
    let sink = RecordingSink::default();

    generate_pdf(&entries, &GenerationSettings::default(), &sink)
        .await
        .unwrap();

    assert_eq!(*sink.started.lock().unwrap(), Some(4));
    assert_eq!(sink.progress(), vec![0.25, 0.5, 0.75, 1.0]);
}

#[tokio::test]
async fn test_progress_counts_skipped_entries() {
    let entries = vec![
        png_entry("a", 20, 20),
        corrupt_entry("b"),
        png_entry("c", 20, 20),
    ];
    let sink = RecordingSink::default();

    generate_pdf(&entries, &GenerationSettings::default(), &sink)
        .await
        .unwrap();

    let progress = sink.progress();
    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress.last(), Some(&1.0));
}

#[tokio::test]
async fn test_channel_progress_sink() {
    let entries: Vec<ImageEntry> = (0..3).map(|i| png_entry(&format!("c{i}"), 10, 10)).collect();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<f64>();

    generate_pdf(&entries, &GenerationSettings::default(), &tx)
        .await
        .unwrap();
    drop(tx);

    let mut received = Vec::new();
    while let Some(fraction) = rx.recv().await {
        received.push(fraction);
    }
    assert_eq!(received.len(), 3);
    assert_eq!(received.last(), Some(&1.0));
}

#[tokio::test]
async fn test_regeneration_is_identical() {
    let entries = vec![
        png_entry("a", 30, 20),
        png_entry("b", 20, 30),
        png_entry("c", 25, 25),
    ];
    let settings = GenerationSettings::default();

    let first = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();
    let second = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();

    assert_eq!(page_sizes(&first.bytes), page_sizes(&second.bytes));
    assert_eq!(first.bytes, second.bytes);
}

#[tokio::test]
async fn test_reordering_changes_page_order() {
    let tall = png_entry("tall", 20, 40);
    let wide = png_entry("wide", 40, 20);
    let settings = GenerationSettings::default();

    let forward = generate_pdf(&[tall.clone(), wide.clone()], &settings, &NoProgress)
        .await
        .unwrap();
    let reversed = generate_pdf(&[wide, tall], &settings, &NoProgress)
        .await
        .unwrap();

    let mut expected = page_sizes(&forward.bytes);
    expected.reverse();
    assert_eq!(page_sizes(&reversed.bytes), expected);
}

#[rstest]
#[case::jpeg(ImageFormat::Jpeg)]
#[case::png(ImageFormat::Png)]
#[case::webp(ImageFormat::WebP)]
#[tokio::test]
async fn test_supported_input_formats(#[case] format: ImageFormat) {
    let bytes = encode(&textured_image(64, 32), format);
    let entries = vec![ImageEntry::new("img", "img", bytes)];

    let pdf = generate_pdf(&entries, &GenerationSettings::default(), &NoProgress)
        .await
        .unwrap();
    assert_eq!(page_sizes(&pdf.bytes), vec![(792, 396)]);
}

#[tokio::test]
async fn test_lower_quality_gives_smaller_output() {
    let entries = vec![ImageEntry::new("p", "p.png", png_bytes(256, 256))];

    let mut sizes = Vec::new();
    for tier in [QualityTier::Low, QualityTier::Medium, QualityTier::High] {
        let settings = GenerationSettings {
            quality_tier: tier,
            ..Default::default()
        };
        let pdf = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();
        sizes.push(pdf.report.output_size);
    }

    assert!(sizes[0] < sizes[1], "low {} >= medium {}", sizes[0], sizes[1]);
    assert!(sizes[1] < sizes[2], "medium {} >= high {}", sizes[1], sizes[2]);
}

#[tokio::test]
async fn test_high_quality_keeps_jpeg_bytes() {
    let jpeg = jpeg_bytes(120, 80);
    let entries = vec![ImageEntry::new("j", "j.jpg", jpeg.clone())];

    let pdf = generate_pdf(&entries, &GenerationSettings::default(), &NoProgress)
        .await
        .unwrap();

    assert!(pdf.bytes.windows(jpeg.len()).any(|w| w == jpeg.as_slice()));
    assert_eq!(page_sizes(&pdf.bytes), vec![(792, 528)]);
}

#[tokio::test]
async fn test_document_title_from_filename() {
    let settings = GenerationSettings::from_json(r#"{"filename": "  Trip.pdf "}"#).unwrap();
    let pdf = generate_pdf(&[png_entry("a", 10, 10)], &settings, &NoProgress)
        .await
        .unwrap();

    let doc = lopdf::Document::load_mem(&pdf.bytes).unwrap();
    let info = DocumentInfo::read(&doc).unwrap();
    assert_eq!(info.title.as_deref(), Some("Trip"));
    assert_eq!(settings.download_filename(), "Trip.pdf");
}

#[tokio::test]
async fn test_report_matches_output() {
    let pdf = generate_pdf(&[png_entry("a", 10, 10)], &GenerationSettings::default(), &NoProgress)
        .await
        .unwrap();

    let summary = inspect_pdf(&pdf.bytes).unwrap();
    assert_eq!(summary.page_count, pdf.report.pages_written);
    assert_eq!(summary.byte_size, pdf.report.output_size);

    let json: serde_json::Value = serde_json::from_str(&pdf.report.to_json().unwrap()).unwrap();
    assert_eq!(json["pagesWritten"], 1);
}
