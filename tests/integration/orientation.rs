//! Integration tests for page orientation and page sizes.

use img2pdf::config::{GenerationSettings, Orientation, PageSize};
use img2pdf::generate::{NoProgress, generate_pdf};
use rstest::rstest;

use crate::common::{page_sizes, png_entry};

#[rstest]
#[case(Orientation::Portrait, (612, 792))]
#[case(Orientation::Landscape, (792, 612))]
#[tokio::test]
async fn test_standard_pages_are_constant(
    #[case] orientation: Orientation,
    #[case] expected: (i64, i64),
) {
    let entries = vec![
        png_entry("tall", 100, 300),
        png_entry("wide", 300, 100),
        png_entry("square", 80, 80),
    ];
    let settings = GenerationSettings {
        global_orientation: orientation,
        ..Default::default()
    };

    let pdf = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();
    assert_eq!(page_sizes(&pdf.bytes), vec![expected; 3]);
}

#[tokio::test]
async fn test_override_applies_to_one_image_only() {
    let entries = vec![
        png_entry("a", 40, 40),
        png_entry("b", 40, 40).with_orientation(Some(Orientation::Landscape)),
        png_entry("c", 40, 40),
    ];
    let settings = GenerationSettings {
        global_orientation: Orientation::Portrait,
        ..Default::default()
    };

    let pdf = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();
    assert_eq!(
        page_sizes(&pdf.bytes),
        vec![(612, 792), (792, 612), (612, 792)]
    );
}

#[tokio::test]
async fn test_auto_override_under_fixed_global() {
    let entries = vec![
        png_entry("a", 60, 30),
        png_entry("b", 60, 30).with_orientation(Some(Orientation::Auto)),
    ];
    let settings = GenerationSettings {
        global_orientation: Orientation::Landscape,
        ..Default::default()
    };

    let pdf = generate_pdf(&entries, &settings, &NoProgress).await.unwrap();
    assert_eq!(page_sizes(&pdf.bytes), vec![(792, 612), (792, 396)]);
}

#[tokio::test]
async fn test_auto_page_aspect_matches_image() {
    let dims = [(123, 457), (640, 480), (1000, 333)];
    let entries: Vec<_> = dims
        .iter()
        .enumerate()
        .map(|(i, (w, h))| png_entry(&format!("img{i}"), *w, *h))
        .collect();

    let pdf = generate_pdf(&entries, &GenerationSettings::default(), &NoProgress)
        .await
        .unwrap();
    let summary = img2pdf::validation::inspect_pdf(&pdf.bytes).unwrap();

    for ((w, h), (page_w, page_h)) in dims.iter().zip(summary.page_sizes) {
        let image_ratio = f64::from(*w) / f64::from(*h);
        let page_ratio = f64::from(page_w) / f64::from(page_h);
        assert!(
            (image_ratio - page_ratio).abs() < 0.01,
            "{w}x{h}: page ratio {page_ratio} != {image_ratio}"
        );
        assert_eq!(page_w.max(page_h), 792.0);
    }
}

#[tokio::test]
async fn test_a4_page_size() {
    let settings = GenerationSettings::from_json(
        r#"{"orientation": "portrait", "pageSize": "a4", "margin": 0}"#,
    )
    .unwrap();
    assert_eq!(settings.page_size, PageSize::A4);

    let pdf = generate_pdf(&[png_entry("a", 50, 50)], &settings, &NoProgress)
        .await
        .unwrap();
    assert_eq!(page_sizes(&pdf.bytes), vec![(595, 842)]);
}
