//! End-to-end tests: placement, segmentation, linking and batch output.

use std::fs;
use std::path::Path;

use defrip::associate::{place_images, ImageIndex, PositionalAssociator, FALLBACK_TERM};
use defrip::convert::{run_batch, BatchOptions, ConvertOptions, Converter, DocumentOutcome};
use defrip::model::{ImageOccurrence, LayoutPage};
use defrip::render::from_json;
use defrip::{Defrip, Error, PageLayout};

const GROSS_FLOOR_AREA: &str = r#"[
    {"type": "text", "content": "**Gross Floor Area** means the sum of..."},
    {"type": "text", "content": "(a) the basement;"},
    {"type": "text", "content": "(b) all mezzanines."},
    {"type": "image", "image_path": "x.png"}
]"#;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_gross_floor_area_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    write(&images.join("Gross_Floor_Area_img1.png"), "png");

    let result = Defrip::new()
        .with_image_dir(&images)
        .parse_bytes(GROSS_FLOOR_AREA.as_bytes())
        .unwrap();

    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.term_id, "Gross_Floor_Area");
    assert_eq!(record.term, "Gross Floor Area");
    assert_eq!(
        record.text,
        "the sum of...\n(a) the basement;\n(b) all mezzanines."
    );
    assert_eq!(record.images.joined(), "Gross_Floor_Area_img1.png");

    let json = result.to_json(defrip::JsonFormat::Pretty).unwrap();
    assert!(json.contains(r#""termID": "Gross_Floor_Area""#));
    assert!(json.contains(r#""terms": "Gross Floor Area""#));
    assert!(json.contains(r#""type": "General""#));
    assert!(json.contains(r#""image": "Gross_Floor_Area_img1.png""#));
}

#[test]
fn test_linking_is_prefix_exact() {
    let index = ImageIndex::from_names(["door_img1.png", "door_control_img1.png", "door.png"]);
    assert_eq!(index.link("door").joined(), "door_img1.png");
    assert_eq!(index.link("door_control").joined(), "door_control_img1.png");
}

#[test]
fn test_linking_multiple_images_joined() {
    let index = ImageIndex::from_names(["Deck_img2.png", "Deck_img1.png", "Deck_img_3.png"]);
    assert_eq!(
        index.link("Deck").joined(),
        "Deck_img1.png;Deck_img2.png;Deck_img_3.png"
    );
}

#[test]
fn test_heuristic_carries_term_across_pages() {
    let mut layout = PageLayout::new();
    layout.add_page(
        LayoutPage::new(1)
            .with_image(ImageOccurrence::new("raw/a.png", 50.0).with_ext("png"))
            .with_block("Deck means a platform", 100.0)
            .with_image(ImageOccurrence::new("raw/b.png", 150.0).with_ext("png")),
    );
    layout.add_page(
        LayoutPage::new(2)
            .with_block("(a) attached to a building", 80.0)
            .with_image(ImageOccurrence::new("raw/c.jpeg", 120.0)),
    );

    let names: Vec<_> = PositionalAssociator::new()
        .assign(&layout)
        .into_iter()
        .map(|a| a.filename)
        .collect();
    assert_eq!(
        names,
        vec![
            format!("{}_img1.png", FALLBACK_TERM),
            "Deck_img1.png".to_string(),
            "Deck_img2.jpeg".to_string(),
        ]
    );
}

#[test]
fn test_placed_images_are_linked() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("raw/p1.png"), "first");
    write(&dir.path().join("raw/p2.png"), "second");

    let mut layout = PageLayout::new();
    layout.add_page(
        LayoutPage::new(1)
            .with_block("**Porch** means a covered entrance", 40.0)
            .with_image(ImageOccurrence::new(dir.path().join("raw/p1.png"), 90.0))
            .with_image(ImageOccurrence::new(dir.path().join("raw/p2.png"), 200.0)),
    );
    let images = dir.path().join("images");
    let assignments = PositionalAssociator::new().assign(&layout);
    let written = place_images(&assignments, &images).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(fs::read_to_string(images.join("Porch_img2.png")).unwrap(), "second");

    let stream = r#"[{"type": "text", "content": "**Porch** means a covered entrance"}]"#;
    let options = ConvertOptions::new().with_image_dir(&images);
    let result = Converter::new(options).convert_bytes(stream.as_bytes()).unwrap();
    assert_eq!(result.records[0].images.joined(), "Porch_img1.png;Porch_img2.png");
}

#[test]
fn test_batch_continues_after_failed_document() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("bylaw_RAW.json"), GROSS_FLOOR_AREA);
    write(&dir.path().join("broken_RAW.json"), r#"{"type": "text"}"#);
    write(&dir.path().join("notes.json"), "[]");

    let report = run_batch(dir.path(), &BatchOptions::default()).unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        &report.outcomes[0],
        DocumentOutcome::Failed { input, .. } if input.ends_with("broken_RAW.json")
    ));

    let output = dir.path().join("final/bylaw_FINAL.json");
    let records = from_json(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].term_id, "Gross_Floor_Area");
    assert!(!dir.path().join("final/broken_FINAL.json").exists());
}

#[test]
fn test_batch_places_layout_images_before_linking() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("bylaw_RAW.json"), GROSS_FLOOR_AREA);
    write(&dir.path().join("raw/p4_x7.png"), "image");
    write(
        &dir.path().join("bylaw_LAYOUT.json"),
        r#"{"pages": [{
            "number": 4,
            "blocks": [{"text": "**Gross Floor Area** means the sum of...", "top": 100.0}],
            "images": [{"source": "raw/p4_x7.png", "top": 300.0}]
        }]}"#,
    );

    let options = BatchOptions::new().sequential();
    let report = run_batch(dir.path(), &options).unwrap();
    assert!(report.is_success());
    match &report.outcomes[0] {
        DocumentOutcome::Converted {
            images_placed,
            stats,
            ..
        } => {
            assert_eq!(*images_placed, 1);
            assert_eq!(stats.linked_image_count, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(dir.path().join("images/Gross_Floor_Area_img1.png").is_file());
}

/// Two documents defining the same term, each with its own layout images.
fn shared_term_batch(root: &Path) {
    for (stem, count) in [("a", 1), ("b", 2)] {
        write(
            &root.join(format!("{}_RAW.json", stem)),
            r#"[{"type": "text", "content": "**Deck** means a platform"}]"#,
        );
        let mut images = Vec::new();
        for i in 1..=count {
            let source = format!("raw/{}_{}.png", stem, i);
            write(&root.join(&source), stem);
            images.push(format!(r#"{{"source": "{}", "top": {}.0}}"#, source, 100 * (i + 1)));
        }
        write(
            &root.join(format!("{}_LAYOUT.json", stem)),
            &format!(
                r#"{{"pages": [{{
                    "number": 1,
                    "blocks": [{{"text": "**Deck** means a platform", "top": 100.0}}],
                    "images": [{}]
                }}]}}"#,
                images.join(", ")
            ),
        );
    }
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let sequential = tempfile::tempdir().unwrap();
    shared_term_batch(sequential.path());
    run_batch(sequential.path(), &BatchOptions::new().sequential()).unwrap();
    let expected: Vec<String> = ["a", "b"]
        .iter()
        .map(|stem| {
            fs::read_to_string(sequential.path().join(format!("final/{}_FINAL.json", stem)))
                .unwrap()
        })
        .collect();

    let records = from_json(&expected[0]).unwrap();
    assert_eq!(records[0].images.joined(), "Deck_img1.png;Deck_img2.png");
    assert_eq!(expected[0], expected[1]);

    for _ in 0..20 {
        let parallel = tempfile::tempdir().unwrap();
        shared_term_batch(parallel.path());
        let report = run_batch(parallel.path(), &BatchOptions::new().with_parallel(true)).unwrap();
        assert!(report.is_success());
        for (stem, expected) in ["a", "b"].iter().zip(&expected) {
            let output = parallel.path().join(format!("final/{}_FINAL.json", stem));
            assert_eq!(&fs::read_to_string(output).unwrap(), expected);
        }
    }
}

#[test]
fn test_batch_with_no_streams() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("bylaw_FINAL.json"), "[]");
    let result = run_batch(dir.path(), &BatchOptions::default());
    assert!(matches!(result, Err(Error::NoInputFiles(_))));
}
