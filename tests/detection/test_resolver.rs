// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Resolver behavior against in-memory tables
//!
//! Covers table matches, the keyword fallback, and the empty-result case.

use std::sync::Arc;
use xray_annotator::detection::{
    Detection, DetectionResolver, DetectionTable, MatchStrategy, TableRow,
};

fn resolver_with(rows: Vec<TableRow>) -> DetectionResolver {
    DetectionResolver::new(Arc::new(DetectionTable::from_rows(rows)))
}

#[test]
fn test_cardiomegaly_row_scenario() {
    let resolver = resolver_with(vec![TableRow::new(
        "0001.png",
        "Cardiomegaly",
        10,
        20,
        110,
        220,
    )]);

    let detections = resolver.resolve("0001", 1024);
    assert_eq!(
        detections,
        vec![Detection {
            label: "Cardiomegaly".to_string(),
            x: 10,
            y: 20,
            width: 100,
            height: 200,
        }]
    );
}

#[test]
fn test_one_detection_per_matching_row_in_table_order() {
    let resolver = resolver_with(vec![
        TableRow::new("0002.png", "Pleural thickening", 5, 5, 50, 60),
        TableRow::new("0003.png", "Cardiomegaly", 1, 1, 2, 2),
        TableRow::new("0002.png", " Pneumonia ", 100, 120, 90, 100),
        TableRow::new("0002.png", "Pleural thickening", 5, 5, 50, 60),
    ]);

    let detections = resolver.resolve("0002", 512);
    let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Pleural thickening", "Pneumonia", "Pleural thickening"]
    );

    // inverted coordinates pass through as negative sizes
    assert_eq!(detections[1].width, -10);
    assert_eq!(detections[1].height, -20);
}

#[test]
fn test_aortic_enlargement_fallback_scenario() {
    let resolver = resolver_with(vec![]);

    let detections = resolver.resolve("0004_aortic_enlargement", 600);
    assert_eq!(detections.len(), 2);
    for det in &detections {
        assert_eq!(det.label, "Aortic enlargement");
        assert_eq!((det.x, det.y), (350, 400));
        assert_eq!((det.width, det.height), (100, 150));
    }
    assert_eq!(detections[0], detections[1]);
}

#[test]
fn test_fallback_when_table_has_no_match() {
    let resolver = resolver_with(vec![TableRow::new("9999.png", "Cardiomegaly", 0, 0, 1, 1)]);

    let detections = resolver.resolve("covid_pneumonia_17", 300);
    let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Covid-19", "Pneumonia"]);
}

#[test]
fn test_fallback_position_scales_with_height() {
    let resolver = resolver_with(vec![]);

    for height in [0u32, 2, 100, 512, 2048, 4001] {
        let det = &resolver.resolve("fibrosis", height)[0];
        assert_eq!(det.label, "Pulmonary fibrosis");
        assert_eq!(det.x, (height / 2) as i32 + 50);
        assert_eq!(det.y, (height / 2) as i32 + 100);
    }
}

#[test]
fn test_no_match_no_keyword_is_empty() {
    let resolver = resolver_with(vec![TableRow::new("0001.png", "Cardiomegaly", 0, 0, 1, 1)]);
    assert!(resolver.resolve("unrelated_scan", 512).is_empty());
}

#[test]
fn test_empty_table_and_plain_identifier() {
    let resolver = resolver_with(vec![]);
    assert!(resolver.resolve("0001", 512).is_empty());
}

#[test]
fn test_exact_strategy_disables_partial_matches() {
    let table = Arc::new(DetectionTable::from_rows(vec![TableRow::new(
        "0001.png",
        "Cardiomegaly",
        0,
        0,
        1,
        1,
    )]));
    let resolver = DetectionResolver::with_strategy(table, MatchStrategy::Exact);

    assert!(resolver.resolve("0001", 100).is_empty());
    assert_eq!(resolver.resolve("0001.png", 100).len(), 1);
}
