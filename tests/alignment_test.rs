// ==========================================
// 对齐表 集成测试
// ==========================================
// 测试目标: 写出/读回往返 / 文件合并 / 人工对照表归约 / 属性重叠度
// ==========================================

use pd_align::domain::{Correspondence, RelationKind};
use pd_align::engine::alignment::{alignment_to_string, parse_alignment};
use pd_align::engine::{
    attribute_overlap, merge_alignments, read_alignment, reduce_to_matches, save_alignment,
};
use pd_align::importer::ImportError;
use std::fs;
use tempfile::TempDir;

fn two_rows() -> Vec<Correspondence> {
    vec![
        Correspondence::equivalence(
            "http://example.org/conrad.owl#conrad_0003",
            "http://example.org/infinity.owl#infinity_0017",
        ),
        Correspondence::equivalence(
            "http://example.org/conrad.owl#conrad_0042",
            "http://example.org/infinity.owl#infinity_0001",
        ),
    ]
}

#[test]
fn test_two_rows_no_header_round_trip() {
    let text = alignment_to_string(&two_rows()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "http://example.org/conrad.owl#conrad_0003,http://example.org/infinity.owl#infinity_0017,equivalence"
    );

    let parsed = parse_alignment(text.as_bytes()).unwrap();
    assert_eq!(parsed, two_rows());
    assert!(parsed.iter().all(|c| c.relation == RelationKind::Equivalence));
}

#[test]
fn test_save_and_read_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gold_standard.csv");

    save_alignment(&path, &two_rows()).unwrap();

    assert_eq!(read_alignment(&path).unwrap(), two_rows());
}

#[test]
fn test_empty_alignment_is_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");

    save_alignment(&path, &[]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    assert!(read_alignment(&path).unwrap().is_empty());
}

#[test]
fn test_merge_concatenates_without_dedup() {
    let dir = TempDir::new().unwrap();
    let classes = dir.path().join("class_mapping.csv");
    let attributes = dir.path().join("attribute_mapping.csv");
    let merged = dir.path().join("tbox_mapping.csv");
    save_alignment(&classes, &two_rows()[..1]).unwrap();
    save_alignment(&attributes, &two_rows()).unwrap();

    merge_alignments(&[&classes, &attributes], &merged).unwrap();

    let rows = read_alignment(&merged).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], rows[1]);
    assert_eq!(
        fs::read_to_string(&merged).unwrap(),
        fs::read_to_string(&classes).unwrap() + &fs::read_to_string(&attributes).unwrap()
    );
}

#[test]
fn test_merge_missing_input() {
    let dir = TempDir::new().unwrap();
    let result = merge_alignments(&[dir.path().join("nope.csv")], &dir.path().join("out.csv"));
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[test]
fn test_reduce_manual_comparison() {
    let dir = TempDir::new().unwrap();
    let manual = dir.path().join("attribute_mapping.csv");
    let output = dir.path().join("attribute_mapping_manual.csv");
    fs::write(
        &manual,
        "http://example.org/conrad.owl#,http://example.org/infinity.owl#\n\
         price,price\n\
         code,\n\
         ,packaging\n\
         number_ios,number_ios\n",
    )
    .unwrap();

    let rows = reduce_to_matches(&manual, &output).unwrap();

    assert_eq!(rows, 2);
    let written = read_alignment(&output).unwrap();
    assert_eq!(
        written[1],
        Correspondence::equivalence(
            "http://example.org/conrad.owl#number_ios",
            "http://example.org/infinity.owl#number_ios",
        )
    );

    let overlap = attribute_overlap(fs::File::open(&manual).unwrap()).unwrap();
    // 首行前缀计入双边
    assert_eq!((overlap.both, overlap.a_only, overlap.b_only), (3, 1, 1));
}
