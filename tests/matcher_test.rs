// ==========================================
// 匹配器 集成测试
// ==========================================
// 测试目标: 精确匹配的对称性与基数 / 输出顺序 / 相似度匹配
// ==========================================


use pd_align::config::vendor_schema::{conrad, infinity};
use pd_align::engine::{IdentifierExtractor, MatchPair, Matcher};
use pd_align::importer::{CatalogPreprocessor, MemoryAnomalyLog};
use pd_align::SimilarityMetric;
use test_helpers::{conrad_accessory, conrad_mcu, conrad_raspi, identifiers, infinity_mcu};

fn matcher() -> Matcher {
    Matcher::new(0.8, SimilarityMetric::Indel)
}

fn index_pairs(pairs: &[MatchPair]) -> Vec<(String, usize, String, usize)> {
    let mut out: Vec<_> = pairs
        .iter()
        .map(|p| {
            (
                p.left.match_key.clone(),
                p.left.record_index,
                p.right.match_key.clone(),
                p.right.record_index,
            )
        })
        .collect();
    out.sort();
    out
}

#[test]
fn test_exact_matching_is_symmetric() {
    let a = identifiers(&["X", "Y", "Z", "X", "W"]);
    let b = identifiers(&["Y", "X", "V", "X"]);

    let forward = matcher().exact_matches(&a, &b);
    let backward: Vec<MatchPair> = matcher()
        .exact_matches(&b, &a)
        .iter()
        .map(MatchPair::swapped)
        .collect();

    assert_eq!(index_pairs(&forward), index_pairs(&backward));
    assert_eq!(forward.len(), 5);
}

#[test]
fn test_exact_matching_full_cross_product() {
    let a = identifiers(&["X", "X", "X"]);
    let b = identifiers(&["X", "X"]);

    let pairs = matcher().exact_matches(&a, &b);

    assert_eq!(pairs.len(), 6);
    let order: Vec<(usize, usize)> = pairs
        .iter()
        .map(|p| (p.left.record_index, p.right.record_index))
        .collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
}

#[test]
fn test_empty_catalog_yields_no_matches() {
    assert!(matcher().exact_matches(&[], &identifiers(&["X"])).is_empty());
    assert!(matcher().similarity_matches(&identifiers(&["X"]), &[]).is_empty());
}

#[test]
fn test_similarity_is_superset_of_exact() {
    let a = identifiers(&["STM32F103C8T6", "ATMEGA328P-PU", "LPC1768FBD100"]);
    let b = identifiers(&["STM32F103C8T6", "ATMEGA328P-AU", "ESP32-WROOM-32"]);

    let set = matcher().find_matches(&a, &b, true);

    assert_eq!(set.exact.len(), 1);
    let exact = index_pairs(&set.exact);
    let similar = index_pairs(&set.similar);
    assert!(exact.iter().all(|p| similar.contains(p)));
    assert_eq!(set.similar.len(), 2);
    assert!(set.similar.iter().all(|p| p.score > 0.8));
}

#[test]
fn test_configurable_threshold() {
    let a = identifiers(&["ATMEGA328P-PU"]);
    let b = identifiers(&["ATMEGA328P-AU"]);

    assert_eq!(Matcher::new(0.9, SimilarityMetric::Indel).similarity_matches(&a, &b).len(), 1);
    assert!(Matcher::new(0.95, SimilarityMetric::Indel)
        .similarity_matches(&a, &b)
        .is_empty());
}

#[test]
fn test_catalog_identifiers_end_to_end() {
    let log = MemoryAnomalyLog::new();
    let conrad_records = CatalogPreprocessor::for_schema(conrad()).preprocess(
        &[
            conrad_mcu("STM32 Blue Pill MCU", "STM32F103C8T6"),
            conrad_accessory("Steckbrett"),
            conrad_raspi("Raspberry Pi 4 B", "4 B"),
            conrad_mcu("STM32 Zweitlistung", "STM32F103C8T6"),
        ],
        &log,
    );
    let infinity_records = CatalogPreprocessor::for_schema(infinity()).preprocess(
        &[
            infinity_mcu("STM32F030F4P6", "STM32F030F4P6", vec![]),
            infinity_mcu("STM32F103C8T6", "STM32F103C8T6", vec!["497-6063-ND"]),
        ],
        &log,
    );

    let ids_a = IdentifierExtractor::for_schema(conrad()).extract_all(&conrad_records, &log);
    let ids_b = IdentifierExtractor::for_schema(infinity()).extract_all(&infinity_records, &log);

    assert_eq!(ids_a.len(), 3);
    assert_eq!(log.count_kind("no_identifier"), 1);

    let pairs = matcher().exact_matches(&ids_a, &ids_b);
    let order: Vec<(usize, usize)> = pairs
        .iter()
        .map(|p| (p.left.record_index, p.right.record_index))
        .collect();
    assert_eq!(order, vec![(0, 1), (3, 1)]);
}
