// ==========================================
// 产品目录对齐系统 - 数据探查
// ==========================================
// 职责: 冗余属性 / 候选分类属性 / 时钟频率分布 / 属性重叠度
// 用途: 人工整理映射与分类前的辅助统计，不参与金标准生成
// ==========================================

use crate::domain::record::{FieldValue, NormalizedRecord};
use crate::importer::error::ImportResult;
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::io::Read;

/// 值恒相同的属性对
///
/// 逐条记录检查属性两两组合：相等则加入，之后任一记录不等则移除
pub fn check_duplicate_attributes(records: &[NormalizedRecord]) -> BTreeSet<(String, String)> {
    let mut same = BTreeSet::new();
    for record in records {
        let fields: Vec<(&str, &FieldValue)> = record.iter().collect();
        for (i, (a1, v1)) in fields.iter().enumerate() {
            for (a2, v2) in &fields[i + 1..] {
                let key = (a1.to_string(), a2.to_string());
                if v1 == v2 {
                    same.insert(key);
                } else {
                    same.remove(&key);
                }
            }
        }
    }
    same
}

/// 单个属性的取值分布
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSpread {
    pub attribute: String,
    pub distinct: usize,
    pub total: usize,
}

/// 候选分类属性: 以首条记录的属性为准，只统计标量值（列表值会导致多重继承）
pub fn find_possible_classes(records: &[NormalizedRecord]) -> Vec<AttributeSpread> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    first
        .names()
        .map(|attribute| {
            let values: Vec<String> = records
                .iter()
                .filter_map(|r| r.get(attribute))
                .filter(|v| v.as_list().is_none())
                .map(|v| format!("{:?}", v))
                .collect();
            let distinct = values.iter().collect::<HashSet<_>>().len();
            AttributeSpread {
                attribute: attribute.to_string(),
                distinct,
                total: values.len(),
            }
        })
        .collect()
}

/// 时钟频率直方图（按频率升序；缺频率的记录计入 0）
pub fn clock_rate_ranges(records: &[NormalizedRecord], clock_field: &str) -> Vec<(f64, usize)> {
    let mut buckets: Vec<(f64, usize)> = vec![(0.0, 0)];
    for record in records {
        let speed = record
            .get(clock_field)
            .and_then(FieldValue::as_f64)
            .unwrap_or(0.0);
        match buckets.iter_mut().find(|(v, _)| *v == speed) {
            Some(bucket) => bucket.1 += 1,
            None => buckets.push((speed, 1)),
        }
    }
    buckets.sort_by(|a, b| a.0.total_cmp(&b.0));
    buckets
}

/// 属性重叠度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeOverlap {
    pub a_only: usize,
    pub both: usize,
    pub b_only: usize,
}

/// 统计对照表（或对齐表）中属性的双边覆盖情况: 第一列对应目录 A，第二列对应目录 B
pub fn attribute_overlap<R: Read>(reader: R) -> ImportResult<AttributeOverlap> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut overlap = AttributeOverlap::default();
    for row in rdr.records() {
        let row = row?;
        let a = !row.get(0).unwrap_or("").is_empty();
        let b = !row.get(1).unwrap_or("").is_empty();
        match (a, b) {
            (true, true) => overlap.both += 1,
            (true, false) => overlap.a_only += 1,
            (false, true) => overlap.b_only += 1,
            (false, false) => {}
        }
    }
    Ok(overlap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, FieldValue)]) -> NormalizedRecord {
        let mut r = NormalizedRecord::new();
        for (k, v) in fields {
            r.insert(k, v.clone());
        }
        r
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_duplicate_attributes() {
        let records = vec![
            record(&[("manufacturer", text("ST")), ("manuf_abbrev", text("ST")), ("series", text("ST"))]),
            record(&[("manufacturer", text("NXP")), ("manuf_abbrev", text("NXP")), ("series", text("LPC"))]),
        ];

        let same = check_duplicate_attributes(&records);

        assert_eq!(
            same.into_iter().collect::<Vec<_>>(),
            vec![("manufacturer".to_string(), "manuf_abbrev".to_string())]
        );
    }

    #[test]
    fn test_possible_classes_skip_lists() {
        let records = vec![
            record(&[("series", text("AVR")), ("connectivity", FieldValue::List(vec!["SPI".to_string()]))]),
            record(&[("series", text("AVR"))]),
            record(&[("series", text("PIC"))]),
        ];

        let spread = find_possible_classes(&records);

        assert_eq!(spread[0], AttributeSpread { attribute: "series".to_string(), distinct: 2, total: 3 });
        assert_eq!(spread[1].total, 0);
        assert!(find_possible_classes(&[]).is_empty());
    }

    #[test]
    fn test_clock_rate_histogram() {
        let records = vec![
            record(&[("clock_rate", FieldValue::Integer(48))]),
            record(&[("clock_rate", FieldValue::Integer(16))]),
            record(&[("clock_rate", FieldValue::Integer(48))]),
            record(&[]),
        ];

        let hist = clock_rate_ranges(&records, "clock_rate");

        assert_eq!(hist, vec![(0.0, 1), (16.0, 1), (48.0, 2)]);
    }

    #[test]
    fn test_attribute_overlap() {
        let csv = "price,price\nseries,\n,packaging\n,lead_free_rohs\nclock_rate,speed\n";
        let overlap = attribute_overlap(csv.as_bytes()).unwrap();
        assert_eq!(overlap, AttributeOverlap { a_only: 1, both: 2, b_only: 2 });
    }
}
