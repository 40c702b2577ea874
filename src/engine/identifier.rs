// ==========================================
// 产品目录对齐系统 - 标识符提取器
// ==========================================
// 职责: 按候选字段优先级为每条规范化记录提取匹配键
// 红线: 取第一个命中的候选字段，绝不合并多个候选
// 输出: Identifier (显示名, 匹配键, 目录位置)；无命中时记录日志并跳过
// ==========================================

use crate::config::vendor_schema::VendorSchema;
use crate::domain::record::{FieldValue, Identifier, NormalizedRecord};
use crate::importer::error::Anomaly;
use crate::importer::importer_trait::AnomalyLog;
use tracing::{debug, instrument};

// ==========================================
// IdentifierExtractor
// ==========================================
pub struct IdentifierExtractor {
    candidates: Vec<&'static str>,
    display_field: &'static str,
    alias_field: Option<&'static str>,
}

impl IdentifierExtractor {
    /// 显式指定候选字段（按优先级）
    pub fn new(candidates: Vec<&'static str>, display_field: &'static str) -> Self {
        Self {
            candidates,
            display_field,
            alias_field: None,
        }
    }

    /// 使用供应商映射表中的候选字段 / 显示名字段 / 别名字段
    pub fn for_schema(schema: &VendorSchema) -> Self {
        Self {
            candidates: schema.identifier_candidates.clone(),
            display_field: schema.display_field,
            alias_field: schema.alias_field,
        }
    }

    /// 记录显示名（无显示名字段时退回位置）
    pub fn display_name(&self, record: &NormalizedRecord, index: usize) -> String {
        record
            .get(self.display_field)
            .and_then(FieldValue::as_key)
            .unwrap_or_else(|| format!("record #{}", index))
    }

    /// 单条记录提取
    ///
    /// # 参数
    /// - record: 规范化记录
    /// - index: 目录内位置
    /// - log: 异常日志
    ///
    /// # 返回
    /// - Some(Identifier): 第一个命中的候选字段
    /// - None: 无候选字段（已记录 NoIdentifier）
    pub fn extract(
        &self,
        record: &NormalizedRecord,
        index: usize,
        log: &dyn AnomalyLog,
    ) -> Option<Identifier> {
        let name = self.display_name(record, index);
        let key = self
            .candidates
            .iter()
            .find_map(|field| record.get(field).and_then(FieldValue::as_key));

        match key {
            Some(key) => Some(Identifier::new(&name, &key, index)),
            None => {
                log.record(&Anomaly::NoIdentifier { record: name });
                None
            }
        }
    }

    /// 整个目录提取（保持目录顺序，无标识符的记录被跳过）
    #[instrument(skip(self, records, log), fields(count = records.len()))]
    pub fn extract_all(&self, records: &[NormalizedRecord], log: &dyn AnomalyLog) -> Vec<Identifier> {
        let ids: Vec<Identifier> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| self.extract(record, index, log))
            .collect();
        debug!(identifiers = ids.len(), "标识符提取完成");
        ids
    }

    /// 别名标识符（探索模式）: 别名字段中的每个名称各成一个标识符
    pub fn extract_aliases(&self, records: &[NormalizedRecord]) -> Vec<Identifier> {
        let Some(alias_field) = self.alias_field else {
            return Vec::new();
        };

        let mut aliases = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let names: Vec<String> = match record.get(alias_field) {
                Some(FieldValue::List(items)) => items.clone(),
                Some(other) => other.as_key().into_iter().collect(),
                None => continue,
            };
            let display = self.display_name(record, index);
            aliases.extend(
                names
                    .iter()
                    .map(|alias| Identifier::new(&display, alias, index)),
            );
        }
        aliases
    }

    /// 已提取的主标识符 + 别名标识符（主标识符在前；不重复记录 NoIdentifier）
    pub fn with_aliases(&self, primary: &[Identifier], records: &[NormalizedRecord]) -> Vec<Identifier> {
        let mut ids = primary.to_vec();
        ids.extend(self.extract_aliases(records));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vendor_schema::{conrad, infinity};
    use crate::importer::anomaly_log::MemoryAnomalyLog;

    fn record(fields: &[(&str, &str)]) -> NormalizedRecord {
        let mut r = NormalizedRecord::new();
        for (k, v) in fields {
            r.insert(k, FieldValue::Text(v.to_string()));
        }
        r
    }

    #[test]
    fn test_first_candidate_wins() {
        let extractor = IdentifierExtractor::for_schema(conrad());
        let log = MemoryAnomalyLog::new();
        let r = record(&[
            ("product_name", "STM32 MCU"),
            ("prod_type", "STM32F103C8T6"),
            ("Modell", "Blue Pill"),
        ]);

        let id = extractor.extract(&r, 3, &log).unwrap();

        assert_eq!(id.match_key, "STM32F103C8T6");
        assert_eq!(id.product_name, "STM32 MCU");
        assert_eq!(id.record_index, 3);
        assert!(log.is_empty());
    }

    #[test]
    fn test_fallback_candidate() {
        let extractor = IdentifierExtractor::for_schema(conrad());
        let log = MemoryAnomalyLog::new();
        let r = record(&[("product_name", "Raspberry Pi 4 B"), ("Modell", "4 B")]);

        let id = extractor.extract(&r, 0, &log).unwrap();

        assert_eq!(id.match_key, "4 B");
    }

    #[test]
    fn test_no_identifier_logged_and_skipped() {
        let extractor = IdentifierExtractor::for_schema(conrad());
        let log = MemoryAnomalyLog::new();
        let records = vec![
            record(&[("product_name", "Lötkolben")]),
            record(&[("product_name", "ATtiny85"), ("prod_type", "ATTINY85-20PU")]),
        ];

        let ids = extractor.extract_all(&records, &log);

        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].record_index, 1);
        assert_eq!(log.lines(), vec!["no identifier for Lötkolben".to_string()]);
    }

    #[test]
    fn test_aliases_follow_primary_ids() {
        let extractor = IdentifierExtractor::for_schema(infinity());
        let log = MemoryAnomalyLog::new();
        let mut r = record(&[("product_name", "STM32F030"), ("part_number", "STM32F030F4P6")]);
        r.insert(
            "OTHER NAMES",
            FieldValue::List(vec!["497-14045-5-ND".to_string(), "STM32F030F4P6TR".to_string()]),
        );

        let records = vec![r];
        let primary = extractor.extract_all(&records, &log);
        let ids = extractor.with_aliases(&primary, &records);

        let keys: Vec<&str> = ids.iter().map(|i| i.match_key.as_str()).collect();
        assert_eq!(keys, vec!["STM32F030F4P6", "497-14045-5-ND", "STM32F030F4P6TR"]);
        assert!(ids.iter().all(|i| i.record_index == 0));
    }

    #[test]
    fn test_no_alias_field_yields_nothing() {
        let extractor = IdentifierExtractor::for_schema(conrad());
        let r = record(&[("prod_type", "X"), ("OTHER NAMES", "Y")]);
        assert!(extractor.extract_aliases(&[r]).is_empty());
    }
}
