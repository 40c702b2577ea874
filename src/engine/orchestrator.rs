// ==========================================
// 产品目录对齐系统 - 对齐流程编排
// ==========================================
// 用途: 串联 读取 → 预处理 → 快照 → 本体填充 → 标识符提取 → 匹配 → 金标准输出
// 约定: 目录 A 为 Conrad，目录 B 为 Infinity
// 红线: 字段/记录级异常只记日志；文件与本体写入失败终止本次运行
// ==========================================

use crate::config::alignment_config::AlignmentConfig;
use crate::config::vendor_schema::schema_for;
use crate::domain::catalog::{Catalog, CatalogPair};
use crate::domain::record::Correspondence;
use crate::domain::types::Vendor;
use crate::engine::alignment::{save_alignment, EntityResolver};
use crate::engine::identifier::IdentifierExtractor;
use crate::engine::matcher::{MatchPair, MatchSet, Matcher};
use crate::engine::ontology::{InMemoryOntology, OntologyPopulator};
use crate::importer::anomaly_log::{MemoryAnomalyLog, TeeAnomalyLog};
use crate::importer::catalog_preprocessor::{load_snapshot, CatalogPreprocessor};
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::{AnomalyLog, CatalogSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use uuid::Uuid;

// ==========================================
// RunReport - 运行报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    // 预处理
    pub records_a: usize,
    pub records_b: usize,

    // 标识符
    pub identifiers_a: usize,
    pub identifiers_b: usize,

    /// 探索模式下的别名标识符（不参与金标准）
    pub aliases_b: usize,

    // 匹配
    /// 主标识符精确匹配数（= 金标准行数）
    pub exact_matches: usize,
    /// 探索模式: 含别名的精确匹配数
    pub explored_exact_matches: usize,
    /// 探索模式: 相似度候选数
    pub similar_matches: usize,

    /// 本次运行记录的异常条数
    pub anomalies: usize,

    pub gold_standard: PathBuf,
}

/// 单个目录对的对齐结果
#[derive(Debug, Clone)]
pub struct PairAlignment {
    pub identifiers_a: usize,
    pub identifiers_b: usize,
    pub aliases_b: usize,
    /// 主标识符精确匹配（金标准来源）
    pub exact: Vec<MatchPair>,
    /// 探索结果（含别名的精确匹配 + 相似度候选）；非探索模式为空
    pub explored: MatchSet,
    pub correspondences: Vec<Correspondence>,
}

// ==========================================
// AlignmentRun - 一次对齐运行
// ==========================================
pub struct AlignmentRun {
    config: AlignmentConfig,
    matcher: Matcher,
}

impl AlignmentRun {
    pub fn new(config: AlignmentConfig) -> Self {
        let matcher = Matcher::new(config.similarity_threshold, config.similarity_metric);
        Self { config, matcher }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// 完整流程: 从抓取结果开始
    ///
    /// # 参数
    /// - source: 抓取结果来源
    /// - log: 异常日志（同时在内部计数）
    ///
    /// # 返回
    /// 运行报告；文件读写或本体写入失败时返回错误
    pub fn run(&self, source: &dyn CatalogSource, log: &dyn AnomalyLog) -> ImportResult<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("alignment_run", run_id = %run_id);
        let _guard = span.enter();
        info!(data_dir = %self.config.data_dir.display(), "开始对齐运行");

        let counter = MemoryAnomalyLog::new();
        let tee = TeeAnomalyLog::new(log, &counter);

        let a = self.prepare_catalog(source, Vendor::Conrad, &tee)?;
        let b = self.prepare_catalog(source, Vendor::Infinity, &tee)?;
        let pair = CatalogPair::new(a, b);

        self.finish(run_id, started_at, &pair, &tee, &counter)
    }

    /// 仅对齐: 从已有快照开始（预处理与匹配在时间上解耦）
    pub fn run_from_snapshots(&self, log: &dyn AnomalyLog) -> ImportResult<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("alignment_run", run_id = %run_id, from_snapshots = true);
        let _guard = span.enter();

        let counter = MemoryAnomalyLog::new();
        let tee = TeeAnomalyLog::new(log, &counter);

        let load = |vendor: Vendor| -> ImportResult<Catalog> {
            let records = load_snapshot(&self.config.snapshot_path(vendor))?;
            Ok(Catalog::new(schema_for(vendor), records))
        };
        let pair = CatalogPair::new(load(Vendor::Conrad)?, load(Vendor::Infinity)?);

        self.finish(run_id, started_at, &pair, &tee, &counter)
    }

    /// 单个供应商: 读取 → 预处理（写快照）→ 本体填充（写 JSON）
    fn prepare_catalog(
        &self,
        source: &dyn CatalogSource,
        vendor: Vendor,
        log: &dyn AnomalyLog,
    ) -> ImportResult<Catalog> {
        let schema = schema_for(vendor);
        let raws = source.load_catalog(vendor)?;

        let snapshot = self.config.snapshot_path(vendor);
        let records = CatalogPreprocessor::for_schema(schema).preprocess_with_snapshot(
            &raws,
            log,
            Some(snapshot.as_path()),
        )?;

        let mut ontology = InMemoryOntology::new(vendor, self.config.iri_for(vendor));
        OntologyPopulator::new(schema, self.config.add_speed_classes).populate(
            &mut ontology,
            &records,
            log,
        )?;
        ontology.save_json(&self.config.ontology_path(vendor))?;

        Ok(Catalog::new(schema, records))
    }

    /// 目录对 → 标识符 → 匹配 → 对应关系
    ///
    /// 金标准只由主标识符的精确匹配构成；探索模式的别名与相似度结果只进入报告
    pub fn align_pair(&self, pair: &CatalogPair, log: &dyn AnomalyLog) -> ImportResult<PairAlignment> {
        let extractor_a = IdentifierExtractor::for_schema(pair.a.schema);
        let extractor_b = IdentifierExtractor::for_schema(pair.b.schema);

        let ids_a = extractor_a.extract_all(&pair.a.records, log);
        let ids_b = extractor_b.extract_all(&pair.b.records, log);
        let exact = self.matcher.exact_matches(&ids_a, &ids_b);

        let (explored, aliases_b) = if self.config.exploration {
            let explored_b = extractor_b.with_aliases(&ids_b, &pair.b.records);
            let aliases_b = explored_b.len() - ids_b.len();
            (self.matcher.find_matches(&ids_a, &explored_b, true), aliases_b)
        } else {
            (MatchSet::default(), 0)
        };
        for candidate in &explored.similar {
            debug!(
                a = %candidate.left.match_key,
                b = %candidate.right.match_key,
                score = candidate.score,
                "相似匹配候选"
            );
        }

        let resolver = EntityResolver {
            vendor_a: pair.a.vendor(),
            iri_a: self.config.iri_for(pair.a.vendor()),
            len_a: pair.a.len(),
            vendor_b: pair.b.vendor(),
            iri_b: self.config.iri_for(pair.b.vendor()),
            len_b: pair.b.len(),
        };
        let correspondences = resolver.resolve(&exact)?;

        Ok(PairAlignment {
            identifiers_a: ids_a.len(),
            identifiers_b: ids_b.len(),
            aliases_b,
            exact,
            explored,
            correspondences,
        })
    }

    fn finish(
        &self,
        run_id: Uuid,
        started_at: DateTime<Utc>,
        pair: &CatalogPair,
        log: &dyn AnomalyLog,
        counter: &MemoryAnomalyLog,
    ) -> ImportResult<RunReport> {
        let aligned = self.align_pair(pair, log)?;
        let gold_standard = self.config.gold_standard_path();
        save_alignment(&gold_standard, &aligned.correspondences)?;

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            records_a: pair.a.len(),
            records_b: pair.b.len(),
            identifiers_a: aligned.identifiers_a,
            identifiers_b: aligned.identifiers_b,
            aliases_b: aligned.aliases_b,
            exact_matches: aligned.exact.len(),
            explored_exact_matches: aligned.explored.exact.len(),
            similar_matches: aligned.explored.similar.len(),
            anomalies: counter.len(),
            gold_standard,
        };

        info!(
            records_a = report.records_a,
            records_b = report.records_b,
            exact_matches = report.exact_matches,
            similar_matches = report.similar_matches,
            anomalies = report.anomalies,
            "对齐运行完成"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{FieldValue, NormalizedRecord};

    fn record(fields: &[(&str, &str)]) -> NormalizedRecord {
        let mut r = NormalizedRecord::new();
        for (k, v) in fields {
            r.insert(k, FieldValue::Text(v.to_string()));
        }
        r
    }

    fn pair() -> CatalogPair {
        let a = Catalog::new(
            schema_for(Vendor::Conrad),
            vec![
                record(&[("product_name", "ATmega328P"), ("prod_type", "ATMEGA328P-PU")]),
                record(&[("product_name", "Kabel")]),
            ],
        );
        let mut with_alias = record(&[("product_name", "ATMEGA328P-AU"), ("part_number", "ATMEGA328P-AU")]);
        with_alias.insert("OTHER NAMES", FieldValue::List(vec!["ATMEGA328P-PU".to_string()]));
        let b = Catalog::new(schema_for(Vendor::Infinity), vec![with_alias]);
        CatalogPair::new(a, b)
    }

    #[test]
    fn test_align_pair_default_mode() {
        let run = AlignmentRun::new(AlignmentConfig::default());
        let log = MemoryAnomalyLog::new();

        let aligned = run.align_pair(&pair(), &log).unwrap();

        assert_eq!(aligned.identifiers_a, 1);
        assert_eq!(aligned.identifiers_b, 1);
        assert_eq!(aligned.aliases_b, 0);
        assert!(aligned.correspondences.is_empty());
        assert!(aligned.explored.exact.is_empty());
        assert!(aligned.explored.similar.is_empty());
        assert_eq!(log.count_kind("no_identifier"), 1);
    }

    #[test]
    fn test_align_pair_exploration_reports_aliases_only() {
        let config = AlignmentConfig {
            exploration: true,
            ..AlignmentConfig::default()
        };
        let run = AlignmentRun::new(config);
        let log = MemoryAnomalyLog::new();

        let aligned = run.align_pair(&pair(), &log).unwrap();

        assert_eq!(aligned.identifiers_b, 1);
        assert_eq!(aligned.aliases_b, 1);
        // 别名命中只出现在探索结果中
        assert_eq!(aligned.explored.exact.len(), 1);
        assert_eq!(aligned.explored.exact[0].right.match_key, "ATMEGA328P-PU");
        assert!(aligned.exact.is_empty());
        assert!(aligned.correspondences.is_empty());
        // 主标识符与别名各一条
        assert_eq!(aligned.explored.similar.len(), 2);
        // NoIdentifier 只记录一次
        assert_eq!(log.count_kind("no_identifier"), 1);
    }
}
