// ==========================================
// 产品目录对齐系统 - 核心库
// ==========================================
// 技术栈: Rust + serde_json + csv
// 系统定位: 供应商目录规范化、跨目录匹配与参考对齐（金标准）生成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 配置层 - 供应商映射表与运行配置
pub mod config;

// 导入层 - 抓取结果读取与规范化
pub mod importer;

// 引擎层 - 匹配、对齐、本体填充
pub mod engine;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Catalog, CatalogPair, Correspondence, FieldValue, Identifier, NormalizedRecord, RawRecord,
    RawValue, RelationKind, TargetType, Vendor,
};

// 配置
pub use config::{schema_for, AlignmentConfig, SimilarityMetric, VendorSchema};

// 导入
pub use importer::{
    Anomaly, AnomalyLog, CatalogPreprocessor, CatalogSource, DirectoryCatalogSource, FieldMapper,
    ImportError, ImportResult, MemoryAnomalyLog, RecordNormalizer, TracingAnomalyLog,
};

// 引擎
pub use engine::{
    AlignmentRun, IdentifierExtractor, InMemoryOntology, MatchPair, MatchSet, Matcher,
    OntologyPopulator, OntologySink, RunReport,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产品目录对齐系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
