// ==========================================
// 产品目录对齐系统 - 导入层
// ==========================================
// 职责: 抓取文件读取 / 字段映射 / 记录规范化 / 异常日志
// 支持: JSON 抓取结果, 规范化快照
// ==========================================

// 模块声明
pub mod anomaly_log;
pub mod catalog_preprocessor;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use anomaly_log::{MemoryAnomalyLog, TeeAnomalyLog, TracingAnomalyLog};
pub use catalog_preprocessor::{load_snapshot, save_snapshot, CatalogPreprocessor};
pub use data_cleaner::{DataCleaner, UnitFailure};
pub use error::{Anomaly, ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{latest_catalog_file, DirectoryCatalogSource, JsonCatalogParser};

// 重导出 Trait 接口
pub use importer_trait::{AnomalyLog, CatalogSource, RecordNormalizer};
