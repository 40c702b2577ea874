// ==========================================
// 产品目录对齐系统 - 配置层
// ==========================================
// 职责: 供应商字段映射表（静态只读）+ 运行配置
// ==========================================

pub mod alignment_config;
pub mod vendor_schema;

// 重导出核心配置
pub use alignment_config::{AlignmentConfig, SimilarityMetric};
pub use vendor_schema::{schema_for, FieldRule, FieldSpec, PriceFormat, RangeSpec, VendorSchema};
