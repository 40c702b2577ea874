// ==========================================
// 产品目录对齐系统 - 领域模型层
// ==========================================
// 职责: 定义记录、标识符、对应关系与枚举类型
// 红线: 不含文件访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod record;
pub mod types;

// 重导出核心类型
pub use catalog::{Catalog, CatalogPair};
pub use record::{Correspondence, FieldValue, Identifier, NormalizedRecord, RawRecord, RawValue};
pub use types::{RelationKind, TargetType, Vendor};
