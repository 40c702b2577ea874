// ==========================================
// 产品目录对齐系统 - 目录与目录对
// ==========================================
// 职责: 承载单个供应商的规范化记录，以及一次对齐运行的两个目录
// 生命周期: 每次对齐运行构造一次，输出对应关系后丢弃
// ==========================================

use crate::config::vendor_schema::VendorSchema;
use crate::domain::record::NormalizedRecord;
use crate::domain::types::Vendor;

// ==========================================
// Catalog - 单供应商目录
// ==========================================
#[derive(Debug, Clone)]
pub struct Catalog {
    pub schema: &'static VendorSchema,
    pub records: Vec<NormalizedRecord>,
}

impl Catalog {
    pub fn new(schema: &'static VendorSchema, records: Vec<NormalizedRecord>) -> Self {
        Self { schema, records }
    }

    pub fn vendor(&self) -> Vendor {
        self.schema.vendor
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// CatalogPair - 匹配器的处理单元
// ==========================================
#[derive(Debug, Clone)]
pub struct CatalogPair {
    pub a: Catalog,
    pub b: Catalog,
}

impl CatalogPair {
    pub fn new(a: Catalog, b: Catalog) -> Self {
        Self { a, b }
    }
}
