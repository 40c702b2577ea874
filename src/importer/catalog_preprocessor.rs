// ==========================================
// 产品目录对齐系统 - 目录预处理器
// ==========================================
// 职责: 对整份供应商目录逐条规范化，可选写出快照
// 红线: 输出与输入同序同基数，缺字段的记录不丢弃
// ==========================================

use crate::config::vendor_schema::VendorSchema;
use crate::domain::record::{NormalizedRecord, RawRecord};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{read_json, write_json_atomic};
use crate::importer::importer_trait::{AnomalyLog, RecordNormalizer};
use std::path::Path;
use tracing::{info, info_span};

pub struct CatalogPreprocessor {
    normalizer: Box<dyn RecordNormalizer>,
}

impl CatalogPreprocessor {
    pub fn new(normalizer: Box<dyn RecordNormalizer>) -> Self {
        Self { normalizer }
    }

    /// 使用映射表构造（默认字段映射器）
    pub fn for_schema(schema: &'static VendorSchema) -> Self {
        Self::new(Box::new(FieldMapper::new(schema)))
    }

    /// 规范化整份目录
    pub fn preprocess(&self, raws: &[RawRecord], log: &dyn AnomalyLog) -> Vec<NormalizedRecord> {
        let vendor = self.normalizer.vendor();
        let span = info_span!("preprocess", vendor = %vendor);
        let _guard = span.enter();

        let records: Vec<NormalizedRecord> = raws
            .iter()
            .enumerate()
            .map(|(index, raw)| self.normalizer.normalize(raw, index, log))
            .collect();

        info!(records = records.len(), "目录预处理完成");
        records
    }

    /// 规范化并写出快照（快照路径为空时不落盘）
    pub fn preprocess_with_snapshot(
        &self,
        raws: &[RawRecord],
        log: &dyn AnomalyLog,
        snapshot: Option<&Path>,
    ) -> ImportResult<Vec<NormalizedRecord>> {
        let records = self.preprocess(raws, log);
        if let Some(path) = snapshot {
            save_snapshot(path, &records)?;
        }
        Ok(records)
    }
}

/// 写出规范化快照（缩进 JSON，字段按出现顺序）
pub fn save_snapshot(path: &Path, records: &[NormalizedRecord]) -> ImportResult<()> {
    write_json_atomic(path, records)?;
    info!(file = %path.display(), records = records.len(), "快照已写出");
    Ok(())
}

/// 读取规范化快照
pub fn load_snapshot(path: &Path) -> ImportResult<Vec<NormalizedRecord>> {
    read_json(path)
}
