// ==========================================
// 产品目录对齐系统 - 导入层 Trait
// ==========================================
// 职责: 定义导入层接口（不包含实现）
// ==========================================

use crate::domain::record::{NormalizedRecord, RawRecord};
use crate::domain::types::Vendor;
use crate::importer::error::{Anomaly, ImportResult};

// ==========================================
// AnomalyLog Trait
// ==========================================
// 用途: 显式传入的异常日志协作者（替代全局 logger）
// 实现者: TracingAnomalyLog, MemoryAnomalyLog, TeeAnomalyLog
pub trait AnomalyLog {
    /// 记录一条异常（INFO 级别，仅供参考，下游不读取）
    fn record(&self, anomaly: &Anomaly);
}

// ==========================================
// CatalogSource Trait
// ==========================================
// 用途: 外部抓取器产出的原始目录
// 实现者: DirectoryCatalogSource
pub trait CatalogSource {
    /// 读取某供应商的原始记录序列
    ///
    /// # 返回
    /// - Ok(Vec<RawRecord>): 原始记录（无序，按文件顺序返回）
    /// - Err: 文件缺失、JSON 格式错误
    fn load_catalog(&self, vendor: Vendor) -> ImportResult<Vec<RawRecord>>;
}

// ==========================================
// RecordNormalizer Trait
// ==========================================
// 用途: 单条记录规范化
// 实现者: FieldMapper
pub trait RecordNormalizer {
    /// 将原始记录转换为规范化记录
    ///
    /// # 参数
    /// - raw: 原始记录
    /// - index: 目录内位置（无显示名时用于标识记录）
    /// - log: 异常日志
    ///
    /// # 说明
    /// - 不返回错误: 每个字段独立转换，失败字段缺省并记录日志
    fn normalize(&self, raw: &RawRecord, index: usize, log: &dyn AnomalyLog) -> NormalizedRecord;

    /// 所属供应商
    fn vendor(&self) -> Vendor;
}
