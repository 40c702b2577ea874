// ==========================================
// 产品目录对齐系统 - 异常日志实现
// ==========================================
// 职责: tracing 输出 / 内存收集 / 双路转发
// ==========================================

use crate::importer::error::Anomaly;
use crate::importer::importer_trait::AnomalyLog;
use std::cell::RefCell;
use tracing::info;

// ==========================================
// TracingAnomalyLog - 写入 tracing（INFO）
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnomalyLog;

impl AnomalyLog for TracingAnomalyLog {
    fn record(&self, anomaly: &Anomaly) {
        info!(kind = anomaly.kind(), "{}", anomaly);
    }
}

// ==========================================
// MemoryAnomalyLog - 内存收集（测试 / 运行报告计数）
// ==========================================
#[derive(Debug, Default)]
pub struct MemoryAnomalyLog {
    entries: RefCell<Vec<Anomaly>>,
}

impl MemoryAnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Anomaly> {
        self.entries.borrow().clone()
    }

    /// 日志正文
    pub fn lines(&self) -> Vec<String> {
        self.entries.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// 按类别计数
    pub fn count_kind(&self, kind: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|a| a.kind() == kind)
            .count()
    }

    /// 转换类异常（单位不识别 / 数值或区间格式错误）
    pub fn coercion_failures(&self) -> Vec<Anomaly> {
        self.entries
            .borrow()
            .iter()
            .filter(|a| a.is_coercion_failure())
            .cloned()
            .collect()
    }
}

impl AnomalyLog for MemoryAnomalyLog {
    fn record(&self, anomaly: &Anomaly) {
        self.entries.borrow_mut().push(anomaly.clone());
    }
}

// ==========================================
// TeeAnomalyLog - 同时写入两个日志
// ==========================================
pub struct TeeAnomalyLog<'a> {
    first: &'a dyn AnomalyLog,
    second: &'a dyn AnomalyLog,
}

impl<'a> TeeAnomalyLog<'a> {
    pub fn new(first: &'a dyn AnomalyLog, second: &'a dyn AnomalyLog) -> Self {
        Self { first, second }
    }
}

impl AnomalyLog for TeeAnomalyLog<'_> {
    fn record(&self, anomaly: &Anomaly) {
        self.first.record(anomaly);
        self.second.record(anomaly);
    }
}
