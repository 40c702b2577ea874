// ==========================================
// 产品目录对齐系统 - 运行配置
// ==========================================
// 职责: 数据目录 / 相似度阈值与度量 / 本体 IRI / 输出文件名
// 存储: 可选 JSON 文件，缺省字段取默认值
// ==========================================

use crate::domain::types::Vendor;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// SimilarityMetric - 相似度度量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    Indel,       // 基于最长公共子序列的归一化相似度
    Levenshtein, // 归一化编辑距离
    JaroWinkler,
}

// ==========================================
// AlignmentConfig - 对齐运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// 抓取数据与输出文件所在目录
    pub data_dir: PathBuf,

    /// 相似度匹配阈值（严格大于）
    pub similarity_threshold: f64,

    pub similarity_metric: SimilarityMetric,

    /// 探索模式: 追加相似度匹配与别名标识
    pub exploration: bool,

    pub conrad_iri: String,
    pub infinity_iri: String,

    /// 是否添加人工速度子类
    pub add_speed_classes: bool,

    pub conrad_snapshot: String,
    pub infinity_snapshot: String,
    pub gold_standard_file: String,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("../data"),
            similarity_threshold: 0.8,
            similarity_metric: SimilarityMetric::Indel,
            exploration: false,
            conrad_iri: "http://example.org/conrad.owl".to_string(),
            infinity_iri: "http://example.org/infinity.owl".to_string(),
            add_speed_classes: true,
            conrad_snapshot: "conrad_data_dump.json".to_string(),
            infinity_snapshot: "infinity_data_dump.json".to_string(),
            gold_standard_file: "gold_standard.csv".to_string(),
        }
    }
}

impl AlignmentConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)?;
        let config: AlignmentConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ImportError::ConfigValueError {
                key: "similarity_threshold".to_string(),
                value: self.similarity_threshold.to_string(),
                message: "阈值必须位于 [0, 1]".to_string(),
            });
        }
        for (key, value) in [
            ("conrad_iri", &self.conrad_iri),
            ("infinity_iri", &self.infinity_iri),
        ] {
            if value.trim().is_empty() {
                return Err(ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: value.clone(),
                    message: "IRI 不能为空".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// 供应商本体 IRI
    pub fn iri_for(&self, vendor: Vendor) -> &str {
        match vendor {
            Vendor::Conrad => &self.conrad_iri,
            Vendor::Infinity => &self.infinity_iri,
        }
    }

    /// 供应商规范化快照路径
    pub fn snapshot_path(&self, vendor: Vendor) -> PathBuf {
        match vendor {
            Vendor::Conrad => self.data_path(&self.conrad_snapshot),
            Vendor::Infinity => self.data_path(&self.infinity_snapshot),
        }
    }

    /// 供应商本体 JSON 输出路径
    pub fn ontology_path(&self, vendor: Vendor) -> PathBuf {
        self.data_path(&format!("{}_ontology.json", vendor.as_str()))
    }

    pub fn gold_standard_path(&self) -> PathBuf {
        self.data_path(&self.gold_standard_file)
    }
}
