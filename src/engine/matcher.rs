// ==========================================
// 产品目录对齐系统 - 匹配器
// ==========================================
// 职责: 两个目录标识符集合之间的精确匹配 / 相似度匹配
// 红线: 笛卡尔积比较，不去重，输出按 A 主序 B 次序，不再排序
// ==========================================

use crate::config::alignment_config::SimilarityMetric;
use crate::domain::record::Identifier;
use serde::Serialize;
use tracing::{info, instrument};

// ==========================================
// MatchPair - 一对匹配的标识符
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPair {
    pub left: Identifier,
    pub right: Identifier,
    pub score: f64, // 精确匹配恒为 1.0
}

impl MatchPair {
    /// 交换左右（对称性检查使用）
    pub fn swapped(&self) -> Self {
        Self {
            left: self.right.clone(),
            right: self.left.clone(),
            score: self.score,
        }
    }
}

/// 一次匹配的全部结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchSet {
    pub exact: Vec<MatchPair>,
    /// 仅探索模式下填充
    pub similar: Vec<MatchPair>,
}

// ==========================================
// Matcher
// ==========================================
pub struct Matcher {
    threshold: f64,
    metric: SimilarityMetric,
}

impl Matcher {
    pub fn new(threshold: f64, metric: SimilarityMetric) -> Self {
        Self { threshold, metric }
    }

    /// 精确匹配: 匹配键逐字节相等（区分大小写）
    #[instrument(skip_all, fields(a = a.len(), b = b.len()))]
    pub fn exact_matches(&self, a: &[Identifier], b: &[Identifier]) -> Vec<MatchPair> {
        let mut pairs = Vec::new();
        for left in a {
            for right in b {
                if left.match_key == right.match_key {
                    pairs.push(MatchPair {
                        left: left.clone(),
                        right: right.clone(),
                        score: 1.0,
                    });
                }
            }
        }
        info!(matches = pairs.len(), "精确匹配完成");
        pairs
    }

    /// 相似度匹配: 相似度严格大于阈值
    #[instrument(skip_all, fields(a = a.len(), b = b.len(), metric = ?self.metric))]
    pub fn similarity_matches(&self, a: &[Identifier], b: &[Identifier]) -> Vec<MatchPair> {
        let mut pairs = Vec::new();
        for left in a {
            for right in b {
                let score = similarity(self.metric, &left.match_key, &right.match_key);
                if score > self.threshold {
                    pairs.push(MatchPair {
                        left: left.clone(),
                        right: right.clone(),
                        score,
                    });
                }
            }
        }
        info!(matches = pairs.len(), threshold = self.threshold, "相似度匹配完成");
        pairs
    }

    /// 精确匹配 + （探索模式）相似度匹配
    pub fn find_matches(&self, a: &[Identifier], b: &[Identifier], exploration: bool) -> MatchSet {
        MatchSet {
            exact: self.exact_matches(a, b),
            similar: if exploration {
                self.similarity_matches(a, b)
            } else {
                Vec::new()
            },
        }
    }
}

// ==========================================
// 相似度度量（0.0 ~ 1.0）
// ==========================================

/// 按度量计算归一化相似度
pub fn similarity(metric: SimilarityMetric, a: &str, b: &str) -> f64 {
    match metric {
        SimilarityMetric::Indel => indel_similarity(a, b),
        SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
        SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b),
    }
}

/// Indel 归一化相似度: 1 - (|a| + |b| - 2·LCS) / (|a| + |b|)
///
/// 只允许插入/删除的编辑距离，两个空串视为完全相同
pub fn indel_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    rapidfuzz::distance::indel::normalized_similarity(a.chars(), b.chars())
}
