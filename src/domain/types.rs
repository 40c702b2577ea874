// ==========================================
// 产品目录对齐系统 - 领域类型定义
// ==========================================
// 职责: 供应商 / 目标类型 / 关系类型 等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 供应商 (Vendor)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Conrad,   // conrad.de
    Infinity, // infinity-semiconductor.com
}

impl Vendor {
    /// 小写名称（文件名匹配、实例命名前缀）
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Conrad => "conrad",
            Vendor::Infinity => "infinity",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 目标类型 (Target Type)
// ==========================================
// 规范字段强制转换后的标量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    String,
    Integer,
    Float,
    ListOfString,
}

impl TargetType {
    /// 本体数据属性的值域（列表字段的元素类型为 string）
    pub fn element_type(&self) -> TargetType {
        match self {
            TargetType::ListOfString => TargetType::String,
            other => *other,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::String => write!(f, "string"),
            TargetType::Integer => write!(f, "integer"),
            TargetType::Float => write!(f, "float"),
            TargetType::ListOfString => write!(f, "list_of_string"),
        }
    }
}

// ==========================================
// 关系类型 (Relation Kind)
// ==========================================
// 当前领域仅有 equivalence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Equivalence,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Equivalence => "equivalence",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "equivalence" => Ok(RelationKind::Equivalence),
            other => Err(format!("未知关系类型: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_kind_parse() {
        assert_eq!(
            "equivalence".parse::<RelationKind>(),
            Ok(RelationKind::Equivalence)
        );
        assert!("subsumption".parse::<RelationKind>().is_err());
    }

    #[test]
    fn test_list_element_type() {
        assert_eq!(TargetType::ListOfString.element_type(), TargetType::String);
        assert_eq!(TargetType::Float.element_type(), TargetType::Float);
    }
}
