// ==========================================
// 产品目录对齐系统 - 记录领域模型
// ==========================================
// 职责: 原始记录 / 规范化记录 / 标识符 / 对应关系
// 红线: 原始记录产出后只读；规范化记录字段要么完整转换，要么缺省
// ==========================================

use crate::domain::types::{RelationKind, TargetType};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ==========================================
// RawValue - 原始字段值
// ==========================================
// 抓取器输出: 标量字符串 或 字符串列表（多个 DOM 元素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(values: Vec<&str>) -> Self {
        RawValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<RawValue> for Value {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Text(s) => Value::String(s),
            RawValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
        }
    }
}

// ==========================================
// RawRecord - 原始记录
// ==========================================
// 供应商原生字段名 → 值；保留抓取时的字段顺序
// JSON null / 空白字符串 / 空列表 一律视为缺省
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式构造（测试与夹具使用）
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: RawValue) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// 读取字段值；缺省、null、空白均返回 None
    pub fn get(&self, key: &str) -> Option<RawValue> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => {
                if s.trim().is_empty() {
                    None
                } else {
                    Some(RawValue::Text(s.clone()))
                }
            }
            Value::Array(items) => {
                let values: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
                if values.is_empty() {
                    None
                } else {
                    Some(RawValue::List(values))
                }
            }
            other => scalar_to_string(other).map(RawValue::Text),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 字段名（按出现顺序）
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ==========================================
// FieldValue - 规范化字段值
// ==========================================
// 顺序敏感: untagged 反序列化时整数优先于浮点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn target_type(&self) -> TargetType {
        match self {
            FieldValue::Integer(_) => TargetType::Integer,
            FieldValue::Float(_) => TargetType::Float,
            FieldValue::Text(_) => TargetType::String,
            FieldValue::List(_) => TargetType::ListOfString,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 数值读取（整数与浮点统一为 f64）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// 作为匹配键读取: 列表取首元素，数值转字符串
    pub fn as_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::List(items) => items.first().cloned(),
            FieldValue::Integer(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

// ==========================================
// NormalizedRecord - 规范化记录
// ==========================================
// 规范字段名 → 类型化值；字段顺序即写入顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入字段；同名字段原位覆盖
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NormalizedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = NormalizedRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of canonical field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = NormalizedRecord::new();
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    record.insert(&name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

// ==========================================
// Identifier - 跨目录匹配标识
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub product_name: String,
    pub match_key: String,
    pub record_index: usize, // 目录内位置（决定实例名）
}

impl Identifier {
    pub fn new(product_name: &str, match_key: &str, record_index: usize) -> Self {
        Self {
            product_name: product_name.to_string(),
            match_key: match_key.to_string(),
            record_index,
        }
    }
}

// ==========================================
// Correspondence - 对应关系（金标准原子单位）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correspondence {
    pub entity_a: String,
    pub entity_b: String,
    pub relation: RelationKind,
}

impl Correspondence {
    pub fn equivalence(entity_a: &str, entity_b: &str) -> Self {
        Self {
            entity_a: entity_a.to_string(),
            entity_b: entity_b.to_string(),
            relation: RelationKind::Equivalence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_null_and_blank_as_absent() {
        let record: RawRecord =
            serde_json::from_str(r#"{"name": "MCU", "price": null, "Typ": "  ", "Serie": []}"#)
                .unwrap();

        assert_eq!(record.get("name"), Some(RawValue::Text("MCU".to_string())));
        assert_eq!(record.get("price"), None);
        assert_eq!(record.get("Typ"), None);
        assert_eq!(record.get("Serie"), None);
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_raw_record_keeps_key_order() {
        let record: RawRecord =
            serde_json::from_str(r#"{"z": "1", "a": "2", "m": ["3", "4"]}"#).unwrap();

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(
            record.get("m"),
            Some(RawValue::List(vec!["3".to_string(), "4".to_string()]))
        );
    }

    #[test]
    fn test_normalized_record_serde_preserves_types_and_order() {
        let mut record = NormalizedRecord::new();
        record.insert("price", FieldValue::Float(12.34));
        record.insert("number_ios", FieldValue::Integer(16));
        record.insert("program_memory_size_kb", FieldValue::Float(256.0));
        record.insert("connectivity", FieldValue::List(vec!["I²C".into(), "SPI".into()]));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(r#"{"price":12.34,"number_ios":16"#));

        let back: NormalizedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.get("program_memory_size_kb"), Some(&FieldValue::Float(256.0)));
    }

    #[test]
    fn test_normalized_record_insert_overwrites_in_place() {
        let mut record = NormalizedRecord::new();
        record.insert("a", FieldValue::Integer(1));
        record.insert("b", FieldValue::Integer(2));
        record.insert("a", FieldValue::Integer(3));

        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn test_field_value_as_key() {
        assert_eq!(FieldValue::Text("X".into()).as_key(), Some("X".to_string()));
        assert_eq!(
            FieldValue::List(vec!["A".into(), "B".into()]).as_key(),
            Some("A".to_string())
        );
        assert_eq!(FieldValue::List(vec![]).as_key(), None);
    }
}
