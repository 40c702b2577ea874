// ==========================================
// 产品目录对齐系统 - 本体填充
// ==========================================
// 职责: 由映射表生成分类树与数据属性声明，由规范化记录生成实例三元组
// 输出: 经 OntologySink 交给外部本体编辑器（内存实现用于测试与 CLI）
// 红线: 写入失败对该供应商是致命的，向上返回 SinkFailure
// ==========================================

use crate::config::vendor_schema::VendorSchema;
use crate::domain::record::{FieldValue, NormalizedRecord};
use crate::domain::types::{TargetType, Vendor};
use crate::engine::alignment::{entity_iri, instance_name};
use crate::importer::error::{Anomaly, ImportError, ImportResult};
use crate::importer::file_parser::write_json_atomic;
use crate::importer::importer_trait::AnomalyLog;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const ROOT_CLASS: &str = "microcontroller";
pub const UNDEFINED_SPEED_CLASS: &str = "undefined_speed_controller";

// 速度子类: (类名, 下限 MHz, 上限 MHz)，闭区间
const SPEED_BANDS: [(&str, f64, f64); 3] = [
    ("low_speed_controller", 1.0, 25.0),
    ("medium_speed_controller", 26.0, 100.0),
    ("high_speed_controller", 101.0, f64::INFINITY),
];

// ==========================================
// 本体请求数据结构
// ==========================================

/// 分类树条目（根类 parent 为 None）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub class: String,
    pub parent: Option<String>,
}

/// 数据属性声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatatypeProperty {
    pub name: String,
    pub domain: String,
    pub range: TargetType,
    /// 非多值字段为函数型属性
    pub functional: bool,
}

/// 实例三元组 (实例, 属性, 值)；值恒为标量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceTriple {
    pub property: String,
    pub value: FieldValue,
}

/// 一次 add_instances 请求: 实例名 + 所属类 + 三元组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyInstance {
    pub name: String,
    pub class: String,
    pub triples: Vec<InstanceTriple>,
}

impl OntologyInstance {
    /// 某属性的全部值
    pub fn values(&self, property: &str) -> Vec<&FieldValue> {
        self.triples
            .iter()
            .filter(|t| t.property == property)
            .map(|t| &t.value)
            .collect()
    }
}

// ==========================================
// OntologySink - 外部本体编辑器接口
// ==========================================
pub trait OntologySink {
    fn add_taxonomy(&mut self, entries: &[TaxonomyEntry]) -> ImportResult<()>;

    fn add_datatype_properties(&mut self, properties: &[DatatypeProperty]) -> ImportResult<()>;

    fn add_instances(&mut self, instance: OntologyInstance) -> ImportResult<()>;
}

// ==========================================
// OntologyPopulator - 请求生成器
// ==========================================
pub struct OntologyPopulator {
    schema: &'static VendorSchema,
    add_speed_classes: bool,
}

impl OntologyPopulator {
    pub fn new(schema: &'static VendorSchema, add_speed_classes: bool) -> Self {
        Self {
            schema,
            add_speed_classes,
        }
    }

    /// 分类树: 根类，可选追加速度子类
    pub fn taxonomy(&self) -> Vec<TaxonomyEntry> {
        let mut entries = vec![TaxonomyEntry {
            class: ROOT_CLASS.to_string(),
            parent: None,
        }];
        if self.add_speed_classes {
            let subclasses = std::iter::once(UNDEFINED_SPEED_CLASS)
                .chain(SPEED_BANDS.iter().map(|(class, _, _)| *class));
            entries.extend(subclasses.map(|class| TaxonomyEntry {
                class: class.to_string(),
                parent: Some(ROOT_CLASS.to_string()),
            }));
        }
        entries
    }

    /// 数据属性: 函数型在前，非函数型在后
    pub fn datatype_properties(&self) -> Vec<DatatypeProperty> {
        let (functional, multi): (Vec<_>, Vec<_>) = self
            .schema
            .canonical_fields()
            .into_iter()
            .partition(|(_, _, multi_valued)| !multi_valued);

        functional
            .into_iter()
            .chain(multi)
            .map(|(name, target_type, multi_valued)| DatatypeProperty {
                name: name.to_string(),
                domain: ROOT_CLASS.to_string(),
                range: target_type.element_type(),
                functional: !multi_valued,
            })
            .collect()
    }

    /// 按时钟频率选择父类；无频率或不落在任何区间时为未定义速度类
    pub fn parent_for_speed(&self, record: &NormalizedRecord) -> &'static str {
        if !self.add_speed_classes {
            return ROOT_CLASS;
        }
        let Some(speed) = record.get(self.schema.clock_field).and_then(FieldValue::as_f64) else {
            return UNDEFINED_SPEED_CLASS;
        };
        SPEED_BANDS
            .iter()
            .find(|(_, low, high)| *low <= speed && speed <= *high)
            .map(|(class, _, _)| *class)
            .unwrap_or(UNDEFINED_SPEED_CLASS)
    }

    /// 单条记录 → 实例请求（列表字段每个元素一条三元组）
    pub fn instance_for(
        &self,
        record: &NormalizedRecord,
        index: usize,
        log: &dyn AnomalyLog,
    ) -> OntologyInstance {
        let name = instance_name(self.schema.vendor, index);
        let class = self.parent_for_speed(record).to_string();
        let mut triples = Vec::new();

        for (field, _, _) in self.schema.canonical_fields() {
            match record.get(field) {
                None => log.record(&Anomaly::MissingField {
                    field: field.to_string(),
                    record: format!("product number {}", name),
                }),
                Some(FieldValue::List(items)) => {
                    triples.extend(items.iter().map(|item| InstanceTriple {
                        property: field.to_string(),
                        value: FieldValue::Text(item.clone()),
                    }));
                }
                Some(value) => triples.push(InstanceTriple {
                    property: field.to_string(),
                    value: value.clone(),
                }),
            }
        }

        OntologyInstance {
            name,
            class,
            triples,
        }
    }

    /// 向 sink 依次发送分类树、数据属性、每条记录的实例
    ///
    /// # 返回
    /// - Ok(n): 写入的实例数
    /// - Err(SinkFailure): sink 拒绝任一请求
    #[instrument(skip_all, fields(vendor = %self.schema.vendor, records = records.len()))]
    pub fn populate(
        &self,
        sink: &mut dyn OntologySink,
        records: &[NormalizedRecord],
        log: &dyn AnomalyLog,
    ) -> ImportResult<usize> {
        sink.add_taxonomy(&self.taxonomy())?;
        sink.add_datatype_properties(&self.datatype_properties())?;
        for (index, record) in records.iter().enumerate() {
            sink.add_instances(self.instance_for(record, index, log))?;
        }
        info!(instances = records.len(), "本体填充完成");
        Ok(records.len())
    }
}

// ==========================================
// InMemoryOntology - 内存本体（可序列化为 JSON）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryOntology {
    pub vendor: Vendor,
    pub iri: String,
    pub classes: Vec<TaxonomyEntry>,
    pub properties: Vec<DatatypeProperty>,
    pub instances: Vec<OntologyInstance>,
}

impl InMemoryOntology {
    pub fn new(vendor: Vendor, iri: &str) -> Self {
        Self {
            vendor,
            iri: iri.to_string(),
            classes: Vec::new(),
            properties: Vec::new(),
            instances: Vec::new(),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.class == class)
    }

    fn property(&self, name: &str) -> Option<&DatatypeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn failure(&self, message: String) -> ImportError {
        ImportError::SinkFailure {
            vendor: self.vendor.to_string(),
            message,
        }
    }

    /// 按属性值查找第一个实例
    pub fn search_one(&self, property: &str, value: &str) -> Option<&OntologyInstance> {
        self.instances.iter().find(|i| {
            i.triples
                .iter()
                .any(|t| t.property == property && t.value.as_key().as_deref() == Some(value))
        })
    }

    /// 实例的完整 IRI
    pub fn instance_iri(&self, index: usize) -> String {
        entity_iri(&self.iri, self.vendor, index)
    }

    /// 写出 JSON（缩进格式）
    pub fn save_json(&self, path: &Path) -> ImportResult<()> {
        write_json_atomic(path, self)?;
        info!(file = %path.display(), instances = self.instances.len(), "本体已写出");
        Ok(())
    }
}

impl OntologySink for InMemoryOntology {
    fn add_taxonomy(&mut self, entries: &[TaxonomyEntry]) -> ImportResult<()> {
        for entry in entries {
            if let Some(parent) = &entry.parent {
                if !self.has_class(parent) {
                    return Err(self.failure(format!("父类 {} 未声明", parent)));
                }
            }
            if !self.has_class(&entry.class) {
                self.classes.push(entry.clone());
            }
        }
        Ok(())
    }

    fn add_datatype_properties(&mut self, properties: &[DatatypeProperty]) -> ImportResult<()> {
        for property in properties {
            if !self.has_class(&property.domain) {
                return Err(self.failure(format!(
                    "属性 {} 的定义域 {} 未声明",
                    property.name, property.domain
                )));
            }
            if self.property(&property.name).is_none() {
                self.properties.push(property.clone());
            }
        }
        Ok(())
    }

    fn add_instances(&mut self, instance: OntologyInstance) -> ImportResult<()> {
        if !self.has_class(&instance.class) {
            return Err(self.failure(format!(
                "实例 {} 的类 {} 未声明",
                instance.name, instance.class
            )));
        }
        for triple in &instance.triples {
            let property = self.property(&triple.property).ok_or_else(|| {
                self.failure(format!("属性 {} 未声明", triple.property))
            })?;
            if property.functional && instance.values(&triple.property).len() > 1 {
                return Err(self.failure(format!(
                    "函数型属性 {} 在实例 {} 上有多个值",
                    triple.property, instance.name
                )));
            }
        }
        self.instances.push(instance);
        Ok(())
    }
}
