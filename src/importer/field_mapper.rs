// ==========================================
// 产品目录对齐系统 - 字段映射器实现
// ==========================================
// 职责: 源字段 → 规范字段映射 + 类型/单位转换（单条记录）
// 红线: 单字段失败只影响该字段；每个缺省字段对应一条日志；不向调用方抛错
// ==========================================

use crate::config::vendor_schema::{FieldRule, FieldSpec, PriceFormat, RangeSpec, VendorSchema};
use crate::domain::record::{FieldValue, NormalizedRecord, RawRecord, RawValue};
use crate::domain::types::{TargetType, Vendor};
use crate::importer::data_cleaner::{DataCleaner, UnitFailure};
use crate::importer::error::Anomaly;
use crate::importer::importer_trait::{AnomalyLog, RecordNormalizer};

pub struct FieldMapper {
    schema: &'static VendorSchema,
    cleaner: DataCleaner,
}

impl RecordNormalizer for FieldMapper {
    fn normalize(&self, raw: &RawRecord, index: usize, log: &dyn AnomalyLog) -> NormalizedRecord {
        let record_name = self.display_name(raw, index);
        let mut out = NormalizedRecord::new();

        // 1. 单字段映射
        for spec in &self.schema.fields {
            match raw.get(spec.source_field) {
                None => log.record(&missing(spec.canonical_name, &record_name)),
                Some(value) => {
                    if let Some(v) = self.coerce_field(spec, &value, &record_name, log) {
                        out.insert(spec.canonical_name, v);
                    }
                }
            }
        }

        // 2. 区间字段拆分
        for range in &self.schema.ranges {
            match raw.get(range.source_field) {
                None => log.record(&missing(range.name, &record_name)),
                Some(value) => self.coerce_range(range, &value, &record_name, &mut out, log),
            }
        }

        // 3. 未映射字段原样透传（Modell / OTHER NAMES / url 等）
        for key in raw.keys() {
            if self.schema.consumes_source(key) || out.contains(key) {
                continue;
            }
            if let Some(value) = raw.get(key) {
                let passthrough = match value {
                    RawValue::Text(s) => FieldValue::Text(self.cleaner.clean_text(&s)),
                    RawValue::List(items) => FieldValue::List(items),
                };
                out.insert(key, passthrough);
            }
        }

        out
    }

    fn vendor(&self) -> Vendor {
        self.schema.vendor
    }
}

impl FieldMapper {
    pub fn new(schema: &'static VendorSchema) -> Self {
        Self {
            schema,
            cleaner: DataCleaner,
        }
    }

    /// 记录显示名（日志定位用）
    pub fn display_name(&self, raw: &RawRecord, index: usize) -> String {
        self.schema
            .field(self.schema.display_field)
            .and_then(|spec| raw.get(spec.source_field))
            .and_then(|value| self.cleaner.reduce_to_scalar(&value))
            .unwrap_or_else(|| format!("record #{}", index))
    }

    /// 单字段转换
    fn coerce_field(
        &self,
        spec: &FieldSpec,
        value: &RawValue,
        record: &str,
        log: &dyn AnomalyLog,
    ) -> Option<FieldValue> {
        match spec.rule {
            FieldRule::List(delimiter) => {
                let items = self.cleaner.split_list(value, delimiter);
                if items.is_empty() {
                    log.record(&missing(spec.canonical_name, record));
                    None
                } else {
                    Some(FieldValue::List(items))
                }
            }
            FieldRule::Plain => self.scalar(spec, value, record, log).map(FieldValue::Text),
            FieldRule::Number => {
                let text = self.scalar(spec, value, record, log)?;
                self.parse_number(spec, &text, &text, record, log)
            }
            FieldRule::StripSuffix(token) => {
                let text = self.scalar(spec, value, record, log)?;
                if let Some(unit) = self.cleaner.pair_unit(value) {
                    if !suffix_accepts_unit(token, unit) {
                        log.record(&Anomaly::UnitMismatch {
                            field: spec.canonical_name.to_string(),
                            value: format!("{} {}", text, unit),
                            record: record.to_string(),
                        });
                        return None;
                    }
                }
                let numeric = self.cleaner.strip_suffix_token(&text, token);
                self.parse_number(spec, numeric, &text, record, log)
            }
            FieldRule::Price(format) => {
                let text = self.scalar(spec, value, record, log)?;
                match self.cleaner.parse_price(&text, format) {
                    Some(price) => self.typed_from_f64(spec, price, &text, record, log),
                    None => {
                        log.record(&malformed(spec.canonical_name, &text, record));
                        None
                    }
                }
            }
            FieldRule::MemoryKb | FieldRule::ClockMhz { .. } => {
                // 单位参与换算，[值, 单位] 不折叠
                let Some(text) = self.cleaner.join_value_unit(value) else {
                    log.record(&missing(spec.canonical_name, record));
                    return None;
                };
                let converted = match spec.rule {
                    FieldRule::ClockMhz { bare_mhz: true } => self.cleaner.parse_clock_mhz_bare(&text),
                    FieldRule::ClockMhz { bare_mhz: false } => self.cleaner.parse_clock_mhz(&text),
                    _ => self.cleaner.parse_memory_kb(&text),
                };
                match converted {
                    Ok(v) => self.typed_from_f64(spec, v, &text, record, log),
                    Err(UnitFailure::Unrecognized) => {
                        log.record(&Anomaly::UnitMismatch {
                            field: spec.canonical_name.to_string(),
                            value: text,
                            record: record.to_string(),
                        });
                        None
                    }
                    Err(UnitFailure::Malformed) => {
                        log.record(&malformed(spec.canonical_name, &text, record));
                        None
                    }
                }
            }
        }
    }

    /// 标量化（[值, 单位] 折叠）；折叠后为空视为缺省
    fn scalar(
        &self,
        spec: &FieldSpec,
        value: &RawValue,
        record: &str,
        log: &dyn AnomalyLog,
    ) -> Option<String> {
        let scalar = self.cleaner.reduce_to_scalar(value);
        if scalar.is_none() {
            log.record(&missing(spec.canonical_name, record));
        }
        scalar
    }

    /// 按目标类型解析数值文本
    fn parse_number(
        &self,
        spec: &FieldSpec,
        numeric: &str,
        original: &str,
        record: &str,
        log: &dyn AnomalyLog,
    ) -> Option<FieldValue> {
        let parsed = parse_typed(&self.cleaner, spec.target_type, numeric);
        if parsed.is_none() {
            log.record(&malformed(spec.canonical_name, original, record));
        }
        parsed
    }

    /// 换算结果按目标类型落值（整数目标不接受小数）
    fn typed_from_f64(
        &self,
        spec: &FieldSpec,
        value: f64,
        original: &str,
        record: &str,
        log: &dyn AnomalyLog,
    ) -> Option<FieldValue> {
        match spec.target_type {
            TargetType::Integer if value.fract() == 0.0 => Some(FieldValue::Integer(value as i64)),
            TargetType::Integer => {
                log.record(&malformed(spec.canonical_name, original, record));
                None
            }
            _ => Some(FieldValue::Float(value)),
        }
    }

    /// 区间拆分: 两端都解析成功才写入 min/max，否则两者都缺省并记一条日志
    fn coerce_range(
        &self,
        range: &RangeSpec,
        value: &RawValue,
        record: &str,
        out: &mut NormalizedRecord,
        log: &dyn AnomalyLog,
    ) {
        let Some(text) = self.cleaner.reduce_to_scalar(value) else {
            log.record(&missing(range.name, record));
            return;
        };

        let bounds = self
            .cleaner
            .split_range(&text, range.delimiter)
            .and_then(|(low, high)| {
                let low = self.parse_bound(range, low)?;
                let high = self.parse_bound(range, high)?;
                Some((low, high))
            });

        match bounds {
            Some((low, high)) => {
                out.insert(range.max_field, high);
                out.insert(range.min_field, low);
            }
            None => log.record(&Anomaly::MalformedRange {
                field: range.name.to_string(),
                value: text,
                record: record.to_string(),
            }),
        }
    }

    fn parse_bound(&self, range: &RangeSpec, half: &str) -> Option<FieldValue> {
        let numeric = self.cleaner.strip_suffix_token(half, range.unit);
        parse_typed(&self.cleaner, range.target_type, numeric)
    }

    // ==========================================
    // 反向编码: 规范化记录 → 供应商原生格式
    // ==========================================
    // 用途: 快照回灌 / 规范化幂等校验
    pub fn encode_raw(&self, record: &NormalizedRecord) -> RawRecord {
        let mut raw = RawRecord::new();

        for spec in &self.schema.fields {
            if let Some(value) = record.get(spec.canonical_name) {
                raw.insert(spec.source_field, encode_value(spec, value));
            }
        }

        for range in &self.schema.ranges {
            if let (Some(min), Some(max)) = (record.get(range.min_field), record.get(range.max_field)) {
                let text = format!(
                    "{}{} {} {}{}",
                    min, range.unit, range.delimiter, max, range.unit
                );
                raw.insert(range.source_field, RawValue::Text(text));
            }
        }

        let canonical: Vec<&str> = self
            .schema
            .canonical_fields()
            .into_iter()
            .map(|(name, _, _)| name)
            .collect();
        for (name, value) in record.iter() {
            if canonical.contains(&name) {
                continue;
            }
            let passthrough = match value {
                FieldValue::List(items) => RawValue::List(items.clone()),
                other => RawValue::Text(other.to_string()),
            };
            raw.insert(name, passthrough);
        }

        raw
    }
}

fn parse_typed(cleaner: &DataCleaner, target: TargetType, numeric: &str) -> Option<FieldValue> {
    match target {
        TargetType::Integer => cleaner.parse_integer(numeric).map(FieldValue::Integer),
        TargetType::Float => cleaner.parse_float(numeric).map(FieldValue::Float),
        TargetType::String => cleaner
            .normalize_null(Some(numeric.to_string()))
            .map(FieldValue::Text),
        TargetType::ListOfString => cleaner
            .normalize_null(Some(numeric.to_string()))
            .map(|s| FieldValue::List(vec![s])),
    }
}

fn encode_value(spec: &FieldSpec, value: &FieldValue) -> RawValue {
    if let FieldValue::List(items) = value {
        return RawValue::List(items.clone());
    }
    let text = match spec.rule {
        FieldRule::StripSuffix(token) => format!("{}{}", value, token),
        FieldRule::Price(PriceFormat::DecimalComma) => {
            format!("{} €", value.to_string().replace('.', ","))
        }
        FieldRule::Price(PriceFormat::DecimalPoint) => format!("${}", value),
        FieldRule::MemoryKb => format!("{} KB", value),
        FieldRule::ClockMhz { .. } => format!("{}MHz", value),
        FieldRule::Plain | FieldRule::Number | FieldRule::List(_) => value.to_string(),
    };
    RawValue::Text(text)
}

// [值, 单位] 中的单位必须与后缀标记一致（"°" 接受 "°C"，"-Bit" 接受 "Bit"）
fn suffix_accepts_unit(token: &str, unit: &str) -> bool {
    let expected = token.trim_matches(|c: char| c == ' ' || c == '-');
    !unit.is_empty() && unit.starts_with(expected)
}

fn missing(field: &str, record: &str) -> Anomaly {
    Anomaly::MissingField {
        field: field.to_string(),
        record: record.to_string(),
    }
}

fn malformed(field: &str, value: &str, record: &str) -> Anomaly {
    Anomaly::MalformedNumber {
        field: field.to_string(),
        value: value.to_string(),
        record: record.to_string(),
    }
}
