// ==========================================
// 产品目录对齐系统 - 供应商字段映射表
// ==========================================
// 职责: 规范字段名 → (源字段名, 目标类型, 多值标记, 转换规则)
// 红线: 进程启动时构造一次，之后只读
// ==========================================

use crate::domain::types::{TargetType, Vendor};
use std::sync::OnceLock;

// ==========================================
// FieldRule - 字段转换规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 文本原样保留（去首尾空白）
    Plain,
    /// 直接解析为目标数值类型
    Number,
    /// 去掉已知后缀标记后解析（"32-Bit"、"1200 pcs"）
    StripSuffix(&'static str),
    /// 货币金额
    Price(PriceFormat),
    /// 存储容量，统一为 KB（1 MB = 1000 KB，1 B = 0.001 KB）
    MemoryKb,
    /// 时钟频率，统一为 MHz；bare_mhz 为真时无单位纯数字按 MHz 读取
    ClockMhz { bare_mhz: bool },
    /// 分隔符拼接的列表
    List(&'static str),
}

/// 金额的小数分隔符约定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormat {
    DecimalComma, // "1.234,56 €"
    DecimalPoint, // "$1,234.56"
}

// ==========================================
// FieldSpec - 单字段映射
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub canonical_name: &'static str,
    pub source_field: &'static str,
    pub target_type: TargetType,
    pub multi_valued: bool,
    pub rule: FieldRule,
}

impl FieldSpec {
    const fn text(canonical_name: &'static str, source_field: &'static str) -> Self {
        Self {
            canonical_name,
            source_field,
            target_type: TargetType::String,
            multi_valued: false,
            rule: FieldRule::Plain,
        }
    }

    const fn typed(
        canonical_name: &'static str,
        source_field: &'static str,
        target_type: TargetType,
        rule: FieldRule,
    ) -> Self {
        Self {
            canonical_name,
            source_field,
            target_type,
            multi_valued: false,
            rule,
        }
    }

    const fn list(canonical_name: &'static str, source_field: &'static str) -> Self {
        Self {
            canonical_name,
            source_field,
            target_type: TargetType::ListOfString,
            multi_valued: true,
            rule: FieldRule::List(", "),
        }
    }
}

// ==========================================
// RangeSpec - 区间字段（派生 _min / _max）
// ==========================================
// 例: "-40°C ~ 85°C (TA)" → operating_temp_min = -40, operating_temp_max = 85
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub name: &'static str,
    pub source_field: &'static str,
    pub min_field: &'static str,
    pub max_field: &'static str,
    pub target_type: TargetType,
    pub delimiter: &'static str,
    pub unit: &'static str,
}

// ==========================================
// VendorSchema - 供应商映射表
// ==========================================
#[derive(Debug, Clone)]
pub struct VendorSchema {
    pub vendor: Vendor,
    pub fields: Vec<FieldSpec>,
    pub ranges: Vec<RangeSpec>,
    /// 匹配键候选（按优先级）
    pub identifier_candidates: Vec<&'static str>,
    /// 别名字段（仅探索模式）
    pub alias_field: Option<&'static str>,
    /// 显示名字段
    pub display_field: &'static str,
    /// 时钟频率字段（速度分类）
    pub clock_field: &'static str,
}

impl VendorSchema {
    pub fn field(&self, canonical_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.canonical_name == canonical_name)
    }

    pub fn range(&self, name: &str) -> Option<&RangeSpec> {
        self.ranges.iter().find(|r| r.name == name)
    }

    /// 源字段是否被映射表消费（未消费字段原样透传）
    pub fn consumes_source(&self, source_field: &str) -> bool {
        self.fields.iter().any(|f| f.source_field == source_field)
            || self.ranges.iter().any(|r| r.source_field == source_field)
    }

    /// 全部规范字段及其类型（区间字段展开为 min/max）
    pub fn canonical_fields(&self) -> Vec<(&'static str, TargetType, bool)> {
        let mut out: Vec<(&'static str, TargetType, bool)> = self
            .fields
            .iter()
            .map(|f| (f.canonical_name, f.target_type, f.multi_valued))
            .collect();
        for r in &self.ranges {
            out.push((r.max_field, r.target_type, false));
            out.push((r.min_field, r.target_type, false));
        }
        out
    }
}

/// 按供应商取映射表
pub fn schema_for(vendor: Vendor) -> &'static VendorSchema {
    match vendor {
        Vendor::Conrad => conrad(),
        Vendor::Infinity => infinity(),
    }
}

// ==========================================
// Conrad 映射表
// ==========================================
pub fn conrad() -> &'static VendorSchema {
    static SCHEMA: OnceLock<VendorSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        use FieldRule::*;
        use TargetType::{Float, Integer};
        VendorSchema {
            vendor: Vendor::Conrad,
            fields: vec![
                FieldSpec::text("product_name", "name"),
                FieldSpec::text("code", "code"),
                FieldSpec::typed("price", "price", Float, Price(PriceFormat::DecimalComma)),
                FieldSpec::text("prod_type", "Typ"),
                FieldSpec::text("manufacturer", "Hersteller"),
                FieldSpec::text("manuf_abbrev", "Herst.-Abk."),
                FieldSpec::text("housing", "Gehäuse"),
                FieldSpec::typed("clock_rate", "Takt-Frequenz", Integer, ClockMhz { bare_mhz: true }),
                FieldSpec::text("series", "Serie"),
                FieldSpec::typed("core_size_bit", "Kerngröße", Integer, StripSuffix("-Bit")),
                FieldSpec::text("core_processor", "Kern-Prozessor"),
                FieldSpec::text("oscillator_type", "Oszillator-Typ"),
                FieldSpec::list("periphery_devices", "Peripheriegeräte"),
                FieldSpec::typed("number_ios", "Anzahl I/O", Integer, Number),
                FieldSpec::text("program_memory_type", "Programmspeichertyp"),
                FieldSpec::typed("voltage_max", "Versorgungsspannung max.", Float, StripSuffix(" V")),
                FieldSpec::typed("voltage_min", "Versorgungsspannung min.", Float, StripSuffix(" V")),
                FieldSpec::typed("operating_temp_max", "Betriebstemperatur (max.)", Integer, StripSuffix("°")),
                FieldSpec::typed("operating_temp_min", "Betriebstemperatur (min.)", Integer, StripSuffix("°")),
                FieldSpec::text("data_converter", "Datenwandler (Embedded Mikrocontroller)"),
                FieldSpec::text("eeprom", "EEPROM Größe"),
                FieldSpec::list("connectivity", "Konnektivität"),
                FieldSpec::typed("program_memory_size_kb", "Programmspeichergröße", Float, MemoryKb),
                FieldSpec::text("ram_size", "RAM-Größe"),
            ],
            ranges: vec![],
            // 单板机无 Typ，退回 Modell
            identifier_candidates: vec!["prod_type", "Modell"],
            alias_field: None,
            display_field: "product_name",
            clock_field: "clock_rate",
        }
    })
}

// ==========================================
// Infinity 映射表
// ==========================================
pub fn infinity() -> &'static VendorSchema {
    static SCHEMA: OnceLock<VendorSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        use FieldRule::*;
        use TargetType::{Float, Integer};
        VendorSchema {
            vendor: Vendor::Infinity,
            fields: vec![
                FieldSpec::text("product_name", "name"),
                FieldSpec::typed("price", "price", Float, Price(PriceFormat::DecimalPoint)),
                FieldSpec::text("part_number", "PART NUMBER"),
                FieldSpec::text("manufacturer", "MANUFACTURER"),
                FieldSpec::text("description", "DESCRIPTION"),
                FieldSpec::text("lead_free_rohs", "LEAD FREE STATUS / ROHS STATUS"),
                FieldSpec::typed("quantity_available", "QUANTITY AVAILABLE", Integer, StripSuffix(" pcs")),
                FieldSpec::text("data_sheet", "DATA SHEET"),
                FieldSpec::text("supplier_device_package", "SUPPLIER DEVICE PACKAGE"),
                FieldSpec::typed("clock_rate", "SPEED", Float, ClockMhz { bare_mhz: false }),
                FieldSpec::text("series", "SERIES"),
                FieldSpec::text("ram_size", "RAM SIZE"),
                FieldSpec::text("program_memory_type", "PROGRAM MEMORY TYPE"),
                FieldSpec::typed("program_memory_size_kb", "PROGRAM MEMORY SIZE", Float, MemoryKb),
                FieldSpec::list("peripherals", "PERIPHERALS"),
                FieldSpec::text("packaging", "PACKAGING"),
                FieldSpec::text("package", "PACKAGE / CASE"),
                FieldSpec::text("oscillator_type", "OSCILLATOR TYPE"),
                FieldSpec::typed("number_ios", "NUMBER OF I/O", Integer, Number),
                FieldSpec::text("moisture_sensitivity_level", "MOISTURE SENSITIVITY LEVEL (MSL)"),
                FieldSpec::text("eeprom_size", "EEPROM SIZE"),
                FieldSpec::text("detailed_description", "DETAILED DESCRIPTION"),
                FieldSpec::text("data_converters", "DATA CONVERTERS"),
                FieldSpec::typed("core_size_bit", "CORE SIZE", Integer, StripSuffix("-Bit")),
                FieldSpec::text("core_processor", "CORE PROCESSOR"),
                FieldSpec::list("connectivity", "CONNECTIVITY"),
            ],
            ranges: vec![
                RangeSpec {
                    name: "operating_temp",
                    source_field: "OPERATING TEMPERATURE",
                    min_field: "operating_temp_min",
                    max_field: "operating_temp_max",
                    target_type: Integer,
                    delimiter: "~",
                    unit: "°",
                },
                RangeSpec {
                    name: "voltage",
                    source_field: "VOLTAGE - SUPPLY (VCC/VDD)",
                    min_field: "voltage_min",
                    max_field: "voltage_max",
                    target_type: Float,
                    delimiter: "~",
                    unit: "V",
                },
            ],
            identifier_candidates: vec!["part_number"],
            alias_field: Some("OTHER NAMES"),
            display_field: "product_name",
            clock_field: "clock_rate",
        }
    })
}
