// ==========================================
// 产品目录对齐系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / [值, 单位] 折叠 / 单位换算 / 区间拆分 / 列表拆分
// 红线: 单位不识别时返回错误，不做猜测
// ==========================================

use crate::config::vendor_schema::PriceFormat;
use crate::domain::record::RawValue;

/// 单位换算失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitFailure {
    /// 数值部分无法解析
    Malformed,
    /// 单位标记不在识别列表中
    Unrecognized,
}

// 容量单位 → KB 换算系数
const MEMORY_UNITS: &[(&str, f64)] = &[
    ("KB", 1.0),
    ("kB", 1.0),
    ("KByte", 1.0),
    ("MB", 1000.0),
    ("MByte", 1000.0),
    ("B", 0.001),
    ("Byte", 0.001),
];

// 频率单位 → MHz 换算系数
const CLOCK_UNITS: &[(&str, f64)] = &[("MHz", 1.0), ("GHz", 1000.0), ("kHz", 0.001)];

// U+2212，部分页面用它代替 ASCII 负号
const MINUS_SIGN: char = '\u{2212}';

fn normalize_minus(value: &str) -> String {
    value.replace(MINUS_SIGN, "-")
}

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM）
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 折叠为标量: [值, 单位] 形式的列表只保留值
    pub fn reduce_to_scalar(&self, value: &RawValue) -> Option<String> {
        let scalar = match value {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::List(items) => items.first().cloned(),
        };
        self.normalize_null(scalar)
    }

    /// 保留单位: [值, 单位] 形式的列表拼为 "值 单位"，其余同 reduce_to_scalar
    pub fn join_value_unit(&self, value: &RawValue) -> Option<String> {
        match value {
            RawValue::List(items) if items.len() == 2 => {
                self.normalize_null(Some(format!("{} {}", items[0].trim(), items[1].trim())))
            }
            other => self.reduce_to_scalar(other),
        }
    }

    /// [值, 单位] 形式列表中的单位
    pub fn pair_unit<'a>(&self, value: &'a RawValue) -> Option<&'a str> {
        match value {
            RawValue::List(items) if items.len() == 2 => Some(items[1].trim()),
            _ => None,
        }
    }

    /// 拆分列表字段: 已是多元素时逐个保留，否则按分隔符拆分（保序、不去重）
    pub fn split_list(&self, value: &RawValue, delimiter: &str) -> Vec<String> {
        let pieces: Vec<String> = match value {
            RawValue::List(items) => items.clone(),
            RawValue::Text(s) => s.split(delimiter).map(str::to_string).collect(),
        };
        pieces
            .into_iter()
            .filter_map(|p| self.normalize_null(Some(p)))
            .collect()
    }

    /// 去掉后缀标记（标记及其后内容丢弃；无标记时原样返回）
    pub fn strip_suffix_token<'a>(&self, value: &'a str, token: &str) -> &'a str {
        match value.split_once(token) {
            Some((head, _)) => head.trim(),
            None => value.trim(),
        }
    }

    /// 解析整数
    pub fn parse_integer(&self, value: &str) -> Option<i64> {
        normalize_minus(value.trim()).parse::<i64>().ok()
    }

    /// 解析浮点数（兼容小数逗号）
    pub fn parse_float(&self, value: &str) -> Option<f64> {
        let trimmed = normalize_minus(value.trim());
        let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
            trimmed.replace(',', ".")
        } else {
            trimmed
        };
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 解析金额: 去货币符号与千分位，统一小数点
    ///
    /// # 示例
    /// - "12,34 €" (DecimalComma) → 12.34
    /// - "$1,234.50" (DecimalPoint) → 1234.5
    pub fn parse_price(&self, value: &str, format: PriceFormat) -> Option<f64> {
        let token = value
            .split_whitespace()
            .find(|t| t.chars().any(|c| c.is_ascii_digit()))?;
        let digits: String = token
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
            .collect();
        let normalized = match format {
            PriceFormat::DecimalComma => digits.replace('.', "").replace(',', "."),
            PriceFormat::DecimalPoint => digits.replace(',', ""),
        };
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 拆分 "数值 单位" 形式（"256KB (256K x 8)" → ("256", "KB")）
    pub fn split_quantity<'a>(&self, value: &'a str) -> (&'a str, &'a str) {
        let v = value.trim();
        let end = v
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | MINUS_SIGN)))
            .unwrap_or(v.len());
        let (number, rest) = v.split_at(end);
        let unit = rest.split_whitespace().next().unwrap_or("");
        (number.trim(), unit)
    }

    /// 存储容量统一为 KB
    pub fn parse_memory_kb(&self, value: &str) -> Result<f64, UnitFailure> {
        self.convert_quantity(value, MEMORY_UNITS, None)
    }

    /// 时钟频率统一为 MHz
    pub fn parse_clock_mhz(&self, value: &str) -> Result<f64, UnitFailure> {
        self.convert_quantity(value, CLOCK_UNITS, None)
    }

    /// 时钟频率统一为 MHz；无单位的纯数字按 MHz 读取（Conrad "48"）
    pub fn parse_clock_mhz_bare(&self, value: &str) -> Result<f64, UnitFailure> {
        self.convert_quantity(value, CLOCK_UNITS, Some(1.0))
    }

    fn convert_quantity(
        &self,
        value: &str,
        units: &[(&str, f64)],
        bare_factor: Option<f64>,
    ) -> Result<f64, UnitFailure> {
        let (number, unit) = self.split_quantity(value);
        let factor = match (unit, bare_factor) {
            ("", Some(f)) => f,
            _ => units
                .iter()
                .find(|(u, _)| *u == unit)
                .map(|(_, f)| *f)
                .ok_or(UnitFailure::Unrecognized)?,
        };
        let parsed = self.parse_float(number).ok_or(UnitFailure::Malformed)?;
        // 小于 1 的系数按除法换算，避免 0.001 的表示误差
        if factor < 1.0 {
            Ok(parsed / (1.0 / factor).round())
        } else {
            Ok(parsed * factor)
        }
    }

    /// 拆分区间（"-40°C ~ 85°C" → ("-40°C", "85°C")）；分隔符缺失或段数不为 2 时返回 None
    pub fn split_range<'a>(&self, value: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
        let parts: Vec<&str> = value.split(delimiter).collect();
        match parts.as_slice() {
            [low, high] if !low.trim().is_empty() && !high.trim().is_empty() => {
                Some((low.trim(), high.trim()))
            }
            _ => None,
        }
    }
}
