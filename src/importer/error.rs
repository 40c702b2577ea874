// ==========================================
// 产品目录对齐系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 两类: ImportError（整体操作失败）/ Anomaly（单字段/单记录，就地恢复）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("目录 {dir} 中未找到 {vendor} 目录文件")]
    NoCatalogFile { dir: String, vendor: String },

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 配置错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 对齐错误 =====
    #[error("无法解析实体 (目录 {vendor}, 位置 {index})")]
    UnresolvedEntity { vendor: String, index: usize },

    // ===== 本体写入错误 =====
    #[error("本体写入失败 ({vendor}): {message}")]
    SinkFailure { vendor: String, message: String },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// Anomaly - 就地恢复的数据异常
// ==========================================
// Display 即日志正文（一条异常一行）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    #[error("{field} not available for {record}")]
    MissingField { field: String, record: String },

    #[error("unexpected unit in {value} for {field} of {record}")]
    UnitMismatch {
        field: String,
        value: String,
        record: String,
    },

    #[error("unparsable value {value} for {field} of {record}")]
    MalformedNumber {
        field: String,
        value: String,
        record: String,
    },

    #[error("malformed range {value} for {field} of {record}")]
    MalformedRange {
        field: String,
        value: String,
        record: String,
    },

    #[error("no identifier for {record}")]
    NoIdentifier { record: String },
}

impl Anomaly {
    /// 异常类别（结构化日志字段）
    pub fn kind(&self) -> &'static str {
        match self {
            Anomaly::MissingField { .. } => "missing_field",
            Anomaly::UnitMismatch { .. } => "unit_mismatch",
            Anomaly::MalformedNumber { .. } => "malformed_number",
            Anomaly::MalformedRange { .. } => "malformed_range",
            Anomaly::NoIdentifier { .. } => "no_identifier",
        }
    }

    /// 是否为转换类异常（值存在但无法转换）
    pub fn is_coercion_failure(&self) -> bool {
        matches!(
            self,
            Anomaly::UnitMismatch { .. }
                | Anomaly::MalformedNumber { .. }
                | Anomaly::MalformedRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_log_line() {
        let anomaly = Anomaly::MissingField {
            field: "clock_rate".to_string(),
            record: "STM32F103C8T6".to_string(),
        };
        assert_eq!(
            anomaly.to_string(),
            "clock_rate not available for STM32F103C8T6"
        );
        assert_eq!(anomaly.kind(), "missing_field");
        assert!(!anomaly.is_coercion_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::FileReadError(_)));
    }
}
