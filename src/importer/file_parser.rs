// ==========================================
// 产品目录对齐系统 - 文件解析器实现
// ==========================================
// 职责: 目录文件选择 / JSON 目录解析 / 整文件 JSON 读写
// 约定: 数据目录中文件名包含 "<vendor>.json" 的字典序最后一个
// ==========================================

use crate::domain::record::RawRecord;
use crate::domain::types::Vendor;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::CatalogSource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 选择某供应商最新的抓取文件（文件名以时间戳开头，字典序即时间序）
pub fn latest_catalog_file(dir: &Path, vendor: Vendor) -> ImportResult<PathBuf> {
    if !dir.exists() {
        return Err(ImportError::FileNotFound(dir.display().to_string()));
    }

    let needle = format!("{}.json", vendor.as_str());
    let mut candidates: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.contains(&needle))
        .collect();
    candidates.sort();

    let latest = candidates.pop().ok_or_else(|| ImportError::NoCatalogFile {
        dir: dir.display().to_string(),
        vendor: vendor.to_string(),
    })?;
    debug!(vendor = %vendor, file = %latest, "选定目录文件");
    Ok(dir.join(latest))
}

/// 读取整份 JSON 文件
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> ImportResult<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)
        .map_err(|e| ImportError::JsonParseError(format!("{}: {}", path.display(), e)))?;
    Ok(value)
}

/// 整文件写入 JSON（缩进格式；先写临时文件再改名，读者不会看到半个文件）
pub fn write_json_atomic<T: Serialize + ?Sized, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> ImportResult<()> {
    let path = path.as_ref();
    let body = serde_json::to_string_pretty(value)?;
    write_atomic(path, body.as_bytes())
}

/// 整文件写入（临时文件 + 改名）
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ImportResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, bytes)
        .map_err(|e| ImportError::FileWriteError(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

// ==========================================
// JSON 目录解析器
// ==========================================
pub struct JsonCatalogParser;

impl JsonCatalogParser {
    /// 解析抓取结果（JSON 数组，元素为 字段名 → 字符串/字符串列表）
    pub fn parse_catalog(&self, path: &Path) -> ImportResult<Vec<RawRecord>> {
        let records: Vec<RawRecord> = read_json(path)?;
        info!(file = %path.display(), records = records.len(), "目录文件解析完成");
        Ok(records)
    }
}

// ==========================================
// DirectoryCatalogSource - 数据目录中的抓取文件
// ==========================================
pub struct DirectoryCatalogSource {
    data_dir: PathBuf,
}

impl DirectoryCatalogSource {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

impl CatalogSource for DirectoryCatalogSource {
    fn load_catalog(&self, vendor: Vendor) -> ImportResult<Vec<RawRecord>> {
        let path = latest_catalog_file(&self.data_dir, vendor)?;
        JsonCatalogParser.parse_catalog(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_latest_catalog_file_picks_lexicographic_last() {
        let dir = TempDir::new().unwrap();
        for name in [
            "2021-05-01-10-00-00-conrad.json",
            "2021-06-01-10-00-00-conrad.json",
            "2021-07-01-10-00-00-infinity.json",
            "conrad_data_dump.json",
        ] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }

        let latest = latest_catalog_file(dir.path(), Vendor::Conrad).unwrap();
        assert_eq!(
            latest.file_name().unwrap().to_str().unwrap(),
            "2021-06-01-10-00-00-conrad.json"
        );
    }

    #[test]
    fn test_latest_catalog_file_none_found() {
        let dir = TempDir::new().unwrap();
        let result = latest_catalog_file(dir.path(), Vendor::Infinity);
        assert!(matches!(result, Err(ImportError::NoCatalogFile { .. })));
    }

    #[test]
    fn test_parse_catalog_mixed_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2021-01-01-conrad.json");
        fs::write(
            &path,
            r#"[{"name": "Arduino Nano", "price": null, "Konnektivität": ["I²C", "SPI"]}]"#,
        )
        .unwrap();

        let records = DirectoryCatalogSource::new(dir.path())
            .load_catalog(Vendor::Conrad)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert!(!records[0].contains("price"));
    }

    #[test]
    fn test_parse_catalog_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken-infinity.json");
        fs::write(&path, r#"{"name": "x"}"#).unwrap();

        let result = JsonCatalogParser.parse_catalog(&path);
        assert!(matches!(result, Err(ImportError::JsonParseError(_))));
    }

    #[test]
    fn test_write_json_atomic_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("out.json.tmp").exists());
        let back: Vec<i32> = read_json(&path).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
