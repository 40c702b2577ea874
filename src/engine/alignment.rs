// ==========================================
// 产品目录对齐系统 - 对齐表输出
// ==========================================
// 职责: 实体 IRI 解析 / 对齐表写出与读取 / 多表合并 / 人工对照表归约
// 格式: 逗号分隔，最小引号，无表头，固定三列 (entityA, entityB, relation)
// 红线: 合并只做拼接，不去重、不处理表头
// ==========================================

use crate::domain::record::Correspondence;
use crate::domain::types::{RelationKind, Vendor};
use crate::engine::matcher::MatchPair;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::write_atomic;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

// ==========================================
// 实体命名
// ==========================================

/// 实例名: <vendor>_<四位目录位置>
pub fn instance_name(vendor: Vendor, index: usize) -> String {
    format!("{}_{:04}", vendor.as_str(), index)
}

/// 实体 IRI: <本体 IRI>#<实例名>
pub fn entity_iri(base_iri: &str, vendor: Vendor, index: usize) -> String {
    format!("{}#{}", base_iri, instance_name(vendor, index))
}

// ==========================================
// EntityResolver - 匹配对 → 对应关系
// ==========================================
pub struct EntityResolver<'a> {
    pub vendor_a: Vendor,
    pub iri_a: &'a str,
    pub len_a: usize,
    pub vendor_b: Vendor,
    pub iri_b: &'a str,
    pub len_b: usize,
}

impl EntityResolver<'_> {
    /// 把匹配对解析为 equivalence 对应关系（保持匹配顺序）
    ///
    /// # 返回
    /// - Err(UnresolvedEntity): 标识符位置超出目录范围
    pub fn resolve(&self, pairs: &[MatchPair]) -> ImportResult<Vec<Correspondence>> {
        pairs
            .iter()
            .map(|pair| -> ImportResult<Correspondence> {
                let a = self.resolve_one(self.vendor_a, self.iri_a, self.len_a, pair.left.record_index)?;
                let b = self.resolve_one(self.vendor_b, self.iri_b, self.len_b, pair.right.record_index)?;
                Ok(Correspondence::equivalence(&a, &b))
            })
            .collect()
    }

    fn resolve_one(&self, vendor: Vendor, iri: &str, len: usize, index: usize) -> ImportResult<String> {
        if index >= len {
            return Err(ImportError::UnresolvedEntity {
                vendor: vendor.to_string(),
                index,
            });
        }
        Ok(entity_iri(iri, vendor, index))
    }
}

// ==========================================
// 对齐表写出
// ==========================================

/// 写出对齐表到任意 writer
pub fn write_alignment<W: Write>(writer: W, correspondences: &[Correspondence]) -> ImportResult<()> {
    let mut out = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for c in correspondences {
        out.write_record([c.entity_a.as_str(), c.entity_b.as_str(), c.relation.as_str()])?;
    }
    out.flush()
        .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
    Ok(())
}

/// 序列化为字符串
pub fn alignment_to_string(correspondences: &[Correspondence]) -> ImportResult<String> {
    let mut buf = Vec::new();
    write_alignment(&mut buf, correspondences)?;
    String::from_utf8(buf).map_err(|e| ImportError::CsvParseError(e.to_string()))
}

/// 写出对齐表文件（整文件写入）
pub fn save_alignment(path: &Path, correspondences: &[Correspondence]) -> ImportResult<()> {
    let mut buf = Vec::new();
    write_alignment(&mut buf, correspondences)?;
    write_atomic(path, &buf)?;
    info!(file = %path.display(), rows = correspondences.len(), "对齐表已写出");
    Ok(())
}

// ==========================================
// 对齐表读取
// ==========================================

/// 从任意 reader 解析对齐表
pub fn parse_alignment<R: Read>(reader: R) -> ImportResult<Vec<Correspondence>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut out = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        out.push(parse_row(&record, row_idx + 1)?);
    }
    Ok(out)
}

/// 读取对齐表文件
pub fn read_alignment(path: &Path) -> ImportResult<Vec<Correspondence>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let file = fs::File::open(path)?;
    parse_alignment(file)
}

fn parse_row(record: &StringRecord, row_number: usize) -> ImportResult<Correspondence> {
    if record.len() != 3 {
        return Err(ImportError::CsvParseError(format!(
            "第 {} 行应为 3 列，实际 {} 列",
            row_number,
            record.len()
        )));
    }
    let relation: RelationKind = record[2]
        .trim()
        .parse()
        .map_err(|e: String| ImportError::CsvParseError(format!("第 {} 行: {}", row_number, e)))?;
    Ok(Correspondence {
        entity_a: record[0].to_string(),
        entity_b: record[1].to_string(),
        relation,
    })
}

// ==========================================
// 合并 / 归约
// ==========================================

/// 按顺序拼接多个对齐表文件
pub fn merge_alignments<P: AsRef<Path>>(inputs: &[P], output: &Path) -> ImportResult<()> {
    let mut merged = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.exists() {
            return Err(ImportError::FileNotFound(input.display().to_string()));
        }
        merged.extend(fs::read(input)?);
    }
    write_atomic(output, &merged)?;
    info!(inputs = inputs.len(), file = %output.display(), "对齐表已合并");
    Ok(())
}

/// 人工对照表 → 对应关系
///
/// 首行为两个 IRI 前缀，其余每行为 (A 名称, B 名称)；两列都非空才算匹配
pub fn parse_manual_comparison<R: Read>(reader: R) -> ImportResult<Vec<Correspondence>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = rdr.records();

    let header = match rows.next() {
        Some(row) => row?,
        None => return Ok(Vec::new()),
    };
    if header.len() < 2 {
        return Err(ImportError::CsvParseError(
            "对照表首行必须包含两个 IRI 前缀".to_string(),
        ));
    }
    let (prefix_a, prefix_b) = (header[0].to_string(), header[1].to_string());

    let mut out = Vec::new();
    for row in rows {
        let row = row?;
        let a = row.get(0).unwrap_or("");
        let b = row.get(1).unwrap_or("");
        if !a.is_empty() && !b.is_empty() {
            out.push(Correspondence::equivalence(
                &format!("{}{}", prefix_a, a),
                &format!("{}{}", prefix_b, b),
            ));
        }
    }
    Ok(out)
}

/// 归约人工对照表文件并写出对齐表，返回写出行数
pub fn reduce_to_matches(manual_comparison: &Path, output: &Path) -> ImportResult<usize> {
    if !manual_comparison.exists() {
        return Err(ImportError::FileNotFound(
            manual_comparison.display().to_string(),
        ));
    }
    let file = fs::File::open(manual_comparison)?;
    let correspondences = parse_manual_comparison(file)?;
    if correspondences.is_empty() {
        warn!(file = %manual_comparison.display(), "对照表中没有双边匹配");
    }
    save_alignment(output, &correspondences)?;
    Ok(correspondences.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Identifier;

    #[test]
    fn test_instance_naming() {
        assert_eq!(instance_name(Vendor::Conrad, 7), "conrad_0007");
        assert_eq!(instance_name(Vendor::Infinity, 12345), "infinity_12345");
        assert_eq!(
            entity_iri("http://example.org/conrad.owl", Vendor::Conrad, 42),
            "http://example.org/conrad.owl#conrad_0042"
        );
    }

    #[test]
    fn test_resolver_out_of_range() {
        let resolver = EntityResolver {
            vendor_a: Vendor::Conrad,
            iri_a: "http://a",
            len_a: 1,
            vendor_b: Vendor::Infinity,
            iri_b: "http://b",
            len_b: 1,
        };
        let pair = MatchPair {
            left: Identifier::new("x", "K", 0),
            right: Identifier::new("y", "K", 5),
            score: 1.0,
        };

        let result = resolver.resolve(&[pair]);
        assert!(matches!(
            result,
            Err(ImportError::UnresolvedEntity { index: 5, .. })
        ));
    }

    #[test]
    fn test_minimal_quoting() {
        let rows = vec![Correspondence::equivalence("a,1", "b")];
        let text = alignment_to_string(&rows).unwrap();
        assert_eq!(text, "\"a,1\",b,equivalence\n");
    }

    #[test]
    fn test_parse_rejects_wrong_arity_and_relation() {
        assert!(matches!(
            parse_alignment("a,b\n".as_bytes()),
            Err(ImportError::CsvParseError(_))
        ));
        assert!(matches!(
            parse_alignment("a,b,subsumption\n".as_bytes()),
            Err(ImportError::CsvParseError(_))
        ));
    }

    #[test]
    fn test_manual_comparison_prefixes() {
        let input = "http://c#,http://i#\nprice,price\nseries,\n,packaging\nclock_rate,speed\n";
        let rows = parse_manual_comparison(input.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![
                Correspondence::equivalence("http://c#price", "http://i#price"),
                Correspondence::equivalence("http://c#clock_rate", "http://i#speed"),
            ]
        );
    }
}
