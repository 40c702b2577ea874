// ==========================================
// 产品目录对齐系统 - 命令行入口
// ==========================================
// 用法:
//   pd-align [config.json]                  完整流程（抓取结果 → 金标准）
//   pd-align [config.json] --from-snapshots 从规范化快照开始对齐
//   pd-align reduce <对照表.csv> <输出.csv>  人工对照表归约为对齐表
//   pd-align merge <输出.csv> <输入.csv>...  合并对齐表
// ==========================================

use anyhow::{bail, Context, Result};
use pd_align::engine::{merge_alignments, reduce_to_matches};
use pd_align::{logging, AlignmentConfig, AlignmentRun, DirectoryCatalogSource, TracingAnomalyLog};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", pd_align::APP_NAME, pd_align::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("reduce") => reduce(&args[1..]),
        Some("merge") => merge(&args[1..]),
        _ => align(&args),
    }
}

fn align(args: &[String]) -> Result<()> {
    let from_snapshots = args.iter().any(|a| a == "--from-snapshots");
    let config_path = args.iter().find(|a| !a.starts_with("--"));

    let config = match config_path {
        Some(path) => AlignmentConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path))?,
        None => AlignmentConfig::default(),
    };

    let run = AlignmentRun::new(config);
    let log = TracingAnomalyLog;
    let report = if from_snapshots {
        run.run_from_snapshots(&log).context("从快照对齐失败")?
    } else {
        let source = DirectoryCatalogSource::new(&run.config().data_dir);
        run.run(&source, &log).context("对齐运行失败")?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn reduce(args: &[String]) -> Result<()> {
    let [manual, output] = args else {
        bail!("用法: pd-align reduce <对照表.csv> <输出.csv>");
    };
    let rows = reduce_to_matches(Path::new(manual), Path::new(output))
        .with_context(|| format!("无法归约对照表 {}", manual))?;
    println!("rows={}", rows);
    Ok(())
}

fn merge(args: &[String]) -> Result<()> {
    let Some((output, inputs)) = args.split_first() else {
        bail!("用法: pd-align merge <输出.csv> <输入.csv>...");
    };
    if inputs.is_empty() {
        bail!("至少需要一个输入文件");
    }
    let inputs: Vec<PathBuf> = inputs.iter().map(PathBuf::from).collect();
    merge_alignments(&inputs, Path::new(output))
        .with_context(|| format!("无法合并到 {}", output))?;
    println!("merged={}", inputs.len());
    Ok(())
}
