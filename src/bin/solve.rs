//! FlowMatrix 一次性求解工具
//!
//! 读取容量矩阵文件，计算最大流并输出结果

use anyhow::Context;
use clap::Parser;
use flowmatrix::algorithm::EdmondsKarp;
use flowmatrix::cli::{init_logging, PrintMode, Printer};
use flowmatrix::import::MatrixReader;
use flowmatrix::types::InputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flowmatrix-solve")]
#[command(about = "计算容量矩阵的最大流")]
struct Args {
    /// 容量矩阵文件
    #[arg(short, long)]
    input: PathBuf,

    /// 源点
    #[arg(short, long)]
    source: usize,

    /// 汇点
    #[arg(short = 't', long)]
    sink: usize,

    /// 输入格式: text, json
    #[arg(short, long, default_value = "text")]
    format: InputFormat,

    /// 以 JSON 输出完整结果
    #[arg(long)]
    json: bool,

    /// 记录并输出增广路径
    #[arg(short, long)]
    paths: bool,

    /// 矩阵以纯文本而非表格输出
    #[arg(long)]
    plain: bool,

    /// 未设置 RUST_LOG 时的日志级别
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let capacity = MatrixReader::new(args.format)
        .read_path(&args.input)
        .with_context(|| format!("无法读取矩阵文件 {}", args.input.display()))?;

    let result = EdmondsKarp::new()
        .with_path_recording(args.paths)
        .solve(&capacity, args.source, args.sink)
        .context("求解失败")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let mode = if args.plain {
            PrintMode::Plain
        } else {
            PrintMode::Table
        };
        let printer = Printer::new(mode);
        println!("容量矩阵:");
        print!("{}", printer.format_matrix(&capacity));
        print!("{}", printer.format_result(&result, args.source, args.sink));
    }

    if !result.conservation_valid {
        anyhow::bail!("流量矩阵未通过守恒校验");
    }

    Ok(())
}
