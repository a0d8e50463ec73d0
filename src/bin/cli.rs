//! FlowMatrix 交互式控制台
//!
//! 载入或新建容量矩阵，编辑边并重新计算最大流

use anyhow::Context;
use clap::Parser;
use flowmatrix::cli::{execute_line, init_logging, CommandResult, ConsoleState, FlowCompleter};
use flowmatrix::graph::Matrix;
use flowmatrix::import::MatrixReader;
use flowmatrix::types::InputFormat;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;

/// 未指定节点数时新建矩阵的大小
const DEFAULT_NODES: usize = 6;

#[derive(Parser, Debug)]
#[command(name = "flowmatrix-cli")]
#[command(about = "FlowMatrix 最大流交互式控制台")]
struct Args {
    /// 容量矩阵文件
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 节点数：无输入文件时新建该大小的空矩阵，有输入文件时校验矩阵大小
    #[arg(short, long)]
    nodes: Option<usize>,

    /// 源点
    #[arg(short, long)]
    source: usize,

    /// 汇点
    #[arg(short = 't', long)]
    sink: usize,

    /// 输入格式: text, json
    #[arg(short, long, default_value = "text")]
    format: InputFormat,

    /// 执行单个命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 未设置 RUST_LOG 时的日志级别
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let capacity = match &args.input {
        Some(path) => MatrixReader::new(args.format)
            .with_expected_size(args.nodes)
            .read_path(path)
            .with_context(|| format!("无法读取矩阵文件 {}", path.display()))?,
        None => Matrix::zeros(args.nodes.unwrap_or(DEFAULT_NODES)),
    };
    capacity.check_index(args.source).context("源点无效")?;
    capacity.check_index(args.sink).context("汇点无效")?;

    let mut state = ConsoleState::new(capacity, args.source, args.sink);

    // 单个命令模式
    if let Some(command) = args.execute {
        return match execute_line(&command, &mut state) {
            CommandResult::Message(msg) => {
                println!("{}", msg);
                Ok(())
            }
            CommandResult::Error(err) => Err(anyhow::anyhow!(err)),
            CommandResult::Continue | CommandResult::Exit => Ok(()),
        };
    }

    println!("FlowMatrix {} - Edmonds-Karp 最大流控制台", flowmatrix::VERSION);
    println!("==========================================");
    println!(
        "节点数: {}, 边数: {}, 源点: {}, 汇点: {}",
        state.capacity.size(),
        state.capacity.edge_count(),
        state.source,
        state.sink
    );
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let mut editor: Editor<FlowCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(FlowCompleter::new()));

    loop {
        let line = match editor.readline("flowmatrix> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        match execute_line(line, &mut state) {
            CommandResult::Continue => {}
            CommandResult::Exit => break,
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Error(err) => println!("错误: {}", err),
        }
    }

    println!("再见！");
    Ok(())
}
