//! 命令行界面模块

pub mod commands;
pub mod completer;
pub mod printer;

pub use commands::{execute_command, execute_line, parse_command, Command, CommandResult, ConsoleState};
pub use completer::FlowCompleter;
pub use printer::{PrintMode, Printer};

use tracing_subscriber::EnvFilter;

/// 初始化日志输出到 stderr
///
/// 优先使用 `RUST_LOG`，未设置时使用 `default_level`。
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flowmatrix={}", default_level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
