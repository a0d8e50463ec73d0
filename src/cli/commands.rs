//! 控制台命令处理
//!
//! 解析并执行编辑容量矩阵、重新求解的交互命令

use std::path::PathBuf;

use super::printer::{PrintMode, Printer};
use crate::algorithm::{EdmondsKarp, MaxFlow};
use crate::error::{Error, Result};
use crate::graph::CapacityMatrix;
use crate::import::write_path;
use crate::metrics::global_metrics;
use crate::types::{Capacity, InputFormat, NodeIndex};

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Show,
    Solve,
    Add {
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
    },
    Delete {
        from: NodeIndex,
        to: NodeIndex,
    },
    Set {
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
    },
    Row {
        node: NodeIndex,
        capacities: Vec<Capacity>,
    },
    Source(NodeIndex),
    Sink(NodeIndex),
    Paths(bool),
    Mode(PrintMode),
    Save(PathBuf, InputFormat),
    Stats,
}

/// 控制台命令执行结果
#[derive(Debug)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 控制台状态
#[derive(Debug)]
pub struct ConsoleState {
    /// 当前容量矩阵
    pub capacity: CapacityMatrix,
    /// 源点
    pub source: NodeIndex,
    /// 汇点
    pub sink: NodeIndex,
    /// 是否记录增广路径
    pub record_paths: bool,
    /// 最近一次求解结果
    pub last_result: Option<MaxFlow>,
    pub printer: Printer,
}

impl ConsoleState {
    pub fn new(capacity: CapacityMatrix, source: NodeIndex, sink: NodeIndex) -> Self {
        Self {
            capacity,
            source,
            sink,
            record_paths: false,
            last_result: None,
            printer: Printer::default(),
        }
    }

    /// 对当前矩阵求解并保存结果，失败时清空上一次结果
    pub fn solve(&mut self) -> Result<&MaxFlow> {
        self.last_result = None;
        let result = EdmondsKarp::new()
            .with_path_recording(self.record_paths)
            .solve(&self.capacity, self.source, self.sink)?;
        Ok(&*self.last_result.insert(result))
    }

    /// 显示矩阵并求解
    fn show_and_solve(&mut self) -> CommandResult {
        let mut output = String::from("\n当前容量矩阵:\n");
        output.push_str(&self.printer.format_matrix(&self.capacity));
        match self.solve().map(|_| ()) {
            Ok(()) => {
                if let Some(result) = &self.last_result {
                    output.push_str(&self.printer.format_result(result, self.source, self.sink));
                }
                CommandResult::Message(output)
            }
            Err(e) => CommandResult::Error(format!("{}\n求解失败: {}", output, e)),
        }
    }
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>, name: &str) -> Result<T> {
    let token = token.ok_or_else(|| Error::ParseError(format!("缺少参数 <{}>", name)))?;
    token
        .parse()
        .map_err(|_| Error::ParseError(format!("<{}> 必须是非负整数: {}", name, token)))
}

/// 解析一行输入
pub fn parse_command(input: &str) -> Result<Command> {
    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| Error::ParseError("空命令".to_string()))?
        .to_lowercase();

    let command = match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "show" | "print" => Command::Show,
        "solve" | "maxflow" | "flow" => Command::Solve,
        "add" => Command::Add {
            from: parse_number(parts.next(), "u")?,
            to: parse_number(parts.next(), "v")?,
            capacity: parse_number(parts.next(), "容量")?,
        },
        "del" | "delete" | "rm" => Command::Delete {
            from: parse_number(parts.next(), "u")?,
            to: parse_number(parts.next(), "v")?,
        },
        "set" | "change" => Command::Set {
            from: parse_number(parts.next(), "u")?,
            to: parse_number(parts.next(), "v")?,
            capacity: parse_number(parts.next(), "容量")?,
        },
        "row" | "fill" => {
            let node = parse_number(parts.next(), "u")?;
            let capacities = parts
                .by_ref()
                .map(|token| parse_number(Some(token), "容量"))
                .collect::<Result<Vec<Capacity>>>()?;
            if capacities.is_empty() {
                return Err(Error::ParseError("用法: row <u> <c0> <c1> ...".to_string()));
            }
            Command::Row { node, capacities }
        }
        "source" => Command::Source(parse_number(parts.next(), "n")?),
        "sink" => Command::Sink(parse_number(parts.next(), "n")?),
        "paths" => match parts.next() {
            Some("on") => Command::Paths(true),
            Some("off") => Command::Paths(false),
            _ => return Err(Error::ParseError("用法: paths on|off".to_string())),
        },
        "mode" => match parts.next() {
            Some("table") => Command::Mode(PrintMode::Table),
            Some("plain") => Command::Mode(PrintMode::Plain),
            _ => return Err(Error::ParseError("用法: mode table|plain".to_string())),
        },
        "save" => {
            let path = parts
                .next()
                .ok_or_else(|| Error::ParseError("用法: save <文件> [text|json]".to_string()))?;
            let format = match parts.next() {
                Some(f) => f.parse()?,
                None => InputFormat::Text,
            };
            Command::Save(PathBuf::from(path), format)
        }
        "stats" | "info" => Command::Stats,
        other => {
            return Err(Error::ParseError(format!(
                "未知命令: {}。输入 'help' 查看帮助。",
                other
            )))
        }
    };

    if parts.next().is_some() {
        return Err(Error::ParseError(format!("命令 {} 参数过多", cmd)));
    }

    Ok(command)
}

/// 执行命令
pub fn execute_command(command: Command, state: &mut ConsoleState) -> CommandResult {
    match command {
        Command::Help => CommandResult::Message(Printer::help_text()),

        Command::Quit => CommandResult::Exit,

        Command::Show => {
            let mut output = state.printer.format_matrix(&state.capacity);
            output.push_str(&format!(
                "节点数: {}, 边数: {}, 最大容量: {}, 源点: {}, 汇点: {}\n",
                state.capacity.size(),
                state.capacity.edge_count(),
                state.capacity.max_capacity(),
                state.source,
                state.sink
            ));
            CommandResult::Message(output)
        }

        Command::Solve => state.show_and_solve(),

        Command::Add { from, to, capacity } => match state.capacity.add_edge(from, to, capacity) {
            Ok(()) => state.show_and_solve(),
            Err(e) => CommandResult::Error(e.to_string()),
        },

        Command::Delete { from, to } => match state.capacity.remove_edge(from, to) {
            Ok(_) => state.show_and_solve(),
            Err(e) => CommandResult::Error(e.to_string()),
        },

        Command::Set { from, to, capacity } => {
            match state.capacity.set_capacity(from, to, capacity) {
                Ok(_) => state.show_and_solve(),
                Err(e) => CommandResult::Error(e.to_string()),
            }
        }

        Command::Row { node, capacities } => match state.capacity.set_row(node, &capacities) {
            Ok(()) => state.show_and_solve(),
            Err(e) => CommandResult::Error(e.to_string()),
        },

        Command::Source(n) => match state.capacity.check_index(n) {
            Ok(()) => {
                state.source = n;
                CommandResult::Message(format!("源点已设为 {}", n))
            }
            Err(e) => CommandResult::Error(e.to_string()),
        },

        Command::Sink(n) => match state.capacity.check_index(n) {
            Ok(()) => {
                state.sink = n;
                CommandResult::Message(format!("汇点已设为 {}", n))
            }
            Err(e) => CommandResult::Error(e.to_string()),
        },

        Command::Paths(on) => {
            state.record_paths = on;
            CommandResult::Message(format!("增广路径显示: {}", if on { "开" } else { "关" }))
        }

        Command::Mode(mode) => {
            state.printer.set_mode(mode);
            CommandResult::Continue
        }

        Command::Save(path, format) => match write_path(&state.capacity, &path, format) {
            Ok(()) => CommandResult::Message(format!("矩阵已保存到 {}", path.display())),
            Err(e) => CommandResult::Error(format!("保存失败: {}", e)),
        },

        Command::Stats => {
            CommandResult::Message(state.printer.format_metrics(&global_metrics().snapshot()))
        }
    }
}

/// 解析并执行一行输入
pub fn execute_line(input: &str, state: &mut ConsoleState) -> CommandResult {
    match parse_command(input) {
        Ok(command) => execute_command(command, state),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}
