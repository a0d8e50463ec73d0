//! 控制台命令补全器
//!
//! 基于 rustyline 实现 Tab 补全功能

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 控制台命令列表
const CONSOLE_COMMANDS: &[&str] = &[
    "help", "quit", "exit", "show", "solve", "add", "del", "set", "row", "source", "sink",
    "paths", "mode", "save", "stats",
];

/// 子命令参数
fn sub_commands(command: &str) -> Option<&'static [&'static str]> {
    match command {
        "paths" => Some(&["on", "off"]),
        "mode" => Some(&["table", "plain"]),
        _ => None,
    }
}

fn pairs<'a>(candidates: impl Iterator<Item = &'a &'static str>) -> Vec<Pair> {
    candidates
        .map(|s| Pair {
            display: s.to_string(),
            replacement: s.to_string(),
        })
        .collect()
}

/// FlowMatrix 控制台补全器
#[derive(Default)]
pub struct FlowCompleter;

impl FlowCompleter {
    pub fn new() -> Self {
        Self
    }

    /// 计算补全起点与候选项
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line_to_cursor = &line[..pos];
        let words: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let at_word_end = !line_to_cursor.is_empty() && !line_to_cursor.ends_with(' ');

        match (words.as_slice(), at_word_end) {
            // 补全命令名
            ([current], true) => {
                let prefix = current.to_lowercase();
                let found = pairs(CONSOLE_COMMANDS.iter().filter(|c| c.starts_with(&prefix)));
                (pos - current.len(), found)
            }
            // 补全第二个单词
            ([command, current], true) => match sub_commands(&command.to_lowercase()) {
                Some(subs) => {
                    let found = pairs(subs.iter().filter(|s| s.starts_with(*current)));
                    (pos - current.len(), found)
                }
                None => (pos, vec![]),
            },
            ([command], false) => match sub_commands(&command.to_lowercase()) {
                Some(subs) => (pos, pairs(subs.iter())),
                None => (pos, vec![]),
            },
            ([], _) => (pos, pairs(CONSOLE_COMMANDS.iter())),
            _ => (pos, vec![]),
        }
    }
}

impl Completer for FlowCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for FlowCompleter {
    type Hint = String;
}

impl Highlighter for FlowCompleter {}

impl Validator for FlowCompleter {}

impl Helper for FlowCompleter {}
