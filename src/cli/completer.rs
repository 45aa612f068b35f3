//! REPL 命令补全器
//!
//! 基于 rustyline 实现 Tab 补全：首个单词补全命令名，
//! `run` 后补全算法名，`mode` 后补全模式。

use crate::algorithm::Algorithm;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 命令列表
pub const COMMANDS: &[&str] = &[
    "node", "node+", "edge", "rmnode", "rmedge", "mode", "matrix", "adj", "edges", "run",
    "save", "load", "import", "clear", "stats", "help", "quit", "exit",
];

const MODES: &[&str] = &["directed", "undirected"];

/// 第二个单词的候选
fn argument_candidates(command: &str) -> Vec<&'static str> {
    match command {
        "run" => Algorithm::ALL.iter().map(|a| a.name()).collect(),
        "mode" => MODES.to_vec(),
        _ => Vec::new(),
    }
}

fn pairs<'a>(candidates: impl IntoIterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
    candidates
        .into_iter()
        .filter(|c| c.starts_with(prefix))
        .map(|c| Pair {
            display: c.to_string(),
            replacement: c.to_string(),
        })
        .collect()
}

/// TraceGraph CLI 补全器
#[derive(Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    /// 与 rustyline 无关的补全逻辑，返回替换起点和候选
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line_to_cursor = &line[..pos];
        let words: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let at_word_end = !line_to_cursor.is_empty() && !line_to_cursor.ends_with(' ');

        match (words.as_slice(), at_word_end) {
            ([], _) => (pos, pairs(COMMANDS.iter().copied(), "")),
            ([current], true) => (pos - current.len(), pairs(COMMANDS.iter().copied(), current)),
            ([command], false) => (pos, pairs(argument_candidates(command), "")),
            ([command, current], true) => (
                pos - current.len(),
                pairs(argument_candidates(command), current),
            ),
            _ => (pos, Vec::new()),
        }
    }
}

impl Completer for CommandCompleter {
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

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
