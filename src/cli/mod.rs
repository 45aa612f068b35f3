//! 交互式命令行
//!
//! 命令解析、Tab 补全和结果格式化；REPL 循环本身在 `tracegraph-cli` 中。

pub mod commands;
pub mod completer;
pub mod printer;

pub use commands::{CommandResult, Session};
pub use completer::CommandCompleter;
pub use printer::Printer;
