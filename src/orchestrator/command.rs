//! 终端命令解析
//!
//! 题号、选项号在终端里都从 1 开始，解析后转换为从 0 开始的索引。

use crate::session::PageDirection;

/// 考生在终端输入的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 为当前题选择第 n 个选项（索引从 0 开始）
    Select(usize),
    Next,
    Previous,
    Skip,
    /// 跳到第 k 题（索引从 0 开始）
    Jump(usize),
    Page(PageDirection),
    Grid,
    Submit,
    Help,
    Quit,
}

impl Command {
    /// 解析一行输入，无法识别时返回 `None`
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let head = parts.next()?.to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return None;
        }

        match (head.as_str(), arg) {
            ("n" | "next", None) => Some(Command::Next),
            ("p" | "prev" | "previous", None) => Some(Command::Previous),
            ("s" | "skip", None) => Some(Command::Skip),
            ("]", None) => Some(Command::Page(PageDirection::Next)),
            ("[", None) => Some(Command::Page(PageDirection::Previous)),
            ("grid" | "status", None) => Some(Command::Grid),
            ("submit", None) => Some(Command::Submit),
            ("h" | "help" | "?", None) => Some(Command::Help),
            ("q" | "quit", None) => Some(Command::Quit),
            ("a" | "answer", Some(n)) => parse_one_based(n).map(Command::Select),
            ("g" | "go", Some(k)) => parse_one_based(k).map(Command::Jump),
            (n, None) => parse_one_based(n).map(Command::Select),
            _ => None,
        }
    }
}

fn parse_one_based(value: &str) -> Option<usize> {
    value.parse::<usize>().ok()?.checked_sub(1)
}

/// 命令帮助
pub const HELP_TEXT: &str = "\
命令:
  <n> | a <n>   选择第 n 个选项
  n | next      下一题（需先作答）
  p | prev      上一题
  s | skip      跳过本题
  g <k>         跳到第 k 题
  ] | [         状态面板下一页 / 上一页
  grid          查看题目状态
  submit        交卷
  q | quit      放弃作答并退出";
