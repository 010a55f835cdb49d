//! 输出重组器
//!
//! 把传输层任意切分的 UTF-8 文本片段重组为确定的完整行序列，
//! 外加一条正在累积的"当前未完行"。
//!
//! ## 功能
//! - stdout 片段按 `\n` 切分，跨片段缓冲未完行
//! - stderr 片段立即成行，按到达顺序与 stdout 行交错
//! - 结果对片段切分方式不敏感（同一字符串任意分块结果一致）
//! - `exit` 时冲刷未完行并追加终止标记行，之后冻结直到下次重置
//!
//! 行尾的 `\r`（CRLF）在行边界处剥离，保证两种展示层看到相同的行；
//! 裸 `\r` 的处理属于展示层，不在这里做。

use serde::{Deserialize, Serialize};

/// 进程终止标记行
pub const TERMINATED_MARKER: &str = "[进程已结束]";

/// 行的来源通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// 程序标准输出
    Stdout,
    /// 程序标准错误
    Stderr,
    /// 本地合成的提示行（终止标记、连接诊断）
    System,
}

/// 一条完整的展示行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub text: String,
    pub kind: LineKind,
}

impl OutputLine {
    fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// 输出重组器
///
/// 每个会话持有一个；`lines` 在一次运行内单调增长，
/// 下一次 `init` 前由会话调用 [`OutputAssembler::reset`] 清空。
#[derive(Debug, Default)]
pub struct OutputAssembler {
    /// 已完成的行，按到达顺序
    lines: Vec<OutputLine>,
    /// 当前未完行（可能为空）
    partial: String,
    /// 冻结标志：终止后拒绝一切追加
    frozen: bool,
}

impl OutputAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个 stdout 片段
    ///
    /// 算法：`缓冲 = 未完行 + 片段`，按 `\n` 切分；除最后一段外全部
    /// 成行，最后一段成为新的未完行（片段以 `\n` 结尾时最后一段为
    /// 空串，未完行随之清空）。
    pub fn push_stdout(&mut self, fragment: &str) {
        if self.frozen {
            tracing::debug!("[输出] 已冻结，丢弃 stdout 片段 ({} 字节)", fragment.len());
            return;
        }

        let buffer = format!("{}{}", self.partial, fragment);
        let mut segments = buffer.split('\n').peekable();

        self.partial = loop {
            // peekable 保证至少产生一个段（空输入时为空串）
            let segment = segments.next().unwrap_or_default();
            if segments.peek().is_none() {
                break segment.to_string();
            }
            self.lines
                .push(OutputLine::new(strip_cr(segment), LineKind::Stdout));
        };
    }

    /// 追加一个 stderr 片段
    ///
    /// 错误通道按整条消息冲刷，不跨片段缓冲：片段内每个非空段
    /// 立即成行，与 stdout 行按到达顺序交错。不触碰 stdout 未完行。
    pub fn push_stderr(&mut self, fragment: &str) {
        if self.frozen {
            tracing::debug!("[输出] 已冻结，丢弃 stderr 片段 ({} 字节)", fragment.len());
            return;
        }

        for segment in fragment.split('\n') {
            if segment.is_empty() {
                continue;
            }
            self.lines
                .push(OutputLine::new(strip_cr(segment), LineKind::Stderr));
        }
    }

    /// 进程正常终止：冲刷未完行并追加终止标记，随后冻结
    ///
    /// `pending_input` 是用户已键入但尚未提交的输入，回显语义下它
    /// 和未完行同属光标行，一并冲刷。重复调用是无操作（标记行最多
    /// 出现一次）。
    pub fn finish(&mut self, pending_input: &str) {
        self.finalize_with(pending_input, TERMINATED_MARKER);
    }

    /// 传输层异常断开：冲刷未完行并追加诊断行，随后冻结
    pub fn finish_disconnected(&mut self, pending_input: &str, reason: Option<&str>) {
        let marker = match reason {
            Some(r) => format!("[连接已断开: {}]", r),
            None => "[连接已断开]".to_string(),
        };
        self.finalize_with(pending_input, &marker);
    }

    fn finalize_with(&mut self, pending_input: &str, marker: &str) {
        if self.frozen {
            return;
        }

        let tail = format!("{}{}", self.partial, pending_input);
        if !tail.is_empty() {
            self.lines.push(OutputLine::new(tail, LineKind::Stdout));
        }
        self.partial.clear();
        self.lines.push(OutputLine::new(marker, LineKind::System));
        self.frozen = true;
    }

    /// 追加一条本地诊断行
    ///
    /// 诊断行描述本地操作失败（如发送时传输不可用），不属于运行
    /// 输出，因此不受冻结限制；每次失败恰好产生一行。
    pub fn push_diagnostic(&mut self, text: impl Into<String>) {
        self.lines.push(OutputLine::new(text, LineKind::System));
    }

    /// 清空全部状态，为下一次运行做准备
    pub fn reset(&mut self) {
        self.lines.clear();
        self.partial.clear();
        self.frozen = false;
    }

    /// 已完成的行
    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// 已完成行的纯文本快照
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    /// 当前未完行
    pub fn partial_line(&self) -> &str {
        &self.partial
    }

    /// 是否已冻结（终止后、重置前）
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// 剥离行尾 CRLF 中的 `\r`
fn strip_cr(segment: &str) -> &str {
    segment.strip_suffix('\r').unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fragment_with_partial() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("Hello\nWorld");
        assert_eq!(asm.line_texts(), vec!["Hello"]);
        assert_eq!(asm.partial_line(), "World");
    }

    #[test]
    fn test_chunked_equals_whole() {
        let mut whole = OutputAssembler::new();
        whole.push_stdout("AB\nCD");

        let mut chunked = OutputAssembler::new();
        for piece in ["A", "B\n", "C", "D"] {
            chunked.push_stdout(piece);
        }

        assert_eq!(whole.line_texts(), chunked.line_texts());
        assert_eq!(whole.partial_line(), chunked.partial_line());
    }

    #[test]
    fn test_three_way_chunking() {
        let mut asm = OutputAssembler::new();
        for piece in ["He", "llo\nWo", "rld"] {
            asm.push_stdout(piece);
        }
        assert_eq!(asm.line_texts(), vec!["Hello"]);
        assert_eq!(asm.partial_line(), "World");
    }

    #[test]
    fn test_trailing_newline_clears_partial() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("hi\n");
        assert_eq!(asm.line_texts(), vec!["hi"]);
        assert_eq!(asm.partial_line(), "");
    }

    #[test]
    fn test_consecutive_newlines_keep_empty_lines() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("a\n\nb\n");
        assert_eq!(asm.line_texts(), vec!["a", "", "b"]);
        assert_eq!(asm.partial_line(), "");
    }

    #[test]
    fn test_crlf_stripped_at_boundary() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("one\r\ntwo\r");
        asm.push_stdout("\nthree");
        assert_eq!(asm.line_texts(), vec!["one", "two"]);
        assert_eq!(asm.partial_line(), "three");
    }

    #[test]
    fn test_stderr_finalizes_immediately() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("par");
        asm.push_stderr("Traceback\n  boom");
        assert_eq!(asm.line_texts(), vec!["Traceback", "  boom"]);
        // stderr 不触碰 stdout 未完行
        assert_eq!(asm.partial_line(), "par");
        assert_eq!(asm.lines()[0].kind, LineKind::Stderr);
    }

    #[test]
    fn test_interleave_in_arrival_order() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("out1\n");
        asm.push_stderr("err1");
        asm.push_stdout("out2\n");
        assert_eq!(asm.line_texts(), vec!["out1", "err1", "out2"]);
        let kinds: Vec<_> = asm.lines().iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LineKind::Stdout, LineKind::Stderr, LineKind::Stdout]
        );
    }

    #[test]
    fn test_finish_flushes_partial_and_pending() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("请输入: ");
        asm.finish("42");
        assert_eq!(asm.line_texts(), vec!["请输入: 42", TERMINATED_MARKER]);
        assert_eq!(asm.partial_line(), "");
        assert!(asm.is_frozen());
    }

    #[test]
    fn test_finish_without_partial_only_marker() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("hi\n");
        asm.finish("");
        assert_eq!(asm.line_texts(), vec!["hi", TERMINATED_MARKER]);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut asm = OutputAssembler::new();
        asm.finish("");
        asm.finish("");
        assert_eq!(asm.line_texts(), vec![TERMINATED_MARKER]);
    }

    #[test]
    fn test_frozen_rejects_fragments() {
        let mut asm = OutputAssembler::new();
        asm.finish("");
        asm.push_stdout("late\n");
        asm.push_stderr("late err");
        assert_eq!(asm.line_texts(), vec![TERMINATED_MARKER]);
    }

    #[test]
    fn test_reset_unfreezes() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("x");
        asm.finish("");
        asm.reset();
        assert!(asm.lines().is_empty());
        assert_eq!(asm.partial_line(), "");
        assert!(!asm.is_frozen());
        asm.push_stdout("fresh\n");
        assert_eq!(asm.line_texts(), vec!["fresh"]);
    }

    #[test]
    fn test_diagnostic_allowed_after_freeze() {
        let mut asm = OutputAssembler::new();
        asm.finish("");
        asm.push_diagnostic("传输通道不可用: 通道已关闭");
        assert_eq!(
            asm.line_texts(),
            vec![TERMINATED_MARKER, "传输通道不可用: 通道已关闭"]
        );
    }

    #[test]
    fn test_disconnect_reason_in_marker() {
        let mut asm = OutputAssembler::new();
        asm.push_stdout("half");
        asm.finish_disconnected("", Some("connection reset"));
        assert_eq!(
            asm.line_texts(),
            vec!["half", "[连接已断开: connection reset]"]
        );
        assert!(asm.is_frozen());
    }
}
