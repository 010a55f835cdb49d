//! 输入控制器
//!
//! 累积用户按键为待提交输入，决定何时作为一整行提交。
//!
//! ## 两种交互模式
//! - `Raw`: 逐字符转发 + 本地回显（完整终端仿真面板）。每次按键追加
//!   到待提交缓冲；退格同时从回显和缓冲删除末字符；收到行终止符
//!   （`\r` 或 `\n`）时整个缓冲作为一行提交，终止符本身不进入缓冲。
//! - `Buffered`: 单个可编辑输入框（伪终端面板）。内容整体替换缓冲，
//!   显式提交时一次性取走。
//!
//! 不变量：输入永远不逐字符发往传输层，只发整行；每个终止符事件
//! 恰好产生一次提交（缓冲为空时提交空行，等价于"直接按回车"）。

use serde::{Deserialize, Serialize};

/// 输入交互模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// 逐字符 + 本地回显
    Raw,
    /// 可编辑输入框，提交时整体读取
    Buffered,
}

impl Default for InputMode {
    fn default() -> Self {
        Self::Raw
    }
}

/// 输入控制器
///
/// 两个展示层共用同一抽象，仅以 `mode` 区分，不再各自维护状态机。
#[derive(Debug, Default)]
pub struct InputController {
    mode: InputMode,
    /// 待提交输入缓冲
    pending: String,
}

impl InputController {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            pending: String::new(),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// 当前待提交缓冲
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// 本地回显内容
    ///
    /// Raw 模式下回显待提交缓冲（渲染在未完行之后）；Buffered 模式
    /// 的输入框自带显示，不回显。
    pub fn echo_view(&self) -> &str {
        match self.mode {
            InputMode::Raw => &self.pending,
            InputMode::Buffered => "",
        }
    }

    /// 处理一次按键（Raw 模式）
    ///
    /// 返回 `Some(line)` 表示该按键是行终止符，`line` 为应提交的
    /// 完整一行；返回 None 表示按键已累积。Buffered 模式下按键由
    /// 输入框自行处理，这里忽略并返回 None。
    pub fn key_char(&mut self, c: char) -> Option<String> {
        if self.mode != InputMode::Raw {
            return None;
        }
        match c {
            '\r' | '\n' => Some(std::mem::take(&mut self.pending)),
            _ => {
                self.pending.push(c);
                None
            }
        }
    }

    /// 退格（Raw 模式）：从缓冲删除末字符
    ///
    /// 返回是否确实删除了字符（用于展示层同步回显）。
    pub fn backspace(&mut self) -> bool {
        if self.mode != InputMode::Raw {
            return false;
        }
        self.pending.pop().is_some()
    }

    /// 整体替换缓冲内容（Buffered 模式）
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.pending = content.into();
    }

    /// 显式提交（Buffered 模式的终止符事件）
    ///
    /// 取走当前缓冲并清空，缓冲为空时提交空行。
    pub fn submit(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }

    /// 清空缓冲（会话重置时调用）
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
