//! 执行服务线上协议
//!
//! 与远程执行服务之间的双工 JSON 消息定义。
//!
//! ## 消息方向
//! - 客户端 → 服务: `init`、`input`、`kill`
//! - 服务 → 客户端: `stdout`、`stderr`、`exit`
//!
//! 消息是瞬态的，永不持久化。服务端收到 `init` 后会重置该连接上
//! 之前的运行状态。

use serde::{Deserialize, Serialize};

use super::error::PlaygroundError;

/// 客户端发往执行服务的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// 开始执行代码
    ///
    /// `input` 字段保留给一次性预置输入，当前协议版本恒为空串。
    Init {
        /// 语言短代码（如 "py"、"c"）
        language: String,
        /// 待执行的源代码
        code: String,
        /// 预置输入，恒为 ""
        input: String,
    },
    /// 投递一行程序输入
    Input {
        /// 完整的一行输入（不含行终止符）
        data: String,
    },
    /// 终止正在运行的进程
    Kill,
}

impl ClientMessage {
    /// 构造 `init` 消息
    pub fn init(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Init {
            language: language.into(),
            code: code.into(),
            input: String::new(),
        }
    }

    /// 编码为 JSON 文本帧
    pub fn encode(&self) -> Result<String, PlaygroundError> {
        serde_json::to_string(self).map_err(|e| PlaygroundError::EncodeFailed(e.to_string()))
    }
}

/// 执行服务发往客户端的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// 程序标准输出片段（可能是不完整的行）
    Stdout { data: String },
    /// 程序标准错误片段
    Stderr { data: String },
    /// 进程已终止，之后不会再有输出
    Exit,
}

impl ServerMessage {
    /// 从 JSON 文本帧解码
    ///
    /// 解码失败返回 None 并记录日志：协议容错，坏帧直接丢弃。
    pub fn decode(frame: &str) -> Option<Self> {
        match serde_json::from_str(frame) {
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::warn!("[协议] 丢弃无法解析的帧: {}", e);
                None
            }
        }
    }
}
