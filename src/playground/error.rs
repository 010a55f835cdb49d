//! Playground 模块错误类型
//!
//! 定义代码执行会话核心能力相关的错误类型。
//!
//! ## 功能
//! - 会话状态机错误
//! - 传输通道错误
//! - 工作区不变量错误
//! - 序列化支持

use thiserror::Error;

/// Playground 错误类型
#[derive(Debug, Error)]
pub enum PlaygroundError {
    /// 传输通道不可用（未连接或已关闭）
    #[error("传输通道不可用: {0}")]
    TransportUnavailable(String),

    /// 当前会话状态不允许该操作
    #[error("当前状态不允许该操作: {0}")]
    InvalidState(String),

    /// 违反工作区不变量
    #[error("违反工作区不变量: {0}")]
    InvariantViolation(String),

    /// 文件不存在
    #[error("文件不存在: {0}")]
    NotFound(String),

    /// 代码内容为空
    #[error("代码内容为空，无法运行")]
    EmptyCode,

    /// 消息编码失败
    #[error("消息编码失败: {0}")]
    EncodeFailed(String),

    /// 文件导出失败
    #[error("文件导出失败: {0}")]
    ExportFailed(String),

    /// 语言目录获取失败
    #[error("语言目录获取失败: {0}")]
    CatalogFetchFailed(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<PlaygroundError> for String {
    fn from(err: PlaygroundError) -> Self {
        err.to_string()
    }
}

impl serde::Serialize for PlaygroundError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
