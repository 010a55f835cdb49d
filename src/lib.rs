//! CodePark Playground 核心库
//!
//! 在线编程教学平台的代码执行终端核心：
//! - `workspace` - 多文件编辑工作区与文件导出
//! - `playground` - 远程执行会话状态机、输出重组、输入控制、传输抽象
//! - `services` - 平台后端协作接口（语言目录）
//!
//! 展示层（终端渲染、表单、导航）不在本库范围内，只消费这里暴露的
//! 会话操作与行序列。

pub mod playground;
pub mod services;
pub mod workspace;

// 重新导出常用类型
pub use codepark_core::models::{LanguageBinding, WorkspaceFile};
pub use playground::{
    ChannelTransport, ClientMessage, InputController, InputMode, LineKind, OutputAssembler,
    OutputLine, PlaygroundError, PlaygroundSession, PlaygroundSessionManager, ServerMessage,
    SessionConfig, SessionState, Transport, TransportEvent,
};
pub use services::LanguageService;
pub use workspace::{ExportBundle, WorkspaceStore};
