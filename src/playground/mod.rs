//! Playground 核心模块
//!
//! 远程代码执行终端会话：协议客户端与状态机。
//!
//! ## 模块结构
//! - `error` - 错误类型定义
//! - `protocol` - 执行服务线上协议（双工 JSON 消息）
//! - `output` - 输出重组器（片段 → 完整行序列 + 未完行）
//! - `input` - 输入控制器（Raw / Buffered 两种模式）
//! - `session` - 会话生命周期状态机
//! - `session_manager` - 会话管理器
//! - `transport` - 传输抽象与进程内通道实现
//!
//! ## 使用示例
//! ```ignore
//! use codepark_lib::playground::{ChannelTransport, PlaygroundSessionManager, SessionConfig};
//!
//! let manager = PlaygroundSessionManager::new();
//! let (transport, events, remote) = ChannelTransport::pair();
//! let id = manager
//!     .create_session(SessionConfig::default(), transport, events)
//!     .await?;
//! let session = manager.get_session(&id).await.unwrap();
//! session.lock().await.run("py", "print('hi')").await?;
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod protocol;
pub mod session;
pub mod session_manager;
pub mod transport;


// 重新导出常用类型
pub use error::PlaygroundError;
pub use input::{InputController, InputMode};
pub use output::{LineKind, OutputAssembler, OutputLine, TERMINATED_MARKER};
pub use protocol::{ClientMessage, ServerMessage};
pub use session::{PlaygroundSession, SessionConfig, SessionMetadata, SessionState};
pub use session_manager::{PlaygroundSessionManager, SessionHandle};
pub use transport::{ChannelTransport, RemoteEndpoint, Transport, TransportEvent, TransportEventRx};
