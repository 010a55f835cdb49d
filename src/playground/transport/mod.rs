//! 传输模块
//!
//! 定义会话与远程执行服务之间的双工通道抽象。
//!
//! ## 模块结构
//! - `channel` - 进程内通道传输（测试与嵌入方桥接用）
//!
//! 具体的网络实现（socket 等）由外部协作方提供，只要实现
//! [`Transport`] 并在连接时交出事件接收端即可。每条传输通道
//! 在其生命周期内被唯一一个会话独占，永不共享。

pub mod channel;

pub use channel::{ChannelTransport, RemoteEndpoint};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::PlaygroundError;
use super::protocol::{ClientMessage, ServerMessage};

/// 传输层上行事件
///
/// 事件按到达顺序串行投递给会话，同一会话的两个事件永不并发处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// 收到服务端消息
    Message(ServerMessage),
    /// 连接关闭（携带可选原因；None 表示正常关闭）
    Closed(Option<String>),
}

/// 传输事件接收端，连接建立时交给会话持有方
pub type TransportEventRx = mpsc::UnboundedReceiver<TransportEvent>;

/// 双工传输通道
///
/// 下行（客户端 → 服务）通过 [`Transport::send`]；上行通过建立连接
/// 时返回的 [`TransportEventRx`] 事件流。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送一条客户端消息
    ///
    /// 通道未处于可发送状态时返回 `TransportUnavailable`，
    /// 不做任何排队或重试。
    async fn send(&self, msg: ClientMessage) -> Result<(), PlaygroundError>;

    /// 通道当前是否可发送
    fn is_open(&self) -> bool;

    /// 本地关闭通道（幂等）
    async fn close(&self);
}
