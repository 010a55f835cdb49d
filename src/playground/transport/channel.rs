//! 进程内通道传输
//!
//! 基于 tokio mpsc 的内存双工通道实现 [`Transport`]，
//! 一端交给会话，另一端（[`RemoteEndpoint`]）交给测试或嵌入方，
//! 用来模拟/桥接远程执行服务。
//!
//! ## 功能
//! - `ChannelTransport::pair()` 创建成对端点
//! - 远端注入 `stdout`/`stderr`/`exit` 消息
//! - 远端断开时向会话投递 `Closed` 事件

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::playground::error::PlaygroundError;
use crate::playground::protocol::{ClientMessage, ServerMessage};
use crate::playground::transport::{Transport, TransportEvent, TransportEventRx};

/// 进程内通道传输（会话侧）
pub struct ChannelTransport {
    /// 下行消息发送端
    outbound_tx: mpsc::UnboundedSender<ClientMessage>,
    /// 通道打开标志（两端共享）
    open: Arc<AtomicBool>,
}

impl ChannelTransport {
    /// 创建一对端点
    ///
    /// # 返回
    /// - 会话侧传输句柄
    /// - 上行事件接收端（交给会话持有方驱动）
    /// - 远端端点（测试/嵌入方）
    pub fn pair() -> (Arc<Self>, TransportEventRx, RemoteEndpoint) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));

        let transport = Arc::new(Self {
            outbound_tx,
            open: open.clone(),
        });
        let remote = RemoteEndpoint {
            outbound_rx,
            event_tx,
            open,
        };

        (transport, event_rx, remote)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, msg: ClientMessage) -> Result<(), PlaygroundError> {
        if !self.is_open() {
            return Err(PlaygroundError::TransportUnavailable(
                "通道已关闭".to_string(),
            ));
        }
        self.outbound_tx
            .send(msg)
            .map_err(|_| PlaygroundError::TransportUnavailable("远端已离线".to_string()))
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        tracing::debug!("[通道传输] 本地关闭");
    }
}

/// 远端端点
///
/// 模拟执行服务：读取客户端消息、注入输出、主动断开。
pub struct RemoteEndpoint {
    outbound_rx: mpsc::UnboundedReceiver<ClientMessage>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    open: Arc<AtomicBool>,
}

impl RemoteEndpoint {
    /// 接收下一条客户端消息（通道关闭时返回 None）
    pub async fn recv_client(&mut self) -> Option<ClientMessage> {
        self.outbound_rx.recv().await
    }

    /// 非阻塞接收客户端消息
    pub fn try_recv_client(&mut self) -> Option<ClientMessage> {
        self.outbound_rx.try_recv().ok()
    }

    /// 注入一个 stdout 片段
    pub fn push_stdout(&self, data: impl Into<String>) {
        self.push_message(ServerMessage::Stdout { data: data.into() });
    }

    /// 注入一个 stderr 片段
    pub fn push_stderr(&self, data: impl Into<String>) {
        self.push_message(ServerMessage::Stderr { data: data.into() });
    }

    /// 注入进程退出消息
    pub fn push_exit(&self) {
        self.push_message(ServerMessage::Exit);
    }

    /// 注入任意服务端消息
    pub fn push_message(&self, msg: ServerMessage) {
        let _ = self.event_tx.send(TransportEvent::Message(msg));
    }

    /// 远端断开连接
    ///
    /// 翻转打开标志并投递 `Closed` 事件；之后会话侧 `send` 将失败。
    pub fn disconnect(&self, reason: Option<&str>) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self
            .event_tx
            .send(TransportEvent::Closed(reason.map(|r| r.to_string())));
    }
}
