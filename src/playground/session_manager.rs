//! 会话管理器
//!
//! 管理所有 Playground 会话的完整生命周期：视图挂载时创建会话并
//! 接上传输，卸载时无条件拆除。
//!
//! ## 功能
//! - 会话创建、查找、列举、关闭
//! - 每个会话独占一条传输通道，事件泵按到达顺序串行喂入会话
//! - 关闭会话时无论运行状态如何都拆除传输

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::error::PlaygroundError;
use super::session::{PlaygroundSession, SessionConfig, SessionMetadata};
use super::transport::{Transport, TransportEventRx};

/// 共享会话句柄
///
/// 事件泵与用户操作都经由同一把锁进入会话，保证同一会话的事件
/// 串行处理。
pub type SessionHandle = Arc<Mutex<PlaygroundSession>>;

/// Playground 会话管理器
pub struct PlaygroundSessionManager {
    /// 会话映射表
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl Default for PlaygroundSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaygroundSessionManager {
    /// 创建新的会话管理器
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// 创建新会话（视图挂载）
    ///
    /// 接上传输并启动事件泵：事件泵在独立任务中按到达顺序将传输
    /// 事件喂给会话，事件流结束时自然退出。
    ///
    /// # 参数
    /// - `config`: 会话配置（含显式用户上下文）
    /// - `transport`: 该会话独占的传输通道
    /// - `events`: 传输的上行事件接收端
    ///
    /// # 返回
    /// 会话 ID
    pub async fn create_session(
        &self,
        config: SessionConfig,
        transport: Arc<dyn Transport>,
        mut events: TransportEventRx,
    ) -> Result<String, PlaygroundError> {
        let mut session = PlaygroundSession::new(config);
        session.attach_transport(transport)?;
        let session_id = session.id().to_string();
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        // 事件泵：串行投递，同一会话的两个事件永不并发处理
        let pump_handle = handle.clone();
        let pump_id = session_id.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                pump_handle.lock().await.handle_event(event);
            }
            tracing::debug!("[会话管理] 事件泵退出: id={}", pump_id);
        });

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), handle);

        tracing::info!("[会话管理] 会话已创建: id={}", session_id);
        Ok(session_id)
    }

    /// 获取会话句柄
    pub async fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// 获取所有会话的元数据快照
    pub async fn list_sessions(&self) -> Vec<SessionMetadata> {
        let handles: Vec<SessionHandle> = {
            let sessions = self.sessions.read().await;
            sessions.values().cloned().collect()
        };

        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            result.push(handle.lock().await.metadata());
        }
        result
    }

    /// 关闭会话（视图卸载）
    ///
    /// 无论会话处于何种状态，一律拆除传输并移除会话。
    pub async fn close_session(&self, session_id: &str) -> Result<(), PlaygroundError> {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };

        if let Some(handle) = removed {
            handle.lock().await.teardown().await;
            tracing::info!("[会话管理] 会话已关闭: id={}", session_id);
        }

        Ok(())
    }

    /// 当前会话数量
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
