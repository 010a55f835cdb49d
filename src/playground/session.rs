//! 会话生命周期状态机
//!
//! 持有传输通道，串接四段生命周期（创建 → 运行 → 终止 → 再运行），
//! 并把生命周期事件翻译为对输出重组器 / 输入控制器的调用。
//!
//! ## 状态与转换
//! - `Idle` → `run` → `Running`：要求活动文件内容非空，发送
//!   `init{language, code, input:""}`，清空行序列 / 未完行 / 待提交输入
//! - `Running` → 收到 `exit` → `Terminated`：冲刷剩余缓冲并追加终止标记
//! - `Running` → 用户 `kill` → `Terminated`：传输打开时发送 `kill`，
//!   本地立即终止，不等待远端确认；之后到达的输出一律丢弃
//! - `Terminated` → `run` → `Running`：完整重置后照常启动（复用打开的
//!   传输，或由嵌入方先换上新传输）
//! - 任意状态 → 传输关闭/出错 → `Terminated`：尽力把未完行/待提交
//!   输入冲刷成一条诊断行
//!
//! 失败语义：传输不可用时操作返回 `TransportUnavailable` 并追加单条
//! 诊断行，会话停留在原状态，绝不让故障穿透到展示层。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::PlaygroundError;
use super::input::{InputController, InputMode};
use super::output::OutputAssembler;
use super::protocol::{ClientMessage, ServerMessage};
use super::transport::{Transport, TransportEvent};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// 已创建，尚未运行
    Idle,
    /// 远程进程运行中
    Running,
    /// 已终止（正常退出、被杀或传输断开）
    Terminated,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// 会话配置
///
/// 用户/归属上下文通过这里显式传入，核心不做任何环境查找。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 归属用户 ID（可选，由平台层填写）
    pub owner_id: Option<String>,
    /// 输入交互模式
    #[serde(default)]
    pub input_mode: InputMode,
}

/// 会话元数据（用于前端展示）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// 会话 ID
    pub id: String,
    /// 归属用户 ID
    pub owner_id: Option<String>,
    /// 会话状态
    pub state: SessionState,
    /// 输入模式
    pub input_mode: InputMode,
    /// 创建时间（Unix 时间戳，毫秒）
    pub created_at: i64,
    /// 最近一次 run 的时间（Unix 时间戳，毫秒）
    pub started_at: Option<i64>,
    /// 已完成行数
    pub line_count: usize,
}

/// Playground 会话
///
/// 每个打开的终端视图对应一个会话：视图挂载时创建并接上传输，
/// 卸载时无条件拆除。事件由持有方按到达顺序串行喂入
/// [`PlaygroundSession::handle_event`]，同一会话的消息永不并发处理。
pub struct PlaygroundSession {
    /// 会话 ID
    id: String,
    /// 配置（显式用户上下文）
    config: SessionConfig,
    /// 当前状态
    state: SessionState,
    /// 传输通道（未接入时为 None）
    transport: Option<Arc<dyn Transport>>,
    /// 输出重组器
    output: OutputAssembler,
    /// 输入控制器
    input: InputController,
    /// 创建时间
    created_at: i64,
    /// 最近一次 run 的时间
    started_at: Option<i64>,
}

impl PlaygroundSession {
    /// 创建新会话（Idle，未接传输）
    pub fn new(config: SessionConfig) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            "[会话] 创建: id={}, owner={:?}, mode={:?}",
            id,
            config.owner_id,
            config.input_mode
        );

        Self {
            id,
            input: InputController::new(config.input_mode),
            config,
            state: SessionState::Idle,
            transport: None,
            output: OutputAssembler::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
            started_at: None,
        }
    }

    /// 接入（或更换）传输通道
    ///
    /// 运行中不允许换传输：一条通道在会话生命周期内独占，
    /// 运行中的换道会把在途输出串台。
    pub fn attach_transport(
        &mut self,
        transport: Arc<dyn Transport>,
    ) -> Result<(), PlaygroundError> {
        if self.state == SessionState::Running {
            return Err(PlaygroundError::InvalidState(
                "运行中不能更换传输通道".to_string(),
            ));
        }
        self.transport = Some(transport);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 已完成的展示行
    pub fn lines(&self) -> &[super::output::OutputLine] {
        self.output.lines()
    }

    /// 已完成行的纯文本快照
    pub fn line_texts(&self) -> Vec<String> {
        self.output.line_texts()
    }

    /// 光标行：未完行 + 本地回显
    pub fn cursor_line(&self) -> String {
        format!("{}{}", self.output.partial_line(), self.input.echo_view())
    }

    /// 元数据快照
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            id: self.id.clone(),
            owner_id: self.config.owner_id.clone(),
            state: self.state,
            input_mode: self.input.mode(),
            created_at: self.created_at,
            started_at: self.started_at,
            line_count: self.output.lines().len(),
        }
    }

    /// 启动一次运行
    ///
    /// # 参数
    /// - `language`: 传输层语言短代码（如 "py"）
    /// - `code`: 活动文件内容，必须非空
    ///
    /// 运行中重复调用直接拒绝（`InvalidState`），绝不与在途运行的
    /// 输出交错。成功路径完整重置行序列、未完行与待提交输入。
    pub async fn run(&mut self, language: &str, code: &str) -> Result<(), PlaygroundError> {
        if self.state == SessionState::Running {
            tracing::warn!("[会话] 忽略重复 run: id={}", self.id);
            return Err(PlaygroundError::InvalidState("会话正在运行".to_string()));
        }
        if code.is_empty() {
            return Err(PlaygroundError::EmptyCode);
        }

        let transport = self.open_transport()?;
        transport
            .send(ClientMessage::init(language, code))
            .await
            .map_err(|e| self.surface_transport_failure(e))?;

        // init 已送出，完整重置会话字段
        self.output.reset();
        self.input.reset();
        self.state = SessionState::Running;
        self.started_at = Some(chrono::Utc::now().timestamp_millis());

        tracing::info!("[会话] 开始运行: id={}, language={}", self.id, language);
        Ok(())
    }

    /// 处理一次按键（Raw 模式）
    ///
    /// 终止符触发整行提交：恰好发送一条 `input` 消息，空行也发送。
    pub async fn handle_key(&mut self, c: char) -> Result<(), PlaygroundError> {
        if self.state != SessionState::Running {
            return Err(PlaygroundError::InvalidState(
                "会话未在运行，忽略按键".to_string(),
            ));
        }
        if let Some(line) = self.input.key_char(c) {
            self.send_input_line(line).await?;
        }
        Ok(())
    }

    /// 退格（Raw 模式）
    pub fn handle_backspace(&mut self) -> bool {
        self.input.backspace()
    }

    /// 整体替换输入框内容（Buffered 模式）
    pub fn set_input_content(&mut self, content: impl Into<String>) {
        self.input.set_content(content);
    }

    /// 显式提交输入框内容（Buffered 模式）
    pub async fn submit_input(&mut self) -> Result<(), PlaygroundError> {
        if self.state != SessionState::Running {
            return Err(PlaygroundError::InvalidState(
                "会话未在运行，拒绝提交输入".to_string(),
            ));
        }
        let line = self.input.submit();
        self.send_input_line(line).await
    }

    /// 终止正在运行的进程
    ///
    /// 即发即弃：传输打开时发送 `kill`，无论远端是否确认，本地状态
    /// 立即转为 Terminated；此后到达的 `stdout`/`stderr`/`exit`
    /// 一律丢弃。非 Running 状态下调用是被拒绝的无操作。
    pub async fn kill(&mut self) -> Result<(), PlaygroundError> {
        if self.state != SessionState::Running {
            return Err(PlaygroundError::InvalidState(
                "会话未在运行，无进程可终止".to_string(),
            ));
        }

        if let Some(transport) = &self.transport {
            if transport.is_open() {
                if let Err(e) = transport.send(ClientMessage::Kill).await {
                    tracing::warn!("[会话] kill 发送失败（忽略）: id={}, {}", self.id, e);
                }
            }
        }

        self.output.finish(self.input.pending());
        self.input.reset();
        self.state = SessionState::Terminated;
        tracing::info!("[会话] 用户终止: id={}", self.id);
        Ok(())
    }

    /// 处理一条传输事件
    ///
    /// 持有方按到达顺序串行调用。非 Running 状态下的服务端消息
    /// （用户 kill 后迟到的输出、exit）直接丢弃。
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Message(msg) => {
                if self.state != SessionState::Running {
                    tracing::debug!("[会话] 丢弃非运行态消息: id={}, {:?}", self.id, msg);
                    return;
                }
                match msg {
                    ServerMessage::Stdout { data } => self.output.push_stdout(&data),
                    ServerMessage::Stderr { data } => self.output.push_stderr(&data),
                    ServerMessage::Exit => {
                        self.output.finish(self.input.pending());
                        self.input.reset();
                        self.state = SessionState::Terminated;
                        tracing::info!("[会话] 远程进程退出: id={}", self.id);
                    }
                }
            }
            TransportEvent::Closed(reason) => {
                if self.state == SessionState::Terminated {
                    tracing::debug!("[会话] 已终止后收到关闭事件: id={}", self.id);
                    return;
                }
                self.output
                    .finish_disconnected(self.input.pending(), reason.as_deref());
                self.input.reset();
                self.state = SessionState::Terminated;
                tracing::warn!("[会话] 传输关闭，会话终止: id={}, reason={:?}", self.id, reason);
            }
        }
    }

    /// 无条件拆除（视图卸载时调用）
    ///
    /// 关闭并释放传输，不追加任何展示行。
    pub async fn teardown(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.close().await;
        }
        self.state = SessionState::Terminated;
        tracing::info!("[会话] 已拆除: id={}", self.id);
    }

    /// 发送一条整行输入
    async fn send_input_line(&mut self, line: String) -> Result<(), PlaygroundError> {
        let transport = self.open_transport()?;
        transport
            .send(ClientMessage::Input { data: line })
            .await
            .map_err(|e| self.surface_transport_failure(e))
    }

    /// 取出处于打开状态的传输，否则以诊断行拒绝
    fn open_transport(&mut self) -> Result<Arc<dyn Transport>, PlaygroundError> {
        let err = match &self.transport {
            Some(t) if t.is_open() => return Ok(t.clone()),
            Some(_) => PlaygroundError::TransportUnavailable("通道已关闭".to_string()),
            None => PlaygroundError::TransportUnavailable("未接入传输通道".to_string()),
        };
        Err(self.surface_transport_failure(err))
    }

    /// 把传输失败落成单条诊断行，返回原错误
    fn surface_transport_failure(&mut self, err: PlaygroundError) -> PlaygroundError {
        tracing::warn!("[会话] 传输操作失败: id={}, {}", self.id, err);
        self.output.push_diagnostic(err.to_string());
        err
    }
}
