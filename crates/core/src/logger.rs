//! 日志管理模块
use chrono::{Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// 初始化 tracing 订阅器
///
/// 使用 RUST_LOG 环境变量过滤，默认 info 级别。重复调用安全（忽略二次初始化）。
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    pub max_logs: usize,
    pub retention_days: u32,
    pub max_file_size: u64,
    pub enable_file_logging: bool,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            max_logs: 1000,
            retention_days: 7,
            max_file_size: 10 * 1024 * 1024,
            enable_file_logging: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

pub struct LogStore {
    logs: VecDeque<LogEntry>,
    max_logs: usize,
    config: LogStoreConfig,
    log_file_path: Option<PathBuf>,
}

impl Default for LogStore {
    fn default() -> Self {
        // 默认日志文件路径: ~/.codepark/logs/codepark.log
        let log_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codepark")
            .join("logs");

        // 创建日志目录
        let _ = fs::create_dir_all(&log_dir);

        let log_file = log_dir.join("codepark.log");

        let config = LogStoreConfig::default();

        Self {
            logs: VecDeque::new(),
            max_logs: config.max_logs,
            config,
            log_file_path: Some(log_file),
        }
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义配置创建 LogStore
    pub fn with_custom_config(retention_days: u32, enabled: bool) -> Self {
        let mut store = Self::default();
        store.config.retention_days = retention_days;
        store.config.enable_file_logging = enabled;
        store.max_logs = store.config.max_logs;
        store
    }

    /// 使用指定日志文件路径创建 LogStore（测试用）
    pub fn with_file_path(path: PathBuf) -> Self {
        let mut store = Self::default();
        store.log_file_path = Some(path);
        store
    }

    pub fn add(&mut self, level: &str, message: &str) {
        let sanitized = sanitize_log_message(message);
        let now = Utc::now();
        let entry = LogEntry {
            timestamp: now.to_rfc3339(),
            level: level.to_string(),
            message: sanitized.clone(),
        };

        self.logs.push_back(entry);

        // 写入日志文件
        if self.config.enable_file_logging {
            if let Some(ref path) = self.log_file_path {
                self.rotate_log_file_if_needed(path);
                let local_time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                let log_line = format!("{} [{}] {}\n", local_time, level.to_uppercase(), sanitized);

                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = file.write_all(log_line.as_bytes());
                }
                self.prune_old_logs(path);
            }
        }

        // 保持日志数量在限制内
        if self.logs.len() > self.max_logs {
            self.logs.pop_front();
        }
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }

    pub fn get_log_file_path(&self) -> Option<String> {
        self.log_file_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    fn rotate_log_file_if_needed(&self, path: &PathBuf) {
        let Ok(metadata) = fs::metadata(path) else {
            return;
        };

        if metadata.len() <= self.config.max_file_size {
            return;
        }

        let suffix = Local::now().format("%Y%m%d-%H%M%S");
        let rotated = path.with_file_name(format!(
            "{}.{}",
            path.file_name().unwrap_or_default().to_string_lossy(),
            suffix
        ));

        let _ = fs::rename(path, &rotated);
        self.prune_old_logs(path);
    }

    fn prune_old_logs(&self, path: &PathBuf) {
        let Some(dir) = path.parent() else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        let cutoff = Utc::now() - Duration::days(self.config.retention_days as i64);
        let prefix = format!(
            "{}.",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !file_name.starts_with(&prefix) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let modified = chrono::DateTime::<Utc>::from(modified);
            if modified < cutoff {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

/// 简化的共享日志存储类型（使用 parking_lot）
pub type SharedLogStore = Arc<parking_lot::RwLock<LogStore>>;

/// 日志脱敏：平台 API 请求携带的凭证不落盘
pub fn sanitize_log_message(message: &str) -> String {
    // 简化版本：使用字符串替换而不是正则表达式
    let mut sanitized = message.to_string();

    // Bearer token
    if let Some(pos) = sanitized.find("Bearer ") {
        let start = pos + 7;
        if let Some(end) =
            sanitized[start..].find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        {
            sanitized.replace_range(start..start + end, "***");
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::{sanitize_log_message, LogStore};

    #[test]
    fn test_sanitize_bearer_token() {
        let input = "Authorization: Bearer abcDEF123 end";
        let output = sanitize_log_message(input);
        assert!(output.contains("***"));
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = "这是一段普通日志，不包含任何敏感字段。";
        let output = sanitize_log_message(input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_file_logging_writes_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codepark.log");
        let mut store = LogStore::with_file_path(path.clone());

        store.add("info", "会话已创建");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[INFO] 会话已创建"));
        assert_eq!(store.get_logs().len(), 1);
    }

    #[test]
    fn test_ring_buffer_caps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LogStore::with_file_path(dir.path().join("codepark.log"));

        for i in 0..1100 {
            store.add("debug", &format!("entry {}", i));
        }

        let logs = store.get_logs();
        assert_eq!(logs.len(), 1000);
        assert_eq!(logs[0].message, "entry 100");
    }
}
