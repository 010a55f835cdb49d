//! 工作区文件数据模型

use serde::{Deserialize, Serialize};

/// 工作区中的单个源代码文件
///
/// 由工作区独占持有；`id` 唯一标识文件，`file_name` + `extension`
/// 允许重复（重名仅作为提示信息暴露给用户）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceFile {
    pub id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub extension: String,
    pub content: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl WorkspaceFile {
    /// 创建空内容的新文件
    pub fn new(file_name: impl Into<String>, extension: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            extension: extension.into(),
            content: String::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// 完整文件名（含扩展名）
    pub fn full_name(&self) -> String {
        if self.extension.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}.{}", self.file_name, self.extension)
        }
    }

    /// 标记内容已更新
    pub fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now().timestamp());
    }
}
