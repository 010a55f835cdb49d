//! 多文件编辑工作区
//!
//! 一次编程练习的全部内存态文件（文件名、扩展名、内容）以及当前
//! 活动文件。单线程变更，由持有方保证同一工作区上的操作不并发。
//!
//! ## 功能
//! - 文件增删、激活切换、逐键内容更新
//! - 语言切换时重写活动文件扩展名
//! - 不变量：工作区任何时刻至少保留一个文件

pub mod export;

use codepark_core::models::{LanguageBinding, WorkspaceFile};

use crate::playground::PlaygroundError;

pub use export::ExportBundle;

/// 工作区
///
/// `active_file_id` 永远指向 `files` 中的一个在籍成员；删除活动
/// 文件时活动权回落到剩余文件中的第一个。
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    /// 文件序列，按创建顺序
    files: Vec<WorkspaceFile>,
    /// 活动文件 ID
    active_file_id: String,
}

impl WorkspaceStore {
    /// 创建工作区并播种第一个文件（空内容、立即激活）
    pub fn new(first_name: impl Into<String>, extension: impl Into<String>) -> Self {
        let first = WorkspaceFile::new(first_name, extension);
        let active_file_id = first.id.clone();
        Self {
            files: vec![first],
            active_file_id,
        }
    }

    /// 新建空文件，追加到末尾并立即激活
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> &WorkspaceFile {
        let file = WorkspaceFile::new(name, extension);
        self.active_file_id = file.id.clone();
        self.files.push(file);
        let file = self.files.last().unwrap();
        tracing::info!("[工作区] 新建文件: id={}, name={}", file.id, file.full_name());
        file
    }

    /// 删除文件
    ///
    /// 最后一个文件不可删除（`InvariantViolation`，工作区原样保留）。
    /// 删除的是活动文件时，活动权移交给剩余文件中的第一个。
    pub fn delete_file(&mut self, id: &str) -> Result<(), PlaygroundError> {
        if self.files.len() == 1 {
            return Err(PlaygroundError::InvariantViolation(
                "工作区至少保留一个文件".to_string(),
            ));
        }
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| PlaygroundError::NotFound(id.to_string()))?;

        let removed = self.files.remove(index);
        if self.active_file_id == removed.id {
            self.active_file_id = self.files[0].id.clone();
        }
        tracing::info!("[工作区] 删除文件: id={}, name={}", removed.id, removed.full_name());
        Ok(())
    }

    /// 切换活动文件
    pub fn set_active_file(&mut self, id: &str) -> Result<(), PlaygroundError> {
        if !self.files.iter().any(|f| f.id == id) {
            return Err(PlaygroundError::NotFound(id.to_string()));
        }
        self.active_file_id = id.to_string();
        Ok(())
    }

    /// 整体替换指定文件的内容（逐键更新走这里，不做任何语法校验）
    pub fn update_content(
        &mut self,
        id: &str,
        new_content: impl Into<String>,
    ) -> Result<(), PlaygroundError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PlaygroundError::NotFound(id.to_string()))?;
        file.content = new_content.into();
        file.touch();
        Ok(())
    }

    /// 重命名文件（不含扩展名部分）
    pub fn rename_file(
        &mut self,
        id: &str,
        new_name: impl Into<String>,
    ) -> Result<(), PlaygroundError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PlaygroundError::NotFound(id.to_string()))?;
        file.file_name = new_name.into();
        file.touch();
        Ok(())
    }

    /// 语言切换：重写活动文件的扩展名，内容保持不变
    pub fn select_language_extension(&mut self, binding: &LanguageBinding) {
        let active_id = self.active_file_id.clone();
        if let Some(file) = self.files.iter_mut().find(|f| f.id == active_id) {
            tracing::info!(
                "[工作区] 切换语言: file={}, {} -> {}",
                file.file_name,
                file.extension,
                binding.extension_hint
            );
            file.extension = binding.extension_hint.clone();
            file.touch();
        }
    }

    /// 当前活动文件
    pub fn active_file(&self) -> &WorkspaceFile {
        // 构造与变更共同维护：active_file_id 必然在籍
        self.files
            .iter()
            .find(|f| f.id == self.active_file_id)
            .expect("活动文件必然存在")
    }

    /// 按 ID 查找文件
    pub fn find_file(&self, id: &str) -> Option<&WorkspaceFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// 全部文件
    pub fn files(&self) -> &[WorkspaceFile] {
        &self.files
    }

    /// 指定文件名+扩展名是否与其他文件重名（仅作提示，不阻止操作）
    pub fn has_duplicate_name(&self, id: &str) -> bool {
        let Some(target) = self.find_file(id) else {
            return false;
        };
        self.files
            .iter()
            .any(|f| f.id != id && f.file_name == target.file_name && f.extension == target.extension)
    }
}
