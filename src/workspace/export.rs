//! 工作区文件导出
//!
//! 把工作区文件集导出为可下载的字节流：单文件直接给出原始内容，
//! 多文件打包为 zip 归档（每个文件一个条目，命名 `文件名.扩展名`）。
//! 纯无状态变换，不影响会话。

use std::collections::HashMap;
use std::io::{Cursor, Write};

use codepark_core::models::WorkspaceFile;

use crate::playground::PlaygroundError;

/// 导出产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// 建议的下载文件名
    pub file_name: String,
    /// 字节内容（单文件为原始内容，多文件为 zip 归档）
    pub bytes: Vec<u8>,
}

impl ExportBundle {
    /// 从工作区文件集构造导出产物
    ///
    /// # 参数
    /// - `files`: 待导出文件，至少一个
    /// - `archive_name`: 多文件打包时的归档名（不含 `.zip` 后缀）
    ///
    /// 重名文件在归档内追加序号消歧（zip 条目名必须唯一）。
    pub fn from_files(
        files: &[WorkspaceFile],
        archive_name: &str,
    ) -> Result<Self, PlaygroundError> {
        match files {
            [] => Err(PlaygroundError::ExportFailed(
                "没有可导出的文件".to_string(),
            )),
            [single] => Ok(Self {
                file_name: single.full_name(),
                bytes: single.content.clone().into_bytes(),
            }),
            many => {
                let bytes = build_archive(many)
                    .map_err(|e| PlaygroundError::ExportFailed(e.to_string()))?;
                tracing::info!(
                    "[导出] 已打包 {} 个文件: {} 字节",
                    many.len(),
                    bytes.len()
                );
                Ok(Self {
                    file_name: format!("{}.zip", archive_name),
                    bytes,
                })
            }
        }
    }
}

/// 打包多文件为 zip 归档
fn build_archive(files: &[WorkspaceFile]) -> Result<Vec<u8>, zip::result::ZipError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let mut seen: HashMap<String, u32> = HashMap::new();
    for file in files {
        let entry_name = disambiguate(&mut seen, file);
        writer.start_file(entry_name, options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// 重名条目追加序号：`main.py`、`main (1).py`、`main (2).py`
fn disambiguate(seen: &mut HashMap<String, u32>, file: &WorkspaceFile) -> String {
    let base = file.full_name();
    let count = seen.entry(base.clone()).or_insert(0);
    let name = if *count == 0 {
        base
    } else if file.extension.is_empty() {
        format!("{} ({})", file.file_name, count)
    } else {
        format!("{} ({}).{}", file.file_name, count, file.extension)
    };
    *count += 1;
    name
}
