//! 数据模型模块
//!
//! 只包含可序列化的纯数据类型，业务逻辑位于主 crate。

pub mod file_model;
pub mod language_model;

pub use file_model::WorkspaceFile;
pub use language_model::LanguageBinding;
