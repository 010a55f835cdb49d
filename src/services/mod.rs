//! 平台后端协作服务
//!
//! Playground 核心与教学平台后端的 REST 协作接口。

pub mod language_service;

pub use language_service::LanguageService;
