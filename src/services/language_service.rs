//! 语言目录服务
//!
//! 从教学平台后端拉取可用编程语言目录，供语言选择器与传输层
//! 语言短代码使用。目录在内存中缓存，拉取失败时沿用上次结果。
//!
//! ## 功能
//! - GET {base_url}/proglanguages 拉取语言列表
//! - 语言绑定缓存与查找
//! - 扩展名辅助查询

use std::time::Duration;

use tokio::sync::RwLock;

use codepark_core::models::LanguageBinding;

use crate::playground::PlaygroundError;

/// 请求超时
const FETCH_TIMEOUT_SECS: u64 = 15;

/// 语言目录服务
pub struct LanguageService {
    /// 平台后端基地址（不含尾部斜杠）
    base_url: String,
    /// HTTP 客户端
    client: reqwest::Client,
    /// 目录缓存
    catalog: RwLock<Vec<LanguageBinding>>,
}

impl LanguageService {
    /// 创建语言目录服务
    ///
    /// # 参数
    /// - `base_url`: 平台后端基地址（如 `https://api.example.com`）
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlaygroundError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlaygroundError::Internal(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            catalog: RwLock::new(Vec::new()),
        })
    }

    /// 拉取语言目录并更新缓存
    ///
    /// # 返回
    /// 最新的语言绑定列表
    pub async fn fetch_languages(&self) -> Result<Vec<LanguageBinding>, PlaygroundError> {
        let url = format!("{}/proglanguages", self.base_url);
        tracing::info!("[语言目录] 拉取: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PlaygroundError::CatalogFetchFailed(format!("请求失败: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PlaygroundError::CatalogFetchFailed(format!(
                "后端返回错误: {}",
                status
            )));
        }

        let languages: Vec<LanguageBinding> = response
            .json()
            .await
            .map_err(|e| PlaygroundError::CatalogFetchFailed(format!("解析响应失败: {}", e)))?;

        tracing::info!("[语言目录] 获取到 {} 种语言", languages.len());

        {
            let mut cache = self.catalog.write().await;
            *cache = languages.clone();
        }

        Ok(languages)
    }

    /// 缓存的语言目录快照
    pub async fn cached_languages(&self) -> Vec<LanguageBinding> {
        self.catalog.read().await.clone()
    }

    /// 按语言 ID 查找绑定
    pub async fn find_language(&self, prog_lang_id: i64) -> Option<LanguageBinding> {
        self.catalog
            .read()
            .await
            .iter()
            .find(|l| l.prog_lang_id == prog_lang_id)
            .cloned()
    }

    /// 按语言 ID 查询文件扩展名（同时是传输层语言短代码）
    pub async fn default_extension(&self, prog_lang_id: i64) -> Option<String> {
        self.find_language(prog_lang_id)
            .await
            .map(|l| l.extension_hint)
    }
}
