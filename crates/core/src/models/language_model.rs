//! 编程语言目录数据模型
//!
//! 语言目录由平台后端提供（REST 接口），核心只用它来选择默认
//! 扩展名和传输层语言短代码。

use serde::{Deserialize, Serialize};

/// 编程语言条目
///
/// 字段名与平台后端返回的 JSON 保持一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBinding {
    /// 语言 ID
    #[serde(rename = "progLangID")]
    pub prog_lang_id: i64,
    /// 语言显示名称
    #[serde(rename = "progLangName")]
    pub prog_lang_name: String,
    /// 默认文件扩展名（如 "py"、"c"、"java"）
    #[serde(rename = "progLangExtension")]
    pub extension_hint: String,
}

impl LanguageBinding {
    /// 传输层语言短代码
    ///
    /// 执行服务的 `init` 消息使用扩展名作为语言代码。
    pub fn transport_code(&self) -> &str {
        &self.extension_hint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{"progLangID":3,"progLangName":"Python 3","progLangExtension":"py"}"#;
        let lang: LanguageBinding = serde_json::from_str(json).unwrap();
        assert_eq!(lang.prog_lang_id, 3);
        assert_eq!(lang.prog_lang_name, "Python 3");
        assert_eq!(lang.transport_code(), "py");
    }

    #[test]
    fn test_serialize_roundtrip_field_names() {
        let lang = LanguageBinding {
            prog_lang_id: 1,
            prog_lang_name: "C".to_string(),
            extension_hint: "c".to_string(),
        };
        let json = serde_json::to_string(&lang).unwrap();
        assert!(json.contains("\"progLangID\":1"));
        assert!(json.contains("\"progLangName\":\"C\""));
        assert!(json.contains("\"progLangExtension\":\"c\""));
    }
}
