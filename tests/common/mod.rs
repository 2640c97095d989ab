// 集成测试公共模块
//
// 提供 HTML 样例、可编排的假翻译器和配置辅助

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use markup5ever_rcdom::RcDom;

use genslate::parsers::html_to_dom;
use genslate::translation::{
    TextCollector, TranslationConfig, TranslationError, TranslationResult, Translator,
};

/// 测试用 API Key
pub const TEST_API_KEY: &str = "test-api-key";

/// HTML 测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    /// 创建测试 DOM
    pub fn create_test_dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").expect("failed to parse test HTML")
    }

    /// 两个短段落，可以放进一个批次
    pub fn create_bonjour_welt_page() -> String {
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Testseite</title>
    <style>p { margin: 0; }</style>
</head>
<body>
    <p>Bonjour</p>
    <p>Welt</p>
    <script>console.log("ignored");</script>
</body>
</html>"#
            .to_string()
    }

    /// 一个超长段落夹在两个普通段落之间
    pub fn create_oversized_page(oversized_len: usize) -> String {
        format!(
            "<html><body><p>Premier paragraphe</p><p>{}</p><p>Dernier paragraphe</p></body></html>",
            "z".repeat(oversized_len)
        )
    }

    /// 多语言页面，包含隐藏内容
    pub fn create_mixed_language_page() -> String {
        r#"<html>
<head><title>Gemischte Seite</title></head>
<body>
    <header><h1>Willkommen auf unserer Seite</h1></header>
    <main>
        <p>Ceci est un paragraphe en français.</p>
        <p>Esto es un párrafo en español.</p>
        <div hidden><p>Versteckter Inhalt</p></div>
        <div style="display:none"><p>Contenu masqué</p></div>
        <ul>
            <li>Erster Punkt der Liste</li>
            <li>Segundo punto de la lista</li>
        </ul>
    </main>
    <footer><p>Alle Rechte vorbehalten</p></footer>
</body>
</html>"#
            .to_string()
    }

    /// 当前文档中所有可收集文本（裁剪后）
    pub fn visible_texts(dom: &RcDom) -> Vec<String> {
        TextCollector::new(0)
            .units(&dom.document)
            .map(|unit| unit.original_value.trim().to_string())
            .collect()
    }
}

/// 按顺序返回预设结果，并记录每次收到的载荷
pub struct RecordingTranslator {
    responses: Mutex<VecDeque<TranslationResult<String>>>,
    payloads: Mutex<Vec<String>>,
    models: Mutex<Vec<String>>,
}

impl RecordingTranslator {
    pub fn new(responses: Vec<TranslationResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            payloads: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        }
    }

    /// 原样返回输入
    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate(&self, payload: &str, config: &TranslationConfig) -> TranslationResult<String> {
        if config.api_key().is_none() {
            return Err(TranslationError::MissingApiKey);
        }
        self.payloads.lock().unwrap().push(payload.to_string());
        self.models.lock().unwrap().push(config.model.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(payload.to_string()),
        }
    }
}

/// 带测试 Key 的默认配置
pub fn keyed_config() -> TranslationConfig {
    TranslationConfig::default().with_api_key(TEST_API_KEY)
}

/// 指向模拟服务器的配置
pub fn mock_config(server_uri: &str) -> TranslationConfig {
    keyed_config().with_api_base_url(server_uri)
}

/// 构造 Gemini 成功响应体
pub fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    })
}
