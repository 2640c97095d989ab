//! Gemini 翻译客户端
//!
//! 每次调用只发送一个 `generateContent` 请求，不重试、不设超时。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

const QUOTA_HINT: &str = "This means you have exceeded your API request quota.";
const INVALID_REQUEST_HINT: &str = "This often means the API key is invalid or the selected model doesn't support the request. Please verify your key and model.";
const GENERIC_HINT: &str = "The API returned a non-200 status.";
const NO_TRANSLATION_MESSAGE: &str = "The API response did not contain a valid translation.";

/// 翻译服务接口
#[async_trait]
pub trait Translator: Send + Sync {
    /// 把 `payload` 翻译成英文
    ///
    /// `config` 在每次调用前读取，调用之间可以变化。
    async fn translate(&self, payload: &str, config: &TranslationConfig) -> TranslationResult<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini REST 客户端
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> TranslationResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| TranslationError::NetworkError(format!("无法创建HTTP客户端: {}", e)))?;
        Ok(Self { client })
    }

    /// 构造请求地址，API Key 作为查询参数
    pub fn endpoint(config: &TranslationConfig, api_key: &str) -> TranslationResult<Url> {
        let raw = format!(
            "{}/models/{}:generateContent",
            config.api_base_url.trim_end_matches('/'),
            config.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| TranslationError::ConfigError(format!("无效的API地址 {}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl Translator for GeminiClient {
    async fn translate(&self, payload: &str, config: &TranslationConfig) -> TranslationResult<String> {
        let api_key = config.api_key().ok_or(TranslationError::MissingApiKey)?;
        let url = Self::endpoint(config, api_key)?;
        let prompt = build_prompt(payload, &config.delimiter);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        tracing::debug!(
            "发送翻译请求: model={}, {} 个字符",
            config.model,
            payload.chars().count()
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        tracing::trace!("API响应 {}: {}", status, body);

        interpret_response(status, &body)
    }
}

/// 把 HTTP 状态和响应体解释为译文或错误
pub fn interpret_response(status: StatusCode, body: &str) -> TranslationResult<String> {
    if status != StatusCode::OK {
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        tracing::error!("API请求失败，状态码 {}", status.as_u16());
        return Err(TranslationError::api(
            Some(status.as_u16()),
            format!("{}. {}", reason, status_hint(status)),
        ));
    }

    let data: Value =
        serde_json::from_str(body).map_err(|e| TranslationError::ParseError(e.to_string()))?;

    let translation = data
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());

    match translation {
        Some(text) => Ok(text.trim().to_string()),
        None => {
            let message = data
                .pointer("/error/message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(NO_TRANSLATION_MESSAGE);
            tracing::error!("API响应中没有译文: {}", message);
            Err(TranslationError::api(Some(status.as_u16()), message))
        }
    }
}

fn status_hint(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 | 401 | 403 | 404 => INVALID_REQUEST_HINT,
        429 => QUOTA_HINT,
        _ => GENERIC_HINT,
    }
}

/// 构造翻译提示词
pub fn build_prompt(payload: &str, delimiter: &str) -> String {
    format!(
        r#"You are an expert translation service. Your task is to translate a batch of text segments from their original language into English.

**Instructions:**
1. The input text contains multiple segments separated by "{d}".
2. Translate EACH segment into English.
3. If a segment is already in English, or is a proper noun, brand name, or technical term, keep it as is.
4. Your output MUST preserve the "{d}" separator between the translated segments. The number of separators in your output must exactly match the input.
5. Do NOT add any extra text, explanations, or introductions. Provide only the translated text with the separators.

**Example:**
Input: "Bonjour{d}Welt{d}Hello"
Output: "Hello{d}World{d}Hello"

**Text to Translate:**
---
{payload}
---"#,
        d = delimiter,
        payload = payload
    )
}
