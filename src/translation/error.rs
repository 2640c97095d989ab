//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。错误分为三类：
//!
//! - **运行期终止错误**: `NetworkError`、`ApiError`、`ParseError`，出现后当前翻译立即中止
//! - **前置条件错误**: `MissingApiKey`、`NoSelection`、`NoTranslatableText`，在任何网络请求之前报告
//! - **环境错误**: 配置、设置存储和输入问题

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 网络错误（没有收到任何响应）
    #[error("A network error occurred: {0}")]
    NetworkError(String),

    /// API 错误：非成功状态码，或响应体合法但携带错误信息
    #[error("API Error: {message}")]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    /// 解析错误：成功状态码但响应体不是合法 JSON
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// 未配置 API Key
    #[error("Translation cancelled. API Key is required.")]
    MissingApiKey,

    /// 没有选中任何文本
    #[error("Please select some text to translate first.")]
    NoSelection,

    /// 页面上没有可翻译的文本
    #[error("No translatable text found on the page.")]
    NoTranslatableText,

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 设置存储错误
    #[error("Settings storage error: {0}")]
    StorageError(String),

    /// 输入验证错误
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TranslationError {
    /// 创建 API 错误
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        TranslationError::ApiError {
            status,
            message: message.into(),
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::ApiError { .. } => ErrorCategory::Service,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::MissingApiKey
            | TranslationError::NoSelection
            | TranslationError::NoTranslatableText => ErrorCategory::Preflight,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
        }
    }

    /// 是否为前置条件错误（此时尚未发出任何网络请求）
    pub fn is_preflight(&self) -> bool {
        self.category() == ErrorCategory::Preflight
    }

    /// 是否为翻译客户端产生的终止性错误
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Service | ErrorCategory::Parsing
        )
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Network,
    Service,
    Parsing,
    Preflight,
    Configuration,
    Storage,
    Input,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::StorageError(format!("IO错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::StorageError(format!("TOML序列化错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;
