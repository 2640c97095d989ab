//! 配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 支持的 Gemini 模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum GeminiModel {
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-1.5-pro-latest")]
    Gemini15ProLatest,
    #[serde(rename = "gemini-1.5-flash-latest")]
    Gemini15FlashLatest,
    #[serde(rename = "gemini-pro")]
    GeminiPro,
}

impl GeminiModel {
    pub const DEFAULT: GeminiModel = GeminiModel::Gemini25Flash;

    /// 所有可选模型，按展示顺序排列
    pub const ALL: [GeminiModel; 5] = [
        GeminiModel::Gemini25Pro,
        GeminiModel::Gemini25Flash,
        GeminiModel::Gemini15ProLatest,
        GeminiModel::Gemini15FlashLatest,
        GeminiModel::GeminiPro,
    ];

    /// 接口使用的模型标识
    pub fn as_str(&self) -> &'static str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini15ProLatest => "gemini-1.5-pro-latest",
            GeminiModel::Gemini15FlashLatest => "gemini-1.5-flash-latest",
            GeminiModel::GeminiPro => "gemini-pro",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeminiModel {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeminiModel::ALL
            .iter()
            .copied()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| TranslationError::ConfigError(format!("未知模型: {}", s)))
    }
}

/// 翻译配置
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_key: Option<String>,
    pub model: GeminiModel,
    pub batch_character_limit: usize,
    pub delimiter: String,
    pub api_base_url: String,
    pub min_text_length: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::DEFAULT,
            batch_character_limit: constants::BATCH_CHARACTER_LIMIT,
            delimiter: constants::DEFAULT_DELIMITER.to_string(),
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            min_text_length: constants::MIN_TEXT_LENGTH,
        }
    }
}

// API Key 不出现在日志里
impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("batch_character_limit", &self.batch_character_limit)
            .field("delimiter", &self.delimiter)
            .field("api_base_url", &self.api_base_url)
            .field("min_text_length", &self.min_text_length)
            .finish()
    }
}

impl TranslationConfig {
    /// 返回可用的 API Key（空白视为未设置）
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_batch_character_limit(mut self, limit: usize) -> Self {
        self.batch_character_limit = limit;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.batch_character_limit == 0 {
            return Err(TranslationError::ConfigError("批次字符上限不能为0".to_string()));
        }

        if self.delimiter.is_empty() {
            return Err(TranslationError::ConfigError("分隔符不能为空".to_string()));
        }

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(TranslationError::ConfigError(format!(
                "API 地址必须以 http:// 或 https:// 开头: {}",
                self.api_base_url
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{translation, EnvVar};

        if let Ok(api_key) = translation::ApiKey::get() {
            self.api_key = Some(api_key);
            tracing::debug!("环境变量提供了 API Key");
        }

        if let Ok(model) = std::env::var(translation::Model::NAME) {
            match translation::Model::parse(&model) {
                Ok(model) => self.model = model,
                Err(e) => tracing::warn!("忽略无效的环境变量: {}", e),
            }
        }

        if let Ok(limit) = std::env::var(translation::BatchCharLimit::NAME) {
            match translation::BatchCharLimit::parse(&limit) {
                Ok(limit) => self.batch_character_limit = limit,
                Err(e) => tracing::warn!("忽略无效的环境变量: {}", e),
            }
        }

        if let Ok(url) = std::env::var(translation::ApiBaseUrl::NAME) {
            match translation::ApiBaseUrl::parse(&url) {
                Ok(url) => {
                    self.api_base_url = url;
                    tracing::info!("环境变量覆盖 API 地址: {}", self.api_base_url);
                }
                Err(e) => tracing::warn!("忽略无效的环境变量: {}", e),
            }
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 加载配置；给定路径时只读取该文件
    pub fn load(explicit_path: Option<&Path>) -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = match explicit_path {
            Some(path) => {
                tracing::info!("加载配置文件: {}", path.display());
                Self::load_from_file(path)?
            }
            None => Self::load_config()?,
        };
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从默认搜索路径加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let path = Path::new(expanded_path.as_ref());
            if path.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(path);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        // 非 .toml 后缀按 JSON 处理
        if path.extension().map_or(false, |ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() {
                if dotenv::from_filename(env_file).is_ok() {
                    tracing::debug!("已加载环境变量文件: {}", env_file);
                    break;
                }
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
