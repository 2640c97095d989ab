//! 翻译配置管理模块
//!
//! 提供分层配置：默认值、配置文件、`.env` 文件和环境变量

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, GeminiModel, TranslationConfig};

/// 配置常量
pub mod constants {
    // 批次处理相关
    pub const BATCH_CHARACTER_LIMIT: usize = 15000;
    pub const DEFAULT_DELIMITER: &str = "|||---|||";

    // 文本过滤相关
    pub const MIN_TEXT_LENGTH: usize = 5;

    // 默认API设置
    pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    // 最近元素祖先为这些元素时跳过文本
    pub const SKIP_PARENT_ELEMENTS: &[&str] = &["script", "style"];

    // 永远不会渲染的元素，整棵子树跳过
    pub const NEVER_RENDERED_ELEMENTS: &[&str] = &["head", "template", "noscript", "title"];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "genslate.toml",
        ".genslate.toml",
        "~/.config/genslate/config.toml",
    ];

    // .env 文件搜索顺序
    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];
}

