//! # Genslate Library
//!
//! 把 HTML 文档中的可见文本批量发送给 Google Gemini，翻译成英文后写回 DOM。
//!
//! ## 模块组织
//!
//! - `core` - 输入加载、输出写入和顶层错误类型
//! - `env` - 类型安全的环境变量访问
//! - `parsers` - HTML 解析、序列化和 DOM 工具
//! - `translation` - 收集、分批、翻译、回写的完整流程
//! - `ui` - 终端进度和交互提示

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;
pub mod ui;

// Re-export commonly used items for convenience
pub use crate::core::{
    format_output_path, load_document, read_input, write_output, GenslateError, InputDocument,
    LoadedDocument,
};
pub use parsers::*;
pub use translation::{
    GeminiClient, GeminiModel, Orchestrator, RunSummary, TranslationConfig, TranslationError,
    Translator,
};
