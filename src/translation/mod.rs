//! 翻译模块
//!
//! 把 HTML 文档中的可见文本翻译成英文：
//!
//! - `pipeline`: 文本收集、分批、回写和选区
//! - `client`: Gemini 翻译客户端
//! - `core`: 编排器和进度报告
//! - `storage`: API Key 与模型设置的持久化
//! - `config`: 分层配置
//! - `error`: 错误类型

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod storage;

pub use client::{GeminiClient, Translator};
pub use config::{ConfigManager, GeminiModel, TranslationConfig};
pub use self::core::{NoopProgress, Orchestrator, Progress, ProgressSink, RunState, RunSummary};
pub use error::{ErrorCategory, TranslationError, TranslationResult};
pub use pipeline::{
    Batch, Batcher, ReconcileOutcome, Reconciler, Selection, TextCollector, TextUnit, WriteReport,
};
pub use storage::{
    ensure_api_key, FileSettingsStore, MemorySettingsStore, SettingsProvider, SettingsStore,
    StoreSettingsProvider,
};
