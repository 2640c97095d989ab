//! 设置存储模块

pub mod settings;

pub use settings::{
    ensure_api_key, FileSettingsStore, MemorySettingsStore, SettingsProvider, SettingsStore,
    StoreSettingsProvider, StoredSettings,
};
