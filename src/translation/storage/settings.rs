//! 设置存储
//!
//! 持久化 API Key 和模型选择。文件存储每次调用都重新读取，
//! 外部修改会在下一次读取时生效。

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::translation::config::{GeminiModel, TranslationConfig};
use crate::translation::error::{TranslationError, TranslationResult};

/// 设置存储接口
pub trait SettingsStore {
    fn api_key(&self) -> TranslationResult<Option<String>>;
    fn set_api_key(&self, api_key: Option<&str>) -> TranslationResult<()>;
    /// 用户保存过的模型；从未选择时为 `None`
    fn model(&self) -> TranslationResult<Option<GeminiModel>>;
    fn set_model(&self, model: GeminiModel) -> TranslationResult<()>;

    fn clear_api_key(&self) -> TranslationResult<()> {
        self.set_api_key(None)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn api_key(&self) -> TranslationResult<Option<String>> {
        (**self).api_key()
    }

    fn set_api_key(&self, api_key: Option<&str>) -> TranslationResult<()> {
        (**self).set_api_key(api_key)
    }

    fn model(&self) -> TranslationResult<Option<GeminiModel>> {
        (**self).model()
    }

    fn set_model(&self, model: GeminiModel) -> TranslationResult<()> {
        (**self).set_model(model)
    }
}

/// 持久化的设置内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoredSettings {
    pub api_key: Option<String>,
    pub model: Option<GeminiModel>,
}

/// 基于 TOML 文件的设置存储
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 平台默认位置，例如 Linux 上的 `~/.config/genslate/settings.toml`
    pub fn default_location() -> TranslationResult<Self> {
        let dirs = ProjectDirs::from("dev", "genslate", "genslate").ok_or_else(|| {
            TranslationError::StorageError("无法确定用户配置目录".to_string())
        })?;
        Ok(Self::new(dirs.config_dir().join("settings.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TranslationResult<StoredSettings> {
        if !self.path.exists() {
            return Ok(StoredSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            TranslationError::StorageError(format!(
                "设置文件 {} 格式错误: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write(&self, settings: &StoredSettings) -> TranslationResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("设置已保存: {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn api_key(&self) -> TranslationResult<Option<String>> {
        Ok(self.read()?.api_key.filter(|key| !key.trim().is_empty()))
    }

    fn set_api_key(&self, api_key: Option<&str>) -> TranslationResult<()> {
        let mut settings = self.read()?;
        settings.api_key = api_key.map(|key| key.trim().to_string());
        self.write(&settings)
    }

    fn model(&self) -> TranslationResult<Option<GeminiModel>> {
        Ok(self.read()?.model)
    }

    fn set_model(&self, model: GeminiModel) -> TranslationResult<()> {
        let mut settings = self.read()?;
        settings.model = Some(model);
        self.write(&settings)
    }
}

/// 内存设置存储，克隆之间共享状态
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    inner: Rc<RefCell<StoredSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().api_key = Some(api_key.into());
        store
    }
}

impl SettingsStore for MemorySettingsStore {
    fn api_key(&self) -> TranslationResult<Option<String>> {
        Ok(self.inner.borrow().api_key.clone())
    }

    fn set_api_key(&self, api_key: Option<&str>) -> TranslationResult<()> {
        self.inner.borrow_mut().api_key = api_key.map(str::to_string);
        Ok(())
    }

    fn model(&self) -> TranslationResult<Option<GeminiModel>> {
        Ok(self.inner.borrow().model)
    }

    fn set_model(&self, model: GeminiModel) -> TranslationResult<()> {
        self.inner.borrow_mut().model = Some(model);
        Ok(())
    }
}

/// 每次调用都返回最新配置的提供者
pub trait SettingsProvider {
    fn configuration(&self) -> TranslationResult<TranslationConfig>;
}

impl SettingsProvider for TranslationConfig {
    fn configuration(&self) -> TranslationResult<TranslationConfig> {
        Ok(self.clone())
    }
}

/// 把设置存储叠加到基础配置上
///
/// 存储中的 API Key 和模型优先，没有保存过时使用基础配置。
#[derive(Debug, Clone)]
pub struct StoreSettingsProvider<S> {
    base: TranslationConfig,
    store: S,
}

impl<S: SettingsStore> StoreSettingsProvider<S> {
    pub fn new(base: TranslationConfig, store: S) -> Self {
        Self { base, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: SettingsStore> SettingsProvider for StoreSettingsProvider<S> {
    fn configuration(&self) -> TranslationResult<TranslationConfig> {
        let mut config = self.base.clone();
        if let Some(api_key) = self.store.api_key()? {
            config.api_key = Some(api_key);
        }
        if let Some(model) = self.store.model()? {
            config.model = model;
        }
        Ok(config)
    }
}

/// 确保存储中有 API Key，没有时调用 `prompt` 询问并保存
///
/// 用户拒绝输入时返回 [`TranslationError::MissingApiKey`]。
pub fn ensure_api_key<S, F>(store: &S, prompt: F) -> TranslationResult<String>
where
    S: SettingsStore + ?Sized,
    F: FnOnce() -> Option<String>,
{
    if let Some(api_key) = store.api_key()?.filter(|key| !key.trim().is_empty()) {
        return Ok(api_key);
    }

    match prompt().map(|key| key.trim().to_string()) {
        Some(api_key) if !api_key.is_empty() => {
            store.set_api_key(Some(&api_key))?;
            tracing::info!("API Key 已保存");
            Ok(api_key)
        }
        _ => Err(TranslationError::MissingApiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.toml"));

        assert_eq!(store.api_key().unwrap(), None);
        assert_eq!(store.model().unwrap(), None);

        store.set_api_key(Some("  abc123 ")).unwrap();
        store.set_model(GeminiModel::GeminiPro).unwrap();

        let reopened = FileSettingsStore::new(store.path());
        assert_eq!(reopened.api_key().unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.model().unwrap(), Some(GeminiModel::GeminiPro));

        reopened.clear_api_key().unwrap();
        assert_eq!(store.api_key().unwrap(), None);
        assert_eq!(store.model().unwrap(), Some(GeminiModel::GeminiPro));
    }

    #[test]
    fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "model = \"gpt-4\"").unwrap();
        let error = FileSettingsStore::new(&path).model().unwrap_err();
        assert!(matches!(error, TranslationError::StorageError(_)));
    }

    #[test]
    fn provider_prefers_stored_key_and_model() {
        let store = MemorySettingsStore::new();
        let base = TranslationConfig::default()
            .with_api_key("from-env")
            .with_model(GeminiModel::Gemini25Pro);
        let provider = StoreSettingsProvider::new(base, store.clone());

        let config = provider.configuration().unwrap();
        assert_eq!(config.api_key(), Some("from-env"));
        assert_eq!(config.model, GeminiModel::Gemini25Pro);

        store.set_api_key(Some("stored")).unwrap();
        store.set_model(GeminiModel::Gemini15ProLatest).unwrap();
        let config = provider.configuration().unwrap();
        assert_eq!(config.api_key(), Some("stored"));
        assert_eq!(config.model, GeminiModel::Gemini15ProLatest);
    }

    #[test]
    fn ensure_api_key_prompts_once_and_saves() {
        let store = MemorySettingsStore::new();
        let key = ensure_api_key(&store, || Some(" new-key ".to_string())).unwrap();
        assert_eq!(key, "new-key");
        assert_eq!(store.api_key().unwrap().as_deref(), Some("new-key"));

        let key = ensure_api_key(&store, || panic!("should not prompt")).unwrap();
        assert_eq!(key, "new-key");
    }

    #[test]
    fn declined_prompt_is_missing_key() {
        let store = MemorySettingsStore::new();
        assert_eq!(
            ensure_api_key(&store, || None).unwrap_err(),
            TranslationError::MissingApiKey
        );
        assert_eq!(
            ensure_api_key(&store, || Some("   ".to_string())).unwrap_err(),
            TranslationError::MissingApiKey
        );
    }
}
