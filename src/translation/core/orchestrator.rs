//! 翻译编排器
//!
//! 驱动 收集 → 分批 → 翻译 → 回写 的完整流程。批次严格串行处理，
//! 第一个客户端错误立即中止整个运行，已经回写的批次保持不变。

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use markup5ever_rcdom::Handle;

use super::progress::{Progress, ProgressSink};
use crate::translation::client::Translator;
use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::{Batcher, Reconciler, Selection, TextCollector, WriteReport};
use crate::translation::storage::SettingsProvider;

/// 编排器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Collecting,
    Translating { batch: usize },
    Reconciling { batch: usize },
}

/// 一次整页翻译的汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_units: usize,
    pub batches: usize,
    pub translated_units: usize,
    pub mismatched_batches: usize,
    pub revoked_writes: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub reports: Vec<WriteReport>,
}

impl RunSummary {
    fn new(total_units: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            total_units,
            batches: 0,
            translated_units: 0,
            mismatched_batches: 0,
            revoked_writes: 0,
            started_at,
            elapsed: Duration::ZERO,
            reports: Vec::new(),
        }
    }

    fn record(&mut self, report: WriteReport) {
        self.batches += 1;
        self.translated_units += report.written;
        self.revoked_writes += report.revoked;
        if !report.is_aligned() {
            self.mismatched_batches += 1;
        }
        self.reports.push(report);
    }
}

/// 翻译编排器
pub struct Orchestrator<T, S> {
    translator: T,
    settings: S,
    state: RunState,
}

impl<T: Translator, S: SettingsProvider> Orchestrator<T, S> {
    pub fn new(translator: T, settings: S) -> Self {
        Self {
            translator,
            settings,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!("状态变化: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// 读取当前配置并要求存在 API Key
    fn configuration_with_key(&self) -> TranslationResult<TranslationConfig> {
        let config = self.settings.configuration()?;
        if config.api_key().is_none() {
            return Err(TranslationError::MissingApiKey);
        }
        Ok(config)
    }

    /// 翻译 `root` 下所有可见文本
    ///
    /// 无论成功与否，返回前都会隐藏进度并回到 [`RunState::Idle`]。
    pub async fn run(
        &mut self,
        root: &Handle,
        sink: &dyn ProgressSink,
    ) -> TranslationResult<RunSummary> {
        let started_at = Utc::now();
        let timer = Instant::now();

        let result = self.run_batches(root, sink, started_at).await;

        sink.hide();
        self.transition(RunState::Idle);

        match result {
            Ok(mut summary) => {
                summary.elapsed = timer.elapsed();
                tracing::info!(
                    "翻译完成: {} 个批次, {}/{} 个单元已写入, {} 个批次不匹配, 耗时 {:?}",
                    summary.batches,
                    summary.translated_units,
                    summary.total_units,
                    summary.mismatched_batches,
                    summary.elapsed
                );
                Ok(summary)
            }
            Err(error) => {
                if error.is_preflight() {
                    tracing::warn!("翻译未开始: {}", error);
                } else {
                    tracing::error!("翻译中止: {}", error);
                }
                Err(error)
            }
        }
    }

    async fn run_batches(
        &mut self,
        root: &Handle,
        sink: &dyn ProgressSink,
        started_at: DateTime<Utc>,
    ) -> TranslationResult<RunSummary> {
        // 批次上限和分隔符在整个运行中保持不变
        let snapshot = self.configuration_with_key()?;

        sink.update(Progress::new(0, 0));
        self.transition(RunState::Collecting);

        let units: Vec<_> = TextCollector::from_config(&snapshot).units(root).collect();
        let total = units.len();
        if total == 0 {
            return Err(TranslationError::NoTranslatableText);
        }

        tracing::info!(
            "开始翻译: {} 个文本单元, 批次上限 {} 字符",
            total,
            snapshot.batch_character_limit
        );

        let reconciler = Reconciler::from_config(&snapshot);
        let mut summary = RunSummary::new(total, started_at);
        let mut processed = 0;

        for batch in Batcher::from_config(&snapshot).batches(units) {
            self.transition(RunState::Translating { batch: batch.id });

            // Key 和模型在每个批次前重新读取
            let config = self
                .settings
                .configuration()?
                .with_delimiter(snapshot.delimiter.clone());
            let translated = self
                .translator
                .translate(&batch.combined_payload, &config)
                .await?;

            self.transition(RunState::Reconciling { batch: batch.id });
            let report = reconciler.reconcile(&batch, &translated);
            summary.record(report);

            processed += batch.len();
            sink.update(Progress::new(processed, total));
        }

        Ok(summary)
    }

    /// 翻译选区并原地替换，返回译文
    pub async fn translate_selection(
        &mut self,
        selection: &mut Selection,
        sink: &dyn ProgressSink,
    ) -> TranslationResult<String> {
        let selected = selection.text();
        let selected = selected.trim();
        if selected.is_empty() {
            return Err(TranslationError::NoSelection);
        }
        let config = self.configuration_with_key()?;

        sink.show("Translating selection...");
        self.transition(RunState::Translating { batch: 0 });
        let result = self.translator.translate(selected, &config).await;
        sink.hide();
        self.transition(RunState::Idle);

        let translated = result?;
        if !selection.replace_with(&translated) {
            tracing::warn!("选区所在节点已失效，译文未写入");
        }
        Ok(translated)
    }

    /// 翻译一段独立文本，不涉及 DOM
    pub async fn translate_text(&mut self, text: &str) -> TranslationResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslationError::NoSelection);
        }
        let config = self.configuration_with_key()?;

        self.transition(RunState::Translating { batch: 0 });
        let result = self.translator.translate(text, &config).await;
        self.transition(RunState::Idle);
        result
    }
}
