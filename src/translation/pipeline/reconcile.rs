//! 译文回写
//!
//! 把一个批次的译文按分隔符拆回各个文本节点。段数与单元数一致时逐一回写；
//! 不一致时整段译文只写入第一个单元，其余单元保持原样。

use super::batch::Batch;
use crate::translation::config::TranslationConfig;

/// 回写结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Aligned,
    Mismatch { expected: usize, actual: usize },
}

/// 单个批次的回写报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub batch_id: usize,
    pub units: usize,
    /// 实际写入的节点数
    pub written: usize,
    /// 节点已失效而跳过的写入数
    pub revoked: usize,
    pub outcome: ReconcileOutcome,
}

impl WriteReport {
    pub fn is_aligned(&self) -> bool {
        self.outcome == ReconcileOutcome::Aligned
    }
}

/// 译文回写器
#[derive(Debug, Clone)]
pub struct Reconciler {
    delimiter: String,
}

impl Reconciler {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.delimiter.clone())
    }

    pub fn reconcile(&self, batch: &Batch, result: &str) -> WriteReport {
        let segments: Vec<&str> = result.split(self.delimiter.as_str()).collect();
        let mut written = 0;
        let mut revoked = 0;

        let outcome = if segments.len() == batch.units.len() {
            for (unit, segment) in batch.units.iter().zip(segments) {
                if unit.owner.set_text(segment.trim()) {
                    written += 1;
                } else {
                    revoked += 1;
                }
            }
            ReconcileOutcome::Aligned
        } else {
            tracing::warn!(
                "批次 #{} 段数不匹配: 期望 {} 段, 实际 {} 段, 整段译文写入第一个节点",
                batch.id,
                batch.units.len(),
                segments.len()
            );
            if let Some(first) = batch.units.first() {
                if first.owner.set_text(result) {
                    written += 1;
                } else {
                    revoked += 1;
                }
            }
            ReconcileOutcome::Mismatch {
                expected: batch.units.len(),
                actual: segments.len(),
            }
        };

        if revoked > 0 {
            tracing::warn!("批次 #{} 有 {} 个节点已失效，跳过写入", batch.id, revoked);
        }

        WriteReport {
            batch_id: batch.id,
            units: batch.units.len(),
            written,
            revoked,
            outcome,
        }
    }
}
