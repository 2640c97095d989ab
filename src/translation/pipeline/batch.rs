//! 批次处理模块
//!
//! 按字符上限把文本单元贪心地切分成批次。单元加入当前批次的条件是：
//! 批次为空，或加入后总字符数仍严格小于上限。超出上限的单个单元独占一个批次。

use std::iter::{FusedIterator, Peekable};

use super::collector::TextUnit;
use crate::translation::config::TranslationConfig;

/// 一次请求发送的文本批次
#[derive(Debug, Clone)]
pub struct Batch {
    /// 批次编号，从 0 开始
    pub id: usize,
    pub units: Vec<TextUnit>,
    /// 以分隔符拼接的原文
    pub combined_payload: String,
    /// 所有单元的字符数之和
    pub char_count: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 是否为超出上限的单单元批次
    pub fn is_oversized(&self, limit: usize) -> bool {
        self.units.len() == 1 && self.char_count >= limit
    }
}

/// 批次构建器
#[derive(Debug, Clone)]
pub struct Batcher {
    limit: usize,
    delimiter: String,
}

impl Batcher {
    pub fn new(limit: usize, delimiter: impl Into<String>) -> Self {
        Self {
            limit,
            delimiter: delimiter.into(),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.batch_character_limit, config.delimiter.clone())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// 惰性地把单元序列切分为批次
    pub fn batches<I>(&self, units: I) -> Batches<I::IntoIter>
    where
        I: IntoIterator<Item = TextUnit>,
    {
        Batches {
            units: units.into_iter().peekable(),
            limit: self.limit,
            delimiter: self.delimiter.clone(),
            next_id: 0,
        }
    }
}

/// 批次迭代器
pub struct Batches<I: Iterator<Item = TextUnit>> {
    units: Peekable<I>,
    limit: usize,
    delimiter: String,
    next_id: usize,
}

impl<I: Iterator<Item = TextUnit>> Iterator for Batches<I> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let first = self.units.next()?;
        let mut char_count = first.char_count();
        let mut units = vec![first];

        while let Some(candidate) = self.units.peek() {
            let candidate_len = candidate.char_count();
            if char_count + candidate_len >= self.limit {
                break;
            }
            char_count += candidate_len;
            if let Some(unit) = self.units.next() {
                units.push(unit);
            }
        }

        let combined_payload = units
            .iter()
            .map(|unit| unit.original_value.as_str())
            .collect::<Vec<_>>()
            .join(&self.delimiter);

        let batch = Batch {
            id: self.next_id,
            units,
            combined_payload,
            char_count,
        };
        self.next_id += 1;

        tracing::debug!(
            "创建批次 #{}: {} 个单元, {} 个字符",
            batch.id,
            batch.len(),
            batch.char_count
        );

        Some(batch)
    }
}

impl<I: Iterator<Item = TextUnit>> FusedIterator for Batches<I> {}
