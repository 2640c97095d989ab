//! 进度报告

use std::fmt;

/// 翻译进度，以已处理单元数衡量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64
    }

    /// 四舍五入的百分比
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Translating... ({}%)", self.percent())
    }
}

/// 进度展示面
pub trait ProgressSink {
    /// 显示一条状态文本
    fn show(&self, message: &str);

    fn update(&self, progress: Progress) {
        self.show(&progress.to_string());
    }

    fn hide(&self);
}

/// 不显示任何内容
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn show(&self, _message: &str) {}

    fn hide(&self) {}
}
