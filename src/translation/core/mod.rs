//! 翻译核心模块
//!
//! - `orchestrator`: 整页与选区翻译流程
//! - `progress`: 进度模型和展示接口

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{Orchestrator, RunState, RunSummary};
pub use progress::{NoopProgress, Progress, ProgressSink};
