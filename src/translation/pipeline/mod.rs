//! 翻译管道模块
//!
//! 文本收集、批次切分、译文回写和选区处理

pub mod batch;
pub mod collector;
pub mod node_ref;
pub mod reconcile;
pub mod selection;

// 重新导出主要类型
pub use batch::{Batch, Batcher, Batches};
pub use collector::{CollectionStats, TextCollector, TextUnit, TextUnits};
pub use node_ref::NodeRef;
pub use reconcile::{ReconcileOutcome, Reconciler, WriteReport};
pub use selection::Selection;
