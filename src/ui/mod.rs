//! 终端交互：进度覆盖层、提示和告警

pub mod overlay;
pub mod prompt;

pub use overlay::TerminalOverlay;
pub use prompt::{write_model_list, Prompter};
